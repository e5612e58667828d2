use super::*;

#[test]
fn buffers_have_fixed_job_dimensions() {
    let src = Dimensions::new(100, 60).unwrap();
    let dst = src.scaled(0.5).unwrap();
    let s = ScratchBuffers::new(src, dst);

    assert_eq!(s.source_dims(), src);
    assert_eq!(s.target_dims(), dst);
    assert_eq!(s.resized.dims(), dst);
    assert_eq!(s.mask.dims(), dst);
    assert_eq!(s.dilated.dims(), dst);
    assert_eq!(s.mask.as_bytes().len(), 50 * 30);
    assert_eq!(s.result.as_bytes().len(), 50 * 30 * 3);
    assert_eq!(s.byte_len(), 100 * 60 * 3 + 2 * 50 * 30 * 3 + 2 * 50 * 30);
}
