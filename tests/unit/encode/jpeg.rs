use super::*;
use crate::foundation::core::Dimensions;

#[test]
fn encodes_decodable_jpeg_with_frame_dimensions() {
    let dims = Dimensions::new(16, 8).unwrap();
    let data: Vec<u8> = (0..dims.pixel_count() * 3).map(|i| (i * 7) as u8).collect();
    let frame = RgbFrame::from_raw(dims, data).unwrap();

    let bytes = encode_jpeg(&frame, STREAM_JPEG_QUALITY).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (16, 8));
}

#[test]
fn lower_quality_is_not_larger_on_noise() {
    let dims = Dimensions::new(32, 32).unwrap();
    let data: Vec<u8> = (0..dims.pixel_count() * 3)
        .map(|i| ((i * 2_654_435_761usize) >> 7) as u8)
        .collect();
    let frame = RgbFrame::from_raw(dims, data).unwrap();
    let low = encode_jpeg(&frame, 10).unwrap();
    let high = encode_jpeg(&frame, 95).unwrap();
    assert!(low.len() < high.len());
}

#[test]
fn rejects_out_of_range_quality() {
    let frame = RgbFrame::new(Dimensions::new(1, 1).unwrap());
    assert!(matches!(
        encode_jpeg(&frame, 0),
        Err(NoiseError::Validation(_))
    ));
    assert!(encode_jpeg(&frame, 101).is_err());
}
