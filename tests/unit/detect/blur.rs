use super::*;
use crate::foundation::core::Dimensions;

#[test]
fn kernel_sums_to_one_in_q16() {
    let k = gaussian_kernel_q16(2, SIGMA_5X5).unwrap();
    assert_eq!(k.len(), 5);
    assert_eq!(k.iter().map(|&w| u64::from(w)).sum::<u64>(), 1 << 16);
    assert!(k[2] > k[1] && k[1] > k[0]);
}

#[test]
fn constant_frame_is_unchanged() {
    let d = Dimensions::new(6, 5).unwrap();
    let src = RgbFrame::from_raw(d, [10u8, 200, 77].repeat(30)).unwrap();
    let mut dst = RgbFrame::new(d);
    let mut blur = GaussianBlur::new(2, SIGMA_5X5, src.as_bytes().len()).unwrap();
    blur.apply(&src, &mut dst).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn single_bright_pixel_spreads() {
    let d = Dimensions::new(5, 5).unwrap();
    let mut src = RgbFrame::new(d);
    let center = (2 * 5 + 2) * 3;
    src.as_bytes_mut()[center..center + 3].copy_from_slice(&[255, 255, 255]);

    let mut dst = RgbFrame::new(d);
    let mut blur = GaussianBlur::new(2, SIGMA_5X5, src.as_bytes().len()).unwrap();
    blur.apply(&src, &mut dst).unwrap();

    let lit = dst.as_bytes().chunks_exact(3).filter(|px| px[0] != 0).count();
    assert!(lit > 1);
    assert!(dst.pixel(2, 2)[0] < 255);
}

#[test]
fn bad_sigma_is_rejected() {
    assert!(gaussian_kernel_q16(2, 0.0).is_err());
    assert!(gaussian_kernel_q16(0, 0.0).is_ok());
}
