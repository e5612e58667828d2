use super::*;
use crate::foundation::core::Dimensions;

fn gradient(w: u32, h: u32) -> RgbFrame {
    let mut data = Vec::with_capacity((w * h * 3) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 7]);
        }
    }
    RgbFrame::from_raw(Dimensions::new(w, h).unwrap(), data).unwrap()
}

#[test]
fn same_size_is_a_copy() {
    let src = gradient(4, 3);
    let mut dst = RgbFrame::new(src.dims());
    resize_into(&src, &mut dst, ResizeFilter::Bilinear).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn nearest_halving_picks_even_pixels() {
    let src = gradient(8, 4);
    let mut dst = RgbFrame::new(Dimensions::new(4, 2).unwrap());
    resize_into(&src, &mut dst, ResizeFilter::Nearest).unwrap();
    assert_eq!(dst.pixel(0, 0), src.pixel(0, 0));
    assert_eq!(dst.pixel(3, 1), src.pixel(6, 2));
}

#[test]
fn bilinear_preserves_flat_color() {
    let d = Dimensions::new(9, 7).unwrap();
    let src = RgbFrame::from_raw(d, [33u8, 66, 99].repeat(63)).unwrap();
    let mut dst = RgbFrame::new(Dimensions::new(4, 3).unwrap());
    resize_into(&src, &mut dst, ResizeFilter::Bilinear).unwrap();
    assert!(dst.as_bytes().chunks_exact(3).all(|px| px == [33, 66, 99]));
}

#[test]
fn bilinear_halving_averages_neighbours() {
    let src = gradient(4, 2);
    let mut dst = RgbFrame::new(Dimensions::new(2, 1).unwrap());
    resize_into(&src, &mut dst, ResizeFilter::Bilinear).unwrap();
    // Center of the first output pixel sits between source columns 0 and 1.
    assert_eq!(dst.pixel(0, 0)[0], 5);
    assert_eq!(dst.pixel(1, 0)[0], 25);
}
