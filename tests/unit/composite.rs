use super::*;
use crate::foundation::core::Dimensions;
use crate::foundation::frame::MASK_ON;

fn dims() -> Dimensions {
    Dimensions::new(5, 5).unwrap()
}

fn pool() -> NoisePool {
    NoisePool::with_len(dims(), true, 4, Some(11)).unwrap()
}

fn mask_with(points: &[(u32, u32)]) -> Mask {
    let mut m = Mask::new(dims());
    for &(x, y) in points {
        m.as_bytes_mut()[(y * 5 + x) as usize] = MASK_ON;
    }
    m
}

#[test]
fn empty_mask_yields_static_texture() {
    let pool = pool();
    let mut out = RgbFrame::new(dims());
    let mut dilated = Mask::new(dims());
    let drawn = composite(&mut out, &pool, &Mask::new(dims()), &mut dilated, 3, false).unwrap();
    assert!(!drawn);
    assert_eq!(&out, pool.static_texture());
}

#[test]
fn nitro_reveals_exactly_the_mask() {
    let pool = pool();
    let mask = mask_with(&[(2, 2)]);
    let mut out = RgbFrame::new(dims());
    let mut dilated = Mask::new(dims());
    composite(&mut out, &pool, &mask, &mut dilated, 1, true).unwrap();

    for y in 0..5 {
        for x in 0..5 {
            let expected = if (x, y) == (2, 2) {
                pool.cycled(1).pixel(x, y)
            } else {
                pool.static_texture().pixel(x, y)
            };
            assert_eq!(out.pixel(x, y), expected, "pixel {x},{y}");
        }
    }
}

#[test]
fn default_mode_reveals_dilated_footprint() {
    let pool = pool();
    let mask = mask_with(&[(2, 2)]);
    let mut out = RgbFrame::new(dims());
    let mut dilated = Mask::new(dims());
    composite(&mut out, &pool, &mask, &mut dilated, 6, false).unwrap();

    for y in 0..5u32 {
        for x in 0..5u32 {
            let inside = x.abs_diff(2) <= 1 && y.abs_diff(2) <= 1;
            let expected = if inside {
                pool.cycled(6).pixel(x, y)
            } else {
                pool.static_texture().pixel(x, y)
            };
            assert_eq!(out.pixel(x, y), expected, "pixel {x},{y}");
        }
    }
}

#[test]
fn dilation_at_corner_stays_in_bounds() {
    let src = mask_with(&[(0, 0)]);
    let mut dst = Mask::new(dims());
    dilate_3x3(&src, &mut dst).unwrap();
    assert_eq!(dst.count_set(), 4);
    assert_eq!(dst.get(1, 1), MASK_ON);
    assert_eq!(dst.get(2, 0), 0);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let pool = pool();
    let mut out = RgbFrame::new(Dimensions::new(4, 4).unwrap());
    let mut dilated = Mask::new(dims());
    assert!(composite(&mut out, &pool, &Mask::new(dims()), &mut dilated, 0, false).is_err());
}
