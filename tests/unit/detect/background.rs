use super::*;

fn dims() -> Dimensions {
    Dimensions::new(24, 24).unwrap()
}

fn flat(v: u8) -> RgbFrame {
    RgbFrame::from_raw(dims(), vec![v; 24 * 24 * 3]).unwrap()
}

fn with_square(bg: u8, x0: u32, y0: u32, size: u32) -> RgbFrame {
    let mut f = flat(bg);
    let w = dims().width;
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            let i = ((y * w + x) * 3) as usize;
            f.as_bytes_mut()[i..i + 3].copy_from_slice(&[255, 255, 255]);
        }
    }
    f
}

fn is_binary(mask: &Mask) -> bool {
    mask.as_bytes().iter().all(|&v| v == 0 || v == MASK_ON)
}

#[test]
fn first_frame_is_background() {
    let mut model = BackgroundModel::new(dims()).unwrap();
    let mut mask = Mask::new(dims());
    model.apply(&with_square(0, 4, 4, 6), &mut mask).unwrap();
    assert!(!mask.any_set());
    assert_eq!(model.frames_seen(), 1);
}

#[test]
fn static_scene_stays_background() {
    let mut model = BackgroundModel::new(dims()).unwrap();
    let mut mask = Mask::new(dims());
    for _ in 0..20 {
        model.apply(&flat(120), &mut mask).unwrap();
        assert!(!mask.any_set());
    }
}

#[test]
fn appearing_object_is_foreground_and_mask_is_binary() {
    let mut model = BackgroundModel::new(dims()).unwrap();
    let mut mask = Mask::new(dims());
    for _ in 0..10 {
        model.apply(&flat(0), &mut mask).unwrap();
    }
    model.apply(&with_square(0, 8, 8, 8), &mut mask).unwrap();
    assert!(is_binary(&mask));
    assert_eq!(mask.get(12, 12), MASK_ON);
    assert_eq!(mask.get(0, 0), 0);
    assert_eq!(mask.get(23, 23), 0);
}

#[test]
fn persistent_object_is_absorbed_into_background() {
    let mut model = BackgroundModel::new(dims()).unwrap();
    let mut mask = Mask::new(dims());
    for _ in 0..5 {
        model.apply(&flat(0), &mut mask).unwrap();
    }
    let scene = with_square(0, 8, 8, 8);
    for _ in 0..200 {
        model.apply(&scene, &mut mask).unwrap();
    }
    assert_eq!(mask.get(12, 12), 0);
}

#[test]
fn update_pixel_keeps_weights_normalized_and_sorted() {
    let mut used = 0u8;
    let mut weight = [0.0f32; MAX_MODES];
    let mut variance = [0.0f32; MAX_MODES];
    let mut mean = [0.0f32; MAX_MODES * 3];

    for (i, v) in [10.0f32, 10.0, 200.0, 10.0, 90.0, 10.0].iter().enumerate() {
        let alpha = 1.0 / (2.0 * (i as f32 + 1.0));
        update_pixel(&mut used, &mut weight, &mut variance, &mut mean, [*v; 3], alpha);
    }

    let n = used as usize;
    assert!(n >= 2 && n <= MAX_MODES);
    let sum: f32 = weight[..n].iter().sum();
    assert!((sum - 1.0).abs() < 0.05, "weights sum to {sum}");
    for pair in weight[..n].windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    assert!(variance[..n].iter().all(|&v| (VAR_MIN..=VAR_MAX).contains(&v)));
}

#[test]
fn mismatched_dims_are_rejected() {
    let mut model = BackgroundModel::new(dims()).unwrap();
    let mut mask = Mask::new(Dimensions::new(2, 2).unwrap());
    assert!(model.apply(&flat(0), &mut mask).is_err());
}
