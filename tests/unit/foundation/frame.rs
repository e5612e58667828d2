use super::*;

fn dims(w: u32, h: u32) -> Dimensions {
    Dimensions::new(w, h).unwrap()
}

#[test]
fn from_raw_checks_length() {
    assert!(RgbFrame::from_raw(dims(2, 2), vec![0; 12]).is_ok());
    assert!(RgbFrame::from_raw(dims(2, 2), vec![0; 11]).is_err());
    assert!(GrayFrame::from_raw(dims(2, 2), vec![0; 4]).is_ok());
    assert!(GrayFrame::from_raw(dims(2, 2), vec![0; 12]).is_err());
}

#[test]
fn luma_endpoints() {
    assert_eq!(luma(0, 0, 0), 0);
    assert_eq!(luma(255, 255, 255), 255);
    assert!(luma(0, 255, 0) > luma(255, 0, 0));
    assert!(luma(255, 0, 0) > luma(0, 0, 255));
}

#[test]
fn rgb_to_gray_replicated_channels_is_identity() {
    let d = dims(3, 1);
    let src = RgbFrame::from_raw(d, vec![10, 10, 10, 128, 128, 128, 250, 250, 250]).unwrap();
    let mut dst = GrayFrame::new(d);
    rgb_to_gray(&src, &mut dst).unwrap();
    assert_eq!(dst.as_bytes(), &[10, 128, 250]);
}

#[test]
fn copy_from_rejects_mismatched_dims() {
    let mut a = RgbFrame::new(dims(2, 2));
    let b = RgbFrame::new(dims(3, 2));
    assert!(a.copy_from(&b).is_err());
}

#[test]
fn mask_counts() {
    let mut m = GrayFrame::new(dims(4, 1));
    assert!(!m.any_set());
    m.as_bytes_mut()[2] = MASK_ON;
    assert!(m.any_set());
    assert_eq!(m.count_set(), 1);
    assert_eq!(m.get(2, 0), MASK_ON);
    m.clear();
    assert_eq!(m.count_set(), 0);
}
