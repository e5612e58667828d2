use super::*;

#[test]
fn part_envelope_wraps_payload() {
    let mut out = Vec::new();
    write_multipart_part(&mut out, &[1, 2, 3]).unwrap();
    let mut expected = b"--frame\r\nContent-Type: image/jpeg\r\n\r\n".to_vec();
    expected.extend_from_slice(&[1, 2, 3]);
    expected.extend_from_slice(b"\r\n");
    assert_eq!(out, expected);
}

#[test]
fn content_type_names_boundary() {
    assert_eq!(
        stream_content_type(),
        "multipart/x-mixed-replace; boundary=frame"
    );
}
