use super::*;

fn frame(v: u8) -> RgbFrame {
    RgbFrame::from_raw(Dimensions::new(2, 2).unwrap(), vec![v; 12]).unwrap()
}

#[test]
fn parse_ff_ratio_handles_rationals() {
    assert_eq!(parse_ff_ratio("30/1"), Some(30.0));
    assert!((parse_ff_ratio("30000/1001").unwrap() - 29.97).abs() < 0.01);
    assert_eq!(parse_ff_ratio("0/0"), None);
    assert_eq!(parse_ff_ratio("abc"), None);
}

#[test]
fn source_info_normalizes_fps_and_total() {
    let d = Dimensions::new(2, 2).unwrap();
    let info = SourceInfo::new(d, 0.0, Some(0));
    assert_eq!(info.fps, 30.0);
    assert_eq!(info.total_frames, None);
}

#[test]
fn in_memory_source_serves_frames_in_order_then_ends() {
    let mut src = InMemorySource::new(25.0, vec![frame(1), frame(2)]).unwrap();
    assert_eq!(src.info().total_frames, Some(2));
    let mut buf = RgbFrame::new(src.info().dims);
    assert!(src.read_frame(&mut buf).unwrap());
    assert_eq!(buf.as_bytes()[0], 1);
    assert!(src.read_frame(&mut buf).unwrap());
    assert_eq!(buf.as_bytes()[0], 2);
    assert!(!src.read_frame(&mut buf).unwrap());
    assert_eq!(src.remaining(), 0);
}

#[test]
fn in_memory_source_rejects_empty_and_mixed_sizes() {
    assert!(InMemorySource::new(30.0, vec![]).unwrap_err().is_source_open());
    let other = RgbFrame::new(Dimensions::new(3, 2).unwrap());
    assert!(InMemorySource::new(30.0, vec![frame(0), other]).is_err());
}

#[test]
fn opening_a_missing_file_is_a_source_open_error() {
    let err = FfmpegSource::open("definitely/not/here.mp4").unwrap_err();
    assert!(err.is_source_open());
}

#[cfg(unix)]
fn scripted_decoder(script: &str) -> FfmpegSource {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(script);
    let info = SourceInfo::new(Dimensions::new(2, 2).unwrap(), 30.0, None);
    FfmpegSource::spawn_decoder(Path::new("clip.mp4"), info, cmd).unwrap()
}

/// Read until the stream ends or fails, collecting every result.
#[cfg(unix)]
fn read_all(src: &mut FfmpegSource) -> Vec<NoiseResult<bool>> {
    let mut buf = RgbFrame::new(src.info().dims);
    let mut out = Vec::new();
    for _ in 0..8 {
        let r = src.read_frame(&mut buf);
        let done = !matches!(r, Ok(true));
        out.push(r);
        if done {
            break;
        }
    }
    out
}

#[cfg(unix)]
#[test]
fn decoder_clean_exit_ends_stream() {
    let mut src = scripted_decoder("head -c 24 /dev/zero");
    let results = read_all(&mut src);
    assert_eq!(results.len(), 3);
    assert!(matches!(results[0], Ok(true)));
    assert!(matches!(results[1], Ok(true)));
    assert!(matches!(results[2], Ok(false)));

    let mut buf = RgbFrame::new(src.info().dims);
    assert!(!src.read_frame(&mut buf).unwrap());
}

#[cfg(unix)]
#[test]
fn decoder_failure_on_frame_boundary_is_a_render_error() {
    let mut src = scripted_decoder("head -c 12 /dev/zero; exit 1");
    let results = read_all(&mut src);
    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Ok(true)));
    assert!(matches!(results[1], Err(NoiseError::Render(_))));
}

#[cfg(unix)]
#[test]
fn decoder_failure_carries_stderr() {
    let mut src = scripted_decoder("echo 'moov atom not found' >&2; exit 3");
    let mut buf = RgbFrame::new(src.info().dims);
    let err = src.read_frame(&mut buf).unwrap_err();
    assert!(matches!(err, NoiseError::Render(_)));
    assert!(err.to_string().contains("moov atom not found"), "{err}");
}

#[cfg(unix)]
#[test]
fn short_final_frame_is_a_render_error() {
    let mut src = scripted_decoder("head -c 18 /dev/zero");
    let results = read_all(&mut src);
    assert_eq!(results.len(), 2);
    assert!(matches!(results[0], Ok(true)));
    let err = results[1].as_ref().unwrap_err();
    assert!(err.to_string().contains("mid-frame"), "{err}");
}

#[cfg(unix)]
#[test]
fn recoverable_decoder_warnings_do_not_fail_a_clean_exit() {
    let mut src = scripted_decoder(
        "head -c 24 /dev/zero; echo '[h264 @ 0x1] error while decoding MB 3 2' >&2; exit 0",
    );
    let results = read_all(&mut src);
    assert_eq!(results.len(), 3);
    assert!(matches!(results[1], Ok(true)));
    assert!(matches!(results[2], Ok(false)));
}
