use std::io::Write;

/// Multipart boundary token.
pub const BOUNDARY: &str = "frame";

/// `Content-Type` header value announcing the multipart stream.
pub fn stream_content_type() -> String {
    format!("multipart/x-mixed-replace; boundary={BOUNDARY}")
}

/// Write one JPEG as a multipart part: boundary line, part header, blank line, bytes, CRLF.
pub fn write_multipart_part<W: Write + ?Sized>(w: &mut W, jpeg: &[u8]) -> std::io::Result<()> {
    write!(w, "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\n\r\n")?;
    w.write_all(jpeg)?;
    w.write_all(b"\r\n")
}

#[cfg(test)]
#[path = "../../tests/unit/encode/mjpeg.rs"]
mod tests;
