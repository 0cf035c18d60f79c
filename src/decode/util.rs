use crate::io;

/// True if the stream has no more bytes to offer right now.
///
/// Relies on `fill_buf` returning an empty slice at end-of-stream, which is
/// the contract every `BufRead` implementation must uphold.
pub fn is_eof<R: io::BufRead>(stream: &mut R) -> io::Result<bool> {
    let buf = stream.fill_buf()?;
    Ok(buf.is_empty())
}
