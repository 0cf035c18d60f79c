use crate::error;
use crate::io;
use crate::io::Vec;

/// A sliding-window output buffer: a ring of the most recent `dict_size`
/// bytes, plus the total count of bytes ever emitted.
///
/// Every byte is forwarded to a `Write` sink as soon as it is produced
/// (output is emitted eagerly, one instruction at a time), so callers pass
/// the sink in on each append rather than the buffer owning it.
pub struct LzCircularBuffer {
    buf: Vec<u8>,
    dict_size: usize,
    cursor: usize,
    len: usize,
    is_full: bool,
}

impl LzCircularBuffer {
    pub fn new(dict_size: usize) -> Self {
        let mut buf = Vec::with_capacity(dict_size);
        buf.resize(dict_size, 0u8);
        Self {
            buf,
            dict_size,
            cursor: 0,
            len: 0,
            is_full: false,
        }
    }

    /// Total number of bytes emitted so far (`TotalPos`).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True iff the byte `dist` steps back from the cursor (1-based: `dist
    /// == 1` is the most recent byte) has actually been produced and is
    /// still held in the ring.
    fn check_distance(&self, dist: usize) -> bool {
        dist >= 1 && dist <= self.len.min(self.dict_size)
    }

    fn get(&self, dist: usize) -> u8 {
        let offset = if dist <= self.cursor {
            self.cursor - dist
        } else {
            self.dict_size - dist + self.cursor
        };
        self.buf[offset]
    }

    fn put(&mut self, byte: u8) {
        self.buf[self.cursor] = byte;
        self.cursor += 1;
        self.len += 1;
        if self.cursor == self.dict_size {
            self.cursor = 0;
            self.is_full = true;
        }
    }

    /// The most recently emitted byte, or `lit` if nothing has been emitted
    /// yet.
    pub fn last_or(&self, lit: u8) -> u8 {
        if self.is_empty() {
            lit
        } else {
            self.get(1)
        }
    }

    /// The byte emitted `dist` steps back from the most recent one.
    /// Errors if `dist` is not reconstructible from the window.
    pub fn last_n(&self, dist: usize) -> error::Result<u8> {
        if !self.check_distance(dist) {
            return Err(error::lzma::LzmaError::DistanceTooLarge {
                distance: dist,
                window_len: self.len,
            }
            .into());
        }
        Ok(self.get(dist))
    }

    /// Appends a single decoded literal byte.
    pub fn append_literal<W: io::Write>(&mut self, writer: &mut W, lit: u8) -> error::Result<()> {
        self.put(lit);
        writer.write_all(&[lit]).map_err(error::Error::IoError)?;
        Ok(())
    }

    /// Appends `len` bytes copied from `dist` bytes back in the window.
    ///
    /// Copies byte-by-byte, not with a block copy: `dist < len` is legal
    /// (the LZ77 overlap case) and each newly-written byte must become
    /// visible to subsequent reads within the same call.
    pub fn append_lz<W: io::Write>(
        &mut self,
        writer: &mut W,
        len: usize,
        dist: usize,
    ) -> error::Result<()> {
        if !self.check_distance(dist) {
            return Err(error::lzma::LzmaError::DistanceTooLarge {
                distance: dist,
                window_len: self.len,
            }
            .into());
        }
        for _ in 0..len {
            let byte = self.get(dist);
            self.put(byte);
            writer.write_all(&[byte]).map_err(error::Error::IoError)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_buffer_is_empty() {
        let buf = LzCircularBuffer::new(16);
        assert!(buf.is_empty());
        assert_eq!(buf.len(), 0);
        assert_eq!(buf.last_or(0x42), 0x42);
    }

    #[test]
    fn last_n_rejects_distance_zero_and_out_of_range() {
        let mut buf = LzCircularBuffer::new(16);
        let mut sink = Vec::new();
        buf.append_literal(&mut sink, b'a').unwrap();
        assert!(buf.last_n(0).is_err());
        assert!(buf.last_n(2).is_err());
        assert_eq!(buf.last_n(1).unwrap(), b'a');
    }

    #[test]
    fn append_literal_tracks_len_and_forwards_to_the_sink() {
        let mut buf = LzCircularBuffer::new(16);
        let mut sink = Vec::new();
        buf.append_literal(&mut sink, b'x').unwrap();
        buf.append_literal(&mut sink, b'y').unwrap();
        assert_eq!(buf.len(), 2);
        assert_eq!(sink, b"xy");
        assert_eq!(buf.last_or(0), b'y');
    }

    #[test]
    fn append_lz_handles_overlapping_copy_as_run_length_repeat() {
        // dist == 1, len == 4 after a single 'a': classic LZ77 overlap,
        // each newly written byte must become visible to the next read
        // within the same call.
        let mut buf = LzCircularBuffer::new(16);
        let mut sink = Vec::new();
        buf.append_literal(&mut sink, b'a').unwrap();
        buf.append_lz(&mut sink, 4, 1).unwrap();
        assert_eq!(sink, b"aaaaa");
        assert_eq!(buf.len(), 5);
    }

    #[test]
    fn append_lz_copies_a_non_overlapping_span() {
        let mut buf = LzCircularBuffer::new(16);
        let mut sink = Vec::new();
        for &b in b"abc" {
            buf.append_literal(&mut sink, b).unwrap();
        }
        buf.append_lz(&mut sink, 3, 3).unwrap();
        assert_eq!(sink, b"abcabc");
    }

    #[test]
    fn append_lz_rejects_a_distance_beyond_the_window() {
        let mut buf = LzCircularBuffer::new(16);
        let mut sink = Vec::new();
        buf.append_literal(&mut sink, b'a').unwrap();
        assert!(buf.append_lz(&mut sink, 1, 2).is_err());
    }

    #[test]
    fn check_distance_is_bounded_by_dict_size_once_the_window_wraps() {
        let mut buf = LzCircularBuffer::new(4);
        let mut sink = Vec::new();
        for &b in b"abcdef" {
            buf.append_literal(&mut sink, b).unwrap();
        }
        // 6 bytes written into a 4-byte ring: only the last 4 ('c','d','e','f')
        // are still reconstructible.
        assert_eq!(buf.last_n(1).unwrap(), b'f');
        assert_eq!(buf.last_n(4).unwrap(), b'c');
        assert!(buf.last_n(5).is_err());
    }
}
