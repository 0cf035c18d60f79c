use crate::decode::util;
use crate::error;
use crate::io;
use byteorder::BigEndian;
use io::ReadBytesExt;

/// Adaptive binary arithmetic decoder.
///
/// Drives a `[0, Range)` window narrowed by per-context probabilities; see
/// the module-level documentation in `lzma.rs` for the packet grammar it
/// serves.
pub struct RangeDecoder<'a, R>
where
    R: 'a + io::BufRead,
{
    pub stream: &'a mut R,
    pub range: u32,
    pub code: u32,
}

impl<'a, R> RangeDecoder<'a, R>
where
    R: io::BufRead,
{
    /// Reads the 5-byte range-coder preamble and initializes `range`/`code`.
    ///
    /// The leading byte must be zero; a nonzero leading byte (or an
    /// immediate `code == range`) means the stream is corrupted before a
    /// single bit has been decoded, so this fails fast instead of limping
    /// forward.
    pub fn new(stream: &'a mut R) -> error::Result<Self> {
        let mut dec = Self {
            stream,
            range: 0xFFFF_FFFF,
            code: 0,
        };
        let first = dec.stream.read_u8().map_err(error::Error::IoError)?;
        dec.code = dec
            .stream
            .read_u32::<BigEndian>()
            .map_err(error::Error::IoError)?;
        lzma_debug!("0 {{ range: {:08x}, code: {:08x} }}", dec.range, dec.code);
        if first != 0 || dec.code == dec.range {
            return Err(error::lzma::LzmaError::CorruptedStream.into());
        }
        Ok(dec)
    }

    #[inline]
    pub fn is_finished_ok(&mut self) -> io::Result<bool> {
        Ok(self.code == 0 && self.is_eof()?)
    }

    #[inline]
    pub fn is_eof(&mut self) -> io::Result<bool> {
        util::is_eof(self.stream)
    }

    #[inline]
    fn normalize(&mut self) -> io::Result<()> {
        lzma_trace!("  {{ range: {:08x}, code: {:08x} }}", self.range, self.code);
        if self.range < 0x0100_0000 {
            self.range <<= 8;
            self.code = (self.code << 8) | (self.stream.read_u8()? as u32);
            lzma_debug!("+ {{ range: {:08x}, code: {:08x} }}", self.range, self.code);
        }
        Ok(())
    }

    /// Decodes one fixed (0.5-probability) bit, returning 0 or 1.
    #[inline]
    fn get_direct_bit(&mut self) -> io::Result<u32> {
        self.range >>= 1;
        self.code = self.code.wrapping_sub(self.range);
        // Branch-free sign extraction: `t` is all-ones if the subtraction
        // went negative (bit == 0), all-zeros otherwise (bit == 1).
        let t = 0u32.wrapping_sub(self.code >> 31);
        self.code = self.code.wrapping_add(self.range & t);
        self.normalize()?;
        Ok(t.wrapping_add(1))
    }

    /// Decodes `num_bits` fixed-probability bits, MSB-first.
    pub fn decode_direct_bits(&mut self, num_bits: usize) -> io::Result<u32> {
        let mut result = 0u32;
        for _ in 0..num_bits {
            result = (result << 1).wrapping_add(self.get_direct_bit()?);
        }
        Ok(result)
    }

    /// Decodes one adaptive bit against `prob`, updating it in place.
    #[inline]
    pub fn decode_bit(&mut self, prob: &mut u16) -> io::Result<bool> {
        let bound: u32 = (self.range >> 11) * (*prob as u32);

        lzma_trace!(
            " bound: {:08x}, prob: {:04x}, bit: {}",
            bound,
            prob,
            (self.code >= bound) as u8
        );
        if self.code < bound {
            *prob += (0x800_u16 - *prob) >> 5;
            self.range = bound;
            self.normalize()?;
            Ok(false)
        } else {
            *prob -= *prob >> 5;
            self.code -= bound;
            self.range -= bound;
            self.normalize()?;
            Ok(true)
        }
    }

    fn parse_bit_tree(&mut self, num_bits: usize, probs: &mut [u16]) -> io::Result<u32> {
        let mut m: u32 = 1;
        for _ in 0..num_bits {
            let bit = self.decode_bit(&mut probs[m as usize])?;
            m = (m << 1) | (bit as u32);
        }
        Ok(m - (1 << num_bits))
    }

    pub(crate) fn parse_reverse_bit_tree(
        &mut self,
        num_bits: usize,
        probs: &mut [u16],
        offset: usize,
    ) -> io::Result<u32> {
        let mut m: usize = 1;
        let mut result = 0u32;
        for i in 0..num_bits {
            let bit = self.decode_bit(&mut probs[offset + m])?;
            m = (m << 1) | (bit as usize);
            result |= (bit as u32) << i;
        }
        Ok(result)
    }
}

/// A balanced binary tree of `2^NUM_BITS` probabilities, decoded either
/// MSB-first (`parse`) or LSB-first (`parse_reverse`).
#[derive(Clone)]
pub struct BitTree<const NUM_BITS: usize> {
    probs: [u16; 1 << NUM_BITS],
}

impl<const NUM_BITS: usize> Default for BitTree<NUM_BITS> {
    fn default() -> Self {
        Self {
            probs: [0x400; 1 << NUM_BITS],
        }
    }
}

impl<const NUM_BITS: usize> BitTree<NUM_BITS> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.probs = [0x400; 1 << NUM_BITS];
    }

    pub fn parse<R: io::BufRead>(&mut self, rc: &mut RangeDecoder<R>) -> io::Result<u32> {
        rc.parse_bit_tree(NUM_BITS, &mut self.probs)
    }

    pub fn parse_reverse<R: io::BufRead>(&mut self, rc: &mut RangeDecoder<R>) -> io::Result<u32> {
        rc.parse_reverse_bit_tree(NUM_BITS, &mut self.probs, 0)
    }
}

/// Decodes match lengths in [0, 271]: a short/mid/long three-way choice
/// backed by independent bit trees per `posState`.
#[derive(Clone)]
pub struct LenDecoder {
    choice: u16,
    choice2: u16,
    low_coder: [BitTree<3>; 16],
    mid_coder: [BitTree<3>; 16],
    high_coder: BitTree<8>,
}

impl Default for LenDecoder {
    fn default() -> Self {
        Self {
            choice: 0x400,
            choice2: 0x400,
            low_coder: Default::default(),
            mid_coder: Default::default(),
            high_coder: Default::default(),
        }
    }
}

impl LenDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn decode<R: io::BufRead>(
        &mut self,
        rc: &mut RangeDecoder<R>,
        pos_state: usize,
    ) -> io::Result<usize> {
        if !rc.decode_bit(&mut self.choice)? {
            Ok(self.low_coder[pos_state].parse(rc)? as usize)
        } else if !rc.decode_bit(&mut self.choice2)? {
            Ok(self.mid_coder[pos_state].parse(rc)? as usize + 8)
        } else {
            Ok(self.high_coder.parse(rc)? as usize + 16)
        }
    }
}
