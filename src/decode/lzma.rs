use crate::decode::lzbuffer::LzCircularBuffer;
use crate::decode::rangecoder::{BitTree, LenDecoder, RangeDecoder};
use crate::decompress::{DecodeStatus, Options, UnpackedSize};
use crate::error;
use crate::io;
use crate::io::Vec;
use byteorder::LittleEndian;
use io::ReadBytesExt;

/// Minimum length added to every decoded match/repeat length.
const MATCH_MIN_LEN: usize = 2;
/// Number of packet-type states.
const NUM_STATES: usize = 12;
/// Number of `len`-derived buckets feeding the position-slot decoders.
const NUM_LEN_TO_POS_STATES: usize = 4;
/// `posState`/`IsMatch` stride: always 4 bits wide regardless of the
/// stream's actual `pb`, matching the reference decoder's fixed table
/// layout.
const NUM_POS_BITS_MAX: usize = 4;
/// First position slot whose distance needs more than a plain bit tree.
const START_POS_MODEL_INDEX: usize = 4;
/// First position slot decoded with direct bits + align decoder.
const END_POS_MODEL_INDEX: usize = 14;
/// `1 << (END_POS_MODEL_INDEX >> 1)`: highest distance needing the
/// mid-range `PosDecoders` refinement table.
const NUM_FULL_DISTANCES: usize = 1 << (END_POS_MODEL_INDEX >> 1);

/// Decoded and validated stream parameters.
#[derive(Clone)]
pub struct LzmaParams {
    /// Literal context bits, 0..=8.
    pub lc: u32,
    /// Literal position bits, 0..=4.
    pub lp: u32,
    /// Position bits, 0..=4.
    pub pb: u32,
    pub dict_size: u32,
    pub unpacked_size: Option<u64>,
}

impl LzmaParams {
    /// Reads the classic 13-byte LZMA header: a properties byte, a 4-byte
    /// little-endian dictionary size, and an 8-byte little-endian unpacked
    /// size (interpreted according to `options.unpacked_size`).
    pub fn read_header<R: io::BufRead>(
        input: &mut R,
        options: &Options,
    ) -> error::Result<LzmaParams> {
        let props = input.read_u8().map_err(error::Error::HeaderTooShort)?;
        if props as u32 >= 9 * 5 * 5 {
            return Err(error::lzma::LzmaError::InvalidProperties {
                properties_byte: props,
            }
            .into());
        }
        let mut d = props as u32;
        let lc = d % 9;
        d /= 9;
        let lp = d % 5;
        let pb = d / 5;

        lzma_info!("Properties {{ lc: {}, lp: {}, pb: {} }}", lc, lp, pb);

        let dict_size_provided = input
            .read_u32::<LittleEndian>()
            .map_err(error::Error::HeaderTooShort)?;
        let dict_size = dict_size_provided.max(0x1000);

        lzma_info!("Dict size: {}", dict_size);

        let unpacked_size = match options.unpacked_size {
            UnpackedSize::ReadFromHeader => {
                let size = input
                    .read_u64::<LittleEndian>()
                    .map_err(error::Error::HeaderTooShort)?;
                if size == 0xFFFF_FFFF_FFFF_FFFF {
                    None
                } else {
                    Some(size)
                }
            }
            UnpackedSize::ReadHeaderButUseProvided(x) => {
                input
                    .read_u64::<LittleEndian>()
                    .map_err(error::Error::HeaderTooShort)?;
                x
            }
            UnpackedSize::UseProvided(x) => x,
        };

        lzma_info!("Unpacked size: {:?}", unpacked_size);

        Ok(LzmaParams {
            lc,
            lp,
            pb,
            dict_size,
            unpacked_size,
        })
    }
}

/// Owns every probability table and the packet-type state machine driving
/// one LZMA stream from start to finish. Construct with `new` from parsed
/// [`LzmaParams`], then call [`DecoderState::decode`] exactly once to run
/// the stream to completion.
pub struct DecoderState {
    params: LzmaParams,
    output: LzCircularBuffer,
    // 0x300 probabilities per literal-context slice; `lit_probs.len() ==
    // 0x300 << (lc + lp)`.
    lit_probs: Vec<u16>,
    pos_slot_decoder: [BitTree<6>; NUM_LEN_TO_POS_STATES],
    align_decoder: BitTree<4>,
    pos_decoders: [u16; 1 + NUM_FULL_DISTANCES - END_POS_MODEL_INDEX],
    is_match: [u16; NUM_STATES << NUM_POS_BITS_MAX],
    is_rep: [u16; NUM_STATES],
    is_rep_g0: [u16; NUM_STATES],
    is_rep_g1: [u16; NUM_STATES],
    is_rep_g2: [u16; NUM_STATES],
    is_rep_0long: [u16; NUM_STATES << NUM_POS_BITS_MAX],
    state: usize,
    // Most-recently-used match distances, zero-based, rep[0] most recent.
    rep: [usize; 4],
    len_decoder: LenDecoder,
    rep_len_decoder: LenDecoder,
}

impl DecoderState {
    pub fn new(params: LzmaParams) -> Self {
        let lit_probs_len = 0x300usize << (params.lc + params.lp);
        let mut lit_probs = Vec::with_capacity(lit_probs_len);
        lit_probs.resize(lit_probs_len, 0x400u16);

        Self {
            output: LzCircularBuffer::new(params.dict_size as usize),
            params,
            lit_probs,
            pos_slot_decoder: Default::default(),
            align_decoder: BitTree::new(),
            pos_decoders: [0x400; 1 + NUM_FULL_DISTANCES - END_POS_MODEL_INDEX],
            is_match: [0x400; NUM_STATES << NUM_POS_BITS_MAX],
            is_rep: [0x400; NUM_STATES],
            is_rep_g0: [0x400; NUM_STATES],
            is_rep_g1: [0x400; NUM_STATES],
            is_rep_g2: [0x400; NUM_STATES],
            is_rep_0long: [0x400; NUM_STATES << NUM_POS_BITS_MAX],
            state: 0,
            rep: [0; 4],
            len_decoder: LenDecoder::new(),
            rep_len_decoder: LenDecoder::new(),
        }
    }

    /// Total number of bytes written to the output sink so far.
    pub fn output_len(&self) -> usize {
        self.output.len()
    }

    /// Runs the packet-type state machine to completion against `rc`,
    /// writing decoded bytes to `output` as they are produced.
    pub fn decode<R: io::BufRead, W: io::Write>(
        &mut self,
        rc: &mut RangeDecoder<R>,
        output: &mut W,
    ) -> error::Result<DecodeStatus> {
        loop {
            let remaining = self
                .params
                .unpacked_size
                .map(|target| target.saturating_sub(self.output.len() as u64));

            if remaining == Some(0) {
                return Ok(DecodeStatus::FinishedWithoutMarker);
            }

            let pos_state = self.output.len() & ((1 << self.params.pb) - 1);

            if !rc.decode_bit(&mut self.is_match[(self.state << NUM_POS_BITS_MAX) + pos_state])? {
                if remaining == Some(0) {
                    return Err(error::lzma::LzmaError::OutputExceedsUnpackedSize.into());
                }
                let byte = self.decode_literal(rc)?;
                lzma_debug!("Literal: {:02x}", byte);
                self.output.append_literal(output, byte)?;
                self.state = next_state_literal(self.state);
                continue;
            }

            let len: usize;

            if rc.decode_bit(&mut self.is_rep[self.state])? {
                if remaining == Some(0) {
                    return Err(error::lzma::LzmaError::OutputExceedsUnpackedSize.into());
                }
                if self.output.is_empty() {
                    return Err(error::lzma::LzmaError::RepeatFromEmptyWindow.into());
                }
                if !rc.decode_bit(&mut self.is_rep_g0[self.state])? {
                    if !rc.decode_bit(
                        &mut self.is_rep_0long[(self.state << NUM_POS_BITS_MAX) + pos_state],
                    )? {
                        // ShortRep: a single byte, no length decoded.
                        self.state = next_state_short_rep(self.state);
                        let byte = self.output.last_n(self.rep[0] + 1)?;
                        self.output.append_literal(output, byte)?;
                        continue;
                    }
                } else {
                    let dist;
                    if !rc.decode_bit(&mut self.is_rep_g1[self.state])? {
                        dist = self.rep[1];
                    } else if !rc.decode_bit(&mut self.is_rep_g2[self.state])? {
                        dist = self.rep[2];
                        self.rep[2] = self.rep[1];
                    } else {
                        dist = self.rep[3];
                        self.rep[3] = self.rep[2];
                        self.rep[2] = self.rep[1];
                    }
                    self.rep[1] = self.rep[0];
                    self.rep[0] = dist;
                }
                len = self.rep_len_decoder.decode(rc, pos_state)?;
                self.state = next_state_rep(self.state);
            } else {
                self.rep[3] = self.rep[2];
                self.rep[2] = self.rep[1];
                self.rep[1] = self.rep[0];

                len = self.len_decoder.decode(rc, pos_state)?;
                self.state = next_state_match(self.state);
                self.rep[0] = self.decode_distance(rc, len)?;

                if self.rep[0] == 0xFFFF_FFFF {
                    return if rc.is_finished_ok()? {
                        Ok(DecodeStatus::FinishedWithMarker)
                    } else {
                        Err(error::lzma::LzmaError::EndMarkerWithDirtyRangeDecoder.into())
                    };
                }

                if remaining == Some(0) {
                    return Err(error::lzma::LzmaError::OutputExceedsUnpackedSize.into());
                }
            }

            let len = len + MATCH_MIN_LEN;
            let dist = self.rep[0] + 1;

            if let Some(remaining) = remaining {
                if remaining < len as u64 {
                    // Truncate to the declared size, emit the partial tail,
                    // then report the overrun: matches the reference
                    // decoder's behavior of surfacing a truncated-but-valid
                    // prefix alongside the failure.
                    self.output.append_lz(output, remaining as usize, dist)?;
                    return Err(error::lzma::LzmaError::OutputExceedsUnpackedSize.into());
                }
            }
            self.output.append_lz(output, len, dist)?;
        }
    }

    fn decode_literal<R: io::BufRead>(&mut self, rc: &mut RangeDecoder<R>) -> error::Result<u8> {
        let prev_byte = self.output.last_or(0) as usize;

        let lit_state = ((self.output.len() & ((1 << self.params.lp) - 1)) << self.params.lc)
            + (prev_byte >> (8 - self.params.lc));
        let probs = &mut self.lit_probs[lit_state * 0x300..lit_state * 0x300 + 0x300];

        let mut symbol: usize = 1;
        if self.state >= 7 {
            let mut match_byte = self.output.last_n(self.rep[0] + 1)? as usize;
            while symbol < 0x100 {
                let match_bit = (match_byte >> 7) & 1;
                match_byte <<= 1;
                let bit = rc.decode_bit(&mut probs[((1 + match_bit) << 8) + symbol])? as usize;
                symbol = (symbol << 1) | bit;
                if match_bit != bit {
                    break;
                }
            }
        }
        while symbol < 0x100 {
            symbol = (symbol << 1) | (rc.decode_bit(&mut probs[symbol])? as usize);
        }
        Ok((symbol - 0x100) as u8)
    }

    fn decode_distance<R: io::BufRead>(
        &mut self,
        rc: &mut RangeDecoder<R>,
        len: usize,
    ) -> error::Result<usize> {
        let len_state = len.min(NUM_LEN_TO_POS_STATES - 1);

        let pos_slot = self.pos_slot_decoder[len_state].parse(rc)? as usize;
        if pos_slot < START_POS_MODEL_INDEX {
            return Ok(pos_slot);
        }

        let num_direct_bits = (pos_slot >> 1) - 1;
        let mut dist = (2 | (pos_slot & 1)) << num_direct_bits;

        if pos_slot < END_POS_MODEL_INDEX {
            dist += rc.parse_reverse_bit_tree(
                num_direct_bits,
                &mut self.pos_decoders,
                dist - pos_slot,
            )? as usize;
        } else {
            dist += (rc.decode_direct_bits(num_direct_bits - 4)? as usize) << 4;
            dist += self.align_decoder.parse_reverse(rc)? as usize;
        }
        Ok(dist)
    }
}

fn next_state_literal(state: usize) -> usize {
    if state < 4 {
        0
    } else if state < 10 {
        state - 3
    } else {
        state - 6
    }
}

fn next_state_match(state: usize) -> usize {
    if state < 7 {
        7
    } else {
        10
    }
}

fn next_state_rep(state: usize) -> usize {
    if state < 7 {
        8
    } else {
        11
    }
}

fn next_state_short_rep(state: usize) -> usize {
    if state < 7 {
        9
    } else {
        11
    }
}
