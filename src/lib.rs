//! A reference-faithful decoder for the LZMA compressed stream format.
//!
//! This crate decodes the classic 13-byte-header LZMA stream (the format
//! produced by standalone `.lzma` files and embedded by many archive
//! formats) back into the original bytes. It does not encode, and it does
//! not understand the `.xz` container, `.7z` archives, or LZMA2 chunk
//! framing.
//!
//! # Example
//!
//! ```no_run
//! use std::io::Cursor;
//!
//! let compressed: Vec<u8> = std::fs::read("compressed.lzma").unwrap();
//! let decompressed = lzma_decoder::decompress(&compressed).unwrap();
//! ```
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[macro_use]
mod macros;

pub mod decode;
pub mod decompress;
pub mod error;
mod io;

use decode::lzma::{DecoderState, LzmaParams};
use decode::rangecoder::RangeDecoder;
use decompress::{DecodeStatus, Options};
use io::Vec;

/// Decodes an LZMA stream from `input`, writing the decompressed bytes to
/// `output` as they are produced.
///
/// `input` must start at the 13-byte header; `options` controls how the
/// header's unpacked-size field is interpreted (see [`decompress::Options`]).
/// Runs the whole stream to completion in this one call; there is no
/// chunked or resumable variant.
pub fn lzma_decompress_with_options<R: io::BufRead, W: io::Write>(
    input: &mut R,
    output: &mut W,
    options: &Options,
) -> error::Result<DecodeStatus> {
    let params = LzmaParams::read_header(input, options)?;
    let expected = params.unpacked_size;

    let mut rc = RangeDecoder::new(input)?;
    let mut state = DecoderState::new(params);
    let status = state.decode(&mut rc, output)?;

    if let Some(expected) = expected {
        let actual = state.output_len() as u64;
        if actual != expected {
            return Err(error::lzma::LzmaError::UnpackedSizeMismatch { expected, actual }.into());
        }
    }

    Ok(status)
}

/// Decodes an LZMA stream from `input`, trusting the header's own
/// unpacked-size field (the common case).
pub fn lzma_decompress<R: io::BufRead, W: io::Write>(
    input: &mut R,
    output: &mut W,
) -> error::Result<DecodeStatus> {
    lzma_decompress_with_options(input, output, &Options::default())
}

/// Convenience entry point: decodes an in-memory LZMA-framed buffer
/// (header + payload) and returns the decompressed bytes.
pub fn decompress(data: &[u8]) -> error::Result<Vec<u8>> {
    let mut input = io::Cursor::new(data);
    let mut output = Vec::new();
    lzma_decompress(&mut input, &mut output)?;
    Ok(output)
}
