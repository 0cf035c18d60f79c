//! Error types returned by the decoder.
//!
//! Kept dependency-free (no `thiserror`) so that `no_std` consumers of this
//! crate aren't forced to pull one in just to see why a stream failed.

use crate::io;
use core::fmt;

pub mod lzma {
    use core::fmt;

    /// Structural violations specific to the LZMA stream format, as opposed
    /// to plain I/O failures.
    #[derive(Debug)]
    #[non_exhaustive]
    pub enum LzmaError {
        /// The properties byte (`d = properties[0]`) was `>= 225`, so it
        /// cannot be decomposed into valid `lc`/`lp`/`pb` values.
        InvalidProperties { properties_byte: u8 },
        /// The range decoder's leading init byte was nonzero, or `Code ==
        /// Range` was observed where the invariant requires `Code < Range`.
        CorruptedStream,
        /// A decoded match/repeat distance referenced bytes the output
        /// window has not produced yet (or has already evicted).
        DistanceTooLarge { distance: usize, window_len: usize },
        /// A repeat packet was decoded before any byte had been written.
        RepeatFromEmptyWindow,
        /// The end-of-stream marker (`rep0 == 0xFFFF_FFFF`) was decoded but
        /// the range decoder was not in a clean finished state.
        EndMarkerWithDirtyRangeDecoder,
        /// A literal or match packet was decoded after the declared
        /// `unpacked_size` had already been reached.
        OutputExceedsUnpackedSize,
        /// The stream finished (by size or by marker) but emitted a
        /// different number of bytes than the header declared.
        UnpackedSizeMismatch { expected: u64, actual: u64 },
    }

    impl fmt::Display for LzmaError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                LzmaError::InvalidProperties { properties_byte } => write!(
                    f,
                    "invalid LZMA properties byte: {} (must be < 225)",
                    properties_byte
                ),
                LzmaError::CorruptedStream => {
                    write!(f, "corrupted LZMA range-coder state")
                }
                LzmaError::DistanceTooLarge {
                    distance,
                    window_len,
                } => write!(
                    f,
                    "match distance {} exceeds available window ({} bytes produced)",
                    distance, window_len
                ),
                LzmaError::RepeatFromEmptyWindow => {
                    write!(f, "repeat packet decoded from an empty output window")
                }
                LzmaError::EndMarkerWithDirtyRangeDecoder => write!(
                    f,
                    "end-of-stream marker found but range decoder did not finish cleanly"
                ),
                LzmaError::OutputExceedsUnpackedSize => write!(
                    f,
                    "decoded output exceeds the declared unpacked size"
                ),
                LzmaError::UnpackedSizeMismatch { expected, actual } => write!(
                    f,
                    "decoded {} bytes, but header declared unpacked size {}",
                    actual, expected
                ),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for LzmaError {}
}

/// Top-level error type for this crate.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading from or writing to a stream.
    IoError(io::Error),
    /// An I/O error occurred specifically while reading the 13-byte header,
    /// before any LZMA-coded payload was touched.
    HeaderTooShort(io::Error),
    /// The LZMA stream violated one of the format's structural invariants.
    LzmaError(lzma::LzmaError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "io error: {}", e),
            Error::HeaderTooShort(e) => write!(f, "header too short: {}", e),
            Error::LzmaError(e) => write!(f, "{}", e),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::HeaderTooShort(e) => Some(e),
            Error::LzmaError(e) => Some(e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::IoError(e)
    }
}

impl From<lzma::LzmaError> for Error {
    fn from(e: lzma::LzmaError) -> Self {
        Error::LzmaError(e)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
