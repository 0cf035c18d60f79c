//! Configuration surface for a decode call.

/// How to interpret (or whether to even read) the 8-byte unpacked-size
/// field of the classic 13-byte LZMA header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpackedSize {
    /// Trust the header's 8-byte field verbatim. `u64::MAX` means
    /// "undefined", in which case the end-of-stream marker becomes
    /// mandatory.
    ReadFromHeader,
    /// Consume the header's 8 bytes (so the input cursor advances
    /// correctly) but use the caller-supplied value instead of what was
    /// read. Useful when the size is known out-of-band but the stream
    /// still carries a (possibly untrustworthy) header field.
    ReadHeaderButUseProvided(Option<u64>),
    /// The stream carries no unpacked-size field at all; nothing is read
    /// from input for it.
    UseProvided(Option<u64>),
}

/// Options controlling how a stream's header is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub unpacked_size: UnpackedSize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            unpacked_size: UnpackedSize::ReadFromHeader,
        }
    }
}

/// The two ways a decode can finish successfully. Failures are reported as
/// `Err(Error)` instead of a third variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStatus {
    /// The end-of-stream marker was decoded and the range decoder finished
    /// in a clean state.
    FinishedWithMarker,
    /// The declared `unpackedSize` was reached without an end marker, and
    /// the range decoder finished in a clean state.
    FinishedWithoutMarker,
}
