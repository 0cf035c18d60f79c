//! Internal tracing macros used throughout the decoder.
//!
//! Three tiers, from coarsest to noisiest: `lzma_info!` (once per stream,
//! parsed header fields), `lzma_debug!` (once per input byte consumed by the
//! range coder) and `lzma_trace!` (once per decoded bit). All three compile
//! to nothing unless the `enable_logging` feature pulls in the `log` crate,
//! so a release build without the feature pays nothing for them.

#[cfg(feature = "enable_logging")]
#[macro_export]
macro_rules! lzma_info {
    ($($arg:tt)*) => (log::info!($($arg)*));
}

#[cfg(not(feature = "enable_logging"))]
#[macro_export]
macro_rules! lzma_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "enable_logging")]
#[macro_export]
macro_rules! lzma_debug {
    ($($arg:tt)*) => (log::debug!($($arg)*));
}

#[cfg(not(feature = "enable_logging"))]
#[macro_export]
macro_rules! lzma_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "enable_logging")]
#[macro_export]
macro_rules! lzma_trace {
    ($($arg:tt)*) => (log::trace!($($arg)*));
}

#[cfg(not(feature = "enable_logging"))]
#[macro_export]
macro_rules! lzma_trace {
    ($($arg:tt)*) => {};
}
