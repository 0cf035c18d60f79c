//! Thin indirection over the I/O traits we build on, so the rest of the
//! crate can stay agnostic to whether `std` is available.

#[cfg(feature = "std")]
pub use byteorder::ReadBytesExt;
#[cfg(feature = "std")]
pub use std::io::{BufRead, Cursor, Error, ErrorKind, Read, Result, Write};
#[cfg(feature = "std")]
pub use std::vec::Vec;

#[cfg(not(feature = "std"))]
pub use byteorder::ReadBytesExt;
#[cfg(not(feature = "std"))]
pub use core2::io::{BufRead, Cursor, Error, ErrorKind, Read, Result, Write};
#[cfg(not(feature = "std"))]
pub use alloc::vec::Vec;
