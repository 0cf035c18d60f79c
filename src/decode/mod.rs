pub mod lzbuffer;
pub mod lzma;
pub mod rangecoder;
mod util;
