// Whole-buffer encode/decode of magic blocks.
//
// - `encoder`: reserve header, run transform, write header
// - `decoder`: validate header, dispatch on mode, recover payload

pub mod decoder;
pub mod encoder;

pub use decoder::{decode_all, decode_with_header};
pub use encoder::{DEFAULT_LEVEL, EncodeOptions, encode_all, encode_with};
