//! Magicblock: a self-describing binary container in Rust.
//!
//! Every block is a fixed 24-byte little-endian header followed by optional
//! side-data and the transformed payload. The header names the transform:
//! raw copy, AES-256-CBC, zlib DEFLATE, LZMA, or compress-then-encrypt.
//!
//! The crate provides:
//! - Header layout and validation (`format`)
//! - The transform primitives and combinators (`transform`)
//! - Whole-buffer encode/decode (`codec`)
//! - The `MagicBlock` container value (`container`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use magicblock::{CipherKey, MagicBlock, Mode};
//!
//! let key = CipherKey::new([7u8; 32], [9u8; 16]);
//! let payload = b"the same words, over and over, the same words".repeat(20);
//!
//! let block = MagicBlock::encode(&payload, Mode::DeflateCipher, 6, Some(&key)).unwrap();
//! assert!(block.as_bytes().len() < payload.len());
//!
//! let decoded = MagicBlock::decode(block.as_bytes(), Some(&key)).unwrap();
//! assert_eq!(decoded.payload(), &payload[..]);
//! ```

pub mod codec;
pub mod container;
pub mod error;
pub mod format;
pub mod io;
pub mod transform;

#[cfg(feature = "cli")]
pub mod cli;

pub use codec::{EncodeOptions, decode_all, encode_all};
pub use container::MagicBlock;
pub use error::{Error, Result};
pub use format::{Header, Mode};
pub use transform::CipherKey;
