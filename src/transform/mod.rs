// Payload transforms.
//
// - `raw`:      byte-for-byte copy
// - `cipher`:   AES-256-CBC with PKCS#7 padding
// - `deflate`:  zlib-wrapped DEFLATE
// - `lzma`:     LZMA with its 5-byte properties as side-data
// - `combined`: compress-then-encrypt (DeflateCipher, LzmaCipher)
//
// Every encode primitive appends `[side-data][payload]` to a caller-owned
// buffer and reports the sizes it wrote as a `TransformResult`. Decode
// primitives take the two regions back as slices and return a fresh buffer.

pub mod cipher;
pub mod combined;
pub mod deflate;
pub mod lzma;
pub mod raw;

pub use cipher::CipherKey;

use crate::error::{Error, Result};
use crate::format::header::{Header, Mode};

// ---------------------------------------------------------------------------
// TransformResult
// ---------------------------------------------------------------------------

/// Sizes produced by one encode primitive or combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformResult {
    pub mode: Mode,
    pub uncompressed_size: u32,
    pub compressed_size: u32,
    pub extra_size: u32,
}

impl TransformResult {
    /// The zero-length payload: no side-data, no payload, no transform run.
    pub fn empty(mode: Mode) -> Self {
        Self {
            mode,
            uncompressed_size: 0,
            compressed_size: 0,
            extra_size: 0,
        }
    }

    /// Header describing the blob this result was written into.
    pub fn header(&self) -> Header {
        Header {
            mode: self.mode,
            compressed_len: self.compressed_size,
            uncompressed_len: self.uncompressed_size,
            extra_len: self.extra_size,
        }
    }
}

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Capacity to reserve for the side-data and payload of `mode` over
/// `input_len` bytes. Backends may still grow the buffer past it.
pub fn output_bound(mode: Mode, input_len: usize) -> usize {
    match mode {
        Mode::Raw => input_len,
        Mode::Cipher => cipher::padded_len(input_len),
        Mode::Deflate => deflate::compress_bound(input_len),
        Mode::Lzma => lzma::compress_bound(input_len),
        Mode::DeflateCipher => combined::sealed_bound(deflate::compress_bound(input_len)),
        Mode::LzmaCipher => combined::sealed_bound(lzma::compress_bound(input_len)),
    }
}

fn require_key(mode: Mode, key: Option<&CipherKey>) -> Result<&CipherKey> {
    key.ok_or(Error::MissingKey(mode))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run the encode side of `mode`, appending side-data and payload to `out`.
pub fn encode(
    mode: Mode,
    input: &[u8],
    level: u32,
    key: Option<&CipherKey>,
    out: &mut Vec<u8>,
) -> Result<TransformResult> {
    match mode {
        Mode::Raw => raw::encode(input, out),
        Mode::Cipher => cipher::encode(input, require_key(mode, key)?, out),
        Mode::Deflate => deflate::encode(input, level, out),
        Mode::Lzma => lzma::encode(input, level, out),
        Mode::DeflateCipher | Mode::LzmaCipher => {
            combined::encode(mode, input, level, require_key(mode, key)?, out)
        }
    }
}

/// Run the decode side of `header.mode` over the blob's extra and payload
/// regions. Cipher output length is checked by the caller against
/// `header.uncompressed_len`; every other mode checks it here.
pub fn decode(
    header: &Header,
    extra: &[u8],
    payload: &[u8],
    key: Option<&CipherKey>,
) -> Result<Vec<u8>> {
    let expected = header.uncompressed_len;
    match header.mode {
        Mode::Raw => raw::decode(payload, expected),
        Mode::Cipher => cipher::decode(payload, require_key(header.mode, key)?),
        Mode::Deflate => deflate::decode(payload, expected),
        Mode::Lzma => lzma::decode(extra, payload, expected),
        Mode::DeflateCipher | Mode::LzmaCipher => combined::decode(
            header.mode,
            extra,
            payload,
            require_key(header.mode, key)?,
            expected,
        ),
    }
}
