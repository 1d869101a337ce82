// File-level helpers for magic-block encoding/decoding.
//
// Provides `encode_file()` and `decode_file()` convenience functions that
// read the whole input into memory, run the codec and write the result
// through a buffered writer. Optionally computes SHA-256 checksums of the
// plaintext side (feature-gated behind `file-io`).

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::codec::{EncodeOptions, decode_with_header, encode_with};
use crate::format::header::{Header, Mode};
use crate::transform::CipherKey;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `encode_file()`.
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Plaintext input size in bytes.
    pub input_size: u64,
    /// Encoded output size in bytes, header included.
    pub output_size: u64,
    /// Mode written into the header.
    pub mode: Mode,
    /// Header of the written block.
    pub header: Header,
    /// SHA-256 of the plaintext input (if `file-io` feature is enabled).
    pub input_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `decode_file()`.
#[derive(Debug, Clone)]
pub struct DecodeStats {
    /// Encoded input size in bytes.
    pub input_size: u64,
    /// Recovered output size in bytes.
    pub output_size: u64,
    /// Mode read from the header.
    pub mode: Mode,
    /// SHA-256 of the recovered output (if `file-io` feature is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Encoding or decoding error.
    #[error("codec error: {0}")]
    Codec(#[from] crate::error::Error),
}

// ---------------------------------------------------------------------------
// Default buffer size
// ---------------------------------------------------------------------------

const BUF_SIZE: usize = 64 * 1024; // 64 KiB

// ---------------------------------------------------------------------------
// encode_file
// ---------------------------------------------------------------------------

/// Encode the file at `input_path` into a magic block at `output_path`.
///
/// The input is read fully into memory; the block is written through a
/// `BufWriter`. When the `file-io` feature is enabled, the SHA-256 of the
/// plaintext input is reported so a later `decode_file()` can be checked
/// against it.
pub fn encode_file(
    input_path: &Path,
    output_path: &Path,
    opts: &EncodeOptions,
) -> Result<EncodeStats, IoError> {
    let input = std::fs::read(input_path)?;
    let input_size = input.len() as u64;

    let (header, blob) = encode_with(&input, opts.mode, opts.level, opts.key.as_ref())?;

    let output_file = File::create(output_path)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, output_file);
    writer.write_all(&blob)?;
    writer.flush()?;

    let input_sha256 = sha256(&input);

    log::info!(
        "{}: {input_size} -> {} bytes ({})",
        input_path.display(),
        blob.len(),
        header.mode
    );

    Ok(EncodeStats {
        input_size,
        output_size: blob.len() as u64,
        mode: header.mode,
        header,
        input_sha256,
    })
}

// ---------------------------------------------------------------------------
// decode_file
// ---------------------------------------------------------------------------

/// Decode the magic block at `input_path`, writing the payload to
/// `output_path`.
///
/// Nothing is written when the block fails validation. When the `file-io`
/// feature is enabled, the SHA-256 of the recovered payload is reported.
pub fn decode_file(
    input_path: &Path,
    output_path: &Path,
    key: Option<&CipherKey>,
) -> Result<DecodeStats, IoError> {
    let blob = std::fs::read(input_path)?;
    let input_size = blob.len() as u64;

    let (header, payload) = decode_with_header(&blob, key)?;

    let output_file = File::create(output_path)?;
    let mut writer = BufWriter::with_capacity(BUF_SIZE, output_file);
    writer.write_all(&payload)?;
    writer.flush()?;

    let output_sha256 = sha256(&payload);

    log::info!(
        "{}: {input_size} -> {} bytes ({})",
        input_path.display(),
        payload.len(),
        header.mode
    );

    Ok(DecodeStats {
        input_size,
        output_size: payload.len() as u64,
        mode: header.mode,
        output_sha256,
    })
}

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
fn sha256(data: &[u8]) -> Option<[u8; 32]> {
    Some(sha2::Sha256::digest(data).into())
}

#[cfg(not(feature = "file-io"))]
fn sha256(_data: &[u8]) -> Option<[u8; 32]> {
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
