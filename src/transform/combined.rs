// Compress-then-encrypt combinators (DeflateCipher, LzmaCipher).
//
// Stages, each owning its own buffer:
//
//   input --compress--> stage   = [side-data][compressed]
//         side-data ----------------------------------> out (extra region)
//         [u32 LE inner size][compressed] = plaintext
//   plaintext --encrypt--------------------------------> out (payload)
//
// The outer header's compressed length counts ciphertext bytes. The size
// the inner decompressor needs travels inside the plaintext.

use crate::error::{Error, Result, wire_len};
use crate::format::header::{INNER_SIZE_PREFIX, Mode};

use super::cipher::{self, CipherKey};
use super::{TransformResult, deflate, lzma};

/// Ciphertext capacity for an inner compressed stream of `inner_len` bytes.
#[inline]
pub fn sealed_bound(inner_len: usize) -> usize {
    cipher::padded_len(inner_len.saturating_add(INNER_SIZE_PREFIX))
}

fn inner_mode(mode: Mode) -> Result<Mode> {
    match mode {
        Mode::DeflateCipher => Ok(Mode::Deflate),
        Mode::LzmaCipher => Ok(Mode::Lzma),
        other => Err(Error::UnknownMode(other.as_u32())),
    }
}

/// Compress `input` with the inner codec of `mode`, then encrypt it.
///
/// Appends the inner side-data (unencrypted) followed by the ciphertext.
pub fn encode(
    mode: Mode,
    input: &[u8],
    level: u32,
    key: &CipherKey,
    out: &mut Vec<u8>,
) -> Result<TransformResult> {
    let inner = inner_mode(mode)?;

    let mut stage = Vec::with_capacity(super::output_bound(inner, input.len()));
    let compressed = match inner {
        Mode::Deflate => deflate::encode(input, level, &mut stage)?,
        _ => lzma::encode(input, level, &mut stage)?,
    };

    let (side_data, body) = stage.split_at(compressed.extra_size as usize);
    out.extend_from_slice(side_data);

    let mut plaintext = Vec::with_capacity(INNER_SIZE_PREFIX + body.len());
    plaintext.extend_from_slice(&compressed.uncompressed_size.to_le_bytes());
    plaintext.extend_from_slice(body);
    drop(stage);

    let sealed = cipher::encode(&plaintext, key, out)?;

    log::trace!(
        "{mode}: {} -> {} compressed -> {} sealed",
        input.len(),
        compressed.compressed_size,
        sealed.compressed_size
    );

    Ok(TransformResult {
        mode,
        uncompressed_size: compressed.uncompressed_size,
        compressed_size: sealed.compressed_size,
        extra_size: compressed.extra_size,
    })
}

/// Decrypt `payload`, then run the inner decompressor of `mode`.
pub fn decode(
    mode: Mode,
    extra: &[u8],
    payload: &[u8],
    key: &CipherKey,
    expected: u32,
) -> Result<Vec<u8>> {
    let inner = inner_mode(mode)?;

    let plaintext = cipher::decode(payload, key)?;
    let Some((prefix, body)) = plaintext.split_first_chunk::<INNER_SIZE_PREFIX>() else {
        return Err(Error::Truncated {
            needed: INNER_SIZE_PREFIX,
            available: plaintext.len(),
        });
    };

    let inner_len = u32::from_le_bytes(*prefix);
    if inner_len != expected {
        return Err(Error::LengthMismatch {
            stage: "inner size prefix",
            expected: expected as u64,
            actual: inner_len as u64,
        });
    }
    wire_len("inner payload", body.len())?;

    match inner {
        Mode::Deflate => deflate::decode(body, inner_len),
        _ => lzma::decode(extra, body, inner_len),
    }
}
