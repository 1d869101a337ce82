// Cipher mode: AES-256 in CBC mode with PKCS#7 padding.
//
// Confidentiality only. There is no MAC, so a wrong key or a tampered
// ciphertext is detected at best by a padding failure and otherwise yields
// garbage. An authenticated mode needs a new format version.

use std::fmt;

use aes::Aes256;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result, wire_len};
use crate::format::header::Mode;

use super::TransformResult;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

pub const KEY_LEN: usize = 32;
pub const IV_LEN: usize = 16;
pub const BLOCK_SIZE: usize = 16;

// ---------------------------------------------------------------------------
// Key material
// ---------------------------------------------------------------------------

/// 256-bit AES key plus the 128-bit CBC initialization vector.
///
/// Owned by the caller and never modified by the codec. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey {
    key: [u8; KEY_LEN],
    iv: [u8; IV_LEN],
}

impl CipherKey {
    pub fn new(key: [u8; KEY_LEN], iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Build a key from byte slices, checking both lengths.
    pub fn from_slices(key: &[u8], iv: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LEN] = key.try_into().map_err(|_| {
            Error::Cipher(format!("key must be {KEY_LEN} bytes, got {}", key.len()))
        })?;
        let iv: [u8; IV_LEN] = iv
            .try_into()
            .map_err(|_| Error::Cipher(format!("IV must be {IV_LEN} bytes, got {}", iv.len())))?;
        Ok(Self { key, iv })
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CipherKey { .. }")
    }
}

// ---------------------------------------------------------------------------
// Encode / decode
// ---------------------------------------------------------------------------

/// Ciphertext length for `len` bytes of plaintext. PKCS#7 always pads, so a
/// block-aligned input grows by a whole block.
#[inline]
pub fn padded_len(len: usize) -> usize {
    (len / BLOCK_SIZE + 1).saturating_mul(BLOCK_SIZE)
}

/// Encrypt `input`, appending the ciphertext to `out`.
pub fn encode(input: &[u8], key: &CipherKey, out: &mut Vec<u8>) -> Result<TransformResult> {
    let uncompressed_size = wire_len("cipher plaintext", input.len())?;
    let padded = padded_len(input.len());
    wire_len("ciphertext", padded)?;

    let enc = Aes256CbcEnc::new_from_slices(&key.key, &key.iv)
        .map_err(|_| Error::Cipher("failed to initialize AES-256-CBC encryptor".into()))?;

    let start = out.len();
    out.resize(start + padded, 0);
    let written = enc
        .encrypt_padded_b2b_mut::<Pkcs7>(input, &mut out[start..])
        .map_err(|_| Error::Cipher("padding the final block failed".into()))?
        .len();
    out.truncate(start + written);

    log::trace!("cipher: {} plaintext bytes -> {written} ciphertext", input.len());

    Ok(TransformResult {
        mode: Mode::Cipher,
        uncompressed_size,
        compressed_size: wire_len("ciphertext", written)?,
        extra_size: 0,
    })
}

/// Decrypt `payload`, returning the unpadded plaintext.
pub fn decode(payload: &[u8], key: &CipherKey) -> Result<Vec<u8>> {
    if payload.is_empty() || payload.len() % BLOCK_SIZE != 0 {
        return Err(Error::Cipher(format!(
            "ciphertext length {} is not a positive multiple of {BLOCK_SIZE}",
            payload.len()
        )));
    }

    let dec = Aes256CbcDec::new_from_slices(&key.key, &key.iv)
        .map_err(|_| Error::Cipher("failed to initialize AES-256-CBC decryptor".into()))?;

    let plain = dec
        .decrypt_padded_vec_mut::<Pkcs7>(payload)
        .map_err(|_| Error::Cipher("invalid padding in final block (wrong key or corrupt data)".into()))?;

    log::trace!("cipher: {} ciphertext bytes -> {} plaintext", payload.len(), plain.len());
    Ok(plain)
}
