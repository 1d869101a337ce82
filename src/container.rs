// Container API: one value holding both sides of a magic block.
//
// A `MagicBlock` always carries the encoded blob, the plaintext payload and
// the parsed header, whichever direction produced it.

use std::str::Utf8Error;

use crate::codec::{EncodeOptions, decode_with_header, encode_with};
use crate::error::Result;
use crate::format::header::{Header, Mode};
use crate::transform::CipherKey;

/// An encoded magic block together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagicBlock {
    header: Header,
    encoded: Vec<u8>,
    payload: Vec<u8>,
}

impl MagicBlock {
    /// Encode `payload` (bytes or text) with the given mode and level.
    ///
    /// ```
    /// use magicblock::{MagicBlock, Mode};
    ///
    /// let block = MagicBlock::encode("Hello, World!", Mode::Raw, 0, None).unwrap();
    /// assert_eq!(block.compressed_len(), 13);
    /// assert_eq!(block.as_bytes().len(), 24 + 13);
    ///
    /// let back = MagicBlock::decode(block.as_bytes(), None).unwrap();
    /// assert_eq!(back.payload_str().unwrap(), "Hello, World!");
    /// ```
    pub fn encode(
        payload: impl AsRef<[u8]>,
        mode: Mode,
        level: u32,
        key: Option<&CipherKey>,
    ) -> Result<Self> {
        let payload = payload.as_ref();
        let (header, encoded) = encode_with(payload, mode, level, key)?;
        Ok(Self {
            header,
            encoded,
            payload: payload.to_vec(),
        })
    }

    /// Encode `payload` with an [`EncodeOptions`] bundle.
    pub fn encode_with_options(payload: impl AsRef<[u8]>, opts: &EncodeOptions) -> Result<Self> {
        Self::encode(payload, opts.mode, opts.level, opts.key.as_ref())
    }

    /// Validate and decode a complete blob.
    pub fn decode(blob: impl Into<Vec<u8>>, key: Option<&CipherKey>) -> Result<Self> {
        let encoded = blob.into();
        let (header, payload) = decode_with_header(&encoded, key)?;
        Ok(Self {
            header,
            encoded,
            payload,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn mode(&self) -> Mode {
        self.header.mode
    }

    pub fn compressed_len(&self) -> u32 {
        self.header.compressed_len
    }

    pub fn uncompressed_len(&self) -> u32 {
        self.header.uncompressed_len
    }

    pub fn extra_len(&self) -> u32 {
        self.header.extra_len
    }

    /// The encoded blob, header included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded
    }

    /// The plaintext payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The plaintext payload as UTF-8 text.
    pub fn payload_str(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(&self.payload)
    }

    /// Consume the block, keeping the encoded blob.
    pub fn into_bytes(self) -> Vec<u8> {
        self.encoded
    }

    /// Consume the block, keeping the plaintext payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }

    /// Consume the block into `(header, encoded, payload)`.
    pub fn into_parts(self) -> (Header, Vec<u8>, Vec<u8>) {
        (self.header, self.encoded, self.payload)
    }
}

impl AsRef<[u8]> for MagicBlock {
    fn as_ref(&self) -> &[u8] {
        &self.encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::format::header::HEADER_SIZE;

    #[test]
    fn encode_keeps_both_sides() {
        let block = MagicBlock::encode(b"payload bytes", Mode::Raw, 6, None).unwrap();
        assert_eq!(block.payload(), b"payload bytes");
        assert_eq!(&block.as_bytes()[HEADER_SIZE..], b"payload bytes");
        assert_eq!(block.mode(), Mode::Raw);
        assert_eq!(block.extra_len(), 0);
    }

    #[test]
    fn decode_matches_encode() {
        let key = CipherKey::new([7; 32], [8; 16]);
        let text = "text goes in, text comes out ".repeat(40);
        let encoded = MagicBlock::encode(&text, Mode::DeflateCipher, 9, Some(&key)).unwrap();
        let decoded = MagicBlock::decode(encoded.as_bytes(), Some(&key)).unwrap();
        assert_eq!(decoded, encoded);
        assert_eq!(decoded.payload_str().unwrap(), text);
    }

    #[test]
    fn options_path_matches_direct_path() {
        let opts = EncodeOptions::new(Mode::Lzma);
        let a = MagicBlock::encode_with_options(b"same input", &opts).unwrap();
        let b = MagicBlock::encode(b"same input", Mode::Lzma, 6, None).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn non_utf8_payload_reports_error() {
        let block = MagicBlock::encode([0xFFu8, 0xFE], Mode::Raw, 0, None).unwrap();
        assert!(block.payload_str().is_err());
    }

    #[test]
    fn into_parts_splits_ownership() {
        let block = MagicBlock::encode(b"parts", Mode::Deflate, 6, None).unwrap();
        let header = *block.header();
        let blob = block.as_bytes().to_vec();
        let (h, encoded, payload) = block.into_parts();
        assert_eq!(h, header);
        assert_eq!(encoded, blob);
        assert_eq!(payload, b"parts");
    }

    #[test]
    fn decode_error_propagates() {
        assert!(matches!(
            MagicBlock::decode(vec![0u8; 10], None),
            Err(Error::Truncated {
                needed: 24,
                available: 10
            })
        ));
    }
}
