// Magic-block header: a fixed 24-byte little-endian prefix describing how
// the bytes that follow were produced.
//
//   offset  size  field
//        0     4  magic             0x1A43444D
//        4     4  version           1
//        8     4  mode              Mode as u32
//       12     4  compressed_len    payload bytes after the side-data
//       16     4  uncompressed_len  recovered payload length
//       20     4  extra_len         side-data bytes right after the header

use std::fmt;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAGIC: u32 = 0x1A43_444D;
pub const VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 24;

/// LZMA properties blob: one lc/lp/pb byte plus a u32 LE dictionary size.
pub const LZMA_PROPS_SIZE: usize = 5;

/// Size of the inner-length prefix inside combined-mode cipher plaintext.
pub const INNER_SIZE_PREFIX: usize = 4;

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Transform applied to the payload. Discriminants are the wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Mode {
    Raw = 0,
    Cipher = 1,
    Deflate = 2,
    Lzma = 3,
    DeflateCipher = 4,
    LzmaCipher = 5,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Raw,
        Mode::Cipher,
        Mode::Deflate,
        Mode::Lzma,
        Mode::DeflateCipher,
        Mode::LzmaCipher,
    ];

    /// Resolve a wire value.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Raw),
            1 => Some(Self::Cipher),
            2 => Some(Self::Deflate),
            3 => Some(Self::Lzma),
            4 => Some(Self::DeflateCipher),
            5 => Some(Self::LzmaCipher),
            _ => None,
        }
    }

    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Stable lowercase name, used by the CLI and in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Cipher => "cipher",
            Self::Deflate => "deflate",
            Self::Lzma => "lzma",
            Self::DeflateCipher => "deflate-cipher",
            Self::LzmaCipher => "lzma-cipher",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Whether encoding or decoding this mode needs a cipher key.
    pub fn needs_key(self) -> bool {
        matches!(self, Self::Cipher | Self::DeflateCipher | Self::LzmaCipher)
    }

    /// Side-data length this mode always carries in the extra region.
    pub fn extra_len(self) -> u32 {
        match self {
            Self::Lzma | Self::LzmaCipher => LZMA_PROPS_SIZE as u32,
            Self::Raw | Self::Cipher | Self::Deflate | Self::DeflateCipher => 0,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for Mode {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::from_u32(value).ok_or(Error::UnknownMode(value))
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Parsed and validated magic-block header.
///
/// Magic and version are implied: a `Header` value only exists for the one
/// format version this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub mode: Mode,
    pub compressed_len: u32,
    pub uncompressed_len: u32,
    pub extra_len: u32,
}

impl Header {
    /// Serialize the header into its 24-byte wire form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        out[4..8].copy_from_slice(&VERSION.to_le_bytes());
        out[8..12].copy_from_slice(&self.mode.as_u32().to_le_bytes());
        out[12..16].copy_from_slice(&self.compressed_len.to_le_bytes());
        out[16..20].copy_from_slice(&self.uncompressed_len.to_le_bytes());
        out[20..24].copy_from_slice(&self.extra_len.to_le_bytes());
        out
    }

    /// Overwrite the first `HEADER_SIZE` bytes of `buf` with this header.
    ///
    /// The encoder reserves that region before running a transform.
    pub fn write_into(&self, buf: &mut [u8]) -> Result<()> {
        let available = buf.len();
        let slot = buf.get_mut(..HEADER_SIZE).ok_or(Error::Truncated {
            needed: HEADER_SIZE,
            available,
        })?;
        slot.copy_from_slice(&self.to_bytes());
        Ok(())
    }

    /// Validate the fixed 24-byte prefix only (magic, version, mode).
    ///
    /// Does not check that `bytes` holds the side-data and payload the
    /// header declares; use [`parse_header`] for a complete blob.
    pub fn peek(bytes: &[u8]) -> Result<Self> {
        let fields = read_prefix(bytes)?;
        Ok(Self {
            mode: Mode::try_from(fields.mode)?,
            compressed_len: fields.compressed_len,
            uncompressed_len: fields.uncompressed_len,
            extra_len: fields.extra_len,
        })
    }

    /// Total blob length this header describes.
    pub fn total_len(&self) -> u64 {
        HEADER_SIZE as u64 + self.extra_len as u64 + self.compressed_len as u64
    }

    /// Whether this header describes the zero-length payload, which decodes
    /// without touching any transform.
    pub fn is_empty(&self) -> bool {
        self.compressed_len == 0 && self.uncompressed_len == 0
    }

    /// Byte range of the side-data region within the blob.
    pub fn extra_range(&self) -> std::ops::Range<usize> {
        HEADER_SIZE..HEADER_SIZE + self.extra_len as usize
    }

    /// Byte range of the payload region within the blob.
    pub fn payload_range(&self) -> std::ops::Range<usize> {
        let start = HEADER_SIZE + self.extra_len as usize;
        start..start + self.compressed_len as usize
    }
}

#[inline]
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut field = [0u8; 4];
    field.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_le_bytes(field)
}

/// Header words after magic and version, not yet interpreted.
struct RawFields {
    mode: u32,
    compressed_len: u32,
    uncompressed_len: u32,
    extra_len: u32,
}

/// Length, magic and version checks shared by [`Header::peek`] and
/// [`parse_header`].
fn read_prefix(bytes: &[u8]) -> Result<RawFields> {
    if bytes.len() < HEADER_SIZE {
        return Err(Error::Truncated {
            needed: HEADER_SIZE,
            available: bytes.len(),
        });
    }

    let magic = read_u32(bytes, 0);
    if magic != MAGIC {
        return Err(Error::InvalidMagic { found: magic });
    }

    let version = read_u32(bytes, 4);
    if version != VERSION {
        return Err(Error::UnsupportedVersion(version));
    }

    Ok(RawFields {
        mode: read_u32(bytes, 8),
        compressed_len: read_u32(bytes, 12),
        uncompressed_len: read_u32(bytes, 16),
        extra_len: read_u32(bytes, 20),
    })
}

// ---------------------------------------------------------------------------
// Full validation
// ---------------------------------------------------------------------------

/// Parse and validate the header of a complete magic block.
///
/// Checks run in wire order: length, magic, version, declared sizes against
/// the buffer, mode, then the mode's side-data length.
pub fn parse_header(bytes: &[u8]) -> Result<Header> {
    let RawFields {
        mode: raw_mode,
        compressed_len,
        uncompressed_len,
        extra_len,
    } = read_prefix(bytes)?;

    let declared = HEADER_SIZE as u64 + extra_len as u64 + compressed_len as u64;
    if declared != bytes.len() as u64 {
        return Err(Error::SizeMismatch {
            declared,
            actual: bytes.len() as u64,
        });
    }

    if compressed_len == 0 && uncompressed_len != 0 {
        return Err(Error::SizeMismatch {
            declared: uncompressed_len as u64,
            actual: 0,
        });
    }

    let mode = Mode::try_from(raw_mode)?;

    // The empty payload carries no side-data whatever the mode.
    let expected_extra = if compressed_len == 0 {
        0
    } else {
        mode.extra_len()
    };
    if extra_len != expected_extra {
        return Err(Error::ExtraLength {
            mode,
            expected: expected_extra,
            found: extra_len,
        });
    }

    Ok(Header {
        mode,
        compressed_len,
        uncompressed_len,
        extra_len,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(header: &Header, body_len: usize) -> Vec<u8> {
        let mut out = header.to_bytes().to_vec();
        out.resize(HEADER_SIZE + body_len, 0xAB);
        out
    }

    #[test]
    fn header_layout_is_little_endian() {
        let h = Header {
            mode: Mode::Lzma,
            compressed_len: 0x0102_0304,
            uncompressed_len: 0x1122_3344,
            extra_len: 5,
        };
        let bytes = h.to_bytes();
        assert_eq!(&bytes[0..4], &[0x4D, 0x44, 0x43, 0x1A]);
        assert_eq!(&bytes[4..8], &[1, 0, 0, 0]);
        assert_eq!(&bytes[8..12], &[3, 0, 0, 0]);
        assert_eq!(&bytes[12..16], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(&bytes[16..20], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&bytes[20..24], &[5, 0, 0, 0]);
    }

    #[test]
    fn parse_roundtrip() {
        let h = Header {
            mode: Mode::Lzma,
            compressed_len: 7,
            uncompressed_len: 100,
            extra_len: 5,
        };
        let parsed = parse_header(&blob(&h, 12)).unwrap();
        assert_eq!(parsed, h);
        assert_eq!(parsed.extra_range(), 24..29);
        assert_eq!(parsed.payload_range(), 29..36);
        assert_eq!(parsed.total_len(), 36);
    }

    #[test]
    fn truncated_header() {
        let err = parse_header(&[0u8; 23]).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                needed: 24,
                available: 23
            }
        ));
    }

    #[test]
    fn bad_magic_rejected() {
        let mut bytes = blob(
            &Header {
                mode: Mode::Raw,
                compressed_len: 0,
                uncompressed_len: 0,
                extra_len: 0,
            },
            0,
        );
        bytes[2] ^= 0xFF;
        assert!(matches!(
            parse_header(&bytes).unwrap_err(),
            Error::InvalidMagic { .. }
        ));
    }

    #[test]
    fn bad_version_rejected() {
        let mut bytes = blob(
            &Header {
                mode: Mode::Raw,
                compressed_len: 0,
                uncompressed_len: 0,
                extra_len: 0,
            },
            0,
        );
        bytes[4] = 2;
        assert!(matches!(
            parse_header(&bytes).unwrap_err(),
            Error::UnsupportedVersion(2)
        ));
    }

    #[test]
    fn size_mismatch_rejected() {
        let h = Header {
            mode: Mode::Raw,
            compressed_len: 10,
            uncompressed_len: 10,
            extra_len: 0,
        };
        let err = parse_header(&blob(&h, 9)).unwrap_err();
        assert!(matches!(
            err,
            Error::SizeMismatch {
                declared: 34,
                actual: 33
            }
        ));
        assert!(parse_header(&blob(&h, 11)).is_err());
    }

    #[test]
    fn huge_declared_sizes_do_not_overflow() {
        let h = Header {
            mode: Mode::Raw,
            compressed_len: u32::MAX,
            uncompressed_len: u32::MAX,
            extra_len: u32::MAX,
        };
        assert!(matches!(
            parse_header(&blob(&h, 0)).unwrap_err(),
            Error::SizeMismatch { .. }
        ));
    }

    #[test]
    fn unknown_mode_rejected() {
        let mut bytes = blob(
            &Header {
                mode: Mode::Raw,
                compressed_len: 0,
                uncompressed_len: 0,
                extra_len: 0,
            },
            0,
        );
        bytes[8] = 6;
        assert!(matches!(
            parse_header(&bytes).unwrap_err(),
            Error::UnknownMode(6)
        ));
    }

    #[test]
    fn extra_len_must_match_mode() {
        let h = Header {
            mode: Mode::Deflate,
            compressed_len: 4,
            uncompressed_len: 4,
            extra_len: 5,
        };
        assert!(matches!(
            parse_header(&blob(&h, 9)).unwrap_err(),
            Error::ExtraLength {
                mode: Mode::Deflate,
                expected: 0,
                found: 5
            }
        ));

        let h = Header {
            mode: Mode::LzmaCipher,
            compressed_len: 16,
            uncompressed_len: 4,
            extra_len: 0,
        };
        assert!(matches!(
            parse_header(&blob(&h, 16)).unwrap_err(),
            Error::ExtraLength {
                mode: Mode::LzmaCipher,
                expected: 5,
                found: 0
            }
        ));
    }

    #[test]
    fn empty_payload_with_nonzero_uncompressed_rejected() {
        let h = Header {
            mode: Mode::Raw,
            compressed_len: 0,
            uncompressed_len: 3,
            extra_len: 0,
        };
        assert!(matches!(
            parse_header(&blob(&h, 0)).unwrap_err(),
            Error::SizeMismatch { .. }
        ));
    }

    #[test]
    fn peek_ignores_body_length() {
        let h = Header {
            mode: Mode::Deflate,
            compressed_len: 1000,
            uncompressed_len: 5000,
            extra_len: 0,
        };
        let bytes = h.to_bytes();
        assert!(parse_header(&bytes).is_err());
        assert_eq!(Header::peek(&bytes).unwrap(), h);
    }

    #[test]
    fn peek_and_parse_reject_prefixes_alike() {
        let good = Header {
            mode: Mode::Raw,
            compressed_len: 0,
            uncompressed_len: 0,
            extra_len: 0,
        }
        .to_bytes();

        let mut bad_magic = good;
        bad_magic[3] ^= 0x80;
        let mut bad_version = good;
        bad_version[4] = 2;

        for bytes in [&good[..10], &bad_magic[..], &bad_version[..]] {
            let peeked = Header::peek(bytes).unwrap_err().to_string();
            let parsed = parse_header(bytes).unwrap_err().to_string();
            assert_eq!(peeked, parsed);
        }
    }

    #[test]
    fn mode_wire_values_are_fixed() {
        let expected = [0u32, 1, 2, 3, 4, 5];
        for (mode, value) in Mode::ALL.iter().zip(expected) {
            assert_eq!(mode.as_u32(), value);
            assert_eq!(Mode::from_u32(value), Some(*mode));
        }
        assert_eq!(Mode::from_u32(6), None);
        assert_eq!(Mode::from_u32(u32::MAX), None);
    }

    #[test]
    fn mode_names_roundtrip() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), Some(mode));
        }
        assert_eq!(Mode::from_name("LZMA-Cipher"), Some(Mode::LzmaCipher));
        assert_eq!(Mode::from_name("zstd"), None);
    }

    #[test]
    fn write_into_requires_room() {
        let h = Header {
            mode: Mode::Raw,
            compressed_len: 0,
            uncompressed_len: 0,
            extra_len: 0,
        };
        let mut small = [0u8; 10];
        assert!(h.write_into(&mut small).is_err());
        let mut buf = vec![0u8; 30];
        h.write_into(&mut buf).unwrap();
        assert_eq!(&buf[..HEADER_SIZE], &h.to_bytes());
    }
}
