// Error type shared by the header parser, the transform primitives, the
// encoder/decoder and the container API.
//
// Every failure is fatal for the call that raised it. Variants carry the
// sizes, values or backend reason needed to diagnose the blob.

use crate::format::header::Mode;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fewer bytes than a fixed-size field requires.
    #[error("truncated input: need {needed} bytes, have {available}")]
    Truncated { needed: usize, available: usize },

    #[error("invalid magic: expected {expected:#010X}, got {found:#010X}", expected = crate::format::header::MAGIC)]
    InvalidMagic { found: u32 },

    #[error("unsupported version {0} (only version {v} is defined)", v = crate::format::header::VERSION)]
    UnsupportedVersion(u32),

    /// Declared sizes do not account for the buffer that carries them.
    #[error("size mismatch: header declares {declared} bytes, buffer holds {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("unknown mode {0}")]
    UnknownMode(u32),

    /// The extra region length disagrees with what the mode carries.
    #[error("{mode} carries {expected} bytes of side-data, header declares {found}")]
    ExtraLength { mode: Mode, expected: u32, found: u32 },

    /// A stage produced (or declared) a different length than the header.
    #[error("{stage}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        stage: &'static str,
        expected: u64,
        actual: u64,
    },

    #[error("{0} requires a cipher key")]
    MissingKey(Mode),

    #[error("cipher failure: {0}")]
    Cipher(String),

    #[error("{codec} failure ({status}): {reason}")]
    Compression {
        codec: &'static str,
        status: String,
        reason: String,
    },

    /// A length would not fit a 32-bit wire field.
    #[error("{what} of {len} bytes does not fit a 32-bit length field")]
    SizeOverflow { what: &'static str, len: u64 },
}

impl Error {
    pub(crate) fn compression(
        codec: &'static str,
        status: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Compression {
            codec,
            status: status.into(),
            reason: reason.into(),
        }
    }
}

/// Convert a buffer length into a wire field, failing before any backend runs.
pub(crate) fn wire_len(what: &'static str, len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::SizeOverflow {
        what,
        len: len as u64,
    })
}
