// Magic-block encoder.
//
// One arena per call: the first HEADER_SIZE bytes are reserved, the selected
// transform appends side-data and payload behind them, and the header is
// written back over the reserved region once the sizes are known.

use crate::error::{Error, Result, wire_len};
use crate::format::header::{HEADER_SIZE, Header, Mode};
use crate::transform::{self, CipherKey, TransformResult};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Default compression level for Deflate-based modes.
pub const DEFAULT_LEVEL: u32 = 6;

/// Configuration for encoding one payload.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Transform to apply.
    pub mode: Mode,
    /// Compression level (0-9). Only Deflate-based modes use it.
    pub level: u32,
    /// Key and IV, required by the cipher modes.
    pub key: Option<CipherKey>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Deflate,
            level: DEFAULT_LEVEL,
            key: None,
        }
    }
}

impl EncodeOptions {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_key(mut self, key: CipherKey) -> Self {
        self.key = Some(key);
        self
    }
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

/// Encode `payload` into a complete magic block.
pub fn encode_all(payload: &[u8], opts: &EncodeOptions) -> Result<Vec<u8>> {
    encode_with(payload, opts.mode, opts.level, opts.key.as_ref()).map(|(_, blob)| blob)
}

/// Encode `payload` with `mode`, returning the header alongside the blob.
///
/// The empty payload is written as a bare header with every size zero,
/// whatever the mode.
pub fn encode_with(
    payload: &[u8],
    mode: Mode,
    level: u32,
    key: Option<&CipherKey>,
) -> Result<(Header, Vec<u8>)> {
    wire_len("payload", payload.len())?;
    if mode.needs_key() && key.is_none() {
        return Err(Error::MissingKey(mode));
    }

    let bound = transform::output_bound(mode, payload.len());
    let mut out = Vec::with_capacity(HEADER_SIZE.saturating_add(bound));
    out.resize(HEADER_SIZE, 0);

    let result = if payload.is_empty() {
        TransformResult::empty(mode)
    } else {
        transform::encode(mode, payload, level, key, &mut out)?
    };

    let header = result.header();
    if out.len() as u64 != header.total_len() {
        return Err(Error::LengthMismatch {
            stage: "encoder",
            expected: header.total_len(),
            actual: out.len() as u64,
        });
    }
    header.write_into(&mut out)?;

    log::debug!(
        "encoded {} bytes as {mode}: compressed={} extra={} total={}",
        payload.len(),
        header.compressed_len,
        header.extra_len,
        out.len()
    );

    Ok((header, out))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
