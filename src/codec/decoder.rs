// Magic-block decoder.
//
// parse header -> validate magic/version/sizes -> dispatch on mode -> done.
// Any failed check ends the call with a named error; the input is never
// modified and the output is a freshly owned buffer.

use crate::error::{Error, Result};
use crate::format::header::{Header, parse_header};
use crate::transform::{self, CipherKey};

/// Decode a complete magic block into the original payload.
pub fn decode_all(blob: &[u8], key: Option<&CipherKey>) -> Result<Vec<u8>> {
    decode_with_header(blob, key).map(|(_, payload)| payload)
}

/// Decode a complete magic block, returning its header with the payload.
pub fn decode_with_header(blob: &[u8], key: Option<&CipherKey>) -> Result<(Header, Vec<u8>)> {
    let header = parse_header(blob)?;

    if header.is_empty() {
        log::debug!("decoded empty {} block", header.mode);
        return Ok((header, Vec::new()));
    }

    if header.mode.needs_key() && key.is_none() {
        return Err(Error::MissingKey(header.mode));
    }

    let extra = &blob[header.extra_range()];
    let payload = &blob[header.payload_range()];
    let out = transform::decode(&header, extra, payload, key)?;

    if out.len() as u64 != header.uncompressed_len as u64 {
        return Err(Error::LengthMismatch {
            stage: "decoder",
            expected: header.uncompressed_len as u64,
            actual: out.len() as u64,
        });
    }

    log::debug!(
        "decoded {} block: compressed={} extra={} -> {} bytes",
        header.mode,
        header.compressed_len,
        header.extra_len,
        out.len()
    );

    Ok((header, out))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
