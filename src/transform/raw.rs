// Raw mode: the payload is stored verbatim.

use crate::error::{Error, Result, wire_len};
use crate::format::header::Mode;

use super::TransformResult;

pub fn encode(input: &[u8], out: &mut Vec<u8>) -> Result<TransformResult> {
    let size = wire_len("raw payload", input.len())?;
    out.extend_from_slice(input);
    Ok(TransformResult {
        mode: Mode::Raw,
        uncompressed_size: size,
        compressed_size: size,
        extra_size: 0,
    })
}

pub fn decode(payload: &[u8], expected: u32) -> Result<Vec<u8>> {
    if payload.len() as u64 != expected as u64 {
        return Err(Error::LengthMismatch {
            stage: "raw",
            expected: expected as u64,
            actual: payload.len() as u64,
        });
    }
    Ok(payload.to_vec())
}
