// Deflate mode: zlib-wrapped DEFLATE via flate2.
//
// Uses flate2's low-level `Compress`/`Decompress` so the output buffer is
// sized up front and every backend status is checked explicitly.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::error::{Error, Result, wire_len};
use crate::format::header::Mode;

use super::TransformResult;

/// Highest zlib compression level. Larger requested levels are clamped.
pub const MAX_LEVEL: u32 = 9;

/// Largest expansion a DEFLATE stream can encode (258-byte matches in
/// 2-bit codes), plus slack for the zlib wrapper.
const MAX_EXPANSION: usize = 1032;

/// Worst-case DEFLATE output for `len` input bytes: `len + ceil(len / 1000) + 12`.
#[inline]
pub fn compress_bound(len: usize) -> usize {
    len.saturating_add(len.div_ceil(1000)).saturating_add(12)
}

/// Compress `input` at `level`, appending the zlib stream to `out`.
pub fn encode(input: &[u8], level: u32, out: &mut Vec<u8>) -> Result<TransformResult> {
    let uncompressed_size = wire_len("deflate input", input.len())?;

    let start = out.len();
    out.reserve(compress_bound(input.len()));

    let mut stream = Compress::new(Compression::new(level.min(MAX_LEVEL)), true);
    loop {
        let consumed = stream.total_in() as usize;
        let produced = stream.total_out();
        let status = stream
            .compress_vec(&input[consumed..], out, FlushCompress::Finish)
            .map_err(|e| Error::compression("deflate", "stream error", e.to_string()))?;

        if status == Status::StreamEnd {
            break;
        }
        if out.len() == out.capacity() {
            // Incompressible input can exceed the classic bound by a few
            // bytes of block framing.
            log::trace!("deflate: output bound exceeded at {} bytes, growing", out.len() - start);
            out.reserve((input.len() / 8).max(64));
        } else if stream.total_out() == produced && stream.total_in() as usize == consumed {
            return Err(Error::compression(
                "deflate",
                format!("{status:?}"),
                "compressor made no progress",
            ));
        }
    }

    let compressed = out.len() - start;
    log::trace!("deflate: {} -> {compressed} bytes", input.len());

    Ok(TransformResult {
        mode: Mode::Deflate,
        uncompressed_size,
        compressed_size: wire_len("deflate output", compressed)?,
        extra_size: 0,
    })
}

/// Inflate `payload` into exactly `expected` bytes.
pub fn decode(payload: &[u8], expected: u32) -> Result<Vec<u8>> {
    let expected = expected as usize;
    if expected > payload.len().saturating_mul(MAX_EXPANSION) {
        return Err(Error::compression(
            "deflate",
            "size check",
            format!(
                "{} input bytes cannot inflate to the declared {expected}",
                payload.len()
            ),
        ));
    }

    let mut out = Vec::with_capacity(expected);
    let mut stream = Decompress::new(true);

    let status = stream
        .decompress_vec(payload, &mut out, FlushDecompress::Finish)
        .map_err(|e| Error::compression("deflate", "data error", e.to_string()))?;

    match status {
        Status::StreamEnd if out.len() == expected => {
            log::trace!("deflate: {} -> {expected} bytes", payload.len());
            Ok(out)
        }
        Status::StreamEnd => Err(Error::compression(
            "deflate",
            "StreamEnd",
            format!("inflated {} bytes, header declares {expected}", out.len()),
        )),
        other if out.len() == expected => Err(Error::compression(
            "deflate",
            format!("{other:?}"),
            format!("stream continues past the declared {expected} bytes"),
        )),
        other => Err(Error::compression(
            "deflate",
            format!("{other:?}"),
            format!(
                "stream ended early after {} of {} input bytes ({} of {expected} output bytes)",
                stream.total_in(),
                payload.len(),
                out.len()
            ),
        )),
    }
}
