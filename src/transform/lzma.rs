// LZMA mode via lzma-rs.
//
// lzma-rs emits the classic `.lzma` stream: 5 bytes of properties, an
// 8-byte unpacked size (all ones when unknown), then the range-coded body
// terminated by an end marker. The properties travel in the block's extra
// region and the body is the payload; the size field is not stored since
// the header already carries the uncompressed length.
//
// Decoding hands that length to lzma-rs, which stops after exactly that
// many bytes. Bodies with or without an end marker decode the same way.

use std::io::{self, Read};

use lzma_rs::decompress::{Options, UnpackedSize};

use crate::error::{Error, Result, wire_len};
use crate::format::header::{LZMA_PROPS_SIZE, Mode};

use super::TransformResult;

/// Width of the unpacked-size field in a `.lzma` stream header.
const SIZE_FIELD_LEN: usize = 8;

/// Cap on the up-front output allocation; larger outputs grow on demand.
const MAX_PREALLOC: usize = 64 << 20;

/// Initial capacity for `len` input bytes: the input plus its properties.
#[inline]
pub fn compress_bound(len: usize) -> usize {
    len.saturating_add(LZMA_PROPS_SIZE)
}

/// Compress `input`, appending `[properties][body]` to `out`.
///
/// lzma-rs has a single encoder profile, so `level` is accepted for
/// interface symmetry and otherwise unused.
pub fn encode(input: &[u8], level: u32, out: &mut Vec<u8>) -> Result<TransformResult> {
    let uncompressed_size = wire_len("lzma input", input.len())?;

    let mut stream = Vec::with_capacity(compress_bound(input.len()) + SIZE_FIELD_LEN);
    lzma_rs::lzma_compress(&mut io::Cursor::new(input), &mut stream)
        .map_err(|e| Error::compression("lzma", "encoder error", e.to_string()))?;

    if stream.len() < LZMA_PROPS_SIZE + SIZE_FIELD_LEN {
        return Err(Error::compression(
            "lzma",
            "short stream",
            format!("encoder produced only {} bytes", stream.len()),
        ));
    }

    let (props, rest) = stream.split_at(LZMA_PROPS_SIZE);
    let body = &rest[SIZE_FIELD_LEN..];
    let compressed_size = wire_len("lzma output", body.len())?;

    out.reserve(LZMA_PROPS_SIZE + body.len());
    out.extend_from_slice(props);
    out.extend_from_slice(body);

    log::trace!("lzma: {} -> {} bytes (level {level} ignored)", input.len(), body.len());

    Ok(TransformResult {
        mode: Mode::Lzma,
        uncompressed_size,
        compressed_size,
        extra_size: LZMA_PROPS_SIZE as u32,
    })
}

/// Decompress `payload` using `props` into exactly `expected` bytes.
pub fn decode(props: &[u8], payload: &[u8], expected: u32) -> Result<Vec<u8>> {
    if props.len() != LZMA_PROPS_SIZE {
        return Err(Error::compression(
            "lzma",
            "bad properties",
            format!("expected {LZMA_PROPS_SIZE} property bytes, got {}", props.len()),
        ));
    }

    // No size field between properties and body: the header's length is
    // the unpacked size, so output is bounded by the declaration.
    let options = Options {
        unpacked_size: UnpackedSize::UseProvided(Some(expected as u64)),
        ..Options::default()
    };

    let mut reader = props.chain(payload);
    let mut out = Vec::with_capacity((expected as usize).min(MAX_PREALLOC));
    lzma_rs::lzma_decompress_with_options(&mut reader, &mut out, &options)
        .map_err(|e| Error::compression("lzma", "decoder error", e.to_string()))?;

    if out.len() as u64 != expected as u64 {
        return Err(Error::LengthMismatch {
            stage: "lzma",
            expected: expected as u64,
            actual: out.len() as u64,
        });
    }

    log::trace!("lzma: {} -> {expected} bytes", payload.len());
    Ok(out)
}
