//! In-memory PNG builder shared by the integration tests.
//!
//! Chunks are assembled with real checksums and payloads deflated
//! with miniz_oxide, so the decoder sees byte streams shaped exactly
//! like files from a conforming encoder.

#![allow(dead_code)]

use miniz_oxide::deflate::compress_to_vec_zlib;

pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

const ADAM7_X_START: [usize; 7] = [0, 4, 0, 2, 0, 1, 0];
const ADAM7_Y_START: [usize; 7] = [0, 0, 4, 0, 2, 0, 1];
const ADAM7_X_DELTA: [usize; 7] = [8, 8, 4, 4, 2, 2, 1];
const ADAM7_Y_DELTA: [usize; 7] = [8, 8, 8, 4, 4, 2, 2];

/// One wire-format chunk with a correct CRC.
pub fn chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8>
{
    let mut out = Vec::with_capacity(12 + payload.len());

    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(payload);

    let mut hasher = crc32fast::Hasher::new();

    hasher.update(chunk_type);
    hasher.update(payload);

    out.extend_from_slice(&hasher.finalize().to_be_bytes());

    out
}

pub fn ihdr(width: u32, height: u32, depth: u8, color_type: u8, interlace: u8) -> Vec<u8>
{
    let mut payload = Vec::with_capacity(13);

    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&[depth, color_type, 0, 0, interlace]);

    chunk(b"IHDR", &payload)
}

pub fn plte(entries: &[[u8; 3]]) -> Vec<u8>
{
    let payload: Vec<u8> = entries.iter().flatten().copied().collect();

    chunk(b"PLTE", &payload)
}

/// Deflate `raw` (filter bytes included) into a single IDAT chunk.
pub fn idat(raw: &[u8]) -> Vec<u8>
{
    chunk(b"IDAT", &compress_to_vec_zlib(raw, 6))
}

pub fn iend() -> Vec<u8>
{
    chunk(b"IEND", &[])
}

/// Signature plus the given chunks.
pub fn png(parts: &[Vec<u8>]) -> Vec<u8>
{
    let mut out = SIGNATURE.to_vec();

    for part in parts
    {
        out.extend_from_slice(part);
    }

    out
}

/// Prefix every row with a None filter byte.
pub fn scanlines(rows: &[&[u8]]) -> Vec<u8>
{
    let mut out = Vec::new();

    for row in rows
    {
        out.push(0);
        out.extend_from_slice(row);
    }

    out
}

/// Raw (pre-compression) Adam7 raster for a whole-byte-pixel image:
/// every pass's rows in order, each with a None filter byte.
pub fn adam7_raster(pixels: &[u8], width: usize, height: usize, pixel_bytes: usize) -> Vec<u8>
{
    let mut out = Vec::new();

    for pass in 0..7
    {
        let mut y = ADAM7_Y_START[pass];

        while y < height
        {
            let mut row = Vec::new();
            let mut x = ADAM7_X_START[pass];

            while x < width
            {
                let offset = (y * width + x) * pixel_bytes;

                row.extend_from_slice(&pixels[offset..offset + pixel_bytes]);
                x += ADAM7_X_DELTA[pass];
            }

            if !row.is_empty()
            {
                out.push(0);
                out.extend_from_slice(&row);
            }
            y += ADAM7_Y_DELTA[pass];
        }
    }

    out
}
