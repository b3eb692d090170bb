//! The chunk reader.
//!
//! PNG files after the signature are a flat sequence of
//! `{length, type, payload, crc}` records. The reader keeps exactly one
//! chunk's state at a time: its header, how much payload is left, and a
//! running CRC-32 over `type || payload`. The trailing checksum is
//! consumed either explicitly through [`finish_chunk`] or lazily by the
//! next [`read_chunk_header`] call, whichever comes first.
//!
//! [`finish_chunk`]: PngDecoder::finish_chunk
//! [`read_chunk_header`]: PngDecoder::read_chunk_header

use crc32fast::Hasher;

use crate::constants::{PNG_U32_MAX, READ_SIZE};
use crate::decoder::PngDecoder;
use crate::enums::{CrcAction, PngChunkType};
use crate::error::PngErrors;

/// Header of the chunk currently being read.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PngChunk
{
    /// Byte offset of the length field from the start of the file.
    pub offset:     u64,
    pub length:     usize,
    pub chunk_type: PngChunkType,
    pub chunk:      [u8; 4]
}

impl Default for PngChunk
{
    fn default() -> PngChunk
    {
        PngChunk {
            offset:     0,
            length:     0,
            chunk_type: PngChunkType::unkn,
            chunk:      [0; 4]
        }
    }
}

/// Critical chunks have bit 5 of the first type byte clear.
pub(crate) const fn is_critical_chunk(chunk: &[u8; 4]) -> bool
{
    chunk[0] & (1 << 5) == 0
}

/// Private chunks have bit 5 of the second type byte set, decoders
/// skip them.
pub(crate) const fn is_private_chunk(chunk: &[u8; 4]) -> bool
{
    chunk[1] & (1 << 5) != 0
}

/// The reserved bit is bit 5 of the third type byte and must be zero.
pub(crate) const fn reserved_bit_set(chunk: &[u8; 4]) -> bool
{
    chunk[2] & (1 << 5) != 0
}

impl<'a> PngDecoder<'a>
{
    /// Pull `n` raw bytes from the source into the scratch buffer.
    pub(crate) fn read_data(&mut self, n: usize) -> Result<(), PngErrors>
    {
        let data = self.source.read_exact(n)?;

        self.buf.clear();
        self.buf.extend_from_slice(data);

        Ok(())
    }

    /// CRC action for the chunk currently being read.
    fn crc_action(&self) -> CrcAction
    {
        if is_critical_chunk(&self.current_chunk.chunk)
        {
            self.options.crc_critical
        }
        else
        {
            self.options.crc_ancillary
        }
    }

    /// Finalize the previous chunk, then read the next 8-byte chunk
    /// header.
    pub(crate) fn read_chunk_header(&mut self) -> Result<PngChunk, PngErrors>
    {
        if self.crc_pending
        {
            // Lazily consumed checksum, e.g. the last IDAT after the
            // image ended. A discard signal is meaningless here since
            // the payload was already used.
            self.finish_chunk()?;
        }

        let header: [u8; 8] = self.source.read_exact(8)?.try_into().unwrap();

        let length = u32::from_be_bytes(header[0..4].try_into().unwrap());
        let chunk_bytes: [u8; 4] = header[4..8].try_into().unwrap();

        if length > PNG_U32_MAX || length > self.options.max_chunk_size
        {
            return Err(PngErrors::ChunkSize);
        }

        let chunk = PngChunk {
            offset:     self.source.bytes_read() - 8,
            length:     length as usize,
            chunk_type: PngChunkType::from_bytes(&chunk_bytes),
            chunk:      chunk_bytes
        };

        self.current_chunk = chunk;
        self.chunk_bytes_left = chunk.length;
        self.crc_pending = true;

        self.running_crc = Hasher::new();
        self.running_crc.update(&chunk_bytes);

        Ok(chunk)
    }

    /// Consume `n` payload bytes of the current chunk into the scratch
    /// buffer, updating the running CRC.
    pub(crate) fn read_chunk_bytes(&mut self, n: usize) -> Result<(), PngErrors>
    {
        if n > self.chunk_bytes_left
        {
            return Err(PngErrors::Invalid);
        }

        self.read_data(n)?;

        if self.crc_action() != CrcAction::Skip
        {
            self.running_crc.update(&self.buf);
        }
        self.chunk_bytes_left -= n;

        Ok(())
    }

    /// Consume payload bytes without keeping them, in bounded slices
    /// so streaming sources never see a huge single pull.
    pub(crate) fn discard_chunk_bytes(&mut self, mut n: usize) -> Result<(), PngErrors>
    {
        while n > 0
        {
            let len = n.min(READ_SIZE);

            self.read_chunk_bytes(len)?;
            n -= len;
        }

        Ok(())
    }

    /// Read the trailing checksum of the current chunk and apply the
    /// configured CRC action.
    ///
    /// Returns `true` when the ancillary `Discard` action fired and the
    /// caller should drop whatever it buffered for this chunk.
    pub(crate) fn finish_chunk(&mut self) -> Result<bool, PngErrors>
    {
        debug_assert_eq!(self.chunk_bytes_left, 0);

        let crc_bytes: [u8; 4] = self.source.read_exact(4)?.try_into().unwrap();
        let stored = u32::from_be_bytes(crc_bytes);

        self.crc_pending = false;

        match self.crc_action()
        {
            CrcAction::Skip => Ok(false),
            action =>
            {
                let computed = self.running_crc.clone().finalize();

                if stored != computed
                {
                    if action == CrcAction::Discard
                    {
                        return Ok(true);
                    }
                    return Err(PngErrors::ChunkCrc(stored, computed));
                }

                Ok(false)
            }
        }
    }
}
