//! Decoder configuration.

use crate::constants::PNG_U32_MAX;
use crate::enums::CrcAction;
use crate::error::PngErrors;

/// Limits and policies a [`PngDecoder`](crate::PngDecoder) is created
/// with.
///
/// The defaults accept any standard-conforming PNG: dimensions up to
/// 2³¹−1, chunks up to 2³¹−1 bytes, an unbounded chunk cache and full
/// CRC verification.
#[derive(Copy, Clone, Debug)]
pub struct DecoderOptions
{
    pub(crate) max_width:         u32,
    pub(crate) max_height:        u32,
    pub(crate) max_chunk_size:    u32,
    pub(crate) chunk_cache_limit: usize,
    pub(crate) crc_critical:      CrcAction,
    pub(crate) crc_ancillary:     CrcAction
}

impl Default for DecoderOptions
{
    fn default() -> DecoderOptions
    {
        DecoderOptions {
            max_width:         PNG_U32_MAX,
            max_height:        PNG_U32_MAX,
            max_chunk_size:    PNG_U32_MAX,
            chunk_cache_limit: usize::MAX,
            crc_critical:      CrcAction::Use,
            crc_ancillary:     CrcAction::Use
        }
    }
}

impl DecoderOptions
{
    pub fn new() -> DecoderOptions
    {
        DecoderOptions::default()
    }

    /// Cap the image dimensions the decoder will accept.
    ///
    /// A file whose IHDR exceeds these fails with
    /// [`UserWidth`](PngErrors::UserWidth) /
    /// [`UserHeight`](PngErrors::UserHeight).
    pub fn set_max_dimensions(mut self, width: u32, height: u32) -> Result<Self, PngErrors>
    {
        if width > PNG_U32_MAX || height > PNG_U32_MAX
        {
            return Err(PngErrors::Invalid);
        }
        self.max_width = width;
        self.max_height = height;

        Ok(self)
    }

    /// Cap single-chunk length and the aggregate bytes of cached
    /// ancillary payloads.
    ///
    /// A chunk longer than `max_chunk_size` fails with
    /// [`ChunkSize`](PngErrors::ChunkSize); an ancillary chunk that
    /// does not fit the remaining cache budget is skipped silently.
    pub fn set_chunk_limits(
        mut self, max_chunk_size: u32, chunk_cache_limit: usize
    ) -> Result<Self, PngErrors>
    {
        if max_chunk_size > PNG_U32_MAX
        {
            return Err(PngErrors::Invalid);
        }
        self.max_chunk_size = max_chunk_size;
        self.chunk_cache_limit = chunk_cache_limit;

        Ok(self)
    }

    /// Choose the CRC handling for critical and ancillary chunks.
    ///
    /// [`CrcAction::Discard`] is only meaningful for ancillary chunks;
    /// requesting it for critical ones fails with
    /// [`Invalid`](PngErrors::Invalid).
    pub fn set_crc_action(
        mut self, critical: CrcAction, ancillary: CrcAction
    ) -> Result<Self, PngErrors>
    {
        if critical == CrcAction::Discard
        {
            return Err(PngErrors::Invalid);
        }
        self.crc_critical = critical;
        self.crc_ancillary = ancillary;

        Ok(self)
    }
}
