//! Decoder errors.
//!
//! Every fallible operation in this crate returns one variant of
//! [`PngErrors`]; there is no recovery inside the decoder and no
//! partial output. The messages mirror the wording callers will see
//! when they print a failed decode.

use core::fmt::{Debug, Display, Formatter};

/// Everything that can go wrong while decoding.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum PngErrors
{
    // caller/usage errors
    Invalid,
    OutOfMemory,
    Overflow,
    BadState,
    BufferSizeTooSmall,
    BufferAlreadySet,
    BadFormat,
    BadFlags,
    ChunkUnavailable,
    EncodeOnly,

    // file structure errors
    Signature,
    NoIhdr,
    IhdrSize,
    ChunkPos,
    ChunkSize,
    /// Stored checksum vs the one computed over `type || payload`.
    ChunkCrc(u32, u32),
    ChunkType,
    ChunkUnknownCritical,
    IdatTooShort,
    IdatStream,
    Zlib,
    /// Filter byte above 4.
    Filter(u8),
    /// Palette index at or past the palette length.
    PlteIdx(u8),

    // field-level errors
    Width,
    Height,
    UserWidth,
    UserHeight,
    BitDepth,
    ColorType,
    CompressionMethod,
    FilterMethod,
    InterlaceMethod,
    Chrm,
    Gama,
    Sbit,
    Srgb,
    Phys,
    Time,
    Offs,
    Exif,
    TransparencyColorType,
    TransparencyNoPalette,
    BkgdNoPalette,
    BkgdPaletteIdx,
    HistNoPalette,
    IccpName,
    SplTName,
    SplTDupName,
    SplTDepth,
    Text,
    TextKeyword,

    // duplicate singleton chunks
    DupPlte,
    DupChrm,
    DupGama,
    DupIccp,
    DupSbit,
    DupSrgb,
    DupBkgd,
    DupHist,
    DupTrns,
    DupPhys,
    DupTime,
    DupOffs,
    DupExif,

    // byte source errors
    SourceEnd,
    SourceError
}

impl PngErrors
{
    /// Short description of the error, independent of any payload.
    pub const fn strerror(self) -> &'static str
    {
        match self
        {
            PngErrors::Invalid => "invalid argument",
            PngErrors::OutOfMemory => "out of memory",
            PngErrors::Overflow => "arithmetic overflow",
            PngErrors::BadState => "non-recoverable state",
            PngErrors::BufferSizeTooSmall => "output buffer too small",
            PngErrors::BufferAlreadySet => "source already set",
            PngErrors::BadFormat => "invalid output format",
            PngErrors::BadFlags => "invalid decode flags",
            PngErrors::ChunkUnavailable => "chunk not present in file",
            PngErrors::EncodeOnly => "encode-only context",

            PngErrors::Signature => "invalid signature",
            PngErrors::NoIhdr => "missing IHDR chunk",
            PngErrors::IhdrSize => "invalid IHDR chunk size",
            PngErrors::ChunkPos => "invalid chunk position",
            PngErrors::ChunkSize => "invalid chunk length",
            PngErrors::ChunkCrc(..) => "invalid chunk checksum",
            PngErrors::ChunkType => "invalid chunk type",
            PngErrors::ChunkUnknownCritical => "unknown critical chunk",
            PngErrors::IdatTooShort => "IDAT stream too short",
            PngErrors::IdatStream => "IDAT stream error",
            PngErrors::Zlib => "zlib error",
            PngErrors::Filter(_) => "invalid scanline filter",
            PngErrors::PlteIdx(_) => "invalid palette index",

            PngErrors::Width => "invalid image width",
            PngErrors::Height => "invalid image height",
            PngErrors::UserWidth => "image width exceeds user limit",
            PngErrors::UserHeight => "image height exceeds user limit",
            PngErrors::BitDepth => "invalid bit depth",
            PngErrors::ColorType => "invalid color type",
            PngErrors::CompressionMethod => "invalid compression method",
            PngErrors::FilterMethod => "invalid filter method",
            PngErrors::InterlaceMethod => "invalid interlace method",
            PngErrors::Chrm => "invalid cHRM chunk",
            PngErrors::Gama => "invalid gAMA chunk",
            PngErrors::Sbit => "invalid sBIT chunk",
            PngErrors::Srgb => "invalid sRGB chunk",
            PngErrors::Phys => "invalid pHYs chunk",
            PngErrors::Time => "invalid tIME chunk",
            PngErrors::Offs => "invalid oFFs chunk",
            PngErrors::Exif => "invalid eXIf chunk",
            PngErrors::TransparencyColorType => "tRNS chunk with incompatible color type",
            PngErrors::TransparencyNoPalette => "missing palette for tRNS chunk",
            PngErrors::BkgdNoPalette => "missing palette for bKGD chunk",
            PngErrors::BkgdPaletteIdx => "invalid palette index for bKGD chunk",
            PngErrors::HistNoPalette => "missing palette for hIST chunk",
            PngErrors::IccpName => "invalid iCCP profile name",
            PngErrors::SplTName => "invalid suggested palette name",
            PngErrors::SplTDupName => "duplicate suggested palette name",
            PngErrors::SplTDepth => "invalid suggested palette sample depth",
            PngErrors::Text => "invalid text chunk",
            PngErrors::TextKeyword => "invalid text keyword",

            PngErrors::DupPlte => "duplicate PLTE chunk",
            PngErrors::DupChrm => "duplicate cHRM chunk",
            PngErrors::DupGama => "duplicate gAMA chunk",
            PngErrors::DupIccp => "duplicate iCCP chunk",
            PngErrors::DupSbit => "duplicate sBIT chunk",
            PngErrors::DupSrgb => "duplicate sRGB chunk",
            PngErrors::DupBkgd => "duplicate bKGD chunk",
            PngErrors::DupHist => "duplicate hIST chunk",
            PngErrors::DupTrns => "duplicate tRNS chunk",
            PngErrors::DupPhys => "duplicate pHYs chunk",
            PngErrors::DupTime => "duplicate tIME chunk",
            PngErrors::DupOffs => "duplicate oFFs chunk",
            PngErrors::DupExif => "duplicate eXIf chunk",

            PngErrors::SourceEnd => "end of stream",
            PngErrors::SourceError => "stream error"
        }
    }
}

impl Debug for PngErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        match self
        {
            PngErrors::ChunkCrc(stored, computed) =>
            {
                write!(
                    f,
                    "invalid chunk checksum, stored {stored:08x} but computed {computed:08x}"
                )
            }
            PngErrors::Filter(filter) =>
            {
                write!(f, "invalid scanline filter {filter}, expected 0..=4")
            }
            PngErrors::PlteIdx(idx) =>
            {
                write!(f, "palette index {idx} out of range")
            }
            other => f.write_str(other.strerror())
        }
    }
}

impl Display for PngErrors
{
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result
    {
        Debug::fmt(self, f)
    }
}

impl std::error::Error for PngErrors {}
