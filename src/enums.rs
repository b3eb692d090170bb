//! Small enums describing the wire format and the caller-facing knobs.

/// Chunk types the decoder understands.
///
/// Everything else falls under `unkn` and is handled by the
/// critical/private-bit rules.
#[allow(non_camel_case_types)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PngChunkType
{
    IHDR,
    PLTE,
    IDAT,
    IEND,
    tRNS,
    cHRM,
    gAMA,
    iCCP,
    sBIT,
    sRGB,
    tEXt,
    zTXt,
    iTXt,
    bKGD,
    hIST,
    pHYs,
    sPLT,
    tIME,
    oFFs,
    eXIf,
    unkn
}

impl PngChunkType
{
    pub fn from_bytes(bytes: &[u8; 4]) -> PngChunkType
    {
        match bytes
        {
            b"IHDR" => PngChunkType::IHDR,
            b"PLTE" => PngChunkType::PLTE,
            b"IDAT" => PngChunkType::IDAT,
            b"IEND" => PngChunkType::IEND,
            b"tRNS" => PngChunkType::tRNS,
            b"cHRM" => PngChunkType::cHRM,
            b"gAMA" => PngChunkType::gAMA,
            b"iCCP" => PngChunkType::iCCP,
            b"sBIT" => PngChunkType::sBIT,
            b"sRGB" => PngChunkType::sRGB,
            b"tEXt" => PngChunkType::tEXt,
            b"zTXt" => PngChunkType::zTXt,
            b"iTXt" => PngChunkType::iTXt,
            b"bKGD" => PngChunkType::bKGD,
            b"hIST" => PngChunkType::hIST,
            b"pHYs" => PngChunkType::pHYs,
            b"sPLT" => PngChunkType::sPLT,
            b"tIME" => PngChunkType::tIME,
            b"oFFs" => PngChunkType::oFFs,
            b"eXIf" => PngChunkType::eXIf,
            _ => PngChunkType::unkn
        }
    }
}

/// PNG colour types from the IHDR chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PngColor
{
    /// Grayscale, colour type 0
    Luma,
    /// Truecolour, colour type 2
    RGB,
    /// Indexed colour, colour type 3
    Palette,
    /// Grayscale with alpha, colour type 4
    LumaA,
    /// Truecolour with alpha, colour type 6
    RGBA,
    #[default]
    Unknown
}

impl PngColor
{
    pub(crate) fn from_int(int: u8) -> Option<PngColor>
    {
        match int
        {
            0 => Some(PngColor::Luma),
            2 => Some(PngColor::RGB),
            3 => Some(PngColor::Palette),
            4 => Some(PngColor::LumaA),
            6 => Some(PngColor::RGBA),
            _ => None
        }
    }
    pub(crate) const fn num_components(self) -> u8
    {
        match self
        {
            PngColor::Luma | PngColor::Palette => 1,
            PngColor::LumaA => 2,
            PngColor::RGB => 3,
            PngColor::RGBA => 4,
            PngColor::Unknown => 0
        }
    }
}

/// Scanline filter types, one byte before every row of samples.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FilterType
{
    None,
    Sub,
    Up,
    Average,
    Paeth
}

impl FilterType
{
    pub fn from_int(int: u8) -> Option<FilterType>
    {
        match int
        {
            0 => Some(FilterType::None),
            1 => Some(FilterType::Sub),
            2 => Some(FilterType::Up),
            3 => Some(FilterType::Average),
            4 => Some(FilterType::Paeth),
            _ => None
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum InterlaceMethod
{
    #[default]
    Standard,
    Adam7
}

/// Host formats a decode can emit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat
{
    /// Four bytes per pixel, R,G,B,A byte order.
    RGBA8,
    /// Eight bytes per pixel, four native-endian `u16`s.
    RGBA16
}

impl OutputFormat
{
    pub const fn pixel_size(self) -> usize
    {
        match self
        {
            OutputFormat::RGBA8 => 4,
            OutputFormat::RGBA16 => 8
        }
    }
    pub(crate) const fn depth(self) -> u8
    {
        match self
        {
            OutputFormat::RGBA8 => 8,
            OutputFormat::RGBA16 => 16
        }
    }
}

/// What to do with a chunk's CRC, configured separately for critical
/// and ancillary chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum CrcAction
{
    /// Verify the checksum, mismatch is an error. The default.
    #[default]
    Use,
    /// Consume the checksum without verifying it.
    Skip,
    /// On mismatch drop the chunk as if it were absent.
    ///
    /// Only valid for ancillary chunks.
    Discard
}

/// Optional transforms applied during [`decode_image`](crate::PngDecoder::decode_image).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeFlags
{
    /// Key out the tRNS transparency colour into the alpha channel.
    pub use_transparency: bool,
    /// Run R,G,B samples through the gAMA-derived lookup table.
    pub use_gamma:        bool,
    /// Rescale samples from their sBIT significant-bit counts.
    pub use_sbit:         bool
}

impl DecodeFlags
{
    pub const fn new() -> DecodeFlags
    {
        DecodeFlags {
            use_transparency: false,
            use_gamma:        false,
            use_sbit:         false
        }
    }
    pub const fn with_transparency(mut self) -> DecodeFlags
    {
        self.use_transparency = true;
        self
    }
    pub const fn with_gamma(mut self) -> DecodeFlags
    {
        self.use_gamma = true;
        self
    }
    pub const fn with_sbit(mut self) -> DecodeFlags
    {
        self.use_sbit = true;
        self
    }
}
