//! Typed records for the standard chunks.
//!
//! Each record stores the parsed, validated value of one chunk; the
//! decoder keeps a presence flag next to each so accessors can tell
//! "absent" from "zero".

use crate::enums::{InterlaceMethod, PngColor};

/// Parsed IHDR contents.
///
/// Compression and filter methods are validated to be zero at parse
/// time and not stored.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PngInfo
{
    pub width:            usize,
    pub height:           usize,
    pub depth:            u8,
    pub color:            PngColor,
    pub component:        u8,
    pub interlace_method: InterlaceMethod
}

/// A palette entry.
///
/// The alpha field is filled in from the tRNS chunk right before
/// decoding; until then it is 255.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PLTEEntry
{
    pub red:   u8,
    pub green: u8,
    pub blue:  u8,
    pub alpha: u8
}

impl Default for PLTEEntry
{
    fn default() -> Self
    {
        // a tRNS chunk may contain fewer values than there are palette
        // entries, remaining entries are fully opaque
        PLTEEntry {
            red:   0,
            green: 0,
            blue:  0,
            alpha: 255
        }
    }
}

/// tRNS contents, variant chosen by the IHDR colour type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transparency
{
    /// Single grey sample that becomes fully transparent.
    Luma(u16),
    /// RGB triple that becomes fully transparent.
    Rgb
    {
        red: u16, green: u16, blue: u16
    },
    /// Per-palette-entry alpha values, at most one per entry.
    Palette(Vec<u8>)
}

/// bKGD contents, variant chosen by the IHDR colour type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Background
{
    Luma(u16),
    Rgb
    {
        red: u16, green: u16, blue: u16
    },
    PaletteIndex(u8)
}

/// sBIT contents, variant chosen by the IHDR colour type.
///
/// Indexed images use the `Rgb` variant against a depth of 8.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SignificantBits
{
    Luma
    {
        gray: u8
    },
    Rgb
    {
        red: u8, green: u8, blue: u8
    },
    LumaA
    {
        gray: u8, alpha: u8
    },
    Rgba
    {
        red: u8, green: u8, blue: u8, alpha: u8
    }
}

/// cHRM contents as stored in the file, each value is the CIE
/// coordinate times 100000.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChrmInt
{
    pub white_point_x: u32,
    pub white_point_y: u32,
    pub red_x:         u32,
    pub red_y:         u32,
    pub green_x:       u32,
    pub green_y:       u32,
    pub blue_x:        u32,
    pub blue_y:        u32
}

/// cHRM contents as floating point coordinates, derived from
/// [`ChrmInt`].
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct Chrm
{
    pub white_point_x: f64,
    pub white_point_y: f64,
    pub red_x:         f64,
    pub red_y:         f64,
    pub green_x:       f64,
    pub green_y:       f64,
    pub blue_x:        f64,
    pub blue_y:        f64
}

impl From<ChrmInt> for Chrm
{
    fn from(c: ChrmInt) -> Chrm
    {
        Chrm {
            white_point_x: f64::from(c.white_point_x) / 100_000.0,
            white_point_y: f64::from(c.white_point_y) / 100_000.0,
            red_x:         f64::from(c.red_x) / 100_000.0,
            red_y:         f64::from(c.red_y) / 100_000.0,
            green_x:       f64::from(c.green_x) / 100_000.0,
            green_y:       f64::from(c.green_y) / 100_000.0,
            blue_x:        f64::from(c.blue_x) / 100_000.0,
            blue_y:        f64::from(c.blue_y) / 100_000.0
        }
    }
}

/// pHYs contents.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PhysicalDims
{
    pub ppu_x:          u32,
    pub ppu_y:          u32,
    /// 0 for unknown, 1 for metres.
    pub unit_specifier: u8
}

/// One entry of a suggested palette.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SpltEntry
{
    pub red:       u16,
    pub green:     u16,
    pub blue:      u16,
    pub alpha:     u16,
    pub frequency: u16
}

/// An sPLT chunk: a named suggested palette.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPalette
{
    pub name:         String,
    /// 8 or 16.
    pub sample_depth: u8,
    pub entries:      Vec<SpltEntry>
}

/// tIME contents.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct TimeStamp
{
    pub year:   u16,
    pub month:  u8,
    pub day:    u8,
    pub hour:   u8,
    pub minute: u8,
    /// 60 is allowed for leap seconds.
    pub second: u8
}

/// oFFs contents.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ImageOffset
{
    pub x:              i32,
    pub y:              i32,
    /// 0 for pixels, 1 for micrometres.
    pub unit_specifier: u8
}
