//! A streaming PNG decoder.
//!
//! The decoder pulls bytes from a borrowed buffer or a caller-supplied
//! read callback, validates the chunk stream as it goes (ordering,
//! duplication, sizes, checksums), and decodes the image in scanline
//! strides straight into the caller's output buffer as RGBA8 or
//! native-endian RGBA16.
//!
//! Supported on the way through: all five colour types at every legal
//! bit depth, Adam7 interlacing, transparency keying, significant-bit
//! rescaling and gamma correction.
//!
//! ```no_run
//! use streampng::{DecodeFlags, OutputFormat, PngDecoder};
//!
//! let data = std::fs::read("image.png").unwrap();
//!
//! let mut decoder = PngDecoder::new();
//! decoder.set_source_buffer(&data).unwrap();
//!
//! let header = decoder.get_header().unwrap();
//! println!("{}x{}", header.width, header.height);
//!
//! let pixels = decoder
//!     .decode(OutputFormat::RGBA8, DecodeFlags::new().with_transparency())
//!     .unwrap();
//! ```

mod chunks;
mod constants;
mod decoder;
mod enums;
mod error;
mod filters;
mod headers;
mod options;
mod reader;
mod source;
mod transform;

pub use crate::chunks::{
    Background, Chrm, ChrmInt, ImageOffset, PLTEEntry, PhysicalDims, PngInfo, SignificantBits,
    SpltEntry, SuggestedPalette, TimeStamp, Transparency
};
pub use crate::decoder::PngDecoder;
pub use crate::enums::{CrcAction, DecodeFlags, InterlaceMethod, OutputFormat, PngColor};
pub use crate::error::PngErrors;
pub use crate::options::DecoderOptions;
pub use crate::source::ReadFn;
