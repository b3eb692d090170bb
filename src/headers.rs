//! Metadata parsing and validation.
//!
//! The pre-IDAT walk reads every chunk up to (but not including) the
//! first IDAT, enforcing ordering, duplication, size and semantic
//! rules as it goes. The post-IDAT walk runs after the image has been
//! decoded and validates the trailer up to IEND. Both leave their
//! results in the decoder's typed records.

use crc32fast::Hasher;
use log::{debug, trace, warn};

use crate::chunks::{
    Background, Chrm, ChrmInt, ImageOffset, PLTEEntry, PhysicalDims, PngInfo, SignificantBits,
    SpltEntry, SuggestedPalette, TimeStamp, Transparency
};
use crate::constants::{EXIF_BE, EXIF_LE, PNG_S32_MIN, PNG_SIGNATURE, PNG_U32_MAX};
use crate::decoder::PngDecoder;
use crate::enums::{InterlaceMethod, PngChunkType, PngColor};
use crate::error::PngErrors;
use crate::reader::{is_critical_chunk, is_private_chunk, reserved_bit_set, PngChunk};

fn read_u16_be(data: &[u8], offset: usize) -> u16
{
    u16::from_be_bytes(data[offset..offset + 2].try_into().unwrap())
}

fn read_u32_be(data: &[u8], offset: usize) -> u32
{
    u32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
}

fn read_i32_be(data: &[u8], offset: usize) -> i32
{
    i32::from_be_bytes(data[offset..offset + 4].try_into().unwrap())
}

/// Samples stored below 16 bits only use the low `depth` bits.
const fn sample_mask(depth: u8) -> u16
{
    if depth < 16
    {
        (1 << depth) - 1
    }
    else
    {
        u16::MAX
    }
}

/// Validate a PNG keyword: 1..=79 bytes from the printable Latin-1
/// set, no leading, trailing or consecutive spaces.
pub(crate) fn check_png_keyword(keyword: &[u8]) -> bool
{
    if keyword.is_empty() || keyword.len() > 79
    {
        return false;
    }
    if keyword[0] == b' ' || keyword[keyword.len() - 1] == b' '
    {
        return false;
    }
    if keyword.windows(2).any(|pair| pair == b"  ")
    {
        return false;
    }

    keyword
        .iter()
        .all(|&c| (32..=126).contains(&c) || c >= 161)
}

pub(crate) fn check_time(time: &TimeStamp) -> bool
{
    time.month >= 1
        && time.month <= 12
        && time.day >= 1
        && time.day <= 31
        && time.hour <= 23
        && time.minute <= 59
        && time.second <= 60
}

pub(crate) fn check_chrm_int(chrm: &ChrmInt) -> bool
{
    [
        chrm.white_point_x,
        chrm.white_point_y,
        chrm.red_x,
        chrm.red_y,
        chrm.green_x,
        chrm.green_y,
        chrm.blue_x,
        chrm.blue_y
    ]
    .iter()
    .all(|&v| v <= PNG_U32_MAX)
}

pub(crate) fn check_phys(phys: &PhysicalDims) -> bool
{
    phys.unit_specifier <= 1 && phys.ppu_x <= PNG_U32_MAX && phys.ppu_y <= PNG_U32_MAX
}

pub(crate) fn check_offs(offs: &ImageOffset) -> bool
{
    offs.x >= PNG_S32_MIN && offs.y >= PNG_S32_MIN && offs.unit_specifier <= 1
}

pub(crate) fn check_exif(data: &[u8]) -> bool
{
    data.len() >= 4 && (data[0..4] == EXIF_LE || data[0..4] == EXIF_BE)
}

/// Validate significant-bit counts against the colour type: every
/// count at least 1 and at most the channel's storage depth (8 for
/// indexed images).
pub(crate) fn check_sbit(sbit: &SignificantBits, color: PngColor, depth: u8) -> bool
{
    let in_range = |bits: u8, cap: u8| bits >= 1 && bits <= cap;

    match (sbit, color)
    {
        (SignificantBits::Luma { gray }, PngColor::Luma) => in_range(*gray, depth),
        (SignificantBits::Rgb { red, green, blue }, PngColor::RGB | PngColor::Palette) =>
        {
            let cap = if color == PngColor::Palette { 8 } else { depth };

            in_range(*red, cap) && in_range(*green, cap) && in_range(*blue, cap)
        }
        (SignificantBits::LumaA { gray, alpha }, PngColor::LumaA) =>
        {
            in_range(*gray, depth) && in_range(*alpha, depth)
        }
        (
            SignificantBits::Rgba {
                red,
                green,
                blue,
                alpha
            },
            PngColor::RGBA
        ) =>
        {
            in_range(*red, depth)
                && in_range(*green, depth)
                && in_range(*blue, depth)
                && in_range(*alpha, depth)
        }
        _ => false
    }
}

impl<'a> PngDecoder<'a>
{
    /// Parse and validate everything up to the first IDAT chunk.
    ///
    /// Idempotent; every metadata accessor calls this lazily. A
    /// failure permanently poisons the decoder.
    pub fn decode_headers(&mut self) -> Result<(), PngErrors>
    {
        if !self.valid_state
        {
            return Err(PngErrors::BadState);
        }
        if self.seen_headers
        {
            return Ok(());
        }
        if !self.source.is_set()
        {
            return Err(PngErrors::Invalid);
        }

        match self.decode_headers_inner()
        {
            Ok(()) =>
            {
                self.seen_headers = true;
                Ok(())
            }
            Err(e) =>
            {
                self.valid_state = false;
                Err(e)
            }
        }
    }

    fn decode_headers_inner(&mut self) -> Result<(), PngErrors>
    {
        self.read_data(8)?;

        if self.buf[0..8] != PNG_SIGNATURE
        {
            return Err(PngErrors::Signature);
        }

        // IHDR chunk header and payload in one pull; the IHDR
        // checksum is validated when the next chunk header is read
        self.read_data(8 + 13)?;

        let ihdr_length = read_u32_be(&self.buf, 0);

        if ihdr_length != 13
        {
            return Err(PngErrors::IhdrSize);
        }
        if &self.buf[4..8] != b"IHDR"
        {
            return Err(PngErrors::NoIhdr);
        }

        let mut running_crc = Hasher::new();

        running_crc.update(&self.buf[4..21]);

        self.running_crc = running_crc;
        self.crc_pending = true;
        self.chunk_bytes_left = 0;
        self.current_chunk = PngChunk {
            offset:     8,
            length:     13,
            chunk_type: PngChunkType::IHDR,
            chunk:      *b"IHDR"
        };

        let width = read_u32_be(&self.buf, 8);
        let height = read_u32_be(&self.buf, 12);
        let depth = self.buf[16];
        let color_int = self.buf[17];
        let compression_method = self.buf[18];
        let filter_method = self.buf[19];
        let interlace_int = self.buf[20];

        self.parse_ihdr_fields(
            width,
            height,
            depth,
            color_int,
            compression_method,
            filter_method,
            interlace_int
        )?;

        loop
        {
            let chunk = self.read_chunk_header()?;

            if chunk.chunk_type == PngChunkType::IDAT
            {
                debug!(
                    "headers complete, first IDAT at offset {}",
                    chunk.offset
                );
                self.first_idat = Some(chunk);

                return Ok(());
            }

            if !self.chunk_fits_in_cache(chunk.length)
            {
                warn!(
                    "skipping {} byte chunk {:?}, chunk cache limit reached",
                    chunk.length, chunk.chunk_type
                );
                self.discard_chunk_bytes(chunk.length)?;
                self.finish_chunk()?;

                continue;
            }

            self.read_chunk_bytes(chunk.length)?;

            if self.finish_chunk()?
            {
                // ancillary Discard action fired, drop the chunk
                trace!("discarding chunk {:?} on checksum mismatch", chunk.chunk_type);
                continue;
            }

            if reserved_bit_set(&chunk.chunk)
            {
                return Err(PngErrors::ChunkType);
            }
            if is_private_chunk(&chunk.chunk)
            {
                trace!("skipping private chunk {:?}", chunk.chunk);
                continue;
            }

            if is_critical_chunk(&chunk.chunk)
            {
                match chunk.chunk_type
                {
                    PngChunkType::PLTE => self.parse_plte(&chunk)?,
                    PngChunkType::IHDR | PngChunkType::IEND =>
                    {
                        return Err(PngErrors::ChunkPos);
                    }
                    _ => return Err(PngErrors::ChunkUnknownCritical)
                }

                continue;
            }

            match chunk.chunk_type
            {
                PngChunkType::cHRM => self.parse_chrm(&chunk)?,
                PngChunkType::gAMA => self.parse_gama(&chunk)?,
                PngChunkType::iCCP => self.parse_iccp(&chunk)?,
                PngChunkType::sBIT => self.parse_sbit(&chunk)?,
                PngChunkType::sRGB => self.parse_srgb(&chunk)?,
                PngChunkType::bKGD => self.parse_bkgd(&chunk)?,
                PngChunkType::hIST => self.parse_hist(&chunk)?,
                PngChunkType::tRNS => self.parse_trns(&chunk)?,
                PngChunkType::pHYs => self.parse_phys(&chunk)?,
                PngChunkType::sPLT => self.parse_splt(&chunk)?,
                PngChunkType::tIME => self.parse_time(&chunk)?,
                PngChunkType::oFFs => self.parse_offs(&chunk)?,
                PngChunkType::eXIf => self.parse_exif(&chunk)?,
                PngChunkType::tEXt | PngChunkType::zTXt | PngChunkType::iTXt =>
                {
                    self.file_text = true;
                }
                _ =>
                {
                    trace!("skipping unknown ancillary chunk {:?}", chunk.chunk);
                }
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_ihdr_fields(
        &mut self, width: u32, height: u32, depth: u8, color_int: u8, compression_method: u8,
        filter_method: u8, interlace_int: u8
    ) -> Result<(), PngErrors>
    {
        if width == 0 || width > PNG_U32_MAX
        {
            return Err(PngErrors::Width);
        }
        if width > self.options.max_width
        {
            return Err(PngErrors::UserWidth);
        }
        if height == 0 || height > PNG_U32_MAX
        {
            return Err(PngErrors::Height);
        }
        if height > self.options.max_height
        {
            return Err(PngErrors::UserHeight);
        }

        let color = PngColor::from_int(color_int).ok_or(PngErrors::ColorType)?;

        let depth_ok = match color
        {
            PngColor::Luma => matches!(depth, 1 | 2 | 4 | 8 | 16),
            PngColor::Palette => matches!(depth, 1 | 2 | 4 | 8),
            PngColor::RGB | PngColor::LumaA | PngColor::RGBA => matches!(depth, 8 | 16),
            PngColor::Unknown => false
        };

        if !depth_ok
        {
            return Err(PngErrors::BitDepth);
        }
        if compression_method != 0
        {
            return Err(PngErrors::CompressionMethod);
        }
        if filter_method != 0
        {
            return Err(PngErrors::FilterMethod);
        }

        let interlace_method = match interlace_int
        {
            0 => InterlaceMethod::Standard,
            1 => InterlaceMethod::Adam7,
            _ => return Err(PngErrors::InterlaceMethod)
        };

        self.info = PngInfo {
            width: width as usize,
            height: height as usize,
            depth,
            color,
            component: color.num_components(),
            interlace_method
        };
        self.seen_ihdr = true;

        trace!(
            "ihdr: {}x{} depth {} color {:?} interlace {:?}",
            width,
            height,
            depth,
            color,
            interlace_method
        );

        Ok(())
    }

    /// Charge `length` against the chunk cache budget, false when it
    /// does not fit.
    fn chunk_fits_in_cache(&mut self, length: usize) -> bool
    {
        let Some(usage) = self.chunk_cache_usage.checked_add(length)
        else
        {
            return false;
        };

        if usage > self.options.chunk_cache_limit
        {
            return false;
        }
        self.chunk_cache_usage = usage;

        true
    }

    fn parse_plte(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_plte
        {
            return Err(PngErrors::DupPlte);
        }
        if chunk.length == 0 || chunk.length % 3 != 0 || chunk.length / 3 > 256
        {
            return Err(PngErrors::ChunkSize);
        }
        if self.info.color == PngColor::Palette
            && chunk.length / 3 > (1_usize << self.info.depth)
        {
            return Err(PngErrors::ChunkSize);
        }

        self.plte_offset = chunk.offset;
        self.file_plte = true;

        if !self.user_plte
        {
            self.palette = self
                .buf
                .chunks_exact(3)
                .map(|rgb| PLTEEntry {
                    red:   rgb[0],
                    green: rgb[1],
                    blue:  rgb[2],
                    alpha: 255
                })
                .collect();
        }

        Ok(())
    }

    /// cHRM, gAMA, iCCP, sBIT and sRGB must come before PLTE.
    fn check_before_plte(&self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_plte && chunk.offset > self.plte_offset
        {
            return Err(PngErrors::ChunkPos);
        }

        Ok(())
    }

    /// bKGD, hIST and tRNS must come after PLTE.
    fn check_after_plte(&self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_plte && chunk.offset < self.plte_offset
        {
            return Err(PngErrors::ChunkPos);
        }

        Ok(())
    }

    fn parse_chrm(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_before_plte(chunk)?;

        if self.file_chrm
        {
            return Err(PngErrors::DupChrm);
        }
        if chunk.length != 32
        {
            return Err(PngErrors::ChunkSize);
        }

        let chrm = ChrmInt {
            white_point_x: read_u32_be(&self.buf, 0),
            white_point_y: read_u32_be(&self.buf, 4),
            red_x:         read_u32_be(&self.buf, 8),
            red_y:         read_u32_be(&self.buf, 12),
            green_x:       read_u32_be(&self.buf, 16),
            green_y:       read_u32_be(&self.buf, 20),
            blue_x:        read_u32_be(&self.buf, 24),
            blue_y:        read_u32_be(&self.buf, 28)
        };

        if !check_chrm_int(&chrm)
        {
            return Err(PngErrors::Chrm);
        }

        self.file_chrm = true;

        if !self.user_chrm
        {
            self.chrm = Some(chrm);
        }

        Ok(())
    }

    fn parse_gama(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_before_plte(chunk)?;

        if self.file_gama
        {
            return Err(PngErrors::DupGama);
        }
        if chunk.length != 4
        {
            return Err(PngErrors::ChunkSize);
        }

        let gama = read_u32_be(&self.buf, 0);

        if gama == 0 || gama > PNG_U32_MAX
        {
            return Err(PngErrors::Gama);
        }

        self.file_gama = true;

        if !self.user_gama
        {
            self.gama = Some(gama);
        }

        Ok(())
    }

    /// The embedded profile is not stored, only the name keyword is
    /// validated and the chunk recorded as present.
    fn parse_iccp(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_before_plte(chunk)?;

        if self.file_iccp
        {
            return Err(PngErrors::DupIccp);
        }
        if chunk.length == 0
        {
            return Err(PngErrors::ChunkSize);
        }

        let keyword_region = chunk.length.min(80);
        let nul = self.buf[..keyword_region]
            .iter()
            .position(|&b| b == 0)
            .ok_or(PngErrors::IccpName)?;

        if !check_png_keyword(&self.buf[..nul])
        {
            return Err(PngErrors::IccpName);
        }

        self.file_iccp = true;

        Ok(())
    }

    fn parse_sbit(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_before_plte(chunk)?;

        if self.file_sbit
        {
            return Err(PngErrors::DupSbit);
        }

        let expected_len = match self.info.color
        {
            PngColor::Luma => 1,
            PngColor::LumaA => 2,
            PngColor::RGB | PngColor::Palette => 3,
            PngColor::RGBA => 4,
            PngColor::Unknown => return Err(PngErrors::ColorType)
        };

        if chunk.length != expected_len
        {
            return Err(PngErrors::ChunkSize);
        }

        let sbit = match self.info.color
        {
            PngColor::Luma => SignificantBits::Luma { gray: self.buf[0] },
            PngColor::RGB | PngColor::Palette => SignificantBits::Rgb {
                red:   self.buf[0],
                green: self.buf[1],
                blue:  self.buf[2]
            },
            PngColor::LumaA => SignificantBits::LumaA {
                gray:  self.buf[0],
                alpha: self.buf[1]
            },
            PngColor::RGBA => SignificantBits::Rgba {
                red:   self.buf[0],
                green: self.buf[1],
                blue:  self.buf[2],
                alpha: self.buf[3]
            },
            PngColor::Unknown => unreachable!()
        };

        if !check_sbit(&sbit, self.info.color, self.info.depth)
        {
            return Err(PngErrors::Sbit);
        }

        self.file_sbit = true;

        if !self.user_sbit
        {
            self.sbit = Some(sbit);
        }

        Ok(())
    }

    fn parse_srgb(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_before_plte(chunk)?;

        if self.file_srgb
        {
            return Err(PngErrors::DupSrgb);
        }
        if chunk.length != 1
        {
            return Err(PngErrors::ChunkSize);
        }

        let intent = self.buf[0];

        if intent > 3
        {
            return Err(PngErrors::Srgb);
        }

        self.file_srgb = true;

        if !self.user_srgb
        {
            self.srgb = Some(intent);
        }

        Ok(())
    }

    fn parse_bkgd(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_after_plte(chunk)?;

        if self.file_bkgd
        {
            return Err(PngErrors::DupBkgd);
        }

        let mask = sample_mask(self.info.depth);

        let bkgd = match self.info.color
        {
            PngColor::Luma | PngColor::LumaA =>
            {
                if chunk.length != 2
                {
                    return Err(PngErrors::ChunkSize);
                }

                Background::Luma(read_u16_be(&self.buf, 0) & mask)
            }
            PngColor::RGB | PngColor::RGBA =>
            {
                if chunk.length != 6
                {
                    return Err(PngErrors::ChunkSize);
                }

                Background::Rgb {
                    red:   read_u16_be(&self.buf, 0) & mask,
                    green: read_u16_be(&self.buf, 2) & mask,
                    blue:  read_u16_be(&self.buf, 4) & mask
                }
            }
            PngColor::Palette =>
            {
                if chunk.length != 1
                {
                    return Err(PngErrors::ChunkSize);
                }
                if !self.file_plte && !self.user_plte
                {
                    return Err(PngErrors::BkgdNoPalette);
                }

                let index = self.buf[0];

                if usize::from(index) >= self.palette.len()
                {
                    return Err(PngErrors::BkgdPaletteIdx);
                }

                Background::PaletteIndex(index)
            }
            PngColor::Unknown => return Err(PngErrors::ColorType)
        };

        self.file_bkgd = true;

        if !self.user_bkgd
        {
            self.bkgd = Some(bkgd);
        }

        Ok(())
    }

    fn parse_hist(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if !self.file_plte && !self.user_plte
        {
            return Err(PngErrors::HistNoPalette);
        }

        self.check_after_plte(chunk)?;

        if self.file_hist
        {
            return Err(PngErrors::DupHist);
        }
        if chunk.length != self.palette.len() * 2
        {
            return Err(PngErrors::ChunkSize);
        }

        let frequencies = self
            .buf
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes(pair.try_into().unwrap()))
            .collect();

        self.file_hist = true;

        if !self.user_hist
        {
            self.hist = Some(frequencies);
        }

        Ok(())
    }

    fn parse_trns(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        self.check_after_plte(chunk)?;

        if self.file_trns
        {
            return Err(PngErrors::DupTrns);
        }
        if chunk.length == 0
        {
            return Err(PngErrors::ChunkSize);
        }

        let mask = sample_mask(self.info.depth);

        let trns = match self.info.color
        {
            PngColor::Luma =>
            {
                if chunk.length != 2
                {
                    return Err(PngErrors::ChunkSize);
                }

                Transparency::Luma(read_u16_be(&self.buf, 0) & mask)
            }
            PngColor::RGB =>
            {
                if chunk.length != 6
                {
                    return Err(PngErrors::ChunkSize);
                }

                Transparency::Rgb {
                    red:   read_u16_be(&self.buf, 0) & mask,
                    green: read_u16_be(&self.buf, 2) & mask,
                    blue:  read_u16_be(&self.buf, 4) & mask
                }
            }
            PngColor::Palette =>
            {
                if !self.file_plte && !self.user_plte
                {
                    return Err(PngErrors::TransparencyNoPalette);
                }
                if chunk.length > self.palette.len()
                {
                    return Err(PngErrors::ChunkSize);
                }

                Transparency::Palette(self.buf.clone())
            }
            PngColor::LumaA | PngColor::RGBA | PngColor::Unknown =>
            {
                return Err(PngErrors::TransparencyColorType);
            }
        };

        self.file_trns = true;

        if !self.user_trns
        {
            self.trns = Some(trns);
        }

        Ok(())
    }

    fn parse_phys(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_phys
        {
            return Err(PngErrors::DupPhys);
        }
        if chunk.length != 9
        {
            return Err(PngErrors::ChunkSize);
        }

        let phys = PhysicalDims {
            ppu_x:          read_u32_be(&self.buf, 0),
            ppu_y:          read_u32_be(&self.buf, 4),
            unit_specifier: self.buf[8]
        };

        if !check_phys(&phys)
        {
            return Err(PngErrors::Phys);
        }

        self.file_phys = true;

        if !self.user_phys
        {
            self.phys = Some(phys);
        }

        Ok(())
    }

    fn parse_splt(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if chunk.length == 0
        {
            return Err(PngErrors::ChunkSize);
        }

        self.file_splt = true;

        let keyword_region = chunk.length.min(80);
        let nul = self.buf[..keyword_region]
            .iter()
            .position(|&b| b == 0)
            .ok_or(PngErrors::SplTName)?;

        if !check_png_keyword(&self.buf[..nul])
        {
            return Err(PngErrors::SplTName);
        }

        // keyword bytes are Latin-1
        let name: String = self.buf[..nul].iter().map(|&b| char::from(b)).collect();

        if chunk.length - nul - 1 == 0
        {
            // no sample depth byte
            return Err(PngErrors::ChunkSize);
        }

        let sample_depth = self.buf[nul + 1];

        let stride = match sample_depth
        {
            16 => 10,
            8 => 6,
            _ => return Err(PngErrors::SplTDepth)
        };

        let entries_bytes = chunk.length - nul - 2;

        if entries_bytes == 0 || entries_bytes % stride != 0
        {
            return Err(PngErrors::ChunkSize);
        }

        if self.splt.iter().any(|palette| palette.name == name)
        {
            return Err(PngErrors::SplTDupName);
        }

        let n_entries = entries_bytes / stride;
        let mut entries = Vec::with_capacity(n_entries);

        {
            let data = &self.buf[nul + 2..];

            for k in 0..n_entries
            {
                let entry = &data[k * stride..];

                entries.push(if sample_depth == 16
                {
                    SpltEntry {
                        red:       read_u16_be(entry, 0),
                        green:     read_u16_be(entry, 2),
                        blue:      read_u16_be(entry, 4),
                        alpha:     read_u16_be(entry, 6),
                        frequency: read_u16_be(entry, 8)
                    }
                }
                else
                {
                    SpltEntry {
                        red:       u16::from(entry[0]),
                        green:     u16::from(entry[1]),
                        blue:      u16::from(entry[2]),
                        alpha:     u16::from(entry[3]),
                        frequency: read_u16_be(entry, 4)
                    }
                });
            }
        }

        self.splt.push(SuggestedPalette {
            name,
            sample_depth,
            entries
        });

        Ok(())
    }

    pub(crate) fn parse_time(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_time
        {
            return Err(PngErrors::DupTime);
        }
        if chunk.length != 7
        {
            return Err(PngErrors::ChunkSize);
        }

        let time = TimeStamp {
            year:   read_u16_be(&self.buf, 0),
            month:  self.buf[2],
            day:    self.buf[3],
            hour:   self.buf[4],
            minute: self.buf[5],
            second: self.buf[6]
        };

        if !check_time(&time)
        {
            return Err(PngErrors::Time);
        }

        self.file_time = true;

        if !self.user_time
        {
            self.time = Some(time);
        }

        Ok(())
    }

    fn parse_offs(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_offs
        {
            return Err(PngErrors::DupOffs);
        }
        if chunk.length != 9
        {
            return Err(PngErrors::ChunkSize);
        }

        let offs = ImageOffset {
            x:              read_i32_be(&self.buf, 0),
            y:              read_i32_be(&self.buf, 4),
            unit_specifier: self.buf[8]
        };

        if !check_offs(&offs)
        {
            return Err(PngErrors::Offs);
        }

        self.file_offs = true;

        if !self.user_offs
        {
            self.offs = Some(offs);
        }

        Ok(())
    }

    pub(crate) fn parse_exif(&mut self, chunk: &PngChunk) -> Result<(), PngErrors>
    {
        if self.file_exif
        {
            return Err(PngErrors::DupExif);
        }

        self.file_exif = true;

        if chunk.length < 4 || !check_exif(&self.buf)
        {
            return Err(PngErrors::Exif);
        }

        if !self.user_exif
        {
            self.exif = Some(self.buf.clone());
        }

        Ok(())
    }

    /// Walk the chunks after the last IDAT up to IEND.
    ///
    /// Only tIME, eXIf, text chunks and trailing IDATs immediately
    /// after the image are allowed back here.
    pub(crate) fn validate_past_idat(&mut self) -> Result<(), PngErrors>
    {
        let mut prev_was_idat = true;

        if let Some(last) = &self.last_idat
        {
            trace!("validating trailer after IDAT at offset {}", last.offset);
        }

        loop
        {
            let chunk = self.read_chunk_header()?;

            self.read_chunk_bytes(chunk.length)?;

            if self.finish_chunk()?
            {
                continue;
            }

            if reserved_bit_set(&chunk.chunk)
            {
                return Err(PngErrors::ChunkType);
            }
            if is_private_chunk(&chunk.chunk)
            {
                continue;
            }

            if is_critical_chunk(&chunk.chunk)
            {
                match chunk.chunk_type
                {
                    PngChunkType::IEND => return Ok(()),
                    // extra IDATs directly after the image are ignored
                    PngChunkType::IDAT if prev_was_idat => continue,
                    _ => return Err(PngErrors::ChunkPos)
                }
            }

            prev_was_idat = false;

            match chunk.chunk_type
            {
                PngChunkType::tIME => self.parse_time(&chunk)?,
                PngChunkType::eXIf => self.parse_exif(&chunk)?,
                PngChunkType::tEXt | PngChunkType::zTXt | PngChunkType::iTXt =>
                {
                    self.file_text = true;
                }
                PngChunkType::cHRM
                | PngChunkType::gAMA
                | PngChunkType::iCCP
                | PngChunkType::sBIT
                | PngChunkType::sRGB
                | PngChunkType::bKGD
                | PngChunkType::hIST
                | PngChunkType::tRNS
                | PngChunkType::pHYs
                | PngChunkType::sPLT
                | PngChunkType::oFFs => return Err(PngErrors::ChunkPos),
                _ => {}
            }
        }
    }

    // ---- setters ---------------------------------------------------
    //
    // Each installs a caller-provided record after running the same
    // validation the file parser uses. A record set this way is not
    // overwritten when the file carries the same chunk.

    fn prepare_set(&mut self) -> Result<(), PngErrors>
    {
        if !self.valid_state
        {
            return Err(PngErrors::BadState);
        }
        if self.source.is_set()
        {
            self.decode_headers()?;
        }

        Ok(())
    }

    pub fn set_palette(&mut self, palette: Vec<PLTEEntry>) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if palette.is_empty() || palette.len() > 256
        {
            return Err(PngErrors::Invalid);
        }
        if self.seen_ihdr
            && self.info.color == PngColor::Palette
            && palette.len() > (1_usize << self.info.depth)
        {
            return Err(PngErrors::Invalid);
        }

        self.palette = palette;
        self.user_plte = true;

        Ok(())
    }

    pub fn set_transparency(&mut self, trns: Transparency) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !self.seen_ihdr
        {
            return Err(PngErrors::Invalid);
        }

        match (&trns, self.info.color)
        {
            (Transparency::Luma(_), PngColor::Luma) => {}
            (Transparency::Rgb { .. }, PngColor::RGB) => {}
            (Transparency::Palette(alphas), PngColor::Palette) =>
            {
                if !self.file_plte && !self.user_plte
                {
                    return Err(PngErrors::TransparencyNoPalette);
                }
                if alphas.is_empty() || alphas.len() > self.palette.len()
                {
                    return Err(PngErrors::Invalid);
                }
            }
            _ => return Err(PngErrors::TransparencyColorType)
        }

        self.trns = Some(trns);
        self.user_trns = true;

        Ok(())
    }

    pub fn set_chrm_int(&mut self, chrm: ChrmInt) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !check_chrm_int(&chrm)
        {
            return Err(PngErrors::Chrm);
        }

        self.chrm = Some(chrm);
        self.user_chrm = true;

        Ok(())
    }

    /// Floating-point convenience over
    /// [`set_chrm_int`](PngDecoder::set_chrm_int).
    pub fn set_chrm(&mut self, chrm: Chrm) -> Result<(), PngErrors>
    {
        let to_wire = |value: f64| -> Result<u32, PngErrors> {
            if !(0.0..=f64::from(PNG_U32_MAX) / 100_000.0).contains(&value)
            {
                return Err(PngErrors::Chrm);
            }

            Ok((value * 100_000.0) as u32)
        };

        self.set_chrm_int(ChrmInt {
            white_point_x: to_wire(chrm.white_point_x)?,
            white_point_y: to_wire(chrm.white_point_y)?,
            red_x:         to_wire(chrm.red_x)?,
            red_y:         to_wire(chrm.red_y)?,
            green_x:       to_wire(chrm.green_x)?,
            green_y:       to_wire(chrm.green_y)?,
            blue_x:        to_wire(chrm.blue_x)?,
            blue_y:        to_wire(chrm.blue_y)?
        })
    }

    /// Install a file gamma as the raw chunk value, gamma times
    /// 100000.
    pub fn set_gamma_int(&mut self, gama: u32) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if gama == 0 || gama > PNG_U32_MAX
        {
            return Err(PngErrors::Gama);
        }

        self.gama = Some(gama);
        self.user_gama = true;

        Ok(())
    }

    pub fn set_gamma(&mut self, gamma: f64) -> Result<(), PngErrors>
    {
        if !(0.0..=f64::from(PNG_U32_MAX) / 100_000.0).contains(&gamma)
        {
            return Err(PngErrors::Gama);
        }

        self.set_gamma_int((gamma * 100_000.0) as u32)
    }

    pub fn set_sbit(&mut self, sbit: SignificantBits) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !self.seen_ihdr
        {
            return Err(PngErrors::Invalid);
        }
        if !check_sbit(&sbit, self.info.color, self.info.depth)
        {
            return Err(PngErrors::Sbit);
        }

        self.sbit = Some(sbit);
        self.user_sbit = true;

        Ok(())
    }

    pub fn set_srgb(&mut self, rendering_intent: u8) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if rendering_intent > 3
        {
            return Err(PngErrors::Srgb);
        }

        self.srgb = Some(rendering_intent);
        self.user_srgb = true;

        Ok(())
    }

    pub fn set_background(&mut self, bkgd: Background) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !self.seen_ihdr
        {
            return Err(PngErrors::Invalid);
        }

        match (&bkgd, self.info.color)
        {
            (Background::Luma(_), PngColor::Luma | PngColor::LumaA) => {}
            (Background::Rgb { .. }, PngColor::RGB | PngColor::RGBA) => {}
            (Background::PaletteIndex(index), PngColor::Palette) =>
            {
                if !self.file_plte && !self.user_plte
                {
                    return Err(PngErrors::BkgdNoPalette);
                }
                if usize::from(*index) >= self.palette.len()
                {
                    return Err(PngErrors::BkgdPaletteIdx);
                }
            }
            _ => return Err(PngErrors::Invalid)
        }

        self.bkgd = Some(bkgd);
        self.user_bkgd = true;

        Ok(())
    }

    pub fn set_histogram(&mut self, frequencies: Vec<u16>) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !self.file_plte && !self.user_plte
        {
            return Err(PngErrors::HistNoPalette);
        }
        if frequencies.len() != self.palette.len()
        {
            return Err(PngErrors::Invalid);
        }

        self.hist = Some(frequencies);
        self.user_hist = true;

        Ok(())
    }

    pub fn set_phys(&mut self, phys: PhysicalDims) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !check_phys(&phys)
        {
            return Err(PngErrors::Phys);
        }

        self.phys = Some(phys);
        self.user_phys = true;

        Ok(())
    }

    pub fn set_time(&mut self, time: TimeStamp) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !check_time(&time)
        {
            return Err(PngErrors::Time);
        }

        self.time = Some(time);
        self.user_time = true;

        Ok(())
    }

    pub fn set_offs(&mut self, offs: ImageOffset) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !check_offs(&offs)
        {
            return Err(PngErrors::Offs);
        }

        self.offs = Some(offs);
        self.user_offs = true;

        Ok(())
    }

    pub fn set_exif(&mut self, data: Vec<u8>) -> Result<(), PngErrors>
    {
        self.prepare_set()?;

        if !check_exif(&data)
        {
            return Err(PngErrors::Exif);
        }

        self.exif = Some(data);
        self.user_exif = true;

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn keyword_validation()
    {
        assert!(check_png_keyword(b"Title"));
        assert!(check_png_keyword(b"Software used"));
        assert!(check_png_keyword(&[b'A', 200, b'B']));

        assert!(!check_png_keyword(b""));
        assert!(!check_png_keyword(&[b'x'; 80]));
        assert!(!check_png_keyword(b" leading"));
        assert!(!check_png_keyword(b"trailing "));
        assert!(!check_png_keyword(b"two  spaces"));
        // 127..=160 are outside both printable ranges
        assert!(!check_png_keyword(&[b'A', 127]));
        assert!(!check_png_keyword(&[b'A', 160]));
        assert!(!check_png_keyword(b"tab\there"));
    }

    #[test]
    fn time_validation()
    {
        let valid = TimeStamp {
            year:   2001,
            month:  12,
            day:    31,
            hour:   23,
            minute: 59,
            second: 60
        };

        assert!(check_time(&valid));
        assert!(!check_time(&TimeStamp { month: 0, ..valid }));
        assert!(!check_time(&TimeStamp { month: 13, ..valid }));
        assert!(!check_time(&TimeStamp { day: 0, ..valid }));
        assert!(!check_time(&TimeStamp { day: 32, ..valid }));
        assert!(!check_time(&TimeStamp { hour: 24, ..valid }));
        assert!(!check_time(&TimeStamp { minute: 60, ..valid }));
        assert!(!check_time(&TimeStamp { second: 61, ..valid }));
    }

    #[test]
    fn offs_bounds()
    {
        let valid = ImageOffset {
            x:              -2_147_483_647,
            y:              2_147_483_647,
            unit_specifier: 1
        };

        assert!(check_offs(&valid));
        assert!(!check_offs(&ImageOffset { x: i32::MIN, ..valid }));
        assert!(!check_offs(&ImageOffset { y: i32::MIN, ..valid }));
        assert!(!check_offs(&ImageOffset {
            unit_specifier: 2,
            ..valid
        }));
    }

    #[test]
    fn exif_magic()
    {
        assert!(check_exif(&[0x49, 0x49, 0x2A, 0x00, 1, 2]));
        assert!(check_exif(&[0x4D, 0x4D, 0x00, 0x2A]));
        assert!(!check_exif(&[0x49, 0x49, 0x2A]));
        assert!(!check_exif(&[0x4D, 0x49, 0x00, 0x2A, 9]));
    }

    #[test]
    fn sbit_ranges_follow_color_type()
    {
        let rgb = SignificantBits::Rgb {
            red:   5,
            green: 6,
            blue:  5
        };

        assert!(check_sbit(&rgb, PngColor::RGB, 8));
        assert!(check_sbit(&rgb, PngColor::Palette, 4));
        assert!(!check_sbit(&rgb, PngColor::Luma, 8));
        assert!(!check_sbit(
            &SignificantBits::Rgb {
                red:   9,
                green: 6,
                blue:  5
            },
            PngColor::RGB,
            8
        ));
        assert!(!check_sbit(
            &SignificantBits::Luma { gray: 0 },
            PngColor::Luma,
            8
        ));
        assert!(check_sbit(
            &SignificantBits::LumaA { gray: 16, alpha: 1 },
            PngColor::LumaA,
            16
        ));
    }
}
