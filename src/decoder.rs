//! The decoder context and the scanline pipeline.
//!
//! A [`PngDecoder`] owns one input source and decodes one image:
//! create it, attach a source, optionally read metadata, then call
//! [`decode_image`](PngDecoder::decode_image) once. Any fatal error
//! permanently poisons the context and every later call returns
//! [`BadState`](PngErrors::BadState).

use crc32fast::Hasher;
use flate2::{Decompress, FlushDecompress, Status};
use log::info;

use crate::chunks::{
    Background, Chrm, ChrmInt, ImageOffset, PLTEEntry, PhysicalDims, PngInfo, SignificantBits,
    SuggestedPalette, TimeStamp, Transparency
};
use crate::constants::{
    ADAM7_X_DELTA, ADAM7_X_START, ADAM7_Y_DELTA, ADAM7_Y_START, PNG_U32_MAX, READ_SIZE
};
use crate::enums::{CrcAction, DecodeFlags, InterlaceMethod, OutputFormat, PngChunkType, PngColor};
use crate::error::PngErrors;
use crate::filters::defilter_scanline;
use crate::options::DecoderOptions;
use crate::reader::PngChunk;
use crate::source::{ByteSource, ReadFn};
use crate::transform::{build_gamma_lut, SampleTransformer, TrnsKey};

/// Geometry of one interlace pass.
///
/// Non-interlaced images use entry 0 only; empty passes keep zero
/// width/height and are skipped.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SubImage
{
    pub width:          usize,
    pub height:         usize,
    /// Bytes per scanline including the leading filter byte.
    pub scanline_width: usize
}

/// Compute the seven pass geometries and the widest scanline.
pub(crate) fn calculate_subimages(
    info: &PngInfo, channels: usize
) -> Result<([SubImage; 7], usize), PngErrors>
{
    let mut sub = [SubImage::default(); 7];

    let w = info.width;
    let h = info.height;

    if info.interlace_method == InterlaceMethod::Adam7
    {
        sub[0].width = (w + 7) >> 3;
        sub[0].height = (h + 7) >> 3;
        sub[1].width = (w + 3) >> 3;
        sub[1].height = (h + 7) >> 3;
        sub[2].width = (w + 3) >> 2;
        sub[2].height = (h + 3) >> 3;
        sub[3].width = (w + 1) >> 2;
        sub[3].height = (h + 3) >> 2;
        sub[4].width = (w + 1) >> 1;
        sub[4].height = (h + 1) >> 2;
        sub[5].width = w >> 1;
        sub[5].height = (h + 1) >> 1;
        sub[6].width = w;
        sub[6].height = h >> 1;
    }
    else
    {
        sub[0].width = w;
        sub[0].height = h;
    }

    let mut widest = 0;

    for pass in sub.iter_mut()
    {
        if pass.width == 0 || pass.height == 0
        {
            continue;
        }

        let bits = channels
            .checked_mul(usize::from(info.depth))
            .and_then(|v| v.checked_mul(pass.width))
            .ok_or(PngErrors::Overflow)?;

        // round up to whole bytes, plus the filter byte
        let scanline_width = (bits / 8) + usize::from(bits % 8 != 0) + 1;

        pass.scanline_width = scanline_width;
        widest = widest.max(scanline_width);
    }

    Ok((sub, widest))
}

/// A PNG decoder instance.
///
/// ```no_run
/// use streampng::{DecodeFlags, OutputFormat, PngDecoder};
///
/// let data = std::fs::read("image.png").unwrap();
///
/// let mut decoder = PngDecoder::new();
/// decoder.set_source_buffer(&data).unwrap();
///
/// let size = decoder.decoded_image_size(OutputFormat::RGBA8).unwrap();
/// let mut pixels = vec![0; size];
///
/// decoder
///     .decode_image(&mut pixels, OutputFormat::RGBA8, DecodeFlags::new())
///     .unwrap();
/// ```
pub struct PngDecoder<'a>
{
    pub(crate) source:  ByteSource<'a>,
    pub(crate) options: DecoderOptions,
    /// Scratch holding the bytes of the last source read.
    pub(crate) buf:     Vec<u8>,

    pub(crate) current_chunk:     PngChunk,
    pub(crate) chunk_bytes_left:  usize,
    pub(crate) running_crc:       Hasher,
    pub(crate) crc_pending:       bool,
    pub(crate) chunk_cache_usage: usize,

    pub(crate) valid_state:   bool,
    pub(crate) seen_headers:  bool,
    pub(crate) image_decoded: bool,
    pub(crate) first_idat:    Option<PngChunk>,
    pub(crate) last_idat:     Option<PngChunk>,

    pub(crate) info:        PngInfo,
    pub(crate) seen_ihdr:   bool,
    pub(crate) palette:     Vec<PLTEEntry>,
    pub(crate) plte_offset: u64,
    pub(crate) chrm:        Option<ChrmInt>,
    pub(crate) gama:        Option<u32>,
    pub(crate) sbit:        Option<SignificantBits>,
    pub(crate) srgb:        Option<u8>,
    pub(crate) bkgd:        Option<Background>,
    pub(crate) hist:        Option<Vec<u16>>,
    pub(crate) trns:        Option<Transparency>,
    pub(crate) phys:        Option<PhysicalDims>,
    pub(crate) splt:        Vec<SuggestedPalette>,
    pub(crate) time:        Option<TimeStamp>,
    pub(crate) offs:        Option<ImageOffset>,
    pub(crate) exif:        Option<Vec<u8>>,
    pub(crate) gamma_lut:   Vec<u16>,

    // chunk seen in the file
    pub(crate) file_plte: bool,
    pub(crate) file_chrm: bool,
    pub(crate) file_gama: bool,
    pub(crate) file_iccp: bool,
    pub(crate) file_sbit: bool,
    pub(crate) file_srgb: bool,
    pub(crate) file_bkgd: bool,
    pub(crate) file_hist: bool,
    pub(crate) file_trns: bool,
    pub(crate) file_phys: bool,
    pub(crate) file_splt: bool,
    pub(crate) file_time: bool,
    pub(crate) file_offs: bool,
    pub(crate) file_exif: bool,
    pub(crate) file_text: bool,

    // record installed through a setter, wins over the file's copy
    pub(crate) user_plte: bool,
    pub(crate) user_chrm: bool,
    pub(crate) user_gama: bool,
    pub(crate) user_sbit: bool,
    pub(crate) user_srgb: bool,
    pub(crate) user_bkgd: bool,
    pub(crate) user_hist: bool,
    pub(crate) user_trns: bool,
    pub(crate) user_phys: bool,
    pub(crate) user_time: bool,
    pub(crate) user_offs: bool,
    pub(crate) user_exif: bool
}

impl<'a> PngDecoder<'a>
{
    pub fn new() -> PngDecoder<'a>
    {
        PngDecoder::new_with_options(DecoderOptions::default())
    }

    pub fn new_with_options(options: DecoderOptions) -> PngDecoder<'a>
    {
        PngDecoder {
            source: ByteSource::new(),
            options,
            buf: Vec::new(),

            current_chunk: PngChunk::default(),
            chunk_bytes_left: 0,
            running_crc: Hasher::new(),
            crc_pending: false,
            chunk_cache_usage: 0,

            valid_state: true,
            seen_headers: false,
            image_decoded: false,
            first_idat: None,
            last_idat: None,

            info: PngInfo::default(),
            seen_ihdr: false,
            palette: Vec::new(),
            plte_offset: 0,
            chrm: None,
            gama: None,
            sbit: None,
            srgb: None,
            bkgd: None,
            hist: None,
            trns: None,
            phys: None,
            splt: Vec::new(),
            time: None,
            offs: None,
            exif: None,
            gamma_lut: Vec::new(),

            file_plte: false,
            file_chrm: false,
            file_gama: false,
            file_iccp: false,
            file_sbit: false,
            file_srgb: false,
            file_bkgd: false,
            file_hist: false,
            file_trns: false,
            file_phys: false,
            file_splt: false,
            file_time: false,
            file_offs: false,
            file_exif: false,
            file_text: false,

            user_plte: false,
            user_chrm: false,
            user_gama: false,
            user_sbit: false,
            user_srgb: false,
            user_bkgd: false,
            user_hist: false,
            user_trns: false,
            user_phys: false,
            user_time: false,
            user_offs: false,
            user_exif: false
        }
    }

    /// Attach an in-memory buffer as the input. A source can be
    /// attached exactly once.
    pub fn set_source_buffer(&mut self, data: &'a [u8]) -> Result<(), PngErrors>
    {
        if !self.valid_state
        {
            return Err(PngErrors::BadState);
        }
        self.source.set_buffer(data)
    }

    /// Attach a pull callback as the input. A source can be attached
    /// exactly once.
    pub fn set_source_stream(&mut self, read_fn: ReadFn<'a>) -> Result<(), PngErrors>
    {
        if !self.valid_state
        {
            return Err(PngErrors::BadState);
        }
        self.source.set_stream(read_fn)
    }

    /// Cap the image dimensions the decoder will accept.
    pub fn set_image_limits(&mut self, max_width: u32, max_height: u32) -> Result<(), PngErrors>
    {
        if max_width > PNG_U32_MAX || max_height > PNG_U32_MAX
        {
            return Err(PngErrors::Invalid);
        }
        self.options.max_width = max_width;
        self.options.max_height = max_height;

        Ok(())
    }

    pub const fn image_limits(&self) -> (u32, u32)
    {
        (self.options.max_width, self.options.max_height)
    }

    /// Cap single-chunk size and the aggregate cached-chunk budget.
    pub fn set_chunk_limits(
        &mut self, max_chunk_size: u32, chunk_cache_limit: usize
    ) -> Result<(), PngErrors>
    {
        if max_chunk_size > PNG_U32_MAX
        {
            return Err(PngErrors::Invalid);
        }
        self.options.max_chunk_size = max_chunk_size;
        self.options.chunk_cache_limit = chunk_cache_limit;

        Ok(())
    }

    pub const fn chunk_limits(&self) -> (u32, usize)
    {
        (self.options.max_chunk_size, self.options.chunk_cache_limit)
    }

    /// Choose CRC handling per chunk class. `Discard` is illegal for
    /// critical chunks.
    pub fn set_crc_policy(
        &mut self, critical: CrcAction, ancillary: CrcAction
    ) -> Result<(), PngErrors>
    {
        if critical == CrcAction::Discard
        {
            return Err(PngErrors::Invalid);
        }
        self.options.crc_critical = critical;
        self.options.crc_ancillary = ancillary;

        Ok(())
    }

    /// Total bytes consumed from the source so far.
    pub const fn bytes_consumed(&self) -> u64
    {
        self.source.bytes_read()
    }

    /// Bytes a [`decode_image`](PngDecoder::decode_image) call will
    /// write for the given format.
    pub fn decoded_image_size(&mut self, fmt: OutputFormat) -> Result<usize, PngErrors>
    {
        self.decode_headers()?;

        fmt.pixel_size()
            .checked_mul(self.info.width)
            .and_then(|v| v.checked_mul(self.info.height))
            .ok_or(PngErrors::Overflow)
    }

    /// Decode the image into `out`, which must hold at least
    /// [`decoded_image_size`](PngDecoder::decoded_image_size) bytes.
    ///
    /// May be called once per context; any failure leaves the output
    /// contents unspecified and the context poisoned.
    pub fn decode_image(
        &mut self, out: &mut [u8], fmt: OutputFormat, flags: DecodeFlags
    ) -> Result<(), PngErrors>
    {
        if !self.valid_state
        {
            return Err(PngErrors::BadState);
        }
        if self.image_decoded
        {
            return Err(PngErrors::Invalid);
        }

        let required = self.decoded_image_size(fmt)?;

        if out.len() < required
        {
            return Err(PngErrors::BufferSizeTooSmall);
        }

        match self.decode_image_inner(out, fmt, flags)
        {
            Ok(()) =>
            {
                self.image_decoded = true;
                Ok(())
            }
            Err(e) =>
            {
                self.valid_state = false;
                Err(e)
            }
        }
    }

    /// Allocating convenience over
    /// [`decode_image`](PngDecoder::decode_image).
    pub fn decode(&mut self, fmt: OutputFormat, flags: DecodeFlags) -> Result<Vec<u8>, PngErrors>
    {
        let size = self.decoded_image_size(fmt)?;
        let mut out = vec![0; size];

        self.decode_image(&mut out, fmt, flags)?;

        Ok(out)
    }

    fn decode_image_inner(
        &mut self, out: &mut [u8], fmt: OutputFormat, flags: DecodeFlags
    ) -> Result<(), PngErrors>
    {
        let info = self.info;
        let channels = usize::from(info.color.num_components());

        let bpp = if info.depth < 8
        {
            1
        }
        else
        {
            channels * usize::from(info.depth / 8)
        };

        let (sub, widest) = calculate_subimages(&info, channels)?;

        debug_assert!(self.first_idat.is_some());

        info!(
            "decoding {}x{} {:?} image, depth {}",
            info.width, info.height, info.color, info.depth
        );

        let gamma_lut_vec = if flags.use_gamma && self.gama.is_some()
        {
            build_gamma_lut(self.gama.unwrap(), fmt.depth())?
        }
        else
        {
            Vec::new()
        };

        // resolve significant-bit counts per channel
        let mut gray_sbits = info.depth;
        let mut red_sbits = info.depth;
        let mut green_sbits = info.depth;
        let mut blue_sbits = info.depth;
        let mut alpha_sbits = info.depth;

        if info.color == PngColor::Palette
        {
            red_sbits = 8;
            green_sbits = 8;
            blue_sbits = 8;
            alpha_sbits = 8;
        }

        if flags.use_sbit
        {
            match self.sbit
            {
                Some(SignificantBits::Luma { gray }) => gray_sbits = gray,
                Some(SignificantBits::Rgb { red, green, blue }) =>
                {
                    red_sbits = red;
                    green_sbits = green;
                    blue_sbits = blue;
                }
                Some(SignificantBits::LumaA { gray, alpha }) =>
                {
                    gray_sbits = gray;
                    alpha_sbits = alpha;
                }
                Some(SignificantBits::Rgba {
                    red,
                    green,
                    blue,
                    alpha
                }) =>
                {
                    red_sbits = red;
                    green_sbits = green;
                    blue_sbits = blue;
                    alpha_sbits = alpha;
                }
                None => {}
            }
        }

        // palette alpha, from tRNS when requested
        let mut palette = self.palette.clone();

        if info.color == PngColor::Palette
        {
            let trns_alpha = match (flags.use_transparency, &self.trns)
            {
                (true, Some(Transparency::Palette(alphas))) => Some(alphas),
                _ => None
            };

            for (i, entry) in palette.iter_mut().enumerate()
            {
                entry.alpha = trns_alpha.and_then(|a| a.get(i).copied()).unwrap_or(255);
            }
        }

        let trns_key = if flags.use_transparency
        {
            match (&self.trns, info.color)
            {
                (Some(Transparency::Luma(gray)), PngColor::Luma) => Some(TrnsKey::Luma(*gray)),
                (Some(Transparency::Rgb { red, green, blue }), PngColor::RGB) =>
                {
                    Some(TrnsKey::Rgb(*red, *green, *blue))
                }
                _ => None
            }
        }
        else
        {
            None
        };

        let transformer = SampleTransformer {
            color: info.color,
            depth: info.depth,
            processing_depth: if info.color == PngColor::Palette
            {
                8
            }
            else
            {
                info.depth
            },
            fmt,
            gray_sbits,
            red_sbits,
            green_sbits,
            blue_sbits,
            alpha_sbits,
            gamma_lut: if gamma_lut_vec.is_empty()
            {
                None
            }
            else
            {
                Some(&gamma_lut_vec)
            },
            palette: &palette,
            trns_key
        };

        let mut scanline = vec![0_u8; widest];
        let mut prev_scanline = vec![0_u8; widest];

        let mut stream = Decompress::new(true);
        let mut in_pos = 0_usize;

        // scratch still holds the last metadata payload
        self.buf.clear();

        let interlaced = info.interlace_method == InterlaceMethod::Adam7;
        let pixel_size = fmt.pixel_size();

        for pass in 0..7
        {
            if sub[pass].width == 0 || sub[pass].height == 0
            {
                continue;
            }

            let scanline_width = sub[pass].scanline_width;
            let row_bytes = scanline_width - 1;

            prev_scanline[..row_bytes].fill(0);

            let (x_start, y_start, x_delta, y_delta) = if interlaced
            {
                (
                    ADAM7_X_START[pass],
                    ADAM7_Y_START[pass],
                    ADAM7_X_DELTA[pass],
                    ADAM7_Y_DELTA[pass]
                )
            }
            else
            {
                (0, 0, 1, 1)
            };

            // The first filter byte offsets all reads by one: every
            // row then carries the next row's filter byte at its end,
            // and the last row of a pass is one byte shorter.
            let mut filter_byte = [0_u8; 1];

            self.inflate_into(&mut stream, &mut filter_byte, &mut in_pos, true)?;

            let mut filter = filter_byte[0];

            for scanline_idx in 0..sub[pass].height
            {
                let last_row = scanline_idx == sub[pass].height - 1;
                let read_len = if last_row
                {
                    scanline_width - 1
                }
                else
                {
                    scanline_width
                };

                // an end-of-stream marker is only legal once the last
                // scanline of the pass has been produced in full; a
                // stream that ends on a non-final pass is caught at
                // the next pass's filter-byte read
                self.inflate_into(&mut stream, &mut scanline[..read_len], &mut in_pos, last_row)?;

                let next_filter = if last_row
                {
                    0
                }
                else
                {
                    scanline[scanline_width - 1]
                };

                defilter_scanline(
                    &prev_scanline[..row_bytes],
                    &mut scanline[..row_bytes],
                    bpp,
                    filter
                )?;
                filter = next_filter;

                let base = ((y_start + scanline_idx * y_delta) * info.width + x_start) * pixel_size;

                transformer.process_scanline(
                    &scanline[..row_bytes],
                    sub[pass].width,
                    out,
                    base,
                    x_delta * pixel_size
                )?;

                prev_scanline[..row_bytes].copy_from_slice(&scanline[..row_bytes]);
            }
        }

        // zlib stream ended before the IDAT chunk boundary, skip the
        // leftover payload to reach the next chunk header cleanly
        if self.chunk_bytes_left > 0
        {
            let left = self.chunk_bytes_left;

            self.discard_chunk_bytes(left)?;
        }

        self.last_idat = Some(self.current_chunk);

        self.validate_past_idat()?;

        self.palette = palette;
        self.gamma_lut = gamma_lut_vec;

        Ok(())
    }

    /// Inflate exactly `dest.len()` bytes, pulling IDAT payload as
    /// needed.
    ///
    /// `allow_stream_end` permits the deflate end-of-stream marker to
    /// coincide with the last byte written; anywhere else it is
    /// [`IdatTooShort`](PngErrors::IdatTooShort).
    fn inflate_into(
        &mut self, stream: &mut Decompress, dest: &mut [u8], in_pos: &mut usize,
        allow_stream_end: bool
    ) -> Result<(), PngErrors>
    {
        let mut out_pos = 0;

        loop
        {
            let in_before = stream.total_in();
            let out_before = stream.total_out();

            let status = stream
                .decompress(
                    &self.buf[*in_pos..],
                    &mut dest[out_pos..],
                    FlushDecompress::None
                )
                .map_err(|_| PngErrors::IdatStream)?;

            *in_pos += (stream.total_in() - in_before) as usize;
            out_pos += (stream.total_out() - out_before) as usize;

            if status == Status::StreamEnd
            {
                if out_pos != dest.len() || !allow_stream_end
                {
                    return Err(PngErrors::IdatTooShort);
                }
                return Ok(());
            }

            if out_pos == dest.len()
            {
                return Ok(());
            }

            if *in_pos == self.buf.len()
            {
                self.get_idat_bytes()?;
                *in_pos = 0;
            }
        }
    }

    /// Pull the next slice of IDAT payload into the scratch buffer,
    /// crossing chunk boundaries as needed.
    fn get_idat_bytes(&mut self) -> Result<(), PngErrors>
    {
        if self.current_chunk.chunk_type != PngChunkType::IDAT
        {
            return Err(PngErrors::IdatTooShort);
        }

        while self.chunk_bytes_left == 0
        {
            let chunk = self.read_chunk_header()?;

            if chunk.chunk_type != PngChunkType::IDAT
            {
                return Err(PngErrors::IdatTooShort);
            }
        }

        let len = self.chunk_bytes_left.min(READ_SIZE);

        self.read_chunk_bytes(len)
    }

    // ---- accessors -------------------------------------------------

    /// Parsed IHDR contents.
    ///
    /// Unlike the other accessors this keeps working once the IHDR
    /// itself parsed, even if a later chunk turned out to be broken.
    pub fn get_header(&mut self) -> Result<PngInfo, PngErrors>
    {
        if self.seen_ihdr
        {
            return Ok(self.info);
        }

        self.decode_headers()?;

        Ok(self.info)
    }

    /// The PLTE palette. Alpha fields reflect tRNS after a decode with
    /// transparency enabled, 255 otherwise.
    pub fn get_palette(&mut self) -> Result<&[PLTEEntry], PngErrors>
    {
        self.decode_headers()?;

        if !self.file_plte && !self.user_plte
        {
            return Err(PngErrors::ChunkUnavailable);
        }

        Ok(&self.palette)
    }

    pub fn get_transparency(&mut self) -> Result<&Transparency, PngErrors>
    {
        self.decode_headers()?;

        self.trns.as_ref().ok_or(PngErrors::ChunkUnavailable)
    }

    /// cHRM values exactly as stored, coordinates times 100000.
    pub fn get_chrm_int(&mut self) -> Result<ChrmInt, PngErrors>
    {
        self.decode_headers()?;

        self.chrm.ok_or(PngErrors::ChunkUnavailable)
    }

    /// cHRM values as floating-point coordinates, derived from the
    /// stored integer form.
    pub fn get_chrm(&mut self) -> Result<Chrm, PngErrors>
    {
        self.get_chrm_int().map(Chrm::from)
    }

    /// File gamma, the stored value divided by 100000.
    pub fn get_gamma(&mut self) -> Result<f64, PngErrors>
    {
        self.decode_headers()?;

        self.gama
            .map(|g| f64::from(g) / 100_000.0)
            .ok_or(PngErrors::ChunkUnavailable)
    }

    pub fn get_sbit(&mut self) -> Result<SignificantBits, PngErrors>
    {
        self.decode_headers()?;

        self.sbit.ok_or(PngErrors::ChunkUnavailable)
    }

    /// sRGB rendering intent.
    pub fn get_srgb(&mut self) -> Result<u8, PngErrors>
    {
        self.decode_headers()?;

        self.srgb.ok_or(PngErrors::ChunkUnavailable)
    }

    pub fn get_background(&mut self) -> Result<Background, PngErrors>
    {
        self.decode_headers()?;

        self.bkgd.ok_or(PngErrors::ChunkUnavailable)
    }

    /// Palette histogram, one frequency per palette entry.
    pub fn get_histogram(&mut self) -> Result<&[u16], PngErrors>
    {
        self.decode_headers()?;

        self.hist.as_deref().ok_or(PngErrors::ChunkUnavailable)
    }

    pub fn get_phys(&mut self) -> Result<PhysicalDims, PngErrors>
    {
        self.decode_headers()?;

        self.phys.ok_or(PngErrors::ChunkUnavailable)
    }

    pub fn get_splt(&mut self) -> Result<&[SuggestedPalette], PngErrors>
    {
        self.decode_headers()?;

        if !self.file_splt
        {
            return Err(PngErrors::ChunkUnavailable);
        }

        Ok(&self.splt)
    }

    pub fn get_time(&mut self) -> Result<TimeStamp, PngErrors>
    {
        self.decode_headers()?;

        self.time.ok_or(PngErrors::ChunkUnavailable)
    }

    pub fn get_offs(&mut self) -> Result<ImageOffset, PngErrors>
    {
        self.decode_headers()?;

        self.offs.ok_or(PngErrors::ChunkUnavailable)
    }

    pub fn get_exif(&mut self) -> Result<&[u8], PngErrors>
    {
        self.decode_headers()?;

        self.exif.as_deref().ok_or(PngErrors::ChunkUnavailable)
    }

    /// Whether any tEXt/zTXt/iTXt chunk was seen. Their contents are
    /// not parsed.
    pub fn has_text(&mut self) -> Result<bool, PngErrors>
    {
        self.decode_headers()?;

        Ok(self.file_text)
    }
}

impl Default for PngDecoder<'_>
{
    fn default() -> Self
    {
        PngDecoder::new()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn info(width: usize, height: usize, interlace: InterlaceMethod) -> PngInfo
    {
        PngInfo {
            width,
            height,
            depth: 8,
            color: PngColor::RGB,
            component: 3,
            interlace_method: interlace
        }
    }

    #[test]
    fn standard_images_use_a_single_pass()
    {
        let (sub, widest) = calculate_subimages(&info(5, 3, InterlaceMethod::Standard), 3).unwrap();

        assert_eq!(sub[0].width, 5);
        assert_eq!(sub[0].height, 3);
        assert_eq!(sub[0].scanline_width, 5 * 3 + 1);
        assert_eq!(widest, 16);
        assert!(sub[1..].iter().all(|s| s.width == 0 && s.height == 0));
    }

    #[test]
    fn adam7_pass_geometry_for_8x8()
    {
        let (sub, _) = calculate_subimages(&info(8, 8, InterlaceMethod::Adam7), 3).unwrap();

        let dims: Vec<(usize, usize)> = sub.iter().map(|s| (s.width, s.height)).collect();

        assert_eq!(
            dims,
            vec![(1, 1), (1, 1), (2, 1), (2, 2), (4, 2), (4, 4), (8, 4)]
        );
    }

    #[test]
    fn adam7_small_images_skip_passes()
    {
        let (sub, _) = calculate_subimages(&info(1, 1, InterlaceMethod::Adam7), 3).unwrap();

        assert_eq!((sub[0].width, sub[0].height), (1, 1));
        // every other pass is empty in one or both dimensions
        assert!(sub[1..].iter().all(|s| s.width == 0 || s.height == 0));

        let (sub, _) = calculate_subimages(&info(4, 4, InterlaceMethod::Adam7), 3).unwrap();

        assert_eq!((sub[1].width, sub[1].height), (0, 1));
        assert_eq!((sub[2].width, sub[2].height), (1, 0));
        assert_eq!((sub[3].width, sub[3].height), (1, 1));
    }

    #[test]
    fn sub_byte_scanlines_round_up()
    {
        let mut i = info(3, 2, InterlaceMethod::Standard);

        i.depth = 1;
        i.color = PngColor::Luma;
        i.component = 1;

        let (sub, _) = calculate_subimages(&i, 1).unwrap();

        // 3 one-bit samples fit one byte, plus the filter byte
        assert_eq!(sub[0].scanline_width, 2);
    }
}
