//! Scanline defiltering.
//!
//! Every scanline is preceded by a filter byte naming one of five
//! predictors; reversal works byte-wise modulo 256 against the previous
//! *defiltered* scanline. The first row of each interlace pass uses an
//! all-zero previous row, which makes the generic loops below handle it
//! with no special casing.

use crate::enums::FilterType;
use crate::error::PngErrors;

/// The Paeth predictor, nearest of (a, b, c) to a + b − c with ties
/// favouring a then b.
fn paeth(a: u8, b: u8, c: u8) -> u8
{
    let p = i16::from(a) + i16::from(b) - i16::from(c);

    let pa = (p - i16::from(a)).abs();
    let pb = (p - i16::from(b)).abs();
    let pc = (p - i16::from(c)).abs();

    if pa <= pb && pa <= pc
    {
        a
    }
    else if pb <= pc
    {
        b
    }
    else
    {
        c
    }
}

pub(crate) fn handle_sub(scanline: &mut [u8], bpp: usize)
{
    for i in bpp..scanline.len()
    {
        scanline[i] = scanline[i].wrapping_add(scanline[i - bpp]);
    }
}

pub(crate) fn handle_up(prev_row: &[u8], scanline: &mut [u8])
{
    for (current, above) in scanline.iter_mut().zip(prev_row)
    {
        *current = current.wrapping_add(*above);
    }
}

pub(crate) fn handle_avg(prev_row: &[u8], scanline: &mut [u8], bpp: usize)
{
    // first pixel has no left neighbour, a = 0
    for i in 0..bpp.min(scanline.len())
    {
        scanline[i] = scanline[i].wrapping_add(prev_row[i] >> 1);
    }

    for i in bpp..scanline.len()
    {
        let avg = (u16::from(scanline[i - bpp]) + u16::from(prev_row[i])) >> 1;

        scanline[i] = scanline[i].wrapping_add(avg as u8);
    }
}

pub(crate) fn handle_paeth(prev_row: &[u8], scanline: &mut [u8], bpp: usize)
{
    // a = c = 0 collapses the predictor to b
    for i in 0..bpp.min(scanline.len())
    {
        scanline[i] = scanline[i].wrapping_add(prev_row[i]);
    }

    for i in bpp..scanline.len()
    {
        let predictor = paeth(scanline[i - bpp], prev_row[i], prev_row[i - bpp]);

        scanline[i] = scanline[i].wrapping_add(predictor);
    }
}

/// Defilter `scanline` in place.
///
/// `prev_row` must be the previous defiltered scanline of the same
/// pass, zero-filled for the first one, and at least as long as
/// `scanline`.
pub(crate) fn defilter_scanline(
    prev_row: &[u8], scanline: &mut [u8], bpp: usize, filter: u8
) -> Result<(), PngErrors>
{
    let filter = FilterType::from_int(filter).ok_or(PngErrors::Filter(filter))?;

    match filter
    {
        FilterType::None => {}
        FilterType::Sub => handle_sub(scanline, bpp),
        FilterType::Up => handle_up(prev_row, scanline),
        FilterType::Average => handle_avg(prev_row, scanline, bpp),
        FilterType::Paeth => handle_paeth(prev_row, scanline, bpp)
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;

    // forward filtering, used to check reversal is exact
    fn apply_filter(prev_row: &[u8], raw: &[u8], bpp: usize, filter: u8) -> Vec<u8>
    {
        let mut out = vec![0_u8; raw.len()];

        for i in 0..raw.len()
        {
            let a = if i >= bpp { raw[i - bpp] } else { 0 };
            let b = prev_row[i];
            let c = if i >= bpp { prev_row[i - bpp] } else { 0 };

            out[i] = match filter
            {
                0 => raw[i],
                1 => raw[i].wrapping_sub(a),
                2 => raw[i].wrapping_sub(b),
                3 => raw[i].wrapping_sub(((u16::from(a) + u16::from(b)) >> 1) as u8),
                4 => raw[i].wrapping_sub(paeth(a, b, c)),
                _ => unreachable!()
            };
        }

        out
    }

    fn sample_row(len: usize, seed: u32) -> Vec<u8>
    {
        // small xorshift so rows are deterministic but not flat
        let mut state = seed | 1;

        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state as u8
            })
            .collect()
    }

    #[test]
    fn round_trips_every_filter()
    {
        for &bpp in &[1_usize, 2, 3, 4, 6, 8]
        {
            let raw = sample_row(61, 0xDEAD_BEEF);
            let prev = sample_row(61, 0x1234_5678);

            for filter in 0..=4_u8
            {
                let mut filtered = apply_filter(&prev, &raw, bpp, filter);

                defilter_scanline(&prev, &mut filtered, bpp, filter).unwrap();

                assert_eq!(filtered, raw, "filter {filter} bpp {bpp}");
            }
        }
    }

    #[test]
    fn first_row_uses_zeroed_previous()
    {
        let raw = sample_row(24, 77);
        let zero = vec![0_u8; 24];

        for filter in 0..=4_u8
        {
            let mut filtered = apply_filter(&zero, &raw, 3, filter);

            defilter_scanline(&zero, &mut filtered, 3, filter).unwrap();

            assert_eq!(filtered, raw);
        }
    }

    #[test]
    fn filter_above_four_is_rejected()
    {
        let prev = [0_u8; 4];
        let mut row = [0_u8; 4];

        assert_eq!(
            defilter_scanline(&prev, &mut row, 1, 5),
            Err(PngErrors::Filter(5))
        );
    }

    #[test]
    fn paeth_picks_nearest_with_a_b_c_precedence()
    {
        // everything ties, a wins
        assert_eq!(paeth(10, 10, 10), 10);
        // a strictly nearest
        assert_eq!(paeth(1, 2, 3), 1);
        // b strictly nearest
        assert_eq!(paeth(1, 3, 1), 3);
        // c nearest, a/b tie does not shadow it
        assert_eq!(paeth(4, 6, 5), 5);
    }
}
