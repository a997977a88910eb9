use super::color_space::{brightness, rgb_to_ycbcr, ycbcr_to_rgb};
use image::Rgb;

/// Number of pixels in one quantization block (4x4).
pub const BLOCK_PIXELS: usize = 16;

/// Normalization constant for the decaying weighted average. This is a
/// tuning value, deliberately below the raw weight sum (1 + 1/2 + ... + 1/8),
/// and must be reproduced exactly for bit-compatible output.
const DECAY_NORMALIZER: f64 = 2.59285714285714;

/// The two representative tones of a 4x4 block, plus the brightness
/// threshold that decides which tone each pixel maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockQuantization {
    /// Representative tone of the darker half of the block.
    pub lo: Rgb<u8>,
    /// Representative tone of the brighter half of the block.
    pub hi: Rgb<u8>,
    /// Truncated arithmetic mean of the 16 sample brightness values.
    pub average_brightness: u8,
}

/// Reduces the 16 row-major samples of one 4x4 block to a
/// [`BlockQuantization`].
///
/// The samples are ranked by brightness with a stable sort, so samples of
/// equal brightness keep their input order. `lo` is a decaying weighted
/// average over the 8 darkest samples (the darkest gets weight 1, the 8th
/// darkest 1/8) and `hi` the mirror image over the 8 brightest. Weighting
/// toward the extremes preserves contrast better than a flat average of
/// each half, at the cost of sensitivity to a single outlier pixel.
pub fn quantize_block(samples: &[Rgb<u8>; BLOCK_PIXELS]) -> BlockQuantization {
    let mut ranked: Vec<(u8, Rgb<u8>)> = samples
        .iter()
        .map(|&color| (brightness(color), color))
        .collect();

    let brightness_sum: u32 = ranked.iter().map(|&(b, _)| u32::from(b)).sum();
    let average_brightness = (brightness_sum / BLOCK_PIXELS as u32) as u8;

    // sort_by_key is stable, ties keep raster order.
    ranked.sort_by_key(|&(b, _)| b);

    let lo = decayed_average(ranked[..8].iter().map(|&(_, color)| color));
    let hi = decayed_average(ranked[8..].iter().rev().map(|&(_, color)| color));

    BlockQuantization {
        lo,
        hi,
        average_brightness,
    }
}

/// Averages up to 8 colors in Y/Cb/Cr space with weights decaying as
/// `1/(i+1)`, normalized by `DECAY_NORMALIZER`.
fn decayed_average(colors: impl Iterator<Item = Rgb<u8>>) -> Rgb<u8> {
    let (mut y, mut cb, mut cr) = (0.0, 0.0, 0.0);
    for (i, color) in colors.enumerate() {
        let (sy, scb, scr) = rgb_to_ycbcr(color);
        let weight = (i + 1) as f64;
        y += sy / weight;
        cb += scb / weight;
        cr += scr / weight;
    }
    ycbcr_to_rgb(
        y / DECAY_NORMALIZER,
        cb / DECAY_NORMALIZER,
        cr / DECAY_NORMALIZER,
    )
}
