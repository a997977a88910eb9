use image::RgbImage;
use std::io::{self, Read, Write};

pub use block::{quantize_block, BlockQuantization, BLOCK_PIXELS};
pub use error::DecompressionError;
pub use format::{CompressedImage, BLOCK_DIM};

mod block;
pub mod color_space;
mod error;
mod format;

/// Captures the 16 row-major samples of the block whose top-left corner is
/// `(bx, by)`. Blocks cut off by the image edge are padded by clamping to
/// the last in-bounds row/column, so edge blocks are quantized from their
/// replicated window.
fn capture_block(image: &RgbImage, bx: u32, by: u32) -> [image::Rgb<u8>; BLOCK_PIXELS] {
    let (width, height) = image.dimensions();
    let mut samples = [image::Rgb([0u8, 0, 0]); BLOCK_PIXELS];
    for oy in 0..BLOCK_DIM {
        for ox in 0..BLOCK_DIM {
            let x = (bx + ox).min(width - 1);
            let y = (by + oy).min(height - 1);
            samples[(ox + oy * BLOCK_DIM) as usize] = *image.get_pixel(x, y);
        }
    }
    samples
}

/// Encodes an image by quantizing every 4x4 tile: the tile's representative
/// tones and threshold first, then one mask bit per in-bounds pixel.
///
/// # Panics
///
/// Panics if the image is wider than `u16::MAX` pixels.
pub fn encode(image: &RgbImage) -> CompressedImage {
    let (width, height) = image.dimensions();
    let mut compressed = CompressedImage::new(width, height);

    for by in (0..height).step_by(BLOCK_DIM as usize) {
        for bx in (0..width).step_by(BLOCK_DIM as usize) {
            let samples = capture_block(image, bx, by);
            let quantized = quantize_block(&samples);
            compressed.set_colors(bx, by, quantized.hi, quantized.lo, quantized.average_brightness);

            for oy in 0..BLOCK_DIM {
                for ox in 0..BLOCK_DIM {
                    let (x, y) = (bx + ox, by + oy);
                    if x < width && y < height {
                        compressed.set_pixel(x, y, *image.get_pixel(x, y));
                    }
                }
            }
        }
    }
    compressed
}

/// Reconstructs a pixel grid of the given height by querying the compressed
/// image per pixel.
pub fn decode(compressed: &CompressedImage, height: u32) -> RgbImage {
    RgbImage::from_fn(compressed.width(), height, |x, y| compressed.get_pixel(x, y))
}

/// Encodes `image` and writes the serialized form to the given stream. The
/// stream may be anything `Write`, including a compressing wrapper; the
/// codec itself only emits raw bytes.
pub fn compress_image<W>(image: &RgbImage, to: W) -> io::Result<()>
where
    W: Write,
{
    encode(image).write_to(to)
}

/// Reads a serialized image from the given stream and decodes it.
///
/// The stream format does not store the image height, so it is
/// reconstructed via [`CompressedImage::legacy_height`]; see there for when
/// that reconstruction is off. Callers that know the real height should use
/// [`CompressedImage::read_from`] and [`decode`] directly.
pub fn decompress_image<R>(from: R) -> Result<RgbImage, DecompressionError>
where
    R: Read,
{
    let compressed = CompressedImage::read_from(from)?;
    let height = compressed.legacy_height();
    Ok(decode(&compressed, height))
}
