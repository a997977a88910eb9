use super::color_space::{brightness, pack_lossy, unpack_lossy};
use super::error::DecompressionError;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use image::Rgb;
use std::io::{self, Read, Write};

/// Side length of a quantization block, in pixels.
pub const BLOCK_DIM: u32 = 4;

/// A block-quantized image: per block, two 16-bit packed representative
/// tones and a 16-bit mask selecting one of them for each pixel.
///
/// The three per-block arrays are index-aligned over the row-major block
/// grid. Block `(x, y)` of the pixel plane lives at grid index
/// `(x / 4) + (y / 4) * grid_width`, and bit `(x % 4) + (y % 4) * 4` of its
/// mask selects the hi (bit set) or lo (bit clear) tone for that pixel.
pub struct CompressedImage {
    width: u16,
    grid_width: usize,
    hi_colors: Vec<u16>,
    lo_colors: Vec<u16>,
    masks: Vec<u16>,
    // Encoder scratch, one threshold per block. Never serialized; all-None
    // after deserialization.
    thresholds: Vec<Option<u8>>,
}

impl CompressedImage {
    /// Creates an empty compressed image sized for a `width` x `height`
    /// pixel source. All blocks start with zeroed tones and masks.
    ///
    /// # Panics
    ///
    /// Panics if `width` does not fit the `u16` stored in the stream format.
    pub fn new(width: u32, height: u32) -> CompressedImage {
        assert!(
            width <= u32::from(u16::MAX),
            "image width {} does not fit the stored u16",
            width
        );
        let grid_width = width.div_ceil(BLOCK_DIM) as usize;
        let grid_height = height.div_ceil(BLOCK_DIM) as usize;
        let grid_count = grid_width * grid_height;

        CompressedImage {
            width: width as u16,
            grid_width,
            hi_colors: vec![0; grid_count],
            lo_colors: vec![0; grid_count],
            masks: vec![0; grid_count],
            thresholds: vec![None; grid_count],
        }
    }

    fn grid_index(&self, x: u32, y: u32) -> usize {
        (x / BLOCK_DIM) as usize + (y / BLOCK_DIM) as usize * self.grid_width
    }

    /// Stores the representative tones and the brightness threshold for the
    /// block containing pixel `(x, y)`. Must be called for a block before
    /// any [`set_pixel`](Self::set_pixel) in that block.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the block grid.
    pub fn set_colors(&mut self, x: u32, y: u32, hi: Rgb<u8>, lo: Rgb<u8>, average_brightness: u8) {
        let gidx = self.grid_index(x, y);
        self.hi_colors[gidx] = pack_lossy(hi);
        self.lo_colors[gidx] = pack_lossy(lo);
        self.thresholds[gidx] = Some(average_brightness);
    }

    /// Sets the mask bit for pixel `(x, y)` from its original color: the bit
    /// selects the hi tone iff the color is strictly brighter than the
    /// block's threshold, the lo tone otherwise (equal brightness always
    /// maps to lo).
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the block grid, or if
    /// [`set_colors`](Self::set_colors) was never called for the containing
    /// block (the threshold the comparison needs would be undefined).
    pub fn set_pixel(&mut self, x: u32, y: u32, original: Rgb<u8>) {
        let gidx = self.grid_index(x, y);
        let pidx = (x % BLOCK_DIM) + (y % BLOCK_DIM) * BLOCK_DIM;
        let threshold = self.thresholds[gidx]
            .expect("set_colors must be called for a block before set_pixel");

        if brightness(original) > threshold {
            self.masks[gidx] |= 1 << pidx;
        } else {
            self.masks[gidx] &= !(1 << pidx);
        }
    }

    /// Returns the rendered color of pixel `(x, y)`: the block's hi or lo
    /// tone, as selected by the pixel's mask bit, through the lossy 16-bit
    /// unpacking path.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the block grid.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        let gidx = self.grid_index(x, y);
        let pidx = (x % BLOCK_DIM) + (y % BLOCK_DIM) * BLOCK_DIM;

        if self.masks[gidx] & (1 << pidx) == 0 {
            unpack_lossy(self.lo_colors[gidx])
        } else {
            unpack_lossy(self.hi_colors[gidx])
        }
    }

    /// Writes the image to a stream: `u16` width, then `(hi, lo, mask)` as
    /// three `u16`s per block in grid order, all little-endian.
    pub fn write_to<W>(&self, mut to: W) -> io::Result<()>
    where
        W: Write,
    {
        to.write_u16::<LittleEndian>(self.width)?;
        for i in 0..self.masks.len() {
            to.write_u16::<LittleEndian>(self.hi_colors[i])?;
            to.write_u16::<LittleEndian>(self.lo_colors[i])?;
            to.write_u16::<LittleEndian>(self.masks[i])?;
        }
        Ok(())
    }

    /// Reads an image from a stream, consuming 6-byte block records until
    /// the stream ends cleanly on a record boundary.
    ///
    /// A stream that ends inside a record is rejected with
    /// [`DecompressionError::TruncatedStream`], and a stored width of zero
    /// with [`DecompressionError::DegenerateWidth`].
    pub fn read_from<R>(mut from: R) -> Result<CompressedImage, DecompressionError>
    where
        R: Read,
    {
        let width = from.read_u16::<LittleEndian>()?;
        if width == 0 {
            return Err(DecompressionError::DegenerateWidth);
        }

        let mut hi_colors = Vec::new();
        let mut lo_colors = Vec::new();
        let mut masks = Vec::new();

        let mut record = [0u8; 6];
        loop {
            let filled = fill_record(&mut from, &mut record)?;
            if filled == 0 {
                break;
            }
            if filled < record.len() {
                return Err(DecompressionError::TruncatedStream);
            }
            hi_colors.push(u16::from_le_bytes([record[0], record[1]]));
            lo_colors.push(u16::from_le_bytes([record[2], record[3]]));
            masks.push(u16::from_le_bytes([record[4], record[5]]));
        }

        let grid_count = masks.len();
        Ok(CompressedImage {
            width,
            grid_width: u32::from(width).div_ceil(BLOCK_DIM) as usize,
            hi_colors,
            lo_colors,
            masks,
            thresholds: vec![None; grid_count],
        })
    }

    /// Width of the original image, in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Number of blocks in the grid.
    pub fn block_count(&self) -> usize {
        self.masks.len()
    }

    /// The packed hi tone of every block, in grid order.
    pub fn hi_colors(&self) -> &[u16] {
        &self.hi_colors
    }

    /// The packed lo tone of every block, in grid order.
    pub fn lo_colors(&self) -> &[u16] {
        &self.lo_colors
    }

    /// The pixel mask of every block, in grid order.
    pub fn masks(&self) -> &[u16] {
        &self.masks
    }

    /// Reconstructs the image height from the number of blocks, as
    /// `(block_count / grid_width) * 4`.
    ///
    /// The stream format does not store the height, so this is the best the
    /// deserializer can do. It is only exact when the original height was a
    /// multiple of 4; a trailing partial block row rounds the result up to
    /// the next multiple, and the reconstruction cannot tell a clean short
    /// stream from a wrong one. Callers that know the real height should
    /// use it instead.
    pub fn legacy_height(&self) -> u32 {
        (self.masks.len() / self.grid_width.max(1)) as u32 * BLOCK_DIM
    }

    /// Exact size of the serialized image in bytes: one `u16` for the
    /// width and three per block.
    pub fn byte_count(&self) -> usize {
        const FIELD_SIZE: usize = std::mem::size_of::<u16>();
        FIELD_SIZE + 3 * FIELD_SIZE * self.masks.len()
    }
}

/// Fills `record` from the stream, returning how many bytes were read.
/// Anything between 0 (clean end) and the record length (complete) means
/// the stream ended mid-record.
fn fill_record<R>(from: &mut R, record: &mut [u8; 6]) -> io::Result<usize>
where
    R: Read,
{
    let mut filled = 0;
    while filled < record.len() {
        let n = from.read(&mut record[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
