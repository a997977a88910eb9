//! A lossy block-quantizing image codec.
//!
//! Every 4x4 pixel block of the source image is reduced to two representative
//! tones (a dark "lo" color and a bright "hi" color, both stored as 16-bit
//! packed luma/chroma) plus a 16-bit mask that picks one of the two tones for
//! each pixel in the block. A compressed image is therefore 6 bytes per block,
//! or roughly 3 bits per pixel, before any outer byte-stream compression.
//!
//! # Stream format
//!
//! All integers are little-endian:
//!
//! - `u16` image width in pixels
//! - for every block, in row-major grid order: `u16` hi color, `u16` lo
//!   color, `u16` pixel mask
//!
//! The image height is not stored; see
//! [`CompressedImage::legacy_height`](compression::CompressedImage::legacy_height)
//! for the caveats around reconstructing it.

pub mod compression;
