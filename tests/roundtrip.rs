use image::{Rgb, RgbImage};
use quadtone::compression::{compress_image, decompress_image, encode, CompressedImage};
use rand::{rngs::ThreadRng, Rng};
use std::io::Cursor;

// Returns a random image with the given dimensions.
fn random_rgb(width: u32, height: u32, rng: &mut ThreadRng) -> RgbImage {
    let mut image = RgbImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let (r, g, b) = (rng.gen(), rng.gen(), rng.gen());
            image.put_pixel(x, y, Rgb([r, g, b]));
        }
    }
    image
}

#[test]
fn test_serialize_deserialize_is_byte_identical() {
    let dimensions = vec![
        (1, 1),
        (4, 4),
        (3, 5),
        (8, 8),
        (17, 9),
        (100, 40),
        (124, 274),
        (640, 480),
    ];
    let mut rng = rand::thread_rng();

    for (width, height) in dimensions {
        let image = random_rgb(width, height, &mut rng);

        let mut first = Vec::new();
        compress_image(&image, &mut first).unwrap();

        // Reading the stream back and re-serializing must reproduce it
        // byte for byte.
        let decoded = CompressedImage::read_from(Cursor::new(&first)).unwrap();
        let mut second = Vec::new();
        decoded.write_to(&mut second).unwrap();
        assert_eq!(first, second, "{}x{}", width, height);
    }
}

#[test]
fn test_stream_roundtrip_restores_dimensions() {
    let mut rng = rand::thread_rng();

    // Heights that are multiples of 4 survive the legacy height
    // reconstruction exactly.
    for (width, height) in [(4, 4), (8, 8), (60, 44), (25, 16)] {
        let image = random_rgb(width, height, &mut rng);
        let mut sink = Vec::new();
        compress_image(&image, &mut sink).unwrap();

        let decoded = decompress_image(Cursor::new(&sink)).unwrap();
        assert_eq!(decoded.dimensions(), (width, height));
    }

    // A partial trailing block row rounds the reconstructed height up.
    let image = random_rgb(8, 10, &mut rng);
    let mut sink = Vec::new();
    compress_image(&image, &mut sink).unwrap();
    let decoded = decompress_image(Cursor::new(&sink)).unwrap();
    assert_eq!(decoded.dimensions(), (8, 12));
}

#[test]
fn test_compressed_size() {
    let mut rng = rand::thread_rng();

    // 6 bytes per 4x4 block plus the width prefix, independent of content.
    for (width, height, blocks) in [(8u32, 8u32, 4usize), (640, 480, 160 * 120), (5, 3, 2)] {
        let image = random_rgb(width, height, &mut rng);
        let compressed = encode(&image);
        assert_eq!(compressed.block_count(), blocks);
        assert_eq!(compressed.byte_count(), 2 + 6 * blocks);

        let mut sink = Vec::new();
        compressed.write_to(&mut sink).unwrap();
        assert_eq!(sink.len(), compressed.byte_count());
    }
}

#[test]
fn test_decoded_tones_come_from_the_block() {
    // Every decoded pixel must be one of its block's two representative
    // tones: brightness within a block takes at most two distinct values.
    let mut rng = rand::thread_rng();
    let image = random_rgb(32, 32, &mut rng);
    let compressed = encode(&image);
    let decoded = quadtone::compression::decode(&compressed, 32);

    for by in (0..32).step_by(4) {
        for bx in (0..32).step_by(4) {
            let mut tones = Vec::new();
            for oy in 0..4 {
                for ox in 0..4 {
                    let pixel = *decoded.get_pixel(bx + ox, by + oy);
                    if !tones.contains(&pixel) {
                        tones.push(pixel);
                    }
                }
            }
            assert!(tones.len() <= 2, "block ({}, {}) has tones {:?}", bx, by, tones);
        }
    }
}
