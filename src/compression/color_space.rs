use image::Rgb;

/// Converts from RGB to the Y/Cb/Cr luma-chroma space using ITU-R BT.601
/// studio-swing coefficients, at full precision.
///
/// The returned channels are not clipped; the quantizer accumulates these
/// raw values when it averages colors, and only clips on the way back to RGB.
pub fn rgb_to_ycbcr(color: Rgb<u8>) -> (f64, f64, f64) {
    let Rgb([r, g, b]) = color;
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));

    let y = 16.0 + (0.257 * r + 0.504 * g + 0.098 * b);
    let cb = 128.0 + (-0.148 * r + -0.291 * g + 0.439 * b);
    let cr = 128.0 + (0.439 * r + -0.368 * g + -0.071 * b);
    (y, cb, cr)
}

/// The opposite of `rgb_to_ycbcr`. Each output channel is clipped to `[0, 255]`.
pub fn ycbcr_to_rgb(y: f64, cb: f64, cr: f64) -> Rgb<u8> {
    let r = clip(1.164 * (y - 16.0) + 1.596 * (cr - 128.0));
    let g = clip(1.164 * (y - 16.0) + -0.392 * (cb - 128.0) + -0.813 * (cr - 128.0));
    let b = clip(1.164 * (y - 16.0) + 2.017 * (cb - 128.0));
    Rgb([r, g, b])
}

/// Packs a color into the full-precision Y/Cb/Cr form: 8 bits per channel,
/// 24 bits used out of 32, laid out as `Y << 16 | Cb << 8 | Cr`.
pub fn pack_full(color: Rgb<u8>) -> u32 {
    let (y, cb, cr) = rgb_to_ycbcr(color);
    (u32::from(clip(y)) << 16) | (u32::from(clip(cb)) << 8) | u32::from(clip(cr))
}

/// Unpacks the full-precision Y/Cb/Cr form back into RGB.
pub fn unpack_full(packed: u32) -> Rgb<u8> {
    let y = (packed >> 16) & 0xFF;
    let cb = (packed >> 8) & 0xFF;
    let cr = packed & 0xFF;
    ycbcr_to_rgb(f64::from(y), f64::from(cb), f64::from(cr))
}

/// Packs a color into the 16-bit lossy Y/Cb/Cr form: the channels are
/// truncated to 6/5/5 bits and laid out as `Y << 10 | Cb << 5 | Cr`.
pub fn pack_lossy(color: Rgb<u8>) -> u16 {
    let (y, cb, cr) = rgb_to_ycbcr(color);
    let y = u16::from(clip(y)) >> 2; // 6 bits
    let cb = u16::from(clip(cb)) >> 3; // 5 bits
    let cr = u16::from(clip(cr)) >> 3; // 5 bits
    (y << 10) | (cb << 5) | cr
}

/// Unpacks the 16-bit lossy form back into RGB. The truncated low bits come
/// back as zero, so a round trip quantizes each channel to its 6/5/5 grid.
pub fn unpack_lossy(packed: u16) -> Rgb<u8> {
    let y = ((packed >> 10) & 0x3F) << 2;
    let cb = ((packed >> 5) & 0x1F) << 3;
    let cr = (packed & 0x1F) << 3;
    ycbcr_to_rgb(f64::from(y), f64::from(cb), f64::from(cr))
}

/// The perceived brightness of a color: the BT.601 Y channel alone,
/// truncated to a byte.
pub fn brightness(color: Rgb<u8>) -> u8 {
    let Rgb([r, g, b]) = color;
    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    clip(16.0 + (0.257 * r + 0.504 * g + 0.098 * b))
}

/// Saturates to `[0, 255]` and truncates toward zero.
fn clip(v: f64) -> u8 {
    if v > 255.0 {
        255
    } else if v < 0.0 {
        0
    } else {
        v as u8
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_known_conversions() {
        // Black and white sit at the studio-swing extremes of the Y axis,
        // with neutral chroma.
        assert_eq!(rgb_to_ycbcr(Rgb([0, 0, 0])), (16.0, 128.0, 128.0));

        let (y, cb, cr) = rgb_to_ycbcr(Rgb([255, 255, 255]));
        assert!((y - 235.045).abs() < 1e-9);
        assert!((cb - 128.0).abs() < 1e-9);
        assert!((cr - 128.0).abs() < 1e-9);

        assert_eq!(brightness(Rgb([0, 0, 0])), 16);
        assert_eq!(brightness(Rgb([255, 255, 255])), 235);
    }

    #[test]
    fn test_clip_saturates() {
        assert_eq!(clip(-3.2), 0);
        assert_eq!(clip(300.0), 255);
        assert_eq!(clip(41.99), 41); // truncates toward zero
        assert_eq!(ycbcr_to_rgb(255.0, 255.0, 255.0), Rgb([255, 255, 255]));
        assert_eq!(ycbcr_to_rgb(0.0, 128.0, 128.0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_full_pack_layout() {
        let packed = pack_full(Rgb([0, 0, 0]));
        assert_eq!(packed, (16 << 16) | (128 << 8) | 128);

        let packed = pack_full(Rgb([255, 255, 255]));
        assert_eq!(packed, (235 << 16) | (128 << 8) | 128);
    }

    #[test]
    fn test_lossy_pack_layout() {
        let packed = pack_lossy(Rgb([0, 0, 0]));
        assert_eq!(packed, ((16 >> 2) << 10) | ((128 >> 3) << 5) | (128 >> 3));

        // Neutral grays survive the round trip exactly on the chroma axes.
        assert_eq!(unpack_lossy(packed), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_brightness_matches_y_channel() {
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let color = Rgb([r as u8, g as u8, b as u8]);
                    let (y, _, _) = rgb_to_ycbcr(color);
                    assert_eq!(brightness(color), clip(y));
                }
            }
        }
    }

    #[test]
    fn test_lossy_roundtrip_within_quantization_step() {
        // Truncating to 6/5/5 bits loses at most 3 on the Y axis and 7 on
        // each chroma axis.
        for r in (0..=255).step_by(7) {
            for g in (0..=255).step_by(7) {
                for b in (0..=255).step_by(7) {
                    let color = Rgb([r as u8, g as u8, b as u8]);
                    let (y, cb, cr) = rgb_to_ycbcr(color);
                    let (y, cb, cr) = (clip(y), clip(cb), clip(cr));

                    let packed = pack_lossy(color);
                    let ry = ((packed >> 10) & 0x3F) << 2;
                    let rcb = ((packed >> 5) & 0x1F) << 3;
                    let rcr = (packed & 0x1F) << 3;

                    assert!(u16::from(y) - ry <= 3);
                    assert!(u16::from(cb) - rcb <= 7);
                    assert!(u16::from(cr) - rcr <= 7);
                }
            }
        }
    }
}
