// Copyright @yucwang 2026

use crate::math::constants::Float;

use image::{ ImageError, Rgb, RgbImage };

fn to_srgb_byte(v: Float) -> u8 {
    let clamped = v.max(0.0).min(1.0);
    (clamped.powf(1.0 / 2.2) * 255.0 + 0.5) as u8
}

// Write a tone-mapped 8-bit preview next to the linear EXR output.
pub fn write_png_preview(image: &std::vec::Vec<(Float, Float, Float)>,
                         width: usize,
                         height: usize,
                         file_path: &str) -> Result<(), ImageError> {
    log::info!("Starting writing png preview: {}.", file_path);

    let mut out = RgbImage::new(width as u32, height as u32);
    for (index, pixel) in image.iter().enumerate() {
        let x = (index % width) as u32;
        let y = (index / width) as u32;
        out.put_pixel(x, y, Rgb([
            to_srgb_byte(pixel.0),
            to_srgb_byte(pixel.1),
            to_srgb_byte(pixel.2),
        ]));
    }
    out.save(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srgb_byte_mapping() {
        assert_eq!(to_srgb_byte(0.0), 0);
        assert_eq!(to_srgb_byte(1.0), 255);
        assert_eq!(to_srgb_byte(-2.0), 0);
        assert_eq!(to_srgb_byte(7.5), 255);
        // Mid grey gamma-lifts above linear.
        assert!(to_srgb_byte(0.5) > 128);
    }
}
