//! Dominant color palettes for raster images.
//!
//! Pixels are converted to HSL and dropped into a fixed grid of 226 buckets
//! (5 black, 5 white, 36 hue slices x 6 saturation bands). Each bucket keeps
//! a running average of its samples; the most populated buckets become the
//! palette, heaviest first, as `#RRGGBB` strings.
//!
//! ```
//! use image_to_palette_wasm::extract;
//! use palette::Srgb;
//!
//! let pixels = std::iter::repeat_n(Srgb::new(255u8, 0, 0), 100)
//!     .chain(std::iter::repeat_n(Srgb::new(0u8, 0, 255), 50));
//! let palette = extract(pixels, 10);
//! assert_eq!(palette.hex_codes(), vec!["#FF0000", "#0000FF"]);
//! ```

use js_sys::Array;
use wasm_bindgen::prelude::*;

pub mod classify;
pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod extract;
pub mod select;
pub mod source;
pub mod store;

pub use classify::{BucketKey, BucketKind, classify};
pub use config::ExtractorConfig;
pub use convert::{Hsi, Hsl, Hsv};
pub use error::{PaletteError, Result};
pub use extract::{Palette, PaletteExtractor, PixelSample, ScanStats, Swatch, extract};
pub use select::TopKSelector;
#[cfg(not(target_arch = "wasm32"))]
pub use source::extract_palette_bytes;
pub use store::{BucketEntry, BucketStore};

fn to_js_array(palette: &Palette) -> Array {
    let out = Array::new();
    for swatch in palette {
        out.push(&JsValue::from_str(&swatch.hex));
    }
    out
}

/// Decode and scan every pixel; the browser side downsizes before calling.
fn palette_from_encoded(input: &[u8], k: usize) -> Result<Palette> {
    let img = source::decode(input)?;
    Ok(PaletteExtractor::with_k(k).extract(source::samples(&img)))
}

/// Dominant colors of an encoded image (PNG, JPEG, ...), most dominant
/// first, as `#RRGGBB` strings.
#[wasm_bindgen(js_name = dominantColors)]
pub fn dominant_colors(input: Vec<u8>, k: usize) -> std::result::Result<Array, JsValue> {
    let palette =
        palette_from_encoded(&input, k).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(to_js_array(&palette))
}

/// Dominant colors of a canvas `ImageData` buffer (interleaved RGBA).
/// Alpha is ignored; a trailing partial pixel is skipped.
#[wasm_bindgen(js_name = dominantColorsRgba)]
pub fn dominant_colors_rgba(data: &[u8], k: usize) -> Array {
    let (palette, _) = PaletteExtractor::with_k(k).extract_checked(source::rgba_samples(data));
    to_js_array(&palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

    #[test]
    fn test_palette_from_encoded_png() {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([0, 0, 255, 255]));
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();

        let palette = palette_from_encoded(&buf, 10).unwrap();
        assert_eq!(palette.hex_codes(), vec!["#0000FF", "#FF0000"]);
        assert_eq!(palette_from_encoded(&buf, 1).unwrap().len(), 1);
    }

    #[test]
    fn test_palette_from_encoded_rejects_garbage() {
        let err = palette_from_encoded(b"not an image", 10).unwrap_err();
        assert!(matches!(err, PaletteError::Decode(_)));
    }
}
