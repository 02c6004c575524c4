//! Pixel sources: decoded images, raw byte buffers and loosely typed
//! triples.
//!
//! Everything here turns some outside representation into a stream of
//! [`PixelSample`]s for the extractor. Alpha channels are dropped, never
//! interpreted.

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use log::debug;
use palette::Srgb;
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
use crate::config::ExtractorConfig;
use crate::error::{PaletteError, Result};
#[cfg(not(target_arch = "wasm32"))]
use crate::extract::{Palette, PaletteExtractor};
use crate::extract::PixelSample;

const CHANNEL_NAMES: [&str; 3] = ["red", "green", "blue"];

/// Decode an encoded image (PNG, JPEG, ...) from memory.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Shrink `img` so its longest side is at most `longest_side`, keeping the
/// aspect ratio. Images already small enough are returned untouched.
pub fn downscale(img: DynamicImage, longest_side: u32) -> DynamicImage {
    let (orig_w, orig_h) = img.dimensions();
    let max_side = orig_w.max(orig_h);
    if longest_side == 0 || max_side <= longest_side {
        return img;
    }

    let ratio = longest_side as f32 / max_side as f32;
    let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
    let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
    debug!("downscaling {orig_w}x{orig_h} -> {w}x{h}");
    DynamicImage::ImageRgba8(image::imageops::resize(&img, w, h, FilterType::Nearest))
}

/// Every pixel of `img`, row-major.
pub fn samples(img: &DynamicImage) -> impl Iterator<Item = PixelSample> + '_ {
    img.pixels().map(|(_, _, px)| Srgb::new(px[0], px[1], px[2]))
}

fn chunked(bytes: &[u8], stride: usize) -> impl Iterator<Item = Result<PixelSample>> + '_ {
    let chunks = bytes.chunks_exact(stride);
    let remainder = chunks.remainder().len();
    let tail = (remainder > 0).then(|| {
        Err(PaletteError::malformed(format!(
            "trailing {remainder} byte(s) do not form a {stride}-byte pixel"
        )))
    });
    chunks
        .map(|px| Ok(Srgb::new(px[0], px[1], px[2])))
        .chain(tail)
}

/// Interleaved RGBA bytes, as handed out by a canvas. A trailing partial
/// pixel shows up as one malformed sample.
pub fn rgba_samples(bytes: &[u8]) -> impl Iterator<Item = Result<PixelSample>> + '_ {
    chunked(bytes, 4)
}

/// Interleaved RGB bytes.
pub fn rgb_samples(bytes: &[u8]) -> impl Iterator<Item = Result<PixelSample>> + '_ {
    chunked(bytes, 3)
}

/// Validate wide integer channels into a sample.
pub fn sample_from_channels(r: i64, g: i64, b: i64) -> Result<PixelSample> {
    let mut out = [0u8; 3];
    for ((slot, value), channel) in out.iter_mut().zip([r, g, b]).zip(CHANNEL_NAMES) {
        *slot = u8::try_from(value)
            .map_err(|_| PaletteError::InvalidChannel { channel, value })?;
    }
    Ok(Srgb::new(out[0], out[1], out[2]))
}

/// Validate a JSON value of the form `[r, g, b]` or `[r, g, b, a]`.
pub fn sample_from_json(value: &Value) -> Result<PixelSample> {
    let items = value
        .as_array()
        .ok_or_else(|| PaletteError::malformed(format!("expected an array, got {value}")))?;
    if !(3..=4).contains(&items.len()) {
        return Err(PaletteError::malformed(format!(
            "expected 3 or 4 channels, got {}",
            items.len()
        )));
    }

    let channel = |i: usize| {
        items[i]
            .as_i64()
            .ok_or_else(|| PaletteError::malformed(format!("non-integer channel {}", items[i])))
    };
    sample_from_channels(channel(0)?, channel(1)?, channel(2)?)
}

/// Samples from a JSON document holding an array of pixel arrays.
pub fn json_samples(document: &Value) -> Result<Vec<Result<PixelSample>>> {
    let pixels = document
        .as_array()
        .ok_or_else(|| PaletteError::malformed("pixel document must be a JSON array"))?;
    Ok(pixels.iter().map(sample_from_json).collect())
}

/// Decode, optionally downscale, and extract the palette of an encoded
/// image. Native only; the wasm entry points take their own path.
#[cfg(not(target_arch = "wasm32"))]
pub fn extract_palette_bytes(input: &[u8], config: &ExtractorConfig) -> Result<Palette> {
    let img = decode(input)?;
    let img = match config.downscale {
        Some(side) => downscale(img, side),
        None => img,
    };
    let extractor = PaletteExtractor::new(config.clone());
    Ok(extractor.extract(samples(&img)))
}
