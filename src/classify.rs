//! Quantization of HSL samples into the 226-cell bucket grid.
//!
//! Lightness is checked first: anything at or below 5% lightness is black,
//! anything at or above 95% is white, regardless of saturation. The black
//! and white cylinders are cut into 5 hue slices of 72 degrees. Everything
//! else falls into one of 36 hue slices of 10 degrees, each split into 6
//! saturation bands.

use std::fmt;

use crate::constants::{BUCKET_COUNT, hue, lightness, saturation};
use crate::convert::Hsl;

/// What a [`BucketKey`] stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BucketKind {
    Black(u8),
    White(u8),
    Color { hue: u8, band: u8 },
}

/// Identifies one quantization cell.
///
/// Wraps the dense index, so every key names exactly one of the
/// [`BUCKET_COUNT`] cells. Keys come from [`classify`] or from the checked
/// constructors; [`BucketKey::kind`] gives the structured view back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketKey(u8);

impl BucketKey {
    /// Black cell in hue slice `slice`, `None` past the last slice.
    pub fn black(slice: u8) -> Option<Self> {
        Self::from_kind(BucketKind::Black(slice))
    }

    /// White cell in hue slice `slice`, `None` past the last slice.
    pub fn white(slice: u8) -> Option<Self> {
        Self::from_kind(BucketKind::White(slice))
    }

    /// Chromatic cell, `None` if `hue` or `band` is out of range.
    pub fn color(hue: u8, band: u8) -> Option<Self> {
        Self::from_kind(BucketKind::Color { hue, band })
    }

    /// Key for `kind`, or `None` if a slice or band is out of range.
    pub fn from_kind(kind: BucketKind) -> Option<Self> {
        let in_range = match kind {
            BucketKind::Black(slice) | BucketKind::White(slice) => {
                usize::from(slice) < hue::ACHROMATIC_SLICES
            }
            BucketKind::Color { hue: h, band } => {
                usize::from(h) < hue::COLOR_SLICES && usize::from(band) < saturation::BANDS
            }
        };
        in_range.then(|| Self::of(kind))
    }

    /// Caller guarantees `kind` is in range.
    fn of(kind: BucketKind) -> Self {
        let index = match kind {
            BucketKind::Black(slice) => usize::from(slice),
            BucketKind::White(slice) => hue::ACHROMATIC_SLICES + usize::from(slice),
            BucketKind::Color { hue: h, band } => {
                2 * hue::ACHROMATIC_SLICES + usize::from(h) * saturation::BANDS + usize::from(band)
            }
        };
        debug_assert!(index < BUCKET_COUNT, "{kind:?}");
        Self(index as u8)
    }

    /// Dense index in `0..BUCKET_COUNT`: black slices first, then white
    /// slices, then color cells ordered by hue slice and saturation band.
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Inverse of [`BucketKey::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        (index < BUCKET_COUNT).then(|| Self(index as u8))
    }

    pub fn kind(self) -> BucketKind {
        let achromatic = hue::ACHROMATIC_SLICES;
        match self.index() {
            i if i < achromatic => BucketKind::Black(i as u8),
            i if i < 2 * achromatic => BucketKind::White((i - achromatic) as u8),
            i => {
                let offset = i - 2 * achromatic;
                BucketKind::Color {
                    hue: (offset / saturation::BANDS) as u8,
                    band: (offset % saturation::BANDS) as u8,
                }
            }
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            BucketKind::Black(slice) => write!(f, "Black{slice}"),
            BucketKind::White(slice) => write!(f, "White{slice}"),
            BucketKind::Color { hue, band } => write!(f, "Color{hue},{band}"),
        }
    }
}

/// Index of the hue slice of width `width` containing `h`, clamped to the
/// last of `slices`.
#[inline]
fn hue_slice(h: f64, width: f64, slices: usize) -> u8 {
    let slice = (h / width).floor() as usize;
    slice.min(slices - 1) as u8
}

/// Saturation band for `s` in `[0, 1]`.
///
/// The saturation is compared as a percentage against
/// [`saturation::BAND_BOUNDARIES`]; a value sitting exactly on a boundary
/// goes to the upper band.
pub fn saturation_band(s: f64) -> u8 {
    band_for_percent(s.clamp(0.0, 1.0) * 100.0)
}

/// Saturation band for a saturation already expressed in percent.
pub fn band_for_percent(percent: f64) -> u8 {
    saturation::BAND_BOUNDARIES.partition_point(|&boundary| boundary <= percent) as u8
}

/// Classify one HSL sample.
pub fn classify(hsl: Hsl) -> BucketKey {
    let Hsl { h, s, l } = hsl.clamped();

    let kind = if l <= lightness::BLACK_MAX {
        BucketKind::Black(hue_slice(h, hue::ACHROMATIC_SLICE_WIDTH, hue::ACHROMATIC_SLICES))
    } else if l >= lightness::WHITE_MIN {
        BucketKind::White(hue_slice(h, hue::ACHROMATIC_SLICE_WIDTH, hue::ACHROMATIC_SLICES))
    } else {
        BucketKind::Color {
            hue: hue_slice(h, hue::COLOR_SLICE_WIDTH, hue::COLOR_SLICES),
            band: saturation_band(s),
        }
    };
    BucketKey::of(kind)
}
