//! Quantization grid and extraction defaults.
//!
//! The grid is fixed: 5 black cells, 5 white cells and 36 x 6 color cells,
//! 226 in total. The saturation breakpoints are not equal intervals and must
//! be kept exactly as they are for palettes to stay comparable.

/// Default number of colors in an extracted palette.
pub const DEFAULT_PALETTE_SIZE: usize = 10;

/// Lightness thresholds for the achromatic cylinders.
pub mod lightness {
    /// At or below this lightness a sample goes to a black cell.
    pub const BLACK_MAX: f64 = 0.05;

    /// At or above this lightness a sample goes to a white cell.
    pub const WHITE_MIN: f64 = 0.95;
}

/// Hue slicing.
pub mod hue {
    /// Full hue circle in degrees.
    pub const FULL_TURN: f64 = 360.0;

    /// Slices around the black and white cylinders.
    pub const ACHROMATIC_SLICES: usize = 5;

    /// Width of one black/white slice in degrees.
    pub const ACHROMATIC_SLICE_WIDTH: f64 = FULL_TURN / ACHROMATIC_SLICES as f64;

    /// Slices around the color cylinder.
    pub const COLOR_SLICES: usize = 36;

    /// Width of one color slice in degrees.
    pub const COLOR_SLICE_WIDTH: f64 = FULL_TURN / COLOR_SLICES as f64;
}

/// Saturation banding of the color cylinder.
pub mod saturation {
    /// Band boundaries in percent. A value equal to a boundary belongs to the
    /// upper band.
    pub const BAND_BOUNDARIES: [f64; 5] = [40.8, 57.7, 70.7, 81.6, 91.3];

    /// Number of saturation bands per hue slice.
    pub const BANDS: usize = BAND_BOUNDARIES.len() + 1;
}

/// Total number of quantization cells.
pub const BUCKET_COUNT: usize =
    2 * hue::ACHROMATIC_SLICES + hue::COLOR_SLICES * saturation::BANDS;
