//! Color space conversions.
//!
//! Every function here is pure. RGB values travel as `palette::Srgb<u8>`;
//! the cylindrical spaces are plain `f64` structs with hue in degrees
//! `[0, 360)` and the other two components in `[0, 1]`.
//!
//! HSL is computed with the classic min/max formula rather than through
//! `palette::Hsl` so that bucket boundaries are evaluated in `f64` on exactly
//! the values the classifier thresholds were chosen for. HSV goes through
//! the `palette` crate; HSI has no `palette` counterpart and is done by hand.

use palette::{FromColor, Hsv as PaletteHsv, Srgb};
use serde::{Deserialize, Serialize};

use crate::constants::hue::FULL_TURN;
use crate::error::{PaletteError, Result};

/// Hue, saturation, lightness.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    /// Hue wrapped into `[0, 360)`, saturation and lightness clamped to
    /// `[0, 1]`. Averaging and round-trips can drift a hair outside range.
    pub fn clamped(self) -> Self {
        Self {
            h: wrap_hue(self.h),
            s: self.s.clamp(0.0, 1.0),
            l: self.l.clamp(0.0, 1.0),
        }
    }
}

/// Hue, saturation, value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

/// Hue, saturation, intensity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsi {
    pub h: f64,
    pub s: f64,
    pub i: f64,
}

/// Wrap a hue in degrees into `[0, 360)`.
pub fn wrap_hue(h: f64) -> f64 {
    let wrapped = h.rem_euclid(FULL_TURN);
    // rem_euclid of a tiny negative number rounds up to exactly 360
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

#[inline]
fn normalized(rgb: Srgb<u8>) -> (f64, f64, f64) {
    (
        f64::from(rgb.red) / 255.0,
        f64::from(rgb.green) / 255.0,
        f64::from(rgb.blue) / 255.0,
    )
}

#[inline]
fn to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Convert an RGB sample to HSL.
pub fn rgb_to_hsl(rgb: Srgb<u8>) -> Hsl {
    let (r, g, b) = normalized(rgb);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl::new(0.0, 0.0, l);
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = if max == r {
        (g - b) / delta + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };

    Hsl::new(wrap_hue(sector * 60.0), s, l)
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Convert HSL back to RGB, rounding each channel to the nearest integer.
pub fn hsl_to_rgb(hsl: Hsl) -> Srgb<u8> {
    let Hsl { h, s, l } = hsl.clamped();

    if s == 0.0 {
        let v = to_channel(l);
        return Srgb::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let t = h / FULL_TURN;

    Srgb::new(
        to_channel(hue_to_channel(p, q, t + 1.0 / 3.0)),
        to_channel(hue_to_channel(p, q, t)),
        to_channel(hue_to_channel(p, q, t - 1.0 / 3.0)),
    )
}

/// Convert an RGB sample to HSV.
pub fn rgb_to_hsv(rgb: Srgb<u8>) -> Hsv {
    let hsv: PaletteHsv = PaletteHsv::from_color(rgb.into_format::<f32>());
    Hsv {
        h: wrap_hue(f64::from(hsv.hue.into_positive_degrees())),
        s: f64::from(hsv.saturation),
        v: f64::from(hsv.value),
    }
}

/// Convert HSV back to RGB.
pub fn hsv_to_rgb(hsv: Hsv) -> Srgb<u8> {
    let hsv: PaletteHsv = PaletteHsv::new(
        wrap_hue(hsv.h) as f32,
        hsv.s.clamp(0.0, 1.0) as f32,
        hsv.v.clamp(0.0, 1.0) as f32,
    );
    let rgb: Srgb = Srgb::from_color(hsv);
    Srgb::new(
        to_channel(f64::from(rgb.red)),
        to_channel(f64::from(rgb.green)),
        to_channel(f64::from(rgb.blue)),
    )
}

/// Convert an RGB sample to HSI using the geometric hue definition.
pub fn rgb_to_hsi(rgb: Srgb<u8>) -> Hsi {
    let (r, g, b) = normalized(rgb);
    let i = (r + g + b) / 3.0;
    let min = r.min(g).min(b);

    if i == 0.0 {
        return Hsi::default();
    }

    let s = 1.0 - min / i;
    let denom = ((r - g) * (r - g) + (r - b) * (g - b)).sqrt();
    if denom == 0.0 {
        return Hsi { h: 0.0, s: 0.0, i };
    }

    let cos_theta = (0.5 * ((r - g) + (r - b)) / denom).clamp(-1.0, 1.0);
    let theta = cos_theta.acos().to_degrees();
    let h = if b <= g { theta } else { FULL_TURN - theta };

    Hsi {
        h: wrap_hue(h),
        s,
        i,
    }
}

/// Convert HSI back to RGB. Out-of-gamut results are clamped.
pub fn hsi_to_rgb(hsi: Hsi) -> Srgb<u8> {
    let h = wrap_hue(hsi.h);
    let s = hsi.s.clamp(0.0, 1.0);
    let i = hsi.i.clamp(0.0, 1.0);

    // Each 120 degree sector has one channel pinned at i(1 - s).
    let sector = |h: f64| {
        let low = i * (1.0 - s);
        let high = i * (1.0 + s * h.to_radians().cos() / (60.0 - h).to_radians().cos());
        let rest = 3.0 * i - (low + high);
        (low, high, rest)
    };

    let (r, g, b) = if h < 120.0 {
        let (low, high, rest) = sector(h);
        (high, rest, low)
    } else if h < 240.0 {
        let (low, high, rest) = sector(h - 120.0);
        (low, high, rest)
    } else {
        let (low, high, rest) = sector(h - 240.0);
        (rest, low, high)
    };

    Srgb::new(to_channel(r), to_channel(g), to_channel(b))
}

/// Format as `#RRGGBB`, uppercase.
pub fn rgb_to_hex(rgb: Srgb<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.red, rgb.green, rgb.blue)
}

/// Parse `#RRGGBB` or `RRGGBB`, case-insensitive.
pub fn hex_to_rgb(input: &str) -> Result<Srgb<u8>> {
    let trimmed = input.trim();
    let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);

    if hex.len() != 6 {
        return Err(PaletteError::invalid_hex(
            input,
            format!("expected 6 hex digits, got {}", hex.len()),
        ));
    }
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(PaletteError::invalid_hex(input, "non-hex character"));
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|e| PaletteError::invalid_hex(input, e.to_string()))
    };

    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Hsl as PaletteHsl;

    fn assert_close(a: Srgb<u8>, b: Srgb<u8>, tolerance: i16) {
        let diff = |x: u8, y: u8| (i16::from(x) - i16::from(y)).abs();
        assert!(
            diff(a.red, b.red) <= tolerance
                && diff(a.green, b.green) <= tolerance
                && diff(a.blue, b.blue) <= tolerance,
            "{a:?} vs {b:?}"
        );
    }

    fn lattice() -> impl Iterator<Item = Srgb<u8>> {
        let steps = [0u8, 1, 17, 64, 100, 127, 128, 180, 200, 254, 255];
        steps.into_iter().flat_map(move |r| {
            steps
                .into_iter()
                .flat_map(move |g| steps.into_iter().map(move |b| Srgb::new(r, g, b)))
        })
    }

    #[test]
    fn test_rgb_to_hsl_primaries() {
        let red = rgb_to_hsl(Srgb::new(255, 0, 0));
        assert_eq!(red, Hsl::new(0.0, 1.0, 0.5));

        let green = rgb_to_hsl(Srgb::new(0, 255, 0));
        assert!((green.h - 120.0).abs() < 1e-9);

        let blue = rgb_to_hsl(Srgb::new(0, 0, 255));
        assert!((blue.h - 240.0).abs() < 1e-9);
        assert!((blue.s - 1.0).abs() < 1e-9);
        assert!((blue.l - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_rgb_to_hsl_achromatic() {
        assert_eq!(rgb_to_hsl(Srgb::new(0, 0, 0)), Hsl::new(0.0, 0.0, 0.0));
        assert_eq!(rgb_to_hsl(Srgb::new(255, 255, 255)), Hsl::new(0.0, 0.0, 1.0));

        let grey = rgb_to_hsl(Srgb::new(128, 128, 128));
        assert_eq!(grey.h, 0.0);
        assert_eq!(grey.s, 0.0);
        assert!((grey.l - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn test_rgb_to_hsl_hue_wraps_for_magenta_side() {
        // red is max and blue > green, so the raw sector is negative
        let hsl = rgb_to_hsl(Srgb::new(255, 0, 128));
        assert!(hsl.h > 300.0 && hsl.h < 360.0, "hue = {}", hsl.h);
    }

    #[test]
    fn test_rgb_to_hsl_agrees_with_palette() {
        for rgb in lattice() {
            let ours = rgb_to_hsl(rgb);
            let theirs: PaletteHsl = PaletteHsl::from_color(rgb.into_format::<f32>());
            assert!((ours.s - f64::from(theirs.saturation)).abs() < 1e-3, "{rgb:?}");
            assert!((ours.l - f64::from(theirs.lightness)).abs() < 1e-3, "{rgb:?}");
            if ours.s > 1e-3 {
                let hue = f64::from(theirs.hue.into_positive_degrees());
                let diff = (ours.h - hue).abs();
                assert!(diff < 1e-2 || (FULL_TURN - diff) < 1e-2, "{rgb:?}");
            }
        }
    }

    #[test]
    fn test_hsl_round_trip() {
        for rgb in lattice() {
            assert_close(hsl_to_rgb(rgb_to_hsl(rgb)), rgb, 1);
        }
    }

    #[test]
    fn test_hsl_round_trip_every_channel_value() {
        // each axis sweeps all 256 values against a coarse grid on the others
        let coarse = [0u8, 37, 128, 201, 255];
        for v in 0..=255u8 {
            for a in coarse {
                for b in coarse {
                    for rgb in [Srgb::new(v, a, b), Srgb::new(a, v, b), Srgb::new(a, b, v)] {
                        assert_close(hsl_to_rgb(rgb_to_hsl(rgb)), rgb, 1);
                    }
                }
            }
        }
    }

    #[test]
    #[ignore = "sweeps all 16.7M colors; run with --release --ignored"]
    fn test_hsl_round_trip_exhaustive() {
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    let rgb = Srgb::new(r, g, b);
                    assert_close(hsl_to_rgb(rgb_to_hsl(rgb)), rgb, 1);
                }
            }
        }
    }

    #[test]
    fn test_hsl_to_rgb_clamps_drift() {
        let rgb = hsl_to_rgb(Hsl::new(-0.000_001, 1.000_000_1, 1.000_000_1));
        assert_eq!(rgb, Srgb::new(255, 255, 255));

        let rgb = hsl_to_rgb(Hsl::new(360.0, 1.0, 0.5));
        assert_eq!(rgb, Srgb::new(255, 0, 0));
    }

    #[test]
    fn test_hsv_round_trip() {
        for rgb in lattice() {
            let hsv = rgb_to_hsv(rgb);
            assert!((0.0..FULL_TURN).contains(&hsv.h));
            assert_close(hsv_to_rgb(hsv), rgb, 1);
        }
    }

    #[test]
    fn test_hsv_values() {
        let hsv = rgb_to_hsv(Srgb::new(0, 0, 255));
        assert!((hsv.h - 240.0).abs() < 1e-3);
        assert!((hsv.s - 1.0).abs() < 1e-6);
        assert!((hsv.v - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_hsi_round_trip() {
        for rgb in lattice() {
            let hsi = rgb_to_hsi(rgb);
            assert!((0.0..FULL_TURN).contains(&hsi.h));
            assert_close(hsi_to_rgb(hsi), rgb, 1);
        }
    }

    #[test]
    fn test_hsi_values() {
        let red = rgb_to_hsi(Srgb::new(255, 0, 0));
        assert!(red.h.abs() < 1e-9);
        assert!((red.s - 1.0).abs() < 1e-9);
        assert!((red.i - 1.0 / 3.0).abs() < 1e-9);

        let grey = rgb_to_hsi(Srgb::new(90, 90, 90));
        assert_eq!(grey.h, 0.0);
        assert_eq!(grey.s, 0.0);
    }

    #[test]
    fn test_rgb_to_hex() {
        assert_eq!(rgb_to_hex(Srgb::new(255, 0, 0)), "#FF0000");
        assert_eq!(rgb_to_hex(Srgb::new(0, 10, 171)), "#000AAB");
        assert_eq!(rgb_to_hex(Srgb::new(0, 0, 0)), "#000000");
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#FF0000").unwrap(), Srgb::new(255, 0, 0));
        assert_eq!(hex_to_rgb("00ff7f").unwrap(), Srgb::new(0, 255, 127));
        assert_eq!(hex_to_rgb(" #000AAB ").unwrap(), Srgb::new(0, 10, 171));
    }

    #[test]
    fn test_hex_to_rgb_invalid() {
        assert!(hex_to_rgb("#FF").is_err());
        assert!(hex_to_rgb("#GGGGGG").is_err());
        assert!(hex_to_rgb("+F+F+F").is_err());
        assert!(hex_to_rgb("#ÄÄÄ").is_err());
    }
}
