//! Palette extraction: scan, rank, format.
//!
//! An extraction run goes `Idle -> Scanning -> Ranking -> Done`. Scanning
//! folds every accepted sample into a fresh [`BucketStore`]; ranking pushes
//! the populated buckets into a [`TopKSelector`] and pops the `k` heaviest,
//! turning each averaged HSL back into a `#RRGGBB` string. Nothing survives
//! the call.

use std::fmt;

use log::{debug, trace, warn};
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::classify::classify;
use crate::config::ExtractorConfig;
use crate::convert::{Hsl, hsl_to_rgb, rgb_to_hex, rgb_to_hsl};
use crate::error::Result;
use crate::select::{Ranked, TopKSelector};
use crate::store::BucketStore;

/// One 8-bit RGB pixel. Alpha, if the source had one, is already dropped.
pub type PixelSample = Srgb<u8>;

#[cfg(feature = "parallel")]
const PARALLEL_CHUNK: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Scanning,
    Ranking,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Scanning => "scanning",
            Phase::Ranking => "ranking",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

fn transition(from: Phase, to: Phase) -> Phase {
    trace!("palette extraction: {from} -> {to}");
    to
}

/// One palette color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swatch {
    /// `#RRGGBB`, uppercase
    pub hex: String,
    pub rgb: [u8; 3],
    /// Average HSL of the samples in the bucket
    pub hsl: Hsl,
    /// Number of samples in the bucket
    pub weight: u64,
}

impl Swatch {
    fn from_ranked(ranked: &Ranked) -> Self {
        let rgb = hsl_to_rgb(ranked.entry.average);
        Self {
            hex: rgb_to_hex(rgb),
            rgb: [rgb.red, rgb.green, rgb.blue],
            hsl: ranked.entry.average,
            weight: ranked.entry.weight,
        }
    }
}

/// Dominant colors, heaviest bucket first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

impl Palette {
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn hex_codes(&self) -> Vec<String> {
        self.swatches.iter().map(|s| s.hex.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Swatch> {
        self.swatches.iter()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = std::slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.swatches.iter()
    }
}

/// Counters from the scanning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScanStats {
    pub accepted: u64,
    pub skipped: u64,
    pub buckets: usize,
}

/// Fold one sample into `store`.
#[inline]
fn scan_sample(store: &mut BucketStore, sample: PixelSample) {
    let hsl = rgb_to_hsl(sample);
    store.accumulate(classify(hsl), hsl);
}

#[derive(Debug, Clone, Default)]
pub struct PaletteExtractor {
    config: ExtractorConfig,
}

impl PaletteExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn with_k(k: usize) -> Self {
        Self::new(ExtractorConfig::with_k(k))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract a palette from well-formed samples.
    pub fn extract<I>(&self, samples: I) -> Palette
    where
        I: IntoIterator<Item = PixelSample>,
    {
        self.extract_checked(samples.into_iter().map(Ok)).0
    }

    /// Extract a palette from samples that may have failed validation.
    /// Failed samples are skipped and counted.
    pub fn extract_checked<I>(&self, samples: I) -> (Palette, ScanStats)
    where
        I: IntoIterator<Item = Result<PixelSample>>,
    {
        let phase = transition(Phase::Idle, Phase::Scanning);
        let mut store = BucketStore::new();
        let mut stats = ScanStats::default();

        for sample in samples {
            match sample {
                Ok(sample) => {
                    scan_sample(&mut store, sample);
                    stats.accepted += 1;
                }
                Err(err) => {
                    if stats.skipped == 0 {
                        warn!("skipping malformed pixel sample: {err}");
                    }
                    stats.skipped += 1;
                }
            }
        }
        stats.buckets = store.len();

        if stats.skipped > 0 {
            debug!("{} malformed pixel samples skipped", stats.skipped);
        }
        debug!(
            "scanned {} samples into {} buckets",
            stats.accepted, stats.buckets
        );

        let phase = transition(phase, Phase::Ranking);
        let palette = self.rank(&store);
        transition(phase, Phase::Done);

        (palette, stats)
    }

    /// [`PaletteExtractor::extract`], also returning the scan counters.
    pub fn extract_with_stats<I>(&self, samples: I) -> (Palette, ScanStats)
    where
        I: IntoIterator<Item = PixelSample>,
    {
        self.extract_checked(samples.into_iter().map(Ok))
    }

    /// Scan `samples` in parallel chunks, one store per chunk, merged
    /// before ranking.
    #[cfg(feature = "parallel")]
    pub fn extract_par(&self, samples: &[PixelSample]) -> Palette {
        use rayon::prelude::*;

        let phase = transition(Phase::Idle, Phase::Scanning);
        let store = samples
            .par_chunks(PARALLEL_CHUNK)
            .map(|chunk| {
                let mut store = BucketStore::new();
                for sample in chunk {
                    scan_sample(&mut store, *sample);
                }
                store
            })
            .reduce(BucketStore::new, |mut left, right| {
                left.merge(right);
                left
            });
        debug!(
            "scanned {} samples into {} buckets ({} chunks)",
            samples.len(),
            store.len(),
            samples.len().div_ceil(PARALLEL_CHUNK)
        );

        let phase = transition(phase, Phase::Ranking);
        let palette = self.rank(&store);
        transition(phase, Phase::Done);
        palette
    }

    fn rank(&self, store: &BucketStore) -> Palette {
        let mut selector = TopKSelector::from_store(store);
        let swatches: Vec<Swatch> = selector
            .take_top(self.config.k)
            .iter()
            .map(|ranked| {
                let swatch = Swatch::from_ranked(ranked);
                trace!("{} -> {} (weight {})", ranked.key, swatch.hex, swatch.weight);
                swatch
            })
            .collect();

        Palette { swatches }
    }
}

/// Extract the `k` dominant colors of `samples`.
pub fn extract<I>(samples: I, k: usize) -> Palette
where
    I: IntoIterator<Item = PixelSample>,
{
    PaletteExtractor::with_k(k).extract(samples)
}
