//! Extraction settings.
//!
//! Only the palette size and the optional pre-scan downscale are tunable.
//! The bucket grid itself lives in [`crate::constants`] and is fixed.
//!
//! ```no_run
//! use image_to_palette_wasm::ExtractorConfig;
//! use std::path::Path;
//!
//! let config = ExtractorConfig::from_json_file(Path::new("palette.json"))?;
//! # Ok::<(), image_to_palette_wasm::PaletteError>(())
//! ```

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{BUCKET_COUNT, DEFAULT_PALETTE_SIZE};
use crate::error::{PaletteError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Number of colors to return
    pub k: usize,

    /// Longest side, in pixels, to shrink decoded images to before
    /// scanning. `None` scans every pixel.
    pub downscale: Option<u32>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_PALETTE_SIZE,
            downscale: None,
        }
    }
}

impl ExtractorConfig {
    pub fn with_k(k: usize) -> Self {
        Self {
            k,
            ..Self::default()
        }
    }

    /// Reject settings that cannot produce a meaningful palette.
    pub fn validate(&self) -> Result<()> {
        if self.k == 0 || self.k > BUCKET_COUNT {
            return Err(PaletteError::InvalidParameter {
                parameter: "k",
                value: self.k.to_string(),
            });
        }
        if self.downscale == Some(0) {
            return Err(PaletteError::InvalidParameter {
                parameter: "downscale",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// Load and validate a JSON config file. Missing fields take their
    /// default values.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
