use std::{fmt, str::FromStr};

use crate::{
    error::ConfigError,
    tone::{DEFAULT_DISCARDED_BITS, clamp_discarded_bits},
};

pub const DISCARDED_BITS_ENV: &str = "RGBD_IR_DISCARDED_BITS";
pub const SEGMENTATION_ENV: &str = "RGBD_SEGMENTATION";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InfraredConfig {
    pub discarded_bits: u8,
}

impl Default for InfraredConfig {
    fn default() -> Self {
        Self {
            discarded_bits: DEFAULT_DISCARDED_BITS,
        }
    }
}

/// Which green-screen compositor to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SegmentationResolution {
    /// Output at color resolution, iterating color pixels.
    #[default]
    High,
    /// Output at depth resolution, iterating body-index pixels.
    Low,
}

impl SegmentationResolution {
    pub fn is_hd(&self) -> bool {
        matches!(self, SegmentationResolution::High)
    }
}

impl FromStr for SegmentationResolution {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hd" | "high" => Ok(SegmentationResolution::High),
            "ld" | "low" => Ok(SegmentationResolution::Low),
            _ => Err(ConfigError::InvalidResolution(s.to_string())),
        }
    }
}

impl fmt::Display for SegmentationResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentationResolution::High => f.write_str("hd"),
            SegmentationResolution::Low => f.write_str("ld"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BitmapConfig {
    pub infrared: InfraredConfig,
    pub segmentation: SegmentationResolution,
}

impl BitmapConfig {
    /// Reads overrides from `RGBD_IR_DISCARDED_BITS` and `RGBD_SEGMENTATION`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Invalid values are logged
    /// and replaced by defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(DISCARDED_BITS_ENV) {
            match parse_discarded_bits(&raw) {
                Ok(bits) => config.infrared.discarded_bits = bits,
                Err(err) => log::warn!("ignoring {DISCARDED_BITS_ENV}: {err}"),
            }
        }

        if let Some(raw) = lookup(SEGMENTATION_ENV) {
            match raw.parse() {
                Ok(resolution) => config.segmentation = resolution,
                Err(err) => log::warn!("ignoring {SEGMENTATION_ENV}: {err}"),
            }
        }

        config
    }
}

fn parse_discarded_bits(raw: &str) -> Result<u8, ConfigError> {
    raw.trim()
        .parse::<u8>()
        .map(clamp_discarded_bits)
        .map_err(|_| ConfigError::InvalidDiscardedBits(raw.to_string()))
}
