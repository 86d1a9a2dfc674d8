use crate::constants::*;
use crate::error::{RadiationError, RadiationResult};
use serde::{Deserialize, Serialize};

/// How the accumulated sums are normalised before falloff is applied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// Divide by R² (area of the whole frame)
    #[default]
    TexelCount,
    /// Divide by the number of texels that hit the sail
    LitTexels,
    /// Use the raw sums
    None,
}

/// Strategy for the per-texel reduction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reduction {
    #[default]
    Sequential,
    /// Rows are reduced on the rayon pool and combined at the end
    Parallel,
}

/// Configuration for the radiation-force pass
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadiationConfig {
    pub resolution: u32,
    pub craft_diameter: f64,
    pub falloff: f64,
    pub background: [u8; 4],
    pub near_epsilon: f64,
    pub min_distance: f64,
    pub normalization: Normalization,
    pub reduction: Reduction,
    /// Present each capture on the debug quad (no effect on the numbers)
    pub debug_overlay: bool,
}

impl Default for RadiationConfig {
    fn default() -> Self {
        Self {
            resolution: RESOLUTION,
            craft_diameter: CRAFT_DIAMETER,
            falloff: FALLOFF,
            background: BACKGROUND,
            near_epsilon: NEAR_EPSILON,
            min_distance: MIN_LIGHT_DISTANCE,
            normalization: Normalization::default(),
            reduction: Reduction::default(),
            debug_overlay: false,
        }
    }
}

impl RadiationConfig {
    pub fn with_resolution(resolution: u32) -> Self {
        Self {
            resolution,
            ..Self::default()
        }
    }

    /// Reject settings that would make every tick fail or divide by zero
    pub fn validate(&self) -> RadiationResult<()> {
        if self.resolution < 2 || self.resolution > MAX_RESOLUTION {
            return Err(RadiationError::Configuration(format!(
                "resolution {} outside [2, {}]",
                self.resolution, MAX_RESOLUTION
            )));
        }
        if !(self.craft_diameter.is_finite() && self.craft_diameter > 0.0) {
            return Err(RadiationError::Configuration(format!(
                "craft diameter must be positive, got {}",
                self.craft_diameter
            )));
        }
        if !(self.near_epsilon.is_finite() && self.near_epsilon > 0.0) {
            return Err(RadiationError::Configuration(format!(
                "near epsilon must be positive, got {}",
                self.near_epsilon
            )));
        }
        if !(self.min_distance.is_finite() && self.min_distance > 0.0) {
            return Err(RadiationError::Configuration(format!(
                "minimum distance must be positive, got {}",
                self.min_distance
            )));
        }
        if !(self.falloff.is_finite() && self.falloff > 0.0) {
            return Err(RadiationError::Configuration(format!(
                "falloff must be positive, got {}",
                self.falloff
            )));
        }
        Ok(())
    }

    /// Byte length of a buffer at the configured resolution
    pub fn buffer_len(&self) -> usize {
        let r = self.resolution as usize;
        r * r * 4
    }
}
