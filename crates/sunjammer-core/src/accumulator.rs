//! Radiation-pressure reduction over a normal buffer
//!
//! Every lit texel is treated as a patch of sail whose normal is the decoded
//! texel. Light arrives along the camera's local +Z axis; a reflecting patch
//! receives `-n * (n · z) * 2` of momentum, and its offset from the frame centre
//! acts as the lever arm for torque. All results are in camera-local space and
//! are not normalised.

use crate::config::{RadiationConfig, Reduction};
use crate::constants::REFLECTION_FACTOR;
use crate::error::{RadiationError, RadiationResult};
use crate::normal_buffer::{decode_normal, NormalBuffer};
use glam::{DQuat, DVec3};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use tracing::trace;

/// Direction the light travels into the frame, in camera-local space
pub const LIGHT_AXIS: DVec3 = DVec3::Z;

/// Net force and torque of one reduction
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ForceTorque {
    pub force: DVec3,
    pub torque: DVec3,
    /// Texels that were not background
    pub lit_texels: u32,
}

impl ForceTorque {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale force and torque, keeping the texel count
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            force: self.force * factor,
            torque: self.torque * factor,
            lit_texels: self.lit_texels,
        }
    }

    /// Rotate both vectors, e.g. from camera-local into world space
    pub fn rotated(self, rotation: DQuat) -> Self {
        Self {
            force: rotation * self.force,
            torque: rotation * self.torque,
            lit_texels: self.lit_texels,
        }
    }
}

impl Add for ForceTorque {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            force: self.force + rhs.force,
            torque: self.torque + rhs.torque,
            lit_texels: self.lit_texels + rhs.lit_texels,
        }
    }
}

impl AddAssign for ForceTorque {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Reduces normal buffers of one fixed resolution
#[derive(Clone, Debug)]
pub struct ForceAccumulator {
    resolution: u32,
    background: [u8; 4],
    reduction: Reduction,
}

impl ForceAccumulator {
    pub fn new(config: &RadiationConfig) -> RadiationResult<Self> {
        config.validate()?;
        Ok(Self {
            resolution: config.resolution,
            background: config.background,
            reduction: config.reduction,
        })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn reduction(&self) -> Reduction {
        self.reduction
    }

    pub fn set_reduction(&mut self, reduction: Reduction) {
        self.reduction = reduction;
    }

    /// Reduce `buffer` into camera-local force and torque
    pub fn accumulate(&self, buffer: &NormalBuffer) -> RadiationResult<ForceTorque> {
        if buffer.resolution() != self.resolution {
            return Err(RadiationError::Configuration(format!(
                "buffer resolution {} does not match accumulator resolution {}",
                buffer.resolution(),
                self.resolution
            )));
        }
        let texels = buffer.texels();
        let total = match self.reduction {
            Reduction::Sequential => reduce_sequential(texels, self.resolution, self.background),
            Reduction::Parallel => reduce_parallel(texels, self.resolution, self.background),
        };
        trace!(lit = total.lit_texels, reduction = ?self.reduction, "normal buffer reduced");
        Ok(total)
    }
}

/// Reduce a raw RGBA byte array of `resolution`² texels
pub fn accumulate_bytes(
    data: &[u8],
    resolution: u32,
    background: [u8; 4],
) -> RadiationResult<ForceTorque> {
    let r = resolution as usize;
    if resolution < 2 || data.len() != r * r * 4 {
        return Err(RadiationError::Configuration(format!(
            "{} bytes cannot hold a {}x{} RGBA frame",
            data.len(),
            resolution,
            resolution
        )));
    }
    Ok(reduce_sequential(bytemuck::cast_slice(data), resolution, background))
}

fn reduce_sequential(texels: &[[u8; 4]], resolution: u32, background: [u8; 4]) -> ForceTorque {
    let width = resolution as usize;
    let mut total = ForceTorque::zero();
    for (row, line) in texels.chunks_exact(width).enumerate() {
        total += reduce_row(line, row, resolution, background);
    }
    total
}

fn reduce_parallel(texels: &[[u8; 4]], resolution: u32, background: [u8; 4]) -> ForceTorque {
    texels
        .par_chunks_exact(resolution as usize)
        .enumerate()
        .map(|(row, line)| reduce_row(line, row, resolution, background))
        .reduce(ForceTorque::zero, |a, b| a + b)
}

#[inline]
pub(crate) fn reduce_row(line: &[[u8; 4]], row: usize, resolution: u32, background: [u8; 4]) -> ForceTorque {
    let span = (resolution - 1) as f64;
    let lever_y = (row as f64 / span - 0.5) * 2.0;

    let mut force = DVec3::ZERO;
    let mut torque = DVec3::ZERO;
    let mut lit = 0u32;

    for (col, texel) in line.iter().enumerate() {
        if *texel == background {
            continue;
        }
        let normal = decode_normal(*texel);
        let alignment = normal.dot(LIGHT_AXIS);
        let momentum = -normal * alignment * REFLECTION_FACTOR;

        let lever = DVec3::new((col as f64 / span - 0.5) * 2.0, lever_y, 0.0);

        force += momentum;
        torque += lever.cross(momentum);
        lit += 1;
    }

    ForceTorque {
        force,
        torque,
        lit_texels: lit,
    }
}
