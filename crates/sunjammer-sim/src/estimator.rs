//! Per-tick radiation force estimation
//!
//! One tick: aim the light camera, mask the scene, capture the normal buffer,
//! unmask, reduce, rotate into world space and apply the inverse-square
//! falloff. The scene is always unmasked before an error leaves this module.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use sunjammer_core::{
    ForceAccumulator, ForceTorque, Normalization, NormalBuffer, RadiationConfig, RadiationError,
    RadiationResult,
};
use sunjammer_render::{CameraFrame, LightCamera, LightScene, NormalCapture, NormalRenderer, VisibilityMask};
use tracing::{debug, info};

/// World-space result of one light pass
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadiationSample {
    pub force: DVec3,
    pub torque: DVec3,
    /// Points from the craft to the light, length `falloff / distance²`
    pub light_vector: DVec3,
    /// Craft-to-light distance after clamping
    pub distance: f64,
    pub lit_texels: u32,
}

pub struct RadiationForceEstimator {
    config: RadiationConfig,
    camera: LightCamera,
    mask: VisibilityMask,
    capture: NormalCapture,
    accumulator: ForceAccumulator,
    last_frame: Option<CameraFrame>,
}

impl RadiationForceEstimator {
    pub fn new(config: RadiationConfig) -> RadiationResult<Self> {
        let accumulator = ForceAccumulator::new(&config)?;
        let capture = NormalCapture::new(&config);
        if capture.resolution() != accumulator.resolution() {
            return Err(RadiationError::Configuration(format!(
                "capture {} and accumulator {} disagree on resolution",
                capture.resolution(),
                accumulator.resolution()
            )));
        }

        info!(
            resolution = config.resolution,
            diameter = config.craft_diameter,
            falloff = config.falloff,
            "radiation estimator ready"
        );

        Ok(Self {
            camera: LightCamera::new(&config),
            mask: VisibilityMask::new(),
            capture,
            accumulator,
            last_frame: None,
            config,
        })
    }

    /// Build and check that `renderer` captures at the configured resolution
    pub fn with_renderer<S: ?Sized, R: NormalRenderer<S> + ?Sized>(
        config: RadiationConfig,
        renderer: &R,
    ) -> RadiationResult<Self> {
        let estimator = Self::new(config)?;
        estimator.capture.check_renderer(renderer)?;
        Ok(estimator)
    }

    pub fn config(&self) -> &RadiationConfig {
        &self.config
    }

    pub fn camera(&self) -> &LightCamera {
        &self.camera
    }

    /// Toggle presenting captures on the debug quad
    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.config.debug_overlay = enabled;
    }

    pub fn debug_overlay(&self) -> bool {
        self.config.debug_overlay
    }

    pub fn last_frame(&self) -> Option<&CameraFrame> {
        self.last_frame.as_ref()
    }

    /// Buffer written by the most recent capture
    pub fn buffer(&self) -> &NormalBuffer {
        self.capture.buffer()
    }

    pub fn frames_captured(&self) -> u64 {
        self.capture.frame_count()
    }

    /// Render the light pass for `craft` and turn it into world-space force
    pub fn estimate<S, R>(
        &mut self,
        scene: &mut S,
        renderer: &mut R,
        light: DVec3,
        craft: DVec3,
    ) -> RadiationResult<RadiationSample>
    where
        S: LightScene + ?Sized,
        R: NormalRenderer<S> + ?Sized,
    {
        let frame = self.camera.frame(light, craft)?;
        self.last_frame = Some(frame);

        {
            let guard = self.mask.apply(scene);
            self.capture
                .capture(renderer, &*guard, &frame, self.config.debug_overlay)?;
        }

        let local = self.accumulator.accumulate(self.capture.buffer())?;
        Ok(self.finish(local, &frame, light, craft))
    }

    /// Reduce a buffer the host already rendered for this light/craft pair
    pub fn estimate_from_buffer(
        &mut self,
        buffer: &NormalBuffer,
        light: DVec3,
        craft: DVec3,
    ) -> RadiationResult<RadiationSample> {
        let frame = self.camera.frame(light, craft)?;
        self.last_frame = Some(frame);
        let local = self.accumulator.accumulate(buffer)?;
        Ok(self.finish(local, &frame, light, craft))
    }

    fn finish(&self, local: ForceTorque, frame: &CameraFrame, light: DVec3, craft: DVec3) -> RadiationSample {
        let to_light = light - craft;
        let distance = self.camera.effective_distance(to_light.length());
        let intensity = self.config.falloff / (distance * distance);

        let norm = match self.config.normalization {
            Normalization::TexelCount => {
                let r = self.config.resolution as f64;
                1.0 / (r * r)
            }
            Normalization::LitTexels if local.lit_texels > 0 => 1.0 / local.lit_texels as f64,
            Normalization::LitTexels => 0.0,
            Normalization::None => 1.0,
        };

        let world = local.rotated(frame.orientation).scaled(norm * intensity);
        let light_vector = to_light.normalize_or_zero() * intensity;

        debug!(
            distance,
            lit = local.lit_texels,
            force = %world.force,
            torque = %world.torque,
            "radiation sample"
        );

        RadiationSample {
            force: world.force,
            torque: world.torque,
            light_vector,
            distance,
            lit_texels: local.lit_texels,
        }
    }
}
