//! CPU ray-cast light pass
//!
//! Stands in for the host engine: casts one ray per texel through the light
//! camera, keeps the nearest visible panel, and writes its camera-space normal
//! if the panel carries the marker. Unmarked panels occlude with the background
//! colour.

use crate::camera::CameraFrame;
use crate::capture::NormalRenderer;
use crate::scene::{Panel, Scene};
use sunjammer_core::{encode_normal, NormalBuffer, RadiationConfig, RadiationError, RadiationResult};
use tracing::debug;

pub struct SoftwareRenderer {
    resolution: u32,
    background: [u8; 4],
    debug_frames: u64,
    last_debug: Option<NormalBuffer>,
}

impl SoftwareRenderer {
    pub fn new(config: &RadiationConfig) -> Self {
        Self {
            resolution: config.resolution,
            background: config.background,
            debug_frames: 0,
            last_debug: None,
        }
    }

    /// Copy of the frame last shown on the debug quad
    pub fn debug_frame(&self) -> Option<&NormalBuffer> {
        self.last_debug.as_ref()
    }

    pub fn debug_frames(&self) -> u64 {
        self.debug_frames
    }
}

impl NormalRenderer<Scene> for SoftwareRenderer {
    fn resolution(&self) -> Option<u32> {
        Some(self.resolution)
    }

    fn render(&mut self, scene: &Scene, frame: &CameraFrame, target: &mut NormalBuffer) -> RadiationResult<()> {
        if target.resolution() != self.resolution {
            return Err(RadiationError::RenderFailure(format!(
                "target is {0}x{0}, renderer draws {1}x{1}",
                target.resolution(),
                self.resolution
            )));
        }

        let panels: Vec<(&Panel, bool)> = scene
            .entities()
            .iter()
            .filter(|e| e.visible)
            .filter_map(|e| e.panel.as_ref().map(|p| (p, e.marker)))
            .collect();

        let res = self.resolution as f64;
        let width = self.resolution as usize;

        for (i, texel) in target.texels_mut().iter_mut().enumerate() {
            let col = (i % width) as f64;
            let row = (i / width) as f64;
            let ndc_x = (col + 0.5) / res * 2.0 - 1.0;
            let ndc_y = (row + 0.5) / res * 2.0 - 1.0;
            let ray = frame.ray_direction(ndc_x, ndc_y);

            let nearest = panels
                .iter()
                .filter_map(|(panel, marked)| {
                    panel
                        .intersect(frame.position, ray)
                        .filter(|t| *t >= frame.near && *t <= frame.far)
                        .map(|t| (t, *panel, *marked))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0));

            *texel = match nearest {
                Some((_, panel, true)) => {
                    let mut normal = frame.to_local(panel.normal());
                    // Panels are two-sided
                    if normal.z < 0.0 {
                        normal = -normal;
                    }
                    encode_normal(normal)
                }
                _ => self.background,
            };
        }

        Ok(())
    }

    fn present_debug(&mut self, buffer: &NormalBuffer) {
        self.debug_frames += 1;
        debug!(frames = self.debug_frames, "debug quad updated");
        self.last_debug = Some(buffer.clone());
    }
}
