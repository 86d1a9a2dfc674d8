//! Normal-buffer capture through a render collaborator

use crate::camera::CameraFrame;
use sunjammer_core::{NormalBuffer, RadiationConfig, RadiationError, RadiationResult};
use tracing::trace;

/// Host renderer that can draw the light pass into a normal buffer
///
/// `render` must be synchronous: when it returns `Ok`, `target` holds the
/// finished frame. Texels with no marked surface keep the background colour.
pub trait NormalRenderer<S: ?Sized> {
    /// Fixed capture size, if the renderer has one
    fn resolution(&self) -> Option<u32> {
        None
    }

    fn render(&mut self, scene: &S, frame: &CameraFrame, target: &mut NormalBuffer) -> RadiationResult<()>;

    /// Show the last capture on the debug quad
    fn present_debug(&mut self, _buffer: &NormalBuffer) {}
}

/// Owns the reusable capture buffer
pub struct NormalCapture {
    buffer: NormalBuffer,
    background: [u8; 4],
    frame_count: u64,
}

impl NormalCapture {
    pub fn new(config: &RadiationConfig) -> Self {
        Self {
            buffer: NormalBuffer::new(config.resolution, config.background),
            background: config.background,
            frame_count: 0,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.buffer.resolution()
    }

    /// Fails unless `renderer` draws at the capture resolution
    pub fn check_renderer<S: ?Sized, R: NormalRenderer<S> + ?Sized>(&self, renderer: &R) -> RadiationResult<()> {
        match renderer.resolution() {
            Some(r) if r != self.resolution() => Err(RadiationError::Configuration(format!(
                "renderer captures {r}x{r}, buffer is {0}x{0}",
                self.resolution()
            ))),
            _ => Ok(()),
        }
    }

    /// Clear, render and expose the buffer for reading
    pub fn capture<S: ?Sized, R: NormalRenderer<S> + ?Sized>(
        &mut self,
        renderer: &mut R,
        scene: &S,
        frame: &CameraFrame,
        debug: bool,
    ) -> RadiationResult<&NormalBuffer> {
        self.buffer.fill(self.background);

        renderer.render(scene, frame, &mut self.buffer).map_err(|e| match e {
            RadiationError::RenderFailure(_) => e,
            other => RadiationError::RenderFailure(other.to_string()),
        })?;

        if debug {
            renderer.present_debug(&self.buffer);
        }

        self.frame_count += 1;
        trace!(frame = self.frame_count, "normal buffer captured");
        Ok(&self.buffer)
    }

    pub fn buffer(&self) -> &NormalBuffer {
        &self.buffer
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
