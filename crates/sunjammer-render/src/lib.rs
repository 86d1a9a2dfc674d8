//! Light-pass rendering: camera placement, scene masking, normal capture and a
//! CPU reference renderer.

pub mod camera;
pub mod capture;
pub mod encoder;
pub mod raster;
pub mod scene;
pub mod visibility;

pub use camera::{CameraFrame, LightCamera};
pub use capture::{NormalCapture, NormalRenderer};
pub use raster::SoftwareRenderer;
pub use scene::{EntityId, LightFlag, LightFlags, LightScene, Panel, Renderable, Scene};
pub use visibility::{VisibilityGuard, VisibilityMask};
