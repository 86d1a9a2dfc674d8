//! Light camera placement
//!
//! The light pass renders the craft from the light source. The camera sits on
//! the light, its local +Z axis points back at the light along the craft→light
//! line (so it looks down -Z at the craft), and the frustum is just wide enough
//! to hold the craft's bounding diameter.

use glam::{DMat4, DQuat, DVec3};
use sunjammer_core::{RadiationConfig, RadiationError, RadiationResult};

/// Camera placement for one light pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    /// World position (the light source)
    pub position: DVec3,
    /// Camera-local to world rotation
    pub orientation: DQuat,
    /// Full field of view (radians), square frame
    pub fov: f64,
    pub near: f64,
    pub far: f64,
}

impl CameraFrame {
    /// Viewing direction
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    pub fn right(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    pub fn up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.orientation * local
    }

    pub fn to_local(&self, world: DVec3) -> DVec3 {
        self.orientation.inverse() * world
    }

    /// View matrix (world to camera)
    pub fn view_matrix(&self) -> DMat4 {
        DMat4::look_to_rh(self.position, self.forward(), self.up())
    }

    /// Projection matrix for the square capture
    pub fn projection_matrix(&self) -> DMat4 {
        DMat4::perspective_rh(self.fov, 1.0, self.near, self.far)
    }

    /// World-space ray direction through normalised frame coordinates in [-1, 1]
    pub fn ray_direction(&self, ndc_x: f64, ndc_y: f64) -> DVec3 {
        let tan_half = (self.fov * 0.5).tan();
        let local = DVec3::new(ndc_x * tan_half, ndc_y * tan_half, -1.0).normalize();
        self.orientation * local
    }
}

/// Sizes and aims the light camera each tick
#[derive(Clone, Debug)]
pub struct LightCamera {
    diameter: f64,
    near_epsilon: f64,
    min_distance: f64,
}

impl LightCamera {
    pub fn new(config: &RadiationConfig) -> Self {
        Self {
            diameter: config.craft_diameter,
            near_epsilon: config.near_epsilon,
            min_distance: config.min_distance,
        }
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    /// Distance used for framing and falloff, never below the minimum
    pub fn effective_distance(&self, distance: f64) -> f64 {
        distance.max(self.min_distance)
    }

    /// `2 * atan(diameter / (2 * distance))`
    pub fn fov_for_distance(&self, distance: f64) -> f64 {
        let d = self.effective_distance(distance);
        2.0 * (self.diameter / (2.0 * d)).atan()
    }

    pub fn clip_for_distance(&self, distance: f64) -> (f64, f64) {
        let d = self.effective_distance(distance);
        let near = (d - self.diameter).max(self.near_epsilon);
        let far = d + self.diameter;
        (near, far)
    }

    /// Place the camera on `light` looking at `craft`
    pub fn frame(&self, light: DVec3, craft: DVec3) -> RadiationResult<CameraFrame> {
        if !light.is_finite() || !craft.is_finite() {
            return Err(RadiationError::DegenerateGeometry(format!(
                "non-finite positions: light {light}, craft {craft}"
            )));
        }
        let to_light = light - craft;
        let axis = to_light.try_normalize().ok_or_else(|| {
            RadiationError::DegenerateGeometry(format!("craft coincides with light at {light}"))
        })?;

        let distance = to_light.length();
        let (near, far) = self.clip_for_distance(distance);

        Ok(CameraFrame {
            position: light,
            orientation: DQuat::from_rotation_arc(DVec3::Z, axis),
            fov: self.fov_for_distance(distance),
            near,
            far,
        })
    }
}
