//! Orbit rules around the light source: gravity, steering, win/lose checks

use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    /// Circular orbit at the start radius runs at the start speed
    pub sun_mass: f64,
    pub craft_mass: f64,
    pub start_distance: f64,
    pub start_speed: f64,
    /// Closer than this is fatal
    pub danger_radius: f64,
    /// Closer than this the craft stops simulating
    pub incineration_radius: f64,
    /// Further than this the craft is lost
    pub escape_radius: f64,
    pub tilt_smoothing: f64,
    pub pickup_radius: f64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            sun_mass: 640.0,
            craft_mass: 1.0,
            start_distance: 40.0,
            start_speed: 4.0,
            danger_radius: 4.0,
            incineration_radius: 1.0,
            escape_radius: 240.0,
            tilt_smoothing: 0.95,
            pickup_radius: 3.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionStatus {
    Flying,
    SunDeath,
    /// Inside the sun; dynamics are suspended
    Incinerated,
    LostInInterstellarSpace,
}

impl MissionStatus {
    pub fn is_over(self) -> bool {
        self != MissionStatus::Flying
    }

    pub fn suspends_dynamics(self) -> bool {
        self == MissionStatus::Incinerated
    }
}

impl MissionConfig {
    pub fn status(&self, distance: f64) -> MissionStatus {
        if distance < self.incineration_radius {
            MissionStatus::Incinerated
        } else if distance < self.danger_radius {
            MissionStatus::SunDeath
        } else if distance > self.escape_radius {
            MissionStatus::LostInInterstellarSpace
        } else {
            MissionStatus::Flying
        }
    }

    /// Craft position and velocity for a prograde start on +x
    pub fn start_state(&self, sun: DVec3) -> (DVec3, DVec3) {
        (
            sun + DVec3::new(self.start_distance, 0.0, 0.0),
            DVec3::new(0.0, self.start_speed, 0.0),
        )
    }

    pub fn collected(&self, craft: DVec3, comet: DVec3) -> bool {
        craft.distance(comet) < self.pickup_radius
    }
}

/// Pull of `sun_mass` at `sun` on a body, `m1 * m2 / d²` toward the sun
pub fn gravity_force(sun: DVec3, sun_mass: f64, body: DVec3, body_mass: f64) -> DVec3 {
    let offset = sun - body;
    let d2 = offset.length_squared();
    if d2 == 0.0 {
        return DVec3::ZERO;
    }
    offset.normalize() * (sun_mass * body_mass / d2)
}

/// Speed of a circular orbit of `radius` around `sun_mass`
pub fn circular_orbit_speed(sun_mass: f64, radius: f64) -> f64 {
    if radius <= 0.0 {
        return 0.0;
    }
    (sun_mass / radius).sqrt()
}

/// Steering input for one tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

impl Steering {
    pub fn target(self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Eases the sail tilt toward the steering target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltController {
    tilt: f64,
    smoothing: f64,
}

impl TiltController {
    pub fn new(smoothing: f64) -> Self {
        Self {
            tilt: 0.0,
            smoothing: smoothing.clamp(0.0, 1.0),
        }
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn update(&mut self, steering: Steering) -> f64 {
        self.tilt = self.tilt * self.smoothing + steering.target() * (1.0 - self.smoothing);
        self.tilt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_status_bands() {
        let config = MissionConfig::default();
        assert_eq!(config.status(40.0), MissionStatus::Flying);
        assert_eq!(config.status(3.9), MissionStatus::SunDeath);
        assert_eq!(config.status(0.5), MissionStatus::Incinerated);
        assert_eq!(config.status(240.5), MissionStatus::LostInInterstellarSpace);
        assert_eq!(config.status(240.0), MissionStatus::Flying);
        assert!(config.status(0.5).suspends_dynamics());
        assert!(!config.status(3.0).suspends_dynamics());
    }

    #[test]
    fn test_gravity_inverse_square() {
        let near = gravity_force(DVec3::ZERO, 640.0, DVec3::new(10.0, 0.0, 0.0), 1.0);
        let far = gravity_force(DVec3::ZERO, 640.0, DVec3::new(20.0, 0.0, 0.0), 1.0);
        assert_relative_eq!(near.x, -6.4, epsilon = 1e-12);
        assert_relative_eq!(far.x * 4.0, near.x, epsilon = 1e-12);
        assert_eq!(gravity_force(DVec3::ONE, 1.0, DVec3::ONE, 1.0), DVec3::ZERO);
    }

    #[test]
    fn test_default_start_is_circular() {
        let config = MissionConfig::default();
        let (position, velocity) = config.start_state(DVec3::ZERO);
        assert_relative_eq!(
            circular_orbit_speed(config.sun_mass, position.length()),
            velocity.length(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_tilt_eases_toward_target() {
        let mut controller = TiltController::new(0.95);
        let first = controller.update(Steering { left: false, right: true });
        assert_relative_eq!(first, 0.05, epsilon = 1e-12);

        for _ in 0..200 {
            controller.update(Steering { left: true, right: false });
        }
        assert!(controller.tilt() < -0.99);

        let both = Steering { left: true, right: true };
        assert_eq!(both.target(), 0.0);
    }

    #[test]
    fn test_pickup_radius() {
        let config = MissionConfig::default();
        assert!(config.collected(DVec3::ZERO, DVec3::new(2.9, 0.0, 0.0)));
        assert!(!config.collected(DVec3::ZERO, DVec3::new(3.0, 0.0, 0.0)));
    }
}
