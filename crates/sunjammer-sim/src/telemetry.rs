//! HUD dial readings derived from move events

use crate::observers::MoveEvent;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Gain applied to force magnitude before it hits the gauge
pub const FORCE_GAIN: f64 = 3.0;
/// Speed that fills the velocity gauge
pub const FULL_SCALE_SPEED: f64 = 10.0;

/// One needle: angle in the ecliptic and a fill level in [0, 1]
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dial {
    /// Radians, zero along +y, positive counter-clockwise
    pub heading: f64,
    pub level: f64,
    /// Raw reading was past full scale
    pub saturated: bool,
}

impl Dial {
    fn read(v: DVec3, gain: f64) -> Self {
        let raw = v.length() * gain;
        Self {
            heading: heading(v),
            level: raw.min(1.0),
            saturated: raw > 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    pub force: Dial,
    pub velocity: Dial,
    pub light: Dial,
}

impl Telemetry {
    pub fn from_event(event: &MoveEvent) -> Self {
        Self {
            force: Dial::read(event.force, FORCE_GAIN),
            velocity: Dial::read(event.velocity, 1.0 / FULL_SCALE_SPEED),
            light: Dial::read(event.light_vector, 1.0),
        }
    }

    /// Force gauge is pinned
    pub fn overloaded(&self) -> bool {
        self.force.saturated
    }
}

pub fn heading(v: DVec3) -> f64 {
    (-v.x).atan2(v.y)
}
