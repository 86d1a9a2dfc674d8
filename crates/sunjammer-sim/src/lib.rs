//! Sail flight built on the light pass: per-tick estimation, vehicle policy,
//! move notifications, HUD readings and orbit rules.

pub mod config;
pub mod estimator;
pub mod mission;
pub mod observers;
pub mod telemetry;
pub mod vehicle;

pub use config::SunjammerConfig;
pub use estimator::{RadiationForceEstimator, RadiationSample};
pub use mission::{circular_orbit_speed, gravity_force, MissionConfig, MissionStatus, Steering, TiltController};
pub use observers::{MoveCallback, MoveEvent, MoveObservers, ObserverHandle};
pub use telemetry::{Dial, Telemetry};
pub use vehicle::{CraftLoad, CraftState, Vehicle, VehicleConfig};
