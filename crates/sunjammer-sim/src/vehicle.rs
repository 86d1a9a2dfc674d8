//! Sail vehicle: turns radiation samples into loads for the host physics

use crate::estimator::{RadiationForceEstimator, RadiationSample};
use crate::observers::{MoveEvent, MoveObservers};
use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use sunjammer_core::{RadiationConfig, RadiationResult};
use sunjammer_render::{EntityId, LightScene, NormalRenderer, Panel, Scene};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    pub force_scale: f64,
    pub torque_scale: f64,
    /// Keep the craft in the ecliptic: no z force, spin only about z
    pub planar: bool,
    /// Sail edge length
    pub sail_side: f64,
    /// Sail centre in craft-local space
    pub sail_offset: DVec3,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            force_scale: 0.5,
            torque_scale: 5.0,
            planar: true,
            sail_side: 6.0,
            sail_offset: DVec3::ZERO,
        }
    }
}

/// Craft pose and motion supplied by the host each tick
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraftState {
    pub position: DVec3,
    pub orientation: DQuat,
    pub velocity: DVec3,
}

impl CraftState {
    pub fn at(position: DVec3) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
            velocity: DVec3::ZERO,
        }
    }
}

/// Force and torque to apply to the craft this tick
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CraftLoad {
    pub force: DVec3,
    pub torque: DVec3,
}

pub struct Vehicle {
    config: VehicleConfig,
    estimator: RadiationForceEstimator,
    observers: MoveObservers,
    sail: Option<EntityId>,
    tilt: f64,
    last_sample: Option<RadiationSample>,
}

impl Vehicle {
    pub fn new(radiation: RadiationConfig, config: VehicleConfig) -> RadiationResult<Self> {
        Ok(Self {
            config,
            estimator: RadiationForceEstimator::new(radiation)?,
            observers: MoveObservers::new(),
            sail: None,
            tilt: 0.0,
            last_sample: None,
        })
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    pub fn estimator(&self) -> &RadiationForceEstimator {
        &self.estimator
    }

    pub fn estimator_mut(&mut self) -> &mut RadiationForceEstimator {
        &mut self.estimator
    }

    pub fn observers_mut(&mut self) -> &mut MoveObservers {
        &mut self.observers
    }

    pub fn last_sample(&self) -> Option<&RadiationSample> {
        self.last_sample.as_ref()
    }

    /// Entity whose panel follows the sail tilt in [`Vehicle::pose_sail`]
    pub fn attach_sail(&mut self, sail: EntityId) {
        self.sail = Some(sail);
    }

    pub fn sail(&self) -> Option<EntityId> {
        self.sail
    }

    /// Sail rotation about the craft's X axis, in radians
    pub fn set_tilt(&mut self, tilt: f64) {
        self.tilt = tilt;
    }

    pub fn tilt(&self) -> f64 {
        self.tilt
    }

    pub fn sail_orientation(&self, craft: &CraftState) -> DQuat {
        craft.orientation * DQuat::from_rotation_x(self.tilt)
    }

    /// Move the attached sail panel to the craft's current pose
    pub fn pose_sail(&self, scene: &mut Scene, craft: &CraftState) -> bool {
        let Some(sail) = self.sail else {
            return false;
        };
        let panel = Panel::square(
            craft.position + craft.orientation * self.config.sail_offset,
            self.sail_orientation(craft),
            self.config.sail_side,
        );
        scene.set_panel(sail, panel)
    }

    /// Scale and constrain a sample into a craft load
    pub fn load_for(&self, sample: &RadiationSample) -> CraftLoad {
        let mut force = sample.force;
        let mut torque = sample.torque;
        if self.config.planar {
            torque.x = 0.0;
            torque.y = 0.0;
            force.z = 0.0;
        }
        CraftLoad {
            force: force * self.config.force_scale,
            torque: torque * self.config.torque_scale,
        }
    }

    /// Run one tick. Returns `None` when the light pass failed and the
    /// tick was skipped.
    pub fn update<S, R>(
        &mut self,
        scene: &mut S,
        renderer: &mut R,
        light: DVec3,
        craft: &CraftState,
    ) -> RadiationResult<Option<CraftLoad>>
    where
        S: LightScene + ?Sized,
        R: NormalRenderer<S> + ?Sized,
    {
        let sample = match self.estimator.estimate(scene, renderer, light, craft.position) {
            Ok(sample) => sample,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "light pass failed, skipping tick");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let load = self.load_for(&sample);
        debug!(force = %load.force, torque = %load.torque, "craft load");

        self.last_sample = Some(sample);
        self.observers.notify(&MoveEvent {
            position: craft.position,
            velocity: craft.velocity,
            force: load.force,
            torque: load.torque,
            light_vector: sample.light_vector,
        });

        Ok(Some(load))
    }
}
