use crate::mission::MissionConfig;
use crate::vehicle::VehicleConfig;
use serde::{Deserialize, Serialize};
use sunjammer_core::RadiationConfig;

/// Every tunable of a run, as stored in a JSON config file
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunjammerConfig {
    pub radiation: RadiationConfig,
    pub vehicle: VehicleConfig,
    pub mission: MissionConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SunjammerConfig =
            serde_json::from_str(r#"{ "radiation": { "resolution": 64 }, "vehicle": { "planar": false } }"#).unwrap();
        assert_eq!(config.radiation.resolution, 64);
        assert_eq!(config.radiation.falloff, 1000.0);
        assert!(!config.vehicle.planar);
        assert_eq!(config.vehicle.force_scale, 0.5);
        assert_eq!(config.mission, MissionConfig::default());
    }
}
