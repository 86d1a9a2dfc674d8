//! Core of the sunjammer light pass: normal buffers, configuration and the
//! reduction of a rendered normal map into radiation force and torque.

pub mod accumulator;
pub mod config;
pub mod constants;
pub mod error;
pub mod normal_buffer;

pub use accumulator::{accumulate_bytes, ForceAccumulator, ForceTorque, LIGHT_AXIS};
pub use config::{Normalization, RadiationConfig, Reduction};
pub use error::{RadiationError, RadiationResult};
pub use normal_buffer::{decode_normal, encode_normal, NormalBuffer};

#[cfg(test)]
mod tests;
