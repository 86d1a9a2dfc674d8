/// Side length of the light-pass normal buffer in texels
pub const RESOLUTION: u32 = 128;

/// Largest supported buffer side
pub const MAX_RESOLUTION: u32 = 4096;

/// Bounding diameter of the craft in world units
pub const CRAFT_DIAMETER: f64 = 10.0;

/// Brightness constant of the inverse-square falloff
pub const FALLOFF: f64 = 1000.0;

/// Clear colour of the light pass, marks texels with no surface
pub const BACKGROUND: [u8; 4] = [127, 127, 127, 127];

/// Floor for the light camera near plane
pub const NEAR_EPSILON: f64 = 0.1;

/// Craft-to-light distances below this are clamped
pub const MIN_LIGHT_DISTANCE: f64 = 0.01;

/// Reflected light carries twice the incident momentum
pub const REFLECTION_FACTOR: f64 = 2.0;
