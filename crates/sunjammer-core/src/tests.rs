use crate::accumulator::*;
use crate::config::*;
use crate::constants::*;
use crate::normal_buffer::*;
use approx::{assert_abs_diff_eq, assert_relative_eq};
use glam::DVec3;

fn accumulator(resolution: u32, reduction: Reduction) -> ForceAccumulator {
    let config = RadiationConfig {
        reduction,
        ..RadiationConfig::with_resolution(resolution)
    };
    ForceAccumulator::new(&config).unwrap()
}

/// Deterministic pseudo-random normals, a third of them background
fn scrambled_buffer(resolution: u32) -> NormalBuffer {
    let mut buffer = NormalBuffer::new(resolution, BACKGROUND);
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for texel in buffer.texels_mut() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        if state % 3 == 0 {
            continue;
        }
        let a = (state & 0xFFFF) as f64 / 65535.0 * std::f64::consts::TAU;
        let b = ((state >> 16) & 0xFFFF) as f64 / 65535.0;
        let normal = DVec3::new(a.cos() * (1.0 - b), a.sin() * (1.0 - b), b).normalize();
        *texel = encode_normal(normal);
    }
    buffer
}

#[test]
fn test_background_only_gives_nothing() {
    let buffer = NormalBuffer::new(RESOLUTION, BACKGROUND);
    let result = accumulator(RESOLUTION, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();

    assert_eq!(result.force, DVec3::ZERO);
    assert_eq!(result.torque, DVec3::ZERO);
    assert_eq!(result.lit_texels, 0);
}

#[test]
fn test_facing_sail_pushes_along_view_axis() {
    let mut buffer = NormalBuffer::new(RESOLUTION, BACKGROUND);
    buffer.fill(encode_normal(DVec3::Z));

    let result = accumulator(RESOLUTION, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();
    let texels = (RESOLUTION * RESOLUTION) as f64;

    // Camera looks down -Z, so the push is away from the light
    assert!(result.force.z < 0.0);
    assert_relative_eq!(result.force.z, -REFLECTION_FACTOR * texels, max_relative = 1e-3);
    assert!(result.force.x.abs() < result.force.z.abs() * 0.01);
    assert!(result.force.y.abs() < result.force.z.abs() * 0.01);

    // Symmetric lever arms cancel
    assert_abs_diff_eq!(result.torque.length(), 0.0, epsilon = 1e-6);
    assert_eq!(result.lit_texels, RESOLUTION * RESOLUTION);
}

#[test]
fn test_grazing_surface_contributes_little() {
    let mut buffer = NormalBuffer::new(16, BACKGROUND);
    buffer.fill(encode_normal(DVec3::X));

    let result = accumulator(16, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();

    // Only the 8-bit quantisation residue on z survives
    assert!(result.force.length() < 0.05 * 256.0);
}

#[test]
fn test_tilted_sail_deflects_force() {
    let tilt = 30.0_f64.to_radians();
    let normal = DVec3::new(tilt.sin(), 0.0, tilt.cos());
    let mut buffer = NormalBuffer::new(32, BACKGROUND);
    buffer.fill(encode_normal(normal));

    let result = accumulator(32, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();

    assert!(result.force.x < 0.0);
    assert!(result.force.z < 0.0);
    let expected_ratio = tilt.tan();
    assert_relative_eq!(result.force.x / result.force.z, expected_ratio, max_relative = 0.02);
}

#[test]
fn test_off_centre_texel_produces_torque() {
    // 3x3 frame: column 2, row 1 sits at lever (1, 0, 0)
    let mut buffer = NormalBuffer::new(3, BACKGROUND);
    buffer.set_texel(2, 1, encode_normal(DVec3::Z));

    let result = accumulator(3, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();

    // (1, 0, 0) x (0, 0, -2) = (0, 2, 0)
    assert_relative_eq!(result.torque.y, 2.0, max_relative = 1e-3);
    assert_abs_diff_eq!(result.torque.x, 0.0, epsilon = 1e-9);
    assert_eq!(result.lit_texels, 1);
}

#[test]
fn test_reduction_order_does_not_matter() {
    let buffer = scrambled_buffer(RESOLUTION);

    let sequential = accumulator(RESOLUTION, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();
    let parallel = accumulator(RESOLUTION, Reduction::Parallel)
        .accumulate(&buffer)
        .unwrap();
    let raw = accumulate_bytes(buffer.as_bytes(), RESOLUTION, BACKGROUND).unwrap();

    let scale = sequential.force.length().max(1.0);
    assert!((sequential.force - parallel.force).length() / scale < 1e-4);
    assert!((sequential.torque - parallel.torque).length() / scale < 1e-4);
    assert_eq!(sequential.lit_texels, parallel.lit_texels);
    assert_eq!(sequential, raw);
}

#[test]
fn test_shuffled_texel_order_matches_sequential() {
    let resolution = 32;
    let width = resolution as usize;
    let buffer = scrambled_buffer(resolution);
    let sequential = accumulator(resolution, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap();

    let mut order: Vec<usize> = (0..width * width).collect();
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    for i in (1..order.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        order.swap(i, (state % (i as u64 + 1)) as usize);
    }

    // Each texel alone in an otherwise empty row, visited in shuffled order
    let texels = buffer.texels();
    let mut shuffled = ForceTorque::zero();
    let mut line = vec![BACKGROUND; width];
    for &i in &order {
        let (row, col) = (i / width, i % width);
        line[col] = texels[i];
        shuffled += crate::accumulator::reduce_row(&line, row, resolution, BACKGROUND);
        line[col] = BACKGROUND;
    }

    let scale = sequential.force.length().max(1.0);
    assert!((sequential.force - shuffled.force).length() / scale < 1e-9);
    assert!((sequential.torque - shuffled.torque).length() / scale < 1e-9);
    assert_eq!(sequential.lit_texels, shuffled.lit_texels);

    // Rows folded bottom-up and top-down agree as well
    let mut reversed = ForceTorque::zero();
    for (row, chunk) in texels.chunks_exact(width).enumerate().rev() {
        reversed += crate::accumulator::reduce_row(chunk, row, resolution, BACKGROUND);
    }
    assert!((sequential.force - reversed.force).length() / scale < 1e-9);
    assert!((sequential.torque - reversed.torque).length() / scale < 1e-9);
}

#[test]
fn test_resolution_mismatch_is_configuration_error() {
    let buffer = NormalBuffer::new(64, BACKGROUND);
    let err = accumulator(128, Reduction::Sequential)
        .accumulate(&buffer)
        .unwrap_err();
    assert!(matches!(err, crate::RadiationError::Configuration(_)));

    assert!(accumulate_bytes(&[0; 12], 2, BACKGROUND).is_err());
}

#[test]
fn test_force_torque_helpers() {
    let pair = ForceTorque {
        force: DVec3::new(1.0, 0.0, 0.0),
        torque: DVec3::new(0.0, 0.0, 2.0),
        lit_texels: 5,
    };
    let doubled = pair.scaled(2.0);
    assert_eq!(doubled.force, DVec3::new(2.0, 0.0, 0.0));
    assert_eq!(doubled.lit_texels, 5);

    let turned = pair.rotated(glam::DQuat::from_rotation_z(std::f64::consts::FRAC_PI_2));
    assert_abs_diff_eq!(turned.force.y, 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(turned.torque.z, 2.0, epsilon = 1e-12);

    let sum = pair + pair;
    assert_eq!(sum.lit_texels, 10);
}
