//! Light-pass normal buffer
//!
//! Each texel stores a surface normal as seen from the light camera, packed as
//! `byte = (component + 1) / 2 * 255`. Texels the render left untouched hold the
//! background sentinel.

use crate::error::{RadiationError, RadiationResult};
use glam::DVec3;

/// Alpha written for texels that carry a surface normal
pub const SURFACE_ALPHA: u8 = 255;

/// Pack a unit normal into an RGBA texel
pub fn encode_normal(normal: DVec3) -> [u8; 4] {
    let pack = |c: f64| ((c.clamp(-1.0, 1.0) * 0.5 + 0.5) * 255.0).round() as u8;
    [pack(normal.x), pack(normal.y), pack(normal.z), SURFACE_ALPHA]
}

/// Unpack the RGB channels of a texel back into [-1, 1]
#[inline]
pub fn decode_normal(texel: [u8; 4]) -> DVec3 {
    let unpack = |b: u8| b as f64 / 255.0 * 2.0 - 1.0;
    DVec3::new(unpack(texel[0]), unpack(texel[1]), unpack(texel[2]))
}

/// Square RGBA8 image written by the light pass
#[derive(Clone, Debug, PartialEq)]
pub struct NormalBuffer {
    resolution: u32,
    data: Vec<u8>,
}

impl NormalBuffer {
    /// Allocate a buffer cleared to `background`
    pub fn new(resolution: u32, background: [u8; 4]) -> Self {
        let texels = (resolution as usize) * (resolution as usize);
        let mut data = Vec::with_capacity(texels * 4);
        for _ in 0..texels {
            data.extend_from_slice(&background);
        }
        Self { resolution, data }
    }

    /// Wrap bytes produced elsewhere; length must be exactly R*R*4
    pub fn from_bytes(resolution: u32, data: Vec<u8>) -> RadiationResult<Self> {
        let expected = (resolution as usize) * (resolution as usize) * 4;
        if data.len() != expected {
            return Err(RadiationError::Configuration(format!(
                "buffer holds {} bytes, resolution {} needs {}",
                data.len(),
                resolution,
                expected
            )));
        }
        Ok(Self { resolution, data })
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Texels in row-major order, row 0 at the bottom of the frame
    pub fn texels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn texels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    pub fn fill(&mut self, texel: [u8; 4]) {
        self.texels_mut().fill(texel);
    }

    pub fn texel(&self, col: u32, row: u32) -> Option<[u8; 4]> {
        self.index(col, row).map(|i| self.texels()[i])
    }

    pub fn set_texel(&mut self, col: u32, row: u32, texel: [u8; 4]) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.texels_mut()[i] = texel;
                true
            }
            None => false,
        }
    }

    /// Number of texels different from `background`
    pub fn count_lit(&self, background: [u8; 4]) -> usize {
        self.texels().iter().filter(|t| **t != background).count()
    }

    fn index(&self, col: u32, row: u32) -> Option<usize> {
        if col < self.resolution && row < self.resolution {
            Some(row as usize * self.resolution as usize + col as usize)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BACKGROUND;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_new_buffer_is_background() {
        let buffer = NormalBuffer::new(8, BACKGROUND);
        assert_eq!(buffer.as_bytes().len(), 8 * 8 * 4);
        assert!(buffer.texels().iter().all(|t| *t == BACKGROUND));
        assert_eq!(buffer.count_lit(BACKGROUND), 0);
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        let err = NormalBuffer::from_bytes(4, vec![0; 10]).unwrap_err();
        assert!(matches!(err, RadiationError::Configuration(_)));
        assert!(NormalBuffer::from_bytes(4, vec![0; 64]).is_ok());
    }

    #[test]
    fn test_axis_normals_survive_packing() {
        for axis in [DVec3::X, DVec3::Y, DVec3::Z, DVec3::NEG_X, DVec3::NEG_Z] {
            let decoded = decode_normal(encode_normal(axis));
            // 8-bit quantisation puts zero at 128/255
            assert_abs_diff_eq!(decoded.x, axis.x, epsilon = 0.01);
            assert_abs_diff_eq!(decoded.y, axis.y, epsilon = 0.01);
            assert_abs_diff_eq!(decoded.z, axis.z, epsilon = 0.01);
        }
    }

    #[test]
    fn test_texel_addressing() {
        let mut buffer = NormalBuffer::new(4, BACKGROUND);
        assert!(buffer.set_texel(1, 2, [1, 2, 3, 4]));
        assert!(!buffer.set_texel(4, 0, [0; 4]));
        assert_eq!(buffer.texel(1, 2), Some([1, 2, 3, 4]));
        assert_eq!(&buffer.as_bytes()[(2 * 4 + 1) * 4..(2 * 4 + 2) * 4], &[1, 2, 3, 4]);
        assert_eq!(buffer.count_lit(BACKGROUND), 1);
    }
}
