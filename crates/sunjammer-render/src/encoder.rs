//! PNG export of light-pass captures (debug quad, CLI dumps)

use anyhow::{Context, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;
use sunjammer_core::NormalBuffer;

/// Convert to an image with row 0 at the top (the buffer stores row 0 at the bottom)
pub fn to_image(buffer: &NormalBuffer) -> Result<RgbaImage> {
    let res = buffer.resolution();
    let row_bytes = res as usize * 4;

    let mut flipped = Vec::with_capacity(buffer.as_bytes().len());
    for row in buffer.as_bytes().chunks_exact(row_bytes).rev() {
        flipped.extend_from_slice(row);
    }

    RgbaImage::from_raw(res, res, flipped)
        .ok_or_else(|| anyhow::anyhow!("Failed to create {res}x{res} image buffer"))
}

/// Encode as PNG bytes
pub fn encode_png(buffer: &NormalBuffer) -> Result<Vec<u8>> {
    let img = to_image(buffer)?;
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .context("PNG encoding failed")?;
    Ok(out.into_inner())
}

pub fn save_png(buffer: &NormalBuffer, path: &Path) -> Result<()> {
    let bytes = encode_png(buffer)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sunjammer_core::constants::BACKGROUND;

    #[test]
    fn test_image_is_flipped_vertically() {
        let mut buffer = NormalBuffer::new(4, BACKGROUND);
        buffer.set_texel(1, 0, [10, 20, 30, 255]);

        let img = to_image(&buffer).unwrap();
        assert_eq!(img.get_pixel(1, 3).0, [10, 20, 30, 255]);
        assert_eq!(img.get_pixel(1, 0).0, BACKGROUND);
    }

    #[test]
    fn test_png_signature() {
        let buffer = NormalBuffer::new(8, BACKGROUND);
        let png = encode_png(&buffer).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
