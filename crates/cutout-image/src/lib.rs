//! PixelSource: bridges displayable image bytes and the pipeline's raw
//! RGBA buffers.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use cutout_core::{AlphaMask, CutoutError, PixelBuffer};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbaImage};

/// Decodes any supported image format into an RGBA pixel buffer.
pub fn decode_rgba(bytes: &[u8]) -> Result<PixelBuffer, CutoutError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| CutoutError::AssetDecode(e.to_string()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba(width, height, rgba.into_raw())
}

/// Encodes a pixel buffer as in-memory PNG, preserving the alpha channel.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let img = RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
        .ok_or_else(|| anyhow!("pixel buffer length does not match its dimensions"))?;
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
        .context("encoding pixel buffer as png")?;
    Ok(out)
}

/// Renders a binary alpha mask as an in-memory grayscale PNG
/// (255 foreground, 0 background) for inspection.
pub fn mask_to_luma_png(mask: &AlphaMask) -> Result<Vec<u8>> {
    let mut img = GrayImage::new(mask.width(), mask.height());
    for (i, pixel) in img.pixels_mut().enumerate() {
        *pixel = Luma([if mask.is_opaque(i) { 255 } else { 0 }]);
    }
    let mut out = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
        .context("encoding alpha mask as png")?;
    Ok(out)
}

/// Writes a pixel buffer to disk as PNG, creating parent directories.
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating parent directory for {}", path.display()))?;
    }
    let bytes = encode_png(buffer)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
