//! The bundled sample gallery.
//!
//! The demo ships a handful of images addressed by a stable identifier.
//! They are synthesized at runtime instead of checked in as binary
//! assets: each one draws a bright subject on a dark backdrop, which is
//! exactly the shape a segmentation provider is asked to separate.

use std::fmt::{Display, Formatter};

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

const SAMPLE_SIZE: u32 = 96;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleId {
    Passport,
    Portrait,
    Gradient,
    Checker,
}

impl SampleId {
    pub fn id(self) -> &'static str {
        match self {
            Self::Passport => "passport",
            Self::Portrait => "portrait",
            Self::Gradient => "gradient",
            Self::Checker => "checker",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Passport => "head-and-shoulders subject centered on a dark backdrop",
            Self::Portrait => "off-center bright disc subject",
            Self::Gradient => "vertical dark-to-bright gradient, no distinct subject",
            Self::Checker => "bright/dark checkerboard stress pattern",
        }
    }

    pub fn all() -> [SampleId; 4] {
        [
            SampleId::Passport,
            SampleId::Portrait,
            SampleId::Gradient,
            SampleId::Checker,
        ]
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "passport" => Some(Self::Passport),
            "portrait" => Some(Self::Portrait),
            "gradient" => Some(Self::Gradient),
            "checker" => Some(Self::Checker),
            _ => None,
        }
    }
}

impl Display for SampleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Renders a sample to raw RGBA pixels. Deterministic per id.
pub fn render(id: SampleId) -> RgbaImage {
    match id {
        SampleId::Passport => RgbaImage::from_fn(SAMPLE_SIZE, SAMPLE_SIZE, passport_pixel),
        SampleId::Portrait => RgbaImage::from_fn(SAMPLE_SIZE, SAMPLE_SIZE, portrait_pixel),
        SampleId::Gradient => RgbaImage::from_fn(SAMPLE_SIZE, SAMPLE_SIZE, |_, y| {
            let level = (y * 255 / (SAMPLE_SIZE - 1)) as u8;
            Rgba([level, level, level, 255])
        }),
        SampleId::Checker => RgbaImage::from_fn(SAMPLE_SIZE, SAMPLE_SIZE, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                Rgba([235, 235, 235, 255])
            } else {
                Rgba([20, 20, 20, 255])
            }
        }),
    }
}

/// Renders a sample as in-memory PNG bytes.
pub fn render_png(id: SampleId) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(render(id))
        .write_to(&mut std::io::Cursor::new(&mut out), ImageFormat::Png)
        .with_context(|| format!("encoding sample '{}' as png", id))?;
    Ok(out)
}

fn passport_pixel(x: u32, y: u32) -> Rgba<u8> {
    let cx = SAMPLE_SIZE as i64 / 2;
    // Head: disc in the upper half. Shoulders: band across the bottom.
    let head = sq(x as i64 - cx) + sq(y as i64 - 34) <= sq(20);
    let shoulders = y >= 66 && (x as i64 - cx).abs() <= 30;
    if head || shoulders {
        Rgba([214, 178, 148, 255])
    } else {
        Rgba([28, 30, 36, 255])
    }
}

fn portrait_pixel(x: u32, y: u32) -> Rgba<u8> {
    if sq(x as i64 - 60) + sq(y as i64 - 40) <= sq(24) {
        Rgba([240, 206, 130, 255])
    } else {
        Rgba([16, 24, 20, 255])
    }
}

fn sq(v: i64) -> i64 {
    v * v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip() {
        for sample in SampleId::all() {
            assert_eq!(SampleId::from_id(sample.id()), Some(sample));
        }
        assert_eq!(SampleId::from_id("nope"), None);
    }

    #[test]
    fn samples_are_fully_opaque_rgba() {
        for sample in SampleId::all() {
            let img = render(sample);
            assert_eq!(img.dimensions(), (SAMPLE_SIZE, SAMPLE_SIZE));
            assert!(img.pixels().all(|p| p[3] == 255), "{} has holes", sample);
        }
    }

    #[test]
    fn passport_has_subject_and_backdrop() {
        let img = render(SampleId::Passport);
        let center = img.get_pixel(SAMPLE_SIZE / 2, 34);
        let corner = img.get_pixel(0, 0);
        assert!(center[0] > 180, "subject pixels should be bright");
        assert!(corner[0] < 60, "backdrop pixels should be dark");
    }

    #[test]
    fn rendering_is_deterministic() {
        let a = render_png(SampleId::Checker).expect("png");
        let b = render_png(SampleId::Checker).expect("png");
        assert_eq!(a, b);
    }
}
