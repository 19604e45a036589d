use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{CurvetError, CurvetResult};

/// Produces background raster frames for the render loop, one per tick.
pub trait FrameSource {
    /// Fetch the next background frame at the requested dimensions.
    ///
    /// `Ok(None)` signals end-of-stream; the render loop treats it like
    /// duration exhaustion rather than an error.
    fn fetch_frame(&mut self, width: u32, height: u32) -> CurvetResult<Option<FrameRGBA>>;
}

impl<T: FrameSource + ?Sized> FrameSource for &mut T {
    fn fetch_frame(&mut self, width: u32, height: u32) -> CurvetResult<Option<FrameRGBA>> {
        (**self).fetch_frame(width, height)
    }
}

/// A still-image-backed frame source.
///
/// Decodes once up front; each fetch rescales the decoded image to the
/// requested dimensions (cached per size) and yields a copy. Never exhausts.
pub struct ImageFrameSource {
    rgba: image::RgbaImage,
    scaled: Option<FrameRGBA>,
}

impl ImageFrameSource {
    /// Decode an image file from disk.
    pub fn open(path: impl AsRef<Path>) -> CurvetResult<Self> {
        let path = path.as_ref();
        let dyn_img = image::open(path)
            .with_context(|| format!("decode background image '{}'", path.display()))?;
        Ok(Self::from_rgba(dyn_img.to_rgba8()))
    }

    /// Decode encoded image bytes.
    pub fn from_bytes(bytes: &[u8]) -> CurvetResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode background image bytes")?;
        Ok(Self::from_rgba(dyn_img.to_rgba8()))
    }

    /// Wrap an already-decoded frame.
    pub fn from_frame(frame: FrameRGBA) -> CurvetResult<Self> {
        let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.data)
            .ok_or_else(|| {
                CurvetError::invalid_configuration(
                    "frame data length does not match width * height * 4",
                )
            })?;
        Ok(Self::from_rgba(rgba))
    }

    fn from_rgba(rgba: image::RgbaImage) -> Self {
        Self { rgba, scaled: None }
    }
}

impl FrameSource for ImageFrameSource {
    fn fetch_frame(&mut self, width: u32, height: u32) -> CurvetResult<Option<FrameRGBA>> {
        if width == 0 || height == 0 {
            return Err(CurvetError::invalid_configuration(
                "background frame dimensions must be non-zero",
            ));
        }
        let stale = !matches!(&self.scaled, Some(f) if f.width == width && f.height == height);
        if stale {
            let resized = image::imageops::resize(
                &self.rgba,
                width,
                height,
                image::imageops::FilterType::Triangle,
            );
            self.scaled = Some(FrameRGBA {
                width,
                height,
                data: resized.into_raw(),
            });
        }
        Ok(self.scaled.clone())
    }
}
