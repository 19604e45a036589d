use crate::foundation::error::{CurvetError, CurvetResult};

pub use kurbo::{Point, Vec2};

/// Rational frames-per-second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator; must be > 0.
    pub num: u32,
    /// Denominator; must be > 0.
    pub den: u32,
}

impl Fps {
    /// The fixed export frame rate (30 fps).
    pub const THIRTY: Fps = Fps { num: 30, den: 1 };

    /// Construct a validated frame rate.
    pub fn new(num: u32, den: u32) -> CurvetResult<Self> {
        if num == 0 {
            return Err(CurvetError::invalid_configuration("Fps num must be > 0"));
        }
        if den == 0 {
            return Err(CurvetError::invalid_configuration("Fps den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

/// A rational presentation timestamp: `value` counts of `1/timescale` seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MediaTime {
    /// Tick count.
    pub value: i64,
    /// Ticks per second; must be > 0.
    pub timescale: u32,
}

impl MediaTime {
    /// Timestamp zero.
    pub const ZERO: MediaTime = MediaTime {
        value: 0,
        timescale: 1,
    };

    /// Timestamp of frame `frame` (0-based) at `fps`.
    pub fn from_frame(frame: u64, fps: Fps) -> Self {
        Self {
            value: (frame as i64) * i64::from(fps.den),
            timescale: fps.num,
        }
    }

    /// The timestamp in seconds.
    pub fn seconds(self) -> f64 {
        (self.value as f64) / f64::from(self.timescale.max(1))
    }
}

/// The pixel rectangle the normalized control points map into.
///
/// Absolute pixel positions are always derived from normalized coordinates and
/// these dimensions; they are never stored alongside them.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Construct a viewport of the given pixel dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// `true` unless both dimensions are strictly positive.
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A frame of straight-alpha RGBA8 pixels, tightly packed, row-major.
///
/// Backgrounds decoded from images and everything the compositor produces are
/// opaque; the encoder consumes the bytes as `rgba` directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, length `width * height * 4`.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// A frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity((width as usize) * (height as usize) * 4);
        for _ in 0..(width as usize) * (height as usize) {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// The RGBA bytes of the pixel at `(x, y)`.
    ///
    /// Panics if the coordinates are out of bounds (intended for tests and
    /// debugging, not hot paths).
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_seconds_per_frame() {
        let fps = Fps::new(30, 1).unwrap();
        assert_eq!(fps.as_f64(), 30.0);
        assert!((fps.frame_duration_secs() - 1.0 / 30.0).abs() < 1e-12);
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(30, 0).is_err());
    }

    #[test]
    fn media_time_from_frame_counts_in_fps_ticks() {
        let t = MediaTime::from_frame(299, Fps::THIRTY);
        assert_eq!(t.value, 299);
        assert_eq!(t.timescale, 30);
        assert!((t.seconds() - 299.0 / 30.0).abs() < 1e-12);
        assert_eq!(MediaTime::ZERO.seconds(), 0.0);
    }

    #[test]
    fn viewport_emptiness() {
        assert!(Viewport::default().is_empty());
        assert!(Viewport::new(0.0, 100.0).is_empty());
        assert!(Viewport::new(100.0, -1.0).is_empty());
        assert!(!Viewport::new(640.0, 640.0).is_empty());
    }

    #[test]
    fn solid_frame_pixels() {
        let f = FrameRGBA::solid(2, 2, [1, 2, 3, 255]);
        assert_eq!(f.data.len(), 16);
        assert_eq!(f.pixel(1, 1), [1, 2, 3, 255]);
    }
}
