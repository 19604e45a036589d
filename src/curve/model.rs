use crate::foundation::core::{Point, Viewport};
use crate::foundation::error::{CurvetError, CurvetResult};

/// The three control points of a quadratic Bezier curve, in normalized
/// unit-square coordinates ([0, 1] per axis, independent of any viewport).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ControlPoints {
    /// Curve start anchor.
    pub start: Point,
    /// The interactive control ("seed") point.
    pub seed: Point,
    /// Curve end anchor.
    pub end: Point,
}

impl Default for ControlPoints {
    fn default() -> Self {
        Self {
            start: Point::new(0.8, 0.5),
            seed: Point::new(0.5, 0.6),
            end: Point::new(0.2, 0.4),
        }
    }
}

/// A quadratic Bezier curve parameterized by normalized control points plus
/// the pixel viewport they map into.
///
/// Pixel positions are derived on demand; only the dimensionless ratios and
/// the viewport are stored. An "empty" model (empty viewport, or all three
/// pixel points at the origin simultaneously) evaluates to the origin rather
/// than failing.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveModel {
    points: ControlPoints,
    viewport: Viewport,
    sample_count: usize,
}

impl Default for CurveModel {
    fn default() -> Self {
        Self {
            points: ControlPoints::default(),
            viewport: Viewport::default(),
            sample_count: Self::DEFAULT_SAMPLE_COUNT,
        }
    }
}

// Bernstein-style quadratic weights. The middle weight carries no factor of
// 2, so the basis does not sum to one; the sag toward the origin that results
// is part of the curve's defined shape.
fn b0(t: f64) -> f64 {
    t * t
}

fn b1(t: f64) -> f64 {
    t * (1.0 - t)
}

fn b2(t: f64) -> f64 {
    (1.0 - t) * (1.0 - t)
}

impl CurveModel {
    /// Default number of curve samples per evaluation pass.
    pub const DEFAULT_SAMPLE_COUNT: usize = 10;

    /// Construct a model with explicit control points, viewport and sample
    /// count. `sample_count` must be at least 2.
    pub fn new(
        points: ControlPoints,
        viewport: Viewport,
        sample_count: usize,
    ) -> CurvetResult<Self> {
        if sample_count < 2 {
            return Err(CurvetError::invalid_configuration(
                "curve sample count must be >= 2",
            ));
        }
        Ok(Self {
            points,
            viewport,
            sample_count,
        })
    }

    /// A default-populated model targeting `viewport`.
    pub fn with_viewport(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    /// The normalized control points.
    pub fn points(&self) -> ControlPoints {
        self.points
    }

    /// The current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of samples produced per evaluation pass.
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Replace the viewport. Storage only; no derived state to update.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Replace all three control points.
    pub fn set_control_points(&mut self, points: ControlPoints) {
        self.points = points;
    }

    /// Move the seed point to a pixel-space location, converting to
    /// normalized coordinates. Ignored while the viewport is empty.
    pub fn set_seed_pixel(&mut self, pixel: Point) {
        if self.viewport.is_empty() {
            return;
        }
        self.points.seed = Point::new(
            pixel.x / self.viewport.width,
            pixel.y / self.viewport.height,
        );
    }

    fn pixel_of(&self, p: Point) -> Point {
        if self.viewport.is_empty() {
            return Point::ZERO;
        }
        Point::new(p.x * self.viewport.width, p.y * self.viewport.height)
    }

    /// The start anchor in pixel space (origin when the viewport is empty).
    pub fn pixel_start(&self) -> Point {
        self.pixel_of(self.points.start)
    }

    /// The seed point in pixel space (origin when the viewport is empty).
    pub fn pixel_seed(&self) -> Point {
        self.pixel_of(self.points.seed)
    }

    /// The end anchor in pixel space (origin when the viewport is empty).
    pub fn pixel_end(&self) -> Point {
        self.pixel_of(self.points.end)
    }

    /// A model is empty iff its viewport is empty or all three control points
    /// map to the pixel-space origin simultaneously.
    pub fn is_empty(&self) -> bool {
        if self.viewport.is_empty() {
            return true;
        }
        let s = self.pixel_start();
        let c = self.pixel_seed();
        let e = self.pixel_end();
        s.x == 0.0 && c.x == 0.0 && e.x == 0.0 && s.y == 0.0 && c.y == 0.0 && e.y == 0.0
    }

    /// The curve position at parameter `t`, in pixel space.
    ///
    /// The weight-to-point pairing is `end*b0 + seed*b1 + start*b2` with
    /// `b0(t)=t^2`, `b1(t)=t(1-t)`, `b2(t)=(1-t)^2`. `t` outside [0, 1] and
    /// empty models both yield the pixel origin; this is the defined
    /// fallback, not an error.
    pub fn evaluate(&self, t: f64) -> Point {
        if !(0.0..=1.0).contains(&t) || self.is_empty() {
            return Point::ZERO;
        }
        let s = self.pixel_start();
        let c = self.pixel_seed();
        let e = self.pixel_end();
        Point::new(
            e.x * b0(t) + c.x * b1(t) + s.x * b2(t),
            e.y * b0(t) + c.y * b1(t) + s.y * b2(t),
        )
    }

    /// Straight-line interpolation between the start and end anchors in pixel
    /// space, independent of the seed point. Draws the chord reference
    /// segment during animation.
    pub fn linear_point(&self, progress: f64) -> Point {
        let p = self.points;
        Point::new(
            (p.start.x - (p.start.x - p.end.x) * progress) * self.viewport.width,
            (p.start.y - (p.start.y - p.end.y) * progress) * self.viewport.height,
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/model.rs"]
mod tests;
