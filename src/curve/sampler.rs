use crate::curve::model::CurveModel;
use crate::foundation::core::Point;
use crate::foundation::error::{CurvetError, CurvetResult};

/// Samples a [`CurveModel`] into ordered point sequences for drawing and into
/// flat coordinate buffers for the data-parallel compositor.
///
/// Sampling is a progressive reveal: the sampled parameter range widens from
/// `[0, 0]` toward `[0, 1]` as `progress` grows, so at `progress = 0` every
/// sample collapses onto the curve start.
#[derive(Clone, Copy, Debug)]
pub struct Sampler<'a> {
    model: &'a CurveModel,
}

impl<'a> Sampler<'a> {
    /// Borrow a model for sampling.
    pub fn new(model: &'a CurveModel) -> Self {
        Self { model }
    }

    /// `count` points evaluated at `t = i * step` for `i` in `[0, count)`
    /// with `step = progress / (count - 1)`.
    ///
    /// Deterministic for a given `(model, progress, count)` and monotonic in
    /// `i`. `count < 2` would make the step ill-defined and is rejected.
    pub fn sample_points(&self, progress: f64, count: usize) -> CurvetResult<Vec<Point>> {
        if count < 2 {
            return Err(CurvetError::invalid_configuration(
                "sample count must be >= 2",
            ));
        }
        let step = progress / ((count - 1) as f64);
        Ok((0..count)
            .map(|i| self.model.evaluate((i as f64) * step))
            .collect())
    }

    /// Same samples as [`Sampler::sample_points`], flattened to interleaved
    /// `x, y` scalars (length `2 * count`) for a flat parameter buffer.
    pub fn sample_flat(&self, progress: f64, count: usize) -> CurvetResult<Vec<f32>> {
        let points = self.sample_points(progress, count)?;
        let mut flat = Vec::with_capacity(points.len() * 2);
        for p in points {
            flat.push(p.x as f32);
            flat.push(p.y as f32);
        }
        Ok(flat)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/curve/sampler.rs"]
mod tests;
