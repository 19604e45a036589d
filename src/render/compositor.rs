use rayon::prelude::*;

use crate::curve::model::CurveModel;
use crate::curve::sampler::Sampler;
use crate::foundation::core::FrameRGBA;
use crate::foundation::error::{CurvetError, CurvetResult};
use crate::foundation::math::mul_div255_u8;

/// Stroke opacity for the chord and curve strokes (60%).
const STROKE_OPACITY: u16 = 153;

const CHORD_RGB: [u8; 3] = [0, 0, 0];
const CURVE_RGB: [u8; 3] = [255, 0, 0];
const ANCHOR_RGB: [u8; 3] = [255, 255, 255];
const TIP_RGB: [u8; 3] = [0, 255, 255];

/// The fixed parameter block handed to the per-pixel compute step for one
/// frame: marker geometry plus the flattened curve samples.
#[derive(Clone, Debug, PartialEq)]
pub struct CurveFrameParams {
    /// Anchor disk radius in pixels.
    pub radius: f32,
    /// Stroke width of the chord and curve polyline in pixels.
    pub stroke_width: f32,
    /// Start anchor in pixel space.
    pub start: [f32; 2],
    /// Tip of the revealed curve (the last sample point).
    pub end: [f32; 2],
    /// Current chord endpoint (linear interpolation between the anchors).
    pub chord_point: [f32; 2],
    /// Interleaved x,y curve samples; length `2 * sample_count`.
    pub samples: Vec<f32>,
    /// Number of curve samples.
    pub sample_count: i32,
}

impl CurveFrameParams {
    /// Default anchor disk radius.
    pub const DEFAULT_RADIUS: f32 = 10.0;
    /// Default stroke width.
    pub const DEFAULT_STROKE_WIDTH: f32 = 8.0;

    /// Assemble the parameter block for `model` at `progress`.
    pub fn for_progress(
        model: &CurveModel,
        progress: f64,
        radius: f32,
        stroke_width: f32,
    ) -> CurvetResult<Self> {
        let sampler = Sampler::new(model);
        let count = model.sample_count();
        let samples = sampler.sample_flat(progress, count)?;
        let tip = [samples[samples.len() - 2], samples[samples.len() - 1]];
        let start = model.pixel_start();
        let chord = model.linear_point(progress);
        Ok(Self {
            radius,
            stroke_width,
            start: [start.x as f32, start.y as f32],
            end: tip,
            chord_point: [chord.x as f32, chord.y as f32],
            samples,
            sample_count: count as i32,
        })
    }
}

/// Controls for the compositor's data-parallel executor.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositorOpts {
    /// Override the number of worker threads. `None` uses rayon defaults.
    pub threads: Option<usize>,
}

/// Composites a background frame with curve-sample parameters into an output
/// frame: chord stroke, curve polyline stroke and three anchor disks, layered
/// back to front over the background.
///
/// Coverage is decided independently per pixel by distance to the chord
/// segment, the sample polyline and the disk centers, executed data-parallel
/// over output rows on a dedicated thread pool.
pub struct CurveCompositor {
    pool: rayon::ThreadPool,
}

impl CurveCompositor {
    /// Build a compositor and its worker pool.
    ///
    /// Pool construction failure is fatal for the whole render session and
    /// surfaces as [`CurvetError::ComputeUnavailable`].
    pub fn new(opts: CompositorOpts) -> CurvetResult<Self> {
        if let Some(n) = opts.threads
            && n == 0
        {
            return Err(CurvetError::invalid_configuration(
                "compositor 'threads' must be >= 1 when set",
            ));
        }
        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = opts.threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build().map_err(|e| {
            CurvetError::compute_unavailable(format!(
                "failed to build compositor thread pool: {e}"
            ))
        })?;
        Ok(Self { pool })
    }

    /// Composite one frame. Layering back to front: background, chord stroke
    /// (black, 60%), curve polyline stroke (red, 60%), start disk (white),
    /// chord-endpoint disk (white), tip disk (cyan).
    pub fn composite(
        &self,
        background: &FrameRGBA,
        params: &CurveFrameParams,
    ) -> CurvetResult<FrameRGBA> {
        if background.width == 0 || background.height == 0 {
            return Err(CurvetError::invalid_configuration(
                "composite background dimensions must be non-zero",
            ));
        }
        let expected = (background.width as usize) * (background.height as usize) * 4;
        if background.data.len() != expected {
            return Err(CurvetError::invalid_configuration(
                "composite background data length must be width * height * 4",
            ));
        }
        if params.sample_count < 2 {
            return Err(CurvetError::invalid_configuration(
                "composite sample count must be >= 2",
            ));
        }
        if params.samples.len() != (params.sample_count as usize) * 2 {
            return Err(CurvetError::invalid_configuration(
                "composite samples length must be 2 * sample_count",
            ));
        }

        let mut data = background.data.clone();
        let stride = (background.width as usize) * 4;
        self.pool.install(|| {
            data.par_chunks_mut(stride).enumerate().for_each(|(y, row)| {
                shade_row(row, y as f32, params);
            });
        });

        Ok(FrameRGBA {
            width: background.width,
            height: background.height,
            data,
        })
    }
}

fn shade_row(row: &mut [u8], y: f32, params: &CurveFrameParams) {
    let half_stroke_sq = {
        let h = params.stroke_width * 0.5;
        h * h
    };
    let radius_sq = params.radius * params.radius;

    for (x, px) in row.chunks_exact_mut(4).enumerate() {
        let p = [x as f32, y];

        if dist_sq_to_segment(p, params.start, params.chord_point) <= half_stroke_sq {
            blend_over(px, CHORD_RGB, STROKE_OPACITY);
        }
        if dist_sq_to_polyline(p, &params.samples) <= half_stroke_sq {
            blend_over(px, CURVE_RGB, STROKE_OPACITY);
        }
        if dist_sq(p, params.start) <= radius_sq {
            fill(px, ANCHOR_RGB);
        }
        if dist_sq(p, params.chord_point) <= radius_sq {
            fill(px, ANCHOR_RGB);
        }
        if dist_sq(p, params.end) <= radius_sq {
            fill(px, TIP_RGB);
        }
    }
}

fn dist_sq(p: [f32; 2], q: [f32; 2]) -> f32 {
    let dx = p[0] - q[0];
    let dy = p[1] - q[1];
    dx * dx + dy * dy
}

fn dist_sq_to_segment(p: [f32; 2], a: [f32; 2], b: [f32; 2]) -> f32 {
    let ab = [b[0] - a[0], b[1] - a[1]];
    let ap = [p[0] - a[0], p[1] - a[1]];
    let len_sq = ab[0] * ab[0] + ab[1] * ab[1];
    if len_sq <= f32::EPSILON {
        return dist_sq(p, a);
    }
    let t = ((ap[0] * ab[0] + ap[1] * ab[1]) / len_sq).clamp(0.0, 1.0);
    dist_sq(p, [a[0] + t * ab[0], a[1] + t * ab[1]])
}

fn dist_sq_to_polyline(p: [f32; 2], samples: &[f32]) -> f32 {
    let mut best = f32::INFINITY;
    for pair in samples.windows(4).step_by(2) {
        let d = dist_sq_to_segment(p, [pair[0], pair[1]], [pair[2], pair[3]]);
        if d < best {
            best = d;
        }
    }
    best
}

fn blend_over(px: &mut [u8], rgb: [u8; 3], opacity: u16) {
    let inv = 255 - opacity;
    for i in 0..3 {
        px[i] = mul_div255_u8(u16::from(rgb[i]), opacity)
            .saturating_add(mul_div255_u8(u16::from(px[i]), inv));
    }
    px[3] = 255;
}

fn fill(px: &mut [u8], rgb: [u8; 3]) {
    px[0] = rgb[0];
    px[1] = rgb[1];
    px[2] = rgb[2];
    px[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::model::{ControlPoints, CurveModel};
    use crate::foundation::core::{Point, Viewport};

    fn arch_model() -> CurveModel {
        // 100x100 viewport; chord along y=25, curve arching down to y~37.
        CurveModel::new(
            ControlPoints {
                start: Point::new(0.25, 0.25),
                seed: Point::new(0.5, 1.0),
                end: Point::new(0.75, 0.25),
            },
            Viewport::new(100.0, 100.0),
            10,
        )
        .unwrap()
    }

    fn composite_full_reveal() -> FrameRGBA {
        let model = arch_model();
        let params = CurveFrameParams::for_progress(
            &model,
            1.0,
            CurveFrameParams::DEFAULT_RADIUS,
            CurveFrameParams::DEFAULT_STROKE_WIDTH,
        )
        .unwrap();
        let compositor = CurveCompositor::new(CompositorOpts { threads: Some(2) }).unwrap();
        let background = FrameRGBA::solid(100, 100, [100, 100, 100, 255]);
        compositor.composite(&background, &params).unwrap()
    }

    #[test]
    fn chord_midpoint_blends_black_over_background() {
        let out = composite_full_reveal();
        // 60% black over gray 100: 0 + 100 * 102 / 255 = 40 per channel.
        assert_eq!(out.pixel(50, 25), [40, 40, 40, 255]);
    }

    #[test]
    fn curve_stroke_blends_red_over_background() {
        let out = composite_full_reveal();
        // On the revealed polyline, far from chord and disks.
        assert_eq!(out.pixel(37, 37), [193, 40, 40, 255]);
    }

    #[test]
    fn anchor_disks_layer_over_strokes() {
        let out = composite_full_reveal();
        // Start anchor is white; the tip disk lands on the chord endpoint at
        // full reveal and is drawn last, so it wins as cyan.
        assert_eq!(out.pixel(25, 25), [255, 255, 255, 255]);
        assert_eq!(out.pixel(75, 25), [0, 255, 255, 255]);
    }

    #[test]
    fn untouched_pixels_keep_the_background() {
        let out = composite_full_reveal();
        assert_eq!(out.pixel(99, 99), [100, 100, 100, 255]);
    }

    #[test]
    fn zero_progress_collapses_samples_onto_the_start() {
        let model = arch_model();
        let params = CurveFrameParams::for_progress(&model, 0.0, 10.0, 8.0).unwrap();
        assert_eq!(params.end, [25.0, 25.0]);
        assert_eq!(params.chord_point, [25.0, 25.0]);
        assert!(params.samples.chunks(2).all(|s| s == [25.0, 25.0]));
    }

    #[test]
    fn invalid_parameter_blocks_are_rejected() {
        let compositor = CurveCompositor::new(CompositorOpts::default()).unwrap();
        let background = FrameRGBA::solid(4, 4, [0, 0, 0, 255]);
        let params = CurveFrameParams {
            radius: 10.0,
            stroke_width: 8.0,
            start: [0.0, 0.0],
            end: [1.0, 1.0],
            chord_point: [1.0, 0.0],
            samples: vec![0.0; 6],
            sample_count: 2,
        };
        assert!(compositor.composite(&background, &params).is_err());

        let short = FrameRGBA {
            width: 4,
            height: 4,
            data: vec![0; 8],
        };
        let ok_params = CurveFrameParams {
            samples: vec![0.0; 4],
            ..params
        };
        assert!(compositor.composite(&short, &ok_params).is_err());
    }

    #[test]
    fn zero_thread_override_is_rejected() {
        assert!(CurveCompositor::new(CompositorOpts { threads: Some(0) }).is_err());
    }
}
