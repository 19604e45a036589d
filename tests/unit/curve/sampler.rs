use super::*;
use crate::foundation::core::Viewport;

fn model() -> CurveModel {
    CurveModel::with_viewport(Viewport::new(100.0, 100.0))
}

#[test]
fn zero_progress_collapses_all_samples_onto_the_start() {
    let model = model();
    let points = Sampler::new(&model).sample_points(0.0, 8).unwrap();
    assert_eq!(points.len(), 8);
    for p in points {
        assert_eq!(p, model.evaluate(0.0));
    }
}

#[test]
fn full_progress_spans_the_curve_in_equal_steps() {
    let model = model();
    let count = 10;
    let points = Sampler::new(&model).sample_points(1.0, count).unwrap();
    assert_eq!(points.len(), count);
    for (i, p) in points.iter().enumerate() {
        let t = (i as f64) / ((count - 1) as f64);
        let expected = model.evaluate(t);
        assert!((p.x - expected.x).abs() < 1e-9 && (p.y - expected.y).abs() < 1e-9);
    }
    assert_eq!(points[0], model.pixel_start());
    let last = points[count - 1];
    let end = model.pixel_end();
    assert!((last.x - end.x).abs() < 1e-9 && (last.y - end.y).abs() < 1e-9);
}

#[test]
fn partial_progress_widens_the_sampled_range() {
    let model = model();
    let sampler = Sampler::new(&model);
    let half = sampler.sample_points(0.5, 5).unwrap();
    // Last sample sits at t = 0.5, not at the curve end.
    assert_eq!(half[4], model.evaluate(0.5));
}

#[test]
fn counts_below_two_are_invalid() {
    let model = model();
    let sampler = Sampler::new(&model);
    for count in [0, 1] {
        let err = sampler.sample_points(1.0, count).unwrap_err();
        assert!(matches!(err, CurvetError::InvalidConfiguration(_)));
    }
}

#[test]
fn flat_buffer_interleaves_xy() {
    let model = model();
    let sampler = Sampler::new(&model);
    let points = sampler.sample_points(1.0, 4).unwrap();
    let flat = sampler.sample_flat(1.0, 4).unwrap();
    assert_eq!(flat.len(), 8);
    for (i, p) in points.iter().enumerate() {
        assert_eq!(flat[i * 2], p.x as f32);
        assert_eq!(flat[i * 2 + 1], p.y as f32);
    }
}
