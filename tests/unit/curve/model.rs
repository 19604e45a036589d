use super::*;

const EPS: f64 = 1e-9;

fn laid_out_model() -> CurveModel {
    CurveModel::with_viewport(Viewport::new(200.0, 100.0))
}

fn assert_close(a: Point, b: Point) {
    assert!(
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
        "{a:?} != {b:?}"
    );
}

#[test]
fn default_triangle_matches_the_canonical_values() {
    let p = ControlPoints::default();
    assert_eq!(p.start, Point::new(0.8, 0.5));
    assert_eq!(p.seed, Point::new(0.5, 0.6));
    assert_eq!(p.end, Point::new(0.2, 0.4));
    assert_eq!(CurveModel::default().sample_count(), 10);
}

#[test]
fn pixel_points_are_derived_from_the_viewport() {
    let model = laid_out_model();
    assert_close(model.pixel_start(), Point::new(160.0, 50.0));
    assert_close(model.pixel_seed(), Point::new(100.0, 60.0));
    assert_close(model.pixel_end(), Point::new(40.0, 40.0));
}

#[test]
fn pixel_points_fall_back_to_origin_without_a_viewport() {
    let model = CurveModel::default();
    assert_eq!(model.pixel_start(), Point::ZERO);
    assert_eq!(model.pixel_seed(), Point::ZERO);
    assert_eq!(model.pixel_end(), Point::ZERO);
}

#[test]
fn evaluate_boundary_conditions() {
    let model = laid_out_model();
    assert_close(model.evaluate(0.0), model.pixel_start());
    assert_close(model.evaluate(1.0), model.pixel_end());
}

#[test]
fn evaluate_uses_the_curve_weight_pairing() {
    let model = laid_out_model();
    let t: f64 = 0.25;
    let (s, c, e) = (model.pixel_start(), model.pixel_seed(), model.pixel_end());
    let expected = Point::new(
        e.x * t * t + c.x * t * (1.0 - t) + s.x * (1.0 - t) * (1.0 - t),
        e.y * t * t + c.y * t * (1.0 - t) + s.y * (1.0 - t) * (1.0 - t),
    );
    assert_close(model.evaluate(t), expected);
}

#[test]
fn evaluate_out_of_range_or_empty_yields_origin() {
    let model = laid_out_model();
    assert_eq!(model.evaluate(-0.001), Point::ZERO);
    assert_eq!(model.evaluate(1.001), Point::ZERO);

    let empty = CurveModel::default();
    assert_eq!(empty.evaluate(0.5), Point::ZERO);
}

#[test]
fn all_origin_points_make_a_non_empty_viewport_model_empty() {
    let zeroed = ControlPoints {
        start: Point::ZERO,
        seed: Point::ZERO,
        end: Point::ZERO,
    };
    let model = CurveModel::new(zeroed, Viewport::new(100.0, 100.0), 10).unwrap();
    assert!(model.is_empty());
    assert_eq!(model.evaluate(0.5), Point::ZERO);
}

#[test]
fn linear_point_interpolates_the_chord() {
    let model = laid_out_model();
    assert_close(model.linear_point(0.0), model.pixel_start());
    assert_close(model.linear_point(1.0), model.pixel_end());
    assert_close(model.linear_point(0.5), Point::new(100.0, 45.0));
}

#[test]
fn seed_drag_converts_pixels_to_normalized() {
    let mut model = laid_out_model();
    model.set_seed_pixel(Point::new(50.0, 25.0));
    assert_close(model.points().seed, Point::new(0.25, 0.25));

    // Ignored while the viewport is empty.
    let mut empty = CurveModel::default();
    empty.set_seed_pixel(Point::new(50.0, 25.0));
    assert_eq!(empty.points().seed, ControlPoints::default().seed);
}

#[test]
fn sample_count_below_two_is_rejected() {
    let err = CurveModel::new(ControlPoints::default(), Viewport::new(1.0, 1.0), 1);
    assert!(err.is_err());
}
