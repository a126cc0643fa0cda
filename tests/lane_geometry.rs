#![allow(clippy::unwrap_used)]

use approx::{assert_abs_diff_eq, assert_relative_eq};
use lanegeom::{
    Circle, Curve, DirectedCurve, FractionalFallback, LanegeomError, OperationError, Point2,
    RoundedBox, Shape,
};

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

/// A road center-line: straight, a left bend approximated by a polyline,
/// straight again.
fn center_line() -> Curve {
    let mut points = vec![Point2::new(-50.0, 0.0)];
    let radius = 40.0;
    for k in 0..=12 {
        let a = -std::f64::consts::FRAC_PI_2 + f64::from(k) * std::f64::consts::FRAC_PI_2 / 12.0;
        points.push(Point2::new(radius * a.cos(), radius + radius * a.sin()));
    }
    points.push(Point2::new(40.0, 90.0));
    Curve::new(points).unwrap()
}

#[test]
fn lane_boundaries_keep_their_distance() {
    init_tracing();
    let center = center_line();
    let left = center.offset_line(1.75).unwrap();
    let right = center.offset_line(-1.75).unwrap();

    for f in [0.05, 0.3, 0.5, 0.7, 0.95] {
        let p = center.location_fraction(f).unwrap().point;
        let on_left = left.closest_point(&p).unwrap();
        let on_right = right.closest_point(&p).unwrap();
        assert_abs_diff_eq!((on_left - p).norm(), 1.75, epsilon = 0.02);
        assert_abs_diff_eq!((on_right - p).norm(), 1.75, epsilon = 0.02);
    }
    // The inner boundary of a left bend is shorter.
    assert!(left.length() < center.length());
    assert!(right.length() > center.length());
}

#[test]
fn vehicle_position_round_trips_through_projection() {
    init_tracing();
    let lane = DirectedCurve::from_curve(center_line());
    for f in [0.1, 0.4, 0.6, 0.9] {
        let loc = lane.location_fraction(f).unwrap();
        let (sin, cos) = loc.direction.sin_cos();
        // Half a meter to the right of the center-line.
        let x = loc.x() + 0.5 * sin;
        let y = loc.y() - 0.5 * cos;
        let projected = lane
            .project_fractional(x, y, FractionalFallback::NaN)
            .unwrap();
        assert_abs_diff_eq!(projected, f, epsilon = 2e-3);
    }
}

#[test]
fn reversed_lane_projects_to_complementary_fraction() {
    init_tracing();
    let lane = DirectedCurve::from_curve(center_line());
    let reversed = lane.reverse();
    for (x, y) in [(-20.0, 1.0), (30.0, 15.0), (38.0, 70.0)] {
        let f = lane.project_fractional(x, y, FractionalFallback::NaN).unwrap();
        let g = reversed.project_fractional(x, y, FractionalFallback::NaN).unwrap();
        assert_relative_eq!(f + g, 1.0, epsilon = 1e-9);
    }
}

#[test]
fn curvature_of_the_bend() {
    init_tracing();
    let center = center_line();
    let r = center.projected_radius(0.5).unwrap();
    assert_relative_eq!(r, 40.0, max_relative = 0.01);
    // The straight approach has its first interior vertex at the bend start.
    let start = center.projected_radius(0.0).unwrap();
    assert!(start > 0.0);
}

#[test]
fn joined_lanes_and_endpoint_fallback() {
    init_tracing();
    let a = Curve::from_xy(&[(0.0, 0.0), (10.0, 0.0)]).unwrap();
    let b = Curve::from_xy(&[(10.0, 0.0), (20.0, 5.0)]).unwrap();
    let c = Curve::from_xy(&[(20.5, 5.0), (30.0, 5.0)]).unwrap();

    let err = Curve::concatenate(0.1, &[a.clone(), b.clone(), c.clone()]).unwrap_err();
    assert!(matches!(
        err,
        LanegeomError::Operation(OperationError::Discontinuity { index: 1, .. })
    ));

    let road = Curve::concatenate(1.0, &[a, b, c]).unwrap();
    assert_eq!(road.len(), 4);
    let beyond = road
        .project_fractional(None, None, 35.0, 5.0, FractionalFallback::Endpoint)
        .unwrap();
    assert!(beyond > 1.0);
    let nan = road
        .project_fractional(None, None, 35.0, 5.0, FractionalFallback::NaN)
        .unwrap();
    assert!(nan.is_nan());
}

#[test]
fn widening_lane_with_varying_offset() {
    init_tracing();
    let center = Curve::from_xy(&[(0.0, 0.0), (50.0, 0.0), (100.0, 0.0)]).unwrap();
    let edge = center
        .offset_line_varying(&[0.0, 0.4, 0.6, 1.0], &[1.75, 1.75, 3.5, 3.5])
        .unwrap();
    assert_abs_diff_eq!(edge.first().y, 1.75, epsilon = 1e-9);
    assert_abs_diff_eq!(edge.last().y, 3.5, epsilon = 1e-9);
    let mid = edge.location_fraction(0.5).unwrap();
    assert!(mid.y() > 1.75 && mid.y() < 3.5, "{mid:?}");
}

#[test]
fn footprints_around_a_lane_point() {
    init_tracing();
    let car = RoundedBox::new(4.5, 2.0, 0.5).unwrap();
    let pedestrian = Circle::new(0.4).unwrap();
    assert!(car.contains(&Point2::new(2.0, 0.0)));
    assert!(!car.contains(&Point2::new(2.25, 0.9)));
    let front = Point2::new(2.25, 0.0);
    assert!(!car.contains(&front));
    assert!(car.covers(&front));
    assert!(car.intersects(&pedestrian));
    assert_abs_diff_eq!(car.extent().width(), 4.5, epsilon = 1e-9);
    assert_abs_diff_eq!(pedestrian.signed_distance(&Point2::new(1.0, 0.0)), 0.6);
}
