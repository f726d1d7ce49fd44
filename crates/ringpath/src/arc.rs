//! SVG arc outlines and annular wedges.
//!
//! A two-point arc command cannot express a full circle, so callers must keep
//! `|end - start|` below 360 degrees and radii non-negative. Violations are
//! programming errors and panic; use [`crate::Wedge::new`] to validate values
//! that come from configuration.

use crate::path::{ArcPath, PathCommand, Sweep};
use crate::point::{Point, normalize_angle, polar_to_cartesian};
use crate::{FULL_TURN, HALF_TURN};

/// Whether the arc from `start` to `end` takes the major arc.
///
/// Evaluated on the raw angles, before normalization.
pub fn large_arc_flag(start: f64, end: f64) -> bool {
    (end - start).abs() > HALF_TURN
}

fn assert_span(start: f64, end: f64) {
    assert!(
        (end - start).abs() < FULL_TURN,
        "arc from {start} to {end} spans a full turn or more"
    );
}

/// Closed annular sector between `inner` and `outer`.
///
/// Outer arc clockwise from `start` to `end`, straight in to the inner
/// radius, inner arc back counter-clockwise to `start`, close.
pub fn describe_arc_path(
    center: Point,
    inner: f64,
    outer: f64,
    start: f64,
    end: f64,
) -> ArcPath {
    assert!(
        inner >= 0.0 && inner <= outer,
        "invalid wedge radii: inner {inner}, outer {outer}"
    );
    assert_span(start, end);

    let (norm_start, norm_end) = (normalize_angle(start), normalize_angle(end));

    let outer_start = polar_to_cartesian(center, outer, norm_start);
    let outer_end = polar_to_cartesian(center, outer, norm_end);
    let inner_end = polar_to_cartesian(center, inner, norm_end);
    let inner_start = polar_to_cartesian(center, inner, norm_start);

    let large_arc = large_arc_flag(start, end);

    ArcPath::from(vec![
        PathCommand::MoveTo(outer_start),
        PathCommand::ArcTo {
            radius: outer,
            x_rotation: 0.0,
            large_arc,
            sweep: Sweep::Clockwise,
            to: outer_end,
        },
        PathCommand::LineTo(inner_end),
        PathCommand::ArcTo {
            radius: inner,
            x_rotation: 0.0,
            large_arc,
            sweep: Sweep::CounterClockwise,
            to: inner_start,
        },
        PathCommand::Close,
    ])
}

/// Open arc outline at `radius`.
///
/// Traced from the `end` point back to the `start` point, counter-clockwise:
/// the opposite winding of [`describe_arc_path`].
pub fn describe_arc(center: Point, radius: f64, start: f64, end: f64) -> ArcPath {
    assert!(radius >= 0.0, "invalid arc radius {radius}");
    assert_span(start, end);

    let from = polar_to_cartesian(center, radius, normalize_angle(end));
    let to = polar_to_cartesian(center, radius, normalize_angle(start));

    ArcPath::from(vec![
        PathCommand::MoveTo(from),
        PathCommand::ArcTo {
            radius,
            x_rotation: 0.0,
            large_arc: large_arc_flag(start, end),
            sweep: Sweep::CounterClockwise,
            to,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: Point = Point { x: 400.0, y: 400.0 };

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_large_arc_flag_threshold() {
        assert!(!large_arc_flag(332.0, 388.0));
        assert!(!large_arc_flag(0.0, 180.0));
        assert!(large_arc_flag(0.0, 180.5));
        assert!(large_arc_flag(10.0, 210.0));
        assert!(large_arc_flag(210.0, 10.0));
    }

    #[test]
    fn test_wedge_outer_endpoints_wrap_past_north() {
        let path = describe_arc_path(CENTER, 220.0, 300.0, 332.0, 388.0);
        let commands = path.commands();

        assert!(close(
            commands[0].end_point().unwrap(),
            polar_to_cartesian(CENTER, 300.0, 332.0)
        ));
        assert!(close(
            commands[1].end_point().unwrap(),
            polar_to_cartesian(CENTER, 300.0, 28.0)
        ));
        assert!(close(
            commands[2].end_point().unwrap(),
            polar_to_cartesian(CENTER, 220.0, 28.0)
        ));
        assert!(close(
            commands[3].end_point().unwrap(),
            polar_to_cartesian(CENTER, 220.0, 332.0)
        ));
        assert_eq!(path.large_arc(), Some(false));
    }

    #[test]
    fn test_wedge_command_order_and_sweeps() {
        let path = describe_arc_path(CENTER, 220.0, 300.0, 32.0, 88.0);
        match path.commands() {
            [
                PathCommand::MoveTo(_),
                PathCommand::ArcTo {
                    radius: outer,
                    sweep: Sweep::Clockwise,
                    ..
                },
                PathCommand::LineTo(_),
                PathCommand::ArcTo {
                    radius: inner,
                    sweep: Sweep::CounterClockwise,
                    ..
                },
                PathCommand::Close,
            ] => {
                assert_eq!(*outer, 300.0);
                assert_eq!(*inner, 220.0);
            }
            other => panic!("unexpected command layout: {other:?}"),
        }
    }

    #[test]
    fn test_wedge_closes_back_to_start() {
        // The close segment runs from the inner start straight out to the
        // outer start, which must sit on the same ray.
        for (start, end) in [(332.0, 388.0), (92.0, 148.0), (-45.0, 200.0)] {
            let path = describe_arc_path(CENTER, 100.0, 150.0, start, end);
            assert!(path.is_closed());
            let first = path.first_point().unwrap();
            let last = path.current_point().unwrap();
            assert!(close(first, polar_to_cartesian(CENTER, 150.0, start)));
            assert!(close(last, polar_to_cartesian(CENTER, 100.0, start)));
            assert!((crate::angle_of(CENTER, first) - crate::angle_of(CENTER, last)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_major_wedge_sets_large_arc() {
        let path = describe_arc_path(CENTER, 10.0, 20.0, 0.0, 200.0);
        assert_eq!(path.large_arc(), Some(true));
    }

    #[test]
    fn test_zero_span_degenerates() {
        let path = describe_arc_path(CENTER, 220.0, 300.0, 90.0, 90.0);
        let commands = path.commands();
        assert!(close(
            commands[0].end_point().unwrap(),
            commands[1].end_point().unwrap()
        ));
    }

    #[test]
    fn test_wedge_path_data() {
        let path = describe_arc_path(Point::new(0.0, 0.0), 1.0, 2.0, 90.0, 180.0);
        let data = path.to_string();
        assert!(data.starts_with("M 2 0 A 2 2 0 0 1 "), "{data}");
        assert!(data.contains(" A 1 1 0 0 0 1 0 Z"), "{data}");
    }

    #[test]
    fn test_open_arc_runs_end_to_start() {
        let path = describe_arc(CENTER, 300.0, 32.0, 88.0);
        assert!(!path.is_closed());
        assert!(close(
            path.first_point().unwrap(),
            polar_to_cartesian(CENTER, 300.0, 88.0)
        ));
        assert!(close(
            path.current_point().unwrap(),
            polar_to_cartesian(CENTER, 300.0, 32.0)
        ));
        assert!(matches!(
            path.commands()[1],
            PathCommand::ArcTo {
                sweep: Sweep::CounterClockwise,
                large_arc: false,
                ..
            }
        ));
    }

    #[test]
    #[should_panic(expected = "full turn")]
    fn test_full_circle_rejected() {
        describe_arc_path(CENTER, 220.0, 300.0, 0.0, 360.0);
    }

    #[test]
    #[should_panic(expected = "invalid wedge radii")]
    fn test_negative_radius_rejected() {
        describe_arc_path(CENTER, -1.0, 300.0, 0.0, 56.0);
    }
}
