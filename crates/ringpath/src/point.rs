use crate::FULL_TURN;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Point at `radius` from `center`, `angle` degrees clockwise from straight up.
pub fn polar_to_cartesian(center: Point, radius: f64, angle: f64) -> Point {
    let theta = (angle - 90.0).to_radians();
    Point::new(
        center.x + radius * theta.cos(),
        center.y + radius * theta.sin(),
    )
}

/// Inverse of [`polar_to_cartesian`]: the clockwise-from-up angle of `point`
/// seen from `center`, in `[0, 360)`.
pub fn angle_of(center: Point, point: Point) -> f64 {
    let (dx, dy) = (point.x - center.x, point.y - center.y);
    normalize_angle(dy.atan2(dx).to_degrees() + 90.0)
}

/// Maps any angle into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}
