//! Polar geometry for ring menus.
//!
//! Angles are in degrees, measured clockwise from 12 o'clock. Paths come out
//! as typed commands that format to SVG path data.

pub mod arc;
pub mod path;
pub mod point;
pub mod wedge;

pub use arc::{describe_arc, describe_arc_path, large_arc_flag};
pub use path::{ArcPath, PathCommand, Sweep};
pub use point::{Point, angle_of, normalize_angle, polar_to_cartesian};
pub use wedge::{GeometryError, Wedge};

pub const FULL_TURN: f64 = 360.0;
pub const HALF_TURN: f64 = 180.0;
