use crate::point::Point;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sweep {
    /// Increasing angle; clockwise on a y-down canvas. SVG sweep flag `1`.
    Clockwise,
    CounterClockwise,
}

impl Sweep {
    fn flag(self) -> u8 {
        match self {
            Self::Clockwise => 1,
            Self::CounterClockwise => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    ArcTo {
        radius: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: Sweep,
        to: Point,
    },
    Close,
}

impl PathCommand {
    /// Where the pen ends up after this command, if it names a point.
    pub fn end_point(&self) -> Option<Point> {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) => Some(*p),
            Self::ArcTo { to, .. } => Some(*to),
            Self::Close => None,
        }
    }
}

/// Negative zero prints as `-0`; path data wants `0`.
struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 + 0.0)
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoveTo(p) => write!(f, "M {} {}", Num(p.x), Num(p.y)),
            Self::LineTo(p) => write!(f, "L {} {}", Num(p.x), Num(p.y)),
            Self::ArcTo {
                radius,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => write!(
                f,
                "A {r} {r} {} {} {} {} {}",
                Num(*x_rotation),
                u8::from(*large_arc),
                sweep.flag(),
                Num(to.x),
                Num(to.y),
                r = Num(*radius),
            ),
            Self::Close => f.write_str("Z"),
        }
    }
}

/// A sequence of path commands, printed as SVG path data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArcPath(Vec<PathCommand>);

impl ArcPath {
    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }

    pub fn first_point(&self) -> Option<Point> {
        self.0.first().and_then(PathCommand::end_point)
    }

    /// Last explicit point, ignoring a trailing close.
    pub fn current_point(&self) -> Option<Point> {
        self.0.iter().rev().find_map(PathCommand::end_point)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.0.last(), Some(PathCommand::Close))
    }

    pub fn large_arc(&self) -> Option<bool> {
        self.0.iter().find_map(|c| match c {
            PathCommand::ArcTo { large_arc, .. } => Some(*large_arc),
            _ => None,
        })
    }
}

impl From<Vec<PathCommand>> for ArcPath {
    fn from(commands: Vec<PathCommand>) -> Self {
        Self(commands)
    }
}

impl fmt::Display for ArcPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}
