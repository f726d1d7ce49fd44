use crate::arc::{describe_arc, describe_arc_path};
use crate::path::ArcPath;
use crate::point::{Point, angle_of, normalize_angle, polar_to_cartesian};
use crate::FULL_TURN;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("radius must be non-negative, got {0}")]
    NegativeRadius(f64),
    #[error("inner radius {inner} exceeds outer radius {outer}")]
    InvertedRadii { inner: f64, outer: f64 },
    #[error("a span of {0} degrees cannot be drawn as a single wedge")]
    FullTurn(f64),
    #[error("geometry inputs must be finite")]
    NonFinite,
}

/// An annular sector: the band between two radii over an angular range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    center: Point,
    inner: f64,
    outer: f64,
    start: f64,
    end: f64,
}

impl Wedge {
    pub fn new(
        center: Point,
        inner: f64,
        outer: f64,
        start: f64,
        end: f64,
    ) -> Result<Self, GeometryError> {
        if ![center.x, center.y, inner, outer, start, end]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(GeometryError::NonFinite);
        }
        if inner < 0.0 {
            return Err(GeometryError::NegativeRadius(inner));
        }
        if inner > outer {
            return Err(GeometryError::InvertedRadii { inner, outer });
        }
        let span = (end - start).abs();
        if span >= FULL_TURN {
            return Err(GeometryError::FullTurn(span));
        }
        Ok(Self {
            center,
            inner,
            outer,
            start,
            end,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn mid_radius(&self) -> f64 {
        (self.inner + self.outer) / 2.0
    }

    /// Where a label centered on the wedge goes.
    pub fn label_anchor(&self) -> Point {
        polar_to_cartesian(self.center, self.mid_radius(), self.mid_angle())
    }

    pub fn path(&self) -> ArcPath {
        describe_arc_path(self.center, self.inner, self.outer, self.start, self.end)
    }

    /// Open arc following the wedge at `offset` beyond its outer edge.
    pub fn guide(&self, offset: f64) -> ArcPath {
        describe_arc(self.center, self.outer + offset, self.start, self.end)
    }

    pub fn contains_angle(&self, angle: f64) -> bool {
        let (lo, span) = if self.end >= self.start {
            (self.start, self.end - self.start)
        } else {
            (self.end, self.start - self.end)
        };
        normalize_angle(angle - lo) <= span
    }

    pub fn contains_point(&self, point: Point) -> bool {
        let dist = self.center.distance(point);
        dist >= self.inner && dist <= self.outer && self.contains_angle(angle_of(self.center, point))
    }
}
