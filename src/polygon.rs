//! Polygons: one exterior ring and zero or more hole rings.

use std::sync::Arc;

use crate::point::Point;
use crate::rect::Rect;
use crate::ring::Ring;
use crate::segment::Segment;

#[derive(Debug)]
pub(crate) struct PolygonData {
    pub(crate) exterior: Ring,
    pub(crate) holes: Box<[Ring]>,
}

/// A bounded area: an exterior [`Ring`] minus the interiors of its hole
/// rings.
///
/// The polygon's closure includes both the exterior boundary and every
/// hole boundary; `covers` style queries accept points on either, while
/// `contains` style queries accept neither.
///
/// ```
/// use flatgeom::{Point, Polygon, Ring};
///
/// let exterior = Ring::new(vec![
///     Point::new(0., 0.),
///     Point::new(10., 0.),
///     Point::new(10., 10.),
///     Point::new(0., 10.),
/// ]);
/// let hole = Ring::new(vec![
///     Point::new(4., 4.),
///     Point::new(6., 4.),
///     Point::new(6., 6.),
///     Point::new(4., 6.),
/// ]);
/// let poly = Polygon::new(exterior, vec![hole]);
/// assert!(poly.covers_point(Point::new(1., 1.)));
/// assert!(!poly.covers_point(Point::new(5., 5.)));
/// ```
#[derive(Clone, Debug)]
pub struct Polygon(pub(crate) Arc<PolygonData>);

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Polygon {
        Polygon(Arc::new(PolygonData {
            exterior,
            holes: holes.into_boxed_slice(),
        }))
    }

    pub fn exterior(&self) -> &Ring {
        &self.0.exterior
    }

    pub fn holes(&self) -> &[Ring] {
        &self.0.holes
    }

    pub fn num_holes(&self) -> usize {
        self.0.holes.len()
    }

    pub fn hole(&self, i: usize) -> Option<&Ring> {
        self.0.holes.get(i)
    }

    pub fn rect(&self) -> Rect {
        self.0.exterior.rect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.exterior.is_empty()
    }

    /// Exterior area minus the holes.
    pub fn area(&self) -> f64 {
        let mut area = self.0.exterior.area();
        for hole in self.0.holes.iter() {
            area -= hole.area();
        }
        area.max(0.0)
    }

    pub fn perimeter(&self) -> f64 {
        let mut p = self.0.exterior.perimeter();
        for hole in self.0.holes.iter() {
            p += hole.perimeter();
        }
        p
    }

    /// Point query against the polygon's closed region (boundaries
    /// included).
    pub fn covers_point(&self, p: Point) -> bool {
        self.point_hit(p, true)
    }

    /// Point query against the polygon's open interior.
    pub fn contains_point(&self, p: Point) -> bool {
        self.point_hit(p, false)
    }

    /// `allow_on_edge` picks between the closed region and the open
    /// interior. Holes flip the tolerance: a covered point may rest on a
    /// hole's boundary but not inside it, a contained point may do
    /// neither.
    pub(crate) fn point_hit(&self, p: Point, allow_on_edge: bool) -> bool {
        let e = self.0.exterior.contains_point(p, allow_on_edge);
        if !e.hit {
            return false;
        }
        if e.edge.is_none() {
            for hole in self.0.holes.iter() {
                if hole.contains_point(p, !allow_on_edge).hit {
                    return false;
                }
            }
        }
        true
    }

    /// True when the whole of `s` stays within the polygon's closed
    /// region (`allow_on_edge`) or open interior (`!allow_on_edge`).
    pub(crate) fn segment_inside(&self, s: Segment, allow_on_edge: bool) -> bool {
        if !self.0.exterior.contains_segment(s, allow_on_edge) {
            return false;
        }
        for hole in self.0.holes.iter() {
            if hole.intersects_segment(s, !allow_on_edge) {
                return false;
            }
        }
        true
    }

    /// True when `s` meets the polygon's closed region
    /// (`allow_on_edge`) or its open interior (`!allow_on_edge`).
    pub(crate) fn segment_hits(&self, s: Segment, allow_on_edge: bool) -> bool {
        if !self.0.exterior.intersects_segment(s, allow_on_edge) {
            return false;
        }
        for hole in self.0.holes.iter() {
            if hole.contains_segment(s, !allow_on_edge) {
                return false;
            }
        }
        true
    }

    /// Boundary-inclusive polygon-in-polygon containment.
    pub(crate) fn covers_poly(&self, other: &Polygon) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if !self.0.exterior.contains_ring(other.exterior(), true) {
            return false;
        }
        for hole in self.0.holes.iter() {
            if hole.intersects_ring(other.exterior(), false) {
                // the hole punches into the other polygon's exterior;
                // only one of the other's own holes can excuse that
                let swallowed = other
                    .holes()
                    .iter()
                    .any(|bh| bh.contains_ring(hole, true));
                if !swallowed {
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn intersects_poly(&self, other: &Polygon, allow_on_edge: bool) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        if !self
            .0
            .exterior
            .intersects_ring(other.exterior(), allow_on_edge)
        {
            return false;
        }
        for hole in self.0.holes.iter() {
            if hole.contains_ring(other.exterior(), !allow_on_edge) {
                return false;
            }
        }
        for hole in other.holes() {
            if hole.contains_ring(self.exterior(), !allow_on_edge) {
                return false;
            }
        }
        true
    }

    /// True when every point of `line` stays in the polygon's closure.
    pub(crate) fn covers_line(&self, line: &crate::LineString) -> bool {
        if self.is_empty() || line.is_empty() {
            return false;
        }
        if !self.rect().covers(&line.rect()) {
            return false;
        }
        line.segments().all(|s| self.segment_inside(s, true))
    }

    pub(crate) fn intersects_line(&self, line: &crate::LineString, allow_on_edge: bool) -> bool {
        if self.is_empty() || line.is_empty() {
            return false;
        }
        if !self.rect().intersects(&line.rect()) {
            return false;
        }
        line.segments().any(|s| self.segment_hits(s, allow_on_edge))
    }
}

impl From<Ring> for Polygon {
    fn from(ring: Ring) -> Polygon {
        Polygon::new(ring, Vec::new())
    }
}

impl From<Rect> for Ring {
    fn from(r: Rect) -> Ring {
        Ring::new(vec![
            r.min,
            Point::new(r.max.x, r.min.y),
            r.max,
            Point::new(r.min.x, r.max.y),
            r.min,
        ])
    }
}

impl From<Rect> for Polygon {
    fn from(r: Rect) -> Polygon {
        Polygon::from(Ring::from(r))
    }
}
