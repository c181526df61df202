//! The predicate engine.
//!
//! Every public predicate trait funnels into the functions here. Shapes
//! are viewed through [`ShapeRef`], a borrowed, empties-normalized view
//! of any geometry; the engine lifts the base point/line/polygon
//! predicates over the multi containers with the appropriate
//! quantifiers.
//!
//! Two tolerance regimes thread through everything as `allow_on_edge`:
//! the closed regime (boundaries count, giving `intersects`/`covers`)
//! and the open regime (interiors only, used to refine `contains`,
//! `touches` and `equals`).

use crate::geometry::{Geom, Geometry};
use crate::line_string::LineString;
use crate::multi::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::rect::Rect;

/// A borrowed view of any geometry, with empties collapsed into one
/// variant so every predicate gets its "empty yields false" behavior in
/// a single place.
#[derive(Clone, Copy)]
pub(crate) enum ShapeRef<'a> {
    Empty,
    Point(Point),
    Line(&'a LineString),
    Poly(&'a Polygon),
    MultiPoint(&'a MultiPoint),
    MultiLine(&'a MultiLineString),
    MultiPoly(&'a MultiPolygon),
    Collection(&'a GeometryCollection),
}

pub(crate) trait AsShape {
    fn shape_ref(&self) -> ShapeRef<'_>;
}

impl AsShape for Point {
    fn shape_ref(&self) -> ShapeRef<'_> {
        ShapeRef::Point(*self)
    }
}

impl AsShape for LineString {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            ShapeRef::Line(self)
        }
    }
}

impl AsShape for Polygon {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            ShapeRef::Poly(self)
        }
    }
}

impl AsShape for MultiPoint {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            ShapeRef::MultiPoint(self)
        }
    }
}

impl AsShape for MultiLineString {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            ShapeRef::MultiLine(self)
        }
    }
}

impl AsShape for MultiPolygon {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            ShapeRef::MultiPoly(self)
        }
    }
}

impl AsShape for GeometryCollection {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            ShapeRef::Collection(self)
        }
    }
}

impl AsShape for Geometry {
    fn shape_ref(&self) -> ShapeRef<'_> {
        match self {
            Geometry::Point(p) => p.shape_ref(),
            Geometry::LineString(l) => l.shape_ref(),
            Geometry::Polygon(p) => p.shape_ref(),
            Geometry::MultiPoint(m) => m.shape_ref(),
            Geometry::MultiLineString(m) => m.shape_ref(),
            Geometry::MultiPolygon(m) => m.shape_ref(),
            Geometry::GeometryCollection(c) => c.shape_ref(),
        }
    }
}

impl AsShape for Geom {
    fn shape_ref(&self) -> ShapeRef<'_> {
        if self.is_empty() {
            ShapeRef::Empty
        } else {
            self.shape().shape_ref()
        }
    }
}

impl<'a> ShapeRef<'a> {
    fn rect(&self) -> Option<Rect> {
        match self {
            ShapeRef::Empty => None,
            ShapeRef::Point(p) => Some(p.rect()),
            ShapeRef::Line(l) => Some(l.rect()),
            ShapeRef::Poly(p) => Some(p.rect()),
            ShapeRef::MultiPoint(m) => Some(m.rect()),
            ShapeRef::MultiLine(m) => Some(m.rect()),
            ShapeRef::MultiPoly(m) => Some(m.rect()),
            ShapeRef::Collection(c) => Some(c.rect()),
        }
    }

    fn is_multi(&self) -> bool {
        matches!(
            self,
            ShapeRef::MultiPoint(_)
                | ShapeRef::MultiLine(_)
                | ShapeRef::MultiPoly(_)
                | ShapeRef::Collection(_)
        )
    }

    /// Does any child accepted by the rect filter satisfy `f`? Runs
    /// through the multi index when there is one. Must only be called on
    /// multi variants.
    fn any_child(&self, qrect: Option<&Rect>, f: &mut dyn FnMut(&ShapeRef<'a>) -> bool) -> bool {
        let mut hit = false;
        let mut per_child = |shape: ShapeRef<'a>| -> bool {
            if let (Some(q), Some(r)) = (qrect, shape.rect()) {
                if !r.intersects(q) {
                    return true;
                }
            }
            if f(&shape) {
                hit = true;
                return false;
            }
            true
        };
        match self {
            ShapeRef::MultiPoint(m) => {
                let q = qrect.copied().unwrap_or(m.rect());
                m.0.search(&q, &mut |i| per_child(ShapeRef::Point(m.0.children[i])));
            }
            ShapeRef::MultiLine(m) => {
                let q = qrect.copied().unwrap_or(m.rect());
                m.0.search(&q, &mut |i| per_child(m.0.children[i].shape_ref()));
            }
            ShapeRef::MultiPoly(m) => {
                let q = qrect.copied().unwrap_or(m.rect());
                m.0.search(&q, &mut |i| per_child(m.0.children[i].shape_ref()));
            }
            ShapeRef::Collection(c) => {
                let q = qrect.copied().unwrap_or(c.rect());
                c.0.search(&q, &mut |i| per_child(c.0.children[i].shape_ref()));
            }
            _ => unreachable!("any_child on a base shape"),
        }
        hit
    }

    /// Does every non-empty child satisfy `f`? Empty children are
    /// transparent. Must only be called on multi variants.
    fn all_children(&self, f: &mut dyn FnMut(&ShapeRef<'a>) -> bool) -> bool {
        let mut ok = true;
        let mut per_child = |shape: ShapeRef<'a>| -> bool {
            if matches!(shape, ShapeRef::Empty) {
                return true;
            }
            if !f(&shape) {
                ok = false;
                return false;
            }
            true
        };
        match self {
            ShapeRef::MultiPoint(m) => {
                for p in m.0.children.iter() {
                    if !per_child(ShapeRef::Point(*p)) {
                        break;
                    }
                }
            }
            ShapeRef::MultiLine(m) => {
                for l in m.0.children.iter() {
                    if !per_child(l.shape_ref()) {
                        break;
                    }
                }
            }
            ShapeRef::MultiPoly(m) => {
                for p in m.0.children.iter() {
                    if !per_child(p.shape_ref()) {
                        break;
                    }
                }
            }
            ShapeRef::Collection(c) => {
                for g in c.0.children.iter() {
                    if !per_child(g.shape_ref()) {
                        break;
                    }
                }
            }
            _ => unreachable!("all_children on a base shape"),
        }
        ok
    }
}

/// `intersects` under a tolerance regime: `allow_on_edge` compares the
/// closed regions, `!allow_on_edge` compares the interiors.
pub(crate) fn intersects(a: &ShapeRef, b: &ShapeRef, allow_on_edge: bool) -> bool {
    if matches!(a, ShapeRef::Empty) || matches!(b, ShapeRef::Empty) {
        return false;
    }
    if a.is_multi() {
        return a.any_child(b.rect().as_ref(), &mut |c| intersects(c, b, allow_on_edge));
    }
    if b.is_multi() {
        return intersects(b, a, allow_on_edge);
    }
    match (*a, *b) {
        (ShapeRef::Point(p), ShapeRef::Point(q)) => p.coincident(q),
        (ShapeRef::Point(p), ShapeRef::Line(l)) => point_on_line(p, l, allow_on_edge),
        (ShapeRef::Line(l), ShapeRef::Point(p)) => point_on_line(p, l, allow_on_edge),
        (ShapeRef::Point(p), ShapeRef::Poly(pl)) => pl.point_hit(p, allow_on_edge),
        (ShapeRef::Poly(pl), ShapeRef::Point(p)) => pl.point_hit(p, allow_on_edge),
        (ShapeRef::Line(la), ShapeRef::Line(lb)) => la.intersects_line(lb, allow_on_edge),
        (ShapeRef::Line(l), ShapeRef::Poly(p)) => p.intersects_line(l, allow_on_edge),
        (ShapeRef::Poly(p), ShapeRef::Line(l)) => p.intersects_line(l, allow_on_edge),
        (ShapeRef::Poly(pa), ShapeRef::Poly(pb)) => pa.intersects_poly(pb, allow_on_edge),
        // empties and multis were handled above
        _ => false,
    }
}

fn point_on_line(p: Point, l: &LineString, allow_on_edge: bool) -> bool {
    if allow_on_edge {
        l.covers_point(p)
    } else {
        l.contains_point(p)
    }
}

/// Closed-region `intersects`: the public predicate.
pub(crate) fn intersects_shapes(a: &ShapeRef, b: &ShapeRef) -> bool {
    intersects(a, b, true)
}

/// Boundary-inclusive containment.
pub(crate) fn covers_shapes(a: &ShapeRef, b: &ShapeRef) -> bool {
    if matches!(a, ShapeRef::Empty) || matches!(b, ShapeRef::Empty) {
        return false;
    }
    // every non-empty child of the right side must be covered
    if b.is_multi() {
        return b.all_children(&mut |c| covers_shapes(a, c));
    }
    // some child of the left side must cover the whole right side
    if a.is_multi() {
        return a.any_child(b.rect().as_ref(), &mut |c| covers_shapes(c, b));
    }
    match (*a, *b) {
        (ShapeRef::Point(p), ShapeRef::Point(q)) => p.coincident(q),
        (ShapeRef::Point(p), ShapeRef::Line(l)) => degenerate_at(l.rect(), p),
        (ShapeRef::Point(p), ShapeRef::Poly(pl)) => degenerate_at(pl.rect(), p),
        (ShapeRef::Line(l), ShapeRef::Point(p)) => l.covers_point(p),
        (ShapeRef::Line(la), ShapeRef::Line(lb)) => la.covers_line(lb),
        (ShapeRef::Line(l), ShapeRef::Poly(p)) => line_covers_poly(l, p),
        (ShapeRef::Poly(pl), ShapeRef::Point(p)) => pl.covers_point(p),
        (ShapeRef::Poly(p), ShapeRef::Line(l)) => p.covers_line(l),
        (ShapeRef::Poly(pa), ShapeRef::Poly(pb)) => pa.covers_poly(pb),
        // empties and multis were handled above
        _ => false,
    }
}

/// A point covers a line/polygon only when the whole thing has
/// degenerated onto that point.
fn degenerate_at(r: Rect, p: Point) -> bool {
    r.min.coincident(p) && r.max.coincident(p)
}

/// A line covers a polygon only when the polygon is a zero-area sliver
/// running along the line.
fn line_covers_poly(l: &LineString, p: &Polygon) -> bool {
    if !l.rect().covers(&p.rect()) {
        return false;
    }
    let ext = &p.exterior().0;
    (0..ext.nsegs).all(|i| l.covers_segment(ext.segment_at(i)))
}

/// Boundary-exclusive containment: covered, and the interiors actually
/// meet.
pub(crate) fn contains_shapes(a: &ShapeRef, b: &ShapeRef) -> bool {
    if matches!(a, ShapeRef::Empty) || matches!(b, ShapeRef::Empty) {
        return false;
    }
    if b.is_multi() {
        return b.all_children(&mut |c| contains_shapes(a, c));
    }
    if a.is_multi() {
        return a.any_child(b.rect().as_ref(), &mut |c| contains_shapes(c, b));
    }
    covers_shapes(a, b) && intersects(a, b, false)
}

/// Boundaries meet, interiors do not.
pub(crate) fn touches_shapes(a: &ShapeRef, b: &ShapeRef) -> bool {
    if matches!(a, ShapeRef::Empty) || matches!(b, ShapeRef::Empty) {
        return false;
    }
    if a.is_multi() {
        return a.any_child(b.rect().as_ref(), &mut |c| touches_shapes(c, b));
    }
    if b.is_multi() {
        return touches_shapes(b, a);
    }
    intersects(a, b, true) && !intersects(a, b, false)
}

pub(crate) fn equals_shapes(a: &ShapeRef, b: &ShapeRef) -> bool {
    contains_shapes(a, b) && contains_shapes(b, a)
}
