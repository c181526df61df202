use float_next_after::NextAfter;

use crate::point::{eq_zero, feq, Point};
use crate::rect::Rect;

/// A line segment between two [`Point`]s.
///
/// Segments are the unit every ring and line decomposes into; all of the
/// crate's boolean predicates bottom out in the segment operations here.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

/// Where a point sits relative to a segment for the purposes of a
/// horizontal +x raycast.
///
/// `In` means the ray pierces the segment and toggles crossing parity.
/// `On` means the point lies on the segment itself. `Out` contributes
/// nothing: the point is above, below, or to the right of the segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RaySide {
    Out,
    In,
    On,
}

/// Result of [`Segment::intersection`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentIntersection {
    /// The segments meet at a single point.
    Point(Point),
    /// The segments are collinear and share a subsegment, given in
    /// parameter order along the first segment. The two points are equal
    /// when the overlap collapses to a single shared point.
    Overlap(Point, Point),
}

impl Segment {
    pub fn new<P: Into<Point>>(a: P, b: P) -> Segment {
        Segment {
            a: a.into(),
            b: b.into(),
        }
    }

    /// The segment's bounding rectangle, with the endpoints reordered
    /// component-wise so `min <= max` holds.
    pub fn rect(&self) -> Rect {
        Rect {
            min: Point::new(self.a.x.min(self.b.x), self.a.y.min(self.b.y)),
            max: Point::new(self.a.x.max(self.b.x), self.a.y.max(self.b.y)),
        }
    }

    /// True when `p` lies on this segment.
    pub fn covers_point(&self, p: Point) -> bool {
        collinear(self.a, self.b, p) && self.rect().covers_point(p)
    }

    /// Boolean segment intersection. Touching endpoints count.
    pub fn intersects(&self, other: &Segment) -> bool {
        if !self.rect().intersects(&other.rect()) {
            return false;
        }
        let (a, b) = (self.a, self.b);
        let (c, d) = (other.a, other.b);
        if a.coincident(c) || a.coincident(d) || b.coincident(c) || b.coincident(d) {
            return true;
        }
        let r = b - a;
        let s = d - c;
        let denom = r.cross(s);
        let qp = c - a;
        if eq_zero(denom) {
            // Parallel. Only a collinear overlap intersects, and that is
            // exactly when one of the four endpoints lies on the other
            // segment.
            return self.covers_point(c)
                || self.covers_point(d)
                || other.covers_point(a)
                || other.covers_point(b);
        }
        let t = qp.cross(s) / denom;
        let u = qp.cross(r) / denom;
        (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
    }

    /// Computes the intersection of two segments, if any.
    ///
    /// ```
    /// use flatgeom::{Point, Segment, SegmentIntersection};
    ///
    /// let a = Segment::new((0., 0.), (10., 10.));
    /// let b = Segment::new((0., 10.), (10., 0.));
    /// assert_eq!(
    ///     a.intersection(&b),
    ///     Some(SegmentIntersection::Point(Point::new(5., 5.)))
    /// );
    /// ```
    pub fn intersection(&self, other: &Segment) -> Option<SegmentIntersection> {
        if !self.rect().intersects(&other.rect()) {
            return None;
        }
        let (a, b) = (self.a, self.b);
        let (c, d) = (other.a, other.b);
        let r = b - a;
        let s = d - c;
        let denom = r.cross(s);
        if !eq_zero(denom) {
            let qp = c - a;
            let t = qp.cross(s) / denom;
            let u = qp.cross(r) / denom;
            if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
                return Some(SegmentIntersection::Point(a + r * t));
            }
            return None;
        }
        // Parallel or degenerate.
        if eq_zero(r.cross(c - a)) && eq_zero(r.cross(d - a)) {
            let rr = r.x * r.x + r.y * r.y;
            if eq_zero(rr) {
                // This segment is a single point.
                if other.covers_point(a) {
                    return Some(SegmentIntersection::Point(a));
                }
                return None;
            }
            let t0 = ((c - a).x * r.x + (c - a).y * r.y) / rr;
            let t1 = ((d - a).x * r.x + (d - a).y * r.y) / rr;
            let (lo, hi) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
            if hi < 0.0 || lo > 1.0 {
                return None;
            }
            let lo = lo.max(0.0);
            let hi = hi.min(1.0);
            let p0 = a + r * lo;
            let p1 = a + r * hi;
            if p0.coincident(p1) {
                return Some(SegmentIntersection::Point(p0));
            }
            return Some(SegmentIntersection::Overlap(p0, p1));
        }
        None
    }

    /// Classifies `p` for a horizontal ray pointed at +∞.
    ///
    /// When `p.y` lands exactly on an endpoint's y, the point is nudged
    /// one ULP upward before classification, so a vertex shared by two
    /// edges toggles parity exactly once.
    pub(crate) fn raycast(&self, p: Point) -> RaySide {
        let rect = self.rect();
        if p.y < rect.min.y || p.y > rect.max.y {
            return RaySide::Out;
        }
        if p.x < rect.min.x {
            if p.y != rect.min.y && p.y != rect.max.y {
                return RaySide::In;
            }
        } else if p.x > rect.max.x {
            return RaySide::Out;
        }
        // Order the segment bottom-to-top.
        let (a, b) = if self.a.y <= self.b.y {
            (self.a, self.b)
        } else {
            (self.b, self.a)
        };
        if p.coincident(a) || p.coincident(b) {
            return RaySide::On;
        }
        if feq(a.y, b.y) {
            if feq(a.x, b.x) {
                // Degenerate single-point segment, and p is elsewhere.
                return RaySide::Out;
            }
            if p.x < rect.min.x {
                return RaySide::Out;
            }
            // Horizontal segment with p at the same height, inside its
            // x-range.
            return RaySide::On;
        }
        if self.covers_point(p) {
            return RaySide::On;
        }
        let mut p = p;
        if feq(p.y, a.y) || feq(p.y, b.y) {
            p.y = p.y.next_after(f64::INFINITY);
        }
        if p.y < a.y || p.y > b.y {
            return RaySide::Out;
        }
        // Which side of the upward edge a->b does p fall on? Left means
        // the ray pierces.
        if (b - a).cross(p - a) > 0.0 {
            RaySide::In
        } else {
            RaySide::Out
        }
    }
}

impl From<(Point, Point)> for Segment {
    fn from(ab: (Point, Point)) -> Segment {
        Segment { a: ab.0, b: ab.1 }
    }
}

/// One-ULP push away from zero, used to repair products that lost a bit
/// to rounding before they are compared.
#[inline]
fn ulp_away_from_zero(x: f64) -> f64 {
    if x < 0.0 {
        x.next_after(f64::NEG_INFINITY)
    } else {
        x.next_after(f64::INFINITY)
    }
}

/// True when `a`, `b` and `c` lie on one line.
///
/// The cross product `(c-a) x (b-a)` is evaluated as two products whose
/// residuals are back-computed; a product that rounded gets nudged one
/// ULP before the final comparison. Axis-aligned and coincident-point
/// cases short-circuit ahead of any arithmetic.
pub(crate) fn collinear(a: Point, b: Point, c: Point) -> bool {
    let x1x2 = feq(a.x, b.x);
    let x1x3 = feq(a.x, c.x);
    let x2x3 = feq(b.x, c.x);
    let y1y2 = feq(a.y, b.y);
    let y1y3 = feq(a.y, c.y);
    let y2y3 = feq(b.y, c.y);
    if x1x2 && x1x3 {
        return true;
    }
    if y1y2 && y1y3 {
        return true;
    }
    if (x1x2 && y1y2) || (x1x3 && y1y3) || (x2x3 && y2y3) {
        return true;
    }
    let cx1 = c.x - a.x;
    let cy1 = c.y - a.y;
    let cx2 = b.x - a.x;
    let cy2 = b.y - a.y;
    let mut s1 = cx1 * cy2;
    let mut s2 = cy1 * cx2;
    if s1 / cy2 - cx1 != 0.0 {
        s1 = ulp_away_from_zero(s1);
    }
    if s2 / cx2 - cy1 != 0.0 {
        s2 = ulp_away_from_zero(s2);
    }
    eq_zero(s1 - s2)
}

#[cfg(test)]
mod test {
    use super::*;

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new((ax, ay), (bx, by))
    }

    #[test]
    fn collinear_basic() {
        let a = Point::new(0., 0.);
        let b = Point::new(5., 5.);
        let c = Point::new(10., 10.);
        assert!(collinear(a, b, c));
        assert!(!collinear(a, b, Point::new(10., 10.1)));
        // shared axis shortcut
        assert!(collinear(a, Point::new(0., 4.), Point::new(0., 9.)));
        assert!(collinear(a, Point::new(4., 0.), Point::new(9., 0.)));
        // coincident pair
        assert!(collinear(a, a, Point::new(7., 3.)));
    }

    #[test]
    fn crossing_segments() {
        let a = seg(0., 0., 10., 10.);
        let b = seg(0., 10., 10., 0.);
        assert!(a.intersects(&b));
        assert_eq!(
            a.intersection(&b),
            Some(SegmentIntersection::Point(Point::new(5., 5.)))
        );
    }

    #[test]
    fn shared_endpoint_intersects() {
        let a = seg(0., 0., 5., 5.);
        let b = seg(5., 5., 9., 0.);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn parallel_disjoint() {
        let a = seg(0., 0., 10., 0.);
        let b = seg(0., 1., 10., 1.);
        assert!(!a.intersects(&b));
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn collinear_overlap() {
        let a = seg(0., 0., 10., 0.);
        let b = seg(5., 0., 15., 0.);
        assert!(a.intersects(&b));
        assert_eq!(
            a.intersection(&b),
            Some(SegmentIntersection::Overlap(
                Point::new(5., 0.),
                Point::new(10., 0.)
            ))
        );
        // touching end to end collapses to a point
        let c = seg(10., 0., 20., 0.);
        assert_eq!(
            a.intersection(&c),
            Some(SegmentIntersection::Point(Point::new(10., 0.)))
        );
    }

    #[test]
    fn covers_point() {
        let s = seg(0., 0., 10., 10.);
        assert!(s.covers_point(Point::new(5., 5.)));
        assert!(s.covers_point(Point::new(0., 0.)));
        assert!(!s.covers_point(Point::new(11., 11.)));
        assert!(!s.covers_point(Point::new(5., 5.1)));
    }

    #[test]
    fn raycast_classes() {
        let s = seg(0., 0., 0., 10.);
        // strictly left, strictly inside the y-span
        assert_eq!(s.raycast(Point::new(-5., 5.)), RaySide::In);
        // to the right
        assert_eq!(s.raycast(Point::new(5., 5.)), RaySide::Out);
        // on the segment
        assert_eq!(s.raycast(Point::new(0., 5.)), RaySide::On);
        // above and below
        assert_eq!(s.raycast(Point::new(-5., 11.)), RaySide::Out);
        assert_eq!(s.raycast(Point::new(-5., -1.)), RaySide::Out);
    }

    #[test]
    fn raycast_endpoint_nudge() {
        // A vertex shared by two edges must toggle parity exactly once:
        // the bottom endpoint counts, the top endpoint does not.
        let lower = seg(0., 0., 0., 5.);
        let upper = seg(0., 5., 0., 10.);
        let p = Point::new(-1., 5.);
        let hits = [lower.raycast(p), upper.raycast(p)]
            .iter()
            .filter(|&&r| r == RaySide::In)
            .count();
        assert_eq!(hits, 1);
    }

    #[test]
    fn raycast_horizontal() {
        let s = seg(0., 5., 10., 5.);
        assert_eq!(s.raycast(Point::new(5., 5.)), RaySide::On);
        assert_eq!(s.raycast(Point::new(-1., 5.)), RaySide::Out);
        assert_eq!(s.raycast(Point::new(5., 6.)), RaySide::Out);
    }

    #[test]
    fn raycast_degenerate() {
        let s = seg(3., 3., 3., 3.);
        assert_eq!(s.raycast(Point::new(3., 3.)), RaySide::On);
        assert_eq!(s.raycast(Point::new(2., 3.)), RaySide::Out);
    }
}
