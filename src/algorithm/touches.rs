use crate::algorithm::{predicate_cross_impl, predicate_rect_impl};

/// Checks if `Self` and `Rhs` have boundary contact but no shared
/// interior points: adjacent parcels, a road ending on a boundary, a
/// point sitting exactly on an edge.
///
/// Implemented as the conjunction of a closed-region intersection test
/// and a negated interior intersection test. For multi geometries the
/// predicate holds when any child touches the other side.
///
/// # Examples
///
/// ```
/// use flatgeom::{Point, Polygon, Rect, Touches};
///
/// let a = Polygon::from(Rect::new(Point::new(0., 0.), Point::new(1., 1.)));
/// let b = Polygon::from(Rect::new(Point::new(1., 0.), Point::new(2., 1.)));
/// assert!(a.touches(&b)); // shared edge, disjoint interiors
/// assert!(!a.touches(&a)); // identical interiors overlap
/// ```
pub trait Touches<Rhs = Self> {
    fn touches(&self, rhs: &Rhs) -> bool;
}

predicate_cross_impl!(Touches, touches, crate::algorithm::dispatch::touches_shapes);
predicate_rect_impl!(Touches, touches);

#[cfg(test)]
mod test {
    use super::*;
    use crate::{LineString, Point, Polygon, Rect};

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::from(Rect::new(Point::new(x, y), Point::new(x + side, y + side)))
    }

    #[test]
    fn edge_adjacent_squares() {
        let a = square(0., 0., 10.);
        let b = square(10., 0., 10.);
        assert!(a.touches(&b));
        assert!(b.touches(&a));
    }

    #[test]
    fn corner_adjacent_squares() {
        let a = square(0., 0., 10.);
        let b = square(10., 10., 5.);
        assert!(a.touches(&b));
    }

    #[test]
    fn overlapping_squares_do_not_touch() {
        let a = square(0., 0., 10.);
        let b = square(5., 5., 10.);
        assert!(!a.touches(&b));
        assert!(!a.touches(&a));
    }

    #[test]
    fn disjoint_squares_do_not_touch() {
        let a = square(0., 0., 10.);
        let b = square(20., 0., 5.);
        assert!(!a.touches(&b));
    }

    #[test]
    fn point_on_edge_touches() {
        let sq = square(0., 0., 10.);
        assert!(sq.touches(&Point::new(0., 5.)));
        assert!(sq.touches(&Point::new(0., 0.)));
        assert!(!sq.touches(&Point::new(5., 5.)));
        assert!(!sq.touches(&Point::new(15., 5.)));
    }

    #[test]
    fn line_ending_on_boundary_touches() {
        let sq = square(0., 0., 10.);
        let probe = LineString::new(vec![Point::new(-5., 5.), Point::new(0., 5.)]);
        assert!(sq.touches(&probe));
        let piercing = LineString::new(vec![Point::new(-5., 5.), Point::new(5., 5.)]);
        assert!(!sq.touches(&piercing));
    }

    #[test]
    fn equal_points_do_not_touch() {
        let p = Point::new(1., 1.);
        assert!(!p.touches(&p));
        assert!(!p.touches(&Point::new(2., 2.)));
    }

    #[test]
    fn lines_tip_to_tip() {
        let a = LineString::new(vec![Point::new(0., 0.), Point::new(5., 5.)]);
        let b = LineString::new(vec![Point::new(5., 5.), Point::new(10., 0.)]);
        let crossing = LineString::new(vec![Point::new(0., 5.), Point::new(5., 0.)]);
        assert!(a.touches(&b));
        assert!(!a.touches(&crossing));
    }
}
