use crate::algorithm::{predicate_cross_impl, predicate_rect_impl};

/// Checks if every point of `Rhs` lies within the closed region of
/// `Self`. Unlike [`Contains`](crate::Contains), points of `Rhs` on the
/// boundary of `Self` are fine.
///
/// For multi geometries and collections, every non-empty child of the
/// right-hand side must be covered by some single non-empty child of
/// the left-hand side; coverage assembled jointly from several children
/// does not count.
///
/// # Examples
///
/// ```
/// use flatgeom::{Covers, Point, Polygon, Rect};
///
/// let square = Polygon::from(Rect::new(Point::new(0., 0.), Point::new(10., 10.)));
/// assert!(square.covers(&Point::new(5., 5.)));
/// assert!(square.covers(&Point::new(0., 5.))); // on the boundary
/// assert!(!square.covers(&Point::new(-1., 5.)));
/// ```
pub trait Covers<Rhs = Self> {
    fn covers(&self, rhs: &Rhs) -> bool;
}

predicate_cross_impl!(Covers, covers, crate::algorithm::dispatch::covers_shapes);
predicate_rect_impl!(Covers, covers);

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Geom, GeometryCollection, LineString, MultiPoint, Point, Polygon, Rect};

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::from(Rect::new(Point::new(x, y), Point::new(x + side, y + side)))
    }

    #[test]
    fn line_covers_points_and_lines() {
        let l = LineString::new(vec![Point::new(0., 0.), Point::new(4., 0.), Point::new(10., 0.)]);
        assert!(l.covers(&Point::new(7., 0.)));
        assert!(l.covers(&Point::new(0., 0.)));
        let sub = LineString::new(vec![Point::new(1., 0.), Point::new(9., 0.)]);
        assert!(l.covers(&sub));
        assert!(!sub.covers(&l));
    }

    #[test]
    fn poly_covers_line() {
        let sq = square(0., 0., 10.);
        let inside = LineString::new(vec![Point::new(1., 1.), Point::new(9., 9.)]);
        let escaping = LineString::new(vec![Point::new(1., 1.), Point::new(11., 9.)]);
        assert!(sq.covers(&inside));
        assert!(!sq.covers(&escaping));
        // running along the boundary is covered
        let edge = LineString::new(vec![Point::new(0., 0.), Point::new(10., 0.)]);
        assert!(sq.covers(&edge));
    }

    #[test]
    fn covers_self() {
        let sq = square(0., 0., 10.);
        assert!(sq.covers(&sq));
        let p = Point::new(3., 3.);
        assert!(p.covers(&p));
    }

    #[test]
    fn multipoint_rhs_needs_every_point() {
        let sq = square(0., 0., 10.);
        let inside = MultiPoint::new(vec![Point::new(1., 1.), Point::new(9., 9.)]);
        let split = MultiPoint::new(vec![Point::new(1., 1.), Point::new(11., 9.)]);
        assert!(sq.covers(&inside));
        assert!(!sq.covers(&split));
    }

    #[test]
    fn multi_lhs_needs_single_covering_child() {
        // two squares side by side cannot jointly cover a line that
        // spans them both
        let col = GeometryCollection::new(vec![
            Geom::from(square(0., 0., 1.)),
            Geom::from(square(1., 0., 1.)),
        ]);
        let spanning = LineString::new(vec![Point::new(0.5, 0.5), Point::new(1.5, 0.5)]);
        assert!(!col.covers(&spanning));
        let local = LineString::new(vec![Point::new(0.1, 0.5), Point::new(0.9, 0.5)]);
        assert!(col.covers(&local));
    }

    #[test]
    fn point_covers_degenerate() {
        let p = Point::new(2., 2.);
        let degenerate = LineString::new(vec![Point::new(2., 2.), Point::new(2., 2.)]);
        assert!(p.covers(&degenerate));
        let real = LineString::new(vec![Point::new(2., 2.), Point::new(3., 2.)]);
        assert!(!p.covers(&real));
    }
}
