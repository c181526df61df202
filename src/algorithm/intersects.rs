use crate::algorithm::{predicate_cross_impl, predicate_rect_impl};

/// Checks if the geometry `Self` intersects the geometry `Rhs`: the two
/// closed point sets have at least one point in common. Boundary
/// contact counts.
///
/// This predicate is symmetric: `a.intersects(&b)` iff
/// `b.intersects(&a)`. Empty geometries intersect nothing, themselves
/// included.
///
/// # Examples
///
/// ```
/// use flatgeom::{Intersects, Point, Polygon, Rect};
///
/// let square = Polygon::from(Rect::new(Point::new(0., 0.), Point::new(10., 10.)));
/// assert!(square.intersects(&Point::new(5., 5.)));
/// assert!(square.intersects(&Point::new(0., 5.))); // boundary counts
/// assert!(!square.intersects(&Point::new(15., 5.)));
/// ```
pub trait Intersects<Rhs = Self> {
    fn intersects(&self, rhs: &Rhs) -> bool;
}

predicate_cross_impl!(Intersects, intersects, crate::algorithm::dispatch::intersects_shapes);
predicate_rect_impl!(Intersects, intersects);

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Geom, LineString, MultiPolygon, Point, Polygon, Rect, Ring};

    fn square(x: f64, y: f64, side: f64) -> Polygon {
        Polygon::from(Rect::new(Point::new(x, y), Point::new(x + side, y + side)))
    }

    #[test]
    fn point_point() {
        let p = Point::new(1., 2.);
        assert!(p.intersects(&p));
        assert!(!p.intersects(&Point::new(1., 2.1)));
    }

    #[test]
    fn line_line() {
        let a = LineString::new(vec![Point::new(3., 2.), Point::new(7., 6.)]);
        let b = LineString::new(vec![Point::new(3., 4.), Point::new(8., 4.)]);
        let c = LineString::new(vec![Point::new(9., 2.), Point::new(11., 5.)]);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn empty_intersects_nothing() {
        let empty = LineString::new(vec![]);
        let sq = square(0., 0., 10.);
        assert!(!empty.intersects(&sq));
        assert!(!sq.intersects(&empty));
        assert!(!empty.intersects(&empty));
    }

    #[test]
    fn symmetric_across_types() {
        let sq = square(0., 0., 10.);
        let line = LineString::new(vec![Point::new(-5., 5.), Point::new(15., 5.)]);
        assert!(sq.intersects(&line));
        assert!(line.intersects(&sq));
    }

    #[test]
    fn multipolygon_between_the_parts() {
        let mp = MultiPolygon::new(vec![square(0., 0., 1.), square(2., 0., 1.)]);
        let g = Geom::from(mp);
        // the gap between the two squares
        assert!(!g.intersects(&Point::new(1.5, 0.5)));
        assert!(g.intersects(&Point::new(0.5, 0.5)));
        assert!(g.intersects(&Point::new(2.5, 0.5)));
    }

    #[test]
    fn rect_operand() {
        let r = Rect::new(Point::new(0., 0.), Point::new(4., 4.));
        assert!(Intersects::intersects(&r, &Point::new(2., 2.)));
        assert!(Point::new(2., 2.).intersects(&r));
        assert!(r.intersects(&Rect::new(Point::new(4., 4.), Point::new(8., 8.))));
    }

    #[test]
    fn collection_child_intersects_collection() {
        let sq = square(0., 0., 10.);
        let child = Geom::from(sq.clone());
        let col = Geom::from(crate::GeometryCollection::new(vec![
            child.clone(),
            Geom::from(Point::new(20., 20.)),
        ]));
        assert!(col.intersects(&child));
        assert!(child.intersects(&col));
        // a concave ring wrapped as polygon still dispatches through
        // the same engine
        let ell = Polygon::from(Ring::new(vec![
            Point::new(0., 0.),
            Point::new(10., 0.),
            Point::new(10., 5.),
            Point::new(5., 5.),
            Point::new(5., 10.),
            Point::new(0., 10.),
        ]));
        assert!(col.intersects(&ell));
    }
}
