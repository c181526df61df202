use crate::algorithm::{predicate_cross_impl, predicate_rect_impl};

/// Checks if `Rhs` lies within `Self` with the two interiors actually
/// meeting. The practical difference from [`Covers`](crate::Covers) is
/// at the boundary: a point on a polygon's edge is covered but not
/// contained.
///
/// # Examples
///
/// ```
/// use flatgeom::{Contains, Covers, Point, Polygon, Rect};
///
/// let square = Polygon::from(Rect::new(Point::new(0., 0.), Point::new(10., 10.)));
/// assert!(square.contains(&Point::new(5., 5.)));
/// assert!(!square.contains(&Point::new(0., 5.))); // boundary: covered only
/// assert!(square.covers(&Point::new(0., 5.)));
/// ```
pub trait Contains<Rhs = Self> {
    fn contains(&self, rhs: &Rhs) -> bool;
}

predicate_cross_impl!(Contains, contains, crate::algorithm::dispatch::contains_shapes);
predicate_rect_impl!(Contains, contains);
