//! The derived predicates.
//!
//! Everything here is definitional: duals (`within`, `covered_by`),
//! negations (`disjoint`), conjunctions (`equals`), and the two
//! relations this library deliberately does not compute (`crosses`,
//! `overlaps`).

use crate::algorithm::dispatch::{self, AsShape};
use crate::geometry::Geom;
use crate::point::Point;

impl Geom {
    /// True when `self` and `other` share no point at all:
    /// `!self.intersects(other)`.
    pub fn disjoint(&self, other: &Geom) -> bool {
        !dispatch::intersects_shapes(&self.shape_ref(), &other.shape_ref())
    }

    /// The dual of [`Contains`](crate::Contains):
    /// `a.within(b) == b.contains(a)`.
    pub fn within(&self, other: &Geom) -> bool {
        dispatch::contains_shapes(&other.shape_ref(), &self.shape_ref())
    }

    /// The dual of [`Covers`](crate::Covers):
    /// `a.covered_by(b) == b.covers(a)`.
    pub fn covered_by(&self, other: &Geom) -> bool {
        dispatch::covers_shapes(&other.shape_ref(), &self.shape_ref())
    }

    /// True when the two geometries describe the same point set:
    /// each is within the other.
    pub fn equals(&self, other: &Geom) -> bool {
        dispatch::equals_shapes(&self.shape_ref(), &other.shape_ref())
    }

    /// Unsupported relation; always returns `false`.
    ///
    /// The `crosses` computation (dimension-reducing interior
    /// intersection) is not implemented by this library. The method
    /// exists so the predicate surface is complete, but no pair of
    /// geometries ever crosses according to it.
    pub fn crosses(&self, _other: &Geom) -> bool {
        false
    }

    /// Unsupported relation; always returns `false`. See
    /// [`crosses`](Geom::crosses).
    pub fn overlaps(&self, _other: &Geom) -> bool {
        false
    }

    /// Point-probe convenience: does this geometry intersect the point
    /// `(x, y)`?
    pub fn intersects_xy(&self, x: f64, y: f64) -> bool {
        dispatch::intersects_shapes(
            &self.shape_ref(),
            &dispatch::ShapeRef::Point(Point::new(x, y)),
        )
    }

    /// Point-probe convenience: does this geometry cover the point
    /// `(x, y)`?
    pub fn covers_xy(&self, x: f64, y: f64) -> bool {
        dispatch::covers_shapes(
            &self.shape_ref(),
            &dispatch::ShapeRef::Point(Point::new(x, y)),
        )
    }
}
