/// Determine whether geometry `A` is entirely within geometry `B`,
/// boundary points excluded from the comparison.
pub mod contains;
/// Determine whether geometry `A` is entirely within geometry `B`,
/// boundary points included.
pub mod covers;
pub(crate) mod dispatch;
/// Determine whether geometry `A` has any point in common with
/// geometry `B`.
pub mod intersects;
/// Yield a ring's or line's segments in order of caller-defined
/// distance.
pub mod nearest;
/// The derived predicates: `disjoint`, `within`, `covered_by`,
/// `equals`, and friends.
pub mod relate;
/// Determine whether geometry `A` touches geometry `B` without their
/// interiors meeting.
pub mod touches;

// The predicate traits are symmetric in shape: every trait is
// implemented for the full cross product of geometry types by
// delegating to one engine function over borrowed shape views. The two
// macros below stamp those impls out; `Rect` gets its own set because it
// has to materialize a transient polygon first.
macro_rules! predicate_cross_impl {
    ($trait_:ident, $method:ident, $engine:path) => {
        crate::algorithm::predicate_cross_impl!(@lhs $trait_, $method, $engine;
            crate::Point, crate::LineString, crate::Polygon, crate::MultiPoint,
            crate::MultiLineString, crate::MultiPolygon, crate::GeometryCollection,
            crate::Geometry, crate::Geom);
    };
    (@lhs $trait_:ident, $method:ident, $engine:path; $($lhs:ty),*) => {
        $(
            crate::algorithm::predicate_cross_impl!(@rhs $trait_, $method, $engine, $lhs;
                crate::Point, crate::LineString, crate::Polygon, crate::MultiPoint,
                crate::MultiLineString, crate::MultiPolygon, crate::GeometryCollection,
                crate::Geometry, crate::Geom);
        )*
    };
    (@rhs $trait_:ident, $method:ident, $engine:path, $lhs:ty; $($rhs:ty),*) => {
        $(
            impl $trait_<$rhs> for $lhs {
                fn $method(&self, rhs: &$rhs) -> bool {
                    $engine(
                        &crate::algorithm::dispatch::AsShape::shape_ref(self),
                        &crate::algorithm::dispatch::AsShape::shape_ref(rhs),
                    )
                }
            }
        )*
    };
}

macro_rules! predicate_rect_impl {
    ($trait_:ident, $method:ident) => {
        crate::algorithm::predicate_rect_impl!(@each $trait_, $method;
            crate::Point, crate::LineString, crate::Polygon, crate::MultiPoint,
            crate::MultiLineString, crate::MultiPolygon, crate::GeometryCollection,
            crate::Geometry, crate::Geom);
    };
    (@each $trait_:ident, $method:ident; $($t:ty),*) => {
        $(
            impl $trait_<crate::Rect> for $t {
                fn $method(&self, rhs: &crate::Rect) -> bool {
                    self.$method(&crate::Polygon::from(*rhs))
                }
            }

            impl $trait_<$t> for crate::Rect {
                fn $method(&self, rhs: &$t) -> bool {
                    crate::Polygon::from(*self).$method(rhs)
                }
            }
        )*

        impl $trait_ for crate::Rect {
            fn $method(&self, rhs: &crate::Rect) -> bool {
                crate::Polygon::from(*self).$method(&crate::Polygon::from(*rhs))
            }
        }
    };
}

pub(crate) use predicate_cross_impl;
pub(crate) use predicate_rect_impl;
