#![warn(missing_debug_implementations)]
//! Planar geometry with construction-time spatial indexing.
//!
//! `flatgeom` provides the OGC vector geometry types ([`Point`],
//! [`LineString`], [`Polygon`], their `Multi*` counterparts and
//! [`GeometryCollection`]) together with fast, robust boolean
//! predicates over them: [`Intersects`], [`Covers`], [`Contains`],
//! [`Touches`], and the derived `disjoint`/`within`/`covered_by`/
//! `equals` family on [`Geom`].
//!
//! # Indexing
//!
//! Every ring and line builds its acceleration structure while its
//! points are scanned at construction: a flat bottom-up tree of
//! bounding rectangles (the *natural index*), or segment buckets
//! striped by y-coordinate for highly concave rings. Multi geometries
//! with many children index them along a Hilbert curve. None of this is
//! visible in the API beyond [`IndexStyle`]; queries simply get faster.
//!
//! ```
//! use flatgeom::{Intersects, Point, Polygon, Ring};
//!
//! let diamond = Polygon::from(Ring::new(vec![
//!     Point::new(0., 5.),
//!     Point::new(5., 0.),
//!     Point::new(10., 5.),
//!     Point::new(5., 10.),
//! ]));
//! assert!(diamond.intersects(&Point::new(5., 5.)));
//! assert!(!diamond.intersects(&Point::new(1., 1.)));
//! ```
//!
//! # Geometries are cheap to share
//!
//! Everything larger than a point is reference counted internally:
//! `clone` is O(1), polygons share their rings, multi geometries share
//! their children. Geometries are immutable once built and safe to read
//! from multiple threads.
//!
//! # I/O
//!
//! The [`wkt`] and [`wkb`] modules read and write Well-Known Text and
//! Well-Known Binary (plus hex-WKB), including `Z`/`M`/`ZM` coordinates
//! and `EMPTY` geometries.

pub mod algorithm;
pub mod env;
mod geometry;
mod index;
mod line_string;
mod multi;
mod point;
mod polygon;
mod rect;
mod ring;
mod segment;
pub mod wkb;
pub mod wkt;

pub use crate::algorithm::contains::Contains;
pub use crate::algorithm::covers::Covers;
pub use crate::algorithm::intersects::Intersects;
pub use crate::algorithm::touches::Touches;
pub use crate::geometry::{Geom, Geometry, GeometryType, WrongGeometryType};
pub use crate::index::IndexStyle;
pub use crate::line_string::LineString;
pub use crate::multi::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
pub use crate::point::Point;
pub use crate::polygon::Polygon;
pub use crate::rect::Rect;
pub use crate::ring::{PointLocation, Ring};
pub use crate::segment::{Segment, SegmentIntersection};
