//! The geometry union and its attribute-carrying wrapper.

use std::convert::TryFrom;
use std::fmt;
use std::sync::Arc;

use crate::line_string::LineString;
use crate::multi::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::rect::Rect;

/// An enum representing any possible geometry type.
///
/// The base geometries (`Point`, `LineString`, `Polygon`) carry the
/// actual coordinate data; the multi variants own clones of their
/// children plus the multi index built at construction. Cloning any
/// variant is cheap: everything bigger than a point is reference
/// counted.
#[derive(Clone, Debug)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    MultiPoint(MultiPoint),
    MultiLineString(MultiLineString),
    MultiPolygon(MultiPolygon),
    GeometryCollection(GeometryCollection),
}

/// The seven OGC geometry kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub fn name(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a [`Geom`] is unwrapped into the wrong concrete type,
/// e.g. `LineString::try_from` on a polygon geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrongGeometryType {
    pub wanted: GeometryType,
    pub found: GeometryType,
}

impl std::error::Error for WrongGeometryType {}

impl fmt::Display for WrongGeometryType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "wanted a {} geometry, found a {}", self.wanted, self.found)
    }
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::LineString(l) => l.is_empty(),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPoint(m) => m.is_empty(),
            Geometry::MultiLineString(m) => m.is_empty(),
            Geometry::MultiPolygon(m) => m.is_empty(),
            Geometry::GeometryCollection(c) => c.is_empty(),
        }
    }

    pub fn rect(&self) -> Option<Rect> {
        match self {
            Geometry::Point(p) => Some(p.rect()),
            Geometry::LineString(l) => (!l.is_empty()).then(|| l.rect()),
            Geometry::Polygon(p) => (!p.is_empty()).then(|| p.rect()),
            Geometry::MultiPoint(m) => (!m.is_empty()).then(|| m.rect()),
            Geometry::MultiLineString(m) => (!m.is_empty()).then(|| m.rect()),
            Geometry::MultiPolygon(m) => (!m.is_empty()).then(|| m.rect()),
            Geometry::GeometryCollection(c) => (!c.is_empty()).then(|| c.rect()),
        }
    }
}

const FLAG_EMPTY: u8 = 1 << 0;
const FLAG_FEATURE: u8 = 1 << 1;
const FLAG_FEATURE_COL: u8 = 1 << 2;

/// Extra per-geometry payload: Z/M coordinate sequences and verbatim
/// foreign JSON. Kept out of line so the common XY-only case pays one
/// pointer.
#[derive(Debug)]
struct Extra {
    has_z: bool,
    has_m: bool,
    /// The extra dimension values for every point, in point order: `z`
    /// (or `m`) per point, or interleaved `z, m` pairs when both are
    /// present.
    coords: Box<[f64]>,
    json: Option<Box<str>>,
}

/// A [`Geometry`] plus the attributes that ride along with it: optional
/// Z/M coordinates, optional foreign JSON (feature properties), and
/// emptiness for kinds that cannot express it structurally (`POINT
/// EMPTY`).
///
/// `Geom` is the type the parsers produce and the predicates consume.
/// Cloning is always O(1).
///
/// ```
/// use flatgeom::{Geom, Point};
///
/// let g = Geom::point_z(Point::new(1., 2.), 3.);
/// assert!(g.has_z());
/// assert_eq!(g.z(), Some(3.));
/// assert_eq!(g.dims(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Geom {
    shape: Geometry,
    flags: u8,
    extra: Option<Arc<Extra>>,
}

impl Geom {
    pub fn new(shape: impl Into<Geometry>) -> Geom {
        Geom {
            shape: shape.into(),
            flags: 0,
            extra: None,
        }
    }

    fn with_extra(shape: Geometry, has_z: bool, has_m: bool, coords: Vec<f64>) -> Geom {
        Geom {
            shape,
            flags: 0,
            extra: Some(Arc::new(Extra {
                has_z,
                has_m,
                coords: coords.into_boxed_slice(),
                json: None,
            })),
        }
    }

    /// Attaches one extra coordinate per point as Z values.
    pub fn new_z(shape: impl Into<Geometry>, coords: Vec<f64>) -> Geom {
        Geom::with_extra(shape.into(), true, false, coords)
    }

    /// Attaches one extra coordinate per point as M values.
    pub fn new_m(shape: impl Into<Geometry>, coords: Vec<f64>) -> Geom {
        Geom::with_extra(shape.into(), false, true, coords)
    }

    /// Attaches interleaved `z, m` pairs, one per point.
    pub fn new_zm(shape: impl Into<Geometry>, coords: Vec<f64>) -> Geom {
        Geom::with_extra(shape.into(), true, true, coords)
    }

    pub fn point_z(p: Point, z: f64) -> Geom {
        Geom::new_z(p, vec![z])
    }

    pub fn point_m(p: Point, m: f64) -> Geom {
        Geom::new_m(p, vec![m])
    }

    pub fn point_zm(p: Point, z: f64, m: f64) -> Geom {
        Geom::new_zm(p, vec![z, m])
    }

    /// An empty geometry of the given kind (`POINT EMPTY` and friends).
    pub fn empty(kind: GeometryType) -> Geom {
        let shape = match kind {
            GeometryType::Point => Geometry::Point(Point::default()),
            GeometryType::LineString => Geometry::LineString(LineString::new(Vec::new())),
            GeometryType::Polygon => {
                Geometry::Polygon(Polygon::new(crate::Ring::new(Vec::new()), Vec::new()))
            }
            GeometryType::MultiPoint => Geometry::MultiPoint(MultiPoint::new(Vec::new())),
            GeometryType::MultiLineString => {
                Geometry::MultiLineString(MultiLineString::new(Vec::new()))
            }
            GeometryType::MultiPolygon => Geometry::MultiPolygon(MultiPolygon::new(Vec::new())),
            GeometryType::GeometryCollection => {
                Geometry::GeometryCollection(GeometryCollection::new(Vec::new()))
            }
        };
        Geom {
            shape,
            flags: FLAG_EMPTY,
            extra: None,
        }
    }

    /// Marks this geometry as a feature, optionally attaching the
    /// feature's foreign JSON members (id, properties) verbatim.
    pub fn into_feature(mut self, json: Option<String>) -> Geom {
        self.flags |= FLAG_FEATURE;
        if let Some(json) = json {
            self = self.with_extra_json(json);
        }
        self
    }

    pub fn into_feature_collection(mut self) -> Geom {
        self.flags |= FLAG_FEATURE_COL;
        self
    }

    /// Attaches a verbatim JSON string (feature `id`/`properties` or any
    /// other foreign members a codec wants preserved).
    pub fn with_extra_json(mut self, json: String) -> Geom {
        let (has_z, has_m, coords) = match &self.extra {
            Some(e) => (e.has_z, e.has_m, e.coords.to_vec()),
            None => (false, false, Vec::new()),
        };
        self.extra = Some(Arc::new(Extra {
            has_z,
            has_m,
            coords: coords.into_boxed_slice(),
            json: Some(json.into_boxed_str()),
        }));
        self
    }

    pub fn shape(&self) -> &Geometry {
        &self.shape
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.shape.geometry_type()
    }

    pub fn is_empty(&self) -> bool {
        self.flags & FLAG_EMPTY != 0 || self.shape.is_empty()
    }

    pub fn rect(&self) -> Option<Rect> {
        if self.flags & FLAG_EMPTY != 0 {
            return None;
        }
        self.shape.rect()
    }

    /// Coordinate dimensionality: 2, 3 (`Z` or `M`), or 4 (`ZM`).
    pub fn dims(&self) -> usize {
        2 + usize::from(self.has_z()) + usize::from(self.has_m())
    }

    pub fn has_z(&self) -> bool {
        self.extra.as_ref().is_some_and(|e| e.has_z)
    }

    pub fn has_m(&self) -> bool {
        self.extra.as_ref().is_some_and(|e| e.has_m)
    }

    /// The Z value of a point geometry, when present.
    pub fn z(&self) -> Option<f64> {
        let e = self.extra.as_ref()?;
        if !e.has_z {
            return None;
        }
        e.coords.first().copied()
    }

    /// The M value of a point geometry, when present.
    pub fn m(&self) -> Option<f64> {
        let e = self.extra.as_ref()?;
        if !e.has_m {
            return None;
        }
        e.coords.get(usize::from(e.has_z)).copied()
    }

    /// The raw extra-dimension coordinate sequence.
    pub fn extra_coords(&self) -> Option<&[f64]> {
        self.extra.as_ref().map(|e| &*e.coords)
    }

    pub fn extra_json(&self) -> Option<&str> {
        self.extra.as_ref().and_then(|e| e.json.as_deref())
    }

    pub fn is_feature(&self) -> bool {
        self.flags & FLAG_FEATURE != 0
    }

    pub fn is_feature_collection(&self) -> bool {
        self.flags & FLAG_FEATURE_COL != 0
    }

    /// Number of points in a `MultiPoint`, otherwise 0.
    pub fn num_points(&self) -> usize {
        match &self.shape {
            Geometry::MultiPoint(m) => m.len(),
            _ => 0,
        }
    }

    pub fn point_at(&self, i: usize) -> Option<Point> {
        match &self.shape {
            Geometry::MultiPoint(m) => m.get(i).copied(),
            _ => None,
        }
    }

    /// Number of lines in a `MultiLineString`, otherwise 0.
    pub fn num_lines(&self) -> usize {
        match &self.shape {
            Geometry::MultiLineString(m) => m.len(),
            _ => 0,
        }
    }

    pub fn line_at(&self, i: usize) -> Option<&LineString> {
        match &self.shape {
            Geometry::MultiLineString(m) => m.get(i),
            _ => None,
        }
    }

    /// Number of polygons in a `MultiPolygon`, otherwise 0.
    pub fn num_polys(&self) -> usize {
        match &self.shape {
            Geometry::MultiPolygon(m) => m.len(),
            _ => 0,
        }
    }

    pub fn poly_at(&self, i: usize) -> Option<&Polygon> {
        match &self.shape {
            Geometry::MultiPolygon(m) => m.get(i),
            _ => None,
        }
    }

    /// Number of children in a `GeometryCollection`, otherwise 0.
    pub fn num_geometries(&self) -> usize {
        match &self.shape {
            Geometry::GeometryCollection(c) => c.len(),
            _ => 0,
        }
    }

    pub fn geometry_at(&self, i: usize) -> Option<&Geom> {
        match &self.shape {
            Geometry::GeometryCollection(c) => c.get(i),
            _ => None,
        }
    }
}

impl From<Geometry> for Geom {
    fn from(shape: Geometry) -> Geom {
        Geom::new(shape)
    }
}

macro_rules! geometry_from_impl {
    ($($variant:ident, $ty:ty),*) => {
        $(
            impl From<$ty> for Geometry {
                fn from(g: $ty) -> Geometry {
                    Geometry::$variant(g)
                }
            }

            impl From<$ty> for Geom {
                fn from(g: $ty) -> Geom {
                    Geom::new(Geometry::$variant(g))
                }
            }

            impl TryFrom<Geom> for $ty {
                type Error = WrongGeometryType;

                fn try_from(geom: Geom) -> Result<$ty, WrongGeometryType> {
                    match geom.shape {
                        Geometry::$variant(g) => Ok(g),
                        other => Err(WrongGeometryType {
                            wanted: GeometryType::$variant,
                            found: other.geometry_type(),
                        }),
                    }
                }
            }
        )*
    };
}

geometry_from_impl!(
    Point, Point,
    LineString, LineString,
    Polygon, Polygon,
    MultiPoint, MultiPoint,
    MultiLineString, MultiLineString,
    MultiPolygon, MultiPolygon,
    GeometryCollection, GeometryCollection
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn zm_accessors() {
        let p = Point::new(1., 2.);
        let g = Geom::new(p);
        assert_eq!(g.dims(), 2);
        assert_eq!(g.z(), None);
        let g = Geom::point_z(p, 3.);
        assert_eq!((g.dims(), g.z(), g.m()), (3, Some(3.), None));
        let g = Geom::point_m(p, 4.);
        assert_eq!((g.dims(), g.z(), g.m()), (3, None, Some(4.)));
        let g = Geom::point_zm(p, 3., 4.);
        assert_eq!((g.dims(), g.z(), g.m()), (4, Some(3.), Some(4.)));
    }

    #[test]
    fn empties() {
        let g = Geom::empty(GeometryType::Point);
        assert!(g.is_empty());
        assert_eq!(g.rect(), None);
        assert_eq!(g.geometry_type(), GeometryType::Point);
        assert!(Geom::empty(GeometryType::MultiPolygon).is_empty());
        assert!(!Geom::new(Point::new(0., 0.)).is_empty());
    }

    #[test]
    fn multi_accessors() {
        let squares = vec![
            Polygon::from(Rect::new(Point::new(0., 0.), Point::new(1., 1.))),
            Polygon::from(Rect::new(Point::new(2., 0.), Point::new(3., 1.))),
        ];
        let g = Geom::from(MultiPolygon::new(squares));
        assert_eq!(g.num_polys(), 2);
        assert!(g.poly_at(1).is_some());
        assert!(g.poly_at(2).is_none());
        assert_eq!(g.num_points(), 0);
        assert_eq!(g.num_lines(), 0);
        assert_eq!(g.num_geometries(), 0);
    }

    #[test]
    fn downcasts() {
        let g = Geom::from(Point::new(1.0, 2.0));
        assert_eq!(Point::try_from(g), Ok(Point::new(1.0, 2.0)));

        let square = Polygon::from(Rect::new(Point::new(0., 0.), Point::new(1., 1.)));
        let failure = Point::try_from(Geom::from(square)).unwrap_err();
        assert_eq!(
            failure,
            WrongGeometryType {
                wanted: GeometryType::Point,
                found: GeometryType::Polygon,
            }
        );
        assert_eq!(
            failure.to_string(),
            "wanted a Point geometry, found a Polygon"
        );
    }

    #[test]
    fn feature_flags() {
        let g = Geom::new(Point::new(0., 0.))
            .into_feature(Some(r#"{"id":7}"#.to_string()));
        assert!(g.is_feature());
        assert!(!g.is_feature_collection());
        assert_eq!(g.extra_json(), Some(r#"{"id":7}"#));
    }
}
