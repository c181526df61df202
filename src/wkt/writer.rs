use std::fmt::Write;

use crate::geometry::{Geom, Geometry};
use crate::point::Point;
use crate::polygon::Polygon;

/// Writes a geometry as WKT. The multi-point form uses inner
/// parentheses, numbers print in their shortest round-trippable form,
/// and Z/M values are replayed from the geometry's extra coordinates in
/// point order.
pub fn write(geom: &Geom) -> String {
    let mut out = String::new();
    write_geom(geom, &mut out);
    out
}

/// Walks extra-dimension values alongside the XY points.
struct ExtraCursor<'a> {
    coords: &'a [f64],
    per_point: usize,
    at: usize,
}

impl<'a> ExtraCursor<'a> {
    fn new(geom: &'a Geom) -> ExtraCursor<'a> {
        ExtraCursor {
            coords: geom.extra_coords().unwrap_or(&[]),
            per_point: usize::from(geom.has_z()) + usize::from(geom.has_m()),
            at: 0,
        }
    }

    fn next(&mut self) -> &'a [f64] {
        let start = self.at.min(self.coords.len());
        let end = (start + self.per_point).min(self.coords.len());
        self.at = end;
        &self.coords[start..end]
    }
}

fn modifier(geom: &Geom) -> &'static str {
    match (geom.has_z(), geom.has_m()) {
        (true, true) => " ZM",
        (true, false) => " Z",
        (false, true) => " M",
        (false, false) => "",
    }
}

fn write_geom(geom: &Geom, out: &mut String) {
    let tag = match geom.shape() {
        Geometry::Point(_) => "POINT",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
    };
    out.push_str(tag);
    out.push_str(modifier(geom));
    if geom.is_empty() {
        out.push_str(" EMPTY");
        return;
    }
    out.push(' ');
    let mut cursor = ExtraCursor::new(geom);
    match geom.shape() {
        Geometry::Point(p) => {
            out.push('(');
            write_coord(*p, &mut cursor, out);
            out.push(')');
        }
        Geometry::LineString(l) => write_coord_seq(l.points(), &mut cursor, out),
        Geometry::Polygon(p) => write_polygon(p, &mut cursor, out),
        Geometry::MultiPoint(m) => {
            out.push('(');
            for (i, p) in m.children().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push('(');
                write_coord(*p, &mut cursor, out);
                out.push(')');
            }
            out.push(')');
        }
        Geometry::MultiLineString(m) => {
            out.push('(');
            for (i, l) in m.children().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_coord_seq(l.points(), &mut cursor, out);
            }
            out.push(')');
        }
        Geometry::MultiPolygon(m) => {
            out.push('(');
            for (i, p) in m.children().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_polygon(p, &mut cursor, out);
            }
            out.push(')');
        }
        Geometry::GeometryCollection(c) => {
            out.push('(');
            for (i, child) in c.children().iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_geom(child, out);
            }
            out.push(')');
        }
    }
}

fn write_polygon(p: &Polygon, cursor: &mut ExtraCursor, out: &mut String) {
    out.push('(');
    write_coord_seq(p.exterior().points(), cursor, out);
    for hole in p.holes() {
        out.push_str(", ");
        write_coord_seq(hole.points(), cursor, out);
    }
    out.push(')');
}

fn write_coord_seq(points: &[Point], cursor: &mut ExtraCursor, out: &mut String) {
    out.push('(');
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_coord(*p, cursor, out);
    }
    out.push(')');
}

fn write_coord(p: Point, cursor: &mut ExtraCursor, out: &mut String) {
    let _ = write!(out, "{} {}", p.x, p.y);
    for v in cursor.next() {
        let _ = write!(out, " {}", v);
    }
}
