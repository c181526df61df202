//! Well-Known Binary reading and writing, plus the hex encoding of it.
//!
//! Reading accepts either byte order per the header byte, tolerates the
//! SRID extension bit (the SRID itself is discarded), and recognizes the
//! `+1000`/`+2000`/`+3000` type-code offsets for `Z`/`M`/`ZM`
//! coordinates. Writing always produces little-endian WKB.
//!
//! ```
//! use flatgeom::{Geom, Point};
//!
//! let g = Geom::from(Point::new(1., 2.));
//! let bytes = g.to_wkb();
//! let back = Geom::from_wkb(&bytes).unwrap();
//! assert!(back.equals(&g));
//! assert_eq!(Geom::from_hex(&g.to_hex()).unwrap().to_wkt(), "POINT (1 2)");
//! ```

use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::geometry::{Geom, Geometry, GeometryType};
use crate::line_string::LineString;
use crate::multi::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::ring::Ring;

const MAX_DEPTH: usize = 1024;
const SRID_FLAG: u32 = 0x2000_0000;

/// Errors produced by the WKB and hex parsers.
#[derive(Debug, thiserror::Error)]
pub enum WkbError {
    #[error("unexpected end of input at byte {pos}")]
    UnexpectedEof { pos: usize },
    #[error("invalid byte-order marker {marker:#04x}")]
    BadByteOrder { marker: u8 },
    #[error("unknown geometry type code {code}")]
    UnknownType { code: u32 },
    #[error("child geometry type does not match its container")]
    MismatchedChild,
    #[error("invalid hex digit at position {pos}")]
    BadHex { pos: usize },
    #[error("geometry nesting exceeds {MAX_DEPTH} levels")]
    TooDeep,
}

impl Geom {
    /// Parses WKB bytes.
    pub fn from_wkb(bytes: &[u8]) -> Result<Geom, WkbError> {
        parse(bytes)
    }

    /// Writes this geometry as little-endian WKB.
    pub fn to_wkb(&self) -> Vec<u8> {
        write(self)
    }

    /// Parses hex-encoded WKB; both hex cases are accepted.
    pub fn from_hex(hex: &str) -> Result<Geom, WkbError> {
        let hex = hex.as_bytes();
        if hex.len() % 2 != 0 {
            return Err(WkbError::BadHex { pos: hex.len() });
        }
        let nibble = |b: u8, pos: usize| -> Result<u8, WkbError> {
            match b {
                b'0'..=b'9' => Ok(b - b'0'),
                b'a'..=b'f' => Ok(b - b'a' + 10),
                b'A'..=b'F' => Ok(b - b'A' + 10),
                _ => Err(WkbError::BadHex { pos }),
            }
        };
        let mut bytes = Vec::with_capacity(hex.len() / 2);
        for i in (0..hex.len()).step_by(2) {
            bytes.push(nibble(hex[i], i)? << 4 | nibble(hex[i + 1], i + 1)?);
        }
        parse(&bytes)
    }

    /// Writes this geometry as hex-encoded WKB (lower case).
    pub fn to_hex(&self) -> String {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let bytes = self.to_wkb();
        let mut out = String::with_capacity(bytes.len() * 2);
        for b in bytes {
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0xf) as usize] as char);
        }
        out
    }
}

pub fn parse(bytes: &[u8]) -> Result<Geom, WkbError> {
    let mut r = Reader { buf: bytes, pos: 0 };
    r.geometry(0)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Endian {
    Big,
    Little,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], WkbError> {
        let end = self.pos.checked_add(n).filter(|&e| e <= self.buf.len());
        match end {
            Some(end) => {
                let s = &self.buf[self.pos..end];
                self.pos = end;
                Ok(s)
            }
            None => Err(WkbError::UnexpectedEof { pos: self.buf.len() }),
        }
    }

    fn byte(&mut self) -> Result<u8, WkbError> {
        Ok(self.take(1)?[0])
    }

    fn u32(&mut self, e: Endian) -> Result<u32, WkbError> {
        let s = self.take(4)?;
        Ok(match e {
            Endian::Big => BigEndian::read_u32(s),
            Endian::Little => LittleEndian::read_u32(s),
        })
    }

    fn f64(&mut self, e: Endian) -> Result<f64, WkbError> {
        let s = self.take(8)?;
        Ok(match e {
            Endian::Big => BigEndian::read_f64(s),
            Endian::Little => LittleEndian::read_f64(s),
        })
    }

    fn coord(
        &mut self,
        e: Endian,
        extra_per_point: usize,
        extra: &mut Vec<f64>,
    ) -> Result<Point, WkbError> {
        let x = self.f64(e)?;
        let y = self.f64(e)?;
        for _ in 0..extra_per_point {
            extra.push(self.f64(e)?);
        }
        Ok(Point::new(x, y))
    }

    fn coord_seq(
        &mut self,
        e: Endian,
        extra_per_point: usize,
        extra: &mut Vec<f64>,
    ) -> Result<Vec<Point>, WkbError> {
        let n = self.u32(e)? as usize;
        // cheap sanity bound before allocating: every point needs at
        // least 16 bytes
        if n > self.buf.len() / 16 + 1 {
            return Err(WkbError::UnexpectedEof { pos: self.pos });
        }
        let mut pts = Vec::with_capacity(n);
        for _ in 0..n {
            pts.push(self.coord(e, extra_per_point, extra)?);
        }
        Ok(pts)
    }

    fn geometry(&mut self, depth: usize) -> Result<Geom, WkbError> {
        if depth > MAX_DEPTH {
            return Err(WkbError::TooDeep);
        }
        let e = match self.byte()? {
            0 => Endian::Big,
            1 => Endian::Little,
            marker => return Err(WkbError::BadByteOrder { marker }),
        };
        let mut code = self.u32(e)?;
        if code & SRID_FLAG != 0 {
            code &= !SRID_FLAG;
            self.u32(e)?; // the SRID itself, discarded
        }
        let (base, has_z, has_m) = match code / 1000 {
            0 => (code, false, false),
            1 => (code - 1000, true, false),
            2 => (code - 2000, false, true),
            3 => (code - 3000, true, true),
            _ => return Err(WkbError::UnknownType { code }),
        };
        let extra_per_point = usize::from(has_z) + usize::from(has_m);
        let mut extra = Vec::new();
        let finish = |shape: Geometry, extra: Vec<f64>| -> Geom {
            match (has_z, has_m) {
                (false, false) => Geom::new(shape),
                (true, false) => Geom::new_z(shape, extra),
                (false, true) => Geom::new_m(shape, extra),
                (true, true) => Geom::new_zm(shape, extra),
            }
        };
        match base {
            1 => {
                let p = self.coord(e, extra_per_point, &mut extra)?;
                if p.x.is_nan() && p.y.is_nan() {
                    return Ok(Geom::empty(GeometryType::Point));
                }
                Ok(finish(Geometry::Point(p), extra))
            }
            2 => {
                let pts = self.coord_seq(e, extra_per_point, &mut extra)?;
                Ok(finish(Geometry::LineString(LineString::new(pts)), extra))
            }
            3 => {
                let nrings = self.u32(e)? as usize;
                let mut rings = Vec::with_capacity(nrings.min(64));
                for _ in 0..nrings {
                    let pts = self.coord_seq(e, extra_per_point, &mut extra)?;
                    rings.push(Ring::new(pts));
                }
                let poly = if rings.is_empty() {
                    Polygon::new(Ring::new(Vec::new()), Vec::new())
                } else {
                    let exterior = rings.remove(0);
                    Polygon::new(exterior, rings)
                };
                Ok(finish(Geometry::Polygon(poly), extra))
            }
            4 => {
                let n = self.u32(e)? as usize;
                let mut pts = Vec::with_capacity(n.min(4096));
                for _ in 0..n {
                    let child = self.geometry(depth + 1)?;
                    match child.shape() {
                        Geometry::Point(p) => {
                            pts.push(*p);
                            if let Some(coords) = child.extra_coords() {
                                extra.extend_from_slice(coords);
                            }
                        }
                        _ => return Err(WkbError::MismatchedChild),
                    }
                }
                Ok(finish(Geometry::MultiPoint(MultiPoint::new(pts)), extra))
            }
            5 => {
                let n = self.u32(e)? as usize;
                let mut lines = Vec::with_capacity(n.min(4096));
                for _ in 0..n {
                    let child = self.geometry(depth + 1)?;
                    match child.shape() {
                        Geometry::LineString(l) => {
                            lines.push(l.clone());
                            if let Some(coords) = child.extra_coords() {
                                extra.extend_from_slice(coords);
                            }
                        }
                        _ => return Err(WkbError::MismatchedChild),
                    }
                }
                Ok(finish(
                    Geometry::MultiLineString(MultiLineString::new(lines)),
                    extra,
                ))
            }
            6 => {
                let n = self.u32(e)? as usize;
                let mut polys = Vec::with_capacity(n.min(4096));
                for _ in 0..n {
                    let child = self.geometry(depth + 1)?;
                    match child.shape() {
                        Geometry::Polygon(p) => {
                            polys.push(p.clone());
                            if let Some(coords) = child.extra_coords() {
                                extra.extend_from_slice(coords);
                            }
                        }
                        _ => return Err(WkbError::MismatchedChild),
                    }
                }
                Ok(finish(
                    Geometry::MultiPolygon(MultiPolygon::new(polys)),
                    extra,
                ))
            }
            7 => {
                let n = self.u32(e)? as usize;
                let mut children = Vec::with_capacity(n.min(4096));
                for _ in 0..n {
                    children.push(self.geometry(depth + 1)?);
                }
                Ok(Geom::new(Geometry::GeometryCollection(
                    GeometryCollection::new(children),
                )))
            }
            _ => Err(WkbError::UnknownType { code }),
        }
    }
}

pub fn write(geom: &Geom) -> Vec<u8> {
    let mut out = Vec::new();
    write_geom(geom, &mut out);
    out
}

struct ExtraCursor<'a> {
    coords: &'a [f64],
    per_point: usize,
    at: usize,
}

impl<'a> ExtraCursor<'a> {
    fn next(&mut self) -> &'a [f64] {
        let start = self.at.min(self.coords.len());
        let end = (start + self.per_point).min(self.coords.len());
        self.at = end;
        &self.coords[start..end]
    }
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_f64(out: &mut Vec<u8>, v: f64) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn type_code(base: u32, has_z: bool, has_m: bool) -> u32 {
    base + if has_z { 1000 } else { 0 } + if has_m { 2000 } else { 0 }
}

fn write_geom(geom: &Geom, out: &mut Vec<u8>) {
    let mut cursor = ExtraCursor {
        coords: geom.extra_coords().unwrap_or(&[]),
        per_point: usize::from(geom.has_z()) + usize::from(geom.has_m()),
        at: 0,
    };
    let has_z = geom.has_z();
    let has_m = geom.has_m();
    out.push(1);
    match geom.shape() {
        Geometry::Point(p) => {
            push_u32(out, type_code(1, has_z, has_m));
            if geom.is_empty() {
                push_f64(out, f64::NAN);
                push_f64(out, f64::NAN);
            } else {
                write_coord(*p, &mut cursor, out);
            }
        }
        Geometry::LineString(l) => {
            push_u32(out, type_code(2, has_z, has_m));
            push_u32(out, l.points().len() as u32);
            for &p in l.points() {
                write_coord(p, &mut cursor, out);
            }
        }
        Geometry::Polygon(p) => {
            push_u32(out, type_code(3, has_z, has_m));
            write_polygon_body(p, &mut cursor, out);
        }
        Geometry::MultiPoint(m) => {
            push_u32(out, type_code(4, has_z, has_m));
            push_u32(out, m.len() as u32);
            for &p in m.children() {
                out.push(1);
                push_u32(out, type_code(1, has_z, has_m));
                write_coord(p, &mut cursor, out);
            }
        }
        Geometry::MultiLineString(m) => {
            push_u32(out, type_code(5, has_z, has_m));
            push_u32(out, m.len() as u32);
            for l in m.children() {
                out.push(1);
                push_u32(out, type_code(2, has_z, has_m));
                push_u32(out, l.points().len() as u32);
                for &p in l.points() {
                    write_coord(p, &mut cursor, out);
                }
            }
        }
        Geometry::MultiPolygon(m) => {
            push_u32(out, type_code(6, has_z, has_m));
            push_u32(out, m.len() as u32);
            for p in m.children() {
                out.push(1);
                push_u32(out, type_code(3, has_z, has_m));
                write_polygon_body(p, &mut cursor, out);
            }
        }
        Geometry::GeometryCollection(c) => {
            push_u32(out, type_code(7, false, false));
            push_u32(out, c.len() as u32);
            for child in c.children() {
                write_geom(child, out);
            }
        }
    }
}

fn write_coord(p: Point, cursor: &mut ExtraCursor, out: &mut Vec<u8>) {
    push_f64(out, p.x);
    push_f64(out, p.y);
    let extras = cursor.next();
    for i in 0..cursor.per_point {
        push_f64(out, extras.get(i).copied().unwrap_or(0.0));
    }
}

fn write_polygon_body(p: &Polygon, cursor: &mut ExtraCursor, out: &mut Vec<u8>) {
    if p.is_empty() {
        push_u32(out, 0);
        return;
    }
    push_u32(out, 1 + p.num_holes() as u32);
    push_u32(out, p.exterior().points().len() as u32);
    for &pt in p.exterior().points() {
        write_coord(pt, cursor, out);
    }
    for hole in p.holes() {
        push_u32(out, hole.points().len() as u32);
        for &pt in hole.points() {
            write_coord(pt, cursor, out);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn round_trip(wkt: &str) {
        let g = Geom::from_wkt(wkt).unwrap();
        let bytes = g.to_wkb();
        let back = Geom::from_wkb(&bytes).unwrap();
        assert_eq!(back.to_wkt(), wkt, "wkb round trip of {}", wkt);
        let hexed = Geom::from_hex(&g.to_hex()).unwrap();
        assert_eq!(hexed.to_wkt(), wkt, "hex round trip of {}", wkt);
    }

    #[test]
    fn round_trips() {
        round_trip("POINT (1 2)");
        round_trip("POINT Z (1 2 3)");
        round_trip("POINT ZM (1 2 3 4)");
        round_trip("LINESTRING (0 0, 5 0, 5 5)");
        round_trip("LINESTRING M (0 0 7, 5 0 8)");
        round_trip("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))");
        round_trip("MULTIPOINT ((1 2), (3 4))");
        round_trip("MULTILINESTRING ((0 0, 1 1), (2 2, 3 3))");
        round_trip("MULTIPOLYGON (((0 0, 1 0, 1 1, 0 1, 0 0)), ((2 0, 3 0, 3 1, 2 1, 2 0)))");
        round_trip("GEOMETRYCOLLECTION (POINT (1 1), LINESTRING (0 0, 2 2))");
        round_trip("POINT EMPTY");
    }

    #[test]
    fn big_endian_input() {
        // POINT (1 2), big-endian
        let mut bytes = vec![0u8];
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&1f64.to_be_bytes());
        bytes.extend_from_slice(&2f64.to_be_bytes());
        let g = Geom::from_wkb(&bytes).unwrap();
        assert_eq!(g.to_wkt(), "POINT (1 2)");
    }

    #[test]
    fn srid_flag_tolerated() {
        // EWKB as PostGIS writes it: little-endian POINT with SRID 4326
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&(1u32 | SRID_FLAG).to_le_bytes());
        bytes.extend_from_slice(&4326u32.to_le_bytes());
        bytes.extend_from_slice(&5f64.to_le_bytes());
        bytes.extend_from_slice(&6f64.to_le_bytes());
        let g = Geom::from_wkb(&bytes).unwrap();
        assert_eq!(g.to_wkt(), "POINT (5 6)");
    }

    #[test]
    fn truncated_input() {
        let g = Geom::from_wkt("POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))").unwrap();
        let bytes = g.to_wkb();
        for cut in [0, 1, 5, 9, bytes.len() - 1] {
            assert!(matches!(
                Geom::from_wkb(&bytes[..cut]),
                Err(WkbError::UnexpectedEof { .. })
            ));
        }
    }

    #[test]
    fn bad_markers() {
        assert!(matches!(
            Geom::from_wkb(&[9, 0, 0, 0, 0]),
            Err(WkbError::BadByteOrder { marker: 9 })
        ));
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&99u32.to_le_bytes());
        assert!(matches!(
            Geom::from_wkb(&bytes),
            Err(WkbError::UnknownType { code: 99 })
        ));
        assert!(matches!(
            Geom::from_hex("zz"),
            Err(WkbError::BadHex { pos: 0 })
        ));
        assert!(matches!(
            Geom::from_hex("abc"),
            Err(WkbError::BadHex { .. })
        ));
    }

    #[test]
    fn hex_case_insensitive() {
        let g = Geom::from_wkt("POINT (1 2)").unwrap();
        let lower = g.to_hex();
        let upper = lower.to_ascii_uppercase();
        assert!(Geom::from_hex(&upper).unwrap().equals(&g));
    }
}
