use super::{WktError, MAX_DEPTH};
use crate::geometry::{Geom, Geometry, GeometryType};
use crate::line_string::LineString;
use crate::multi::{GeometryCollection, MultiLineString, MultiPoint, MultiPolygon};
use crate::point::Point;
use crate::polygon::Polygon;
use crate::ring::Ring;

/// Parses one WKT geometry, requiring the whole input to be consumed.
pub fn parse(src: &str) -> Result<Geom, WktError> {
    let mut p = Parser {
        src: src.as_bytes(),
        pos: 0,
        depth: 0,
    };
    let geom = p.geometry()?;
    p.skip_ws();
    if p.pos < p.src.len() {
        return Err(WktError::TrailingInput { pos: p.pos });
    }
    Ok(geom)
}

/// Which extra dimensions a geometry carries. `None` until the modifier
/// or the first coordinate pins it down.
type Dims = Option<(bool, bool)>;

struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn skip_ws(&mut self) {
        while self
            .src
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.src.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn expect(&mut self, b: u8, expected: &'static str) -> Result<(), WktError> {
        if self.eat(b) {
            Ok(())
        } else if self.pos >= self.src.len() {
            Err(WktError::UnexpectedEof)
        } else {
            Err(WktError::Expected {
                expected,
                pos: self.pos,
            })
        }
    }

    /// The next alphabetic keyword, uppercased, or `None` if the next
    /// token is not a word.
    fn word(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        while self
            .src
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_alphabetic())
        {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        Some(
            self.src[start..self.pos]
                .iter()
                .map(|b| b.to_ascii_uppercase() as char)
                .collect(),
        )
    }

    fn number(&mut self) -> Result<f64, WktError> {
        self.skip_ws();
        if self.pos >= self.src.len() {
            return Err(WktError::UnexpectedEof);
        }
        let start = self.pos;
        while self.src.get(self.pos).is_some_and(|b| {
            b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')
        }) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(WktError::InvalidNumber { pos: start });
        }
        std::str::from_utf8(&self.src[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .ok_or(WktError::InvalidNumber { pos: start })
    }

    fn number_next(&mut self) -> bool {
        matches!(self.peek(), Some(b) if b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.'))
    }

    fn geometry(&mut self) -> Result<Geom, WktError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(WktError::TooDeep);
        }
        self.skip_ws();
        let word_pos = self.pos;
        let word = self.word().ok_or(WktError::Expected {
            expected: "geometry type",
            pos: word_pos,
        })?;
        let kind = match word.as_str() {
            "POINT" => GeometryType::Point,
            "LINESTRING" => GeometryType::LineString,
            "POLYGON" => GeometryType::Polygon,
            "MULTIPOINT" => GeometryType::MultiPoint,
            "MULTILINESTRING" => GeometryType::MultiLineString,
            "MULTIPOLYGON" => GeometryType::MultiPolygon,
            "GEOMETRYCOLLECTION" => GeometryType::GeometryCollection,
            _ => {
                return Err(WktError::UnknownType {
                    word,
                    pos: word_pos,
                })
            }
        };
        // optional Z / M / ZM modifier, optional EMPTY
        let mut dims: Dims = None;
        let rewind = self.pos;
        if let Some(modifier) = self.word() {
            match modifier.as_str() {
                "Z" => dims = Some((true, false)),
                "M" => dims = Some((false, true)),
                "ZM" => dims = Some((true, true)),
                "EMPTY" => {
                    self.depth -= 1;
                    return Ok(Geom::empty(kind));
                }
                _ => self.pos = rewind,
            }
        }
        let rewind = self.pos;
        if let Some(modifier) = self.word() {
            if modifier == "EMPTY" {
                self.depth -= 1;
                return Ok(Geom::empty(kind));
            }
            self.pos = rewind;
        }
        let geom = match kind {
            GeometryType::Point => self.point_body(&mut dims)?,
            GeometryType::LineString => self.line_string_body(&mut dims)?,
            GeometryType::Polygon => self.polygon_body(&mut dims)?,
            GeometryType::MultiPoint => self.multi_point_body(&mut dims)?,
            GeometryType::MultiLineString => self.multi_line_body(&mut dims)?,
            GeometryType::MultiPolygon => self.multi_polygon_body(&mut dims)?,
            GeometryType::GeometryCollection => self.collection_body(dims)?,
        };
        self.depth -= 1;
        Ok(geom)
    }

    /// One `x y [z] [m]` coordinate. Extra values go to `extra` in
    /// `z, m` order according to `dims`, which the first coordinate
    /// pins down when no modifier did.
    fn coord(
        &mut self,
        dims: &mut Dims,
        xy: &mut Vec<Point>,
        extra: &mut Vec<f64>,
    ) -> Result<(), WktError> {
        let x = self.number()?;
        let y = self.number()?;
        let at = self.pos;
        let mut tail = [0.0f64; 2];
        let mut n = 0;
        while n < 2 && self.number_next() {
            tail[n] = self.number()?;
            n += 1;
        }
        let (has_z, has_m) = *dims.get_or_insert(match n {
            0 => (false, false),
            1 => (true, false),
            _ => (true, true),
        });
        if n != usize::from(has_z) + usize::from(has_m) {
            return Err(WktError::DimensionMismatch { pos: at });
        }
        xy.push(Point::new(x, y));
        extra.extend_from_slice(&tail[..n]);
        Ok(())
    }

    fn coord_seq(
        &mut self,
        dims: &mut Dims,
        xy: &mut Vec<Point>,
        extra: &mut Vec<f64>,
    ) -> Result<(), WktError> {
        self.expect(b'(', "`(`")?;
        loop {
            self.coord(dims, xy, extra)?;
            if !self.eat(b',') {
                break;
            }
        }
        self.expect(b')', "`)`")
    }

    fn finish(shape: impl Into<Geometry>, dims: Dims, extra: Vec<f64>) -> Geom {
        match dims {
            Some((true, false)) => Geom::new_z(shape, extra),
            Some((false, true)) => Geom::new_m(shape, extra),
            Some((true, true)) => Geom::new_zm(shape, extra),
            _ => Geom::new(shape),
        }
    }

    fn point_body(&mut self, dims: &mut Dims) -> Result<Geom, WktError> {
        let mut xy = Vec::with_capacity(1);
        let mut extra = Vec::new();
        self.expect(b'(', "`(` or `EMPTY`")?;
        self.coord(dims, &mut xy, &mut extra)?;
        self.expect(b')', "`)`")?;
        Ok(Self::finish(xy[0], *dims, extra))
    }

    fn line_string_body(&mut self, dims: &mut Dims) -> Result<Geom, WktError> {
        let mut xy = Vec::new();
        let mut extra = Vec::new();
        self.coord_seq(dims, &mut xy, &mut extra)?;
        Ok(Self::finish(LineString::new(xy), *dims, extra))
    }

    fn rings(&mut self, dims: &mut Dims, extra: &mut Vec<f64>) -> Result<Vec<Ring>, WktError> {
        self.expect(b'(', "`(`")?;
        let mut rings = Vec::new();
        loop {
            let mut xy = Vec::new();
            self.coord_seq(dims, &mut xy, extra)?;
            rings.push(Ring::new(xy));
            if !self.eat(b',') {
                break;
            }
        }
        self.expect(b')', "`)`")?;
        Ok(rings)
    }

    fn polygon_body(&mut self, dims: &mut Dims) -> Result<Geom, WktError> {
        let mut extra = Vec::new();
        let mut rings = self.rings(dims, &mut extra)?;
        let exterior = rings.remove(0);
        Ok(Self::finish(
            Polygon::new(exterior, rings),
            *dims,
            extra,
        ))
    }

    fn multi_point_body(&mut self, dims: &mut Dims) -> Result<Geom, WktError> {
        self.expect(b'(', "`(`")?;
        let mut xy = Vec::new();
        let mut extra = Vec::new();
        loop {
            // both `(1 2)` and bare `1 2` elements are accepted
            if self.eat(b'(') {
                self.coord(dims, &mut xy, &mut extra)?;
                self.expect(b')', "`)`")?;
            } else {
                self.coord(dims, &mut xy, &mut extra)?;
            }
            if !self.eat(b',') {
                break;
            }
        }
        self.expect(b')', "`)`")?;
        Ok(Self::finish(MultiPoint::new(xy), *dims, extra))
    }

    fn multi_line_body(&mut self, dims: &mut Dims) -> Result<Geom, WktError> {
        self.expect(b'(', "`(`")?;
        let mut lines = Vec::new();
        let mut extra = Vec::new();
        loop {
            let mut xy = Vec::new();
            self.coord_seq(dims, &mut xy, &mut extra)?;
            lines.push(LineString::new(xy));
            if !self.eat(b',') {
                break;
            }
        }
        self.expect(b')', "`)`")?;
        Ok(Self::finish(MultiLineString::new(lines), *dims, extra))
    }

    fn multi_polygon_body(&mut self, dims: &mut Dims) -> Result<Geom, WktError> {
        self.expect(b'(', "`(`")?;
        let mut polys = Vec::new();
        let mut extra = Vec::new();
        loop {
            let mut rings = self.rings(dims, &mut extra)?;
            let exterior = rings.remove(0);
            polys.push(Polygon::new(exterior, rings));
            if !self.eat(b',') {
                break;
            }
        }
        self.expect(b')', "`)`")?;
        Ok(Self::finish(MultiPolygon::new(polys), *dims, extra))
    }

    fn collection_body(&mut self, _dims: Dims) -> Result<Geom, WktError> {
        self.expect(b'(', "`(`")?;
        let mut children = Vec::new();
        loop {
            children.push(self.geometry()?);
            if !self.eat(b',') {
                break;
            }
        }
        self.expect(b')', "`)`")?;
        Ok(Geom::new(GeometryCollection::new(children)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn point() {
        let g = parse("POINT (1 2)").unwrap();
        assert_eq!(g.geometry_type(), GeometryType::Point);
        assert_eq!(g.dims(), 2);
        match g.shape() {
            Geometry::Point(p) => assert_eq!((p.x, p.y), (1., 2.)),
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn point_zm_variants() {
        let g = parse("POINT Z (1 2 3)").unwrap();
        assert_eq!((g.dims(), g.z(), g.m()), (3, Some(3.), None));
        let g = parse("POINT M (1 2 4)").unwrap();
        assert_eq!((g.dims(), g.z(), g.m()), (3, None, Some(4.)));
        let g = parse("POINT ZM (1 2 3 4)").unwrap();
        assert_eq!((g.dims(), g.z(), g.m()), (4, Some(3.), Some(4.)));
        // a bare third coordinate reads as Z
        let g = parse("point (1 2 3)").unwrap();
        assert!(g.has_z());
    }

    #[test]
    fn empties() {
        for src in [
            "POINT EMPTY",
            "LINESTRING EMPTY",
            "POLYGON EMPTY",
            "MULTIPOINT EMPTY",
            "MULTILINESTRING EMPTY",
            "MULTIPOLYGON EMPTY",
            "GEOMETRYCOLLECTION EMPTY",
            "POINT Z EMPTY",
        ] {
            let g = parse(src).unwrap();
            assert!(g.is_empty(), "{} should be empty", src);
        }
    }

    #[test]
    fn multipoint_both_spellings() {
        let a = parse("MULTIPOINT (1 2, 3 4)").unwrap();
        let b = parse("MULTIPOINT ((1 2), (3 4))").unwrap();
        assert_eq!(a.num_points(), 2);
        assert_eq!(b.num_points(), 2);
        assert_eq!(a.point_at(1), b.point_at(1));
    }

    #[test]
    fn polygon_with_hole() {
        let g = parse(
            "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))",
        )
        .unwrap();
        match g.shape() {
            Geometry::Polygon(p) => {
                assert_eq!(p.num_holes(), 1);
                assert_eq!(p.area(), 96.0);
            }
            other => panic!("unexpected shape {:?}", other),
        }
    }

    #[test]
    fn collection_nested() {
        let g = parse("GEOMETRYCOLLECTION (POINT (1 1), GEOMETRYCOLLECTION (POINT (2 2)))")
            .unwrap();
        assert_eq!(g.num_geometries(), 2);
        assert_eq!(g.geometry_at(1).unwrap().num_geometries(), 1);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse("TRIANGLE (0 0, 1 0, 0 1)"),
            Err(WktError::UnknownType { .. })
        ));
        assert!(matches!(parse("POINT (1"), Err(WktError::UnexpectedEof)));
        assert!(matches!(
            parse("POINT (1 x)"),
            Err(WktError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse("POINT (1 2) garbage"),
            Err(WktError::TrailingInput { .. })
        ));
        assert!(matches!(
            parse("LINESTRING (0 0 1, 1 1)"),
            Err(WktError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            parse("LINESTRING Z (0 0, 1 1)"),
            Err(WktError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn deep_nesting_rejected() {
        let mut src = String::new();
        for _ in 0..1100 {
            src.push_str("GEOMETRYCOLLECTION (");
        }
        src.push_str("POINT (0 0)");
        for _ in 0..1100 {
            src.push(')');
        }
        assert!(matches!(parse(&src), Err(WktError::TooDeep)));
    }
}
