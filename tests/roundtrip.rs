//! Text/binary codec round trips over the whole type surface.

use flatgeom::Geom;

const FIXTURES: &[&str] = &[
    "POINT (1 2)",
    "POINT (-1.5 2.25)",
    "POINT Z (1 2 3)",
    "POINT M (1 2 4)",
    "POINT ZM (1 2 3 4)",
    "POINT EMPTY",
    "LINESTRING (0 0, 10 0, 10 10)",
    "LINESTRING Z (0 0 1, 10 0 2, 10 10 3)",
    "LINESTRING EMPTY",
    "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0))",
    "POLYGON ((0 0, 10 0, 10 10, 0 10, 0 0), (4 4, 6 4, 6 6, 4 6, 4 4))",
    "POLYGON EMPTY",
    "MULTIPOINT ((1 2), (3 4))",
    "MULTIPOINT EMPTY",
    "MULTILINESTRING ((0 0, 1 1), (2 2, 3 3, 4 2))",
    "MULTIPOLYGON (((0 0, 1 0, 1 1, 0 1, 0 0)), ((2 0, 3 0, 3 1, 2 1, 2 0)))",
    "MULTIPOLYGON EMPTY",
    "GEOMETRYCOLLECTION (POINT (1 1), LINESTRING (0 0, 2 2), POLYGON ((0 0, 1 0, 1 1, 0 1, 0 0)))",
    "GEOMETRYCOLLECTION EMPTY",
];

#[test]
fn wkt_round_trip() {
    for src in FIXTURES {
        let g = Geom::from_wkt(src).unwrap_or_else(|e| panic!("parse {}: {}", src, e));
        assert_eq!(g.to_wkt(), *src);
    }
}

#[test]
fn wkb_round_trip() {
    for src in FIXTURES {
        let g = Geom::from_wkt(src).unwrap();
        let back = Geom::from_wkb(&g.to_wkb()).unwrap();
        assert_eq!(back.to_wkt(), *src, "through wkb");
    }
}

#[test]
fn hex_round_trip() {
    for src in FIXTURES {
        let g = Geom::from_wkt(src).unwrap();
        let back = Geom::from_hex(&g.to_hex()).unwrap();
        assert_eq!(back.to_wkt(), *src, "through hex");
    }
}

#[test]
fn topological_equality_survives_wkb() {
    for src in FIXTURES {
        let g = Geom::from_wkt(src).unwrap();
        if g.is_empty() {
            continue; // empties equal nothing, themselves included
        }
        let back = Geom::from_wkb(&g.to_wkb()).unwrap();
        assert!(back.equals(&g), "equality through wkb for {}", src);
    }
}

#[test]
fn point_z_accessors_after_parse() {
    let g = Geom::from_wkt("POINT Z (1 2 3)").unwrap();
    assert_eq!(g.dims(), 3);
    assert!(g.has_z());
    assert!(!g.has_m());
    assert_eq!(g.z(), Some(3.0));
    assert!(g.to_wkt().starts_with("POINT Z (1 2 3)"));
}

#[test]
fn whitespace_and_case_tolerance() {
    let variants = [
        "point(1 2)",
        "POINT(1 2)",
        "  Point  ( 1   2 )  ",
        "pOiNt z(1 2 3)",
    ];
    for v in variants {
        assert!(Geom::from_wkt(v).is_ok(), "failed to parse {:?}", v);
    }
}

#[test]
fn extra_json_rides_along() {
    let g = Geom::from_wkt("POINT (1 2)")
        .unwrap()
        .with_extra_json(r#"{"id":"a1","properties":{"name":"pin"}}"#.to_string());
    assert_eq!(
        g.extra_json(),
        Some(r#"{"id":"a1","properties":{"name":"pin"}}"#)
    );
    // codecs that don't understand the payload simply drop it
    let through_wkb = Geom::from_wkb(&g.to_wkb()).unwrap();
    assert_eq!(through_wkb.extra_json(), None);
    assert!(through_wkb.equals(&g));
}
