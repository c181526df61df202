//! End-to-end predicate behavior over assembled geometries.

use flatgeom::{
    Contains, Covers, Geom, Intersects, LineString, MultiPolygon, Point, PointLocation, Polygon,
    Rect, Ring, Segment, SegmentIntersection, Touches,
};

fn ring(pts: &[(f64, f64)]) -> Ring {
    Ring::new(pts.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

fn square(x: f64, y: f64, side: f64) -> Polygon {
    Polygon::from(Rect::new(Point::new(x, y), Point::new(x + side, y + side)))
}

#[test]
fn unit_square_point_queries() {
    let r = ring(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.)]);
    assert_eq!(
        r.contains_point(Point::new(5., 5.), true),
        PointLocation {
            hit: true,
            edge: None
        }
    );
    // a point on the left edge hits only when edges are allowed, and
    // reports the edge it was found on
    assert!(r.contains_point(Point::new(0., 5.), true).hit);
    let strict = r.contains_point(Point::new(0., 5.), false);
    assert!(!strict.hit);
    assert_eq!(strict.edge, Some(3));
}

#[test]
fn crossing_diagonals_intersect_at_center() {
    let l = LineString::new(vec![Point::new(0., 0.), Point::new(10., 10.)]);
    let s = Segment::new((0., 10.), (10., 0.));
    let first = l.segment(0).unwrap();
    assert!(first.intersects(&s));
    assert_eq!(
        first.intersection(&s),
        Some(SegmentIntersection::Point(Point::new(5., 5.)))
    );
}

#[test]
fn concave_ring_rejects_notch_crossing_chord() {
    let c = ring(&[
        (0., 0.),
        (10., 0.),
        (10., 5.),
        (5., 5.),
        (5., 10.),
        (0., 10.),
        (0., 0.),
    ]);
    assert!(!c.contains_segment(Segment::new((1., 1.), (9., 9.)), true));
}

#[test]
fn multipolygon_gap_and_parts() {
    let g = Geom::from(MultiPolygon::new(vec![
        square(0., 0., 1.),
        square(2., 0., 1.),
    ]));
    assert!(!g.intersects_xy(1.5, 0.5));
    assert!(g.intersects_xy(0.5, 0.5));
    assert_eq!(g.num_polys(), 2);
}

#[test]
fn hole_boundary_covers_but_does_not_contain() {
    let poly = Polygon::new(
        ring(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.)]),
        vec![ring(&[(4., 4.), (6., 4.), (6., 6.), (4., 6.)])],
    );
    assert!(!poly.covers_point(Point::new(5., 5.)));
    assert!(poly.covers_point(Point::new(5., 4.)));
    assert!(!poly.contains_point(Point::new(5., 4.)));
}

#[test]
fn point_on_edge_covers_not_contains() {
    let sq = square(0., 0., 10.);
    let edge_point = Point::new(0., 5.);
    assert!(sq.covers(&edge_point));
    assert!(!sq.contains(&edge_point));
}

#[test]
fn shared_vertex_counts_one_crossing() {
    // the query's y lands exactly on a vertex shared by two edges; the
    // parity walk must count it once, keeping inside points inside
    let r = ring(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.), (0., 0.)]);
    assert!(r.contains_point(Point::new(5., 10.), true).hit);
    assert!(!r.contains_point(Point::new(5., 10.), false).hit);
    assert!(r.contains_point(Point::new(3., 5.), true).hit);
}

#[test]
fn coincident_endpoints_intersect() {
    let a = Segment::new((0., 0.), (5., 5.));
    let b = Segment::new((5., 5.), (10., 0.));
    assert!(a.intersects(&b));
}

#[test]
fn reflexivity_for_nonempty_geometries() {
    let geoms = vec![
        Geom::from(Point::new(3., 4.)),
        Geom::from(LineString::new(vec![
            Point::new(0., 0.),
            Point::new(5., 5.),
            Point::new(10., 0.),
        ])),
        Geom::from(square(0., 0., 10.)),
        Geom::from(MultiPolygon::new(vec![
            square(0., 0., 1.),
            square(2., 0., 1.),
        ])),
    ];
    for g in &geoms {
        assert!(g.equals(g), "equals(G, G) failed for {}", g.to_wkt());
        assert!(g.covers(g), "covers(G, G) failed for {}", g.to_wkt());
        assert!(g.intersects(g), "intersects(G, G) failed for {}", g.to_wkt());
        assert!(!g.disjoint(g));
    }
}

#[test]
fn symmetry_and_duals() {
    let a = Geom::from(square(0., 0., 10.));
    let b = Geom::from(square(5., 5., 10.));
    let c = Geom::from(square(2., 2., 4.));
    for (x, y) in [(&a, &b), (&a, &c), (&b, &c)] {
        assert_eq!(x.intersects(y), y.intersects(x));
        assert_eq!(x.equals(y), y.equals(x));
        assert_eq!(x.disjoint(y), !x.intersects(y));
        assert_eq!(c.within(x), x.contains(&c));
        assert_eq!(c.covered_by(x), x.covers(&c));
    }
}

#[test]
fn covers_implies_intersects() {
    let outer = Geom::from(square(0., 0., 10.));
    let inner = Geom::from(square(2., 2., 4.));
    assert!(outer.covers(&inner));
    assert!(outer.intersects(&inner));
    assert!(outer.contains(&inner));
    // rect cover is necessary but not sufficient
    let ell = Geom::from(Polygon::from(ring(&[
        (0., 0.),
        (10., 0.),
        (10., 5.),
        (5., 5.),
        (5., 10.),
        (0., 10.),
    ])));
    let notch = Geom::from(square(6., 6., 3.));
    let ell_rect = ell.rect().unwrap();
    let notch_rect = notch.rect().unwrap();
    assert!(ell_rect.covers(&notch_rect));
    assert!(!ell.covers(&notch));
}

#[test]
fn collection_children_intersect_collection() {
    let children = vec![
        Geom::from(Point::new(1., 1.)),
        Geom::from(LineString::new(vec![Point::new(0., 0.), Point::new(5., 0.)])),
        Geom::from(square(10., 10., 2.)),
    ];
    let col = Geom::from(flatgeom::GeometryCollection::new(children.clone()));
    for child in &children {
        assert!(col.intersects(child));
        assert!(child.intersects(&col));
    }
}

#[test]
fn empty_is_false_on_every_predicate() {
    let empty = Geom::empty(flatgeom::GeometryType::Polygon);
    let solid = Geom::from(square(0., 0., 10.));
    assert!(!empty.intersects(&solid));
    assert!(!solid.intersects(&empty));
    assert!(!solid.covers(&empty));
    assert!(!empty.covers(&solid));
    assert!(!solid.contains(&empty));
    assert!(!solid.touches(&empty));
    assert!(!empty.equals(&empty));
}

#[test]
fn touches_is_boundary_only_contact() {
    let a = Geom::from(square(0., 0., 10.));
    let b = Geom::from(square(10., 0., 10.));
    let c = Geom::from(square(5., 5., 10.));
    assert!(a.touches(&b));
    assert!(!a.touches(&c));
    assert!(!a.touches(&a));
}

#[test]
fn crosses_and_overlaps_always_false() {
    let a = Geom::from(square(0., 0., 10.));
    let b = Geom::from(square(5., 5., 10.));
    assert!(!a.crosses(&b));
    assert!(!a.overlaps(&b));
}

#[test]
fn indexed_and_unindexed_agree_on_predicates() {
    use flatgeom::IndexStyle;
    let n = 240;
    let pts: Vec<Point> = (0..n)
        .map(|i| {
            let t = (i as f64) / (n as f64) * std::f64::consts::TAU;
            let r = if i % 3 == 0 { 10.0 } else { 7.0 };
            Point::new(r * t.cos(), r * t.sin())
        })
        .collect();
    let indexed = Ring::with_index(pts.clone(), IndexStyle::Natural);
    let striped = Ring::with_index(pts.clone(), IndexStyle::YStripes);
    let plain = Ring::with_index(pts, IndexStyle::None);
    for ix in -11..11 {
        for iy in -11..11 {
            let p = Point::new(ix as f64 + 0.25, iy as f64 + 0.25);
            let want = plain.contains_point(p, true).hit;
            assert_eq!(indexed.contains_point(p, true).hit, want);
            assert_eq!(striped.contains_point(p, true).hit, want);
        }
    }
    let chord = Segment::new((-4., -4.), (4., 4.));
    assert_eq!(
        plain.contains_segment(chord, true),
        indexed.contains_segment(chord, true)
    );
}
