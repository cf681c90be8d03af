mod test_utils;

use arcline::math::Vec2;
use arcline::polyline::{PlineOrientation, Polyline, Vertex};
use arcline::{assert_fuzzy_eq, polyline_closed, polyline_open};
use std::f64::consts::PI;
use test_utils::visit_modified_plines;

#[test]
fn unit_square() {
    let square = polyline_closed![
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0)
    ];

    assert_fuzzy_eq!(square.area(), 1.0);
    assert_fuzzy_eq!(square.path_length(), 4.0);
    let extents = square.extents().unwrap();
    assert_fuzzy_eq!(extents.min_x, 0.0);
    assert_fuzzy_eq!(extents.min_y, 0.0);
    assert_fuzzy_eq!(extents.max_x, 1.0);
    assert_fuzzy_eq!(extents.max_y, 1.0);
    assert_eq!(square.winding_number(Vec2::new(0.5, 0.5)), 1);
}

#[test]
fn circle_of_two_semicircles() {
    let circle = polyline_closed![(0.0, 0.0, 1.0), (10.0, 0.0, 1.0)];

    assert_fuzzy_eq!(circle.area(), 25.0 * PI, 1e-8);
    assert_fuzzy_eq!(circle.path_length(), 10.0 * PI, 1e-8);
    let extents = circle.extents().unwrap();
    assert_fuzzy_eq!(extents.min_x, 0.0);
    assert_fuzzy_eq!(extents.min_y, -5.0);
    assert_fuzzy_eq!(extents.max_x, 10.0);
    assert_fuzzy_eq!(extents.max_y, 5.0);
}

#[test]
fn figure_eight_net_area() {
    let figure_eight = polyline_closed![
        (0.0, 0.0, 1.0),
        (2.0, 0.0, 1.0),
        (0.0, 0.0, -1.0),
        (-2.0, 0.0, -1.0)
    ];
    assert_fuzzy_eq!(figure_eight.area(), 0.0, 1e-8);
    // each lobe winds in its own direction
    assert_eq!(figure_eight.winding_number(Vec2::new(1.0, 0.0)), 1);
    assert_eq!(figure_eight.winding_number(Vec2::new(-1.0, 0.0)), -1);
}

#[test]
fn quarter_arc_path_length() {
    let quarter = polyline_open![(1.0, 0.0, -0.4142135624), (0.0, -1.0, 0.0)];
    assert_fuzzy_eq!(quarter.path_length(), PI / 2.0, 1e-8);
    // open polylines have no area or winding
    assert_fuzzy_eq!(quarter.area(), 0.0);
    assert_eq!(quarter.winding_number(Vec2::new(0.3, -0.3)), 0);
}

#[test]
fn winding_zero_outside_extents() {
    let plines = [
        polyline_closed![(0.0, 0.0, 0.0), (3.0, 0.0, 0.5), (1.5, 4.0, 0.0)],
        polyline_closed![(0.0, 0.0, 1.0), (6.0, 0.0, 1.0)],
        polyline_closed![
            (0.0, 0.0, 0.0),
            (2.0, 0.0, -0.3),
            (2.0, 2.0, 0.0),
            (0.0, 2.0, 0.2)
        ],
    ];

    for pline in plines.iter() {
        let e = pline.extents().unwrap();
        let outside_points = [
            Vec2::new(e.min_x - 0.5, e.min_y - 0.5),
            Vec2::new(e.max_x + 0.5, e.min_y - 0.5),
            Vec2::new(e.max_x + 0.5, e.max_y + 0.5),
            Vec2::new(e.min_x - 0.5, e.max_y + 0.5),
            Vec2::new((e.min_x + e.max_x) / 2.0, e.max_y + 0.5),
        ];
        for p in outside_points {
            assert_eq!(pline.winding_number(p), 0, "point {:?} should be outside", p);
        }
    }
}

#[test]
fn winding_magnitude_one_interior() {
    let pline = polyline_closed![(0.0, 0.0, 0.0), (3.0, 0.0, 0.5), (1.5, 4.0, 0.0)];
    assert!(pline.area() > 0.0);
    assert_eq!(pline.winding_number(Vec2::new(1.5, 1.0)), 1);

    let mut inverted = pline.clone();
    inverted.invert_direction_mut();
    assert_eq!(inverted.winding_number(Vec2::new(1.5, 1.0)), -1);
}

#[test]
fn invert_direction_involution() {
    let plines = [
        polyline_closed![(0.0, 0.0, 0.3), (2.0, 0.0, -0.5), (2.0, 2.0, 0.0), (0.0, 2.0, 1.0)],
        polyline_open![(0.0, 0.0, 0.5), (1.0, 1.0, -0.2), (3.0, 0.0, 0.0)],
    ];
    for pline in plines.iter() {
        let mut round_trip = pline.clone();
        round_trip.invert_direction_mut();
        round_trip.invert_direction_mut();
        assert!(round_trip.fuzzy_eq(pline));
    }
}

#[test]
fn area_negated_by_inversion() {
    let pline = polyline_closed![(0.0, 0.0, 0.4), (4.0, 0.0, 0.0), (4.0, 4.0, -0.2), (0.0, 4.0, 0.0)];
    let mut inverted = pline.clone();
    inverted.invert_direction_mut();
    assert_fuzzy_eq!(inverted.area(), -pline.area(), 1e-8);
    assert_eq!(pline.orientation(), PlineOrientation::CounterClockwise);
    assert_eq!(inverted.orientation(), PlineOrientation::Clockwise);
}

#[test]
fn scale_laws() {
    let pline = polyline_closed![(1.0, 1.0, 0.2), (4.0, 2.0, 0.0), (3.0, 5.0, -0.4)];

    // scale by 1 is identity
    let mut identity = pline.clone();
    identity.scale_mut(1.0);
    assert!(identity.fuzzy_eq(&pline));

    // scaling composes multiplicatively
    let mut composed = pline.clone();
    composed.scale_mut(2.0);
    composed.scale_mut(3.0);
    let mut direct = pline.clone();
    direct.scale_mut(6.0);
    assert!(composed.fuzzy_eq(&direct));

    // path length scales linearly, area quadratically
    assert_fuzzy_eq!(direct.path_length(), 6.0 * pline.path_length(), 1e-8);
    assert_fuzzy_eq!(direct.area(), 36.0 * pline.area(), 1e-6);
}

#[test]
fn translate_laws() {
    let pline = polyline_closed![(1.0, 1.0, 0.2), (4.0, 2.0, 0.0), (3.0, 5.0, -0.4)];

    // translation composes additively
    let mut composed = pline.clone();
    composed.translate_mut(2.0, -1.0);
    composed.translate_mut(-5.0, 4.0);
    let mut direct = pline.clone();
    direct.translate_mut(-3.0, 3.0);
    assert!(composed.fuzzy_eq(&direct));

    // area and path length invariant under translation
    assert_fuzzy_eq!(direct.area(), pline.area(), 1e-8);
    assert_fuzzy_eq!(direct.path_length(), pline.path_length(), 1e-8);
}

#[test]
fn closest_point_on_all_modified_forms() {
    let pline = polyline_closed![(0.0, 0.0, 0.0), (4.0, 0.0, 1.0), (4.0, 4.0, 0.0), (0.0, 4.0, 0.0)];
    // query point below the bottom edge, closest point is directly above it
    let query = Vec2::new(2.0, -3.0);
    visit_modified_plines(&pline, &mut |modified, _| {
        let r = modified.closest_point(query).unwrap();
        assert!(r.seg_point.fuzzy_eq_eps(Vec2::new(2.0, 0.0), 1e-8));
        assert_fuzzy_eq!(r.distance, 3.0, 1e-8);
    });
}

#[test]
fn arcs_to_lines_converges_in_path_length() {
    let circle: Polyline<f64> = polyline_closed![(0.0, 0.0, 1.0), (4.0, 0.0, 1.0)];
    let exact = circle.path_length();

    let mut prev_err = f64::MAX;
    for error_distance in [0.1, 0.01, 0.001] {
        let approx = circle.arcs_to_approx_lines(error_distance).unwrap();
        assert!(approx.iter_vertexes().all(|v| v.bulge == 0.0));
        let err = (approx.path_length() - exact).abs();
        assert!(err < prev_err);
        // chord approximations always undershoot
        assert!(approx.path_length() < exact);
        // area converges too
        assert!((approx.area() - circle.area()).abs() < 4.0 * error_distance * exact);
        prev_err = err;
    }
}

#[test]
fn prune_singularities_removes_repeats() {
    let pline = polyline_closed![
        (0.0, 0.0, 0.0),
        (2.0, 0.0, 0.5),
        (2.0, 0.0, 0.0),
        (2.0, 2.0, 0.0),
        (0.0, 2.0, 0.0),
        (0.0, 0.0, 0.0)
    ];
    let pruned = pline.prune_singularities(1e-5).unwrap();
    assert_eq!(pruned.vertex_count(), 4);
    // bulge of removed vertex is carried onto the retained one
    assert!(pruned[1].fuzzy_eq(Vertex::new(2.0, 0.0, 0.0)));
    assert_fuzzy_eq!(pruned.area(), 4.0, 1e-8);

    // already pruned input returns None
    assert!(pruned.prune_singularities(1e-5).is_none());
}

#[test]
fn textual_serialization_round_trip() {
    // the {x, y, bulge} triples plus closed flag form used by test tooling
    #[cfg(feature = "serde")]
    {
        let pline = polyline_closed![(0.0, 0.0, 0.5), (2.0, 0.0, 0.0), (2.0, 2.0, -1.0)];
        let json = serde_json::to_string(&pline).unwrap();
        let parsed: Polyline<f64> = serde_json::from_str(&json).unwrap();
        assert!(parsed.fuzzy_eq(&pline));
    }

    // manual construction equivalent regardless of feature flags
    let from_triples = Polyline::from_iter(
        [(0.0, 0.0, 0.5), (2.0, 0.0, 0.0), (2.0, 2.0, -1.0)]
            .iter()
            .map(|&(x, y, b)| Vertex::new(x, y, b)),
        true,
    );
    assert!(from_triples.fuzzy_eq(&polyline_closed![
        (0.0, 0.0, 0.5),
        (2.0, 0.0, 0.0),
        (2.0, 2.0, -1.0)
    ]));
}

#[test]
fn path_length_invariance_under_modified_forms() {
    let pline = polyline_closed![(0.0, 0.0, 0.4), (6.0, 0.0, 0.0), (6.0, 3.0, -0.2), (0.0, 3.0, 0.0)];
    let expected = pline.path_length();
    let expected_area = pline.area();
    visit_modified_plines(&pline, &mut |modified, inverted| {
        assert_fuzzy_eq!(modified.path_length(), expected, 1e-8);
        let area = if inverted { -modified.area() } else { modified.area() };
        assert_fuzzy_eq!(area, expected_area, 1e-8);
    });
}
