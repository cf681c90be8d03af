mod test_utils;

use arcline::polyline::{OffsetOptions, Polyline};
use arcline::{assert_fuzzy_eq, polyline_closed, polyline_open};
use std::f64::consts::PI;
use test_utils::{create_property_set, property_sets_match, visit_modified_plines, PlineProperties};

fn offset_into_properties_set(
    polyline: &Polyline<f64>,
    offset: f64,
    inverted: bool,
    handle_self_intersects: bool,
) -> Vec<PlineProperties> {
    let offset = if inverted { -offset } else { offset };
    let options = OffsetOptions {
        handle_self_intersects,
        ..Default::default()
    };
    let results = polyline.parallel_offset_opt(offset, &options);
    for r in results.iter() {
        assert!(
            r.prune_singularities(1e-5).is_none(),
            "offset result should not have repeat position vertexes"
        );
    }
    create_property_set(&results, inverted)
}

/// Run offset against the input and all equivalent modified forms of it, asserting the same
/// expected properties come out every time.
fn run_offset_tests(input: &Polyline<f64>, offset: f64, expected: &[PlineProperties]) {
    visit_modified_plines(input, &mut |modified, inverted| {
        let results = offset_into_properties_set(&modified, offset, inverted, false);
        assert!(
            property_sets_match(&results, expected),
            "property sets do not match (inverted: {})",
            inverted
        );

        if modified.is_closed() {
            // self intersect handling enabled should not change results for valid inputs
            let results = offset_into_properties_set(&modified, offset, inverted, true);
            assert!(
                property_sets_match(&results, expected),
                "property sets do not match with handle_self_intersects (inverted: {})",
                inverted
            );
        }
    });
}

#[test]
fn square_inward() {
    let square = polyline_closed![
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0)
    ];
    // inner corners trim to their mutual intersection points (sharp corners)
    let expected = &[PlineProperties::new(0.64, 3.2, 0.1, 0.1, 0.9, 0.9)];
    run_offset_tests(&square, 0.1, expected);
}

#[test]
fn square_outward() {
    let square = polyline_closed![
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0)
    ];
    // outer corners bridged with arcs of radius equal to the offset
    let expected = &[PlineProperties::new(
        1.0 + 4.0 * 0.1 + PI * 0.1 * 0.1,
        4.0 + 2.0 * PI * 0.1,
        -0.1,
        -0.1,
        1.1,
        1.1,
    )];
    run_offset_tests(&square, -0.1, expected);
}

#[test]
fn circle_inward_and_outward() {
    let circle = polyline_closed![(0.0, 0.0, 1.0), (10.0, 0.0, 1.0)];

    let inward = &[PlineProperties::new(16.0 * PI, 8.0 * PI, 1.0, -4.0, 9.0, 4.0)];
    run_offset_tests(&circle, 1.0, inward);

    let outward = &[PlineProperties::new(
        36.0 * PI,
        12.0 * PI,
        -1.0,
        -6.0,
        11.0,
        6.0,
    )];
    run_offset_tests(&circle, -1.0, outward);
}

#[test]
fn offset_collapses_to_empty() {
    let square = polyline_closed![
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0)
    ];
    visit_modified_plines(&square, &mut |modified, inverted| {
        let offset = if inverted { -0.6 } else { 0.6 };
        let results = modified.parallel_offset(offset);
        assert!(results.is_empty(), "fully collapsed offset should be empty");
    });

    // circle collapsed to nothing
    let circle = polyline_closed![(0.0, 0.0, 1.0), (2.0, 0.0, 1.0)];
    assert!(circle.parallel_offset(1.5).is_empty());
}

#[test]
fn convex_shape_offset_area_monotonic() {
    let square = polyline_closed![
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0)
    ];

    // inward offsets shrink monotonically, each producing exactly one polyline
    let mut prev_area = square.area();
    for offset in [0.05, 0.1, 0.2, 0.3, 0.4] {
        let results = square.parallel_offset(offset);
        assert_eq!(results.len(), 1);
        let area = results[0].area();
        assert!(area > 0.0 && area < prev_area);
        assert_fuzzy_eq!(area, (1.0 - 2.0 * offset) * (1.0 - 2.0 * offset), 1e-5);
        prev_area = area;
    }

    // outward offsets grow monotonically
    let mut prev_area = square.area();
    for offset in [0.05, 0.1, 0.2, 0.4, 0.8] {
        let results = square.parallel_offset(-offset);
        assert_eq!(results.len(), 1);
        let area = results[0].area();
        assert!(area > prev_area);
        prev_area = area;
    }
}

#[test]
fn open_line_segment_offset() {
    let line = polyline_open![(0.0, 0.0, 0.0), (4.0, 0.0, 0.0)];
    let results = line.parallel_offset(0.5);
    assert_eq!(results.len(), 1);
    let offset_line = &results[0];
    assert!(!offset_line.is_closed());
    assert_fuzzy_eq!(offset_line.path_length(), 4.0, 1e-5);
    let extents = offset_line.extents().unwrap();
    assert_fuzzy_eq!(extents.min_y, 0.5, 1e-5);
    assert_fuzzy_eq!(extents.max_y, 0.5, 1e-5);
}

#[test]
fn open_polyline_offset() {
    // right angle elbow
    let elbow = polyline_open![(0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (4.0, 4.0, 0.0)];

    // offset to the left of traversal (above/left side): inner side, corner trims
    let results = elbow.parallel_offset(0.5);
    assert_eq!(results.len(), 1);
    assert!(!results[0].is_closed());
    // two legs shortened by the trim: (4 - 0.5) + (4 - 0.5)
    assert_fuzzy_eq!(results[0].path_length(), 7.0, 1e-5);

    // offset to the right of traversal: outer side, corner bridged by quarter arc
    let results = elbow.parallel_offset(-0.5);
    assert_eq!(results.len(), 1);
    assert!(!results[0].is_closed());
    assert_fuzzy_eq!(results[0].path_length(), 8.0 + 0.5 * PI / 2.0, 1e-5);
}

#[test]
fn notched_rectangle_offset_splits_into_two() {
    // rectangle with a notch cut into the top edge leaving a thin waist below it
    let notched = polyline_closed![
        (0.0, 0.0, 0.0),
        (12.0, 0.0, 0.0),
        (12.0, 4.0, 0.0),
        (7.0, 4.0, 0.0),
        (7.0, 1.0, 0.0),
        (5.0, 1.0, 0.0),
        (5.0, 4.0, 0.0),
        (0.0, 4.0, 0.0)
    ];
    assert_fuzzy_eq!(notched.area(), 42.0, 1e-8);

    // small inward offset keeps one polyline: outer boundary shrunk, notch grown, reflex corners
    // rounded by arcs of the offset radius
    let results = notched.parallel_offset(0.25);
    assert_eq!(results.len(), 1);
    let expected_area = 32.75 + 2.0 * 0.25 * 0.25 * (1.0 - PI / 4.0);
    assert_fuzzy_eq!(results[0].area(), expected_area, 1e-3);

    // offsetting past half the waist height splits the result into two disjoint loops
    let results = notched.parallel_offset(0.75);
    assert_eq!(results.len(), 2);
    for r in results.iter() {
        assert!(r.is_closed());
        // each loop is approximately the 3.5 x 2.5 rectangle left on its side of the notch (plus
        // a small rounded sliver at the waist cut)
        assert!(r.area() > 8.74 && r.area() < 8.78, "area was {}", r.area());
    }
    let total: f64 = results.iter().map(|r| r.area()).sum();
    assert!(total > 17.49 && total < 17.55);
}

#[test]
fn zero_offset_reproduces_input_shape() {
    let pline = polyline_closed![(0.0, 0.0, 0.0), (4.0, 0.0, 1.0), (4.0, 4.0, 0.0), (0.0, 4.0, 0.0)];
    let results = pline.parallel_offset(0.0);
    assert_eq!(results.len(), 1);
    assert_fuzzy_eq!(results[0].area(), pline.area(), 1e-8);
    assert_fuzzy_eq!(results[0].path_length(), pline.path_length(), 1e-8);
}

#[test]
fn offset_with_arcs() {
    // stadium shape: two half circles joined by lines, all corners tangent
    let stadium = polyline_closed![(0.0, 0.0, 0.0), (4.0, 0.0, 1.0), (4.0, 2.0, 0.0), (0.0, 2.0, 1.0)];
    let expected_area = 4.0 * 2.0 + PI * 1.0;
    assert_fuzzy_eq!(stadium.area(), expected_area, 1e-8);

    // inward offset by 0.5: rectangle part 4 x 1 plus half circles of radius 0.5
    let results = stadium.parallel_offset(0.5);
    assert_eq!(results.len(), 1);
    assert_fuzzy_eq!(results[0].area(), 4.0 * 1.0 + PI * 0.25, 1e-5);
    assert_fuzzy_eq!(
        results[0].path_length(),
        2.0 * 4.0 + 2.0 * PI * 0.5,
        1e-5
    );

    // outward offset by 0.5: radius grows to 1.5
    let results = stadium.parallel_offset(-0.5);
    assert_eq!(results.len(), 1);
    assert_fuzzy_eq!(results[0].area(), 4.0 * 3.0 + PI * 2.25, 1e-5);
}
