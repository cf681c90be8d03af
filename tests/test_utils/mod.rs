// shared across test binaries, not all helpers are used by every binary
#![allow(dead_code)]

use arcline::num::Fuzzy;
use arcline::polyline::Polyline;
use arcline::spatial::AABB;

/// Fuzzy compare AABB values.
pub fn aabb_fuzzy_eq_eps(a: &AABB<f64>, b: &AABB<f64>, eps: f64) -> bool {
    a.min_x.fuzzy_eq_eps(b.min_x, eps)
        && a.min_y.fuzzy_eq_eps(b.min_y, eps)
        && a.max_x.fuzzy_eq_eps(b.max_x, eps)
        && a.max_y.fuzzy_eq_eps(b.max_y, eps)
}

/// Set of polyline properties compared in tests (signed area, path length, and extents).
#[derive(Debug, Copy, Clone)]
pub struct PlineProperties {
    pub area: f64,
    pub path_length: f64,
    pub extents: AABB<f64>,
}

impl PlineProperties {
    /// Epsilon used when comparing properties.
    pub const PROP_CMP_EPS: f64 = 1e-4;

    pub fn new(area: f64, path_length: f64, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            area,
            path_length,
            extents: AABB::new(min_x, min_y, max_x, max_y),
        }
    }

    pub fn from_pline(pline: &Polyline<f64>, invert_area: bool) -> Self {
        let area = {
            let a = pline.area();
            if invert_area {
                -a
            } else {
                a
            }
        };

        Self {
            area,
            path_length: pline.path_length(),
            extents: pline.extents().expect("pline should have segments"),
        }
    }

    pub fn fuzzy_eq_eps(&self, other: &Self, eps: f64) -> bool {
        self.area.fuzzy_eq_eps(other.area, eps)
            && self.path_length.fuzzy_eq_eps(other.path_length, eps)
            && aabb_fuzzy_eq_eps(&self.extents, &other.extents, eps)
    }
}

pub fn create_property_set<'a, I>(polylines: I, invert_area: bool) -> Vec<PlineProperties>
where
    I: IntoIterator<Item = &'a Polyline<f64>>,
{
    polylines
        .into_iter()
        .map(|pl| PlineProperties::from_pline(pl, invert_area))
        .collect()
}

/// Compare two property sets without assuming order; each expected entry must match exactly one
/// result entry. Result sets are always small so quadratic comparing is fine.
pub fn property_sets_match(
    result_set: &[PlineProperties],
    expected_set: &[PlineProperties],
) -> bool {
    let mut sets_match = result_set.len() == expected_set.len();
    if sets_match {
        for expected in expected_set {
            let match_count = result_set
                .iter()
                .filter(|result| expected.fuzzy_eq_eps(result, PlineProperties::PROP_CMP_EPS))
                .count();

            if match_count != 1 {
                sets_match = false;
                break;
            }
        }
    }

    if !sets_match {
        eprintln!("result:\n{:?}", result_set);
        eprintln!("expected:\n{:?}", expected_set);
    }

    sets_match
}

/// Cycle all vertex index positions forward by `n` (closed polylines only). The polyline path is
/// unchanged, only the index of the starting vertex moves.
pub fn cycle_start_index_forward(input: &Polyline<f64>, n: usize) -> Polyline<f64> {
    assert!(n > 0 && n < input.vertex_count());
    assert!(input.is_closed());
    Polyline::from_iter(
        input
            .iter_vertexes()
            .cycle()
            .skip(n)
            .take(input.vertex_count()),
        true,
    )
}

/// Run `visitor` against the input polyline plus a set of modified but geometrically equivalent
/// forms of it (direction inverted, start index cycled) to catch order/direction dependent bugs.
/// The bool passed to the visitor is true when the polyline direction was inverted.
pub fn visit_modified_plines<F>(input: &Polyline<f64>, visitor: &mut F)
where
    F: FnMut(Polyline<f64>, bool),
{
    visitor(input.clone(), false);

    let mut inverted = input.clone();
    inverted.invert_direction_mut();
    visitor(inverted.clone(), true);

    if input.is_closed() {
        for i in 1..input.vertex_count() {
            visitor(cycle_start_index_forward(input, i), false);
        }

        for i in 1..inverted.vertex_count() {
            visitor(cycle_start_index_forward(&inverted, i), true);
        }
    }
}
