//! Discovery of polyline self intersects and intersects between two polylines.

use super::{
    extract_loop_slice, extract_slice, seg_fast_approx_bounding_box, seg_intr, seg_tangent_vector,
    BasicIntersect, FindIntersectsOptions, IntersectsCollection, OverlappingIntersect, Polyline,
    SegIntr,
};
use crate::math::dist_squared;
use crate::num::{Control, Real};
use crate::spatial::StaticSpatialIndex;
use std::collections::HashSet;

/// Self intersect record passed to the visit functions.
#[derive(Debug, Clone, Copy)]
pub(crate) enum SelfIntersect<T> {
    Basic(BasicIntersect<T>),
    Overlapping(OverlappingIntersect<T>),
}

/// Visit local self intersects: intersects between polyline segments that share a vertex.
pub(crate) fn visit_local_self_intersects<T, F>(
    pline: &Polyline<T>,
    visitor: &mut F,
    pos_equal_eps: T,
) -> Control
where
    T: Real,
    F: FnMut(SelfIntersect<T>) -> Control,
{
    let vc = pline.vertex_count();
    if vc < 2 {
        return Control::Continue;
    }

    if vc == 2 {
        if pline.is_closed() && pline[0].bulge.fuzzy_eq(-pline[1].bulge) {
            // closed two vertex polyline folding back onto itself
            return visitor(SelfIntersect::Overlapping(OverlappingIntersect::new(
                0,
                1,
                pline[0].pos(),
                pline[1].pos(),
            )));
        }
        return Control::Continue;
    }

    let mut visit_indexes = |i: usize, j: usize, k: usize| -> Control {
        let v1 = pline[i];
        let v2 = pline[j];
        let v3 = pline[k];

        // intersect between segments v1->v2 and v2->v3 (skipping the shared vertex v2)
        if v1.pos().fuzzy_eq_eps(v2.pos(), pos_equal_eps) {
            // singularity
            return visitor(SelfIntersect::Overlapping(OverlappingIntersect::new(
                i,
                j,
                v1.pos(),
                v2.pos(),
            )));
        }

        match seg_intr(v1, v2, v2, v3, pos_equal_eps) {
            SegIntr::NoIntersect => Control::Continue,
            SegIntr::TangentIntersect { point } | SegIntr::OneIntersect { point } => {
                if point.fuzzy_eq_eps(v2.pos(), pos_equal_eps) {
                    Control::Continue
                } else {
                    visitor(SelfIntersect::Basic(BasicIntersect::new(i, j, point)))
                }
            }
            SegIntr::TwoIntersects { point1, point2 } => {
                if !point1.fuzzy_eq_eps(v2.pos(), pos_equal_eps)
                    && visitor(SelfIntersect::Basic(BasicIntersect::new(i, j, point1)))
                        == Control::Break
                {
                    return Control::Break;
                }
                if !point2.fuzzy_eq_eps(v2.pos(), pos_equal_eps) {
                    return visitor(SelfIntersect::Basic(BasicIntersect::new(i, j, point2)));
                }
                Control::Continue
            }
            SegIntr::SegmentOverlap { point1, point2 } | SegIntr::ArcOverlap { point1, point2 } => {
                visitor(SelfIntersect::Overlapping(OverlappingIntersect::new(
                    i, j, point1, point2,
                )))
            }
        }
    };

    for i in 2..vc {
        if visit_indexes(i - 2, i - 1, i) == Control::Break {
            return Control::Break;
        }
    }

    if pline.is_closed() {
        // wrap around cases: [(n-2)->(n-1), (n-1)->0] and [(n-1)->0, 0->1]
        if visit_indexes(vc - 2, vc - 1, 0) == Control::Break {
            return Control::Break;
        }
        return visit_indexes(vc - 1, 0, 1);
    }

    Control::Continue
}

/// Visit global self intersects: intersects between polyline segments that do not share a vertex.
///
/// Spatial index accelerated; each segment pair is visited at most once. Intersects at the end
/// point of both segments are skipped (they are found again as the start point of the following
/// segments).
pub(crate) fn visit_global_self_intersects<T, F>(
    pline: &Polyline<T>,
    aabb_index: &StaticSpatialIndex<T>,
    visitor: &mut F,
    pos_equal_eps: T,
) -> Control
where
    T: Real,
    F: FnMut(SelfIntersect<T>) -> Control,
{
    let vc = pline.vertex_count();
    if vc < 3 {
        return Control::Continue;
    }

    // membership only set (never iterated) so determinism is unaffected
    let mut visited_pairs = HashSet::with_capacity(vc);
    let mut query_stack = Vec::with_capacity(8);

    let mut cf = Control::Continue;
    for (&i, aabb) in aabb_index
        .item_indices()
        .iter()
        .zip(aabb_index.item_boxes().iter())
    {
        let j = pline.next_wrapping_index(i);
        let v1 = pline[i];
        let v2 = pline[j];
        let mut query_visitor = |hit_i: usize| -> Control {
            let hit_j = pline.next_wrapping_index(hit_i);
            // skip segments sharing a vertex (local intersects)
            if i == hit_i || i == hit_j || j == hit_i || j == hit_j {
                return Control::Continue;
            }

            // skip pairs already visited from the other side
            if visited_pairs.contains(&(hit_i, i)) {
                return Control::Continue;
            }
            visited_pairs.insert((i, hit_i));

            let u1 = pline[hit_i];
            let u2 = pline[hit_j];

            let skip_intr_at_end = |intr| -> bool {
                v2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
                    && u2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
            };

            match seg_intr(v1, v2, u1, u2, pos_equal_eps) {
                SegIntr::NoIntersect => {}
                SegIntr::TangentIntersect { point } | SegIntr::OneIntersect { point } => {
                    if !skip_intr_at_end(point) {
                        cf = visitor(SelfIntersect::Basic(BasicIntersect::new(i, hit_i, point)));
                        if cf == Control::Break {
                            return Control::Break;
                        }
                    }
                }
                SegIntr::TwoIntersects { point1, point2 } => {
                    if !skip_intr_at_end(point1) {
                        cf = visitor(SelfIntersect::Basic(BasicIntersect::new(i, hit_i, point1)));
                        if cf == Control::Break {
                            return Control::Break;
                        }
                    }
                    if !skip_intr_at_end(point2) {
                        cf = visitor(SelfIntersect::Basic(BasicIntersect::new(i, hit_i, point2)));
                        if cf == Control::Break {
                            return Control::Break;
                        }
                    }
                }
                SegIntr::SegmentOverlap { point1, point2 }
                | SegIntr::ArcOverlap { point1, point2 } => {
                    if !skip_intr_at_end(point1) {
                        cf = visitor(SelfIntersect::Overlapping(OverlappingIntersect::new(
                            i, hit_i, point1, point2,
                        )));
                        if cf == Control::Break {
                            return Control::Break;
                        }
                    }
                }
            }

            Control::Continue
        };

        aabb_index.visit_query_with_stack(
            aabb.min_x - pos_equal_eps,
            aabb.min_y - pos_equal_eps,
            aabb.max_x + pos_equal_eps,
            aabb.max_y + pos_equal_eps,
            &mut query_visitor,
            &mut query_stack,
        );

        if cf == Control::Break {
            break;
        }
    }

    cf
}

/// Collect all self intersects (local and global) as basic intersects.
///
/// When `include_overlapping` is true each overlapping intersect contributes its two end points,
/// otherwise overlapping intersects are dropped.
pub(crate) fn all_self_intersects<T>(
    pline: &Polyline<T>,
    aabb_index: &StaticSpatialIndex<T>,
    include_overlapping: bool,
    pos_equal_eps: T,
) -> Vec<BasicIntersect<T>>
where
    T: Real,
{
    let mut intrs = Vec::new();
    let mut visitor = |intr: SelfIntersect<T>| -> Control {
        match intr {
            SelfIntersect::Basic(b) => intrs.push(b),
            SelfIntersect::Overlapping(o) => {
                if include_overlapping {
                    intrs.push(BasicIntersect::new(o.start_index1, o.start_index2, o.point1));
                    intrs.push(BasicIntersect::new(o.start_index1, o.start_index2, o.point2));
                }
            }
        }
        Control::Continue
    };

    visit_local_self_intersects(pline, &mut visitor, pos_equal_eps);
    visit_global_self_intersects(pline, aabb_index, &mut visitor, pos_equal_eps);

    intrs
}

/// Find all intersects between two polylines.
///
/// Overlapping intersect `point1` is always the point closest to the second segment's start.
/// Intersects at segment end points are recorded once, at the start of the following segment
/// (except at the final end point of an open polyline). Duplicates arising from overlaps ending
/// on vertexes are removed.
pub(crate) fn find_intersects<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    options: &FindIntersectsOptions<T>,
) -> IntersectsCollection<T>
where
    T: Real,
{
    let mut result = IntersectsCollection::new_empty();
    if pline1.vertex_count() < 2 || pline2.vertex_count() < 2 {
        return result;
    }

    let pos_equal_eps = options.pos_equal_eps;
    let constructed_index;
    let pline1_aabb_index = if let Some(x) = options.pline1_aabb_index {
        x
    } else {
        constructed_index = pline1.create_approx_spatial_index();
        &constructed_index
    };

    // track vertex indexes whose start point may duplicate an overlap end point
    let mut possible_duplicates1 = HashSet::<usize>::new();
    let mut possible_duplicates2 = HashSet::<usize>::new();

    // final segment start indexes of open polylines (intersects at the very end of an open
    // polyline have no following segment to record them at)
    let open1_last_idx = pline1.vertex_count() - 2;
    let open2_last_idx = pline2.vertex_count() - 2;

    let mut query_stack = Vec::with_capacity(8);

    for (i2, j2) in pline2.iter_segment_indexes() {
        let p2v1 = pline2[i2];
        let p2v2 = pline2[j2];
        let mut query_visitor = |i1: usize| -> Control {
            let j1 = pline1.next_wrapping_index(i1);
            let p1v1 = pline1[i1];
            let p1v2 = pline1[j1];

            let skip_intr_at_end = |intr| -> bool {
                (p1v2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
                    && (pline1.is_closed() || i1 != open1_last_idx))
                    || (p2v2.pos().fuzzy_eq_eps(intr, pos_equal_eps)
                        && (pline2.is_closed() || i2 != open2_last_idx))
            };

            match seg_intr(p1v1, p1v2, p2v1, p2v2, pos_equal_eps) {
                SegIntr::NoIntersect => {}
                SegIntr::TangentIntersect { point } | SegIntr::OneIntersect { point } => {
                    if !skip_intr_at_end(point) {
                        result
                            .basic_intersects
                            .push(BasicIntersect::new(i1, i2, point));
                    }
                }
                SegIntr::TwoIntersects { point1, point2 } => {
                    if !skip_intr_at_end(point1) {
                        result
                            .basic_intersects
                            .push(BasicIntersect::new(i1, i2, point1));
                    }
                    if !skip_intr_at_end(point2) {
                        result
                            .basic_intersects
                            .push(BasicIntersect::new(i1, i2, point2));
                    }
                }
                SegIntr::SegmentOverlap { point1, point2 }
                | SegIntr::ArcOverlap { point1, point2 } => {
                    result
                        .overlapping_intersects
                        .push(OverlappingIntersect::new(i1, i2, point1, point2));

                    if p1v2.pos().fuzzy_eq_eps(point1, pos_equal_eps)
                        || p1v2.pos().fuzzy_eq_eps(point2, pos_equal_eps)
                    {
                        possible_duplicates1.insert(pline1.next_wrapping_index(i1));
                    }
                    if p2v2.pos().fuzzy_eq_eps(point1, pos_equal_eps)
                        || p2v2.pos().fuzzy_eq_eps(point2, pos_equal_eps)
                    {
                        possible_duplicates2.insert(pline2.next_wrapping_index(i2));
                    }
                }
            }

            Control::Continue
        };

        let bb = seg_fast_approx_bounding_box(p2v1, p2v2);
        pline1_aabb_index.visit_query_with_stack(
            bb.min_x - pos_equal_eps,
            bb.min_y - pos_equal_eps,
            bb.max_x + pos_equal_eps,
            bb.max_y + pos_equal_eps,
            &mut query_visitor,
            &mut query_stack,
        );
    }

    if possible_duplicates1.is_empty() && possible_duplicates2.is_empty() {
        return result;
    }

    // remove basic intersects that duplicate overlap end points landing on vertexes
    let final_basic_intrs = result
        .basic_intersects
        .iter()
        .filter(|intr| {
            if possible_duplicates1.contains(&intr.start_index1)
                && intr
                    .point
                    .fuzzy_eq_eps(pline1[intr.start_index1].pos(), pos_equal_eps)
            {
                return false;
            }

            if possible_duplicates2.contains(&intr.start_index2)
                && intr
                    .point
                    .fuzzy_eq_eps(pline2[intr.start_index2].pos(), pos_equal_eps)
            {
                return false;
            }

            true
        })
        .copied()
        .collect();

    result.basic_intersects = final_basic_intrs;
    result
}

/// Maximal run of overlap between two polylines, materialized as an open polyline following
/// pline2's direction.
#[derive(Debug, Clone)]
pub(crate) struct OverlappingSlice<T> {
    /// Start segment indexes of the run in (pline1, pline2).
    pub start_indexes: (usize, usize),
    /// End segment indexes of the run in (pline1, pline2).
    pub end_indexes: (usize, usize),
    /// The overlap path (open polyline in pline2's direction).
    pub pline: Polyline<T>,
    /// True when the overlap closes on itself (the polylines entirely overlap).
    pub is_loop: bool,
    /// True when the two polylines traverse the overlap in opposite directions.
    pub opposing_directions: bool,
}

impl<T> OverlappingSlice<T>
where
    T: Real,
{
    fn new(
        pline1: &Polyline<T>,
        pline2: &Polyline<T>,
        start_intr: &OverlappingIntersect<T>,
        end_intr: Option<&OverlappingIntersect<T>>,
        pos_equal_eps: T,
    ) -> Self {
        let start_v1 = pline1[start_intr.start_index1];
        let start_v2 = pline1[pline1.next_wrapping_index(start_intr.start_index1)];
        let start_u1 = pline2[start_intr.start_index2];
        let start_u2 = pline2[pline2.next_wrapping_index(start_intr.start_index2)];

        let opposing_directions = {
            // tangent directions either agree or oppose along the whole overlap, test at point1
            let t1 = seg_tangent_vector(start_v1, start_v2, start_intr.point1);
            let t2 = seg_tangent_vector(start_u1, start_u2, start_intr.point1);
            t1.dot(t2) < T::zero()
        };

        let start_indexes = (start_intr.start_index1, start_intr.start_index2);

        match end_intr {
            None => {
                // single overlapping intersect, all on one pline2 segment
                let pline = extract_slice(
                    pline2,
                    start_intr.point1,
                    start_intr.start_index2,
                    start_intr.point2,
                    start_intr.start_index2,
                    pos_equal_eps,
                )
                .expect("overlap end points are distinct");

                Self {
                    start_indexes,
                    end_indexes: start_indexes,
                    pline,
                    is_loop: false,
                    opposing_directions,
                }
            }
            Some(end_intr) => {
                if end_intr
                    .point2
                    .fuzzy_eq_eps(start_intr.point1, pos_equal_eps)
                {
                    // overlap closes on itself (entirely overlapping polylines)
                    let pline = extract_loop_slice(
                        pline2,
                        start_intr.point1,
                        start_intr.start_index2,
                        pos_equal_eps,
                    )
                    .expect("closed source has segments");

                    Self {
                        start_indexes,
                        end_indexes: start_indexes,
                        pline,
                        is_loop: true,
                        opposing_directions,
                    }
                } else {
                    let pline = extract_slice(
                        pline2,
                        start_intr.point1,
                        start_intr.start_index2,
                        end_intr.point2,
                        end_intr.start_index2,
                        pos_equal_eps,
                    )
                    .expect("overlap end points are distinct");

                    Self {
                        start_indexes,
                        end_indexes: (end_intr.start_index1, end_intr.start_index2),
                        pline,
                        is_loop: false,
                        opposing_directions,
                    }
                }
            }
        }
    }
}

/// Sort overlapping `intersects` along pline2's direction and join runs of connected overlaps
/// into [OverlappingSlice]s.
///
/// Assumes each intersect's `point1` is closest to the start of its pline2 segment (the
/// convention used by [find_intersects]).
pub(crate) fn sort_and_join_overlapping_intersects<T>(
    intersects: &mut [OverlappingIntersect<T>],
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    pos_equal_eps: T,
) -> Vec<OverlappingSlice<T>>
where
    T: Real,
{
    let mut result = Vec::new();

    if intersects.is_empty() {
        return result;
    }

    debug_assert!(
        intersects.iter().all(|intr| {
            let start = pline2[intr.start_index2].pos();
            dist_squared(start, intr.point1) <= dist_squared(start, intr.point2)
        }),
        "expected point1 closest to pline2 segment start"
    );

    // order along pline2: segment index, then distance from the segment start
    intersects.sort_unstable_by(|a, b| {
        a.start_index2.cmp(&b.start_index2).then_with(|| {
            let start = pline2[a.start_index2].pos();
            let dist1 = dist_squared(start, a.point1);
            let dist2 = dist_squared(start, b.point1);
            dist1.partial_cmp(&dist2).unwrap()
        })
    });

    let mut start_intr = &intersects[0];
    let mut end_intr = None;
    let mut current_end_point = start_intr.point2;

    for intr in intersects.iter().skip(1) {
        if !intr.point1.fuzzy_eq_eps(current_end_point, pos_equal_eps) {
            // run broken, cap off the current slice
            result.push(OverlappingSlice::new(
                pline1,
                pline2,
                start_intr,
                end_intr,
                pos_equal_eps,
            ));
            start_intr = intr;
            end_intr = None;
        } else {
            end_intr = Some(intr);
        }

        current_end_point = intr.point2;
    }

    result.push(OverlappingSlice::new(
        pline1,
        pline2,
        start_intr,
        end_intr,
        pos_equal_eps,
    ));

    if result.len() > 1 {
        // the last run may wrap around and connect to the first
        let last_end = result.last().unwrap().pline.last().unwrap().pos();
        let first_start = result[0].pline[0].pos();
        if last_end.fuzzy_eq_eps(first_start, pos_equal_eps) {
            let last_slice = result.pop().unwrap();
            let first_slice = &mut result[0];
            let mut joined = last_slice.pline;
            joined.extend_remove_repeat(&first_slice.pline, pos_equal_eps);
            first_slice.pline = joined;
            first_slice.start_indexes = last_slice.start_indexes;
        }
    }

    result
}


#[cfg(test)]
mod find_intersects_tests {
    use super::*;
    use crate::math::Vec2;

    #[test]
    fn open_polylines_end_touch_start() {
        let pline1 = polyline_open![(0.0, 0.0, 0.0), (1.0, 1.0, 0.0)];
        let pline2 = polyline_open![(-1.0, -1.0, 0.0), (0.0, 0.0, 0.0)];

        let intrs = find_intersects(&pline1, &pline2, &Default::default());
        assert_eq!(intrs.basic_intersects.len(), 1);
        assert!(intrs.overlapping_intersects.is_empty());
        assert_eq!(intrs.basic_intersects[0].start_index1, 0);
        assert_eq!(intrs.basic_intersects[0].start_index2, 0);
        assert!(intrs.basic_intersects[0]
            .point
            .fuzzy_eq_eps(Vec2::new(0.0, 0.0), 1e-5));
    }

    #[test]
    fn circles_touching() {
        let pline1 = polyline_closed![(0.0, 0.0, 1.0), (1.0, 0.0, 1.0)];
        let pline2 = polyline_closed![(1.0, 0.0, 1.0), (2.0, 0.0, 1.0)];

        let intrs = find_intersects(&pline1, &pline2, &Default::default());
        assert_eq!(intrs.basic_intersects.len(), 1);
        assert!(intrs.overlapping_intersects.is_empty());
        assert!(intrs.basic_intersects[0]
            .point
            .fuzzy_eq_eps(Vec2::new(1.0, 0.0), 1e-5));
    }

    #[test]
    fn identical_circles_fully_overlap() {
        let pline1 = polyline_closed![(0.0, 0.0, 1.0), (1.0, 0.0, 1.0)];
        let pline2 = pline1.clone();

        let intrs = find_intersects(&pline1, &pline2, &Default::default());
        assert!(intrs.basic_intersects.is_empty());
        assert_eq!(intrs.overlapping_intersects.len(), 2);
    }

    #[test]
    fn crossing_squares() {
        let a = polyline_closed![
            (0.0, 0.0, 0.0),
            (2.0, 0.0, 0.0),
            (2.0, 2.0, 0.0),
            (0.0, 2.0, 0.0)
        ];
        let b = polyline_closed![
            (1.0, 1.0, 0.0),
            (3.0, 1.0, 0.0),
            (3.0, 3.0, 0.0),
            (1.0, 3.0, 0.0)
        ];
        let intrs = find_intersects(&a, &b, &Default::default());
        assert_eq!(intrs.basic_intersects.len(), 2);
        assert!(intrs.overlapping_intersects.is_empty());
        let mut points: Vec<_> = intrs.basic_intersects.iter().map(|i| i.point).collect();
        points.sort_by(|p1, p2| p1.x.partial_cmp(&p2.x).unwrap());
        assert!(points[0].fuzzy_eq_eps(Vec2::new(1.0, 2.0), 1e-5));
        assert!(points[1].fuzzy_eq_eps(Vec2::new(2.0, 1.0), 1e-5));
    }
}
