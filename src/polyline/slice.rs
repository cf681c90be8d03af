//! Extraction of contiguous sub-polylines ("slices") from a source polyline.
//!
//! The offset and boolean engines cut polylines at intersect points and work with the resulting
//! open slices. Slices are materialized as owned open polylines; intermediate graphs refer to
//! them by index only.

use super::{seg_split_at_point, Polyline, Vertex};
use crate::math::{dist_squared, Vec2};
use crate::num::Real;

/// Materialize the open slice of `source` starting at `updated_start` (positioned on the segment
/// with start vertex index `start_index`, bulge already trimmed when the slice stays on that
/// segment) and ending at `end_point` on the segment with start vertex index `end_index`,
/// traversing `traverse_count` vertex index steps forward.
///
/// `traverse_count` must equal the forward wrapping index distance from `start_index` to
/// `end_index`, except it may equal the vertex count to select a full wrap of a closed source
/// (slice covering the entire loop).
///
/// Returns `None` when the slice collapses to a single point.
pub(crate) fn materialize_slice<T>(
    source: &Polyline<T>,
    start_index: usize,
    updated_start: Vertex<T>,
    end_point: Vec2<T>,
    end_index: usize,
    traverse_count: usize,
    pos_equal_eps: T,
) -> Option<Polyline<T>>
where
    T: Real,
{
    if traverse_count == 0 {
        // slice stays on a single segment, updated_start bulge already set by the caller
        if updated_start.pos().fuzzy_eq_eps(end_point, pos_equal_eps) {
            return None;
        }
        let mut result = Polyline::with_capacity(2, false);
        result.add_vertex(updated_start);
        result.add(end_point.x, end_point.y, T::zero());
        return Some(result);
    }

    let mut result = Polyline::with_capacity(traverse_count + 2, false);
    result.add_vertex(updated_start);

    // vertexes strictly between the start segment and the end segment
    for k in 1..traverse_count {
        let v = source[source.fwd_wrapping_index(start_index, k)];
        result.add_or_replace_vertex(v, pos_equal_eps);
    }

    let end_seg_start = source[end_index];
    if end_point.fuzzy_eq_eps(end_seg_start.pos(), pos_equal_eps) {
        // slice ends exactly at the end segment's start vertex
        result.add_or_replace(end_point.x, end_point.y, T::zero(), pos_equal_eps);
    } else {
        // trim the end segment's bulge to reach the end point
        let next = source[source.next_wrapping_index(end_index)];
        let split = seg_split_at_point(end_seg_start, next, end_point, pos_equal_eps);
        result.add_or_replace_vertex(split.updated_start, pos_equal_eps);
        result.add_or_replace(end_point.x, end_point.y, T::zero(), pos_equal_eps);
    }

    if result.vertex_count() < 2 {
        return None;
    }

    Some(result)
}

/// Materialize the open slice of `source` between two points lying on it.
///
/// `start_index`/`end_index` are the start vertex indexes of the segments the points lie on.
/// Start and end portions of those segments are trimmed away. Returns `None` when the slice
/// collapses to a single point.
pub(crate) fn extract_slice<T>(
    source: &Polyline<T>,
    start_point: Vec2<T>,
    start_index: usize,
    end_point: Vec2<T>,
    end_index: usize,
    pos_equal_eps: T,
) -> Option<Polyline<T>>
where
    T: Real,
{
    debug_assert!(
        start_index <= end_index || source.is_closed(),
        "open polyline slices can not wrap"
    );

    // advance the start index when the start point sits at the very end of its segment
    let (start_index, start_at_seg_end) = {
        if !source.is_closed() && start_index >= end_index {
            (start_index, false)
        } else {
            let next_index = source.next_wrapping_index(start_index);
            if source[next_index]
                .pos()
                .fuzzy_eq_eps(start_point, pos_equal_eps)
            {
                (next_index, true)
            } else {
                (start_index, false)
            }
        }
    };

    let traverse_count = source.fwd_wrapping_dist(start_index, end_index);

    let updated_start = {
        let start_v1 = source[start_index];
        let start_v2 = source[source.next_wrapping_index(start_index)];
        if start_at_seg_end {
            if traverse_count == 0 {
                // start and end on the same segment, trim to the end point
                seg_split_at_point(start_v1, start_v2, end_point, pos_equal_eps).updated_start
            } else {
                start_v1
            }
        } else {
            let for_start =
                seg_split_at_point(start_v1, start_v2, start_point, pos_equal_eps).split_vertex;
            if traverse_count == 0 {
                seg_split_at_point(for_start, start_v2, end_point, pos_equal_eps).updated_start
            } else {
                for_start
            }
        }
    };

    materialize_slice(
        source,
        start_index,
        updated_start,
        end_point,
        end_index,
        traverse_count,
        pos_equal_eps,
    )
}

/// Like [extract_slice] but aware of full wraps on a closed `source`: when both points land on
/// the same segment with `end_point` not ahead of `start_point`, the slice wraps the entire loop
/// (a polyline cut at a single point yields itself as one open slice).
pub(crate) fn extract_wrapping_slice<T>(
    source: &Polyline<T>,
    start_point: Vec2<T>,
    start_index: usize,
    end_point: Vec2<T>,
    end_index: usize,
    pos_equal_eps: T,
) -> Option<Polyline<T>>
where
    T: Real,
{
    debug_assert!(source.is_closed(), "wrapping slices require a closed source");

    // mirror the start index advance performed by extract_slice so the wrap test sees the same
    // segment assignment
    let (adjusted_start, at_seg_end) = {
        let next_index = source.next_wrapping_index(start_index);
        if source[next_index]
            .pos()
            .fuzzy_eq_eps(start_point, pos_equal_eps)
        {
            (next_index, true)
        } else {
            (start_index, false)
        }
    };

    if source.fwd_wrapping_dist(adjusted_start, end_index) != 0 {
        return extract_slice(
            source,
            start_point,
            start_index,
            end_point,
            end_index,
            pos_equal_eps,
        );
    }

    let anchor = source[adjusted_start].pos();
    if dist_squared(end_point, anchor) > dist_squared(start_point, anchor) {
        // end point ahead of the start on the shared segment, plain forward slice
        return extract_slice(
            source,
            start_point,
            start_index,
            end_point,
            end_index,
            pos_equal_eps,
        );
    }

    let v1 = source[adjusted_start];
    let v2 = source[source.next_wrapping_index(adjusted_start)];
    let updated_start = if at_seg_end || v1.pos().fuzzy_eq_eps(start_point, pos_equal_eps) {
        v1
    } else {
        seg_split_at_point(v1, v2, start_point, pos_equal_eps).split_vertex
    };

    materialize_slice(
        source,
        adjusted_start,
        updated_start,
        end_point,
        adjusted_start,
        source.vertex_count(),
        pos_equal_eps,
    )
}

/// Materialize the entire closed `source` as an open slice starting (and ending) at `point` lying
/// on the segment with start vertex index `seg_index`.
pub(crate) fn extract_loop_slice<T>(
    source: &Polyline<T>,
    point: Vec2<T>,
    seg_index: usize,
    pos_equal_eps: T,
) -> Option<Polyline<T>>
where
    T: Real,
{
    debug_assert!(source.is_closed(), "loop slice requires closed source");

    // advance index when point is at the very end of its segment
    let seg_index = {
        let next_index = source.next_wrapping_index(seg_index);
        if source[next_index].pos().fuzzy_eq_eps(point, pos_equal_eps) {
            next_index
        } else {
            seg_index
        }
    };

    let v1 = source[seg_index];
    let v2 = source[source.next_wrapping_index(seg_index)];
    let (updated_start, traverse_count) = if v1.pos().fuzzy_eq_eps(point, pos_equal_eps) {
        // point on the segment start vertex, whole loop from that vertex
        (v1, source.vertex_count())
    } else {
        let split = seg_split_at_point(v1, v2, point, pos_equal_eps);
        (split.split_vertex, source.vertex_count())
    };

    materialize_slice(
        source,
        seg_index,
        updated_start,
        point,
        seg_index,
        traverse_count,
        pos_equal_eps,
    )
}
