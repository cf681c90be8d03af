//! Parallel offset engine.
//!
//! Offsetting runs in stages: every segment is offset in isolation into an [OffsetSeg] carrying
//! its supporting geometry (line, or arc center/radius/direction), each junction between
//! consecutive offset segments is resolved independently into a [Junction] decision (trim to a
//! meeting point, bridge the gap, or nothing), and the resolved segments are emitted as the raw
//! offset polyline with all arc bulges derived from final start/end points in one pass. The raw
//! offset polyline is then cut at a flat sorted table of self intersection points, slices that
//! come too close to the original polyline are discarded, and the survivors are stitched back
//! together by matching end points in traversal order.

use super::{
    extract_slice, extract_wrapping_slice, intersects::all_self_intersects,
    seg_arc_radius_and_center, seg_closest_point, seg_fast_approx_bounding_box, seg_intr,
    seg_midpoint, FindIntersectsOptions, OffsetOptions, Polyline, SegIntr, Vertex,
};
use crate::intersect::{
    circle_circle_intr, line_circle_intr, line_line_intr, CircleCircleIntr, LineCircleIntr,
    LineLineIntr,
};
use crate::math::{
    angle, bulge_from_angle, delta_angle_signed, dist_squared, point_from_parametric,
    point_within_arc_sweep, Vec2,
};
use crate::num::{Control, Real};
use crate::spatial::{SpatialIndexBuilder, StaticSpatialIndex};

/// Supporting geometry of an offset segment.
#[derive(Debug, Copy, Clone)]
enum SegShape<T> {
    Line,
    Arc {
        radius: T,
        center: Vec2<T>,
        ccw: bool,
    },
}

/// One segment offset in isolation, before junction resolution.
#[derive(Debug, Copy, Clone)]
struct OffsetSeg<T> {
    start: Vec2<T>,
    end: Vec2<T>,
    shape: SegShape<T>,
    /// Original end vertex position (junction arc center and trim reference).
    pivot: Vec2<T>,
    /// True when an arc's radius collapsed to zero or below (turned into a line, removed later
    /// by slice filtering).
    collapsed: bool,
}

/// Offset every segment of `polyline` in isolation.
fn offset_segments<T>(polyline: &Polyline<T>, offset: T) -> Vec<OffsetSeg<T>>
where
    T: Real,
{
    polyline
        .iter_segments()
        .map(|(v1, v2)| {
            if v1.bulge_is_zero() {
                let shift = (v2.pos() - v1.pos()).unit_perp() * offset;
                return OffsetSeg {
                    start: v1.pos() + shift,
                    end: v2.pos() + shift,
                    shape: SegShape::Line,
                    pivot: v2.pos(),
                    collapsed: false,
                };
            }

            let (radius, center) = seg_arc_radius_and_center(v1, v2);
            // radius grows when the offset direction and arc direction agree, shrinks otherwise
            let growth = if v1.bulge_is_neg() { offset } else { -offset };
            let new_radius = radius + growth;
            let collapsed = new_radius.fuzzy_lt(T::zero());

            OffsetSeg {
                start: v1.pos() + (v1.pos() - center).normalize() * growth,
                end: v2.pos() + (v2.pos() - center).normalize() * growth,
                shape: if collapsed {
                    SegShape::Line
                } else {
                    SegShape::Arc {
                        radius: new_radius,
                        center,
                        ccw: v1.bulge_is_pos(),
                    }
                },
                pivot: v2.pos(),
                collapsed,
            }
        })
        .collect()
}

/// Resolution of the junction between two consecutive offset segments.
#[derive(Debug, Copy, Clone)]
enum Junction<T> {
    /// Trim both segments to a shared meeting point.
    Meet { point: Vec2<T> },
    /// Keep both end points and bridge the gap with an arc centered on the junction pivot.
    BridgeArc,
    /// Keep both end points and connect them with a straight line.
    BridgeLine,
    /// End points already coincide (e.g. concentric arcs), nothing to do.
    Flush,
}

/// True when parametric value `t` lies within the segment (no extension required).
#[inline]
fn within_seg_param<T>(t: T) -> bool
where
    T: Real,
{
    t >= T::zero() && t <= T::one()
}

#[inline]
fn on_arc_sweep<T>(s: &OffsetSeg<T>, point: Vec2<T>) -> bool
where
    T: Real,
{
    match s.shape {
        SegShape::Line => false,
        SegShape::Arc { center, ccw, .. } => {
            point_within_arc_sweep(center, s.start, s.end, !ccw, point)
        }
    }
}

/// Decide how segments `a` and `b` (in traversal order, sharing the original vertex `a.pivot`)
/// connect in the raw offset polyline.
fn resolve_junction<T>(a: &OffsetSeg<T>, b: &OffsetSeg<T>, pos_equal_eps: T) -> Junction<T>
where
    T: Real,
{
    use Junction::*;

    match (a.shape, b.shape) {
        (SegShape::Line, SegShape::Line) => {
            if a.collapsed || b.collapsed {
                // never trim against a collapsed arc stand-in
                return BridgeArc;
            }

            match line_line_intr(a.start, a.end, b.start, b.end, pos_equal_eps) {
                LineLineIntr::TrueIntersect { seg1_t, .. } => Meet {
                    point: point_from_parametric(a.start, a.end, seg1_t),
                },
                LineLineIntr::Coincident { .. } => Meet { point: a.end },
                LineLineIntr::NoIntersect => BridgeArc,
                LineLineIntr::FalseIntersect { seg1_t, seg2_t } => {
                    if seg1_t > T::one() && !within_seg_param(seg2_t) {
                        // offsets diverge past the junction
                        BridgeArc
                    } else {
                        BridgeLine
                    }
                }
            }
        }
        (SegShape::Line, SegShape::Arc { radius, center, .. }) => {
            let pick = |t: T| -> Junction<T> {
                let point = point_from_parametric(a.start, a.end, t);
                let arc_hit = on_arc_sweep(b, point);
                if within_seg_param(t) && arc_hit {
                    Meet { point }
                } else if (t > T::one() && !arc_hit) || a.collapsed {
                    BridgeArc
                } else {
                    BridgeLine
                }
            };

            match line_circle_intr(a.start, a.end, radius, center, pos_equal_eps) {
                LineCircleIntr::NoIntersect => BridgeArc,
                LineCircleIntr::TangentIntersect { t0 } => pick(t0),
                LineCircleIntr::TwoIntersects { t0, t1 } => {
                    // trim with the root nearest the original junction vertex
                    let d0 = dist_squared(point_from_parametric(a.start, a.end, t0), a.pivot);
                    let d1 = dist_squared(point_from_parametric(a.start, a.end, t1), a.pivot);
                    pick(if d0 < d1 { t0 } else { t1 })
                }
            }
        }
        (SegShape::Arc { radius, center, .. }, SegShape::Line) => {
            let pick = |t: T| -> Junction<T> {
                let point = point_from_parametric(b.start, b.end, t);
                if within_seg_param(t) && on_arc_sweep(a, point) {
                    Meet { point }
                } else {
                    BridgeArc
                }
            };

            match line_circle_intr(b.start, b.end, radius, center, pos_equal_eps) {
                LineCircleIntr::NoIntersect => BridgeArc,
                LineCircleIntr::TangentIntersect { t0 } => pick(t0),
                LineCircleIntr::TwoIntersects { t0, t1 } => {
                    // reference point for picking the root: the collapsed arc stand-in keeps its
                    // own start, otherwise the original junction vertex
                    let reference = if b.collapsed { b.start } else { a.pivot };
                    let d0 = dist_squared(point_from_parametric(b.start, b.end, t0), reference);
                    let d1 = dist_squared(point_from_parametric(b.start, b.end, t1), reference);
                    pick(if d0 < d1 { t0 } else { t1 })
                }
            }
        }
        (
            SegShape::Arc {
                radius: radius_a,
                center: center_a,
                ..
            },
            SegShape::Arc {
                radius: radius_b,
                center: center_b,
                ..
            },
        ) => {
            let on_both = |p: Vec2<T>| on_arc_sweep(a, p) && on_arc_sweep(b, p);
            let pick = |p: Vec2<T>, hit: bool| -> Junction<T> {
                if hit {
                    Meet { point: p }
                } else {
                    BridgeArc
                }
            };

            match circle_circle_intr(radius_a, center_a, radius_b, center_b, pos_equal_eps) {
                CircleCircleIntr::NoIntersect => BridgeArc,
                CircleCircleIntr::TangentIntersect { point } => pick(point, on_both(point)),
                CircleCircleIntr::TwoIntersects { point1, point2 } => {
                    let d1 = dist_squared(point1, a.pivot);
                    let d2 = dist_squared(point2, a.pivot);
                    if d1.fuzzy_eq(d2) {
                        // arcs meeting at a tangent point yield equidistant roots, preferring the
                        // one on both sweeps avoids planting a self intersect in the raw offset
                        if on_both(point1) {
                            Meet { point: point1 }
                        } else {
                            pick(point2, on_both(point2))
                        }
                    } else if d1 < d2 {
                        pick(point1, on_both(point1))
                    } else {
                        pick(point2, on_both(point2))
                    }
                }
                CircleCircleIntr::Overlapping => Flush,
            }
        }
    }
}

/// Create the raw offset polyline: offset all segments, resolve all junctions, emit.
///
/// The result may self intersect, slice extraction and validity filtering deal with that.
pub(crate) fn create_raw_offset_polyline<T>(
    polyline: &Polyline<T>,
    offset: T,
    pos_equal_eps: T,
) -> Polyline<T>
where
    T: Real,
{
    if polyline.vertex_count() < 2 {
        return Polyline::new();
    }

    let mut segs = offset_segments(polyline, offset);
    if segs.is_empty() || (segs.len() == 1 && segs[0].collapsed) {
        return Polyline::new();
    }

    let seg_count = segs.len();
    let is_closed = polyline.is_closed();
    let junction_count = if is_closed { seg_count } else { seg_count - 1 };

    // junctions resolve against the untrimmed segments, trims apply afterwards
    let raw = segs.clone();
    let mut bridges: Vec<Option<Junction<T>>> = vec![None; junction_count];
    for (j, bridge) in bridges.iter_mut().enumerate() {
        let next = (j + 1) % seg_count;
        match resolve_junction(&raw[j], &raw[next], pos_equal_eps) {
            Junction::Meet { point } => {
                segs[j].end = point;
                segs[next].start = point;
            }
            Junction::Flush => {}
            kind => *bridge = Some(kind),
        }
    }

    // connection arcs bend counter clockwise for negative offsets
    let connection_ccw = offset < T::zero();

    let seg_bulge = |s: &OffsetSeg<T>| -> T {
        match s.shape {
            SegShape::Line => T::zero(),
            SegShape::Arc { center, ccw, .. } => bulge_from_angle(delta_angle_signed(
                angle(center, s.start),
                angle(center, s.end),
                !ccw,
            )),
        }
    };

    let mut result = Polyline::with_capacity(seg_count, is_closed);
    for (k, seg) in segs.iter().enumerate() {
        result.add_or_replace_vertex(Vertex::from_vec2(seg.start, seg_bulge(seg)), pos_equal_eps);

        if let Some(Some(kind)) = bridges.get(k) {
            let next_start = segs[(k + 1) % seg_count].start;
            let bridge_bulge = match kind {
                Junction::BridgeLine => T::zero(),
                _ => bulge_from_angle(delta_angle_signed(
                    angle(seg.pivot, seg.end),
                    angle(seg.pivot, next_start),
                    !connection_ccw,
                )),
            };
            result.add_or_replace(seg.end.x, seg.end.y, bridge_bulge, pos_equal_eps);
        }
    }

    if is_closed {
        // degenerate junctions may stack the seam vertexes on top of each other
        if result.vertex_count() > 1
            && result[0]
                .pos()
                .fuzzy_eq_eps(result.last().unwrap().pos(), pos_equal_eps)
        {
            result.remove_last();
        }
    } else {
        let last_end = segs.last().unwrap().end;
        result.add_or_replace(last_end.x, last_end.y, T::zero(), pos_equal_eps);
    }

    if result.vertex_count() < 2 {
        result.clear();
    }

    result
}

/// Test if `point` keeps the required clearance (`|offset|` within `offset_tol`) from every
/// nearby segment of `polyline`.
fn point_has_clearance<T>(
    polyline: &Polyline<T>,
    aabb_index: &StaticSpatialIndex<T>,
    offset: T,
    point: Vec2<T>,
    offset_tol: T,
    query_stack: &mut Vec<usize>,
) -> bool
where
    T: Real,
{
    let clearance = offset.abs() - offset_tol;
    let min_dist_sq = clearance * clearance;

    let mut clear = true;
    aabb_index.visit_query_with_stack(
        point.x - clearance,
        point.y - clearance,
        point.x + clearance,
        point.y + clearance,
        &mut |i: usize| {
            let j = polyline.next_wrapping_index(i);
            let nearest = seg_closest_point(polyline[i], polyline[j], point);
            if dist_squared(nearest, point) <= min_dist_sq {
                clear = false;
                Control::Break
            } else {
                Control::Continue
            }
        },
        query_stack,
    );

    clear
}

/// Test a slice of the raw offset polyline for validity: every probed point must keep the offset
/// clearance from the original polyline and no slice segment may cross it.
fn offset_slice_is_valid<T>(
    slice: &Polyline<T>,
    original_polyline: &Polyline<T>,
    orig_polyline_index: &StaticSpatialIndex<T>,
    offset: T,
    offset_dist_eps: T,
    pos_equal_eps: T,
    query_stack: &mut Vec<usize>,
) -> bool
where
    T: Real,
{
    let vc = slice.vertex_count();
    if vc < 2 {
        return false;
    }

    // probe set: both boundary segment midpoints plus every vertex position
    let mut probes: Vec<Vec2<T>> = Vec::with_capacity(vc + 2);
    probes.push(seg_midpoint(slice[0], slice[1]));
    probes.push(seg_midpoint(slice[vc - 2], slice[vc - 1]));
    probes.extend(slice.iter_vertexes().map(|v| v.pos()));

    if !probes.iter().all(|&p| {
        point_has_clearance(
            original_polyline,
            orig_polyline_index,
            offset,
            p,
            offset_dist_eps,
            query_stack,
        )
    }) {
        return false;
    }

    // no slice segment may touch the original polyline
    let fuzz = T::fuzzy_epsilon();
    slice.iter_segments().all(|(v1, v2)| {
        let bb = seg_fast_approx_bounding_box(v1, v2).expanded(fuzz);
        let mut crosses = false;
        orig_polyline_index.visit_query_with_stack(
            bb.min_x,
            bb.min_y,
            bb.max_x,
            bb.max_y,
            &mut |i: usize| {
                let j = original_polyline.next_wrapping_index(i);
                if matches!(
                    seg_intr(v1, v2, original_polyline[i], original_polyline[j], pos_equal_eps),
                    SegIntr::NoIntersect
                ) {
                    Control::Continue
                } else {
                    crosses = true;
                    Control::Break
                }
            },
            query_stack,
        );
        !crosses
    })
}

/// A point where the raw offset polyline must be cut, addressed by segment index and distance
/// from the segment's start vertex.
#[derive(Debug, Copy, Clone)]
struct Cut<T> {
    seg_index: usize,
    dist_key: T,
    point: Vec2<T>,
}

impl<T> Cut<T>
where
    T: Real,
{
    fn at(raw_offset: &Polyline<T>, seg_index: usize, point: Vec2<T>) -> Self {
        Cut {
            seg_index,
            dist_key: dist_squared(point, raw_offset[seg_index].pos()),
            point,
        }
    }
}

/// Sort cuts into traversal order along the polyline.
fn sort_cuts<T>(cuts: &mut [Cut<T>])
where
    T: Real,
{
    cuts.sort_unstable_by(|a, b| {
        a.seg_index
            .cmp(&b.seg_index)
            .then_with(|| a.dist_key.partial_cmp(&b.dist_key).unwrap())
    });
}

/// Materialize all slices between consecutive cuts (wrapping when `wrap` is set) and keep the
/// ones passing the clearance filter. Slices come out in traversal order.
#[allow(clippy::too_many_arguments)]
fn slices_between_cuts<T>(
    raw_offset_polyline: &Polyline<T>,
    cuts: &[Cut<T>],
    wrap: bool,
    original_polyline: &Polyline<T>,
    orig_polyline_index: &StaticSpatialIndex<T>,
    offset: T,
    options: &OffsetOptions<T>,
    query_stack: &mut Vec<usize>,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    let mut result = Vec::new();
    let pair_count = if wrap {
        cuts.len()
    } else {
        cuts.len().saturating_sub(1)
    };

    for w in 0..pair_count {
        let a = &cuts[w];
        let b = &cuts[(w + 1) % cuts.len()];

        // the final wrapping pair may span the entire loop (all cuts on one segment), but when
        // it collapses onto another cut point it is a degenerate duplicate instead
        let slice = if wrap && w + 1 == cuts.len() {
            if cuts.len() > 1 && a.point.fuzzy_eq_eps(b.point, options.pos_equal_eps) {
                None
            } else {
                extract_wrapping_slice(
                    raw_offset_polyline,
                    a.point,
                    a.seg_index,
                    b.point,
                    b.seg_index,
                    options.pos_equal_eps,
                )
            }
        } else {
            extract_slice(
                raw_offset_polyline,
                a.point,
                a.seg_index,
                b.point,
                b.seg_index,
                options.pos_equal_eps,
            )
        };

        if let Some(slice) = slice {
            if offset_slice_is_valid(
                &slice,
                original_polyline,
                orig_polyline_index,
                offset,
                options.offset_dist_eps,
                options.pos_equal_eps,
                query_stack,
            ) {
                result.push(slice);
            }
        }
    }

    result
}

/// Materialize the whole raw offset polyline as one open slice (closed loops become an open path
/// ending back on the start point).
fn whole_pline_slice<T>(raw_offset_polyline: &Polyline<T>) -> Polyline<T>
where
    T: Real,
{
    let vc = raw_offset_polyline.vertex_count();
    let mut pline = Polyline::with_capacity(vc + 1, false);
    for v in raw_offset_polyline.iter_vertexes() {
        pline.add_vertex(v);
    }
    if raw_offset_polyline.is_closed() {
        let first = raw_offset_polyline[0];
        pline.add(first.x, first.y, T::zero());
    }

    pline
}

/// Cut the raw offset polyline at its self intersects and filter the slices by clearance from
/// the original polyline. Closed inputs without self intersect handling.
fn slices_from_raw_offset<T>(
    original_polyline: &Polyline<T>,
    raw_offset_polyline: &Polyline<T>,
    orig_polyline_index: &StaticSpatialIndex<T>,
    offset: T,
    options: &OffsetOptions<T>,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    debug_assert!(
        raw_offset_polyline.is_closed(),
        "expected closed raw offset polyline, open inputs go through the dual offset path"
    );

    if raw_offset_polyline.vertex_count() < 2 {
        return Vec::new();
    }

    let pos_equal_eps = options.pos_equal_eps;
    let raw_offset_index = raw_offset_polyline.create_approx_spatial_index();
    let self_intrs =
        all_self_intersects(raw_offset_polyline, &raw_offset_index, true, pos_equal_eps);

    let mut query_stack = Vec::with_capacity(8);
    if self_intrs.is_empty() {
        // no self intersects, the raw offset polyline is the single candidate
        if !point_has_clearance(
            original_polyline,
            orig_polyline_index,
            offset,
            raw_offset_polyline[0].pos(),
            options.offset_dist_eps,
            &mut query_stack,
        ) {
            return Vec::new();
        }

        return vec![whole_pline_slice(raw_offset_polyline)];
    }

    // every self intersect cuts both involved segments
    let mut cuts = Vec::with_capacity(2 * self_intrs.len());
    for si in &self_intrs {
        cuts.push(Cut::at(raw_offset_polyline, si.start_index1, si.point));
        cuts.push(Cut::at(raw_offset_polyline, si.start_index2, si.point));
    }
    sort_cuts(&mut cuts);

    slices_between_cuts(
        raw_offset_polyline,
        &cuts,
        true,
        original_polyline,
        orig_polyline_index,
        offset,
        options,
        &mut query_stack,
    )
}

/// Collect cuts where the end cap circle of an open polyline's offset crosses the raw offset
/// polyline. Roots at a segment's start point are skipped (they repeat as the previous segment's
/// end).
fn collect_cap_cuts<T>(
    raw_offset_polyline: &Polyline<T>,
    raw_offset_index: &StaticSpatialIndex<T>,
    cap_center: Vec2<T>,
    cap_radius: T,
    pos_equal_eps: T,
    cuts: &mut Vec<Cut<T>>,
) where
    T: Real,
{
    for seg_index in raw_offset_index.query(
        cap_center.x - cap_radius,
        cap_center.y - cap_radius,
        cap_center.x + cap_radius,
        cap_center.y + cap_radius,
    ) {
        let v1 = raw_offset_polyline[seg_index];
        let v2 = raw_offset_polyline[raw_offset_polyline.next_wrapping_index(seg_index)];

        if v1.bulge_is_zero() {
            let mut add_root = |t: T| {
                if within_seg_param(t) && t.abs() > pos_equal_eps {
                    let p = point_from_parametric(v1.pos(), v2.pos(), t);
                    cuts.push(Cut::at(raw_offset_polyline, seg_index, p));
                }
            };
            match line_circle_intr(v1.pos(), v2.pos(), cap_radius, cap_center, pos_equal_eps) {
                LineCircleIntr::NoIntersect => {}
                LineCircleIntr::TangentIntersect { t0 } => add_root(t0),
                LineCircleIntr::TwoIntersects { t0, t1 } => {
                    add_root(t0);
                    add_root(t1);
                }
            }
        } else {
            let (arc_radius, arc_center) = seg_arc_radius_and_center(v1, v2);
            let mut add_root = |p: Vec2<T>| {
                let at_start = p.fuzzy_eq_eps(v1.pos(), pos_equal_eps);
                if !at_start
                    && point_within_arc_sweep(arc_center, v1.pos(), v2.pos(), v1.bulge_is_neg(), p)
                {
                    cuts.push(Cut::at(raw_offset_polyline, seg_index, p));
                }
            };
            match circle_circle_intr(arc_radius, arc_center, cap_radius, cap_center, pos_equal_eps)
            {
                CircleCircleIntr::NoIntersect | CircleCircleIntr::Overlapping => {}
                CircleCircleIntr::TangentIntersect { point } => add_root(point),
                CircleCircleIntr::TwoIntersects { point1, point2 } => {
                    add_root(point1);
                    add_root(point2);
                }
            }
        }
    }
}

/// Cut the raw offset polyline using both its self intersects and its intersects with the dual
/// raw offset polyline (offset in the opposite direction). Required for open polylines (the dual
/// bounds the valid region together with end cap circles) and self intersecting closed inputs.
fn slices_from_dual_raw_offsets<T>(
    original_polyline: &Polyline<T>,
    raw_offset_polyline: &Polyline<T>,
    dual_raw_offset_polyline: &Polyline<T>,
    orig_polyline_index: &StaticSpatialIndex<T>,
    offset: T,
    options: &OffsetOptions<T>,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    if raw_offset_polyline.vertex_count() < 2 {
        return Vec::new();
    }

    let pos_equal_eps = options.pos_equal_eps;
    let is_closed = original_polyline.is_closed();

    let raw_offset_index = raw_offset_polyline.create_approx_spatial_index();
    let self_intrs =
        all_self_intersects(raw_offset_polyline, &raw_offset_index, true, pos_equal_eps);

    let dual_intrs = super::intersects::find_intersects(
        raw_offset_polyline,
        dual_raw_offset_polyline,
        &FindIntersectsOptions {
            pline1_aabb_index: Some(&raw_offset_index),
            pos_equal_eps,
        },
    );

    let mut cuts = Vec::new();

    if !is_closed {
        // end cap circles at the original polyline's end points bound the valid region
        let cap_radius = offset.abs();
        collect_cap_cuts(
            raw_offset_polyline,
            &raw_offset_index,
            original_polyline[0].pos(),
            cap_radius,
            pos_equal_eps,
            &mut cuts,
        );
        collect_cap_cuts(
            raw_offset_polyline,
            &raw_offset_index,
            original_polyline.last().unwrap().pos(),
            cap_radius,
            pos_equal_eps,
            &mut cuts,
        );
    }

    for si in &self_intrs {
        cuts.push(Cut::at(raw_offset_polyline, si.start_index1, si.point));
        cuts.push(Cut::at(raw_offset_polyline, si.start_index2, si.point));
    }

    // only the raw offset side of the dual intersects applies (overlapping intersects are not
    // added, they only arise from collapsing regions)
    for intr in &dual_intrs.basic_intersects {
        cuts.push(Cut::at(raw_offset_polyline, intr.start_index1, intr.point));
    }

    let mut query_stack = Vec::with_capacity(8);

    if cuts.is_empty() {
        if !point_has_clearance(
            original_polyline,
            orig_polyline_index,
            offset,
            raw_offset_polyline[0].pos(),
            options.offset_dist_eps,
            &mut query_stack,
        ) {
            return Vec::new();
        }

        return vec![whole_pline_slice(raw_offset_polyline)];
    }

    if !is_closed {
        // open polylines get synthetic cuts at both raw offset ends so the pair loop also forms
        // the leading and trailing slices
        cuts.push(Cut::at(raw_offset_polyline, 0, raw_offset_polyline[0].pos()));
        cuts.push(Cut::at(
            raw_offset_polyline,
            raw_offset_polyline.vertex_count() - 2,
            raw_offset_polyline.last().unwrap().pos(),
        ));
    }

    sort_cuts(&mut cuts);

    slices_between_cuts(
        raw_offset_polyline,
        &cuts,
        is_closed,
        original_polyline,
        orig_polyline_index,
        offset,
        options,
        &mut query_stack,
    )
}

/// Stitch slices into result polylines by matching slice end points to slice start points within
/// `slice_join_eps`. Closed results form when a stitched run returns to its starting point and
/// `is_closed` is set.
///
/// Slices are assumed to arrive in traversal order along the raw offset polyline; when several
/// candidates share an end point the nearest one forward in that order is taken (preferring
/// candidates that do not immediately close back to the run's start so overlapping slices are
/// retained).
fn stitch_offset_slices<T>(
    slices: &[Polyline<T>],
    is_closed: bool,
    options: &OffsetOptions<T>,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    let mut result = Vec::new();
    if slices.is_empty() {
        return result;
    }

    let join_eps = options.slice_join_eps;
    let pos_equal_eps = options.pos_equal_eps;
    let slice_count = slices.len();

    if slice_count == 1 {
        let mut pline = Polyline::from_remove_repeat(&slices[0], pos_equal_eps);
        pline.set_is_closed(false);

        if is_closed
            && pline.vertex_count() > 1
            && pline[0]
                .pos()
                .fuzzy_eq_eps(pline.last().unwrap().pos(), join_eps)
        {
            pline.remove_last();
            pline.set_is_closed(true);
        }

        result.push(pline);
        return result;
    }

    // index all slice start points for end point matching
    let aabb_index = {
        let mut builder = SpatialIndexBuilder::new(slice_count);
        for slice in slices {
            let sp = slice[0].pos();
            builder.add(sp.x - join_eps, sp.y - join_eps, sp.x + join_eps, sp.y + join_eps);
        }
        builder.build().unwrap()
    };

    let mut visited = vec![false; slice_count];
    let mut candidates = Vec::new();
    let mut query_stack = Vec::with_capacity(8);

    for first in 0..slice_count {
        if visited[first] {
            continue;
        }
        visited[first] = true;

        let mut run = Polyline::from_remove_repeat(&slices[first], pos_equal_eps);
        run.set_is_closed(false);
        let run_start_point = slices[first][0].pos();
        let mut current = first;

        for _ in 0..slice_count {
            let end_point = run.last().unwrap().pos();

            candidates.clear();
            aabb_index.visit_query_with_stack(
                end_point.x - join_eps,
                end_point.y - join_eps,
                end_point.x + join_eps,
                end_point.y + join_eps,
                &mut |idx: usize| {
                    if !visited[idx] {
                        candidates.push(idx);
                    }
                    Control::Continue
                },
                &mut query_stack,
            );

            // nearest forward in traversal order, non-closing candidates first on ties
            let next = candidates
                .iter()
                .copied()
                .min_by_key(|&idx| {
                    let fwd_dist = (idx + slice_count - current) % slice_count;
                    let closes_run = slices[idx]
                        .last()
                        .unwrap()
                        .pos()
                        .fuzzy_eq_eps(run_start_point, pos_equal_eps);
                    (fwd_dist, closes_run)
                });

            match next {
                None => break,
                Some(idx) => {
                    visited[idx] = true;
                    run.remove_last();
                    run.extend_remove_repeat(&slices[idx], pos_equal_eps);
                    current = idx;
                }
            }
        }

        if run.vertex_count() > 1 {
            let sp = run[0].pos();
            let ep = run.last().unwrap().pos();
            if is_closed && sp.fuzzy_eq_eps(ep, pos_equal_eps) {
                run.remove_last();
                run.set_is_closed(true);
            }

            result.push(run);
        }
    }

    result
}

/// Compute the parallel offset polylines of `polyline` offset by `offset`.
pub(crate) fn parallel_offset<T>(
    polyline: &Polyline<T>,
    offset: T,
    options: &OffsetOptions<T>,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    if polyline.vertex_count() < 2 {
        return Vec::new();
    }

    debug_assert!(
        polyline.prune_singularities(options.pos_equal_eps).is_none(),
        "input assumed to not have repeat position vertexes"
    );

    let constructed_index;
    let index = if let Some(x) = options.aabb_index {
        x
    } else {
        constructed_index = polyline.create_approx_spatial_index();
        &constructed_index
    };

    let raw_offset = create_raw_offset_polyline(polyline, offset, options.pos_equal_eps);
    if raw_offset.is_empty() {
        return Vec::new();
    }

    if polyline.is_closed() && !options.handle_self_intersects {
        let slices = slices_from_raw_offset(polyline, &raw_offset, index, offset, options);
        stitch_offset_slices(&slices, true, options)
    } else {
        let dual_raw_offset = create_raw_offset_polyline(polyline, -offset, options.pos_equal_eps);
        let slices = slices_from_dual_raw_offsets(
            polyline,
            &raw_offset,
            &dual_raw_offset,
            index,
            offset,
            options,
        );

        stitch_offset_slices(&slices, polyline.is_closed(), options)
    }
}
