//! Boolean combine engine for closed polylines.
//!
//! Both polylines are cut into slices at their crossing points, each slice is kept or discarded
//! by testing a probe point's winding number against the other polyline according to the boolean
//! operation, and surviving slices are stitched back into closed result polylines by matching end
//! points. Runs of overlapping segments are handled as dedicated overlap slices.

use super::{
    extract_slice, extract_wrapping_slice,
    intersects::{find_intersects, sort_and_join_overlapping_intersects, OverlappingSlice},
    seg_midpoint, BasicIntersect, BooleanInvalidInput, BooleanOp, BooleanOptions, BooleanResult,
    FindIntersectsOptions, PlineOrientation, Polyline,
};
use crate::math::{dist_squared, Vec2};
use crate::num::{Control, Real};
use crate::spatial::{SpatialIndexBuilder, StaticSpatialIndex};

/// Crossing and overlap information between the two polylines, gathered once per operation.
struct BooleanContext<T> {
    crossings: Vec<BasicIntersect<T>>,
    overlaps: Vec<OverlappingSlice<T>>,
    orientation1: PlineOrientation,
    orientation2: PlineOrientation,
}

impl<T> BooleanContext<T>
where
    T: Real,
{
    fn prepare(
        pline1: &Polyline<T>,
        pline2: &Polyline<T>,
        pline1_aabb_index: &StaticSpatialIndex<T>,
        pos_equal_eps: T,
    ) -> Self {
        let mut intrs = find_intersects(
            pline1,
            pline2,
            &FindIntersectsOptions {
                pline1_aabb_index: Some(pline1_aabb_index),
                pos_equal_eps,
            },
        );

        let overlaps = sort_and_join_overlapping_intersects(
            &mut intrs.overlapping_intersects,
            pline1,
            pline2,
            pos_equal_eps,
        );

        BooleanContext {
            crossings: intrs.basic_intersects,
            overlaps,
            orientation1: pline1.orientation(),
            orientation2: pline2.orientation(),
        }
    }

    /// True when the two polylines trace the exact same closed path.
    fn fully_overlapping(&self) -> bool {
        self.overlaps.len() == 1 && self.overlaps[0].is_loop
    }

    fn opposing_orientations(&self) -> bool {
        self.orientation1 != self.orientation2
    }

    fn has_intersects(&self) -> bool {
        !self.crossings.is_empty() || !self.overlaps.is_empty()
    }
}

/// Which side of the other polyline a kept slice must lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keep {
    Inside,
    Outside,
}

/// Which polyline's non-overlap slices to invert when the relative direction of the inputs does
/// not match what the operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InvertTarget {
    Pline1,
    Pline2,
}

/// Per-operation clipping parameters driving the shared clip/stitch path.
#[derive(Debug, Clone, Copy)]
struct ClipSpec {
    /// Side of pline2 on which pline1's slices survive.
    keep1: Keep,
    /// Side of pline1 on which pline2's slices survive.
    keep2: Keep,
    /// Whether the stitched result needs the two inputs traversed in opposing directions.
    set_opposing: bool,
    /// Which input's slices to reverse to reach the requested relative direction.
    invert: InvertTarget,
    /// Forbid stitching one overlap slice directly onto another (difference and exclusive or).
    forbid_overlap_chains: bool,
}

/// Resolve the degenerate configurations that bypass slicing entirely: identical inputs,
/// disjoint inputs, and one input containing the other.
fn trivial_result<T>(
    ctx: &BooleanContext<T>,
    operation: BooleanOp,
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
) -> Option<BooleanResult<T>>
where
    T: Real,
{
    use BooleanOp::*;

    if ctx.fully_overlapping() {
        return Some(match operation {
            Union | Intersect => BooleanResult::new(vec![pline2.clone()], Vec::new()),
            Exclude | Xor => BooleanResult::empty(),
        });
    }

    if ctx.has_intersects() {
        return None;
    }

    // no intersects: pure containment/disjoint configuration
    let p1_inside_p2 = pline2.winding_number(pline1[0].pos()) != 0;
    let p2_inside_p1 = pline1.winding_number(pline2[0].pos()) != 0;

    let reversed = |p: &Polyline<T>| {
        let mut hole = p.clone();
        hole.invert_direction_mut();
        hole
    };

    Some(match (operation, p1_inside_p2, p2_inside_p1) {
        (Union, true, _) => BooleanResult::new(vec![pline2.clone()], Vec::new()),
        (Union, _, true) => BooleanResult::new(vec![pline1.clone()], Vec::new()),
        (Union, _, _) => BooleanResult::new(vec![pline1.clone(), pline2.clone()], Vec::new()),
        (Intersect, true, _) => BooleanResult::new(vec![pline1.clone()], Vec::new()),
        (Intersect, _, true) => BooleanResult::new(vec![pline2.clone()], Vec::new()),
        (Intersect, _, _) => BooleanResult::empty(),
        (Exclude, true, _) => BooleanResult::empty(),
        (Exclude, _, true) => BooleanResult::new(vec![pline1.clone()], vec![reversed(pline2)]),
        (Exclude, _, _) => BooleanResult::new(vec![pline1.clone()], Vec::new()),
        (Xor, true, _) => BooleanResult::new(vec![pline2.clone()], vec![reversed(pline1)]),
        (Xor, _, true) => BooleanResult::new(vec![pline1.clone()], vec![reversed(pline2)]),
        (Xor, _, _) => BooleanResult::new(vec![pline1.clone(), pline2.clone()], Vec::new()),
    })
}

/// A point where one of the polylines must be cut, addressed by segment index and distance from
/// the segment's start vertex.
#[derive(Debug, Clone, Copy)]
struct ClipCut<T> {
    seg_index: usize,
    dist_key: T,
    point: Vec2<T>,
    /// True when an overlap run departs from this point on this polyline (the slice following it
    /// is the overlap itself and is handled by the overlap slice copies).
    starts_overlap: bool,
}

impl<T> ClipCut<T>
where
    T: Real,
{
    fn at(pline: &Polyline<T>, seg_index: usize, point: Vec2<T>, starts_overlap: bool) -> Self {
        ClipCut {
            seg_index,
            dist_key: dist_squared(point, pline[seg_index].pos()),
            point,
            starts_overlap,
        }
    }
}

/// Cut `pline` at every crossing/overlap end point and keep the slices between consecutive cuts
/// whose probe point passes `keep_pred`.
///
/// `own_side_is_first` picks which index of the intersect records belongs to `pline` (true =
/// pline1, false = pline2).
fn collect_clip_slices<T, F>(
    pline: &Polyline<T>,
    ctx: &BooleanContext<T>,
    own_side_is_first: bool,
    keep_pred: &mut F,
    out: &mut Vec<Polyline<T>>,
    pos_equal_eps: T,
) where
    T: Real,
    F: FnMut(Vec2<T>) -> bool,
{
    // overlap end points use the next index when they sit at the very end of a segment, to match
    // the convention of the crossing records
    let advance_at_seg_end = |idx: usize, point: Vec2<T>| -> usize {
        let next_idx = pline.next_wrapping_index(idx);
        if point.fuzzy_eq_eps(pline[next_idx].pos(), pos_equal_eps) {
            next_idx
        } else {
            idx
        }
    };

    let mut cuts: Vec<ClipCut<T>> = Vec::with_capacity(ctx.crossings.len() + 2 * ctx.overlaps.len());

    for intr in ctx.crossings.iter() {
        let idx = if own_side_is_first {
            intr.start_index1
        } else {
            intr.start_index2
        };
        cuts.push(ClipCut::at(pline, idx, intr.point, false));
    }

    for overlap in ctx.overlaps.iter() {
        let sp = overlap.pline[0].pos();
        let ep = overlap.pline.last().unwrap().pos();
        let (sp_idx, ep_idx) = if own_side_is_first {
            (overlap.start_indexes.0, overlap.end_indexes.0)
        } else {
            (overlap.start_indexes.1, overlap.end_indexes.1)
        };
        let sp_idx = advance_at_seg_end(sp_idx, sp);
        let ep_idx = advance_at_seg_end(ep_idx, ep);

        // the overlap path runs in pline2's direction, so on pline1 with opposing directions the
        // overlap's start point is where this polyline's own slice ends
        let sp_starts_overlap = !own_side_is_first || !overlap.opposing_directions;
        cuts.push(ClipCut::at(pline, sp_idx, sp, sp_starts_overlap));
        cuts.push(ClipCut::at(pline, ep_idx, ep, !sp_starts_overlap));
    }

    if cuts.is_empty() {
        return;
    }

    cuts.sort_unstable_by(|a, b| {
        a.seg_index
            .cmp(&b.seg_index)
            .then_with(|| a.dist_key.partial_cmp(&b.dist_key).unwrap())
    });

    let cut_count = cuts.len();
    for w in 0..cut_count {
        let a = &cuts[w];
        if a.starts_overlap {
            continue;
        }
        let b = &cuts[(w + 1) % cut_count];

        // the final wrapping pair may span the entire loop (e.g. a single tangent crossing), but
        // when it collapses onto another cut point it is a degenerate duplicate instead
        let slice = if w + 1 == cut_count {
            if cut_count > 1 && a.point.fuzzy_eq_eps(b.point, pos_equal_eps) {
                None
            } else {
                extract_wrapping_slice(
                    pline,
                    a.point,
                    a.seg_index,
                    b.point,
                    b.seg_index,
                    pos_equal_eps,
                )
            }
        } else {
            extract_slice(pline, a.point, a.seg_index, b.point, b.seg_index, pos_equal_eps)
        };

        if let Some(slice) = slice {
            let probe = seg_midpoint(slice[0], slice[1]);
            if keep_pred(probe) {
                out.push(slice);
            }
        }
    }
}

/// Provenance of a slice in the combined slice table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SliceSource {
    Pline1,
    Pline2,
    Overlap1,
    Overlap2,
}

/// Block boundaries of the combined slice table: pline1 slices, pline2 slices, overlap copies
/// oriented for pline1, overlap copies oriented for pline2.
#[derive(Debug, Clone, Copy)]
struct SliceBlocks {
    pline2_start: usize,
    overlap1_start: usize,
    overlap2_start: usize,
}

impl SliceBlocks {
    fn source_of(&self, idx: usize) -> SliceSource {
        if idx < self.pline2_start {
            SliceSource::Pline1
        } else if idx < self.overlap1_start {
            SliceSource::Pline2
        } else if idx < self.overlap2_start {
            SliceSource::Overlap1
        } else {
            SliceSource::Overlap2
        }
    }

    fn first_from(&self, candidates: &[usize], want: SliceSource) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .find(|&i| self.source_of(i) == want)
    }
}

/// Pick which candidate slice to stitch onto next when several share an end point.
///
/// The preferred continuation is always the other polyline's regular slice. With
/// `forbid_overlap_chains` an overlap slice may only continue onto a regular slice (overlap onto
/// overlap never forms a valid boundary) and regular slices fall straight back to any candidate.
fn select_next(
    blocks: &SliceBlocks,
    forbid_overlap_chains: bool,
    current: usize,
    candidates: &[usize],
) -> Option<usize> {
    use SliceSource::*;

    let (own_regular, other_regular) = match blocks.source_of(current) {
        Pline1 | Overlap1 => (Pline1, Pline2),
        Pline2 | Overlap2 => (Pline2, Pline1),
    };

    if forbid_overlap_chains {
        if matches!(blocks.source_of(current), Overlap1 | Overlap2) {
            return blocks
                .first_from(candidates, other_regular)
                .or_else(|| blocks.first_from(candidates, own_regular));
        }
        return blocks
            .first_from(candidates, other_regular)
            .or_else(|| candidates.first().copied());
    }

    blocks
        .first_from(candidates, other_regular)
        .or_else(|| blocks.first_from(candidates, own_regular))
        .or_else(|| candidates.first().copied())
}

/// Stitch clip slices together into closed polylines by matching end points to start points.
fn stitch_clip_slices<T>(
    slices: &[Polyline<T>],
    blocks: SliceBlocks,
    forbid_overlap_chains: bool,
    slice_join_eps: T,
    pos_equal_eps: T,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    let mut result = Vec::new();
    if slices.is_empty() {
        return result;
    }

    // index all slice start points
    let aabb_index = {
        let mut builder = SpatialIndexBuilder::new(slices.len());
        for slice in slices.iter() {
            let pt = slice[0].pos();
            builder.add(
                pt.x - slice_join_eps,
                pt.y - slice_join_eps,
                pt.x + slice_join_eps,
                pt.y + slice_join_eps,
            );
        }
        builder.build().unwrap()
    };

    let mut visited = vec![false; slices.len()];
    let mut candidates = Vec::new();
    let mut query_stack = Vec::with_capacity(8);

    let push_closed = |mut pline: Polyline<T>, result: &mut Vec<Polyline<T>>| {
        debug_assert!(
            pline[0]
                .pos()
                .fuzzy_eq_eps(pline.last().unwrap().pos(), slice_join_eps),
            "start should connect back to end"
        );

        if pline.vertex_count() < 3 {
            // two vertexes stacked on each other, not a closed area
            return;
        }
        pline.remove_last();
        pline.set_is_closed(true);

        if pline.vertex_count() == 2 && pline[0].bulge_is_zero() && pline[1].bulge_is_zero() {
            // two stacked line segments (e.g. leftover copies of an overlapping edge), the loop
            // encloses no area
            return;
        }

        result.push(pline);
    };

    for first in 0..slices.len() {
        if visited[first] {
            continue;
        }
        visited[first] = true;

        let mut run = Polyline::from_remove_repeat(&slices[first], pos_equal_eps);
        run.set_is_closed(false);
        let mut current = first;

        for _ in 0..slices.len() {
            let end_point = run.last().unwrap().pos();

            candidates.clear();
            aabb_index.visit_query_with_stack(
                end_point.x - slice_join_eps,
                end_point.y - slice_join_eps,
                end_point.x + slice_join_eps,
                end_point.y + slice_join_eps,
                &mut |idx: usize| {
                    if idx == first || !visited[idx] {
                        candidates.push(idx);
                    }
                    Control::Continue
                },
                &mut query_stack,
            );

            if candidates.is_empty() {
                // dangling end (possible near overlap thresholds), discard the run
                break;
            }

            match select_next(&blocks, forbid_overlap_chains, current, &candidates) {
                None => break,
                Some(idx) if idx == first => {
                    push_closed(run, &mut result);
                    break;
                }
                Some(idx) => {
                    visited[idx] = true;
                    run.remove_last();
                    run.extend_remove_repeat(&slices[idx], pos_equal_eps);
                    current = idx;
                }
            }
        }
    }

    result
}

/// Slice both polylines per `spec`, add the overlap slice copies, orient everything, and stitch.
fn clip_and_stitch<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    ctx: &BooleanContext<T>,
    spec: ClipSpec,
    slice_join_eps: T,
    pos_equal_eps: T,
) -> Vec<Polyline<T>>
where
    T: Real,
{
    let mut keep1 =
        |p: Vec2<T>| (pline2.winding_number(p) != 0) == (spec.keep1 == Keep::Inside);
    let mut keep2 =
        |p: Vec2<T>| (pline1.winding_number(p) != 0) == (spec.keep2 == Keep::Inside);

    let mut slices: Vec<Polyline<T>> = Vec::new();
    collect_clip_slices(pline1, ctx, true, &mut keep1, &mut slices, pos_equal_eps);
    let pline2_start = slices.len();
    collect_clip_slices(pline2, ctx, false, &mut keep2, &mut slices, pos_equal_eps);

    // overlap slices follow pline2's direction; the pline1 copies are inverted when the inputs
    // oppose so they follow pline1's direction
    let overlap1_start = slices.len();
    slices.reserve(2 * ctx.overlaps.len());
    for overlap in ctx.overlaps.iter() {
        let mut pline = overlap.pline.clone();
        if overlap.opposing_directions {
            pline.invert_direction_mut();
        }
        slices.push(pline);
    }
    let overlap2_start = slices.len();
    for overlap in ctx.overlaps.iter() {
        slices.push(overlap.pline.clone());
    }

    if spec.set_opposing != ctx.opposing_orientations() {
        // invert one polyline's slices so the stitched result directions match the operation
        let invert_range = match spec.invert {
            InvertTarget::Pline1 => 0..pline2_start,
            InvertTarget::Pline2 => pline2_start..overlap1_start,
        };
        for slice in slices[invert_range].iter_mut() {
            slice.invert_direction_mut();
        }
    }

    let blocks = SliceBlocks {
        pline2_start,
        overlap1_start,
        overlap2_start,
    };

    stitch_clip_slices(
        &slices,
        blocks,
        spec.forbid_overlap_chains,
        slice_join_eps,
        pos_equal_eps,
    )
}

/// Perform the boolean `operation` between two closed polylines.
pub(crate) fn polyline_boolean<T>(
    pline1: &Polyline<T>,
    pline2: &Polyline<T>,
    operation: BooleanOp,
    options: &BooleanOptions<T>,
) -> Result<BooleanResult<T>, BooleanInvalidInput>
where
    T: Real,
{
    if !pline1.is_closed() || !pline2.is_closed() {
        return Err(BooleanInvalidInput::NotClosed);
    }
    if pline1.vertex_count() < 2 {
        return Err(BooleanInvalidInput::TooFewVertexes(pline1.vertex_count()));
    }
    if pline2.vertex_count() < 2 {
        return Err(BooleanInvalidInput::TooFewVertexes(pline2.vertex_count()));
    }

    let constructed_index;
    let pline1_aabb_index = if let Some(x) = options.pline1_aabb_index {
        x
    } else {
        constructed_index = pline1.create_approx_spatial_index();
        &constructed_index
    };

    let ctx = BooleanContext::prepare(pline1, pline2, pline1_aabb_index, options.pos_equal_eps);

    if let Some(result) = trivial_result(&ctx, operation, pline1, pline2) {
        return Ok(result);
    }

    let pos_equal_eps = options.pos_equal_eps;
    let slice_join_eps = options.slice_join_eps;
    let run = |spec: ClipSpec| {
        clip_and_stitch(pline1, pline2, &ctx, spec, slice_join_eps, pos_equal_eps)
    };

    let result = match operation {
        BooleanOp::Union => {
            let remaining = run(ClipSpec {
                keep1: Keep::Outside,
                keep2: Keep::Outside,
                set_opposing: false,
                invert: InvertTarget::Pline2,
                forbid_overlap_chains: false,
            });

            // loops with inverted orientation enclose negative space (holes in the union)
            let mut pos_plines = Vec::new();
            let mut neg_plines = Vec::new();
            for pline in remaining {
                if pline.orientation() != ctx.orientation1 {
                    neg_plines.push(pline);
                } else {
                    pos_plines.push(pline);
                }
            }

            BooleanResult::new(pos_plines, neg_plines)
        }
        BooleanOp::Intersect => BooleanResult::new(
            run(ClipSpec {
                keep1: Keep::Inside,
                keep2: Keep::Inside,
                set_opposing: false,
                invert: InvertTarget::Pline2,
                forbid_overlap_chains: false,
            }),
            Vec::new(),
        ),
        BooleanOp::Exclude => BooleanResult::new(
            run(ClipSpec {
                keep1: Keep::Outside,
                keep2: Keep::Inside,
                set_opposing: true,
                invert: InvertTarget::Pline2,
                forbid_overlap_chains: true,
            }),
            Vec::new(),
        ),
        BooleanOp::Xor => {
            // (pline1 minus pline2) plus (pline2 minus pline1)
            let mut remaining = run(ClipSpec {
                keep1: Keep::Outside,
                keep2: Keep::Inside,
                set_opposing: true,
                invert: InvertTarget::Pline2,
                forbid_overlap_chains: true,
            });
            remaining.extend(run(ClipSpec {
                keep1: Keep::Inside,
                keep2: Keep::Outside,
                set_opposing: true,
                invert: InvertTarget::Pline1,
                forbid_overlap_chains: true,
            }));

            BooleanResult::new(remaining, Vec::new())
        }
    };

    Ok(result)
}
