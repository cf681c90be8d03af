//! Intersection dispatch between two polyline segments (line or arc on either side).

use super::{seg_arc_radius_and_center, Vertex};
use crate::intersect::{
    circle_circle_intr, line_circle_intr, line_line_intr, CircleCircleIntr, LineCircleIntr,
    LineLineIntr,
};
use crate::math::{
    angle, angle_from_bulge, angle_is_within_sweep, delta_angle, dist_squared, normalize_radians,
    point_from_parametric, point_within_arc_sweep, Vec2,
};
use crate::num::Real;

/// Result of intersecting two polyline segments.
#[derive(Debug, Copy, Clone)]
pub enum SegIntr<T>
where
    T: Real,
{
    /// No intersect between the segments.
    NoIntersect,
    /// Single tangent intersect point.
    TangentIntersect {
        /// Tangent intersect point.
        point: Vec2<T>,
    },
    /// Single (non tangent) intersect point.
    OneIntersect {
        /// Intersect point.
        point: Vec2<T>,
    },
    /// Two intersect points.
    TwoIntersects {
        /// First intersect point (ordered according to the second segment's direction).
        point1: Vec2<T>,
        /// Second intersect point (ordered according to the second segment's direction).
        point2: Vec2<T>,
    },
    /// Both segments are collinear lines overlapping across an interval.
    SegmentOverlap {
        /// Overlap start (according to the second segment's direction).
        point1: Vec2<T>,
        /// Overlap end (according to the second segment's direction).
        point2: Vec2<T>,
    },
    /// Both segments are arcs on the same circle overlapping across a sweep interval.
    ArcOverlap {
        /// Overlap start (according to the second segment's direction).
        point1: Vec2<T>,
        /// Overlap end (according to the second segment's direction).
        point2: Vec2<T>,
    },
}

/// Find the intersects between the polyline segments `v1->v2` and `u1->u2`.
///
/// Dispatches on the bulge of both segments: line vs line, line vs arc (both orders), or arc vs
/// arc. Kernel intersects are filtered by segment bounds and arc sweep containment. `pos_equal_eps`
/// is the fuzzy epsilon used for position comparisons.
pub fn seg_intr<T>(
    v1: Vertex<T>,
    v2: Vertex<T>,
    u1: Vertex<T>,
    u2: Vertex<T>,
    pos_equal_eps: T,
) -> SegIntr<T>
where
    T: Real,
{
    use SegIntr::*;
    let v_is_line = v1.bulge_is_zero();
    let u_is_line = u1.bulge_is_zero();

    if v_is_line && u_is_line {
        return match line_line_intr(v1.pos(), v2.pos(), u1.pos(), u2.pos(), pos_equal_eps) {
            LineLineIntr::NoIntersect | LineLineIntr::FalseIntersect { .. } => NoIntersect,
            LineLineIntr::TrueIntersect { seg1_t, .. } => OneIntersect {
                point: point_from_parametric(v1.pos(), v2.pos(), seg1_t),
            },
            LineLineIntr::Coincident { seg2_t0, seg2_t1 } => SegmentOverlap {
                point1: point_from_parametric(u1.pos(), u2.pos(), seg2_t0),
                point2: point_from_parametric(u1.pos(), u2.pos(), seg2_t1),
            },
        };
    }

    // line vs arc (p0->p1 the line, a1->a2 the arc)
    let process_line_arc = |p0: Vec2<T>, p1: Vec2<T>, a1: Vertex<T>, a2: Vertex<T>| -> SegIntr<T> {
        let (arc_radius, arc_center) = seg_arc_radius_and_center(a1, a2);

        let point_in_sweep = |t: T| -> Option<Vec2<T>> {
            if !t.fuzzy_in_range_eps(T::zero(), T::one(), pos_equal_eps) {
                return None;
            }

            let p = point_from_parametric(p0, p1, t);
            if point_within_arc_sweep(arc_center, a1.pos(), a2.pos(), a1.bulge_is_neg(), p) {
                Some(p)
            } else {
                None
            }
        };

        match line_circle_intr(p0, p1, arc_radius, arc_center, pos_equal_eps) {
            LineCircleIntr::NoIntersect => NoIntersect,
            LineCircleIntr::TangentIntersect { t0 } => match point_in_sweep(t0) {
                Some(point) => TangentIntersect { point },
                None => NoIntersect,
            },
            LineCircleIntr::TwoIntersects { t0, t1 } => {
                match (point_in_sweep(t0), point_in_sweep(t1)) {
                    (None, None) => NoIntersect,
                    (None, Some(point)) | (Some(point), None) => OneIntersect { point },
                    (Some(point1), Some(point2)) => {
                        // order according to the second segment's direction
                        if u_is_line
                            || dist_squared(point1, a1.pos()) < dist_squared(point2, a1.pos())
                        {
                            TwoIntersects { point1, point2 }
                        } else {
                            TwoIntersects {
                                point1: point2,
                                point2: point1,
                            }
                        }
                    }
                }
            }
        }
    };

    if v_is_line {
        return process_line_arc(v1.pos(), v2.pos(), u1, u2);
    }

    if u_is_line {
        return process_line_arc(u1.pos(), u2.pos(), v1, v2);
    }

    // arc vs arc
    let (arc1_radius, arc1_center) = seg_arc_radius_and_center(v1, v2);
    let (arc2_radius, arc2_center) = seg_arc_radius_and_center(u1, u2);

    let start_and_sweep = |start: Vec2<T>, center: Vec2<T>, bulge: T| -> (T, T) {
        (normalize_radians(angle(center, start)), angle_from_bulge(bulge))
    };

    let both_arcs_sweep_point = |pt: Vec2<T>| -> bool {
        point_within_arc_sweep(arc1_center, v1.pos(), v2.pos(), v1.bulge_is_neg(), pt)
            && point_within_arc_sweep(arc2_center, u1.pos(), u2.pos(), u1.bulge_is_neg(), pt)
    };

    match circle_circle_intr(
        arc1_radius,
        arc1_center,
        arc2_radius,
        arc2_center,
        pos_equal_eps,
    ) {
        CircleCircleIntr::NoIntersect => NoIntersect,
        CircleCircleIntr::TangentIntersect { point } => {
            if both_arcs_sweep_point(point) {
                TangentIntersect { point }
            } else {
                NoIntersect
            }
        }
        CircleCircleIntr::TwoIntersects { point1, point2 } => {
            match (both_arcs_sweep_point(point1), both_arcs_sweep_point(point2)) {
                (true, true) => TwoIntersects { point1, point2 },
                (true, false) => OneIntersect { point: point1 },
                (false, true) => OneIntersect { point: point2 },
                (false, false) => NoIntersect,
            }
        }
        CircleCircleIntr::Overlapping => {
            // same supporting circle, classify by sweep interval overlap with both sweeps
            // normalized to go the same direction
            let same_direction = v1.bulge_is_neg() == u1.bulge_is_neg();
            let (arc1_start, arc1_sweep) = start_and_sweep(v1.pos(), arc1_center, v1.bulge);
            let (arc2_start, arc2_sweep) = if same_direction {
                start_and_sweep(u1.pos(), arc2_center, u1.bulge)
            } else {
                start_and_sweep(u2.pos(), arc2_center, -u1.bulge)
            };

            let arc1_end = arc1_start + arc1_sweep;
            let arc2_end = arc2_start + arc2_sweep;

            // test if only the end points touch first (since both sweeps now go the same
            // direction only the start/end delta angles need checking)
            match (
                delta_angle(arc1_start, arc2_end).fuzzy_eq_zero(),
                delta_angle(arc2_start, arc1_end).fuzzy_eq_zero(),
            ) {
                (true, true) => {
                    // two half circles joined at both ends
                    TwoIntersects {
                        point1: u1.pos(),
                        point2: u2.pos(),
                    }
                }
                (true, false) => OneIntersect { point: v1.pos() },
                (false, true) => OneIntersect { point: u1.pos() },
                (false, false) => {
                    let arc2_starts_in_arc1 =
                        angle_is_within_sweep(arc2_start, arc1_start, arc1_sweep);
                    let arc2_ends_in_arc1 = angle_is_within_sweep(arc2_end, arc1_start, arc1_sweep);
                    if arc2_starts_in_arc1 && arc2_ends_in_arc1 {
                        // arc2 entirely within arc1
                        ArcOverlap {
                            point1: u1.pos(),
                            point2: u2.pos(),
                        }
                    } else if arc2_starts_in_arc1 {
                        // partial overlap from arc2 start to arc1 end
                        if same_direction {
                            ArcOverlap {
                                point1: u1.pos(),
                                point2: v2.pos(),
                            }
                        } else {
                            ArcOverlap {
                                point1: v2.pos(),
                                point2: u2.pos(),
                            }
                        }
                    } else if arc2_ends_in_arc1 {
                        // partial overlap from arc1 start to arc2 end
                        if same_direction {
                            ArcOverlap {
                                point1: v1.pos(),
                                point2: u2.pos(),
                            }
                        } else {
                            ArcOverlap {
                                point1: u1.pos(),
                                point2: v1.pos(),
                            }
                        }
                    } else if angle_is_within_sweep(arc1_start, arc2_start, arc2_sweep) {
                        // arc1 entirely within arc2
                        if same_direction {
                            ArcOverlap {
                                point1: v1.pos(),
                                point2: v2.pos(),
                            }
                        } else {
                            ArcOverlap {
                                point1: v2.pos(),
                                point2: v1.pos(),
                            }
                        }
                    } else {
                        NoIntersect
                    }
                }
            }
        }
    }
}
