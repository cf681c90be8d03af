use crate::math::Vec2;
use crate::num::Real;

/// Result of intersecting two line segments.
#[derive(Debug, Copy, Clone)]
pub enum LineLineIntr<T>
where
    T: Real,
{
    /// Segments are parallel (or collinear without overlap) and do not intersect.
    NoIntersect,
    /// Segments intersect at a single point within both segment bounds.
    TrueIntersect {
        /// Parametric value of the intersect on the first segment.
        seg1_t: T,
        /// Parametric value of the intersect on the second segment.
        seg2_t: T,
    },
    /// The infinite lines intersect but at least one segment must be extended to reach the point.
    FalseIntersect {
        /// Parametric value of the intersect on the first segment.
        seg1_t: T,
        /// Parametric value of the intersect on the second segment.
        seg2_t: T,
    },
    /// Segments are collinear and overlap across an interval.
    Coincident {
        /// Start of the overlap as a parametric value on the second segment.
        seg2_t0: T,
        /// End of the overlap as a parametric value on the second segment.
        seg2_t1: T,
    },
}

/// Find the intersect between the line segments `v1->v2` and `u1->u2`.
///
/// Both segments are processed in parametric form `P(t) = p0 + t * (p1 - p0)`. Parametric values
/// are scaled by segment length before fuzzy comparing against the bounds so `eps` is always
/// applied at position scale (a parametric difference of 0.1 means very different distances for a
/// segment of length 0.01 vs. one of length 1e6).
///
/// Degenerate segments (both end points fuzzy equal) are handled as points, and collinear
/// segments report the overlap of their parametric intervals on the second segment, biased
/// toward keeping end-to-end contact as an intersect.
///
/// # Examples
///
/// ```
/// # use arcline::math::Vec2;
/// # use arcline::intersect::{line_line_intr, LineLineIntr};
/// let v1 = Vec2::new(0.0, 0.0);
/// let v2 = Vec2::new(1.0, 0.0);
/// let u1 = Vec2::new(0.5, -1.0);
/// let u2 = Vec2::new(0.5, 1.0);
/// match line_line_intr(v1, v2, u1, u2, 1e-8) {
///     LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
///         assert_eq!(seg1_t, 0.5);
///         assert_eq!(seg2_t, 0.5);
///     }
///     _ => unreachable!("expected true intersect"),
/// }
/// ```
pub fn line_line_intr<T>(
    v1: Vec2<T>,
    v2: Vec2<T>,
    u1: Vec2<T>,
    u2: Vec2<T>,
    eps: T,
) -> LineLineIntr<T>
where
    T: Real,
{
    use LineLineIntr::*;

    let v = v2 - v1;
    let u = u2 - u1;
    let v_len = v.length();
    let u_len = u.length();

    // parametric position of `point` (assumed on the line) via projection onto the direction
    let project_on_v = |point: Vec2<T>| (point - v1).dot(v) / v.length_squared();
    let project_on_u = |point: Vec2<T>| (point - u1).dot(u) / u.length_squared();

    // degenerate point segments resolved before any direction arithmetic
    let v_is_point = v1.fuzzy_eq_eps(v2, eps);
    let u_is_point = u1.fuzzy_eq_eps(u2, eps);
    match (v_is_point, u_is_point) {
        (true, true) => {
            return if v1.fuzzy_eq_eps(u1, eps) {
                TrueIntersect {
                    seg1_t: T::zero(),
                    seg2_t: T::zero(),
                }
            } else {
                NoIntersect
            };
        }
        (true, false) => {
            // v collapses to a point, it intersects iff it lies on segment u
            if !u.perp_dot(v1 - u1).fuzzy_eq_zero_eps(eps) {
                return NoIntersect;
            }
            let seg2_t = project_on_u(v1);
            return if (seg2_t * u_len).fuzzy_in_range_eps(T::zero(), u_len, eps) {
                TrueIntersect {
                    seg1_t: T::zero(),
                    seg2_t,
                }
            } else {
                NoIntersect
            };
        }
        (false, true) => {
            if !v.perp_dot(u1 - v1).fuzzy_eq_zero_eps(eps) {
                return NoIntersect;
            }
            let seg1_t = project_on_v(u1);
            return if (seg1_t * v_len).fuzzy_in_range_eps(T::zero(), v_len, eps) {
                TrueIntersect {
                    seg1_t,
                    seg2_t: T::zero(),
                }
            } else {
                NoIntersect
            };
        }
        (false, false) => {}
    }

    let denom = v.perp_dot(u);
    let w = v1 - u1;

    if !denom.fuzzy_eq_zero_eps(eps) {
        // lines cross, solve both parametric values with perpendicular products
        let seg1_t = u.perp_dot(w) / denom;
        let seg2_t = v.perp_dot(w) / denom;
        let within_both = (seg1_t * v_len).fuzzy_in_range_eps(T::zero(), v_len, eps)
            && (seg2_t * u_len).fuzzy_in_range_eps(T::zero(), u_len, eps);
        return if within_both {
            TrueIntersect { seg1_t, seg2_t }
        } else {
            FalseIntersect { seg1_t, seg2_t }
        };
    }

    // parallel, not collinear means no intersect
    if !v.perp_dot(w).fuzzy_eq_zero_eps(eps) || !u.perp_dot(w).fuzzy_eq_zero_eps(eps) {
        return NoIntersect;
    }

    // collinear: overlap is the intersection of v's parametric interval on u with [0, 1]
    let proj1 = project_on_u(v1);
    let proj2 = project_on_u(v2);
    let (lo, hi) = if proj1 < proj2 {
        (proj1, proj2)
    } else {
        (proj2, proj1)
    };

    // sticky interval test keeps end to end contact as an intersect
    if !(lo * u_len).fuzzy_lt_eps(u_len, eps) || !(hi * u_len).fuzzy_gt_eps(T::zero(), eps) {
        return NoIntersect;
    }

    let seg2_t0 = num_traits::real::Real::max(lo, T::zero());
    let seg2_t1 = num_traits::real::Real::min(hi, T::one());

    if ((seg2_t1 - seg2_t0) * u_len).fuzzy_eq_zero_eps(eps) {
        // overlap interval collapsed to a point (segments line up end to end), report the
        // corresponding end of the first segment
        let seg1_t = if v1.fuzzy_eq_eps(u1, eps) || v1.fuzzy_eq_eps(u2, eps) {
            T::zero()
        } else {
            T::one()
        };

        return TrueIntersect {
            seg1_t,
            seg2_t: seg2_t0,
        };
    }

    Coincident { seg2_t0, seg2_t1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point_from_parametric;

    const EPS: f64 = 1e-8;

    #[test]
    fn crossing_segments() {
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
            Vec2::new(2.0, 0.0),
            EPS,
        );
        match r {
            LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                assert_fuzzy_eq!(seg1_t, 0.5);
                assert_fuzzy_eq!(seg2_t, 0.5);
            }
            _ => panic!("expected true intersect, got {:?}", r),
        }
    }

    #[test]
    fn symmetric_arguments() {
        let v1 = Vec2::new(-1.0, 3.0);
        let v2 = Vec2::new(4.0, -2.0);
        let u1 = Vec2::new(0.0, 0.0);
        let u2 = Vec2::new(3.0, 1.0);
        let (p_a, p_b) = match (
            line_line_intr(v1, v2, u1, u2, EPS),
            line_line_intr(u1, u2, v1, v2, EPS),
        ) {
            (
                LineLineIntr::TrueIntersect { seg1_t: t1, .. },
                LineLineIntr::TrueIntersect { seg2_t: s2, .. },
            ) => (
                point_from_parametric(v1, v2, t1),
                point_from_parametric(v1, v2, s2),
            ),
            r => panic!("expected true intersects, got {:?}", r),
        };
        assert!(p_a.fuzzy_eq_eps(p_b, 1e-8));
    }

    #[test]
    fn false_intersect_requires_extension() {
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, -1.0),
            Vec2::new(2.0, 1.0),
            EPS,
        );
        match r {
            LineLineIntr::FalseIntersect { seg1_t, seg2_t } => {
                assert_fuzzy_eq!(seg1_t, 2.0);
                assert_fuzzy_eq!(seg2_t, 0.5);
            }
            _ => panic!("expected false intersect, got {:?}", r),
        }
    }

    #[test]
    fn parallel_no_intersect() {
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            EPS,
        );
        assert!(matches!(r, LineLineIntr::NoIntersect));
    }

    #[test]
    fn collinear_overlap() {
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(3.0, 0.0),
            EPS,
        );
        match r {
            LineLineIntr::Coincident { seg2_t0, seg2_t1 } => {
                assert_fuzzy_eq!(seg2_t0, 0.0);
                assert_fuzzy_eq!(seg2_t1, 0.5);
            }
            _ => panic!("expected coincident, got {:?}", r),
        }
    }

    #[test]
    fn collinear_vertical_overlap() {
        let r = line_line_intr(
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(2.0, 1.5),
            Vec2::new(2.0, 0.5),
            EPS,
        );
        match r {
            LineLineIntr::Coincident { seg2_t0, seg2_t1 } => {
                assert_fuzzy_eq!(seg2_t0, 0.0);
                assert_fuzzy_eq!(seg2_t1, 1.0);
            }
            _ => panic!("expected coincident, got {:?}", r),
        }
    }

    #[test]
    fn collinear_end_to_end() {
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            EPS,
        );
        match r {
            LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                assert_fuzzy_eq!(seg1_t, 1.0);
                assert_fuzzy_eq!(seg2_t, 0.0);
            }
            _ => panic!("expected true intersect, got {:?}", r),
        }
    }

    #[test]
    fn collinear_disjoint() {
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 0.0),
            EPS,
        );
        assert!(matches!(r, LineLineIntr::NoIntersect));
    }

    #[test]
    fn point_segments() {
        // both points on top of each other
        let p = Vec2::new(1.0, 1.0);
        let r = line_line_intr(p, p, p, p, EPS);
        assert!(matches!(r, LineLineIntr::TrueIntersect { .. }));

        // first segment point on the second segment
        let r = line_line_intr(
            Vec2::new(0.5, 0.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            EPS,
        );
        match r {
            LineLineIntr::TrueIntersect { seg1_t, seg2_t } => {
                assert_fuzzy_eq!(seg1_t, 0.0);
                assert_fuzzy_eq!(seg2_t, 0.5);
            }
            _ => panic!("expected true intersect, got {:?}", r),
        }

        // point off the second segment's line
        let r = line_line_intr(
            Vec2::new(0.5, 1.0),
            Vec2::new(0.5, 1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            EPS,
        );
        assert!(matches!(r, LineLineIntr::NoIntersect));

        // distinct points
        let r = line_line_intr(
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            EPS,
        );
        assert!(matches!(r, LineLineIntr::NoIntersect));
    }
}
