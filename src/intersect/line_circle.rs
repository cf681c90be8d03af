use crate::math::{min_max, parametric_from_point, Vec2};
use crate::num::Real;

/// Result of intersecting a line with a circle.
#[derive(Debug, Copy, Clone)]
pub enum LineCircleIntr<T>
where
    T: Real,
{
    /// No intersect between the line and the circle.
    NoIntersect,
    /// Line is tangent to the circle at a single point.
    TangentIntersect {
        /// Parametric value of the tangent point on the line.
        t0: T,
    },
    /// Line crosses the circle at two points.
    TwoIntersects {
        /// Parametric value of the first intersect (smaller value).
        t0: T,
        /// Parametric value of the second intersect (larger value).
        t1: T,
    },
}

/// Find the intersects between the line through `p0` and `p1` and the circle defined by `radius`
/// and `circle_center`.
///
/// Results are parametric values for `P(t) = p0 + t * (p1 - p0)` and are **not** clipped to
/// `[0, 1]`; the caller decides what part of the infinite line is of interest (`t < 0` is before
/// `p0`, `t > 1` past `p1`). Near tangent configurations snap to a single
/// [LineCircleIntr::TangentIntersect] so grazing contacts are not split into two nearly equal
/// roots.
///
/// Solved by intersecting the implicit line form `Ax + By + C = 0` (with the circle shifted to the
/// origin) against the radius, which is better behaved numerically than the direct quadratic in
/// `t`.
///
/// # Examples
///
/// ```
/// # use arcline::math::Vec2;
/// # use arcline::intersect::{line_circle_intr, LineCircleIntr};
/// // horizontal segment grazing the bottom of a unit circle centered at (0, 1)
/// let p0 = Vec2::new(0.0, 0.0);
/// let p1 = Vec2::new(1.0, 0.0);
/// match line_circle_intr(p0, p1, 1.0, Vec2::new(0.0, 1.0), 1e-5) {
///     LineCircleIntr::TangentIntersect { t0 } => assert_eq!(t0, 0.0),
///     _ => unreachable!("expected tangent intersect"),
/// }
/// ```
pub fn line_circle_intr<T>(
    p0: Vec2<T>,
    p1: Vec2<T>,
    radius: T,
    circle_center: Vec2<T>,
    eps: T,
) -> LineCircleIntr<T>
where
    T: Real,
{
    use LineCircleIntr::*;

    let dx = p1.x - p0.x;
    let dy = p1.y - p0.y;

    if p0.fuzzy_eq_eps(p1, eps) {
        // degenerate point segment, test if the point lies on the circle
        let xh = (p0.x + p1.x) / T::two() - circle_center.x;
        let yk = (p0.y + p1.y) / T::two() - circle_center.y;
        if (xh * xh + yk * yk).fuzzy_eq_eps(radius * radius, eps) {
            return TangentIntersect { t0: T::zero() };
        }
        return NoIntersect;
    }

    let p0_shifted = p0 - circle_center;
    let p1_shifted = p1 - circle_center;

    // implicit line coefficients with the circle shifted to the origin, the default epsilon is
    // used for the vertical check since it only guards the division (not the returned result case)
    let (a, b, c) = if dx.fuzzy_eq_zero() {
        let x_pos = (p1_shifted.x + p0_shifted.x) / T::two();
        (T::one(), T::zero(), -x_pos)
    } else {
        let m = dy / dx;
        (m, -T::one(), p1_shifted.y - m * p1_shifted.x)
    };

    let a2_b2 = a * a + b * b;

    // distance from the origin (circle center) to the line
    let shortest_dist = c.abs() / a2_b2.sqrt();

    if shortest_dist > radius + eps {
        return NoIntersect;
    }

    // foot of the perpendicular from the center, shifted back to input coordinates
    let x0 = -a * c / a2_b2 + circle_center.x;
    let y0 = -b * c / a2_b2 + circle_center.y;

    if shortest_dist.fuzzy_eq_eps(radius, eps) {
        let t = parametric_from_point(p0, p1, Vec2::new(x0, y0), eps);
        return TangentIntersect { t0: t };
    }

    let d = radius * radius - c * c / a2_b2;
    // abs to avoid NaN from a tiny negative under the sqrt
    let mult = (d / a2_b2).abs().sqrt();

    let sol1 = parametric_from_point(p0, p1, Vec2::new(x0 + b * mult, y0 - a * mult), eps);
    let sol2 = parametric_from_point(p0, p1, Vec2::new(x0 - b * mult, y0 + a * mult), eps);
    let (t0, t1) = min_max(sol1, sol2);
    TwoIntersects { t0, t1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::point_from_parametric;

    const EPS: f64 = 1e-5;

    #[test]
    fn no_intersect() {
        let r = line_circle_intr(
            Vec2::new(-1.0, 2.0),
            Vec2::new(1.0, 2.0),
            1.0,
            Vec2::new(0.0, 0.0),
            EPS,
        );
        assert!(matches!(r, LineCircleIntr::NoIntersect));
    }

    #[test]
    fn two_intersects_through_center() {
        let r = line_circle_intr(
            Vec2::new(-2.0, 0.0),
            Vec2::new(2.0, 0.0),
            1.0,
            Vec2::new(0.0, 0.0),
            EPS,
        );
        match r {
            LineCircleIntr::TwoIntersects { t0, t1 } => {
                assert_fuzzy_eq!(t0, 0.25);
                assert_fuzzy_eq!(t1, 0.75);
            }
            _ => panic!("expected two intersects, got {:?}", r),
        }
    }

    #[test]
    fn results_not_clipped_to_segment() {
        // segment entirely left of the circle, intersects of the extended line still reported
        let p0 = Vec2::new(-4.0, 0.0);
        let p1 = Vec2::new(-2.0, 0.0);
        let r = line_circle_intr(p0, p1, 1.0, Vec2::new(0.0, 0.0), EPS);
        match r {
            LineCircleIntr::TwoIntersects { t0, t1 } => {
                assert!(t0 > 1.0 && t1 > 1.0);
                assert!(point_from_parametric(p0, p1, t0).fuzzy_eq_eps(Vec2::new(-1.0, 0.0), EPS));
                assert!(point_from_parametric(p0, p1, t1).fuzzy_eq_eps(Vec2::new(1.0, 0.0), EPS));
            }
            _ => panic!("expected two intersects, got {:?}", r),
        }
    }

    #[test]
    fn vertical_line_tangent() {
        let r = line_circle_intr(
            Vec2::new(1.0, -1.0),
            Vec2::new(1.0, 1.0),
            1.0,
            Vec2::new(0.0, 0.0),
            EPS,
        );
        match r {
            LineCircleIntr::TangentIntersect { t0 } => {
                assert_fuzzy_eq!(t0, 0.5);
            }
            _ => panic!("expected tangent intersect, got {:?}", r),
        }
    }

    #[test]
    fn point_segment_on_circle() {
        let r = line_circle_intr(
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 0.0),
            1.0,
            Vec2::new(0.0, 0.0),
            EPS,
        );
        assert!(matches!(r, LineCircleIntr::TangentIntersect { .. }));

        let r = line_circle_intr(
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 0.0),
            1.0,
            Vec2::new(0.0, 0.0),
            EPS,
        );
        assert!(matches!(r, LineCircleIntr::NoIntersect));
    }

    #[test]
    fn intersect_points_on_circle() {
        let p0 = Vec2::new(-3.0, 0.5);
        let p1 = Vec2::new(3.0, 0.7);
        let center = Vec2::new(0.2, 0.1);
        let radius = 1.3;
        match line_circle_intr(p0, p1, radius, center, EPS) {
            LineCircleIntr::TwoIntersects { t0, t1 } => {
                for t in [t0, t1] {
                    let pt = point_from_parametric(p0, p1, t);
                    assert_fuzzy_eq!((pt - center).length(), radius, 1e-8);
                }
            }
            r => panic!("expected two intersects, got {:?}", r),
        }
    }
}
