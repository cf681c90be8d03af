use crate::math::Vec2;
use crate::num::Real;

/// Result of intersecting two circles.
#[derive(Debug, Copy, Clone)]
pub enum CircleCircleIntr<T>
where
    T: Real,
{
    /// No intersect (circles too far apart or one strictly contains the other).
    NoIntersect,
    /// Circles touch at a single tangent point (externally or internally).
    TangentIntersect {
        /// The tangent point.
        point: Vec2<T>,
    },
    /// Circles cross at two points.
    TwoIntersects {
        /// First intersect point.
        point1: Vec2<T>,
        /// Second intersect point.
        point2: Vec2<T>,
    },
    /// Circles have the same center and radius (same circle).
    Overlapping,
}

/// Find the intersects between two circles defined by `radius1`/`center1` and `radius2`/`center2`.
///
/// Subtracting the two circle equations leaves the radical line `2(c2 - c1)·p = const`; any
/// intersect point lies on it. The foot of the perpendicular from `center1` onto that line is at
/// signed distance `t = (dist² + r1² - r2²) / (2·dist)` along the center-to-center direction, and
/// the intersect points sit a half chord to either side of the foot along the radical line
/// itself. A vanishing half chord is the tangent configuration.
pub fn circle_circle_intr<T>(
    radius1: T,
    center1: Vec2<T>,
    radius2: T,
    center2: Vec2<T>,
    eps: T,
) -> CircleCircleIntr<T>
where
    T: Real,
{
    use CircleCircleIntr::*;

    let between = center2 - center1;
    let dist = between.length();

    if dist.fuzzy_eq_zero_eps(eps) {
        // concentric, either the same circle or nested with no intersect
        if radius1.fuzzy_eq_eps(radius2, eps) {
            return Overlapping;
        }
        return NoIntersect;
    }

    if !dist.fuzzy_lt_eps(radius1 + radius2, eps) || !dist.fuzzy_gt_eps((radius1 - radius2).abs(), eps)
    {
        // centers too far apart, or one circle nested inside the other
        return NoIntersect;
    }

    // signed distance from center1 to the radical line along the center direction
    let to_radical_line = (dist * dist + radius1 * radius1 - radius2 * radius2) / (T::two() * dist);
    let dir = between * dist.recip();
    let foot = center1 + dir * to_radical_line;

    let half_chord_sq = radius1 * radius1 - to_radical_line * to_radical_line;
    if half_chord_sq <= T::zero() {
        return TangentIntersect { point: foot };
    }

    let half_chord = dir.perp() * half_chord_sq.sqrt();
    let point1 = foot - half_chord;
    let point2 = foot + half_chord;

    if point1.fuzzy_eq_eps(point2, eps) {
        // half chord below position tolerance, snap to tangency
        return TangentIntersect { point: foot };
    }

    TwoIntersects { point1, point2 }
}
