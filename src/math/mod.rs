//! Common math utilities: angle arithmetic, parametric line helpers, perp dot orientation tests,
//! and bulge/sweep angle conversion.

mod vec2;

pub use vec2::Vec2;

use crate::num::Real;

/// Returns `(min, max)` of the two values given.
#[inline]
pub fn min_max<T>(v1: T, v2: T) -> (T, T)
where
    T: PartialOrd,
{
    if v1 < v2 {
        (v1, v2)
    } else {
        (v2, v1)
    }
}

/// Normalize `angle` radians to be within `[0, 2PI]`.
///
/// # Examples
///
/// ```
/// # use arcline::math::*;
/// # use arcline::num::*;
/// use std::f64::consts::PI;
/// assert!(normalize_radians(5.0 * PI).fuzzy_eq(PI));
/// assert!(normalize_radians(-PI / 4.0).fuzzy_eq(7.0 * PI / 4.0));
/// ```
#[inline]
pub fn normalize_radians<T>(angle: T) -> T
where
    T: Real,
{
    if angle >= T::zero() && angle <= T::tau() {
        return angle;
    }

    angle - (angle / T::tau()).floor() * T::tau()
}

/// Smallest difference between two angles, negative if the normalized difference exceeds `PI`.
///
/// # Examples
///
/// ```
/// # use arcline::math::*;
/// # use arcline::num::*;
/// use std::f64::consts::PI;
/// assert!(delta_angle(0.25 * PI, 0.5 * PI).fuzzy_eq(0.25 * PI));
/// assert!(delta_angle(0.5 * PI, 0.25 * PI).fuzzy_eq(-0.25 * PI));
/// ```
#[inline]
pub fn delta_angle<T>(angle1: T, angle2: T) -> T
where
    T: Real,
{
    let mut diff = normalize_radians(angle2 - angle1);
    if diff > T::pi() {
        diff = diff - T::tau();
    }

    diff
}

/// Same as [delta_angle] but the sign of the result is forced according to `negative`.
///
/// Used when the direction of travel is already known (e.g. from an arc's bulge sign) and the
/// ambiguity of a half turn difference must resolve consistently.
#[inline]
pub fn delta_angle_signed<T>(angle1: T, angle2: T, negative: bool) -> T
where
    T: Real,
{
    let diff = delta_angle(angle1, angle2);
    if negative {
        -diff.abs()
    } else {
        diff.abs()
    }
}

/// Test if `test_angle` lies within the counter clockwise sweep from `start_angle` to `end_angle`,
/// fuzzy inclusive using `eps`.
#[inline]
pub fn angle_is_between_eps<T>(test_angle: T, start_angle: T, end_angle: T, eps: T) -> bool
where
    T: Real,
{
    let end_sweep = normalize_radians(end_angle - start_angle);
    let mid_sweep = normalize_radians(test_angle - start_angle);

    mid_sweep < end_sweep + eps
}

/// [angle_is_between_eps] using default epsilon.
#[inline]
pub fn angle_is_between<T>(test_angle: T, start_angle: T, end_angle: T) -> bool
where
    T: Real,
{
    angle_is_between_eps(test_angle, start_angle, end_angle, T::fuzzy_epsilon())
}

/// Test if `test_angle` is within the signed `sweep_angle` starting at `start_angle` (positive
/// sweep counter clockwise, negative clockwise).
#[inline]
pub fn angle_is_within_sweep_eps<T>(test_angle: T, start_angle: T, sweep_angle: T, eps: T) -> bool
where
    T: Real,
{
    let end_angle = start_angle + sweep_angle;
    if sweep_angle < T::zero() {
        return angle_is_between_eps(test_angle, end_angle, start_angle, eps);
    }

    angle_is_between_eps(test_angle, start_angle, end_angle, eps)
}

/// [angle_is_within_sweep_eps] using default epsilon.
#[inline]
pub fn angle_is_within_sweep<T>(test_angle: T, start_angle: T, sweep_angle: T) -> bool
where
    T: Real,
{
    angle_is_within_sweep_eps(test_angle, start_angle, sweep_angle, T::fuzzy_epsilon())
}

/// Squared distance between `p0` and `p1`.
#[inline]
pub fn dist_squared<T>(p0: Vec2<T>, p1: Vec2<T>) -> T
where
    T: Real,
{
    let d = p0 - p1;
    d.dot(d)
}

/// Polar angle of the direction vector from `p0` to `p1`.
#[inline]
pub fn angle<T>(p0: Vec2<T>, p1: Vec2<T>) -> T
where
    T: Real,
{
    T::atan2(p1.y - p0.y, p1.x - p0.x)
}

/// Midpoint of the line segment from `p0` to `p1`.
#[inline]
pub fn midpoint<T>(p0: Vec2<T>, p1: Vec2<T>) -> Vec2<T>
where
    T: Real,
{
    Vec2::new((p0.x + p1.x) / T::two(), (p0.y + p1.y) / T::two())
}

/// Point on the circle defined by `radius` and `center` at polar `angle` radians.
#[inline]
pub fn point_on_circle<T>(radius: T, center: Vec2<T>, angle: T) -> Vec2<T>
where
    T: Real,
{
    let (s, c) = angle.sin_cos();
    Vec2::new(center.x + radius * c, center.y + radius * s)
}

/// Point on the line segment from `p0` to `p1` at parametric value `t` (`P(t) = p0 + t(p1 - p0)`).
#[inline]
pub fn point_from_parametric<T>(p0: Vec2<T>, p1: Vec2<T>, t: T) -> Vec2<T>
where
    T: Real,
{
    p0 + (p1 - p0).scale(t)
}

/// Parametric value of `point` on the line from `p0` to `p1`.
///
/// Assumes `point` lies on the line; `eps` decides when the segment is treated as vertical (the
/// y coordinate is used for the solve in that case to avoid dividing by a tiny x delta).
#[inline]
pub fn parametric_from_point<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>, eps: T) -> T
where
    T: Real,
{
    if p0.x.fuzzy_eq_eps(p1.x, eps) {
        (point.y - p0.y) / (p1.y - p0.y)
    } else {
        (point.x - p0.x) / (p1.x - p0.x)
    }
}

/// Closest point to `point` on the line segment from `p0` to `p1` (clamped to the segment ends).
#[inline]
pub fn line_seg_closest_point<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>) -> Vec2<T>
where
    T: Real,
{
    // project using dot products, see: http://geomalgorithms.com/a02-_lines.html
    let v = p1 - p0;
    let w = point - p0;
    let c1 = w.dot(v);
    if c1 < T::fuzzy_epsilon() {
        return p0;
    }

    let c2 = v.length_squared();
    if c2 < c1 + T::fuzzy_epsilon() {
        return p1;
    }

    p0 + v.scale(c1 / c2)
}

#[inline]
fn perp_dot_test<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>) -> T
where
    T: Real,
{
    (p1.x - p0.x) * (point.y - p0.y) - (p1.y - p0.y) * (point.x - p0.x)
}

/// Returns true if `point` is left of the direction vector `p1 - p0`.
#[inline]
pub fn is_left<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>) -> bool
where
    T: Real,
{
    perp_dot_test(p0, p1, point) > T::zero()
}

/// Same as [is_left] but inclusive of points lying exactly on the line.
#[inline]
pub fn is_left_or_equal<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>) -> bool
where
    T: Real,
{
    perp_dot_test(p0, p1, point) >= T::zero()
}

/// Returns true if `point` is left of or fuzzy coincident with the direction vector `p1 - p0`.
#[inline]
pub fn is_left_or_coincident_eps<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>, eps: T) -> bool
where
    T: Real,
{
    perp_dot_test(p0, p1, point) > -eps
}

/// [is_left_or_coincident_eps] using default epsilon.
#[inline]
pub fn is_left_or_coincident<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>) -> bool
where
    T: Real,
{
    is_left_or_coincident_eps(p0, p1, point, T::fuzzy_epsilon())
}

/// Returns true if `point` is right of or fuzzy coincident with the direction vector `p1 - p0`.
#[inline]
pub fn is_right_or_coincident_eps<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>, eps: T) -> bool
where
    T: Real,
{
    perp_dot_test(p0, p1, point) < eps
}

/// [is_right_or_coincident_eps] using default epsilon.
#[inline]
pub fn is_right_or_coincident<T>(p0: Vec2<T>, p1: Vec2<T>, point: Vec2<T>) -> bool
where
    T: Real,
{
    is_right_or_coincident_eps(p0, p1, point, T::fuzzy_epsilon())
}

/// Test if `point` lies within the angular region swept by an arc (projected out to infinite
/// radius).
///
/// The arc is defined by `center`, `arc_start`, `arc_end`, and direction (`is_clockwise`). The
/// test is fuzzy inclusive of the sweep boundary rays.
///
/// # Examples
///
/// ```
/// # use arcline::math::*;
/// // counter clockwise quarter arc whose angular region covers quadrant I
/// let center = Vec2::new(0.0, 0.0);
/// let arc_start = Vec2::new(1.0, 0.0);
/// let arc_end = Vec2::new(0.0, 1.0);
/// assert!(point_within_arc_sweep(center, arc_start, arc_end, false, Vec2::new(1.0, 1.0)));
/// assert!(point_within_arc_sweep(center, arc_start, arc_end, false, Vec2::new(1.0, 0.0)));
/// assert!(!point_within_arc_sweep(center, arc_start, arc_end, false, Vec2::new(1.0, -0.5)));
/// ```
#[inline]
pub fn point_within_arc_sweep<T>(
    center: Vec2<T>,
    arc_start: Vec2<T>,
    arc_end: Vec2<T>,
    is_clockwise: bool,
    point: Vec2<T>,
) -> bool
where
    T: Real,
{
    if is_clockwise {
        is_right_or_coincident(center, arc_start, point)
            && is_left_or_coincident(center, arc_end, point)
    } else {
        is_left_or_coincident(center, arc_start, point)
            && is_right_or_coincident(center, arc_end, point)
    }
}

/// Bulge value for an arc `sweep_angle` (`bulge = tan(sweep_angle / 4)`).
#[inline]
pub fn bulge_from_angle<T>(sweep_angle: T) -> T
where
    T: Real,
{
    (sweep_angle / T::four()).tan()
}

/// Arc sweep angle for a `bulge` value (`sweep_angle = 4 * atan(bulge)`).
#[inline]
pub fn angle_from_bulge<T>(bulge: T) -> T
where
    T: Real,
{
    T::four() * bulge.atan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn normalize_radians_cases() {
        assert_fuzzy_eq!(normalize_radians(0.0), 0.0);
        assert_fuzzy_eq!(normalize_radians(PI), PI);
        assert_fuzzy_eq!(normalize_radians(2.0 * PI), 2.0 * PI);
        assert_fuzzy_eq!(normalize_radians(5.0 * PI), PI);
        assert_fuzzy_eq!(normalize_radians(-PI / 4.0), 7.0 * PI / 4.0);
    }

    #[test]
    fn delta_angle_cases() {
        assert_fuzzy_eq!(delta_angle(5.0 * PI, 5.0 * PI), 0.0);
        assert_fuzzy_eq!(delta_angle(4.0 * PI, 5.0 * PI), PI);
        assert_fuzzy_eq!(delta_angle(5.0 * PI, 4.0 * PI), PI);
        assert_fuzzy_eq!(delta_angle(0.5 * PI, 0.25 * PI), -0.25 * PI);
    }

    #[test]
    fn angle_sweep_containment() {
        assert!(angle_is_between_eps(PI / 2.0, 0.0, PI, 1e-5));
        assert!(angle_is_between_eps(0.0, 0.0, PI, 1e-5));
        assert!(angle_is_between_eps(PI, 0.0, PI, 1e-5));
        // between is always computed counter clockwise
        assert!(angle_is_between_eps(0.0, PI, PI / 2.0, 1e-5));
        // negative sweep goes clockwise
        assert!(angle_is_within_sweep_eps(-PI / 4.0, 0.0, -PI / 2.0, 1e-5));
        assert!(!angle_is_within_sweep_eps(PI / 4.0, 0.0, -PI / 2.0, 1e-5));
    }

    #[test]
    fn bulge_angle_round_trip() {
        assert_fuzzy_eq!(bulge_from_angle(PI), 1.0);
        assert_fuzzy_eq!(angle_from_bulge(1.0), PI);
        assert_fuzzy_eq!(angle_from_bulge(bulge_from_angle(0.7)), 0.7);
        assert_fuzzy_eq!(bulge_from_angle(-PI / 2.0), -(PI / 8.0).tan());
    }

    #[test]
    fn parametric_round_trip() {
        let p0 = Vec2::new(1.0, 1.0);
        let p1 = Vec2::new(3.0, 5.0);
        let pt = point_from_parametric(p0, p1, 0.25);
        assert_fuzzy_eq!(parametric_from_point(p0, p1, pt, 1e-8), 0.25);

        // vertical segment uses the y solve
        let p0 = Vec2::new(2.0, 0.0);
        let p1 = Vec2::new(2.0, 4.0);
        let pt = point_from_parametric(p0, p1, 0.75);
        assert_fuzzy_eq!(parametric_from_point(p0, p1, pt, 1e-8), 0.75);
    }

    #[test]
    fn closest_point_on_line_seg() {
        let p0 = Vec2::new(0.0, 0.0);
        let p1 = Vec2::new(2.0, 0.0);
        assert!(line_seg_closest_point(p0, p1, Vec2::new(1.0, 1.0)).fuzzy_eq(Vec2::new(1.0, 0.0)));
        assert!(line_seg_closest_point(p0, p1, Vec2::new(-1.0, 1.0)).fuzzy_eq(p0));
        assert!(line_seg_closest_point(p0, p1, Vec2::new(3.0, 1.0)).fuzzy_eq(p1));
    }

    #[test]
    fn left_right_tests() {
        let p0 = Vec2::new(1.0, 1.0);
        let p1 = Vec2::new(2.0, 2.0);
        assert!(is_left(p0, p1, Vec2::new(0.0, 1.0)));
        assert!(!is_left(p0, p1, Vec2::new(1.0, 0.0)));
        assert!(is_left_or_equal(p0, p1, Vec2::new(1.5, 1.5)));
    }
}
