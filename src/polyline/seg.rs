//! Geometry functions on a single polyline segment (a pair of consecutive vertexes, where the
//! first vertex's bulge decides whether the segment is a line or an arc).

use super::Vertex;
use crate::math::{
    angle, angle_is_within_sweep, bulge_from_angle, delta_angle, delta_angle_signed, dist_squared,
    line_seg_closest_point, midpoint, min_max, point_on_circle, point_within_arc_sweep, Vec2,
};
use crate::num::Real;
use crate::spatial::AABB;

/// Arc radius and center for the arc segment `v1` to `v2`.
///
/// Behavior undefined (may panic or return garbage) if `v1.bulge` is zero or the vertex positions
/// are on top of each other.
///
/// # Examples
///
/// ```
/// # use arcline::polyline::*;
/// # use arcline::math::*;
/// # use arcline::num::*;
/// // counter clockwise half circle from (0, 0) to (1, 0)
/// let v1 = Vertex::new(0.0, 0.0, 1.0);
/// let v2 = Vertex::new(1.0, 0.0, 0.0);
/// let (radius, center) = seg_arc_radius_and_center(v1, v2);
/// assert!(radius.fuzzy_eq(0.5));
/// assert!(center.fuzzy_eq(Vec2::new(0.5, 0.0)));
/// ```
pub fn seg_arc_radius_and_center<T>(v1: Vertex<T>, v2: Vertex<T>) -> (T, Vec2<T>)
where
    T: Real,
{
    debug_assert!(!v1.bulge_is_zero(), "expected arc segment");
    debug_assert!(!v1.pos().fuzzy_eq(v2.pos()), "vertexes must be distinct");

    // radius from chord length and bulge
    let abs_bulge = v1.bulge.abs();
    let chord_v = v2.pos() - v1.pos();
    let chord_len = chord_v.length();
    let radius = chord_len * (abs_bulge * abs_bulge + T::one()) / (T::four() * abs_bulge);

    // center offset from chord midpoint along the chord perpendicular, sagitta decides how far
    let sagitta = abs_bulge * chord_len / T::two();
    let m = radius - sagitta;
    let mut offs_x = -m * chord_v.y / chord_len;
    let mut offs_y = m * chord_v.x / chord_len;
    if v1.bulge_is_neg() {
        offs_x = -offs_x;
        offs_y = -offs_y;
    }

    let center = Vec2::new(
        v1.x + chord_v.x / T::two() + offs_x,
        v1.y + chord_v.y / T::two() + offs_y,
    );

    (radius, center)
}

/// Result of [seg_split_at_point].
#[derive(Debug, Copy, Clone)]
pub struct SplitResult<T = f64>
where
    T: Real,
{
    /// Start vertex of the first half (same position as the original start, updated bulge).
    pub updated_start: Vertex<T>,
    /// Vertex at the split point with bulge preserving the curve to the original end.
    pub split_vertex: Vertex<T>,
}

/// Split the segment `v1` to `v2` at `point_on_seg`, which is assumed to lie on the segment.
///
/// # Examples
///
/// ```
/// # use arcline::polyline::*;
/// # use arcline::math::*;
/// // counter clockwise half circle from (0, 0) to (1, 0) split at its bottom
/// let v1 = Vertex::new(0.0, 0.0, 1.0);
/// let v2 = Vertex::new(1.0, 0.0, 0.0);
/// let point = Vec2::new(0.5, -0.5);
/// let SplitResult { updated_start, split_vertex } = seg_split_at_point(v1, v2, point, 1e-5);
/// let quarter_bulge = (std::f64::consts::PI / 8.0).tan();
/// assert!(updated_start.fuzzy_eq(Vertex::new(v1.x, v1.y, quarter_bulge)));
/// assert!(split_vertex.fuzzy_eq(Vertex::new(point.x, point.y, quarter_bulge)));
/// ```
pub fn seg_split_at_point<T>(
    v1: Vertex<T>,
    v2: Vertex<T>,
    point_on_seg: Vec2<T>,
    pos_equal_eps: T,
) -> SplitResult<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        // line segment
        return SplitResult {
            updated_start: v1,
            split_vertex: Vertex::from_vec2(point_on_seg, T::zero()),
        };
    }

    if v1.pos().fuzzy_eq_eps(v2.pos(), pos_equal_eps)
        || v1.pos().fuzzy_eq_eps(point_on_seg, pos_equal_eps)
    {
        // degenerate or split at start, both result vertexes land on the split point
        return SplitResult {
            updated_start: Vertex::from_vec2(point_on_seg, T::zero()),
            split_vertex: Vertex::from_vec2(point_on_seg, v1.bulge),
        };
    }

    if v2.pos().fuzzy_eq_eps(point_on_seg, pos_equal_eps) {
        // split at end
        return SplitResult {
            updated_start: v1,
            split_vertex: Vertex::new(v2.x, v2.y, T::zero()),
        };
    }

    let (_, arc_center) = seg_arc_radius_and_center(v1, v2);

    let point_angle = angle(arc_center, point_on_seg);

    let start_angle = angle(arc_center, v1.pos());
    let theta1 = delta_angle_signed(start_angle, point_angle, v1.bulge_is_neg());
    let bulge1 = bulge_from_angle(theta1);

    let end_angle = angle(arc_center, v2.pos());
    let theta2 = delta_angle_signed(point_angle, end_angle, v1.bulge_is_neg());
    let bulge2 = bulge_from_angle(theta2);

    SplitResult {
        updated_start: Vertex::new(v1.x, v1.y, bulge1),
        split_vertex: Vertex::from_vec2(point_on_seg, bulge2),
    }
}

/// Tangent direction vector of the segment `v1` to `v2` at `point_on_seg` (not normalized).
pub fn seg_tangent_vector<T>(v1: Vertex<T>, v2: Vertex<T>, point_on_seg: Vec2<T>) -> Vec2<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        return v2.pos() - v1.pos();
    }

    let (_, arc_center) = seg_arc_radius_and_center(v1, v2);
    let radius_v = point_on_seg - arc_center;
    if v1.bulge_is_pos() {
        // counter clockwise, rotate radius vector by 90 degrees
        radius_v.perp()
    } else {
        // clockwise, rotate by -90 degrees
        -radius_v.perp()
    }
}

/// Closest point on the segment `v1` to `v2` to `point`.
///
/// If multiple closest points exist one of them is returned (which one is unspecified).
///
/// # Examples
///
/// ```
/// # use arcline::polyline::*;
/// # use arcline::math::*;
/// // counter clockwise half circle from (2, 2) to (4, 2) (bottom bowl)
/// let v1 = Vertex::new(2.0, 2.0, 1.0);
/// let v2 = Vertex::new(4.0, 2.0, 0.0);
/// assert!(seg_closest_point(v1, v2, Vec2::new(3.0, 0.0)).fuzzy_eq(Vec2::new(3.0, 1.0)));
/// assert!(seg_closest_point(v1, v2, v1.pos()).fuzzy_eq(v1.pos()));
/// ```
pub fn seg_closest_point<T>(v1: Vertex<T>, v2: Vertex<T>, point: Vec2<T>) -> Vec2<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        return line_seg_closest_point(v1.pos(), v2.pos(), point);
    }

    let (arc_radius, arc_center) = seg_arc_radius_and_center(v1, v2);
    if point.fuzzy_eq(arc_center) {
        // point is at the center, any point of the arc is closest, avoid normalizing a zero
        // length vector
        return v1.pos();
    }

    if point_within_arc_sweep(arc_center, v1.pos(), v2.pos(), v1.bulge_is_neg(), point) {
        // ray from center through point hits the arc
        let v_to_point = (point - arc_center).normalize();
        return v_to_point.scale(arc_radius) + arc_center;
    }

    // closest point is one of the arc end points
    let dist1 = dist_squared(v1.pos(), point);
    let dist2 = dist_squared(v2.pos(), point);
    if dist1 < dist2 {
        return v1.pos();
    }

    v2.pos()
}

/// Fast approximate axis aligned bounding box of the segment `v1` to `v2`.
///
/// Never smaller than the true bounding box but may be larger. Arc boxes are formed by extending
/// the chord rectangle by the sagitta, which avoids the slower exact arc extents computation, see
/// [seg_bounding_box] for the exact form.
pub fn seg_fast_approx_bounding_box<T>(v1: Vertex<T>, v2: Vertex<T>) -> AABB<T>
where
    T: Real,
{
    use num_traits::real::Real;
    if v1.bulge_is_zero() {
        let (min_x, max_x) = min_max(v1.x, v2.x);
        let (min_y, max_y) = min_max(v1.y, v2.y);
        return AABB::new(min_x, min_y, max_x, max_y);
    }

    // extend the chord end points by the sagitta vector, box of those 4 points bounds the arc
    let b = v1.bulge;
    let offs_x = b * (v2.y - v1.y) / T::two();
    let offs_y = -b * (v2.x - v1.x) / T::two();

    let (pt_x_min, pt_x_max) = min_max(v1.x + offs_x, v2.x + offs_x);
    let (pt_y_min, pt_y_max) = min_max(v1.y + offs_y, v2.y + offs_y);

    let (end_x_min, end_x_max) = min_max(v1.x, v2.x);
    let (end_y_min, end_y_max) = min_max(v1.y, v2.y);

    AABB::new(
        Real::min(end_x_min, pt_x_min),
        Real::min(end_y_min, pt_y_min),
        Real::max(end_x_max, pt_x_max),
        Real::max(end_y_max, pt_y_max),
    )
}

/// Exact bounding box of an arc segment. Assumes `v1` to `v2` is an arc.
pub(crate) fn arc_seg_bounding_box<T>(v1: Vertex<T>, v2: Vertex<T>) -> AABB<T>
where
    T: Real,
{
    use num_traits::real::Real;
    debug_assert!(!v1.bulge_is_zero(), "expected arc segment");

    if v1.pos().fuzzy_eq(v2.pos()) {
        return AABB::new(v1.x, v1.y, v1.x, v1.y);
    }

    let (arc_radius, arc_center) = seg_arc_radius_and_center(v1, v2);
    let start_angle = angle(arc_center, v1.pos());
    let end_angle = angle(arc_center, v2.pos());
    let sweep_angle = delta_angle_signed(start_angle, end_angle, v1.bulge_is_neg());

    let crosses_angle = |a| angle_is_within_sweep(a, start_angle, sweep_angle);

    // extreme points of the circle are included only where the sweep crosses an axis direction
    let min_x = if crosses_angle(T::pi()) {
        arc_center.x - arc_radius
    } else {
        Real::min(v1.x, v2.x)
    };

    let min_y = if crosses_angle(T::from(1.5).unwrap() * T::pi()) {
        arc_center.y - arc_radius
    } else {
        Real::min(v1.y, v2.y)
    };

    let max_x = if crosses_angle(T::zero()) {
        arc_center.x + arc_radius
    } else {
        Real::max(v1.x, v2.x)
    };

    let max_y = if crosses_angle(T::from(0.5).unwrap() * T::pi()) {
        arc_center.y + arc_radius
    } else {
        Real::max(v1.y, v2.y)
    };

    AABB::new(min_x, min_y, max_x, max_y)
}

/// Exact axis aligned bounding box of the segment `v1` to `v2`.
///
/// Slower than [seg_fast_approx_bounding_box] for arcs.
pub fn seg_bounding_box<T>(v1: Vertex<T>, v2: Vertex<T>) -> AABB<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        let (min_x, max_x) = min_max(v1.x, v2.x);
        let (min_y, max_y) = min_max(v1.y, v2.y);
        AABB::new(min_x, min_y, max_x, max_y)
    } else {
        arc_seg_bounding_box(v1, v2)
    }
}

/// Path length of the segment `v1` to `v2` (`radius * |sweep|` for arcs).
///
/// # Examples
///
/// ```
/// # use arcline::polyline::*;
/// # use arcline::num::*;
/// // half circle of radius 1
/// let v1 = Vertex::new(2.0, 2.0, 1.0);
/// let v2 = Vertex::new(4.0, 2.0, 0.0);
/// assert!(seg_length(v1, v2).fuzzy_eq(std::f64::consts::PI));
/// ```
pub fn seg_length<T>(v1: Vertex<T>, v2: Vertex<T>) -> T
where
    T: Real,
{
    if v1.pos().fuzzy_eq(v2.pos()) {
        return T::zero();
    }

    if v1.bulge_is_zero() {
        return dist_squared(v1.pos(), v2.pos()).sqrt();
    }

    let (arc_radius, arc_center) = seg_arc_radius_and_center(v1, v2);
    let start_angle = angle(arc_center, v1.pos());
    let end_angle = angle(arc_center, v2.pos());
    arc_radius * delta_angle(start_angle, end_angle).abs()
}

/// Midpoint of the segment `v1` to `v2` (on the arc for arc segments).
///
/// # Examples
///
/// ```
/// # use arcline::polyline::*;
/// # use arcline::math::*;
/// // counter clockwise half circle from (2, 2) to (4, 2)
/// let v1 = Vertex::new(2.0, 2.0, 1.0);
/// let v2 = Vertex::new(4.0, 2.0, 0.0);
/// assert!(seg_midpoint(v1, v2).fuzzy_eq(Vec2::new(3.0, 1.0)));
/// ```
pub fn seg_midpoint<T>(v1: Vertex<T>, v2: Vertex<T>) -> Vec2<T>
where
    T: Real,
{
    if v1.bulge_is_zero() {
        return midpoint(v1.pos(), v2.pos());
    }

    let (arc_radius, arc_center) = seg_arc_radius_and_center(v1, v2);
    let angle1 = angle(arc_center, v1.pos());
    let angle2 = angle(arc_center, v2.pos());
    let angle_offset = delta_angle_signed(angle1, angle2, v1.bulge_is_neg()) / T::two();
    point_on_circle(arc_radius, arc_center, angle1 + angle_offset)
}
