use super::{
    seg_arc_radius_and_center, seg_bounding_box, seg_closest_point, seg_fast_approx_bounding_box,
    seg_length, BooleanInvalidInput, BooleanOp, BooleanOptions, BooleanResult, ClosestPointResult,
    FindIntersectsOptions, IntersectsCollection, OffsetOptions, PlineOrientation, Vertex,
};
use crate::math::{
    angle, angle_from_bulge, dist_squared, point_on_circle, point_within_arc_sweep, Vec2,
};
use crate::num::Real;
use crate::spatial::{SpatialIndexBuilder, SpatialIndexError, StaticSpatialIndex};
use num_traits::cast::NumCast;
use num_traits::ToPrimitive;
use std::ops::{Index, IndexMut};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Polyline represented by a sequence of vertexes and a closed/open flag.
///
/// Each vertex holds a position and the bulge of the segment that starts at it (see [Vertex]).
/// When closed the last vertex connects back to the first using the last vertex's bulge.
///
/// # Examples
///
/// ```
/// # use arcline::polyline::*;
/// # use arcline::num::*;
/// // closed circle of radius 1 formed by two half circle arc segments
/// let mut circle = Polyline::new_closed();
/// circle.add(0.0, 0.0, 1.0);
/// circle.add(2.0, 0.0, 1.0);
/// assert!(circle.area().fuzzy_eq(std::f64::consts::PI));
/// assert!(circle.path_length().fuzzy_eq(2.0 * std::f64::consts::PI));
/// ```
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Default)]
pub struct Polyline<T = f64> {
    /// Vertex sequence of the polyline.
    pub vertexes: Vec<Vertex<T>>,
    /// Whether the final vertex connects back to the first.
    pub is_closed: bool,
}

impl<T> Polyline<T>
where
    T: Real,
{
    /// New empty open polyline.
    #[inline]
    pub fn new() -> Self {
        Polyline {
            vertexes: Vec::new(),
            is_closed: false,
        }
    }

    /// New empty closed polyline.
    #[inline]
    pub fn new_closed() -> Self {
        Polyline {
            vertexes: Vec::new(),
            is_closed: true,
        }
    }

    /// New empty polyline with vertex capacity reserved.
    #[inline]
    pub fn with_capacity(capacity: usize, is_closed: bool) -> Self {
        Polyline {
            vertexes: Vec::with_capacity(capacity),
            is_closed,
        }
    }

    /// Construct from a vertex iterator.
    #[inline]
    pub fn from_iter<I>(iter: I, is_closed: bool) -> Self
    where
        I: IntoIterator<Item = Vertex<T>>,
    {
        Polyline {
            vertexes: iter.into_iter().collect(),
            is_closed,
        }
    }

    /// Copy construct, removing repeat position vertexes in the process (`pos_equal_eps` for
    /// position comparing).
    pub fn from_remove_repeat(source: &Polyline<T>, pos_equal_eps: T) -> Self {
        let mut result = Polyline::with_capacity(source.vertex_count(), source.is_closed);
        for &v in source.vertexes.iter() {
            result.add_or_replace_vertex(v, pos_equal_eps);
        }

        if source.is_closed && result.vertex_count() >= 2 {
            // catch last vertex landing on top of the first
            let last = result.last().unwrap();
            if last.pos().fuzzy_eq_eps(result[0].pos(), pos_equal_eps) {
                result.remove_last();
            }
        }

        result
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertexes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertexes.is_empty()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.is_closed
    }

    #[inline]
    pub fn set_is_closed(&mut self, is_closed: bool) {
        self.is_closed = is_closed;
    }

    /// Vertex at `index` or `None` when out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Vertex<T>> {
        self.vertexes.get(index).copied()
    }

    /// Last vertex or `None` when empty.
    #[inline]
    pub fn last(&self) -> Option<Vertex<T>> {
        self.vertexes.last().copied()
    }

    /// Replace the last vertex.
    ///
    /// # Panics
    ///
    /// Panics when the polyline is empty.
    #[inline]
    pub fn set_last(&mut self, vertex: Vertex<T>) {
        *self.vertexes.last_mut().unwrap() = vertex;
    }

    /// Append a vertex from components.
    #[inline]
    pub fn add(&mut self, x: T, y: T, bulge: T) {
        self.vertexes.push(Vertex::new(x, y, bulge));
    }

    /// Append a vertex.
    #[inline]
    pub fn add_vertex(&mut self, vertex: Vertex<T>) {
        self.vertexes.push(vertex);
    }

    /// Append `vertex` unless its position fuzzy matches the current last vertex, in which case
    /// only the last vertex's bulge is replaced.
    pub fn add_or_replace_vertex(&mut self, vertex: Vertex<T>, pos_equal_eps: T) {
        match self.vertexes.last_mut() {
            None => self.vertexes.push(vertex),
            Some(last) => {
                if last.pos().fuzzy_eq_eps(vertex.pos(), pos_equal_eps) {
                    last.bulge = vertex.bulge;
                } else {
                    self.vertexes.push(vertex);
                }
            }
        }
    }

    /// Same as [Polyline::add_or_replace_vertex] accepting components.
    #[inline]
    pub fn add_or_replace(&mut self, x: T, y: T, bulge: T, pos_equal_eps: T) {
        self.add_or_replace_vertex(Vertex::new(x, y, bulge), pos_equal_eps);
    }

    /// Remove and return the last vertex.
    ///
    /// # Panics
    ///
    /// Panics when the polyline is empty.
    #[inline]
    pub fn remove_last(&mut self) -> Vertex<T> {
        self.vertexes.pop().unwrap()
    }

    /// Remove and return the vertex at `index`.
    #[inline]
    pub fn remove(&mut self, index: usize) -> Vertex<T> {
        self.vertexes.remove(index)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.vertexes.clear();
    }

    #[inline]
    pub fn reserve(&mut self, additional: usize) {
        self.vertexes.reserve(additional);
    }

    /// Append all of `other`'s vertexes, removing consecutive repeat positions in the process.
    pub fn extend_remove_repeat(&mut self, other: &Polyline<T>, pos_equal_eps: T) {
        self.reserve(other.vertex_count());
        for &v in other.vertexes.iter() {
            self.add_or_replace_vertex(v, pos_equal_eps);
        }
    }

    /// Iterate all vertexes by value.
    #[inline]
    pub fn iter_vertexes(
        &self,
    ) -> impl DoubleEndedIterator<Item = Vertex<T>> + ExactSizeIterator + Clone + '_ {
        self.vertexes.iter().copied()
    }

    /// Number of segments (closed polylines wrap from the last vertex to the first).
    #[inline]
    pub fn segment_count(&self) -> usize {
        let vc = self.vertex_count();
        if vc < 2 {
            0
        } else if self.is_closed {
            vc
        } else {
            vc - 1
        }
    }

    /// Iterate all segments as vertex pairs.
    #[inline]
    pub fn iter_segments(&self) -> impl Iterator<Item = (Vertex<T>, Vertex<T>)> + '_ {
        self.iter_segment_indexes()
            .map(move |(i, j)| (self.vertexes[i], self.vertexes[j]))
    }

    /// Iterate all segment vertex index pairs, `(0, 1)` up to `(n-2, n-1)` plus `(n-1, 0)` when
    /// closed.
    #[inline]
    pub fn iter_segment_indexes(&self) -> SegIndexIter {
        SegIndexIter::new(self.vertex_count(), self.is_closed)
    }

    /// Next vertex index treating the polyline as circular (wraps to 0 past the end).
    #[inline]
    pub fn next_wrapping_index(&self, i: usize) -> usize {
        let next = i + 1;
        if next >= self.vertex_count() {
            0
        } else {
            next
        }
    }

    /// Previous vertex index treating the polyline as circular (wraps to the last before 0).
    #[inline]
    pub fn prev_wrapping_index(&self, i: usize) -> usize {
        if i == 0 {
            self.vertex_count() - 1
        } else {
            i - 1
        }
    }

    /// Forward wrapping vertex index distance from `start_index` to `end_index`.
    #[inline]
    pub fn fwd_wrapping_dist(&self, start_index: usize, end_index: usize) -> usize {
        let vc = self.vertex_count();
        debug_assert!(start_index < vc, "start_index out of bounds");

        if start_index <= end_index {
            end_index - start_index
        } else {
            vc - start_index + end_index
        }
    }

    /// Vertex index `offset` positions forward of `start_index`, wrapping (at most one full wrap).
    #[inline]
    pub fn fwd_wrapping_index(&self, start_index: usize, offset: usize) -> usize {
        let vc = self.vertex_count();
        debug_assert!(start_index < vc, "start_index out of bounds");
        debug_assert!(offset <= vc, "offset wraps more than once");

        let sum = start_index + offset;
        if sum < vc {
            sum
        } else {
            sum - vc
        }
    }

    /// Fuzzy compare with another polyline (closed flag, vertex count, and all vertexes).
    pub fn fuzzy_eq_eps(&self, other: &Polyline<T>, eps: T) -> bool {
        self.is_closed == other.is_closed
            && self.vertex_count() == other.vertex_count()
            && self
                .vertexes
                .iter()
                .zip(other.vertexes.iter())
                .all(|(v1, v2)| v1.fuzzy_eq_eps(*v2, eps))
    }

    /// [Polyline::fuzzy_eq_eps] using default epsilon.
    #[inline]
    pub fn fuzzy_eq(&self, other: &Polyline<T>) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }

    /// XY extents of the polyline, `None` when there are no segments.
    ///
    /// Arc segments contribute their exact extents (circle extreme points included only where the
    /// sweep crosses them).
    pub fn extents(&self) -> Option<crate::spatial::AABB<T>> {
        let mut boxes = self.iter_segments().map(|(v1, v2)| seg_bounding_box(v1, v2));
        let first = boxes.next()?;
        Some(boxes.fold(first, |mut acc, b| {
            acc.merge(&b);
            acc
        }))
    }

    /// Total path length of the polyline.
    #[inline]
    pub fn path_length(&self) -> T {
        self.iter_segments()
            .map(|(v1, v2)| seg_length(v1, v2))
            .fold(T::zero(), |acc, len| acc + len)
    }

    /// Signed area of a closed polyline (positive when counter clockwise), 0 for open polylines.
    ///
    /// Green's theorem over the chord polygon, then each arc adds the signed circular segment
    /// area between its chord and the arc path, `r²(θ - sin θ) / 2` with `θ` the signed sweep.
    pub fn area(&self) -> T {
        if !self.is_closed {
            return T::zero();
        }

        let half = T::one() / T::two();
        self.iter_segments().fold(T::zero(), |acc, (v1, v2)| {
            let chord_part = half * v1.pos().perp_dot(v2.pos());
            if v1.bulge_is_zero() {
                return acc + chord_part;
            }

            let sweep = angle_from_bulge(v1.bulge);
            let b = v1.bulge.abs();
            let chord_len = (v2.pos() - v1.pos()).length();
            let radius = chord_len * (b * b + T::one()) / (T::four() * b);
            let segment_part = half * radius * radius * (sweep - sweep.sin());
            acc + chord_part + segment_part
        })
    }

    /// Orientation derived from the signed area. Self intersecting closed polylines may not have
    /// a meaningful orientation.
    pub fn orientation(&self) -> PlineOrientation {
        if !self.is_closed {
            return PlineOrientation::Open;
        }

        if self.area() < T::zero() {
            PlineOrientation::Clockwise
        } else {
            PlineOrientation::CounterClockwise
        }
    }

    /// Winding number of the closed polyline around `point` (0 for open polylines).
    ///
    /// -1/+1 for a simple closed polyline winding clockwise/counter clockwise around the point, 0
    /// when the point is outside. Magnitude can exceed 1 for self intersecting polylines. The
    /// result is undefined when the point lies directly on a segment (use
    /// [Polyline::closest_point] to detect that case).
    ///
    /// Casts a horizontal ray toward +x and sums signed crossings. Line segments use the half
    /// open straddle rule. Arc segments take the ray's roots on their supporting circle; a root
    /// right of `point` counts by the sign of the path tangent's y component there when it lies
    /// on the arc sweep. Roots landing on a segment end point belong to whichever segment carries
    /// the path through the ray (vertexes exactly on the ray are treated as just below it).
    pub fn winding_number(&self, point: Vec2<T>) -> i32 {
        if !self.is_closed || self.vertex_count() < 2 {
            return 0;
        }

        let eps = T::fuzzy_epsilon();

        let line_crossing = |v1: Vertex<T>, v2: Vertex<T>| -> i32 {
            let below1 = v1.y <= point.y;
            let below2 = v2.y <= point.y;
            if below1 == below2 {
                return 0;
            }

            // x position where the segment meets the ray line
            let t = (point.y - v1.y) / (v2.y - v1.y);
            let x_hit = v1.x + t * (v2.x - v1.x);
            if x_hit <= point.x {
                return 0;
            }

            if below1 {
                1
            } else {
                -1
            }
        };

        let arc_crossings = |v1: Vertex<T>, v2: Vertex<T>| -> i32 {
            let (radius, center) = seg_arc_radius_and_center(v1, v2);
            let dy = point.y - center.y;
            if dy.abs() >= radius {
                // ray misses the circle, or only grazes a pole tangentially
                return 0;
            }

            let half_span = (radius * radius - dy * dy).sqrt();
            let is_ccw = v1.bulge_is_pos();
            let mut total = 0;
            for x_hit in [center.x - half_span, center.x + half_span] {
                if x_hit <= point.x {
                    continue;
                }

                let q = Vec2::new(x_hit, point.y);
                // tangent y component at the root: perp of the radius vector, flipped for
                // clockwise traversal
                let upward = (x_hit > center.x) == is_ccw;

                if q.fuzzy_eq_eps(v1.pos(), eps) {
                    // root at the arc start, owned only when the arc departs above the ray
                    if upward {
                        total += 1;
                    }
                } else if q.fuzzy_eq_eps(v2.pos(), eps) {
                    // root at the arc end, owned only when the arc arrives from above
                    if !upward {
                        total -= 1;
                    }
                } else if point_within_arc_sweep(center, v1.pos(), v2.pos(), v1.bulge_is_neg(), q)
                {
                    total += if upward { 1 } else { -1 };
                }
            }

            total
        };

        let mut winding = 0;
        for (v1, v2) in self.iter_segments() {
            if v1.bulge_is_zero() {
                winding += line_crossing(v1, v2);
            } else {
                winding += arc_crossings(v1, v2);
            }
        }

        winding
    }

    /// Closest point on the polyline to `point`, `None` when the polyline is empty.
    pub fn closest_point(&self, point: Vec2<T>) -> Option<ClosestPointResult<T>> {
        if self.is_empty() {
            return None;
        }

        if self.vertex_count() == 1 {
            let seg_point = self.vertexes[0].pos();
            return Some(ClosestPointResult {
                seg_start_index: 0,
                seg_point,
                distance: (seg_point - point).length(),
            });
        }

        // candidate per segment, keep the nearest
        self.iter_segment_indexes()
            .map(|(i, j)| {
                let cp = seg_closest_point(self.vertexes[i], self.vertexes[j], point);
                (i, cp, dist_squared(point, cp))
            })
            .fold(None, |best: Option<(usize, Vec2<T>, T)>, candidate| match best {
                Some(b) if b.2 <= candidate.2 => Some(b),
                _ => Some(candidate),
            })
            .map(|(seg_start_index, seg_point, d2)| ClosestPointResult {
                seg_start_index,
                seg_point,
                distance: d2.sqrt(),
            })
    }

    /// Uniformly scale the polyline in place by `scale_factor` (bulges are scale invariant).
    pub fn scale_mut(&mut self, scale_factor: T) {
        for v in self.vertexes.iter_mut() {
            v.x = scale_factor * v.x;
            v.y = scale_factor * v.y;
        }
    }

    /// Translate the polyline in place by `(x_offset, y_offset)`.
    pub fn translate_mut(&mut self, x_offset: T, y_offset: T) {
        for v in self.vertexes.iter_mut() {
            v.x = v.x + x_offset;
            v.y = v.y + y_offset;
        }
    }

    /// Invert/reverse the direction of the polyline in place.
    ///
    /// Reverses the vertex order then shifts each bulge to the previous vertex negated so the
    /// traversed path is identical but walked the other way.
    pub fn invert_direction_mut(&mut self) {
        let vc = self.vertex_count();
        if vc < 2 {
            return;
        }

        self.vertexes.reverse();

        let first_bulge = self.vertexes[0].bulge;
        for i in 1..vc {
            let b = -self.vertexes[i].bulge;
            self.vertexes[i - 1].bulge = b;
        }

        if self.is_closed {
            self.vertexes[vc - 1].bulge = -first_bulge;
        }
    }

    /// Remove all repeat position vertexes (fuzzy compared with `pos_equal_eps`).
    ///
    /// Returns `None` when no vertexes needed removing (avoids the copy).
    ///
    /// # Examples
    ///
    /// ```
    /// # use arcline::polyline::*;
    /// let mut pline = Polyline::new_closed();
    /// pline.add(2.0, 2.0, 0.5);
    /// pline.add(2.0, 2.0, 1.0);
    /// pline.add(3.0, 3.0, 1.0);
    /// pline.add(3.0, 3.0, 0.5);
    /// let result = pline.prune_singularities(1e-5).expect("repeats were removed");
    /// assert_eq!(result.vertex_count(), 2);
    /// assert!(result[0].fuzzy_eq(Vertex::new(2.0, 2.0, 1.0)));
    /// assert!(result[1].fuzzy_eq(Vertex::new(3.0, 3.0, 0.5)));
    /// ```
    pub fn prune_singularities(&self, pos_equal_eps: T) -> Option<Polyline<T>> {
        if self.vertex_count() < 2 {
            return None;
        }

        // collect retained vertexes, folding each dropped repeat's bulge onto its keeper
        let mut pruned: Vec<Vertex<T>> = Vec::with_capacity(self.vertex_count());
        pruned.push(self.vertexes[0]);
        for &v in &self.vertexes[1..] {
            let kept = pruned.last_mut().unwrap();
            if kept.pos().fuzzy_eq_eps(v.pos(), pos_equal_eps) {
                kept.bulge = v.bulge;
            } else {
                pruned.push(v);
            }
        }

        // closed polyline may also have its final vertex repeat the first
        if self.is_closed
            && pruned.len() >= 2
            && pruned
                .last()
                .unwrap()
                .pos()
                .fuzzy_eq_eps(pruned[0].pos(), pos_equal_eps)
        {
            pruned.pop();
        }

        if pruned.len() == self.vertex_count() {
            // nothing removed, spare the caller the copy
            return None;
        }

        Some(Polyline {
            vertexes: pruned,
            is_closed: self.is_closed,
        })
    }

    /// Convert all arc segments to approximating line segments with a maximum chord error of
    /// `error_distance`, returning `None` only when numeric casts fail.
    ///
    /// Generated line end points are circumscribed by the arc (they lie on the arc path).
    pub fn arcs_to_approx_lines(&self, error_distance: T) -> Option<Polyline<T>> {
        let mut result = Polyline::with_capacity(self.vertex_count(), self.is_closed);
        if self.is_empty() {
            return Some(result);
        }

        let abs_error = error_distance.abs();

        for (v1, v2) in self.iter_segments() {
            if v1.bulge_is_zero() {
                result.add_vertex(v1);
                continue;
            }

            let (arc_radius, arc_center) = seg_arc_radius_and_center(v1, v2);
            if arc_radius.fuzzy_lt(error_distance) {
                // arc smaller than the allowed error, collapse to a line
                result.add(v1.x, v1.y, T::zero());
                continue;
            }

            // widest sub angle one chord can span while staying within the error distance, then
            // the signed sweep split evenly across that many chords
            let sweep = angle_from_bulge(v1.bulge);
            let max_sub_angle = T::two() * (T::one() - abs_error / arc_radius).acos().abs();
            let chord_count = (sweep.abs() / max_sub_angle).ceil();
            let step = sweep / chord_count;
            let start_angle = angle(arc_center, v1.pos());

            result.add(v1.x, v1.y, T::zero());
            for i in 1..chord_count.to_usize()? {
                let a = start_angle + step * <T as NumCast>::from(i)?;
                let pos = point_on_circle(arc_radius, arc_center, a);
                result.add(pos.x, pos.y, T::zero());
            }
        }

        if !self.is_closed {
            result.add_vertex(self.last().unwrap());
        }

        Some(result)
    }

    /// Segment index and point at `target_path_length` along the polyline.
    ///
    /// `Ok((0, first_vertex_position))` when the target is negative, `Err(total_path_length)` when
    /// the target exceeds the polyline's path length.
    pub fn find_point_at_path_length(
        &self,
        target_path_length: T,
    ) -> Result<(usize, Vec2<T>), T> {
        if target_path_length <= T::zero() {
            return Ok((0, self.vertexes[0].pos()));
        }

        // walk segments consuming the remaining length until it fits in one
        let mut remaining = target_path_length;
        for (i, (v1, v2)) in self.iter_segments().enumerate() {
            let seg_len = seg_length(v1, v2);
            if remaining > seg_len {
                remaining = remaining - seg_len;
                continue;
            }

            let t = remaining / seg_len;
            let pt = if v1.bulge_is_zero() {
                v1.pos() + (v2.pos() - v1.pos()) * t
            } else {
                let (radius, center) = seg_arc_radius_and_center(v1, v2);
                let start_angle = angle(center, v1.pos());
                point_on_circle(radius, center, start_angle + angle_from_bulge(v1.bulge) * t)
            };
            return Ok((i, pt));
        }

        Err(target_path_length - remaining)
    }

    /// Build a spatial index over fast approximate segment bounding boxes (never smaller than the
    /// true boxes). Sufficient anywhere only containment matters and cheaper than
    /// [Polyline::create_spatial_index].
    ///
    /// The leaf key is the start vertex index of the segment.
    pub fn create_approx_spatial_index(&self) -> StaticSpatialIndex<T> {
        self.create_approx_spatial_index_with_node_size(16)
    }

    /// [Polyline::create_approx_spatial_index] with explicit tree node size.
    pub fn create_approx_spatial_index_with_node_size(
        &self,
        node_size: usize,
    ) -> StaticSpatialIndex<T> {
        let mut builder = SpatialIndexBuilder::new_with_node_size(self.segment_count(), node_size);
        for (v1, v2) in self.iter_segments() {
            let approx_aabb = seg_fast_approx_bounding_box(v1, v2);
            builder.add(
                approx_aabb.min_x,
                approx_aabb.min_y,
                approx_aabb.max_x,
                approx_aabb.max_y,
            );
        }

        unwrap_index_build(builder.build())
    }

    /// Build a spatial index over exact segment bounding boxes. The leaf key is the start vertex
    /// index of the segment.
    pub fn create_spatial_index(&self) -> StaticSpatialIndex<T> {
        self.create_spatial_index_with_node_size(16)
    }

    /// [Polyline::create_spatial_index] with explicit tree node size.
    pub fn create_spatial_index_with_node_size(&self, node_size: usize) -> StaticSpatialIndex<T> {
        let mut builder = SpatialIndexBuilder::new_with_node_size(self.segment_count(), node_size);
        for (v1, v2) in self.iter_segments() {
            let aabb = seg_bounding_box(v1, v2);
            builder.add(aabb.min_x, aabb.min_y, aabb.max_x, aabb.max_y);
        }

        unwrap_index_build(builder.build())
    }

    /// Test if the polyline has any self intersect (local or global).
    pub fn scan_for_self_intersect(&self) -> bool {
        if self.vertex_count() < 2 {
            return false;
        }
        let index = self.create_approx_spatial_index();
        !super::intersects::all_self_intersects(self, &index, true, T::from(1e-5).unwrap())
            .is_empty()
    }

    /// Find all intersects between this polyline and `other` using default options.
    #[inline]
    pub fn find_intersects(&self, other: &Polyline<T>) -> IntersectsCollection<T> {
        self.find_intersects_opt(other, &Default::default())
    }

    /// Find all intersects between this polyline and `other` with options given.
    #[inline]
    pub fn find_intersects_opt(
        &self,
        other: &Polyline<T>,
        options: &FindIntersectsOptions<T>,
    ) -> IntersectsCollection<T> {
        super::intersects::find_intersects(self, other, options)
    }

    /// Compute the parallel offset polylines at distance `offset` using default options.
    ///
    /// Positive `offset` goes left of the traversal direction (inward for counter clockwise
    /// closed polylines), negative goes right. Offsetting may produce any number of polylines
    /// (including none when everything collapses).
    ///
    /// # Examples
    ///
    /// ```
    /// # use arcline::polyline_closed;
    /// # use arcline::polyline::*;
    /// let circle = polyline_closed![(0.0, 0.0, 1.0), (1.0, 0.0, 1.0)];
    /// let offsets = circle.parallel_offset(0.2);
    /// assert_eq!(offsets.len(), 1);
    /// assert!(offsets[0][0].fuzzy_eq(Vertex::new(0.2, 0.0, 1.0)));
    /// assert!(offsets[0][1].fuzzy_eq(Vertex::new(0.8, 0.0, 1.0)));
    /// ```
    #[inline]
    pub fn parallel_offset(&self, offset: T) -> Vec<Polyline<T>> {
        self.parallel_offset_opt(offset, &Default::default())
    }

    /// Compute the parallel offset polylines at distance `offset` with options given.
    #[inline]
    pub fn parallel_offset_opt(&self, offset: T, options: &OffsetOptions<T>) -> Vec<Polyline<T>> {
        super::offset::parallel_offset(self, offset, options)
    }

    /// Perform boolean `operation` between this polyline and `other` using default options.
    ///
    /// Both polylines must be closed with at least 2 vertexes, and must not self intersect (heal
    /// self intersecting inputs first, e.g. with a zero distance [Polyline::parallel_offset]).
    ///
    /// # Examples
    ///
    /// ```
    /// # use arcline::polyline_closed;
    /// # use arcline::polyline::*;
    /// # use arcline::num::*;
    /// let rectangle = polyline_closed![
    ///     (-1.0, -2.0, 0.0),
    ///     (3.0, -2.0, 0.0),
    ///     (3.0, 2.0, 0.0),
    ///     (-1.0, 2.0, 0.0),
    /// ];
    /// let circle = polyline_closed![(0.0, 0.0, 1.0), (2.0, 0.0, 1.0)];
    /// let result = rectangle.boolean(&circle, BooleanOp::Exclude).unwrap();
    /// // circle is fully inside: the rectangle comes back with the circle as a reversed hole
    /// assert_eq!(result.pos_plines.len(), 1);
    /// assert_eq!(result.neg_plines.len(), 1);
    /// assert!(result.pos_plines[0].area().fuzzy_eq(rectangle.area()));
    /// assert!(result.neg_plines[0].area().fuzzy_eq(-circle.area()));
    /// ```
    #[inline]
    pub fn boolean(
        &self,
        other: &Polyline<T>,
        operation: BooleanOp,
    ) -> Result<BooleanResult<T>, BooleanInvalidInput> {
        self.boolean_opt(other, operation, &Default::default())
    }

    /// Perform boolean `operation` between this polyline and `other` with options given.
    #[inline]
    pub fn boolean_opt(
        &self,
        other: &Polyline<T>,
        operation: BooleanOp,
        options: &BooleanOptions<T>,
    ) -> Result<BooleanResult<T>, BooleanInvalidInput> {
        super::boolean::polyline_boolean(self, other, operation, options)
    }
}

impl<T> Index<usize> for Polyline<T> {
    type Output = Vertex<T>;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.vertexes[index]
    }
}

impl<T> IndexMut<usize> for Polyline<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.vertexes[index]
    }
}

/// Iterator over segment vertex index pairs of a polyline.
pub struct SegIndexIter {
    pos: usize,
    remaining: usize,
    is_closed: bool,
}

impl SegIndexIter {
    #[inline]
    pub fn new(vertex_count: usize, is_closed: bool) -> Self {
        let remaining = if vertex_count < 2 {
            0
        } else if is_closed {
            vertex_count
        } else {
            vertex_count - 1
        };
        SegIndexIter {
            pos: 0,
            remaining,
            is_closed,
        }
    }
}

impl Iterator for SegIndexIter {
    type Item = (usize, usize);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;

        if self.remaining == 0 && self.is_closed {
            return Some((self.pos, 0));
        }

        let pos = self.pos;
        self.pos += 1;
        Some((pos, pos + 1))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for SegIndexIter {}

/// Unwrap a spatial index build, panicking only for internal errors (count mismatch can not occur
/// when driven from segment iteration, numeric cast failure means non-finite input coordinates).
fn unwrap_index_build<T>(
    result: Result<StaticSpatialIndex<T>, SpatialIndexError>,
) -> StaticSpatialIndex<T>
where
    T: Real,
{
    match result {
        Ok(x) => x,
        Err(SpatialIndexError::ItemCount { .. }) => {
            unreachable!("count mismatch building polyline spatial index")
        }
        Err(e @ SpatialIndexError::NumericCast) => {
            panic!("failed building polyline spatial index: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn unit_square_properties() {
        let square = polyline_closed![
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0)
        ];
        assert_fuzzy_eq!(square.area(), 1.0);
        assert_fuzzy_eq!(square.path_length(), 4.0);
        let extents = square.extents().unwrap();
        assert_fuzzy_eq!(extents.min_x, 0.0);
        assert_fuzzy_eq!(extents.min_y, 0.0);
        assert_fuzzy_eq!(extents.max_x, 1.0);
        assert_fuzzy_eq!(extents.max_y, 1.0);
        assert_eq!(square.winding_number(Vec2::new(0.5, 0.5)), 1);
        assert_eq!(square.winding_number(Vec2::new(2.0, 0.5)), 0);
        assert_eq!(square.orientation(), PlineOrientation::CounterClockwise);
    }

    #[test]
    fn circle_from_two_half_circles() {
        // radius 5 circle centered at (5, 0)
        let circle = polyline_closed![(0.0, 0.0, 1.0), (10.0, 0.0, 1.0)];
        assert_fuzzy_eq!(circle.area(), 25.0 * PI, 1e-8);
        assert_fuzzy_eq!(circle.path_length(), 10.0 * PI, 1e-8);
        let extents = circle.extents().unwrap();
        assert_fuzzy_eq!(extents.min_x, 0.0);
        assert_fuzzy_eq!(extents.min_y, -5.0);
        assert_fuzzy_eq!(extents.max_x, 10.0);
        assert_fuzzy_eq!(extents.max_y, 5.0);
        assert_eq!(circle.winding_number(Vec2::new(5.0, 0.0)), 1);
        assert_eq!(circle.winding_number(Vec2::new(11.0, 0.0)), 0);
    }

    #[test]
    fn figure_eight_net_area_zero() {
        // two opposite handed lobes
        let figure_eight = polyline_closed![
            (0.0, 0.0, 1.0),
            (2.0, 0.0, 1.0),
            (0.0, 0.0, -1.0),
            (-2.0, 0.0, -1.0)
        ];
        assert_fuzzy_eq!(figure_eight.area(), 0.0, 1e-8);
    }

    #[test]
    fn quarter_arc_path_length() {
        let quarter = polyline_open![(1.0, 0.0, -0.4142135624), (0.0, -1.0, 0.0)];
        assert_fuzzy_eq!(quarter.path_length(), PI / 2.0, 1e-8);
        assert_fuzzy_eq!(quarter.area(), 0.0);
        assert_eq!(quarter.winding_number(Vec2::new(0.5, -0.5)), 0);
    }

    #[test]
    fn area_sign_flips_with_direction() {
        let mut circle = polyline_closed![(0.0, 0.0, 1.0), (2.0, 0.0, 1.0)];
        assert_fuzzy_eq!(circle.area(), PI, 1e-8);
        circle.invert_direction_mut();
        assert_fuzzy_eq!(circle.area(), -PI, 1e-8);
        assert_eq!(circle.orientation(), PlineOrientation::Clockwise);
        assert_eq!(circle.winding_number(Vec2::new(1.0, 0.0)), -1);
    }

    #[test]
    fn invert_direction_round_trip() {
        let pline = polyline_closed![
            (0.0, 0.0, 0.3),
            (2.0, 0.0, -0.5),
            (2.0, 2.0, 0.0),
            (0.0, 2.0, 1.0)
        ];
        let mut round_trip = pline.clone();
        round_trip.invert_direction_mut();
        round_trip.invert_direction_mut();
        assert!(round_trip.fuzzy_eq(&pline));
    }

    #[test]
    fn invert_direction_shifts_bulges() {
        let mut pline = polyline_open![(0.0, 0.0, 0.5), (1.0, 1.0, 0.0)];
        pline.invert_direction_mut();
        let expected = polyline_open![(1.0, 1.0, -0.5), (0.0, 0.0, 0.5)];
        assert!(pline.fuzzy_eq(&expected));
    }

    #[test]
    fn scale_and_translate() {
        let mut pline = polyline_open![(2.0, 2.0, 0.5), (4.0, 4.0, 1.0)];
        pline.scale_mut(2.0);
        assert!(pline.fuzzy_eq(&polyline_open![(4.0, 4.0, 0.5), (8.0, 8.0, 1.0)]));

        pline.translate_mut(-3.0, 1.0);
        assert!(pline.fuzzy_eq(&polyline_open![(1.0, 5.0, 0.5), (5.0, 9.0, 1.0)]));
    }

    #[test]
    fn scale_composes() {
        let pline = polyline_closed![(1.0, 1.0, 0.2), (4.0, 2.0, 0.0), (3.0, 5.0, -0.4)];
        let mut a = pline.clone();
        a.scale_mut(2.0);
        a.scale_mut(3.0);
        let mut b = pline.clone();
        b.scale_mut(6.0);
        assert!(a.fuzzy_eq(&b));

        let mut c = pline.clone();
        c.scale_mut(1.0);
        assert!(c.fuzzy_eq(&pline));
    }

    #[test]
    fn path_length_invariant_under_transforms() {
        let pline = polyline_closed![(0.0, 0.0, 0.5), (3.0, 0.0, 0.0), (3.0, 3.0, -0.2)];
        let base_length = pline.path_length();

        let mut translated = pline.clone();
        translated.translate_mut(17.0, -3.0);
        assert_fuzzy_eq!(translated.path_length(), base_length, 1e-8);

        let mut inverted = pline.clone();
        inverted.invert_direction_mut();
        assert_fuzzy_eq!(inverted.path_length(), base_length, 1e-8);

        let mut scaled = pline.clone();
        scaled.scale_mut(4.0);
        assert_fuzzy_eq!(scaled.path_length(), 4.0 * base_length, 1e-8);

        // translation leaves area unchanged, inversion flips its sign
        assert_fuzzy_eq!(translated.area(), pline.area(), 1e-8);
        assert_fuzzy_eq!(inverted.area(), -pline.area(), 1e-8);
    }

    #[test]
    fn closest_point_queries() {
        let circle = polyline_closed![(0.0, 0.0, 1.0), (2.0, 0.0, 1.0)];
        let r = circle.closest_point(Vec2::new(3.0, 0.0)).unwrap();
        assert_fuzzy_eq!(r.distance, 1.0, 1e-8);
        assert!(r.seg_point.fuzzy_eq_eps(Vec2::new(2.0, 0.0), 1e-8));

        let square = polyline_closed![
            (0.0, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (1.0, 1.0, 0.0),
            (0.0, 1.0, 0.0)
        ];
        let r = square.closest_point(Vec2::new(0.5, -1.0)).unwrap();
        assert_eq!(r.seg_start_index, 0);
        assert!(r.seg_point.fuzzy_eq_eps(Vec2::new(0.5, 0.0), 1e-8));
        assert_fuzzy_eq!(r.distance, 1.0, 1e-8);
    }

    #[test]
    fn prune_singularities_no_change_returns_none() {
        let pline = polyline_open![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)];
        assert!(pline.prune_singularities(1e-5).is_none());
    }

    #[test]
    fn prune_singularities_closed_wrap() {
        let pline = polyline_closed![(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, 0.0)];
        let pruned = pline.prune_singularities(1e-5).unwrap();
        assert_eq!(pruned.vertex_count(), 2);
    }

    #[test]
    fn arcs_to_lines_path_length_converges() {
        let circle: Polyline<f64> = polyline_closed![(0.0, 0.0, 1.0), (2.0, 0.0, 1.0)];
        let exact_length = circle.path_length();
        let coarse = circle.arcs_to_approx_lines(0.1).unwrap();
        let fine = circle.arcs_to_approx_lines(0.0001).unwrap();
        assert!(coarse.vertex_count() > 2);
        assert!(coarse.iter_vertexes().all(|v| v.bulge == 0.0));
        let coarse_err = (coarse.path_length() - exact_length).abs();
        let fine_err = (fine.path_length() - exact_length).abs();
        assert!(fine_err < coarse_err);
        assert!(fine_err < 1e-3);
    }

    #[test]
    fn winding_outside_extents_is_zero() {
        let pline = polyline_closed![(0.0, 0.0, 0.4), (3.0, 0.0, 0.0), (2.0, 3.0, -0.2)];
        let extents = pline.extents().unwrap();
        let outside = [
            Vec2::new(extents.min_x - 1.0, extents.min_y - 1.0),
            Vec2::new(extents.max_x + 1.0, extents.min_y - 1.0),
            Vec2::new(extents.max_x + 1.0, extents.max_y + 1.0),
            Vec2::new(extents.min_x - 1.0, extents.max_y + 1.0),
        ];
        for p in outside {
            assert_eq!(pline.winding_number(p), 0);
        }
    }

    #[test]
    fn find_point_at_path_length_cases() {
        let pline = polyline_open![(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)];
        let (i, pt) = pline.find_point_at_path_length(5.0).unwrap();
        assert_eq!(i, 0);
        assert!(pt.fuzzy_eq(Vec2::new(5.0, 0.0)));

        let (i, pt) = pline.find_point_at_path_length(-1.0).unwrap();
        assert_eq!(i, 0);
        assert!(pt.fuzzy_eq(Vec2::new(0.0, 0.0)));

        let total = pline.find_point_at_path_length(100.0).unwrap_err();
        assert_fuzzy_eq!(total, 10.0);
    }

    #[test]
    fn spatial_index_covers_all_segments() {
        let pline = polyline_closed![
            (0.0, 0.0, 0.0),
            (4.0, 0.0, 1.0),
            (4.0, 4.0, 0.0),
            (0.0, 4.0, -0.3)
        ];
        let index = pline.create_approx_spatial_index();
        assert_eq!(index.count(), 4);
        let mut hits = index.query(-10.0, -10.0, 10.0, 10.0);
        hits.sort_unstable();
        assert_eq!(hits, vec![0, 1, 2, 3]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let pline = polyline_closed![(0.0, 0.0, 0.5), (2.0, 0.0, 0.0), (2.0, 2.0, -1.0)];
        let json = serde_json::to_string(&pline).unwrap();
        let parsed: Polyline<f64> = serde_json::from_str(&json).unwrap();
        assert!(parsed.fuzzy_eq(&pline));
    }
}
