//! Supporting public types for polyline operations: options structs, result types, and intersect
//! records.

use super::Polyline;
use crate::math::Vec2;
use crate::num::Real;
use crate::spatial::StaticSpatialIndex;
use thiserror::Error;

/// Direction/orientation of a polyline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlineOrientation {
    /// Polyline is open.
    Open,
    /// Closed polyline wound clockwise (negative signed area).
    Clockwise,
    /// Closed polyline wound counter clockwise (positive signed area).
    CounterClockwise,
}

/// Result of [Polyline::closest_point](crate::polyline::Polyline::closest_point).
#[derive(Debug, Copy, Clone)]
pub struct ClosestPointResult<T>
where
    T: Real,
{
    /// Start vertex index of the closest segment.
    pub seg_start_index: usize,
    /// Closest point on that segment.
    pub seg_point: Vec2<T>,
    /// Distance from the query point to `seg_point`.
    pub distance: T,
}

/// Options for parallel offset.
#[derive(Debug, Clone)]
pub struct OffsetOptions<'a, T>
where
    T: Real,
{
    /// Spatial index over the input polyline's segment bounding boxes (or any boxes no smaller).
    /// Constructed internally when `None`.
    pub aabb_index: Option<&'a StaticSpatialIndex<T>>,
    /// Set true when the input may self intersect; the offset then clips against the dual offset
    /// as well, which costs more memory and compute but heals self intersecting inputs.
    pub handle_self_intersects: bool,
    /// Fuzzy epsilon for position equality.
    pub pos_equal_eps: T,
    /// Fuzzy epsilon used when matching slice end points during stitching.
    pub slice_join_eps: T,
    /// Fuzzy epsilon used when testing slice distance from the original polyline.
    pub offset_dist_eps: T,
}

impl<T> OffsetOptions<'_, T>
where
    T: Real,
{
    pub fn new() -> Self {
        OffsetOptions {
            aabb_index: None,
            handle_self_intersects: false,
            pos_equal_eps: T::from(1e-5).unwrap(),
            slice_join_eps: T::from(1e-4).unwrap(),
            offset_dist_eps: T::from(1e-4).unwrap(),
        }
    }
}

impl<T> Default for OffsetOptions<'_, T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Boolean operation applied between two closed polylines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BooleanOp {
    /// Area covered by either polyline.
    Union,
    /// Area covered by both polylines.
    Intersect,
    /// Area covered by the first polyline but not the second.
    Exclude,
    /// Area covered by exactly one of the polylines.
    Xor,
}

/// Result of a boolean operation between two polylines.
///
/// Loops whose orientation matches the inputs represent positive (filled) space, loops with the
/// opposite orientation represent negative space (holes inside a positive loop).
#[derive(Debug, Clone, Default)]
pub struct BooleanResult<T>
where
    T: Real,
{
    /// Closed polylines bounding positive space.
    pub pos_plines: Vec<Polyline<T>>,
    /// Closed polylines bounding subtracted space (holes).
    pub neg_plines: Vec<Polyline<T>>,
}

impl<T> BooleanResult<T>
where
    T: Real,
{
    pub fn new(pos_plines: Vec<Polyline<T>>, neg_plines: Vec<Polyline<T>>) -> Self {
        Self {
            pos_plines,
            neg_plines,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

/// Error for boolean operation input that violates the operation's requirements.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BooleanInvalidInput {
    /// Boolean operations are defined on closed polylines only.
    #[error("boolean operation requires closed polylines")]
    NotClosed,
    /// A polyline with fewer than 2 vertexes has no segments to operate on.
    #[error("boolean operation requires at least 2 vertexes, got {0}")]
    TooFewVertexes(usize),
}

/// Options for boolean operations.
#[derive(Debug)]
pub struct BooleanOptions<'a, T>
where
    T: Real,
{
    /// Spatial index over the first polyline's segment bounding boxes. Constructed internally when
    /// `None`.
    pub pline1_aabb_index: Option<&'a StaticSpatialIndex<T>>,
    /// Fuzzy epsilon for position equality.
    pub pos_equal_eps: T,
    /// Fuzzy epsilon used when matching slice end points during stitching.
    pub slice_join_eps: T,
}

impl<T> BooleanOptions<'_, T>
where
    T: Real,
{
    pub fn new() -> Self {
        BooleanOptions {
            pline1_aabb_index: None,
            pos_equal_eps: T::from(1e-5).unwrap(),
            slice_join_eps: T::from(1e-4).unwrap(),
        }
    }
}

impl<T> Default for BooleanOptions<'_, T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Options for finding intersects between two polylines.
#[derive(Debug)]
pub struct FindIntersectsOptions<'a, T>
where
    T: Real,
{
    /// Spatial index over the first polyline's segment bounding boxes. Constructed internally when
    /// `None`.
    pub pline1_aabb_index: Option<&'a StaticSpatialIndex<T>>,
    /// Fuzzy epsilon for position equality.
    pub pos_equal_eps: T,
}

impl<T> FindIntersectsOptions<'_, T>
where
    T: Real,
{
    pub fn new() -> Self {
        FindIntersectsOptions {
            pline1_aabb_index: None,
            pos_equal_eps: T::from(1e-5).unwrap(),
        }
    }
}

impl<T> Default for FindIntersectsOptions<'_, T>
where
    T: Real,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Intersect between two polyline segments at a single point.
#[derive(Debug, Clone, Copy)]
pub struct BasicIntersect<T> {
    /// Start vertex index of the first polyline's segment.
    pub start_index1: usize,
    /// Start vertex index of the second polyline's segment.
    pub start_index2: usize,
    /// Intersect point.
    pub point: Vec2<T>,
}

impl<T> BasicIntersect<T> {
    pub fn new(start_index1: usize, start_index2: usize, point: Vec2<T>) -> Self {
        Self {
            start_index1,
            start_index2,
            point,
        }
    }
}

/// Intersect where two polyline segments overlap across an interval.
#[derive(Debug, Clone, Copy)]
pub struct OverlappingIntersect<T> {
    /// Start vertex index of the first polyline's segment.
    pub start_index1: usize,
    /// Start vertex index of the second polyline's segment.
    pub start_index2: usize,
    /// Overlap end point closest to the second segment's start.
    pub point1: Vec2<T>,
    /// Overlap end point furthest from the second segment's start.
    pub point2: Vec2<T>,
}

impl<T> OverlappingIntersect<T> {
    pub fn new(start_index1: usize, start_index2: usize, point1: Vec2<T>, point2: Vec2<T>) -> Self {
        Self {
            start_index1,
            start_index2,
            point1,
            point2,
        }
    }
}

/// All intersects found between two polylines.
#[derive(Debug, Clone)]
pub struct IntersectsCollection<T> {
    pub basic_intersects: Vec<BasicIntersect<T>>,
    pub overlapping_intersects: Vec<OverlappingIntersect<T>>,
}

impl<T> IntersectsCollection<T> {
    pub fn new_empty() -> Self {
        Self {
            basic_intersects: Vec::new(),
            overlapping_intersects: Vec::new(),
        }
    }
}
