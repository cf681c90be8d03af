use crate::math::Vec2;
use crate::num::Real;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Polyline vertex: a 2D position and the bulge of the segment starting at it.
///
/// `bulge` encodes the arc sweep of the segment from this vertex to the next as
/// `tan(sweep_angle / 4)`. Zero means a straight line segment, positive a counter clockwise arc,
/// negative a clockwise arc, magnitude 1 a half circle. A single segment therefore never sweeps
/// more than `PI`.
///
/// See [bulge_from_angle](crate::math::bulge_from_angle) and
/// [angle_from_bulge](crate::math::angle_from_bulge) for conversions.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vertex<T = f64> {
    pub x: T,
    pub y: T,
    pub bulge: T,
}

impl<T> Vertex<T>
where
    T: Real,
{
    #[inline]
    pub fn new(x: T, y: T, bulge: T) -> Self {
        Vertex { x, y, bulge }
    }

    /// Construct from a position vector and bulge.
    #[inline]
    pub fn from_vec2(pos: Vec2<T>, bulge: T) -> Self {
        Vertex::new(pos.x, pos.y, bulge)
    }

    /// Position of the vertex as a vector.
    #[inline]
    pub fn pos(&self) -> Vec2<T> {
        Vec2::new(self.x, self.y)
    }

    /// Copy of this vertex with `bulge` swapped in.
    #[inline]
    pub fn with_bulge(&self, bulge: T) -> Self {
        Vertex::new(self.x, self.y, bulge)
    }

    /// True if the segment starting at this vertex is a line.
    #[inline]
    pub fn bulge_is_zero(&self) -> bool {
        self.bulge.fuzzy_eq_zero()
    }

    /// True if the segment starting at this vertex is a counter clockwise arc.
    #[inline]
    pub fn bulge_is_pos(&self) -> bool {
        self.bulge > T::zero()
    }

    /// True if the segment starting at this vertex is a clockwise arc.
    #[inline]
    pub fn bulge_is_neg(&self) -> bool {
        self.bulge < T::zero()
    }

    /// Component-wise fuzzy compare (position and bulge) using `eps`.
    #[inline]
    pub fn fuzzy_eq_eps(&self, other: Self, eps: T) -> bool {
        self.x.fuzzy_eq_eps(other.x, eps)
            && self.y.fuzzy_eq_eps(other.y, eps)
            && self.bulge.fuzzy_eq_eps(other.bulge, eps)
    }

    /// Component-wise fuzzy compare using `T::fuzzy_epsilon()`.
    #[inline]
    pub fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }
}
