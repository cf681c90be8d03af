use crate::num::Real;
use std::ops::{Add, Mul, Neg, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2D vector/point with `x` and `y` components.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2<T = f64> {
    pub x: T,
    pub y: T,
}

impl<T> Vec2<T>
where
    T: Real,
{
    #[inline]
    pub fn new(x: T, y: T) -> Self {
        Vec2 { x, y }
    }

    #[inline]
    pub fn zero() -> Self {
        Vec2::new(T::zero(), T::zero())
    }

    /// Unit vector pointing at polar `angle` radians.
    #[inline]
    pub fn from_angle(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        Vec2::new(c, s)
    }

    /// Uniform scale by `factor`.
    #[inline]
    pub fn scale(self, factor: T) -> Self {
        self * factor
    }

    /// Dot product with `other`.
    #[inline]
    pub fn dot(self, other: Self) -> T {
        self.x * other.x + self.y * other.y
    }

    /// Perpendicular dot product (z component of the 3D cross product).
    #[inline]
    pub fn perp_dot(self, other: Self) -> T {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn length_squared(self) -> T {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> T {
        self.x.hypot(self.y)
    }

    /// Unit length vector in the same direction.
    #[inline]
    pub fn normalize(self) -> Self {
        self * self.length().recip()
    }

    /// Counter clockwise perpendicular vector (rotate 90 degrees).
    #[inline]
    pub fn perp(self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    /// Counter clockwise perpendicular unit vector.
    #[inline]
    pub fn unit_perp(self) -> Self {
        self.perp().normalize()
    }

    /// Rotate around `origin` by `angle` radians.
    ///
    /// Decomposes the offset from `origin` into its own direction and perpendicular, then
    /// recombines with the angle's cosine and sine.
    pub fn rotate_about(self, origin: Self, angle: T) -> Self {
        let v = self - origin;
        let (s, c) = angle.sin_cos();
        origin + v * c + v.perp() * s
    }

    /// Component-wise fuzzy compare using `eps`.
    #[inline]
    pub fn fuzzy_eq_eps(self, other: Self, eps: T) -> bool {
        self.x.fuzzy_eq_eps(other.x, eps) && self.y.fuzzy_eq_eps(other.y, eps)
    }

    /// Component-wise fuzzy compare using `T::fuzzy_epsilon()`.
    #[inline]
    pub fn fuzzy_eq(self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, T::fuzzy_epsilon())
    }
}

impl<T> Add for Vec2<T>
where
    T: Real,
{
    type Output = Vec2<T>;
    #[inline]
    fn add(self, rhs: Vec2<T>) -> Self::Output {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T> Sub for Vec2<T>
where
    T: Real,
{
    type Output = Vec2<T>;
    #[inline]
    fn sub(self, rhs: Vec2<T>) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T> Neg for Vec2<T>
where
    T: Real,
{
    type Output = Vec2<T>;
    #[inline]
    fn neg(self) -> Self::Output {
        Vec2::new(-self.x, -self.y)
    }
}

impl<T> Mul<T> for Vec2<T>
where
    T: Real,
{
    type Output = Vec2<T>;
    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}
