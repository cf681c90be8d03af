//! Numeric traits shared across the crate: tolerance based comparison and the generic real
//! scalar.

/// Tolerance based comparison for floating point values.
///
/// Geometric predicates in this crate never compare floats exactly. One epsilon value (the type's
/// default, or an explicit per-call override) decides equality, ordering inclusion, and range
/// membership, so coincidence, collinearity, and tangency are all judged consistently.
///
/// The ordering comparisons are inclusive within epsilon, e.g. `fuzzy_lt` holds when `self` is
/// less than or fuzzy equal to `other`.
///
/// # Examples
///
/// ```
/// # use arcline::num::Fuzzy;
/// let a = 0.1 + 0.2;
/// assert_ne!(a, 0.3);
/// assert!(a.fuzzy_eq(0.3));
/// assert!(0.99f64.fuzzy_in_range_eps(1.0, 2.0, 0.05));
/// assert!(2.0f64.fuzzy_in_range_eps(1.0, 2.0, 1e-5));
/// ```
pub trait Fuzzy: Sized + Copy {
    /// Epsilon used when no explicit epsilon is passed.
    fn fuzzy_epsilon() -> Self;

    /// True when `self` is within `eps` of `other`.
    fn fuzzy_eq_eps(&self, other: Self, eps: Self) -> bool;

    /// True when `self` is within `eps` of zero.
    fn fuzzy_eq_zero_eps(&self, eps: Self) -> bool;

    /// True when `self` is less than `other + eps`.
    fn fuzzy_lt_eps(&self, other: Self, eps: Self) -> bool;

    /// True when `self + eps` is greater than `other`.
    fn fuzzy_gt_eps(&self, other: Self, eps: Self) -> bool;

    /// [Fuzzy::fuzzy_eq_eps] with the default epsilon.
    #[inline]
    fn fuzzy_eq(&self, other: Self) -> bool {
        self.fuzzy_eq_eps(other, Self::fuzzy_epsilon())
    }

    /// [Fuzzy::fuzzy_eq_zero_eps] with the default epsilon.
    #[inline]
    fn fuzzy_eq_zero(&self) -> bool {
        self.fuzzy_eq_zero_eps(Self::fuzzy_epsilon())
    }

    /// [Fuzzy::fuzzy_lt_eps] with the default epsilon.
    #[inline]
    fn fuzzy_lt(&self, other: Self) -> bool {
        self.fuzzy_lt_eps(other, Self::fuzzy_epsilon())
    }

    /// [Fuzzy::fuzzy_gt_eps] with the default epsilon.
    #[inline]
    fn fuzzy_gt(&self, other: Self) -> bool {
        self.fuzzy_gt_eps(other, Self::fuzzy_epsilon())
    }

    /// True when `self` lies in `[min, max]` expanded by `eps` on both ends.
    #[inline]
    fn fuzzy_in_range_eps(&self, min: Self, max: Self, eps: Self) -> bool {
        self.fuzzy_gt_eps(min, eps) && self.fuzzy_lt_eps(max, eps)
    }

    /// [Fuzzy::fuzzy_in_range_eps] with the default epsilon.
    #[inline]
    fn fuzzy_in_range(&self, min: Self, max: Self) -> bool {
        self.fuzzy_in_range_eps(min, max, Self::fuzzy_epsilon())
    }
}

impl Fuzzy for f32 {
    #[inline]
    fn fuzzy_epsilon() -> Self {
        1.0e-8
    }
    #[inline]
    fn fuzzy_eq_eps(&self, other: Self, eps: Self) -> bool {
        (*self - other).abs() < eps
    }
    #[inline]
    fn fuzzy_eq_zero_eps(&self, eps: Self) -> bool {
        self.abs() < eps
    }
    #[inline]
    fn fuzzy_lt_eps(&self, other: Self, eps: Self) -> bool {
        *self < other + eps
    }
    #[inline]
    fn fuzzy_gt_eps(&self, other: Self, eps: Self) -> bool {
        *self + eps > other
    }
}

impl Fuzzy for f64 {
    #[inline]
    fn fuzzy_epsilon() -> Self {
        1.0e-8
    }
    #[inline]
    fn fuzzy_eq_eps(&self, other: Self, eps: Self) -> bool {
        (*self - other).abs() < eps
    }
    #[inline]
    fn fuzzy_eq_zero_eps(&self, eps: Self) -> bool {
        self.abs() < eps
    }
    #[inline]
    fn fuzzy_lt_eps(&self, other: Self, eps: Self) -> bool {
        *self < other + eps
    }
    #[inline]
    fn fuzzy_gt_eps(&self, other: Self, eps: Self) -> bool {
        *self + eps > other
    }
}

/// Generic real scalar the whole crate is parameterised over.
///
/// Implemented for `f32` and `f64`. The constant helpers exist so generic code can spell common
/// values without casting through `num_traits::NumCast` at every use site.
pub trait Real:
    num_traits::real::Real + num_traits::Bounded + Fuzzy + Default + std::fmt::Debug + 'static
{
    #[inline]
    fn pi() -> Self {
        Self::from(std::f64::consts::PI).unwrap()
    }

    #[inline]
    fn tau() -> Self {
        Self::from(std::f64::consts::TAU).unwrap()
    }

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn four() -> Self {
        Self::two() + Self::two()
    }

    #[inline]
    fn min_value() -> Self {
        num_traits::real::Real::min_value()
    }

    #[inline]
    fn max_value() -> Self {
        num_traits::real::Real::max_value()
    }
}

impl Real for f32 {
    #[inline]
    fn pi() -> Self {
        std::f32::consts::PI
    }
    #[inline]
    fn tau() -> Self {
        std::f32::consts::TAU
    }
}

impl Real for f64 {
    #[inline]
    fn pi() -> Self {
        std::f64::consts::PI
    }
    #[inline]
    fn tau() -> Self {
        std::f64::consts::TAU
    }
}

/// Control flow decision returned by query/intersect visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep visiting results.
    Continue,
    /// Stop visiting results.
    Break,
}

impl Default for Control {
    #[inline]
    fn default() -> Self {
        Control::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_eq_basics() {
        assert!(1.0f64.fuzzy_eq(1.0 + 1e-9));
        assert!(!1.0f64.fuzzy_eq(1.0 + 1e-7));
        assert!(0.0f64.fuzzy_eq_zero());
        assert!(1e-4f64.fuzzy_eq_zero_eps(1e-3));
    }

    #[test]
    fn fuzzy_ordering() {
        assert!(1.0f64.fuzzy_lt(1.0));
        assert!(1.0f64.fuzzy_gt(1.0));
        assert!(0.5f64.fuzzy_in_range(0.5, 1.0));
        assert!(!1.5f64.fuzzy_in_range(0.0, 1.0));
    }

    #[test]
    fn real_constants() {
        assert_eq!(f64::two(), 2.0);
        assert_eq!(f64::four(), 4.0);
        assert!(f64::tau().fuzzy_eq(2.0 * f64::pi()));
    }
}
