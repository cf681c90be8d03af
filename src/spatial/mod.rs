//! Static spatial index: a packed Hilbert R-tree bulk loaded from a fixed set of axis aligned
//! bounding boxes.
//!
//! The index is immutable once built (query only, no insert/delete). Build is `O(n log n)`
//! (dominated by the Hilbert sort), queries are `O(log n + k)` expected. Construction is
//! deterministic: equal input boxes always produce an identical tree and identical query
//! visitation order.

mod hilbert;

use crate::num::{Control, Real};
use hilbert::hilbert_xy_index;
use num_traits::ToPrimitive;
use thiserror::Error;

/// Axis aligned bounding box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB<T = f64> {
    pub min_x: T,
    pub min_y: T,
    pub max_x: T,
    pub max_y: T,
}

impl<T> Default for AABB<T>
where
    T: Real,
{
    #[inline]
    fn default() -> Self {
        AABB::new(T::zero(), T::zero(), T::zero(), T::zero())
    }
}

impl<T> AABB<T>
where
    T: Real,
{
    #[inline]
    pub fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        AABB {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Grow the box in all directions by `amount`.
    #[inline]
    pub fn expanded(&self, amount: T) -> Self {
        AABB::new(
            self.min_x - amount,
            self.min_y - amount,
            self.max_x + amount,
            self.max_y + amount,
        )
    }

    /// Test if this box overlaps (including touching) `other`.
    #[inline]
    pub fn overlaps_aabb(&self, other: &AABB<T>) -> bool {
        self.overlaps(other.min_x, other.min_y, other.max_x, other.max_y)
    }

    /// Test if this box overlaps the box given by its extent values.
    #[inline]
    pub fn overlaps(&self, min_x: T, min_y: T, max_x: T, max_y: T) -> bool {
        !(self.min_x > max_x || self.min_y > max_y || self.max_x < min_x || self.max_y < min_y)
    }

    /// Test if this box entirely contains the point `(x, y)`.
    #[inline]
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.min_x <= x && x <= self.max_x && self.min_y <= y && y <= self.max_y
    }

    /// Grow this box in place to contain `other`.
    #[inline]
    pub fn merge(&mut self, other: &AABB<T>) {
        use num_traits::real::Real;
        self.min_x = Real::min(self.min_x, other.min_x);
        self.min_y = Real::min(self.min_y, other.min_y);
        self.max_x = Real::max(self.max_x, other.max_x);
        self.max_y = Real::max(self.max_y, other.max_y);
    }

    #[inline]
    pub fn mid_point(&self) -> (T, T) {
        (
            (self.min_x + self.max_x) / T::two(),
            (self.min_y + self.max_y) / T::two(),
        )
    }
}

/// Error raised when building a [StaticSpatialIndex] fails.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpatialIndexError {
    /// Number of boxes added did not match the count the builder was created with.
    #[error("added item count ({added}) does not match expected count ({expected})")]
    ItemCount { added: usize, expected: usize },
    /// A coordinate failed to cast while mapping boxes onto the Hilbert curve (e.g. NaN).
    #[error("failed numeric cast while computing hilbert values")]
    NumericCast,
}

/// Builder that accumulates boxes then packs them into a [StaticSpatialIndex].
#[derive(Debug, Clone)]
pub struct SpatialIndexBuilder<T = f64> {
    node_size: usize,
    num_items: usize,
    level_bounds: Vec<usize>,
    boxes: Vec<AABB<T>>,
    indices: Vec<usize>,
    bounds: AABB<T>,
    added: usize,
}

impl<T> SpatialIndexBuilder<T>
where
    T: Real,
{
    /// Create a builder expecting exactly `count` boxes with default node size of 16.
    #[inline]
    pub fn new(count: usize) -> Self {
        Self::new_with_node_size(count, 16)
    }

    /// Create a builder expecting exactly `count` boxes using `node_size` children per tree node
    /// (clamped to `[2, 65535]`).
    pub fn new_with_node_size(count: usize, node_size: usize) -> Self {
        let node_size = node_size.clamp(2, 65535);

        // compute full tree shape up front: cumulative node counts per level, leaves first
        let mut level_bounds = Vec::new();
        let mut n = count;
        let mut num_nodes = count;
        level_bounds.push(n);
        while n > 1 {
            n = (n + node_size - 1) / node_size;
            num_nodes += n;
            level_bounds.push(num_nodes);
        }

        Self {
            node_size,
            num_items: count,
            level_bounds,
            boxes: Vec::with_capacity(num_nodes),
            indices: vec![0; num_nodes],
            bounds: AABB::new(
                Real::max_value(),
                Real::max_value(),
                Real::min_value(),
                Real::min_value(),
            ),
            added: 0,
        }
    }

    /// Add the next box to the index.
    pub fn add(&mut self, min_x: T, min_y: T, max_x: T, max_y: T) -> &mut Self {
        let item = AABB::new(min_x, min_y, max_x, max_y);
        self.bounds.merge(&item);
        self.indices[self.added] = self.added;
        self.boxes.push(item);
        self.added += 1;
        self
    }

    /// Finish building the index.
    ///
    /// Errors if fewer boxes than the expected count were added or a coordinate fails to cast
    /// while computing Hilbert values.
    pub fn build(mut self) -> Result<StaticSpatialIndex<T>, SpatialIndexError> {
        if self.added != self.num_items {
            return Err(SpatialIndexError::ItemCount {
                added: self.added,
                expected: self.num_items,
            });
        }

        if self.num_items == 0 {
            return Ok(StaticSpatialIndex {
                node_size: self.node_size,
                num_items: 0,
                level_bounds: self.level_bounds,
                boxes: self.boxes,
                indices: self.indices,
                bounds: AABB::default(),
            });
        }

        // map box centers onto the hilbert curve covering the total extent
        let width = self.bounds.max_x - self.bounds.min_x;
        let height = self.bounds.max_y - self.bounds.min_y;
        let hilbert_max = T::from(u16::MAX).ok_or(SpatialIndexError::NumericCast)?;

        let scaled = |value: T, min: T, size: T| -> Result<u16, SpatialIndexError> {
            let s = if size <= T::zero() {
                T::zero()
            } else {
                hilbert_max * ((value - min) / size)
            };
            // clamp before casting so values on the max boundary stay in range
            let s = num_traits::real::Real::min(num_traits::real::Real::max(s, T::zero()), hilbert_max);
            s.to_u16().ok_or(SpatialIndexError::NumericCast)
        };

        let mut hilbert_values = Vec::with_capacity(self.num_items);
        for (i, item) in self.boxes.iter().enumerate() {
            let (mid_x, mid_y) = item.mid_point();
            let hx = scaled(mid_x, self.bounds.min_x, width)?;
            let hy = scaled(mid_y, self.bounds.min_y, height)?;
            // tie break on insertion order for deterministic builds
            hilbert_values.push((hilbert_xy_index(hx, hy), i));
        }

        hilbert_values.sort_unstable();

        // apply the sort permutation to the leaf boxes and record item indices
        let mut sorted_boxes = Vec::with_capacity(self.boxes.capacity());
        for (pos, &(_, original)) in hilbert_values.iter().enumerate() {
            self.indices[pos] = original;
            sorted_boxes.push(self.boxes[original]);
        }
        self.boxes = sorted_boxes;

        // pack the tree bottom up, every parent box tightly bounds its children
        let mut pos = 0;
        for &level_end in &self.level_bounds[..self.level_bounds.len() - 1] {
            while pos < level_end {
                let node_start = pos;
                let mut node_box = self.boxes[pos];
                pos += 1;
                while pos < level_end && pos - node_start < self.node_size {
                    node_box.merge(&self.boxes[pos]);
                    pos += 1;
                }
                self.indices[self.boxes.len()] = node_start;
                self.boxes.push(node_box);
            }
        }

        Ok(StaticSpatialIndex {
            node_size: self.node_size,
            num_items: self.num_items,
            level_bounds: self.level_bounds,
            boxes: self.boxes,
            indices: self.indices,
            bounds: self.bounds,
        })
    }
}

/// Static flat packed Hilbert R-tree over a fixed set of boxes.
///
/// Created with [SpatialIndexBuilder]. Leaf box `k` (in sorted order) corresponds to input item
/// `item_indices()[k]`. Nodes are stored in one flat array, leaves first and root last, with per
/// level start offsets recorded at build time.
///
/// # Examples
///
/// ```
/// # use arcline::spatial::SpatialIndexBuilder;
/// let mut builder = SpatialIndexBuilder::new(3);
/// builder.add(0.0, 0.0, 1.0, 1.0);
/// builder.add(2.0, 2.0, 3.0, 3.0);
/// builder.add(0.5, 0.5, 1.5, 1.5);
/// let index = builder.build().unwrap();
/// let mut results = index.query(0.0, 0.0, 1.0, 1.0);
/// results.sort_unstable();
/// assert_eq!(results, vec![0, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct StaticSpatialIndex<T = f64> {
    node_size: usize,
    num_items: usize,
    level_bounds: Vec<usize>,
    boxes: Vec<AABB<T>>,
    indices: Vec<usize>,
    bounds: AABB<T>,
}

impl<T> StaticSpatialIndex<T>
where
    T: Real,
{
    /// Total extent of all items added.
    #[inline]
    pub fn bounds(&self) -> AABB<T> {
        self.bounds
    }

    /// Number of items in the index.
    #[inline]
    pub fn count(&self) -> usize {
        self.num_items
    }

    /// Leaf boxes in their sorted (Hilbert) order.
    #[inline]
    pub fn item_boxes(&self) -> &[AABB<T>] {
        &self.boxes[..self.num_items]
    }

    /// Original input position of each sorted leaf box (parallel to [Self::item_boxes]).
    #[inline]
    pub fn item_indices(&self) -> &[usize] {
        &self.indices[..self.num_items]
    }

    /// Collect all item indices whose boxes overlap the query box.
    ///
    /// Order of the returned indices is unspecified.
    pub fn query(&self, min_x: T, min_y: T, max_x: T, max_y: T) -> Vec<usize> {
        let mut results = Vec::new();
        let mut stack = Vec::with_capacity(16);
        self.visit_query_with_stack(
            min_x,
            min_y,
            max_x,
            max_y,
            &mut |i| {
                results.push(i);
                Control::Continue
            },
            &mut stack,
        );
        results
    }

    /// Same as [Self::query] but reuses `results` and `stack` buffers across calls to avoid
    /// allocation churn in hot query loops.
    pub fn query_with_buffers(
        &self,
        min_x: T,
        min_y: T,
        max_x: T,
        max_y: T,
        results: &mut Vec<usize>,
        stack: &mut Vec<usize>,
    ) {
        self.visit_query_with_stack(
            min_x,
            min_y,
            max_x,
            max_y,
            &mut |i| {
                results.push(i);
                Control::Continue
            },
            stack,
        );
    }

    /// Visit all item indices whose boxes overlap the query box; the visitor returns
    /// [Control::Break] to stop early.
    pub fn visit_query<F>(&self, min_x: T, min_y: T, max_x: T, max_y: T, visitor: &mut F)
    where
        F: FnMut(usize) -> Control,
    {
        let mut stack = Vec::with_capacity(16);
        self.visit_query_with_stack(min_x, min_y, max_x, max_y, visitor, &mut stack);
    }

    /// Same as [Self::visit_query] using a caller provided traversal stack buffer (cleared before
    /// use) so repeated queries can reuse its allocation.
    pub fn visit_query_with_stack<F>(
        &self,
        min_x: T,
        min_y: T,
        max_x: T,
        max_y: T,
        visitor: &mut F,
        stack: &mut Vec<usize>,
    ) where
        F: FnMut(usize) -> Control,
    {
        if self.num_items == 0 {
            return;
        }

        stack.clear();

        let mut node_index = self.boxes.len() - 1;
        let mut level = self.level_bounds.len() - 1;

        'search: loop {
            let end = std::cmp::min(
                node_index + self.node_size,
                self.level_bounds[level],
            );

            for pos in node_index..end {
                let node_box = &self.boxes[pos];
                if !node_box.overlaps(min_x, min_y, max_x, max_y) {
                    continue;
                }

                if node_index < self.num_items {
                    // leaf node
                    if visitor(self.indices[pos]) == Control::Break {
                        break 'search;
                    }
                } else {
                    // internal node, descend to its first child later
                    stack.push(self.indices[pos]);
                    stack.push(level - 1);
                }
            }

            if stack.is_empty() {
                break;
            }
            level = stack.pop().unwrap();
            node_index = stack.pop().unwrap();
        }
    }
}
