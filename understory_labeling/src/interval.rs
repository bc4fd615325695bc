// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer grid extents and coordinates.

use core::fmt;

use smallvec::SmallVec;

use crate::error::LabelingError;

/// A grid coordinate, one integer per axis.
///
/// Four axes stay inline, which covers 2D, 3D, and time-resolved 3D data.
pub type Coord = SmallVec<[i64; 4]>;

/// An n-dimensional axis-aligned integer extent.
///
/// Both `min` and `max` are inclusive, so an interval always holds at least one
/// cell per axis. Cells are flattened with axis 0 varying fastest.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Interval {
    min: Coord,
    max: Coord,
}

impl Interval {
    /// Create an interval from inclusive per-axis bounds.
    ///
    /// Fails when the bounds have different lengths, when there are no axes,
    /// or when any axis has `max < min`.
    pub fn new(min: &[i64], max: &[i64]) -> Result<Self, LabelingError> {
        if min.len() != max.len() {
            return Err(LabelingError::DimensionMismatch {
                expected: min.len(),
                found: max.len(),
            });
        }
        if min.is_empty() {
            return Err(LabelingError::NoAxes);
        }
        if let Some(axis) = (0..min.len()).find(|&d| max[d] < min[d]) {
            return Err(LabelingError::EmptyAxis { axis });
        }
        Ok(Self {
            min: Coord::from_slice(min),
            max: Coord::from_slice(max),
        })
    }

    /// Create a zero-based interval with the given size per axis.
    ///
    /// ```
    /// use understory_labeling::Interval;
    ///
    /// let grid = Interval::from_dimensions(&[100, 100]).unwrap();
    /// assert_eq!(grid.max(0), 99);
    /// assert_eq!(grid.size(), 10_000);
    /// ```
    pub fn from_dimensions(dims: &[u64]) -> Result<Self, LabelingError> {
        if let Some(axis) = dims.iter().position(|&d| d == 0) {
            return Err(LabelingError::EmptyAxis { axis });
        }
        let max: Coord = dims
            .iter()
            .map(|&d| i64::try_from(d).map_or(i64::MAX, |d| d - 1))
            .collect();
        let min: Coord = core::iter::repeat_n(0, dims.len()).collect();
        Self::new(&min, &max)
    }

    /// Number of axes.
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.min.len()
    }

    /// Inclusive lower bound of `axis`.
    #[inline]
    pub fn min(&self, axis: usize) -> i64 {
        self.min[axis]
    }

    /// Inclusive upper bound of `axis`.
    #[inline]
    pub fn max(&self, axis: usize) -> i64 {
        self.max[axis]
    }

    /// All lower bounds.
    #[inline]
    pub fn mins(&self) -> &[i64] {
        &self.min
    }

    /// All upper bounds.
    #[inline]
    pub fn maxs(&self) -> &[i64] {
        &self.max
    }

    /// Number of cells along `axis`.
    #[inline]
    pub fn dimension(&self, axis: usize) -> u64 {
        self.max[axis].abs_diff(self.min[axis]) + 1
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        (0..self.num_dimensions())
            .map(|d| usize::try_from(self.dimension(d)).unwrap_or(usize::MAX))
            .fold(1_usize, usize::saturating_mul)
    }

    /// Whether `coord` has the right number of axes and lies inside.
    #[inline]
    pub fn contains(&self, coord: &[i64]) -> bool {
        coord.len() == self.num_dimensions()
            && coord
                .iter()
                .zip(self.min.iter().zip(&self.max))
                .all(|(&c, (&lo, &hi))| lo <= c && c <= hi)
    }

    /// Flattened index of `coord`, or `None` when it lies outside.
    pub fn flat_index(&self, coord: &[i64]) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        let mut index = 0_usize;
        let mut stride = 1_usize;
        for (d, &c) in coord.iter().enumerate() {
            let offset = usize::try_from(c - self.min[d]).ok()?;
            index += offset * stride;
            stride *= usize::try_from(self.dimension(d)).ok()?;
        }
        Some(index)
    }

    /// Inverse of [`flat_index`](Self::flat_index).
    ///
    /// Returns `None` when `index` is not below [`size`](Self::size).
    pub fn coord_of(&self, mut index: usize) -> Option<Coord> {
        if index >= self.size() {
            return None;
        }
        let mut coord = Coord::with_capacity(self.num_dimensions());
        for d in 0..self.num_dimensions() {
            let dim = usize::try_from(self.dimension(d)).ok()?;
            let offset = i64::try_from(index % dim).ok()?;
            coord.push(self.min[d] + offset);
            index /= dim;
        }
        Some(coord)
    }

    /// The overlap of two intervals, or `None` when they are disjoint or
    /// have different dimensionality.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        if self.num_dimensions() != other.num_dimensions() {
            return None;
        }
        let min: Coord = self
            .min
            .iter()
            .zip(&other.min)
            .map(|(&a, &b)| a.max(b))
            .collect();
        let max: Coord = self
            .max
            .iter()
            .zip(&other.max)
            .map(|(&a, &b)| a.min(b))
            .collect();
        Self::new(&min, &max).ok()
    }

    /// The smallest interval enclosing both.
    ///
    /// Intervals of different dimensionality cannot be combined; `self` is
    /// returned unchanged in that case.
    pub fn union(&self, other: &Self) -> Self {
        if self.num_dimensions() != other.num_dimensions() {
            return self.clone();
        }
        Self {
            min: self
                .min
                .iter()
                .zip(&other.min)
                .map(|(&a, &b)| a.min(b))
                .collect(),
            max: self
                .max
                .iter()
                .zip(&other.max)
                .map(|(&a, &b)| a.max(b))
                .collect(),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (d, (lo, hi)) in self.min.iter().zip(&self.max).enumerate() {
            if d > 0 {
                f.write_str(" x ")?;
            }
            write!(f, "[{lo}, {hi}]")?;
        }
        Ok(())
    }
}
