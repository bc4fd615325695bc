// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::iter::FusedIterator;

use smallvec::SmallVec;
use understory_labeling::{Coord, Interval};

/// The coordinates of one brush dab, produced lazily.
///
/// Enumeration walks the spatial axes like an odometer with the first axis
/// varying fastest. The span of each axis is narrowed by what the outer axes
/// already consume of `radius²`, so no coordinate outside the sphere is ever
/// visited and none is produced twice.
///
/// A footprint is one-shot: once exhausted it stays exhausted. Ask the
/// [`Neighborhood`](crate::Neighborhood) for a fresh one per dab.
#[derive(Clone, Debug)]
pub struct Footprint {
    origin: Coord,
    axes: SmallVec<[usize; 4]>,
    radius: i64,
    radius_sq: i64,
    offsets: SmallVec<[i64; 4]>,
    half: SmallVec<[i64; 4]>,
    bounds: Interval,
    done: bool,
}

impl Footprint {
    pub(crate) fn new(
        origin: Coord,
        axes: SmallVec<[usize; 4]>,
        radius: i64,
        bounds: Interval,
    ) -> Self {
        let k = axes.len();
        let mut footprint = Self {
            origin,
            axes,
            radius,
            radius_sq: radius.saturating_mul(radius),
            offsets: SmallVec::from_elem(0, k),
            half: SmallVec::from_elem(0, k),
            bounds,
            done: false,
        };
        footprint.reset_below(k);
        footprint
    }

    /// The rounded center every offset is measured from.
    #[inline]
    pub fn center(&self) -> &[i64] {
        &self.origin
    }

    /// The brush radius in grid units.
    #[inline]
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Axis-aligned box around the whole dab, before any clipping to a grid.
    #[inline]
    pub fn bounds(&self) -> &Interval {
        &self.bounds
    }

    /// Restart every spatial axis below `axis` at the start of its span,
    /// given the offsets of `axis` and above.
    fn reset_below(&mut self, axis: usize) {
        let mut used: i64 = self.offsets[axis..].iter().map(|o| o * o).sum();
        for i in (0..axis).rev() {
            let half = (self.radius_sq - used).max(0).isqrt();
            self.half[i] = half;
            self.offsets[i] = -half;
            used += half * half;
        }
    }
}

impl Iterator for Footprint {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.done {
            return None;
        }
        let mut coord = self.origin.clone();
        for (&axis, &offset) in self.axes.iter().zip(&self.offsets) {
            coord[axis] += offset;
        }

        let mut axis = 0;
        loop {
            if axis == self.axes.len() {
                self.done = true;
                break;
            }
            if self.offsets[axis] < self.half[axis] {
                self.offsets[axis] += 1;
                self.reset_below(axis);
                break;
            }
            axis += 1;
        }
        Some(coord)
    }
}

impl FusedIterator for Footprint {}
