// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense boolean masks.

use core::fmt::Debug;

use crate::interval::{Coord, Interval};

const WORD_BITS: usize = u64::BITS as usize;

/// A boolean raster covering exactly one [`Interval`].
///
/// Storage is a dense bitmap indexed by the interval's flattened coordinate.
/// Reads and writes outside the interval are clipped: [`get`](Self::get)
/// reports `false` and [`set`](Self::set) does nothing.
#[derive(Clone, PartialEq, Eq)]
pub struct Region {
    interval: Interval,
    words: Vec<u64>,
}

impl Debug for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Region")
            .field("interval", &self.interval)
            .field("count", &self.count_ones())
            .finish_non_exhaustive()
    }
}

impl Region {
    /// Create an all-false region covering `interval`.
    pub fn new(interval: Interval) -> Self {
        let words = vec![0; interval.size().div_ceil(WORD_BITS)];
        Self { interval, words }
    }

    /// The extent this region covers.
    #[inline]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Value at `coord`; `false` outside the extent.
    #[inline]
    pub fn get(&self, coord: &[i64]) -> bool {
        self.interval
            .flat_index(coord)
            .is_some_and(|i| self.words[i / WORD_BITS] & (1 << (i % WORD_BITS)) != 0)
    }

    /// Write `value` at `coord`.
    ///
    /// Returns whether the stored value changed. Coordinates outside the
    /// extent are ignored and report `false`.
    #[inline]
    pub fn set(&mut self, coord: &[i64], value: bool) -> bool {
        let Some(i) = self.interval.flat_index(coord) else {
            return false;
        };
        let word = &mut self.words[i / WORD_BITS];
        let mask = 1_u64 << (i % WORD_BITS);
        let old = *word & mask != 0;
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        old != value
    }

    /// Number of `true` cells.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Whether no cell is set.
    pub fn is_clear(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Reset every cell to `false`.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    /// Coordinates of all `true` cells, in flattened order.
    pub fn iter_ones(&self) -> impl Iterator<Item = Coord> + '_ {
        self.words
            .iter()
            .enumerate()
            .flat_map(|(wi, &word)| {
                let mut bits = word;
                core::iter::from_fn(move || {
                    if bits == 0 {
                        return None;
                    }
                    let bit = bits.trailing_zeros() as usize;
                    bits &= bits - 1;
                    Some(wi * WORD_BITS + bit)
                })
            })
            .filter_map(|i| self.interval.coord_of(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_reports_changes_and_clips() {
        let mut region = Region::new(Interval::from_dimensions(&[10, 10]).unwrap());
        assert!(region.is_clear());

        assert!(region.set(&[3, 4], true));
        assert!(!region.set(&[3, 4], true));
        assert!(region.get(&[3, 4]));
        assert!(!region.get(&[4, 3]));

        assert!(!region.set(&[10, 0], true));
        assert!(!region.set(&[-1, 0], true));
        assert!(!region.get(&[10, 0]));
        assert_eq!(region.count_ones(), 1);

        assert!(region.set(&[3, 4], false));
        assert!(region.is_clear());
    }

    #[test]
    fn iter_ones_spans_word_boundaries() {
        let mut region = Region::new(Interval::from_dimensions(&[70, 3]).unwrap());
        let coords: [[i64; 2]; 4] = [[0, 0], [63, 0], [64, 0], [5, 2]];
        for c in &coords {
            region.set(c, true);
        }
        let ones: Vec<Vec<i64>> = region.iter_ones().map(|c| c.to_vec()).collect();
        assert_eq!(ones, vec![vec![0, 0], vec![63, 0], vec![64, 0], vec![5, 2]]);

        region.clear();
        assert_eq!(region.iter_ones().count(), 0);
    }
}
