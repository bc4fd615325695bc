// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use hashbrown::HashMap;

use crate::error::LabelingError;
use crate::interval::Interval;
use crate::region::Region;

/// A named category with a stable index.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    name: String,
    index: usize,
}

impl Label {
    /// Display name, unique within its labeling.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position in the labeling; also the key for color lookup.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A fixed grid extent plus an ordered set of named regions.
///
/// Every region covers exactly [`interval`](Self::interval). The set of labels
/// never changes after construction; when it must, build a new `Labeling` and
/// swap it in wholesale. Region contents are edited in place through
/// [`regions_mut`](Self::regions_mut) or [`region_mut`](Self::region_mut).
#[derive(Clone, Debug)]
pub struct Labeling {
    interval: Interval,
    labels: Vec<Label>,
    regions: Vec<Region>,
    by_name: HashMap<String, usize>,
}

impl Labeling {
    /// Allocate one all-false region per name, in order.
    ///
    /// ```
    /// use understory_labeling::{Interval, Labeling};
    ///
    /// let grid = Interval::from_dimensions(&[64, 64]).unwrap();
    /// let labeling = Labeling::new(["background", "nucleus"], grid).unwrap();
    /// assert_eq!(labeling.len(), 2);
    /// assert_eq!(labeling.index_of("nucleus"), Some(1));
    /// assert!(labeling.regions().iter().all(|r| r.is_clear()));
    /// ```
    pub fn new<I, S>(names: I, interval: Interval) -> Result<Self, LabelingError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut labels = Vec::new();
        let mut by_name = HashMap::new();
        for name in names {
            let name = name.into();
            let index = labels.len();
            if by_name.insert(name.clone(), index).is_some() {
                return Err(LabelingError::DuplicateLabel(name));
            }
            labels.push(Label { name, index });
        }
        let regions = labels
            .iter()
            .map(|_| Region::new(interval.clone()))
            .collect();
        Ok(Self {
            interval,
            labels,
            regions,
            by_name,
        })
    }

    /// The shared grid extent.
    #[inline]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Number of axes of the grid.
    #[inline]
    pub fn num_dimensions(&self) -> usize {
        self.interval.num_dimensions()
    }

    /// Number of labels.
    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether there are no labels at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in index order.
    #[inline]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Label at `index`.
    #[inline]
    pub fn label(&self, index: usize) -> Option<&Label> {
        self.labels.get(index)
    }

    /// Index of the label called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    /// Regions in label index order.
    #[inline]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Mutable regions in label index order.
    #[inline]
    pub fn regions_mut(&mut self) -> &mut [Region] {
        &mut self.regions
    }

    /// Region of label `index`.
    #[inline]
    pub fn region(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Mutable region of label `index`.
    #[inline]
    pub fn region_mut(&mut self, index: usize) -> Option<&mut Region> {
        self.regions.get_mut(index)
    }
}
