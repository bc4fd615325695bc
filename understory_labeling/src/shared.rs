// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A labeling shared between the paint path and the render path.

use core::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::interval::Interval;
use crate::labeling::Labeling;
use crate::region::Region;

/// Cheaply cloneable handle to one [`Labeling`] generation.
///
/// The write guard is the render-surface critical section: a painter holds it
/// for the pixels of one brush dab and releases it immediately, so a reader
/// taking [`read`](Self::read) never sees half a dab.
///
/// A poisoned lock is recovered rather than propagated. Each region write is a
/// single bit store, so a writer that panicked mid-dab leaves valid bits
/// behind.
#[derive(Clone)]
pub struct SharedLabeling {
    inner: Arc<RwLock<Labeling>>,
    interval: Interval,
}

impl Debug for SharedLabeling {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedLabeling")
            .field("interval", &self.interval)
            .field("handles", &Arc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

impl From<Labeling> for SharedLabeling {
    fn from(labeling: Labeling) -> Self {
        Self::new(labeling)
    }
}

impl SharedLabeling {
    /// Wrap `labeling` for sharing.
    pub fn new(labeling: Labeling) -> Self {
        let interval = labeling.interval().clone();
        Self {
            inner: Arc::new(RwLock::new(labeling)),
            interval,
        }
    }

    /// The grid extent; fixed for this generation, so no lock is taken.
    #[inline]
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// Shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Labeling> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Labeling> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the region of label `index`, taken under the read lock.
    pub fn snapshot_region(&self, index: usize) -> Option<Region> {
        self.read().region(index).cloned()
    }

    /// Number of labels in this generation.
    pub fn label_count(&self) -> usize {
        self.read().len()
    }

    /// Whether both handles refer to the same generation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
