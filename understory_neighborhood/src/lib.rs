// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_neighborhood --heading-base-level=0

//! Understory Neighborhood: brush footprints over integer grids.
//!
//! Given a center in grid space, a timepoint, and an integer radius,
//! [`Neighborhood::pixels_at`] lazily enumerates every grid coordinate within Euclidean distance
//! `radius` of the center. The center is first rounded to the nearest grid coordinate (halves
//! round up), so radius 0 yields exactly that one coordinate.
//!
//! There are two policies, picked once when a session starts:
//!
//! - [`Neighborhood::Spatial`]: a hypersphere over all axes; the timepoint is ignored.
//! - [`Neighborhood::TimeSeries`]: one axis holds time. The sphere spans the remaining axes and
//!   the time coordinate is pinned to the timepoint, so a dab never leaks into another frame.
//!
//! Footprints are not clipped to any grid; callers skip what falls outside their extent.
//!
//! # Example
//!
//! ```rust
//! use understory_neighborhood::Neighborhood;
//!
//! // 2D time series: axes are (x, y, t).
//! let brush = Neighborhood::time_series(3, 2).unwrap();
//! let dab: Vec<_> = brush.pixels_at(&[10.2, 4.7], 3, 1).unwrap().collect();
//!
//! assert_eq!(dab.len(), 5);
//! assert!(dab.iter().all(|c| c[2] == 3));
//! assert!(dab.iter().any(|c| c.as_slice() == [10, 5, 3]));
//! ```

mod footprint;

use smallvec::SmallVec;
use understory_labeling::{Coord, Interval, LabelingError};

pub use footprint::Footprint;

/// Rejected footprint request or generator configuration.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum NeighborhoodError {
    /// Brush radii are never negative.
    #[error("brush radius must be non-negative, got {0}")]
    NegativeRadius(i64),
    /// The center has a NaN or infinite component on a spatial axis.
    #[error("brush center {0:?} is not finite")]
    NonFiniteCenter(Vec<f64>),
    /// The time axis must be one of the grid's axes.
    #[error("time axis {time_axis} is out of range for a {dims}-dimensional grid")]
    InvalidTimeAxis {
        /// Requested time axis.
        time_axis: usize,
        /// Grid dimensionality.
        dims: usize,
    },
    /// The footprint bounds could not be formed.
    #[error(transparent)]
    Grid(#[from] LabelingError),
}

/// Brush footprint policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Neighborhood {
    /// Hypersphere over every axis.
    Spatial {
        /// Grid dimensionality.
        dims: usize,
    },
    /// Hypersphere over every axis but `time_axis`, which is pinned to the timepoint.
    TimeSeries {
        /// Grid dimensionality, time included.
        dims: usize,
        /// The temporal axis.
        time_axis: usize,
    },
}

impl Neighborhood {
    /// Spatial policy for a `dims`-dimensional grid.
    pub fn spatial(dims: usize) -> Self {
        Self::Spatial { dims }
    }

    /// Time-series policy for a `dims`-dimensional grid.
    pub fn time_series(dims: usize, time_axis: usize) -> Result<Self, NeighborhoodError> {
        if time_axis >= dims {
            return Err(NeighborhoodError::InvalidTimeAxis { time_axis, dims });
        }
        Ok(Self::TimeSeries { dims, time_axis })
    }

    /// Pick the policy for `interval`: time series when `time_axis` is given.
    pub fn for_interval(
        interval: &Interval,
        time_axis: Option<usize>,
    ) -> Result<Self, NeighborhoodError> {
        let dims = interval.num_dimensions();
        match time_axis {
            Some(axis) => Self::time_series(dims, axis),
            None => Ok(Self::spatial(dims)),
        }
    }

    /// Grid dimensionality.
    #[inline]
    pub fn dims(&self) -> usize {
        match *self {
            Self::Spatial { dims } | Self::TimeSeries { dims, .. } => dims,
        }
    }

    /// The pinned time axis, if any.
    #[inline]
    pub fn time_axis(&self) -> Option<usize> {
        match *self {
            Self::Spatial { .. } => None,
            Self::TimeSeries { time_axis, .. } => Some(time_axis),
        }
    }

    /// Axes the sphere spans, in increasing order.
    pub fn spatial_axes(&self) -> SmallVec<[usize; 4]> {
        let time = self.time_axis();
        (0..self.dims()).filter(|&d| Some(d) != time).collect()
    }

    /// Footprint of a dab at `center` with the given `radius`.
    ///
    /// `center[i]` is the position along the `i`-th spatial axis; extra
    /// components are ignored and missing ones read as zero. `timepoint` is
    /// only used by [`Neighborhood::TimeSeries`].
    pub fn pixels_at(
        &self,
        center: &[f64],
        timepoint: i64,
        radius: i64,
    ) -> Result<Footprint, NeighborhoodError> {
        if radius < 0 {
            return Err(NeighborhoodError::NegativeRadius(radius));
        }
        let axes = self.spatial_axes();
        if center.iter().take(axes.len()).any(|c| !c.is_finite()) {
            return Err(NeighborhoodError::NonFiniteCenter(center.to_vec()));
        }

        let mut origin: Coord = SmallVec::from_elem(0, self.dims());
        for (i, &axis) in axes.iter().enumerate() {
            origin[axis] = round_half_up(center.get(i).copied().unwrap_or(0.0));
        }
        if let Some(t) = self.time_axis() {
            origin[t] = timepoint;
        }

        let mut min = origin.clone();
        let mut max = origin.clone();
        for &axis in &axes {
            min[axis] = origin[axis].saturating_sub(radius);
            max[axis] = origin[axis].saturating_add(radius);
        }
        let bounds = Interval::new(&min, &max)?;

        Ok(Footprint::new(origin, axes, radius, bounds))
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "Grid coordinates are i64; out-of-range centers saturate."
)]
#[inline]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}
