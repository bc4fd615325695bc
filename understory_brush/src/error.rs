// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_labeling::{Interval, LabelingError};
use understory_neighborhood::NeighborhoodError;

/// Rejected brush operation. Brush state is unchanged when one is returned.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BrushError {
    /// Brush radii are never negative.
    #[error("brush radius must be non-negative, got {0}")]
    NegativeRadius(i64),
    /// The label index does not name a label of the current labeling.
    #[error("label {index} does not exist, the labeling has {count} labels")]
    UnknownLabel {
        /// Requested index.
        index: usize,
        /// Labels in the current labeling.
        count: usize,
    },
    /// The footprint could not be generated.
    #[error(transparent)]
    Neighborhood(#[from] NeighborhoodError),
}

/// Rejected session operation.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// A replacement labeling must keep the session's grid extent.
    #[error("replacement labeling covers {found}, expected {expected}")]
    ExtentMismatch {
        /// Extent of the current labeling.
        expected: Interval,
        /// Extent of the rejected labeling.
        found: Interval,
    },
    /// The initial labeling could not be built.
    #[error(transparent)]
    Labeling(#[from] LabelingError),
    /// The configured footprint policy does not fit the grid.
    #[error(transparent)]
    Neighborhood(#[from] NeighborhoodError),
    /// A brush setting was rejected.
    #[error(transparent)]
    Brush(#[from] BrushError),
}
