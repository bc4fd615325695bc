// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Rejected construction of an [`Interval`](crate::Interval) or
/// [`Labeling`](crate::Labeling).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LabelingError {
    /// Per-axis bounds disagree on the number of axes.
    #[error("expected {expected} axes, found {found}")]
    DimensionMismatch {
        /// Axis count of the reference bounds.
        expected: usize,
        /// Axis count that was supplied.
        found: usize,
    },
    /// An interval must have at least one axis.
    #[error("interval has no axes")]
    NoAxes,
    /// An axis holds no cells.
    #[error("axis {axis} is empty")]
    EmptyAxis {
        /// The offending axis.
        axis: usize,
    },
    /// Label names must be unique within one labeling.
    #[error("duplicate label name `{0}`")]
    DuplicateLabel(String),
}
