// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_labeling --heading-base-level=0

//! Understory Labeling: named boolean masks over a shared integer grid.
//!
//! A [`Labeling`] is the data model behind interactive annotation tools:
//!
//! - An n-dimensional [`Interval`] fixes the grid extent for the labeling's lifetime.
//! - One [`Region`] (a dense bitmap) per [`Label`], in insertion order. Regions may overlap.
//! - Label sets never change in place. Build a new `Labeling` and publish it through a
//!   [`Holder`](holder::Holder); subscribers observe the replacement before
//!   [`Holder::set`](holder::Holder::set) returns.
//! - [`SharedLabeling`] puts one generation behind a reader/writer lock so a paint path and a
//!   render path can work on it concurrently.
//!
//! # Example
//!
//! ```rust
//! use understory_labeling::{Interval, Labeling, SharedLabeling};
//! use understory_labeling::holder::Holder;
//!
//! let grid = Interval::from_dimensions(&[100, 100]).unwrap();
//! let mut labels = Holder::new(SharedLabeling::new(
//!     Labeling::new(["foreground", "background"], grid.clone()).unwrap(),
//! ));
//!
//! // Paint one pixel into the first region.
//! labels.get().write().regions_mut()[0].set(&[10, 10], true);
//! assert!(labels.get().read().regions()[0].get(&[10, 10]));
//!
//! // Swap in a new label set of the same extent.
//! let report = labels.set(SharedLabeling::new(
//!     Labeling::new(["a", "b", "c"], grid).unwrap(),
//! ));
//! assert!(report.is_ok());
//! assert_eq!(labels.get().label_count(), 3);
//! ```

mod error;
pub mod holder;
mod interval;
mod labeling;
mod region;
mod shared;

pub use error::LabelingError;
pub use interval::{Coord, Interval};
pub use labeling::{Label, Labeling};
pub use region::Region;
pub use shared::SharedLabeling;
