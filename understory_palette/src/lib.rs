// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_palette --heading-base-level=0

//! Understory Palette: label colors and label overlay compositing.
//!
//! - [`ColorProvider`] assigns every label index a color that is stable for the lifetime of one
//!   label set. Colors walk the hue circle by the golden angle, so they stay distinct without a
//!   lookup table. When the label set is replaced, [`ColorProvider::refresh`] recomputes the
//!   [`Palette`] and publishes it to subscribers (cursor overlays, renderers).
//! - [`compose_plane`] renders a 2D slice of a [`Labeling`](understory_labeling::Labeling) into
//!   RGBA pixels, the way a labels layer is drawn on top of the raw image.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`Rgba8`] and [`PaletteParams`].
//!
//! # Example
//!
//! ```rust
//! use understory_labeling::{Interval, Labeling};
//! use understory_palette::{ColorProvider, PaletteParams, Plane, compose_plane};
//!
//! let grid = Interval::from_dimensions(&[4, 4]).unwrap();
//! let mut labeling = Labeling::new(["cell", "membrane"], grid).unwrap();
//! labeling.regions_mut()[1].set(&[2, 3], true);
//!
//! let colors = ColorProvider::new(&labeling, PaletteParams::default().with_alpha(160));
//! assert_ne!(colors.color_of(0), colors.color_of(1));
//!
//! let plane = compose_plane(&labeling, colors.palette(), &Plane::xy(2)).unwrap();
//! assert_eq!(plane.pixel(2, 3), colors.color_of(1));
//! ```

mod color;
mod compose;
mod palette;

pub use color::Rgba8;
pub use compose::{ComposeError, ComposedPlane, Plane, compose_plane};
pub use palette::{ColorProvider, GOLDEN_ANGLE, Palette, PaletteParams};
