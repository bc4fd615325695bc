// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_brush --heading-base-level=0

//! Understory Brush: interactive painting of multi-label masks.
//!
//! This crate turns pointer gestures from a viewer into writes on the boolean regions of a
//! [`Labeling`](understory_labeling::Labeling), while a renderer on another thread keeps drawing
//! the labels as a colored overlay.
//!
//! - [`BrushController`]: the gesture state machine. Drags paint (or erase) hypersphere dabs
//!   along the pointer path with no gaps; vertical scrolls change the radius or cycle the
//!   active label.
//! - [`ViewTransform`]: how display positions map into the grid. [`PlaneView`] wraps a 2D
//!   `kurbo::Affine` camera over an axis-aligned slice, [`SliceView`] an oblique slice.
//! - [`BrushCursor`]: display-space snapshot of the brush outline for overlay drawing.
//! - [`RepaintSignal`]: repaint requests ([`RepaintRequest`]) fanned out to the host, carrying
//!   the grid bounds that changed.
//! - [`Session`]: the host-facing facade. It owns the current labeling, wires the brush and
//!   the color provider to its replacements, and forwards events.
//!
//! Each dab is written under the labeling's write lock and nothing else is, so a renderer
//! holding a read guard never observes half a dab.
//!
//! ## Features
//!
//! - `serde`: derive `Serialize`/`Deserialize` for [`SessionConfig`] and the color types.
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_brush::{PlaneView, ScrollAction, Session, SessionConfig, StrokeMode};
//! use understory_labeling::Interval;
//!
//! let grid = Interval::from_dimensions(&[100, 100]).unwrap();
//! let mut session = Session::new(
//!     ["background", "cell"],
//!     grid,
//!     SessionConfig::default().with_default_radius(0),
//!     Box::new(PlaneView::default()),
//! )
//! .unwrap();
//!
//! // Scrolling away selects the next label.
//! let _ = session.on_scroll(ScrollAction::Label, -1.0, false);
//! assert_eq!(session.current_label_index(), 1);
//!
//! // A fast drag is interpolated at unit steps.
//! let _ = session.on_drag_start(StrokeMode::Paint, Point::new(0.0, 0.0)).unwrap();
//! let _ = session.on_drag(Point::new(5.0, 0.0)).unwrap();
//! session.on_drag_end(Point::new(5.0, 0.0));
//!
//! let cells = session.current_labeling().snapshot_region(1).unwrap();
//! assert_eq!(cells.count_ones(), 6);
//! ```

mod config;
mod controller;
mod cursor;
mod error;
mod repaint;
mod session;
mod view;

pub use config::SessionConfig;
pub use controller::{BrushController, ScrollAction, StrokeMode};
pub use cursor::BrushCursor;
pub use error::{BrushError, SessionError};
pub use repaint::{RepaintFlags, RepaintRequest, RepaintSignal};
pub use session::Session;
pub use view::{PlaneView, SliceView, ViewTransform};
