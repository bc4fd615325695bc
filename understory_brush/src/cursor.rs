// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Circle, Point, Rect, Shape};
use understory_palette::Rgba8;

/// Snapshot of the brush cursor overlay, in display space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BrushCursor {
    /// Last pointer position.
    pub center: Point,
    /// Brush radius in display pixels.
    pub radius: f64,
    /// Color of the active label, `None` when the labeling has no labels.
    pub color: Option<Rgba8>,
    /// Whether the overlay should be drawn.
    pub visible: bool,
}

impl BrushCursor {
    /// The outline to draw.
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Display area covered by the outline.
    pub fn bounding_box(&self) -> Rect {
        self.circle().bounding_box()
    }
}
