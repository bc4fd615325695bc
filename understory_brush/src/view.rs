// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping from display coordinates to grid coordinates.

use kurbo::{Affine, Point, Vec2};

/// What the viewer's camera tells the brush.
///
/// Display points are pointer positions in window pixels. Grid positions are
/// continuous coordinates along the first three spatial axes of the labeling;
/// the neighborhood generator rounds them.
pub trait ViewTransform: Send {
    /// Grid position under the display point `display`.
    fn display_to_grid(&self, display: Point) -> [f64; 3];

    /// Display pixels per grid unit, used to size the brush cursor.
    fn display_scale(&self) -> f64 {
        1.0
    }
}

/// An axis-aligned slice through the grid, seen through a 2D affine camera.
///
/// `grid_to_display` places grid axes 0 and 1 in the window; the third
/// coordinate is the fixed slice position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneView {
    /// Camera transform from grid plane to display.
    pub grid_to_display: Affine,
    /// Grid position along the axis normal to the plane.
    pub slice: f64,
}

impl Default for PlaneView {
    fn default() -> Self {
        Self {
            grid_to_display: Affine::IDENTITY,
            slice: 0.0,
        }
    }
}

impl PlaneView {
    /// A camera that shows grid units at `zoom` display pixels, offset by `pan`.
    pub fn zoomed(zoom: f64, pan: Vec2) -> Self {
        Self {
            grid_to_display: Affine::translate(pan) * Affine::scale(zoom),
            slice: 0.0,
        }
    }

    /// Same camera at another slice.
    pub fn at_slice(mut self, slice: f64) -> Self {
        self.slice = slice;
        self
    }
}

impl ViewTransform for PlaneView {
    fn display_to_grid(&self, display: Point) -> [f64; 3] {
        let p = self.grid_to_display.inverse() * display;
        [p.x, p.y, self.slice]
    }

    fn display_scale(&self) -> f64 {
        self.grid_to_display.determinant().abs().sqrt()
    }
}

/// An arbitrary slice through a 3D grid.
///
/// A display point `(x, y)` maps to `origin + x * x_step + y * y_step`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliceView {
    /// Grid position of the display origin.
    pub origin: [f64; 3],
    /// Grid displacement of one display pixel to the right.
    pub x_step: [f64; 3],
    /// Grid displacement of one display pixel down.
    pub y_step: [f64; 3],
}

impl ViewTransform for SliceView {
    fn display_to_grid(&self, display: Point) -> [f64; 3] {
        core::array::from_fn(|i| {
            self.origin[i] + display.x * self.x_step[i] + display.y * self.y_step[i]
        })
    }

    fn display_scale(&self) -> f64 {
        let step = self.x_step.iter().map(|s| s * s).sum::<f64>().sqrt();
        if step > 0.0 { step.recip() } else { 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_view_inverts_the_camera() {
        let view = PlaneView::zoomed(4.0, Vec2::new(10.0, 20.0)).at_slice(3.0);
        assert_eq!(view.display_to_grid(Point::new(18.0, 24.0)), [2.0, 1.0, 3.0]);
        assert!((view.display_scale() - 4.0).abs() < 1e-12);
        assert_eq!(PlaneView::default().display_scale(), 1.0);
    }

    #[test]
    fn slice_view_follows_its_steps() {
        let view = SliceView {
            origin: [1.0, 2.0, 3.0],
            x_step: [0.0, 0.0, 0.5],
            y_step: [0.5, 0.0, 0.0],
        };
        assert_eq!(view.display_to_grid(Point::new(4.0, 2.0)), [2.0, 2.0, 5.0]);
        assert_eq!(view.display_scale(), 2.0);
    }
}
