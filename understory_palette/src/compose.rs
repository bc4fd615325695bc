// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render one plane of a labeling into colored pixels.

use understory_labeling::{Coord, Labeling};

use crate::color::Rgba8;
use crate::palette::Palette;

/// Rejected plane selection.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// A plane axis is not an axis of the labeling.
    #[error("axis {axis} is out of range for a {dims}-dimensional labeling")]
    AxisOutOfRange {
        /// Offending axis.
        axis: usize,
        /// Labeling dimensionality.
        dims: usize,
    },
    /// Both plane axes are the same.
    #[error("plane axes must differ, both are {0}")]
    DegenerateAxes(usize),
    /// The position must name a coordinate on every axis.
    #[error("plane position has {found} axes, labeling has {expected}")]
    PositionMismatch {
        /// Labeling dimensionality.
        expected: usize,
        /// Length of the supplied position.
        found: usize,
    },
}

/// A 2D slice through a labeling.
///
/// The slice spans the whole extent along `x_axis` and `y_axis`; every other
/// axis is held at its entry in `position`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    /// Axis mapped to pixel columns.
    pub x_axis: usize,
    /// Axis mapped to pixel rows.
    pub y_axis: usize,
    /// Coordinate of the slice on the remaining axes.
    pub position: Coord,
}

impl Plane {
    /// The first two axes at the origin of the remaining ones.
    pub fn xy(dims: usize) -> Self {
        Self {
            x_axis: 0,
            y_axis: 1,
            position: core::iter::repeat_n(0, dims).collect(),
        }
    }

    /// Same plane, moved to `value` along `axis`.
    pub fn at(mut self, axis: usize, value: i64) -> Self {
        if let Some(slot) = self.position.get_mut(axis) {
            *slot = value;
        }
        self
    }
}

/// Row-major pixels of one composed plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposedPlane {
    /// Pixels per row.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// `width * height` colors, first row first.
    pub pixels: Vec<Rgba8>,
}

impl ComposedPlane {
    /// Color at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba8> {
        if x >= self.width {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// Color every cell of `plane` by the highest-index label that contains it.
///
/// Cells outside every region are transparent. Labels without a palette entry
/// are skipped.
pub fn compose_plane(
    labeling: &Labeling,
    palette: &Palette,
    plane: &Plane,
) -> Result<ComposedPlane, ComposeError> {
    let dims = labeling.num_dimensions();
    for axis in [plane.x_axis, plane.y_axis] {
        if axis >= dims {
            return Err(ComposeError::AxisOutOfRange { axis, dims });
        }
    }
    if plane.x_axis == plane.y_axis {
        return Err(ComposeError::DegenerateAxes(plane.x_axis));
    }
    if plane.position.len() != dims {
        return Err(ComposeError::PositionMismatch {
            expected: dims,
            found: plane.position.len(),
        });
    }

    let interval = labeling.interval();
    let xs = interval.min(plane.x_axis)..=interval.max(plane.x_axis);
    let ys = interval.min(plane.y_axis)..=interval.max(plane.y_axis);
    let width = usize::try_from(interval.dimension(plane.x_axis)).unwrap_or(usize::MAX);
    let height = usize::try_from(interval.dimension(plane.y_axis)).unwrap_or(usize::MAX);

    let mut pixels = Vec::with_capacity(width.saturating_mul(height));
    let mut coord = plane.position.clone();
    for y in ys {
        coord[plane.y_axis] = y;
        for x in xs.clone() {
            coord[plane.x_axis] = x;
            let color = labeling
                .regions()
                .iter()
                .enumerate()
                .rev()
                .find(|(_, region)| region.get(&coord))
                .and_then(|(index, _)| palette.color_of(index))
                .unwrap_or(Rgba8::TRANSPARENT);
            pixels.push(color);
        }
    }
    Ok(ComposedPlane {
        width,
        height,
        pixels,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PaletteParams;
    use understory_labeling::Interval;

    #[test]
    fn highest_label_wins() {
        let grid = Interval::from_dimensions(&[3, 2]).unwrap();
        let mut labeling = Labeling::new(["a", "b"], grid).unwrap();
        labeling.regions_mut()[0].set(&[0, 0], true);
        labeling.regions_mut()[0].set(&[1, 1], true);
        labeling.regions_mut()[1].set(&[1, 1], true);
        let palette = Palette::generate(2, PaletteParams::default());

        let out = compose_plane(&labeling, &palette, &Plane::xy(2)).unwrap();
        assert_eq!((out.width, out.height), (3, 2));
        assert_eq!(out.pixel(0, 0), palette.color_of(0));
        assert_eq!(out.pixel(1, 1), palette.color_of(1));
        assert_eq!(out.pixel(2, 1), Some(Rgba8::TRANSPARENT));
        assert_eq!(out.pixel(3, 0), None);
    }

    #[test]
    fn slices_other_axes() {
        let grid = Interval::from_dimensions(&[2, 2, 4]).unwrap();
        let mut labeling = Labeling::new(["a"], grid).unwrap();
        labeling.regions_mut()[0].set(&[1, 0, 3], true);
        let palette = Palette::generate(1, PaletteParams::default());

        let front = compose_plane(&labeling, &palette, &Plane::xy(3)).unwrap();
        assert!(front.pixels.iter().all(|c| c.is_transparent()));

        let back = compose_plane(&labeling, &palette, &Plane::xy(3).at(2, 3)).unwrap();
        assert_eq!(back.pixel(1, 0), palette.color_of(0));
    }

    #[test]
    fn rejects_bad_planes() {
        let grid = Interval::from_dimensions(&[2, 2]).unwrap();
        let labeling = Labeling::new(["a"], grid).unwrap();
        let palette = Palette::generate(1, PaletteParams::default());

        let mut plane = Plane::xy(2);
        plane.y_axis = 2;
        assert_eq!(
            compose_plane(&labeling, &palette, &plane),
            Err(ComposeError::AxisOutOfRange { axis: 2, dims: 2 })
        );
        plane.y_axis = 0;
        assert_eq!(
            compose_plane(&labeling, &palette, &plane),
            Err(ComposeError::DegenerateAxes(0))
        );
        assert_eq!(
            compose_plane(&labeling, &palette, &Plane::xy(3)),
            Err(ComposeError::PositionMismatch {
                expected: 2,
                found: 3
            })
        );
    }
}
