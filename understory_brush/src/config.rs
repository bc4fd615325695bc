// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_palette::PaletteParams;

/// Settings fixed when a [`Session`](crate::Session) starts.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// Initial brush radius in grid units.
    pub default_radius: i64,
    /// Axis holding time, for time-lapse grids. `None` paints spheres over every axis.
    pub time_axis: Option<usize>,
    /// HSV saturation of label colors.
    pub palette_saturation: f32,
    /// HSV value of label colors.
    pub palette_value: f32,
    /// Alpha of the label overlay.
    pub overlay_alpha: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let palette = PaletteParams::default();
        Self {
            default_radius: 5,
            time_axis: None,
            palette_saturation: palette.saturation,
            palette_value: palette.value,
            overlay_alpha: palette.alpha,
        }
    }
}

impl SessionConfig {
    /// Start with a different brush radius.
    pub fn with_default_radius(mut self, radius: i64) -> Self {
        self.default_radius = radius;
        self
    }

    /// Treat `axis` as time.
    pub fn with_time_axis(mut self, axis: usize) -> Self {
        self.time_axis = Some(axis);
        self
    }

    /// Label color saturation and value.
    pub fn with_palette(mut self, saturation: f32, value: f32) -> Self {
        self.palette_saturation = saturation;
        self.palette_value = value;
        self
    }

    /// Label overlay alpha.
    pub fn with_overlay_alpha(mut self, alpha: u8) -> Self {
        self.overlay_alpha = alpha;
        self
    }

    /// Palette parameters derived from these settings.
    pub fn palette_params(&self) -> PaletteParams {
        PaletteParams {
            saturation: self.palette_saturation,
            value: self.palette_value,
            alpha: self.overlay_alpha,
            ..PaletteParams::default()
        }
    }
}
