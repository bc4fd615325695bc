// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-label color assignment.

use std::sync::Arc;

use understory_labeling::Labeling;
use understory_labeling::holder::{Holder, NotifyReport, ObserverError, SubscriberId};

use crate::color::Rgba8;

/// Hue step between consecutive labels, in degrees.
///
/// The golden angle keeps neighbouring indices far apart on the color wheel
/// and never revisits a hue exactly.
pub const GOLDEN_ANGLE: f32 = 137.507_76;

/// Parameters of the procedural palette.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PaletteParams {
    /// Hue of label 0, in degrees.
    pub hue_offset: f32,
    /// HSV saturation, `0..=1`.
    pub saturation: f32,
    /// HSV value, `0..=1`.
    pub value: f32,
    /// Alpha applied to every label color.
    pub alpha: u8,
}

impl Default for PaletteParams {
    fn default() -> Self {
        Self {
            hue_offset: 0.0,
            saturation: 0.7,
            value: 0.9,
            alpha: 255,
        }
    }
}

impl PaletteParams {
    /// Same parameters with a different overlay alpha.
    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    /// Color assigned to label `index`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Label counts are far below f32 integer precision."
    )]
    pub fn color_of(&self, index: usize) -> Rgba8 {
        let hue = self.hue_offset + index as f32 * GOLDEN_ANGLE;
        Rgba8::from_hsv(hue, self.saturation, self.value, self.alpha)
    }
}

/// Colors of one label-set generation, indexed by label.
///
/// Cloning is cheap; the colors are shared.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    colors: Arc<[Rgba8]>,
    params: PaletteParams,
}

impl Palette {
    /// Generate colors for `count` labels.
    pub fn generate(count: usize, params: PaletteParams) -> Self {
        Self {
            colors: (0..count).map(|i| params.color_of(i)).collect(),
            params,
        }
    }

    /// Color of label `index`.
    #[inline]
    pub fn color_of(&self, index: usize) -> Option<Rgba8> {
        self.colors.get(index).copied()
    }

    /// Number of colors.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether there are no colors.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// All colors in label order.
    #[inline]
    pub fn colors(&self) -> &[Rgba8] {
        &self.colors
    }

    /// Parameters the colors were generated from.
    #[inline]
    pub fn params(&self) -> &PaletteParams {
        &self.params
    }
}

/// Maps label indices to colors and republishes them when the label set changes.
#[derive(Debug)]
pub struct ColorProvider {
    palette: Holder<Palette>,
}

impl ColorProvider {
    /// Colors for `labeling`.
    pub fn new(labeling: &Labeling, params: PaletteParams) -> Self {
        Self {
            palette: Holder::new(Palette::generate(labeling.len(), params)),
        }
    }

    /// Color of label `index` in the current generation.
    #[inline]
    pub fn color_of(&self, index: usize) -> Option<Rgba8> {
        self.palette.get().color_of(index)
    }

    /// The current palette.
    #[inline]
    pub fn palette(&self) -> &Palette {
        self.palette.get()
    }

    /// Recompute colors for a replacement labeling and notify subscribers.
    pub fn refresh(&mut self, labeling: &Labeling) -> NotifyReport {
        let params = *self.palette.get().params();
        self.palette.set(Palette::generate(labeling.len(), params))
    }

    /// Rotate every hue to `hue_offset` degrees and notify subscribers.
    ///
    /// Colors stay distinct and index-stable; only their look changes.
    pub fn regenerate(&mut self, hue_offset: f32) -> NotifyReport {
        let current = self.palette.get();
        let params = PaletteParams {
            hue_offset,
            ..*current.params()
        };
        let count = current.len();
        self.palette.set(Palette::generate(count, params))
    }

    /// Register a callback for every new palette.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&Palette) -> Result<(), ObserverError> + Send + 'static,
    {
        self.palette.subscribe(callback)
    }
}
