// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Brush state machine and paint path.
//!
//! [`BrushController`] turns pointer gestures into writes on the active
//! label's region:
//!
//! - **Idle / hover**: [`on_pointer_move`](BrushController::on_pointer_move)
//!   and [`set_cursor_visible`](BrushController::set_cursor_visible) only move
//!   or show the cursor.
//! - **Stroke**: [`on_drag_start`](BrushController::on_drag_start) paints one
//!   dab and records the anchor. Every [`on_drag`](BrushController::on_drag)
//!   paints dabs at unit steps from the anchor to the new point, so fast
//!   pointer motion leaves no gaps. [`on_drag_end`](BrushController::on_drag_end)
//!   returns to idle.
//! - **Scroll**: [`on_scroll`](BrushController::on_scroll) grows or shrinks the
//!   radius, or cycles the active label.
//!
//! Each dab holds the labeling's write lock for exactly one footprint. A
//! concurrent renderer therefore sees either none or all of a dab.

use core::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::Point;
use understory_labeling::holder::{Holder, NotifyReport};
use understory_labeling::{Interval, SharedLabeling};
use understory_neighborhood::{Neighborhood, NeighborhoodError};
use understory_palette::Rgba8;

use crate::cursor::BrushCursor;
use crate::error::BrushError;
use crate::repaint::{RepaintFlags, RepaintRequest, RepaintSignal};
use crate::view::ViewTransform;

/// What a stroke writes into the active region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StrokeMode {
    /// Set covered cells.
    Paint,
    /// Clear covered cells.
    Erase,
}

impl StrokeMode {
    /// The bit value written by this mode.
    #[inline]
    pub const fn value(self) -> bool {
        matches!(self, Self::Paint)
    }
}

/// What a vertical scroll adjusts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScrollAction {
    /// Scrolling away grows the brush, towards shrinks it.
    Radius,
    /// Scrolling away selects the next label, towards the previous one.
    Label,
}

#[derive(Copy, Clone, Debug)]
struct Stroke {
    mode: StrokeMode,
    anchor: Point,
}

/// The labeling generation the brush paints into.
///
/// Shared with the holder subscription so a replacement is seen before the
/// next dab.
#[derive(Debug)]
struct Binding {
    labeling: SharedLabeling,
    label_count: usize,
    label: usize,
}

impl Binding {
    fn new(labeling: SharedLabeling, label: usize) -> Self {
        let label_count = labeling.label_count();
        Self {
            labeling,
            label_count,
            label: label.min(label_count.saturating_sub(1)),
        }
    }
}

/// Paints into the active region of the held labeling.
pub struct BrushController {
    binding: Arc<Mutex<Binding>>,
    neighborhood: Neighborhood,
    view: Box<dyn ViewTransform>,
    radius: i64,
    timepoint: i64,
    stroke: Option<Stroke>,
    pointer: Point,
    cursor_visible: bool,
    repaint: RepaintSignal,
}

impl Debug for BrushController {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BrushController")
            .field("neighborhood", &self.neighborhood)
            .field("radius", &self.radius)
            .field("label", &self.label())
            .field("timepoint", &self.timepoint)
            .field("stroke", &self.stroke)
            .finish_non_exhaustive()
    }
}

impl BrushController {
    /// Attach a brush to the labeling held by `labels`.
    ///
    /// The controller subscribes to `labels` and follows every replacement,
    /// clamping the active label into the new label range.
    pub fn new(
        labels: &mut Holder<SharedLabeling>,
        neighborhood: Neighborhood,
        view: Box<dyn ViewTransform>,
        radius: i64,
        repaint: RepaintSignal,
    ) -> Result<Self, BrushError> {
        if radius < 0 {
            return Err(BrushError::NegativeRadius(radius));
        }
        let binding = Arc::new(Mutex::new(Binding::new(labels.get().clone(), 0)));
        let follow = Arc::clone(&binding);
        labels.subscribe(move |next: &SharedLabeling| {
            let mut binding = follow.lock().unwrap_or_else(PoisonError::into_inner);
            let label = binding.label;
            *binding = Binding::new(next.clone(), label);
            tracing::debug!(
                labels = binding.label_count,
                label = binding.label,
                "brush rebound to new labeling"
            );
            Ok(())
        });
        Ok(Self {
            binding,
            neighborhood,
            view,
            radius,
            timepoint: 0,
            stroke: None,
            pointer: Point::ZERO,
            cursor_visible: false,
            repaint,
        })
    }

    /// Brush radius in grid units.
    #[inline]
    pub fn radius(&self) -> i64 {
        self.radius
    }

    /// Index of the label being painted.
    pub fn label(&self) -> usize {
        self.binding().label
    }

    /// Labels in the bound labeling.
    pub fn label_count(&self) -> usize {
        self.binding().label_count
    }

    /// Timepoint dabs are pinned to.
    #[inline]
    pub fn timepoint(&self) -> i64 {
        self.timepoint
    }

    /// Mode of the stroke in progress.
    #[inline]
    pub fn stroke_mode(&self) -> Option<StrokeMode> {
        self.stroke.map(|s| s.mode)
    }

    /// The footprint policy.
    #[inline]
    pub fn neighborhood(&self) -> &Neighborhood {
        &self.neighborhood
    }

    /// Replace the camera, e.g. after a zoom or slice change.
    pub fn set_view(&mut self, view: Box<dyn ViewTransform>) {
        self.view = view;
    }

    /// Cursor overlay snapshot drawn in `color`.
    #[allow(
        clippy::cast_precision_loss,
        reason = "Brush radii are far below f64 integer precision."
    )]
    pub fn cursor(&self, color: Option<Rgba8>) -> BrushCursor {
        BrushCursor {
            center: self.pointer,
            radius: self.radius as f64 * self.view.display_scale(),
            color,
            visible: self.cursor_visible,
        }
    }

    /// Move the cursor.
    pub fn on_pointer_move(&mut self, position: Point) -> NotifyReport {
        self.pointer = position;
        if self.cursor_visible {
            self.repaint.request(RepaintRequest::full(RepaintFlags::OVERLAY))
        } else {
            NotifyReport::default()
        }
    }

    /// Show or hide the cursor.
    pub fn set_cursor_visible(&mut self, visible: bool) -> NotifyReport {
        if self.cursor_visible == visible {
            return NotifyReport::default();
        }
        self.cursor_visible = visible;
        self.repaint.request(RepaintRequest::full(RepaintFlags::OVERLAY))
    }

    /// Begin a stroke at `position` and paint its first dab.
    pub fn on_drag_start(
        &mut self,
        mode: StrokeMode,
        position: Point,
    ) -> Result<NotifyReport, BrushError> {
        let dirty = self.dab(self.view.display_to_grid(position), mode)?;
        self.pointer = position;
        self.stroke = Some(Stroke {
            mode,
            anchor: position,
        });
        Ok(self.request_labels(dirty))
    }

    /// Continue the stroke to `position`.
    ///
    /// Ignored when no stroke is in progress.
    pub fn on_drag(&mut self, position: Point) -> Result<NotifyReport, BrushError> {
        let Some(stroke) = self.stroke else {
            return Ok(NotifyReport::default());
        };
        let from = self.view.display_to_grid(stroke.anchor);
        let to = self.view.display_to_grid(position);
        let dirty = self.paint_segment(from, to, stroke.mode)?;
        self.pointer = position;
        self.stroke = Some(Stroke {
            anchor: position,
            ..stroke
        });
        Ok(self.request_labels(dirty))
    }

    /// Finish the stroke. Every dab is already written.
    pub fn on_drag_end(&mut self, position: Point) {
        self.pointer = position;
        self.stroke = None;
    }

    /// Apply one vertical scroll step; negative `amount` scrolls away.
    ///
    /// Horizontal scrolls and zero amounts are ignored.
    pub fn on_scroll(
        &mut self,
        action: ScrollAction,
        amount: f64,
        is_horizontal: bool,
    ) -> NotifyReport {
        let away = amount < 0.0;
        if is_horizontal || !(away || amount > 0.0) {
            return NotifyReport::default();
        }
        match action {
            ScrollAction::Radius => {
                self.radius = if away {
                    self.radius.saturating_add(1)
                } else {
                    (self.radius - 1).max(0)
                };
            }
            ScrollAction::Label => {
                let mut binding = self.binding();
                binding.label = if away {
                    (binding.label + 1).min(binding.label_count.saturating_sub(1))
                } else {
                    binding.label.saturating_sub(1)
                };
            }
        }
        self.repaint.request(RepaintRequest::full(RepaintFlags::OVERLAY))
    }

    /// Set the radius directly.
    pub fn set_radius(&mut self, radius: i64) -> Result<NotifyReport, BrushError> {
        if radius < 0 {
            return Err(BrushError::NegativeRadius(radius));
        }
        self.radius = radius;
        Ok(self.repaint.request(RepaintRequest::full(RepaintFlags::OVERLAY)))
    }

    /// Select the label to paint.
    pub fn set_label(&mut self, index: usize) -> Result<NotifyReport, BrushError> {
        {
            let mut binding = self.binding();
            if index >= binding.label_count {
                return Err(BrushError::UnknownLabel {
                    index,
                    count: binding.label_count,
                });
            }
            binding.label = index;
        }
        Ok(self.repaint.request(RepaintRequest::full(RepaintFlags::OVERLAY)))
    }

    /// Pin later dabs to timepoint `t`.
    pub fn set_timepoint(&mut self, t: i64) {
        self.timepoint = t;
    }

    fn binding(&self) -> MutexGuard<'_, Binding> {
        self.binding.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_labels(&self, dirty: Option<Interval>) -> NotifyReport {
        match dirty {
            Some(bounds) => self.repaint.request(RepaintRequest::labels(bounds)),
            None => NotifyReport::default(),
        }
    }

    /// Dabs at unit steps from `from` towards `to`, then at `to`.
    ///
    /// Returns the union of the clipped dab bounds.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The step count is a finite, non-negative segment length."
    )]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Step indices stay far below f64 integer precision."
    )]
    fn paint_segment(
        &self,
        from: [f64; 3],
        to: [f64; 3],
        mode: StrokeMode,
    ) -> Result<Option<Interval>, BrushError> {
        let delta: [f64; 3] = core::array::from_fn(|i| to[i] - from[i]);
        let length = delta.iter().map(|d| d * d).sum::<f64>().sqrt();
        if !length.is_finite() {
            return Err(NeighborhoodError::NonFiniteCenter(to.to_vec()).into());
        }

        let mut dirty = None;
        if length > 0.0 {
            let unit = delta.map(|d| d / length);
            for step in 1..length.ceil() as u64 {
                let s = step as f64;
                let center = core::array::from_fn(|i| from[i] + unit[i] * s);
                dirty = grow(dirty, self.dab(center, mode)?);
            }
        }
        Ok(grow(dirty, self.dab(to, mode)?))
    }

    /// Write one footprint into the active region under the write lock.
    ///
    /// Returns the footprint bounds clipped to the grid, or `None` when
    /// nothing inside the grid was covered.
    fn dab(&self, center: [f64; 3], mode: StrokeMode) -> Result<Option<Interval>, BrushError> {
        let (labeling, label) = {
            let binding = self.binding();
            if binding.label_count == 0 {
                tracing::warn!("labeling has no labels, nothing to paint");
                return Ok(None);
            }
            (binding.labeling.clone(), binding.label)
        };

        let footprint = self
            .neighborhood
            .pixels_at(&center, self.timepoint, self.radius)?;
        let Some(dirty) = footprint.bounds().intersect(labeling.interval()) else {
            return Ok(None);
        };

        let value = mode.value();
        let mut changed = 0_usize;
        {
            let mut guard = labeling.write();
            if let Some(region) = guard.region_mut(label) {
                for coord in footprint {
                    changed += usize::from(region.set(&coord, value));
                }
            }
        }
        tracing::trace!(label, radius = self.radius, changed, bounds = %dirty, "dab");
        Ok(Some(dirty))
    }
}

fn grow(acc: Option<Interval>, next: Option<Interval>) -> Option<Interval> {
    match (acc, next) {
        (Some(a), Some(b)) => Some(a.union(&b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PlaneView;
    use understory_labeling::{Labeling, Region};

    struct Rig {
        labels: Holder<SharedLabeling>,
        brush: BrushController,
        repaints: Arc<Mutex<Vec<RepaintRequest>>>,
    }

    impl Rig {
        fn new(names: &[&str], dims: &[u64], radius: i64) -> Self {
            let grid = Interval::from_dimensions(dims).unwrap();
            let labeling = Labeling::new(names.iter().copied(), grid.clone()).unwrap();
            let mut labels = Holder::new(SharedLabeling::new(labeling));
            let repaint = RepaintSignal::new();
            let repaints = Arc::new(Mutex::new(Vec::new()));
            let sink = repaints.clone();
            repaint.subscribe(move |r: &RepaintRequest| {
                sink.lock().unwrap().push(r.clone());
                Ok(())
            });
            let brush = BrushController::new(
                &mut labels,
                Neighborhood::for_interval(&grid, None).unwrap(),
                Box::new(PlaneView::default()),
                radius,
                repaint,
            )
            .unwrap();
            Self {
                labels,
                brush,
                repaints,
            }
        }

        fn region(&self, index: usize) -> Region {
            self.labels.get().snapshot_region(index).unwrap()
        }

        fn stroke(&mut self, mode: StrokeMode, points: &[(f64, f64)]) {
            let (first, rest) = points.split_first().unwrap();
            assert!(self.brush.on_drag_start(mode, (*first).into()).unwrap().is_ok());
            for p in rest {
                assert!(self.brush.on_drag((*p).into()).unwrap().is_ok());
            }
            self.brush.on_drag_end((*points.last().unwrap()).into());
        }
    }

    fn ones(region: &Region) -> Vec<Vec<i64>> {
        region.iter_ones().map(|c| c.to_vec()).collect()
    }

    #[test]
    fn zero_radius_paints_one_pixel() {
        let mut rig = Rig::new(&["fg"], &[100, 100], 0);
        rig.stroke(StrokeMode::Paint, &[(10.0, 10.0), (10.0, 10.0)]);
        assert_eq!(ones(&rig.region(0)), [vec![10, 10]]);
    }

    #[test]
    fn fast_drag_leaves_no_gaps() {
        let mut rig = Rig::new(&["fg"], &[100, 100], 0);
        rig.stroke(StrokeMode::Paint, &[(0.0, 0.0), (5.0, 0.0)]);
        let expected: Vec<Vec<i64>> = (0..=5).map(|x| vec![x, 0]).collect();
        assert_eq!(ones(&rig.region(0)), expected);
    }

    #[test]
    fn scrolling_away_grows_the_brush() {
        let mut rig = Rig::new(&["fg"], &[100, 100], 5);
        for _ in 0..3 {
            assert!(rig.brush.on_scroll(ScrollAction::Radius, -1.0, false).is_ok());
        }
        assert_eq!(rig.brush.radius(), 8);
        rig.stroke(StrokeMode::Paint, &[(50.0, 50.0)]);
        assert_eq!(rig.region(0).count_ones(), 197);
    }

    #[test]
    fn scroll_limits() {
        let mut rig = Rig::new(&["a", "b", "c"], &[8, 8], 1);
        let _ = rig.brush.on_scroll(ScrollAction::Radius, 1.0, false);
        let _ = rig.brush.on_scroll(ScrollAction::Radius, 1.0, false);
        assert_eq!(rig.brush.radius(), 0);
        let _ = rig.brush.on_scroll(ScrollAction::Radius, -3.0, true);
        assert_eq!(rig.brush.radius(), 0);

        for _ in 0..5 {
            let _ = rig.brush.on_scroll(ScrollAction::Label, -1.0, false);
        }
        assert_eq!(rig.brush.label(), 2);
        let _ = rig.brush.on_scroll(ScrollAction::Label, 0.0, false);
        assert_eq!(rig.brush.label(), 2);
        for _ in 0..5 {
            let _ = rig.brush.on_scroll(ScrollAction::Label, 1.0, false);
        }
        assert_eq!(rig.brush.label(), 0);
    }

    #[test]
    fn erase_undoes_paint() {
        let mut rig = Rig::new(&["fg"], &[40, 40], 3);
        rig.labels.get().write().regions_mut()[0].set(&[1, 1], true);
        let before = rig.region(0);

        rig.stroke(StrokeMode::Paint, &[(20.0, 20.0)]);
        rig.stroke(StrokeMode::Paint, &[(20.0, 20.0)]);
        assert_eq!(rig.region(0).count_ones(), 1 + 29);
        rig.stroke(StrokeMode::Erase, &[(20.0, 20.0)]);
        assert_eq!(rig.region(0), before);
        rig.stroke(StrokeMode::Erase, &[(20.0, 20.0)]);
        assert_eq!(rig.region(0), before);
    }

    #[test]
    fn edge_dabs_are_clipped() {
        let mut rig = Rig::new(&["fg"], &[10, 10], 3);
        rig.stroke(StrokeMode::Paint, &[(0.0, 0.0)]);
        assert_eq!(rig.region(0).count_ones(), 11);

        let last = rig.repaints.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last.flags, RepaintFlags::LABELS);
        assert_eq!(last.bounds, Some(Interval::new(&[0, 0], &[3, 3]).unwrap()));

        let before = rig.repaints.lock().unwrap().len();
        rig.stroke(StrokeMode::Paint, &[(-50.0, -50.0)]);
        assert_eq!(rig.region(0).count_ones(), 11);
        assert_eq!(rig.repaints.lock().unwrap().len(), before);
    }

    #[test]
    fn drag_repaint_covers_the_whole_segment() {
        let mut rig = Rig::new(&["fg"], &[100, 100], 1);
        let start = rig.brush.on_drag_start(StrokeMode::Paint, Point::new(10.0, 10.0));
        assert!(start.unwrap().is_ok());
        rig.repaints.lock().unwrap().clear();
        assert!(rig.brush.on_drag(Point::new(20.0, 10.0)).unwrap().is_ok());
        let repaints = rig.repaints.lock().unwrap();
        assert_eq!(repaints.len(), 1);
        assert_eq!(
            repaints[0].bounds,
            Some(Interval::new(&[10, 9], &[21, 11]).unwrap())
        );
    }

    #[test]
    fn drag_without_stroke_is_ignored() {
        let mut rig = Rig::new(&["fg"], &[10, 10], 1);
        assert!(rig.brush.on_drag(Point::new(5.0, 5.0)).unwrap().is_ok());
        assert!(rig.region(0).is_clear());
        assert_eq!(rig.brush.stroke_mode(), None);
    }

    #[test]
    fn paints_only_the_active_label() {
        let mut rig = Rig::new(&["a", "b"], &[10, 10], 0);
        assert!(rig.brush.set_label(1).unwrap().is_ok());
        rig.stroke(StrokeMode::Paint, &[(3.0, 4.0)]);
        assert!(rig.region(0).is_clear());
        assert!(rig.region(1).get(&[3, 4]));
    }

    #[test]
    fn invalid_settings_leave_state_unchanged() {
        let mut rig = Rig::new(&["a", "b"], &[10, 10], 2);
        assert_eq!(
            rig.brush.set_radius(-1).unwrap_err(),
            BrushError::NegativeRadius(-1)
        );
        assert_eq!(rig.brush.radius(), 2);
        assert_eq!(
            rig.brush.set_label(2).unwrap_err(),
            BrushError::UnknownLabel { index: 2, count: 2 }
        );
        assert_eq!(rig.brush.label(), 0);
        assert!(matches!(
            rig.brush.on_drag_start(StrokeMode::Paint, Point::new(f64::NAN, 0.0)),
            Err(BrushError::Neighborhood(NeighborhoodError::NonFiniteCenter(_)))
        ));
        assert_eq!(rig.brush.stroke_mode(), None);
    }

    #[test]
    fn replacement_clamps_label_and_rebinds() {
        let mut rig = Rig::new(&["a", "b", "c"], &[10, 10], 0);
        assert!(rig.brush.set_label(2).unwrap().is_ok());

        let grid = Interval::from_dimensions(&[10, 10]).unwrap();
        let next = SharedLabeling::new(Labeling::new(["only"], grid).unwrap());
        assert!(rig.labels.set(next.clone()).is_ok());
        assert_eq!(rig.brush.label(), 0);
        assert_eq!(rig.brush.label_count(), 1);

        rig.stroke(StrokeMode::Paint, &[(2.0, 2.0)]);
        assert!(next.snapshot_region(0).unwrap().get(&[2, 2]));
    }

    #[test]
    fn empty_labeling_paints_nothing() {
        let mut rig = Rig::new(&[], &[10, 10], 2);
        assert_eq!(rig.brush.label(), 0);
        rig.stroke(StrokeMode::Paint, &[(5.0, 5.0), (8.0, 5.0)]);
        assert!(rig.repaints.lock().unwrap().is_empty());
        let _ = rig.brush.on_scroll(ScrollAction::Label, -1.0, false);
        assert_eq!(rig.brush.label(), 0);
    }

    #[test]
    fn time_series_dabs_stay_in_their_frame() {
        let grid = Interval::from_dimensions(&[10, 10, 4]).unwrap();
        let labeling = Labeling::new(["cell"], grid.clone()).unwrap();
        let mut labels = Holder::new(SharedLabeling::new(labeling));
        let mut brush = BrushController::new(
            &mut labels,
            Neighborhood::for_interval(&grid, Some(2)).unwrap(),
            Box::new(PlaneView::default().at_slice(1.0)),
            1,
            RepaintSignal::new(),
        )
        .unwrap();
        brush.set_timepoint(2);
        assert_eq!(brush.timepoint(), 2);
        let start = brush.on_drag_start(StrokeMode::Paint, Point::new(4.0, 4.0));
        assert!(start.unwrap().is_ok());

        let region = labels.get().snapshot_region(0).unwrap();
        assert_eq!(region.count_ones(), 5);
        assert!(region.iter_ones().all(|c| c[2] == 2));
    }

    #[test]
    fn cursor_follows_pointer_and_view_scale() {
        let grid = Interval::from_dimensions(&[10, 10]).unwrap();
        let mut labels = Holder::new(SharedLabeling::new(Labeling::new(["a"], grid).unwrap()));
        let mut brush = BrushController::new(
            &mut labels,
            Neighborhood::spatial(2),
            Box::new(PlaneView::zoomed(2.0, kurbo::Vec2::ZERO)),
            3,
            RepaintSignal::new(),
        )
        .unwrap();
        assert!(brush.on_pointer_move(Point::new(7.0, 9.0)).is_ok());
        assert!(brush.set_cursor_visible(true).is_ok());
        let cursor = brush.cursor(None);
        assert_eq!(cursor.center, Point::new(7.0, 9.0));
        assert_eq!(cursor.radius, 6.0);
        assert!(cursor.visible);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn sampling_rate_does_not_change_the_stroke(
                radius in 0_i64..4,
                y in 0_i64..30,
                x0 in 0_i64..10,
                len in 1_i64..20,
                cuts in proptest::collection::btree_set(1_i64..20, 0..6),
            ) {
                let x1 = x0 + len;
                #[allow(clippy::cast_precision_loss, reason = "Small test coordinates.")]
                let point = |x: i64| (x as f64, y as f64);

                let mut coarse = Rig::new(&["fg"], &[32, 32], radius);
                coarse.stroke(StrokeMode::Paint, &[point(x0), point(x1)]);

                let mut path = vec![point(x0)];
                path.extend(cuts.iter().filter(|&&c| c < len).map(|&c| point(x0 + c)));
                path.push(point(x1));
                let mut fine = Rig::new(&["fg"], &[32, 32], radius);
                fine.stroke(StrokeMode::Paint, &path);

                prop_assert_eq!(coarse.region(0), fine.region(0));
            }
        }
    }
}
