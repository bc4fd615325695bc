// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing facade tying labels, colors, and the brush together.

use core::fmt::Debug;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::Point;
use understory_labeling::holder::{Holder, NotifyReport, ObserverError, SubscriberId};
use understory_labeling::{Interval, Labeling, SharedLabeling};
use understory_neighborhood::Neighborhood;
use understory_palette::{
    ColorProvider, ComposeError, ComposedPlane, Palette, Plane, Rgba8, compose_plane,
};

use crate::config::SessionConfig;
use crate::controller::{BrushController, ScrollAction, StrokeMode};
use crate::cursor::BrushCursor;
use crate::error::{BrushError, SessionError};
use crate::repaint::{RepaintFlags, RepaintRequest, RepaintSignal};
use crate::view::ViewTransform;

/// One painting session over a fixed grid extent.
///
/// The session owns the current [`Labeling`] in a [`Holder`]. The brush and
/// the color provider subscribe to it first, so by the time a host
/// subscriber sees a replacement both have already adopted it.
pub struct Session {
    labels: Holder<SharedLabeling>,
    colors: Arc<Mutex<ColorProvider>>,
    brush: BrushController,
    repaint: RepaintSignal,
    config: SessionConfig,
    labels_visible: bool,
}

impl Debug for Session {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("labeling", self.labels.get())
            .field("brush", &self.brush)
            .field("config", &self.config)
            .field("labels_visible", &self.labels_visible)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session with empty regions for `names` over `extent`.
    ///
    /// `config.time_axis` selects the time-series footprint policy.
    pub fn new<I, S>(
        names: I,
        extent: Interval,
        config: SessionConfig,
        view: Box<dyn ViewTransform>,
    ) -> Result<Self, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let neighborhood = Neighborhood::for_interval(&extent, config.time_axis)?;
        let labeling = Labeling::new(names, extent)?;
        let repaint = RepaintSignal::new();
        let mut labels = Holder::new(SharedLabeling::new(labeling));

        let brush = BrushController::new(
            &mut labels,
            neighborhood,
            view,
            config.default_radius,
            repaint.clone(),
        )?;

        let mut provider = ColorProvider::new(&labels.get().read(), config.palette_params());
        let signal = repaint.clone();
        provider.subscribe(move |_: &Palette| {
            downstream(signal.request(RepaintRequest::full(RepaintFlags::PALETTE)))
        });
        let colors = Arc::new(Mutex::new(provider));
        let follow = Arc::clone(&colors);
        labels.subscribe(move |next: &SharedLabeling| {
            let report = lock(&follow).refresh(&next.read());
            downstream(report)
        });

        tracing::debug!(
            extent = %labels.get().interval(),
            labels = labels.get().label_count(),
            neighborhood = ?brush.neighborhood(),
            radius = config.default_radius,
            "session started"
        );
        Ok(Self {
            labels,
            colors,
            brush,
            repaint,
            config,
            labels_visible: true,
        })
    }

    /// Settings the session was started with.
    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Handle to the current labeling; renderers read through it.
    pub fn current_labeling(&self) -> SharedLabeling {
        self.labels.get().clone()
    }

    /// Swap in a new labeling with the same extent.
    ///
    /// Every subscriber has observed the new labeling when this returns.
    pub fn replace_labeling(&mut self, labeling: Labeling) -> Result<NotifyReport, SessionError> {
        let expected = self.labels.get().interval();
        if labeling.interval() != expected {
            return Err(SessionError::ExtentMismatch {
                expected: expected.clone(),
                found: labeling.interval().clone(),
            });
        }
        tracing::debug!(labels = labeling.len(), "replacing labeling");
        Ok(self.labels.set(SharedLabeling::new(labeling)))
    }

    /// Register a callback for labeling replacements.
    pub fn subscribe_labeling<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&SharedLabeling) -> Result<(), ObserverError> + Send + 'static,
    {
        self.labels.subscribe(callback)
    }

    /// Register a callback for palette changes.
    pub fn subscribe_palette<F>(&self, callback: F) -> SubscriberId
    where
        F: FnMut(&Palette) -> Result<(), ObserverError> + Send + 'static,
    {
        lock(&self.colors).subscribe(callback)
    }

    /// Register a callback for repaint requests.
    ///
    /// The callback must not call back into the session.
    pub fn subscribe_repaint<F>(&self, callback: F) -> SubscriberId
    where
        F: FnMut(&RepaintRequest) -> Result<(), ObserverError> + Send + 'static,
    {
        self.repaint.subscribe(callback)
    }

    /// Begin a paint or erase stroke.
    pub fn on_drag_start(
        &mut self,
        mode: StrokeMode,
        position: Point,
    ) -> Result<NotifyReport, BrushError> {
        self.brush.on_drag_start(mode, position)
    }

    /// Continue the stroke.
    pub fn on_drag(&mut self, position: Point) -> Result<NotifyReport, BrushError> {
        self.brush.on_drag(position)
    }

    /// End the stroke.
    pub fn on_drag_end(&mut self, position: Point) {
        self.brush.on_drag_end(position);
    }

    /// Adjust radius or label by one scroll step.
    pub fn on_scroll(
        &mut self,
        action: ScrollAction,
        amount: f64,
        is_horizontal: bool,
    ) -> NotifyReport {
        self.brush.on_scroll(action, amount, is_horizontal)
    }

    /// Move the brush cursor.
    pub fn on_pointer_move(&mut self, position: Point) -> NotifyReport {
        self.brush.on_pointer_move(position)
    }

    /// Show or hide the brush cursor.
    pub fn set_cursor_visible(&mut self, visible: bool) -> NotifyReport {
        self.brush.set_cursor_visible(visible)
    }

    /// Follow the viewer to another timepoint.
    pub fn set_timepoint(&mut self, t: i64) {
        self.brush.set_timepoint(t);
    }

    /// Set the brush radius.
    pub fn set_brush_radius(&mut self, radius: i64) -> Result<NotifyReport, BrushError> {
        self.brush.set_radius(radius)
    }

    /// Select the label to paint.
    pub fn set_label_index(&mut self, index: usize) -> Result<NotifyReport, BrushError> {
        self.brush.set_label(index)
    }

    /// Replace the camera.
    pub fn set_view(&mut self, view: Box<dyn ViewTransform>) {
        self.brush.set_view(view);
    }

    /// Current brush radius.
    #[inline]
    pub fn current_brush_radius(&self) -> i64 {
        self.brush.radius()
    }

    /// Index of the label being painted.
    pub fn current_label_index(&self) -> usize {
        self.brush.label()
    }

    /// Cursor overlay snapshot in the active label's color.
    pub fn cursor(&self) -> BrushCursor {
        self.brush.cursor(self.color_of(self.brush.label()))
    }

    /// Color of label `index`.
    pub fn color_of(&self, index: usize) -> Option<Rgba8> {
        lock(&self.colors).color_of(index)
    }

    /// The current palette.
    pub fn palette(&self) -> Palette {
        lock(&self.colors).palette().clone()
    }

    /// Rotate all label colors.
    pub fn regenerate_colors(&mut self, hue_offset: f32) -> NotifyReport {
        lock(&self.colors).regenerate(hue_offset)
    }

    /// Whether the labels layer is shown.
    #[inline]
    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    /// Show or hide the labels layer.
    pub fn toggle_labels_visible(&mut self) -> NotifyReport {
        self.labels_visible = !self.labels_visible;
        tracing::debug!(visible = self.labels_visible, "labels layer toggled");
        self.repaint.request(RepaintRequest::full(RepaintFlags::LABELS))
    }

    /// Render the labels layer for `plane`; transparent while hidden.
    pub fn render_labels(&self, plane: &Plane) -> Result<ComposedPlane, ComposeError> {
        let palette = self.palette();
        let labeling = self.labels.get();
        let mut composed = compose_plane(&labeling.read(), &palette, plane)?;
        if !self.labels_visible {
            composed.pixels.fill(Rgba8::TRANSPARENT);
        }
        Ok(composed)
    }
}

fn lock(colors: &Mutex<ColorProvider>) -> MutexGuard<'_, ColorProvider> {
    colors.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Turn failures further down a notification chain into this subscriber's failure.
fn downstream(report: NotifyReport) -> Result<(), ObserverError> {
    if report.is_ok() {
        Ok(())
    } else {
        Err(format!("{} downstream subscribers failed", report.failures.len()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::PlaneView;

    fn session(names: &[&str]) -> Session {
        let grid = Interval::from_dimensions(&[100, 100]).unwrap();
        Session::new(
            names.iter().copied(),
            grid,
            SessionConfig::default().with_overlay_alpha(128),
            Box::new(PlaneView::default()),
        )
        .unwrap()
    }

    type Log<T> = Arc<Mutex<Vec<T>>>;

    fn record<T: Clone + Send + 'static>()
    -> (Log<T>, impl FnMut(&T) -> Result<(), ObserverError> + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |v: &T| {
            sink.lock().unwrap().push(v.clone());
            Ok(())
        })
    }

    #[test]
    fn starts_with_defaults() {
        let s = session(&["fg", "bg"]);
        assert_eq!(s.current_brush_radius(), 5);
        assert_eq!(s.current_label_index(), 0);
        assert_eq!(s.palette().len(), 2);
        assert_eq!(s.color_of(1).map(|c| c.a), Some(128));
        assert!(s.labels_visible());
        assert!(!s.cursor().visible);
        assert_eq!(s.cursor().color, s.color_of(0));
    }

    #[test]
    fn rejects_bad_configuration() {
        let grid = Interval::from_dimensions(&[4, 4]).unwrap();
        let err = Session::new(
            ["a", "a"],
            grid.clone(),
            SessionConfig::default(),
            Box::new(PlaneView::default()),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Labeling(_)));

        let err = Session::new(
            ["a"],
            grid.clone(),
            SessionConfig::default().with_time_axis(2),
            Box::new(PlaneView::default()),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Neighborhood(_)));

        let err = Session::new(
            ["a"],
            grid,
            SessionConfig::default().with_default_radius(-2),
            Box::new(PlaneView::default()),
        )
        .unwrap_err();
        assert_eq!(err, SessionError::Brush(BrushError::NegativeRadius(-2)));
    }

    #[test]
    fn replacement_reaches_brush_colors_and_host() {
        let mut s = session(&["a", "b", "c"]);
        assert!(s.set_label_index(2).unwrap().is_ok());

        let (labelings, on_labeling) = record::<SharedLabeling>();
        s.subscribe_labeling(on_labeling);
        let (palettes, on_palette) = record::<Palette>();
        s.subscribe_palette(on_palette);
        let (repaints, on_repaint) = record::<RepaintRequest>();
        s.subscribe_repaint(on_repaint);

        let grid = Interval::from_dimensions(&[100, 100]).unwrap();
        let next = Labeling::new(["x", "y"], grid).unwrap();
        assert!(s.replace_labeling(next).unwrap().is_ok());

        assert_eq!(s.current_label_index(), 1);
        assert_eq!(s.palette().len(), 2);
        assert!(labelings.lock().unwrap()[0].ptr_eq(&s.current_labeling()));
        assert_eq!(palettes.lock().unwrap().len(), 1);
        assert_eq!(
            *repaints.lock().unwrap(),
            [RepaintRequest::full(RepaintFlags::PALETTE)]
        );
    }

    #[test]
    fn mismatched_extent_is_rejected() {
        let mut s = session(&["a"]);
        let before = s.current_labeling();
        let grid = Interval::from_dimensions(&[100, 50]).unwrap();
        let err = s.replace_labeling(Labeling::new(["a"], grid).unwrap()).unwrap_err();
        assert!(matches!(err, SessionError::ExtentMismatch { .. }));
        assert!(before.ptr_eq(&s.current_labeling()));
    }

    #[test]
    fn failing_host_subscriber_is_reported() {
        let mut s = session(&["a"]);
        s.subscribe_labeling(|_| Err("renderer detached".into()));
        let grid = Interval::from_dimensions(&[100, 100]).unwrap();
        let report = s.replace_labeling(Labeling::new(["b"], grid).unwrap()).unwrap();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(s.current_labeling().read().labels()[0].name(), "b");
    }

    #[test]
    fn painted_labels_render_in_palette_colors() {
        let mut s = session(&["a", "b"]);
        assert!(s.set_brush_radius(0).unwrap().is_ok());
        assert!(s.set_label_index(1).unwrap().is_ok());
        let start = s.on_drag_start(StrokeMode::Paint, Point::new(3.0, 4.0));
        assert!(start.unwrap().is_ok());
        s.on_drag_end(Point::new(3.0, 4.0));

        let plane = s.render_labels(&Plane::xy(2)).unwrap();
        assert_eq!(plane.pixel(3, 4), s.color_of(1));
        assert_eq!(plane.pixel(4, 4), Some(Rgba8::TRANSPARENT));

        assert!(s.toggle_labels_visible().is_ok());
        let hidden = s.render_labels(&Plane::xy(2)).unwrap();
        assert!(hidden.pixels.iter().all(|p| p.is_transparent()));
    }

    #[test]
    fn regenerated_colors_follow_the_cursor() {
        let mut s = session(&["a"]);
        let before = s.cursor().color;
        assert!(s.regenerate_colors(200.0).is_ok());
        assert_ne!(s.cursor().color, before);
        assert_eq!(s.cursor().color, s.color_of(0));
    }
}
