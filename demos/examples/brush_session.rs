// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A painting session on a small time-lapse grid, with a renderer thread.
//!
//! The main thread plays a scripted gesture sequence: scroll to grow the
//! brush, paint a stroke, switch label, paint on the next frame, then replace
//! the label set. A second thread composes the labels layer after every
//! repaint request and prints it as text.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example brush_session`
//! - `RUST_LOG=understory_brush=trace` additionally logs every dab.

use std::error::Error;
use std::sync::mpsc;
use std::thread;

use kurbo::{Point, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_brush::{
    PlaneView, RepaintFlags, RepaintRequest, ScrollAction, Session, SessionConfig, StrokeMode,
};
use understory_labeling::{Interval, Labeling, SharedLabeling};
use understory_palette::{Palette, Plane, compose_plane};

const WIDTH: u64 = 48;
const HEIGHT: u64 = 16;
const FRAMES: u64 = 3;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let grid = Interval::from_dimensions(&[WIDTH, HEIGHT, FRAMES])?;
    let config = SessionConfig::default()
        .with_time_axis(2)
        .with_default_radius(1)
        .with_overlay_alpha(160);
    // Two display pixels per grid cell.
    let view = PlaneView::zoomed(2.0, Vec2::ZERO);
    let mut session = Session::new(["nucleus", "membrane"], grid.clone(), config, Box::new(view))?;

    let (tx, rx) = mpsc::channel::<RepaintRequest>();
    session.subscribe_repaint(move |request| tx.send(request.clone()).map_err(Into::into));

    let (labeling_tx, labeling_rx) = mpsc::channel::<SharedLabeling>();
    session.subscribe_labeling(move |next| labeling_tx.send(next.clone()).map_err(Into::into));
    let (palette_tx, palette_rx) = mpsc::channel::<Palette>();
    session.subscribe_palette(move |next| palette_tx.send(next.clone()).map_err(Into::into));

    let mut labeling = session.current_labeling();
    let mut palette = session.palette();
    let renderer = thread::spawn(move || {
        for request in rx {
            labeling = labeling_rx.try_iter().last().unwrap_or(labeling);
            palette = palette_rx.try_iter().last().unwrap_or(palette);
            if !request.flags.intersects(RepaintFlags::LABELS | RepaintFlags::PALETTE) {
                continue;
            }
            let t = request.bounds.as_ref().map_or(0, |b| b.min(2));
            let plane = Plane::xy(3).at(2, t);
            let Ok(plane) = compose_plane(&labeling.read(), &palette, &plane) else {
                continue;
            };
            let mut text = String::new();
            for y in 0..plane.height {
                for x in 0..plane.width {
                    let cell = match plane.pixel(x, y) {
                        Some(c) if !c.is_transparent() => '#',
                        _ => '.',
                    };
                    text.push(cell);
                }
                text.push('\n');
            }
            let dirty = request.bounds.map(|b| b.to_string());
            println!("frame {t}, dirty {dirty:?}\n{text}");
        }
    });

    for _ in 0..2 {
        let _ = session.on_scroll(ScrollAction::Radius, -1.0, false);
    }
    info!(radius = session.current_brush_radius(), "brush grown");

    let _ = session.set_cursor_visible(true);
    let _ = session.on_drag_start(StrokeMode::Paint, Point::new(10.0, 14.0))?;
    let _ = session.on_drag(Point::new(40.0, 16.0))?;
    let _ = session.on_drag(Point::new(80.0, 10.0))?;
    session.on_drag_end(Point::new(80.0, 10.0));

    let _ = session.on_scroll(ScrollAction::Label, -1.0, false);
    session.set_timepoint(1);
    let _ = session.on_drag_start(StrokeMode::Paint, Point::new(60.0, 4.0))?;
    let _ = session.on_drag(Point::new(60.0, 28.0))?;
    session.on_drag_end(Point::new(60.0, 28.0));
    let _ = session.on_drag_start(StrokeMode::Erase, Point::new(60.0, 16.0))?;
    session.on_drag_end(Point::new(60.0, 16.0));
    info!(
        label = session.current_label_index(),
        cursor = ?session.cursor().bounding_box(),
        "second label painted"
    );

    let report = session.replace_labeling(Labeling::new(["nucleus"], grid)?)?;
    info!(
        failures = report.failures.len(),
        label = session.current_label_index(),
        "label set replaced"
    );

    drop(session);
    renderer.join().map_err(|_| "renderer thread panicked")?;
    Ok(())
}
