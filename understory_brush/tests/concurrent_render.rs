// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A renderer reading on another thread never sees a partial dab.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use kurbo::Point;
use understory_brush::{PlaneView, Session, SessionConfig, StrokeMode};
use understory_labeling::{Interval, Region};
use understory_palette::{Plane, compose_plane};

const RADIUS: i64 = 2;
const DAB_SIZE: usize = 13;

fn centers() -> Vec<(i64, i64)> {
    (0..10)
        .flat_map(|i| (0..10).map(move |j| (5 + 10 * i, 5 + 10 * j)))
        .collect()
}

fn covered(region: &Region, (cx, cy): (i64, i64)) -> usize {
    let mut n = 0;
    for dx in -RADIUS..=RADIUS {
        for dy in -RADIUS..=RADIUS {
            if dx * dx + dy * dy <= RADIUS * RADIUS && region.get(&[cx + dx, cy + dy]) {
                n += 1;
            }
        }
    }
    n
}

fn session() -> Session {
    let grid = Interval::from_dimensions(&[100, 100]).unwrap();
    Session::new(
        ["fg"],
        grid,
        SessionConfig::default().with_default_radius(RADIUS),
        Box::new(PlaneView::default()),
    )
    .unwrap()
}

#[allow(clippy::cast_precision_loss, reason = "Small test coordinates.")]
fn dab(session: &mut Session, mode: StrokeMode, (x, y): (i64, i64)) {
    let at = Point::new(x as f64, y as f64);
    assert!(session.on_drag_start(mode, at).unwrap().is_ok());
    session.on_drag_end(at);
}

#[test]
fn snapshots_never_hold_a_torn_dab() {
    let mut session = session();
    let shared = session.current_labeling();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let done = done.clone();
        thread::spawn(move || {
            let mut snapshots = 0_usize;
            loop {
                let finished = done.load(Ordering::Acquire);
                let region = shared.snapshot_region(0).unwrap();
                for center in centers() {
                    let n = covered(&region, center);
                    assert!(n == 0 || n == DAB_SIZE, "torn dab at {center:?}: {n} cells");
                }
                snapshots += 1;
                if finished {
                    return snapshots;
                }
            }
        })
    };

    for _ in 0..3 {
        for center in centers() {
            dab(&mut session, StrokeMode::Paint, center);
        }
        for center in centers() {
            dab(&mut session, StrokeMode::Erase, center);
        }
    }
    for center in centers() {
        dab(&mut session, StrokeMode::Paint, center);
    }
    done.store(true, Ordering::Release);

    assert!(reader.join().unwrap() > 0);
    let region = session.current_labeling().snapshot_region(0).unwrap();
    assert_eq!(region.count_ones(), centers().len() * DAB_SIZE);
}

#[test]
fn rendered_planes_never_hold_a_torn_dab() {
    let mut session = session();
    let shared = session.current_labeling();
    let palette = session.palette();
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let done = done.clone();
        thread::spawn(move || {
            while !done.load(Ordering::Acquire) {
                let plane = compose_plane(&shared.read(), &palette, &Plane::xy(2)).unwrap();
                for (cx, cy) in centers() {
                    let colored = (-RADIUS..=RADIUS)
                        .flat_map(|dx| (-RADIUS..=RADIUS).map(move |dy| (dx, dy)))
                        .filter(|(dx, dy)| dx * dx + dy * dy <= RADIUS * RADIUS)
                        .filter(|(dx, dy)| {
                            let x = usize::try_from(cx + dx).unwrap();
                            let y = usize::try_from(cy + dy).unwrap();
                            !plane.pixel(x, y).unwrap().is_transparent()
                        })
                        .count();
                    assert!(colored == 0 || colored == DAB_SIZE);
                }
            }
        })
    };

    for center in centers() {
        dab(&mut session, StrokeMode::Paint, center);
    }
    done.store(true, Ordering::Release);
    reader.join().unwrap();
}
