// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Repaint requests sent to the host.

use core::fmt::Debug;
use std::sync::{Arc, Mutex, PoisonError};

use understory_labeling::Interval;
use understory_labeling::holder::{NotifyReport, ObserverError, SubscriberId, Subscribers};

bitflags::bitflags! {
    /// Which layers need redrawing.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RepaintFlags: u8 {
        /// Label contents changed.
        const LABELS  = 0b0000_0001;
        /// Brush cursor or layer visibility changed.
        const OVERLAY = 0b0000_0010;
        /// Label colors changed.
        const PALETTE = 0b0000_0100;
    }
}

/// One repaint request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepaintRequest {
    /// Affected layers.
    pub flags: RepaintFlags,
    /// Grid area whose labels changed; `None` means the whole view.
    pub bounds: Option<Interval>,
}

impl RepaintRequest {
    /// Redraw `flags` everywhere.
    pub fn full(flags: RepaintFlags) -> Self {
        Self {
            flags,
            bounds: None,
        }
    }

    /// Redraw changed labels inside `bounds`.
    pub fn labels(bounds: Interval) -> Self {
        Self {
            flags: RepaintFlags::LABELS,
            bounds: Some(bounds),
        }
    }
}

/// Cloneable fan-out of repaint requests.
///
/// Subscribers run on the thread that raised the request and must not raise
/// another one from inside the callback.
#[derive(Clone, Default)]
pub struct RepaintSignal {
    subscribers: Arc<Mutex<Subscribers<RepaintRequest>>>,
}

impl Debug for RepaintSignal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RepaintSignal")
            .field("subscribers", &self.lock().len())
            .finish()
    }
}

impl RepaintSignal {
    /// A signal nobody listens to yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repaint callback.
    pub fn subscribe<F>(&self, callback: F) -> SubscriberId
    where
        F: FnMut(&RepaintRequest) -> Result<(), ObserverError> + Send + 'static,
    {
        self.lock().subscribe(callback)
    }

    /// Deliver `request` to every subscriber.
    pub fn request(&self, request: RepaintRequest) -> NotifyReport {
        self.lock().notify(&request)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Subscribers<RepaintRequest>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
