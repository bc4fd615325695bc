// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable single-value container.
//!
//! [`Holder`] owns one value and a list of subscribers. Replacing the value
//! with [`Holder::set`] calls every subscriber synchronously, in registration
//! order, before returning. A subscriber that fails does not stop the others:
//! the failure is logged and handed back in the [`NotifyReport`].
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use understory_labeling::holder::Holder;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let mut holder = Holder::new(1_u32);
//!
//! let log = seen.clone();
//! holder.subscribe(move |v: &u32| {
//!     log.lock().unwrap().push(*v);
//!     Ok(())
//! });
//!
//! // Subscription does not replay the held value.
//! assert!(seen.lock().unwrap().is_empty());
//!
//! let report = holder.set(2);
//! assert!(report.is_ok());
//! assert_eq!(*holder.get(), 2);
//! assert_eq!(*seen.lock().unwrap(), [2]);
//! ```

use core::fmt::Debug;

/// Error type a subscriber may return.
pub type ObserverError = Box<dyn core::error::Error + Send + Sync>;

type Callback<T> = Box<dyn FnMut(&T) -> Result<(), ObserverError> + Send>;

/// Handle identifying one subscription.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

/// A subscriber that returned an error during notification.
#[derive(Debug)]
pub struct ObserverFailure {
    /// Which subscription failed.
    pub subscriber: SubscriberId,
    /// What it returned.
    pub error: ObserverError,
}

/// Outcome of one notification round.
#[derive(Debug, Default)]
#[must_use = "observer failures should be reported to the host"]
pub struct NotifyReport {
    /// Failed subscribers, in notification order.
    pub failures: Vec<ObserverFailure>,
}

impl NotifyReport {
    /// Whether every subscriber succeeded.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Append the failures of another round.
    pub fn merge(&mut self, other: Self) {
        self.failures.extend(other.failures);
    }
}

/// An ordered list of callbacks invoked with a borrowed value.
pub struct Subscribers<T> {
    callbacks: Vec<(SubscriberId, Callback<T>)>,
    next_id: u64,
}

impl<T> Debug for Subscribers<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.callbacks.len())
            .finish_non_exhaustive()
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscribers<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a callback; it runs after every earlier one.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&T) -> Result<(), ObserverError> + Send + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Number of registered callbacks.
    #[inline]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Whether nothing is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Call every subscriber with `value`, in registration order.
    pub fn notify(&mut self, value: &T) -> NotifyReport {
        let mut report = NotifyReport::default();
        for (id, callback) in &mut self.callbacks {
            if let Err(error) = callback(value) {
                tracing::warn!(subscriber = id.0, "subscriber failed: {error}");
                report.failures.push(ObserverFailure {
                    subscriber: *id,
                    error,
                });
            }
        }
        report
    }
}

/// Owns one value and publishes its replacements.
pub struct Holder<T> {
    value: T,
    subscribers: Subscribers<T>,
}

impl<T: Debug> Debug for Holder<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Holder")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl<T> Holder<T> {
    /// Hold `value` with no subscribers.
    pub fn new(value: T) -> Self {
        Self {
            value,
            subscribers: Subscribers::new(),
        }
    }

    /// The current value.
    #[inline]
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value, then notify every subscriber with it.
    ///
    /// When this returns, all subscribers have observed the new value.
    pub fn set(&mut self, value: T) -> NotifyReport {
        self.value = value;
        self.subscribers.notify(&self.value)
    }

    /// Register a callback for future replacements.
    ///
    /// The currently held value is not replayed; read it with
    /// [`get`](Self::get) first if needed.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriberId
    where
        F: FnMut(&T) -> Result<(), ObserverError> + Send + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Number of subscribers.
    #[inline]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Give up the held value.
    pub fn into_inner(self) -> T {
        self.value
    }
}
