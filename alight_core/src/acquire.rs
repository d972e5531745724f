// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot asynchronous acquisition.
//!
//! [`channel`] creates a [`Pending`] / [`Resolver`] pair sharing a single
//! slot. The frame loop keeps the `Pending` half and polls it once per tick;
//! the backend hands the `Resolver` half to whatever host future will
//! eventually produce the value.
//!
//! The resolver only holds a weak reference to the slot. Dropping the
//! `Pending` half (which happens when the owning session state is torn
//! down) turns any later [`Resolver::resolve`] into [`Delivery::Stale`],
//! which hands the value back so the caller can release it. Neither half
//! needs a cancellation token; liveness of the slot is the signal.
//!
//! Both halves are `!Send`: everything runs on the host's single frame
//! thread.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt;
use core::task::Poll;

use crate::error::AcquireError;

enum Slot<T> {
    Waiting,
    Resolved(T),
    Failed(AcquireError),
    Taken,
}

/// The polling half of an acquisition.
pub struct Pending<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

/// The completing half of an acquisition.
///
/// Dropping a resolver without calling [`resolve`](Self::resolve) or
/// [`reject`](Self::reject) fails the acquisition with
/// [`AcquireError::Abandoned`].
pub struct Resolver<T> {
    slot: Weak<RefCell<Slot<T>>>,
    completed: bool,
}

/// What happened to a value handed to a [`Resolver`].
#[derive(Debug, PartialEq, Eq)]
pub enum Delivery<T> {
    /// The value reached its `Pending` half.
    Delivered,
    /// The `Pending` half is gone; the value is returned to the caller.
    Stale(T),
}

impl<T> Delivery<T> {
    /// Returns `true` if the value was delivered.
    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Creates a connected [`Pending`] / [`Resolver`] pair.
#[must_use]
pub fn channel<T>() -> (Pending<T>, Resolver<T>) {
    let slot = Rc::new(RefCell::new(Slot::Waiting));
    let resolver = Resolver {
        slot: Rc::downgrade(&slot),
        completed: false,
    };
    (Pending { slot }, resolver)
}

impl<T> Pending<T> {
    /// Polls for the outcome.
    ///
    /// Returns `Poll::Ready` exactly once; subsequent polls after a ready
    /// result return `Poll::Pending` forever.
    pub fn poll(&self) -> Poll<Result<T, AcquireError>> {
        let mut slot = self.slot.borrow_mut();
        match core::mem::replace(&mut *slot, Slot::Taken) {
            Slot::Resolved(value) => Poll::Ready(Ok(value)),
            Slot::Failed(err) => Poll::Ready(Err(err)),
            Slot::Waiting => {
                *slot = Slot::Waiting;
                Poll::Pending
            }
            Slot::Taken => Poll::Pending,
        }
    }

    /// Returns `true` while no outcome has arrived yet.
    #[must_use]
    pub fn is_waiting(&self) -> bool {
        matches!(*self.slot.borrow(), Slot::Waiting)
    }
}

impl<T> Resolver<T> {
    /// Completes the acquisition with `value`.
    pub fn resolve(mut self, value: T) -> Delivery<T> {
        self.completed = true;
        match self.slot.upgrade() {
            Some(slot) => {
                let mut slot = slot.borrow_mut();
                if matches!(*slot, Slot::Waiting) {
                    *slot = Slot::Resolved(value);
                    Delivery::Delivered
                } else {
                    Delivery::Stale(value)
                }
            }
            None => Delivery::Stale(value),
        }
    }

    /// Fails the acquisition.
    ///
    /// Returns `false` if nobody was listening any more.
    pub fn reject(mut self, err: AcquireError) -> bool {
        self.completed = true;
        self.fail(err)
    }

    /// Returns `true` if the `Pending` half has been dropped.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.slot.strong_count() == 0
    }

    fn fail(&self, err: AcquireError) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            return false;
        };
        let mut slot = slot.borrow_mut();
        if matches!(*slot, Slot::Waiting) {
            *slot = Slot::Failed(err);
            true
        } else {
            false
        }
    }
}

impl<T> Drop for Resolver<T> {
    fn drop(&mut self) {
        if !self.completed {
            self.fail(AcquireError::Abandoned);
        }
    }
}

impl<T> fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("waiting", &self.is_waiting())
            .finish()
    }
}

impl<T> fmt::Debug for Resolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("stale", &self.is_stale())
            .field("completed", &self.completed)
            .finish()
    }
}
