// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `XRSession.requestAnimationFrame` tick source.
//!
//! [`XrFrameLoop`] delivers one [`FrameTick`] plus the session's
//! [`Frame`](crate::sys::Frame) per display refresh while it is running. It
//! is started and stopped according to the
//! [`LoopCommand`](alight_core::scheduler::LoopCommand)s the scheduler
//! returns, so it only ever runs against the presenting session.
//!
//! [`FrameTick`]: alight_core::time::FrameTick

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use alight_core::time::FrameTick;

use crate::sys;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;
}

type XrClosure = Closure<dyn FnMut(f64, sys::Frame)>;

/// A per-session XR animation loop emitting [`FrameTick`]s.
///
/// Create with [`XrFrameLoop::new`], then [`start`](Self::start) it on a
/// session. The loop re-registers itself each frame until
/// [`stop`](Self::stop) is called, the `XrFrameLoop` is dropped, or the
/// session stops delivering frames.
///
/// Frame indices keep counting across sessions.
///
/// [`FrameTick`]: alight_core::time::FrameTick
pub struct XrFrameLoop {
    inner: Rc<LoopInner>,
}

struct LoopInner {
    /// The JS closure handed to `requestAnimationFrame`; set once, on the
    /// first `start()`.
    closure: RefCell<Option<XrClosure>>,

    callback: RefCell<Box<dyn FnMut(FrameTick, sys::Frame)>>,

    frame_counter: Cell<u64>,

    /// The session callbacks are registered with while running.
    session: RefCell<Option<sys::Session>>,

    /// Handle of the most recent registration, for cancellation.
    handle: Cell<u32>,
}

impl XrFrameLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(FrameTick, sys::Frame) + 'static) -> Self {
        Self {
            inner: Rc::new(LoopInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                session: RefCell::new(None),
                handle: Cell::new(0),
            }),
        }
    }

    /// Starts delivering frames from `session`.
    ///
    /// If already running, this is a no-op, even for a different session.
    pub fn start(&self, session: &sys::Session) {
        if self.is_running() {
            return;
        }
        *self.inner.session.borrow_mut() = Some(session.clone());

        if self.inner.closure.borrow().is_none() {
            let inner = Rc::clone(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64, frame: sys::Frame| {
                if inner.session.borrow().is_none() {
                    return;
                }

                let frame_index = inner.frame_counter.get();
                inner.frame_counter.set(frame_index + 1);
                let tick = FrameTick::new(crate::host_time_from_millis(timestamp_ms), frame_index);

                inner.callback.borrow_mut()(tick, frame);

                // The callback may have stopped the loop.
                if let (Some(session), Some(closure)) =
                    (&*inner.session.borrow(), &*inner.closure.borrow())
                {
                    inner
                        .handle
                        .set(session.request_animation_frame(closure.as_ref().unchecked_ref()));
                }
            }) as Box<dyn FnMut(f64, sys::Frame)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        if let Some(closure) = &*self.inner.closure.borrow() {
            self.inner
                .handle
                .set(session.request_animation_frame(closure.as_ref().unchecked_ref()));
        }
    }

    /// Stops the loop and cancels the pending callback.
    ///
    /// Can be restarted with [`start`](Self::start).
    pub fn stop(&self) {
        if let Some(session) = self.inner.session.borrow_mut().take() {
            session.cancel_animation_frame(self.inner.handle.get());
        }
    }

    /// Returns `true` while the loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.session.borrow().is_some()
    }
}

impl Drop for XrFrameLoop {
    fn drop(&mut self) {
        self.stop();
        // Drop the JS closure so it doesn't leak.
        self.inner.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for XrFrameLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("XrFrameLoop")
            .field("running", &self.is_running())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish()
    }
}
