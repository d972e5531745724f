// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `window` resize events.

use alloc::boxed::Box;

use kurbo::Size;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Event, Window};

/// The window's inner size in CSS pixels.
///
/// # Errors
///
/// Returns the JS error if the size cannot be read.
pub fn window_size(window: &Window) -> Result<Size, JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok(Size::new(width, height))
}

/// Calls back with the new window size on every `resize` event.
///
/// The listener is removed when this value is dropped, so nothing acts on a
/// drawable that has been torn down.
pub struct ResizeListener {
    window: Window,
    closure: Closure<dyn FnMut(Event)>,
}

impl ResizeListener {
    /// Registers `callback` for `resize` events on `window`.
    ///
    /// # Errors
    ///
    /// Returns the JS error if the listener cannot be added.
    pub fn register(
        window: &Window,
        mut callback: impl FnMut(Size) + 'static,
    ) -> Result<Self, JsValue> {
        let target = window.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            if let Ok(size) = window_size(&target) {
                callback(size);
            }
        }) as Box<dyn FnMut(Event)>);
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        Ok(Self {
            window: window.clone(),
            closure,
        })
    }
}

impl Drop for ResizeListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", self.closure.as_ref().unchecked_ref());
    }
}

impl core::fmt::Debug for ResizeListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResizeListener").finish_non_exhaustive()
    }
}
