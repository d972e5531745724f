// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The AR entry control.
//!
//! [`ArButton`] is the only way into and out of a session. It is offered
//! only after `isSessionSupported("immersive-ar")` says yes; otherwise it
//! shows why AR is unavailable and stays inert.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use core::cell::RefCell;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event, HtmlButtonElement, Window};

use crate::session::describe;
use crate::sys;

const MODE: &str = "immersive-ar";

const LABEL_START: &str = "START AR";
const LABEL_STOP: &str = "STOP AR";
const LABEL_UNSUPPORTED: &str = "AR NOT SUPPORTED";
const LABEL_UNAVAILABLE: &str = "WEBXR NOT AVAILABLE";

const STYLE: &str = "position: absolute; bottom: 20px; left: calc(50% - 50px); width: 100px; \
    padding: 12px 6px; border: 1px solid #fff; border-radius: 4px; \
    background: rgba(0, 0, 0, 0.1); color: #fff; font: normal 13px sans-serif; \
    text-align: center; opacity: 0.5; outline: none; z-index: 999; cursor: pointer;";

/// Receives session lifecycle notifications from an [`ArButton`].
pub trait ArHooks {
    /// A session was granted. Called once per session, before any frame.
    fn session_started(&mut self, session: sys::Session);

    /// The session ended, whoever ended it.
    fn session_ended(&mut self);
}

/// Returns `navigator.xr`, or `None` if the browser has no WebXR.
#[must_use]
pub fn navigator_xr(window: &Window) -> Option<sys::System> {
    let xr = Reflect::get(&window.navigator(), &"xr".into()).ok()?;
    (!xr.is_undefined() && !xr.is_null()).then(|| xr.unchecked_into())
}

/// The "START AR" / "STOP AR" toggle.
pub struct ArButton {
    inner: Rc<ButtonInner>,
}

struct ButtonInner {
    button: HtmlButtonElement,
    xr: Option<sys::System>,
    session: RefCell<Option<sys::Session>>,
    hooks: RefCell<Box<dyn ArHooks>>,
    click: RefCell<Option<Closure<dyn FnMut(Event)>>>,
    end: RefCell<Option<Closure<dyn FnMut(Event)>>>,
}

impl ArButton {
    /// Creates the button, appends it to `document.body` and starts feature
    /// detection. The button stays hidden until detection finishes.
    ///
    /// # Errors
    ///
    /// Returns the JS error if the element cannot be created or attached.
    pub fn create(
        window: &Window,
        document: &Document,
        hooks: impl ArHooks + 'static,
    ) -> Result<Self, JsValue> {
        let button: HtmlButtonElement = document.create_element("button")?.unchecked_into();
        button.set_attribute("style", STYLE)?;
        button.style().set_property("display", "none")?;
        document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?
            .append_child(&button)?;

        let inner = Rc::new(ButtonInner {
            button,
            xr: navigator_xr(window),
            session: RefCell::new(None),
            hooks: RefCell::new(Box::new(hooks)),
            click: RefCell::new(None),
            end: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let end = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(inner) = weak.upgrade() {
                inner.on_session_end();
            }
        }) as Box<dyn FnMut(Event)>);
        *inner.end.borrow_mut() = Some(end);

        match inner.xr.clone() {
            Some(xr) => {
                let weak = Rc::downgrade(&inner);
                wasm_bindgen_futures::spawn_local(async move {
                    let supported = is_ar_supported(&xr).await;
                    if let Some(inner) = weak.upgrade() {
                        if supported {
                            inner.show_start();
                        } else {
                            inner.show_disabled(LABEL_UNSUPPORTED);
                        }
                    }
                });
            }
            None => inner.show_disabled(LABEL_UNAVAILABLE),
        }

        let weak = Rc::downgrade(&inner);
        let click = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(inner) = weak.upgrade() {
                ButtonInner::on_click(&inner);
            }
        }) as Box<dyn FnMut(Event)>);
        inner
            .button
            .add_event_listener_with_callback("click", click.as_ref().unchecked_ref())?;
        *inner.click.borrow_mut() = Some(click);

        Ok(Self { inner })
    }
}

impl ButtonInner {
    fn show_start(&self) {
        let _ = self.button.style().set_property("display", "");
        self.button.set_disabled(false);
        self.button.set_text_content(Some(LABEL_START));
    }

    fn show_disabled(&self, label: &str) {
        let _ = self.button.style().set_property("display", "");
        let _ = self.button.style().set_property("cursor", "auto");
        self.button.set_disabled(true);
        self.button.set_text_content(Some(label));
    }

    fn on_click(this: &Rc<Self>) {
        if let Some(session) = this.session.borrow().as_ref() {
            // `end` fires on the session once it has shut down.
            let _ = session.end();
            return;
        }
        let Some(xr) = this.xr.clone() else {
            return;
        };
        let promise = match session_options() {
            Ok(options) => xr.request_session(MODE, &options),
            Err(err) => {
                warn(&err);
                return;
            }
        };
        let weak = Rc::downgrade(this);
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(session) => {
                    if let Some(inner) = weak.upgrade() {
                        inner.on_session_started(session.unchecked_into());
                    }
                }
                Err(err) => warn(&err),
            }
        });
    }

    fn on_session_started(&self, session: sys::Session) {
        if let Some(end) = &*self.end.borrow() {
            let _ = session.add_event_listener_with_callback("end", end.as_ref().unchecked_ref());
        }
        *self.session.borrow_mut() = Some(session.clone());
        self.button.set_text_content(Some(LABEL_STOP));
        self.hooks.borrow_mut().session_started(session);
    }

    fn on_session_end(&self) {
        let Some(session) = self.session.borrow_mut().take() else {
            return;
        };
        if let Some(end) = &*self.end.borrow() {
            let _ =
                session.remove_event_listener_with_callback("end", end.as_ref().unchecked_ref());
        }
        self.button.set_text_content(Some(LABEL_START));
        self.hooks.borrow_mut().session_ended();
    }
}

impl Drop for ButtonInner {
    fn drop(&mut self) {
        if let Some(click) = self.click.get_mut().take() {
            let _ = self
                .button
                .remove_event_listener_with_callback("click", click.as_ref().unchecked_ref());
        }
    }
}

impl core::fmt::Debug for ArButton {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ArButton")
            .field("webxr", &self.inner.xr.is_some())
            .field("in_session", &self.inner.session.borrow().is_some())
            .finish()
    }
}

/// Resolves `isSessionSupported("immersive-ar")`, treating errors as "no".
async fn is_ar_supported(xr: &sys::System) -> bool {
    JsFuture::from(xr.is_session_supported(MODE))
        .await
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// `{ requiredFeatures: ["hit-test"] }`
fn session_options() -> Result<Object, JsValue> {
    let options = Object::new();
    let required = Array::of1(&"hit-test".into());
    Reflect::set(&options, &"requiredFeatures".into(), &required)?;
    Ok(options)
}

fn warn(err: &JsValue) {
    let line = format!("[alight] AR session request failed: {}", describe(err));
    web_sys::console::warn_1(&line.into());
}
