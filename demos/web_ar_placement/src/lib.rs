// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web demo: AR hit-test placement driven by `alight_backend_web`.
//!
//! Shows a "START AR" button. Once an `immersive-ar` session is running,
//! the loaded model follows the first real-world surface hit along the
//! viewer's forward ray, every frame. Ending the session (button or
//! system UI) returns the page to its idle state; a new session can be
//! started afterwards.
//!
//! Build with: `wasm-pack build --target web demos/web_ar_placement`
//!
//! Then serve `demos/web_ar_placement/` over HTTPS with a `model.glb` next
//! to `index.html`, and open it on an AR-capable device. Append `?verbose`
//! to the URL to log a summary line for every presented frame.

// This crate only runs in the browser; suppress dead-code warnings when
// cargo-checking on a native host target.
#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::format;
use alloc::rc::Rc;
use core::cell::RefCell;

use kurbo::Size;
use wasm_bindgen::prelude::*;

use alight_backend_web::sys;
use alight_backend_web::{
    ArButton, ArHooks, ConsoleSink, ResizeListener, WebGlRenderer, WebXrSession, XrFrameLoop,
    load_model_async, start_session, window_size,
};
use alight_core::config::PlacementConfig;
use alight_core::scene::Scene;
use alight_core::scheduler::{FrameScheduler, LoopCommand};
use alight_core::time::FrameTick;
use alight_core::trace::{ResizeEvent, Tracer};
use alight_core::viewport::{Camera, ViewportManager};

struct App {
    scheduler: FrameScheduler<WebXrSession>,
    scene: Scene,
    camera: Camera,
    viewport: ViewportManager,
    renderer: WebGlRenderer,
    sink: ConsoleSink,
}

impl App {
    fn on_frame(&mut self, tick: &FrameTick, frame: &sys::Frame) {
        let Self {
            scheduler,
            scene,
            camera,
            renderer,
            sink,
            ..
        } = self;
        let _ = scheduler.on_frame(
            tick,
            Some(frame),
            scene,
            camera,
            renderer,
            &mut Tracer::new(sink),
        );
    }

    fn resize(&mut self, size: Size) {
        let outcome = self
            .viewport
            .on_resize(size, &mut self.camera, &mut self.renderer);
        Tracer::new(&mut self.sink).resize(&ResizeEvent::new(size, outcome));
    }
}

/// Connects the AR button to the scheduler and the frame loop.
struct SessionHooks {
    app: Rc<RefCell<App>>,
    frame_loop: Rc<XrFrameLoop>,
    config: PlacementConfig,
    // The session the button last reported as started; cleared on end.
    current: Rc<RefCell<Option<sys::Session>>>,
}

impl ArHooks for SessionHooks {
    fn session_started(&mut self, session: sys::Session) {
        *self.current.borrow_mut() = Some(session.clone());

        let app = Rc::clone(&self.app);
        let frame_loop = Rc::clone(&self.frame_loop);
        let current = Rc::clone(&self.current);
        let render_space = self.config.render_space;
        wasm_bindgen_futures::spawn_local(async move {
            let (gl, sink) = {
                let app = app.borrow();
                (app.renderer.gl().clone(), app.sink)
            };
            let start = match start_session(session.clone(), &gl, render_space, sink).await {
                Ok(start) => start,
                Err(err) => {
                    let line = format!("[alight] session setup failed: {err:?}");
                    web_sys::console::warn_1(&line.into());
                    let _ = session.end();
                    return;
                }
            };
            // The session may have ended while its layer was being set up.
            if current.borrow().as_ref() != Some(&session) {
                return;
            }

            let mut app = app.borrow_mut();
            let App {
                scheduler,
                renderer,
                sink,
                ..
            } = &mut *app;
            let command = scheduler.begin_session(
                start.session,
                start.reference_space,
                &mut Tracer::new(sink),
            );
            if command == LoopCommand::Register {
                renderer.set_xr_layer(Some(start.layer));
                frame_loop.start(&session);
            }
        });
    }

    fn session_ended(&mut self) {
        *self.current.borrow_mut() = None;

        let mut app = self.app.borrow_mut();
        let command = {
            let App { scheduler, sink, .. } = &mut *app;
            scheduler.end_session(&mut Tracer::new(sink))
        };
        if command == LoopCommand::Deregister {
            self.frame_loop.stop();
        }
        app.renderer.set_xr_layer(None);
        // Give the canvas back its window-sized drawable.
        let size = app.viewport.size();
        app.resize(size);
    }
}

/// The console sink, verbose when the page URL carries a `verbose` query flag.
fn console_sink(window: &web_sys::Window) -> ConsoleSink {
    let search = window.location().search().unwrap_or_default();
    let verbose = search
        .trim_start_matches('?')
        .split('&')
        .any(|param| param == "verbose" || param.starts_with("verbose="));
    if verbose {
        ConsoleSink::default().verbose()
    } else {
        ConsoleSink::default()
    }
}

/// Entry point, called automatically by `wasm_bindgen(start)`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;

    let config = PlacementConfig::web_ar();
    let size = window_size(&window)?;
    let aspect = if size.height > 0.0 {
        size.width / size.height
    } else {
        1.0
    };

    let renderer = WebGlRenderer::new(&document)?;
    body.append_child(renderer.canvas())?;

    let mut app = App {
        scheduler: FrameScheduler::new(&config),
        scene: Scene::new(config.light),
        camera: Camera::new(&config.camera, aspect),
        viewport: ViewportManager::new(size),
        renderer,
        sink: console_sink(&window),
    };
    app.viewport.register();
    app.resize(size);
    let app = Rc::new(RefCell::new(app));

    // The model arrives whenever it arrives; until then frames render an
    // empty scene.
    let loaded = Rc::clone(&app);
    load_model_async(config, move |result| {
        let model = match result {
            Ok(model) => model,
            Err(err) => {
                web_sys::console::warn_1(&format!("[alight] model not loaded: {err}").into());
                return;
            }
        };
        let mut app = loaded.borrow_mut();
        match app.renderer.set_model(&model.mesh) {
            Ok(true) => {}
            Ok(false) => {
                web_sys::console::warn_1(&"[alight] model has no drawable triangles".into());
            }
            Err(err) => {
                web_sys::console::warn_1(&format!("[alight] model upload failed: {err:?}").into());
            }
        }
        app.scene.set_target(model.target);
    });

    let resized = Rc::clone(&app);
    let resize = ResizeListener::register(&window, move |size| resized.borrow_mut().resize(size))?;

    let ticking = Rc::clone(&app);
    let frame_loop = Rc::new(XrFrameLoop::new(move |tick, frame| {
        ticking.borrow_mut().on_frame(&tick, &frame);
    }));

    let button = ArButton::create(
        &window,
        &document,
        SessionHooks {
            app,
            frame_loop,
            config,
            current: Rc::new(RefCell::new(None)),
        },
    )?;

    // Keep the listeners alive; there is no graceful shutdown on the web.
    core::mem::forget(resize);
    core::mem::forget(button);

    Ok(())
}
