// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! WebGL2 renderer.
//!
//! Draws the placement target's model, hemisphere-lit, into either the
//! session's `XRWebGLLayer` (one pass per view) or, without an XR frame, the
//! canvas' default framebuffer through the inline camera. Until a model with
//! drawable triangles is set, a box of the target's extent stands in for it.
//! The clear color is fully transparent so the camera feed shows through.

use alloc::format;
use alloc::vec::Vec;

use js_sys::{Object, Reflect};
use kurbo::Size;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer, WebGlProgram,
    WebGlShader, WebGlUniformLocation, WebGlVertexArrayObject,
};

use alight_core::pose::Vec3;
use alight_core::scene::Scene;
use alight_core::session::{FrameContext, Renderer};
use alight_core::transform::Transform3d;
use alight_core::viewport::{Camera, DrawableSurface};

use crate::model::{MeshVertex, ModelMesh};
use crate::sys;

const VERTEX_SHADER: &str = r"#version 300 es
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec3 a_normal;
layout(location = 2) in vec3 a_color;
uniform mat4 u_projection;
uniform mat4 u_view;
uniform mat4 u_model;
out vec3 v_normal;
out vec3 v_color;
void main() {
    v_normal = mat3(u_model) * a_normal;
    v_color = a_color;
    gl_Position = u_projection * u_view * u_model * vec4(a_position, 1.0);
}
";

const FRAGMENT_SHADER: &str = r"#version 300 es
precision mediump float;
uniform vec3 u_sky;
uniform vec3 u_ground;
uniform float u_intensity;
in vec3 v_normal;
in vec3 v_color;
out vec4 frag_color;
void main() {
    float up = normalize(v_normal).y * 0.5 + 0.5;
    vec3 light = mix(u_ground, u_sky, up) * u_intensity;
    frag_color = vec4(v_color * light, 1.0);
}
";

/// Surface color of the stand-in box.
const ALBEDO: [f32; 3] = [0.8, 0.8, 0.8];

/// Per face: outward normal and two in-plane axes with `u × v = normal`.
const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
];

/// Unit cube centered on the origin, counter-clockwise from outside.
fn cube() -> Vec<MeshVertex> {
    let corner = |n: [f32; 3], u: [f32; 3], v: [f32; 3], su: f32, sv: f32| MeshVertex {
        position: core::array::from_fn(|i| 0.5 * (n[i] + su * u[i] + sv * v[i])),
        normal: n,
        color: ALBEDO,
    };
    let mut out = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let a = corner(n, u, v, -1.0, -1.0);
        let b = corner(n, u, v, 1.0, -1.0);
        let c = corner(n, u, v, 1.0, 1.0);
        let d = corner(n, u, v, -1.0, 1.0);
        out.extend_from_slice(&[a, b, c, a, c, d]);
    }
    out
}

struct Uniforms {
    projection: WebGlUniformLocation,
    view: WebGlUniformLocation,
    model: WebGlUniformLocation,
    sky: WebGlUniformLocation,
    ground: WebGlUniformLocation,
    intensity: WebGlUniformLocation,
}

/// An uploaded triangle list.
struct Geometry {
    vao: WebGlVertexArrayObject,
    // Kept alive for the VAO.
    _buffer: WebGlBuffer,
    vertex_count: i32,
}

impl Geometry {
    /// Uploads `vertices`; `Ok(None)` if there are too many to draw in one
    /// call.
    fn upload(gl: &Gl, vertices: &[MeshVertex]) -> Result<Option<Self>, JsValue> {
        let Ok(vertex_count) = i32::try_from(vertices.len()) else {
            return Ok(None);
        };
        let vao = gl
            .create_vertex_array()
            .ok_or_else(|| JsValue::from_str("create GL vertex array failed"))?;
        gl.bind_vertex_array(Some(&vao));
        let buffer = gl
            .create_buffer()
            .ok_or_else(|| JsValue::from_str("create GL buffer failed"))?;
        gl.bind_buffer(Gl::ARRAY_BUFFER, Some(&buffer));
        gl.buffer_data_with_u8_array(
            Gl::ARRAY_BUFFER,
            bytemuck::cast_slice(vertices),
            Gl::STATIC_DRAW,
        );

        #[expect(
            clippy::cast_possible_truncation,
            reason = "vertex stride is a small constant"
        )]
        let stride = size_of::<MeshVertex>() as i32;
        for (location, offset) in [(0, 0), (1, 12), (2, 24)] {
            gl.enable_vertex_attrib_array(location);
            gl.vertex_attrib_pointer_with_i32(location, 3, Gl::FLOAT, false, stride, offset);
        }
        gl.bind_vertex_array(None);

        Ok(Some(Self {
            vao,
            _buffer: buffer,
            vertex_count,
        }))
    }

    fn draw(&self, gl: &Gl) {
        gl.bind_vertex_array(Some(&self.vao));
        gl.draw_arrays(Gl::TRIANGLES, 0, self.vertex_count);
        gl.bind_vertex_array(None);
    }
}

/// [`Renderer`] over a WebGL2 canvas.
pub struct WebGlRenderer {
    canvas: HtmlCanvasElement,
    gl: Gl,
    program: WebGlProgram,
    uniforms: Uniforms,
    proxy: Geometry,
    model: Option<Geometry>,
    layer: Option<sys::WebGlLayer>,
}

impl WebGlRenderer {
    /// Creates a full-window canvas with an XR-compatible WebGL2 context.
    /// The canvas is not attached; append [`canvas`](Self::canvas) where it
    /// should appear.
    ///
    /// # Errors
    ///
    /// Returns a JS error if WebGL2 is unavailable or the shaders fail to
    /// build.
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
        let style = canvas.style();
        style.set_property("position", "absolute")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;

        let options = Object::new();
        for key in ["antialias", "alpha", "xrCompatible"] {
            Reflect::set(&options, &key.into(), &JsValue::TRUE)?;
        }
        let gl: Gl = canvas
            .get_context_with_context_options("webgl2", &options)?
            .ok_or_else(|| JsValue::from_str("browser does not support WebGL2"))?
            .unchecked_into();

        let vs = compile_gl_shader(&gl, Gl::VERTEX_SHADER, VERTEX_SHADER)?;
        let fs = compile_gl_shader(&gl, Gl::FRAGMENT_SHADER, FRAGMENT_SHADER)?;
        let program = link_gl_program(&gl, &vs, &fs)?;

        let uniform = |name: &str| {
            gl.get_uniform_location(&program, name)
                .ok_or_else(|| JsValue::from_str(&format!("{name} uniform not found")))
        };
        let uniforms = Uniforms {
            projection: uniform("u_projection")?,
            view: uniform("u_view")?,
            model: uniform("u_model")?,
            sky: uniform("u_sky")?,
            ground: uniform("u_ground")?,
            intensity: uniform("u_intensity")?,
        };
        let proxy = Geometry::upload(&gl, &cube())?
            .ok_or_else(|| JsValue::from_str("box geometry not drawable"))?;

        gl.enable(Gl::DEPTH_TEST);
        gl.enable(Gl::CULL_FACE);
        gl.clear_color(0.0, 0.0, 0.0, 0.0);

        Ok(Self {
            canvas,
            gl,
            program,
            uniforms,
            proxy,
            model: None,
            layer: None,
        })
    }

    /// The canvas drawn into outside a session.
    #[must_use]
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// The XR-compatible context, for [`start_session`](crate::start_session).
    #[must_use]
    pub fn gl(&self) -> &Gl {
        &self.gl
    }

    /// Replaces the box with `mesh`.
    ///
    /// Returns `Ok(false)` and keeps drawing the box if `mesh` has no
    /// triangles or more vertices than one draw call takes.
    ///
    /// # Errors
    ///
    /// Returns a JS error if GL objects cannot be created.
    pub fn set_model(&mut self, mesh: &ModelMesh) -> Result<bool, JsValue> {
        if mesh.is_empty() {
            return Ok(false);
        }
        let Some(geometry) = Geometry::upload(&self.gl, mesh.vertices())? else {
            return Ok(false);
        };
        self.model = Some(geometry);
        Ok(true)
    }

    /// Sets the layer presenting frames render into; `None` when the
    /// session ends.
    pub fn set_xr_layer(&mut self, layer: Option<sys::WebGlLayer>) {
        self.layer = layer;
    }

    /// Returns `true` while an XR layer is attached.
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.layer.is_some()
    }

    fn render_xr(&self, scene: &Scene, xr: &FrameContext<'_, sys::Frame>, layer: &sys::WebGlLayer) {
        let gl = &self.gl;
        gl.bind_framebuffer(Gl::FRAMEBUFFER, layer.framebuffer().as_ref());
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);

        // Lost tracking: nothing to draw over the camera feed.
        let Some(pose) = xr.frame.get_viewer_pose(xr.reference_space) else {
            return;
        };
        for view in pose.views().iter() {
            let view: sys::View = view.unchecked_into();
            let Some(viewport) = layer.get_viewport(&view) else {
                continue;
            };
            gl.viewport(viewport.x(), viewport.y(), viewport.width(), viewport.height());
            let projection = view.projection_matrix().to_vec();
            let view_matrix = view.transform().inverse().matrix().to_vec();
            self.draw(scene, &projection, &view_matrix);
        }
    }

    fn render_inline(&self, scene: &Scene, camera: &Camera) {
        let gl = &self.gl;
        let width = i32::try_from(self.canvas.width()).unwrap_or(i32::MAX);
        let height = i32::try_from(self.canvas.height()).unwrap_or(i32::MAX);
        gl.bind_framebuffer(Gl::FRAMEBUFFER, None);
        gl.viewport(0, 0, width, height);
        gl.clear(Gl::COLOR_BUFFER_BIT | Gl::DEPTH_BUFFER_BIT);
        let projection = camera.projection().to_cols_array_f32();
        let view = Transform3d::IDENTITY.to_cols_array_f32();
        self.draw(scene, &projection, &view);
    }

    fn draw(&self, scene: &Scene, projection: &[f32], view: &[f32]) {
        let Some(target) = scene.target() else {
            return;
        };
        let (geometry, model) = match &self.model {
            Some(geometry) => (geometry, target.model_matrix()),
            None => (
                &self.proxy,
                target.model_matrix() * Transform3d::from_scale(Vec3::splat(target.extent())),
            ),
        };
        let light = scene.light();
        let (gl, u) = (&self.gl, &self.uniforms);

        gl.use_program(Some(&self.program));
        gl.uniform_matrix4fv_with_f32_array(Some(&u.projection), false, projection);
        gl.uniform_matrix4fv_with_f32_array(Some(&u.view), false, view);
        gl.uniform_matrix4fv_with_f32_array(Some(&u.model), false, &model.to_cols_array_f32());
        gl.uniform3fv_with_f32_array(Some(&u.sky), &light.sky.to_array());
        gl.uniform3fv_with_f32_array(Some(&u.ground), &light.ground.to_array());
        gl.uniform1f(Some(&u.intensity), light.intensity);
        geometry.draw(gl);
    }
}

impl Renderer<sys::Frame> for WebGlRenderer {
    fn render(&mut self, scene: &Scene, camera: &Camera, xr: Option<FrameContext<'_, sys::Frame>>) {
        match (xr, &self.layer) {
            (Some(xr), Some(layer)) => self.render_xr(scene, &xr, layer),
            _ => self.render_inline(scene, camera),
        }
    }
}

impl DrawableSurface for WebGlRenderer {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "sizes are positive and well within u32"
    )]
    fn set_size(&mut self, size: Size) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
        // The layer owns the framebuffer size while presenting.
        if self.layer.is_some() {
            return;
        }
        let ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        self.canvas.set_width((size.width * ratio) as u32);
        self.canvas.set_height((size.height * ratio) as u32);
    }
}

impl core::fmt::Debug for WebGlRenderer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebGlRenderer")
            .field("width", &self.canvas.width())
            .field("height", &self.canvas.height())
            .field("presenting", &self.layer.is_some())
            .field("model", &self.model.is_some())
            .finish_non_exhaustive()
    }
}

fn compile_gl_shader(gl: &Gl, shader_type: u32, source: &str) -> Result<WebGlShader, JsValue> {
    let shader = gl
        .create_shader(shader_type)
        .ok_or_else(|| JsValue::from_str("create GL shader failed"))?;
    gl.shader_source(&shader, source);
    gl.compile_shader(&shader);

    if !gl
        .get_shader_parameter(&shader, Gl::COMPILE_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_shader_info_log(&shader).unwrap_or_default();
        return Err(JsValue::from_str(&format!("GL shader compile failed: {log}")));
    }

    Ok(shader)
}

fn link_gl_program(gl: &Gl, vs: &WebGlShader, fs: &WebGlShader) -> Result<WebGlProgram, JsValue> {
    let program = gl
        .create_program()
        .ok_or_else(|| JsValue::from_str("create GL program failed"))?;
    gl.attach_shader(&program, vs);
    gl.attach_shader(&program, fs);
    gl.link_program(&program);

    if !gl
        .get_program_parameter(&program, Gl::LINK_STATUS)
        .as_bool()
        .unwrap_or(false)
    {
        let log = gl.get_program_info_log(&program).unwrap_or_default();
        return Err(JsValue::from_str(&format!("GL program link failed: {log}")));
    }

    Ok(program)
}
