// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Model loading.
//!
//! The model arrives independently of the frame loop: the scene has no
//! target until the fetch finishes, and keeps having none if it fails.
//! Its geometry goes to the renderer, its placement state to the scene.

use alloc::format;
use alloc::vec::Vec;

use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use alight_core::asset::AssetInfo;
use alight_core::config::PlacementConfig;
use alight_core::error::AssetError;
use alight_core::scene::PlacementTarget;

use crate::model::ModelMesh;
use crate::session::describe;

/// Fetches `url` into memory.
///
/// # Errors
///
/// Returns [`AssetError::Fetch`] on network failure or a non-2xx status.
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, AssetError> {
    let window = web_sys::window().ok_or_else(|| AssetError::Fetch("no window".into()))?;
    let response: Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| AssetError::Fetch(describe(&e)))?
        .unchecked_into();
    if !response.ok() {
        return Err(AssetError::Fetch(format!("{url}: HTTP {}", response.status())));
    }
    let buffer = response
        .array_buffer()
        .map_err(|e| AssetError::Fetch(describe(&e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| AssetError::Fetch(describe(&e)))?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// A fetched model, split between the scene and the renderer.
#[derive(Clone, Debug)]
pub struct LoadedModel {
    /// Placement state, with the authored scale applied.
    pub target: PlacementTarget,
    /// Geometry for [`WebGlRenderer::set_model`](crate::WebGlRenderer::set_model).
    pub mesh: ModelMesh,
}

/// Fetches, validates and decodes the configured model.
///
/// # Errors
///
/// Returns the first fetch, container or decoding error.
pub async fn load_model(config: &PlacementConfig) -> Result<LoadedModel, AssetError> {
    let bytes = fetch_bytes(config.model_url).await?;
    let info = AssetInfo::parse_glb(&bytes)?;
    let mesh = ModelMesh::decode_glb(&bytes)?;
    Ok(LoadedModel {
        target: PlacementTarget::from_asset(config.model_url, info, config),
        mesh,
    })
}

/// Spawns [`load_model`], handing the result to `on_done` when it
/// completes.
pub fn load_model_async(
    config: PlacementConfig,
    on_done: impl FnOnce(Result<LoadedModel, AssetError>) + 'static,
) {
    wasm_bindgen_futures::spawn_local(async move {
        on_done(load_model(&config).await);
    });
}
