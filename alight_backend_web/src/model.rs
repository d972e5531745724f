// Copyright 2026 the Alight Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mesh extraction from binary glTF.
//!
//! The default scene is flattened into one triangle list in model space.
//! Node transforms are baked into the vertices, indexed primitives are
//! expanded, and every vertex carries its material's base color. Primitives
//! that are not triangle lists, or whose data lives outside the GLB, are
//! skipped.

use alloc::string::ToString;
use alloc::vec::Vec;

use bytemuck::{Pod, Zeroable};
use gltf::Gltf;
use gltf::buffer::Source;
use gltf::mesh::Mode;

use alight_core::error::AssetError;
use alight_core::pose::Vec3;
use alight_core::transform::Transform3d;

/// One vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    /// Model-space position.
    pub position: [f32; 3],
    /// Unit normal.
    pub normal: [f32; 3],
    /// Linear RGB base color.
    pub color: [f32; 3],
}

/// A model's geometry as a flat triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelMesh {
    vertices: Vec<MeshVertex>,
}

impl ModelMesh {
    /// Decodes the triangles of a GLB's default scene (or its first scene
    /// when none is marked default).
    ///
    /// A model with no drawable triangles decodes to an empty mesh.
    ///
    /// # Errors
    ///
    /// Returns [`AssetError::Decode`] if the glTF document is invalid.
    pub fn decode_glb(bytes: &[u8]) -> Result<Self, AssetError> {
        let gltf = Gltf::from_slice(bytes).map_err(|e| AssetError::Decode(e.to_string()))?;
        let blob = gltf.blob.as_deref();

        let mut mesh = Self::default();
        let Some(scene) = gltf.default_scene().or_else(|| gltf.scenes().next()) else {
            return Ok(mesh);
        };
        let mut pending: Vec<_> = scene
            .nodes()
            .map(|node| (node, Transform3d::IDENTITY))
            .collect();
        while let Some((node, parent)) = pending.pop() {
            let local = Transform3d::from_cols_slice_f32(node.transform().matrix().as_flattened())
                .unwrap_or(Transform3d::IDENTITY);
            let world = parent * local;
            if let Some(node_mesh) = node.mesh() {
                mesh.append(&node_mesh, world, blob);
            }
            pending.extend(node.children().map(|child| (child, world)));
        }
        Ok(mesh)
    }

    /// The vertices, three per triangle.
    #[must_use]
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    /// Returns `true` if there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn append(&mut self, mesh: &gltf::Mesh<'_>, world: Transform3d, blob: Option<&[u8]>) {
        let mirrored = determinant3(&world) < 0.0;
        for primitive in mesh.primitives() {
            if primitive.mode() != Mode::Triangles {
                continue;
            }
            let reader = primitive.reader(|buffer| match buffer.source() {
                Source::Bin => blob,
                Source::Uri(_) => None,
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<Vec3> = positions.map(vec3).collect();
            let normals: Option<Vec<Vec3>> = reader.read_normals().map(|n| n.map(vec3).collect());
            let order: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..u32::try_from(positions.len()).unwrap_or(u32::MAX)).collect(),
            };
            let [red, green, blue, _] = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            for tri in order.chunks_exact(3) {
                let index = |i: u32| usize::try_from(i).ok().filter(|&i| i < positions.len());
                let (Some(a), Some(mut b), Some(mut c)) = (index(tri[0]), index(tri[1]), index(tri[2]))
                else {
                    continue;
                };
                // Mirroring flips winding; swap to keep the front face.
                if mirrored {
                    core::mem::swap(&mut b, &mut c);
                }
                let corners = [a, b, c];
                let p = corners.map(|i| world.transform_point(positions[i]));
                let face = (p[1] - p[0]).cross(p[2] - p[0]).normalize_or(Vec3::ZERO);
                for (k, &i) in corners.iter().enumerate() {
                    let normal = normals
                        .as_ref()
                        .and_then(|n| n.get(i))
                        .map_or(face, |&n| world.transform_vector(n).normalize_or(face));
                    self.vertices.push(MeshVertex {
                        position: to_f32(p[k]),
                        normal: to_f32(normal),
                        color: [red, green, blue],
                    });
                }
            }
        }
    }
}

fn vec3([x, y, z]: [f32; 3]) -> Vec3 {
    Vec3::new(f64::from(x), f64::from(y), f64::from(z))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "vertex attributes are single precision"
)]
fn to_f32(v: Vec3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

/// Determinant of the upper 3×3; negative when the transform mirrors.
fn determinant3(m: &Transform3d) -> f64 {
    let c = &m.cols;
    c[0][0] * (c[1][1] * c[2][2] - c[2][1] * c[1][2]) - c[1][0] * (c[0][1] * c[2][2] - c[2][1] * c[0][2])
        + c[2][0] * (c[0][1] * c[1][2] - c[1][1] * c[0][2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    /// A one-triangle GLB: positions (0,0,0) (1,0,0) (0,1,0) with a red
    /// material, instanced by the single scene node `node`.
    fn triangle_glb(mode: u32, with_normals: bool, node: &str) -> Vec<u8> {
        let mut bin = Vec::new();
        for p in [[0.0_f32, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            bin.extend_from_slice(bytemuck::cast_slice(&p));
        }
        for _ in 0..3 {
            bin.extend_from_slice(bytemuck::cast_slice(&[0.0_f32, 0.0, 1.0]));
        }
        for i in [0_u16, 1, 2, 0] {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        assert_eq!(bin.len(), 80, "bin layout");

        let attributes = if with_normals {
            r#"{"POSITION":0,"NORMAL":1}"#
        } else {
            r#"{"POSITION":0}"#
        };
        let mut json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{node}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{attributes},"indices":2,"material":0,"mode":{mode}}}]}}],"#,
                r#""materials":[{{"pbrMetallicRoughness":{{"baseColorFactor":[1,0,0,1]}}}}],"#,
                r#""accessors":["#,
                r#"{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
                r#"{{"bufferView":1,"componentType":5126,"count":3,"type":"VEC3"}},"#,
                r#"{{"bufferView":2,"componentType":5123,"count":3,"type":"SCALAR"}}],"#,
                r#""bufferViews":["#,
                r#"{{"buffer":0,"byteOffset":0,"byteLength":36}},"#,
                r#"{{"buffer":0,"byteOffset":36,"byteLength":36}},"#,
                r#"{{"buffer":0,"byteOffset":72,"byteLength":6}}],"#,
                r#""buffers":[{{"byteLength":80}}]}}"#,
            ),
            node = node,
            attributes = attributes,
            mode = mode,
        );
        while json.len() % 4 != 0 {
            json.push(' ');
        }
        glb(&json, &bin)
    }

    fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2_u32.to_le_bytes());
        out.extend_from_slice(&u32::try_from(total).unwrap().to_le_bytes());
        out.extend_from_slice(&u32::try_from(json.len()).unwrap().to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(json.as_bytes());
        out.extend_from_slice(&u32::try_from(bin.len()).unwrap().to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(bin);
        out
    }

    const LIFTED: &str = r#"{"mesh":0,"translation":[0,1,0]}"#;

    #[test]
    fn indexed_triangle_is_expanded_with_node_transform() {
        let mesh = ModelMesh::decode_glb(&triangle_glb(4, true, LIFTED)).unwrap();
        let positions: Vec<_> = mesh.vertices().iter().map(|v| v.position).collect();
        assert_eq!(positions, [[0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [0.0, 2.0, 0.0]]);
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.color, [1.0, 0.0, 0.0]);
        }
    }

    #[test]
    fn missing_normals_use_the_face_normal() {
        let mesh = ModelMesh::decode_glb(&triangle_glb(4, false, LIFTED)).unwrap();
        assert_eq!(mesh.vertices().len(), 3);
        for v in mesh.vertices() {
            assert_eq!(v.normal, [0.0, 0.0, 1.0], "counter-clockwise faces +z");
        }
    }

    #[test]
    fn mirrored_nodes_keep_triangles_front_facing() {
        let node = r#"{"mesh":0,"scale":[-1,1,1]}"#;
        let mesh = ModelMesh::decode_glb(&triangle_glb(4, false, node)).unwrap();
        let positions: Vec<_> = mesh.vertices().iter().map(|v| v.position).collect();
        assert_eq!(positions, [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [-1.0, 0.0, 0.0]]);
        assert_eq!(mesh.vertices()[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn point_primitives_are_skipped() {
        let mesh = ModelMesh::decode_glb(&triangle_glb(0, true, LIFTED)).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn invalid_document_is_a_decode_error() {
        let json = String::from(r#"{"asset":{}}"#);
        let result = ModelMesh::decode_glb(&glb(&json, &[0; 4]));
        assert!(
            matches!(result, Err(AssetError::Decode(_))),
            "got {result:?}"
        );
    }

    #[test]
    fn vertices_pack_tightly() {
        assert_eq!(size_of::<MeshVertex>(), 36);
    }
}
