use vek::Vec3;

use crate::asset::{Material, MaterialDesc};
use crate::device::{DeviceMesh, Vertex};
use crate::error::DecodeError;
use crate::AssetKind;

/// Index range of a [`MeshData`] drawn with one material.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubMeshData {
    pub material: MaterialDesc,
    pub first_index: u32,
    pub index_count: u32,
}

/// Decoded mesh, as produced by a [`crate::Decoder`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub submeshes: Vec<SubMeshData>,
    /// Names of the skeleton nodes the mesh is attached to, if any.
    pub nodes: Vec<String>,
}

impl MeshData {
    pub fn validate(&self) -> Result<(), DecodeError> {
        let n_vertices = self.vertices.len();
        if let Some(i) = self.indices.iter().find(|&&i| i as usize >= n_vertices) {
            return Err(DecodeError::malformed(
                AssetKind::Mesh,
                format!("index {} out of range, {} vertices", i, n_vertices),
            ));
        }

        for sm in &self.submeshes {
            let end = sm.first_index as u64 + sm.index_count as u64;
            if end > self.indices.len() as u64 {
                return Err(DecodeError::malformed(
                    AssetKind::Mesh,
                    format!(
                        "sub-mesh [{}, {}) out of range, {} indices",
                        sm.first_index,
                        end,
                        self.indices.len()
                    ),
                ));
            }
        }

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubMesh {
    pub material: Material,
    pub first_index: u32,
    pub index_count: u32,
}

/// A mesh that is resident on the device, with its materials resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtoMesh {
    pub name: String,
    pub submeshes: Vec<SubMesh>,
    pub nodes: Vec<String>,
    pub index_count: u32,
    pub device: DeviceMesh,
}

impl ProtoMesh {
    pub fn empty(name: &str, device: DeviceMesh) -> Self {
        Self {
            name: name.to_string(),
            submeshes: Vec::new(),
            nodes: Vec::new(),
            index_count: 0,
            device,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.index_count == 0
    }
}

/// Triangle soup for spawning particles on the surface of a mesh.
///
/// Points are picked with a probability proportional to triangle area.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EmitterMesh {
    triangles: Vec<[Vec3<f32>; 3]>,
    // Running sum of triangle areas, same length as `triangles`.
    areas: Vec<f32>,
}

impl EmitterMesh {
    pub fn new(data: &MeshData) -> Self {
        let pos = |i: u32| -> Option<Vec3<f32>> {
            data.vertices.get(i as usize).map(|v| Vec3::from(v.pos))
        };

        let mut triangles = Vec::with_capacity(data.indices.len() / 3);
        let mut areas = Vec::with_capacity(data.indices.len() / 3);
        let mut total = 0.0;
        for tri in data.indices.chunks_exact(3) {
            let (a, b, c) = match (pos(tri[0]), pos(tri[1]), pos(tri[2])) {
                (Some(a), Some(b), Some(c)) => (a, b, c),
                _ => continue,
            };
            let area = (b - a).cross(c - a).magnitude() * 0.5;
            if area.is_nan() || area <= 0.0 {
                continue;
            }
            total += area;
            triangles.push([a, b, c]);
            areas.push(total);
        }

        Self { triangles, areas }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn area(&self) -> f32 {
        self.areas.last().copied().unwrap_or(0.0)
    }

    /// Maps three uniform numbers in `[0, 1)` to a point on the surface.
    pub fn sample(&self, pick: f32, u: f32, v: f32) -> Option<Vec3<f32>> {
        let target = pick.clamp(0.0, 1.0) * self.area();
        let i = self
            .areas
            .partition_point(|&a| a <= target)
            .min(self.triangles.len().checked_sub(1)?);
        let [a, b, c] = self.triangles[i];

        let su = u.clamp(0.0, 1.0).sqrt();
        let v = v.clamp(0.0, 1.0);
        Some(a * (1.0 - su) + b * (su * (1.0 - v)) + c * (su * v))
    }
}
