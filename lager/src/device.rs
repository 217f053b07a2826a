//! Graphics device upload interface.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::asset::Pixmap;
use crate::error::UploadError;

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub norm: [f32; 3],
    pub uv: [f32; 2],
    pub color: u32,
}

/// Device-resident texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceTexture(pub u64);

/// Device-resident vertex + index buffer pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DeviceMesh(pub u64);

pub trait Device: Send + Sync {
    fn upload_texture(&self, pixmap: &Pixmap) -> Result<DeviceTexture, UploadError>;
    fn upload_mesh(&self, vertices: &[Vertex], indices: &[u32]) -> Result<DeviceMesh, UploadError>;
}

impl<D: Device + ?Sized> Device for Arc<D> {
    fn upload_texture(&self, pixmap: &Pixmap) -> Result<DeviceTexture, UploadError> {
        (**self).upload_texture(pixmap)
    }

    fn upload_mesh(&self, vertices: &[Vertex], indices: &[u32]) -> Result<DeviceMesh, UploadError> {
        (**self).upload_mesh(vertices, indices)
    }
}

/// Device without a GPU behind it. Hands out ids and tracks how many bytes were "uploaded".
#[derive(Debug, Default)]
pub struct HeadlessDevice {
    next_id: AtomicU64,
    used: AtomicU64,
    budget: Option<u64>,
    textures: AtomicU64,
    meshes: AtomicU64,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads fail with [`UploadError::OutOfMemory`] once `bytes` are in use.
    pub fn with_memory_budget(bytes: u64) -> Self {
        Self {
            budget: Some(bytes),
            ..Self::default()
        }
    }

    pub fn used_bytes(&self) -> u64 {
        self.used.load(Ordering::Relaxed)
    }

    pub fn texture_uploads(&self) -> u64 {
        self.textures.load(Ordering::Relaxed)
    }

    pub fn mesh_uploads(&self) -> u64 {
        self.meshes.load(Ordering::Relaxed)
    }

    fn allocate(&self, bytes: u64) -> Result<u64, UploadError> {
        let budget = self.budget;
        self.used
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| match budget {
                Some(budget) if used + bytes > budget => None,
                _ => Some(used + bytes),
            })
            .map_err(|used| UploadError::OutOfMemory {
                requested: bytes,
                available: budget.unwrap_or(u64::MAX).saturating_sub(used),
            })?;

        Ok(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl Device for HeadlessDevice {
    fn upload_texture(&self, pixmap: &Pixmap) -> Result<DeviceTexture, UploadError> {
        if pixmap.width == 0 || pixmap.height == 0 {
            return Err(UploadError::Rejected(format!(
                "texture extent {}x{}",
                pixmap.width, pixmap.height
            )));
        }
        let id = self.allocate(pixmap.data.len() as u64)?;
        self.textures.fetch_add(1, Ordering::Relaxed);
        log::trace!(
            "Uploaded {}x{} texture as {}",
            pixmap.width,
            pixmap.height,
            id
        );
        Ok(DeviceTexture(id))
    }

    fn upload_mesh(&self, vertices: &[Vertex], indices: &[u32]) -> Result<DeviceMesh, UploadError> {
        let bytes = bytemuck::cast_slice::<Vertex, u8>(vertices).len()
            + bytemuck::cast_slice::<u32, u8>(indices).len();
        let id = self.allocate(bytes as u64)?;
        self.meshes.fetch_add(1, Ordering::Relaxed);
        log::trace!(
            "Uploaded mesh with {} vertices and {} indices as {}",
            vertices.len(),
            indices.len(),
            id
        );
        Ok(DeviceMesh(id))
    }
}
