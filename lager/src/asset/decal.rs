use crate::asset::MaterialDesc;
use crate::device::Vertex;

/// World-placed decal: a textured quad of half-extent `scale_x` by `scale_y`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DecalDesc {
    pub material: MaterialDesc,
    pub scale_x: f32,
    pub scale_y: f32,
    pub two_sided: bool,
}

/// Quad in the xy-plane facing -z. Two-sided decals get the back faces as extra indices.
pub fn decal_geometry(scale_x: f32, scale_y: f32, two_sided: bool) -> (Vec<Vertex>, Vec<u32>) {
    let v = |x: f32, y: f32, u: f32, v: f32| Vertex {
        pos: [x * scale_x, y * scale_y, 0.0],
        norm: [0.0, 0.0, -1.0],
        uv: [u, v],
        color: 0xFFFF_FFFF,
    };
    let vertices = vec![
        v(-1.0, -1.0, 0.0, 1.0),
        v(1.0, -1.0, 1.0, 1.0),
        v(1.0, 1.0, 1.0, 0.0),
        v(-1.0, 1.0, 0.0, 0.0),
    ];

    let mut indices = vec![0, 1, 2, 0, 2, 3];
    if two_sided {
        indices.extend_from_slice(&[0, 2, 1, 0, 3, 2]);
    }

    (vertices, indices)
}
