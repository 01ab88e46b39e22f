//! Uniform buffer utilities and box geometry for wgpu rendering.
//!
//! This module provides the [`Uniforms`] struct for storing and uploading uniform data
//! (such as the view-projection matrix) to the GPU, the [`Vertex`] layout, and
//! [`push_box`], which turns a scene volume into flat-shaded triangles.

use crate::game::collision::AxisAlignedBox;
use crate::math::mat::Mat4;
use wgpu::util::DeviceExt;

/// Uniforms for the main render pipeline.
///
/// This struct stores a 4x4 matrix (the view-projection matrix) to be sent to the GPU as a uniform buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    /// The 4x4 transformation matrix.
    pub matrix: [[f32; 4]; 4],
}

impl Default for Uniforms {
    /// Returns a new [`Uniforms`] holding the identity matrix.
    fn default() -> Self {
        Self::new()
    }
}

impl Uniforms {
    /// Creates a new [`Uniforms`] holding the identity matrix.
    pub fn new() -> Self {
        Self {
            matrix: Mat4::identity().into(),
        }
    }

    /// Returns the raw bytes of the uniform struct for uploading to the GPU.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    /// Creates a GPU buffer containing the uniform data.
    ///
    /// # Arguments
    /// * `device` - The wgpu device to create the buffer with.
    ///
    /// # Returns
    /// A [`wgpu::Buffer`] with the uniform data, ready for use as a uniform buffer.
    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: self.as_bytes(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Creates a bind group and layout for the uniform buffer.
    ///
    /// # Arguments
    /// * `buffer` - The uniform buffer to bind.
    /// * `device` - The wgpu device to create the bind group and layout.
    ///
    /// # Returns
    /// A tuple of (`wgpu::BindGroup`, `wgpu::BindGroupLayout`) for binding the uniform buffer in a pipeline.
    pub fn create_bind_group(
        &self,
        buffer: &wgpu::Buffer,
        device: &wgpu::Device,
    ) -> (wgpu::BindGroup, wgpu::BindGroupLayout) {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("uniform_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });
        (bind_group, layout)
    }
}

/// Vertex data for the forest geometry.
///
/// Each vertex contains:
/// - `position`: 3D position in world space.
/// - `color`: RGBA color (as 4 normalized u8 values), already shaded per face.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// 3D position in world space.
    pub position: [f32; 3],
    /// RGBA color (normalized 0-255).
    pub color: [u8; 4],
}

impl Vertex {
    /// Returns the vertex buffer layout for use in a wgpu pipeline.
    ///
    /// This describes the memory layout of [`Vertex`] for the GPU.
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position (3 floats)
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Color (4 normalized bytes)
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Unorm8x4,
                },
            ],
        }
    }
}

/// Number of vertices [`push_box`] appends.
pub const BOX_VERTEX_COUNT: usize = 36;

/// Corner indices of each face, counter-clockwise seen from outside, with the face's light level.
///
/// Corners are numbered by bits: bit 0 picks max X, bit 1 max Y, bit 2 max Z.
const BOX_FACES: [([usize; 4], f32); 6] = [
    ([2, 6, 7, 3], 1.0),  // top
    ([0, 1, 5, 4], 0.45), // bottom
    ([4, 5, 7, 6], 0.8),  // +Z
    ([1, 0, 2, 3], 0.7),  // -Z
    ([1, 3, 7, 5], 0.85), // +X
    ([0, 4, 6, 2], 0.6),  // -X
];

/// Appends the twelve triangles of `bounds`, moved by `transform`, to `vertices`.
///
/// Each face gets a fixed light level so boxes read as solid without normals.
pub fn push_box(
    vertices: &mut Vec<Vertex>,
    bounds: &AxisAlignedBox,
    transform: &Mat4,
    tint: [u8; 4],
) {
    let corners: [[f32; 3]; 8] = std::array::from_fn(|i| {
        let pick = |bit: usize, axis: usize| {
            if i & (1 << bit) != 0 {
                bounds.max[axis]
            } else {
                bounds.min[axis]
            }
        };
        transform.transform_point([pick(0, 0), pick(1, 1), pick(2, 2)])
    });

    for (face, light) in BOX_FACES {
        let color = shade(tint, light);
        for corner in [face[0], face[1], face[2], face[0], face[2], face[3]] {
            vertices.push(Vertex {
                position: corners[corner],
                color,
            });
        }
    }
}

fn shade(tint: [u8; 4], light: f32) -> [u8; 4] {
    let [r, g, b, a] = tint;
    let scale = |c: u8| (c as f32 * light).round() as u8;
    [scale(r), scale(g), scale(b), a]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> AxisAlignedBox {
        AxisAlignedBox::new([-1.0, 0.0, -1.0], [1.0, 2.0, 1.0])
    }

    #[test]
    fn test_box_vertex_count_and_extent() {
        let mut vertices = Vec::new();
        push_box(&mut vertices, &unit_box(), &Mat4::identity(), [255; 4]);
        assert_eq!(vertices.len(), BOX_VERTEX_COUNT);

        for vertex in &vertices {
            let [x, y, z] = vertex.position;
            assert!(x == -1.0 || x == 1.0);
            assert!(y == 0.0 || y == 2.0);
            assert!(z == -1.0 || z == 1.0);
        }
    }

    /// The transform is applied to every corner.
    #[test]
    fn test_box_is_transformed() {
        let mut vertices = Vec::new();
        let transform = Mat4::translation(10.0, 0.0, -5.0).multiply(&Mat4::scaling(2.0, 2.0, 2.0));
        push_box(&mut vertices, &unit_box(), &transform, [255; 4]);

        let max_x = vertices.iter().map(|v| v.position[0]).fold(f32::MIN, f32::max);
        let max_y = vertices.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 12.0);
        assert_eq!(max_y, 4.0);
    }

    /// The top face is lit fully; the others are darker, and alpha is untouched.
    #[test]
    fn test_face_shading() {
        let mut vertices = Vec::new();
        push_box(&mut vertices, &unit_box(), &Mat4::identity(), [200, 100, 50, 255]);
        assert_eq!(vertices[0].color, [200, 100, 50, 255]);
        assert!(vertices[6].color[0] < 200);
        assert!(vertices.iter().all(|v| v.color[3] == 255));
    }
}
