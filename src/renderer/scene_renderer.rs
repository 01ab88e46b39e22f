//! Renderer for the forest scene.
//!
//! Every prop is drawn as its coloured volume box through one pipeline. The
//! geometry lives in three vertex buffers that change at different rates:
//!
//! 1. **Static**: ground, rocks, logs, decorations, the giant tree and the villager.
//!    Built once.
//! 2. **Trees**: standing trees and stumps. Rebuilt only when a tree is felled.
//! 3. **Dynamic**: chickens and the axe. Rewritten every frame.
//!
//! ## Shader Integration
//!
//! Works with `scene.wgsl` which expects:
//! ```wgsl
//! struct Uniforms {
//!     matrix: mat4x4<f32>,
//! }
//! @group(0) @binding(0) var<uniform> uniforms: Uniforms;
//! ```

use crate::config::{FAR_PLANE, FIELD_OF_VIEW, NEAR_PLANE, NPC_POSITION};
use crate::game::GameState;
use crate::game::camera::CameraPose;
use crate::game::collision::AxisAlignedBox;
use crate::game::scene::{self, SceneError, SceneObject, SceneRegistry};
use crate::game::world::World;
use crate::math::deg_to_rad;
use crate::math::mat::Mat4;
use crate::renderer::pipeline_builder::PipelineBuilder;
use crate::renderer::primitives::{BOX_VERTEX_COUNT, Uniforms, Vertex, push_box};
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// The ground plane is stretched to cover the whole scatter area.
const GROUND_SCALE: [f32; 3] = [8.0, 1.0, 8.0];
const GIANT_TREE_SCALE: f32 = 2.0;
const KNIGHT_SCALE: f32 = 6.8;
/// Trees, stumps and logs are sunk slightly into the ground.
const SINK_DEPTH: f32 = -0.1;
const CHICKEN_HEIGHT: f32 = 0.1;
const TRUNK_TINT: [u8; 4] = [96, 66, 40, 255];

/// Chickens plus the axe.
const DYNAMIC_VERTEX_CAPACITY: usize = 4 * BOX_VERTEX_COUNT;

/// A vertex buffer and how many vertices to draw from it.
struct Mesh {
    buffer: wgpu::Buffer,
    vertex_count: u32,
}

impl Mesh {
    fn new(device: &wgpu::Device, label: &str, vertices: &[Vertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass) {
        if self.vertex_count > 0 {
            pass.set_vertex_buffer(0, self.buffer.slice(..));
            pass.draw(0..self.vertex_count, 0..1);
        }
    }
}

/// The volumes that are redrawn after setup, resolved once from the registry.
#[derive(Debug, Clone, Copy)]
pub struct PropShapes {
    /// Standing tree, split into trunk and canopy.
    pub tree: SceneObject,
    /// Drawn in place of a felled tree.
    pub stump: SceneObject,
    /// One chicken of the flock.
    pub chicken: SceneObject,
    /// The axe held in front of the camera.
    pub axe: SceneObject,
}

impl PropShapes {
    /// Looks up every shape, failing on the first missing one.
    pub fn from_registry(registry: &SceneRegistry) -> Result<Self, SceneError> {
        Ok(Self {
            tree: *registry.object(scene::TREE)?,
            stump: *registry.object(scene::STUMP)?,
            chicken: *registry.object(scene::CHICKEN)?,
            axe: *registry.object(scene::AXE)?,
        })
    }
}

/// Draws the forest.
///
/// # Fields
///
/// - `pipeline` - Render pipeline for coloured boxes with depth testing
/// - `uniform_buffer` - GPU buffer storing the view-projection matrix
/// - `uniform_bind_group` - Bind group linking the uniform buffer to binding 0
/// - `depth_texture` - Depth buffer, recreated when the surface size changes
pub struct SceneRenderer {
    /// Depth-tested pipeline for coloured boxes.
    pub pipeline: wgpu::RenderPipeline,
    /// View-projection matrix.
    pub uniform_buffer: wgpu::Buffer,
    /// Binds the uniform buffer at binding 0.
    pub uniform_bind_group: wgpu::BindGroup,
    /// Depth buffer sized to the surface.
    pub depth_texture: wgpu::Texture,
    static_mesh: Mesh,
    tree_mesh: Mesh,
    /// Felled count the tree mesh was built for.
    trees_felled: usize,
    dynamic_buffer: wgpu::Buffer,
    dynamic_count: u32,
    shapes: PropShapes,
}

impl SceneRenderer {
    /// Builds the pipeline and uploads the static forest.
    pub fn new(
        device: &wgpu::Device,
        surface_config: &wgpu::SurfaceConfiguration,
        registry: &SceneRegistry,
        world: &World,
    ) -> Result<Self, SceneError> {
        let uniforms = Uniforms::new();
        let uniform_buffer = uniforms.create_buffer(device);
        let (uniform_bind_group, uniform_bind_group_layout) =
            uniforms.create_bind_group(&uniform_buffer, device);

        let pipeline = PipelineBuilder::new(
            device,
            surface_config.format,
            include_str!("shaders/scene.wgsl"),
        )
        .with_label("Scene Pipeline")
        .with_vertex_buffer(Vertex::desc())
        .with_bind_group_layout(&uniform_bind_group_layout)
        .with_no_culling()
        .with_depth_stencil(wgpu::DepthStencilState {
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            format: DEPTH_FORMAT,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
        .build();

        let shapes = PropShapes::from_registry(registry)?;
        let static_vertices = static_vertices(registry, world)?;
        let tree_vertices = tree_vertices(&shapes, world);
        log::info!(
            "Scene geometry: {} static vertices, {} tree vertices",
            static_vertices.len(),
            tree_vertices.len()
        );

        let dynamic_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Dynamic Vertex Buffer"),
            size: (DYNAMIC_VERTEX_CAPACITY * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            pipeline,
            uniform_buffer,
            uniform_bind_group,
            depth_texture: create_depth_texture(device, surface_config.width, surface_config.height),
            static_mesh: Mesh::new(device, "Static Vertex Buffer", &static_vertices),
            tree_mesh: Mesh::new(device, "Tree Vertex Buffer", &tree_vertices),
            trees_felled: world.felled_count(),
            dynamic_buffer,
            dynamic_count: 0,
            shapes,
        })
    }

    /// Returns a view of the depth texture, recreating it if the size changed.
    pub fn update_depth_texture(
        &mut self,
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        if self.depth_texture.width() != width || self.depth_texture.height() != height {
            self.depth_texture = create_depth_texture(device, width, height);
        }
        self.depth_texture
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Uploads this frame's camera and moving props, and rebuilds the trees if one fell.
    pub fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        game_state: &GameState,
        aspect: f32,
    ) {
        let pose = game_state.camera.pose(&game_state.player);
        let uniforms = Uniforms {
            matrix: view_projection(pose, aspect).into(),
        };
        queue.write_buffer(&self.uniform_buffer, 0, uniforms.as_bytes());

        let felled = game_state.world.felled_count();
        if felled != self.trees_felled {
            log::debug!("Rebuilding tree geometry, {felled} stumps");
            let vertices = tree_vertices(&self.shapes, &game_state.world);
            self.tree_mesh = Mesh::new(device, "Tree Vertex Buffer", &vertices);
            self.trees_felled = felled;
        }

        let vertices = dynamic_vertices(&self.shapes, game_state);
        self.dynamic_count = vertices.len() as u32;
        if !vertices.is_empty() {
            queue.write_buffer(&self.dynamic_buffer, 0, bytemuck::cast_slice(&vertices));
        }
    }

    /// Draws the static, tree and dynamic meshes.
    pub fn render_scene(&self, pass: &mut wgpu::RenderPass) {
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        self.static_mesh.draw(pass);
        self.tree_mesh.draw(pass);
        if self.dynamic_count > 0 {
            pass.set_vertex_buffer(0, self.dynamic_buffer.slice(..));
            pass.draw(0..self.dynamic_count, 0..1);
        }
    }
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}

/// Projection times view for the camera pose.
pub fn view_projection(pose: CameraPose, aspect: f32) -> Mat4 {
    let projection = Mat4::perspective(deg_to_rad(FIELD_OF_VIEW), aspect, NEAR_PLANE, FAR_PLANE);
    projection.multiply(&Mat4::look_to(pose.eye.into(), pose.view.into()))
}

fn placed(position: [f32; 3], scale: f32) -> Mat4 {
    Mat4::translation(position[0], position[1], position[2])
        .multiply(&Mat4::scaling(scale, scale, scale))
}

/// Geometry that never changes after generation.
pub fn static_vertices(registry: &SceneRegistry, world: &World) -> Result<Vec<Vertex>, SceneError> {
    let mut vertices = Vec::new();

    let ground = registry.object(scene::GROUND)?;
    let [sx, sy, sz] = GROUND_SCALE;
    push_box(&mut vertices, &ground.bounds, &Mat4::scaling(sx, sy, sz), ground.tint);

    let rock = registry.object(scene::ROCK)?;
    for prop in &world.rocks {
        push_box(&mut vertices, &rock.bounds, &placed(prop.position, prop.scale), rock.tint);
    }

    let log = registry.object(scene::LOG)?;
    for prop in &world.logs {
        let [x, _, z] = prop.position;
        push_box(&mut vertices, &log.bounds, &placed([x, SINK_DEPTH, z], prop.scale), log.tint);
    }

    for decoration in &world.decorations {
        let object = registry.object(scene::DECORATIONS[decoration.kind])?;
        push_box(&mut vertices, &object.bounds, &placed(decoration.position, 1.0), object.tint);
    }

    let giant = registry.object(scene::GIANT_TREE)?;
    push_box(&mut vertices, &giant.bounds, &placed([0.0; 3], GIANT_TREE_SCALE), giant.tint);

    let knight = registry.object(scene::KNIGHT)?;
    let transform = placed(NPC_POSITION, KNIGHT_SCALE).multiply(&Mat4::rotation_y(180.0));
    push_box(&mut vertices, &knight.bounds, &transform, knight.tint);

    Ok(vertices)
}

/// Splits a tree volume into a narrow trunk and a canopy over its upper three quarters.
fn trunk_and_canopy(bounds: &AxisAlignedBox) -> (AxisAlignedBox, AxisAlignedBox) {
    let [cx, _, cz] = bounds.center();
    let [width, height, depth] = bounds.size();
    let canopy_base = bounds.min[1] + height * 0.25;

    let trunk = AxisAlignedBox::new(
        [cx - width * 0.08, bounds.min[1], cz - depth * 0.08],
        [cx + width * 0.08, canopy_base, cz + depth * 0.08],
    );
    let canopy = AxisAlignedBox::new([bounds.min[0], canopy_base, bounds.min[2]], bounds.max);
    (trunk, canopy)
}

/// Standing trees and stumps.
pub fn tree_vertices(shapes: &PropShapes, world: &World) -> Vec<Vertex> {
    let (trunk, canopy) = trunk_and_canopy(&shapes.tree.bounds);
    let mut vertices = Vec::with_capacity(world.trees.len() * 2 * BOX_VERTEX_COUNT);

    for tree in &world.trees {
        match tree.stump {
            None => {
                let [x, _, z] = tree.position;
                let transform = placed([x, SINK_DEPTH, z], tree.scale);
                push_box(&mut vertices, &trunk, &transform, TRUNK_TINT);
                push_box(&mut vertices, &canopy, &transform, shapes.tree.tint);
            }
            Some([x, z]) => {
                let transform = placed([x, SINK_DEPTH, z], tree.scale);
                push_box(&mut vertices, &shapes.stump.bounds, &transform, shapes.stump.tint);
            }
        }
    }
    vertices
}

/// Chickens, plus the axe once the player has control.
pub fn dynamic_vertices(shapes: &PropShapes, game_state: &GameState) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(DYNAMIC_VERTEX_CAPACITY);
    let clock = game_state.clock;
    let wobble = ((8.0 * clock).sin() * 0.05).to_degrees();

    for chicken in game_state.flock.chickens(clock) {
        let [x, z] = chicken.position;
        let transform = Mat4::translation(x, CHICKEN_HEIGHT, z)
            .multiply(&Mat4::rotation_x(wobble))
            .multiply(&Mat4::rotation_y(chicken.heading));
        push_box(&mut vertices, &shapes.chicken.bounds, &transform, shapes.chicken.tint);
    }

    if game_state.camera.is_free_look() {
        let pose = game_state.camera.pose(&game_state.player);
        let [ex, ey, ez] = pose.eye;
        let [vx, _, vz] = pose.view;
        let transform = Mat4::translation(ex + vx * 0.1, ey - 0.65, ez + vz * 0.1)
            .multiply(&Mat4::rotation_y(game_state.player.camera_theta.to_degrees() + 90.0))
            .multiply(&Mat4::rotation_x(-20.0))
            .multiply(&Mat4::rotation_z(game_state.chop.axe_angle));
        push_box(&mut vertices, &shapes.axe.bounds, &transform, shapes.axe.tint);
    }

    vertices
}
