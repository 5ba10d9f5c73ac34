use crate::lights::LightRig;
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use skyscroll_assets::{TextureHandle, TextureId, TextureImage};
use skyscroll_common::ObjectId;
use skyscroll_scene::{Geometry, Mesh, MeshData, PerspectiveCamera, Scene};
use std::collections::HashMap;
use wgpu::util::DeviceExt;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    camera_position: [f32; 4],
    light_position: [f32; 4],
    light_color: [f32; 4],
    ambient_color: [f32; 4],
}

impl FrameUniform {
    pub(crate) fn new(camera: &PerspectiveCamera, lights: &LightRig) -> Self {
        let p = camera.position;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: [p.x, p.y, p.z, 1.0],
            light_position: lights.point_position,
            light_color: lights.point_color,
            ambient_color: lights.ambient,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    flags: [f32; 4],
}

impl ObjectUniform {
    /// `has_map` and `has_normal` reflect what is bound this frame, not what
    /// the material asks for.
    pub(crate) fn new(mesh: &Mesh, has_map: bool, has_normal: bool) -> Self {
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        Self {
            model: mesh.transform.matrix().to_cols_array_2d(),
            color: mesh.material.color.to_linear_rgba(),
            flags: [
                flag(mesh.material.is_lit()),
                flag(has_map),
                flag(has_normal),
                0.0,
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct Vertex {
    position: [f32; 3],
    normal: [f32; 3],
    uv: [f32; 2],
}

/// Interleave tessellated attributes into the vertex buffer layout.
pub(crate) fn interleave(data: &MeshData) -> Vec<Vertex> {
    data.positions
        .iter()
        .zip(&data.normals)
        .zip(&data.uvs)
        .map(|((p, n), uv)| Vertex {
            position: *p,
            normal: *n,
            uv: *uv,
        })
        .collect()
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Texture ids currently bound into an object's bind group.
type Bound = (Option<TextureId>, Option<TextureId>);

struct GpuObject {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    bound: Bound,
}

struct Background {
    id: TextureId,
    bind_group: wgpu::BindGroup,
}

/// wgpu scene renderer: owns pipelines and GPU-side caches, draws into a
/// caller-provided target view.
pub struct WgpuRenderer {
    mesh_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    background_layout: wgpu::BindGroupLayout,
    repeat_sampler: wgpu::Sampler,
    clamp_sampler: wgpu::Sampler,
    white: wgpu::TextureView,
    flat_normal: wgpu::TextureView,
    depth_texture: wgpu::TextureView,
    meshes: HashMap<[u32; 5], GpuMesh>,
    textures: HashMap<TextureId, wgpu::TextureView>,
    objects: HashMap<ObjectId, GpuObject>,
    background: Option<Background>,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frame_uniform"),
            contents: bytemuck::bytes_of(&FrameUniform::new(
                &PerspectiveCamera::default(),
                &LightRig::default(),
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_layout"),
            entries: &[uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT),
                texture_entry(1),
                texture_entry(2),
                sampler_entry(3),
            ],
        });
        let background_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("background_layout"),
                entries: &[texture_entry(0), sampler_entry(1)],
            });

        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::MESH_SHADER.into()),
        });
        let mesh_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });
        let mesh_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&mesh_layout),
            vertex: wgpu::VertexState {
                module: &mesh_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x3,
                        2 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &mesh_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::BACKGROUND_SHADER.into()),
        });
        let background_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("background_pipeline_layout"),
                bind_group_layouts: &[&background_layout],
                push_constant_ranges: &[],
            });
        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&background_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_background"),
                compilation_options: Default::default(),
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_background"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let repeat_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("repeat_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let clamp_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("clamp_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let white = upload(
            device,
            queue,
            "white_placeholder",
            &TextureImage::solid([255, 255, 255, 255]),
            true,
        );
        let flat_normal = upload(
            device,
            queue,
            "flat_normal_placeholder",
            &TextureImage::solid([128, 128, 255, 255]),
            false,
        );

        Self {
            mesh_pipeline,
            background_pipeline,
            frame_buffer,
            frame_bind_group,
            object_layout,
            background_layout,
            repeat_sampler,
            clamp_sampler,
            white,
            flat_normal,
            depth_texture: create_depth_texture(device, width, height),
            meshes: HashMap::new(),
            textures: HashMap::new(),
            objects: HashMap::new(),
            background: None,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = create_depth_texture(device, width, height);
    }

    /// Render one frame: background, then every mesh.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) {
        let lights = LightRig::from_scene(scene);
        queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&FrameUniform::new(camera, &lights)),
        );

        self.prepare_background(device, queue, scene);

        let mut draws: Vec<(ObjectId, [u32; 5])> = Vec::with_capacity(scene.mesh_count());
        for (id, mesh) in scene.meshes() {
            let key = self.prepare_geometry(device, &mesh.geometry);
            self.prepare_object(device, queue, id, mesh);
            draws.push((id, key));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            if let Some(background) = &self.background {
                pass.set_pipeline(&self.background_pipeline);
                pass.set_bind_group(0, &background.bind_group, &[]);
                pass.draw(0..3, 0..1);
            }

            pass.set_pipeline(&self.mesh_pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for (id, key) in &draws {
                let (Some(object), Some(gpu_mesh)) = (self.objects.get(id), self.meshes.get(key))
                else {
                    continue;
                };
                pass.set_bind_group(1, &object.bind_group, &[]);
                pass.set_vertex_buffer(0, gpu_mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(gpu_mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..gpu_mesh.index_count, 0, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn prepare_background(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        let Some(handle) = scene.background() else {
            self.background = None;
            return;
        };
        let Some(id) = self.resident_texture(device, queue, handle, true) else {
            return;
        };
        if self.background.as_ref().is_some_and(|b| b.id == id) {
            return;
        }
        let Some(texture) = self.textures.get(&id) else {
            return;
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("background_bind_group"),
            layout: &self.background_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(texture),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.clamp_sampler),
                },
            ],
        });
        tracing::debug!("background bound ({})", handle.path().display());
        self.background = Some(Background { id, bind_group });
    }

    fn prepare_geometry(&mut self, device: &wgpu::Device, geometry: &Geometry) -> [u32; 5] {
        let key = geometry.cache_key();
        self.meshes.entry(key).or_insert_with(|| {
            let data = geometry.tessellate();
            tracing::debug!(
                "uploading {} geometry: {} vertices, {} triangles",
                geometry.kind(),
                data.vertex_count(),
                data.triangle_count()
            );
            GpuMesh {
                vertex_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_vertices"),
                    contents: bytemuck::cast_slice(&interleave(&data)),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
                index_buffer: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("mesh_indices"),
                    contents: bytemuck::cast_slice(&data.indices),
                    usage: wgpu::BufferUsages::INDEX,
                }),
                index_count: data.indices.len() as u32,
            }
        });
        key
    }

    fn prepare_object(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: ObjectId,
        mesh: &Mesh,
    ) {
        let material = &mesh.material;
        let map = material
            .map
            .as_ref()
            .and_then(|h| self.resident_texture(device, queue, h, true));
        let normal = material
            .normal_map
            .as_ref()
            .and_then(|h| self.resident_texture(device, queue, h, false));
        let bound = (map, normal);

        let uniform = ObjectUniform::new(mesh, map.is_some(), normal.is_some());

        if let Some(object) = self.objects.get(&id) {
            if object.bound == bound {
                queue.write_buffer(&object.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
                return;
            }
        }

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("object_uniform"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let map_view = map.and_then(|t| self.textures.get(&t)).unwrap_or(&self.white);
        let normal_view = normal
            .and_then(|t| self.textures.get(&t))
            .unwrap_or(&self.flat_normal);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bind_group"),
            layout: &self.object_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(map_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(normal_view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.repeat_sampler),
                },
            ],
        });
        self.objects.insert(
            id,
            GpuObject {
                uniform_buffer,
                bind_group,
                bound,
            },
        );
    }

    /// Upload a resolved texture on first sight. `None` while the handle is
    /// pending or after it failed.
    fn resident_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        handle: &TextureHandle,
        srgb: bool,
    ) -> Option<TextureId> {
        let id = handle.id();
        if self.textures.contains_key(&id) {
            return Some(id);
        }
        let image = handle.image()?;
        let label = handle.path().display().to_string();
        tracing::debug!("uploading texture {label} ({}x{})", image.width, image.height);
        let view = upload(device, queue, &label, &image, srgb);
        self.textures.insert(id, view);
        Some(id)
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

/// Color data is sRGB-encoded; normal maps are raw vectors.
pub(crate) fn texture_format(srgb: bool) -> wgpu::TextureFormat {
    if srgb {
        wgpu::TextureFormat::Rgba8UnormSrgb
    } else {
        wgpu::TextureFormat::Rgba8Unorm
    }
}

fn upload(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &TextureImage,
    srgb: bool,
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width.max(1),
                height: image.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: texture_format(srgb),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    texture.create_view(&Default::default())
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
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
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use skyscroll_common::Color;
    use skyscroll_scene::Material;

    #[test]
    fn uniform_sizes_match_wgsl_layout() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 128);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 96);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn interleave_keeps_every_vertex() {
        let data = Geometry::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
        .tessellate();
        let vertices = interleave(&data);
        assert_eq!(vertices.len(), data.vertex_count());
        assert_eq!(vertices[0].position, data.positions[0]);
        assert_eq!(vertices[0].uv, data.uvs[0]);
    }

    #[test]
    fn object_flags_follow_material_and_binding() {
        let lit = Mesh::new(
            "moon",
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::standard(Color::WHITE),
        )
        .at(Vec3::new(1.0, 2.0, 3.0));
        let u = ObjectUniform::new(&lit, true, false);
        assert_eq!(u.flags, [1.0, 1.0, 0.0, 0.0]);
        assert_eq!(u.model[3], [1.0, 2.0, 3.0, 1.0]);

        let unlit = Mesh::new(lit.name.clone(), lit.geometry, Material::basic());
        assert_eq!(ObjectUniform::new(&unlit, false, false).flags[0], 0.0);
    }

    #[test]
    fn frame_uniform_carries_camera_and_lights() {
        let mut camera = PerspectiveCamera::default();
        camera.position = Vec3::new(-3.0, 0.0, 30.0);
        let rig = LightRig {
            point_position: [5.0, 5.0, 5.0, 1.0],
            point_color: [1.0; 4],
            ambient: [0.5, 0.5, 0.5, 1.0],
        };
        let u = FrameUniform::new(&camera, &rig);
        assert_eq!(u.camera_position, [-3.0, 0.0, 30.0, 1.0]);
        assert_eq!(u.light_position, rig.point_position);
        assert_eq!(u.ambient_color, rig.ambient);
        assert_eq!(u.view_proj, camera.view_projection().to_cols_array_2d());
    }

    #[test]
    fn color_textures_are_srgb() {
        assert!(texture_format(true).is_srgb());
        assert!(!texture_format(false).is_srgb());
    }
}
