//! GPU mirrors of scene nodes and materials
//!
//! Entries are created lazily the first time a node or material is seen,
//! updated every frame, and dropped once the scene no longer has them.

use std::collections::{HashMap, HashSet};

use cgmath::{Matrix, Matrix4, SquareMatrix};
use wgpu::util::DeviceExt;

use crate::{
    gfx::{
        resources::material::{MaterialId, MaterialUniform},
        scene::{Mesh, NodeHandle, Scene},
    },
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// MUST match `Object` in `scene.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
}

impl ObjectUniform {
    pub fn from_model(model: Matrix4<f32>) -> Self {
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        Self {
            model: model.into(),
            normal: normal.into(),
        }
    }
}

pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    transform: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

pub struct GpuMaterial {
    uniform: UniformBuffer<MaterialUniform>,
    pub bind_group: wgpu::BindGroup,
}

pub struct GpuCache {
    object_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
    meshes: HashMap<NodeHandle, GpuMesh>,
    materials: HashMap<MaterialId, GpuMaterial>,
}

impl GpuCache {
    pub fn new(device: &wgpu::Device) -> Self {
        let object_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(device, "Object Bind Group Layout");
        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(device, "Material Bind Group Layout");

        Self {
            object_layout,
            material_layout,
            meshes: HashMap::new(),
            materials: HashMap::new(),
        }
    }

    pub fn object_layout(&self) -> &wgpu::BindGroupLayout {
        &self.object_layout.layout
    }

    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout.layout
    }

    /// Brings every entry in line with `scene` and prunes stale ones
    pub fn sync(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, scene: &Scene) {
        let mut live_nodes = HashSet::new();
        for (handle, node) in scene.nodes() {
            let Some(mesh) = node.drawable() else {
                continue;
            };
            live_nodes.insert(handle);

            let gpu_mesh = self
                .meshes
                .entry(handle)
                .or_insert_with(|| create_mesh(device, &self.object_layout, &node.name, mesh));
            gpu_mesh
                .transform
                .update_content(queue, ObjectUniform::from_model(node.transform.matrix()));
        }
        self.meshes.retain(|handle, _| live_nodes.contains(handle));

        for (name, material) in scene.material_manager.iter() {
            let gpu_material = self
                .materials
                .entry(name.clone())
                .or_insert_with(|| create_material(device, &self.material_layout, name));
            gpu_material.uniform.update_content(queue, material.to_uniform());
        }
        self.materials
            .retain(|name, _| scene.material(name).is_some());
    }

    pub fn mesh(&self, handle: NodeHandle) -> Option<&GpuMesh> {
        self.meshes.get(&handle)
    }

    pub fn material(&self, name: &str) -> Option<&GpuMaterial> {
        self.materials.get(name)
    }
}

fn create_mesh(
    device: &wgpu::Device,
    layout: &BindGroupLayoutWithDesc,
    name: &str,
    mesh: &Mesh,
) -> GpuMesh {
    log::debug!("Uploading mesh '{}' ({} indices)", name, mesh.index_count());

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Vertex Buffer", name)),
        contents: bytemuck::cast_slice(mesh.vertices()),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} Index Buffer", name)),
        contents: bytemuck::cast_slice(mesh.indices()),
        usage: wgpu::BufferUsages::INDEX,
    });
    let transform = UniformBuffer::new(device);
    let bind_group = BindGroupBuilder::new(layout)
        .resource(transform.binding_resource())
        .create(device, &format!("{} Object Bind Group", name));

    GpuMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.index_count(),
        transform,
        bind_group,
    }
}

fn create_material(
    device: &wgpu::Device,
    layout: &BindGroupLayoutWithDesc,
    name: &str,
) -> GpuMaterial {
    let uniform = UniformBuffer::new(device);
    let bind_group = BindGroupBuilder::new(layout)
        .resource(uniform.binding_resource())
        .create(device, &format!("{} Material Bind Group", name));
    GpuMaterial {
        uniform,
        bind_group,
    }
}
