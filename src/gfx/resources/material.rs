//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and nodes reference
//! them by name. GPU uniform buffers for materials are owned by the render
//! engine's cache, so this module stays plain data.

use std::collections::HashMap;

/// Material ID for referencing materials
pub type MaterialId = String;

/// GPU uniform data for materials. MUST match `Material` in `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    /// rgb color, alpha = opacity
    pub base_color: [f32; 4],
    /// x = lit flag, y = reflectivity, z = normal map strength, w = refraction ratio
    pub params: [f32; 4],
}

/// Surface description shared by every node that references it
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub color: [f32; 3],
    pub opacity: f32,
    /// Whether scene lights affect this surface
    pub lit: bool,
    /// Mix factor towards the environment reflection (0 = none)
    pub reflectivity: f32,
    /// Index ratio for environment refraction (0 = disabled)
    pub refraction_ratio: f32,
    /// Strength of the scrolling normal map (0 = disabled)
    pub normal_scale: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            color: [0.8, 0.8, 0.8],
            opacity: 1.0,
            lit: true,
            reflectivity: 0.0,
            refraction_ratio: 0.0,
            normal_scale: 0.0,
        }
    }
}

impl Material {
    pub fn new(name: &str, color: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            color,
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn unlit(mut self) -> Self {
        self.lit = false;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity.clamp(0.0, 1.0);
        self
    }

    pub fn with_refraction(mut self, ratio: f32) -> Self {
        self.refraction_ratio = ratio.max(0.0);
        self
    }

    pub fn with_normal_map(mut self, scale: f32) -> Self {
        self.normal_scale = scale.max(0.0);
        self
    }

    /// Transparent materials are drawn after opaque ones, sorted back to front
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }

    pub fn to_uniform(&self) -> MaterialUniform {
        MaterialUniform {
            base_color: [self.color[0], self.color[1], self.color[2], self.opacity],
            params: [
                if self.lit { 1.0 } else { 0.0 },
                self.reflectivity,
                self.normal_scale,
                self.refraction_ratio,
            ],
        }
    }
}

/// Manages all materials of a scene
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material_id: MaterialId,
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialManager {
    /// Creates a new material manager holding only the default material
    pub fn new() -> Self {
        let default_material = Material::default();
        let default_material_id = default_material.name.clone();
        let mut materials = HashMap::new();
        materials.insert(default_material_id.clone(), default_material);

        Self {
            materials,
            default_material_id,
        }
    }

    /// Adds or replaces a material, keyed by its name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.materials[&self.default_material_id]
    }

    /// Gets the material for a node, falling back to the default material
    /// when none is assigned or the assigned one doesn't exist
    pub fn get_material_for_object(&self, material_id: Option<&str>) -> &Material {
        material_id
            .and_then(|id| self.get_material(id))
            .unwrap_or_else(|| self.get_default_material())
    }

    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MaterialId, &Material)> {
        self.materials.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_falls_back_to_default() {
        let mut manager = MaterialManager::new();
        manager.add_material(Material::new("water", [0.1, 0.3, 0.5]));

        assert_eq!(manager.get_material_for_object(Some("water")).name, "water");
        assert_eq!(manager.get_material_for_object(Some("missing")).name, "default");
        assert_eq!(manager.get_material_for_object(None).name, "default");
        assert_eq!(manager.list_materials().len(), 2);
    }

    #[test]
    fn test_uniform_packs_flags() {
        let material = Material::new("glass", [1.0, 0.5, 0.0])
            .with_opacity(0.4)
            .unlit()
            .with_reflectivity(2.0)
            .with_refraction(0.75);
        let uniform = material.to_uniform();

        assert_eq!(uniform.base_color, [1.0, 0.5, 0.0, 0.4]);
        assert_eq!(uniform.params, [0.0, 1.0, 0.0, 0.75]);
        assert!(material.is_transparent());
    }
}
