use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

/// Point light. Constant for the lifetime of a demo.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub intensity: f32,
    pub color: [f32; 4],
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::new(5.0, 0.0, 0.0),
            intensity: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Blinn-Phong coefficients. With `kd` and `ks` at zero the shading is ambient only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: f32,
    pub kd: f32,
    pub ks: f32,
    pub shininess: f32,
}

impl Material {
    pub const fn ambient_only(ambient: f32) -> Self {
        Self {
            ambient,
            kd: 0.0,
            ks: 0.0,
            shininess: 1.0,
        }
    }

    pub const BLINN_PHONG: Self = Self {
        ambient: 0.7,
        kd: 5.0,
        ks: 20.0,
        shininess: 32.0,
    };

    /// Full light color, unaffected by position.
    pub const UNLIT: Self = Self::ambient_only(1.0);
}

/// Uniform block consumed by `blinn_phong.wgsl`, one per draw item.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub model: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Maps object space into the space the light and eye live in. Only
    /// translations belong here, so the lit side turns with the object.
    pub lighting: [[f32; 4]; 4],
    /// xyz position, w intensity.
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    pub view_position: [f32; 4],
    /// ambient, kd, ks, shininess.
    pub material: [f32; 4],
}

impl FrameUniform {
    pub fn new(
        model: Mat4,
        view: Mat4,
        projection: Mat4,
        eye: Vec3,
        light: &Light,
        material: &Material,
    ) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            lighting: Mat4::IDENTITY.to_cols_array_2d(),
            light_position: light.position.extend(light.intensity).to_array(),
            light_color: light.color,
            view_position: eye.extend(1.0).to_array(),
            material: [
                material.ambient,
                material.kd,
                material.ks,
                material.shininess,
            ],
        }
    }

    pub fn with_lighting(mut self, lighting: Mat4) -> Self {
        self.lighting = lighting.to_cols_array_2d();
        self
    }

    pub fn mvp(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection)
            * Mat4::from_cols_array_2d(&self.view)
            * Mat4::from_cols_array_2d(&self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_320_bytes() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 320);
    }

    #[test]
    fn packs_light_and_material() {
        let light = Light {
            position: Vec3::new(1.0, 2.0, 3.0),
            intensity: 0.5,
            color: [1.0, 0.5, 0.25, 1.0],
        };
        let u = FrameUniform::new(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::new(10.0, 10.0, 10.0),
            &light,
            &Material::BLINN_PHONG,
        );
        assert_eq!(u.light_position, [1.0, 2.0, 3.0, 0.5]);
        assert_eq!(u.light_color, [1.0, 0.5, 0.25, 1.0]);
        assert_eq!(u.view_position, [10.0, 10.0, 10.0, 1.0]);
        assert_eq!(u.material, [0.7, 5.0, 20.0, 32.0]);
        assert_eq!(u.lighting, Mat4::IDENTITY.to_cols_array_2d());
    }

    #[test]
    fn lighting_matrix_leaves_mvp_alone() {
        let model = Mat4::from_rotation_y(1.0);
        let shift = Mat4::from_translation(Vec3::Z);
        let plain = FrameUniform::new(
            model,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            Vec3::ZERO,
            &Light::default(),
            &Material::BLINN_PHONG,
        );
        let shifted = plain.with_lighting(shift);
        assert_eq!(shifted.lighting, shift.to_cols_array_2d());
        assert_eq!(shifted.mvp(), plain.mvp());
    }

    #[test]
    fn mvp_composes_projection_view_model() {
        let model = Mat4::from_rotation_x(0.3);
        let view = Mat4::look_at_rh(Vec3::splat(10.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(0.4, 1.5, 0.1, 20.0);
        let u = FrameUniform::new(
            model,
            view,
            proj,
            Vec3::splat(10.0),
            &Light::default(),
            &Material::UNLIT,
        );
        assert!(u.mvp().abs_diff_eq(proj * view * model, 1e-5));
    }
}
