mod demo;

pub use demo::{DemoKind, MeshSource};

use glam::{Mat4, Vec3};
use phong_3d::{FrameUniform, Light, Material};
use phong_camera::{
    Axis, LookAtCamera, Perspective, RotationState, Transforms, compute_transforms,
};
use rand::Rng;

pub const DEFAULT_BACKGROUND: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Increments applied by one button press.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steps {
    pub rotation: f32,
    pub zoom: f32,
    pub movement: f32,
}

impl Default for Steps {
    fn default() -> Self {
        Self {
            rotation: 0.3,
            zoom: 1.0,
            movement: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasAction {
    RandomBackground,
    RandomRotation,
    Turn(Axis),
    ZoomIn,
    ZoomOut,
    MoveUp,
    MoveDown,
}

impl CanvasAction {
    pub fn label(self) -> &'static str {
        match self {
            CanvasAction::RandomBackground => "Random Background",
            CanvasAction::RandomRotation => "Random Rotation",
            CanvasAction::Turn(Axis::Plate) => "Turn Plate",
            CanvasAction::Turn(Axis::Horizontal) => "Turn Horizontal",
            CanvasAction::Turn(Axis::Vertical) => "Turn Vertical",
            CanvasAction::ZoomIn => "+",
            CanvasAction::ZoomOut => "-",
            CanvasAction::MoveUp => "up",
            CanvasAction::MoveDown => "down",
        }
    }
}

/// Everything the canvas reads each frame. Owned by the app, mutated by actions.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub kind: DemoKind,
    pub camera: LookAtCamera,
    pub perspective: Perspective,
    pub rotation: RotationState,
    /// Extra rotation about X, set by "Random Rotation".
    pub tilt: f32,
    /// Fixed rotation about Y applied before everything else.
    pub yaw: f32,
    /// Radians per second about Y.
    pub spin_rate: f32,
    /// Object-space translation of the geometry.
    pub offset: Vec3,
    pub light: Light,
    pub material: Material,
    pub background: [f32; 4],
    pub steps: Steps,
}

impl Scene {
    pub fn new(kind: DemoKind, steps: Steps) -> Self {
        let base = Self {
            kind,
            camera: LookAtCamera::default(),
            perspective: Perspective::default(),
            rotation: RotationState::default(),
            tilt: 0.0,
            yaw: 0.0,
            spin_rate: 0.0,
            offset: Vec3::ZERO,
            light: Light::default(),
            material: Material::BLINN_PHONG,
            background: DEFAULT_BACKGROUND,
            steps,
        };

        match kind {
            DemoKind::SpinningCube => Self {
                camera: LookAtCamera::new(Vec3::new(0.0, -2.0, -10.0), Vec3::ZERO, Vec3::Y),
                spin_rate: 1.0,
                light: Light {
                    position: Vec3::new(1.5, 1.5, 1.5),
                    ..Light::default()
                },
                material: Material::ambient_only(0.3),
                ..base
            },
            DemoKind::LitCube => Self {
                camera: LookAtCamera::new(Vec3::new(0.0, -2.0, -10.0), Vec3::ZERO, Vec3::Y),
                yaw: 20.0,
                light: Light {
                    position: Vec3::new(1.75, 1.75, 1.75),
                    ..Light::default()
                },
                material: Material::ambient_only(0.1),
                background: [100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, 1.0],
                ..base
            },
            DemoKind::BlinnPhongMesh => base,
        }
    }

    /// Buttons shown under the canvas, in order.
    pub fn actions(&self) -> Vec<CanvasAction> {
        let mut actions = vec![CanvasAction::RandomBackground];
        match self.kind {
            DemoKind::SpinningCube | DemoKind::LitCube => {
                actions.push(CanvasAction::RandomRotation);
            }
            DemoKind::BlinnPhongMesh => {
                actions.extend(Axis::ALL.map(CanvasAction::Turn));
                actions.extend([
                    CanvasAction::ZoomIn,
                    CanvasAction::ZoomOut,
                    CanvasAction::MoveUp,
                    CanvasAction::MoveDown,
                ]);
            }
        }
        actions
    }

    pub fn apply(&mut self, action: CanvasAction, rng: &mut impl Rng) {
        match action {
            CanvasAction::RandomBackground => {
                self.background = [rng.random(), rng.random(), rng.random(), 1.0];
            }
            CanvasAction::RandomRotation => {
                self.tilt = rng.random::<f32>() * std::f32::consts::PI;
            }
            CanvasAction::Turn(axis) => self.rotation.turn(axis, self.steps.rotation),
            CanvasAction::ZoomIn => self.camera.zoom_in(self.steps.zoom),
            CanvasAction::ZoomOut => self.camera.zoom_out(self.steps.zoom),
            CanvasAction::MoveUp => self.offset.z += self.steps.movement,
            CanvasAction::MoveDown => self.offset.z -= self.steps.movement,
        }
        log::debug!("{action:?}: rotation {:?}, eye {}", self.rotation, self.camera.eye);
    }

    pub fn shows_light_marker(&self) -> bool {
        self.kind == DemoKind::LitCube
    }

    /// Ry(yaw + spin * t) * Rx(tilt) * Rx(plate) * Ry(horizontal) * Rz(vertical) * T(offset).
    pub fn model_matrix(&self, elapsed_secs: f32) -> Mat4 {
        Mat4::from_rotation_y(self.yaw + self.spin_rate * elapsed_secs)
            * Mat4::from_rotation_x(self.tilt)
            * self.rotation.matrix()
            * Mat4::from_translation(self.offset)
    }

    /// Lighting happens in object space moved by the offset, so turning the
    /// object carries its lit side with it.
    pub fn lighting_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset)
    }

    pub fn transforms(&self, elapsed_secs: f32, width: u32, height: u32) -> Option<Transforms> {
        compute_transforms(
            self.model_matrix(elapsed_secs),
            &self.camera,
            &self.perspective,
            width,
            height,
        )
    }

    /// Uniforms for every draw item: the scene mesh, then the light marker when shown.
    pub fn frame_uniforms(
        &self,
        elapsed_secs: f32,
        width: u32,
        height: u32,
    ) -> Option<Vec<FrameUniform>> {
        let t = self.transforms(elapsed_secs, width, height)?;
        let lighting = self.lighting_matrix();
        let mut uniforms = vec![
            FrameUniform::new(
                t.model,
                t.view,
                t.projection,
                self.camera.eye,
                &self.light,
                &self.material,
            )
            .with_lighting(lighting),
        ];
        if self.shows_light_marker() {
            uniforms.push(
                FrameUniform::new(
                    t.model,
                    t.view,
                    t.projection,
                    self.camera.eye,
                    &Light::default(),
                    &Material::UNLIT,
                )
                .with_lighting(lighting),
            );
        }
        Some(uniforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn five_plate_turns_reach_one_and_a_half() {
        let mut scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        let mut rng = rng();
        for _ in 0..5 {
            scene.apply(CanvasAction::Turn(Axis::Plate), &mut rng);
        }
        assert!((scene.rotation.plate - 1.5).abs() < 1e-6);
    }

    #[test]
    fn custom_step_is_honored() {
        let steps = Steps {
            rotation: 0.5,
            ..Steps::default()
        };
        let mut scene = Scene::new(DemoKind::BlinnPhongMesh, steps);
        let mut rng = rng();
        scene.apply(CanvasAction::Turn(Axis::Vertical), &mut rng);
        scene.apply(CanvasAction::Turn(Axis::Vertical), &mut rng);
        assert!((scene.rotation.vertical - 1.0).abs() < 1e-6);
    }

    #[test]
    fn default_mesh_mvp_is_projection_times_view() {
        let scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        let t = scene.transforms(0.0, 400, 400).unwrap();
        assert_eq!(t.model, Mat4::IDENTITY);
        let expected =
            scene.perspective.matrix(1.0) * scene.camera.view_matrix() * Mat4::IDENTITY;
        assert!(t.mvp().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn zoom_and_move_follow_steps() {
        let mut scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        let mut rng = rng();
        scene.apply(CanvasAction::ZoomIn, &mut rng);
        assert_eq!(scene.camera.eye, Vec3::splat(9.0));
        scene.apply(CanvasAction::ZoomOut, &mut rng);
        scene.apply(CanvasAction::ZoomOut, &mut rng);
        assert_eq!(scene.camera.eye, Vec3::splat(11.0));

        scene.apply(CanvasAction::MoveUp, &mut rng);
        scene.apply(CanvasAction::MoveUp, &mut rng);
        scene.apply(CanvasAction::MoveDown, &mut rng);
        assert_eq!(scene.offset, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn offset_is_applied_before_rotation() {
        let mut scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        scene.offset = Vec3::new(0.0, 0.0, 1.0);
        scene.rotation.plate = std::f32::consts::FRAC_PI_2;
        // Rx(90deg) takes +z to -y
        let moved = scene.model_matrix(0.0).transform_point3(Vec3::ZERO);
        assert!(moved.abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-6));
    }

    #[test]
    fn random_actions_stay_in_range() {
        let mut scene = Scene::new(DemoKind::SpinningCube, Steps::default());
        let mut rng = rng();
        for _ in 0..50 {
            scene.apply(CanvasAction::RandomBackground, &mut rng);
            scene.apply(CanvasAction::RandomRotation, &mut rng);
            assert!(scene.background[..3].iter().all(|c| (0.0..1.0).contains(c)));
            assert_eq!(scene.background[3], 1.0);
            assert!((0.0..std::f32::consts::PI).contains(&scene.tilt));
        }
    }

    #[test]
    fn spinning_cube_turns_with_time() {
        let scene = Scene::new(DemoKind::SpinningCube, Steps::default());
        assert_eq!(scene.model_matrix(0.0), Mat4::IDENTITY);
        assert!(
            scene
                .model_matrix(1.0)
                .abs_diff_eq(Mat4::from_rotation_y(1.0), 1e-6)
        );
    }

    #[test]
    fn actions_per_demo() {
        let mesh = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        let labels: Vec<_> = mesh.actions().into_iter().map(CanvasAction::label).collect();
        assert_eq!(
            labels,
            vec![
                "Random Background",
                "Turn Plate",
                "Turn Horizontal",
                "Turn Vertical",
                "+",
                "-",
                "up",
                "down"
            ]
        );

        let cube = Scene::new(DemoKind::LitCube, Steps::default());
        assert_eq!(
            cube.actions(),
            vec![CanvasAction::RandomBackground, CanvasAction::RandomRotation]
        );
    }

    #[test]
    fn lit_cube_adds_unlit_marker_uniform() {
        let scene = Scene::new(DemoKind::LitCube, Steps::default());
        let uniforms = scene.frame_uniforms(0.0, 400, 400).unwrap();
        assert_eq!(uniforms.len(), 2);
        assert_eq!(uniforms[0].material, [0.1, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms[1].material, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(uniforms[0].model, uniforms[1].model);

        let mesh = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        assert_eq!(mesh.frame_uniforms(0.0, 400, 400).unwrap().len(), 1);
    }

    #[test]
    fn turning_keeps_lighting_in_object_space() {
        let mut scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        let mut rng = rng();
        for _ in 0..5 {
            scene.apply(CanvasAction::Turn(Axis::Horizontal), &mut rng);
        }
        let u = scene.frame_uniforms(0.0, 400, 400).unwrap()[0];
        assert_eq!(u.lighting, Mat4::IDENTITY.to_cols_array_2d());
        assert_ne!(u.model, Mat4::IDENTITY.to_cols_array_2d());

        // the vertex facing the light stays 4 units from it at any rotation
        let lighting = Mat4::from_cols_array_2d(&u.lighting);
        let vertex = lighting.transform_point3(Vec3::X);
        let light = Vec3::from_slice(&u.light_position[..3]);
        assert!((vertex.distance(light) - 4.0).abs() < 1e-6);
    }

    #[test]
    fn offset_reaches_lighting() {
        let mut scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        let mut rng = rng();
        scene.apply(CanvasAction::Turn(Axis::Plate), &mut rng);
        scene.apply(CanvasAction::MoveUp, &mut rng);
        let u = scene.frame_uniforms(0.0, 400, 400).unwrap()[0];
        assert_eq!(
            u.lighting,
            Mat4::from_translation(Vec3::Z).to_cols_array_2d()
        );
    }

    #[test]
    fn spinning_cube_preset() {
        let scene = Scene::new(DemoKind::SpinningCube, Steps::default());
        assert_eq!(scene.camera.eye, Vec3::new(0.0, -2.0, -10.0));
        assert_eq!(scene.camera.target, Vec3::ZERO);
        assert_eq!(scene.spin_rate, 1.0);
        assert_eq!(scene.yaw, 0.0);
        assert_eq!(scene.material, Material::ambient_only(0.3));
        assert_eq!(scene.background, DEFAULT_BACKGROUND);
        assert!(!scene.shows_light_marker());
    }

    #[test]
    fn lit_cube_preset() {
        let scene = Scene::new(DemoKind::LitCube, Steps::default());
        assert_eq!(scene.camera.eye, Vec3::new(0.0, -2.0, -10.0));
        assert_eq!(scene.yaw, 20.0);
        assert_eq!(scene.spin_rate, 0.0);
        assert_eq!(scene.material, Material::ambient_only(0.1));
        let gray = 100.0 / 255.0;
        assert_eq!(scene.background, [gray, gray, gray, 1.0]);
        assert!(scene.shows_light_marker());
        assert!(
            scene
                .model_matrix(3.0)
                .abs_diff_eq(Mat4::from_rotation_y(20.0), 1e-6)
        );
    }

    #[test]
    fn blinn_phong_mesh_preset() {
        let scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        assert_eq!(scene.camera.eye, Vec3::splat(10.0));
        assert_eq!(scene.material, Material::BLINN_PHONG);
        assert_eq!(scene.light, Light::default());
    }

    #[test]
    fn zero_height_viewport_skips_the_frame() {
        let scene = Scene::new(DemoKind::BlinnPhongMesh, Steps::default());
        assert!(scene.frame_uniforms(0.0, 400, 0).is_none());
    }
}
