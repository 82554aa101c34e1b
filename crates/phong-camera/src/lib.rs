use glam::{Mat4, Vec3};

/// Default vertical field of view, 25 degrees.
pub const DEFAULT_FOV_Y: f32 = 25.0 * std::f32::consts::PI / 180.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookAtCamera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl LookAtCamera {
    pub fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Moves every eye component down by `step`.
    pub fn zoom_in(&mut self, step: f32) {
        self.eye -= Vec3::splat(step);
    }

    pub fn zoom_out(&mut self, step: f32) {
        self.eye += Vec3::splat(step);
    }
}

impl Default for LookAtCamera {
    fn default() -> Self {
        Self::new(Vec3::new(10.0, 10.0, 10.0), Vec3::ZERO, Vec3::Y)
    }
}

/// Width over height, or `None` when either side is zero.
pub fn aspect_ratio(width: u32, height: u32) -> Option<f32> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(width as f32 / height as f32)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perspective {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y: DEFAULT_FOV_Y,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

impl Perspective {
    /// Right-handed projection with a [0, 1] depth range.
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Rotation about X.
    Plate,
    /// Rotation about Y.
    Horizontal,
    /// Rotation about Z.
    Vertical,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Plate, Axis::Horizontal, Axis::Vertical];

    pub fn unit(self) -> Vec3 {
        match self {
            Axis::Plate => Vec3::X,
            Axis::Horizontal => Vec3::Y,
            Axis::Vertical => Vec3::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub plate: f32,
    pub horizontal: f32,
    pub vertical: f32,
}

impl RotationState {
    pub fn turn(&mut self, axis: Axis, step: f32) {
        *self.angle_mut(axis) += step;
    }

    pub fn angle(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Plate => self.plate,
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }

    fn angle_mut(&mut self, axis: Axis) -> &mut f32 {
        match axis {
            Axis::Plate => &mut self.plate,
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        }
    }

    /// Rx(plate) * Ry(horizontal) * Rz(vertical).
    pub fn matrix(&self) -> Mat4 {
        Axis::ALL
            .iter()
            .map(|axis| Mat4::from_axis_angle(axis.unit(), self.angle(*axis)))
            .fold(Mat4::IDENTITY, |acc, m| acc * m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transforms {
    pub model: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
}

impl Transforms {
    pub fn mvp(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

/// Model, view and projection for one frame. `None` for a zero-sized viewport.
pub fn compute_transforms(
    model: Mat4,
    camera: &LookAtCamera,
    perspective: &Perspective,
    width: u32,
    height: u32,
) -> Option<Transforms> {
    let aspect = aspect_ratio(width, height)?;
    Some(Transforms {
        model,
        view: camera.view_matrix(),
        projection: perspective.matrix(aspect),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_accumulate_by_step() {
        let mut rotation = RotationState::default();
        for _ in 0..5 {
            rotation.turn(Axis::Plate, 0.3);
        }
        assert!((rotation.plate - 1.5).abs() < 1e-6);
        assert_eq!(rotation.horizontal, 0.0);
        assert_eq!(rotation.vertical, 0.0);
    }

    #[test]
    fn turns_are_monotonic_for_positive_steps() {
        let mut rotation = RotationState::default();
        let mut last = rotation.angle(Axis::Vertical);
        for _ in 0..20 {
            rotation.turn(Axis::Vertical, 0.3);
            assert!(rotation.vertical > last);
            last = rotation.vertical;
        }
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(RotationState::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn rotation_composes_x_then_y_then_z() {
        let rotation = RotationState {
            plate: 0.4,
            horizontal: 1.1,
            vertical: -0.7,
        };
        let expected =
            Mat4::from_rotation_x(0.4) * Mat4::from_rotation_y(1.1) * Mat4::from_rotation_z(-0.7);
        assert!(rotation.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn zoom_moves_every_eye_component() {
        let mut camera = LookAtCamera::default();
        camera.zoom_in(1.0);
        assert_eq!(camera.eye, Vec3::new(9.0, 9.0, 9.0));
        camera.zoom_out(1.0);
        camera.zoom_out(1.0);
        assert_eq!(camera.eye, Vec3::new(11.0, 11.0, 11.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn aspect_is_width_over_height() {
        for (w, h) in [(400, 400), (800, 600), (1, 1000), (1920, 1080)] {
            let aspect = aspect_ratio(w, h).unwrap();
            assert!((aspect - w as f32 / h as f32).abs() < 1e-6);
        }
    }

    #[test]
    fn zero_sized_viewport_has_no_aspect() {
        assert_eq!(aspect_ratio(0, 100), None);
        assert_eq!(aspect_ratio(100, 0), None);
        let t = compute_transforms(
            Mat4::IDENTITY,
            &LookAtCamera::default(),
            &Perspective::default(),
            640,
            0,
        );
        assert!(t.is_none());
    }

    #[test]
    fn projection_uses_viewport_aspect() {
        let perspective = Perspective::default();
        let t = compute_transforms(
            Mat4::IDENTITY,
            &LookAtCamera::default(),
            &perspective,
            800,
            600,
        )
        .unwrap();
        // x scale = y scale / aspect for a symmetric frustum
        let p = t.projection;
        assert!((p.y_axis.y / p.x_axis.x - 800.0 / 600.0).abs() < 1e-5);
        assert!(p.abs_diff_eq(perspective.matrix(800.0 / 600.0), 1e-6));
    }

    #[test]
    fn default_mvp_is_projection_times_view() {
        let camera = LookAtCamera::default();
        let perspective = Perspective::default();
        let t = compute_transforms(
            RotationState::default().matrix(),
            &camera,
            &perspective,
            400,
            400,
        )
        .unwrap();
        let expected = perspective.matrix(1.0) * camera.view_matrix() * Mat4::IDENTITY;
        assert!(t.mvp().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = LookAtCamera::default();
        let t = compute_transforms(Mat4::IDENTITY, &camera, &Perspective::default(), 400, 400)
            .unwrap();
        let clip = t.mvp() * camera.target.extend(1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
