use glam::{Mat4, Quat, Vec3};

fn axis_from_name(name: &str) -> Option<Vec3> {
    match name {
        "X" => Some(Vec3::X),
        "Y" => Some(Vec3::Y),
        "Z" => Some(Vec3::Z),
        _ => None,
    }
}

/// Rigid transform exposed to guest scripts as a plain value object.
///
/// Rotations take an axis name ("X"/"Y"/"Z"); an unknown axis is a no-op,
/// matching how the input bindings treat unknown source names.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trafo {
    pub rotation: Quat,
    pub translation: Vec3,
    pub scale: Vec3,
}

impl Trafo {
    pub fn identity() -> Self {
        Self { rotation: Quat::IDENTITY, translation: Vec3::ZERO, scale: Vec3::ONE }
    }

    pub fn rotate_global(&mut self, angle: f32, axis: &str) {
        if let Some(axis) = axis_from_name(axis) {
            self.rotation = (Quat::from_axis_angle(axis, angle) * self.rotation).normalize();
        }
    }

    pub fn rotate_local(&mut self, angle: f32, axis: &str) {
        if let Some(axis) = axis_from_name(axis) {
            self.rotation = (self.rotation * Quat::from_axis_angle(axis, angle)).normalize();
        }
    }

    pub fn translate_global(&mut self, offset: Vec3) {
        self.translation += offset;
    }

    pub fn translate_local(&mut self, offset: Vec3) {
        self.translation += self.rotation * offset;
    }

    pub fn set_scale_local(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Trafo {
    fn default() -> Self {
        Self::identity()
    }
}

/// Minimal perspective camera for the guest-facing ray-cast helper. The
/// renderer proper is an external collaborator; scripts only need picking
/// rays in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub trafo: Trafo,
    pub fov_y_deg: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(fov_y_deg: f32, aspect: f32) -> Self {
        Self { trafo: Trafo::identity(), fov_y_deg, aspect: aspect.max(1e-3) }
    }

    /// Casts a ray through normalized viewport coordinates (0..1, origin
    /// top-left) and returns world-space origin and normalized direction.
    pub fn cast_ray(&self, viewport_x: f32, viewport_y: f32) -> (Vec3, Vec3) {
        let half_h = (self.fov_y_deg.to_radians() * 0.5).tan();
        let half_w = half_h * self.aspect;
        let ndc_x = viewport_x * 2.0 - 1.0;
        let ndc_y = 1.0 - viewport_y * 2.0;
        // Camera space looks down -Z.
        let local = Vec3::new(ndc_x * half_w, ndc_y * half_h, -1.0);
        let dir = (self.trafo.rotation * local).normalize();
        (self.trafo.translation, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn local_translation_follows_rotation() {
        let mut t = Trafo::identity();
        t.rotate_global(std::f32::consts::FRAC_PI_2, "Y");
        t.translate_local(Vec3::new(0.0, 0.0, -1.0));
        // A quarter turn about +Y maps local -Z onto world -X.
        assert!(approx(t.translation, Vec3::new(-1.0, 0.0, 0.0)), "got {:?}", t.translation);
    }

    #[test]
    fn matrix_composes_scale_rotation_translation() {
        let mut t = Trafo::identity();
        t.set_scale_local(Vec3::splat(2.0));
        t.translate_global(Vec3::new(1.0, 2.0, 3.0));
        let m = t.matrix();
        let p = m.transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!(approx(p, Vec3::new(3.0, 2.0, 3.0)), "got {p:?}");
    }

    #[test]
    fn unknown_axis_is_a_noop() {
        let mut t = Trafo::identity();
        t.rotate_global(1.0, "W");
        assert_eq!(t, Trafo::identity());
    }

    #[test]
    fn center_ray_points_forward() {
        let cam = Camera::new(60.0, 16.0 / 9.0);
        let (origin, dir) = cam.cast_ray(0.5, 0.5);
        assert!(approx(origin, Vec3::ZERO));
        assert!(approx(dir, Vec3::new(0.0, 0.0, -1.0)), "got {dir:?}");
    }

    #[test]
    fn ray_origin_tracks_camera_translation() {
        let mut cam = Camera::new(60.0, 1.0);
        cam.trafo.translate_global(Vec3::new(1.0, 2.0, 3.0));
        let (origin, _) = cam.cast_ray(0.5, 0.5);
        assert!(approx(origin, Vec3::new(1.0, 2.0, 3.0)));
    }
}
