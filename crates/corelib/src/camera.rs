use crate::{Mat4, Vec3};

/// Default vertical field of view, degrees.
pub const DEFAULT_FOV_Y_DEG: f32 = 75.0;
pub const DEFAULT_Z_NEAR: f32 = 0.01;
pub const DEFAULT_Z_FAR: f32 = 1000.0;

/// Simple perspective camera (right-handed, Z-up world).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Camera for a viewport of the given size, two units back from the
    /// origin along -Y and looking at it.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        Self::new_perspective(
            Vec3::new(0.0, -2.0, 0.0),
            Vec3::ZERO,
            Vec3::Z,
            DEFAULT_FOV_Y_DEG.to_radians(),
            DEFAULT_Z_NEAR,
            DEFAULT_Z_FAR,
            aspect_of(width, height),
        )
    }

    /// Recompute the projection for new framebuffer bounds.
    pub fn update_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Depth range is [0, 1], as wgpu expects.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }
}

#[inline]
fn aspect_of(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_sets_aspect() {
        let cam = Camera::for_viewport(1600, 800);
        assert!((cam.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn update_viewport_tracks_resize() {
        let mut cam = Camera::for_viewport(800, 600);
        cam.update_viewport(600, 600);
        assert!((cam.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_sized_viewport_is_clamped() {
        let mut cam = Camera::for_viewport(0, 0);
        assert!((cam.aspect - 1.0).abs() < 1e-6);
        cam.update_viewport(300, 0);
        assert!((cam.aspect - 300.0).abs() < 1e-3);
        assert!(cam.proj().to_cols_array().iter().all(|f| f.is_finite()));
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::for_viewport(800, 600);
        let clip = cam.proj_view() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn world_up_is_screen_up() {
        let cam = Camera::for_viewport(800, 600);
        let clip = cam.proj_view() * glam::Vec4::new(0.0, 0.0, 0.5, 1.0);
        assert!(clip.y / clip.w > 0.0);
    }
}
