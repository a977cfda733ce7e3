//! Core types: math re-exports, errors, Camera, Transform, stripe pattern
//! and texture filter state. Renderer-agnostic.

use thiserror::Error;

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod filter;
pub mod stripes;
pub mod transform;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Stripe band width must be at least one pixel")]
    InvalidBandWidth,
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Linear RGBA color, components in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn color_array_keeps_component_order() {
        let c = Color::new(0.1, 0.2, 0.3, 0.4);
        assert_eq!(c.to_array(), [0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn card_mvp_is_finite() {
        let cam = camera::Camera::for_viewport(800, 600);
        let model = transform::Transform::identity().matrix();
        let a = (cam.proj_view() * model).to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }
}
