use crate::{EulerRot, Mat4, Quat, Vec3};

/// Rigid transform with non-uniform scale (Euler XYZ, radians).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_euler: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Advance rotation about Z by `deg_per_sec * dt`, wrapped to one turn.
    pub fn spin_z(&mut self, deg_per_sec: f32, dt: f32) {
        let z = self.rotation_euler.z + (deg_per_sec * dt).to_radians();
        self.rotation_euler.z = z.rem_euclid(std::f32::consts::TAU);
    }

    /// Model matrix = T * R * S.
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_euler.x,
            self.rotation_euler.y,
            self.rotation_euler.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spin_accumulates_degrees() {
        let mut t = Transform::identity();
        t.spin_z(15.0, 2.0);
        assert!((t.rotation_euler.z - 30f32.to_radians()).abs() < 1e-6);
        assert_eq!(t.translation, Vec3::ZERO);
    }

    #[test]
    fn spin_wraps_full_turn() {
        let mut t = Transform::identity();
        t.spin_z(90.0, 5.0);
        assert!((t.rotation_euler.z - 90f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let mut t = Transform::identity();
        t.spin_z(90.0, 1.0);
        let p = t.matrix().transform_point3(Vec3::X);
        assert!((p - Vec3::Y).length() < 1e-5);
    }
}
