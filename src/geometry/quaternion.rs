use super::vec3::Vec3;
use std::ops::Mul;

/// Orientation in scene space, used by the camera only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub fn identity() -> Quaternion {
        Quaternion { x: 0.0, y: 0.0, z: 0.0, w: 1.0 }
    }

    /// A rotation of `angle` radians around the given axis.
    pub fn rotation(axis: Vec3, angle: f64) -> Quaternion {
        let half = angle * 0.5;
        Quaternion {
            x: half.sin() * axis.x,
            y: half.sin() * axis.y,
            z: half.sin() * axis.z,
            w: half.cos(),
        }
    }

    pub fn conjugate(self) -> Quaternion {
        Quaternion { x: -self.x, y: -self.y, z: -self.z, w: self.w }
    }

    /// Rotates `v` by this quaternion.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let p = Quaternion { x: v.x, y: v.y, z: v.z, w: 0.0 };
        let r = self * p * self.conjugate();
        Vec3::new(r.x, r.y, r.z)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;
    fn mul(self, b: Quaternion) -> Quaternion {
        Quaternion {
            x: self.x * b.w + self.w * b.x + self.y * b.z - self.z * b.y,
            y: self.w * b.y - self.x * b.z + self.y * b.w + self.z * b.x,
            z: self.w * b.z + self.x * b.y - self.y * b.x + self.z * b.w,
            w: self.w * b.w - self.x * b.x - self.y * b.y - self.z * b.z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_does_not_rotate() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        let rotated = Quaternion::identity().rotate(v);
        assert!((rotated.x - v.x).abs() < 1e-9);
        assert!((rotated.y - v.y).abs() < 1e-9);
        assert!((rotated.z - v.z).abs() < 1e-9);
    }

    #[test]
    fn quarter_turn_around_z_maps_x_to_y() {
        let q = Quaternion::rotation(Vec3::new(0.0, 0.0, 1.0), std::f64::consts::FRAC_PI_2);
        let rotated = q.rotate(Vec3::new(1.0, 0.0, 0.0));
        assert!((rotated.x - 0.0).abs() < 1e-9);
        assert!((rotated.y - 1.0).abs() < 1e-9);
    }
}
