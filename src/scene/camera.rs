//! Pinhole camera with depth of field and wavelength-dependent chromatic
//! aberration.

use crate::entropy::EntropySource;
use crate::geometry::{Quaternion, Ray, Vec3};

#[derive(Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub field_of_view: f64,
    pub focal_distance: f64,
    pub depth_of_field: f64,
    pub chromatic_aberration: f64,
    pub orientation: Quaternion,
}

impl Camera {
    fn screen_ray(
        &self,
        x: f64,
        y: f64,
        chromatic_aberration_factor: f64,
        dof_angle: f64,
        dof_radius: f64,
    ) -> Ray {
        let screen_distance = 1.0 / (self.field_of_view * 0.5).tan();
        let mut direction = Vec3::new(x, screen_distance, -y);
        direction.x *= chromatic_aberration_factor;
        direction.z *= chromatic_aberration_factor;
        direction = direction.normalized();

        let focus_point = direction * (self.focal_distance / direction.y);
        let lens_point =
            Vec3::new(dof_angle.cos() * dof_radius, 0.0, dof_angle.sin() * dof_radius);

        let direction = focus_point - lens_point;
        Ray::new(
            self.position + self.orientation.rotate(lens_point),
            self.orientation.rotate(direction).normalized(),
            0.0,
            1.0,
        )
    }

    /// Builds a camera ray through screen position `(x, y)` (`-1..1`
    /// horizontally, square units vertically) at `wavelength`, sampling
    /// depth-of-field and chromatic aberration from `entropy`.
    pub fn get_ray(&self, x: f64, y: f64, wavelength: f64, entropy: &mut EntropySource) -> Ray {
        let dof_angle = entropy.longitude();
        let dof_radius = entropy.unit() / self.depth_of_field;

        let d = (wavelength - 580.0) / 200.0;
        let chromatic_zoom = 1.0 + d * self.chromatic_aberration;

        let mut ray = self.screen_ray(x, y, chromatic_zoom, dof_angle, dof_radius);
        ray.wavelength = wavelength;
        ray.probability = 1.0;
        ray
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still_camera() -> Camera {
        Camera {
            position: Vec3::zero(),
            field_of_view: std::f64::consts::FRAC_PI_2,
            focal_distance: 5.0,
            depth_of_field: 1.0e6,
            chromatic_aberration: 0.0,
            orientation: Quaternion::identity(),
        }
    }

    #[test]
    fn centre_ray_points_roughly_forward() {
        let camera = still_camera();
        let mut entropy = EntropySource::new(1);
        let ray = camera.get_ray(0.0, 0.0, 550.0, &mut entropy);
        assert!(ray.direction.y > 0.9);
    }

    #[test]
    fn ray_direction_is_unit_length() {
        let camera = still_camera();
        let mut entropy = EntropySource::new(2);
        for _ in 0..100 {
            let ray = camera.get_ray(0.3, -0.2, 480.0, &mut entropy);
            assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        }
    }
}
