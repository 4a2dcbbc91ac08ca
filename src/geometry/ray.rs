use super::vec3::Vec3;

/// A single-wavelength ray carrying the Monte Carlo weight it has
/// accumulated so far.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,

    /// Wavelength in nanometres, nominally in `[380, 780]`.
    pub wavelength: f64,

    /// The probability weight carried along this path so far.
    pub probability: f64,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3, wavelength: f64, probability: f64) -> Ray {
        Ray { origin, direction, wavelength, probability }
    }

    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}
