use super::vec3::Vec3;

/// A hit between a ray and a shape in the scene.
#[derive(Debug, Clone, Copy)]
pub struct Intersection {
    pub position: Vec3,
    pub normal: Vec3,
    pub tangent: Vec3,
    pub distance: f64,
}
