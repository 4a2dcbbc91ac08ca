pub mod camera;
pub mod demo;
pub mod materials;
pub mod shapes;

pub use self::camera::Camera;
pub use self::materials::{EmissiveMaterial, ReflectiveMaterial};
pub use self::shapes::Shape;

use crate::geometry::{Intersection, Ray};

/// A shape plus the capabilities it reflects or emits light with.
/// Exactly one of `material` / `emissive_material` is populated for every
/// object the demo scene builds.
pub struct Object {
    pub shape: Box<dyn Shape + Send + Sync>,
    pub material: Option<Box<dyn ReflectiveMaterial + Send + Sync>>,
    pub emissive_material: Option<Box<dyn EmissiveMaterial + Send + Sync>>,
}

impl Object {
    pub fn reflective(
        shape: Box<dyn Shape + Send + Sync>,
        material: Box<dyn ReflectiveMaterial + Send + Sync>,
    ) -> Object {
        Object { shape, material: Some(material), emissive_material: None }
    }

    pub fn emissive(
        shape: Box<dyn Shape + Send + Sync>,
        emissive_material: Box<dyn EmissiveMaterial + Send + Sync>,
    ) -> Object {
        Object { shape, material: None, emissive_material: Some(emissive_material) }
    }
}

/// All renderable objects plus the camera through which the scene is
/// seen. Shared immutably across every worker thread once built.
pub struct Scene {
    pub objects: Vec<Object>,
    camera_at_time: Box<dyn Fn(f64) -> Camera + Send + Sync>,
}

impl Scene {
    pub fn new(
        objects: Vec<Object>,
        camera_at_time: impl Fn(f64) -> Camera + Send + Sync + 'static,
    ) -> Scene {
        Scene { objects, camera_at_time: Box::new(camera_at_time) }
    }

    /// Returns the nearest-hit object and intersection, or `None` on a
    /// miss. Linear over `objects`; the distillation explicitly excludes
    /// acceleration structures.
    pub fn intersect(&self, ray: &Ray) -> Option<(&Object, Intersection)> {
        let mut nearest: Option<(&Object, Intersection)> = None;

        for object in &self.objects {
            if let Some(hit) = object.shape.intersect(ray) {
                let better = match &nearest {
                    Some((_, current)) => hit.distance < current.distance,
                    None => true,
                };
                if better {
                    nearest = Some((object, hit));
                }
            }
        }

        nearest
    }

    /// The camera through which the scene is seen at time `t` (`0..1`),
    /// sampled randomly per path to produce motion/zoom blur.
    pub fn camera_at_time(&self, t: f64) -> Camera {
        (self.camera_at_time)(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use shapes::Sphere;

    #[test]
    fn empty_scene_never_intersects() {
        let scene = Scene::new(Vec::new(), |_| Camera {
            position: Vec3::zero(),
            field_of_view: 1.0,
            focal_distance: 1.0,
            depth_of_field: 1.0,
            chromatic_aberration: 0.0,
            orientation: crate::geometry::Quaternion::identity(),
        });
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), 550.0, 1.0);
        assert!(scene.intersect(&ray).is_none());
    }

    #[test]
    fn intersect_picks_the_nearest_object() {
        let near = Object::emissive(
            Box::new(Sphere::new(Vec3::new(0.0, 5.0, 0.0), 1.0)),
            Box::new(materials::BlackBody::new(6000.0, 1.0)),
        );
        let far = Object::emissive(
            Box::new(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 1.0)),
            Box::new(materials::BlackBody::new(6000.0, 1.0)),
        );
        let scene = Scene::new(vec![far, near], |_| Camera {
            position: Vec3::zero(),
            field_of_view: 1.0,
            focal_distance: 1.0,
            depth_of_field: 1.0,
            chromatic_aberration: 0.0,
            orientation: crate::geometry::Quaternion::identity(),
        });
        let ray = Ray::new(Vec3::zero(), Vec3::new(0.0, 1.0, 0.0), 550.0, 1.0);
        let (_, hit) = scene.intersect(&ray).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-6);
    }
}
