//! `TraceUnit` — samples camera rays and runs the spectral path loop.

use crate::config::N_PATHS;
use crate::entropy::EntropySource;
use crate::geometry::Ray;
use crate::scene::Scene;

/// One simulated photon, mapped onto the screen.
#[derive(Debug, Clone, Copy)]
pub struct MappedPhoton {
    /// Screen position, `x` in `[-1, 1]`, `y` in `[-1/aspect, 1/aspect]`.
    pub x: f64,
    pub y: f64,

    /// The probability that a simulated photon hit the screen here.
    pub probability: f64,

    /// Wavelength of the simulated photon, in nanometres.
    pub wavelength: f64,
}

impl MappedPhoton {
    fn black() -> MappedPhoton {
        MappedPhoton { x: 0.0, y: 0.0, probability: 0.0, wavelength: 550.0 }
    }
}

/// A reusable batch of traced paths plus the entropy source that produced
/// them. Exclusively owned by at most one in-flight task at a time; no
/// internal locking.
pub struct TraceUnit<'scene> {
    entropy: EntropySource,
    scene: &'scene Scene,
    aspect_ratio: f64,
    pub mapped_photons: Vec<MappedPhoton>,
}

impl<'scene> TraceUnit<'scene> {
    pub fn new(scene: &'scene Scene, seed: u64, width: usize, height: usize) -> TraceUnit<'scene> {
        TraceUnit {
            entropy: EntropySource::new(seed),
            scene,
            aspect_ratio: width as f64 / height as f64,
            mapped_photons: vec![MappedPhoton::black(); N_PATHS],
        }
    }

    /// The seed a sibling `TraceUnit` should be constructed with, chained
    /// off this unit's stream so that successive units never repeat.
    pub fn next_seed(&mut self) -> u64 {
        self.entropy.next_seed()
    }

    /// Fills `mapped_photons` with one fresh batch of samples.
    pub fn render(&mut self) {
        for i in 0..self.mapped_photons.len() {
            let wavelength = self.entropy.wavelength();
            let x = self.entropy.bi_unit();
            let y = self.entropy.bi_unit() / self.aspect_ratio;

            let probability = self.render_camera_ray(x, y, wavelength);

            self.mapped_photons[i] = MappedPhoton { x, y, probability, wavelength };
        }
    }

    fn render_camera_ray(&mut self, x: f64, y: f64, wavelength: f64) -> f64 {
        let t = self.entropy.unit();
        let camera = self.scene.camera_at_time(t);
        let ray = camera.get_ray(x, y, wavelength, &mut self.entropy);
        self.render_ray(ray)
    }

    /// The unbiased path-tracing estimator. Returns the contribution of the
    /// path starting at `ray`, walking it backwards from the screen.
    fn render_ray(&mut self, mut ray: Ray) -> f64 {
        let mut continue_chance = 1.0_f64;
        let mut intensity = 1.0_f64;

        loop {
            let hit = match self.scene.intersect(&ray) {
                Some(hit) => hit,
                None => return 0.0,
            };
            let (object, intersection) = hit;

            if object.material.is_none() {
                if let Some(emissive) = &object.emissive_material {
                    return intensity * emissive.emitted_intensity(ray.wavelength);
                }
                return 0.0;
            }

            let material = object.material.as_ref().unwrap();
            let mut new_ray = material.sample_outgoing_ray(&ray, &intersection, &mut self.entropy);
            intensity *= new_ray.probability;

            new_ray.origin = new_ray.origin + new_ray.direction * 1.0e-5;
            ray = new_ray;

            continue_chance *= 0.96;

            // Sharp falloff: intensity 0.1 still has ~86% chance of
            // continuing, intensity 0.01 only ~18%.
            if self.entropy.unit() * 0.85 >= continue_chance * (1.0 - (intensity * -20.0).exp()) {
                return 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Quaternion, Vec3};
    use crate::scene::camera::Camera;
    use crate::scene::materials::BlackBody;
    use crate::scene::shapes::Sphere;
    use crate::scene::Object;

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
    fn empty_scene_produces_all_black_photons() {
        let scene = Scene::new(Vec::new(), |_| still_camera());
        let mut trace_unit = TraceUnit::new(&scene, 1, 16, 16);
        trace_unit.render();
        assert!(trace_unit.mapped_photons.iter().all(|p| p.probability == 0.0));
    }

    #[test]
    fn a_single_sun_lights_up_some_photons() {
        let sun = Object::emissive(
            Box::new(Sphere::new(Vec3::new(0.0, 5.0, 0.0), 4.0)),
            Box::new(BlackBody::new(6504.0, 1.0)),
        );
        let scene = Scene::new(vec![sun], |_| still_camera());
        let mut trace_unit = TraceUnit::new(&scene, 2, 16, 16);
        trace_unit.render();
        assert!(trace_unit.mapped_photons.iter().any(|p| p.probability > 0.0));
    }

    #[test]
    fn next_seed_differs_from_the_unit_s_own_seed() {
        let scene = Scene::new(Vec::new(), |_| still_camera());
        let mut trace_unit = TraceUnit::new(&scene, 99, 16, 16);
        assert_ne!(trace_unit.next_seed(), 99);
    }
}
