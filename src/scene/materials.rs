//! Reflective and emissive material implementations.

use std::f64::consts::PI;

use crate::entropy::EntropySource;
use crate::geometry::{Intersection, Ray, Vec3};

/// Produces the ray that continues a light path backwards from the
/// camera towards a light source.
pub trait ReflectiveMaterial: Send + Sync {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray;
}

/// Produces the radiance an emissive object contributes at a wavelength.
pub trait EmissiveMaterial: Send + Sync {
    fn emitted_intensity(&self, wavelength: f64) -> f64;
}

fn cosine_sample(incoming: &Ray, intersection: &Intersection, entropy: &mut EntropySource) -> Vec3 {
    let local = entropy.cosine_hemisphere_vector();
    let facing_normal = if Vec3::dot(incoming.direction, intersection.normal) < 0.0 {
        intersection.normal
    } else {
        -intersection.normal
    };
    local.rotate_towards(facing_normal)
}

/// A perfectly diffuse, perfectly white material. Every other diffuse
/// material is built by wrapping this one's sample and attenuating its
/// probability.
pub struct Clay;

impl ReflectiveMaterial for Clay {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        Ray::new(
            intersection.position,
            cosine_sample(incoming, intersection, entropy),
            incoming.wavelength,
            1.0,
        )
    }
}

/// Diffuse, but absorbing: `reflectance` of 1.0 behaves like [`Clay`].
pub struct DiffuseGrey {
    pub reflectance: f64,
}

impl DiffuseGrey {
    pub fn new(reflectance: f64) -> DiffuseGrey {
        DiffuseGrey { reflectance }
    }
}

impl ReflectiveMaterial for DiffuseGrey {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        let mut ray = Clay.sample_outgoing_ray(incoming, intersection, entropy);
        ray.probability *= self.reflectance;
        ray
    }
}

/// Reflects light near `wavelength` better than others, following a
/// Gaussian reflectance curve. Wraps [`DiffuseGrey`] and multiplies its
/// probability a second time, by inheritance chaining in the source.
pub struct DiffuseColoured {
    pub grey: DiffuseGrey,
    pub wavelength: f64,
    pub deviation: f64,
}

impl DiffuseColoured {
    pub fn new(reflectance: f64, wavelength: f64, deviation: f64) -> DiffuseColoured {
        DiffuseColoured { grey: DiffuseGrey::new(reflectance), wavelength, deviation }
    }
}

impl ReflectiveMaterial for DiffuseColoured {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        let p = (self.wavelength - incoming.wavelength) / self.deviation;
        let q = (-0.5 * p * p).exp();

        let mut ray = self.grey.sample_outgoing_ray(incoming, intersection, entropy);
        ray.probability *= q;
        ray
    }
}

pub struct PerfectMirror;

impl ReflectiveMaterial for PerfectMirror {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        _entropy: &mut EntropySource,
    ) -> Ray {
        Ray::new(
            intersection.position,
            incoming.direction.reflect(intersection.normal),
            incoming.wavelength,
            1.0,
        )
    }
}

/// Blends between a perfect mirror (`glossiness = 0`) and diffuse
/// (`glossiness = 1`).
pub struct GlossyMirror {
    pub glossiness: f64,
}

impl GlossyMirror {
    pub fn new(glossiness: f64) -> GlossyMirror {
        GlossyMirror { glossiness }
    }
}

impl ReflectiveMaterial for GlossyMirror {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        let reflection = incoming.direction.reflect(intersection.normal);
        let diffuse = cosine_sample(incoming, intersection, entropy);
        let direction =
            (diffuse * self.glossiness + reflection * (1.0 - self.glossiness)).normalized();

        Ray::new(intersection.position, direction, incoming.wavelength, 1.0)
    }
}

/// Like [`GlossyMirror`], but the diffuse lobe is flattened along the
/// surface tangent in proportion to `anisotropy`, producing directional
/// brushed-metal highlights.
pub struct BrushedMetal {
    pub glossiness: f64,
    pub anisotropy: f64,
}

impl BrushedMetal {
    pub fn new(glossiness: f64, anisotropy: f64) -> BrushedMetal {
        BrushedMetal { glossiness, anisotropy }
    }
}

impl ReflectiveMaterial for BrushedMetal {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        let reflection = incoming.direction.reflect(intersection.normal);
        let mut diffuse = cosine_sample(incoming, intersection, entropy);

        let tangential_component = Vec3::dot(diffuse, intersection.tangent);
        diffuse =
            (diffuse - intersection.tangent * tangential_component * self.anisotropy).normalized();

        let direction =
            (diffuse * self.glossiness + reflection * (1.0 - self.glossiness)).normalized();

        Ray::new(intersection.position, direction, incoming.wavelength, 1.0)
    }
}

/// A dielectric (glass-like) material. `index_of_refraction` is a pure
/// function of wavelength, since real glass is dispersive.
pub struct Dielectric {
    index_of_refraction: fn(f64) -> f64,
}

impl Dielectric {
    pub fn new(index_of_refraction: fn(f64) -> f64) -> Dielectric {
        Dielectric { index_of_refraction }
    }

    /// BK7 optical glass. <http://refractiveindex.info/?group=GLASSES&material=BK7>
    pub fn bk7_glass() -> Dielectric {
        Dielectric::new(bk7_index_of_refraction)
    }

    /// SF10 optical glass (dense flint). <http://refractiveindex.info/?group=GLASSES&material=SF11>
    pub fn sf10_glass() -> Dielectric {
        Dielectric::new(sf10_index_of_refraction)
    }
}

fn bk7_index_of_refraction(wavelength: f64) -> f64 {
    let w2 = wavelength * wavelength * 1.0e-6;
    (1.0 + 1.03961212 * w2 / (w2 - 0.00600069867)
        + 0.231792344 * w2 / (w2 - 0.0200179144)
        + 1.01046945 * w2 / (w2 - 103.560653))
        .sqrt()
}

fn sf10_index_of_refraction(wavelength: f64) -> f64 {
    let w2 = wavelength * wavelength * 1.0e-6;
    (1.0 + 1.73759695 * w2 / (w2 - 0.013188707)
        + 0.313747346 * w2 / (w2 - 0.0623068142)
        + 1.89878101 * w2 / (w2 - 155.23629))
        .sqrt()
}

impl ReflectiveMaterial for Dielectric {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        _entropy: &mut EntropySource,
    ) -> Ray {
        let mut cos_i = -Vec3::dot(incoming.direction, intersection.normal);
        let mut index_of_refraction = (self.index_of_refraction)(incoming.wavelength);
        let mut normal = intersection.normal;

        if cos_i > 0.0 {
            // Entering the material: air (n=1) over the material's IOR.
            index_of_refraction = 1.0 / index_of_refraction;
        } else {
            normal = -intersection.normal;
            cos_i = -cos_i;
        }

        let sin_theta_squared = index_of_refraction * index_of_refraction * (1.0 - cos_i * cos_i);

        let direction = if sin_theta_squared > 1.0 {
            // Total internal reflection.
            incoming.direction.reflect(intersection.normal)
        } else {
            let cos_t = (1.0 - sin_theta_squared).sqrt();
            incoming.direction * index_of_refraction
                + normal * (index_of_refraction * cos_i - cos_t)
        };

        Ray::new(intersection.position, direction, incoming.wavelength, 1.0)
    }
}

/// Not physically accurate, chosen purely because it looks good: reflects
/// or passes through based on grazing angle, and modulates probability
/// with a thin-film-like phase shift. Constants are reproduced verbatim,
/// not reinterpreted.
pub struct SoapBubble;

impl ReflectiveMaterial for SoapBubble {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        let cos_alpha = Vec3::dot(incoming.direction, intersection.normal);

        let direction = if entropy.unit() - 0.3 > cos_alpha.abs() {
            incoming.direction.reflect(intersection.normal)
        } else {
            incoming.direction
        };

        let phase_shift = (incoming.wavelength - 380.0) / 200.0 * PI;
        let cos_phi = Vec3::dot(direction, intersection.normal).clamp(-0.999, 0.999);
        let cos_theta = Vec3::dot(direction, intersection.tangent).clamp(-0.999, 0.999);
        let probability = (phase_shift - cos_phi.acos() * 3.0 - cos_theta.acos() * 2.0 + PI * 0.5)
            .cos()
            * 0.1
            + 0.9;

        Ray::new(intersection.position, direction, incoming.wavelength, probability)
    }
}

/// Another aesthetic-only material: a random mix of diffuse and mirror
/// reflection, modulated by a thin-film-like phase shift. Constants are
/// reproduced verbatim, not reinterpreted.
pub struct Iridescent;

impl ReflectiveMaterial for Iridescent {
    fn sample_outgoing_ray(
        &self,
        incoming: &Ray,
        intersection: &Intersection,
        entropy: &mut EntropySource,
    ) -> Ray {
        let reflection = incoming.direction.reflect(intersection.normal);
        let diffuse = cosine_sample(incoming, intersection, entropy);

        let glossiness = entropy.unit();
        let direction = (diffuse * glossiness + reflection * (1.0 - glossiness)).normalized();

        let phase_shift = (incoming.wavelength - 380.0) / 200.0 * PI;
        let cos_phi = Vec3::dot(direction, intersection.normal).clamp(-0.999, 0.999);
        let cos_theta = Vec3::dot(direction, intersection.tangent).clamp(-0.999, 0.999);
        let probability =
            (phase_shift + cos_phi.acos() * 3.0 - cos_theta.acos() * 2.0).cos() * 0.5 + 0.5;

        Ray::new(intersection.position, direction, incoming.wavelength, probability)
    }
}

const PLANCK_CONSTANT: f64 = 6.62606957e-34;
const BOLTZMANN_CONSTANT: f64 = 1.3806488e-23;
const SPEED_OF_LIGHT: f64 = 299_792_458.0;
const WIEN_CONSTANT: f64 = 2.897772126e-3;

fn boltzmann(wavelength: f64, temperature: f64) -> f64 {
    let f = SPEED_OF_LIGHT / (wavelength * 1.0e-9);
    (2.0 * PLANCK_CONSTANT * f * f * f)
        / (SPEED_OF_LIGHT * SPEED_OF_LIGHT
            * ((PLANCK_CONSTANT * f / (BOLTZMANN_CONSTANT * temperature)).exp() - 1.0))
}

/// A light source whose spectral distribution follows Planck's law.
/// `intensity` is the peak radiance after normalisation, since only the
/// spectral shape (not the absolute brightness) of a black body matters
/// for a light source.
pub struct BlackBody {
    pub temperature: f64,
    normalisation_factor: f64,
}

impl BlackBody {
    pub fn new(temperature_kelvin: f64, intensity: f64) -> BlackBody {
        let peak_wavelength_nm = (WIEN_CONSTANT / temperature_kelvin) * 1.0e9;
        let normalisation_factor = intensity / boltzmann(peak_wavelength_nm, temperature_kelvin);
        BlackBody { temperature: temperature_kelvin, normalisation_factor }
    }
}

impl EmissiveMaterial for BlackBody {
    fn emitted_intensity(&self, wavelength: f64) -> f64 {
        boltzmann(wavelength, self.temperature) * self.normalisation_factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entropy() -> EntropySource {
        EntropySource::new(1)
    }

    fn flat_intersection() -> Intersection {
        Intersection {
            position: Vec3::zero(),
            normal: Vec3::new(0.0, 1.0, 0.0),
            tangent: Vec3::new(1.0, 0.0, 0.0),
            distance: 1.0,
        }
    }

    fn downward_ray() -> Ray {
        Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 550.0, 1.0)
    }

    #[test]
    fn diffuse_materials_scatter_above_the_surface() {
        let mut entropy = entropy();
        let intersection = flat_intersection();
        let incoming = downward_ray();

        for material in [DiffuseGrey::new(0.8), DiffuseGrey::new(1.0)] {
            let ray = material.sample_outgoing_ray(&incoming, &intersection, &mut entropy);
            assert!(Vec3::dot(ray.direction, intersection.normal) > 0.0);
            assert!(ray.probability >= 0.0);
        }
    }

    #[test]
    fn perfect_mirror_reflects_straight_back() {
        let intersection = flat_intersection();
        let incoming = downward_ray();
        let ray = PerfectMirror.sample_outgoing_ray(&incoming, &intersection, &mut entropy());
        assert!((ray.direction.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn dielectric_directions_stay_unit_length_ish() {
        let intersection = flat_intersection();
        let incoming = downward_ray();
        let glass = Dielectric::bk7_glass();
        let ray = glass.sample_outgoing_ray(&incoming, &intersection, &mut entropy());
        assert!(ray.direction.length() > 0.0);
    }

    #[test]
    fn black_body_intensity_is_nonnegative_across_the_visible_range() {
        let sun = BlackBody::new(5778.0, 1.0);
        let mut lambda = 380.0;
        while lambda <= 780.0 {
            assert!(sun.emitted_intensity(lambda) >= 0.0);
            lambda += 10.0;
        }
    }

    #[test]
    fn black_body_peaks_near_its_own_wien_wavelength() {
        let warm_white = BlackBody::new(6504.0, 1.0);
        let peak_nm = (WIEN_CONSTANT / 6504.0) * 1.0e9;
        assert!((warm_white.emitted_intensity(peak_nm) - 1.0).abs() < 1e-6);
    }
}
