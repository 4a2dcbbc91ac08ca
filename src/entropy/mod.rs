//! Per-thread random number supply for the Monte Carlo estimator.
//!
//! Each [`TraceUnit`](crate::pipeline::trace_unit::TraceUnit) owns exactly
//! one `EntropySource`; it is never shared or locked.

use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Vec3;

pub struct EntropySource {
    rng: StdRng,
}

impl EntropySource {
    pub fn new(seed: u64) -> EntropySource {
        EntropySource { rng: StdRng::seed_from_u64(seed) }
    }

    /// Uniform in `[-1, 1]`.
    pub fn bi_unit(&mut self) -> f64 {
        self.rng.gen_range(-1.0..=1.0)
    }

    /// Uniform in `[0, 1]`.
    pub fn unit(&mut self) -> f64 {
        self.rng.gen_range(0.0..=1.0)
    }

    /// Uniform in `[0, 2*pi)`.
    pub fn longitude(&mut self) -> f64 {
        self.rng.gen_range(0.0..(2.0 * PI))
    }

    /// Uniform in `[-pi/2, pi/2]`.
    pub fn latitude(&mut self) -> f64 {
        self.rng.gen_range(-PI / 2.0..=PI / 2.0)
    }

    /// Uniform in `[380, 780]` nanometres.
    pub fn wavelength(&mut self) -> f64 {
        self.rng.gen_range(380.0..=780.0)
    }

    /// A unit vector distributed uniformly over the hemisphere `z >= 0`.
    pub fn hemisphere_vector(&mut self) -> Vec3 {
        let phi = self.longitude();
        let theta = self.latitude();
        Vec3::new(phi.cos() * theta.sin(), phi.sin() * theta.sin(), theta.cos())
    }

    /// A unit vector over the hemisphere `z >= 0`, density proportional to
    /// `cos(theta)` with respect to solid angle.
    pub fn cosine_hemisphere_vector(&mut self) -> Vec3 {
        let phi = self.longitude();
        let r_squared = self.unit();
        let r = r_squared.sqrt();
        Vec3::new(phi.cos() * r, phi.sin() * r, (1.0 - r_squared).sqrt())
    }

    /// Draws a value usable to seed the next entropy source in the chain,
    /// so that successive `TraceUnit`s do not repeat each other's streams.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bi_unit_stays_in_range() {
        let mut source = EntropySource::new(1);
        for _ in 0..10_000 {
            let v = source.bi_unit();
            assert!(v >= -1.0 && v <= 1.0);
        }
    }

    #[test]
    fn wavelength_stays_in_visible_range() {
        let mut source = EntropySource::new(2);
        for _ in 0..10_000 {
            let w = source.wavelength();
            assert!(w >= 380.0 && w <= 780.0);
        }
    }

    #[test]
    fn hemisphere_vectors_are_unit_length_with_nonnegative_z() {
        let mut source = EntropySource::new(3);
        for _ in 0..1_000 {
            let v = source.hemisphere_vector();
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-9);

            let c = source.cosine_hemisphere_vector();
            assert!(c.z >= 0.0);
            assert!((c.length() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_reproduces_the_same_stream() {
        let mut a = EntropySource::new(42);
        let mut b = EntropySource::new(42);
        for _ in 0..100 {
            assert_eq!(a.unit(), b.unit());
        }
    }

    #[test]
    fn seed_chaining_produces_independent_streams() {
        let mut first = EntropySource::new(7);
        let next_seed = first.next_seed();
        assert_ne!(next_seed, 7);
        let mut second = EntropySource::new(next_seed);
        let sample_a: Vec<f64> = (0..16).map(|_| first.unit()).collect();
        let sample_b: Vec<f64> = (0..16).map(|_| second.unit()).collect();
        assert_ne!(sample_a, sample_b);
    }
}
