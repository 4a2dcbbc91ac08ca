//! `PlotUnit` — splats a `TraceUnit`'s photons into a CIE XYZ screen buffer.

use crate::color::cie1931;
use crate::geometry::Vec3;
use crate::pipeline::trace_unit::TraceUnit;

/// A screen-sized accumulator of unweighted CIE XYZ tristimulus values,
/// filled by splatting photons from one or more `TraceUnit`s.
pub struct PlotUnit {
    pub image_width: usize,
    pub image_height: usize,
    aspect_ratio: f64,
    pub tristimulus_buffer: Vec<Vec3>,
}

impl PlotUnit {
    pub fn new(width: usize, height: usize) -> PlotUnit {
        PlotUnit {
            image_width: width,
            image_height: height,
            aspect_ratio: width as f64 / height as f64,
            tristimulus_buffer: vec![Vec3::zero(); width * height],
        }
    }

    /// Resets the buffer to black.
    pub fn clear(&mut self) {
        for pixel in &mut self.tristimulus_buffer {
            *pixel = Vec3::zero();
        }
    }

    /// Splats every photon of `trace_unit` additively into the buffer.
    pub fn plot(&mut self, trace_unit: &TraceUnit) {
        for photon in &trace_unit.mapped_photons {
            let cie = cie1931::tristimulus(photon.wavelength);
            self.plot_pixel(photon.x, photon.y, cie * photon.probability);
        }
    }

    fn plot_pixel(&mut self, x: f64, y: f64, cie: Vec3) {
        let w = self.image_width;
        let h = self.image_height;

        let px = (x * 0.5 + 0.5) * (w - 1) as f64;
        let py = (y * self.aspect_ratio * 0.5 + 0.5) * (h - 1) as f64;

        let clamp = |v: f64, max: usize| v.max(0.0).min(max as f64) as usize;
        let px1 = clamp(px.floor(), w - 1);
        let px2 = clamp(px.ceil(), w - 1);
        let py1 = clamp(py.floor(), h - 1);
        let py2 = clamp(py.ceil(), h - 1);

        let cx = px - px1 as f64;
        let cy = py - py1 as f64;
        let c11 = (1.0 - cx) * (1.0 - cy);
        let c12 = (1.0 - cx) * cy;
        let c21 = cx * (1.0 - cy);
        let c22 = cx * cy;

        self.tristimulus_buffer[py1 * w + px1] += cie * c11;
        self.tristimulus_buffer[py1 * w + px2] += cie * c21;
        self.tristimulus_buffer[py2 * w + px1] += cie * c12;
        self.tristimulus_buffer[py2 * w + px2] += cie * c22;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entropy::EntropySource;
    use crate::geometry::Quaternion;
    use crate::scene::camera::Camera;
    use crate::scene::Scene;

    #[test]
    fn plotting_conserves_total_probability_mass() {
        let mut plot_unit = PlotUnit::new(8, 8);
        // A photon dead centre splats entirely onto one pixel (cx=cy=0 or
        // close to it), so the sum of all four weights is always 1.
        plot_unit.plot_pixel(0.0, 0.0, Vec3::new(1.0, 1.0, 1.0));
        let sum: f64 = plot_unit.tristimulus_buffer.iter().map(|p| p.x).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn clear_zeroes_every_pixel() {
        let mut plot_unit = PlotUnit::new(4, 4);
        plot_unit.plot_pixel(0.2, -0.3, Vec3::new(1.0, 2.0, 3.0));
        plot_unit.clear();
        assert!(plot_unit.tristimulus_buffer.iter().all(|p| *p == Vec3::zero()));
    }

    #[test]
    fn plotting_a_rendered_trace_unit_never_panics() {
        let scene = Scene::new(Vec::new(), |_| Camera {
            position: Vec3::zero(),
            field_of_view: 1.0,
            focal_distance: 1.0,
            depth_of_field: 1.0,
            chromatic_aberration: 0.0,
            orientation: Quaternion::identity(),
        });
        let mut trace_unit = crate::pipeline::trace_unit::TraceUnit::new(&scene, 5, 8, 8);
        trace_unit.render();
        let mut plot_unit = PlotUnit::new(8, 8);
        plot_unit.plot(&trace_unit);
        let _ = EntropySource::new(1);
    }
}
