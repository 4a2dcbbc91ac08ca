//! `TonemapUnit` — converts the gather buffer's unweighted CIE XYZ values
//! into a displayable 8-bit sRGB image.

use crate::color::srgb;
use crate::geometry::Vec3;
use crate::pipeline::gather_unit::GatherUnit;

pub struct TonemapUnit {
    pub image_width: usize,
    pub image_height: usize,
    pub rgb_buffer: Vec<u8>,
}

impl TonemapUnit {
    pub fn new(width: usize, height: usize) -> TonemapUnit {
        TonemapUnit { image_width: width, image_height: height, rgb_buffer: vec![0; width * height * 3] }
    }

    /// Tonemaps `gather_unit`'s buffer into `rgb_buffer`, in place.
    pub fn tonemap(&mut self, gather_unit: &GatherUnit) {
        let white = self.find_exposure(gather_unit);

        // With no samples yet (or a perfectly black scene) `white` is
        // zero, and `log(v / white + 1)` would divide by zero. There is
        // nothing to show yet, so emit a black frame instead.
        if white == 0.0 {
            for byte in &mut self.rgb_buffer {
                *byte = 0;
            }
            return;
        }

        let log4 = 4.0_f64.ln();
        for (i, cie) in gather_unit.tristimulus_buffer.iter().enumerate() {
            let exposed = Vec3::new(
                (cie.x / white + 1.0).ln() / log4,
                (cie.y / white + 1.0).ln() / log4,
                (cie.z / white + 1.0).ln() / log4,
            );
            let rgb = srgb::from_xyz(exposed);
            let [r, g, b] = srgb::quantize(rgb);
            self.rgb_buffer[i * 3] = r;
            self.rgb_buffer[i * 3 + 1] = g;
            self.rgb_buffer[i * 3 + 2] = b;
        }
    }

    /// The maximum acceptable intensity: one standard deviation above the
    /// mean luminance (CIE Y).
    fn find_exposure(&self, gather_unit: &GatherUnit) -> f64 {
        let n = (self.image_width * self.image_height) as f64;
        let tristimuli = &gather_unit.tristimulus_buffer;

        let mean = tristimuli.iter().map(|cie| cie.y).sum::<f64>() / n;
        let sqr_mean = tristimuli.iter().map(|cie| cie.y * cie.y).sum::<f64>() / n;
        let variance = sqr_mean - mean * mean;

        mean + variance.max(0.0).sqrt()
    }
}
