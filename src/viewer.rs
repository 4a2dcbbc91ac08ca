//! Displaying the image the pipeline tonemaps.
//!
//! The coordinator hands each freshly tonemapped frame to a `Viewer`. A
//! `MinifbViewer` opens a live window; tests and headless runs use
//! `NullViewer` instead, which just drops every frame on the floor.

use minifb::{Window, WindowOptions};

use crate::error::RenderError;

pub trait Viewer {
    /// Displays `rgb` (tightly packed 8-bit RGB triples, row-major,
    /// `width * height * 3` bytes long). Returns `false` once the viewer
    /// has been closed and rendering should stop.
    fn display(&mut self, rgb: &[u8]) -> bool;
}

/// A live window backed by `minifb`.
pub struct MinifbViewer {
    window: Window,
    width: usize,
    height: usize,
    buffer: Vec<u32>,
}

impl MinifbViewer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<MinifbViewer, RenderError> {
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| RenderError::ViewerUnavailable { reason: e.to_string() })?;
        Ok(MinifbViewer { window, width, height, buffer: vec![0; width * height] })
    }
}

impl Viewer for MinifbViewer {
    fn display(&mut self, rgb: &[u8]) -> bool {
        for (pixel, chunk) in self.buffer.iter_mut().zip(rgb.chunks_exact(3)) {
            let [r, g, b] = [chunk[0], chunk[1], chunk[2]];
            *pixel = u32::from_be_bytes([0, r, g, b]);
        }

        if self
            .window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .is_err()
        {
            return false;
        }

        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }
}

/// Discards every frame. Used for headless rendering and tests.
pub struct NullViewer;

impl Viewer for NullViewer {
    fn display(&mut self, _rgb: &[u8]) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_viewer_always_stays_open() {
        let mut viewer = NullViewer;
        assert!(viewer.display(&[0u8; 12]));
        assert!(viewer.display(&[255u8; 12]));
    }
}
