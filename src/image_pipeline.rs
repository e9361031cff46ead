use std::path::Path;

use iced::widget::image::Handle;
use image::{GrayImage, ImageFormat};

use crate::error::{Result, ViewerError};
use crate::model::Slice;
use crate::windowing::Window;

/// An 8-bit grayscale rendering of one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlice {
    pub width: u32,
    pub height: u32,
    pub window: Window,
    pub pixels: Vec<u8>,
}

pub struct SliceRenderer;

impl SliceRenderer {
    /// Rescales, windows and (for MONOCHROME1) inverts every pixel.
    pub fn render(slice: &Slice, window: Window) -> RenderedSlice {
        let pixels = slice
            .hu_values()
            .map(|hu| {
                let gray = window.apply(hu);
                if slice.invert {
                    255 - gray
                } else {
                    gray
                }
            })
            .collect();

        RenderedSlice {
            width: slice.width,
            height: slice.height,
            window,
            pixels,
        }
    }
}

impl RenderedSlice {
    pub fn to_handle(&self) -> Handle {
        let mut rgba = Vec::with_capacity(self.pixels.len() * 4);
        for &gray in &self.pixels {
            rgba.extend_from_slice(&[gray, gray, gray, 255]);
        }
        Handle::from_rgba(self.width, self.height, rgba)
    }

    /// Writes the rendered buffer as an 8-bit grayscale PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let image = GrayImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| {
                ViewerError::UnsupportedImage(format!(
                    "rendered buffer of {} bytes does not match {}x{}",
                    self.pixels.len(),
                    self.width,
                    self.height
                ))
            })?;
        image.save_with_format(path, ImageFormat::Png)?;
        log::info!(
            "Exported slice to {} (level {}, width {})",
            path.display(),
            self.window.level(),
            self.window.width()
        );
        Ok(())
    }
}
