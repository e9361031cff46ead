use std::path::PathBuf;

use crate::error::{Result, ViewerError};
use crate::windowing::Window;

/// Header fields read while indexing, before any pixel data is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceHeader {
    pub path: PathBuf,
    pub patient_id: String,
    pub study_instance_uid: String,
    pub series_instance_uid: String,
    pub sop_instance_uid: Option<String>,
    pub instance_number: Option<i32>,
    /// Position along the acquisition axis, in mm.
    pub slice_position: Option<f64>,
    pub series_description: Option<String>,
    pub modality: Option<String>,
}

/// Reference to a slice file inside a series; pixels are loaded on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceRef {
    pub path: PathBuf,
    pub sop_instance_uid: Option<String>,
    pub instance_number: Option<i32>,
    pub slice_position: Option<f64>,
}

impl From<&SliceHeader> for SliceRef {
    fn from(header: &SliceHeader) -> Self {
        Self {
            path: header.path.clone(),
            sop_instance_uid: header.sop_instance_uid.clone(),
            instance_number: header.instance_number,
            slice_position: header.slice_position,
        }
    }
}

/// Modality rescale from stored sample values to HU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    pub slope: f64,
    pub intercept: f64,
}

impl Rescale {
    pub fn apply(&self, stored: i32) -> f64 {
        stored as f64 * self.slope + self.intercept
    }
}

impl Default for Rescale {
    fn default() -> Self {
        Self {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

/// A decoded grayscale slice.
#[derive(Debug, Clone)]
pub struct Slice {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    stored: Vec<i32>,
    pub rescale: Rescale,
    /// Row and column spacing in mm.
    pub pixel_spacing: Option<(f64, f64)>,
    /// MONOCHROME1: low values are displayed bright.
    pub invert: bool,
    pub window_hint: Option<Window>,
    hu_range: Option<(f64, f64)>,
}

impl Slice {
    pub fn new(
        path: PathBuf,
        width: u32,
        height: u32,
        stored: Vec<i32>,
        rescale: Rescale,
    ) -> Result<Self> {
        let expected = (width as usize).checked_mul(height as usize);
        if expected != Some(stored.len()) {
            return Err(ViewerError::UnsupportedImage(format!(
                "{}: decoded {} samples for a {width}x{height} slice",
                path.display(),
                stored.len()
            )));
        }

        let hu_range = stored.iter().fold(None, |acc: Option<(i32, i32)>, &value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        });
        let hu_range = hu_range.map(|(lo, hi)| {
            let (a, b) = (rescale.apply(lo), rescale.apply(hi));
            // negative slopes flip the order
            (a.min(b), a.max(b))
        });

        Ok(Self {
            path,
            width,
            height,
            stored,
            rescale,
            pixel_spacing: None,
            invert: false,
            window_hint: None,
            hu_range,
        })
    }

    pub fn with_pixel_spacing(mut self, spacing: Option<(f64, f64)>) -> Self {
        self.pixel_spacing = spacing;
        self
    }

    pub fn with_invert(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_window_hint(mut self, window: Option<Window>) -> Self {
        self.window_hint = window;
        self
    }

    pub fn hu_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.stored.iter().map(|&value| self.rescale.apply(value))
    }

    pub fn hu_range(&self) -> Option<(f64, f64)> {
        self.hu_range
    }

    /// The file's own window when it has one, else the full HU span.
    pub fn initial_window(&self) -> Window {
        self.window_hint
            .or_else(|| self.hu_range.map(|(min, max)| Window::spanning(min, max)))
            .unwrap_or_default()
    }
}
