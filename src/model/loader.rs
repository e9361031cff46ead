use std::path::Path;

use dicom::core::Tag;
use dicom::dictionary_std::tags;
use dicom::object::{open_file, DefaultDicomObject, OpenFileOptions};
use dicom::pixeldata::{
    ConvertOptions, ModalityLutOption, PhotometricInterpretation, PixelDecoder,
};

use super::{Rescale, Slice, SliceHeader};
use crate::error::{Result, ViewerError};
use crate::windowing::Window;

const UNKNOWN: &str = "Unknown";

/// Reads the identifying header of a DICOM file, stopping before Pixel Data.
pub fn read_slice_header(path: &Path) -> Result<SliceHeader> {
    let object = OpenFileOptions::new()
        .read_until(tags::PIXEL_DATA)
        .open_file(path)?;

    let text_or_unknown =
        |tag: Tag| attribute_text(&object, tag).unwrap_or_else(|| UNKNOWN.to_string());

    Ok(SliceHeader {
        path: path.to_path_buf(),
        patient_id: text_or_unknown(tags::PATIENT_ID),
        study_instance_uid: text_or_unknown(tags::STUDY_INSTANCE_UID),
        series_instance_uid: text_or_unknown(tags::SERIES_INSTANCE_UID),
        sop_instance_uid: attribute_text(&object, tags::SOP_INSTANCE_UID),
        instance_number: attribute_int(&object, tags::INSTANCE_NUMBER),
        slice_position: slice_position(&object),
        series_description: attribute_text(&object, tags::SERIES_DESCRIPTION),
        modality: attribute_text(&object, tags::MODALITY),
    })
}

/// Decodes the first frame of a grayscale DICOM file.
pub fn load_slice(path: &Path) -> Result<Slice> {
    log::info!("Loading slice: {}", path.display());
    let object = open_file(path)?;

    let decoded = object
        .decode_pixel_data()
        .map_err(|err| ViewerError::PixelData(format!("{}: {err}", path.display())))?;

    if decoded.number_of_frames() == 0 {
        return Err(ViewerError::UnsupportedImage(format!(
            "{}: no frames in pixel data",
            path.display()
        )));
    }
    if decoded.samples_per_pixel() != 1 {
        return Err(ViewerError::UnsupportedImage(format!(
            "{}: SamplesPerPixel={} (only grayscale slices can be windowed)",
            path.display(),
            decoded.samples_per_pixel()
        )));
    }
    if decoded.number_of_frames() > 1 {
        log::debug!(
            "{}: {} frames, showing the first",
            path.display(),
            decoded.number_of_frames()
        );
    }

    // Rescale is applied by `Slice`, so ask the decoder for raw stored values.
    let options = ConvertOptions::new().with_modality_lut(ModalityLutOption::None);
    let stored: Vec<i32> = decoded
        .to_vec_frame_with_options(0, &options)
        .map_err(|err| ViewerError::PixelData(format!("{}: {err}", path.display())))?;

    let rescale = Rescale {
        slope: attribute_float(&object, tags::RESCALE_SLOPE)
            .filter(|slope| *slope != 0.0)
            .unwrap_or(1.0),
        intercept: attribute_float(&object, tags::RESCALE_INTERCEPT).unwrap_or(0.0),
    };
    let invert = matches!(
        decoded.photometric_interpretation(),
        PhotometricInterpretation::Monochrome1
    );

    let slice = Slice::new(
        path.to_path_buf(),
        decoded.columns(),
        decoded.rows(),
        stored,
        rescale,
    )?
    .with_pixel_spacing(pixel_spacing(&object))
    .with_invert(invert)
    .with_window_hint(window_hint(&object));

    Ok(slice)
}

fn window_hint(object: &DefaultDicomObject) -> Option<Window> {
    let center = attribute_float(object, tags::WINDOW_CENTER)?;
    let width = attribute_float(object, tags::WINDOW_WIDTH)?;
    Some(Window::new(center, width))
}

fn pixel_spacing(object: &DefaultDicomObject) -> Option<(f64, f64)> {
    match attribute_floats(object, tags::PIXEL_SPACING)?.as_slice() {
        [row, column, ..] => Some((*row, *column)),
        _ => None,
    }
}

/// Position along the acquisition axis: `ImagePositionPatient` projected on
/// the slice normal, its z coordinate without orientation, else `SliceLocation`.
fn slice_position(object: &DefaultDicomObject) -> Option<f64> {
    let position = attribute_floats(object, tags::IMAGE_POSITION_PATIENT)
        .filter(|values| values.len() == 3);

    let Some(position) = position else {
        return attribute_float(object, tags::SLICE_LOCATION);
    };

    let normal = attribute_floats(object, tags::IMAGE_ORIENTATION_PATIENT)
        .and_then(|orientation| orientation_normal(&orientation));

    Some(match normal {
        Some(normal) => position.iter().zip(normal).map(|(p, n)| p * n).sum(),
        None => position[2],
    })
}

pub(crate) fn orientation_normal(orientation: &[f64]) -> Option<[f64; 3]> {
    let &[rx, ry, rz, cx, cy, cz] = orientation else {
        return None;
    };
    let normal = [ry * cz - rz * cy, rz * cx - rx * cz, rx * cy - ry * cx];
    let length = normal.iter().map(|v| v * v).sum::<f64>().sqrt();
    if length < 1e-6 {
        return None;
    }
    Some(normal.map(|v| v / length))
}

fn attribute_text(object: &DefaultDicomObject, tag: Tag) -> Option<String> {
    object
        .element(tag)
        .ok()
        .and_then(|element| element.to_str().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn attribute_floats(object: &DefaultDicomObject, tag: Tag) -> Option<Vec<f64>> {
    let text = attribute_text(object, tag)?;
    text.split('\\')
        .map(|part| part.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect()
}

fn attribute_float(object: &DefaultDicomObject, tag: Tag) -> Option<f64> {
    attribute_floats(object, tag)?.first().copied()
}

fn attribute_int(object: &DefaultDicomObject, tag: Tag) -> Option<i32> {
    attribute_text(object, tag)?
        .split('\\')
        .next()
        .and_then(|value| value.trim().parse::<i32>().ok())
}
