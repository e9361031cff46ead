//! DICOM fixtures written on the fly for tests.

use std::path::Path;

use dicom::core::{DataElement, PrimitiveValue, Tag, VR};
use dicom::dictionary_std::{tags, uids};
use dicom::object::{FileMetaTableBuilder, InMemDicomObject};

pub struct SliceFixture {
    patient_id: String,
    study_uid: String,
    series_uid: String,
    sop_uid: String,
    instance_number: Option<i32>,
    position_z: Option<f64>,
    rows: u16,
    columns: u16,
    pixels: Vec<i16>,
    rescale: (f64, f64),
    window: Option<(f64, f64)>,
    photometric: &'static str,
}

impl SliceFixture {
    pub fn new(series_uid: &str, sop_uid: &str) -> Self {
        Self {
            patient_id: "PAT001".to_string(),
            study_uid: "1.2.3".to_string(),
            series_uid: series_uid.to_string(),
            sop_uid: sop_uid.to_string(),
            instance_number: None,
            position_z: None,
            rows: 2,
            columns: 2,
            pixels: vec![0, 100, 200, 300],
            rescale: (1.0, 0.0),
            window: None,
            photometric: "MONOCHROME2",
        }
    }

    pub fn patient(mut self, patient_id: &str) -> Self {
        self.patient_id = patient_id.to_string();
        self
    }

    pub fn study(mut self, study_uid: &str) -> Self {
        self.study_uid = study_uid.to_string();
        self
    }

    pub fn instance_number(mut self, number: i32) -> Self {
        self.instance_number = Some(number);
        self
    }

    pub fn position_z(mut self, z: f64) -> Self {
        self.position_z = Some(z);
        self
    }

    pub fn pixels(mut self, rows: u16, columns: u16, pixels: Vec<i16>) -> Self {
        self.rows = rows;
        self.columns = columns;
        self.pixels = pixels;
        self
    }

    pub fn rescale(mut self, slope: f64, intercept: f64) -> Self {
        self.rescale = (slope, intercept);
        self
    }

    pub fn window(mut self, center: f64, width: f64) -> Self {
        self.window = Some((center, width));
        self
    }

    pub fn monochrome1(mut self) -> Self {
        self.photometric = "MONOCHROME1";
        self
    }

    pub fn write(&self, path: &Path) {
        let mut obj = InMemDicomObject::new_empty();

        put_text(&mut obj, tags::SOP_CLASS_UID, VR::UI, uids::CT_IMAGE_STORAGE);
        put_text(&mut obj, tags::SOP_INSTANCE_UID, VR::UI, &self.sop_uid);
        put_text(&mut obj, tags::MODALITY, VR::CS, "CT");
        put_text(&mut obj, tags::PATIENT_ID, VR::LO, &self.patient_id);
        put_text(&mut obj, tags::STUDY_INSTANCE_UID, VR::UI, &self.study_uid);
        put_text(&mut obj, tags::SERIES_INSTANCE_UID, VR::UI, &self.series_uid);
        if let Some(number) = self.instance_number {
            put_text(&mut obj, tags::INSTANCE_NUMBER, VR::IS, &number.to_string());
        }
        if let Some(z) = self.position_z {
            put_text(
                &mut obj,
                tags::IMAGE_POSITION_PATIENT,
                VR::DS,
                &format!("0\\0\\{z}"),
            );
            put_text(
                &mut obj,
                tags::IMAGE_ORIENTATION_PATIENT,
                VR::DS,
                "1\\0\\0\\0\\1\\0",
            );
        }
        put_text(&mut obj, tags::PIXEL_SPACING, VR::DS, "0.5\\0.5");
        put_text(
            &mut obj,
            tags::RESCALE_SLOPE,
            VR::DS,
            &self.rescale.0.to_string(),
        );
        put_text(
            &mut obj,
            tags::RESCALE_INTERCEPT,
            VR::DS,
            &self.rescale.1.to_string(),
        );
        if let Some((center, width)) = self.window {
            put_text(&mut obj, tags::WINDOW_CENTER, VR::DS, &center.to_string());
            put_text(&mut obj, tags::WINDOW_WIDTH, VR::DS, &width.to_string());
        }

        put_u16(&mut obj, tags::SAMPLES_PER_PIXEL, 1);
        put_text(
            &mut obj,
            tags::PHOTOMETRIC_INTERPRETATION,
            VR::CS,
            self.photometric,
        );
        put_u16(&mut obj, tags::ROWS, self.rows);
        put_u16(&mut obj, tags::COLUMNS, self.columns);
        put_u16(&mut obj, tags::BITS_ALLOCATED, 16);
        put_u16(&mut obj, tags::BITS_STORED, 16);
        put_u16(&mut obj, tags::HIGH_BIT, 15);
        put_u16(&mut obj, tags::PIXEL_REPRESENTATION, 1);
        obj.put(DataElement::new(
            tags::PIXEL_DATA,
            VR::OW,
            PrimitiveValue::U16(self.pixels.iter().map(|&value| value as u16).collect()),
        ));

        let file_obj = obj
            .with_meta(
                FileMetaTableBuilder::new()
                    .transfer_syntax(uids::EXPLICIT_VR_LITTLE_ENDIAN)
                    .media_storage_sop_class_uid(uids::CT_IMAGE_STORAGE)
                    .media_storage_sop_instance_uid(self.sop_uid.as_str()),
            )
            .expect("fixture meta should be valid");
        file_obj
            .write_to_file(path)
            .expect("fixture should be written");
    }
}

fn put_text(obj: &mut InMemDicomObject, tag: Tag, vr: VR, value: &str) {
    obj.put(DataElement::new(tag, vr, PrimitiveValue::from(value)));
}

fn put_u16(obj: &mut InMemDicomObject, tag: Tag, value: u16) {
    obj.put(DataElement::new(tag, VR::US, PrimitiveValue::from(value)));
}
