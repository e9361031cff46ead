use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::loader::read_slice_header;
use super::{SeriesKey, SliceHeader, SliceRef};

/// Patient → study → series tree built from the registered folders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyIndex {
    patients: BTreeMap<String, PatientNode>,
    indexed_files: usize,
    skipped_files: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientNode {
    pub studies: BTreeMap<String, StudyNode>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyNode {
    pub series: BTreeMap<String, Arc<SeriesNode>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesNode {
    pub key: SeriesKey,
    pub description: Option<String>,
    pub modality: Option<String>,
    pub slices: Vec<SliceRef>,
}

impl StudyIndex {
    pub fn patients(&self) -> impl Iterator<Item = (&str, &PatientNode)> {
        self.patients.iter().map(|(id, node)| (id.as_str(), node))
    }

    pub fn series(&self, key: &SeriesKey) -> Option<Arc<SeriesNode>> {
        self.patients
            .get(&key.patient_id)?
            .studies
            .get(&key.study_instance_uid)?
            .series
            .get(&key.series_instance_uid)
            .cloned()
    }

    pub fn series_count(&self) -> usize {
        self.patients
            .values()
            .flat_map(|patient| patient.studies.values())
            .map(|study| study.series.len())
            .sum()
    }

    pub fn indexed_files(&self) -> usize {
        self.indexed_files
    }

    pub fn skipped_files(&self) -> usize {
        self.skipped_files
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}

/// Scans `folders` recursively and groups every readable DICOM file by
/// patient, study and series. Unreadable files and missing folders are
/// skipped.
pub fn build_index(folders: &[PathBuf]) -> StudyIndex {
    let mut builder = IndexBuilder::default();
    let mut seen = BTreeSet::new();

    for folder in folders {
        for path in discover_files(folder) {
            let identity = fs::canonicalize(&path).unwrap_or_else(|_| path.clone());
            if !seen.insert(identity) {
                continue;
            }

            match read_slice_header(&path) {
                Ok(header) => builder.insert(header),
                Err(err) => {
                    log::debug!("Skipping {}: {err}", path.display());
                    builder.skipped_files += 1;
                }
            }
        }
    }

    let index = builder.finish();
    log::info!(
        "Indexed {} file(s) into {} series, skipped {}",
        index.indexed_files,
        index.series_count(),
        index.skipped_files
    );
    index
}

fn discover_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        log::warn!("Scan folder is missing or not a directory: {}", root.display());
        return Vec::new();
    }

    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Cannot read entry under {}: {err}", root.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect()
}

#[derive(Default)]
struct IndexBuilder {
    series: BTreeMap<SeriesKey, SeriesNode>,
    indexed_files: usize,
    skipped_files: usize,
}

impl IndexBuilder {
    fn insert(&mut self, header: SliceHeader) {
        let key = SeriesKey::new(
            &header.patient_id,
            &header.study_instance_uid,
            &header.series_instance_uid,
        );
        let node = self
            .series
            .entry(key.clone())
            .or_insert_with(|| SeriesNode {
                key,
                description: None,
                modality: None,
                slices: Vec::new(),
            });

        if node.description.is_none() {
            node.description = header.series_description.clone();
        }
        if node.modality.is_none() {
            node.modality = header.modality.clone();
        }
        node.slices.push(SliceRef::from(&header));
        self.indexed_files += 1;
    }

    fn finish(self) -> StudyIndex {
        let mut patients: BTreeMap<String, PatientNode> = BTreeMap::new();

        for (key, mut node) in self.series {
            node.slices.sort_by(compare_slices);
            patients
                .entry(key.patient_id.clone())
                .or_default()
                .studies
                .entry(key.study_instance_uid.clone())
                .or_default()
                .series
                .insert(key.series_instance_uid, Arc::new(node));
        }

        StudyIndex {
            patients,
            indexed_files: self.indexed_files,
            skipped_files: self.skipped_files,
        }
    }
}

/// Instance number first (numbered slices before unnumbered ones), then
/// position along the acquisition axis, then path.
fn compare_slices(a: &SliceRef, b: &SliceRef) -> Ordering {
    compare_present_first(a.instance_number, b.instance_number, |x, y| x.cmp(y))
        .then_with(|| {
            compare_present_first(a.slice_position, b.slice_position, |x, y| x.total_cmp(y))
        })
        .then_with(|| a.path.cmp(&b.path))
}

fn compare_present_first<T>(
    a: Option<T>,
    b: Option<T>,
    compare: impl Fn(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
