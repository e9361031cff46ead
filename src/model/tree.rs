use std::fmt;

/// Identity of one series in the study tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub patient_id: String,
    pub study_instance_uid: String,
    pub series_instance_uid: String,
}

impl SeriesKey {
    pub fn new(patient_id: &str, study_instance_uid: &str, series_instance_uid: &str) -> Self {
        Self {
            patient_id: patient_id.to_string(),
            study_instance_uid: study_instance_uid.to_string(),
            series_instance_uid: series_instance_uid.to_string(),
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} / {}",
            self.patient_id, self.study_instance_uid, self.series_instance_uid
        )
    }
}

/// Collapsible node of the study tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TreeNodeKey {
    Patient(String),
    Study { patient: String, study: String },
}

impl TreeNodeKey {
    pub fn patient(id: &str) -> Self {
        Self::Patient(id.to_string())
    }

    pub fn study(patient: &str, study: &str) -> Self {
        Self::Study {
            patient: patient.to_string(),
            study: study.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SidebarMode {
    #[default]
    Studies,
    Folders,
}
