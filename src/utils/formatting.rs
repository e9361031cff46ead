use crate::model::SeriesNode;

const MAX_LABEL_LEN: usize = 48;

/// HU values print without a fraction unless they have one.
pub fn format_hu(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}

pub fn format_spacing(spacing: Option<(f64, f64)>) -> String {
    match spacing {
        Some((row, column)) => format!("{row} × {column} mm"),
        None => String::from("n/a"),
    }
}

pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_LEN {
        let mut truncated = label.chars().take(MAX_LABEL_LEN).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        label.to_string()
    }
}

pub fn series_label(series: &SeriesNode) -> String {
    let count = series.slices.len();
    let suffix = if count == 1 { "" } else { "s" };
    let name = series
        .description
        .as_deref()
        .unwrap_or(&series.key.series_instance_uid);
    let modality = series.modality.as_deref().unwrap_or("??");
    format!("{modality} {} ({count} slice{suffix})", truncate_label(name))
}
