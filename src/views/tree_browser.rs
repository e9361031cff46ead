use crate::message::Message;
use crate::model::{SeriesKey, StudyIndex, TreeNodeKey};
use crate::utils::{series_label, truncate_label};
use iced::widget::text::Wrapping;
use iced::widget::{button, column, row, text, Column, Space};
use iced::Length;
use std::collections::BTreeSet;

const INDENT: f32 = 18.0;

pub fn tree_panel<'a>(
    index: &'a StudyIndex,
    collapsed_nodes: &BTreeSet<TreeNodeKey>,
    selected_series: Option<&SeriesKey>,
    scanning: bool,
) -> Column<'a, Message> {
    let root = column![];

    if index.is_empty() {
        let hint = if scanning {
            "Scanning folders…"
        } else {
            "No DICOM series found. Add a folder to scan."
        };
        return root.push(text(hint).wrapping(Wrapping::Word));
    }

    let arrow = |collapsed: bool| if collapsed { "▶" } else { "▼" };

    index
        .patients()
        .fold(root, |column, (patient_id, patient)| {
            let patient_key = TreeNodeKey::patient(patient_id);
            let patient_collapsed = collapsed_nodes.contains(&patient_key);
            let patient_label = format!("{} Patient: {patient_id}", arrow(patient_collapsed));
            let mut column = column.push(row![button(text(patient_label))
                .style(button::text)
                .on_press(Message::ToggleNode(patient_key))]);

            if patient_collapsed {
                return column;
            }

            for (study_uid, study) in &patient.studies {
                let study_key = TreeNodeKey::study(patient_id, study_uid);
                let study_collapsed = collapsed_nodes.contains(&study_key);
                let study_label = format!(
                    "{} Study: {}",
                    arrow(study_collapsed),
                    truncate_label(study_uid)
                );
                column = column.push(row![
                    Space::with_width(Length::Fixed(INDENT)),
                    button(text(study_label))
                        .style(button::text)
                        .on_press(Message::ToggleNode(study_key)),
                ]);

                if study_collapsed {
                    continue;
                }

                for series in study.series.values() {
                    let is_selected = selected_series == Some(&series.key);
                    let label = series_label(series);
                    let button_label = if is_selected {
                        format!("● {label}")
                    } else {
                        label
                    };
                    column = column.push(row![
                        Space::with_width(Length::Fixed(INDENT * 2.0)),
                        button(text(button_label).wrapping(Wrapping::Word))
                            .style(move |theme, status| {
                                if is_selected {
                                    button::primary(theme, status)
                                } else {
                                    button::secondary(theme, status)
                                }
                            })
                            .on_press(Message::SelectSeries(series.key.clone())),
                    ]);
                }
            }

            column
        })
        .spacing(6)
}
