use crate::message::Message;
use crate::utils::{format_hu, format_spacing};
use crate::viewer::SeriesViewer;
use crate::windowing::Window;
use iced::widget::text::Wrapping;
use iced::widget::{column, row, text, Column};
use iced::Length;

fn info_row(label: &'static str, value: String) -> iced::widget::Row<'static, Message> {
    row![
        text(label).size(13).width(Length::Fixed(110.0)),
        text(value)
            .size(13)
            .width(Length::Fill)
            .wrapping(Wrapping::Glyph),
    ]
    .spacing(8)
}

/// Facts about the slice on screen and the window applied to it.
pub fn slice_info_panel(
    viewer: Option<&SeriesViewer>,
    window: Window,
) -> Column<'static, Message> {
    let Some(viewer) = viewer else {
        return column![text("No series selected").size(13)];
    };

    let series = viewer.series();
    let mut info = column![
        info_row("Patient", series.key.patient_id.clone()),
        info_row("Series", series.key.series_instance_uid.clone()),
    ];

    if let Some(slice_ref) = viewer.current_ref() {
        info = info.push(info_row("File", slice_ref.path.display().to_string()));
        if let Some(uid) = &slice_ref.sop_instance_uid {
            info = info.push(info_row("SOP UID", uid.clone()));
        }
        if let Some(number) = slice_ref.instance_number {
            info = info.push(info_row("Instance", number.to_string()));
        }
        if let Some(position) = slice_ref.slice_position {
            info = info.push(info_row("Position", format!("{position:.2} mm")));
        }
    }

    if let Some(slice) = viewer.current_slice() {
        info = info
            .push(info_row(
                "Dimensions",
                format!("{} × {}", slice.width, slice.height),
            ))
            .push(info_row("Spacing", format_spacing(slice.pixel_spacing)))
            .push(info_row(
                "Rescale",
                format!(
                    "slope {} / intercept {}",
                    slice.rescale.slope, slice.rescale.intercept
                ),
            ));
        if let Some((lo, hi)) = slice.hu_range() {
            info = info.push(info_row(
                "HU Range",
                format!("{} to {}", format_hu(lo), format_hu(hi)),
            ));
        }
    }

    let (window_min, window_max) = window.bounds();
    info.push(info_row(
        "Window",
        format!(
            "L {} W {} ({} to {})",
            format_hu(window.level()),
            format_hu(window.width()),
            format_hu(window_min),
            format_hu(window_max)
        ),
    ))
    .spacing(4)
}
