use crate::components::{segmented_toggle, slider_group};
use crate::message::Message;
use crate::utils::format_hu;
use crate::viewer::SeriesViewer;
use crate::windowing::{WindowControl, WindowLimits, WindowMode, WindowParam};
use iced::widget::image::Handle;
use iced::widget::{button, center, column, mouse_area, row, text, Column, Image, Row};
use iced::{Element, Length};
use std::ops::RangeInclusive;

/// The slice image. Right-drag adjusts the window, the wheel steps slices.
pub fn image_panel(
    handle: Option<&Handle>,
    viewer: Option<&SeriesViewer>,
) -> Element<'static, Message> {
    let content: Element<'static, Message> = match (handle, viewer) {
        (Some(handle), Some(_)) => Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fill)
            .into(),
        (None, Some(viewer)) if viewer.is_loading() => center(text("Loading slice…")).into(),
        (None, Some(viewer)) if viewer.slice_count() == 0 => {
            center(text("This series has no slices")).into()
        }
        (None, Some(_)) => center(text("No preview available for this slice")).into(),
        (_, None) => center(text("Select a series to view its slices")).into(),
    };

    mouse_area(content)
        .on_right_press(Message::DragStarted)
        .on_right_release(Message::DragEnded)
        .on_exit(Message::DragEnded)
        .on_move(Message::PointerMoved)
        .on_scroll(Message::ViewerScrolled)
        .into()
}

pub fn slice_controls(viewer: &SeriesViewer) -> Row<'static, Message> {
    let count = viewer.slice_count();
    let last = count.saturating_sub(1);
    let position = viewer.position();
    let value_text = if count == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", position + 1, count)
    };

    slider_group(
        "Slice",
        0.0..=last.max(1) as f64,
        position as f64,
        value_text,
        Message::SetSlice,
        (position > 0).then_some(Message::StepSlice(-1)),
        (position < last).then_some(Message::StepSlice(1)),
    )
}

pub fn window_controls(
    control: &WindowControl,
    limits: WindowLimits,
    can_export: bool,
) -> Column<'static, Message> {
    let window = control.window();
    let mode_toggle = segmented_toggle(
        ("Level / Width", WindowMode::LevelWidth),
        ("Min / Max", WindowMode::MinMax),
        control.mode(),
        Message::SetWindowMode,
    );

    let group = |label: &'static str,
                 param: WindowParam,
                 range: RangeInclusive<f64>,
                 value: f64| {
        slider_group(
            label,
            range,
            value,
            format_hu(value),
            move |value| Message::SetWindow(param, value),
            Some(Message::NudgeWindow(param, -1.0)),
            Some(Message::NudgeWindow(param, 1.0)),
        )
    };

    let sliders = match control.mode() {
        WindowMode::LevelWidth => column![
            group("Window Level", WindowParam::Level, limits.level, window.level()),
            group("Window Width", WindowParam::Width, limits.width, window.width()),
        ],
        WindowMode::MinMax => column![
            group("Window Min", WindowParam::Min, limits.bounds.clone(), window.min()),
            group("Window Max", WindowParam::Max, limits.bounds, window.max()),
        ],
    }
    .spacing(6);

    let actions = row![
        button("Reset Window").on_press(Message::ResetWindow),
        button("Export PNG").on_press_maybe(can_export.then_some(Message::ExportPng)),
    ]
    .spacing(8);

    column![mode_toggle, sliders, actions].spacing(10)
}
