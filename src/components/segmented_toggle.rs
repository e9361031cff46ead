use crate::message::Message;
use iced::widget::text::Wrapping;
use iced::widget::{button, container, row, text, Container};
use iced::{Alignment, Background, Color, Length, Shadow, Theme};

/// Two-segment pill toggle. `on_select` maps the chosen value to a message.
pub fn segmented_toggle<T>(
    left: (&'static str, T),
    right: (&'static str, T),
    current: T,
    on_select: fn(T) -> Message,
) -> Container<'static, Message>
where
    T: Copy + PartialEq + 'static,
{
    let toggle_row = row![
        segmented_toggle_option(left.0, left.1 == current, on_select(left.1), SegmentPosition::Left)
            .width(Length::FillPortion(1)),
        segmented_toggle_option(
            right.0,
            right.1 == current,
            on_select(right.1),
            SegmentPosition::Right
        )
        .width(Length::FillPortion(1)),
    ]
    .spacing(0);

    container(toggle_row)
        .padding(3)
        .width(Length::Fill)
        .style(segmented_container_style)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentPosition {
    Left,
    Right,
}

fn segmented_toggle_option(
    label: &'static str,
    is_active: bool,
    message: Message,
    position: SegmentPosition,
) -> iced::widget::Button<'static, Message> {
    let content = container(text(label).size(14).wrapping(Wrapping::None))
        .width(Length::Fill)
        .height(Length::Fixed(28.0))
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .padding([4, 12]);

    button(content)
        .padding(0)
        .on_press(message)
        .style(move |theme, status| segmented_button_style(theme, status, is_active, position))
}

fn segmented_container_style(theme: &Theme) -> iced::widget::container::Style {
    let palette = theme.extended_palette();

    iced::widget::container::Style {
        background: Some(Background::Color(palette.background.strong.color)),
        border: iced::border::Border {
            color: palette.background.strong.color.scale_alpha(0.6),
            width: 1.0,
            radius: iced::border::Radius::new(999.0),
        },
        ..Default::default()
    }
}

fn segmented_button_style(
    theme: &Theme,
    status: iced::widget::button::Status,
    is_active: bool,
    position: SegmentPosition,
) -> iced::widget::button::Style {
    let palette = theme.extended_palette();

    let background_color = match (status, is_active) {
        (iced::widget::button::Status::Hovered, true) => palette.primary.base.color,
        (iced::widget::button::Status::Hovered, false) => {
            palette.background.base.color.scale_alpha(0.8)
        }
        (iced::widget::button::Status::Pressed, true) => {
            palette.primary.base.color.scale_alpha(0.9)
        }
        (iced::widget::button::Status::Pressed, false) => {
            palette.background.base.color.scale_alpha(0.9)
        }
        (iced::widget::button::Status::Disabled, true) => {
            palette.primary.strong.color.scale_alpha(0.5)
        }
        (iced::widget::button::Status::Disabled, false) => {
            palette.background.strong.color.scale_alpha(0.2)
        }
        (iced::widget::button::Status::Active, true) => palette.primary.strong.color,
        (iced::widget::button::Status::Active, false) => {
            palette.background.strong.color.scale_alpha(0.4)
        }
    };

    let text_color = if is_active {
        palette.primary.strong.text
    } else {
        palette.background.base.text
    };

    let (outer, inner) = (999.0, 10.0);
    let radius = match position {
        SegmentPosition::Left => iced::border::Radius {
            top_left: outer,
            top_right: inner,
            bottom_right: inner,
            bottom_left: outer,
        },
        SegmentPosition::Right => iced::border::Radius {
            top_left: inner,
            top_right: outer,
            bottom_right: outer,
            bottom_left: inner,
        },
    };

    iced::widget::button::Style {
        background: Some(Background::Color(background_color)),
        text_color,
        border: iced::border::Border {
            color: Color::TRANSPARENT,
            width: 0.0,
            radius,
        },
        shadow: Shadow::default(),
    }
}
