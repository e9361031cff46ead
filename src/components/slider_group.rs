use std::ops::RangeInclusive;

use crate::message::Message;
use iced::widget::{button, row, slider, text, Row};
use iced::{Alignment, Length};

const STEP_BUTTON_WIDTH: f32 = 28.0;
const VALUE_WIDTH: f32 = 64.0;

/// `label  [slider]  -  value  +`
pub fn slider_group<'a, F>(
    label: &'a str,
    range: RangeInclusive<f64>,
    value: f64,
    value_text: String,
    on_change: F,
    on_decrement: Option<Message>,
    on_increment: Option<Message>,
) -> Row<'a, Message>
where
    F: Fn(f64) -> Message + 'a,
{
    row![
        text(label).size(14).width(Length::Fixed(150.0)),
        slider(range, value, on_change)
            .step(1.0)
            .width(Length::Fill),
        button(text("-").center())
            .width(Length::Fixed(STEP_BUTTON_WIDTH))
            .on_press_maybe(on_decrement),
        text(value_text).size(14).width(Length::Fixed(VALUE_WIDTH)).center(),
        button(text("+").center())
            .width(Length::Fixed(STEP_BUTTON_WIDTH))
            .on_press_maybe(on_increment),
    ]
    .spacing(6)
    .align_y(Alignment::Center)
}
