use crate::message::Message;
use crate::model::FolderRegistry;
use iced::widget::text::Wrapping;
use iced::widget::{button, column, row, text, Column};
use iced::{Alignment, Length};

pub fn folder_panel(registry: &FolderRegistry, scanning: bool) -> Column<'_, Message> {
    let actions = row![
        button("Add Folder").on_press(Message::PickFolder),
        button("Rescan").on_press_maybe((!scanning).then_some(Message::Rescan)),
    ]
    .spacing(8);

    let mut list = column![
        actions,
        text(format!("Saved in {}", registry.file().display()))
            .size(12)
            .wrapping(Wrapping::Glyph),
    ];

    if registry.folders().is_empty() {
        return list
            .push(text("No folders registered").wrapping(Wrapping::Word))
            .spacing(8);
    }

    for folder in registry.folders() {
        list = list.push(
            row![
                text(folder.display().to_string())
                    .size(14)
                    .wrapping(Wrapping::Glyph)
                    .width(Length::Fill),
                button(text("Remove").size(13))
                    .style(button::danger)
                    .on_press(Message::RemoveFolder(folder.clone())),
            ]
            .spacing(8)
            .align_y(Alignment::Center),
        );
    }

    list.spacing(8)
}
