use chrono::Local;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{button, column, container, flex_row, icon, row, text};
use cosmic::{Element, theme};

use notepin::core::note::Note;

use crate::components::tag_chip::tag_chip;
use crate::fl;
use crate::message::Message;
use crate::style;

fn body_preview(body: &str) -> String {
    body.lines()
        .take(style::BODY_PREVIEW_LINES)
        .collect::<Vec<_>>()
        .join("\n")
}

fn action_row(note: &Note) -> Element<'static, Message> {
    let pin_label = if note.pinned {
        fl!("note-unpin")
    } else {
        fl!("note-pin")
    };

    row()
        .spacing(4)
        .align_y(Alignment::Center)
        .push(button::text(pin_label).on_press(Message::TogglePin(note.id.clone())))
        .push(button::standard(fl!("note-edit")).on_press(Message::OpenEdit(note.id.clone())))
        .push(
            button::icon(icon::from_name("edit-delete-symbolic"))
                .on_press(Message::ConfirmDelete(note.id.clone())),
        )
        .into()
}

/// One note in the list: title, body preview, tags, last update and actions.
pub fn note_card(note: &Note) -> Element<'static, Message> {
    let mut col = column().spacing(style::CARD_SPACING);

    let mut title_row = row().spacing(4).align_y(Alignment::Center);
    if note.pinned {
        title_row = title_row.push(icon::from_name("view-pin-symbolic").icon());
    }
    title_row = title_row.push(text::title4(note.title.clone()));
    col = col.push(title_row);

    if !note.body.is_empty() {
        col = col.push(text::body(body_preview(&note.body)).size(style::BODY_FONT_SIZE));
    }

    if !note.tags.is_empty() {
        let chips: Vec<Element<'static, Message>> = note.tags.iter().map(|t| tag_chip(t)).collect();
        col = col.push(
            flex_row(chips)
                .row_spacing(style::CHIP_SPACING)
                .column_spacing(style::CHIP_SPACING),
        );
    }

    let updated = note
        .updated_at
        .with_timezone(&Local)
        .format(style::DATE_FORMAT)
        .to_string();
    col = col.push(text::caption(fl!("note-updated", date = updated)).size(style::CAPTION_FONT_SIZE));

    col = col.push(action_row(note));

    container(col)
        .padding(style::CARD_PADDING)
        .width(Length::Fixed(style::CARD_WIDTH))
        .class(theme::Container::Card)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_caps_lines() {
        let body = (1..=10).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
        let preview = body_preview(&body);
        assert_eq!(preview.lines().count(), style::BODY_PREVIEW_LINES);
        assert!(preview.starts_with("line 1\n"));
    }

    #[test]
    fn preview_keeps_short_bodies() {
        assert_eq!(body_preview("one\ntwo"), "one\ntwo");
    }
}
