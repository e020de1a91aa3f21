use cosmic::iced::{Alignment, Length};
use cosmic::widget::{
    button, column, container, dialog, flex_row, icon, row, scrollable, text, text_editor,
    text_input,
};
use cosmic::{Element, theme};

use notepin::core::confirm::PendingDelete;
use notepin::core::editor::{Editor, EditorMode};
use notepin::core::note_list::NoteList;
use notepin::core::notice::{Notice, Notices, Operation};

use crate::components::note_card::note_card;
use crate::fl;
use crate::message::Message;
use crate::style;

fn notice_text(notice: &Notice) -> String {
    let error = notice.message.clone();
    match notice.operation {
        Operation::Create => fl!("notice-create", error = error),
        Operation::Update => fl!("notice-update", error = error),
        Operation::TogglePin => fl!("notice-pin", error = error),
        Operation::Delete => fl!("notice-delete", error = error),
        Operation::Subscribe => fl!("notice-subscribe", error = error),
    }
}

fn notice_banner(notice: &Notice) -> Element<'static, Message> {
    container(
        row()
            .spacing(8)
            .align_y(Alignment::Center)
            .push(icon::from_name("dialog-warning-symbolic").icon())
            .push(text::body(notice_text(notice)).width(Length::Fill))
            .push(
                button::icon(icon::from_name("window-close-symbolic"))
                    .on_press(Message::DismissNotice(notice.id)),
            ),
    )
    .padding([6, 12])
    .width(Length::Fill)
    .class(theme::Container::Card)
    .into()
}

fn placeholder(label: String) -> Element<'static, Message> {
    container(text::body(label))
        .padding(style::EMPTY_PADDING)
        .center_x(Length::Fill)
        .width(Length::Fill)
        .into()
}

/// The main page: failure notices followed by the filtered note cards.
pub fn notes_view<'a>(notes: &NoteList, notices: &Notices) -> Element<'a, Message> {
    let mut content = column().spacing(style::LIST_SPACING);

    for notice in notices.iter() {
        content = content.push(notice_banner(notice));
    }

    if !notes.is_loaded() {
        content = content.push(placeholder(fl!("notes-loading")));
    } else if notes.is_empty() {
        content = content.push(placeholder(fl!("notes-empty")));
    } else if notes.visible_len() == 0 {
        content = content.push(placeholder(fl!(
            "notes-no-match",
            query = notes.query().trim().to_string()
        )));
    } else {
        let cards: Vec<Element<'a, Message>> = notes.visible().map(|n| note_card(n)).collect();
        content = content.push(
            flex_row(cards)
                .row_spacing(style::LIST_SPACING)
                .column_spacing(style::LIST_SPACING),
        );
    }

    container(scrollable(
        content.padding(style::PAGE_PADDING).width(Length::Fill),
    ))
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

/// Header count: total notes, or "shown of total" while a search is active.
pub fn count_label(notes: &NoteList) -> String {
    let total = notes.len() as i64;
    if notes.query().trim().is_empty() {
        fl!("notes-count", count = total)
    } else {
        fl!(
            "notes-count-filtered",
            shown = (notes.visible_len() as i64),
            total = total
        )
    }
}

pub fn search_box<'a>(value: &str) -> Element<'a, Message> {
    text_input::text_input(fl!("search-placeholder"), value.to_string())
        .on_input(Message::SearchInput)
        .width(Length::Fixed(style::SEARCH_WIDTH))
        .into()
}

pub fn editor_title(editor: &Editor) -> String {
    match editor.mode() {
        EditorMode::Edit(_) => fl!("editor-edit-title"),
        _ => fl!("editor-new-title"),
    }
}

/// Create/edit form shown in the context drawer.
pub fn editor_form<'a>(
    editor: &Editor,
    body: &'a text_editor::Content,
) -> column::Column<'a, Message> {
    let mut content = column().spacing(style::FORM_SPACING);

    content = content.push(text::title4(fl!("editor-title")));
    content = content.push(
        text_input::text_input(fl!("editor-title-placeholder"), editor.title.clone())
            .on_input(Message::EditorTitle)
            .on_submit(|_| Message::SaveEditor)
            .width(Length::Fill),
    );

    content = content.push(text::title4(fl!("editor-body")));
    content = content.push(
        container(
            text_editor(body)
                .on_action(Message::EditorBodyAction)
                .height(Length::Fixed(style::EDITOR_BODY_HEIGHT)),
        )
        .width(Length::Fill),
    );

    content = content.push(text::title4(fl!("editor-tags")));
    content = content.push(
        text_input::text_input(fl!("editor-tags-placeholder"), editor.tags.clone())
            .on_input(Message::EditorTags)
            .on_submit(|_| Message::SaveEditor)
            .width(Length::Fill),
    );

    let save_label = if editor.is_saving() {
        fl!("editor-saving")
    } else {
        fl!("editor-save")
    };
    let mut save = button::suggested(save_label).width(Length::Fill);
    if editor.can_save() {
        save = save.on_press(Message::SaveEditor);
    }

    content = content.push(
        row()
            .spacing(8)
            .push(
                button::standard(fl!("editor-cancel"))
                    .on_press(Message::CloseEditor)
                    .width(Length::Fill),
            )
            .push(save),
    );

    content
}

/// Delete confirmation naming the note. Shows the last failure, if any.
pub fn delete_dialog<'a>(pending: &PendingDelete) -> Element<'a, Message> {
    let mut body = fl!("delete-body", title = pending.title.clone());
    if let Some(ref error) = pending.error {
        body.push_str("\n\n");
        body.push_str(&fl!("delete-failed", error = error.clone()));
    }

    let mut confirm = button::destructive(fl!("delete-confirm"));
    if !pending.in_flight {
        confirm = confirm.on_press(Message::DeleteConfirmed);
    }

    dialog()
        .title(fl!("delete-title"))
        .body(body)
        .primary_action(confirm)
        .secondary_action(button::standard(fl!("delete-cancel")).on_press(Message::CancelDelete))
        .into()
}
