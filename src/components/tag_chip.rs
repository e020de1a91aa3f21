use cosmic::widget::{container, text};
use cosmic::{Element, theme};

use crate::message::Message;
use crate::style;

/// Render a note tag as a small badge.
pub fn tag_chip(tag: &str) -> Element<'static, Message> {
    container(text::caption(tag.to_string()).size(style::CAPTION_FONT_SIZE))
        .padding(style::CHIP_PADDING)
        .class(theme::Container::Card)
        .into()
}
