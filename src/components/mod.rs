pub mod note_card;
pub mod tag_chip;
