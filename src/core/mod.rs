pub mod confirm;
pub mod debounce;
pub mod editor;
pub mod filter;
pub mod note;
pub mod note_list;
pub mod notice;
pub mod tags;
