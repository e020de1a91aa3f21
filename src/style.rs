// Static layout values shared by the page and its components.

pub const CARD_WIDTH: f32 = 280.0;
pub const CARD_PADDING: u16 = 12;
pub const CARD_SPACING: u16 = 6;
pub const LIST_SPACING: u16 = 12;
pub const PAGE_PADDING: u16 = 16;
pub const EMPTY_PADDING: u16 = 32;

pub const BODY_PREVIEW_LINES: usize = 6;
pub const BODY_FONT_SIZE: f32 = 12.0;
pub const CAPTION_FONT_SIZE: f32 = 11.0;

pub const CHIP_PADDING: [u16; 2] = [2, 6];
pub const CHIP_SPACING: u16 = 4;

pub const DRAWER_PADDING: u16 = 16;
pub const FORM_SPACING: u16 = 16;
pub const EDITOR_BODY_HEIGHT: f32 = 180.0;

pub const SEARCH_WIDTH: f32 = 320.0;
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
