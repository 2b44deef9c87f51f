pub mod ambient;
pub mod contact;
pub mod language;
pub mod menu;
pub mod reveal;
pub mod smooth_scroll;
