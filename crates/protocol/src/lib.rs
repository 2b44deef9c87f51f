pub mod commands;
pub mod locale;
pub mod tile;
pub mod types;

pub use commands::{DomCommand, Reaction, TimerSlot};
pub use locale::Locale;
pub use tile::{Accent, TileSpec};
pub use types::{NodeId, ScrollBehavior, Target};
