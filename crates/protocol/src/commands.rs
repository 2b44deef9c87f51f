use serde::{Deserialize, Serialize};

use crate::tile::TileSpec;
use crate::types::{ScrollBehavior, Target};

/// A single, stateless DOM mutation.
///
/// Controllers emit a `Vec<DomCommand>` for each event they handle. Front
/// ends apply the list sequentially; each command carries all the data it
/// needs. Commands addressed to a target the page does not have are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DomCommand {
    /// Add a class to the target's class list. No-op if already present.
    AddClass { target: Target, class: String },

    /// Remove a class from the target's class list. No-op if absent.
    RemoveClass { target: Target, class: String },

    SetAttribute {
        target: Target,
        name: String,
        value: String,
    },

    /// Set an inline style property. An empty value clears it.
    SetStyle {
        target: Target,
        property: String,
        value: String,
    },

    /// Move keyboard focus to the target.
    Focus { target: Target },

    SetDisabled { target: Target, disabled: bool },

    SetHidden { target: Target, hidden: bool },

    /// Replace the target's children with a single text node.
    SetText { target: Target, text: String },

    /// Replace the target's children with parsed markup.
    SetHtml { target: Target, html: String },

    /// Restore every control of a form to its initial value.
    ResetForm { target: Target },

    /// Append a `<style>` element with the given text to the document head.
    InjectStyle { css: String },

    /// Append one decorative tile element to a container. `animation`
    /// names the keyframes the tile loops through.
    AppendTile {
        container: Target,
        class: String,
        animation: String,
        tile: TileSpec,
    },

    /// Stop watching the target for viewport intersection.
    Unobserve { target: Target },

    /// Best-effort write to persistent key-value storage.
    StoreItem { key: String, value: String },

    /// Scroll the window to an absolute document offset.
    ScrollTo { top: f64, behavior: ScrollBehavior },

    /// Apply `then` after `delay_ms`. Starting a timer in an occupied slot
    /// cancels the previous one.
    StartTimer {
        slot: TimerSlot,
        delay_ms: u32,
        then: Vec<DomCommand>,
    },

    /// Cancel the timer in `slot`, if any.
    CancelTimer { slot: TimerSlot },
}

/// Named timer slots. At most one timer per slot is pending at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerSlot {
    /// Restores the contact form's submit label after an error.
    SubmitLabelRestore,
}

/// A controller's answer to one DOM event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Whether the event's default browser action must be suppressed.
    pub prevent_default: bool,
    pub commands: Vec<DomCommand>,
}

impl Reaction {
    /// Let the browser do its default thing and change nothing.
    pub fn pass() -> Self {
        Self::default()
    }

    /// Suppress the default action and apply `commands` instead.
    pub fn intercept(commands: Vec<DomCommand>) -> Self {
        Self {
            prevent_default: true,
            commands,
        }
    }

    pub fn is_pass(&self) -> bool {
        !self.prevent_default && self.commands.is_empty()
    }
}
