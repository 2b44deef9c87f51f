//! In-memory document: applies `DomCommand` lists without a browser.
//!
//! Mirrors what the wasm front end does to the real DOM closely enough to
//! drive whole-page scenarios natively, including timers on a virtual clock.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use comadrelab_protocol::{DomCommand, ScrollBehavior, Target, TileSpec, TimerSlot};

/// Children of an element as last set by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Html(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementState {
    pub classes: BTreeSet<String>,
    pub attributes: BTreeMap<String, String>,
    pub styles: BTreeMap<String, String>,
    pub hidden: bool,
    pub disabled: bool,
    pub content: Option<Content>,
    pub tiles: Vec<TileSpec>,
    /// Times the element was reset as a form.
    pub resets: u32,
    /// Whether an intersection observer is watching the element.
    pub observed: bool,
}

#[derive(Debug, Clone)]
struct PendingTimer {
    due_ms: u64,
    then: Vec<DomCommand>,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentModel {
    elements: HashMap<Target, ElementState>,
    storage: BTreeMap<String, String>,
    storage_blocked: bool,
    injected_styles: Vec<String>,
    focused: Option<Target>,
    scroll: Option<(f64, ScrollBehavior)>,
    timers: HashMap<TimerSlot, PendingTimer>,
    now_ms: u64,
}

impl DocumentModel {
    /// A document containing exactly `targets`. Root, body and head are
    /// always present.
    pub fn new(targets: impl IntoIterator<Item = Target>) -> Self {
        let mut elements: HashMap<Target, ElementState> = [Target::Root, Target::Body, Target::Head]
            .into_iter()
            .map(|t| (t, ElementState::default()))
            .collect();
        for target in targets {
            elements.entry(target).or_default();
        }
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn has(&self, target: Target) -> bool {
        self.elements.contains_key(&target)
    }

    pub fn element(&self, target: Target) -> Option<&ElementState> {
        self.elements.get(&target)
    }

    pub fn element_mut(&mut self, target: Target) -> Option<&mut ElementState> {
        self.elements.get_mut(&target)
    }

    pub fn has_class(&self, target: Target, class: &str) -> bool {
        self.elements
            .get(&target)
            .is_some_and(|e| e.classes.contains(class))
    }

    pub fn attribute(&self, target: Target, name: &str) -> Option<&str> {
        self.elements
            .get(&target)
            .and_then(|e| e.attributes.get(name))
            .map(String::as_str)
    }

    pub fn style(&self, target: Target, property: &str) -> Option<&str> {
        self.elements
            .get(&target)
            .and_then(|e| e.styles.get(property))
            .map(String::as_str)
    }

    pub fn content(&self, target: Target) -> Option<&Content> {
        self.elements.get(&target).and_then(|e| e.content.as_ref())
    }

    pub fn storage_item(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    /// Make subsequent storage writes fail, like a private-mode browser.
    pub fn block_storage(&mut self) {
        self.storage_blocked = true;
    }

    pub fn injected_styles(&self) -> &[String] {
        &self.injected_styles
    }

    pub fn focused(&self) -> Option<Target> {
        self.focused
    }

    pub fn last_scroll(&self) -> Option<(f64, ScrollBehavior)> {
        self.scroll
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Start watching a target, as a front end does when registering
    /// reveal-opted elements with its observer.
    pub fn observe(&mut self, target: Target) {
        if let Some(e) = self.elements.get_mut(&target) {
            e.observed = true;
        }
    }

    /// Apply commands in order. Commands for absent targets are dropped.
    pub fn apply(&mut self, commands: &[DomCommand]) {
        for cmd in commands {
            self.apply_one(cmd);
        }
    }

    /// Move the virtual clock forward, firing due timers in due order.
    pub fn advance(&mut self, ms: u64) {
        let until = self.now_ms + ms;
        loop {
            let next = self
                .timers
                .iter()
                .filter(|(_, t)| t.due_ms <= until)
                .min_by_key(|(_, t)| t.due_ms)
                .map(|(slot, t)| (*slot, t.due_ms));
            let Some((slot, due_ms)) = next else {
                break;
            };
            self.now_ms = due_ms;
            if let Some(timer) = self.timers.remove(&slot) {
                self.apply(&timer.then);
            }
        }
        self.now_ms = until;
    }

    fn apply_one(&mut self, cmd: &DomCommand) {
        match cmd {
            DomCommand::AddClass { target, class } => {
                self.with(*target, |e| {
                    e.classes.insert(class.clone());
                });
            }
            DomCommand::RemoveClass { target, class } => {
                self.with(*target, |e| {
                    e.classes.remove(class);
                });
            }
            DomCommand::SetAttribute {
                target,
                name,
                value,
            } => {
                self.with(*target, |e| {
                    e.attributes.insert(name.clone(), value.clone());
                });
            }
            DomCommand::SetStyle {
                target,
                property,
                value,
            } => {
                self.with(*target, |e| {
                    if value.is_empty() {
                        e.styles.remove(property);
                    } else {
                        e.styles.insert(property.clone(), value.clone());
                    }
                });
            }
            DomCommand::Focus { target } => {
                if self.has(*target) {
                    self.focused = Some(*target);
                }
            }
            DomCommand::SetDisabled { target, disabled } => {
                self.with(*target, |e| e.disabled = *disabled);
            }
            DomCommand::SetHidden { target, hidden } => {
                self.with(*target, |e| e.hidden = *hidden);
            }
            DomCommand::SetText { target, text } => {
                self.with(*target, |e| e.content = Some(Content::Text(text.clone())));
            }
            DomCommand::SetHtml { target, html } => {
                self.with(*target, |e| e.content = Some(Content::Html(html.clone())));
            }
            DomCommand::ResetForm { target } => {
                self.with(*target, |e| e.resets += 1);
            }
            DomCommand::InjectStyle { css } => self.injected_styles.push(css.clone()),
            DomCommand::AppendTile {
                container, tile, ..
            } => {
                self.with(*container, |e| e.tiles.push(*tile));
            }
            DomCommand::Unobserve { target } => {
                self.with(*target, |e| e.observed = false);
            }
            DomCommand::StoreItem { key, value } => {
                if !self.storage_blocked {
                    self.storage.insert(key.clone(), value.clone());
                }
            }
            DomCommand::ScrollTo { top, behavior } => self.scroll = Some((*top, *behavior)),
            DomCommand::StartTimer {
                slot,
                delay_ms,
                then,
            } => {
                self.timers.insert(
                    *slot,
                    PendingTimer {
                        due_ms: self.now_ms + u64::from(*delay_ms),
                        then: then.clone(),
                    },
                );
            }
            DomCommand::CancelTimer { slot } => {
                self.timers.remove(slot);
            }
        }
    }

    fn with(&mut self, target: Target, f: impl FnOnce(&mut ElementState)) {
        if let Some(e) = self.elements.get_mut(&target) {
            f(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_targets_are_dropped() {
        let mut doc = DocumentModel::new([]);
        doc.apply(&[
            DomCommand::AddClass {
                target: Target::Nav,
                class: "is-open".into(),
            },
            DomCommand::Focus {
                target: Target::MenuToggle,
            },
        ]);
        assert!(!doc.has(Target::Nav));
        assert_eq!(doc.focused(), None);
    }

    #[test]
    fn empty_style_value_clears_property() {
        let mut doc = DocumentModel::new([]);
        let set = |value: &str| DomCommand::SetStyle {
            target: Target::Body,
            property: "overflow".into(),
            value: value.into(),
        };
        doc.apply(&[set("hidden")]);
        assert_eq!(doc.style(Target::Body, "overflow"), Some("hidden"));
        doc.apply(&[set("")]);
        assert_eq!(doc.style(Target::Body, "overflow"), None);
    }

    #[test]
    fn timers_fire_on_the_virtual_clock() {
        let mut doc = DocumentModel::new([Target::SubmitButton]);
        doc.apply(&[DomCommand::StartTimer {
            slot: TimerSlot::SubmitLabelRestore,
            delay_ms: 3000,
            then: vec![DomCommand::SetText {
                target: Target::SubmitButton,
                text: "done".into(),
            }],
        }]);
        doc.advance(2999);
        assert_eq!(doc.content(Target::SubmitButton), None);
        doc.advance(1);
        assert_eq!(
            doc.content(Target::SubmitButton),
            Some(&Content::Text("done".into()))
        );
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut doc = DocumentModel::new([Target::SubmitButton]);
        doc.apply(&[
            DomCommand::StartTimer {
                slot: TimerSlot::SubmitLabelRestore,
                delay_ms: 10,
                then: vec![DomCommand::SetDisabled {
                    target: Target::SubmitButton,
                    disabled: true,
                }],
            },
            DomCommand::CancelTimer {
                slot: TimerSlot::SubmitLabelRestore,
            },
        ]);
        doc.advance(100);
        assert!(doc.element(Target::SubmitButton).is_some_and(|e| !e.disabled));
    }

    #[test]
    fn blocked_storage_drops_writes() {
        let mut doc = DocumentModel::new([]);
        doc.block_storage();
        doc.apply(&[DomCommand::StoreItem {
            key: "k".into(),
            value: "v".into(),
        }]);
        assert_eq!(doc.storage_item("k"), None);
    }
}
