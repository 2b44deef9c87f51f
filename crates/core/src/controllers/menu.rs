use comadrelab_protocol::{DomCommand, Target};

use crate::config::MenuConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuState {
    #[default]
    Closed,
    Open,
}

impl MenuState {
    /// The nav panel's open class is the source of truth.
    pub fn from_marker(open_class_present: bool) -> Self {
        if open_class_present { Self::Open } else { Self::Closed }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent<'a> {
    /// Click on the menu trigger.
    TriggerActivated,
    /// Click on any link inside the nav panel.
    NavLinkActivated,
    /// Document-level keydown, carrying `KeyboardEvent.key`.
    KeyDown(&'a str),
}

/// Commands for one menu event given the state currently on the page.
pub fn handle(state: MenuState, event: MenuEvent<'_>, config: &MenuConfig) -> Vec<DomCommand> {
    match (event, state) {
        (MenuEvent::TriggerActivated, MenuState::Closed) => open(config),
        (MenuEvent::TriggerActivated, MenuState::Open) => close(config),
        // Closing an already closed menu is harmless, so links always close.
        (MenuEvent::NavLinkActivated, _) => close(config),
        (MenuEvent::KeyDown("Escape"), MenuState::Open) => {
            let mut cmds = close(config);
            cmds.push(DomCommand::Focus {
                target: Target::MenuToggle,
            });
            cmds
        }
        (MenuEvent::KeyDown(_), _) => Vec::new(),
    }
}

fn open(config: &MenuConfig) -> Vec<DomCommand> {
    vec![
        DomCommand::AddClass {
            target: Target::Nav,
            class: config.open_class.clone(),
        },
        aria_expanded(true),
        DomCommand::SetStyle {
            target: Target::Body,
            property: "overflow".into(),
            value: "hidden".into(),
        },
    ]
}

fn close(config: &MenuConfig) -> Vec<DomCommand> {
    vec![
        DomCommand::RemoveClass {
            target: Target::Nav,
            class: config.open_class.clone(),
        },
        aria_expanded(false),
        DomCommand::SetStyle {
            target: Target::Body,
            property: "overflow".into(),
            value: String::new(),
        },
    ]
}

fn aria_expanded(expanded: bool) -> DomCommand {
    DomCommand::SetAttribute {
        target: Target::MenuToggle,
        name: "aria-expanded".into(),
        value: expanded.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MenuConfig {
        MenuConfig::default()
    }

    #[test]
    fn trigger_opens_closed_menu() {
        let cmds = handle(MenuState::Closed, MenuEvent::TriggerActivated, &config());
        assert!(cmds.contains(&DomCommand::AddClass {
            target: Target::Nav,
            class: "is-open".into()
        }));
        assert!(cmds.contains(&aria_expanded(true)));
        assert!(cmds.contains(&DomCommand::SetStyle {
            target: Target::Body,
            property: "overflow".into(),
            value: "hidden".into()
        }));
    }

    #[test]
    fn trigger_closes_open_menu_without_focus() {
        let cmds = handle(MenuState::Open, MenuEvent::TriggerActivated, &config());
        assert!(cmds.contains(&aria_expanded(false)));
        assert!(!cmds.iter().any(|c| matches!(c, DomCommand::Focus { .. })));
    }

    #[test]
    fn escape_closes_and_refocuses_trigger() {
        let cmds = handle(MenuState::Open, MenuEvent::KeyDown("Escape"), &config());
        assert_eq!(
            cmds.last(),
            Some(&DomCommand::Focus {
                target: Target::MenuToggle
            })
        );
        assert!(cmds.contains(&DomCommand::RemoveClass {
            target: Target::Nav,
            class: "is-open".into()
        }));
    }

    #[test]
    fn escape_while_closed_does_nothing() {
        assert!(handle(MenuState::Closed, MenuEvent::KeyDown("Escape"), &config()).is_empty());
    }

    #[test]
    fn other_keys_are_ignored() {
        assert!(handle(MenuState::Open, MenuEvent::KeyDown("Enter"), &config()).is_empty());
        assert!(handle(MenuState::Open, MenuEvent::KeyDown("Esc"), &config()).is_empty());
    }

    #[test]
    fn nav_link_closes_in_either_state() {
        for state in [MenuState::Open, MenuState::Closed] {
            let cmds = handle(state, MenuEvent::NavLinkActivated, &config());
            assert_eq!(cmds, close(&config()));
        }
    }
}
