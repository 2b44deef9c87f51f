use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use comadrelab_core::SiteConfig;
use comadrelab_core::controllers::contact::ContactFormController;
use comadrelab_core::controllers::language;
use comadrelab_core::controllers::reveal::RevealTracker;
use comadrelab_protocol::{DomCommand, Locale, Target, TimerSlot};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::console;
use crate::dom::Dom;

/// Everything the listeners share for the lifetime of the page.
pub struct Page {
    pub dom: Dom,
    pub config: SiteConfig,
    pub reduced_motion: bool,
    pub reveal: RefCell<RevealTracker>,
    pub contact: RefCell<Option<ContactFormController>>,
    timers: RefCell<HashMap<TimerSlot, PendingTimer>>,
}

/// A `setTimeout` handle and the callback it will run. The callback is
/// owned here so that clearing the slot also frees it.
struct PendingTimer {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Page {
    pub fn new(
        dom: Dom,
        config: SiteConfig,
        reduced_motion: bool,
        reveal: RevealTracker,
        contact: Option<ContactFormController>,
    ) -> Self {
        Self {
            dom,
            config,
            reduced_motion,
            reveal: RefCell::new(reveal),
            contact: RefCell::new(contact),
            timers: RefCell::new(HashMap::new()),
        }
    }

    /// The locale shown by the document marker right now.
    pub fn current_locale(&self) -> Locale {
        language::locale_from_marker(
            self.dom
                .has_class(Target::Root, &self.config.language.marker_class),
        )
    }

    /// Apply commands in order. A failing command is logged and skipped so
    /// the rest of the list still lands.
    pub fn apply(self: &Rc<Self>, commands: &[DomCommand]) {
        for cmd in commands {
            match cmd {
                DomCommand::StartTimer {
                    slot,
                    delay_ms,
                    then,
                } => self.start_timer(*slot, *delay_ms, then.clone()),
                DomCommand::CancelTimer { slot } => self.cancel_timer(*slot),
                DomCommand::StoreItem { key, .. } => {
                    if let Err(e) = self.dom.apply_immediate(cmd) {
                        console::warn(&format!("could not persist {key:?}: {e:?}"));
                    }
                }
                _ => {
                    if let Err(e) = self.dom.apply_immediate(cmd) {
                        console::error(&format!("failed to apply {cmd:?}: {e:?}"));
                    }
                }
            }
        }
    }

    fn start_timer(self: &Rc<Self>, slot: TimerSlot, delay_ms: u32, then: Vec<DomCommand>) {
        self.cancel_timer(slot);

        // A fired timer stays in its slot until the next start or cancel
        // replaces it; the callback must not drop itself while running.
        let page = Rc::clone(self);
        let callback = Closure::once(move || page.apply(&then));
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self.dom.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay,
        ) {
            Ok(handle) => {
                self.timers.borrow_mut().insert(
                    slot,
                    PendingTimer {
                        handle,
                        _callback: callback,
                    },
                );
            }
            Err(e) => console::error(&format!("setTimeout failed for {slot:?}: {e:?}")),
        }
    }

    fn cancel_timer(&self, slot: TimerSlot) {
        let pending = self.timers.borrow_mut().remove(&slot);
        if let Some(pending) = pending {
            self.dom.window.clear_timeout_with_handle(pending.handle);
        }
    }
}
