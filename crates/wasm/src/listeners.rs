//! Event wiring. Each `wire_*` function registers one controller's
//! listeners; the closures live as long as the page.

use std::rc::Rc;

use comadrelab_core::controllers::menu::{self, MenuEvent, MenuState};
use comadrelab_core::controllers::reveal::IntersectionEntry;
use comadrelab_core::controllers::reveal::ObserverOptions;
use comadrelab_core::controllers::{language, smooth_scroll};
use comadrelab_protocol::{Reaction, Target};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, Event, EventTarget, HtmlFormElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent,
};

use crate::console;
use crate::dom::{query_all, query_all_in};
use crate::fetch;
use crate::page::Page;

fn listen(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        console::error(&format!("addEventListener({event}) failed: {e:?}"));
    }
    closure.forget();
}

fn react(page: &Rc<Page>, event: &Event, reaction: &Reaction) {
    if reaction.prevent_default {
        event.prevent_default();
    }
    page.apply(&reaction.commands);
}

pub fn wire_language(page: &Rc<Page>) {
    let toggles = query_all(&page.dom.document, &page.config.language.toggle_selector);
    for toggle in &toggles {
        let page = Rc::clone(page);
        listen(toggle, "click", move |_| {
            let marker = page
                .dom
                .has_class(Target::Root, &page.config.language.marker_class);
            let (next, cmds) = language::toggle(marker, &page.config.language);
            page.apply(&cmds);
            console::log(&format!("language switched to {next}"));
        });
    }
}

pub fn wire_menu(page: &Rc<Page>) {
    let (Some(trigger), Some(nav)) = (
        page.dom.element(Target::MenuToggle),
        page.dom.element(Target::Nav),
    ) else {
        return;
    };

    {
        let page = Rc::clone(page);
        listen(trigger, "click", move |_| {
            let cmds = menu::handle(menu_state(&page), MenuEvent::TriggerActivated, &page.config.menu);
            page.apply(&cmds);
        });
    }

    for link in query_all_in(nav, &page.config.menu.link_selector) {
        let page = Rc::clone(page);
        listen(&link, "click", move |_| {
            let cmds = menu::handle(menu_state(&page), MenuEvent::NavLinkActivated, &page.config.menu);
            page.apply(&cmds);
        });
    }

    let page_for_keys = Rc::clone(page);
    listen(&page.dom.document, "keydown", move |event| {
        let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        let key = key_event.key();
        let cmds = menu::handle(
            menu_state(&page_for_keys),
            MenuEvent::KeyDown(key.as_str()),
            &page_for_keys.config.menu,
        );
        page_for_keys.apply(&cmds);
    });
}

fn menu_state(page: &Page) -> MenuState {
    MenuState::from_marker(page.dom.has_class(Target::Nav, &page.config.menu.open_class))
}

pub fn wire_reveal(page: &Rc<Page>, options: &ObserverOptions) {
    let page_for_cb = Rc::clone(page);
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            let batch: Vec<IntersectionEntry> = entries
                .iter()
                .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let target: Element = entry.target();
                    page_for_cb.dom.node_id(&target).map(|node| IntersectionEntry {
                        node,
                        is_intersecting: entry.is_intersecting(),
                    })
                })
                .collect();
            let cmds = page_for_cb.reveal.borrow_mut().on_entries(&batch);
            page_for_cb.apply(&cmds);
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(options.threshold));
    init.set_root_margin(&options.root_margin);

    let observer = match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
        Ok(observer) => observer,
        Err(e) => {
            // Without an observer nothing would ever show up, so reveal now.
            console::error(&format!("IntersectionObserver unavailable: {e:?}"));
            let cmds = page.reveal.borrow_mut().reveal_all();
            page.apply(&cmds);
            return;
        }
    };
    callback.forget();

    for el in page.dom.reveal_nodes() {
        observer.observe(el);
    }
    page.dom.set_observer(observer);
}

pub fn wire_contact(page: &Rc<Page>) {
    let Some(form) = page
        .dom
        .element(Target::ContactForm)
        .and_then(|el| el.dyn_ref::<HtmlFormElement>())
        .cloned()
    else {
        return;
    };

    let page = Rc::clone(page);
    let form_for_submit = form.clone();
    listen(&form, "submit", move |event| {
        let (reaction, request) = {
            let mut contact = page.contact.borrow_mut();
            let Some(controller) = contact.as_mut() else {
                return;
            };
            controller.begin(&form_for_submit.action(), &page.config.contact)
        };
        react(&page, &event, &reaction);
        let Some(request) = request else {
            return;
        };

        let page = Rc::clone(&page);
        let form = form_for_submit.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = fetch::submit_form(&page.dom.window, &form, &request).await;
            match &outcome {
                Ok(()) => console::log("contact form sent"),
                Err(e) => console::warn(&format!("contact form failed: {e}")),
            }
            let locale = page.current_locale();
            let cmds = match page.contact.borrow_mut().as_mut() {
                Some(controller) => controller.finish(outcome, locale, &page.config.contact),
                None => return,
            };
            page.apply(&cmds);
        });
    });
}

pub fn wire_smooth_scroll(page: &Rc<Page>) {
    let anchors = query_all(&page.dom.document, &page.config.smooth_scroll.anchor_selector);
    for anchor in &anchors {
        let page = Rc::clone(page);
        let href_source = anchor.clone();
        listen(anchor, "click", move |event| {
            let href = href_source.get_attribute("href").unwrap_or_default();
            let reaction = smooth_scroll::on_click(
                &href,
                |id| page.dom.document_top_of_id(id),
                page.dom.offset_height(Target::Header),
                page.reduced_motion,
                &page.config.smooth_scroll,
            );
            react(&page, &event, &reaction);
        });
    }
}
