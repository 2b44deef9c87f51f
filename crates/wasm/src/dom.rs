use std::cell::RefCell;
use std::collections::HashMap;

use comadrelab_core::SiteConfig;
use comadrelab_core::controllers::ambient::BLOOM_PATH;
use comadrelab_core::page::PagePresence;
use comadrelab_protocol::{DomCommand, NodeId, ScrollBehavior, Target, TileSpec};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, HtmlElement, HtmlFormElement, IntersectionObserver, ScrollToOptions,
    Window,
};

use crate::console;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// The page's elements, resolved once, and the code that applies
/// `DomCommand`s to them.
pub struct Dom {
    pub window: Window,
    pub document: Document,
    elements: HashMap<Target, Element>,
    reveal_nodes: Vec<Element>,
    observer: RefCell<Option<IntersectionObserver>>,
}

impl Dom {
    pub fn resolve(window: Window, config: &SiteConfig) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut elements = HashMap::new();
        let mut insert = |target: Target, el: Option<Element>| {
            if let Some(el) = el {
                elements.insert(target, el);
            }
        };

        insert(Target::Root, document.document_element());
        insert(Target::Body, document.body().map(Element::from));
        insert(Target::Head, document.head().map(Element::from));
        insert(
            Target::MenuToggle,
            query(&document, &config.menu.toggle_selector),
        );
        insert(Target::Nav, query(&document, &config.menu.nav_selector));
        insert(
            Target::HeroBackground,
            query(&document, &config.ambient.container_selector),
        );
        let form = query(&document, &config.contact.form_selector);
        let submit = form
            .as_ref()
            .and_then(|f| f.query_selector(&config.contact.submit_selector).ok().flatten());
        insert(Target::ContactForm, form);
        insert(Target::SubmitButton, submit);
        insert(
            Target::SuccessMessage,
            query(&document, &config.contact.success_selector),
        );
        insert(
            Target::Header,
            query(&document, &config.smooth_scroll.header_selector),
        );

        let reveal_nodes = query_all(&document, &config.reveal.selector);
        for (i, el) in reveal_nodes.iter().enumerate() {
            elements.insert(Target::Node(NodeId(i as u32)), el.clone());
        }

        Ok(Self {
            window,
            document,
            elements,
            reveal_nodes,
            observer: RefCell::new(None),
        })
    }

    pub fn presence(&self) -> PagePresence {
        PagePresence {
            menu_toggle: self.has(Target::MenuToggle),
            nav: self.has(Target::Nav),
            hero_background: self.has(Target::HeroBackground),
            contact_form: self.has(Target::ContactForm),
            success_message: self.has(Target::SuccessMessage),
            header: self.has(Target::Header),
            reveal_count: self.reveal_nodes.len() as u32,
        }
    }

    pub fn has(&self, target: Target) -> bool {
        self.elements.contains_key(&target)
    }

    pub fn element(&self, target: Target) -> Option<&Element> {
        self.elements.get(&target)
    }

    pub fn has_class(&self, target: Target, class: &str) -> bool {
        self.element(target)
            .is_some_and(|el| el.class_list().contains(class))
    }

    pub fn reveal_nodes(&self) -> &[Element] {
        &self.reveal_nodes
    }

    /// Registry index of a reveal-opted element.
    pub fn node_id(&self, el: &Element) -> Option<NodeId> {
        self.reveal_nodes
            .iter()
            .position(|n| n == el)
            .map(|i| NodeId(i as u32))
    }

    pub fn set_observer(&self, observer: IntersectionObserver) {
        *self.observer.borrow_mut() = Some(observer);
    }

    /// `offsetHeight` of a target, 0 when absent.
    pub fn offset_height(&self, target: Target) -> f64 {
        self.element(target)
            .and_then(|el| el.dyn_ref::<HtmlElement>())
            .map_or(0.0, |el| f64::from(el.offset_height()))
    }

    /// Top edge of the element with `id`, relative to the whole document.
    pub fn document_top_of_id(&self, id: &str) -> Option<f64> {
        let el = self.document.get_element_by_id(id)?;
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        Some(el.get_bounding_client_rect().top() + scroll_y)
    }

    /// Apply a command that takes effect immediately. Timer commands are
    /// owned by the page and must not reach this method.
    pub fn apply_immediate(&self, cmd: &DomCommand) -> Result<(), JsValue> {
        match cmd {
            DomCommand::AddClass { target, class } => {
                if let Some(el) = self.element(*target) {
                    el.class_list().add_1(class)?;
                }
            }
            DomCommand::RemoveClass { target, class } => {
                if let Some(el) = self.element(*target) {
                    el.class_list().remove_1(class)?;
                }
            }
            DomCommand::SetAttribute {
                target,
                name,
                value,
            } => {
                if let Some(el) = self.element(*target) {
                    el.set_attribute(name, value)?;
                }
            }
            DomCommand::SetStyle {
                target,
                property,
                value,
            } => {
                if let Some(el) = self.html_element(*target) {
                    let style = el.style();
                    if value.is_empty() {
                        style.remove_property(property)?;
                    } else {
                        style.set_property(property, value)?;
                    }
                }
            }
            DomCommand::Focus { target } => {
                if let Some(el) = self.html_element(*target) {
                    el.focus()?;
                }
            }
            DomCommand::SetDisabled { target, disabled } => {
                if let Some(el) = self.element(*target) {
                    el.toggle_attribute_with_force("disabled", *disabled)?;
                }
            }
            DomCommand::SetHidden { target, hidden } => {
                if let Some(el) = self.html_element(*target) {
                    el.set_hidden(*hidden);
                }
            }
            DomCommand::SetText { target, text } => {
                if let Some(el) = self.element(*target) {
                    el.set_text_content(Some(text));
                }
            }
            DomCommand::SetHtml { target, html } => {
                if let Some(el) = self.element(*target) {
                    el.set_inner_html(html);
                }
            }
            DomCommand::ResetForm { target } => {
                if let Some(form) = self
                    .element(*target)
                    .and_then(|el| el.dyn_ref::<HtmlFormElement>())
                {
                    form.reset();
                }
            }
            DomCommand::InjectStyle { css } => {
                if let Some(head) = self.element(Target::Head) {
                    let style = self.document.create_element("style")?;
                    style.set_text_content(Some(css));
                    head.append_child(&style)?;
                }
            }
            DomCommand::AppendTile {
                container,
                class,
                animation,
                tile,
            } => {
                if let Some(parent) = self.element(*container) {
                    let el = self.tile_element(class, animation, tile)?;
                    parent.append_child(&el)?;
                }
            }
            DomCommand::Unobserve { target } => {
                if let (Some(el), Some(observer)) =
                    (self.element(*target), self.observer.borrow().as_ref())
                {
                    observer.unobserve(el);
                }
            }
            DomCommand::StoreItem { key, value } => {
                let storage = self
                    .window
                    .local_storage()?
                    .ok_or_else(|| JsValue::from_str("localStorage unavailable"))?;
                storage.set_item(key, value)?;
            }
            DomCommand::ScrollTo { top, behavior } => {
                let options = ScrollToOptions::new();
                options.set_top(*top);
                options.set_behavior(match behavior {
                    ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
                    ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
                });
                self.window.scroll_to_with_scroll_to_options(&options);
            }
            DomCommand::StartTimer { .. } | DomCommand::CancelTimer { .. } => {
                console::warn("timer command reached the DOM layer, ignored");
            }
        }
        Ok(())
    }

    fn html_element(&self, target: Target) -> Option<&HtmlElement> {
        self.element(target)
            .and_then(|el| el.dyn_ref::<HtmlElement>())
    }

    fn tile_element(&self, class: &str, animation: &str, tile: &TileSpec) -> Result<Element, JsValue> {
        let el = self.document.create_element("div")?;
        el.set_class_name(class);
        el.set_attribute("style", &tile.style(animation))?;

        let svg = self.document.create_element_ns(Some(SVG_NS), "svg")?;
        svg.set_attribute("viewBox", "0 0 100 100")?;
        svg.set_attribute("width", "60")?;
        svg.set_attribute("height", "60")?;

        let path = self.document.create_element_ns(Some(SVG_NS), "path")?;
        path.set_attribute("d", BLOOM_PATH)?;
        path.set_attribute("fill", "currentColor")?;

        svg.append_child(&path)?;
        el.append_child(&svg)?;
        Ok(el)
    }
}

/// First match for `selector`, or `None` (also for an invalid selector).
pub fn query(document: &Document, selector: &str) -> Option<Element> {
    match document.query_selector(selector) {
        Ok(found) => found,
        Err(e) => {
            console::warn(&format!("bad selector {selector:?}: {e:?}"));
            None
        }
    }
}

/// Every match for `selector` under `scope`, in document order.
pub fn query_all_in(scope: &Element, selector: &str) -> Vec<Element> {
    match scope.query_selector_all(selector) {
        Ok(list) => node_list_elements(&list),
        Err(e) => {
            console::warn(&format!("bad selector {selector:?}: {e:?}"));
            Vec::new()
        }
    }
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => node_list_elements(&list),
        Err(e) => {
            console::warn(&format!("bad selector {selector:?}: {e:?}"));
            Vec::new()
        }
    }
}

fn node_list_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}
