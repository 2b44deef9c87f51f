mod console;
mod dom;
mod fetch;
mod listeners;
mod page;

use std::cell::RefCell;
use std::rc::Rc;

use comadrelab_core::SiteConfig;
use comadrelab_core::config::EMBEDDED_CONFIG_ID;
use comadrelab_core::controllers::language;
use comadrelab_core::page::Environment;
use comadrelab_protocol::DomCommand;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use crate::dom::Dom;
use crate::page::Page;

thread_local! {
    static PAGE: RefCell<Option<Rc<Page>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Redirect panics to console
    console_error_panic_hook::set_once();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || {
            if let Err(e) = init(window) {
                console::error(&format!("init failed: {e:?}"));
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        Ok(())
    } else {
        init(window)
    }
}

/// Run every controller's setup once and wire their listeners.
fn init(window: Window) -> Result<(), JsValue> {
    if PAGE.with(|p| p.borrow().is_some()) {
        return Ok(());
    }

    let config = load_config(&window);
    let reduced_motion = prefers_reduced_motion(&window, &config);
    let dom = Dom::resolve(window, &config)?;
    let env = read_environment(&dom.window, &config, reduced_motion);

    let mut rng = SmallRng::seed_from_u64(random_seed());
    let setup = comadrelab_core::page::setup(&env, &dom.presence(), &mut rng, &config);

    let skipped = setup.enabled.skipped();
    if !skipped.is_empty() {
        console::log(&format!("skipped: {}", skipped.join(", ")));
    }

    let tiles = setup
        .commands
        .iter()
        .filter(|cmd| matches!(cmd, DomCommand::AppendTile { .. }))
        .count();
    if tiles > 0 {
        console::log(&format!("{tiles} ambient tiles"));
    }

    let enabled = setup.enabled;
    let page = Rc::new(Page::new(
        dom,
        config,
        reduced_motion,
        setup.reveal,
        setup.contact,
    ));
    page.apply(&setup.commands);

    listeners::wire_language(&page);
    if enabled.menu {
        listeners::wire_menu(&page);
    }
    if let Some(options) = &setup.observer {
        listeners::wire_reveal(&page, options);
    }
    if enabled.contact {
        listeners::wire_contact(&page);
    }
    if enabled.smooth_scroll {
        listeners::wire_smooth_scroll(&page);
    }

    console::log(&format!("ready ({})", setup.locale));
    PAGE.with(|p| *p.borrow_mut() = Some(page));
    Ok(())
}

/// Defaults, overridden by the page's embedded JSON block if it has a
/// valid one.
fn load_config(window: &Window) -> SiteConfig {
    let Some(text) = window
        .document()
        .and_then(|d| d.get_element_by_id(EMBEDDED_CONFIG_ID))
        .and_then(|el| el.text_content())
    else {
        return SiteConfig::default();
    };
    match SiteConfig::from_json(&text) {
        Ok(config) => config,
        Err(e) => {
            console::error(&format!("ignoring #{EMBEDDED_CONFIG_ID}: {e}"));
            SiteConfig::default()
        }
    }
}

fn prefers_reduced_motion(window: &Window, config: &SiteConfig) -> bool {
    window
        .match_media(&config.reduced_motion_query)
        .ok()
        .flatten()
        .as_ref()
        .is_some_and(web_sys::MediaQueryList::matches)
}

fn read_environment(window: &Window, config: &SiteConfig, reduced_motion: bool) -> Environment {
    let stored_locale = match window.local_storage() {
        Ok(Some(storage)) => storage
            .get_item(&config.language.storage_key)
            .ok()
            .flatten(),
        _ => {
            console::warn("localStorage unavailable, language will not persist");
            None
        }
    };
    Environment {
        reduced_motion,
        viewport_width: window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(0.0),
        stored_locale,
        browser_language: window.navigator().language(),
    }
}

fn random_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64
}

fn with_page<T>(f: impl FnOnce(&Rc<Page>) -> T) -> Result<T, JsError> {
    PAGE.with(|p| {
        p.borrow()
            .as_ref()
            .map(f)
            .ok_or_else(|| JsError::new("page not initialized"))
    })
}

/// The active locale code, as shown by the document marker.
#[wasm_bindgen]
pub fn current_locale() -> Result<String, JsError> {
    with_page(|page| page.current_locale().code().to_string())
}

/// Switch to `code` ("en" or "es") and persist it.
#[wasm_bindgen]
pub fn set_locale(code: &str) -> Result<(), JsError> {
    let locale = language::parse_locale(code).map_err(|e| JsError::new(&e.to_string()))?;
    with_page(|page| page.apply(&language::apply(locale, &page.config.language)))
}

/// The effective configuration as JSON.
#[wasm_bindgen]
pub fn site_config() -> Result<String, JsError> {
    with_page(|page| serde_json::to_string(&page.config))?
        .map_err(|e| JsError::new(&e.to_string()))
}
