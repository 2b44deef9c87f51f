//! Integration test: run whole-page scenarios through `page::setup` and the
//! controllers, applying every command to an in-memory `DocumentModel`, and
//! check what a visitor would end up seeing.

use comadrelab_core::SiteConfig;
use comadrelab_core::controllers::contact::{ContactFormController, SubmitError, check_status};
use comadrelab_core::controllers::menu::{self, MenuEvent, MenuState};
use comadrelab_core::controllers::reveal::IntersectionEntry;
use comadrelab_core::controllers::{language, smooth_scroll};
use comadrelab_core::document::{Content, DocumentModel};
use comadrelab_core::page::{self, Environment, PagePresence};
use comadrelab_protocol::{DomCommand, Locale, NodeId, ScrollBehavior, Target};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const REVEAL_COUNT: u32 = 4;

fn full_presence() -> PagePresence {
    PagePresence {
        menu_toggle: true,
        nav: true,
        hero_background: true,
        contact_form: true,
        success_message: true,
        header: true,
        reveal_count: REVEAL_COUNT,
    }
}

fn full_document() -> DocumentModel {
    let mut targets = vec![
        Target::MenuToggle,
        Target::Nav,
        Target::HeroBackground,
        Target::ContactForm,
        Target::SubmitButton,
        Target::SuccessMessage,
        Target::Header,
    ];
    targets.extend((0..REVEAL_COUNT).map(|i| Target::Node(NodeId(i))));
    let mut doc = DocumentModel::new(targets);
    if let Some(msg) = doc.element_mut(Target::SuccessMessage) {
        msg.hidden = true;
    }
    doc
}

fn desktop() -> Environment {
    Environment {
        viewport_width: 1200.0,
        browser_language: Some("en-US".into()),
        ..Environment::default()
    }
}

fn marker_present(doc: &DocumentModel, config: &SiteConfig) -> bool {
    doc.has_class(Target::Root, &config.language.marker_class)
}

fn menu_state(doc: &DocumentModel, config: &SiteConfig) -> MenuState {
    MenuState::from_marker(doc.has_class(Target::Nav, &config.menu.open_class))
}

#[test]
fn language_resolution_and_toggle_involution() {
    let config = SiteConfig::default();

    for (stored, browser, expected) in [
        (Some("es"), Some("en-US"), Locale::Es),
        (Some("de"), Some("es-MX"), Locale::Es),
        (Some("spanish"), Some("fr"), Locale::En),
        (None, None, Locale::En),
    ] {
        let env = Environment {
            stored_locale: stored.map(String::from),
            browser_language: browser.map(String::from),
            ..desktop()
        };
        let mut doc = full_document();
        let mut rng = SmallRng::seed_from_u64(11);
        let setup = page::setup(&env, &full_presence(), &mut rng, &config);
        doc.apply(&setup.commands);

        assert_eq!(setup.locale, expected, "stored {stored:?}, browser {browser:?}");
        assert_eq!(doc.attribute(Target::Root, "lang"), Some(expected.code()));
        assert_eq!(doc.storage_item("comadrelab-lang"), Some(expected.code()));
        assert_eq!(marker_present(&doc, &config), expected == Locale::Es);

        let before = doc.element(Target::Root).cloned();
        for _ in 0..2 {
            let (_, cmds) = language::toggle(marker_present(&doc, &config), &config.language);
            doc.apply(&cmds);
        }
        assert_eq!(doc.element(Target::Root).cloned(), before);
    }
}

#[test]
fn applying_language_twice_changes_nothing() {
    let config = SiteConfig::default();
    let mut doc = DocumentModel::new([]);
    doc.apply(&language::apply(Locale::Es, &config.language));
    let once = doc.element(Target::Root).cloned();
    doc.apply(&language::apply(Locale::Es, &config.language));
    assert_eq!(doc.element(Target::Root).cloned(), once);
}

#[test]
fn storage_failure_keeps_page_working() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    doc.block_storage();
    let (locale, cmds) = language::toggle(false, &config.language);
    doc.apply(&cmds);
    assert_eq!(locale, Locale::Es);
    assert!(marker_present(&doc, &config));
    assert_eq!(doc.storage_item("comadrelab-lang"), None);
}

#[test]
fn menu_open_then_escape_returns_focus() {
    let config = SiteConfig::default();
    let mut doc = full_document();

    let cmds = menu::handle(menu_state(&doc, &config), MenuEvent::TriggerActivated, &config.menu);
    doc.apply(&cmds);
    assert_eq!(menu_state(&doc, &config), MenuState::Open);
    assert_eq!(doc.attribute(Target::MenuToggle, "aria-expanded"), Some("true"));
    assert_eq!(doc.style(Target::Body, "overflow"), Some("hidden"));

    let cmds = menu::handle(menu_state(&doc, &config), MenuEvent::KeyDown("Escape"), &config.menu);
    doc.apply(&cmds);
    assert_eq!(menu_state(&doc, &config), MenuState::Closed);
    assert_eq!(doc.focused(), Some(Target::MenuToggle));
    assert_eq!(doc.attribute(Target::MenuToggle, "aria-expanded"), Some("false"));
    assert_eq!(doc.style(Target::Body, "overflow"), None);
}

#[test]
fn nav_link_always_closes_menu() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    for open_first in [true, false] {
        if open_first {
            doc.apply(&menu::handle(
                MenuState::Closed,
                MenuEvent::TriggerActivated,
                &config.menu,
            ));
        }
        let cmds = menu::handle(menu_state(&doc, &config), MenuEvent::NavLinkActivated, &config.menu);
        doc.apply(&cmds);
        assert_eq!(menu_state(&doc, &config), MenuState::Closed);
        assert_eq!(doc.style(Target::Body, "overflow"), None);
    }
}

#[test]
fn tile_counts_follow_viewport() {
    let config = SiteConfig::default();
    for (width, expected) in [(500.0, 6), (1200.0, 12)] {
        let env = Environment {
            viewport_width: width,
            ..desktop()
        };
        let mut doc = full_document();
        let mut rng = SmallRng::seed_from_u64(width as u64);
        let setup = page::setup(&env, &full_presence(), &mut rng, &config);
        doc.apply(&setup.commands);

        let tiles = &doc
            .element(Target::HeroBackground)
            .map(|e| e.tiles.clone())
            .unwrap_or_default();
        assert_eq!(tiles.len(), expected, "width {width}");
        assert_eq!(doc.injected_styles().len(), 1);
        for t in tiles {
            assert!((40.0..=80.0).contains(&t.size_px));
            assert!((0.0..100.0).contains(&t.left_pct) && (0.0..100.0).contains(&t.top_pct));
            assert!((20.0..40.0).contains(&t.duration_s));
        }
    }
}

#[test]
fn reduced_motion_skips_tiles_and_reveals_everything() {
    let config = SiteConfig::default();
    let env = Environment {
        reduced_motion: true,
        ..desktop()
    };
    let mut doc = full_document();
    let mut rng = SmallRng::seed_from_u64(5);
    let setup = page::setup(&env, &full_presence(), &mut rng, &config);
    doc.apply(&setup.commands);

    assert!(doc.element(Target::HeroBackground).is_some_and(|e| e.tiles.is_empty()));
    assert!(doc.injected_styles().is_empty());
    for i in 0..REVEAL_COUNT {
        assert!(doc.has_class(Target::Node(NodeId(i)), "revealed"));
    }
    assert!(setup.observer.is_none());
}

#[test]
fn observed_elements_reveal_once_and_stay_revealed() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    let mut rng = SmallRng::seed_from_u64(5);
    let mut setup = page::setup(&desktop(), &full_presence(), &mut rng, &config);
    doc.apply(&setup.commands);
    for i in 0..REVEAL_COUNT {
        doc.observe(Target::Node(NodeId(i)));
    }

    let entry = |n: u32, is_intersecting: bool| IntersectionEntry {
        node: NodeId(n),
        is_intersecting,
    };
    let batches = [
        vec![entry(1, true), entry(3, true), entry(0, false)],
        vec![entry(1, false), entry(0, true)],
        vec![entry(2, true), entry(1, true)],
    ];

    let mut reveal_count = vec![0; REVEAL_COUNT as usize];
    for batch in &batches {
        let cmds = setup.reveal.on_entries(batch);
        for c in &cmds {
            if let DomCommand::AddClass {
                target: Target::Node(NodeId(n)),
                ..
            } = c
            {
                reveal_count[*n as usize] += 1;
            }
        }
        doc.apply(&cmds);
    }

    assert_eq!(reveal_count, vec![1; REVEAL_COUNT as usize]);
    for i in 0..REVEAL_COUNT {
        let node = Target::Node(NodeId(i));
        assert!(doc.has_class(node, "revealed"));
        assert!(doc.element(node).is_some_and(|e| !e.observed));
    }
    assert_eq!(setup.reveal.pending_len(), 0);
}

fn submit(
    doc: &mut DocumentModel,
    form: &mut ContactFormController,
    config: &SiteConfig,
    status: Result<u16, SubmitError>,
) {
    let (reaction, request) = form.begin("https://forms.example/submit", &config.contact);
    assert!(reaction.prevent_default);
    doc.apply(&reaction.commands);
    assert!(request.is_some());
    assert!(doc.element(Target::SubmitButton).is_some_and(|e| e.disabled));

    let outcome = status.and_then(check_status);
    let locale = language::locale_from_marker(marker_present(doc, config));
    let cmds = form.finish(outcome, locale, &config.contact);
    doc.apply(&cmds);
}

#[test]
fn contact_success_hides_form_and_shows_message() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    let mut form = ContactFormController::new();

    submit(&mut doc, &mut form, &config, Ok(200));

    let form_el = doc.element(Target::ContactForm).cloned().unwrap_or_default();
    assert!(form_el.hidden);
    assert_eq!(form_el.resets, 1);
    assert!(doc.element(Target::SuccessMessage).is_some_and(|e| !e.hidden));
}

#[test]
fn contact_failure_shows_localized_error_then_restores_label() {
    let config = SiteConfig::default();
    for (locale, error) in [
        (Locale::En, "Error — try again"),
        (Locale::Es, "Error — intenta de nuevo"),
    ] {
        let mut doc = full_document();
        doc.apply(&language::apply(locale, &config.language));
        let mut form = ContactFormController::new();

        submit(&mut doc, &mut form, &config, Ok(500));

        let button = doc.element(Target::SubmitButton).cloned().unwrap_or_default();
        assert!(!button.disabled);
        assert_eq!(button.content, Some(Content::Text(error.into())));
        assert!(doc.element(Target::ContactForm).is_some_and(|e| !e.hidden));

        doc.advance(2_999);
        assert_eq!(
            doc.content(Target::SubmitButton),
            Some(&Content::Text(error.into()))
        );
        doc.advance(1);
        assert_eq!(
            doc.content(Target::SubmitButton),
            Some(&Content::Html(
                r#"<span lang="en">Request a quote</span><span lang="es">Pedir cotización</span>"#
                    .into()
            ))
        );
    }
}

#[test]
fn transport_failure_is_recoverable() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    let mut form = ContactFormController::new();
    submit(
        &mut doc,
        &mut form,
        &config,
        Err(SubmitError::Transport("NetworkError".into())),
    );
    assert!(doc.element(Target::SubmitButton).is_some_and(|e| !e.disabled));
    assert_eq!(doc.pending_timers(), 1);
}

#[test]
fn resubmitting_during_restore_wait_cancels_the_old_timer() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    let mut form = ContactFormController::new();

    submit(&mut doc, &mut form, &config, Ok(502));
    doc.advance(1_000);

    let (reaction, _) = form.begin("https://forms.example/submit", &config.contact);
    doc.apply(&reaction.commands);
    assert_eq!(doc.pending_timers(), 0);

    doc.advance(5_000);
    assert_eq!(
        doc.content(Target::SubmitButton),
        Some(&Content::Text("...".into()))
    );
}

#[test]
fn smooth_scroll_offsets_fixed_header() {
    let config = SiteConfig::default();
    let mut doc = full_document();

    let pricing_top = 2_340.0;
    let lookup = |id: &str| (id == "pricing").then_some(pricing_top);
    let reaction = smooth_scroll::on_click("#pricing", lookup, 80.0, false, &config.smooth_scroll);
    assert!(reaction.prevent_default);
    doc.apply(&reaction.commands);
    assert_eq!(
        doc.last_scroll(),
        Some((pricing_top - 100.0, ScrollBehavior::Smooth))
    );
}

#[test]
fn smooth_scroll_leaves_unresolved_links_alone() {
    let config = SiteConfig::default();
    let mut doc = full_document();
    let mut lookups = Vec::new();

    let mut lookup = |id: &str| {
        lookups.push(id.to_string());
        (id == "pricing").then_some(2_340.0)
    };
    let missing = smooth_scroll::on_click("#missing", &mut lookup, 80.0, false, &config.smooth_scroll);
    assert!(missing.is_pass());
    doc.apply(&missing.commands);

    let bare = smooth_scroll::on_click("#", &mut lookup, 80.0, false, &config.smooth_scroll);
    assert!(bare.is_pass());

    assert_eq!(lookups, vec!["missing".to_string()]);
    assert_eq!(doc.last_scroll(), None);
}
