use comadrelab_protocol::{DomCommand, Locale};
use rand::Rng;

use crate::config::SiteConfig;
use crate::controllers::contact::ContactFormController;
use crate::controllers::reveal::{ObserverOptions, RevealPlan, RevealTracker};
use crate::controllers::{ambient, language, reveal};

/// Browser facts a front end reads once at page-ready time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    pub reduced_motion: bool,
    /// `window.innerWidth` in CSS pixels.
    pub viewport_width: f64,
    /// Raw value found in storage under the language key.
    pub stored_locale: Option<String>,
    /// `navigator.language`.
    pub browser_language: Option<String>,
}

/// Which of the optional page regions exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagePresence {
    pub menu_toggle: bool,
    pub nav: bool,
    pub hero_background: bool,
    pub contact_form: bool,
    pub success_message: bool,
    pub header: bool,
    /// Number of reveal-opted elements, in document order.
    pub reveal_count: u32,
}

/// Controllers that wire listeners after setup. The language controller
/// always runs and is not listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnabledControllers {
    pub menu: bool,
    pub ambient: bool,
    pub reveal_observer: bool,
    pub contact: bool,
    pub smooth_scroll: bool,
}

impl EnabledControllers {
    /// Names of the controllers that disabled themselves.
    pub fn skipped(&self) -> Vec<&'static str> {
        [
            ("menu", self.menu),
            ("ambient", self.ambient),
            ("reveal-observer", self.reveal_observer),
            ("contact", self.contact),
            ("smooth-scroll", self.smooth_scroll),
        ]
        .into_iter()
        .filter_map(|(name, on)| (!on).then_some(name))
        .collect()
    }
}

/// Result of the single page initialization pass.
#[derive(Debug, Clone)]
pub struct PageSetup {
    pub locale: Locale,
    /// Commands to apply immediately, in order: locale, tiles, reveals.
    pub commands: Vec<DomCommand>,
    pub enabled: EnabledControllers,
    /// Options for the shared observer when elements are to be watched.
    pub observer: Option<ObserverOptions>,
    pub reveal: RevealTracker,
    pub contact: Option<ContactFormController>,
}

/// Run every controller's one-time setup in sequence.
pub fn setup<R: Rng + ?Sized>(
    env: &Environment,
    presence: &PagePresence,
    rng: &mut R,
    config: &SiteConfig,
) -> PageSetup {
    let mut commands = Vec::new();

    let locale = language::resolve_initial(
        env.stored_locale.as_deref(),
        env.browser_language.as_deref(),
        &config.language,
    );
    commands.extend(language::apply(locale, &config.language));

    let ambient_cmds = ambient::plan(
        env.reduced_motion,
        presence.hero_background,
        env.viewport_width,
        rng,
        &config.ambient,
    );
    let ambient_on = !ambient_cmds.is_empty();
    commands.extend(ambient_cmds);

    let mut tracker = RevealTracker::new(presence.reveal_count, &config.reveal);
    let observer = match reveal::plan(env.reduced_motion, &config.reveal) {
        RevealPlan::RevealAll => {
            commands.extend(tracker.reveal_all());
            None
        }
        RevealPlan::Observe(options) => (presence.reveal_count > 0).then_some(options),
    };

    let contact_on = presence.contact_form && presence.success_message;
    let enabled = EnabledControllers {
        menu: presence.menu_toggle && presence.nav,
        ambient: ambient_on,
        reveal_observer: observer.is_some(),
        contact: contact_on,
        smooth_scroll: presence.header,
    };

    PageSetup {
        locale,
        commands,
        enabled,
        observer,
        reveal: tracker,
        contact: contact_on.then(ContactFormController::new),
    }
}
