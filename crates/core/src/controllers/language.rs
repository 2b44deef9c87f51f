use comadrelab_protocol::{DomCommand, Locale, Target};
use thiserror::Error;

use crate::config::LanguageConfig;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported locale code {0:?}, expected \"en\" or \"es\"")]
pub struct LocaleError(pub String);

/// Strict parse of a locale code coming from outside the page.
pub fn parse_locale(code: &str) -> Result<Locale, LocaleError> {
    Locale::from_code(code).ok_or_else(|| LocaleError(code.to_string()))
}

/// Pick the locale to show on first load.
///
/// Order: a valid stored code, then a browser language prefix match, then
/// the configured default. Stored values outside the two codes are ignored.
pub fn resolve_initial(
    stored: Option<&str>,
    browser_language: Option<&str>,
    config: &LanguageConfig,
) -> Locale {
    stored
        .and_then(Locale::from_code)
        .or_else(|| browser_language.and_then(Locale::from_language_tag))
        .unwrap_or(config.default_locale)
}

/// Read the locale back from the document marker.
pub fn locale_from_marker(marker_present: bool) -> Locale {
    if marker_present { Locale::Es } else { Locale::En }
}

/// Commands that make `locale` the active one and persist it.
///
/// Applying the same locale twice leaves the document unchanged.
pub fn apply(locale: Locale, config: &LanguageConfig) -> Vec<DomCommand> {
    let marker = if locale == Locale::Es {
        DomCommand::AddClass {
            target: Target::Root,
            class: config.marker_class.clone(),
        }
    } else {
        DomCommand::RemoveClass {
            target: Target::Root,
            class: config.marker_class.clone(),
        }
    };
    vec![
        marker,
        DomCommand::SetAttribute {
            target: Target::Root,
            name: "lang".into(),
            value: locale.code().into(),
        },
        DomCommand::StoreItem {
            key: config.storage_key.clone(),
            value: locale.code().into(),
        },
    ]
}

/// Flip the locale currently shown by the document marker.
pub fn toggle(marker_present: bool, config: &LanguageConfig) -> (Locale, Vec<DomCommand>) {
    let next = locale_from_marker(marker_present).other();
    (next, apply(next, config))
}
