use comadrelab_protocol::{DomCommand, Reaction, ScrollBehavior};

use crate::config::SmoothScrollConfig;

/// Element id an in-page link points at.
///
/// `None` for a bare `#` (no target) and for hrefs that are not fragments.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document offset to scroll to so the target clears the fixed header.
pub fn scroll_target(element_document_top: f64, header_height: f64, buffer_px: f64) -> f64 {
    element_document_top - header_height - buffer_px
}

/// React to an in-page link click.
///
/// `target_top` is the document-relative top of the element the fragment
/// resolved to, or `None` when nothing matched; unresolved links keep their
/// default behavior.
pub fn handle(
    target_top: Option<f64>,
    header_height: f64,
    reduced_motion: bool,
    config: &SmoothScrollConfig,
) -> Reaction {
    let Some(top) = target_top else {
        return Reaction::pass();
    };
    Reaction::intercept(vec![DomCommand::ScrollTo {
        top: scroll_target(top, header_height, config.buffer_px),
        behavior: ScrollBehavior::for_motion(reduced_motion),
    }])
}

/// React to a click on a link with `href`.
///
/// `resolve` maps an element id to its document-relative top and is only
/// consulted for real fragments; a bare `#`, a link elsewhere or an id with
/// no element all keep the browser's default navigation.
pub fn on_click(
    href: &str,
    resolve: impl FnOnce(&str) -> Option<f64>,
    header_height: f64,
    reduced_motion: bool,
    config: &SmoothScrollConfig,
) -> Reaction {
    let Some(id) = fragment_id(href) else {
        return Reaction::pass();
    };
    handle(resolve(id), header_height, reduced_motion, config)
}
