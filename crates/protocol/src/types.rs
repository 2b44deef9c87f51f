use serde::{Deserialize, Serialize};

/// Index of an element inside a front end's registry of reveal-opted
/// elements. Assigned in document order at page setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// A DOM element a command is addressed to.
///
/// Front ends resolve each variant once at page setup. A command whose
/// target is absent from the page is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// `document.documentElement`, carrier of the locale marker.
    Root,
    Body,
    Head,
    MenuToggle,
    Nav,
    /// Container for the decorative tiles.
    HeroBackground,
    ContactForm,
    SubmitButton,
    SuccessMessage,
    Header,
    /// A reveal-opted element.
    Node(NodeId),
}

/// How `window.scrollTo` should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    /// Jump immediately.
    Auto,
    #[default]
    Smooth,
}

impl ScrollBehavior {
    /// Smooth unless the platform asks for reduced motion.
    pub fn for_motion(reduced_motion: bool) -> Self {
        if reduced_motion { Self::Auto } else { Self::Smooth }
    }
}
