use serde::{Deserialize, Serialize};

/// Accent color of a decorative tile. Resolved through the page's CSS
/// custom properties, so the stylesheet owns the actual palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Accent {
    Cobalt,
    Gold,
}

impl Accent {
    pub fn css_value(self) -> &'static str {
        match self {
            Self::Cobalt => "var(--cobalt)",
            Self::Gold => "var(--gold)",
        }
    }
}

/// Randomized placement and timing of one floating background tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    /// Horizontal position, percent of the container width.
    pub left_pct: f64,
    /// Vertical position, percent of the container height.
    pub top_pct: f64,
    /// Edge length in CSS pixels.
    pub size_px: f64,
    /// Length of one animation cycle in seconds.
    pub duration_s: f64,
    /// Animation delay in seconds. Never positive, so tiles start mid-cycle.
    pub delay_s: f64,
    pub accent: Accent,
}

impl TileSpec {
    /// Inline `style` attribute for the tile element.
    ///
    /// The tile is absolutely positioned, starts invisible and never takes
    /// pointer events; `animation` names the keyframes block injected
    /// alongside the tiles.
    pub fn style(&self, animation_name: &str) -> String {
        format!(
            "position: absolute;left: {left}%;top: {top}%;width: {size}px;height: {size}px;\
             color: {color};opacity: 0;pointer-events: none;\
             animation: {animation_name} {duration}s ease-in-out {delay}s infinite;",
            left = self.left_pct,
            top = self.top_pct,
            size = self.size_px,
            color = self.accent.css_value(),
            duration = self.duration_s,
            delay = self.delay_s,
        )
    }
}
