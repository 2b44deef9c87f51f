use comadrelab_protocol::Locale;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `id` of the optional `<script type="application/json">` element a page
/// can use to override parts of [`SiteConfig`].
pub const EMBEDDED_CONFIG_ID: &str = "comadrelab-config";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Selectors, marker names, ranges and labels shared by all controllers.
///
/// Every field has a default, so a partial JSON object only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Media query whose match means the user asked for reduced motion.
    pub reduced_motion_query: String,
    pub language: LanguageConfig,
    pub menu: MenuConfig,
    pub ambient: AmbientConfig,
    pub reveal: RevealConfig,
    pub contact: ContactConfig,
    pub smooth_scroll: SmoothScrollConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub storage_key: String,
    pub default_locale: Locale,
    /// Root class present iff the active locale is [`Locale::Es`].
    pub marker_class: String,
    pub toggle_selector: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub toggle_selector: String,
    pub nav_selector: String,
    /// Links inside the nav that close the menu when activated.
    pub link_selector: String,
    pub open_class: String,
}

/// Closed-open interval used for randomized tile attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min >= self.max {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("empty interval [{}, {})", self.min, self.max),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub container_selector: String,
    pub tile_class: String,
    pub animation_name: String,
    /// Viewports narrower than this get `mobile_count` tiles.
    pub mobile_breakpoint_px: f64,
    pub mobile_count: usize,
    pub desktop_count: usize,
    pub size_px: Interval,
    pub duration_s: Interval,
    /// Tiles start up to this many seconds into their cycle.
    pub max_delay_s: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub revealed_class: String,
    /// Fraction of the element that must be visible.
    pub threshold: f64,
    /// Bottom inset of the observer root. Negative values shrink the root.
    pub bottom_margin_px: f64,
}

impl RevealConfig {
    /// CSS-style margin string for `IntersectionObserverInit.rootMargin`.
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}px 0px", self.bottom_margin_px)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub form_selector: String,
    pub success_selector: String,
    /// Looked up inside the form.
    pub submit_selector: String,
    pub busy_label: String,
    pub error_label_en: String,
    pub error_label_es: String,
    pub idle_label_en: String,
    pub idle_label_es: String,
    pub revert_delay_ms: u32,
    /// `Accept` header sent with the submission.
    pub accept: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothScrollConfig {
    pub header_selector: String,
    pub anchor_selector: String,
    /// Extra space left between the fixed header and the target.
    pub buffer_px: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            reduced_motion_query: "(prefers-reduced-motion: reduce)".into(),
            language: LanguageConfig::default(),
            menu: MenuConfig::default(),
            ambient: AmbientConfig::default(),
            reveal: RevealConfig::default(),
            contact: ContactConfig::default(),
            smooth_scroll: SmoothScrollConfig::default(),
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            storage_key: "comadrelab-lang".into(),
            default_locale: Locale::En,
            marker_class: "es".into(),
            toggle_selector: ".lang-toggle".into(),
        }
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            toggle_selector: ".menu-toggle".into(),
            nav_selector: "#main-nav".into(),
            link_selector: "a".into(),
            open_class: "is-open".into(),
        }
    }
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            container_selector: ".hero-bg".into(),
            tile_class: "tile".into(),
            animation_name: "tileFloat".into(),
            mobile_breakpoint_px: 768.0,
            mobile_count: 6,
            desktop_count: 12,
            size_px: Interval::new(40.0, 80.0),
            duration_s: Interval::new(20.0, 40.0),
            max_delay_s: 20.0,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: "[data-reveal]".into(),
            revealed_class: "revealed".into(),
            threshold: 0.1,
            bottom_margin_px: -40.0,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            form_selector: ".contact-form".into(),
            success_selector: ".form-success".into(),
            submit_selector: "button[type=\"submit\"]".into(),
            busy_label: "...".into(),
            error_label_en: "Error — try again".into(),
            error_label_es: "Error — intenta de nuevo".into(),
            idle_label_en: "Request a quote".into(),
            idle_label_es: "Pedir cotización".into(),
            revert_delay_ms: 3000,
            accept: "application/json".into(),
        }
    }
}

impl Default for SmoothScrollConfig {
    fn default() -> Self {
        Self {
            header_selector: ".header".into(),
            anchor_selector: "a[href^=\"#\"]".into(),
            buffer_px: 20.0,
        }
    }
}

impl SiteConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.language.storage_key.is_empty() {
            return Err(ConfigError::Invalid {
                field: "language.storage_key",
                reason: "must not be empty".into(),
            });
        }

        let ambient = &self.ambient;
        if ambient.mobile_count == 0 {
            return Err(ConfigError::Invalid {
                field: "ambient.mobile_count",
                reason: "tile counts must be positive".into(),
            });
        }
        if ambient.desktop_count == 0 {
            return Err(ConfigError::Invalid {
                field: "ambient.desktop_count",
                reason: "tile counts must be positive".into(),
            });
        }
        if ambient.mobile_breakpoint_px.is_nan() || ambient.mobile_breakpoint_px <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "ambient.mobile_breakpoint_px",
                reason: format!("must be positive, got {}", ambient.mobile_breakpoint_px),
            });
        }
        ambient.size_px.check("ambient.size_px")?;
        if ambient.size_px.min <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "ambient.size_px",
                reason: "sizes must be positive".into(),
            });
        }
        ambient.duration_s.check("ambient.duration_s")?;
        if ambient.duration_s.min <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "ambient.duration_s",
                reason: "durations must be positive".into(),
            });
        }
        if ambient.max_delay_s.is_nan() || ambient.max_delay_s < 0.0 {
            return Err(ConfigError::Invalid {
                field: "ambient.max_delay_s",
                reason: format!("must not be negative, got {}", ambient.max_delay_s),
            });
        }

        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Invalid {
                field: "reveal.threshold",
                reason: format!("must lie in [0, 1], got {}", self.reveal.threshold),
            });
        }
        if !self.reveal.bottom_margin_px.is_finite() {
            return Err(ConfigError::Invalid {
                field: "reveal.bottom_margin_px",
                reason: "must be finite".into(),
            });
        }
        if !self.smooth_scroll.buffer_px.is_finite() {
            return Err(ConfigError::Invalid {
                field: "smooth_scroll.buffer_px",
                reason: "must be finite".into(),
            });
        }
        Ok(())
    }
}
