//! Lightbox configuration.
//!
//! A [`LightboxConfig`] is the option record a lightbox is initialized with.
//! Every option has a default; callers override only what they need. Options
//! can come from three places:
//!
//! - Rust code, via struct update syntax on [`LightboxConfig::default`]
//! - a `lightbox.toml` file, layered on the stock defaults ([`load_config`])
//! - a JSON object using the widget's browser-side camelCase option names
//!   ([`LightboxConfig::from_json`])
//!
//! ## Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! selector = ".lightbox"       # CSS selector for trigger elements
//! captions = true              # Show captions
//! captions_selector = "self"   # "self" (trigger element) or "img" (its image)
//! caption_attribute = "title"  # Attribute the caption is read from
//! nav = "auto"                 # true, false, or "auto" (hidden on touch devices)
//! nav_text = ["&lsaquo;", "&rsaquo;"]
//! close = true
//! close_text = "&times;"
//! counter = true
//! keyboard = true
//! zoom = true
//! zoom_text = "&plus;"
//! doc_close = false            # Clicking the backdrop closes
//! swipe_close = true           # Swiping down closes
//! scroll = false               # Keep page scrolling while open
//! draggable = true             # Mouse and touch dragging
//! threshold = 20               # Drag distance (px) before a gesture counts
//! ```
//!
//! Unknown keys are rejected to catch typos early. In TOML and JSON both
//! `snake_case` and `camelCase` spellings are accepted (`navText` and
//! `nav_text` are the same option).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up by [`load_config`].
pub const CONFIG_FILE: &str = "lightbox.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Whether the prev/next buttons are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "NavRepr", into = "NavRepr")]
pub enum NavMode {
    /// Shown, except on touch-capable devices.
    #[default]
    Auto,
    Always,
    Never,
}

impl NavMode {
    /// Whether navigation counts as enabled at all.
    pub fn is_enabled(self) -> bool {
        !matches!(self, NavMode::Never)
    }
}

/// On-disk form of [`NavMode`]: `true`, `false` or `"auto"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NavRepr {
    Flag(bool),
    Keyword(NavKeyword),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NavKeyword {
    Auto,
}

impl From<NavRepr> for NavMode {
    fn from(repr: NavRepr) -> Self {
        match repr {
            NavRepr::Flag(true) => NavMode::Always,
            NavRepr::Flag(false) => NavMode::Never,
            NavRepr::Keyword(NavKeyword::Auto) => NavMode::Auto,
        }
    }
}

impl From<NavMode> for NavRepr {
    fn from(mode: NavMode) -> Self {
        match mode {
            NavMode::Auto => NavRepr::Keyword(NavKeyword::Auto),
            NavMode::Always => NavRepr::Flag(true),
            NavMode::Never => NavRepr::Flag(false),
        }
    }
}

/// Where a slide's caption text is read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptionSource {
    /// The trigger element's own attribute.
    #[default]
    #[serde(rename = "self")]
    Trigger,
    /// The attribute of the first `<img>` inside the trigger.
    #[serde(rename = "img")]
    Image,
}

/// Lightbox options.
///
/// All fields have defaults matching the stock widget. The record is cloned
/// into each lightbox at initialization and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightboxConfig {
    /// CSS selector matching the trigger elements.
    pub selector: String,
    /// Render captions under images.
    pub captions: bool,
    /// Read captions from the trigger (`self`) or its image (`img`).
    pub captions_selector: CaptionSource,
    /// Attribute holding the caption text.
    pub caption_attribute: String,
    /// Prev/next button visibility.
    pub nav: NavMode,
    /// Markup for the prev and next buttons.
    pub nav_text: [String; 2],
    /// Show the close button.
    pub close: bool,
    /// Markup for the close button.
    pub close_text: String,
    /// Show the `n/total` counter.
    pub counter: bool,
    /// Arrow keys navigate, Escape closes.
    pub keyboard: bool,
    /// Add a zoom icon to triggers that wrap an image.
    pub zoom: bool,
    /// Markup for the zoom icon.
    pub zoom_text: String,
    /// Clicking the backdrop around an image closes the overlay.
    pub doc_close: bool,
    /// Swiping down closes the overlay.
    pub swipe_close: bool,
    /// Leave page scrolling enabled while the overlay is open.
    pub scroll: bool,
    /// Enable mouse and touch dragging.
    pub draggable: bool,
    /// Minimum drag distance in pixels for a gesture to act.
    pub threshold: f64,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            selector: ".lightbox".to_string(),
            captions: true,
            captions_selector: CaptionSource::Trigger,
            caption_attribute: "title".to_string(),
            nav: NavMode::Auto,
            nav_text: ["&lsaquo;".to_string(), "&rsaquo;".to_string()],
            close: true,
            close_text: "&times;".to_string(),
            counter: true,
            keyboard: true,
            zoom: true,
            zoom_text: "&plus;".to_string(),
            doc_close: false,
            swipe_close: true,
            scroll: false,
            draggable: true,
            threshold: 20.0,
        }
    }
}

impl LightboxConfig {
    /// Validate option values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector.trim().is_empty() {
            return Err(ConfigError::Validation("selector must not be empty".into()));
        }
        if self.caption_attribute.trim().is_empty() {
            return Err(ConfigError::Validation(
                "caption_attribute must not be empty".into(),
            ));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::Validation(
                "threshold must be a non-negative number of pixels".into(),
            ));
        }
        Ok(())
    }

    /// Parse browser-style JSON options (camelCase or snake_case keys),
    /// filling unspecified options with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let value = match value {
            serde_json::Value::Object(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (snake_case(&k), v))
                    .collect(),
            ),
            other => other,
        };
        let config: LightboxConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }
}

/// `navText` → `nav_text`. Already-snake keys pass through unchanged.
fn snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Rewrite the top-level keys of a TOML table to snake_case.
fn normalize_keys(value: toml::Value) -> toml::Value {
    match value {
        toml::Value::Table(table) => toml::Value::Table(
            table
                .into_iter()
                .map(|(k, v)| (snake_case(&k), v))
                .collect(),
        ),
        other => other,
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LightboxConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `lightbox.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(normalize_keys(value)))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<LightboxConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, normalize_keys(ov)),
        None => base,
    };
    let config: LightboxConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `lightbox.toml` in the given directory, layered on the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<LightboxConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `lightbox.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Lightbox Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# CSS selector for the elements that open the lightbox.
# Supports type, class, id and attribute selectors, descendant (` `) and
# child (`>`) combinators, and comma-separated lists.
selector = ".lightbox"

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
# Show a caption under each image.
captions = true

# Where captions are read from: "self" (the trigger element) or "img" (the
# first image inside the trigger).
captions_selector = "self"

# Attribute holding the caption text.
caption_attribute = "title"

# ---------------------------------------------------------------------------
# Controls
# ---------------------------------------------------------------------------
# Previous/next buttons: true, false, or "auto" (hidden on touch devices).
nav = "auto"

# Button labels (markup).
nav_text = ["&lsaquo;", "&rsaquo;"]

# Close button and its label.
close = true
close_text = "&times;"

# Show the "n/total" counter.
counter = true

# Arrow keys navigate, Escape closes.
keyboard = true

# Add a zoom icon to triggers that wrap an image.
zoom = true
zoom_text = "&plus;"

# ---------------------------------------------------------------------------
# Behaviour
# ---------------------------------------------------------------------------
# Clicking the backdrop around an image closes the lightbox.
doc_close = false

# Swiping down closes the lightbox.
swipe_close = true

# Keep the page scrollable while the lightbox is open.
scroll = false

# Mouse and touch dragging between slides.
draggable = true

# Minimum drag distance in pixels before a gesture counts.
threshold = 20
"##
}
