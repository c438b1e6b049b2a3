//! Site configuration module.
//!
//! Handles loading, validating, and merging `crusade-gallery.toml`. Stock
//! defaults are serialized to a TOML value, the user's file is merged on top
//! table-by-table, and the result is deserialized and validated.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [gallery]
//! page_size = 12            # Thumbnails per page
//!
//! [display]
//! width = 800               # Width hint for grid images
//! quality = 85              # Quality hint for grid images (0-100)
//!
//! [thumbnails]
//! width = 400               # Width hint for event cover cards
//! quality = 80
//!
//! [preload]
//! limit = 3                 # Links probed at once by `check`
//!
//! [storage]
//! path = ".crusade-gallery/storage.json"
//! key = "crusade-gallery:images"
//!
//! [social]
//! Facebook = "https://facebook.com/your-page"
//!
//! [[events]]
//! id = "agfi-2026"
//! name = "AGFI Crusade 2026"
//! location = "Accra, Ghana"
//! start_date = "January 2, 2026"
//! end_date = "January 4, 2026"
//! day_count = 3
//! [events.images]
//! day1 = ["https://drive.google.com/uc?export=download&id=..."]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Tables merge key-by-key, but arrays replace: a
//! file that declares any `[[events]]` replaces the whole stock catalog.
//!
//! Unknown keys are rejected to catch typos early.

use crate::link::OptimizeOptions;
use crate::preload::DEFAULT_PRELOAD_LIMIT;
use crate::types::{DaySlot, Event, MAX_DAYS, MIN_DAYS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "crusade-gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `crusade-gallery.toml`.
///
/// All fields have defaults; the stock event catalog doubles as the built-in
/// dataset used when no snapshot exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Pagination settings.
    pub gallery: GalleryConfig,
    /// Hints for images in the day grid.
    pub display: DisplayConfig,
    /// Hints for event cover cards.
    pub thumbnails: ThumbnailsConfig,
    /// Link-check batch settings.
    pub preload: PreloadConfig,
    /// Where the snapshot lives.
    pub storage: StorageConfig,
    /// Footer links, label → URL.
    pub social: BTreeMap<String, String>,
    /// Event catalog and its built-in image lists.
    pub events: Vec<Event>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            gallery: GalleryConfig::default(),
            display: DisplayConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            preload: PreloadConfig::default(),
            storage: StorageConfig::default(),
            social: BTreeMap::new(),
            events: default_events(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gallery.page_size == 0 {
            return Err(ConfigError::Validation(
                "gallery.page_size must be non-zero".into(),
            ));
        }
        if self.display.quality > 100 || self.thumbnails.quality > 100 {
            return Err(ConfigError::Validation(
                "display.quality and thumbnails.quality must be 0-100".into(),
            ));
        }
        if self.display.width == 0 || self.thumbnails.width == 0 {
            return Err(ConfigError::Validation(
                "display.width and thumbnails.width must be non-zero".into(),
            ));
        }
        if self.preload.limit == 0 {
            return Err(ConfigError::Validation(
                "preload.limit must be non-zero".into(),
            ));
        }
        if self.storage.key.is_empty() {
            return Err(ConfigError::Validation(
                "storage.key must not be empty".into(),
            ));
        }
        if self.events.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[events]] entry is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for event in &self.events {
            if event.id.trim().is_empty() {
                return Err(ConfigError::Validation("events.id must not be empty".into()));
            }
            // Ids become output directory names
            if !event
                .id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "event id '{}' may only contain letters, digits, '-' and '_'",
                    event.id
                )));
            }
            if !seen.insert(event.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate event id '{}'",
                    event.id
                )));
            }
            if !(MIN_DAYS..=MAX_DAYS).contains(&event.day_count) {
                return Err(ConfigError::Validation(format!(
                    "event '{}': day_count must be {MIN_DAYS}-{MAX_DAYS}",
                    event.id
                )));
            }
        }
        Ok(())
    }
}

/// Pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Thumbnails per page.
    pub page_size: usize,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self { page_size: 12 }
    }
}

/// Width/quality hints for images in the day grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub width: u32,
    pub quality: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let stock = OptimizeOptions::default();
        Self {
            width: stock.width,
            quality: stock.quality,
        }
    }
}

impl DisplayConfig {
    pub fn options(&self) -> OptimizeOptions {
        OptimizeOptions {
            width: self.width,
            quality: self.quality,
        }
    }
}

/// Width/quality hints for event cover cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub width: u32,
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            width: 400,
            quality: 80,
        }
    }
}

impl ThumbnailsConfig {
    pub fn options(&self) -> OptimizeOptions {
        OptimizeOptions {
            width: self.width,
            quality: self.quality,
        }
    }
}

/// Link-check batch settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreloadConfig {
    /// Links probed concurrently per chunk.
    pub limit: usize,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PRELOAD_LIMIT,
        }
    }
}

/// Snapshot location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON key-value file standing in for browser local storage.
    pub path: String,
    /// Key the snapshot is stored under.
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: ".crusade-gallery/storage.json".to_string(),
            key: "crusade-gallery:images".to_string(),
        }
    }
}

/// The stock catalog: one image per day for the opening crusade, and an
/// upcoming two-day event with nothing uploaded yet.
pub fn default_events() -> Vec<Event> {
    let opening = BTreeMap::from([
        (
            DaySlot::Day1,
            vec![
                "https://drive.google.com/uc?export=download&id=1SQA3jci-gQ5bAnhnCtkfY6J8vdsN80bH"
                    .to_string(),
            ],
        ),
        (
            DaySlot::Day2,
            vec![
                "https://drive.google.com/uc?export=download&id=1Ahnf9ANFR0gSYgPDj45d1Dejk6Z4rCyf"
                    .to_string(),
            ],
        ),
        (
            DaySlot::Day3,
            vec![
                "https://drive.google.com/uc?export=download&id=1hckUnRJ_GdP5jlVbpU_WDb3stjf6JPR8"
                    .to_string(),
            ],
        ),
    ]);
    vec![
        Event {
            id: "agfi-2026".to_string(),
            name: "AGFI Crusade 2026".to_string(),
            location: "Accra, Ghana".to_string(),
            start_date: "January 2, 2026".to_string(),
            end_date: "January 4, 2026".to_string(),
            day_count: 3,
            images: opening,
        },
        Event {
            id: "agfi-2026-kumasi".to_string(),
            name: "Kumasi Revival".to_string(),
            location: "Kumasi, Ghana".to_string(),
            start_date: "March 6, 2026 @ 7:00 PM".to_string(),
            end_date: "March 7, 2026".to_string(),
            day_count: 2,
            images: BTreeMap::from([(DaySlot::Day1, Vec::new()), (DaySlot::Day2, Vec::new())]),
        },
    ]
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist, `Err` if it isn't valid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file, falling back to stock defaults when the
/// file is missing.
pub fn load_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    let config = resolve_config(base, overlay)?;
    tracing::debug!(
        path = %path.display(),
        events = config.events.len(),
        "config loaded"
    );
    Ok(config)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Crusade Gallery Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Tables merge with the defaults key by key. Arrays replace: declaring any
# [[events]] replaces the whole stock catalog.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Pagination
# ---------------------------------------------------------------------------
[gallery]
# Thumbnails per page in each day grid.
page_size = 12

# ---------------------------------------------------------------------------
# Image hints (only applied to lh3.googleusercontent.com links)
# ---------------------------------------------------------------------------
[display]
# Width and quality requested for images in the day grid.
width = 800
quality = 85

[thumbnails]
# Width and quality requested for event cover cards.
width = 400
quality = 80

# ---------------------------------------------------------------------------
# Link checking
# ---------------------------------------------------------------------------
[preload]
# Links probed at once by `crusade-gallery check`.
limit = 3

# ---------------------------------------------------------------------------
# Snapshot storage
# ---------------------------------------------------------------------------
[storage]
# JSON key-value file holding the curated image lists.
path = ".crusade-gallery/storage.json"
# Key the snapshot is stored under.
key = "crusade-gallery:images"

# ---------------------------------------------------------------------------
# Footer links (label = URL)
# ---------------------------------------------------------------------------
[social]
# Facebook = "https://facebook.com/your-page"
# YouTube = "https://youtube.com/your-channel"

# ---------------------------------------------------------------------------
# Events. Image lists here are the built-in dataset, used until the first
# admin edit writes a snapshot.
# ---------------------------------------------------------------------------
[[events]]
id = "agfi-2026"
name = "AGFI Crusade 2026"
location = "Accra, Ghana"
start_date = "January 2, 2026"
end_date = "January 4, 2026"
day_count = 3

[events.images]
day1 = ["https://drive.google.com/uc?export=download&id=1SQA3jci-gQ5bAnhnCtkfY6J8vdsN80bH"]
day2 = ["https://drive.google.com/uc?export=download&id=1Ahnf9ANFR0gSYgPDj45d1Dejk6Z4rCyf"]
day3 = ["https://drive.google.com/uc?export=download&id=1hckUnRJ_GdP5jlVbpU_WDb3stjf6JPR8"]

[[events]]
id = "agfi-2026-kumasi"
name = "Kumasi Revival"
location = "Kumasi, Ghana"
start_date = "March 6, 2026 @ 7:00 PM"
end_date = "March 7, 2026"
day_count = 2

[events.images]
day1 = []
day2 = []
"##
}
