//! Deck configuration.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::DeckError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/deck.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for a deck session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Origin that slide addresses are resolved against for HTTP fetches.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Base path for relative links found in the slide index.
    #[serde(default = "default_slides_path")]
    pub slides_path: String,

    /// Slide index addresses, tried in order until one loads.
    #[serde(default = "default_index_candidates")]
    pub index_candidates: Vec<String>,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum accepted response size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: u64,

    /// Thumbnails beyond the visible range that are prefetched too.
    #[serde(default = "default_viewport_margin")]
    pub viewport_margin: usize,
}

fn default_base_url() -> String {
    "http://localhost:8000/".to_string()
}

fn default_slides_path() -> String {
    "/slides/".to_string()
}

fn default_index_candidates() -> Vec<String> {
    ["slides/index.md", "/slides/index.html", "/slides/index.htm", "/slides"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_timeout_secs() -> u64 {
    deckview_fetch::DEFAULT_TIMEOUT.as_secs()
}

fn default_max_body_bytes() -> u64 {
    deckview_fetch::DEFAULT_MAX_BODY_BYTES
}

fn default_viewport_margin() -> usize {
    1
}

impl DeckConfig {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self {
            base_url: default_base_url(),
            slides_path: default_slides_path(),
            index_candidates: default_index_candidates(),
            timeout_secs: default_timeout_secs(),
            max_body_bytes: default_max_body_bytes(),
            viewport_margin: default_viewport_margin(),
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.deckview.jsonc`, `.deckview.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| DeckError::config(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parses configuration from JSON (comments and trailing commas allowed)
    /// with schema validation.
    pub fn from_json(json: &str) -> Result<Self, DeckError> {
        // Parse into Value first for validation
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| DeckError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        // Initialize and check schema
        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(DeckError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| DeckError::config(format!("Invalid config: {}", e)))
    }

    /// Overrides the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self::new()
    }
}
