//! # Block Catalog
//!
//! Registry of block kinds and the only place new blocks are materialized.
//!
//! Built-in kinds are always present. Custom kinds are registered from
//! configuration. Display metadata is copied onto a block when it is created,
//! so later catalog edits never rewrite existing blocks.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::block::{Block, BlockKind, Content};
use crate::element::ElementTree;
use crate::error::CatalogError;
use crate::ids::{HERO_BLOCK_ID, MENU_BLOCK_ID};

/// Description of one block kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub kind: BlockKind,
    pub title: String,

    #[serde(default)]
    pub subtitle: String,

    /// Blocks of this kind carry an element tree
    #[serde(default)]
    pub supports_elements: bool,

    /// Blocks of this kind carry a click counter
    #[serde(default)]
    pub counts_clicks: bool,

    /// Content a new block starts with
    #[serde(default)]
    pub default_content: Content,

    /// Content fields that must be present for the block to validate
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl CatalogEntry {
    pub fn new(kind: BlockKind, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            subtitle: subtitle.into(),
            supports_elements: false,
            counts_clicks: false,
            default_content: Content::new(),
            required_fields: Vec::new(),
        }
    }

    pub fn with_elements(mut self) -> Self {
        self.supports_elements = true;
        self
    }

    pub fn with_click_counter(mut self) -> Self {
        self.counts_clicks = true;
        self
    }

    /// Default value for a content field, which also makes it required
    pub fn with_field(mut self, name: &str, default: Value) -> Self {
        self.default_content.insert(name.to_string(), default);
        self.required_fields.push(name.to_string());
        self
    }
}

/// Fixed content of a freshly synthesized call-to-action block
pub fn cta_default_content() -> Content {
    let mut content = Content::new();
    content.insert("label".to_string(), json!("Get in touch"));
    content.insert("url".to_string(), json!("https://"));
    content.insert("style".to_string(), json!("primary"));
    content
}

/// Catalog of available block kinds
#[derive(Debug, Clone, PartialEq)]
pub struct BlockCatalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl BlockCatalog {
    /// Catalog with the built-in kinds only
    pub fn builtin() -> Self {
        let mut cta = CatalogEntry::new(BlockKind::Cta, "Call to action", "A prominent button")
            .with_click_counter();
        cta.required_fields = vec!["label".to_string(), "url".to_string()];
        cta.default_content = cta_default_content();

        let entries = [
            CatalogEntry::new(BlockKind::Hero, "Hero", "Cover, avatar and headline")
                .with_field("headline", json!("")),
            CatalogEntry::new(BlockKind::Menu, "Menu", "Footer navigation"),
            CatalogEntry::new(BlockKind::Link, "Link", "A single outbound link")
                .with_click_counter()
                .with_field("title", json!(""))
                .with_field("url", json!("https://")),
            cta,
            CatalogEntry::new(BlockKind::Website, "Website", "Embedded website preview")
                .with_field("url", json!("https://")),
            CatalogEntry::new(BlockKind::Social, "Social networks", "Profile links")
                .with_field("profiles", json!([])),
            CatalogEntry::new(BlockKind::Address, "Address", "Postal address and map")
                .with_field("line1", json!(""))
                .with_field("city", json!("")),
            CatalogEntry::new(BlockKind::Qr, "QR code", "Scannable code")
                .with_field("value", json!("")),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|entry| (entry.kind.to_string(), entry))
                .collect(),
        }
    }

    /// Built-in catalog extended with custom kinds
    pub fn with_custom(custom: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::builtin();
        for entry in custom {
            catalog.register(entry);
        }
        catalog
    }

    /// Add or replace a custom kind. Built-in kinds are never replaced.
    pub fn register(&mut self, entry: CatalogEntry) -> bool {
        if !matches!(entry.kind, BlockKind::Custom(_)) {
            tracing::warn!("[Catalog] Ignoring registration of built-in kind `{}`", entry.kind);
            return false;
        }
        self.entries.insert(entry.kind.to_string(), entry);
        true
    }

    pub fn entry(&self, kind: &BlockKind) -> Option<&CatalogEntry> {
        self.entries.get(kind.as_str())
    }

    pub fn contains(&self, kind: &BlockKind) -> bool {
        self.entry(kind).is_some()
    }

    /// Kinds a user may insert, sorted by name
    pub fn dynamic_kinds(&self) -> impl Iterator<Item = &BlockKind> {
        self.entries
            .values()
            .map(|entry| &entry.kind)
            .filter(|kind| !kind.is_anchor())
    }

    /// Create a new dynamic block of `kind` with the given id
    pub fn materialize(&self, kind: &BlockKind, id: String) -> Result<Block, CatalogError> {
        if kind.is_anchor() {
            return Err(CatalogError::AnchorKind(kind.to_string()));
        }
        let entry = self
            .entry(kind)
            .ok_or_else(|| CatalogError::UnknownKind(kind.to_string()))?;
        Ok(instantiate(entry, id))
    }

    /// Create the hero anchor
    pub fn hero(&self) -> Block {
        self.anchor(BlockKind::Hero, HERO_BLOCK_ID)
    }

    /// Create the menu anchor
    pub fn menu(&self) -> Block {
        self.anchor(BlockKind::Menu, MENU_BLOCK_ID)
    }

    fn anchor(&self, kind: BlockKind, id: &str) -> Block {
        match self.entry(&kind) {
            Some(entry) => instantiate(entry, id.to_string()),
            // builtin() always holds both anchors; a bare block keeps the
            // document shape intact if a caller built the map by hand
            None => Block {
                id: id.to_string(),
                display_title: kind.to_string(),
                display_subtitle: String::new(),
                kind,
                is_active: true,
                content: Content::new(),
                observation_counter: None,
                elements: None,
            },
        }
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn instantiate(entry: &CatalogEntry, id: String) -> Block {
    Block {
        id,
        kind: entry.kind.clone(),
        display_title: entry.title.clone(),
        display_subtitle: entry.subtitle.clone(),
        is_active: true,
        content: entry.default_content.clone(),
        observation_counter: entry.counts_clicks.then_some(0),
        elements: entry
            .supports_elements
            .then(|| ElementTree::new(entry.title.clone(), entry.subtitle.clone())),
    }
}
