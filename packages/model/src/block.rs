//! Page-level blocks

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::element::ElementTree;

/// Kind-specific block payload
pub type Content = serde_json::Map<String, serde_json::Value>;

/// Kind of a page-level block.
///
/// Serialized as a plain string. Strings that are not a built-in kind become
/// [`BlockKind::Custom`] and are checked against the catalog on validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BlockKind {
    Hero,
    Menu,
    Link,
    Cta,
    Website,
    Social,
    Address,
    Qr,
    Custom(String),
}

impl BlockKind {
    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Hero => "hero",
            BlockKind::Menu => "menu",
            BlockKind::Link => "link",
            BlockKind::Cta => "cta",
            BlockKind::Website => "website",
            BlockKind::Social => "social",
            BlockKind::Address => "address",
            BlockKind::Qr => "qr",
            BlockKind::Custom(name) => name,
        }
    }

    /// Hero and menu are pinned to the ends of the block list
    pub fn is_anchor(&self) -> bool {
        matches!(self, BlockKind::Hero | BlockKind::Menu)
    }

    /// Built-in dynamic kinds, in catalog order
    pub fn builtin_dynamic() -> [BlockKind; 6] {
        [
            BlockKind::Link,
            BlockKind::Cta,
            BlockKind::Website,
            BlockKind::Social,
            BlockKind::Address,
            BlockKind::Qr,
        ]
    }
}

impl From<String> for BlockKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "hero" => BlockKind::Hero,
            "menu" => BlockKind::Menu,
            "link" => BlockKind::Link,
            "cta" => BlockKind::Cta,
            "website" => BlockKind::Website,
            "social" => BlockKind::Social,
            "address" => BlockKind::Address,
            "qr" => BlockKind::Qr,
            _ => BlockKind::Custom(value),
        }
    }
}

impl From<&str> for BlockKind {
    fn from(value: &str) -> Self {
        BlockKind::from(value.to_string())
    }
}

impl From<BlockKind> for String {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A page-composition unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    pub kind: BlockKind,

    /// Copied from the catalog when the block is created, never re-derived
    pub display_title: String,
    pub display_subtitle: String,

    pub is_active: bool,

    #[serde(default)]
    pub content: Content,

    /// Click counter for kinds that track one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation_counter: Option<u64>,

    /// Nested visual elements for kinds that host them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<ElementTree>,
}

impl Block {
    pub fn is_anchor(&self) -> bool {
        self.kind.is_anchor()
    }
}
