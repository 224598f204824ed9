//! # Document Schema
//!
//! Structural and type rules a document must satisfy before it may be
//! persisted. Validation collects every issue instead of stopping at the
//! first one, so the summary shown to the user is complete.
//!
//! Block rules: anchors carry their fixed ids, ids are unique and non-empty,
//! every kind is in the catalog, at most one cta, required content fields are
//! present, click counters and element trees appear only on kinds that have
//! them.
//!
//! Element rules: ids are unique across the whole tree, kinds are known,
//! `children` is present exactly on container kinds, and every prop belongs
//! to a group the kind admits and has the right value type.

use serde_json::Value;
use std::collections::HashSet;

use crate::block::{Block, BlockKind};
use crate::catalog::BlockCatalog;
use crate::document::Document;
use crate::element::{Element, ElementKind, ElementTree};
use crate::error::{ValidationError, ValidationIssue};
use crate::ids::{is_reserved_id, HERO_BLOCK_ID, MENU_BLOCK_ID};

/// Property families an element kind may admit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropGroup {
    Layout,
    Background,
    Border,
    Text,
    Control,
}

/// Accepted JSON value shape of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Number,
    Bool,
    /// Either a number or a string such as `"100%"`
    Dimension,
    /// Integer within an inclusive range
    Integer { min: i64, max: i64 },
}

impl ValueType {
    fn accepts(self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Number => value.is_number(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Dimension => value.is_number() || value.is_string(),
            ValueType::Integer { min, max } => value
                .as_i64()
                .map(|n| (min..=max).contains(&n))
                .unwrap_or(false),
        }
    }

    fn describe(self) -> String {
        match self {
            ValueType::String => "a string".to_string(),
            ValueType::Number => "a number".to_string(),
            ValueType::Bool => "a boolean".to_string(),
            ValueType::Dimension => "a number or a string".to_string(),
            ValueType::Integer { min, max } => format!("an integer between {min} and {max}"),
        }
    }
}

/// Group and value type of a known property
pub fn property_spec(key: &str) -> Option<(PropGroup, ValueType)> {
    use PropGroup::*;
    let spec = match key {
        "display" | "direction" | "align" | "justify" => (Layout, ValueType::String),
        "gap" | "padding" | "margin" => (Layout, ValueType::Number),
        "width" | "height" => (Layout, ValueType::Dimension),

        "backgroundColor" | "backgroundImage" => (Background, ValueType::String),

        "borderWidth" | "borderRadius" => (Border, ValueType::Number),
        "borderColor" | "borderStyle" => (Border, ValueType::String),

        "text" | "color" | "textAlign" => (Text, ValueType::String),
        "fontSize" => (Text, ValueType::Number),
        "fontWeight" => (Text, ValueType::Dimension),
        "level" => (Text, ValueType::Integer { min: 1, max: 6 }),

        "label" | "href" | "placeholder" | "name" => (Control, ValueType::String),
        "required" => (Control, ValueType::Bool),

        _ => return None,
    };
    Some(spec)
}

/// Property groups an element kind admits
pub fn allowed_groups(kind: &ElementKind) -> &'static [PropGroup] {
    use PropGroup::*;
    match kind {
        ElementKind::Section | ElementKind::Container | ElementKind::Row | ElementKind::Column => {
            &[Layout, Background, Border]
        }
        ElementKind::Heading | ElementKind::Paragraph => &[Layout, Background, Border, Text],
        ElementKind::Button => &[Layout, Background, Border, Text, Control],
        ElementKind::Input => &[Layout, Border, Text, Control],
        ElementKind::Divider => &[Layout, Background, Border],
        ElementKind::Unknown(_) => &[],
    }
}

/// Validate a whole document against the catalog
pub fn validate_document(doc: &Document, catalog: &BlockCatalog) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    let mut seen_ids = HashSet::new();
    let mut cta_count = 0;

    let hero = doc.blocks.hero();
    if hero.id != HERO_BLOCK_ID {
        issues.push(ValidationIssue::new(
            "blocks[0].id",
            format!("hero anchor must have id `{HERO_BLOCK_ID}`, found `{}`", hero.id),
        ));
    }
    let menu = doc.blocks.menu();
    let last = doc.blocks.len() - 1;
    if menu.id != MENU_BLOCK_ID {
        issues.push(ValidationIssue::new(
            format!("blocks[{last}].id"),
            format!("menu anchor must have id `{MENU_BLOCK_ID}`, found `{}`", menu.id),
        ));
    }

    for (index, block) in doc.blocks.iter().enumerate() {
        let path = format!("blocks[{index}]");

        if block.id.is_empty() {
            issues.push(ValidationIssue::new(format!("{path}.id"), "id is required"));
        } else if !seen_ids.insert(block.id.as_str()) {
            issues.push(ValidationIssue::new(
                format!("{path}.id"),
                format!("duplicate block id `{}`", block.id),
            ));
        }
        if !block.is_anchor() && is_reserved_id(&block.id) {
            issues.push(ValidationIssue::new(
                format!("{path}.id"),
                format!("id `{}` is reserved for an anchor", block.id),
            ));
        }
        if block.kind == BlockKind::Cta {
            cta_count += 1;
            if cta_count > 1 {
                issues.push(ValidationIssue::new(
                    format!("{path}.kind"),
                    "at most one cta block may exist",
                ));
            }
        }

        validate_block(block, catalog, &path, &mut issues);
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(issues))
    }
}

fn validate_block(
    block: &Block,
    catalog: &BlockCatalog,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    let Some(entry) = catalog.entry(&block.kind) else {
        issues.push(ValidationIssue::new(
            format!("{path}.kind"),
            format!("unknown block kind `{}`", block.kind),
        ));
        return;
    };

    for field in &entry.required_fields {
        if !block.content.contains_key(field) {
            issues.push(ValidationIssue::new(
                format!("{path}.content.{field}"),
                format!("required field for `{}` blocks is missing", block.kind),
            ));
        }
    }

    if block.observation_counter.is_some() && !entry.counts_clicks {
        issues.push(ValidationIssue::new(
            format!("{path}.observationCounter"),
            format!("`{}` blocks do not carry a counter", block.kind),
        ));
    }

    match (&block.elements, entry.supports_elements) {
        (Some(tree), true) => validate_tree_into(tree, &format!("{path}.elements"), issues),
        (Some(_), false) => issues.push(ValidationIssue::new(
            format!("{path}.elements"),
            format!("`{}` blocks cannot hold elements", block.kind),
        )),
        (None, true) => issues.push(ValidationIssue::new(
            format!("{path}.elements"),
            format!("`{}` blocks require an element tree", block.kind),
        )),
        (None, false) => {}
    }
}

/// Validate a single element tree with its metadata
pub fn validate_tree(tree: &ElementTree) -> Result<(), ValidationError> {
    let mut issues = Vec::new();
    validate_tree_into(tree, "elements", &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::new(issues))
    }
}

fn validate_tree_into(tree: &ElementTree, path: &str, issues: &mut Vec<ValidationIssue>) {
    if tree.name.trim().is_empty() {
        issues.push(ValidationIssue::new(format!("{path}.name"), "name is required"));
    }
    let mut seen = HashSet::new();
    for (index, element) in tree.elements.iter().enumerate() {
        validate_element(element, &format!("{path}.elements[{index}]"), &mut seen, issues);
    }
}

fn validate_element<'a>(
    element: &'a Element,
    path: &str,
    seen: &mut HashSet<&'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    if element.id.is_empty() {
        issues.push(ValidationIssue::new(format!("{path}.id"), "id is required"));
    } else if !seen.insert(element.id.as_str()) {
        issues.push(ValidationIssue::new(
            format!("{path}.id"),
            format!("duplicate element id `{}`", element.id),
        ));
    }

    if !element.kind.is_known() {
        issues.push(ValidationIssue::new(
            format!("{path}.type"),
            format!("unknown element type `{}`", element.kind),
        ));
    } else {
        validate_props(element, path, issues);
    }

    match (&element.children, element.kind.is_container()) {
        (Some(children), true) => {
            for (index, child) in children.iter().enumerate() {
                validate_element(child, &format!("{path}.children[{index}]"), seen, issues);
            }
        }
        (Some(_), false) => issues.push(ValidationIssue::new(
            format!("{path}.children"),
            format!("`{}` elements cannot have children", element.kind),
        )),
        (None, true) if element.kind.is_known() => issues.push(ValidationIssue::new(
            format!("{path}.children"),
            format!("`{}` elements require a children list", element.kind),
        )),
        (None, _) => {}
    }
}

fn validate_props(element: &Element, path: &str, issues: &mut Vec<ValidationIssue>) {
    let groups = allowed_groups(&element.kind);
    for (key, value) in &element.props {
        let prop_path = format!("{path}.props.{key}");
        match property_spec(key) {
            None => issues.push(ValidationIssue::new(prop_path, "unknown property")),
            Some((group, _)) if !groups.contains(&group) => issues.push(ValidationIssue::new(
                prop_path,
                format!("{group:?} properties are not allowed on `{}`", element.kind),
            )),
            Some((_, value_type)) if !value_type.accepts(value) => {
                issues.push(ValidationIssue::new(
                    prop_path,
                    format!("expected {}, found {value}", value_type.describe()),
                ))
            }
            Some(_) => {}
        }
    }
}
