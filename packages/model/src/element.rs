//! Nested visual elements inside a block

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-tagged property bag of an element
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Element kind.
///
/// Container kinds hold children, leaf kinds never do. Any other string
/// deserializes to [`ElementKind::Unknown`], which validation rejects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Section,
    Container,
    Row,
    Column,
    Heading,
    Paragraph,
    Button,
    Input,
    Divider,
    Unknown(String),
}

impl ElementKind {
    pub const ALL: [ElementKind; 9] = [
        ElementKind::Section,
        ElementKind::Container,
        ElementKind::Row,
        ElementKind::Column,
        ElementKind::Heading,
        ElementKind::Paragraph,
        ElementKind::Button,
        ElementKind::Input,
        ElementKind::Divider,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Section => "section",
            ElementKind::Container => "container",
            ElementKind::Row => "row",
            ElementKind::Column => "column",
            ElementKind::Heading => "heading",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Button => "button",
            ElementKind::Input => "input",
            ElementKind::Divider => "divider",
            ElementKind::Unknown(name) => name,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            ElementKind::Section | ElementKind::Container | ElementKind::Row | ElementKind::Column
        )
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ElementKind::Unknown(_))
    }
}

impl From<String> for ElementKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "section" => ElementKind::Section,
            "container" => ElementKind::Container,
            "row" => ElementKind::Row,
            "column" => ElementKind::Column,
            "heading" => ElementKind::Heading,
            "paragraph" => ElementKind::Paragraph,
            "button" => ElementKind::Button,
            "input" => ElementKind::Input,
            "divider" => ElementKind::Divider,
            _ => ElementKind::Unknown(value),
        }
    }
}

impl From<&str> for ElementKind {
    fn from(value: &str) -> Self {
        ElementKind::from(value.to_string())
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Unknown(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element node.
///
/// `children` is `Some` exactly for container kinds; leaf kinds serialize
/// without a `children` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ElementKind,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Element>>,
}

impl Element {
    pub fn children(&self) -> Option<&[Element]> {
        self.children.as_deref()
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Element>> {
        self.children.as_mut()
    }

    /// Append a child to a container. Returns the child back for leaf kinds.
    pub fn push_child(&mut self, child: Element) -> Result<(), Element> {
        match self.children.as_mut() {
            Some(children) => {
                children.push(child);
                Ok(())
            }
            None => Err(child),
        }
    }
}

/// Element tree of one block plus its metadata
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementTree {
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Root-level elements, in order
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl ElementTree {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            elements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_serializes_without_children() {
        let leaf = Element {
            id: "e-1".to_string(),
            kind: ElementKind::Heading,
            props: Props::new(),
            children: None,
        };

        let json = serde_json::to_value(&leaf).unwrap();
        assert_eq!(json["type"], "heading");
        assert!(json.get("children").is_none());
    }

    #[test]
    fn test_unknown_type_is_preserved() {
        let element: Element = serde_json::from_value(json!({
            "id": "e-9",
            "type": "carousel",
            "props": {}
        }))
        .unwrap();

        assert_eq!(element.kind, ElementKind::Unknown("carousel".to_string()));
        assert!(!element.kind.is_known());
        assert_eq!(serde_json::to_value(&element).unwrap()["type"], "carousel");
    }

    #[test]
    fn test_push_child_rejects_leaf() {
        let mut leaf = Element {
            id: "e-1".to_string(),
            kind: ElementKind::Button,
            props: Props::new(),
            children: None,
        };
        let child = leaf.clone();

        assert!(leaf.push_child(child).is_err());
    }
}
