//! Element factory: new element nodes with kind-appropriate default props

use serde_json::{json, Value};

use crate::element::{Element, ElementKind, Props};

/// Create a new element of `kind`.
///
/// Container kinds start with an empty `children` list, leaf kinds have no
/// `children` at all. Unknown kinds get empty props; validation rejects them.
pub fn new_element(kind: ElementKind, id: String) -> Element {
    let props = default_props(&kind);
    let children = kind.is_container().then(Vec::new);
    Element {
        id,
        kind,
        props,
        children,
    }
}

/// Default property bag for an element kind
pub fn default_props(kind: &ElementKind) -> Props {
    let value = match kind {
        ElementKind::Section => json!({
            "display": "flex",
            "direction": "column",
            "padding": 24,
            "gap": 16,
            "backgroundColor": "#ffffff",
        }),
        ElementKind::Container => json!({
            "display": "flex",
            "direction": "column",
            "padding": 16,
            "gap": 8,
            "borderWidth": 0,
            "borderRadius": 8,
        }),
        ElementKind::Row => json!({
            "display": "flex",
            "direction": "row",
            "gap": 8,
            "align": "center",
        }),
        ElementKind::Column => json!({
            "display": "flex",
            "direction": "column",
            "gap": 8,
            "width": "100%",
        }),
        ElementKind::Heading => json!({
            "text": "Heading",
            "level": 2,
            "fontSize": 24,
            "fontWeight": 700,
            "color": "#111111",
        }),
        ElementKind::Paragraph => json!({
            "text": "Write something here",
            "fontSize": 16,
            "color": "#333333",
            "textAlign": "left",
        }),
        ElementKind::Button => json!({
            "label": "Click here",
            "href": "#",
            "padding": 12,
            "backgroundColor": "#2563eb",
            "color": "#ffffff",
            "borderRadius": 6,
        }),
        ElementKind::Input => json!({
            "name": "field",
            "placeholder": "Type here",
            "required": false,
            "borderWidth": 1,
            "borderColor": "#d1d5db",
        }),
        ElementKind::Divider => json!({
            "borderWidth": 1,
            "borderStyle": "solid",
            "borderColor": "#e5e7eb",
            "margin": 16,
        }),
        ElementKind::Unknown(_) => json!({}),
    };

    match value {
        Value::Object(map) => map,
        _ => Props::new(),
    }
}
