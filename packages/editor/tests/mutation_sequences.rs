//! Long mutation sequences
//!
//! This tests:
//! - Identity stability across non-removing edits
//! - Anchor placement under any block-list sequence
//! - Recursive element removal
//! - Replaying serialized mutations

use composer_editor::{EditSession, Mutation};
use composer_model::{
    factory::new_element, tree, BlockCatalog, BlockKind, CatalogEntry, Document, ElementKind,
    SequentialIds, HERO_BLOCK_ID, MENU_BLOCK_ID,
};
use serde_json::json;
use std::sync::Arc;

fn catalog() -> Arc<BlockCatalog> {
    Arc::new(BlockCatalog::with_custom([CatalogEntry::new(
        BlockKind::from("landing"),
        "Landing",
        "",
    )
    .with_elements()]))
}

fn session() -> EditSession {
    let catalog = catalog();
    let document = Document::empty(&catalog);
    EditSession::new("seq", document, catalog, Box::new(SequentialIds::new("s")))
}

/// Deterministic picks for sequence tests
struct Picker(u64);

impl Picker {
    fn pick(&mut self, bound: usize) -> usize {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) as usize) % bound.max(1)
    }
}

fn assert_anchors(doc: &Document) {
    let ids: Vec<&str> = doc.blocks.iter().map(|block| block.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&HERO_BLOCK_ID));
    assert_eq!(ids.last(), Some(&MENU_BLOCK_ID));
    assert_eq!(ids.iter().filter(|id| **id == HERO_BLOCK_ID).count(), 1);
    assert_eq!(ids.iter().filter(|id| **id == MENU_BLOCK_ID).count(), 1);
    assert!(doc.blocks.cta().iter().count() <= 1);
}

#[test]
fn test_anchors_survive_any_block_sequence() {
    let kinds = [
        BlockKind::Link,
        BlockKind::Cta,
        BlockKind::Website,
        BlockKind::Qr,
        BlockKind::Hero,
        BlockKind::Menu,
    ];

    for seed in 0..20 {
        let mut session = session();
        let mut picker = Picker(seed);

        for _ in 0..60 {
            let mut ids = session.document().blocks.dynamic_ids();
            ids.push(HERO_BLOCK_ID.to_string());
            ids.push(MENU_BLOCK_ID.to_string());
            let a = ids[picker.pick(ids.len())].clone();
            let b = ids[picker.pick(ids.len())].clone();

            let result = match picker.pick(6) {
                0 => session
                    .insert_dynamic(kinds[picker.pick(kinds.len())].clone())
                    .map(|b| b.is_some()),
                1 => session.remove_dynamic(&a),
                2 => session.set_cta_presence(picker.pick(2) == 0),
                3 => session.reorder_dynamic(&a, &b),
                4 => session.toggle_active(&a, picker.pick(2) == 0),
                _ => Ok(session.undo()),
            };

            // Anchor kinds are refused by the catalog; nothing else fails
            if let Err(e) = result {
                assert!(matches!(e, composer_editor::EditorError::Catalog(_)));
            }
            assert_anchors(session.document());
        }
    }
}

#[test]
fn test_ids_are_stable_across_non_removing_edits() {
    let mut session = session();
    let landing = session.insert_dynamic("landing").unwrap().unwrap();
    let link = session.insert_dynamic(BlockKind::Link).unwrap().unwrap();
    session.set_cta_presence(true).unwrap();
    for kind in [ElementKind::Section, ElementKind::Heading, ElementKind::Button] {
        session.add_element(&landing.id, kind).unwrap();
    }

    let before = session.document().all_ids();
    let element_ids = session.document().element_tree(&landing.id).unwrap().ids();
    let block_ids = session.document().blocks.dynamic_ids();

    let mut picker = Picker(7);
    for _ in 0..100 {
        let a = &block_ids[picker.pick(block_ids.len())];
        let b = &block_ids[picker.pick(block_ids.len())];
        let x = &element_ids[picker.pick(element_ids.len())];
        let y = &element_ids[picker.pick(element_ids.len())];

        let result = match picker.pick(5) {
            0 => session.reorder_dynamic(a, b).map(|_| ()),
            1 => session.toggle_active(a, picker.pick(2) == 0).map(|_| ()),
            2 => session.reorder_elements(&landing.id, x, y).map(|_| ()),
            3 => session
                .update_element_props(
                    &landing.id,
                    x,
                    json!({ "padding": picker.pick(40) })
                        .as_object()
                        .cloned()
                        .unwrap(),
                )
                .map(|_| ()),
            _ => session
                .add_element(&landing.id, ElementKind::Divider)
                .map(|_| ()),
        };
        result.unwrap();
    }

    let after = session.document().all_ids();
    for id in &before {
        assert!(after.contains(id), "{id} disappeared");
    }
    assert!(session.document().block(&link.id).is_some());
}

#[test]
fn test_container_delete_removes_descendants() {
    let mut session = session();
    let landing = session.insert_dynamic("landing").unwrap().unwrap();

    // Nested content arrives whole through a mutation
    let mut section = new_element(ElementKind::Section, "sec".to_string());
    let mut row = new_element(ElementKind::Row, "row".to_string());
    row.push_child(new_element(ElementKind::Button, "btn".to_string()))
        .unwrap();
    section.push_child(row).unwrap();
    section
        .push_child(new_element(ElementKind::Paragraph, "para".to_string()))
        .unwrap();
    session
        .apply(Mutation::AddElement {
            block_id: landing.id.clone(),
            element: section,
        })
        .unwrap();
    let heading = session
        .add_element(&landing.id, ElementKind::Heading)
        .unwrap()
        .unwrap();

    assert!(session.select_element(&landing.id, "btn"));
    assert!(session.delete_element(&landing.id, "sec").unwrap());

    let tree = session.document().element_tree(&landing.id).unwrap();
    for id in ["sec", "row", "btn", "para"] {
        assert!(tree::find_by_id(&tree.elements, id).is_none());
    }
    assert_eq!(tree.ids(), vec![heading.id]);
    assert!(session.selection().is_none());
}

#[test]
fn test_nested_reorder_stays_within_parent() {
    let mut session = session();
    let landing = session.insert_dynamic("landing").unwrap().unwrap();

    let mut column = new_element(ElementKind::Column, "col".to_string());
    for id in ["a", "b", "c"] {
        column
            .push_child(new_element(ElementKind::Paragraph, id.to_string()))
            .unwrap();
    }
    session
        .apply(Mutation::AddElement {
            block_id: landing.id.clone(),
            element: column,
        })
        .unwrap();
    session.add_element(&landing.id, ElementKind::Divider).unwrap();

    assert!(session.reorder_elements(&landing.id, "c", "a").unwrap());
    let tree = session.document().element_tree(&landing.id).unwrap();
    let children: Vec<&str> = tree.elements[0]
        .children()
        .unwrap()
        .iter()
        .map(|child| child.id.as_str())
        .collect();
    assert_eq!(children, vec!["c", "a", "b"]);

    // Cross-parent drag is ignored
    let divider = tree.elements[1].id.clone();
    let before = session.snapshot();
    assert!(!session.reorder_elements(&landing.id, "a", &divider).unwrap());
    assert_eq!(session.document(), &before);
}

#[test]
fn test_serialized_mutations_replay_to_same_document() {
    let mut session = session();
    let landing = session.insert_dynamic("landing").unwrap().unwrap();
    let heading = session
        .add_element(&landing.id, ElementKind::Heading)
        .unwrap()
        .unwrap();
    session.set_cta_presence(true).unwrap();

    let log = vec![
        Mutation::UpdateElementProps {
            block_id: landing.id.clone(),
            element_id: heading.id.clone(),
            props: json!({ "text": "Hello", "level": 1 })
                .as_object()
                .cloned()
                .unwrap(),
        },
        Mutation::SetTreeMetadata {
            block_id: landing.id.clone(),
            name: "Intro".to_string(),
            description: "First thing visitors see".to_string(),
        },
        Mutation::SetCtaPresence {
            enabled: false,
            block: None,
        },
        Mutation::SetBlockActive {
            block_id: landing.id.clone(),
            is_active: false,
        },
    ];

    let wire = serde_json::to_string(&log).unwrap();
    let replayed: Vec<Mutation> = serde_json::from_str(&wire).unwrap();
    assert_eq!(replayed, log);

    let mut copy = session.snapshot();
    for mutation in &log {
        session.apply(mutation.clone()).unwrap();
    }
    for mutation in &replayed {
        mutation.apply(&mut copy).unwrap();
    }
    assert_eq!(&copy, session.document());
    assert!(copy.blocks.cta().is_none());
}

#[test]
fn test_undo_all_returns_to_start() {
    let mut session = session();
    let start = session.snapshot();

    let landing = session.insert_dynamic("landing").unwrap().unwrap();
    session.add_element(&landing.id, ElementKind::Container).unwrap();
    session.set_cta_presence(true).unwrap();
    session.insert_dynamic(BlockKind::Link).unwrap();
    let ids = session.document().blocks.dynamic_ids();
    session.reorder_dynamic(&ids[2], &ids[0]).unwrap();

    while session.undo() {}
    assert_eq!(session.document(), &start);
    assert!(!session.is_dirty());

    while session.redo() {}
    assert_eq!(session.document().blocks.dynamic().len(), 3);
}
