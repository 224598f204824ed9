//! # Composer Model
//!
//! Document model of the profile page composer.
//!
//! ```text
//! Document
//!  └─ BlockList: hero │ dynamic blocks (reorderable) │ menu
//!                          └─ Block.elements: ElementTree (custom kinds only)
//!                                 └─ Element ─ children ─ Element ...
//! ```
//!
//! Blocks come from the [`BlockCatalog`], elements from [`factory::new_element`].
//! All structural edits go through [`tree`] (find / remove / replace props)
//! and [`reorder`] (drag moves). [`schema`] decides whether a document may be
//! persisted.
//!
//! Nothing in this crate performs I/O.

pub mod block;
pub mod block_list;
pub mod catalog;
pub mod document;
pub mod element;
mod element_tree;
pub mod error;
pub mod factory;
pub mod ids;
pub mod reorder;
pub mod schema;
pub mod tree;

pub use block::{Block, BlockKind, Content};
pub use block_list::{BlockList, CtaChange};
pub use catalog::{BlockCatalog, CatalogEntry};
pub use document::Document;
pub use element::{Element, ElementKind, ElementTree, Props};
pub use error::{BlockListShapeError, CatalogError, InvariantViolation, ValidationError, ValidationIssue};
pub use ids::{IdGenerator, RandomIds, SequentialIds, HERO_BLOCK_ID, MENU_BLOCK_ID};
pub use reorder::{DragController, DragGesture};
pub use schema::{validate_document, validate_tree};
