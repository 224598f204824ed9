//! Persistence gateway behaviour against real and failing stores

use async_trait::async_trait;
use composer_model::{
    factory::new_element, BlockCatalog, BlockKind, CatalogEntry, Document, ElementKind,
    ElementTree,
};
use composer_store::{
    DocumentStore, FileStore, MemoryStore, PersistenceGateway, SaveError, StorageError,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn catalog() -> Arc<BlockCatalog> {
    Arc::new(BlockCatalog::with_custom([CatalogEntry::new(
        BlockKind::from("landing"),
        "Landing",
        "Free layout",
    )
    .with_elements()]))
}

fn document_with_link(catalog: &BlockCatalog) -> Document {
    let mut doc = Document::empty(catalog);
    doc.blocks
        .insert_dynamic(catalog.materialize(&BlockKind::Link, "b-1".to_string()).unwrap())
        .unwrap();
    doc
}

/// Memory store whose writes can be switched off
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn read(&self, key: &str) -> Result<Option<Document>, StorageError> {
        self.inner.read(key).await
    }

    async fn write(&self, key: &str, document: &Document) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("connection reset".to_string()));
        }
        self.inner.write(key, document).await
    }
}

#[tokio::test]
async fn test_load_without_commit_returns_anchors_only() {
    let gateway = PersistenceGateway::new(MemoryStore::new(), catalog());

    let doc = gateway.load("fresh").await.unwrap();

    assert_eq!(doc, Document::empty(gateway.catalog()));
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let gateway = PersistenceGateway::new(MemoryStore::new(), catalog());
    let doc = document_with_link(gateway.catalog());

    let receipt = gateway.save("p-1", &doc).await.unwrap();

    assert_eq!(receipt.key, "p-1");
    assert_eq!(gateway.load("p-1").await.unwrap(), doc);
}

#[tokio::test]
async fn test_validation_failure_writes_nothing() {
    let gateway = PersistenceGateway::new(MemoryStore::new(), catalog());
    let before = document_with_link(gateway.catalog());
    gateway.save("p-1", &before).await.unwrap();

    let mut invalid = before.clone();
    let landing = gateway
        .catalog()
        .materialize(&BlockKind::from("landing"), "b-2".to_string())
        .unwrap();
    invalid.blocks.insert_dynamic(landing).unwrap();
    let mut element = new_element(ElementKind::Heading, "e-1".to_string());
    element.kind = ElementKind::Unknown("marquee".to_string());
    invalid.element_tree_mut("b-2").unwrap().elements.push(element);

    let err = gateway.save("p-1", &invalid).await.unwrap_err();

    assert!(err.is_validation());
    assert!(err.to_string().contains("unknown element type `marquee`"));
    assert_eq!(gateway.load("p-1").await.unwrap(), before);
}

#[tokio::test]
async fn test_storage_failure_keeps_previous_commit() {
    let store = Arc::new(FlakyStore::default());
    let gateway = PersistenceGateway::new(Arc::clone(&store), catalog());
    let first = Document::empty(gateway.catalog());
    gateway.save("p-1", &first).await.unwrap();

    store.failing.store(true, Ordering::SeqCst);
    let second = document_with_link(gateway.catalog());
    let err = gateway.save("p-1", &second).await.unwrap_err();

    assert!(matches!(err, SaveError::Storage(StorageError::Unavailable(_))));
    assert_eq!(gateway.load("p-1").await.unwrap(), first);

    // Retry succeeds once the store recovers
    store.failing.store(false, Ordering::SeqCst);
    gateway.save("p-1", &second).await.unwrap();
    assert_eq!(gateway.load("p-1").await.unwrap(), second);
}

#[tokio::test]
async fn test_save_tree_splices_into_committed_document() {
    let gateway = PersistenceGateway::new(MemoryStore::new(), catalog());
    let mut doc = document_with_link(gateway.catalog());
    let landing = gateway
        .catalog()
        .materialize(&BlockKind::from("landing"), "b-2".to_string())
        .unwrap();
    doc.blocks.insert_dynamic(landing).unwrap();
    gateway.save("p-1", &doc).await.unwrap();

    let mut tree = ElementTree::new("Summer landing", "Seasonal layout");
    tree.add_element(new_element(ElementKind::Section, "e-1".to_string()))
        .unwrap();
    gateway.save_tree("p-1", "b-2", &tree).await.unwrap();

    let loaded = gateway.load("p-1").await.unwrap();
    assert_eq!(loaded.element_tree("b-2"), Some(&tree));
    assert_eq!(loaded.blocks.dynamic_ids(), vec!["b-1", "b-2"]);
}

#[tokio::test]
async fn test_save_tree_rejects_missing_or_unsupported_block() {
    let gateway = PersistenceGateway::new(MemoryStore::new(), catalog());
    let doc = document_with_link(gateway.catalog());
    gateway.save("p-1", &doc).await.unwrap();
    let tree = ElementTree::new("Tree", "");

    let missing = gateway.save_tree("p-1", "ghost", &tree).await.unwrap_err();
    assert!(matches!(missing, SaveError::BlockNotCommitted(ref id) if id == "ghost"));
    assert!(!missing.is_validation());

    let unsupported = gateway.save_tree("p-1", "b-1", &tree).await.unwrap_err();
    assert!(unsupported.is_validation());
    assert_eq!(gateway.load("p-1").await.unwrap(), doc);
}

#[tokio::test]
async fn test_file_store_through_gateway() {
    let dir = tempfile::tempdir().unwrap();
    let gateway = PersistenceGateway::new(FileStore::new(dir.path()), catalog());
    let doc = document_with_link(gateway.catalog());

    gateway.save("p-1", &doc).await.unwrap();

    let reopened = PersistenceGateway::new(FileStore::new(dir.path()), catalog());
    assert_eq!(reopened.load("p-1").await.unwrap(), doc);
}
