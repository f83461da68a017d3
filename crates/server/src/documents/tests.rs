//! Unit tests for the document store.

use docstack_core::DocstackError;
use docstack_jobs::DocumentDirectory;
use uuid::Uuid;

use super::store::DocumentStore;
use super::types::DocumentUpdate;

#[test]
fn test_create_writes_bytes_and_metadata() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let owner = Uuid::new_v4();

    let meta = store
        .create("Handbook", Some("onboarding".to_string()), "handbook.pdf", b"%PDF-1.4", owner)
        .unwrap();
    assert_eq!(meta.title, "Handbook");
    assert_eq!(meta.size_bytes, 8);
    assert!(meta.file_name.ends_with(".pdf"));

    let on_disk = std::fs::read(store.file_path(&meta)).unwrap();
    assert_eq!(on_disk, b"%PDF-1.4");
}

#[test]
fn test_get_missing() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let id = Uuid::new_v4();
    match store.get_meta(id) {
        Err(DocstackError::DocumentNotFound(missing)) => assert_eq!(missing, id),
        other => panic!("expected DocumentNotFound, got {:?}", other),
    }
}

#[test]
fn test_list_by_owner_filters() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store.create("a", None, "a.txt", b"a", alice).unwrap();
    store.create("b", None, "b.txt", b"b", bob).unwrap();
    store.create("c", None, "c.txt", b"c", alice).unwrap();

    assert_eq!(store.list_all().len(), 3);
    let alices = store.list_by_owner(alice);
    assert_eq!(alices.len(), 2);
    assert!(alices.iter().all(|d| d.created_by == alice));
    // Newest first.
    assert!(alices[0].created_at >= alices[1].created_at);
}

#[test]
fn test_update_metadata_only() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();

    let meta = store
        .create("draft", None, "draft.md", b"# notes", Uuid::new_v4())
        .unwrap();
    let updated = store
        .update(
            meta.id,
            &DocumentUpdate {
                title: Some("final".to_string()),
                description: Some("done".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.title, "final");
    assert_eq!(updated.description.as_deref(), Some("done"));
    assert_eq!(updated.file_name, meta.file_name);
}

#[test]
fn test_delete_removes_bytes() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();

    let meta = store
        .create("gone", None, "gone.txt", b"bye", Uuid::new_v4())
        .unwrap();
    let path = store.file_path(&meta);
    assert!(path.exists());

    store.delete(meta.id).unwrap();
    assert!(!path.exists());
    assert!(matches!(
        store.get_meta(meta.id),
        Err(DocstackError::DocumentNotFound(_))
    ));
}

#[test]
fn test_directory_contract_exposes_ownership() {
    let tmp = tempfile::tempdir().unwrap();
    let store = DocumentStore::new(tmp.path()).unwrap();
    let owner = Uuid::new_v4();

    let meta = store
        .create("Quarterly Report", None, "q3.pdf", b"pdf", owner)
        .unwrap();
    let doc_ref = DocumentDirectory::get(&store, meta.id).unwrap();
    assert_eq!(doc_ref.owner, owner);
    assert_eq!(doc_ref.title, "Quarterly Report");
}

#[test]
fn test_store_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let id = {
        let store = DocumentStore::new(tmp.path()).unwrap();
        store
            .create("kept", None, "kept.txt", b"kept", Uuid::new_v4())
            .unwrap()
            .id
    };

    let reopened = DocumentStore::new(tmp.path()).unwrap();
    assert_eq!(reopened.get_meta(id).unwrap().title, "kept");
}
