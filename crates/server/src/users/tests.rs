//! Unit tests for the user registry.

use docstack_core::{DocstackError, Role};
use docstack_jobs::IdentityDirectory;

use super::store::UserStore;
use super::types::{UserInput, UserUpdate};

fn make_input(email: &str, role: Role) -> UserInput {
    UserInput {
        email: email.to_string(),
        name: "Test User".to_string(),
        role,
        is_active: true,
    }
}

#[test]
fn test_create_and_authenticate() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    let (user, api_key) = store.create(&make_input("alice@example.com", Role::Editor)).unwrap();
    assert!(api_key.starts_with("dsk_"));

    let actor = store.authenticate(&api_key).unwrap();
    assert_eq!(actor.id, user.id);
    assert_eq!(actor.role, Role::Editor);

    assert!(store.authenticate("dsk_wrong").is_none());
}

#[test]
fn test_duplicate_email_conflicts() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    store.create(&make_input("alice@example.com", Role::Viewer)).unwrap();
    let result = store.create(&make_input("ALICE@example.com", Role::Viewer));
    assert!(matches!(result, Err(DocstackError::Conflict(_))));
}

#[test]
fn test_list_excludes_inactive() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    let (alice, _) = store.create(&make_input("alice@example.com", Role::Viewer)).unwrap();
    store.create(&make_input("bob@example.com", Role::Viewer)).unwrap();

    store.deactivate(alice.id).unwrap();
    let list = store.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].email, "bob@example.com");
}

#[test]
fn test_deactivated_key_stops_authenticating() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    let (user, api_key) = store.create(&make_input("carol@example.com", Role::Editor)).unwrap();
    assert!(store.authenticate(&api_key).is_some());

    store.deactivate(user.id).unwrap();
    assert!(store.authenticate(&api_key).is_none());

    // Identity resolution still works for job-record lookups.
    let record = store.resolve(user.id).unwrap();
    assert!(!record.is_active);
}

#[test]
fn test_update_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    let (user, _) = store.create(&make_input("dave@example.com", Role::Viewer)).unwrap();
    let updated = store
        .update(
            user.id,
            &UserUpdate {
                name: Some("Dave".to_string()),
                role: Some(Role::Admin),
                ..UserUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.name, "Dave");
    assert_eq!(updated.role, Role::Admin);
    assert!(updated.updated_at >= user.updated_at);
}

#[test]
fn test_registry_persists_across_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let api_key = {
        let store = UserStore::new(tmp.path()).unwrap();
        let (_, key) = store.create(&make_input("erin@example.com", Role::Editor)).unwrap();
        key
    };

    let reopened = UserStore::new(tmp.path()).unwrap();
    assert!(reopened.authenticate(&api_key).is_some());
    assert_eq!(reopened.list().len(), 1);
}

#[test]
fn test_seed_admin_only_on_empty_registry() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    let generated = store.seed_admin(None).unwrap().unwrap();
    let actor = store.authenticate(&generated).unwrap();
    assert_eq!(actor.role, Role::Admin);

    // Second call is a no-op.
    assert!(store.seed_admin(None).unwrap().is_none());
    assert_eq!(store.list().len(), 1);
}

#[test]
fn test_seed_admin_with_configured_key() {
    let tmp = tempfile::tempdir().unwrap();
    let store = UserStore::new(tmp.path()).unwrap();

    // Configured keys are not echoed back.
    let result = store.seed_admin(Some("dsk_configured".to_string())).unwrap();
    assert!(result.is_none());
    assert!(store.authenticate("dsk_configured").is_some());
}
