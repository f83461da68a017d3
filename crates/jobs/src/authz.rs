//! The single authorization predicate: admin-or-owner.
//!
//! Every read/mutate/cancel path goes through these two functions instead
//! of re-deriving role checks per operation.

use docstack_core::Actor;

use crate::directory::DocumentRef;
use crate::job::IngestionJob;

/// May `actor` view or act on `job`? Admins always; otherwise only the
/// actor who started it.
pub fn can_access_job(actor: &Actor, job: &IngestionJob) -> bool {
    actor.is_admin() || actor.id == job.started_by
}

/// May `actor` view or act on `document`? Admins always; otherwise only
/// the document owner.
pub fn can_access_document(actor: &Actor, document: &DocumentRef) -> bool {
    actor.is_admin() || actor.id == document.owner
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docstack_core::Role;
    use uuid::Uuid;

    fn make_job(started_by: Uuid) -> IngestionJob {
        IngestionJob {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            started_by,
            status: crate::job::JobStatus::Pending,
            started_at: Utc::now(),
            completed_at: None,
            output: None,
        }
    }

    #[test]
    fn test_admin_sees_everything() {
        let admin = Actor::new(Uuid::new_v4(), Role::Admin);
        let job = make_job(Uuid::new_v4());
        let doc = DocumentRef {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            title: "report".to_string(),
        };
        assert!(can_access_job(&admin, &job));
        assert!(can_access_document(&admin, &doc));
    }

    #[test]
    fn test_owner_sees_own_only() {
        let user_id = Uuid::new_v4();
        let user = Actor::new(user_id, Role::Editor);

        assert!(can_access_job(&user, &make_job(user_id)));
        assert!(!can_access_job(&user, &make_job(Uuid::new_v4())));

        let own_doc = DocumentRef {
            id: Uuid::new_v4(),
            owner: user_id,
            title: "mine".to_string(),
        };
        let other_doc = DocumentRef {
            id: Uuid::new_v4(),
            owner: Uuid::new_v4(),
            title: "theirs".to_string(),
        };
        assert!(can_access_document(&user, &own_doc));
        assert!(!can_access_document(&user, &other_doc));
    }

    #[test]
    fn test_viewer_and_editor_are_equally_unprivileged() {
        let job = make_job(Uuid::new_v4());
        for role in [Role::Editor, Role::Viewer] {
            let actor = Actor::new(Uuid::new_v4(), role);
            assert!(!can_access_job(&actor, &job));
        }
    }
}
