//! Collaborator contracts consumed by the job manager.
//!
//! The manager only needs ownership metadata from the document store and
//! role resolution from the identity service; both are consumed through
//! these narrow traits so the server's file-backed stores (and test
//! doubles) plug in directly.

use docstack_core::{DocstackError, Role};
use uuid::Uuid;

/// The slice of a document the job manager cares about.
#[derive(Debug, Clone)]
pub struct DocumentRef {
    pub id: Uuid,
    /// The actor who created the document.
    pub owner: Uuid,
    pub title: String,
}

/// The slice of a user the job manager cares about.
#[derive(Debug, Clone)]
pub struct ActorRecord {
    pub id: Uuid,
    pub role: Role,
    pub is_active: bool,
}

/// Read access to document ownership metadata.
pub trait DocumentDirectory: Send + Sync {
    /// Fails with `DocumentNotFound` if the document does not exist.
    fn get(&self, id: Uuid) -> Result<DocumentRef, DocstackError>;
}

/// Resolution of an actor id to its role and account state.
pub trait IdentityDirectory: Send + Sync {
    /// Fails with `UserNotFound` if the user does not exist.
    fn resolve(&self, id: Uuid) -> Result<ActorRecord, DocstackError>;
}
