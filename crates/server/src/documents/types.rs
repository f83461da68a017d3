//! Document metadata types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use docstack_jobs::DocumentRef;

/// Document metadata row. Bytes live on disk under
/// `{data_dir}/documents/{file_name}`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DocumentMeta {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Stored file name (uuid + original extension).
    pub file_name: String,
    /// File name as uploaded, kept for downloads.
    pub original_name: String,
    pub size_bytes: u64,
    #[schema(value_type = String)]
    pub created_by: Uuid,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl DocumentMeta {
    /// The ownership slice consumed by the job manager.
    pub fn to_ref(&self) -> DocumentRef {
        DocumentRef {
            id: self.id,
            owner: self.created_by,
            title: self.title.clone(),
        }
    }
}

/// Metadata update payload (file content is immutable after upload).
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct DocumentUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}
