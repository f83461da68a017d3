//! [`DocumentStore`] — JSON-file-backed document metadata plus raw bytes
//! on disk.
//!
//! Metadata lives in `{data_dir}/documents.json`, uploaded bytes under
//! `{data_dir}/documents/`. The store itself does no authorization; the
//! API layer applies the admin-or-owner rule before calling in.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use indexmap::IndexMap;
use uuid::Uuid;

use docstack_core::DocstackError;
use docstack_jobs::{DocumentDirectory, DocumentRef};

use super::types::{DocumentMeta, DocumentUpdate};

const STORE_FILE: &str = "documents.json";
const FILES_DIR: &str = "documents";

/// Thread-safe file-backed document store.
pub struct DocumentStore {
    path: PathBuf,
    files_dir: PathBuf,
    docs: RwLock<IndexMap<Uuid, DocumentMeta>>,
}

impl DocumentStore {
    /// Open (or initialize) the store under `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self, DocstackError> {
        let files_dir = data_dir.join(FILES_DIR);
        std::fs::create_dir_all(&files_dir)?;

        let path = data_dir.join(STORE_FILE);
        let docs = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let list: Vec<DocumentMeta> = serde_json::from_str(&raw)
                .map_err(|e| DocstackError::Serialize(e.to_string()))?;
            list.into_iter().map(|d| (d.id, d)).collect()
        } else {
            IndexMap::new()
        };

        Ok(Self {
            path,
            files_dir,
            docs: RwLock::new(docs),
        })
    }

    fn save(&self, docs: &IndexMap<Uuid, DocumentMeta>) -> Result<(), DocstackError> {
        let list: Vec<&DocumentMeta> = docs.values().collect();
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| DocstackError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Store uploaded bytes and record the metadata.
    pub fn create(
        &self,
        title: &str,
        description: Option<String>,
        original_name: &str,
        bytes: &[u8],
        created_by: Uuid,
    ) -> Result<DocumentMeta, DocstackError> {
        let id = Uuid::new_v4();
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        let file_name = format!("{}{}", id, extension);
        std::fs::write(self.files_dir.join(&file_name), bytes)?;

        let now = Utc::now();
        let meta = DocumentMeta {
            id,
            title: title.to_string(),
            description,
            file_name,
            original_name: original_name.to_string(),
            size_bytes: bytes.len() as u64,
            created_by,
            created_at: now,
            updated_at: now,
        };

        let mut docs = self.docs.write().expect("document store lock poisoned");
        docs.insert(id, meta.clone());
        self.save(&docs)?;
        Ok(meta)
    }

    /// All documents, newest first.
    pub fn list_all(&self) -> Vec<DocumentMeta> {
        let docs = self.docs.read().expect("document store lock poisoned");
        let mut list: Vec<DocumentMeta> = docs.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    /// Documents created by `owner`, newest first.
    pub fn list_by_owner(&self, owner: Uuid) -> Vec<DocumentMeta> {
        let docs = self.docs.read().expect("document store lock poisoned");
        let mut list: Vec<DocumentMeta> = docs
            .values()
            .filter(|d| d.created_by == owner)
            .cloned()
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub fn get_meta(&self, id: Uuid) -> Result<DocumentMeta, DocstackError> {
        let docs = self.docs.read().expect("document store lock poisoned");
        docs.get(&id)
            .cloned()
            .ok_or(DocstackError::DocumentNotFound(id))
    }

    pub fn update(&self, id: Uuid, update: &DocumentUpdate) -> Result<DocumentMeta, DocstackError> {
        let mut docs = self.docs.write().expect("document store lock poisoned");
        let doc = docs.get_mut(&id).ok_or(DocstackError::DocumentNotFound(id))?;
        if let Some(ref title) = update.title {
            doc.title = title.clone();
        }
        if let Some(ref description) = update.description {
            doc.description = Some(description.clone());
        }
        doc.updated_at = Utc::now();
        let meta = doc.clone();
        self.save(&docs)?;
        Ok(meta)
    }

    /// Delete metadata and bytes. A missing file on disk is tolerated;
    /// the metadata row still goes away.
    pub fn delete(&self, id: Uuid) -> Result<DocumentMeta, DocstackError> {
        let mut docs = self.docs.write().expect("document store lock poisoned");
        let meta = docs
            .shift_remove(&id)
            .ok_or(DocstackError::DocumentNotFound(id))?;
        self.save(&docs)?;

        let file = self.files_dir.join(&meta.file_name);
        if let Err(e) = std::fs::remove_file(&file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    document_id = %id,
                    error = %e,
                    "failed to remove document file"
                );
            }
        }
        Ok(meta)
    }

    /// Absolute path of the stored bytes for a document.
    pub fn file_path(&self, meta: &DocumentMeta) -> PathBuf {
        self.files_dir.join(&meta.file_name)
    }
}

impl DocumentDirectory for DocumentStore {
    fn get(&self, id: Uuid) -> Result<DocumentRef, DocstackError> {
        self.get_meta(id).map(|meta| meta.to_ref())
    }
}
