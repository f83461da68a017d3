//! Document storage: JSON-file-backed metadata plus uploaded bytes on
//! disk. Implements the document-ownership contract consumed by the
//! ingestion job manager.

mod store;
mod types;

#[cfg(test)]
mod tests;

pub use store::DocumentStore;
pub use types::{DocumentMeta, DocumentUpdate};
