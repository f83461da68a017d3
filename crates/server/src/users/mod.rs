//! User registry: JSON-file-backed accounts with role-based access and
//! digest-only API key storage. Implements the identity contract consumed
//! by the ingestion job manager.

mod store;
mod types;

#[cfg(test)]
mod tests;

pub use store::UserStore;
pub use types::{CreatedUser, UserInput, UserSafe, UserUpdate};
