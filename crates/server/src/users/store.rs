//! [`UserStore`] — JSON-file-backed user registry with digest-only API
//! key storage.
//!
//! Records live in `{data_dir}/users.json`; the in-memory map is the
//! source of truth and is persisted on every mutation. API keys are
//! generated server-side, handed out once, and stored as SHA-256 hex
//! digests.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use indexmap::IndexMap;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use docstack_core::{Actor, DocstackError, Role};
use docstack_jobs::{ActorRecord, IdentityDirectory};

use super::types::{User, UserInput, UserSafe, UserUpdate};

const STORE_FILE: &str = "users.json";
const KEY_PREFIX: &str = "dsk_";

/// Generate a fresh API key: prefix + 32 random bytes, hex-encoded.
fn generate_api_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    format!("{}{}", KEY_PREFIX, hex::encode(bytes))
}

/// SHA-256 digest of an API key, hex-encoded.
fn hash_api_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

/// Thread-safe file-backed user registry.
pub struct UserStore {
    path: PathBuf,
    users: RwLock<IndexMap<Uuid, User>>,
}

impl UserStore {
    /// Open (or initialize) the registry under `data_dir`.
    pub fn new(data_dir: &Path) -> Result<Self, DocstackError> {
        let path = data_dir.join(STORE_FILE);
        let users = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let list: Vec<User> = serde_json::from_str(&raw)
                .map_err(|e| DocstackError::Serialize(e.to_string()))?;
            list.into_iter().map(|u| (u.id, u)).collect()
        } else {
            IndexMap::new()
        };
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    /// Persist the current state. Writes to a temp file, then renames.
    fn save(&self, users: &IndexMap<Uuid, User>) -> Result<(), DocstackError> {
        let list: Vec<&User> = users.values().collect();
        let json = serde_json::to_string_pretty(&list)
            .map_err(|e| DocstackError::Serialize(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Create a user and return it with its one-time plaintext API key.
    pub fn create(&self, input: &UserInput) -> Result<(UserSafe, String), DocstackError> {
        let mut users = self.users.write().expect("user store lock poisoned");
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&input.email))
        {
            return Err(DocstackError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let api_key = generate_api_key();
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: input.email.clone(),
            name: input.name.clone(),
            role: input.role,
            is_active: input.is_active,
            api_key_hash: hash_api_key(&api_key),
            created_at: now,
            updated_at: now,
        };
        let safe = UserSafe::from(&user);
        users.insert(user.id, user);
        self.save(&users)?;
        Ok((safe, api_key))
    }

    /// Active users, newest first.
    pub fn list(&self) -> Vec<UserSafe> {
        let users = self.users.read().expect("user store lock poisoned");
        let mut list: Vec<UserSafe> = users
            .values()
            .filter(|u| u.is_active)
            .map(UserSafe::from)
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        list
    }

    pub fn get(&self, id: Uuid) -> Result<UserSafe, DocstackError> {
        let users = self.users.read().expect("user store lock poisoned");
        users
            .get(&id)
            .map(UserSafe::from)
            .ok_or(DocstackError::UserNotFound(id))
    }

    pub fn update(&self, id: Uuid, update: &UserUpdate) -> Result<UserSafe, DocstackError> {
        let mut users = self.users.write().expect("user store lock poisoned");

        if let Some(ref email) = update.email {
            if users
                .values()
                .any(|u| u.id != id && u.email.eq_ignore_ascii_case(email))
            {
                return Err(DocstackError::Conflict(
                    "User with this email already exists".to_string(),
                ));
            }
        }

        let user = users.get_mut(&id).ok_or(DocstackError::UserNotFound(id))?;
        if let Some(ref email) = update.email {
            user.email = email.clone();
        }
        if let Some(ref name) = update.name {
            user.name = name.clone();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();
        let safe = UserSafe::from(&*user);

        self.save(&users)?;
        Ok(safe)
    }

    /// Soft delete: the account is deactivated, its key stops working,
    /// but job records keep a resolvable starter id.
    pub fn deactivate(&self, id: Uuid) -> Result<UserSafe, DocstackError> {
        self.update(
            id,
            &UserUpdate {
                is_active: Some(false),
                ..UserUpdate::default()
            },
        )
    }

    /// Resolve a plaintext API key to an actor. Inactive accounts never
    /// authenticate.
    pub fn authenticate(&self, api_key: &str) -> Option<Actor> {
        let digest = hash_api_key(api_key);
        let users = self.users.read().expect("user store lock poisoned");
        users
            .values()
            .find(|u| u.is_active && u.api_key_hash == digest)
            .map(|u| Actor::new(u.id, u.role))
    }

    /// Seed an admin account when the registry is empty. Returns the
    /// plaintext key when one was generated (for a one-time startup log);
    /// returns `None` when the registry already has users or the key came
    /// from configuration.
    pub fn seed_admin(
        &self,
        bootstrap_key: Option<String>,
    ) -> Result<Option<String>, DocstackError> {
        {
            let users = self.users.read().expect("user store lock poisoned");
            if !users.is_empty() {
                return Ok(None);
            }
        }

        let (from_config, api_key) = match bootstrap_key {
            Some(key) => (true, key),
            None => (false, generate_api_key()),
        };

        let now = Utc::now();
        let admin = User {
            id: Uuid::new_v4(),
            email: "admin@docstack.local".to_string(),
            name: "Administrator".to_string(),
            role: Role::Admin,
            is_active: true,
            api_key_hash: hash_api_key(&api_key),
            created_at: now,
            updated_at: now,
        };

        let mut users = self.users.write().expect("user store lock poisoned");
        users.insert(admin.id, admin);
        self.save(&users)?;

        Ok(if from_config { None } else { Some(api_key) })
    }
}

impl IdentityDirectory for UserStore {
    fn resolve(&self, id: Uuid) -> Result<ActorRecord, DocstackError> {
        let users = self.users.read().expect("user store lock poisoned");
        users
            .get(&id)
            .map(|u| ActorRecord {
                id: u.id,
                role: u.role,
                is_active: u.is_active,
            })
            .ok_or(DocstackError::UserNotFound(id))
    }
}
