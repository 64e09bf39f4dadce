//! User directory trait and in-memory implementation.
//!
//! Users are owned by an external collaborator; the core only needs to
//! check that a referenced user exists.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use common::UserId;
use tokio::sync::RwLock;

use crate::Result;

/// Lookup into the externally owned users collection.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns true if the user exists.
    async fn exists(&self, id: UserId) -> Result<bool>;
}

/// In-memory user directory.
#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users: Arc<RwLock<HashSet<UserId>>>,
}

impl InMemoryUsers {
    /// Creates a new empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    pub async fn add(&self, id: UserId) {
        self.users.write().await.insert(id);
    }
}

#[async_trait]
impl UserDirectory for InMemoryUsers {
    async fn exists(&self, id: UserId) -> Result<bool> {
        Ok(self.users.read().await.contains(&id))
    }
}
