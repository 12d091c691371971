//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the storage ports, used when no database
//! is configured and by the integration tests. Contents are lost on restart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_catalog_core::domain::{AuthSession, Recipe};
use recipe_catalog_core::ports::{AuthSessionStore, PortError, PortResult, RecipeStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    recipes: RwLock<Vec<Recipe>>,
    sessions: RwLock<HashMap<String, AuthSession>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecipeStore for MemoryStore {
    async fn replace_all(&self, recipes: &[Recipe]) -> PortResult<()> {
        let stored = recipes
            .iter()
            .map(Recipe::without_transient_flags)
            .collect();
        *self.recipes.write().await = stored;
        Ok(())
    }

    async fn load_all(&self) -> PortResult<Vec<Recipe>> {
        Ok(self.recipes.read().await.clone())
    }
}

#[async_trait]
impl AuthSessionStore for MemoryStore {
    async fn create_auth_session(
        &self,
        session_id: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let session = AuthSession {
            id: session_id.to_string(),
            username: username.to_string(),
            expires_at,
        };
        self.sessions
            .write()
            .await
            .insert(session_id.to_string(), session);
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<AuthSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get(session_id)
            .cloned()
            .ok_or(PortError::Unauthorized)?;
        if session.is_expired_at(Utc::now()) {
            sessions.remove(session_id);
            return Err(PortError::Unauthorized);
        }
        Ok(session)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
    async fn delete_expired_auth_sessions(&self) -> PortResult<u64> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
