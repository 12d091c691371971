//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, the concrete implementation of
//! the `RecipeStore` and `AuthSessionStore` ports from the `core` crate. It
//! handles all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recipe_catalog_core::domain::{AuthSession, Recipe};
use recipe_catalog_core::ports::{AuthSessionStore, PortError, PortResult, RecipeStore};
use sqlx::{FromRow, PgPool};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: impl std::fmt::Display) -> PortError {
    PortError::Unexpected(e.to_string())
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

/// A stored recipe. The full record lives in `payload` as JSON; `display_rank`
/// keeps the catalog order across restarts.
#[derive(FromRow)]
struct RecipeRecord {
    id: String,
    display_rank: i32,
    payload: String,
}
impl RecipeRecord {
    fn from_domain(rank: usize, recipe: &Recipe) -> PortResult<Self> {
        Ok(Self {
            id: recipe.id.clone(),
            display_rank: i32::try_from(rank).map_err(unexpected)?,
            payload: serde_json::to_string(&recipe.without_transient_flags()).map_err(unexpected)?,
        })
    }

    fn to_domain(self) -> PortResult<Recipe> {
        serde_json::from_str(&self.payload).map_err(|e| {
            PortError::Unexpected(format!(
                "Stored recipe {} (rank {}) is unreadable: {}",
                self.id, self.display_rank, e
            ))
        })
    }
}

#[derive(FromRow)]
struct AuthSessionRecord {
    id: String,
    username: String,
    expires_at: DateTime<Utc>,
}
impl AuthSessionRecord {
    fn to_domain(self) -> AuthSession {
        AuthSession {
            id: self.id,
            username: self.username,
            expires_at: self.expires_at,
        }
    }
}

//=========================================================================================
// `RecipeStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl RecipeStore for DbAdapter {
    async fn replace_all(&self, recipes: &[Recipe]) -> PortResult<()> {
        let records = recipes
            .iter()
            .enumerate()
            .map(|(rank, recipe)| RecipeRecord::from_domain(rank, recipe))
            .collect::<PortResult<Vec<_>>>()?;

        let mut tx = self.pool.begin().await.map_err(unexpected)?;
        sqlx::query("DELETE FROM recipes")
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        for record in records {
            sqlx::query("INSERT INTO recipes (id, display_rank, payload) VALUES ($1, $2, $3)")
                .bind(record.id)
                .bind(record.display_rank)
                .bind(record.payload)
                .execute(&mut *tx)
                .await
                .map_err(unexpected)?;
        }
        tx.commit().await.map_err(unexpected)?;
        Ok(())
    }

    async fn load_all(&self) -> PortResult<Vec<Recipe>> {
        let records = sqlx::query_as::<_, RecipeRecord>(
            "SELECT id, display_rank, payload FROM recipes ORDER BY display_rank ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        records.into_iter().map(RecipeRecord::to_domain).collect()
    }
}

//=========================================================================================
// `AuthSessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl AuthSessionStore for DbAdapter {
    async fn create_auth_session(
        &self,
        session_id: &str,
        username: &str,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, username, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(username)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<AuthSession> {
        let record = sqlx::query_as::<_, AuthSessionRecord>(
            "SELECT id, username, expires_at FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(record.to_domain())
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }
    async fn delete_expired_auth_sessions(&self) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(result.rows_affected())
    }
}
