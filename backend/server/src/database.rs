//! # Users
//!
//! Document store for user records, keyed by email.
//!
//! ## Layout
//!
//! - Redis hash `users`: email -> JSON encoded [`UserRecord`]
//! - One field per user, O(1) lookups
//!
//! ## Uniqueness
//!
//! Signup checks for an existing email before inserting. The insert itself is
//! `HSETNX`, so two concurrent signups for the same email cannot both land: the
//! loser sees `false` and is answered like any other duplicate.
//!
//! ## Memory Store
//!
//! Used when no `DB_URL` is configured and by the tests. Same semantics, lives
//! and dies with the process.
use std::{collections::HashMap, sync::Arc, time::Duration};

use models::UserRecord;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use tokio::sync::RwLock;

use crate::error::AppError;

pub const USERS_KEY: &str = "users";

#[derive(Clone)]
pub enum Store {
    Redis(ConnectionManager),
    Memory(Arc<RwLock<HashMap<String, UserRecord>>>),
}

pub async fn init_redis(redis_url: &str) -> Result<ConnectionManager, AppError> {
    let config = ConnectionManagerConfig::new()
        .set_number_of_retries(1)
        .set_connection_timeout(Duration::from_millis(500));

    let client = Client::open(redis_url)?;
    let connection_manager = client.get_connection_manager_with_config(config).await?;

    Ok(connection_manager)
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(Arc::default())
    }

    pub async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let raw: Option<String> = connection.hget(USERS_KEY, email).await?;

                let user = raw
                    .map(|raw| serde_json::from_str::<UserRecord>(&raw))
                    .transpose()?;

                Ok(user)
            }
            Store::Memory(users) => Ok(users.read().await.get(email).cloned()),
        }
    }

    /// Inserts `record` unless its email is already taken. Returns whether it was inserted.
    pub async fn insert_user(&self, record: &UserRecord) -> Result<bool, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();
                let raw = serde_json::to_string(record)?;

                let inserted: bool = connection.hset_nx(USERS_KEY, &record.email, raw).await?;

                Ok(inserted)
            }
            Store::Memory(users) => {
                let mut users = users.write().await;
                if users.contains_key(&record.email) {
                    return Ok(false);
                }

                users.insert(record.email.clone(), record.clone());
                Ok(true)
            }
        }
    }

    pub async fn count_users(&self) -> Result<usize, AppError> {
        match self {
            Store::Redis(connection) => {
                let mut connection = connection.clone();

                let count: usize = connection.hlen(USERS_KEY).await?;

                Ok(count)
            }
            Store::Memory(users) => Ok(users.read().await.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use models::UserRecord;

    use super::Store;

    fn alice() -> UserRecord {
        UserRecord {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "password1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = Store::memory();

        assert!(store.insert_user(&alice()).await.unwrap());
        assert_eq!(store.find_user("a@x.com").await.unwrap(), Some(alice()));
        assert_eq!(store.find_user("nobody@x.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = Store::memory();
        let impostor = UserRecord {
            name: "Mallory".to_string(),
            ..alice()
        };

        assert!(store.insert_user(&alice()).await.unwrap());
        assert!(!store.insert_user(&impostor).await.unwrap());
        assert_eq!(store.count_users().await.unwrap(), 1);
        assert_eq!(store.find_user("a@x.com").await.unwrap(), Some(alice()));
    }

    #[tokio::test]
    async fn test_concurrent_inserts_keep_one() {
        let store = Store::memory();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.insert_user(&alice()).await.unwrap() })
            })
            .collect();

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                inserted += 1;
            }
        }

        assert_eq!(inserted, 1);
        assert_eq!(store.count_users().await.unwrap(), 1);
    }
}
