//! An in-process `StorageBackend` fake, mirroring the source's
//! `database_mock.go`: used by the Alias Engine's own unit tests so they
//! don't need a real database wired up. `dyndns-server` never constructs
//! this — it always uses [`super::SeaOrmStorage`].

use crate::domain::error::EngineError;
use crate::domain::models::{Alias, User};
use crate::domain::storage::StorageBackend;
use async_trait::async_trait;
use std::sync::Mutex;
use time::OffsetDateTime;

#[derive(Default)]
struct State {
    users: Vec<User>,
    aliases: Vec<Alias>,
    next_user_id: i64,
    next_alias_id: i64,
}

pub struct InMemoryStorage {
    state: Mutex<State>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                users: Vec::new(),
                aliases: Vec::new(),
                next_user_id: 1,
                next_alias_id: 1,
            }),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, EngineError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.users.iter().any(|u| u.email == email) {
            return Err(EngineError::StorageFailure(format!(
                "email `{email}` already exists"
            )));
        }
        let now = OffsetDateTime::now_utc();
        let id = state.next_user_id;
        state.next_user_id += 1;
        let user = User {
            id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: now,
            updated_at: now,
        };
        state.users.push(user.clone());
        Ok(user)
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, EngineError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_aliases(&self, user_id: i64) -> Result<Vec<Alias>, EngineError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .aliases
            .iter()
            .filter(|a| a.owner_user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_alias(&self, host: &str, apex: &str) -> Result<Option<Alias>, EngineError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state
            .aliases
            .iter()
            .find(|a| a.host == host && a.apex == apex)
            .cloned())
    }

    async fn create_alias(
        &self,
        host: &str,
        apex: &str,
        value: &str,
        owner_user_id: i64,
    ) -> Result<Alias, EngineError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.aliases.iter().any(|a| a.host == host && a.apex == apex) {
            return Err(EngineError::StorageFailure(format!(
                "alias `{host}.{apex}` already exists"
            )));
        }
        let now = OffsetDateTime::now_utc();
        let id = state.next_alias_id;
        state.next_alias_id += 1;
        let alias = Alias {
            id,
            host: host.to_string(),
            apex: apex.to_string(),
            value: value.to_string(),
            owner_user_id,
            created_at: now,
            updated_at: now,
        };
        state.aliases.push(alias.clone());
        Ok(alias)
    }

    async fn update_alias(&self, host: &str, apex: &str, value: &str) -> Result<Alias, EngineError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let alias = state
            .aliases
            .iter_mut()
            .find(|a| a.host == host && a.apex == apex)
            .ok_or(EngineError::AliasNotFound)?;
        alias.value = value.to_string();
        alias.updated_at = OffsetDateTime::now_utc();
        Ok(alias.clone())
    }

    async fn delete_alias(
        &self,
        host: &str,
        apex: &str,
        owner_user_id: i64,
    ) -> Result<(), EngineError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let position = state
            .aliases
            .iter()
            .position(|a| a.host == host && a.apex == apex && a.owner_user_id == owner_user_id)
            .ok_or(EngineError::AliasNotFound)?;
        state.aliases.remove(position);
        Ok(())
    }
}
