//! sea-orm-backed `StorageBackend` (C1), generalized from the teacher's
//! `OrmUsersRepository` (`examples/modkit/users_info`) down to this crate's
//! two plain tables — no multi-tenant scoping, no OData pagination, since
//! `spec.md` names neither.

use super::entity::alias::{
    ActiveModel as AliasActiveModel, Column as AliasColumn, Entity as AliasEntity,
    Model as AliasModel,
};
use super::entity::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as UserEntity, Model as UserModel,
};
use crate::domain::error::EngineError;
use crate::domain::models::{Alias, User};
use crate::domain::storage::StorageBackend;
use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use time::OffsetDateTime;

/// Wraps a live sea-orm connection (opened and migrated via
/// `dyndns_db::DbManager`) to implement the engine's Storage Port.
pub struct SeaOrmStorage {
    conn: DatabaseConnection,
}

impl SeaOrmStorage {
    #[must_use]
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }
}

fn db_err(err: sea_orm::DbErr) -> EngineError {
    EngineError::StorageFailure(err.to_string())
}

impl From<UserModel> for User {
    fn from(m: UserModel) -> Self {
        User {
            id: m.id,
            email: m.email,
            password_hash: m.password_hash,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<AliasModel> for Alias {
    fn from(m: AliasModel) -> Self {
        Alias {
            id: m.id,
            host: m.host,
            apex: m.apex,
            value: m.value,
            owner_user_id: m.owner_user_id,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[async_trait]
impl StorageBackend for SeaOrmStorage {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, EngineError> {
        let existing = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(EngineError::StorageFailure(format!(
                "email `{email}` already exists"
            )));
        }

        let now = OffsetDateTime::now_utc();
        let model = UserActiveModel {
            email: Set(email.to_string()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&self.conn).await.map_err(db_err)?;
        Ok(inserted.into())
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, EngineError> {
        let found = UserEntity::find()
            .filter(UserColumn::Email.eq(email))
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_user_aliases(&self, user_id: i64) -> Result<Vec<Alias>, EngineError> {
        let found = AliasEntity::find()
            .filter(AliasColumn::OwnerUserId.eq(user_id))
            .all(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(found.into_iter().map(Into::into).collect())
    }

    async fn find_alias(&self, host: &str, apex: &str) -> Result<Option<Alias>, EngineError> {
        let found = AliasEntity::find()
            .filter(AliasColumn::Host.eq(host))
            .filter(AliasColumn::Apex.eq(apex))
            .one(&self.conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn create_alias(
        &self,
        host: &str,
        apex: &str,
        value: &str,
        owner_user_id: i64,
    ) -> Result<Alias, EngineError> {
        let now = OffsetDateTime::now_utc();
        let model = AliasActiveModel {
            host: Set(host.to_string()),
            apex: Set(apex.to_string()),
            value: Set(value.to_string()),
            owner_user_id: Set(owner_user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        let inserted = model.insert(&self.conn).await.map_err(db_err)?;
        Ok(inserted.into())
    }

    async fn update_alias(&self, host: &str, apex: &str, value: &str) -> Result<Alias, EngineError> {
        let found = AliasEntity::find()
            .filter(AliasColumn::Host.eq(host))
            .filter(AliasColumn::Apex.eq(apex))
            .one(&self.conn)
            .await
            .map_err(db_err)?
            .ok_or(EngineError::AliasNotFound)?;

        let mut active: AliasActiveModel = found.into();
        active.value = Set(value.to_string());
        active.updated_at = Set(OffsetDateTime::now_utc());
        let updated = active.update(&self.conn).await.map_err(db_err)?;
        Ok(updated.into())
    }

    async fn delete_alias(
        &self,
        host: &str,
        apex: &str,
        owner_user_id: i64,
    ) -> Result<(), EngineError> {
        let result = AliasEntity::delete_many()
            .filter(AliasColumn::Host.eq(host))
            .filter(AliasColumn::Apex.eq(apex))
            .filter(AliasColumn::OwnerUserId.eq(owner_user_id))
            .exec(&self.conn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(EngineError::AliasNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::infra::storage::migrations::Migrator;
    use dyndns_db::DbManager;
    use sea_orm_migration::MigratorTrait;

    async fn fresh_storage() -> SeaOrmStorage {
        let mgr = DbManager::connect("sqlite", ":memory:").await.unwrap();
        Migrator::up(mgr.connection(), None).await.unwrap();
        SeaOrmStorage::new(mgr.connection().clone())
    }

    #[tokio::test]
    async fn create_user_rejects_duplicate_email() {
        let storage = fresh_storage().await;
        storage.create_user("alice@example.org", "h1").await.unwrap();
        let err = storage
            .create_user("alice@example.org", "h2")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::StorageFailure(_)));
    }

    #[tokio::test]
    async fn delete_alias_rejects_wrong_owner() {
        let storage = fresh_storage().await;
        let alice = storage.create_user("alice@example.org", "h").await.unwrap();
        storage
            .create_alias("foo", "bar.baz", "127.0.0.1", alice.id)
            .await
            .unwrap();

        let err = storage.delete_alias("foo", "bar.baz", 9999).await.unwrap_err();
        assert!(matches!(err, EngineError::AliasNotFound));

        let alias = storage.find_alias("foo", "bar.baz").await.unwrap();
        assert!(alias.is_some());
    }

    #[tokio::test]
    async fn deleting_a_user_cascades_to_their_aliases() {
        let storage = fresh_storage().await;
        let alice = storage.create_user("alice@example.org", "h").await.unwrap();
        storage
            .create_alias("foo", "bar.baz", "127.0.0.1", alice.id)
            .await
            .unwrap();

        UserEntity::delete_by_id(alice.id)
            .exec(&storage.conn)
            .await
            .unwrap();

        let alias = storage.find_alias("foo", "bar.baz").await.unwrap();
        assert!(alias.is_none());
    }
}
