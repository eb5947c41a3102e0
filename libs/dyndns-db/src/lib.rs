//! Database connection management: the ambient half of the Storage Port
//! (C1). This crate owns *opening* a connection and *running migrations*
//! against it; the schema and the CRUD operations themselves are owned by
//! `dyndns-core::infra::storage`, which depends on this crate only for
//! [`DbManager`].
//!
//! Generalized from the teacher's `modkit-db::DbManager` /
//! `migration_runner.rs`, with the per-module multi-tenant database
//! resolution stripped out: this daemon owns exactly one database
//! (`spec.md` §6 "database.driver, database.dsn"), so there is nothing to
//! resolve a module name against.

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use thiserror::Error;

/// The storage connection's lifetime spans the daemon process
/// (`spec.md` §5 "Scoped resources"): callers open one at startup and hold
/// it until shutdown.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("no database driver named `{0}` found")]
    UnknownDriver(String),

    #[error("database connection failed: {0}")]
    Connect(#[source] sea_orm::DbErr),

    #[error("database migration failed: {0}")]
    Migrate(#[source] sea_orm::DbErr),
}

/// Owns the single live connection pool for the daemon.
#[derive(Clone)]
pub struct DbManager {
    conn: DatabaseConnection,
}

impl DbManager {
    /// Open a connection using an operator-selected `driver` and `dsn`
    /// (`spec.md` §6). At minimum, `"sqlite"` is supported, satisfying the
    /// "embedded single-file store" requirement.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UnknownDriver`] for an unrecognized driver name,
    /// or [`DbError::Connect`] if the connection attempt fails.
    pub async fn connect(driver: &str, dsn: &str) -> Result<Self, DbError> {
        let url = match driver {
            "sqlite" => {
                if dsn == ":memory:" {
                    "sqlite::memory:".to_string()
                } else {
                    format!("sqlite://{dsn}?mode=rwc")
                }
            }
            other => return Err(DbError::UnknownDriver(other.to_string())),
        };

        let mut opts = ConnectOptions::new(url);
        opts.connect_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        let conn = Database::connect(opts).await.map_err(DbError::Connect)?;

        if driver == "sqlite" {
            use sea_orm::ConnectionTrait;
            conn.execute_unprepared("PRAGMA foreign_keys = ON;")
                .await
                .map_err(DbError::Connect)?;
        }

        Ok(Self { conn })
    }

    /// Run `M`'s migrations against this connection (idempotent: already
    /// applied migrations are skipped).
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Migrate`] if any migration step fails.
    pub async fn migrate<M: MigratorTrait>(&self) -> Result<(), DbError> {
        tracing::info!("running database migrations");
        M::up(&self.conn, None)
            .await
            .map_err(DbError::Migrate)?;
        Ok(())
    }

    /// The underlying sea-orm connection, handed to repository
    /// implementations.
    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_driver_is_rejected() {
        let err = DbManager::connect("postgres", "whatever").await.unwrap_err();
        assert!(matches!(err, DbError::UnknownDriver(d) if d == "postgres"));
    }

    #[tokio::test]
    async fn memory_sqlite_connects() {
        let mgr = DbManager::connect("sqlite", ":memory:").await.unwrap();
        assert!(mgr.connection().ping().await.is_ok());
    }
}
