#![cfg_attr(
    not(any(feature = "pg", feature = "mysql", feature = "sqlite")),
    allow(unused_imports, unused_variables, dead_code, unreachable_code)
)]

//! Database handle and query lowering.
//!
//! [`DbHandle`] wraps one sqlx pool (SQLite, PostgreSQL or MySQL, picked by DSN
//! scheme) and exposes it as a SeaORM connection. The [`filter`] module turns
//! `query_core::QueryOptions` into a parameterized SeaORM `Condition` and order.
//!
//! Backends are cargo features: `pg`, `mysql`, `sqlite`; `sea-orm` adds the
//! SeaORM connection and the lowering engine.

#[cfg(feature = "sea-orm")]
pub mod filter;
pub mod options;

pub use options::{expand_env_vars, redact_credentials_in_dsn};

use std::time::Duration;

use sqlx::pool::PoolOptions;

#[cfg(feature = "sea-orm")]
use sea_orm::DatabaseConnection;

use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the DB handle and helpers.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Environment variable '{0}' is not set")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[cfg(feature = "sea-orm")]
    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    MySql,
    Sqlite,
}

/// Pool settings shared by every backend.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    pub max_conns: Option<u32>,
    pub acquire_timeout: Option<Duration>,
    /// SQLite `busy_timeout` for file databases.
    pub sqlite_busy_timeout: Duration,
    /// Create missing parent directories of a SQLite file DSN.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            acquire_timeout: Some(Duration::from_secs(30)),
            sqlite_busy_timeout: Duration::from_millis(5000),
            create_sqlite_dirs: true,
        }
    }
}

impl ConnectOpts {
    fn pool<DB: sqlx::Database>(&self) -> PoolOptions<DB> {
        let mut o = PoolOptions::<DB>::new();
        if let Some(n) = self.max_conns {
            o = o.max_connections(n);
        }
        if let Some(t) = self.acquire_timeout {
            o = o.acquire_timeout(t);
        }
        o
    }
}

#[derive(Clone, Debug)]
enum DbPool {
    #[cfg(feature = "pg")]
    Postgres(sqlx::PgPool),
    #[cfg(feature = "mysql")]
    MySql(sqlx::MySqlPool),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlx::SqlitePool),
}

/// An open pool plus its SeaORM view.
#[derive(Debug)]
pub struct DbHandle {
    engine: DbEngine,
    pool: DbPool,
    #[cfg(feature = "sea-orm")]
    sea: DatabaseConnection,
}

impl DbHandle {
    /// Engine named by the DSN scheme.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        let scheme = dsn.trim_start();
        if scheme.starts_with("postgres://") || scheme.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if scheme.starts_with("mysql://") {
            Ok(DbEngine::MySql)
        } else if scheme.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(redact_credentials_in_dsn(Some(dsn))))
        }
    }

    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        tracing::debug!(
            engine = ?engine,
            dsn = %redact_credentials_in_dsn(Some(dsn)),
            "connecting database"
        );
        let pool = match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => DbPool::Postgres(opts.pool().connect(dsn).await?),
            #[cfg(feature = "mysql")]
            DbEngine::MySql => DbPool::MySql(opts.pool().connect(dsn).await?),
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => DbPool::Sqlite(connect_sqlite(dsn, &opts).await?),
            #[allow(unreachable_patterns)]
            other => return Err(DbError::FeatureDisabled(feature_name(other))),
        };

        Ok(Self {
            engine,
            #[cfg(feature = "sea-orm")]
            sea: pool.to_sea(),
            pool,
        })
    }

    /// Closes the pool; pending acquisitions fail afterwards.
    pub async fn close(&self) {
        match &self.pool {
            #[cfg(feature = "pg")]
            DbPool::Postgres(p) => p.close().await,
            #[cfg(feature = "mysql")]
            DbPool::MySql(p) => p.close().await,
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(p) => p.close().await,
        }
    }

    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    #[cfg(feature = "sqlite")]
    pub fn sqlx_sqlite(&self) -> Option<&sqlx::SqlitePool> {
        match &self.pool {
            DbPool::Sqlite(p) => Some(p),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    }

    /// Owned connection for repositories.
    #[cfg(feature = "sea-orm")]
    pub fn sea(&self) -> DatabaseConnection {
        self.sea.clone()
    }

    /// Borrowed connection for migrators.
    #[cfg(feature = "sea-orm")]
    pub fn seaorm(&self) -> &DatabaseConnection {
        &self.sea
    }
}

#[cfg(feature = "sea-orm")]
impl DbPool {
    fn to_sea(&self) -> DatabaseConnection {
        match self {
            #[cfg(feature = "pg")]
            DbPool::Postgres(p) => sea_orm::SqlxPostgresConnector::from_sqlx_postgres_pool(p.clone()),
            #[cfg(feature = "mysql")]
            DbPool::MySql(p) => sea_orm::SqlxMySqlConnector::from_sqlx_mysql_pool(p.clone()),
            #[cfg(feature = "sqlite")]
            DbPool::Sqlite(p) => sea_orm::SqlxSqliteConnector::from_sqlx_sqlite_pool(p.clone()),
        }
    }
}

#[allow(dead_code)]
fn feature_name(engine: DbEngine) -> &'static str {
    match engine {
        DbEngine::Postgres => "pg",
        DbEngine::MySql => "mysql",
        DbEngine::Sqlite => "sqlite",
    }
}

/// In-memory databases get exactly one long-lived connection, otherwise
/// every pooled connection would see its own empty database.
#[cfg(feature = "sqlite")]
async fn connect_sqlite(dsn: &str, opts: &ConnectOpts) -> Result<sqlx::SqlitePool> {
    prepare_sqlite_path(dsn, opts.create_sqlite_dirs)?;
    let in_memory = is_sqlite_memory(dsn);
    let busy_ms = i64::try_from(opts.sqlite_busy_timeout.as_millis()).unwrap_or(i64::MAX);

    let mut o = opts.pool::<sqlx::Sqlite>();
    if in_memory {
        o = o
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = o
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                let pragmas = if in_memory {
                    vec!["PRAGMA journal_mode = DELETE".to_owned()]
                } else {
                    vec![
                        "PRAGMA journal_mode = WAL".to_owned(),
                        format!("PRAGMA busy_timeout = {busy_ms}"),
                    ]
                };
                for pragma in pragmas {
                    sqlx::query(&pragma).execute(&mut *conn).await?;
                }
                sqlx::query("PRAGMA synchronous = NORMAL")
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(dsn)
        .await?;
    Ok(pool)
}

#[cfg(feature = "sqlite")]
fn is_sqlite_memory(dsn: &str) -> bool {
    dsn.contains(":memory:") || dsn.contains("mode=memory")
}

#[cfg(feature = "sqlite")]
fn prepare_sqlite_path(dsn: &str, create_dirs: bool) -> Result<()> {
    if !create_dirs || is_sqlite_memory(dsn) {
        return Ok(());
    }

    let raw = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    let path = raw.split('?').next().unwrap_or(raw);

    if !path.starts_with("file:") {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_engines_by_scheme() {
        assert_eq!(DbHandle::detect("sqlite::memory:").unwrap(), DbEngine::Sqlite);
        assert_eq!(
            DbHandle::detect("postgres://u:p@localhost/app").unwrap(),
            DbEngine::Postgres
        );
        assert_eq!(
            DbHandle::detect("mysql://u:p@localhost/app").unwrap(),
            DbEngine::MySql
        );
        assert!(matches!(
            DbHandle::detect("redis://localhost"),
            Err(DbError::UnknownDsn(_))
        ));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn memory_dsns_are_recognised() {
        assert!(is_sqlite_memory("sqlite::memory:"));
        assert!(is_sqlite_memory("sqlite://file:x?mode=memory&cache=shared"));
        assert!(!is_sqlite_memory("sqlite://data/app.db"));
    }
}
