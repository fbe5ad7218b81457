//! SQLite repository adapter.
#![allow(clippy::collapsible_if)]

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use platform_types::{
    NewPayment, NewUser, Payment, PaymentId, PaymentRepository, RepoError, User, UserId,
    UserRepository,
};

use crate::types::{DbPayment, DbUser, db_err, narrow_id};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
pub struct SqliteRepo {
    pool: SqlitePool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &SqlitePool, sql: &str, name: &str) -> anyhow::Result<()> {
    for statement in sql.split(';') {
        let stmt = statement.trim();
        if !stmt.is_empty() {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .map_err(|e| anyhow::anyhow!("Migration {} failed: {}", name, e))?;
        }
    }
    Ok(())
}

async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    execute_migration(pool, include_str!("../migrations/0001_create_users.sql"), "0001").await?;
    execute_migration(
        pool,
        include_str!("../migrations/0002_create_payments.sql"),
        "0002",
    )
    .await?;
    Ok(())
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // An in-memory database lives only as long as its connections, so keep
        // exactly one open for the lifetime of the pool.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        run_migrations(&pool).await?;

        tracing::debug!("SQLite store ready at {}", database_url);
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User store
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for SqliteRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO users (username, email, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(User {
            id: UserId::new(narrow_id(result.last_insert_rowid())?),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, username, email, password_hash, created_at, updated_at, deleted_at
               FROM users WHERE id = ? AND deleted_at IS NULL"#,
        )
        .bind(i64::from(id.get()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, username, email, password_hash, created_at, updated_at, deleted_at
               FROM users WHERE email = ? AND deleted_at IS NULL ORDER BY id LIMIT 1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let row: Option<DbUser> = sqlx::query_as(
            r#"SELECT id, username, email, password_hash, created_at, updated_at, deleted_at
               FROM users WHERE username = ? AND deleted_at IS NULL ORDER BY id LIMIT 1"#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbUser::into_domain).transpose()
    }

    async fn update_user(&self, mut user: User) -> Result<User, RepoError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"UPDATE users SET username = ?, email = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(now)
        .bind(i64::from(user.id.get()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        user.updated_at = now;
        Ok(user)
    }

    async fn soft_delete_user(&self, id: UserId) -> Result<(), RepoError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"UPDATE users SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL"#,
        )
        .bind(now)
        .bind(now)
        .bind(i64::from(id.get()))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        let rows: Vec<DbUser> = sqlx::query_as(
            r#"SELECT id, username, email, password_hash, created_at, updated_at, deleted_at
               FROM users WHERE deleted_at IS NULL ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbUser::into_domain).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment store
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl PaymentRepository for SqliteRepo {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO payments (user_id, amount, currency, description, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(i64::from(payment.user_id.get()))
        .bind(payment.amount.value())
        .bind(payment.currency.as_str())
        .bind(&payment.description)
        .bind(&payment.status)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Payment {
            id: PaymentId::new(narrow_id(result.last_insert_rowid())?),
            user_id: payment.user_id,
            amount: payment.amount,
            currency: payment.currency,
            description: payment.description,
            status: payment.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT id, user_id, amount, currency, description, status, created_at, updated_at, deleted_at
               FROM payments WHERE id = ? AND deleted_at IS NULL"#,
        )
        .bind(i64::from(id.get()))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn list_payments_for_user(&self, user_id: UserId) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<DbPayment> = sqlx::query_as(
            r#"SELECT id, user_id, amount, currency, description, status, created_at, updated_at, deleted_at
               FROM payments WHERE user_id = ? AND deleted_at IS NULL ORDER BY id"#,
        )
        .bind(i64::from(user_id.get()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbPayment::into_domain).collect()
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, RepoError> {
        let rows: Vec<DbPayment> = sqlx::query_as(
            r#"SELECT id, user_id, amount, currency, description, status, created_at, updated_at, deleted_at
               FROM payments WHERE deleted_at IS NULL ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.into_iter().map(DbPayment::into_domain).collect()
    }
}
