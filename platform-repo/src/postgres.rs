//! PostgreSQL repository adapter.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use platform_types::{
    NewPayment, NewUser, Payment, PaymentId, PaymentRepository, RepoError, User, UserId,
    UserRepository,
};

use crate::types::{DbPayment, DbUser, db_err, narrow_id};

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL Repository
// ─────────────────────────────────────────────────────────────────────────────

/// PostgreSQL repository. Every operation is a single statement; the store
/// offers per-operation atomicity only.
pub struct PostgresRepo {
    pool: PgPool,
}

/// Executes SQL statements from a migration file, splitting by semicolons.
async fn execute_migration(pool: &PgPool, sql: &str, name: &str) -> Result<(), anyhow::Error> {
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

/// Runs all database migrations.
async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    execute_migration(
        pool,
        include_str!("../migrations/0001_create_users_pg.sql"),
        "0001",
    )
    .await?;

    execute_migration(
        pool,
        include_str!("../migrations/0002_create_payments_pg.sql"),
        "0002",
    )
    .await?;

    Ok(())
}

impl PostgresRepo {
    /// Creates a new PostgreSQL repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        run_migrations(&pool).await?;
        tracing::debug!("PostgreSQL store ready");
        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User store
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for PostgresRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO users (username, email, password_hash, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $4) RETURNING id"#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(User {
            id: UserId::new(narrow_id(id)?),
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
               FROM users WHERE id = $1 AND deleted_at IS NULL"#,
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
               FROM users WHERE email = $1 AND deleted_at IS NULL ORDER BY id LIMIT 1"#,
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
               FROM users WHERE username = $1 AND deleted_at IS NULL ORDER BY id LIMIT 1"#,
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
            r#"UPDATE users SET username = $1, email = $2, updated_at = $3
               WHERE id = $4 AND deleted_at IS NULL"#,
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
        let result = sqlx::query(
            r#"UPDATE users SET deleted_at = $1, updated_at = $1 WHERE id = $2 AND deleted_at IS NULL"#,
        )
        .bind(Utc::now())
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
impl PaymentRepository for PostgresRepo {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let now = Utc::now();

        let id: i64 = sqlx::query_scalar(
            r#"INSERT INTO payments (user_id, amount, currency, description, status, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING id"#,
        )
        .bind(i64::from(payment.user_id.get()))
        .bind(payment.amount.value())
        .bind(payment.currency.as_str())
        .bind(&payment.description)
        .bind(&payment.status)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(Payment {
            id: PaymentId::new(narrow_id(id)?),
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
               FROM payments WHERE id = $1 AND deleted_at IS NULL"#,
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
               FROM payments WHERE user_id = $1 AND deleted_at IS NULL ORDER BY id"#,
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
