use super::{Storage, StorageError};
use crate::accounts::{Account, AccountField};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Connection, PgPool, Row};
use std::time::Duration;
use tracing::{info_span, Instrument};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// Postgres backend; one row per account in `users`.
#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns an error if no connection can be established.
    pub async fn connect(dsn: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        Ok(Self::new(pool))
    }

    /// Create the `users` table and its unique constraints if missing.
    ///
    /// # Errors
    /// Returns an error if any schema statement fails.
    pub async fn apply_schema(&self) -> anyhow::Result<()> {
        for (index, statement) in split_sql_statements(SCHEMA_SQL).iter().enumerate() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to execute schema statement {}", index + 1))?;
        }

        Ok(())
    }
}

const fn select_query(field: AccountField) -> &'static str {
    match field {
        AccountField::Id => {
            "SELECT token, id, name, username, mail, password FROM users WHERE id = $1 LIMIT 1"
        }
        AccountField::Username => {
            "SELECT token, id, name, username, mail, password FROM users WHERE username = $1 LIMIT 1"
        }
        AccountField::Mail => {
            "SELECT token, id, name, username, mail, password FROM users WHERE mail = $1 LIMIT 1"
        }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn find_one(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<Account>, StorageError> {
        let query = select_query(field);
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .with_context(|| format!("failed to lookup user by {field}"))?;

        Ok(row.map(|row| Account {
            token: row.get("token"),
            id: row.get("id"),
            name: row.get("name"),
            username: row.get("username"),
            mail: row.get("mail"),
            password: row.get("password"),
        }))
    }

    async fn insert_one(&self, account: &Account) -> Result<(), StorageError> {
        let query = r"
            INSERT INTO users
                (token, id, name, username, mail, password)
            VALUES ($1, $2, $3, $4, $5, $6)
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(&account.token)
            .bind(&account.id)
            .bind(&account.name)
            .bind(&account.username)
            .bind(&account.mail)
            .bind(&account.password)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) => match unique_violation(&err) {
                Some(field) => Err(StorageError::Conflict(field)),
                None => Err(anyhow!(err).context("failed to insert user").into()),
            },
        }
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("Failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("Failed to ping database")?;

        Ok(())
    }
}

/// Map a unique-violation (SQLSTATE 23505) to the field its constraint guards.
fn unique_violation(err: &sqlx::Error) -> Option<AccountField> {
    let sqlx::Error::Database(db_err) = err else {
        return None;
    };

    if !db_err.code().is_some_and(|code| code.as_ref() == "23505") {
        return None;
    }

    match db_err.constraint() {
        Some("users_username_key") => Some(AccountField::Username),
        Some("users_mail_key") => Some(AccountField::Mail),
        Some("users_id_key") => Some(AccountField::Id),
        _ => None,
    }
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();

    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") {
            continue;
        }
        current.push_str(line);
        current.push('\n');

        if trimmed.ends_with(';') {
            let statement = current.trim();
            if !statement.is_empty() {
                statements.push(statement.to_string());
            }
            current.clear();
        }
    }

    let leftover = current.trim();
    if !leftover.is_empty() {
        statements.push(leftover.to_string());
    }

    statements
}
