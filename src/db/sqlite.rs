use crate::db::models::{DbLogin, Profile};
use crate::db::schema::SQLITE_INIT;
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

const PROFILE_COLUMNS: &str = "id, name, email, entries, joined";

/// Open a pool for `database_url`, creating the database file when missing.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, ApiError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct AccountStorage {
    pool: SqlitePool,
}

impl AccountStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ApiError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Insert the credential and profile rows in one transaction.
    /// Either both rows exist afterwards or neither does.
    pub async fn create_account(
        &self,
        email: &str,
        name: &str,
        hash: &str,
        joined: DateTime<Utc>,
    ) -> Result<Profile, ApiError> {
        let mut tx = self.pool.begin().await?;

        let (login_email,): (String,) =
            sqlx::query_as("INSERT INTO login (email, hash) VALUES (?, ?) RETURNING email")
                .bind(email)
                .bind(hash)
                .fetch_one(&mut *tx)
                .await
                .map_err(ApiError::from_register)?;

        let profile: Profile = sqlx::query_as(&format!(
            "INSERT INTO users (email, name, joined) VALUES (?, ?, ?) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(login_email)
        .bind(name)
        .bind(joined)
        .fetch_one(&mut *tx)
        .await
        .map_err(ApiError::from_register)?;

        // An early return above drops `tx`, which rolls back.
        tx.commit().await?;
        Ok(profile)
    }

    pub async fn find_login(&self, email: &str) -> Result<Option<DbLogin>, ApiError> {
        let row = sqlx::query_as::<_, DbLogin>("SELECT email, hash FROM login WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>, ApiError> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_profile_by_id(&self, id: i64) -> Result<Option<Profile>, ApiError> {
        let row = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Atomic `entries + 1`. Returns the new count, or `None` for an unknown id.
    pub async fn increment_entries(&self, id: i64) -> Result<Option<i64>, ApiError> {
        let row: Option<(i64,)> =
            sqlx::query_as("UPDATE users SET entries = entries + 1 WHERE id = ? RETURNING entries")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(entries,)| entries))
    }
}
