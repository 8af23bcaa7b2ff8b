use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::str::FromStr;
use std::time::Duration;

use super::types::{is_lock_message, AccountType, DatabaseError};

// ============================================================================
// Database
// ============================================================================

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open a database connection and run migrations
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InstanceLocked` if another instance of feedkeeper
    /// has the database locked (SQLITE_BUSY, SQLITE_LOCKED, SQLITE_CANTOPEN).
    /// Returns `DatabaseError::Migration` when the schema cannot be brought up to date.
    pub async fn open(path: &str) -> Result<Self, DatabaseError> {
        let url = format!("sqlite:{}?mode=rwc", path);

        // Restrict the database file to the current user before the pool touches it
        #[cfg(unix)]
        if path != ":memory:" {
            use std::os::unix::fs::PermissionsExt;
            let db_path = std::path::Path::new(path);
            if db_path.exists() {
                let perms = std::fs::Permissions::from_mode(0o600);
                if let Err(e) = std::fs::set_permissions(path, perms) {
                    tracing::warn!(path = %path, error = %e, "Failed to set database file permissions");
                }
            } else if let Some(parent) = db_path.parent() {
                if parent.exists() {
                    use std::os::unix::fs::OpenOptionsExt;
                    let _file = std::fs::OpenOptions::new()
                        .write(true)
                        .create_new(true)
                        .mode(0o600)
                        .open(db_path)
                        .ok(); // If creation fails, SQLite will report the error at connect_with.
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&url)
            .map_err(DatabaseError::from_sqlx)?
            .pragma("busy_timeout", "5000")
            .foreign_keys(true);
        // Account management is low-traffic: one UI reader plus the occasional
        // background mutation.
        let pool = SqlitePoolOptions::new()
            .max_connections(3)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(DatabaseError::from_sqlx)?;
        let db = Self { pool };
        db.migrate().await.map_err(|e| match e {
            DatabaseError::Other(inner) if is_lock_message(&inner.to_string()) => {
                DatabaseError::InstanceLocked
            }
            other => DatabaseError::Migration(other.to_string()),
        })?;
        Ok(db)
    }

    /// Run database migrations atomically within a transaction.
    ///
    /// All statements use `IF NOT EXISTS` (or an equivalent guard), so
    /// re-running on an existing database is a no-op.
    async fn migrate(&self) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY,
                account_type TEXT NOT NULL,
                name TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                is_default INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        // At most one default account
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_accounts_single_default ON accounts(is_default) WHERE is_default = 1",
        )
        .execute(&mut *tx)
        .await?;

        // Create user preferences table (key-value store for user settings)
        // Keys use dotted convention: session.selected_account, etc.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
        "#,
        )
        .execute(&mut *tx)
        .await?;

        // Seed the local account the first time the database is created
        let seeded = sqlx::query(
            r#"
            INSERT INTO accounts (account_type, name, is_active, is_default, created_at)
            SELECT ?, NULL, 1, 1, ?
            WHERE NOT EXISTS (SELECT 1 FROM accounts WHERE is_default = 1)
        "#,
        )
        .bind(AccountType::OnMyDevice.code())
        .bind(chrono::Utc::now().timestamp())
        .execute(&mut *tx)
        .await?;

        if seeded.rows_affected() > 0 {
            tracing::info!("Seeded default local account");
        }

        tx.commit().await?;
        Ok(())
    }
}
