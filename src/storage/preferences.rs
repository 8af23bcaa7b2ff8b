use super::schema::Database;
use super::types::DatabaseError;

impl Database {
    // ========================================================================
    // Session Preferences
    // ========================================================================

    /// Read a stored preference. Keys are dotted, e.g. `session.selected_account`.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Store a preference, replacing any previous value.
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO user_preferences (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        tracing::trace!(key, "Saved preference");
        Ok(())
    }

    /// Forget a preference. Returns whether one was stored.
    pub async fn remove_preference(&self, key: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
