use super::schema::Database;
use super::types::{Account, AccountDbRow, AccountId, AccountType, DatabaseError};

/// Trim a user-entered name, mapping blank input to `None`.
fn normalize_name(name: Option<&str>) -> Option<&str> {
    name.map(str::trim).filter(|n| !n.is_empty())
}

impl Database {
    // ========================================================================
    // Account Operations
    // ========================================================================

    /// Get all accounts in insertion order.
    ///
    /// Display ordering is applied by the account manager, not here.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, DatabaseError> {
        let rows: Vec<AccountDbRow> = sqlx::query_as(
            "SELECT id, account_type, name, is_active, created_at FROM accounts ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AccountDbRow::into_account).collect()
    }

    /// Get a single account by ID.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>, DatabaseError> {
        let row: Option<AccountDbRow> = sqlx::query_as(
            "SELECT id, account_type, name, is_active, created_at FROM accounts WHERE id = ?",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AccountDbRow::into_account).transpose()
    }

    /// ID of the built-in local account seeded by migration.
    pub async fn default_account_id(&self) -> Result<AccountId, DatabaseError> {
        let (id,): (i64,) = sqlx::query_as("SELECT id FROM accounts WHERE is_default = 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(AccountId(id))
    }

    /// Insert a new, active account.
    ///
    /// # Arguments
    ///
    /// * `account_type` - The service backing the account
    /// * `name` - Optional display name; blank input is stored as NULL
    pub async fn insert_account(
        &self,
        account_type: AccountType,
        name: Option<&str>,
    ) -> Result<Account, DatabaseError> {
        let now = chrono::Utc::now().timestamp();
        let row: AccountDbRow = sqlx::query_as(
            r#"
            INSERT INTO accounts (account_type, name, is_active, is_default, created_at)
            VALUES (?, ?, 1, 0, ?)
            RETURNING id, account_type, name, is_active, created_at
        "#,
        )
        .bind(account_type.code())
        .bind(normalize_name(name))
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        row.into_account()
    }

    /// Set the active flag on an account.
    ///
    /// # Returns
    ///
    /// `true` if the account exists, `false` otherwise.
    pub async fn set_account_active(
        &self,
        id: AccountId,
        active: bool,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE accounts SET is_active = ? WHERE id = ?")
            .bind(active)
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Rename an account. A blank name clears it back to the type default.
    ///
    /// # Returns
    ///
    /// `true` if the account exists, `false` otherwise.
    pub async fn rename_account(
        &self,
        id: AccountId,
        name: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let result = sqlx::query("UPDATE accounts SET name = ? WHERE id = ?")
            .bind(normalize_name(name))
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an account.
    ///
    /// Deleting an account that no longer exists is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if a row was removed, `false` if the account was already gone.
    ///
    /// # Errors
    ///
    /// `DatabaseError::DefaultAccountProtected` for the built-in local account.
    pub async fn delete_account(&self, id: AccountId) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let is_default: Option<(bool,)> =
            sqlx::query_as("SELECT is_default FROM accounts WHERE id = ?")
                .bind(id.0)
                .fetch_optional(&mut *tx)
                .await?;

        match is_default {
            None => {
                tracing::debug!(account_id = id.0, "Delete of missing account ignored");
                Ok(false)
            }
            Some((true,)) => Err(DatabaseError::DefaultAccountProtected),
            Some((false,)) => {
                let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
                    .bind(id.0)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                Ok(result.rows_affected() > 0)
            }
        }
    }
}
