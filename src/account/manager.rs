use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{
    AccountError, AccountEvents, AccountNotification, AccountRepository, AccountSubscription,
};
use crate::storage::{Account, AccountId, AccountType, Database};

/// Order accounts for display: default account first, then case-insensitive
/// display name, then ID for a stable tie-break.
pub(crate) fn display_order(a: &Account, b: &Account, default_id: AccountId) -> Ordering {
    (b.id == default_id)
        .cmp(&(a.id == default_id))
        .then_with(|| {
            a.name_for_display()
                .to_lowercase()
                .cmp(&b.name_for_display().to_lowercase())
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// SQLite-backed [`AccountRepository`].
///
/// Holds an in-memory snapshot of every account so reads never touch the
/// database. Mutations write through to SQLite first; the snapshot is only
/// updated, and the notification only published, after the write succeeds.
pub struct AccountManager {
    db: Database,
    accounts: RwLock<Vec<Account>>,
    default_id: AccountId,
    events: AccountEvents,
}

impl AccountManager {
    /// Load the account snapshot from the database.
    pub async fn load(db: Database) -> Result<Self, AccountError> {
        let accounts = db.list_accounts().await?;
        let default_id = db.default_account_id().await?;
        tracing::debug!(count = accounts.len(), default_id = default_id.0, "Loaded accounts");

        Ok(Self {
            db,
            accounts: RwLock::new(accounts),
            default_id,
            events: AccountEvents::new(),
        })
    }

    /// Look up a single account in the snapshot.
    pub fn account(&self, id: AccountId) -> Option<Account> {
        self.read().iter().find(|a| a.id == id).cloned()
    }

    // A panic while holding the lock cannot leave the Vec half-written: every
    // writer replaces or edits one element at a time.
    fn read(&self) -> RwLockReadGuard<'_, Vec<Account>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Account>> {
        self.accounts.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn forget(&self, id: AccountId) {
        self.write().retain(|a| a.id != id);
    }
}

#[async_trait]
impl AccountRepository for AccountManager {
    fn sorted_accounts(&self) -> Vec<Account> {
        let mut accounts = self.read().clone();
        accounts.sort_by(|a, b| display_order(a, b, self.default_id));
        accounts
    }

    fn default_account_id(&self) -> AccountId {
        self.default_id
    }

    fn subscribe(&self) -> AccountSubscription {
        self.events.subscribe()
    }

    async fn add_account(
        &self,
        account_type: AccountType,
        name: Option<&str>,
    ) -> Result<Account, AccountError> {
        let account = self.db.insert_account(account_type, name).await?;
        tracing::info!(
            account_id = account.id.0,
            account_type = account_type.code(),
            "Added account"
        );

        self.write().push(account.clone());
        self.events.publish(AccountNotification::UserDidAddAccount);
        Ok(account)
    }

    async fn delete_account(&self, id: AccountId) -> Result<bool, AccountError> {
        if id == self.default_id {
            return Err(AccountError::DefaultAccountProtected);
        }

        let removed = self.db.delete_account(id).await?;
        self.forget(id);

        if removed {
            tracing::info!(account_id = id.0, "Deleted account");
            self.events.publish(AccountNotification::UserDidDeleteAccount);
        } else {
            tracing::debug!(account_id = id.0, "Account already deleted");
        }
        Ok(removed)
    }

    async fn set_active(&self, id: AccountId, active: bool) -> Result<(), AccountError> {
        let current = self
            .account(id)
            .ok_or(AccountError::NotFound(id))?
            .is_active;
        if current == active {
            return Ok(());
        }

        if !self.db.set_account_active(id, active).await? {
            self.forget(id);
            return Err(AccountError::NotFound(id));
        }

        if let Some(account) = self.write().iter_mut().find(|a| a.id == id) {
            account.is_active = active;
        }
        tracing::info!(account_id = id.0, active, "Changed account state");
        self.events.publish(AccountNotification::AccountStateDidChange);
        Ok(())
    }

    async fn rename(&self, id: AccountId, name: Option<&str>) -> Result<(), AccountError> {
        if !self.db.rename_account(id, name).await? {
            self.forget(id);
            return Err(AccountError::NotFound(id));
        }

        let updated = self
            .db
            .get_account(id)
            .await?
            .ok_or(AccountError::NotFound(id))?;
        tracing::info!(account_id = id.0, name = %updated.name_for_display(), "Renamed account");

        if let Some(account) = self.write().iter_mut().find(|a| a.id == id) {
            *account = updated;
        }
        self.events.publish(AccountNotification::DisplayNameDidChange);
        Ok(())
    }
}
