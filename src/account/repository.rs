use async_trait::async_trait;

use super::{AccountError, AccountSubscription};
use crate::storage::{Account, AccountId, AccountType};

/// The account store the view model reads from and delegates mutations to.
///
/// Reads are synchronous snapshots. Mutations report success through their
/// return value and also publish an [`AccountNotification`] so that every
/// subscriber converges on the new state.
///
/// [`AccountNotification`]: super::AccountNotification
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All accounts: the default account first, then by display name.
    fn sorted_accounts(&self) -> Vec<Account>;

    /// [`sorted_accounts`](Self::sorted_accounts) restricted to active accounts.
    fn sorted_active_accounts(&self) -> Vec<Account> {
        self.sorted_accounts()
            .into_iter()
            .filter(|a| a.is_active)
            .collect()
    }

    fn default_account_id(&self) -> AccountId;

    /// Register for change notifications. The observer lives as long as the
    /// returned subscription.
    fn subscribe(&self) -> AccountSubscription;

    async fn add_account(
        &self,
        account_type: AccountType,
        name: Option<&str>,
    ) -> Result<Account, AccountError>;

    /// Permanently delete an account. Returns `Ok(false)` when the account was
    /// already gone.
    async fn delete_account(&self, id: AccountId) -> Result<bool, AccountError>;

    async fn set_active(&self, id: AccountId, active: bool) -> Result<(), AccountError>;

    async fn rename(&self, id: AccountId, name: Option<&str>) -> Result<(), AccountError>;
}
