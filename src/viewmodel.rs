//! Account list view model.
//!
//! Mirrors the repository's account set as two ordered lists (active and
//! inactive) and owns the staged-deletion flow:
//!
//! ```text
//! Displayed -> stage_deletion -> Staged (prompt visible)
//!   Staged -> restore          -> Displayed
//!   Staged -> confirm_deletion -> Deleting -> (UserDidDeleteAccount) -> gone
//!   Deleting -> deletion_failed -> Displayed
//! ```
//!
//! Outside of those windows, the two lists partition the repository's
//! accounts exactly, each account placed by its `is_active` flag.

use std::sync::Arc;

use crate::account::{AccountNotification, AccountRepository, AccountSubscription};
use crate::storage::{Account, AccountId, AccountType};

/// Removal warning for Feedly accounts, whose data lives on the service.
pub const FEEDLY_REMOVAL_MESSAGE: &str = "Are you sure you want to remove this account? NetNewsWire will no longer be able to access articles and feeds unless the account is added again.";

/// Removal warning for every other account type.
pub const GENERIC_REMOVAL_MESSAGE: &str =
    "Are you sure you want to remove this account? This cannot be undone.";

/// Which list a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Active,
    Inactive,
}

/// Per-row actions and whether they are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub can_remove: bool,
    pub can_toggle_active: bool,
    pub toggle_label: &'static str,
}

/// Text for the removal confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPrompt {
    pub title: String,
    pub message: &'static str,
}

pub struct AccountListViewModel {
    repo: Arc<dyn AccountRepository>,
    subscription: AccountSubscription,
    sorted_active_accounts: Vec<Account>,
    sorted_inactive_accounts: Vec<Account>,
    /// Confirmed deletions still waiting for the repository to finish.
    accounts_for_deletion: Vec<Account>,
    show_account_deletion_alert: bool,
    /// Whether the add-account sheet is open. Owned by the view.
    pub show_add_account_sheet: bool,
    account_to_delete: Option<Account>,
}

impl AccountListViewModel {
    /// Subscribe to account notifications, then load the initial lists.
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        let subscription = repo.subscribe();
        let mut vm = Self {
            repo,
            subscription,
            sorted_active_accounts: Vec::new(),
            sorted_inactive_accounts: Vec::new(),
            accounts_for_deletion: Vec::new(),
            show_account_deletion_alert: false,
            show_add_account_sheet: false,
            account_to_delete: None,
        };
        vm.refresh();
        vm
    }

    pub fn repository(&self) -> &Arc<dyn AccountRepository> {
        &self.repo
    }

    pub fn sorted_active_accounts(&self) -> &[Account] {
        &self.sorted_active_accounts
    }

    pub fn sorted_inactive_accounts(&self) -> &[Account] {
        &self.sorted_inactive_accounts
    }

    pub fn accounts_for_deletion(&self) -> &[Account] {
        &self.accounts_for_deletion
    }

    pub fn show_account_deletion_alert(&self) -> bool {
        self.show_account_deletion_alert
    }

    pub fn account_to_delete(&self) -> Option<&Account> {
        self.account_to_delete.as_ref()
    }

    /// Re-derive both lists from the repository.
    ///
    /// Accounts that are staged or mid-deletion stay hidden.
    pub fn refresh(&mut self) {
        let all = self.repo.sorted_accounts();

        // Deletions the repository has completed no longer need tracking
        self.accounts_for_deletion
            .retain(|pending| all.iter().any(|a| a.id == pending.id));

        let hidden: Vec<AccountId> = self
            .accounts_for_deletion
            .iter()
            .chain(self.account_to_delete.as_ref())
            .map(|a| a.id)
            .collect();
        let visible = |a: &Account| !hidden.contains(&a.id);

        let active: Vec<Account> = self
            .repo
            .sorted_active_accounts()
            .into_iter()
            .filter(|a| visible(a))
            .collect();
        let inactive: Vec<Account> = all
            .into_iter()
            .filter(|a| !a.is_active && visible(a))
            .collect();

        tracing::trace!(
            active = active.len(),
            inactive = inactive.len(),
            hidden = hidden.len(),
            "Refreshed account lists"
        );
        self.sorted_active_accounts = active;
        self.sorted_inactive_accounts = inactive;
    }

    /// Optimistically remove `account` from its list and raise the
    /// confirmation prompt. Nothing is written to the repository.
    pub fn stage_deletion(&mut self, account: &Account) {
        if account.is_active {
            self.sorted_active_accounts.retain(|a| a.id != account.id);
        } else {
            self.sorted_inactive_accounts.retain(|a| a.id != account.id);
        }
        self.account_to_delete = Some(account.clone());
        self.show_account_deletion_alert = true;
    }

    /// Cancel a staged deletion and put the account back where it belongs.
    pub fn restore(&mut self) {
        self.account_to_delete = None;
        self.show_account_deletion_alert = false;
        self.refresh();
    }

    /// Accept the staged deletion.
    ///
    /// Returns the account the caller must now delete through the repository.
    /// It stays hidden until the repository reports it gone or the caller
    /// reports failure through [`deletion_failed`](Self::deletion_failed).
    pub fn confirm_deletion(&mut self) -> Option<Account> {
        self.show_account_deletion_alert = false;
        let account = self.account_to_delete.take()?;
        if !self.accounts_for_deletion.iter().any(|a| a.id == account.id) {
            self.accounts_for_deletion.push(account.clone());
        }
        Some(account)
    }

    /// The repository refused or failed the deletion; show the account again.
    pub fn deletion_failed(&mut self, id: AccountId) {
        self.accounts_for_deletion.retain(|a| a.id != id);
        self.refresh();
    }

    /// Drain pending notifications and refresh once if any arrived.
    pub fn poll_notifications(&mut self) -> bool {
        let mut received = false;
        while let Some(notification) = self.subscription.try_next() {
            tracing::debug!(?notification, "Account notification");
            received = true;
        }
        if received {
            self.refresh();
        }
        received
    }

    /// Wait for the next account notification. The caller refreshes.
    pub async fn next_notification(&mut self) -> Option<AccountNotification> {
        self.subscription.next().await
    }

    pub fn is_default(&self, account: &Account) -> bool {
        account.id == self.repo.default_account_id()
    }

    /// Actions offered on a row. The default account can be neither removed
    /// nor deactivated.
    pub fn row_actions(&self, account: &Account) -> RowActions {
        let protected = self.is_default(account);
        RowActions {
            can_remove: !protected,
            can_toggle_active: !protected,
            toggle_label: if account.is_active {
                "Deactivate"
            } else {
                "Activate"
            },
        }
    }

    /// Prompt text for the staged account, if any.
    pub fn deletion_prompt(&self) -> Option<DeletionPrompt> {
        let account = self.account_to_delete.as_ref()?;
        let message = match account.account_type {
            AccountType::Feedly => FEEDLY_REMOVAL_MESSAGE,
            _ => GENERIC_REMOVAL_MESSAGE,
        };
        Some(DeletionPrompt {
            title: format!(
                "Are you sure you want to remove “{}”?",
                account.name_for_display()
            ),
            message,
        })
    }

    // ========================================================================
    // Row Addressing
    // ========================================================================

    /// Total rows across both sections.
    pub fn row_count(&self) -> usize {
        self.sorted_active_accounts.len() + self.sorted_inactive_accounts.len()
    }

    /// Account at a flat row index: active rows first, then inactive rows.
    pub fn row(&self, index: usize) -> Option<(Section, &Account)> {
        let active = self.sorted_active_accounts.len();
        if index < active {
            Some((Section::Active, &self.sorted_active_accounts[index]))
        } else {
            self.sorted_inactive_accounts
                .get(index - active)
                .map(|a| (Section::Inactive, a))
        }
    }

    /// Flat row index of an account, if it is displayed.
    pub fn row_of(&self, id: AccountId) -> Option<usize> {
        self.sorted_active_accounts
            .iter()
            .chain(&self.sorted_inactive_accounts)
            .position(|a| a.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountManager;
    use crate::storage::Database;
    use pretty_assertions::assert_eq;

    async fn test_repo() -> Arc<AccountManager> {
        let db = Database::open(":memory:").await.unwrap();
        Arc::new(AccountManager::load(db).await.unwrap())
    }

    fn ids(accounts: &[Account]) -> Vec<AccountId> {
        accounts.iter().map(|a| a.id).collect()
    }

    /// Default account (A) and "Bravo" active, "Charlie" inactive.
    async fn scenario() -> (Arc<AccountManager>, Account, Account, Account) {
        let repo = test_repo().await;
        let a = repo.account(repo.default_account_id()).unwrap();
        let b = repo
            .add_account(AccountType::Feedbin, Some("Bravo"))
            .await
            .unwrap();
        let c = repo
            .add_account(AccountType::Feedly, Some("Charlie"))
            .await
            .unwrap();
        repo.set_active(c.id, false).await.unwrap();
        let c = repo.account(c.id).unwrap();
        (repo, a, b, c)
    }

    #[tokio::test]
    async fn test_refresh_partitions_by_active_flag() {
        let (repo, a, b, c) = scenario().await;
        let vm = AccountListViewModel::new(repo);

        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id, b.id]);
        assert_eq!(ids(vm.sorted_inactive_accounts()), vec![c.id]);
    }

    #[tokio::test]
    async fn test_stage_then_restore_scenario() {
        let (repo, a, b, c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo);

        vm.stage_deletion(&b);
        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id]);
        assert_eq!(ids(vm.sorted_inactive_accounts()), vec![c.id]);
        assert_eq!(vm.account_to_delete().map(|x| x.id), Some(b.id));
        assert!(vm.show_account_deletion_alert());

        vm.restore();
        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id, b.id]);
        assert_eq!(vm.account_to_delete(), None);
        assert!(!vm.show_account_deletion_alert());
    }

    #[tokio::test]
    async fn test_stage_inactive_account() {
        let (repo, _a, _b, c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo);

        vm.stage_deletion(&c);
        assert!(vm.sorted_inactive_accounts().is_empty());
        assert_eq!(vm.sorted_active_accounts().len(), 2);
    }

    #[tokio::test]
    async fn test_restore_is_idempotent() {
        let (repo, _a, b, _c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo);
        let before = ids(vm.sorted_active_accounts());

        vm.restore();
        vm.stage_deletion(&b);
        vm.restore();
        vm.restore();
        assert_eq!(ids(vm.sorted_active_accounts()), before);
    }

    #[tokio::test]
    async fn test_staged_account_stays_hidden_across_refresh() {
        let (repo, a, b, _c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo.clone());

        vm.stage_deletion(&b);
        repo.rename(a.id, Some("Local")).await.unwrap();
        assert!(vm.poll_notifications());

        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id]);
        assert_eq!(vm.sorted_active_accounts()[0].name_for_display(), "Local");
    }

    #[tokio::test]
    async fn test_confirm_deletion_flow() {
        let (repo, a, b, c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo.clone());

        vm.stage_deletion(&b);
        let target = vm.confirm_deletion().unwrap();
        assert_eq!(target.id, b.id);
        assert!(!vm.show_account_deletion_alert());
        assert_eq!(ids(vm.accounts_for_deletion()), vec![b.id]);

        // Still hidden while the delete is in flight
        vm.refresh();
        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id]);

        assert!(repo.delete_account(target.id).await.unwrap());
        assert!(vm.poll_notifications());
        assert!(vm.accounts_for_deletion().is_empty());
        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id]);
        assert_eq!(ids(vm.sorted_inactive_accounts()), vec![c.id]);
    }

    #[tokio::test]
    async fn test_confirm_without_staged_account() {
        let repo = test_repo().await;
        let mut vm = AccountListViewModel::new(repo);
        assert_eq!(vm.confirm_deletion(), None);
    }

    #[tokio::test]
    async fn test_deletion_failed_shows_account_again() {
        let (repo, a, b, _c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo);

        vm.stage_deletion(&b);
        vm.confirm_deletion();
        vm.deletion_failed(b.id);

        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id, b.id]);
        assert!(vm.accounts_for_deletion().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_moves_between_sections() {
        let (repo, a, b, c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo.clone());

        repo.set_active(b.id, false).await.unwrap();
        repo.set_active(c.id, true).await.unwrap();
        assert!(vm.poll_notifications());

        assert_eq!(ids(vm.sorted_active_accounts()), vec![a.id, c.id]);
        assert_eq!(ids(vm.sorted_inactive_accounts()), vec![b.id]);
    }

    #[tokio::test]
    async fn test_poll_without_notifications() {
        let repo = test_repo().await;
        let mut vm = AccountListViewModel::new(repo);
        assert!(!vm.poll_notifications());
    }

    #[tokio::test]
    async fn test_added_account_appears_after_notification() {
        let repo = test_repo().await;
        let mut vm = AccountListViewModel::new(repo.clone());

        let added = repo.add_account(AccountType::NewsBlur, None).await.unwrap();
        assert_eq!(
            vm.next_notification().await,
            Some(AccountNotification::UserDidAddAccount)
        );
        vm.refresh();
        assert_eq!(vm.row_of(added.id), Some(1));
    }

    #[tokio::test]
    async fn test_dropping_view_model_unsubscribes() {
        let repo = test_repo().await;
        let vm = AccountListViewModel::new(repo.clone());
        drop(vm);
        // Publishing with no observers must not fail
        repo.add_account(AccountType::Feedbin, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_default_account_actions_disabled() {
        let (repo, a, b, c) = scenario().await;
        let vm = AccountListViewModel::new(repo);

        let default_actions = vm.row_actions(&a);
        assert!(!default_actions.can_remove);
        assert!(!default_actions.can_toggle_active);

        let active_actions = vm.row_actions(&b);
        assert!(active_actions.can_remove);
        assert!(active_actions.can_toggle_active);
        assert_eq!(active_actions.toggle_label, "Deactivate");
        assert_eq!(vm.row_actions(&c).toggle_label, "Activate");
    }

    #[tokio::test]
    async fn test_feedly_prompt_message() {
        let (repo, _a, b, c) = scenario().await;
        let mut vm = AccountListViewModel::new(repo);
        assert_eq!(vm.deletion_prompt(), None);

        vm.stage_deletion(&c);
        let prompt = vm.deletion_prompt().unwrap();
        assert_eq!(prompt.message, FEEDLY_REMOVAL_MESSAGE);
        assert_eq!(prompt.title, "Are you sure you want to remove “Charlie”?");

        vm.restore();
        vm.stage_deletion(&b);
        assert_eq!(vm.deletion_prompt().unwrap().message, GENERIC_REMOVAL_MESSAGE);
    }

    #[tokio::test]
    async fn test_row_addressing() {
        let (repo, a, b, c) = scenario().await;
        let vm = AccountListViewModel::new(repo);

        assert_eq!(vm.row_count(), 3);
        assert_eq!(vm.row(0).map(|(s, x)| (s, x.id)), Some((Section::Active, a.id)));
        assert_eq!(vm.row(1).map(|(s, x)| (s, x.id)), Some((Section::Active, b.id)));
        assert_eq!(
            vm.row(2).map(|(s, x)| (s, x.id)),
            Some((Section::Inactive, c.id))
        );
        assert!(vm.row(3).is_none());
        assert_eq!(vm.row_of(c.id), Some(2));
    }
}
