//! Integration tests for the account lifecycle: add, toggle, rename, remove.
//!
//! Each test creates its own in-memory SQLite database for isolation and
//! drives the account manager through the list view model, the same way the
//! terminal UI does.

use std::sync::Arc;

use feedkeeper::account::{AccountError, AccountManager, AccountNotification, AccountRepository};
use feedkeeper::storage::{Account, AccountId, AccountType, Database, DEFAULT_LOCAL_ACCOUNT_NAME};
use feedkeeper::viewmodel::{AccountListViewModel, FEEDLY_REMOVAL_MESSAGE, GENERIC_REMOVAL_MESSAGE};
use pretty_assertions::assert_eq;

async fn test_manager() -> Arc<AccountManager> {
    let db = Database::open(":memory:").await.unwrap();
    Arc::new(AccountManager::load(db).await.unwrap())
}

fn ids(accounts: &[Account]) -> Vec<AccountId> {
    accounts.iter().map(|a| a.id).collect()
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_fresh_database_has_only_default_account() {
    let manager = test_manager().await;
    let accounts = manager.sorted_accounts();

    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, manager.default_account_id());
    assert_eq!(accounts[0].account_type, AccountType::OnMyDevice);
    assert_eq!(accounts[0].name_for_display(), DEFAULT_LOCAL_ACCOUNT_NAME);
    assert!(accounts[0].is_active);
}

#[tokio::test]
async fn test_snapshot_survives_reload() {
    let db = Database::open(":memory:").await.unwrap();
    let manager = AccountManager::load(db.clone()).await.unwrap();
    let added = manager
        .add_account(AccountType::Inoreader, Some("News"))
        .await
        .unwrap();
    manager.set_active(added.id, false).await.unwrap();

    let reloaded = AccountManager::load(db).await.unwrap();
    assert_eq!(reloaded.sorted_accounts(), manager.sorted_accounts());
}

#[tokio::test]
async fn test_second_delete_is_noop() {
    let manager = test_manager().await;
    let mut subscription = manager.subscribe();
    let added = manager.add_account(AccountType::Feedbin, None).await.unwrap();
    assert_eq!(
        subscription.try_next(),
        Some(AccountNotification::UserDidAddAccount)
    );

    assert!(manager.delete_account(added.id).await.unwrap());
    assert_eq!(
        subscription.try_next(),
        Some(AccountNotification::UserDidDeleteAccount)
    );

    assert!(!manager.delete_account(added.id).await.unwrap());
    assert_eq!(subscription.try_next(), None);
}

#[tokio::test]
async fn test_default_account_cannot_be_deleted() {
    let manager = test_manager().await;
    let err = manager
        .delete_account(manager.default_account_id())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::DefaultAccountProtected));
    assert_eq!(manager.sorted_accounts().len(), 1);
}

#[tokio::test]
async fn test_toggle_unknown_account_not_found() {
    let manager = test_manager().await;
    let err = manager.set_active(AccountId(404), false).await.unwrap_err();
    assert!(matches!(err, AccountError::NotFound(AccountId(404))));
}

// ============================================================================
// View Model Tests
// ============================================================================

#[tokio::test]
async fn test_toggle_moves_account_without_duplication() {
    let manager = test_manager().await;
    let feed = manager
        .add_account(AccountType::Feedly, Some("Feedly"))
        .await
        .unwrap();
    let mut vm = AccountListViewModel::new(manager.clone());

    manager.set_active(feed.id, false).await.unwrap();
    vm.poll_notifications();
    assert_eq!(ids(vm.sorted_active_accounts()), vec![manager.default_account_id()]);
    assert_eq!(ids(vm.sorted_inactive_accounts()), vec![feed.id]);

    manager.set_active(feed.id, true).await.unwrap();
    vm.poll_notifications();
    assert_eq!(
        ids(vm.sorted_active_accounts()),
        vec![manager.default_account_id(), feed.id]
    );
    assert!(vm.sorted_inactive_accounts().is_empty());
}

#[tokio::test]
async fn test_full_removal_flow() {
    let manager = test_manager().await;
    let feedly = manager
        .add_account(AccountType::Feedly, Some("Work"))
        .await
        .unwrap();
    let mut vm = AccountListViewModel::new(manager.clone());

    vm.stage_deletion(&feedly);
    let prompt = vm.deletion_prompt().unwrap();
    assert_eq!(prompt.message, FEEDLY_REMOVAL_MESSAGE);
    assert!(prompt.title.contains("Work"));

    let target = vm.confirm_deletion().unwrap();
    assert!(manager.delete_account(target.id).await.unwrap());
    assert_eq!(
        vm.next_notification().await,
        Some(AccountNotification::UserDidDeleteAccount)
    );
    vm.refresh();

    assert_eq!(ids(vm.sorted_active_accounts()), vec![manager.default_account_id()]);
    assert!(vm.accounts_for_deletion().is_empty());
    assert!(manager.account(feedly.id).is_none());
}

#[tokio::test]
async fn test_cancelled_removal_keeps_account() {
    let manager = test_manager().await;
    let bazqux = manager.add_account(AccountType::BazQux, None).await.unwrap();
    let mut vm = AccountListViewModel::new(manager.clone());
    let before = ids(vm.sorted_active_accounts());

    vm.stage_deletion(&bazqux);
    assert_eq!(vm.deletion_prompt().unwrap().message, GENERIC_REMOVAL_MESSAGE);
    vm.restore();

    assert_eq!(ids(vm.sorted_active_accounts()), before);
    assert!(manager.account(bazqux.id).is_some());
}

#[tokio::test]
async fn test_two_view_models_converge() {
    let manager = test_manager().await;
    let mut first = AccountListViewModel::new(manager.clone());
    let mut second = AccountListViewModel::new(manager.clone());

    let added = manager
        .add_account(AccountType::CloudKit, None)
        .await
        .unwrap();
    manager.rename(added.id, Some("Family")).await.unwrap();

    assert!(first.poll_notifications());
    assert!(second.poll_notifications());
    assert_eq!(first.sorted_active_accounts(), second.sorted_active_accounts());
    assert_eq!(
        first.sorted_active_accounts()[1].name_for_display(),
        "Family"
    );
}
