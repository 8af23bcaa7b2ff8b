//! Property tests for the account list view model.
//!
//! Random sequences of repository mutations must always leave the active and
//! inactive lists as an exact partition of the repository's accounts.

use std::collections::BTreeSet;
use std::sync::Arc;

use feedkeeper::account::{AccountManager, AccountRepository};
use feedkeeper::storage::{Account, AccountId, AccountType, Database};
use feedkeeper::viewmodel::AccountListViewModel;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    Toggle(usize),
    Delete(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..AccountType::ALL.len()).prop_map(Op::Add),
        (0..16usize).prop_map(Op::Toggle),
        (0..16usize).prop_map(Op::Delete),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Apply `ops` to a fresh repository. Toggles and deletes pick a
/// non-default account by index, wrapping around.
async fn apply(ops: &[Op]) -> Arc<AccountManager> {
    let db = Database::open(":memory:").await.unwrap();
    let manager = Arc::new(AccountManager::load(db).await.unwrap());

    for op in ops {
        let others: Vec<_> = manager
            .sorted_accounts()
            .into_iter()
            .filter(|a| a.id != manager.default_account_id())
            .collect();
        match *op {
            Op::Add(i) => {
                manager.add_account(AccountType::ALL[i], None).await.unwrap();
            }
            Op::Toggle(i) if !others.is_empty() => {
                let account = &others[i % others.len()];
                manager
                    .set_active(account.id, !account.is_active)
                    .await
                    .unwrap();
            }
            Op::Delete(i) if !others.is_empty() => {
                let account = &others[i % others.len()];
                manager.delete_account(account.id).await.unwrap();
            }
            _ => {}
        }
    }
    manager
}

fn id_set<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> BTreeSet<AccountId> {
    accounts.into_iter().map(|a| a.id).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_refresh_partitions_accounts(ops in prop::collection::vec(arb_op(), 0..24)) {
        let rt = runtime();
        rt.block_on(async {
            let manager = apply(&ops).await;
            let mut vm = AccountListViewModel::new(manager.clone());
            vm.refresh();

            let all = manager.sorted_accounts();
            let active = vm.sorted_active_accounts();
            let inactive = vm.sorted_inactive_accounts();

            prop_assert_eq!(active.len() + inactive.len(), all.len());
            prop_assert!(active.iter().all(|a| a.is_active));
            prop_assert!(inactive.iter().all(|a| !a.is_active));
            prop_assert_eq!(id_set(active.iter().chain(inactive)), id_set(&all));
            prop_assert_eq!(active.first().map(|a| a.id), Some(manager.default_account_id()));
            Ok::<(), TestCaseError>(())
        })?;
    }

    #[test]
    fn prop_stage_then_restore_is_identity(
        ops in prop::collection::vec(arb_op(), 0..24),
        pick in 0..16usize,
    ) {
        let rt = runtime();
        rt.block_on(async {
            let manager = apply(&ops).await;
            let mut vm = AccountListViewModel::new(manager.clone());
            let active_before = id_set(vm.sorted_active_accounts());
            let inactive_before = id_set(vm.sorted_inactive_accounts());

            let all = manager.sorted_accounts();
            let target = &all[pick % all.len()];
            vm.stage_deletion(target);
            prop_assert!(vm.row_of(target.id).is_none());
            vm.restore();

            prop_assert_eq!(id_set(vm.sorted_active_accounts()), active_before);
            prop_assert_eq!(id_set(vm.sorted_inactive_accounts()), inactive_before);
            Ok::<(), TestCaseError>(())
        })?;
    }
}
