//! Background task helpers.
//!
//! Every repository mutation runs on its own task so the event loop never
//! waits on SQLite. Results come back as [`AppEvent`]s; the repository's
//! notifications refresh the lists independently.

use crate::app::{App, AppEvent};
use crate::storage::{Account, AccountId, AccountType};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Wraps a future to catch panics and convert them to errors.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}

/// Run `work` on a background task and forward its event to the UI.
///
/// A panic inside `work` is reported as [`AppEvent::TaskPanicked`].
fn spawn_task<Fut>(task: &'static str, event_tx: &mpsc::Sender<AppEvent>, work: Fut)
where
    Fut: Future<Output = AppEvent> + Send + 'static,
{
    let tx = event_tx.clone();
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task,
                    error: panic_msg,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    });
}

/// Permanently delete an account confirmed through the removal prompt.
pub(super) fn spawn_delete(app: &mut App, account: Account, event_tx: &mpsc::Sender<AppEvent>) {
    let name = account.name_for_display().to_string();
    app.set_status(format!("Removing {}...", name));

    let repo = app.repository();
    let id = account.id;
    spawn_task("delete_account", event_tx, async move {
        match repo.delete_account(id).await {
            Ok(removed) => AppEvent::AccountDeleted { id, name, removed },
            Err(e) => {
                tracing::error!(account_id = id.0, error = %e, "Failed to delete account");
                AppEvent::AccountDeleteFailed {
                    id,
                    error: e.to_string(),
                }
            }
        }
    });
}

pub(super) fn spawn_toggle_active(app: &App, account: &Account, event_tx: &mpsc::Sender<AppEvent>) {
    let repo = app.repository();
    let id = account.id;
    let active = !account.is_active;
    let name = account.name_for_display().to_string();
    spawn_task("toggle_active", event_tx, async move {
        match repo.set_active(id, active).await {
            Ok(()) => AppEvent::AccountToggled { name, active },
            Err(e) => AppEvent::MutationFailed {
                action: "change account state",
                error: e.to_string(),
            },
        }
    });
}

pub(super) fn spawn_add(app: &mut App, account_type: AccountType, event_tx: &mpsc::Sender<AppEvent>) {
    app.set_status(format!("Adding {}...", account_type));

    let repo = app.repository();
    spawn_task("add_account", event_tx, async move {
        match repo.add_account(account_type, None).await {
            Ok(account) => AppEvent::AccountAdded {
                id: account.id,
                name: account.name_for_display().to_string(),
            },
            Err(e) => AppEvent::MutationFailed {
                action: "add account",
                error: e.to_string(),
            },
        }
    });
}

pub(super) fn spawn_rename(
    app: &App,
    id: AccountId,
    name: String,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let repo = app.repository();
    spawn_task("rename_account", event_tx, async move {
        let requested = Some(name.as_str()).filter(|n| !n.trim().is_empty());
        match repo.rename(id, requested).await {
            Ok(()) => AppEvent::AccountRenamed {
                name: requested.map(str::trim).unwrap_or("default name").to_string(),
            },
            Err(e) => AppEvent::MutationFailed {
                action: "rename account",
                error: e.to_string(),
            },
        }
    });
}
