//! Application event handling.
//!
//! This module processes background task completion events. The account
//! lists themselves are refreshed by repository notifications; these handlers
//! report the outcome and adjust the selection.

use crate::app::{App, AppEvent};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::AccountAdded { id, name } => {
            app.poll_account_notifications();
            app.select_account(id);
            app.set_status(format!("Added {}", name));
        }
        AppEvent::AccountDeleted { id, name, removed } => {
            app.poll_account_notifications();
            if removed {
                tracing::info!(account_id = id.0, "Account removed");
                app.set_status(format!("Removed {}", name));
            } else {
                // Nothing was published, so prune the pending entry here
                app.refresh_accounts();
                app.set_status(format!("{} was already removed", name));
            }
        }
        AppEvent::AccountDeleteFailed { id, error } => {
            tracing::error!(account_id = id.0, error = %error, "Account deletion failed");
            app.accounts.deletion_failed(id);
            app.select_account(id);
            app.set_status(format!("Remove failed: {}", error));
        }
        AppEvent::AccountToggled { name, active } => {
            app.poll_account_notifications();
            let state = if active { "activated" } else { "deactivated" };
            app.set_status(format!("{} {}", name, state));
        }
        AppEvent::AccountRenamed { name } => {
            app.poll_account_notifications();
            app.set_status(format!("Renamed to {}", name));
        }
        AppEvent::MutationFailed { action, error } => {
            tracing::error!(action, error = %error, "Account mutation failed");
            app.set_status(format!("Failed to {}: {}", action, error));
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
        }
    }
    app.needs_redraw = true;
}
