use crate::account::AccountRepository;
use crate::config::Config;
use crate::extension::{
    available_extension_points, ExtensionPoint, ExtensionPointInfo, RedditFeedProvider,
};
use crate::storage::{Account, AccountId, AccountType, Database};
use crate::viewmodel::AccountListViewModel;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Preference key holding the last selected account ID.
const SESSION_SELECTED_ACCOUNT: &str = "session.selected_account";

// ============================================================================
// Overlay State
// ============================================================================

/// State for the add-account sheet.
pub struct AddAccountSheet {
    /// Index into `AccountType::ALL`.
    pub selected: usize,
}

impl AddAccountSheet {
    pub fn selected_type(&self) -> AccountType {
        AccountType::ALL[self.selected.min(AccountType::ALL.len() - 1)]
    }
}

/// State for the account inspector overlay.
pub struct InspectorState {
    pub account_id: AccountId,
    /// `Some` while the user is typing a new name.
    pub rename_input: Option<String>,
}

/// One line in the extensions panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionRow {
    pub info: ExtensionPointInfo,
    /// Titles of enabled instances, e.g. `u/ferris`.
    pub instances: Vec<String>,
}

// ============================================================================
// Events
// ============================================================================

/// Events from background tasks
pub enum AppEvent {
    AccountAdded {
        id: AccountId,
        name: String,
    },
    /// Delete finished. `removed` is false when the account was already gone.
    AccountDeleted {
        id: AccountId,
        name: String,
        removed: bool,
    },
    AccountDeleteFailed {
        id: AccountId,
        error: String,
    },
    AccountToggled {
        name: String,
        active: bool,
    },
    AccountRenamed {
        name: String,
    },
    /// Add, toggle or rename failed.
    ///
    /// Fields:
    /// - `action`: What was attempted (e.g., "add", "toggle")
    /// - `error`: Description of the failure
    MutationFailed {
        action: &'static str,
        error: String,
    },
    /// A background task panicked.
    TaskPanicked {
        task: &'static str,
        error: String,
    },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub config: Config,

    /// Account lists and the staged-deletion flow.
    pub accounts: AccountListViewModel,

    /// Flat row index across the active and inactive sections.
    pub selected: usize,

    /// Cursor for the add-account sheet; visibility lives on the view model.
    pub add_sheet: AddAccountSheet,
    pub inspector: Option<InspectorState>,
    pub show_extensions: bool,
    pub show_help: bool,

    // Status message with expiry; Cow avoids allocation for static literals
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    status_timeout: Duration,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(db: Database, repo: Arc<dyn AccountRepository>, config: Config) -> Self {
        let status_timeout = Duration::from_secs(config.status_timeout_secs.max(1));
        Self {
            db,
            config,
            accounts: AccountListViewModel::new(repo),
            selected: 0,
            add_sheet: AddAccountSheet { selected: 0 },
            inspector: None,
            show_extensions: false,
            show_help: false,
            status_message: None,
            status_timeout,
            needs_redraw: true,
        }
    }

    pub fn repository(&self) -> Arc<dyn AccountRepository> {
        Arc::clone(self.accounts.repository())
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn selected_account(&self) -> Option<&Account> {
        self.accounts.row(self.selected).map(|(_, account)| account)
    }

    /// Keep the cursor inside the current row range.
    pub fn clamp_selection(&mut self) {
        let rows = self.accounts.row_count();
        self.selected = if rows == 0 {
            0
        } else {
            self.selected.min(rows - 1)
        };
    }

    /// Move the cursor onto `id` if it is displayed; otherwise just clamp.
    pub fn select_account(&mut self, id: AccountId) {
        if let Some(row) = self.accounts.row_of(id) {
            self.selected = row;
        }
        self.clamp_selection();
    }

    /// Account shown in the inspector, if it is still displayed.
    pub fn inspected_account(&self) -> Option<&Account> {
        let id = self.inspector.as_ref()?.account_id;
        let row = self.accounts.row_of(id)?;
        self.accounts.row(row).map(|(_, account)| account)
    }

    /// Refresh the view model and keep the cursor on the same account where possible.
    pub fn refresh_accounts(&mut self) {
        let current = self.selected_account().map(|a| a.id);
        self.accounts.refresh();
        self.accounts_changed(current);
    }

    /// Apply pending account notifications. Returns true if anything changed.
    pub fn poll_account_notifications(&mut self) -> bool {
        let current = self.selected_account().map(|a| a.id);
        if !self.accounts.poll_notifications() {
            return false;
        }
        self.accounts_changed(current);
        true
    }

    /// Re-anchor the cursor on `previous` and drop an inspector whose account
    /// is no longer displayed.
    fn accounts_changed(&mut self, previous: Option<AccountId>) {
        match previous {
            Some(id) => self.select_account(id),
            None => self.clamp_selection(),
        }
        if self.inspector.is_some() && self.inspected_account().is_none() {
            tracing::debug!("Inspected account disappeared, closing inspector");
            self.inspector = None;
        }
    }

    // ========================================================================
    // Extensions
    // ========================================================================

    /// Rows for the extensions panel: every offered type with its enabled instances.
    pub fn extension_rows(&self) -> Vec<ExtensionRow> {
        let reddit: Vec<String> = self
            .config
            .reddit_providers()
            .iter()
            .map(|p| p.title())
            .collect();

        available_extension_points(self.config.developer_build)
            .into_iter()
            .map(|info| {
                let instances = if info.title == RedditFeedProvider::TITLE {
                    reddit.clone()
                } else {
                    Vec::new()
                };
                ExtensionRow { info, instances }
            })
            .collect()
    }

    // ========================================================================
    // Status Bar
    // ========================================================================

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
        self.needs_redraw = true;
    }

    /// Drop the status message once it has expired. Returns true if cleared.
    pub fn clear_expired_status(&mut self) -> bool {
        match &self.status_message {
            Some((_, set_at)) if set_at.elapsed() >= self.status_timeout => {
                self.status_message = None;
                true
            }
            _ => false,
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Put the cursor back on the account selected when the app last quit.
    pub async fn restore_session(&mut self) {
        match self.db.get_preference(SESSION_SELECTED_ACCOUNT).await {
            Ok(Some(value)) => match value.parse::<i64>() {
                Ok(id) => self.select_account(AccountId(id)),
                Err(e) => {
                    tracing::warn!(value = %value, error = %e, "Discarding malformed session selection");
                    if let Err(e) = self.db.remove_preference(SESSION_SELECTED_ACCOUNT).await {
                        tracing::warn!(error = %e, "Failed to clear session selection");
                    }
                }
            },
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to load session selection"),
        }
    }

    pub async fn save_session(&self) {
        let Some(account) = self.selected_account() else {
            return;
        };
        if let Err(e) = self
            .db
            .set_preference(SESSION_SELECTED_ACCOUNT, &account.id.0.to_string())
            .await
        {
            tracing::warn!(error = %e, "Failed to save session selection");
        }
    }
}
