//! Input handling for the TUI.
//!
//! Overlays capture all keys while visible, in this order: help, removal
//! prompt, add sheet, inspector, extensions panel. Otherwise keys act on the
//! account list.

use crate::app::{App, AppEvent, InspectorState};
use crate::storage::AccountType;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{spawn_add, spawn_delete, spawn_rename, spawn_toggle_active};
use super::Action;

/// Longest display name accepted from the rename field.
const MAX_NAME_LENGTH: usize = 128;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    if app.show_help {
        return Ok(handle_help_input(app, code));
    }

    if app.accounts.show_account_deletion_alert() {
        return Ok(handle_confirm_input(app, code, event_tx));
    }

    if app.accounts.show_add_account_sheet {
        return Ok(handle_add_sheet_input(app, code, event_tx));
    }

    if app.inspector.is_some() {
        return Ok(handle_inspector_input(app, code, event_tx));
    }

    if app.show_extensions {
        return Ok(handle_extensions_input(app, code));
    }

    Ok(handle_list_input(app, code, modifiers, event_tx))
}

fn handle_help_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')
    ) {
        app.show_help = false;
    }
    Action::Continue
}

/// Removal prompt: `y`/Enter deletes, `n`/Esc puts the account back.
fn handle_confirm_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            if let Some(account) = app.accounts.confirm_deletion() {
                spawn_delete(app, account, event_tx);
            }
            app.clamp_selection();
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            let staged = app.accounts.account_to_delete().map(|a| a.id);
            app.accounts.restore();
            if let Some(id) = staged {
                app.select_account(id);
            }
            app.set_status("Cancelled");
        }
        _ => {}
    }
    Action::Continue
}

fn handle_add_sheet_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.add_sheet.selected + 1 < AccountType::ALL.len() {
                app.add_sheet.selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.add_sheet.selected = app.add_sheet.selected.saturating_sub(1);
        }
        KeyCode::Enter => {
            let account_type = app.add_sheet.selected_type();
            app.accounts.show_add_account_sheet = false;
            spawn_add(app, account_type, event_tx);
        }
        KeyCode::Esc | KeyCode::Char('q') => {
            app.accounts.show_add_account_sheet = false;
        }
        _ => {}
    }
    Action::Continue
}

fn handle_inspector_input(
    app: &mut App,
    code: KeyCode,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    // Take ownership temporarily to match on state
    let Some(mut inspector) = app.inspector.take() else {
        return Action::Continue;
    };

    match inspector.rename_input.take() {
        Some(mut input) => match code {
            KeyCode::Char(c) => {
                if input.chars().count() < MAX_NAME_LENGTH {
                    input.push(c);
                }
                inspector.rename_input = Some(input);
            }
            KeyCode::Backspace => {
                input.pop();
                inspector.rename_input = Some(input);
            }
            KeyCode::Enter => {
                spawn_rename(app, inspector.account_id, input, event_tx);
            }
            KeyCode::Esc => {
                // Abandon the edit; rename_input is already None from take()
            }
            _ => inspector.rename_input = Some(input),
        },
        None => match code {
            KeyCode::Char('r') => {
                // The inspector is taken out of `app`, so look the account up by id
                let current = app
                    .accounts
                    .row_of(inspector.account_id)
                    .and_then(|row| app.accounts.row(row))
                    .and_then(|(_, account)| account.name.clone())
                    .unwrap_or_default();
                inspector.rename_input = Some(current);
            }
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => return Action::Continue,
            _ => {}
        },
    }

    app.inspector = Some(inspector);
    Action::Continue
}

fn handle_extensions_input(app: &mut App, code: KeyCode) -> Action {
    if matches!(
        code,
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e')
    ) {
        app.show_extensions = false;
    }
    Action::Continue
}

/// Keys on the account list itself.
fn handle_list_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => {
            if app.selected + 1 < app.accounts.row_count() {
                app.selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.selected = app.selected.saturating_sub(1);
        }
        KeyCode::Char('g') | KeyCode::Home => app.selected = 0,
        KeyCode::Char('G') | KeyCode::End => {
            app.selected = app.accounts.row_count().saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Char('t') => {
            let Some(account) = app.selected_account().cloned() else {
                return Action::Continue;
            };
            if app.accounts.row_actions(&account).can_toggle_active {
                spawn_toggle_active(app, &account, event_tx);
            } else {
                app.set_status("The default account is always active");
            }
        }
        KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Delete => {
            let Some(account) = app.selected_account().cloned() else {
                return Action::Continue;
            };
            if app.accounts.row_actions(&account).can_remove {
                app.accounts.stage_deletion(&account);
                app.clamp_selection();
            } else {
                app.set_status("The default account cannot be removed");
            }
        }
        KeyCode::Enter => {
            if let Some(account) = app.selected_account() {
                app.inspector = Some(InspectorState {
                    account_id: account.id,
                    rename_input: None,
                });
            }
        }
        KeyCode::Char('+') | KeyCode::Char('a') => {
            app.add_sheet.selected = 0;
            app.accounts.show_add_account_sheet = true;
        }
        KeyCode::Char('e') => app.show_extensions = true,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('R') => {
            app.refresh_accounts();
            app.set_status("Refreshed");
        }
        _ => {}
    }
    Action::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::{AccountManager, AccountRepository};
    use crate::config::Config;
    use crate::storage::{Account, Database};
    use std::sync::Arc;

    async fn test_app() -> (App, Arc<AccountManager>, Account) {
        let db = Database::open(":memory:").await.unwrap();
        let repo = Arc::new(AccountManager::load(db.clone()).await.unwrap());
        let bravo = repo
            .add_account(AccountType::Feedbin, Some("Bravo"))
            .await
            .unwrap();
        let app = App::new(db, repo.clone(), Config::default());
        (app, repo, bravo)
    }

    fn press(app: &mut App, code: KeyCode, tx: &mpsc::Sender<AppEvent>) -> Action {
        handle_input(app, code, KeyModifiers::NONE, tx).unwrap()
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _repo, _bravo) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        assert_eq!(press(&mut app, KeyCode::Char('q'), &tx), Action::Quit);
        assert_eq!(
            handle_input(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL, &tx).unwrap(),
            Action::Quit
        );
    }

    #[tokio::test]
    async fn test_navigation_stays_in_range() {
        let (mut app, _repo, _bravo) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        press(&mut app, KeyCode::Char('k'), &tx);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Char('j'), &tx);
        press(&mut app, KeyCode::Char('j'), &tx);
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Char('g'), &tx);
        assert_eq!(app.selected, 0);
        press(&mut app, KeyCode::Char('G'), &tx);
        assert_eq!(app.selected, 1);
    }

    #[tokio::test]
    async fn test_delete_then_cancel_restores_row() {
        let (mut app, _repo, bravo) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.select_account(bravo.id);

        press(&mut app, KeyCode::Char('d'), &tx);
        assert!(app.accounts.show_account_deletion_alert());
        assert_eq!(app.accounts.row_of(bravo.id), None);

        // Navigation keys are captured by the prompt
        press(&mut app, KeyCode::Char('q'), &tx);
        assert!(app.accounts.show_account_deletion_alert());

        press(&mut app, KeyCode::Esc, &tx);
        assert!(!app.accounts.show_account_deletion_alert());
        assert_eq!(app.selected_account().map(|a| a.id), Some(bravo.id));
    }

    #[tokio::test]
    async fn test_delete_confirm_removes_account() {
        let (mut app, repo, bravo) = test_app().await;
        let (tx, mut rx) = mpsc::channel(8);
        app.select_account(bravo.id);

        press(&mut app, KeyCode::Char('d'), &tx);
        press(&mut app, KeyCode::Char('y'), &tx);
        assert_eq!(app.accounts.accounts_for_deletion().len(), 1);

        match rx.recv().await {
            Some(AppEvent::AccountDeleted { id, removed, .. }) => {
                assert_eq!(id, bravo.id);
                assert!(removed);
            }
            _ => panic!("expected AccountDeleted"),
        }
        assert!(repo.account(bravo.id).is_none());
        assert!(app.poll_account_notifications());
        assert!(app.accounts.accounts_for_deletion().is_empty());
    }

    #[tokio::test]
    async fn test_default_account_protected_from_keys() {
        let (mut app, repo, _bravo) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.select_account(repo.default_account_id());

        press(&mut app, KeyCode::Char('d'), &tx);
        assert!(!app.accounts.show_account_deletion_alert());
        press(&mut app, KeyCode::Char(' '), &tx);
        assert!(app.status_message.is_some());
        assert!(repo.account(repo.default_account_id()).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_toggle_spawns_task() {
        let (mut app, repo, bravo) = test_app().await;
        let (tx, mut rx) = mpsc::channel(8);
        app.select_account(bravo.id);

        press(&mut app, KeyCode::Char('t'), &tx);
        match rx.recv().await {
            Some(AppEvent::AccountToggled { active, .. }) => assert!(!active),
            _ => panic!("expected AccountToggled"),
        }
        assert!(!repo.account(bravo.id).unwrap().is_active);
    }

    #[tokio::test]
    async fn test_add_sheet_adds_selected_type() {
        let (mut app, repo, _bravo) = test_app().await;
        let (tx, mut rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('+'), &tx);
        assert!(app.accounts.show_add_account_sheet);
        press(&mut app, KeyCode::Char('j'), &tx);
        let expected = AccountType::ALL[1];
        press(&mut app, KeyCode::Enter, &tx);
        assert!(!app.accounts.show_add_account_sheet);

        match rx.recv().await {
            Some(AppEvent::AccountAdded { id, .. }) => {
                assert_eq!(repo.account(id).map(|a| a.account_type), Some(expected));
            }
            _ => panic!("expected AccountAdded"),
        }
    }

    #[tokio::test]
    async fn test_inspector_rename() {
        let (mut app, repo, bravo) = test_app().await;
        let (tx, mut rx) = mpsc::channel(8);
        app.select_account(bravo.id);

        press(&mut app, KeyCode::Enter, &tx);
        assert!(app.inspector.is_some());
        press(&mut app, KeyCode::Char('r'), &tx);
        assert_eq!(
            app.inspector.as_ref().and_then(|i| i.rename_input.as_deref()),
            Some("Bravo")
        );
        for _ in 0.."Bravo".len() {
            press(&mut app, KeyCode::Backspace, &tx);
        }
        for c in "Work".chars() {
            press(&mut app, KeyCode::Char(c), &tx);
        }
        press(&mut app, KeyCode::Enter, &tx);

        assert!(matches!(rx.recv().await, Some(AppEvent::AccountRenamed { .. })));
        assert_eq!(repo.account(bravo.id).unwrap().name_for_display(), "Work");

        press(&mut app, KeyCode::Esc, &tx);
        assert!(app.inspector.is_none());
    }

    #[tokio::test]
    async fn test_rename_without_edits_keeps_name() {
        let (mut app, repo, bravo) = test_app().await;
        let (tx, mut rx) = mpsc::channel(8);
        app.select_account(bravo.id);

        press(&mut app, KeyCode::Enter, &tx);
        press(&mut app, KeyCode::Char('r'), &tx);
        press(&mut app, KeyCode::Enter, &tx);

        assert!(matches!(rx.recv().await, Some(AppEvent::AccountRenamed { .. })));
        assert_eq!(repo.account(bravo.id).unwrap().name.as_deref(), Some("Bravo"));
    }

    #[tokio::test]
    async fn test_help_overlay_captures_keys() {
        let (mut app, _repo, _bravo) = test_app().await;
        let (tx, _rx) = mpsc::channel(8);

        press(&mut app, KeyCode::Char('?'), &tx);
        assert!(app.show_help);
        assert_eq!(press(&mut app, KeyCode::Char('q'), &tx), Action::Continue);
        assert!(!app.show_help);
    }
}
