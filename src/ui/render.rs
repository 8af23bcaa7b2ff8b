//! Render functions for the TUI.
//!
//! Draws the account sections and status bar, then any overlay on top.

use crate::app::App;
use crate::storage::{Account, AccountType};
use crate::util::sanitize_line;
use crate::viewmodel::DeletionPrompt;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use super::{accounts, extensions, help, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 50;
pub(super) const MIN_HEIGHT: u16 = 10;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    render_main_panels(f, app, chunks[0]);
    status::render(f, app, chunks[1]);

    if app.show_help {
        help::render(f);
    }

    if let Some(prompt) = app.accounts.deletion_prompt() {
        render_confirm_overlay(f, &prompt);
    }

    if app.accounts.show_add_account_sheet {
        render_add_sheet_overlay(f, app);
    }

    if let Some(account) = app.inspected_account() {
        let rename_input = app
            .inspector
            .as_ref()
            .and_then(|i| i.rename_input.as_deref());
        render_inspector_overlay(f, app, account, rename_input);
    }
}

/// Accounts on the left; the extensions panel takes the right side when open.
fn render_main_panels(f: &mut Frame, app: &App, area: Rect) {
    if app.show_extensions {
        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(area);

        accounts::render(f, app, main_chunks[0]);
        extensions::render(f, app, main_chunks[1]);
    } else {
        accounts::render(f, app, area);
    }
}

/// Fixed-size rectangle centered in `area`, clipped to leave a margin.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
}

/// Render the removal confirmation prompt centered on screen.
fn render_confirm_overlay(f: &mut Frame, prompt: &DeletionPrompt) {
    let overlay = centered_fixed(60, 9, f.area());
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let text = vec![
        Line::from(Span::styled(
            sanitize_line(&prompt.title).into_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(prompt.message),
        Line::from(""),
        Line::from(Span::styled(
            "(y) Remove Account  (n/Esc) Cancel",
            Style::default().fg(Color::Red),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(overlay_block(" Remove Account "))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, overlay);
}

/// Render the account type picker.
fn render_add_sheet_overlay(f: &mut Frame, app: &App) {
    let rows = u16::try_from(AccountType::ALL.len()).unwrap_or(u16::MAX);
    let overlay = centered_fixed(36, rows.saturating_add(4), f.area());
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let items: Vec<ListItem> = AccountType::ALL
        .iter()
        .enumerate()
        .map(|(i, account_type)| {
            let style = if i == app.add_sheet.selected {
                Style::default().bg(Color::DarkGray).fg(Color::White)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", account_type.icon())),
                Span::styled(account_type.default_name(), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(overlay_block(" Add Account (Enter/Esc) "));
    f.render_widget(list, overlay);
}

/// Render account details, or the rename field while editing.
fn render_inspector_overlay(
    f: &mut Frame,
    app: &App,
    account: &Account,
    rename_input: Option<&str>,
) {
    let overlay = centered_fixed(50, 10, f.area());
    if overlay.width < 10 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let label = Style::default().fg(Color::Gray);
    let state = if account.is_active { "Active" } else { "Inactive" };
    let created = chrono::DateTime::from_timestamp(account.created_at, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    let name_line = match rename_input {
        Some(input) => Line::from(vec![
            Span::styled("Name:    ", label),
            Span::styled(
                format!("{}_", sanitize_line(input)),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        None => Line::from(vec![
            Span::styled("Name:    ", label),
            Span::raw(sanitize_line(account.name_for_display()).into_owned()),
        ]),
    };

    let mut text = vec![
        name_line,
        Line::from(vec![
            Span::styled("Type:    ", label),
            Span::raw(account.account_type.default_name()),
        ]),
        Line::from(vec![Span::styled("State:   ", label), Span::raw(state)]),
        Line::from(vec![Span::styled("Created: ", label), Span::raw(created)]),
    ];
    if app.accounts.is_default(account) {
        text.push(Line::from(Span::styled(
            "Built-in account; cannot be removed",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(text).block(overlay_block(" Account "));
    f.render_widget(paragraph, overlay);
}
