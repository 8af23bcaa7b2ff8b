use crate::app::App;
use crate::storage::Account;
use crate::util::{sanitize_line, truncate_to_width};
use crate::viewmodel::Section;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Render the active and inactive account sections stacked vertically.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let active = app.accounts.sorted_active_accounts();
    let inactive = app.accounts.sorted_inactive_accounts();

    // Active section grows with its rows; inactive keeps at least one visible
    let active_height = u16::try_from(active.len().max(1) + 2).unwrap_or(u16::MAX);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Max(active_height), Constraint::Min(3)])
        .split(area);

    render_section(f, app, chunks[0], Section::Active, active, 0);
    render_section(f, app, chunks[1], Section::Inactive, inactive, active.len());
}

fn render_section(
    f: &mut Frame,
    app: &App,
    area: Rect,
    section: Section,
    accounts: &[Account],
    first_row: usize,
) {
    let (label, empty) = match section {
        Section::Active => ("Active Accounts", "No active accounts"),
        Section::Inactive => ("Inactive Accounts", "No inactive accounts"),
    };

    // Borders and the leading icon take 4 columns
    let name_width = usize::from(area.width).saturating_sub(4);

    let items: Vec<ListItem> = if accounts.is_empty() {
        vec![ListItem::new(Span::styled(
            empty,
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        accounts
            .iter()
            .enumerate()
            .map(|(i, account)| {
                let name = sanitize_line(account.name_for_display());
                let marker = if app.accounts.is_default(account) {
                    " (default)"
                } else {
                    ""
                };
                let content = format!("{}{}", name, marker);
                let content = truncate_to_width(&content, name_width).into_owned();

                let style = if first_row + i == app.selected {
                    Style::default().bg(Color::DarkGray).fg(Color::White)
                } else if section == Section::Inactive {
                    Style::default().fg(Color::Gray)
                } else {
                    Style::default()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", account.account_type.icon()),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::styled(content, style),
                ]))
            })
            .collect()
    };

    let title = Span::styled(
        format!("{} ({})", label, accounts.len()),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(list, area);
}
