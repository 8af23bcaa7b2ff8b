//! Help overlay listing every keybinding.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Row, Table},
    Frame,
};

/// Key groups shown in the help table.
const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Accounts",
        &[
            ("j / k", "Move down / up"),
            ("g / G", "First / last account"),
            ("Space / t", "Activate or deactivate"),
            ("d / Del", "Remove account"),
            ("Enter", "Inspect account"),
            ("+ / a", "Add account"),
            ("R", "Reload lists"),
        ],
    ),
    (
        "Remove Prompt",
        &[("y / Enter", "Remove account"), ("n / Esc", "Keep account")],
    ),
    (
        "Inspector",
        &[("r", "Rename"), ("Enter", "Save name"), ("Esc", "Close")],
    ),
    (
        "General",
        &[("e", "Extensions"), ("?", "Toggle help"), ("q", "Quit")],
    ),
];

/// Render the help overlay on top of the current view.
pub fn render(f: &mut Frame) {
    let overlay = centered_rect(70, 80, f.area());
    if overlay.width < 20 || overlay.height < 6 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut rows: Vec<Row> = Vec::new();
    for (label, bindings) in SECTIONS {
        rows.push(Row::new(vec![
            Line::from(Span::styled(
                format!("-- {} --", label),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ]));
        for (key, description) in bindings {
            rows.push(Row::new(vec![format!("  {}", key), description.to_string()]));
        }
        rows.push(Row::new(vec![String::new(), String::new()]));
    }
    rows.pop();

    let widths = [Constraint::Length(16), Constraint::Min(20)];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (? to close) "),
        )
        .header(
            Row::new(vec!["Key", "Action"])
                .style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::UNDERLINED),
                )
                .bottom_margin(1),
        );

    f.render_widget(table, overlay);
}

/// Create a centered rectangle with the given percentage of the parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let scale = |len: u16, percent: u16| (u32::from(len) * u32::from(percent) / 100) as u16;
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
