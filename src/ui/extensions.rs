use crate::app::App;
use crate::util::sanitize_line;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the extension points panel
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let rows = app.extension_rows();

    let mut lines: Vec<Line> = Vec::new();
    if rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "No extensions available in this build",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for row in &rows {
        let mut heading = vec![Span::styled(
            row.info.title,
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if row.info.is_developer_build_restricted {
            heading.push(Span::styled(
                "  [developer]",
                Style::default().fg(Color::Yellow),
            ));
        }
        lines.push(Line::from(heading));
        lines.push(Line::from(row.info.description.as_str()));

        if row.instances.is_empty() {
            lines.push(Line::from(Span::styled(
                "  Not enabled",
                Style::default().fg(Color::DarkGray),
            )));
        }
        for title in &row.instances {
            lines.push(Line::from(format!("  • {}", sanitize_line(title))));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Extensions "),
        );

    f.render_widget(paragraph, area);
}
