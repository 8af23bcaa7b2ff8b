use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else {
        Cow::Borrowed(hint(app))
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);

    let paragraph = Paragraph::new(text).style(style);
    f.render_widget(paragraph, area);
}

/// Keybinding hints for whichever overlay currently owns the keyboard.
fn hint(app: &App) -> &'static str {
    if app.accounts.show_account_deletion_alert() {
        "[y]es remove  [n]o / ESC cancel"
    } else if app.accounts.show_add_account_sheet {
        "[j/k] choose  ENTER add  ESC cancel"
    } else if let Some(inspector) = &app.inspector {
        if inspector.rename_input.is_some() {
            "Type a name | ENTER save | ESC cancel"
        } else {
            "[r]ename  ESC close"
        }
    } else if app.show_extensions {
        "[e] / ESC close extensions"
    } else {
        let toggle = app
            .selected_account()
            .map(|a| app.accounts.row_actions(a))
            .filter(|actions| actions.can_toggle_active);
        match toggle {
            Some(actions) if actions.toggle_label == "Activate" => {
                "[space] activate [d]elete [+]add [e]xtensions [?]help [q]uit"
            }
            Some(_) => "[space] deactivate [d]elete [+]add [e]xtensions [?]help [q]uit",
            None => "[ENTER] inspect [+]add [e]xtensions [?]help [q]uit",
        }
    }
}
