use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};

use crate::app::AppState;

/// Body of the screen: the users table, or whatever replaces it.
///
/// A load in flight replaces the table with a busy line; a failed load
/// replaces it with the error text. Error only shows once loading has
/// settled.
pub fn render_users_panel(f: &mut Frame, area: Rect, app: &mut AppState) {
    if app.store.snapshot().loading {
        render_loading(f, area, app);
        return;
    }
    if let Some(message) = app.store.snapshot().error.clone() {
        render_load_error(f, area, app, &message);
        return;
    }
    render_users_table(f, area, app);
}

fn render_loading(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new("Loading users from the directory…")
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

fn render_load_error(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let p = Paragraph::new(format!("Error: {message}\n\nPress r to retry."))
        .style(Style::default().fg(app.theme.error))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let users = &app.store.snapshot().users;
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(users.len());
    let slice = &users[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            // Positional row number, not the record id.
            Cell::from((absolute_index + 1).to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone.clone()),
            Cell::from(u.address.city.clone()),
            Cell::from(u.address.zipcode.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(22),
        Constraint::Percentage(26),
        Constraint::Percentage(20),
        Constraint::Percentage(18),
        Constraint::Length(11),
    ];

    let header = Row::new(vec!["#", "NAME", "EMAIL", "PHONE", "CITY", "ZIP"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}
