//! Shared UI components (status bar, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, ModalState};

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "MODAL",
    };
    let snap = app.store.snapshot();
    let state = if snap.loading {
        "  state:[loading]"
    } else if snap.error.is_some() {
        "  state:[error]"
    } else {
        ""
    };
    let msg = format!(
        "mode: {mode}  users:{}  rows/page:{}{}",
        snap.users.len(),
        app.rows_per_page,
        state
    );
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the delete confirmation dialog.
pub fn render_confirm_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm { id, selected } = state {
        let rect = centered_rect(50, 7, area);
        let name = app
            .store
            .snapshot()
            .users
            .iter()
            .find(|u| u.id == *id)
            .map(|u| u.name.clone())
            .unwrap_or_default();
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No  " };
        let body = format!("Delete user '{name}'?\n\n  {yes}    {no}");
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Confirm delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal with key tips.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 60u16.min(area.width.saturating_sub(4)).max(44);
    let height = 14u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let mut lines: Vec<Line> = Vec::new();
    for (label, keys) in [
        ("Move selection", "Arrow keys / j k"),
        ("Jump by page", "Left Right / h l"),
        ("Add user", "n"),
        ("Edit selected", "Enter / e"),
        ("Delete selected", "d / Delete"),
        ("Reload from service", "r"),
        ("Quit", "q"),
        ("Close this help", "Esc / Enter"),
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
