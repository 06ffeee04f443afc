use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{AppState, FormField, FormState};

/// Render the add/edit modal over the list.
pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, form: &FormState) {
    let width = 56u16.min(area.width.saturating_sub(4)).max(40);
    let height = 10u16;
    let rect = crate::ui::components::centered_rect(width, height, area);

    let title = if form.editing.is_some() {
        "Edit user"
    } else {
        "Add user"
    };

    let mut lines: Vec<Line> = Vec::new();
    let mut field = FormField::default();
    loop {
        let marker = if field == form.focus { "▶ " } else { "  " };
        let focused = field == form.focus;
        let value_style = if focused {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{}{:<9}", marker, field.label())),
            Span::styled(form.value(field).to_string(), value_style),
        ]));
        field = field.next();
        if field == FormField::default() {
            break;
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Enter: save   Tab: next field   Esc: cancel",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
