use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;

use crate::app::{AppState, FormState, InputMode, ModalState};
use crate::ui;

/// Drive the TUI until the operator quits.
///
/// The loop owns the redraw decision: a frame is drawn when a key or
/// resize arrives, or when the store reports a state change. The store's
/// settled effects are applied here, on this thread, once per tick.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
) -> Result<()> {
    let changes = app.store.subscribe();
    app.store.load_all();

    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|f| {
                ui::render(f, &mut app);
            })?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match app.input_mode {
                        InputMode::Normal => {
                            if handle_normal_key(&mut app, key.code) {
                                break;
                            }
                        }
                        InputMode::Modal => handle_modal_key(&mut app, key.code),
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        if app.store.pump() {
            app.clamp_selection();
        }
        while changes.try_recv().is_ok() {
            dirty = true;
        }
    }

    Ok(())
}

/// Handle a key press in normal mode. Returns true to quit.
fn handle_normal_key(app: &mut AppState, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('r') => app.store.load_all(),
        KeyCode::Up | KeyCode::Char('k') => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected_index + 1 < app.store.snapshot().users.len() {
                app.selected_index += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let rpp = app.rows_per_page.max(1);
            if app.selected_index >= rpp {
                app.selected_index -= rpp;
            } else {
                app.selected_index = 0;
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let rpp = app.rows_per_page.max(1);
            let new_idx = app.selected_index.saturating_add(rpp);
            app.selected_index = new_idx.min(app.store.snapshot().users.len().saturating_sub(1));
        }
        KeyCode::Char('n') => open_modal(app, ModalState::Form(FormState::blank())),
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some(user) = app.selected_user() {
                let form = FormState::seeded(user);
                open_modal(app, ModalState::Form(form));
            }
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            if let Some(user) = app.selected_user() {
                // Default to "No"; deletion needs a deliberate confirm.
                let id = user.id;
                open_modal(app, ModalState::DeleteConfirm { id, selected: 1 });
            }
        }
        KeyCode::Char('?') => open_modal(app, ModalState::Help),
        _ => {}
    }
    false
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    match &mut app.modal {
        Some(ModalState::Form(form)) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.prev(),
            KeyCode::Backspace => {
                form.focused_value_mut().pop();
            }
            KeyCode::Enter => {
                let draft = form.clone();
                submit_form(app, draft);
            }
            KeyCode::Char(c) => form.focused_value_mut().push(c),
            _ => {}
        },
        Some(ModalState::DeleteConfirm { id, selected }) => match code {
            KeyCode::Esc => close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                let (id, confirmed) = (*id, *selected == 0);
                if confirmed {
                    app.store.delete_by_id(id);
                }
                close_modal(app);
            }
            _ => {}
        },
        Some(ModalState::Help) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => close_modal(app),
            _ => {}
        },
        None => {}
    }
}

/// Dispatch a completed form: update when editing, append when adding.
/// The modal closes unconditionally once the draft passes the presence
/// check; with an empty field the focus jumps there instead.
fn submit_form(app: &mut AppState, form: FormState) {
    if let Some(field) = form.first_empty() {
        if let Some(ModalState::Form(open)) = &mut app.modal {
            open.focus = field;
        }
        return;
    }
    match form.editing {
        Some(id) => app.store.update_local(form.draft(id)),
        None => {
            let id = app.store.allocate_id();
            app.store.add_local(form.draft(id));
        }
    }
    close_modal(app);
}

fn open_modal(app: &mut AppState, modal: ModalState) {
    app.modal = Some(modal);
    app.input_mode = InputMode::Modal;
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}
