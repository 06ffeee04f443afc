//! Application state types and entry glue.
//!
//! Defines the structs and enums that model the TUI state, plus helpers to
//! construct them and to run the application loop (re-exported as `run`).

pub mod update;

use ratatui::style::Color;
use std::path::Path;
use std::sync::Arc;

use crate::api::{User, UserService};
use crate::store::UserStore;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
}

/// Fields of the user form, in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Email,
    Phone,
    City,
    Zipcode,
}

impl FormField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Email,
            Self::Email => Self::Phone,
            Self::Phone => Self::City,
            Self::City => Self::Zipcode,
            Self::Zipcode => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Zipcode,
            Self::Email => Self::Name,
            Self::Phone => Self::Email,
            Self::City => Self::Phone,
            Self::Zipcode => Self::City,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::City => "City",
            Self::Zipcode => "Zip code",
        }
    }
}

/// Draft record behind the add/edit modal.
///
/// Seeded from an existing user when editing, blank otherwise. The draft
/// lives and dies with the modal; closing it discards every keystroke.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    /// Id of the user being edited; `None` while adding.
    pub editing: Option<u64>,
    pub focus: FormField,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub zipcode: String,
}

impl FormState {
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn seeded(user: &User) -> Self {
        Self {
            editing: Some(user.id),
            focus: FormField::default(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            city: user.address.city.clone(),
            zipcode: user.address.zipcode.clone(),
        }
    }

    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
            FormField::City => &mut self.city,
            FormField::Zipcode => &mut self.zipcode,
        }
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
            FormField::City => &self.city,
            FormField::Zipcode => &self.zipcode,
        }
    }

    /// Presence check: the first field still empty, if any.
    pub fn first_empty(&self) -> Option<FormField> {
        let mut field = FormField::default();
        loop {
            if self.value(field).is_empty() {
                return Some(field);
            }
            field = field.next();
            if field == FormField::default() {
                return None;
            }
        }
    }

    /// Assemble the draft into a full record under `id`. City and zipcode
    /// are written into one `Address` together, whatever order they were
    /// typed in.
    pub fn draft(&self, id: u64) -> User {
        User {
            id,
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: crate::api::Address {
                city: self.city.clone(),
                zipcode: self.zipcode.clone(),
            },
        }
    }
}

/// Modal dialog states.
#[derive(Clone, Debug)]
pub enum ModalState {
    Form(FormState),
    DeleteConfirm { id: u64, selected: usize },
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    #[allow(dead_code)]
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Load overrides from a simple key=value file on top of `mocha`.
    /// Unknown keys and unparsable values are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            let Some(color) = Self::parse_color(val.trim()) else {
                continue;
            };
            match key.trim() {
                "text" => theme.text = color,
                "title" => theme.title = color,
                "border" => theme.border = color,
                "header_bg" => theme.header_bg = color,
                "header_fg" => theme.header_fg = color,
                "status_bg" => theme.status_bg = color,
                "status_fg" => theme.status_fg = color,
                "highlight_fg" => theme.highlight_fg = color,
                "error" => theme.error = color,
                _ => {}
            }
        }
        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the name "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Color::Rgb(r, g, b))
    }
}

pub struct AppState {
    pub store: UserStore,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub base_url: String,
}

impl AppState {
    pub fn new(service: Arc<dyn UserService>, theme: Theme, base_url: String) -> Self {
        Self {
            store: UserStore::new(service),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            modal: None,
            theme,
            base_url,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.store.snapshot().users.get(self.selected_index)
    }

    /// Keep the selection inside the list after loads and deletes.
    pub fn clamp_selection(&mut self) {
        let len = self.store.snapshot().users.len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
