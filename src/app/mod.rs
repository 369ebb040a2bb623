//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state and re-exports
//! the event loop entry point as `run`.

pub mod form;
pub mod update;

use ratatui::style::Color;
use tracing::warn;

use crate::api::{ApiClient, User};
use crate::view;
use form::UserForm;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the local username filter.
    Search,
    /// Typing a username for a server-side lookup.
    Lookup,
    Modal,
}

/// Sortable table columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SortColumn {
    Username,
    Fullname,
    Role,
    Project,
    Active,
}

/// Single-column sort: activating a column replaces the previous spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub desc: bool,
}

/// Pagination over the filtered list: fixed page size, zero-based index.
#[derive(Copy, Clone, Debug)]
pub struct Paging {
    pub index: usize,
    pub size: usize,
}

impl Paging {
    pub fn new(size: usize) -> Self {
        Self {
            index: 0,
            size: size.max(1),
        }
    }
}

/// Modal dialog states for user actions.
#[derive(Clone, Debug)]
pub enum ModalState {
    Create {
        form: UserForm,
    },
    /// The draft is captured once when the dialog opens; later changes to
    /// the canonical record do not reseed it.
    Edit {
        user_id: u64,
        form: UserForm,
    },
    DeleteConfirm {
        user_id: u64,
        username: String,
        selected: usize,
        error: Option<String>,
    },
    Info {
        message: String,
    },
}

/// Color palette for theming the TUI, loaded from `theme.conf`.
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
    pub highlight_bg: Color,
    pub error_fg: Color,
}

const THEME_TEMPLATE: &str = "\
# usradmin-tui theme configuration
# Colors: hex as #RRGGBB or RRGGBB, or 'reset'
text = #CDD6F4
title = #CBA6F7
border = #585B70
header_bg = #313244
header_fg = #B4BEFE
status_bg = #45475A
status_fg = #CDD6F4
highlight_fg = #F9E2AF
highlight_bg = #45475A
error_fg = #F38BA8
";

impl Theme {
    /// Catppuccin Mocha defaults.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),
        }
    }

    /// Load from a simple key=value file. Unknown or missing keys keep the
    /// `mocha` defaults.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(str::trim).unwrap_or("");
            let val = parts.next().map(str::trim).unwrap_or("");
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "error_fg" => theme.error_fg = color,
                    _ => {}
                }
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
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Some(Color::Rgb(r, g, b));
        }
        None
    }

    /// Load the theme from `path`, writing the default template first when
    /// the file does not exist yet.
    pub fn load_or_init(path: &str) -> Self {
        if !std::path::Path::new(path).exists() {
            let _ = std::fs::write(path, THEME_TEMPLATE);
        }
        Self::from_file(path).unwrap_or_else(Self::mocha)
    }
}

pub struct AppState {
    /// Canonical full list, fetched once and spliced optimistically.
    pub users_all: Vec<User>,
    /// Displayed subset: filtered, sorted, and sliced to the current page.
    pub users: Vec<User>,
    /// Length of the filtered list before pagination.
    pub filtered_len: usize,
    pub search_query: String,
    pub lookup_query: String,
    pub selected_index: usize,
    pub sort: Option<SortSpec>,
    pub page: Paging,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub status: Option<String>,
    pub client: ApiClient,
}

impl AppState {
    /// Create a new `AppState`, fetching the canonical list from the user
    /// service once. A failed fetch is logged and leaves the list empty.
    pub fn new(client: ApiClient, page_size: usize) -> Self {
        let users_all = match client.list_users() {
            Ok(users) => users,
            Err(err) => {
                warn!("initial fetch failed: {err}");
                Vec::new()
            }
        };
        let mut app = Self {
            users: Vec::new(),
            filtered_len: 0,
            users_all,
            search_query: String::new(),
            lookup_query: String::new(),
            selected_index: 0,
            sort: None,
            page: Paging::new(page_size),
            input_mode: InputMode::Normal,
            modal: None,
            theme: Theme::load_or_init("theme.conf"),
            status: None,
            client,
        };
        view::refresh(&mut app);
        app
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_index)
    }

    /// Toggle sorting on a column. Activating a column sets descending to
    /// the negation of "that column is currently active and descending", so
    /// a double toggle is idempotent.
    pub fn toggle_sort(&mut self, column: SortColumn) {
        let is_desc = matches!(self.sort, Some(s) if s.column == column && s.desc);
        self.sort = Some(SortSpec {
            column,
            desc: !is_desc,
        });
    }

    /// Optimistic splice after a successful create: append, no re-fetch.
    pub fn apply_created(&mut self, user: User) {
        self.users_all.push(user);
    }

    /// Optimistic splice after a successful update: replace by id.
    pub fn apply_updated(&mut self, updated: User) {
        if let Some(existing) = self.users_all.iter_mut().find(|u| u.id == updated.id) {
            *existing = updated;
        }
    }

    /// Optimistic splice after a successful delete: remove by id.
    pub fn remove_user(&mut self, id: u64) {
        self.users_all.retain(|u| u.id != id);
    }

    pub fn page_count(&self) -> usize {
        self.filtered_len.div_ceil(self.page.size).max(1)
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
