pub mod components;
pub mod dialogs;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)].as_ref())
        .split(root[1]);

    let prompt = match app.input_mode {
        InputMode::Normal | InputMode::Modal => String::new(),
        InputMode::Search => format!("  Search username: {}", app.search_query),
        InputMode::Lookup => format!("  Find on server: {}", app.lookup_query),
    };
    let header = Paragraph::new(format!(
        "usradmin-tui ({}){prompt}  — /: filter; f: find; n: new; e: edit; d: delete; r: refresh; 1-5: sort; q: quit",
        app.client.base_url()
    ))
    .block(
        Block::default()
            .title("usradmin-tui")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    table::render_users_table(f, body[0], app);
    table::render_user_details(f, body[1], app);

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match state {
            ModalState::Create { .. } | ModalState::Edit { .. } => {
                dialogs::render_form_modal(f, area, app, &state);
            }
            ModalState::DeleteConfirm { .. } => {
                dialogs::render_delete_modal(f, area, app, &state);
            }
            ModalState::Info { .. } => {
                components::render_info_modal(f, area, app, &state);
            }
        }
    }
}
