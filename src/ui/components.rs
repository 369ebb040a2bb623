//! Shared UI components (status bar, modal helpers).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, InputMode, ModalState};

/// Render the bottom status bar with mode, counts, page, and sort state.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Lookup => "LOOKUP",
        InputMode::Modal => "MODAL",
    };
    let sort = match app.sort {
        Some(s) => format!("  sort:{:?}{}", s.column, if s.desc { "▼" } else { "▲" }),
        None => String::new(),
    };
    let filter = if app.search_query.trim().is_empty() {
        String::new()
    } else {
        format!("  filter:'{}'", app.search_query)
    };
    let status = app
        .status
        .as_deref()
        .map(|s| format!("  — {s}"))
        .unwrap_or_default();
    let msg = format!(
        "mode: {mode}  users:{}/{}  page:{}/{}{sort}{filter}{status}",
        app.users.len(),
        app.users_all.len(),
        app.page.index + 1,
        app.page_count(),
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

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 46u16.min(max_w);
        let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
        let height = (approx_lines + 4).min(area.height.saturating_sub(4).max(5)).max(5);
        let rect = centered_rect(width, height, area);
        let p = Paragraph::new(message.clone()).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
