use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::form::{FormField, UserForm};
use crate::app::{AppState, ModalState};
use crate::ui::components::centered_rect;

/// Render the create/edit form dialog with per-field focus markers and the
/// pending error, if any, under the offending field.
pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let (title, form) = match state {
        ModalState::Create { form } => ("Create User", form),
        ModalState::Edit { form, .. } => ("Edit User", form),
        _ => return,
    };

    let rect = centered_rect(52, 12, area);
    let mut lines = form_lines(app, form);
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Tab: next field  Space: toggle active  Enter: save  Esc: cancel",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

fn form_lines(app: &AppState, form: &UserForm) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for field in form.fields() {
        let marker = if *field == form.focus { "▶ " } else { "  " };
        let locked = *field == FormField::Username && form.username_locked();
        let suffix = if locked { " (fixed)" } else { "" };
        let style = if locked {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}: {}{suffix}", field.label(), form.field_value(*field)),
            style,
        )));
        if let Some((errored, message)) = &form.error
            && errored == field
        {
            lines.push(Line::from(Span::styled(
                format!("    {message}"),
                Style::default().fg(app.theme.error_fg),
            )));
        }
    }
    lines
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm {
        username,
        selected,
        error,
        ..
    } = state
    {
        let height = if error.is_some() { 9 } else { 7 };
        let rect = centered_rect(54, height, area);

        let yes = if *selected == 0 { "[Delete]" } else { " Delete " };
        let no = if *selected == 1 { "[Cancel]" } else { " Cancel " };
        let mut lines = vec![
            Line::raw(format!("Are you sure you want to delete the user '{username}'?")),
            Line::raw(""),
            Line::raw(format!("  {yes}    {no}")),
        ];
        if let Some(message) = error {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(app.theme.error_fg),
            )));
            lines.push(Line::raw("Enter retries, Esc closes."));
        }

        let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Confirm Delete")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
