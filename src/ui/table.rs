use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, SortColumn};

const COLUMNS: [(&str, SortColumn); 5] = [
    ("Username", SortColumn::Username),
    ("Full Name", SortColumn::Fullname),
    ("Role", SortColumn::Role),
    ("Project", SortColumn::Project),
    ("Active", SortColumn::Active),
];

/// Render the current page of the displayed list. The rows are already
/// filtered, sorted, and sliced by `view::refresh`.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let rows = app.users.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.username.clone()),
            Cell::from(u.fullname.clone()),
            Cell::from(u.role.clone()),
            Cell::from(u.project.join(", ")),
            Cell::from(u.active.as_str()),
        ])
        .style(style)
    });

    let header = Row::new(COLUMNS.map(|(label, column)| {
        let marker = match app.sort {
            Some(s) if s.column == column && s.desc => " ▼",
            Some(s) if s.column == column => " ▲",
            _ => "",
        };
        Cell::from(format!("{label}{marker}"))
    }))
    .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Length(18),
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Percentage(40),
        Constraint::Length(8),
    ];

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

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => format!(
            "Id: {}\nUsername: {}\nFullname: {}\nRole: {}\nProjects: {}\nActive: {}",
            u.id,
            u.username,
            u.fullname,
            u.role,
            u.project.join(", "),
            u.active.as_str()
        ),
        None => "No user selected".to_string(),
    };
    let p = Paragraph::new(text).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title("Details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}
