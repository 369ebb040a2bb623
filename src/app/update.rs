use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::Duration;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::app::{AppState, InputMode, ModalState, SortColumn};
use crate::app::form::{FormField, UserForm};
use crate::ui;
use crate::view;

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    client: ApiClient,
    page_size: usize,
) -> Result<()> {
    let mut app = AppState::new(client, page_size);

    loop {
        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.input_mode {
                InputMode::Normal => {
                    if !handle_normal_key(&mut app, key.code) {
                        break;
                    }
                }
                InputMode::Search => handle_search_key(&mut app, key.code),
                InputMode::Lookup => handle_lookup_key(&mut app, key.code),
                InputMode::Modal => handle_modal_key(&mut app, key.code),
            }
        }
    }

    Ok(())
}

/// Returns false when the application should quit.
fn handle_normal_key(app: &mut AppState, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('q') => return false,
        KeyCode::Char('/') => {
            app.search_query.clear();
            view::refresh(app);
            app.input_mode = InputMode::Search;
        }
        KeyCode::Char('f') => {
            app.lookup_query.clear();
            app.input_mode = InputMode::Lookup;
        }
        KeyCode::Char('n') => {
            app.modal = Some(ModalState::Create {
                form: UserForm::empty(),
            });
            app.input_mode = InputMode::Modal;
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(user) = app.selected_user().cloned() {
                app.modal = Some(ModalState::Edit {
                    user_id: user.id,
                    form: UserForm::from_user(&user),
                });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(user) = app.selected_user().cloned() {
                app.modal = Some(ModalState::DeleteConfirm {
                    user_id: user.id,
                    username: user.username,
                    selected: 1,
                    error: None,
                });
                app.input_mode = InputMode::Modal;
            }
        }
        KeyCode::Char('r') => reload(app),
        KeyCode::Up | KeyCode::Char('k') => {
            if app.selected_index > 0 {
                app.selected_index -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if app.selected_index + 1 < app.users.len() {
                app.selected_index += 1;
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if app.page.index > 0 {
                app.page.index -= 1;
                view::refresh(app);
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if app.page.index + 1 < app.page_count() {
                app.page.index += 1;
                view::refresh(app);
            }
        }
        KeyCode::Char('1') => sort_by(app, SortColumn::Username),
        KeyCode::Char('2') => sort_by(app, SortColumn::Fullname),
        KeyCode::Char('3') => sort_by(app, SortColumn::Role),
        KeyCode::Char('4') => sort_by(app, SortColumn::Project),
        KeyCode::Char('5') => sort_by(app, SortColumn::Active),
        _ => {}
    }
    true
}

fn sort_by(app: &mut AppState, column: SortColumn) {
    app.toggle_sort(column);
    view::refresh(app);
}

fn reload(app: &mut AppState) {
    match app.client.list_users() {
        Ok(users) => {
            info!("refreshed {} users", users.len());
            app.status = Some(format!("Refreshed {} users", users.len()));
            app.users_all = users;
            // A shrinking refresh may strand the page index past the end.
            view::refresh_clamped(app);
        }
        Err(err) => {
            warn!("refresh failed: {err}");
            app.status = Some("Refresh failed".to_string());
        }
    }
}

/// The filter is reactive: every keystroke recomputes the displayed list,
/// and Enter merely leaves the prompt.
fn handle_search_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Enter => {
            view::refresh(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Esc => {
            app.search_query.clear();
            view::refresh(app);
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            view::refresh(app);
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            view::refresh(app);
        }
        _ => {}
    }
}

fn handle_lookup_key(app: &mut AppState, code: KeyCode) {
    match code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.lookup_query.pop();
        }
        KeyCode::Char(c) => {
            app.lookup_query.push(c);
        }
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            let term = app.lookup_query.trim().to_string();
            if !term.is_empty() {
                perform_lookup(app, &term);
            }
        }
        _ => {}
    }
}

fn perform_lookup(app: &mut AppState, term: &str) {
    match app.client.find_by_username(term) {
        Ok(Some(user)) => {
            if !view::focus_user(app, user.id) {
                app.modal = Some(ModalState::Info {
                    message: format!(
                        "User '{}' exists on the server but not in the local list. Press r to refresh.",
                        user.username
                    ),
                });
                app.input_mode = InputMode::Modal;
            }
        }
        Ok(None) => {
            app.modal = Some(ModalState::Info {
                message: format!("No user named '{term}'"),
            });
            app.input_mode = InputMode::Modal;
        }
        Err(err) => {
            warn!("lookup failed: {err}");
            app.modal = Some(ModalState::Info {
                message: "Lookup failed".to_string(),
            });
            app.input_mode = InputMode::Modal;
        }
    }
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(mut modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return;
    };

    match &mut modal {
        ModalState::Create { form } => match code {
            KeyCode::Esc => return close_modal(app),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Char(' ') if form.focus == FormField::Active => form.toggle_active(),
            KeyCode::Char(c) => form.input(c),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if submit_create(app, form) {
                    return close_modal(app);
                }
            }
            _ => {}
        },
        ModalState::Edit { user_id, form } => match code {
            KeyCode::Esc => return close_modal(app),
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Char(' ') if form.focus == FormField::Active => form.toggle_active(),
            KeyCode::Char(c) => form.input(c),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => {
                if submit_edit(app, *user_id, form) {
                    return close_modal(app);
                }
            }
            _ => {}
        },
        ModalState::DeleteConfirm {
            user_id,
            username,
            selected,
            error,
        } => match code {
            KeyCode::Esc => return close_modal(app),
            KeyCode::Left | KeyCode::Right => {
                *selected = if *selected == 0 { 1 } else { 0 };
            }
            KeyCode::Enter => {
                if *selected != 0 {
                    return close_modal(app);
                }
                // The dialog closes only after a confirmed success; a
                // failure keeps it open so Enter retries.
                match app.client.delete_user(*user_id) {
                    Ok(()) => {
                        info!("deleted user '{username}' (id {user_id})");
                        app.status = Some(format!("Deleted user '{username}'"));
                        let id = *user_id;
                        app.remove_user(id);
                        view::refresh_clamped(app);
                        return close_modal(app);
                    }
                    Err(err) => {
                        warn!("delete failed: {err}");
                        *error = Some(format!("Delete failed: {err}"));
                    }
                }
            }
            _ => {}
        },
        ModalState::Info { .. } => match code {
            KeyCode::Esc | KeyCode::Enter => return close_modal(app),
            _ => {}
        },
    }

    app.modal = Some(modal);
}

fn close_modal(app: &mut AppState) {
    app.modal = None;
    app.input_mode = InputMode::Normal;
}

/// Validate and create. Returns true when the dialog should close.
fn submit_create(app: &mut AppState, form: &mut UserForm) -> bool {
    if let Err(err) = form.validate() {
        form.error = Some(err);
        return false;
    }

    // Best-effort duplicate check against the canonical list. Non-binding:
    // server-side uniqueness, if any, stays authoritative.
    if app.users_all.iter().any(|u| u.username == form.username) {
        form.error = Some((FormField::Username, "Username already exists".to_string()));
        return false;
    }

    match app.client.create_user(&form.to_create_payload()) {
        Ok(created) => {
            info!("created user '{}' (id {})", created.username, created.id);
            app.status = Some(format!("Created user '{}'", created.username));
            app.apply_created(created);
            view::refresh(app);
            true
        }
        Err(err) => {
            warn!("create failed: {err}");
            form.error = Some((FormField::Username, "Failed to create user".to_string()));
            false
        }
    }
}

/// Send the full draft as a PATCH. A failure is logged and keeps the
/// dialog open without a visible message.
fn submit_edit(app: &mut AppState, user_id: u64, form: &UserForm) -> bool {
    match app.client.update_user(&form.to_update_draft(user_id)) {
        Ok(updated) => {
            info!("updated user '{}' (id {})", updated.username, updated.id);
            app.status = Some(format!("Updated user '{}'", updated.username));
            app.apply_updated(updated);
            view::refresh(app);
            true
        }
        Err(err) => {
            warn!("update failed: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ActiveFlag, User};
    use crate::app::{Paging, Theme};
    use std::io::{Read as _, Write as _};

    // Nothing listens on the discard port, so every request fails fast.
    const DEAD_BASE: &str = "http://127.0.0.1:9";

    fn mk_user(id: u64, username: &str) -> User {
        User {
            id,
            username: username.to_string(),
            fullname: username.to_uppercase(),
            role: "dev".to_string(),
            project: vec!["apollo".to_string()],
            active: ActiveFlag::Yes,
        }
    }

    fn mk_app(users: Vec<User>, base: &str) -> AppState {
        let mut app = AppState {
            users: Vec::new(),
            filtered_len: 0,
            users_all: users,
            search_query: String::new(),
            lookup_query: String::new(),
            selected_index: 0,
            sort: None,
            page: Paging::new(100),
            input_mode: InputMode::Modal,
            modal: None,
            theme: Theme::mocha(),
            status: None,
            client: ApiClient::new(base),
        };
        view::refresh(&mut app);
        app
    }

    /// Spawn a one-shot HTTP responder and return its base URL.
    fn serve_once(response: String) -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind canned server");
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(response.as_bytes());
            }
        });
        format!("http://{addr}")
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn delete_dialog(user_id: u64, username: &str) -> ModalState {
        ModalState::DeleteConfirm {
            user_id,
            username: username.to_string(),
            selected: 0,
            error: None,
        }
    }

    fn filled_form() -> UserForm {
        let mut form = UserForm::empty();
        form.username = "iris".to_string();
        form.fullname = "Iris I".to_string();
        form.role = "ops".to_string();
        form.project = "argus".to_string();
        form
    }

    #[test]
    fn failed_delete_keeps_the_dialog_open_with_an_error() {
        let mut app = mk_app(vec![mk_user(7, "gill")], DEAD_BASE);
        app.modal = Some(delete_dialog(7, "gill"));

        handle_modal_key(&mut app, KeyCode::Enter);

        match &app.modal {
            Some(ModalState::DeleteConfirm { error, .. }) => {
                assert!(error.as_deref().unwrap_or("").starts_with("Delete failed"));
            }
            other => panic!("dialog should stay open, got {other:?}"),
        }
        assert_eq!(app.input_mode, InputMode::Modal);
        assert_eq!(app.users_all.len(), 1);
    }

    #[test]
    fn successful_delete_closes_the_dialog_and_splices_the_id_out() {
        let base = serve_once(http_response("200 OK", "{}"));
        let mut app = mk_app(vec![mk_user(7, "gill"), mk_user(8, "hana")], &base);
        app.modal = Some(delete_dialog(7, "gill"));

        handle_modal_key(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.users_all.iter().all(|u| u.id != 7));
        assert_eq!(app.users.len(), 1);
    }

    #[test]
    fn enter_on_cancel_closes_the_dialog_without_deleting() {
        let mut app = mk_app(vec![mk_user(7, "gill")], DEAD_BASE);
        app.modal = Some(ModalState::DeleteConfirm {
            user_id: 7,
            username: "gill".to_string(),
            selected: 1,
            error: None,
        });

        handle_modal_key(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.users_all.len(), 1);
    }

    #[test]
    fn failed_create_keeps_the_form_open_with_a_username_error() {
        let mut app = mk_app(Vec::new(), DEAD_BASE);
        app.modal = Some(ModalState::Create { form: filled_form() });

        handle_modal_key(&mut app, KeyCode::Enter);

        match &app.modal {
            Some(ModalState::Create { form }) => {
                assert_eq!(
                    form.error,
                    Some((FormField::Username, "Failed to create user".to_string()))
                );
            }
            other => panic!("dialog should stay open, got {other:?}"),
        }
        assert_eq!(app.input_mode, InputMode::Modal);
        assert!(app.users_all.is_empty());
    }

    #[test]
    fn duplicate_username_blocks_the_create_submit() {
        let mut app = mk_app(vec![mk_user(1, "iris")], DEAD_BASE);
        app.modal = Some(ModalState::Create { form: filled_form() });

        handle_modal_key(&mut app, KeyCode::Enter);

        match &app.modal {
            Some(ModalState::Create { form }) => {
                assert_eq!(
                    form.error,
                    Some((FormField::Username, "Username already exists".to_string()))
                );
            }
            other => panic!("dialog should stay open, got {other:?}"),
        }
        assert_eq!(app.users_all.len(), 1);
    }

    #[test]
    fn successful_create_closes_the_dialog_and_appends_the_record() {
        let body = r#"{"id":42,"username":"iris","fullname":"Iris I","role":"ops","project":["argus"],"activeYn":"Y"}"#;
        let base = serve_once(http_response("201 Created", body));
        let mut app = mk_app(Vec::new(), &base);
        app.modal = Some(ModalState::Create { form: filled_form() });

        handle_modal_key(&mut app, KeyCode::Enter);

        assert!(app.modal.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.users_all.len(), 1);
        assert_eq!(app.users_all[0].id, 42);
    }

    #[test]
    fn failed_update_keeps_the_edit_dialog_open() {
        let mut app = mk_app(vec![mk_user(7, "gill")], DEAD_BASE);
        let form = UserForm::from_user(&app.users_all[0]);
        app.modal = Some(ModalState::Edit { user_id: 7, form });

        handle_modal_key(&mut app, KeyCode::Enter);

        assert!(matches!(app.modal, Some(ModalState::Edit { .. })));
        assert_eq!(app.input_mode, InputMode::Modal);
    }
}
