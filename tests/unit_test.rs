// Library-level tests exercising the public API of usradmin-tui

use usradmin_tui::api::{ActiveFlag, ApiClient, User};
use usradmin_tui::app::form::{FormField, UserForm};
use usradmin_tui::app::{AppState, InputMode, Paging, SortColumn, Theme};
use usradmin_tui::view;

fn mk_user(id: u64, username: &str) -> User {
    User {
        id,
        username: username.to_string(),
        fullname: format!("{username} full"),
        role: "dev".to_string(),
        project: vec!["apollo".to_string()],
        active: ActiveFlag::Yes,
    }
}

fn mk_app(users: Vec<User>, page_size: usize) -> AppState {
    let mut app = AppState {
        users: Vec::new(),
        filtered_len: 0,
        users_all: users,
        search_query: String::new(),
        lookup_query: String::new(),
        selected_index: 0,
        sort: None,
        page: Paging::new(page_size),
        input_mode: InputMode::Normal,
        modal: None,
        theme: Theme::mocha(),
        status: None,
        client: ApiClient::new("http://localhost:4000"),
    };
    view::refresh(&mut app);
    app
}

// A draft missing a required field never reaches the network: validation
// rejects it up front, reporting only the first offending field.
#[test]
fn invalid_create_draft_is_rejected_before_any_request() {
    let mut form = UserForm::empty();
    form.fullname = "Alice A".into();
    form.role = "admin".into();
    form.project = "apollo".into();

    let (field, message) = form.validate().unwrap_err();
    assert_eq!(field, FormField::Username);
    assert_eq!(message, "Username is required");
}

#[test]
fn search_term_ali_matches_only_alice() {
    let mut app = mk_app(vec![mk_user(1, "alice"), mk_user(2, "bob")], 100);
    app.search_query = "ali".to_string();
    view::refresh(&mut app);

    assert_eq!(app.users.len(), 1);
    assert_eq!(app.users[0].username, "alice");
}

#[test]
fn fifty_users_fit_one_page_of_a_hundred() {
    let users: Vec<User> = (0..50).map(|i| mk_user(i, &format!("user{i:02}"))).collect();
    let mut app = mk_app(users, 100);

    assert_eq!(app.users.len(), 50);

    app.page.index = 1;
    view::refresh(&mut app);
    assert!(app.users.is_empty());
}

#[test]
fn double_toggle_restores_the_sort_direction() {
    let mut app = mk_app(vec![mk_user(1, "alice"), mk_user(2, "bob")], 100);
    app.toggle_sort(SortColumn::Role);
    let initial = app.sort.unwrap().desc;

    app.toggle_sort(SortColumn::Role);
    app.toggle_sort(SortColumn::Role);
    assert_eq!(app.sort.unwrap().desc, initial);
}

#[test]
fn optimistic_splices_keep_other_records_untouched() {
    let mut app = mk_app(vec![mk_user(1, "alice"), mk_user(2, "bob")], 100);

    // Create: the canonical list grows by exactly one.
    app.apply_created(mk_user(3, "carol"));
    assert_eq!(app.users_all.len(), 3);

    // Update: only the record with the matching id changes.
    let mut changed = mk_user(2, "bob");
    changed.role = "lead".to_string();
    app.apply_updated(changed);
    assert_eq!(app.users_all[1].role, "lead");
    assert_eq!(app.users_all[0].role, "dev");

    // Delete: the id is gone afterwards.
    app.remove_user(1);
    assert!(app.users_all.iter().all(|u| u.id != 1));
    assert_eq!(app.users_all.len(), 2);
}
