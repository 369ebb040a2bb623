//! Derivation of the displayed list from the canonical list.
//!
//! The displayed subset is recomputed whenever the canonical list, the
//! search term, the sort spec, or the page changes:
//! filter (username contains term, case-insensitive) -> sort -> page slice.

use std::cmp::Ordering;

use crate::api::User;
use crate::app::{AppState, SortColumn};

/// Filter and sort the canonical list without pagination.
pub fn derive_rows(app: &AppState) -> Vec<User> {
    let term = app.search_query.trim().to_lowercase();
    let mut rows: Vec<User> = if term.is_empty() {
        app.users_all.clone()
    } else {
        app.users_all
            .iter()
            .filter(|u| u.username.to_lowercase().contains(&term))
            .cloned()
            .collect()
    };
    if let Some(sort) = app.sort {
        rows.sort_by(|a, b| {
            let ord = compare_by_column(a, b, sort.column);
            if sort.desc { ord.reverse() } else { ord }
        });
    }
    rows
}

/// Recompute `app.users` as the current page of the filtered, sorted list
/// and clamp the selection to it.
pub fn refresh(app: &mut AppState) {
    let rows = derive_rows(app);
    app.filtered_len = rows.len();
    let start = (app.page.index * app.page.size).min(rows.len());
    let end = (start + app.page.size).min(rows.len());
    app.users = rows[start..end].to_vec();
    if app.selected_index >= app.users.len() {
        app.selected_index = app.users.len().saturating_sub(1);
    }
}

/// Refresh after the canonical list shrank, pulling the page index back
/// onto the last page first so the table never sits on a page past the
/// end. Derivation itself stays a raw slice: an out-of-range index set by
/// hand still yields an empty page.
pub fn refresh_clamped(app: &mut AppState) {
    refresh(app);
    let last = app.page_count() - 1;
    if app.page.index > last {
        app.page.index = last;
        refresh(app);
    }
}

/// Move the page and selection to the given id, clearing the search term
/// first. Returns false when the id is not in the canonical list.
pub fn focus_user(app: &mut AppState, id: u64) -> bool {
    app.search_query.clear();
    let rows = derive_rows(app);
    match rows.iter().position(|u| u.id == id) {
        Some(pos) => {
            app.page.index = pos / app.page.size;
            refresh(app);
            app.selected_index = pos % app.page.size;
            true
        }
        None => {
            refresh(app);
            false
        }
    }
}

fn compare_by_column(a: &User, b: &User, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Username => cmp_ci(&a.username, &b.username),
        SortColumn::Fullname => cmp_ci(&a.fullname, &b.fullname),
        SortColumn::Role => cmp_ci(&a.role, &b.role),
        SortColumn::Project => cmp_ci(&a.project.join(","), &b.project.join(",")),
        SortColumn::Active => a.active.as_str().cmp(b.active.as_str()),
    }
}

fn cmp_ci(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
