//! Dialog form drafts for the create and edit dialogs.
//!
//! A form owns its draft from the moment the dialog opens; the edit dialog
//! never reseeds it from the canonical record while open.

use crate::api::{ActiveFlag, NewUser, User, split_projects};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Username,
    Fullname,
    Role,
    Project,
    Active,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Username => "Username",
            FormField::Fullname => "Full Name",
            FormField::Role => "Role",
            FormField::Project => "Projects",
            FormField::Active => "Active",
        }
    }
}

const FIELD_ORDER: [FormField; 5] = [
    FormField::Username,
    FormField::Fullname,
    FormField::Role,
    FormField::Project,
    FormField::Active,
];

#[derive(Clone, Debug)]
pub struct UserForm {
    pub username: String,
    pub fullname: String,
    pub role: String,
    /// Comma-separated in the input box; split at the boundary.
    pub project: String,
    pub active: ActiveFlag,
    pub focus: FormField,
    pub error: Option<(FormField, String)>,
    /// The edit dialog keeps the username fixed.
    username_locked: bool,
}

impl UserForm {
    /// Blank draft for the create dialog. Active defaults to `"Y"`.
    pub fn empty() -> Self {
        Self {
            username: String::new(),
            fullname: String::new(),
            role: String::new(),
            project: String::new(),
            active: ActiveFlag::Yes,
            focus: FormField::Username,
            error: None,
            username_locked: false,
        }
    }

    /// Draft seeded from a selected record, captured once at open time.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            fullname: user.fullname.clone(),
            role: user.role.clone(),
            project: user.project.join(", "),
            active: user.active,
            focus: FormField::Fullname,
            error: None,
            username_locked: true,
        }
    }

    pub fn username_locked(&self) -> bool {
        self.username_locked
    }

    /// Validate required fields in fixed order, reporting only the first
    /// offending field (short-circuit, not accumulate).
    pub fn validate(&self) -> Result<(), (FormField, String)> {
        if self.username.is_empty() {
            return Err((FormField::Username, "Username is required".to_string()));
        }
        if self.fullname.is_empty() {
            return Err((FormField::Fullname, "Full Name is required".to_string()));
        }
        if self.role.is_empty() {
            return Err((FormField::Role, "Role is required".to_string()));
        }
        if self.project.trim().is_empty() {
            return Err((FormField::Project, "Project is required".to_string()));
        }
        Ok(())
    }

    pub fn projects(&self) -> Vec<String> {
        split_projects(&self.project)
    }

    pub fn to_create_payload(&self) -> NewUser {
        NewUser {
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            role: self.role.clone(),
            project: self.projects(),
            active: self.active,
        }
    }

    /// Assemble the full PATCH draft for an existing record.
    pub fn to_update_draft(&self, id: u64) -> User {
        User {
            id,
            username: self.username.clone(),
            fullname: self.fullname.clone(),
            role: self.role.clone(),
            project: self.projects(),
            active: self.active,
        }
    }

    pub fn focus_next(&mut self) {
        self.shift_focus(1);
    }

    pub fn focus_prev(&mut self) {
        self.shift_focus(FIELD_ORDER.len() - 1);
    }

    fn shift_focus(&mut self, step: usize) {
        let mut pos = FIELD_ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
        loop {
            pos = (pos + step) % FIELD_ORDER.len();
            if !(self.username_locked && FIELD_ORDER[pos] == FormField::Username) {
                break;
            }
        }
        self.focus = FIELD_ORDER[pos];
    }

    /// Type a character into the focused text field. Clears that field's
    /// pending error, mirroring the per-field error reset on change.
    pub fn input(&mut self, c: char) {
        if let Some(field) = self.focused_text_field() {
            field.push(c);
            let focus = self.focus;
            if matches!(&self.error, Some((f, _)) if *f == focus) {
                self.error = None;
            }
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.focused_text_field() {
            field.pop();
        }
    }

    /// Flip the active flag when the Active field has focus.
    pub fn toggle_active(&mut self) {
        if self.focus == FormField::Active {
            self.active = self.active.toggled();
        }
    }

    fn focused_text_field(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Username => Some(&mut self.username),
            FormField::Fullname => Some(&mut self.fullname),
            FormField::Role => Some(&mut self.role),
            FormField::Project => Some(&mut self.project),
            FormField::Active => None,
        }
    }

    pub fn field_value(&self, field: FormField) -> String {
        match field {
            FormField::Username => self.username.clone(),
            FormField::Fullname => self.fullname.clone(),
            FormField::Role => self.role.clone(),
            FormField::Project => self.project.clone(),
            FormField::Active => format!("[{}]", self.active.as_str()),
        }
    }

    pub fn fields(&self) -> &'static [FormField] {
        &FIELD_ORDER
    }
}
