//! Remote user store client.
//!
//! Thin blocking wrapper over the REST endpoints of the user service:
//! - `GET /user` — full list
//! - `GET /user/username/{term}` — zero-or-one matches (object or list)
//! - `POST /user` — create (payload carries no `id`; response does)
//! - `PATCH /user/{id}` — update with the full draft
//! - `DELETE /user/{id}` — remove, no body
//!
//! Any non-2xx response is reported as one uniform failure; no structured
//! error body is assumed.

use crate::error::{Context, Result, simple_error};
use serde::{Deserialize, Serialize};

/// Two-state activity flag, `"Y"`/`"N"` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveFlag {
    #[default]
    #[serde(rename = "Y")]
    Yes,
    #[serde(rename = "N")]
    No,
}

impl ActiveFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveFlag::Yes => "Y",
            ActiveFlag::No => "N",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ActiveFlag::Yes => ActiveFlag::No,
            ActiveFlag::No => ActiveFlag::Yes,
        }
    }
}

/// A user record as exchanged with the backend. `id` is server-assigned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub fullname: String,
    pub role: String,
    /// Canonically an ordered list of project names. The backend has been
    /// observed to also ship a flattened comma string; the boundary accepts
    /// both and always emits a list.
    #[serde(deserialize_with = "deserialize_projects", default)]
    pub project: Vec<String>,
    #[serde(rename = "activeYn", default)]
    pub active: ActiveFlag,
}

/// Create payload: a user without the server-assigned `id`.
#[derive(Clone, Debug, Serialize)]
pub struct NewUser {
    pub username: String,
    pub fullname: String,
    pub role: String,
    pub project: Vec<String>,
    #[serde(rename = "activeYn")]
    pub active: ActiveFlag,
}

fn deserialize_projects<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Flat(String),
    }
    Ok(match Raw::deserialize(deserializer)? {
        Raw::List(items) => items,
        Raw::Flat(joined) => split_projects(&joined),
    })
}

/// Split a flattened project string into the canonical list form.
pub fn split_projects(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// The search endpoint answers with either a bare object or a list.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<User>),
    One(User),
}

pub struct ApiClient {
    base: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self {
            base,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn ensure_ok(resp: reqwest::blocking::Response, what: &str) -> Result<reqwest::blocking::Response> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(simple_error(format!("{what} returned {}", resp.status())))
        }
    }

    /// Fetch the full user list.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let resp = self
            .http
            .get(format!("{}/user", self.base))
            .send()
            .with_ctx(|| "GET /user".to_string())?;
        let resp = Self::ensure_ok(resp, "GET /user")?;
        resp.json().with_ctx(|| "decode user list".to_string())
    }

    /// Create a user; the response carries the server-assigned `id`.
    pub fn create_user(&self, user: &NewUser) -> Result<User> {
        let resp = self
            .http
            .post(format!("{}/user", self.base))
            .json(user)
            .send()
            .with_ctx(|| "POST /user".to_string())?;
        let resp = Self::ensure_ok(resp, "POST /user")?;
        resp.json().with_ctx(|| "decode created user".to_string())
    }

    /// Replace the record with `user.id` by the given draft.
    pub fn update_user(&self, user: &User) -> Result<User> {
        let resp = self
            .http
            .patch(format!("{}/user/{}", self.base, user.id))
            .json(user)
            .send()
            .with_ctx(|| format!("PATCH /user/{}", user.id))?;
        let resp = Self::ensure_ok(resp, "PATCH /user")?;
        resp.json().with_ctx(|| "decode updated user".to_string())
    }

    pub fn delete_user(&self, id: u64) -> Result<()> {
        let resp = self
            .http
            .delete(format!("{}/user/{}", self.base, id))
            .send()
            .with_ctx(|| format!("DELETE /user/{id}"))?;
        Self::ensure_ok(resp, "DELETE /user").map(|_| ())
    }

    /// Build the lookup URL with the term as a single encoded path segment,
    /// so a term holding a space or `/` cannot mangle the request path.
    fn lookup_url(&self, term: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base)
            .with_ctx(|| format!("parse base url '{}'", self.base))?;
        url.path_segments_mut()
            .map_err(|()| simple_error("base url cannot hold path segments"))?
            .pop_if_empty()
            .extend(["user", "username", term]);
        Ok(url)
    }

    /// Look a user up by exact username. The endpoint may answer with a bare
    /// object, a list, or 404; all are normalized to zero-or-one records.
    pub fn find_by_username(&self, term: &str) -> Result<Option<User>> {
        let resp = self
            .http
            .get(self.lookup_url(term)?)
            .send()
            .with_ctx(|| format!("GET /user/username/{term}"))?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::ensure_ok(resp, "GET /user/username")?;
        let value: serde_json::Value = resp
            .json()
            .with_ctx(|| "decode username search".to_string())?;
        if value.is_null() {
            return Ok(None);
        }
        let normalized: OneOrMany =
            serde_json::from_value(value).with_ctx(|| "decode username search".to_string())?;
        Ok(match normalized {
            OneOrMany::Many(list) => list.into_iter().next(),
            OneOrMany::One(user) => Some(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_deserializes_project_list() {
        let raw = r#"{"id":1,"username":"alice","fullname":"Alice A","role":"admin","project":["apollo","zephyr"],"activeYn":"Y"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.project, vec!["apollo", "zephyr"]);
        assert_eq!(user.active, ActiveFlag::Yes);
    }

    #[test]
    fn user_deserializes_flattened_project_string() {
        let raw = r#"{"id":2,"username":"bob","fullname":"Bobby","role":"dev","project":"apollo, zephyr ,","activeYn":"N"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.project, vec!["apollo", "zephyr"]);
        assert_eq!(user.active, ActiveFlag::No);
    }

    #[test]
    fn user_serializes_projects_as_list() {
        let user = User {
            id: 3,
            username: "carol".into(),
            fullname: "Carol".into(),
            role: "qa".into(),
            project: vec!["apollo".into()],
            active: ActiveFlag::Yes,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value["project"].is_array());
        assert_eq!(value["activeYn"], "Y");
    }

    #[test]
    fn create_payload_has_no_id() {
        let new_user = NewUser {
            username: "dave".into(),
            fullname: "Dave".into(),
            role: "ops".into(),
            project: vec!["argus".into()],
            active: ActiveFlag::Yes,
        };
        let value = serde_json::to_value(&new_user).unwrap();
        assert!(value.get("id").is_none());
        assert_eq!(value["username"], "dave");
        assert_eq!(value["activeYn"], "Y");
    }

    #[test]
    fn one_or_many_normalizes_both_shapes() {
        let as_list: OneOrMany =
            serde_json::from_str(r#"[{"id":1,"username":"a","fullname":"A","role":"r","project":[],"activeYn":"Y"}]"#)
                .unwrap();
        assert!(matches!(as_list, OneOrMany::Many(ref l) if l.len() == 1));

        let as_object: OneOrMany =
            serde_json::from_str(r#"{"id":1,"username":"a","fullname":"A","role":"r","project":[],"activeYn":"Y"}"#)
                .unwrap();
        assert!(matches!(as_object, OneOrMany::One(_)));

        let empty: OneOrMany = serde_json::from_str("[]").unwrap();
        assert!(matches!(empty, OneOrMany::Many(ref l) if l.is_empty()));
    }

    #[test]
    fn lookup_url_encodes_the_term_as_one_segment() {
        let client = ApiClient::new("http://localhost:4000/");
        let url = client.lookup_url("jo smith/x").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:4000/user/username/jo%20smith%2Fx"
        );

        let plain = client.lookup_url("alice").unwrap();
        assert_eq!(plain.as_str(), "http://localhost:4000/user/username/alice");
    }

    #[test]
    fn split_projects_trims_and_drops_empties() {
        assert_eq!(split_projects(" a , b ,, "), vec!["a", "b"]);
        assert!(split_projects("   ").is_empty());
    }
}
