use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ApiError;
use crate::users::model::{calendar_date, Gender};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Body of `POST /users` and `PUT /users/:id`; `password` may be omitted on update.
#[derive(Debug, Deserialize)]
pub struct UserPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    #[serde(default, with = "calendar_date::option")]
    pub dob: Option<Date>,
    pub gender: Option<Gender>,
    pub weight: Option<f32>,
    pub height: Option<f32>,
}

impl UserPayload {
    /// Trimmed, well-formed email or a 400.
    pub fn checked_email(&self) -> Result<String, ApiError> {
        let email = self
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ApiError::BadRequest("email is required".into()))?;
        if !is_valid_email(email) {
            return Err(ApiError::BadRequest("Invalid email".into()));
        }
        Ok(email.to_string())
    }

    /// Password to hash, if any. Empty strings count as absent.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUserResponse {
    pub user_id: i32,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
