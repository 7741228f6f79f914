use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;

time::serde::format_description!(pub(crate) calendar_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Gender::Male),
            "Female" => Ok(Gender::Female),
            "Other" => Ok(Gender::Other),
            other => Err(format!("unknown gender value {other:?}")),
        }
    }
}

/// A row of the `users` table as returned to clients, hash included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i32,
    pub name: Option<String>,
    pub email: String,
    pub password: String, // PHC-format hash
    pub age: Option<i32>,
    #[serde(default, with = "calendar_date::option")]
    pub dob: Option<Date>,
    pub gender: Option<Gender>,
    pub weight: Option<f32>,
    pub height: Option<f32>,
}

/// Raw row; `gender` arrives as the ENUM literal.
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    #[sqlx(rename = "userId")]
    pub user_id: i32,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub age: Option<i32>,
    pub dob: Option<Date>,
    pub gender: Option<String>,
    pub weight: Option<f32>,
    pub height: Option<f32>,
}

impl TryFrom<UserRow> for User {
    type Error = String;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let gender = r.gender.as_deref().map(Gender::from_str).transpose()?;
        Ok(Self {
            user_id: r.user_id,
            name: r.name,
            email: r.email.unwrap_or_default(),
            password: r.password.unwrap_or_default(),
            age: r.age,
            dob: r.dob,
            gender,
            weight: r.weight,
            height: r.height,
        })
    }
}

/// Column values for an insert. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub age: Option<i32>,
    pub dob: Option<Date>,
    pub gender: Option<Gender>,
    pub weight: Option<f32>,
    pub height: Option<f32>,
}

/// Column values for an update. `None` hash keeps the stored one.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: String,
    pub password_hash: Option<String>,
    pub age: Option<i32>,
    pub dob: Option<Date>,
    pub gender: Option<Gender>,
    pub weight: Option<f32>,
    pub height: Option<f32>,
}
