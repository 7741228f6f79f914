use serde::{Deserialize, Serialize};

use crate::users::model::User;

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Outcome of a login attempt. Failures are still HTTP 200.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

impl LoginResponse {
    pub fn success(user: User) -> Self {
        Self {
            success: true,
            message: "Login successful",
            user: Some(user),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self {
            success: false,
            message: INVALID_CREDENTIALS,
            user: None,
        }
    }
}
