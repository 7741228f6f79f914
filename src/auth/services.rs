use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::error::ApiError;

/// Hashes on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    plain: String,
) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hasher.hash(&plain))
        .await
        .map_err(|e| ApiError::Internal(format!("hash task failed: {e}")))?
        .map_err(ApiError::from)
}

pub async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    plain: String,
    hash: String,
) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("verify task failed: {e}")))?
        .map_err(ApiError::from)
}
