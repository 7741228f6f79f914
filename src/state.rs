use std::sync::Arc;

use crate::auth::password::{Argon2Hasher, PasswordHasher};
use crate::config::AppConfig;
use crate::db;
use crate::users::repo::{MySqlUserRepository, UserRepository};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    /// Connects to MySQL, applies migrations and wires the real collaborators.
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config.database).await?;
        db::migrate(&pool).await;

        let users = Arc::new(MySqlUserRepository::new(pool)) as Arc<dyn UserRepository>;
        let hasher = Arc::new(Argon2Hasher::new(config.password_hash)?) as Arc<dyn PasswordHasher>;
        Ok(Self::from_parts(users, hasher))
    }

    pub fn from_parts(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::users::in_memory::InMemoryUserRepository;

        Self::from_parts(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(crate::auth::password::fast_hasher()),
        )
    }
}
