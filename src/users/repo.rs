use async_trait::async_trait;
use sqlx::MySqlPool;
use thiserror::Error;

use crate::users::model::{NewUser, User, UserChanges, UserRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,
    /// e.g. duplicate email; carries the driver's message.
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    Storage(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::ConstraintViolation(db.message().to_string())
            }
            sqlx::Error::Database(db) => StoreError::Storage(db.message().to_string()),
            _ => StoreError::Storage(e.to_string()),
        }
    }
}

/// Single-statement access to the `users` table.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<User>, StoreError>;

    async fn get_by_id(&self, id: i32) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Returns the generated `userId`.
    async fn insert(&self, user: &NewUser) -> Result<i32, StoreError>;

    /// Returns the number of matched rows; the hash is kept when
    /// `changes.password_hash` is `None`.
    async fn update(&self, id: i32, changes: &UserChanges) -> Result<u64, StoreError>;

    async fn delete(&self, id: i32) -> Result<u64, StoreError>;
}

const SELECT_USER: &str = r#"
    SELECT userId, name, email, password, age, dob, CAST(gender AS CHAR) AS gender, weight, height
    FROM users
"#;

#[derive(Debug, Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn into_user(row: UserRow) -> Result<User, StoreError> {
    User::try_from(row).map_err(StoreError::Storage)
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(into_user).collect()
    }

    async fn get_by_id(&self, id: i32) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE userId = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)?;
        into_user(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, UserRow>(&format!("{SELECT_USER} WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(into_user)
            .transpose()
    }

    async fn insert(&self, user: &NewUser) -> Result<i32, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password, age, dob, gender, weight, height)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.age)
        .bind(user.dob)
        .bind(user.gender.map(|g| g.as_str()))
        .bind(user.weight)
        .bind(user.height)
        .execute(&self.pool)
        .await?;

        i32::try_from(result.last_insert_id())
            .map_err(|e| StoreError::Storage(format!("generated userId out of range: {e}")))
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<u64, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
               SET name = ?, email = ?, password = IFNULL(?, password), age = ?,
                   dob = ?, gender = ?, weight = ?, height = ?
             WHERE userId = ?
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(changes.age)
        .bind(changes.dob)
        .bind(changes.gender.map(|g| g.as_str()))
        .bind(changes.weight)
        .bind(changes.height)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE userId = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
