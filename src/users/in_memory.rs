use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::users::model::{NewUser, User, UserChanges};
use crate::users::repo::{StoreError, UserRepository};

#[derive(Debug, Default)]
struct Table {
    rows: HashMap<i32, User>,
    last_id: i32,
}

impl Table {
    fn email_taken(&self, email: &str, except: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|u| u.email == email && Some(u.user_id) != except)
    }
}

fn duplicate(email: &str) -> StoreError {
    StoreError::ConstraintViolation(format!("Duplicate entry '{email}' for key 'users.email'"))
}

/// `UserRepository` held in process memory. Ids are never reused.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<Table>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get_by_id(&self, id: i32) -> Result<User, StoreError> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn insert(&self, user: &NewUser) -> Result<i32, StoreError> {
        let mut table = self.table.write().await;
        if table.email_taken(&user.email, None) {
            return Err(duplicate(&user.email));
        }
        table.last_id += 1;
        let user_id = table.last_id;
        table.rows.insert(
            user_id,
            User {
                user_id,
                name: user.name.clone(),
                email: user.email.clone(),
                password: user.password_hash.clone(),
                age: user.age,
                dob: user.dob,
                gender: user.gender,
                weight: user.weight,
                height: user.height,
            },
        );
        Ok(user_id)
    }

    async fn update(&self, id: i32, changes: &UserChanges) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(0);
        }
        if table.email_taken(&changes.email, Some(id)) {
            return Err(duplicate(&changes.email));
        }
        let Some(row) = table.rows.get_mut(&id) else {
            return Ok(0);
        };
        row.name = changes.name.clone();
        row.email = changes.email.clone();
        if let Some(hash) = &changes.password_hash {
            row.password = hash.clone();
        }
        row.age = changes.age;
        row.dob = changes.dob;
        row.gender = changes.gender;
        row.weight = changes.weight;
        row.height = changes.height;
        Ok(1)
    }

    async fn delete(&self, id: i32) -> Result<u64, StoreError> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::model::Gender;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: Some("Ann".into()),
            email: email.into(),
            password_hash: "hash-1".into(),
            age: Some(30),
            dob: None,
            gender: Some(Gender::Female),
            weight: None,
            height: None,
        }
    }

    fn changes(email: &str, hash: Option<&str>) -> UserChanges {
        UserChanges {
            name: Some("Annie".into()),
            email: email.into(),
            password_hash: hash.map(Into::into),
            age: None,
            dob: None,
            gender: None,
            weight: Some(60.0),
            height: None,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_that_are_not_reused() {
        let repo = InMemoryUserRepository::new();
        let first = repo.insert(&new_user("a@x.com")).await.unwrap();
        let second = repo.insert(&new_user("b@x.com")).await.unwrap();
        assert_eq!((first, second), (1, 2));

        assert_eq!(repo.delete(second).await.unwrap(), 1);
        let third = repo.insert(&new_user("c@x.com")).await.unwrap();
        assert_eq!(third, 3);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&new_user("a@x.com")).await.unwrap();
        let err = repo.insert(&new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(msg) if msg.contains("a@x.com")));
    }

    #[tokio::test]
    async fn get_by_id_reports_missing_rows() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(repo.get_by_id(42).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_without_hash_keeps_password() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert(&new_user("a@x.com")).await.unwrap();

        assert_eq!(repo.update(id, &changes("a@x.com", None)).await.unwrap(), 1);
        let user = repo.get_by_id(id).await.unwrap();
        assert_eq!(user.password, "hash-1");
        assert_eq!(user.name.as_deref(), Some("Annie"));
        assert_eq!(user.age, None);

        repo.update(id, &changes("a@x.com", Some("hash-2"))).await.unwrap();
        assert_eq!(repo.get_by_id(id).await.unwrap().password, "hash-2");
    }

    #[tokio::test]
    async fn update_onto_another_users_email_fails() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&new_user("a@x.com")).await.unwrap();
        let id = repo.insert(&new_user("b@x.com")).await.unwrap();
        let err = repo.update(id, &changes("a@x.com", None)).await.unwrap_err();
        assert!(matches!(err, StoreError::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_row_affect_nothing() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.update(9, &changes("z@x.com", None)).await.unwrap(), 0);
        assert_eq!(repo.delete(9).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn find_by_email_matches_exactly() {
        let repo = InMemoryUserRepository::new();
        let id = repo.insert(&new_user("a@x.com")).await.unwrap();
        assert_eq!(repo.find_by_email("a@x.com").await.unwrap().map(|u| u.user_id), Some(id));
        assert!(repo.find_by_email("nobody@x.com").await.unwrap().is_none());
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
