//! In-process user repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    next_id: i64,
    users: Vec<User>,
}

/// User repository backed by a mutex-guarded vector.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: Mutex<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut store = self.store.lock().await;

        if store.users.iter().any(|u| u.email == new_user.email) {
            return Err(AppError::conflict(
                "Email already in use",
                json!({ "email": new_user.email }),
            ));
        }

        store.next_id += 1;
        let user = User {
            id: store.next_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
            deleted_at: None,
        };
        store.users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let store = self.store.lock().await;
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_active_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let store = self.store.lock().await;
        Ok(store
            .users
            .iter()
            .find(|u| u.email == email && !u.is_deleted())
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let store = self.store.lock().await;
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let store = self.store.lock().await;
        Ok(store.users.iter().rev().cloned().collect())
    }

    async fn soft_delete(&self, id: i64) -> Result<bool, AppError> {
        let mut store = self.store.lock().await;

        match store
            .users
            .iter_mut()
            .find(|u| u.id == id && !u.is_deleted())
        {
            Some(user) => {
                user.deleted_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
