use std::sync::Arc;

use chrono::Utc;

use crate::domain::{ProfileChanges, User};
use crate::error::DomainError;
use crate::ports::UserRepository;

/// Profile lookups and self-service profile edits.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn profile(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", username))
    }

    pub async fn current(&self, user_id: i64) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::Unauthorized)
    }

    /// Apply `changes` to the actor's own account.
    pub async fn update_profile(
        &self,
        actor: i64,
        changes: ProfileChanges,
    ) -> Result<User, DomainError> {
        let mut user = self.current(actor).await?;

        if changes.username != user.username {
            if let Some(other) = self.users.find_by_username(&changes.username).await? {
                if other.id != actor {
                    return Err(DomainError::Duplicate(format!(
                        "Username '{}' is already taken",
                        changes.username
                    )));
                }
            }
        }

        user.first_name = changes.first_name;
        user.last_name = changes.last_name;
        user.username = changes.username;
        user.email = changes.email;
        user.updated_at = Utc::now();

        let user = self.users.save(user).await?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(user)
    }
}
