//! User Service - validation and coordination between storage and notifications

use std::sync::Arc;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::hashing::SecretHasher;
use crate::models::{
    CreateUser, ListUsers, NewUser, ServingStatus, StatusReply, UpdateUser, UserPage,
    UserPatch, UserResponse,
};
use crate::publisher::EventPublisher;
use crate::repository::UserRepository;

pub const INVALID_COUNTRY: &str = "Received country is not valid";
pub const STATUS_MESSAGE: &str = "Account service up and running";

/// User service providing the business operations
///
/// Every mutation runs validate → persist → notify. The storage outcome is
/// authoritative; a failed notification is logged and never changes the result.
pub struct UserService<R: UserRepository, P: EventPublisher> {
    repository: Arc<R>,
    publisher: Arc<P>,
    hasher: SecretHasher,
}

impl<R: UserRepository, P: EventPublisher> UserService<R, P> {
    pub fn new(repository: R, publisher: P, hasher: SecretHasher) -> Self {
        Self {
            repository: Arc::new(repository),
            publisher: Arc::new(publisher),
            hasher,
        }
    }

    /// Create a new user
    #[instrument(skip(self, input), fields(country = %input.country))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<UserResponse> {
        if !input.country.is_known() {
            return Err(UserError::InvalidArgument(INVALID_COUNTRY.to_string()));
        }

        let new_user = NewUser {
            password_hash: self.hasher.hash(&input.password),
            first_name: input.first_name,
            last_name: input.last_name,
            nickname: input.nickname,
            email: input.email,
            country: input.country,
        };

        let user = self
            .repository
            .create(new_user)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        self.notify(format!("Created user {}", user.id)).await;

        Ok(user.into())
    }

    /// List users page by page, optionally filtered by country
    #[instrument(skip(self))]
    pub async fn get_users(&self, query: ListUsers) -> UserResult<UserPage> {
        // `page` is the number of documents to skip
        let skip = u64::try_from(query.page).unwrap_or(0);

        let users = self
            .repository
            .find_paginated(query.filter_country, skip, query.page_size)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        let results: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
        let total_count = results.len() as i64;

        Ok(UserPage {
            results,
            page: query.page,
            page_size: query.page_size,
            total_count,
        })
    }

    /// Apply a partial update. Only the fields present in `input` change.
    #[instrument(skip(self, input), fields(user_id = %input.id))]
    pub async fn update_user(&self, input: UpdateUser) -> UserResult<()> {
        if input.country.is_some_and(|c| !c.is_known()) {
            return Err(UserError::InvalidArgument(INVALID_COUNTRY.to_string()));
        }

        let patch = UserPatch {
            first_name: input.first_name,
            last_name: input.last_name,
            nickname: input.nickname,
            email: input.email,
            password_hash: input.password.as_deref().map(|p| self.hasher.hash(p)),
            country: input.country,
        };

        self.repository
            .update(&input.id, patch)
            .await
            .map_err(|e| UserError::Internal(e.to_string()))?;

        self.notify(format!("Updated user {}", input.id)).await;

        Ok(())
    }

    /// Hard-delete a user. Any storage failure is reported as not found.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        match self.repository.delete(id).await {
            Ok(deleted) if deleted > 0 => {}
            Ok(_) => return Err(UserError::NotFound(format!("user {} not found", id))),
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Delete failed at the store");
                return Err(UserError::NotFound(format!("user {} not found", id)));
            }
        }

        self.notify(format!("Deleted user {}", id)).await;

        Ok(())
    }

    /// Liveness probe; touches no collaborator
    pub fn status(&self) -> StatusReply {
        StatusReply {
            status: ServingStatus::Up,
            message: STATUS_MESSAGE.to_string(),
        }
    }

    async fn notify(&self, message: String) {
        match self.publisher.publish(&message).await {
            Ok(()) => tracing::debug!(event = %message, "Published user event"),
            Err(e) => tracing::warn!(event = %message, error = %e, "Failed to publish user event"),
        }
    }
}

impl<R: UserRepository, P: EventPublisher> Clone for UserService<R, P> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            publisher: Arc::clone(&self.publisher),
            hasher: self.hasher.clone(),
        }
    }
}
