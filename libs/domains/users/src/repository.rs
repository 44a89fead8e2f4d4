use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock, format_timestamp};
use crate::error::{StoreError, StoreResult};
use crate::models::{Country, NewUser, User, UserPatch};

/// Repository trait for User persistence
///
/// Owns storage mechanics and id generation only; business rules live in
/// [`crate::service::UserService`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, assigning its id and both timestamps
    async fn create(&self, input: NewUser) -> StoreResult<User>;

    /// List users, optionally restricted to one country.
    ///
    /// `skip` is a zero-based offset. A `limit` of 0 means no limit.
    async fn find_paginated(
        &self,
        country: Option<Country>,
        skip: u64,
        limit: i64,
    ) -> StoreResult<Vec<User>>;

    /// Read-modify-write the user with `id`; fails with `NotFound` if absent
    async fn update(&self, id: &str, patch: UserPatch) -> StoreResult<User>;

    /// Remove the user with `id`, returning the number of removed documents
    async fn delete(&self, id: &str) -> StoreResult<u64>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Users are kept in insertion order, which is also their listing order.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<User>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            users: Arc::new(RwLock::new(Vec::new())),
            clock,
        }
    }

    /// Snapshot of a stored user, including its password hash
    pub async fn get(&self, id: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|u| u.id == id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    fn now(&self) -> String {
        format_timestamp(self.clock.now())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: NewUser) -> StoreResult<User> {
        let user = User::new(Uuid::new_v4().to_string(), input, self.now());

        let mut users = self.users.write().await;
        users.push(user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn find_paginated(
        &self,
        country: Option<Country>,
        skip: u64,
        limit: i64,
    ) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;

        let skip = usize::try_from(skip).unwrap_or(usize::MAX);
        let take = match usize::try_from(limit.unsigned_abs()) {
            Ok(0) | Err(_) => usize::MAX,
            Ok(n) => n,
        };

        let result = users
            .iter()
            .filter(|u| country.is_none_or(|c| u.country == c))
            .skip(skip)
            .take(take)
            .cloned()
            .collect();

        Ok(result)
    }

    async fn update(&self, id: &str, patch: UserPatch) -> StoreResult<User> {
        let now = self.now();
        let mut users = self.users.write().await;

        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        user.apply_patch(patch, now);

        tracing::info!(user_id = %id, "Updated user");
        Ok(user.clone())
    }

    async fn delete(&self, id: &str) -> StoreResult<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        let deleted = (before - users.len()) as u64;

        if deleted > 0 {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(deleted)
    }
}
