//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock, format_timestamp};
use crate::error::{StoreError, StoreResult};
use crate::models::{Country, NewUser, User, UserPatch};
use crate::repository::UserRepository;

/// Default collection name
pub const USERS_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
pub struct MongoUserRepository {
    collection: Collection<User>,
    clock: Arc<dyn Clock>,
}

impl MongoUserRepository {
    /// Create a new MongoUserRepository on the `users` collection
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let db = client.database("users_collection");
    /// let repo = MongoUserRepository::new(&db);
    /// repo.ensure_indexes().await?;
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, USERS_COLLECTION)
    }

    /// Create a new MongoUserRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<User>(collection_name);
        Self {
            collection,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the unique `id` index and the listing index
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name("idx_id_unique".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "country": 1, "created_at": 1, "id": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_country_created".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!("User indexes created successfully");
        Ok(())
    }

    /// Drop the whole collection. Used to reset state in development mode.
    pub async fn drop_collection(&self) -> StoreResult<()> {
        self.collection.drop().await?;
        tracing::warn!(
            collection = %self.collection.name(),
            "Dropped users collection"
        );
        Ok(())
    }

    fn build_filter(country: Option<Country>) -> Document {
        let mut doc = doc! {};

        if let Some(country) = country {
            doc.insert("country", country.to_string());
        }

        doc
    }

    fn id_filter(id: &str) -> Document {
        doc! { "id": id }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, input))]
    async fn create(&self, input: NewUser) -> StoreResult<User> {
        let now = format_timestamp(self.clock.now());
        let user = User::new(Uuid::new_v4().to_string(), input, now);

        self.collection.insert_one(&user).await?;

        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_paginated(
        &self,
        country: Option<Country>,
        skip: u64,
        limit: i64,
    ) -> StoreResult<Vec<User>> {
        use futures_util::TryStreamExt;

        let filter = Self::build_filter(country);

        let options = mongodb::options::FindOptions::builder()
            .skip(skip)
            .limit(limit)
            .sort(doc! { "created_at": 1, "id": 1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        let users: Vec<User> = cursor.try_collect().await?;

        Ok(users)
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: &str, patch: UserPatch) -> StoreResult<User> {
        let filter = Self::id_filter(id);
        let existing = self
            .collection
            .find_one(filter.clone())
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;

        let mut updated = existing;
        updated.apply_patch(patch, format_timestamp(self.clock.now()));

        let result = self.collection.replace_one(filter, &updated).await?;
        if result.matched_count == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }

        tracing::info!(user_id = %id, "User updated successfully");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> StoreResult<u64> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(user_id = %id, "User deleted successfully");
        }
        Ok(result.deleted_count)
    }
}
