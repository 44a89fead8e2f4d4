//! Users Domain
//!
//! CRUD orchestration for the user entity: requests are validated, persisted
//! through a document store, and every completed mutation emits a
//! human-readable notification on an event stream.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐      ┌──────────────┐
//! │   Service   │ ───► │  Publisher   │  ← best-effort change events (NATS)
//! └──────┬──────┘      └──────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB / in-memory)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{
//!     handlers,
//!     hashing::SecretHasher,
//!     publisher::InMemoryEventPublisher,
//!     repository::InMemoryUserRepository,
//!     service::UserService,
//! };
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let hasher = SecretHasher::new("MySecretKey").map_err(|e| e.to_string())?;
//! let service = UserService::new(
//!     InMemoryUserRepository::new(),
//!     InMemoryEventPublisher::new(),
//!     hasher,
//! );
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod clock;
pub mod error;
pub mod handlers;
pub mod hashing;
pub mod models;
pub mod mongodb;
pub mod publisher;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{PublishError, StoreError, UserError, UserResult};
pub use handlers::ApiDoc;
pub use hashing::SecretHasher;
pub use models::{
    Country, CreateUser, ListUsers, StatusReply, UpdateUser, User, UserPage, UserResponse,
};
pub use publisher::{EventPublisher, InMemoryEventPublisher, NatsEventPublisher};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
