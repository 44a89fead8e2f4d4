//! Database connectors for the user service
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client configuration and connection
//! - `config` - `core_config::FromEnv` support for the configs
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//!
//! let config = MongoConfig::with_database("mongodb://localhost:27017", "users_collection");
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;
