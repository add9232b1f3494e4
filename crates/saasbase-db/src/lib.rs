//! Metadata index for media records and user profiles
//!
//! Two repositories live here: [`MediaIndex`] (media records plus the
//! per-source slot that guards "one current item per source") and
//! [`UserRepository`] (profile records). Each has a DynamoDB backend for
//! deployments and an in-memory backend for local development and tests.

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
pub mod error;
pub mod factory;
pub mod memory;
pub mod traits;

#[cfg(feature = "dynamodb")]
pub use dynamodb::{DynamoMediaIndex, DynamoUserRepository};
pub use error::{IndexError, IndexResult};
pub use factory::{create_repositories, Repositories};
pub use memory::{InMemoryMediaIndex, InMemoryUserRepository};
pub use traits::{MediaIndex, UserRepository};
