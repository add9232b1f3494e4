//! DynamoDB index backend.
//!
//! Media records and per-source slots share the media table (partition key
//! `mediaId`); slots use ids of the form `slot#{sourceKey}` and carry no
//! `bySource` attribute, so they never show up in source queries. Profiles
//! live in the users table keyed by `userId`.

mod client;
mod conversions;
mod keys;
mod media;
mod user;

pub use client::build_client;
pub use media::DynamoMediaIndex;
pub use user::DynamoUserRepository;
