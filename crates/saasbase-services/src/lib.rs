//! saasbase services layer
//!
//! Business logic over the index, object storage and image processing
//! crates. The API crate only talks to the services exported here.

pub mod avatar;
pub mod identity;
pub mod media;
pub mod user;

pub use avatar::AvatarService;
pub use identity::IdentityProvider;
pub use media::{MediaService, ResizedMedia};
pub use user::UserService;

pub use saasbase_db::{create_repositories, MediaIndex, Repositories, UserRepository};
pub use saasbase_processing::{ImageTransform, ImageTransformer};
pub use saasbase_storage::{create_storage, Storage, StorageBackend, StorageError};
