//! Fixed names shared by the index, storage and service layers.

/// Partition key of the media table.
pub const MEDIA_TABLE_PARTITION_KEY: &str = "mediaId";

/// Attribute holding the composite source key (`sourceName#sourceId#usage`).
pub const MEDIA_BY_SOURCE_PARTITION_KEY: &str = "sourceName#sourceId#usage";

/// Global secondary index over [`MEDIA_BY_SOURCE_PARTITION_KEY`].
pub const MEDIA_BY_SOURCE_INDEX_NAME: &str = "bySource";

/// Partition key of the users table.
pub const USERS_TABLE_PARTITION_KEY: &str = "userId";

/// Source name under which user-owned media is grouped.
pub const USERS_SOURCE_NAME: &str = "users";

/// Usage tag of a user's avatar media.
pub const AVATAR_USAGE: &str = "avatar";

/// Object name of the uploaded bytes inside a media prefix.
pub const ORIGINAL_OBJECT_NAME: &str = "original";

/// Presigned upload URLs expire after one hour unless configured otherwise.
pub const DEFAULT_UPLOAD_URL_EXPIRY_SECS: u64 = 3600;

/// Avatars are served as a 200x200 crop.
pub const AVATAR_SIZE_PX: u32 = 200;

/// Upper bound on a requested resize width or height.
pub const MAX_RESIZE_DIMENSION_PX: u32 = 8192;

/// Cache-Control value sent with resized avatars.
pub const AVATAR_CACHE_CONTROL: &str = "public, max-age=3600";

/// Content types accepted for media uploads.
pub const ALLOWED_IMAGE_CONTENT_TYPES: &[&str] =
    &["image/jpeg", "image/jpg", "image/png", "image/webp", "image/gif"];
