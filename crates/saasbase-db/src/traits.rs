//! Repository traits implemented by every index backend.

use async_trait::async_trait;
use saasbase_core::models::{MediaRecord, MediaSlot, MediaStatus, SourceKey, UserProfile};
use uuid::Uuid;

use crate::error::IndexResult;

/// Media metadata index
///
/// Besides plain records, every source has a *slot* naming its current
/// media item and carrying a version. [`MediaIndex::replace_current`] only
/// succeeds against the version the caller read, which is what keeps a
/// source down to a single current item when replacements race.
#[async_trait]
pub trait MediaIndex: Send + Sync {
    /// Current slot state. A source that never had media is `version == 0`.
    async fn get_slot(&self, source: &SourceKey) -> IndexResult<MediaSlot>;

    /// In one atomic step: insert `record`, point the slot of
    /// `record.source` at it, and delete the record the slot pointed at.
    ///
    /// Fails with `IndexError::Conflict` (and writes nothing) when the slot
    /// no longer matches `expected`.
    async fn replace_current(&self, record: &MediaRecord, expected: &MediaSlot)
        -> IndexResult<()>;

    /// Detach `source`'s slot from its current item, bumping the version.
    ///
    /// With `if_current` set, the slot is only cleared while it still points
    /// at that media id; otherwise it is left alone.
    async fn clear_slot(&self, source: &SourceKey, if_current: Option<Uuid>) -> IndexResult<()>;

    async fn get(&self, media_id: Uuid) -> IndexResult<Option<MediaRecord>>;

    /// Records listed under `source`: exact match when it has a usage,
    /// every usage of the source otherwise.
    async fn query_by_source(&self, source: &SourceKey) -> IndexResult<Vec<MediaRecord>>;

    /// Set the status of an existing record; `IndexError::NotFound` if it is gone.
    async fn update_status(&self, media_id: Uuid, status: MediaStatus) -> IndexResult<()>;

    /// Delete records by id. Missing ids are ignored.
    async fn delete_many(&self, media_ids: &[Uuid]) -> IndexResult<()>;
}

/// User profile records
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> IndexResult<Option<UserProfile>>;

    /// Write the whole profile, replacing any stored one.
    async fn put(&self, profile: &UserProfile) -> IndexResult<()>;

    /// Set only the email of a profile, creating the record if needed.
    async fn set_email(&self, user_id: &str, email: &str) -> IndexResult<()>;
}
