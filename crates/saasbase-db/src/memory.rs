//! In-process index backends.
//!
//! State lives behind a single async mutex per repository, so the
//! compare-and-swap in [`MediaIndex::replace_current`] is as atomic here as
//! the DynamoDB transaction is in production. Nothing is persisted.

use std::collections::HashMap;

use async_trait::async_trait;
use saasbase_core::models::{MediaRecord, MediaSlot, MediaStatus, SourceKey, UserProfile};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{IndexError, IndexResult};
use crate::traits::{MediaIndex, UserRepository};

#[derive(Default)]
struct MediaState {
    records: HashMap<Uuid, MediaRecord>,
    slots: HashMap<String, MediaSlot>,
}

#[derive(Default)]
pub struct InMemoryMediaIndex {
    state: Mutex<MediaState>,
}

impl InMemoryMediaIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaIndex for InMemoryMediaIndex {
    async fn get_slot(&self, source: &SourceKey) -> IndexResult<MediaSlot> {
        let state = self.state.lock().await;
        Ok(state
            .slots
            .get(&source.index_key())
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_current(
        &self,
        record: &MediaRecord,
        expected: &MediaSlot,
    ) -> IndexResult<()> {
        let mut state = self.state.lock().await;
        let slot_key = record.source.index_key();
        let current = state.slots.get(&slot_key).cloned().unwrap_or_default();

        if current.version != expected.version {
            return Err(IndexError::Conflict(format!(
                "slot {} is at version {}, expected {}",
                slot_key, current.version, expected.version
            )));
        }
        if state.records.contains_key(&record.media_id) {
            return Err(IndexError::Conflict(format!(
                "media {} already exists",
                record.media_id
            )));
        }

        if let Some(previous) = current.current_media_id {
            state.records.remove(&previous);
        }
        state.records.insert(record.media_id, record.clone());
        state.slots.insert(
            slot_key,
            MediaSlot {
                current_media_id: Some(record.media_id),
                version: current.version + 1,
            },
        );
        Ok(())
    }

    async fn clear_slot(&self, source: &SourceKey, if_current: Option<Uuid>) -> IndexResult<()> {
        let mut state = self.state.lock().await;
        if let Some(slot) = state.slots.get_mut(&source.index_key()) {
            if if_current.is_some() && slot.current_media_id != if_current {
                return Ok(());
            }
            slot.current_media_id = None;
            slot.version += 1;
        }
        Ok(())
    }

    async fn get(&self, media_id: Uuid) -> IndexResult<Option<MediaRecord>> {
        let state = self.state.lock().await;
        Ok(state.records.get(&media_id).cloned())
    }

    async fn query_by_source(&self, source: &SourceKey) -> IndexResult<Vec<MediaRecord>> {
        let state = self.state.lock().await;
        let mut records: Vec<MediaRecord> = state
            .records
            .values()
            .filter(|r| source.covers(&r.source))
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(records)
    }

    async fn update_status(&self, media_id: Uuid, status: MediaStatus) -> IndexResult<()> {
        let mut state = self.state.lock().await;
        match state.records.get_mut(&media_id) {
            Some(record) => {
                record.status = status;
                Ok(())
            }
            None => Err(IndexError::NotFound(format!("media {}", media_id))),
        }
    }

    async fn delete_many(&self, media_ids: &[Uuid]) -> IndexResult<()> {
        let mut state = self.state.lock().await;
        for id in media_ids {
            state.records.remove(id);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<String, UserProfile>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, user_id: &str) -> IndexResult<Option<UserProfile>> {
        Ok(self.users.lock().await.get(user_id).cloned())
    }

    async fn put(&self, profile: &UserProfile) -> IndexResult<()> {
        self.users
            .lock()
            .await
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn set_email(&self, user_id: &str, email: &str) -> IndexResult<()> {
        self.users
            .lock()
            .await
            .entry(user_id.to_string())
            .or_insert_with(|| UserProfile::empty(user_id))
            .email = Some(email.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar(user: &str) -> SourceKey {
        SourceKey::new("users", user).with_usage("avatar")
    }

    fn pending(user: &str) -> MediaRecord {
        MediaRecord::pending(user, avatar(user), "me.png", "image/png")
    }

    #[tokio::test]
    async fn test_replace_current_advances_slot_and_removes_previous() {
        let index = InMemoryMediaIndex::new();

        let first = pending("u-1");
        let slot = index.get_slot(&first.source).await.unwrap();
        assert_eq!(slot, MediaSlot::default());
        index.replace_current(&first, &slot).await.unwrap();

        let second = pending("u-1");
        let slot = index.get_slot(&second.source).await.unwrap();
        assert_eq!(slot.current_media_id, Some(first.media_id));
        assert_eq!(slot.version, 1);
        index.replace_current(&second, &slot).await.unwrap();

        assert!(index.get(first.media_id).await.unwrap().is_none());
        let listed = index.query_by_source(&avatar("u-1")).await.unwrap();
        assert_eq!(listed, vec![second.clone()]);
        assert_eq!(index.get_slot(&second.source).await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_stale_version_conflicts_without_writing() {
        let index = InMemoryMediaIndex::new();
        let source = avatar("u-1");
        let stale = index.get_slot(&source).await.unwrap();

        let winner = pending("u-1");
        let loser = pending("u-1");
        index.replace_current(&winner, &stale).await.unwrap();

        let err = index.replace_current(&loser, &stale).await.unwrap_err();
        assert!(matches!(err, IndexError::Conflict(_)));
        assert!(index.get(loser.media_id).await.unwrap().is_none());
        assert!(index.get(winner.media_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_query_without_usage_spans_usages_only_for_that_source() {
        let index = InMemoryMediaIndex::new();
        let avatar_record = pending("u-1");
        let banner_record = MediaRecord::pending(
            "u-1",
            SourceKey::new("users", "u-1").with_usage("banner"),
            "b.png",
            "image/png",
        );
        let other_user = pending("u-10");
        for record in [&avatar_record, &banner_record, &other_user] {
            let slot = index.get_slot(&record.source).await.unwrap();
            index.replace_current(record, &slot).await.unwrap();
        }

        let all = index
            .query_by_source(&SourceKey::new("users", "u-1"))
            .await
            .unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|r| r.source.source_id == "u-1"));
    }

    #[tokio::test]
    async fn test_clear_slot_respects_if_current() {
        let index = InMemoryMediaIndex::new();
        let record = pending("u-1");
        index
            .replace_current(&record, &MediaSlot::default())
            .await
            .unwrap();
        index
            .clear_slot(&record.source, Some(Uuid::new_v4()))
            .await
            .unwrap();
        let slot = index.get_slot(&record.source).await.unwrap();
        assert_eq!(slot.current_media_id, Some(record.media_id));
        assert_eq!(slot.version, 1);

        index.clear_slot(&record.source, None).await.unwrap();
        let slot = index.get_slot(&record.source).await.unwrap();
        assert_eq!(slot.current_media_id, None);
        assert_eq!(slot.version, 2);
    }

    #[tokio::test]
    async fn test_update_status_missing_record() {
        let index = InMemoryMediaIndex::new();
        let err = index
            .update_status(Uuid::new_v4(), MediaStatus::Ok)
            .await
            .unwrap_err();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_user_repository_put_get() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.get("u-1").await.unwrap().is_none());

        let mut profile = UserProfile::empty("u-1");
        profile.first_name = Some("Ada".to_string());
        repo.put(&profile).await.unwrap();
        assert_eq!(repo.get("u-1").await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn test_set_email_patches_or_creates_profile() {
        let repo = InMemoryUserRepository::new();
        let mut profile = UserProfile::empty("u-1");
        profile.first_name = Some("Ada".to_string());
        repo.put(&profile).await.unwrap();

        repo.set_email("u-1", "ada@example.com").await.unwrap();
        repo.set_email("u-2", "grace@example.com").await.unwrap();

        let patched = repo.get("u-1").await.unwrap().unwrap();
        assert_eq!(patched.first_name.as_deref(), Some("Ada"));
        assert_eq!(patched.email.as_deref(), Some("ada@example.com"));
        let created = repo.get("u-2").await.unwrap().unwrap();
        assert_eq!(created.email.as_deref(), Some("grace@example.com"));
    }
}
