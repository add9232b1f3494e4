//! Media, avatar and resize-cache behaviour over the in-memory index and
//! local storage.
//!
//! Run with: `cargo test -p saasbase-services --test media_service_test`

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use helpers::{png_bytes, setup_media, setup_media_with_index, upload_request};
use saasbase_core::models::{
    MediaRecord, MediaSlot, MediaStatus, ResizeSpec, Sizing, SourceKey, UploadRequest,
};
use saasbase_core::AppError;
use saasbase_db::{InMemoryMediaIndex, IndexResult, MediaIndex};
use saasbase_services::AvatarService;
use tokio::sync::Barrier;
use uuid::Uuid;

fn avatar_source(user_id: &str) -> SourceKey {
    SourceKey::new("users", user_id).with_usage("avatar")
}

#[tokio::test]
async fn test_issue_upload_records_pending_media() {
    let media = setup_media().await;
    let source = avatar_source("u-1");

    let ticket = media
        .service
        .issue_upload("u-1", &source, &upload_request("me.png"))
        .await
        .unwrap();

    let key = source.original_key(ticket.media_id);
    assert_eq!(ticket.upload_url, format!("{}/{}", helpers::TEST_BASE_URL, key));

    let current = media.service.current_media(&source).await.unwrap().unwrap();
    assert_eq!(current.media_id, ticket.media_id);
    assert_eq!(current.status, MediaStatus::Pending);
    assert_eq!(current.user_id, "u-1");
    assert_eq!(current.file_name, "me.png");
}

#[tokio::test]
async fn test_issue_upload_rejects_non_image_type() {
    let media = setup_media().await;
    let request = UploadRequest {
        file_name: "notes.txt".to_string(),
        file_type: "text/plain".to_string(),
    };

    let err = media
        .service
        .issue_upload("u-1", &avatar_source("u-1"), &request)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    assert!(media
        .service
        .list_by_source(&avatar_source("u-1"))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_replacement_removes_prior_record_and_objects() {
    let media = setup_media().await;
    let source = avatar_source("u-1");

    let first = media
        .service
        .issue_upload("u-1", &source, &upload_request("a.png"))
        .await
        .unwrap();
    media
        .storage
        .upload_with_key(&source.original_key(first.media_id), png_bytes(64, 64), "image/png")
        .await
        .unwrap();
    media
        .service
        .resize(&source, first.media_id, &ResizeSpec::avatar())
        .await
        .unwrap()
        .unwrap();

    let second = media
        .service
        .issue_upload("u-1", &source, &upload_request("b.png"))
        .await
        .unwrap();

    let records = media.service.list_by_source(&source).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].media_id, second.media_id);
    assert!(media.index.get(first.media_id).await.unwrap().is_none());
    assert!(media
        .storage
        .list_prefix(&source.media_prefix(first.media_id))
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_resize_cache_hit_skips_transform() {
    let media = setup_media().await;
    let source = avatar_source("u-1");
    let ticket = media
        .service
        .issue_upload("u-1", &source, &upload_request("a.png"))
        .await
        .unwrap();
    media
        .storage
        .upload_with_key(&source.original_key(ticket.media_id), png_bytes(640, 480), "image/png")
        .await
        .unwrap();

    let spec = ResizeSpec::avatar();
    let first = media
        .service
        .resize(&source, ticket.media_id, &spec)
        .await
        .unwrap()
        .unwrap();
    let second = media
        .service
        .resize(&source, ticket.media_id, &spec)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(media.transformer.calls(), 1);
    assert_eq!(first.data, second.data);
    assert_eq!(second.content_type, "image/png");

    let decoded = image::load_from_memory(&second.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 200));

    let record = media.index.get(ticket.media_id).await.unwrap().unwrap();
    assert_eq!(record.status, MediaStatus::Ok);
}

#[tokio::test]
async fn test_resize_without_original_returns_none() {
    let media = setup_media().await;
    let source = avatar_source("u-1");
    let ticket = media
        .service
        .issue_upload("u-1", &source, &upload_request("a.png"))
        .await
        .unwrap();

    let result = media
        .service
        .resize(&source, ticket.media_id, &ResizeSpec::avatar())
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(media.transformer.calls(), 0);
}

#[tokio::test]
async fn test_resize_rejects_missing_dimensions() {
    let media = setup_media().await;
    let err = media
        .service
        .resize(&avatar_source("u-1"), Uuid::new_v4(), &ResizeSpec::new(Sizing::Crop).width(10))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn test_undecodable_original_marks_error() {
    let media = setup_media().await;
    let source = avatar_source("u-1");
    let ticket = media
        .service
        .issue_upload("u-1", &source, &upload_request("a.png"))
        .await
        .unwrap();
    media
        .storage
        .upload_with_key(&source.original_key(ticket.media_id), b"not an image".to_vec(), "image/png")
        .await
        .unwrap();

    let err = media
        .service
        .resize(&source, ticket.media_id, &ResizeSpec::avatar())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ImageProcessing(_)));
    let record = media.index.get(ticket.media_id).await.unwrap().unwrap();
    assert_eq!(record.status, MediaStatus::Error);
}

#[tokio::test]
async fn test_delete_all_for_source_without_usage() {
    let media = setup_media().await;
    let avatar = avatar_source("u-1");
    let banner = SourceKey::new("users", "u-1").with_usage("banner");
    let other_user = avatar_source("u-10");

    for source in [&avatar, &banner, &other_user] {
        let ticket = media
            .service
            .issue_upload("u-1", source, &upload_request("a.png"))
            .await
            .unwrap();
        media
            .storage
            .upload_with_key(&source.original_key(ticket.media_id), png_bytes(8, 8), "image/png")
            .await
            .unwrap();
    }

    let removed = media
        .service
        .delete_all_for_source(&SourceKey::new("users", "u-1"))
        .await
        .unwrap();

    assert_eq!(removed, 2);
    assert!(media.service.current_media(&avatar).await.unwrap().is_none());
    assert!(media.service.current_media(&banner).await.unwrap().is_none());
    assert!(media.service.current_media(&other_user).await.unwrap().is_some());
    assert!(media.storage.list_prefix("users/u-1/").await.unwrap().is_empty());
    assert_eq!(media.storage.list_prefix("users/u-10/").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_media_checks_source() {
    let media = setup_media().await;
    let source = avatar_source("u-1");
    let ticket = media
        .service
        .issue_upload("u-1", &source, &upload_request("a.png"))
        .await
        .unwrap();

    let err = media
        .service
        .delete_media(&avatar_source("u-2"), ticket.media_id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    media.service.delete_media(&source, ticket.media_id).await.unwrap();
    assert!(media.service.current_media(&source).await.unwrap().is_none());

    // The slot moved on, so a fresh upload starts cleanly.
    media
        .service
        .issue_upload("u-1", &source, &upload_request("b.png"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_avatar_round_trip() {
    let media = setup_media().await;
    let avatars = AvatarService::new(media.service.clone());

    assert!(avatars.get_avatar("u-1").await.unwrap().is_none());

    let ticket = avatars
        .replace_avatar("u-1", &upload_request("me.png"))
        .await
        .unwrap();
    media
        .storage
        .upload_with_key(
            &AvatarService::source("u-1").original_key(ticket.media_id),
            png_bytes(300, 500),
            "image/png",
        )
        .await
        .unwrap();

    let avatar = avatars.get_avatar("u-1").await.unwrap().unwrap();
    let decoded = image::load_from_memory(&avatar.data).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (200, 200));

    assert_eq!(avatars.remove_avatar("u-1").await.unwrap(), 1);
    assert!(avatars.get_avatar("u-1").await.unwrap().is_none());
}

/// Holds every `get_slot` caller until all of them have read the slot.
struct LockstepIndex {
    inner: InMemoryMediaIndex,
    barrier: Barrier,
}

#[async_trait]
impl MediaIndex for LockstepIndex {
    async fn get_slot(&self, source: &SourceKey) -> IndexResult<MediaSlot> {
        let slot = self.inner.get_slot(source).await;
        self.barrier.wait().await;
        slot
    }

    async fn replace_current(&self, record: &MediaRecord, expected: &MediaSlot) -> IndexResult<()> {
        self.inner.replace_current(record, expected).await
    }

    async fn clear_slot(&self, source: &SourceKey, if_current: Option<Uuid>) -> IndexResult<()> {
        self.inner.clear_slot(source, if_current).await
    }

    async fn get(&self, media_id: Uuid) -> IndexResult<Option<MediaRecord>> {
        self.inner.get(media_id).await
    }

    async fn query_by_source(&self, source: &SourceKey) -> IndexResult<Vec<MediaRecord>> {
        self.inner.query_by_source(source).await
    }

    async fn update_status(&self, media_id: Uuid, status: MediaStatus) -> IndexResult<()> {
        self.inner.update_status(media_id, status).await
    }

    async fn delete_many(&self, media_ids: &[Uuid]) -> IndexResult<()> {
        self.inner.delete_many(media_ids).await
    }
}

#[tokio::test]
async fn test_concurrent_replacements_one_conflicts() {
    let index = Arc::new(LockstepIndex {
        inner: InMemoryMediaIndex::new(),
        barrier: Barrier::new(2),
    });
    let media = setup_media_with_index(index).await;
    let source = avatar_source("u-1");

    let first_request = upload_request("a.png");
    let second_request = upload_request("b.png");
    let (first, second) = tokio::join!(
        media.service.issue_upload("u-1", &source, &first_request),
        media.service.issue_upload("u-1", &source, &second_request),
    );

    let outcomes = [first, second];
    let winners: Vec<_> = outcomes.iter().filter_map(|r| r.as_ref().ok()).collect();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Err(AppError::Conflict(_))))
        .count();
    assert_eq!(winners.len(), 1);
    assert_eq!(conflicts, 1);

    let records = media.service.list_by_source(&source).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].media_id, winners[0].media_id);
}
