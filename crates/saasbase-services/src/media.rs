//! Media uploads, listing, deletion and the resize cache.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use saasbase_core::hashing::hash_object;
use saasbase_core::models::{
    MediaRecord, MediaStatus, ResizeSpec, SourceKey, UploadRequest, UploadTicket,
};
use saasbase_core::AppError;
use saasbase_db::{IndexError, MediaIndex};
use saasbase_processing::{ImageTransform, ProcessingError};
use saasbase_storage::Storage;
use uuid::Uuid;
use validator::Validate;

/// A resized image, either freshly produced or read back from the cache
#[derive(Debug, Clone)]
pub struct ResizedMedia {
    pub data: Bytes,
    pub content_type: &'static str,
}

impl ResizedMedia {
    pub fn content_length(&self) -> usize {
        self.data.len()
    }
}

#[derive(Clone)]
pub struct MediaService {
    index: Arc<dyn MediaIndex>,
    storage: Arc<dyn Storage>,
    transformer: Arc<dyn ImageTransform>,
    upload_url_expiry: Duration,
}

impl MediaService {
    pub fn new(
        index: Arc<dyn MediaIndex>,
        storage: Arc<dyn Storage>,
        transformer: Arc<dyn ImageTransform>,
        upload_url_expiry: Duration,
    ) -> Self {
        Self {
            index,
            storage,
            transformer,
            upload_url_expiry,
        }
    }

    /// Record a pending media item as the source's current one and hand back
    /// a presigned URL for the client to PUT the original to.
    ///
    /// The previous current item (if any) is removed from the index in the
    /// same atomic write; its objects are removed afterwards.
    #[tracing::instrument(skip(self, request), fields(source = %source, file_name = %request.file_name))]
    pub async fn issue_upload(
        &self,
        user_id: &str,
        source: &SourceKey,
        request: &UploadRequest,
    ) -> Result<UploadTicket, AppError> {
        request.validate()?;

        let slot = self.index.get_slot(source).await?;
        let record = MediaRecord::pending(
            user_id,
            source.clone(),
            request.file_name.as_str(),
            request.file_type.trim().to_lowercase(),
        );

        self.index.replace_current(&record, &slot).await?;

        if let Some(previous) = slot.current_media_id {
            self.remove_objects(source, previous).await;
        }

        let upload_url = self
            .storage
            .presigned_put_url(
                &source.original_key(record.media_id),
                &record.content_type,
                self.upload_url_expiry,
            )
            .await?;

        tracing::info!(
            media_id = %record.media_id,
            replaced = ?slot.current_media_id,
            expires_in_secs = self.upload_url_expiry.as_secs(),
            "Upload URL issued"
        );

        Ok(UploadTicket {
            media_id: record.media_id,
            upload_url,
        })
    }

    /// Return `spec` applied to the media's original, serving a cached
    /// variant when one exists. `None` when the original was never uploaded.
    #[tracing::instrument(skip(self, spec), fields(source = %source, media_id = %media_id, sizing = %spec.sizing))]
    pub async fn resize(
        &self,
        source: &SourceKey,
        media_id: Uuid,
        spec: &ResizeSpec,
    ) -> Result<Option<ResizedMedia>, AppError> {
        spec.check()?;
        let content_type = spec.output_format().content_type();
        let hash = hash_object(spec)?;
        let variant_key = source.variant_key(media_id, &hash);

        if let Some(cached) = self.storage.download_if_exists(&variant_key).await? {
            tracing::debug!(key = %variant_key, "Resize cache hit");
            return Ok(Some(ResizedMedia {
                data: Bytes::from(cached),
                content_type,
            }));
        }

        let Some(original) = self
            .storage
            .download_if_exists(&source.original_key(media_id))
            .await?
        else {
            tracing::info!("Media original does not exist");
            return Ok(None);
        };

        let transformer = Arc::clone(&self.transformer);
        let job_spec = spec.clone();
        let outcome = tokio::task::spawn_blocking(move || transformer.transform(&original, &job_spec))
            .await
            .map_err(|e| AppError::Internal(format!("Resize task failed: {}", e)))?;

        let transformed = match outcome {
            Ok(transformed) => transformed,
            Err(err @ ProcessingError::Decode(_)) => {
                tracing::warn!(error = %err, "Media original is not a decodable image");
                self.mark_status(media_id, MediaStatus::Error).await;
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        };

        self.mark_status(media_id, MediaStatus::Ok).await;

        self.storage
            .upload_with_key(&variant_key, transformed.data.to_vec(), content_type)
            .await?;

        tracing::info!(
            key = %variant_key,
            width = transformed.width,
            height = transformed.height,
            size_bytes = transformed.data.len(),
            "Resize variant stored"
        );

        Ok(Some(ResizedMedia {
            data: transformed.data,
            content_type,
        }))
    }

    /// The item the source's slot currently points at.
    pub async fn current_media(&self, source: &SourceKey) -> Result<Option<MediaRecord>, AppError> {
        let slot = self.index.get_slot(source).await?;
        match slot.current_media_id {
            Some(media_id) => Ok(self.index.get(media_id).await?),
            None => Ok(None),
        }
    }

    pub async fn list_by_source(&self, source: &SourceKey) -> Result<Vec<MediaRecord>, AppError> {
        Ok(self.index.query_by_source(source).await?)
    }

    /// Delete every record, slot and object under `source`. Returns the
    /// number of records removed.
    #[tracing::instrument(skip(self), fields(source = %source))]
    pub async fn delete_all_for_source(&self, source: &SourceKey) -> Result<usize, AppError> {
        let records = self.index.query_by_source(source).await?;
        let ids: Vec<Uuid> = records.iter().map(|r| r.media_id).collect();
        self.index.delete_many(&ids).await?;

        let mut slots: Vec<&SourceKey> = records.iter().map(|r| &r.source).collect();
        if source.usage.is_some() {
            slots.push(source);
        }
        slots.sort_by_key(|s| s.index_key());
        slots.dedup();
        for slot_source in slots {
            self.index.clear_slot(slot_source, None).await?;
        }

        let objects = self.storage.delete_prefix(&source.object_prefix()).await?;

        tracing::info!(
            records = ids.len(),
            objects,
            "Deleted all media for source"
        );
        Ok(ids.len())
    }

    /// Delete one media item and its objects.
    #[tracing::instrument(skip(self), fields(source = %source, media_id = %media_id))]
    pub async fn delete_media(&self, source: &SourceKey, media_id: Uuid) -> Result<(), AppError> {
        let record = self
            .index
            .get(media_id)
            .await?
            .filter(|r| source.covers(&r.source))
            .ok_or_else(|| AppError::NotFound(format!("Media {} not found", media_id)))?;

        self.index
            .clear_slot(&record.source, Some(media_id))
            .await?;
        self.index.delete_many(&[media_id]).await?;
        self.storage
            .delete_prefix(&record.source.media_prefix(media_id))
            .await?;

        tracing::info!("Media deleted");
        Ok(())
    }

    async fn remove_objects(&self, source: &SourceKey, media_id: Uuid) {
        let prefix = source.media_prefix(media_id);
        match self.storage.delete_prefix(&prefix).await {
            Ok(count) => tracing::info!(
                prefix = %prefix,
                objects = count,
                "Removed objects of superseded media"
            ),
            Err(e) => tracing::warn!(
                prefix = %prefix,
                error = %e,
                "Failed to remove objects of superseded media"
            ),
        }
    }

    async fn mark_status(&self, media_id: Uuid, status: MediaStatus) {
        match self.index.update_status(media_id, status).await {
            Ok(()) => {}
            Err(IndexError::NotFound(_)) => {
                tracing::debug!(media_id = %media_id, "Status not recorded, media record is gone");
            }
            Err(e) => {
                tracing::warn!(media_id = %media_id, status = %status, error = %e, "Failed to record media status");
            }
        }
    }
}
