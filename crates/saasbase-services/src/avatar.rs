//! One current avatar per user, built on the media service.

use std::sync::Arc;

use saasbase_core::constants::{AVATAR_USAGE, USERS_SOURCE_NAME};
use saasbase_core::models::{ResizeSpec, SourceKey, UploadRequest, UploadTicket};
use saasbase_core::AppError;

use crate::media::{MediaService, ResizedMedia};

#[derive(Clone)]
pub struct AvatarService {
    media: Arc<MediaService>,
}

impl AvatarService {
    pub fn new(media: Arc<MediaService>) -> Self {
        Self { media }
    }

    pub fn source(user_id: &str) -> SourceKey {
        SourceKey::new(USERS_SOURCE_NAME, user_id).with_usage(AVATAR_USAGE)
    }

    /// The user's avatar as a 200x200 crop, or `None` when there is nothing
    /// to serve.
    #[tracing::instrument(skip(self))]
    pub async fn get_avatar(&self, user_id: &str) -> Result<Option<ResizedMedia>, AppError> {
        let source = Self::source(user_id);
        let Some(record) = self.media.current_media(&source).await? else {
            tracing::debug!("No avatar on record");
            return Ok(None);
        };
        self.media
            .resize(&source, record.media_id, &ResizeSpec::avatar())
            .await
    }

    pub async fn replace_avatar(
        &self,
        user_id: &str,
        request: &UploadRequest,
    ) -> Result<UploadTicket, AppError> {
        self.media
            .issue_upload(user_id, &Self::source(user_id), request)
            .await
    }

    /// Remove every avatar record and object of the user. Returns the number
    /// of records removed.
    pub async fn remove_avatar(&self, user_id: &str) -> Result<usize, AppError> {
        self.media
            .delete_all_for_source(&Self::source(user_id))
            .await
    }
}
