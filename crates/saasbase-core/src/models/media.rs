use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::constants::ORIGINAL_OBJECT_NAME;

/// Identifies the owner of a group of media: which entity (`source_name`,
/// `source_id`) and, optionally, what the media is used for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceKey {
    pub source_name: String,
    pub source_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl SourceKey {
    pub fn new(source_name: impl Into<String>, source_id: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            source_id: source_id.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = Some(usage.into());
        self
    }

    /// Composite index value `name#id#usage`; the usage part is empty when absent.
    pub fn index_key(&self) -> String {
        format!(
            "{}{}",
            self.index_prefix(),
            self.usage.as_deref().unwrap_or_default()
        )
    }

    /// `name#id#`, shared by every usage of this source.
    pub fn index_prefix(&self) -> String {
        format!("{}#{}#", self.source_name, self.source_id)
    }

    /// Whether records of `other` are listed under this key: an exact match
    /// when a usage is set, any usage of the same source otherwise.
    pub fn covers(&self, other: &SourceKey) -> bool {
        match &self.usage {
            Some(_) => self.index_key() == other.index_key(),
            None => other.index_key().starts_with(&self.index_prefix()),
        }
    }

    /// Object key prefix for everything stored under this source.
    pub fn object_prefix(&self) -> String {
        self.object_key(None, None)
    }

    /// Prefix holding the original and every variant of one media item.
    pub fn media_prefix(&self, media_id: Uuid) -> String {
        self.object_key(Some(media_id), None)
    }

    pub fn original_key(&self, media_id: Uuid) -> String {
        self.object_key(Some(media_id), Some(ORIGINAL_OBJECT_NAME))
    }

    pub fn variant_key(&self, media_id: Uuid, hash: &str) -> String {
        self.object_key(Some(media_id), Some(hash))
    }

    /// `source_name/source_id[/usage][/media_id][/name]`
    pub fn object_key(&self, media_id: Option<Uuid>, name: Option<&str>) -> String {
        let mut parts = vec![self.source_name.clone(), self.source_id.clone()];
        if let Some(usage) = self.usage.as_deref().filter(|u| !u.is_empty()) {
            parts.push(usage.to_string());
        }
        if let Some(id) = media_id {
            parts.push(id.to_string());
        }
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            parts.push(name.to_string());
        }
        parts.join("/")
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.index_key())
    }
}

/// Lifecycle of a media record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaStatus {
    /// Upload URL issued, bytes not yet confirmed
    Pending,
    /// Original loaded and decoded successfully
    Ok,
    /// Original exists but could not be decoded
    Error,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Pending => "pending",
            MediaStatus::Ok => "ok",
            MediaStatus::Error => "error",
        }
    }
}

impl FromStr for MediaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MediaStatus::Pending),
            "ok" => Ok(MediaStatus::Ok),
            "error" => Ok(MediaStatus::Error),
            other => Err(format!("Unknown media status: {}", other)),
        }
    }
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Indexed metadata for one uploaded media item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub media_id: Uuid,
    #[serde(flatten)]
    pub source: SourceKey,
    pub file_name: String,
    pub content_type: String,
    pub status: MediaStatus,
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl MediaRecord {
    /// A freshly issued record awaiting its upload.
    pub fn pending(
        user_id: impl Into<String>,
        source: SourceKey,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            media_id: Uuid::new_v4(),
            source,
            file_name: file_name.into(),
            content_type: content_type.into(),
            status: MediaStatus::Pending,
            created_at: Utc::now(),
            user_id: user_id.into(),
        }
    }
}

/// Per-source pointer to the current media item.
///
/// `version` starts at 0 for a source that has never had media and is
/// incremented by every successful replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaSlot {
    pub current_media_id: Option<Uuid>,
    pub version: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn avatar_source() -> SourceKey {
        SourceKey::new("users", "u-1").with_usage("avatar")
    }

    #[test]
    fn test_index_key() {
        assert_eq!(avatar_source().index_key(), "users#u-1#avatar");
        assert_eq!(SourceKey::new("users", "u-1").index_key(), "users#u-1#");
    }

    #[test]
    fn test_covers() {
        let all = SourceKey::new("users", "u-1");
        assert!(all.covers(&avatar_source()));
        assert!(all.covers(&SourceKey::new("users", "u-1")));
        assert!(!all.covers(&SourceKey::new("users", "u-10").with_usage("avatar")));
        assert!(avatar_source().covers(&avatar_source()));
        assert!(!avatar_source().covers(&SourceKey::new("users", "u-1").with_usage("banner")));
    }

    #[test]
    fn test_object_keys() {
        let id = Uuid::parse_str("0b7c1a54-52d7-4bcb-8b69-2f1f6d2f3a10").unwrap();
        let source = avatar_source();
        assert_eq!(source.object_prefix(), "users/u-1/avatar");
        assert_eq!(
            source.original_key(id),
            "users/u-1/avatar/0b7c1a54-52d7-4bcb-8b69-2f1f6d2f3a10/original"
        );
        assert_eq!(
            source.variant_key(id, "abc"),
            "users/u-1/avatar/0b7c1a54-52d7-4bcb-8b69-2f1f6d2f3a10/abc"
        );
        assert_eq!(
            SourceKey::new("posts", "p-9").object_key(Some(id), None),
            "posts/p-9/0b7c1a54-52d7-4bcb-8b69-2f1f6d2f3a10"
        );
    }

    #[test]
    fn test_status_round_trip_strings() {
        assert_eq!("ok".parse::<MediaStatus>().unwrap(), MediaStatus::Ok);
        assert!("done".parse::<MediaStatus>().is_err());
        assert_eq!(MediaStatus::Pending.to_string(), "pending");
    }
}
