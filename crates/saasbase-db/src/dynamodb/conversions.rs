//! Item <-> model conversions.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};
use saasbase_core::models::{MediaRecord, MediaSlot, MediaStatus, SourceKey, UserProfile};
use uuid::Uuid;

use super::keys::*;
use crate::error::{IndexError, IndexResult};

pub(crate) type Item = HashMap<String, AttributeValue>;

fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

fn get_str<'a>(item: &'a Item, name: &str) -> Option<&'a str> {
    item.get(name).and_then(|v| v.as_s().ok()).map(String::as_str)
}

fn require_str<'a>(item: &'a Item, name: &str) -> IndexResult<&'a str> {
    get_str(item, name)
        .ok_or_else(|| IndexError::InvalidItem(format!("missing string attribute {}", name)))
}

fn parse_uuid(value: &str, name: &str) -> IndexResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| IndexError::InvalidItem(format!("{} is not a uuid: {}", name, e)))
}

pub(crate) fn media_record_to_item(record: &MediaRecord) -> Item {
    let mut item = Item::new();
    item.insert(ATTR_MEDIA_ID.to_string(), s(record.media_id.to_string()));
    item.insert(ATTR_SOURCE_KEY.to_string(), s(record.source.index_key()));
    item.insert(ATTR_SOURCE_NAME.to_string(), s(&record.source.source_name));
    item.insert(ATTR_SOURCE_ID.to_string(), s(&record.source.source_id));
    if let Some(usage) = &record.source.usage {
        item.insert(ATTR_USAGE.to_string(), s(usage));
    }
    item.insert(ATTR_FILE_NAME.to_string(), s(&record.file_name));
    item.insert(ATTR_CONTENT_TYPE.to_string(), s(&record.content_type));
    item.insert(ATTR_STATUS.to_string(), s(record.status.as_str()));
    item.insert(
        ATTR_DATE_CREATED.to_string(),
        s(record.created_at.to_rfc3339()),
    );
    item.insert(ATTR_OWNER.to_string(), s(&record.user_id));
    item
}

pub(crate) fn item_to_media_record(item: &Item) -> IndexResult<MediaRecord> {
    let media_id = parse_uuid(require_str(item, ATTR_MEDIA_ID)?, ATTR_MEDIA_ID)?;
    let source = SourceKey {
        source_name: require_str(item, ATTR_SOURCE_NAME)?.to_string(),
        source_id: require_str(item, ATTR_SOURCE_ID)?.to_string(),
        usage: get_str(item, ATTR_USAGE)
            .filter(|u| !u.is_empty())
            .map(String::from),
    };
    let status = require_str(item, ATTR_STATUS)?
        .parse::<MediaStatus>()
        .map_err(IndexError::InvalidItem)?;
    let created_at = DateTime::parse_from_rfc3339(require_str(item, ATTR_DATE_CREATED)?)
        .map_err(|e| IndexError::InvalidItem(format!("bad {}: {}", ATTR_DATE_CREATED, e)))?
        .with_timezone(&Utc);

    Ok(MediaRecord {
        media_id,
        source,
        file_name: get_str(item, ATTR_FILE_NAME).unwrap_or_default().to_string(),
        content_type: get_str(item, ATTR_CONTENT_TYPE)
            .unwrap_or_default()
            .to_string(),
        status,
        created_at,
        user_id: get_str(item, ATTR_OWNER).unwrap_or_default().to_string(),
    })
}

pub(crate) fn item_to_slot(item: &Item) -> IndexResult<MediaSlot> {
    let version = item
        .get(ATTR_VERSION)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| IndexError::InvalidItem(format!("slot without {}", ATTR_VERSION)))?
        .parse::<u64>()
        .map_err(|e| IndexError::InvalidItem(format!("bad slot version: {}", e)))?;
    let current_media_id = get_str(item, ATTR_CURRENT_MEDIA_ID)
        .map(|id| parse_uuid(id, ATTR_CURRENT_MEDIA_ID))
        .transpose()?;
    Ok(MediaSlot {
        current_media_id,
        version,
    })
}

pub(crate) fn profile_to_item(profile: &UserProfile) -> Item {
    let mut item = Item::new();
    item.insert(ATTR_USER_ID.to_string(), s(&profile.user_id));
    if let Some(first_name) = &profile.first_name {
        item.insert(ATTR_FIRST_NAME.to_string(), s(first_name));
    }
    if let Some(last_name) = &profile.last_name {
        item.insert(ATTR_LAST_NAME.to_string(), s(last_name));
    }
    if let Some(email) = &profile.email {
        item.insert(ATTR_EMAIL.to_string(), s(email));
    }
    item
}

pub(crate) fn item_to_profile(item: &Item) -> IndexResult<UserProfile> {
    Ok(UserProfile {
        user_id: require_str(item, ATTR_USER_ID)?.to_string(),
        first_name: get_str(item, ATTR_FIRST_NAME).map(String::from),
        last_name: get_str(item, ATTR_LAST_NAME).map(String::from),
        email: get_str(item, ATTR_EMAIL).map(String::from),
    })
}
