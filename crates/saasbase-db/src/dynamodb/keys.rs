use saasbase_core::models::SourceKey;

pub(crate) use saasbase_core::constants::{
    MEDIA_BY_SOURCE_INDEX_NAME as BY_SOURCE_INDEX, MEDIA_BY_SOURCE_PARTITION_KEY as ATTR_SOURCE_KEY,
    MEDIA_TABLE_PARTITION_KEY as ATTR_MEDIA_ID, USERS_TABLE_PARTITION_KEY as ATTR_USER_ID,
};

pub(crate) const ATTR_SOURCE_NAME: &str = "sourceName";
pub(crate) const ATTR_SOURCE_ID: &str = "sourceId";
pub(crate) const ATTR_USAGE: &str = "usage";
pub(crate) const ATTR_FILE_NAME: &str = "fileName";
pub(crate) const ATTR_CONTENT_TYPE: &str = "contentType";
pub(crate) const ATTR_STATUS: &str = "status";
pub(crate) const ATTR_DATE_CREATED: &str = "dateCreated";
pub(crate) const ATTR_OWNER: &str = "userId";

pub(crate) const ATTR_CURRENT_MEDIA_ID: &str = "currentMediaId";
pub(crate) const ATTR_VERSION: &str = "version";

pub(crate) const ATTR_FIRST_NAME: &str = "firstName";
pub(crate) const ATTR_LAST_NAME: &str = "lastName";
pub(crate) const ATTR_EMAIL: &str = "email";

/// BatchWriteItem accepts at most 25 requests.
pub(crate) const MAX_BATCH_WRITE: usize = 25;

const SLOT_PREFIX: &str = "slot#";

/// Partition key value of a source's slot item.
pub(crate) fn slot_id(source: &SourceKey) -> String {
    format!("{}{}", SLOT_PREFIX, source.index_key())
}
