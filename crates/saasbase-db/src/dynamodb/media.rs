use async_trait::async_trait;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::get_item::builders::GetItemFluentBuilder;
use aws_sdk_dynamodb::operation::transact_write_items::TransactWriteItemsError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{
    AttributeValue, Delete, DeleteRequest, Put, TransactWriteItem, Update, WriteRequest,
};
use aws_sdk_dynamodb::Client;
use saasbase_core::models::{MediaRecord, MediaSlot, MediaStatus, SourceKey};
use uuid::Uuid;

use super::conversions::{item_to_media_record, item_to_slot, media_record_to_item, Item};
use super::keys::*;
use crate::error::{IndexError, IndexResult};
use crate::traits::MediaIndex;

/// Rounds of resubmitting `UnprocessedItems` before a batch delete gives up.
const MAX_UNPROCESSED_ROUNDS: usize = 3;

/// [`MediaIndex`] backed by the media table and its `bySource` index
#[derive(Clone)]
pub struct DynamoMediaIndex {
    client: Client,
    table_name: String,
}

impl DynamoMediaIndex {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn media_key(media_id: &str) -> (String, AttributeValue) {
        (
            ATTR_MEDIA_ID.to_string(),
            AttributeValue::S(media_id.to_string()),
        )
    }

    /// Strongly consistent point read, so a record is visible as soon as the
    /// slot that names it is.
    fn get_request(&self, media_id: &str) -> GetItemFluentBuilder {
        let (name, value) = Self::media_key(media_id);
        self.client
            .get_item()
            .table_name(&self.table_name)
            .key(name, value)
            .consistent_read(true)
    }

    fn backend_error<E>(&self, operation: &str, err: E) -> IndexError
    where
        E: std::error::Error + 'static,
    {
        let message = DisplayErrorContext(err).to_string();
        tracing::error!(
            table = %self.table_name,
            operation = operation,
            error = %message,
            "DynamoDB request failed"
        );
        IndexError::Backend(format!("{} failed: {}", operation, message))
    }

    fn slot_update(&self, record: &MediaRecord, expected: &MediaSlot) -> IndexResult<Update> {
        let mut update = Update::builder()
            .table_name(&self.table_name)
            .key(ATTR_MEDIA_ID, AttributeValue::S(slot_id(&record.source)))
            .update_expression("SET #current = :current, #version = :next")
            .expression_attribute_names("#current", ATTR_CURRENT_MEDIA_ID)
            .expression_attribute_names("#version", ATTR_VERSION)
            .expression_attribute_values(":current", AttributeValue::S(record.media_id.to_string()))
            .expression_attribute_values(
                ":next",
                AttributeValue::N((expected.version + 1).to_string()),
            );

        update = if expected.version == 0 {
            update.condition_expression("attribute_not_exists(#version)")
        } else {
            update
                .condition_expression("#version = :expected")
                .expression_attribute_values(
                    ":expected",
                    AttributeValue::N(expected.version.to_string()),
                )
        };

        update
            .build()
            .map_err(|e| IndexError::Backend(e.to_string()))
    }

    async fn query_exact(&self, source_key: String) -> IndexResult<Vec<Item>> {
        self.client
            .query()
            .table_name(&self.table_name)
            .index_name(BY_SOURCE_INDEX)
            .key_condition_expression("#pk = :pk")
            .expression_attribute_names("#pk", ATTR_SOURCE_KEY)
            .expression_attribute_values(":pk", AttributeValue::S(source_key))
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| self.backend_error("Query", e))
    }

    /// DynamoDB rejects `begins_with` on a partition key, so prefix listing
    /// scans the table with a filter instead.
    async fn scan_prefix(&self, prefix: String) -> IndexResult<Vec<Item>> {
        self.client
            .scan()
            .table_name(&self.table_name)
            .filter_expression("begins_with(#pk, :prefix)")
            .expression_attribute_names("#pk", ATTR_SOURCE_KEY)
            .expression_attribute_values(":prefix", AttributeValue::S(prefix))
            .into_paginator()
            .items()
            .send()
            .collect::<Result<Vec<_>, _>>()
            .await
            .map_err(|e| self.backend_error("Scan", e))
    }

    async fn batch_delete(&self, chunk: &[Uuid]) -> IndexResult<()> {
        let mut requests = chunk
            .iter()
            .map(|id| {
                let (name, value) = Self::media_key(&id.to_string());
                let delete = DeleteRequest::builder()
                    .key(name, value)
                    .build()
                    .map_err(|e| IndexError::Backend(e.to_string()))?;
                Ok(WriteRequest::builder().delete_request(delete).build())
            })
            .collect::<IndexResult<Vec<_>>>()?;

        for _ in 0..MAX_UNPROCESSED_ROUNDS {
            let response = self
                .client
                .batch_write_item()
                .request_items(&self.table_name, requests)
                .send()
                .await
                .map_err(|e| self.backend_error("BatchWriteItem", e))?;

            requests = response
                .unprocessed_items
                .and_then(|mut unprocessed| unprocessed.remove(&self.table_name))
                .unwrap_or_default();
            if requests.is_empty() {
                return Ok(());
            }
            tracing::warn!(
                table = %self.table_name,
                unprocessed = requests.len(),
                "BatchWriteItem returned unprocessed deletes"
            );
        }

        Err(IndexError::Backend(format!(
            "{} deletes still unprocessed after {} rounds",
            requests.len(),
            MAX_UNPROCESSED_ROUNDS
        )))
    }
}

fn is_condition_failure(err: &SdkError<TransactWriteItemsError>) -> bool {
    match err.as_service_error() {
        Some(TransactWriteItemsError::TransactionCanceledException(e)) => e
            .cancellation_reasons()
            .iter()
            .any(|reason| reason.code() == Some("ConditionalCheckFailed")),
        _ => false,
    }
}

#[async_trait]
impl MediaIndex for DynamoMediaIndex {
    async fn get_slot(&self, source: &SourceKey) -> IndexResult<MediaSlot> {
        let response = self
            .get_request(&slot_id(source))
            .send()
            .await
            .map_err(|e| self.backend_error("GetItem", e))?;

        match response.item {
            Some(item) => item_to_slot(&item),
            None => Ok(MediaSlot::default()),
        }
    }

    async fn replace_current(
        &self,
        record: &MediaRecord,
        expected: &MediaSlot,
    ) -> IndexResult<()> {
        let start = std::time::Instant::now();

        let put = Put::builder()
            .table_name(&self.table_name)
            .set_item(Some(media_record_to_item(record)))
            .condition_expression("attribute_not_exists(#pk)")
            .expression_attribute_names("#pk", ATTR_MEDIA_ID)
            .build()
            .map_err(|e| IndexError::Backend(e.to_string()))?;

        let mut request = self
            .client
            .transact_write_items()
            .transact_items(TransactWriteItem::builder().put(put).build())
            .transact_items(
                TransactWriteItem::builder()
                    .update(self.slot_update(record, expected)?)
                    .build(),
            );

        if let Some(previous) = expected.current_media_id {
            let (name, value) = Self::media_key(&previous.to_string());
            let delete = Delete::builder()
                .table_name(&self.table_name)
                .key(name, value)
                .build()
                .map_err(|e| IndexError::Backend(e.to_string()))?;
            request = request.transact_items(TransactWriteItem::builder().delete(delete).build());
        }

        match request.send().await {
            Ok(_) => {
                tracing::info!(
                    table = %self.table_name,
                    source = %record.source,
                    media_id = %record.media_id,
                    replaced = ?expected.current_media_id,
                    version = expected.version + 1,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Media slot advanced"
                );
                Ok(())
            }
            Err(e) if is_condition_failure(&e) => {
                tracing::warn!(
                    table = %self.table_name,
                    source = %record.source,
                    expected_version = expected.version,
                    "Media slot changed concurrently"
                );
                Err(IndexError::Conflict(format!(
                    "slot for {} is no longer at version {}",
                    record.source, expected.version
                )))
            }
            Err(e) => Err(self.backend_error("TransactWriteItems", e)),
        }
    }

    async fn clear_slot(&self, source: &SourceKey, if_current: Option<Uuid>) -> IndexResult<()> {
        let (name, value) = Self::media_key(&slot_id(source));
        let mut request = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(name, value)
            .update_expression("REMOVE #current SET #version = #version + :one")
            .expression_attribute_names("#current", ATTR_CURRENT_MEDIA_ID)
            .expression_attribute_names("#version", ATTR_VERSION)
            .expression_attribute_values(":one", AttributeValue::N("1".to_string()));

        request = match if_current {
            Some(media_id) => request
                .condition_expression("#current = :media")
                .expression_attribute_values(":media", AttributeValue::S(media_id.to_string())),
            None => request.condition_expression("attribute_exists(#version)"),
        };

        match request.send().await {
            Ok(_) => {
                tracing::info!(
                    table = %self.table_name,
                    source = %source,
                    "Media slot cleared"
                );
                Ok(())
            }
            Err(e)
                if matches!(
                    e.as_service_error(),
                    Some(UpdateItemError::ConditionalCheckFailedException(_))
                ) =>
            {
                Ok(())
            }
            Err(e) => Err(self.backend_error("UpdateItem", e)),
        }
    }

    async fn get(&self, media_id: Uuid) -> IndexResult<Option<MediaRecord>> {
        let response = self
            .get_request(&media_id.to_string())
            .send()
            .await
            .map_err(|e| self.backend_error("GetItem", e))?;

        response
            .item
            .as_ref()
            .map(item_to_media_record)
            .transpose()
    }

    async fn query_by_source(&self, source: &SourceKey) -> IndexResult<Vec<MediaRecord>> {
        let start = std::time::Instant::now();
        let items = match source.usage {
            Some(_) => self.query_exact(source.index_key()).await?,
            None => self.scan_prefix(source.index_prefix()).await?,
        };

        let mut records = items
            .iter()
            .map(item_to_media_record)
            .collect::<IndexResult<Vec<_>>>()?;
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        tracing::debug!(
            table = %self.table_name,
            source = %source,
            count = records.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media listed by source"
        );

        Ok(records)
    }

    async fn update_status(&self, media_id: Uuid, status: MediaStatus) -> IndexResult<()> {
        let (name, value) = Self::media_key(&media_id.to_string());
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .key(name, value)
            .update_expression("SET #status = :status")
            .condition_expression("attribute_exists(#pk)")
            .expression_attribute_names("#status", ATTR_STATUS)
            .expression_attribute_names("#pk", ATTR_MEDIA_ID)
            .expression_attribute_values(":status", AttributeValue::S(status.to_string()))
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e)
                if matches!(
                    e.as_service_error(),
                    Some(UpdateItemError::ConditionalCheckFailedException(_))
                ) =>
            {
                Err(IndexError::NotFound(format!("media {}", media_id)))
            }
            Err(e) => Err(self.backend_error("UpdateItem", e)),
        }
    }

    async fn delete_many(&self, media_ids: &[Uuid]) -> IndexResult<()> {
        if media_ids.is_empty() {
            return Ok(());
        }
        for chunk in media_ids.chunks(MAX_BATCH_WRITE) {
            self.batch_delete(chunk).await?;
        }
        tracing::info!(
            table = %self.table_name,
            count = media_ids.len(),
            "Media records deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::config::{BehaviorVersion, Region};

    fn index() -> DynamoMediaIndex {
        let config = aws_sdk_dynamodb::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        DynamoMediaIndex::new(Client::from_conf(config), "saasbase-test-media")
    }

    #[test]
    fn test_point_reads_are_strongly_consistent() {
        let index = index();
        let media_id = Uuid::new_v4().to_string();
        let request = index.get_request(&media_id);
        let input = request.as_input();

        assert_eq!(input.get_consistent_read(), &Some(true));
        assert_eq!(input.get_table_name().as_deref(), Some("saasbase-test-media"));
        assert_eq!(
            input
                .get_key()
                .as_ref()
                .and_then(|key| key.get(ATTR_MEDIA_ID)),
            Some(&AttributeValue::S(media_id))
        );
    }
}
