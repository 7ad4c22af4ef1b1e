use axum::{body::Bytes, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::speech::{FinishOutcome, FinisherApi, FinisherService, ObjectCreated},
    error::{AppError, AppResult},
};

/// S3 event notification, only the fields the Finisher reads
#[derive(Debug, Serialize, Deserialize)]
pub struct StorageEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageEventRecord {
    pub s3: S3Entity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageEventResponse {
    pub processed: usize,
    pub skipped: usize,
}

/// Keys in event notifications are form-encoded (`+` for space)
pub fn decode_event_key(key: &str) -> Result<String, AppError> {
    urlencoding::decode(&key.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| AppError::BadRequest(format!("undecodable object key '{}': {}", key, e)))
}

pub struct StorageEventsController {
    finisher: Arc<FinisherService>,
}

impl StorageEventsController {
    pub fn new(finisher: Arc<FinisherService>) -> Self {
        Self { finisher }
    }

    /// POST /storage/events - Finish synthesis jobs whose output just landed
    pub async fn handle_event(
        State(controller): State<Arc<StorageEventsController>>,
        body: Bytes,
    ) -> AppResult<Json<StorageEventResponse>> {
        let event: StorageEvent = serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("malformed storage event: {}", e)))?;

        if event.records.is_empty() {
            return Err(AppError::BadRequest(
                "storage event has no records".to_string(),
            ));
        }

        // Every record is checked before any is finished: a rejected batch is
        // redelivered, so nothing may have been uploaded or sent for it.
        let objects = event
            .records
            .into_iter()
            .map(|record| -> AppResult<ObjectCreated> {
                let object = ObjectCreated {
                    bucket: record.s3.bucket.name,
                    key: decode_event_key(&record.s3.object.key)?,
                };
                controller.finisher.resolve_chat(&object)?;
                Ok(object)
            })
            .collect::<AppResult<Vec<_>>>()?;

        let mut response = StorageEventResponse {
            processed: 0,
            skipped: 0,
        };

        for object in &objects {
            match controller.finisher.finish(object).await? {
                FinishOutcome::Replied(_) => response.processed += 1,
                FinishOutcome::Skipped => response.skipped += 1,
            }
        }

        Ok(Json(response))
    }
}
