// crates/store/src/record.rs
//! On-disk record representation and its conversion to sync items
//!
//! Records carry epoch-seconds timestamps with `0` meaning "unset" for the
//! optional dates, and a `progress` byte where `0` is "completed". The
//! conversions below are total: every field of one representation maps to
//! exactly one field of the other, both ways.

use crate::error::{StoreFileError, StoreFileResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasklink_core::{AppId, Item, MappedId};

/// Marks a task as finished in the record's progress byte
const PROGRESS_DONE: u8 = 0;
/// Marks a task as still open
const PROGRESS_OPEN: u8 = 1;

/// One task as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    pub app_id: String,
    pub sync_id: u32,
    pub created: i64,
    pub modified: i64,
    pub category: String,
    pub start_date: i64,
    pub due_date: i64,
    pub completed_date: i64,
    pub progress: u8,
    pub priority: u8,
    pub summary: String,
    pub notes: String,
}

fn required_date(
    secs: i64,
    app_id: &str,
    field: &'static str,
) -> StoreFileResult<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| StoreFileError::BadTimestamp {
        app_id: app_id.to_string(),
        field,
        value: secs,
    })
}

fn optional_date(
    secs: i64,
    app_id: &str,
    field: &'static str,
) -> StoreFileResult<Option<DateTime<Utc>>> {
    if secs == 0 {
        Ok(None)
    } else {
        required_date(secs, app_id, field).map(Some)
    }
}

/// Converts an on-disk record into a sync item
pub fn record_to_item(record: &TaskRecord) -> StoreFileResult<Item> {
    Ok(Item {
        app_id: AppId::new(record.app_id.clone()),
        mapped_id: MappedId::new(record.sync_id),
        created_at: required_date(record.created, &record.app_id, "created")?,
        modified_at: required_date(record.modified, &record.app_id, "modified")?,
        summary: record.summary.clone(),
        notes: record.notes.clone(),
        category: record.category.clone(),
        priority: record.priority,
        completed: record.progress == PROGRESS_DONE,
        start_date: optional_date(record.start_date, &record.app_id, "start_date")?,
        due_date: optional_date(record.due_date, &record.app_id, "due_date")?,
        completed_date: optional_date(record.completed_date, &record.app_id, "completed_date")?,
    })
}

/// Converts a sync item into its on-disk record
///
/// Timestamps are stored at second precision, matching the record format.
pub fn item_to_record(item: &Item) -> TaskRecord {
    TaskRecord {
        app_id: item.app_id.to_string(),
        sync_id: item.mapped_id.as_u32(),
        created: item.created_at.timestamp(),
        modified: item.modified_at.timestamp(),
        category: item.category.clone(),
        start_date: item.start_date.map(|d| d.timestamp()).unwrap_or(0),
        due_date: item.due_date.map(|d| d.timestamp()).unwrap_or(0),
        completed_date: item.completed_date.map(|d| d.timestamp()).unwrap_or(0),
        progress: if item.completed {
            PROGRESS_DONE
        } else {
            PROGRESS_OPEN
        },
        priority: item.priority,
        summary: item.summary.clone(),
        notes: item.notes.clone(),
    }
}
