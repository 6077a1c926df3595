use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// Who produced an attendance entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum MarkSource {
    #[serde(rename = "manual")]
    #[strum(serialize = "manual")]
    Manual,

    /// Pushed by the face-recognition client.
    #[serde(rename = "face_recognition")]
    #[strum(serialize = "face_recognition")]
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "0b0e9a3e-8a51-4d8c-9f57-2c7d5e0a3e11",
        "student_id": "STU001",
        "date": "2024-03-01",
        "status": "present",
        "marked_by": "manual",
        "timestamp": "2024-03-01T08:15:00Z"
    })
)]
pub struct AttendanceRecord {
    pub id: String,

    #[schema(example = "STU001")]
    pub student_id: String,

    #[schema(example = "2024-03-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    pub marked_by: MarkSource,

    /// Time of the last write to this (student, date) slot.
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: DateTime<Utc>,
}

/// A normalized write for one (student, date) slot.
#[derive(Debug, Clone, PartialEq)]
pub struct AttendanceMark {
    pub student_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub marked_by: MarkSource,
}

impl AttendanceMark {
    /// Fresh record for an empty slot; the store keeps the old id on overwrite.
    pub fn into_record(self, now: DateTime<Utc>) -> AttendanceRecord {
        AttendanceRecord {
            id: Uuid::new_v4().to_string(),
            student_id: self.student_id,
            date: self.date,
            status: self.status,
            marked_by: self.marked_by,
            timestamp: now,
        }
    }
}
