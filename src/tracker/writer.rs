//! Replace-or-insert writes, one record per (student, date).

use crate::error::AppError;
use crate::model::attendance::{AttendanceMark, AttendanceStatus, MarkSource};
use crate::models::AttendanceCreate;
use crate::store::AttendanceStore;
use crate::utils::date_utils::normalize_date;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use tracing::{debug, info};

const WRITE_FAILED: &str = "Failed to mark attendance";

/// Normalize a manual batch. Nothing is written if any entry is malformed.
pub fn manual_marks(entries: &[AttendanceCreate]) -> Result<Vec<AttendanceMark>, AppError> {
    entries
        .iter()
        .map(|entry| -> Result<AttendanceMark, AppError> {
            Ok(AttendanceMark {
                student_id: entry.student_id.trim().to_string(),
                date: normalize_date(&entry.date)?,
                status: entry.status,
                marked_by: MarkSource::Manual,
            })
        })
        .collect()
}

async fn ensure_students_exist(
    store: &dyn AttendanceStore,
    marks: &[AttendanceMark],
) -> Result<(), AppError> {
    let student_ids: BTreeSet<&str> = marks.iter().map(|m| m.student_id.as_str()).collect();

    for student_id in student_ids {
        let found = store
            .find_student(student_id)
            .await
            .map_err(|e| AppError::processing(WRITE_FAILED, e))?;
        if found.is_none() {
            return Err(AppError::StudentNotFound(student_id.to_string()));
        }
    }
    Ok(())
}

/// Apply a manual batch as a whole. Later entries for the same
/// (student, date) overwrite earlier ones.
pub async fn record_batch(
    store: &dyn AttendanceStore,
    entries: &[AttendanceCreate],
) -> Result<usize, AppError> {
    let marks = manual_marks(entries)?;
    if marks.is_empty() {
        return Ok(0);
    }

    ensure_students_exist(store, &marks).await?;

    let count = store
        .upsert_attendance(&marks, Utc::now())
        .await
        .map_err(|e| AppError::processing(WRITE_FAILED, e))?;

    info!(count, "Manual attendance batch applied");
    Ok(count)
}

/// Single write pushed by the face-recognition client.
pub async fn record_external(
    store: &dyn AttendanceStore,
    student_id: &str,
    status: AttendanceStatus,
    date: NaiveDate,
) -> Result<(), AppError> {
    let mark = AttendanceMark {
        student_id: student_id.trim().to_string(),
        date,
        status,
        marked_by: MarkSource::External,
    };
    debug!(student_id = %mark.student_id, %date, %status, "External attendance mark");

    let marks = [mark];
    ensure_students_exist(store, &marks).await?;

    store
        .upsert_attendance(&marks, Utc::now())
        .await
        .map_err(|e| AppError::processing("Failed to mark attendance externally", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::student::Student;
    use crate::store::MemoryStore;

    async fn store_with(ids: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for id in ids {
            store
                .insert_student_if_absent(&Student::new(id, id, None))
                .await
                .unwrap();
        }
        store
    }

    fn entry(student_id: &str, date: &str, status: AttendanceStatus) -> AttendanceCreate {
        AttendanceCreate {
            student_id: student_id.into(),
            date: date.into(),
            status,
        }
    }

    #[actix_web::test]
    async fn batch_normalizes_dates_and_tags_manual() {
        let store = store_with(&["STU001", "STU002"]).await;
        let entries = vec![
            entry("STU001", "2024-03-01T00:00:00", AttendanceStatus::Present),
            entry("STU002", "2024-03-01", AttendanceStatus::Absent),
        ];

        assert_eq!(record_batch(&store, &entries).await.unwrap(), 2);

        let records = store.attendance_for_student("STU001", None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(records[0].marked_by, MarkSource::Manual);
    }

    #[actix_web::test]
    async fn rewriting_a_day_leaves_one_record_with_the_latest_status() {
        let store = store_with(&["STU001"]).await;

        record_batch(&store, &[entry("STU001", "2024-03-01", AttendanceStatus::Absent)])
            .await
            .unwrap();
        record_batch(&store, &[entry("STU001", "2024-03-01", AttendanceStatus::Present)])
            .await
            .unwrap();

        let records = store.attendance_for_student("STU001", None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Present);
    }

    #[actix_web::test]
    async fn malformed_entry_aborts_the_whole_batch() {
        let store = store_with(&["STU001", "STU002"]).await;
        let entries = vec![
            entry("STU001", "2024-03-01", AttendanceStatus::Present),
            entry("STU002", "not-a-date", AttendanceStatus::Present),
        ];

        assert!(matches!(
            record_batch(&store, &entries).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(store
            .attendance_for_student("STU001", None)
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn unknown_student_aborts_the_whole_batch() {
        let store = store_with(&["STU001"]).await;
        let entries = vec![
            entry("STU001", "2024-03-01", AttendanceStatus::Present),
            entry("STU999", "2024-03-01", AttendanceStatus::Present),
        ];

        match record_batch(&store, &entries).await {
            Err(AppError::StudentNotFound(id)) => assert_eq!(id, "STU999"),
            other => panic!("expected StudentNotFound, got {other:?}"),
        }
        assert!(store
            .attendance_for_student("STU001", None)
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn empty_batch_is_a_no_op() {
        let store = store_with(&[]).await;
        assert_eq!(record_batch(&store, &[]).await.unwrap(), 0);
    }

    #[actix_web::test]
    async fn external_write_overrides_a_manual_absence() {
        let store = store_with(&["STU001"]).await;
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        record_batch(&store, &[entry("STU001", "2024-03-05", AttendanceStatus::Absent)])
            .await
            .unwrap();
        record_external(&store, "STU001", AttendanceStatus::Present, day)
            .await
            .unwrap();

        let records = store.attendance_for_student("STU001", Some(day)).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, AttendanceStatus::Present);
        assert_eq!(records[0].marked_by, MarkSource::External);
    }

    #[actix_web::test]
    async fn external_write_for_unknown_student_is_not_found() {
        let store = store_with(&[]).await;
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert!(matches!(
            record_external(&store, "STU404", AttendanceStatus::Present, day).await,
            Err(AppError::StudentNotFound(_))
        ));
    }
}
