//! Attendance aggregation and write reconciliation.

use crate::error::AppError;
use crate::model::student::Student;
use crate::store::AttendanceStore;
use aggregate::AttendanceSummary;
use chrono::NaiveDate;

pub mod aggregate;
pub mod writer;

const READ_FAILED: &str = "Failed to load attendance";

/// Summary for one student as of `reference`.
pub async fn student_summary(
    store: &dyn AttendanceStore,
    student_id: &str,
    reference: NaiveDate,
) -> Result<(Student, AttendanceSummary), AppError> {
    let student = store
        .find_student(student_id)
        .await
        .map_err(|e| AppError::processing(READ_FAILED, e))?
        .ok_or_else(|| AppError::StudentNotFound(student_id.to_string()))?;

    let records = store
        .attendance_for_student(&student.student_id, None)
        .await
        .map_err(|e| AppError::processing(READ_FAILED, e))?;

    let summary = aggregate::summarize(&records, reference);
    Ok((student, summary))
}

/// Summaries for every student, as of `reference`.
pub async fn class_overview(
    store: &dyn AttendanceStore,
    reference: NaiveDate,
) -> Result<Vec<(Student, AttendanceSummary)>, AppError> {
    let students = store
        .list_students()
        .await
        .map_err(|e| AppError::processing(READ_FAILED, e))?;

    let mut overview = Vec::with_capacity(students.len());
    for student in students {
        let records = store
            .attendance_for_student(&student.student_id, None)
            .await
            .map_err(|e| AppError::processing(READ_FAILED, e))?;
        let summary = aggregate::summarize(&records, reference);
        overview.push((student, summary));
    }

    Ok(overview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceStatus;
    use crate::models::AttendanceCreate;
    use crate::store::MemoryStore;

    #[actix_web::test]
    async fn unknown_student_is_not_found_rather_than_zero() {
        let store = MemoryStore::new();
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();

        assert!(matches!(
            student_summary(&store, "STU404", today).await,
            Err(AppError::StudentNotFound(_))
        ));
    }

    #[actix_web::test]
    async fn overview_covers_students_without_records() {
        let store = MemoryStore::new();
        for (id, name) in [("STU001", "Karandeep Singh"), ("STU002", "Priya Kaur")] {
            store
                .insert_student_if_absent(&Student::new(id, name, None))
                .await
                .unwrap();
        }
        writer::record_batch(
            &store,
            &[AttendanceCreate {
                student_id: "STU001".into(),
                date: "2024-03-31".into(),
                status: AttendanceStatus::Present,
            }],
        )
        .await
        .unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let overview = class_overview(&store, today).await.unwrap();

        assert_eq!(overview.len(), 2);
        let (first, first_summary) = &overview[0];
        assert_eq!(first.student_id, "STU001");
        assert!(first_summary.daily_present);
        assert_eq!(first_summary.overall_percentage(), 100.0);

        let (second, second_summary) = &overview[1];
        assert_eq!(second.student_id, "STU002");
        assert!(!second_summary.daily_present);
        assert_eq!(second_summary.overall.total, 0);
    }
}
