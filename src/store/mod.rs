//! The record store: teachers, students and one attendance slot per
//! (student, date).

use crate::model::{
    attendance::{AttendanceMark, AttendanceRecord},
    student::Student,
    teacher::Teacher,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Display, From};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Display, From)]
pub enum StoreError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "migration failed: {}", _0)]
    Migrate(sqlx::migrate::MigrateError),

    #[display(fmt = "corrupt row: {}", _0)]
    #[from(ignore)]
    Corrupt(String),

    #[display(fmt = "in-memory store lock poisoned")]
    #[from(ignore)]
    Poisoned,
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Database(e) => Some(e),
            StoreError::Migrate(e) => Some(e),
            _ => None,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn find_teacher(&self, teacher_id: &str) -> StoreResult<Option<Teacher>>;

    /// Returns `true` when the teacher was inserted.
    async fn insert_teacher_if_absent(&self, teacher: &Teacher) -> StoreResult<bool>;

    /// All students ordered by `student_id`.
    async fn list_students(&self) -> StoreResult<Vec<Student>>;

    async fn find_student(&self, student_id: &str) -> StoreResult<Option<Student>>;

    /// Returns `true` when the student was inserted.
    async fn insert_student_if_absent(&self, student: &Student) -> StoreResult<bool>;

    /// Records for one student ordered by date, optionally limited to a single day.
    async fn attendance_for_student(
        &self,
        student_id: &str,
        on: Option<NaiveDate>,
    ) -> StoreResult<Vec<AttendanceRecord>>;

    /// Replace-or-insert every mark keyed on (student_id, date). Either all
    /// marks are written or none are. Returns the number of marks applied.
    async fn upsert_attendance(
        &self,
        marks: &[AttendanceMark],
        now: DateTime<Utc>,
    ) -> StoreResult<usize>;

    /// Insert only when the (student_id, date) slot is empty. Returns `true` on insert.
    async fn insert_attendance_if_absent(&self, record: &AttendanceRecord) -> StoreResult<bool>;
}
