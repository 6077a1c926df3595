use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::{
    attendance::{AttendanceMark, AttendanceRecord, AttendanceStatus, MarkSource},
    student::Student,
    teacher::Teacher,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;
use tracing::{debug, info};
use uuid::Uuid;

pub struct MySqlStore {
    pool: MySqlPool,
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: String,
    student_id: String,
    date: NaiveDate,
    status: String,
    marked_by: String,
    marked_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status: AttendanceStatus = row.status.parse().map_err(|_| {
            StoreError::Corrupt(format!("attendance {} has status {:?}", row.id, row.status))
        })?;
        let marked_by: MarkSource = row.marked_by.parse().map_err(|_| {
            StoreError::Corrupt(format!(
                "attendance {} has marked_by {:?}",
                row.id, row.marked_by
            ))
        })?;

        Ok(AttendanceRecord {
            id: row.id,
            student_id: row.student_id,
            date: row.date,
            status,
            marked_by,
            timestamp: row.marked_at,
        })
    }
}

impl MySqlStore {
    /// Connect and bring the schema up to date.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = MySqlPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("MySQL store ready");
        Ok(Self { pool })
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn find_teacher(&self, teacher_id: &str) -> StoreResult<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(
            r#"
            SELECT id, teacher_id, name, password_hash
            FROM teachers
            WHERE teacher_id = ?
            "#,
        )
        .bind(teacher_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(teacher)
    }

    async fn insert_teacher_if_absent(&self, teacher: &Teacher) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO teachers (id, teacher_id, name, password_hash)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&teacher.id)
        .bind(&teacher.teacher_id)
        .bind(&teacher.name)
        .bind(&teacher.password_hash)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, name, image_path, class_name
            FROM students
            ORDER BY student_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    async fn find_student(&self, student_id: &str) -> StoreResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, student_id, name, image_path, class_name
            FROM students
            WHERE student_id = ?
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(student)
    }

    async fn insert_student_if_absent(&self, student: &Student) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO students (id, student_id, name, image_path, class_name)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&student.id)
        .bind(&student.student_id)
        .bind(&student.name)
        .bind(&student.image_path)
        .bind(&student.class_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn attendance_for_student(
        &self,
        student_id: &str,
        on: Option<NaiveDate>,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let day_clause = if on.is_some() { "AND date = ?" } else { "" };
        let sql = format!(
            "SELECT id, student_id, date, status, marked_by, marked_at \
             FROM attendance WHERE student_id = ? {} ORDER BY date",
            day_clause
        );
        debug!(sql = %sql, student_id, ?on, "Fetching attendance");

        let mut query = sqlx::query_as::<_, AttendanceRow>(&sql).bind(student_id);
        if let Some(day) = on {
            query = query.bind(day);
        }

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(AttendanceRecord::try_from)
            .collect()
    }

    async fn upsert_attendance(
        &self,
        marks: &[AttendanceMark],
        now: DateTime<Utc>,
    ) -> StoreResult<usize> {
        let mut tx = self.pool.begin().await?;

        // UNIQUE KEY (student_id, date) turns this into an atomic upsert; the
        // existing row keeps its id.
        for mark in marks {
            sqlx::query(
                r#"
                INSERT INTO attendance (id, student_id, date, status, marked_by, marked_at)
                VALUES (?, ?, ?, ?, ?, ?)
                ON DUPLICATE KEY UPDATE
                    status = VALUES(status),
                    marked_by = VALUES(marked_by),
                    marked_at = VALUES(marked_at)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&mark.student_id)
            .bind(mark.date)
            .bind(mark.status.as_ref())
            .bind(mark.marked_by.as_ref())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(marks.len())
    }

    async fn insert_attendance_if_absent(&self, record: &AttendanceRecord) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT IGNORE INTO attendance (id, student_id, date, status, marked_by, marked_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.student_id)
        .bind(record.date)
        .bind(record.status.as_ref())
        .bind(record.marked_by.as_ref())
        .bind(record.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
