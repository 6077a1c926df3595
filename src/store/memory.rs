use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::{
    attendance::{AttendanceMark, AttendanceRecord},
    student::Student,
    teacher::Teacher,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, btree_map::Entry};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local store used when no `DATABASE_URL` is configured, and by tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    teachers: HashMap<String, Teacher>,
    students: BTreeMap<String, Student>,
    attendance: BTreeMap<(String, NaiveDate), AttendanceRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn find_teacher(&self, teacher_id: &str) -> StoreResult<Option<Teacher>> {
        Ok(self.read()?.teachers.get(teacher_id).cloned())
    }

    async fn insert_teacher_if_absent(&self, teacher: &Teacher) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if tables.teachers.contains_key(&teacher.teacher_id) {
            return Ok(false);
        }
        tables
            .teachers
            .insert(teacher.teacher_id.clone(), teacher.clone());
        Ok(true)
    }

    async fn list_students(&self) -> StoreResult<Vec<Student>> {
        Ok(self.read()?.students.values().cloned().collect())
    }

    async fn find_student(&self, student_id: &str) -> StoreResult<Option<Student>> {
        Ok(self.read()?.students.get(student_id).cloned())
    }

    async fn insert_student_if_absent(&self, student: &Student) -> StoreResult<bool> {
        let mut tables = self.write()?;
        if tables.students.contains_key(&student.student_id) {
            return Ok(false);
        }
        tables
            .students
            .insert(student.student_id.clone(), student.clone());
        Ok(true)
    }

    async fn attendance_for_student(
        &self,
        student_id: &str,
        on: Option<NaiveDate>,
    ) -> StoreResult<Vec<AttendanceRecord>> {
        let tables = self.read()?;
        let (from, to) = match on {
            Some(day) => (day, day),
            None => (NaiveDate::MIN, NaiveDate::MAX),
        };

        Ok(tables
            .attendance
            .range((student_id.to_string(), from)..=(student_id.to_string(), to))
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn upsert_attendance(
        &self,
        marks: &[AttendanceMark],
        now: DateTime<Utc>,
    ) -> StoreResult<usize> {
        // One write lock for the whole batch keeps it atomic.
        let mut tables = self.write()?;

        for mark in marks {
            match tables
                .attendance
                .entry((mark.student_id.clone(), mark.date))
            {
                Entry::Occupied(mut slot) => {
                    let record = slot.get_mut();
                    record.status = mark.status;
                    record.marked_by = mark.marked_by;
                    record.timestamp = now;
                }
                Entry::Vacant(slot) => {
                    slot.insert(mark.clone().into_record(now));
                }
            }
        }

        Ok(marks.len())
    }

    async fn insert_attendance_if_absent(&self, record: &AttendanceRecord) -> StoreResult<bool> {
        let mut tables = self.write()?;
        match tables
            .attendance
            .entry((record.student_id.clone(), record.date))
        {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(true)
            }
        }
    }
}
