//! One-time startup provisioning: the bootstrap teacher and, optionally, a
//! demo roster with a month of randomized history.

use crate::{
    auth::password::hash_password,
    config::Config,
    model::{
        attendance::{AttendanceMark, AttendanceStatus, MarkSource},
        student::Student,
        teacher::Teacher,
    },
    store::AttendanceStore,
};
use anyhow::{Context, Result, anyhow};
use chrono::{Days, NaiveDate, Utc};
use rand::Rng;
use tracing::info;

pub const BACKFILL_DAYS: u64 = 30;
pub const PRESENT_PROBABILITY: f64 = 0.85;

pub const DEMO_STUDENTS: [(&str, &str, &str); 5] = [
    ("STU001", "Karandeep Singh", "/karandeep.jpeg"),
    ("STU002", "Priya Kaur", "/images/student2.jpg"),
    ("STU003", "Rajesh Kumar", "/images/student3.jpg"),
    ("STU004", "Simran Dhillon", "/images/student4.jpg"),
    ("STU005", "Harmanpreet Singh", "/images/student5.jpg"),
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub teacher_created: bool,
    pub students_created: usize,
    pub records_created: usize,
}

/// Idempotent; only fills what is missing. Call once before serving.
pub async fn run<R: Rng>(
    store: &dyn AttendanceStore,
    config: &Config,
    today: NaiveDate,
    rng: &mut R,
) -> Result<SeedReport> {
    let mut report = SeedReport {
        teacher_created: ensure_bootstrap_teacher(store, config).await?,
        ..SeedReport::default()
    };

    if config.seed_demo_data {
        let created = ensure_demo_students(store).await?;
        report.students_created = created.len();
        report.records_created = backfill_history(store, &created, today, rng).await?;
    }

    info!(
        teacher_created = report.teacher_created,
        students_created = report.students_created,
        records_created = report.records_created,
        "Startup seeding complete"
    );
    Ok(report)
}

async fn ensure_bootstrap_teacher(store: &dyn AttendanceStore, config: &Config) -> Result<bool> {
    if store
        .find_teacher(&config.bootstrap_teacher_id)
        .await
        .context("looking up bootstrap teacher")?
        .is_some()
    {
        return Ok(false);
    }

    let password_hash = hash_password(&config.bootstrap_teacher_password)
        .map_err(|e| anyhow!("hashing bootstrap password: {e}"))?;
    let teacher = Teacher::new(
        &config.bootstrap_teacher_id,
        &config.bootstrap_teacher_name,
        password_hash,
    );

    Ok(store
        .insert_teacher_if_absent(&teacher)
        .await
        .context("inserting bootstrap teacher")?)
}

/// Returns the ids of the demo students inserted by this call.
async fn ensure_demo_students(store: &dyn AttendanceStore) -> Result<Vec<&'static str>> {
    let mut created = Vec::new();
    for (student_id, name, image_path) in DEMO_STUDENTS {
        let student = Student::new(student_id, name, Some(image_path));
        if store
            .insert_student_if_absent(&student)
            .await
            .with_context(|| format!("inserting demo student {student_id}"))?
        {
            created.push(student_id);
        }
    }
    Ok(created)
}

/// One record per newly created demo student for each of the `BACKFILL_DAYS`
/// days before `today`. Students that already existed are never touched.
async fn backfill_history<R: Rng>(
    store: &dyn AttendanceStore,
    student_ids: &[&str],
    today: NaiveDate,
    rng: &mut R,
) -> Result<usize> {
    let now = Utc::now();
    let mut created = 0;

    for student_id in student_ids {
        for offset in (1..=BACKFILL_DAYS).rev() {
            let Some(date) = today.checked_sub_days(Days::new(offset)) else {
                continue;
            };
            let status = if rng.gen_bool(PRESENT_PROBABILITY) {
                AttendanceStatus::Present
            } else {
                AttendanceStatus::Absent
            };
            let record = AttendanceMark {
                student_id: student_id.to_string(),
                date,
                status,
                marked_by: MarkSource::Manual,
            }
            .into_record(now);

            if store
                .insert_attendance_if_absent(&record)
                .await
                .with_context(|| format!("backfilling {student_id} on {date}"))?
            {
                created += 1;
            }
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::store::MemoryStore;
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    fn config(seed_demo_data: bool) -> Config {
        let mut vars = HashMap::new();
        vars.insert("SEED_DEMO_DATA", seed_demo_data.to_string());
        vars.insert("BOOTSTRAP_TEACHER_PASSWORD", "s3cret".to_string());
        Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    }

    #[actix_web::test]
    async fn seeds_teacher_roster_and_month_of_history() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(7);

        let report = run(&store, &config(true), today(), &mut rng).await.unwrap();

        assert!(report.teacher_created);
        assert_eq!(report.students_created, 5);
        assert_eq!(report.records_created, 5 * 30);

        let teacher = store.find_teacher("Ramandeep@singh").await.unwrap().unwrap();
        assert_eq!(teacher.name, "Ramandeep Singh");
        assert!(verify_password("s3cret", &teacher.password_hash).is_ok());

        let history = store.attendance_for_student("STU001", None).await.unwrap();
        assert_eq!(history.len(), 30);
        assert_eq!(history.first().unwrap().date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(history.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 3, 30).unwrap());
    }

    #[actix_web::test]
    async fn second_run_changes_nothing() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(7);
        run(&store, &config(true), today(), &mut rng).await.unwrap();
        let before = store.attendance_for_student("STU003", None).await.unwrap();

        let report = run(&store, &config(true), today(), &mut rng).await.unwrap();

        assert_eq!(report, SeedReport::default());
        assert_eq!(store.attendance_for_student("STU003", None).await.unwrap(), before);
    }

    #[actix_web::test]
    async fn existing_students_keep_their_history() {
        let store = MemoryStore::new();
        store
            .insert_student_if_absent(&Student::new("REAL01", "Real Student", None))
            .await
            .unwrap();
        let genuine = AttendanceMark {
            student_id: "REAL01".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            status: AttendanceStatus::Absent,
            marked_by: MarkSource::Manual,
        }
        .into_record(Utc::now());
        store.insert_attendance_if_absent(&genuine).await.unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        let report = run(&store, &config(true), today(), &mut rng).await.unwrap();

        assert_eq!(report.students_created, 5);
        assert_eq!(report.records_created, 5 * 30);
        assert_eq!(
            store.attendance_for_student("REAL01", None).await.unwrap(),
            vec![genuine]
        );
    }

    #[actix_web::test]
    async fn later_runs_do_not_fill_new_gaps() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(9);
        run(&store, &config(true), today(), &mut rng).await.unwrap();

        let next_week = today().checked_add_days(Days::new(7)).unwrap();
        let report = run(&store, &config(true), next_week, &mut rng).await.unwrap();

        assert_eq!(report.records_created, 0);
        assert_eq!(
            store.attendance_for_student("STU001", None).await.unwrap().len(),
            30
        );
    }

    #[actix_web::test]
    async fn demo_data_can_be_switched_off() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(1);

        let report = run(&store, &config(false), today(), &mut rng).await.unwrap();

        assert!(report.teacher_created);
        assert_eq!(report.students_created, 0);
        assert!(store.list_students().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn backfill_is_mostly_present() {
        let store = MemoryStore::new();
        let mut rng = StdRng::seed_from_u64(42);
        run(&store, &config(true), today(), &mut rng).await.unwrap();

        let mut present = 0;
        let mut total = 0;
        for (student_id, _, _) in DEMO_STUDENTS {
            for record in store.attendance_for_student(student_id, None).await.unwrap() {
                total += 1;
                if record.status == AttendanceStatus::Present {
                    present += 1;
                }
            }
        }
        assert_eq!(total, 150);
        // 150 draws at p = 0.85, so this bound is many standard deviations wide
        assert!(present > 100 && present < 150, "present = {present}");
    }
}
