use crate::model::{attendance::AttendanceStatus, student::Student};
use crate::tracker::aggregate::{AttendanceSummary, AttendanceTally};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "Ramandeep@singh")]
    pub teacher_id: String,
    #[schema(example = "456123")]
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub teacher_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AttendanceCreate {
    #[schema(example = "STU001")]
    pub student_id: String,
    /// ISO-8601 date; a datetime is reduced to its date part.
    #[schema(example = "2024-03-01")]
    pub date: String,
    pub status: AttendanceStatus,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct AttendanceUpdate {
    pub attendance_records: Vec<AttendanceCreate>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MarkAttendanceResponse {
    pub success: bool,
    #[schema(example = "Updated attendance for 5 students")]
    pub message: String,
    pub count: usize,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentAttendanceQuery {
    /// Only return the record for this date
    pub date_filter: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentStatusQuery {
    /// Reference date for the trailing window, defaults to today
    pub date: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExternalMarkQuery {
    #[param(example = "STU001")]
    pub student_id: String,
    /// Defaults to `present`
    pub status: Option<AttendanceStatus>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// One row of the daily class view.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentWithAttendance {
    pub id: String,
    #[schema(example = "STU001")]
    pub student_id: String,
    pub name: String,
    pub image_path: Option<String>,
    pub class_name: String,
    pub daily_attendance: bool,
    #[schema(example = 93.5)]
    pub monthly_percentage: f64,
    #[schema(example = 90.0)]
    pub overall_percentage: f64,
}

impl StudentWithAttendance {
    pub fn new(student: Student, summary: &AttendanceSummary) -> Self {
        Self {
            id: student.id,
            student_id: student.student_id,
            name: student.name,
            image_path: student.image_path,
            class_name: student.class_name,
            daily_attendance: summary.daily_present,
            monthly_percentage: summary.window_percentage(),
            overall_percentage: summary.overall_percentage(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentStatus {
    pub id: String,
    #[schema(example = "STU001")]
    pub student_id: String,
    pub name: String,
    pub image_path: Option<String>,
    #[schema(example = 66.7)]
    pub overall_percentage: f64,
    pub monthly_percentage: f64,
    pub monthly_stats: AttendanceTally,
    #[schema(example = json!(["2024-03-04", "2024-03-11"]))]
    pub absent_dates: Vec<String>,
}

impl StudentStatus {
    pub fn new(student: Student, summary: AttendanceSummary) -> Self {
        Self {
            overall_percentage: summary.overall_percentage(),
            monthly_percentage: summary.window_percentage(),
            monthly_stats: summary.window,
            absent_dates: summary
                .absent_dates
                .iter()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect(),
            id: student.id,
            student_id: student.student_id,
            name: student.name,
            image_path: student.image_path,
        }
    }
}
