use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_CLASS_NAME: &str = "Class 5";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": "6f1c1c56-6f5e-4d43-9c43-1f3c0c1d9a10",
        "student_id": "STU001",
        "name": "Karandeep Singh",
        "image_path": "/karandeep.jpeg",
        "class_name": "Class 5"
    })
)]
pub struct Student {
    pub id: String,

    #[schema(example = "STU001")]
    pub student_id: String,

    #[schema(example = "Karandeep Singh")]
    pub name: String,

    #[schema(example = "/karandeep.jpeg", nullable = true)]
    pub image_path: Option<String>,

    #[schema(example = "Class 5")]
    pub class_name: String,
}

impl Student {
    pub fn new(student_id: &str, name: &str, image_path: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            name: name.to_string(),
            image_path: image_path.map(str::to_string),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}
