use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Teacher {
    pub id: String,
    pub teacher_id: String,
    pub name: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

impl Teacher {
    pub fn new(teacher_id: &str, name: &str, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            teacher_id: teacher_id.to_string(),
            name: name.to_string(),
            password_hash,
        }
    }
}
