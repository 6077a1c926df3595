use anyhow::{Context, Result, anyhow};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    /// MySQL connection string. `None` runs on the in-memory store.
    pub database_url: Option<String>,
    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,

    // Rate limiting
    pub rate_login_per_min: u32,

    // Startup seeding
    pub seed_demo_data: bool,
    pub bootstrap_teacher_id: String,
    pub bootstrap_teacher_name: String,
    pub bootstrap_teacher_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let cors_origins = var("CORS_ORIGINS", "*")
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        // demo data only goes into a real database when asked for explicitly
        let seed_default = if database_url.is_some() { "false" } else { "true" };

        Ok(Self {
            server_addr: var("SERVER_ADDR", "127.0.0.1:8001"),
            database_url,
            api_prefix: var("API_PREFIX", "/api"),

            log_dir: var("LOG_DIR", "logs"),
            log_level: parse_var("LOG_LEVEL", &var("LOG_LEVEL", "info"))?,
            cors_origins,

            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", &var("RATE_LOGIN_PER_MIN", "60"))?,

            seed_demo_data: parse_bool("SEED_DEMO_DATA", &var("SEED_DEMO_DATA", seed_default))?,
            bootstrap_teacher_id: var("BOOTSTRAP_TEACHER_ID", "Ramandeep@singh"),
            bootstrap_teacher_name: var("BOOTSTRAP_TEACHER_NAME", "Ramandeep Singh"),
            bootstrap_teacher_password: var("BOOTSTRAP_TEACHER_PASSWORD", "456123"),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("{key} has an invalid value: {raw:?}"))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow!("{key} must be a boolean, got {raw:?}")),
    }
}
