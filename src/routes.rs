use crate::{
    api::{attendance, external, students},
    auth::handlers,
    config::Config,
    error::AppError,
};
use actix_cors::Cors;
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};

pub type LoginGovernor = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter for the login route. Built once so all workers share its state.
pub fn login_governor(requests_per_min: u32) -> Result<LoginGovernor> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / u64::from(requests_per_min)).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid login rate limit: {requests_per_min}/min"))
}

pub fn cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        config
            .cors_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, login_governor: &LoginGovernor) {
    // Extractor failures answer with the same {"detail": ...} body as handler errors.
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    );

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::resource("/login")
                    .wrap(Governor::new(login_governor))
                    .route(web::post().to(handlers::login)),
            )
            // /students
            .service(web::resource("/students").route(web::get().to(students::list_students)))
            // /students/{student_id}/attendance
            .service(
                web::resource("/students/{student_id}/attendance")
                    .route(web::get().to(students::student_attendance)),
            )
            // /attendance
            .service(
                web::resource("/attendance").route(web::post().to(attendance::mark_attendance)),
            )
            // /attendance/{date}
            .service(
                web::resource("/attendance/{date}")
                    .route(web::get().to(attendance::attendance_by_date)),
            )
            // /student-status/{student_id}
            .service(
                web::resource("/student-status/{student_id}")
                    .route(web::get().to(attendance::student_status)),
            )
            .service(
                web::scope("/external").service(
                    web::resource("/mark-attendance")
                        .route(web::post().to(external::mark_attendance)),
                ),
            ),
    );
}
