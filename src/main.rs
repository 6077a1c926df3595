use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{App, HttpServer};
use rand::{SeedableRng, rngs::StdRng};

mod api;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod models;
mod routes;
mod seed;
mod store;
mod tracker;
mod utils;

use config::Config;
use db::init_store;

use crate::docs::ApiDoc;
use crate::utils::date_utils::today;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let store = init_store(&config).await?;

    let mut rng = StdRng::from_entropy();
    seed::run(store.get_ref(), &config, today(), &mut rng).await?;

    let login_governor = routes::login_governor(config.rate_login_per_min)?;
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors(&config))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(store.clone())
            .configure(|cfg| routes::configure(cfg, &config, &login_governor))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
