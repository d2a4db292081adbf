use std::{env, sync::Arc};

use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use portfolio_site::{
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::{release_resources, shutdown_signal},
    mail::{verify_on_startup, SmtpMailer},
    routes::configure_routes,
    settings::AppConfig,
    web::cors_policy,
    AppState, SharedMailer,
};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let production = env::var("APP_ENV")
        .map(|v| v.eq_ignore_ascii_case("production"))
        .unwrap_or(false);

    if production {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        },
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let mailer: Option<SharedMailer> = match config.mail_settings() {
        Some(settings) => match SmtpMailer::new(&settings) {
            Ok(mailer) => Some(Arc::new(mailer)),
            Err(e) => {
                tracing::error!("Mail transport could not be built: {}", e);
                None
            }
        },
        None => {
            tracing::info!("Mail credentials not set, contact notifications disabled");
            None
        }
    };

    let mail_verified = match &mailer {
        Some(mailer) => verify_on_startup(mailer.as_ref()).await,
        None => false,
    };

    let app_state = web::Data::new(
        AppState::new(&config, pool.clone(), mailer.clone(), mail_verified)
    );

    let server_addr = format!("{}:{}", config.host, config.port);

    tracing::info!(
        "🚀 Starting Portfolio API v{} on {} (contact policy: {:?})",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        config.contact_policy
    );

    let cors_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(cors_policy(&cors_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .disable_signals()
    .bind(server_addr)?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        handle.stop(true).await;
    });

    server.await?;

    release_resources(mailer.as_deref(), &pool).await;
    Ok(())
}
