//! Server construction and adapter wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::io;
use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
use url::Url;

use ticketing::Trace;
#[cfg(debug_assertions)]
use ticketing::doc::ApiDoc;
use ticketing::domain::ports::{CatalogueCache, MirrorSink};
use ticketing::domain::{MirrorDispatcher, MirrorPublisher, mirror_channel};
use ticketing::inbound::http::configure_api;
use ticketing::inbound::http::health::{HealthState, live, ready};
use ticketing::inbound::http::state::HttpState;
use ticketing::outbound::cache::{MemoryCatalogueCache, RedisCatalogueCache};
use ticketing::outbound::mirror::{TracingMirrorSink, WebhookMirrorSink};
use ticketing::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use ticketing::settings::AppSettings;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Connect the configured stores and start the mirror dispatcher.
///
/// # Errors
/// Returns [`io::Error`] when an explicitly configured backend cannot be
/// reached or a configured value does not parse.
pub async fn build_config(settings: &AppSettings) -> io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|error| io::Error::other(format!("invalid bind address: {error}")))?;
    let mut config = ServerConfig::new(bind_addr)
        .with_cache(build_cache(settings).await?)
        .with_mirror(spawn_mirror(settings)?);

    match settings.database_url() {
        Some(database_url) => {
            if settings.run_migrations() {
                let applied = run_migrations(&database_url)
                    .await
                    .map_err(|error| io::Error::other(format!("migrations failed: {error}")))?;
                info!(applied, "database migrations applied");
            }
            let pool = DbPool::new(
                PoolConfig::new(database_url).with_max_size(settings.db_pool_max_size()),
            )
            .await
            .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database configured; keeping users, events and orders in memory"),
    }
    Ok(config)
}

async fn build_cache(settings: &AppSettings) -> io::Result<Arc<dyn CatalogueCache>> {
    let ttl = settings.cache_ttl();
    match settings.redis_url() {
        Some(redis_url) => {
            let cache = RedisCatalogueCache::connect(&redis_url, ttl)
                .await
                .map_err(|error| io::Error::other(format!("connect catalogue cache: {error}")))?;
            Ok(Arc::new(cache))
        }
        None => Ok(Arc::new(MemoryCatalogueCache::new(ttl))),
    }
}

fn spawn_mirror(settings: &AppSettings) -> io::Result<MirrorPublisher> {
    let mut sinks: Vec<Arc<dyn MirrorSink>> = vec![Arc::new(TracingMirrorSink)];
    if let Some(raw) = settings.mirror_webhook_url() {
        let endpoint = Url::parse(&raw)
            .map_err(|error| io::Error::other(format!("invalid mirror webhook URL: {error}")))?;
        let sink = WebhookMirrorSink::new(endpoint, settings.mirror_timeout())
            .map_err(|error| io::Error::other(format!("build mirror webhook client: {error}")))?;
        sinks.push(Arc::new(sink));
    }
    let (publisher, receiver) = mirror_channel(settings.mirror_queue_capacity());
    actix_web::rt::spawn(MirrorDispatcher::new(receiver, sinks).run());
    Ok(publisher)
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api/v1").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Readiness is marked once the listener is bound.
///
/// # Errors
/// Propagates [`io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
