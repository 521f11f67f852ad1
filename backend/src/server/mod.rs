//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub(crate) use state_builders::{IngestionAdapters, Stores, build_feed_cache, build_services};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use reelfeed::Trace;
#[cfg(debug_assertions)]
use reelfeed::doc::ApiDoc;
use reelfeed::inbound::http::api_routes;
use reelfeed::inbound::http::error::{json_error_handler, query_error_handler};
use reelfeed::inbound::http::health::{HealthState, live, ready};
use reelfeed::inbound::http::images::{ImageStore, serve_image};
use reelfeed::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    images: web::Data<ImageStore>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        images,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(images)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(Trace)
        .service(web::scope("/api").configure(api_routes))
        .service(serve_image)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the Actix HTTP server over pre-built handler state.
///
/// The readiness probe flips once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails, or when the
/// `metrics` feature is enabled but no Prometheus middleware was configured.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(http_state);
    let ServerConfig {
        bind_addr,
        images,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;
    let images = web::Data::new(images);

    #[cfg(feature = "metrics")]
    let prometheus = prometheus.ok_or_else(|| {
        std::io::Error::other("metrics feature enabled without Prometheus middleware")
    })?;

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            images: images.clone(),
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(prometheus.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
