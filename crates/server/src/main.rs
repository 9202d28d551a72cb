mod config;
mod doc;
mod dtos;
mod error;
mod routes;
mod state;
mod utils;

use crate::{config::Config, doc::ApiDoc, routes::health, state::AppState};
use axum::extract::DefaultBodyLimit;
use database::{db::create_connection, services::identity::IdentityService};
use log::info;
use migration::{Migrator, MigratorTrait};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_oauth2_resource_server::server::OAuth2ResourceServer;
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env().expect("Invalid configuration");

    let db = create_connection(&config.database_url)
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    IdentityService::provision_system_owner(&db, &config.system_username)
        .await
        .expect("Failed to provision system owner");

    let oauth2_resource_server = <OAuth2ResourceServer>::builder()
        .issuer_url(config.oidc_issuer_url.as_str())
        .build()
        .await
        .expect("Failed to build OAuth2ResourceServer");

    let bind_address = config.bind_address;
    let max_import_bytes = config.max_import_bytes;
    let state = AppState::new(db, config);

    let api = routes::api_routes().layer(
        ServiceBuilder::new()
            .layer(DefaultBodyLimit::max(max_import_bytes))
            .layer(oauth2_resource_server.into_layer()),
    );

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(health::health))
        .merge(api)
        .split_for_parts();

    let app = router
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(CompressionLayer::new());

    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .expect("Failed to bind address");
    info!("Running axum on http://{bind_address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(utils::shutdown::shutdown_signal())
        .await
        .expect("Server error");
}
