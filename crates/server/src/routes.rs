use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use models::catalog::{catalog as catalog_tables, Catalog};

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod auth;
pub mod books;
pub mod laundries;
pub mod metapay;
pub mod users;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Clothes, fabric and bank tables with their numeric ids.
#[utoipa::path(get, path = "/catalog", tag = "health", responses((status = 200, description = "Catalog tables")))]
pub async fn catalog() -> Json<Catalog> {
    Json(catalog_tables())
}

/// Build the full application router: public, session-aware API and docs.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/catalog", get(catalog))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    let api = Router::new()
        .route("/users", get(users::list))
        .route("/users/:id", get(users::get).put(users::update))
        .route("/users/:id/books", get(users::books))
        .route("/books", post(books::create).get(books::list))
        .route("/books/date/:date", get(books::by_date))
        .route("/books/:id", get(books::get))
        .route("/books/:id/state", put(books::update_state))
        .route("/books/:id/complete", post(books::complete))
        .route("/books/:id/cancel", post(books::cancel))
        .route("/laundries", post(laundries::create))
        .route("/laundries/mine", get(laundries::mine))
        .route("/laundries/:id", get(laundries::get))
        .route("/laundries/:id/books", get(laundries::books))
        .route("/laundries/:id/settlements", get(laundries::settlements))
        .route("/metapay", post(metapay::open).get(metapay::get))
        .route("/metapay/accounts", post(metapay::link_account))
        .route("/metapay/charge", post(metapay::charge))
        .route("/metapay/logs", get(metapay::logs))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::resolve_caller));

    public
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
