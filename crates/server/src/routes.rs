use axum::{routing::get, Json, Router};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::CorsLayer,
    trace::{
        DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
    },
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::catalog::{
    CategoryService, ProductService, SeaOrmCategoryRepository, SeaOrmProductRepository,
};

pub mod categories;
pub mod products;

/// Shared handler state: the pooled connection plus the stateless services.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub products: ProductService<SeaOrmProductRepository, SeaOrmCategoryRepository>,
    pub categories: CategoryService<SeaOrmCategoryRepository>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            products: ProductService::new(SeaOrmProductRepository, SeaOrmCategoryRepository),
            categories: CategoryService::new(SeaOrmCategoryRepository),
        }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route(
            "/products",
            get(products::find_all).post(products::insert),
        )
        .route(
            "/products/:id",
            get(products::find_by_id)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/categories",
            get(categories::find_all).post(categories::insert),
        )
        .route(
            "/categories/:id",
            get(categories::find_by_id)
                .put(categories::update)
                .delete(categories::delete),
        )
        .with_state(state);

    api.merge(
        SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", crate::openapi::ApiDoc::openapi()),
    )
    .layer(cors)
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
