use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use sea_orm::TransactionTrait;
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use service::catalog::dto::{ProductDto, ProductInput};
use service::pagination::{Page, PageRequest};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct PageQuery {
    /// 0-based window index.
    pub page: Option<u64>,
    /// Window size, clamped server-side.
    pub size: Option<u64>,
    /// `field[,asc|desc]` over name, price, date.
    pub sort: Option<String>,
}

impl From<PageQuery> for PageRequest {
    fn from(q: PageQuery) -> Self {
        PageRequest {
            page: q.page,
            size: q.size,
            sort: q.sort,
        }
    }
}

#[utoipa::path(
    get, path = "/products", tag = "products",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of products"),
        (status = 400, description = "Bad sort clause", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn find_all(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductDto>>, ApiError> {
    state
        .products
        .find_all_paged(&state.db, &query.into())
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, uri.path()))
}

#[utoipa::path(
    get, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product", body = crate::openapi::ProductDtoDoc),
        (status = 404, description = "Not Found", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn find_by_id(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductDto>, ApiError> {
    state
        .products
        .find_by_id(&state.db, id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, uri.path()))
}

#[utoipa::path(
    post, path = "/products", tag = "products",
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ProductDtoDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::StandardErrorDoc),
        (status = 404, description = "Referenced category missing", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn insert(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductDto>), ApiError> {
    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
    match state.products.insert(&txn, input).await {
        Ok(dto) => {
            txn.commit()
                .await
                .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
            Ok((StatusCode::CREATED, Json(dto)))
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                error!(err = %rb, "rollback failed");
            }
            Err(ApiError::from_service(e, uri.path()))
        }
    }
}

#[utoipa::path(
    put, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = crate::openapi::ProductInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ProductDtoDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::StandardErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<ProductDto>, ApiError> {
    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
    match state.products.update(&txn, id, input).await {
        Ok(dto) => {
            txn.commit()
                .await
                .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
            Ok(Json(dto))
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                error!(err = %rb, "rollback failed");
            }
            Err(ApiError::from_service(e, uri.path()))
        }
    }
}

#[utoipa::path(
    delete, path = "/products/{id}", tag = "products",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::StandardErrorDoc),
        (status = 409, description = "Still referenced", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
    match state.products.delete(&txn, id).await {
        Ok(()) => {
            txn.commit()
                .await
                .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            if let Err(rb) = txn.rollback().await {
                error!(err = %rb, "rollback failed");
            }
            Err(ApiError::from_service(e, uri.path()))
        }
    }
}
