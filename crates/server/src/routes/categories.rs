use axum::extract::{OriginalUri, Path, State};
use axum::http::StatusCode;
use axum::Json;
use sea_orm::TransactionTrait;
use tracing::error;
use uuid::Uuid;

use service::catalog::dto::{CategoryDto, CategoryInput};

use crate::errors::ApiError;
use crate::routes::ServerState;

#[utoipa::path(
    get, path = "/categories", tag = "categories",
    responses((status = 200, description = "All categories, ordered by name"))
)]
pub async fn find_all(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
) -> Result<Json<Vec<CategoryDto>>, ApiError> {
    state
        .categories
        .find_all(&state.db)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, uri.path()))
}

#[utoipa::path(
    get, path = "/categories/{id}", tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category", body = crate::openapi::CategoryDtoDoc),
        (status = 404, description = "Not Found", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn find_by_id(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryDto>, ApiError> {
    state
        .categories
        .find_by_id(&state.db, id)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, uri.path()))
}

#[utoipa::path(
    post, path = "/categories", tag = "categories",
    request_body = crate::openapi::CategoryInputDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CategoryDtoDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn insert(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<CategoryDto>), ApiError> {
    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
    match state.categories.insert(&txn, input).await {
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
    put, path = "/categories/{id}", tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = crate::openapi::CategoryInputDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CategoryDtoDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::StandardErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::StandardErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<CategoryDto>, ApiError> {
    let txn = state
        .db
        .begin()
        .await
        .map_err(|e| ApiError::internal(e.to_string(), uri.path()))?;
    match state.categories.update(&txn, id, input).await {
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
    delete, path = "/categories/{id}", tag = "categories",
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::StandardErrorDoc),
        (status = 409, description = "Products still reference it", body = crate::openapi::StandardErrorDoc)
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
    match state.categories.delete(&txn, id).await {
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
