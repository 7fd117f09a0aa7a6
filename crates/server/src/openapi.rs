use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(ToSchema)]
pub struct CategoryDtoDoc {
    pub id: Uuid,
    pub name: String,
}

#[derive(ToSchema)]
pub struct CategoryInputDoc {
    pub name: String,
}

#[derive(ToSchema)]
pub struct CategoryIdRefDoc {
    pub id: Uuid,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductDtoDoc {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub date: String,
    pub categories: Vec<CategoryDtoDoc>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ProductInputDoc {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub date: String,
    pub categories: Vec<CategoryIdRefDoc>,
}

#[derive(ToSchema)]
pub struct StandardErrorDoc {
    pub timestamp: String,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub path: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::products::find_all,
        crate::routes::products::find_by_id,
        crate::routes::products::insert,
        crate::routes::products::update,
        crate::routes::products::delete,
        crate::routes::categories::find_all,
        crate::routes::categories::find_by_id,
        crate::routes::categories::insert,
        crate::routes::categories::update,
        crate::routes::categories::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CategoryDtoDoc,
            CategoryInputDoc,
            CategoryIdRefDoc,
            ProductDtoDoc,
            ProductInputDoc,
            StandardErrorDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "products"),
        (name = "categories"),
    )
)]
pub struct ApiDoc;
