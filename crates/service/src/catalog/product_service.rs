use sea_orm::ConnectionTrait;
use tracing::info;
use uuid::Uuid;

use models::product;

use crate::errors::ServiceError;
use crate::pagination::{Page, PageRequest, Sort};

use super::dto::{ProductDto, ProductInput};
use super::repository::{
    CategoryRepository, ProductOrder, ProductRepository, ProductSortKey, RepoError,
};

/// Application service mediating between the API boundary and the store:
/// input validation, existence checks, and the translation of storage
/// signals into domain error kinds. Stateless between invocations; every
/// call runs on the connection or transaction the boundary passes in.
#[derive(Clone, Debug)]
pub struct ProductService<P, C> {
    products: P,
    categories: C,
}

impl<P: ProductRepository, C: CategoryRepository> ProductService<P, C> {
    pub fn new(products: P, categories: C) -> Self {
        Self {
            products,
            categories,
        }
    }

    pub async fn find_by_id<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        id: Uuid,
    ) -> Result<ProductDto, ServiceError> {
        match self.products.find_by_id(db, id).await {
            Ok(Some(record)) => Ok(record.into()),
            Ok(None) => Err(ServiceError::not_found("product")),
            Err(e) => Err(storage_error(e)),
        }
    }

    /// Windowing and ordering are delegated to the store; a window past the
    /// last row is a valid, empty page.
    pub async fn find_all_paged<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        request: &PageRequest,
    ) -> Result<Page<ProductDto>, ServiceError> {
        let order = resolve_sort(request.sort.as_deref())?;
        let (page, size) = request.normalize();
        let window = self
            .products
            .find_window(db, page, size, order)
            .await
            .map_err(storage_error)?;
        Ok(Page {
            content: window.rows.into_iter().map(Into::into).collect(),
            page,
            size,
            total_elements: window.total_elements,
            total_pages: window.total_pages,
        })
    }

    pub async fn insert<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        input: ProductInput,
    ) -> Result<ProductDto, ServiceError> {
        validate(&input)?;
        let (data, category_ids) = input.into_data();
        let refs = category_ids
            .into_iter()
            .map(|id| self.categories.reference(id))
            .collect();
        match self.products.insert(db, data, refs).await {
            Ok(record) => {
                info!(id = %record.product.id, "created product");
                Ok(record.into())
            }
            // A dangling category reference only shows up at flush time.
            Err(RepoError::ForeignKey(_)) => Err(ServiceError::not_found("category")),
            Err(e) => Err(storage_error(e)),
        }
    }

    pub async fn update<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        id: Uuid,
        input: ProductInput,
    ) -> Result<ProductDto, ServiceError> {
        validate(&input)?;
        let (data, category_ids) = input.into_data();
        // Acquiring the handle is infallible even for unknown ids; the
        // existence check happens when the write goes through it.
        let target = self.products.reference(id);
        let refs = category_ids
            .into_iter()
            .map(|id| self.categories.reference(id))
            .collect();
        match self.products.update(db, target, data, refs).await {
            Ok(record) => {
                info!(id = %record.product.id, "updated product");
                Ok(record.into())
            }
            Err(RepoError::RowAbsent) => Err(ServiceError::not_found("product")),
            Err(RepoError::ForeignKey(_)) => Err(ServiceError::not_found("category")),
            Err(RepoError::Other(msg)) => Err(ServiceError::Db(msg)),
        }
    }

    pub async fn delete<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        id: Uuid,
    ) -> Result<(), ServiceError> {
        match self.products.delete_by_id(db, id).await {
            Ok(()) => {
                info!(%id, "deleted product");
                Ok(())
            }
            Err(RepoError::RowAbsent) => Err(ServiceError::not_found("product")),
            Err(RepoError::ForeignKey(msg)) => Err(ServiceError::IntegrityViolation(msg)),
            Err(RepoError::Other(msg)) => Err(ServiceError::Db(msg)),
        }
    }
}

fn validate(input: &ProductInput) -> Result<(), ServiceError> {
    product::validate_name(&input.name)?;
    product::validate_price(input.price)?;
    product::validate_image_url(&input.image_url)?;
    Ok(())
}

fn resolve_sort(raw: Option<&str>) -> Result<Option<ProductOrder>, ServiceError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let sort = Sort::parse(raw).map_err(ServiceError::Validation)?;
    let key = ProductSortKey::parse(&sort.field)
        .ok_or_else(|| ServiceError::Validation(format!("unknown sort field: {}", sort.field)))?;
    Ok(Some(ProductOrder {
        key,
        direction: sort.direction,
    }))
}

fn storage_error(e: RepoError) -> ServiceError {
    match e {
        RepoError::RowAbsent => ServiceError::Db("unexpected row-absent signal".into()),
        RepoError::ForeignKey(msg) => ServiceError::IntegrityViolation(msg),
        RepoError::Other(msg) => ServiceError::Db(msg),
    }
}
