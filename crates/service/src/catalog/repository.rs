//! Repository traits and their SeaORM implementations.
//!
//! Repositories are stateless; every call takes the caller's connection so
//! the HTTP boundary can hand in the pooled connection for reads or an open
//! transaction for mutations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, LoaderTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use thiserror::Error;
use uuid::Uuid;

use models::{category, product, product_category};

use super::reference::{CategoryRef, ProductRef};
use crate::pagination::SortDirection;

/// Storage-layer signals, normalized from the driver error. The service
/// layer owns the translation of these into domain error kinds.
#[derive(Debug, Error)]
pub enum RepoError {
    /// The addressed row does not exist: absent on dereference, or zero
    /// rows affected by a delete/update.
    #[error("row absent")]
    RowAbsent,
    /// The store rejected the mutation over a referential constraint.
    #[error("foreign key constraint: {0}")]
    ForeignKey(String),
    #[error("storage error: {0}")]
    Other(String),
}

impl RepoError {
    pub fn from_db(e: DbErr) -> Self {
        if let Some(SqlErr::ForeignKeyConstraintViolation(msg)) = e.sql_err() {
            return RepoError::ForeignKey(msg);
        }
        match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => RepoError::RowAbsent,
            other => RepoError::Other(other.to_string()),
        }
    }
}

/// Scalar fields of a product write (create or full replace).
#[derive(Clone, Debug)]
pub struct ProductData {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub date: DateTimeWithTimeZone,
}

/// A product row together with its category set, in storage order.
#[derive(Clone, Debug)]
pub struct ProductRecord {
    pub product: product::Model,
    pub categories: Vec<category::Model>,
}

/// One store window of products plus the window bookkeeping.
#[derive(Clone, Debug, Default)]
pub struct ProductWindow {
    pub rows: Vec<ProductRecord>,
    pub total_elements: u64,
    pub total_pages: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProductSortKey {
    Name,
    Price,
    Date,
}

impl ProductSortKey {
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "date" => Some(Self::Date),
            _ => None,
        }
    }

    fn column(self) -> product::Column {
        match self {
            Self::Name => product::Column::Name,
            Self::Price => product::Column::Price,
            Self::Date => product::Column::Date,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ProductOrder {
    pub key: ProductSortKey,
    pub direction: SortDirection,
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Lazy acquisition: never touches the store, never fails.
    fn reference(&self, id: Uuid) -> ProductRef;

    async fn find_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> Result<Option<ProductRecord>, RepoError>;

    async fn find_window<C: ConnectionTrait>(
        &self,
        db: &C,
        page: u64,
        size: u64,
        order: Option<ProductOrder>,
    ) -> Result<ProductWindow, RepoError>;

    async fn insert<C: ConnectionTrait>(
        &self,
        db: &C,
        data: ProductData,
        categories: Vec<CategoryRef>,
    ) -> Result<ProductRecord, RepoError>;

    /// Full replace of mutable fields and the category set through a lazy
    /// handle. A handle to a non-existent id fails here, not earlier.
    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        target: ProductRef,
        data: ProductData,
        categories: Vec<CategoryRef>,
    ) -> Result<ProductRecord, RepoError>;

    async fn delete_by_id<C: ConnectionTrait>(&self, db: &C, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Lazy acquisition: never touches the store, never fails.
    fn reference(&self, id: Uuid) -> CategoryRef;

    async fn find_all<C: ConnectionTrait>(&self, db: &C)
        -> Result<Vec<category::Model>, RepoError>;

    async fn find_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> Result<Option<category::Model>, RepoError>;

    async fn insert<C: ConnectionTrait>(
        &self,
        db: &C,
        name: String,
    ) -> Result<category::Model, RepoError>;

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        target: CategoryRef,
        name: String,
    ) -> Result<category::Model, RepoError>;

    async fn delete_by_id<C: ConnectionTrait>(&self, db: &C, id: Uuid) -> Result<(), RepoError>;
}

/// SeaORM-backed product repository.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeaOrmProductRepository;

#[async_trait]
impl ProductRepository for SeaOrmProductRepository {
    fn reference(&self, id: Uuid) -> ProductRef {
        ProductRef::new(id)
    }

    async fn find_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> Result<Option<ProductRecord>, RepoError> {
        let product = match ProductRef::new(id).materialize(db).await {
            Ok(p) => p,
            Err(RepoError::RowAbsent) => return Ok(None),
            Err(e) => return Err(e),
        };
        let categories = product
            .find_related(category::Entity)
            .order_by_asc(category::Column::Name)
            .all(db)
            .await
            .map_err(RepoError::from_db)?;
        Ok(Some(ProductRecord {
            product,
            categories,
        }))
    }

    async fn find_window<C: ConnectionTrait>(
        &self,
        db: &C,
        page: u64,
        size: u64,
        order: Option<ProductOrder>,
    ) -> Result<ProductWindow, RepoError> {
        let mut select = product::Entity::find();
        if let Some(order) = order {
            select = match order.direction {
                SortDirection::Asc => select.order_by_asc(order.key.column()),
                SortDirection::Desc => select.order_by_desc(order.key.column()),
            };
        }
        // Stable window boundaries regardless of the requested sort.
        let select = select.order_by_asc(product::Column::Id);

        let paginator = select.paginate(db, size);
        let totals = paginator
            .num_items_and_pages()
            .await
            .map_err(RepoError::from_db)?;
        let products = paginator.fetch_page(page).await.map_err(RepoError::from_db)?;
        let categories = products
            .load_many_to_many(category::Entity, product_category::Entity, db)
            .await
            .map_err(RepoError::from_db)?;

        let rows = products
            .into_iter()
            .zip(categories)
            .map(|(product, categories)| ProductRecord {
                product,
                categories,
            })
            .collect();
        Ok(ProductWindow {
            rows,
            total_elements: totals.number_of_items,
            total_pages: totals.number_of_pages,
        })
    }

    async fn insert<C: ConnectionTrait>(
        &self,
        db: &C,
        data: ProductData,
        categories: Vec<CategoryRef>,
    ) -> Result<ProductRecord, RepoError> {
        let am = product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name),
            description: Set(data.description),
            price: Set(data.price),
            image_url: Set(data.image_url),
            date: Set(data.date),
        };
        let product = am.insert(db).await.map_err(RepoError::from_db)?;
        replace_category_links(db, product.id, &categories, false).await?;
        let categories = product
            .find_related(category::Entity)
            .order_by_asc(category::Column::Name)
            .all(db)
            .await
            .map_err(RepoError::from_db)?;
        Ok(ProductRecord {
            product,
            categories,
        })
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        target: ProductRef,
        data: ProductData,
        categories: Vec<CategoryRef>,
    ) -> Result<ProductRecord, RepoError> {
        // Write through the handle: the existence check is the UPDATE
        // itself, which reports RowAbsent when nothing matched.
        let am = product::ActiveModel {
            id: Set(target.id()),
            name: Set(data.name),
            description: Set(data.description),
            price: Set(data.price),
            image_url: Set(data.image_url),
            date: Set(data.date),
        };
        let product = am.update(db).await.map_err(RepoError::from_db)?;
        replace_category_links(db, product.id, &categories, true).await?;
        let categories = product
            .find_related(category::Entity)
            .order_by_asc(category::Column::Name)
            .all(db)
            .await
            .map_err(RepoError::from_db)?;
        Ok(ProductRecord {
            product,
            categories,
        })
    }

    async fn delete_by_id<C: ConnectionTrait>(&self, db: &C, id: Uuid) -> Result<(), RepoError> {
        let res = product::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(RepoError::from_db)?;
        if res.rows_affected == 0 {
            return Err(RepoError::RowAbsent);
        }
        Ok(())
    }
}

/// Replace (or create) a product's association rows. A reference to a
/// missing category fails here, at flush time, as a foreign-key signal.
async fn replace_category_links<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    categories: &[CategoryRef],
    clear_existing: bool,
) -> Result<(), RepoError> {
    if clear_existing {
        product_category::Entity::delete_many()
            .filter(product_category::Column::ProductId.eq(product_id))
            .exec(db)
            .await
            .map_err(RepoError::from_db)?;
    }
    if categories.is_empty() {
        return Ok(());
    }
    let rows = categories.iter().map(|c| product_category::ActiveModel {
        product_id: Set(product_id),
        category_id: Set(c.id()),
    });
    product_category::Entity::insert_many(rows)
        .exec(db)
        .await
        .map_err(RepoError::from_db)?;
    Ok(())
}

/// SeaORM-backed category repository.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeaOrmCategoryRepository;

#[async_trait]
impl CategoryRepository for SeaOrmCategoryRepository {
    fn reference(&self, id: Uuid) -> CategoryRef {
        CategoryRef::new(id)
    }

    async fn find_all<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<category::Model>, RepoError> {
        category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(db)
            .await
            .map_err(RepoError::from_db)
    }

    async fn find_by_id<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> Result<Option<category::Model>, RepoError> {
        match CategoryRef::new(id).materialize(db).await {
            Ok(model) => Ok(Some(model)),
            Err(RepoError::RowAbsent) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn insert<C: ConnectionTrait>(
        &self,
        db: &C,
        name: String,
    ) -> Result<category::Model, RepoError> {
        let am = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            ..Default::default()
        };
        am.insert(db).await.map_err(RepoError::from_db)
    }

    async fn update<C: ConnectionTrait>(
        &self,
        db: &C,
        target: CategoryRef,
        name: String,
    ) -> Result<category::Model, RepoError> {
        let am = category::ActiveModel {
            id: Set(target.id()),
            name: Set(name),
            ..Default::default()
        };
        am.update(db).await.map_err(RepoError::from_db)
    }

    async fn delete_by_id<C: ConnectionTrait>(&self, db: &C, id: Uuid) -> Result<(), RepoError> {
        let res = category::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(RepoError::from_db)?;
        if res.rows_affected == 0 {
            return Err(RepoError::RowAbsent);
        }
        Ok(())
    }
}
