use sea_orm::ConnectionTrait;
use tracing::info;
use uuid::Uuid;

use models::category;

use crate::errors::ServiceError;

use super::dto::{CategoryDto, CategoryInput};
use super::repository::{CategoryRepository, RepoError};

/// Category counterpart of the product service. Same translation contract,
/// smaller surface: categories list unpaged, ordered by name.
#[derive(Clone, Debug)]
pub struct CategoryService<C> {
    categories: C,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(categories: C) -> Self {
        Self { categories }
    }

    pub async fn find_all<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
    ) -> Result<Vec<CategoryDto>, ServiceError> {
        let rows = self
            .categories
            .find_all(db)
            .await
            .map_err(storage_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn find_by_id<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        id: Uuid,
    ) -> Result<CategoryDto, ServiceError> {
        match self.categories.find_by_id(db, id).await {
            Ok(Some(model)) => Ok(model.into()),
            Ok(None) => Err(ServiceError::not_found("category")),
            Err(e) => Err(storage_error(e)),
        }
    }

    pub async fn insert<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        input: CategoryInput,
    ) -> Result<CategoryDto, ServiceError> {
        category::validate_name(&input.name)?;
        let model = self
            .categories
            .insert(db, input.name)
            .await
            .map_err(storage_error)?;
        info!(id = %model.id, "created category");
        Ok(model.into())
    }

    pub async fn update<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        id: Uuid,
        input: CategoryInput,
    ) -> Result<CategoryDto, ServiceError> {
        category::validate_name(&input.name)?;
        // Lazy handle: a missing id surfaces at save time, not here.
        let target = self.categories.reference(id);
        match self.categories.update(db, target, input.name).await {
            Ok(model) => {
                info!(id = %model.id, "updated category");
                Ok(model.into())
            }
            Err(RepoError::RowAbsent) => Err(ServiceError::not_found("category")),
            Err(e) => Err(storage_error(e)),
        }
    }

    pub async fn delete<Conn: ConnectionTrait>(
        &self,
        db: &Conn,
        id: Uuid,
    ) -> Result<(), ServiceError> {
        match self.categories.delete_by_id(db, id).await {
            Ok(()) => {
                info!(%id, "deleted category");
                Ok(())
            }
            Err(RepoError::RowAbsent) => Err(ServiceError::not_found("category")),
            Err(RepoError::ForeignKey(msg)) => Err(ServiceError::IntegrityViolation(msg)),
            Err(RepoError::Other(msg)) => Err(ServiceError::Db(msg)),
        }
    }
}

fn storage_error(e: RepoError) -> ServiceError {
    match e {
        RepoError::RowAbsent => ServiceError::Db("unexpected row-absent signal".into()),
        RepoError::ForeignKey(msg) => ServiceError::IntegrityViolation(msg),
        RepoError::Other(msg) => ServiceError::Db(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::reference::CategoryRef;
    use async_trait::async_trait;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    fn conn() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn model(id: Uuid, name: &str) -> category::Model {
        let now = Utc::now().into();
        category::Model {
            id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    struct StubCategories {
        existing: Uuid,
        dependent: Uuid,
    }

    #[async_trait]
    impl CategoryRepository for StubCategories {
        fn reference(&self, id: Uuid) -> CategoryRef {
            CategoryRef::new(id)
        }

        async fn find_all<C: ConnectionTrait>(
            &self,
            _db: &C,
        ) -> Result<Vec<category::Model>, RepoError> {
            Ok(vec![
                model(self.existing, "Computadores"),
                model(self.dependent, "Livros"),
            ])
        }

        async fn find_by_id<C: ConnectionTrait>(
            &self,
            _db: &C,
            id: Uuid,
        ) -> Result<Option<category::Model>, RepoError> {
            if id == self.existing {
                Ok(Some(model(id, "Computadores")))
            } else {
                Ok(None)
            }
        }

        async fn insert<C: ConnectionTrait>(
            &self,
            _db: &C,
            name: String,
        ) -> Result<category::Model, RepoError> {
            Ok(model(Uuid::new_v4(), &name))
        }

        async fn update<C: ConnectionTrait>(
            &self,
            _db: &C,
            target: CategoryRef,
            name: String,
        ) -> Result<category::Model, RepoError> {
            if target.id() == self.existing {
                Ok(model(target.id(), &name))
            } else {
                Err(RepoError::RowAbsent)
            }
        }

        async fn delete_by_id<C: ConnectionTrait>(
            &self,
            _db: &C,
            id: Uuid,
        ) -> Result<(), RepoError> {
            if id == self.dependent {
                Err(RepoError::ForeignKey("fk_product_category_category".into()))
            } else if id == self.existing {
                Ok(())
            } else {
                Err(RepoError::RowAbsent)
            }
        }
    }

    fn fixture() -> (Uuid, Uuid, CategoryService<StubCategories>) {
        let existing = Uuid::new_v4();
        let dependent = Uuid::new_v4();
        (
            existing,
            dependent,
            CategoryService::new(StubCategories {
                existing,
                dependent,
            }),
        )
    }

    #[tokio::test]
    async fn find_all_returns_dtos() {
        let (_, _, service) = fixture();
        let all = service.find_all(&conn()).await.expect("categories");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Computadores");
    }

    #[tokio::test]
    async fn find_by_id_fails_not_found_for_unknown_id() {
        let (_, _, service) = fixture();
        let err = service
            .find_by_id(&conn(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn insert_rejects_blank_name() {
        let (_, _, service) = fixture();
        let err = service
            .insert(&conn(), CategoryInput { name: "   ".into() })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Model(models::errors::ModelError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_fails_not_found_only_at_save_time() {
        let (_, _, service) = fixture();
        let err = service
            .update(
                &conn(),
                Uuid::new_v4(),
                CategoryInput {
                    name: "Games".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_translates_referential_rejection() {
        let (existing, dependent, service) = fixture();
        assert!(service.delete(&conn(), existing).await.is_ok());
        let err = service.delete(&conn(), dependent).await.unwrap_err();
        assert!(matches!(err, ServiceError::IntegrityViolation(_)));
        let err = service.delete(&conn(), Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
