//! Secondary indexes for catalog lookups and the join table reverse path.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_name")
                    .table(Product::Table)
                    .col(Product::Name)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_product_category_category_id")
                    .table(ProductCategory::Table)
                    .col(ProductCategory::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_product_category_category_id")
                    .table(ProductCategory::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_product_name")
                    .table(Product::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Name,
}

#[derive(DeriveIden)]
enum ProductCategory {
    Table,
    CategoryId,
}
