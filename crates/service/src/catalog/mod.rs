//! Catalog domain: product and category services over repository traits.

pub mod category_service;
pub mod dto;
pub mod product_service;
pub mod reference;
pub mod repository;

pub use category_service::CategoryService;
pub use product_service::ProductService;
pub use repository::{SeaOrmCategoryRepository, SeaOrmProductRepository};
