//! Service layer providing business-oriented catalog operations on top of
//! the entity crate.
//! - Separates business logic from data access.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod catalog;
pub mod errors;
pub mod pagination;
