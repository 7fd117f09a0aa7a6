//! Lazy entity handles.
//!
//! Acquiring a handle never touches the store and never fails, whatever the
//! id; the existence check is deferred to the first use of the handle
//! (a materialization or a write through it).

use std::marker::PhantomData;

use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};
use uuid::Uuid;

use super::repository::RepoError;

pub struct EntityRef<E> {
    id: Uuid,
    _entity: PhantomData<E>,
}

impl<E> Clone for EntityRef<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EntityRef<E> {}

impl<E> std::fmt::Debug for EntityRef<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EntityRef").field(&self.id).finish()
    }
}

impl<E: EntityTrait> EntityRef<E> {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            _entity: PhantomData,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<E: EntityTrait> EntityRef<E>
where
    Uuid: Into<<E::PrimaryKey as PrimaryKeyTrait>::ValueType>,
{
    /// Resolve the handle against the store. This is where a handle to a
    /// non-existent id turns invalid.
    pub async fn materialize<C: ConnectionTrait>(&self, db: &C) -> Result<E::Model, RepoError> {
        E::find_by_id(self.id)
            .one(db)
            .await
            .map_err(RepoError::from_db)?
            .ok_or(RepoError::RowAbsent)
    }
}

pub type ProductRef = EntityRef<models::product::Entity>;
pub type CategoryRef = EntityRef<models::category::Entity>;
