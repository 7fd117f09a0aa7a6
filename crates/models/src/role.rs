use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub authority: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match *self {}
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn create(db: &DatabaseConnection, authority: &str) -> Result<Model, errors::ModelError> {
    if authority.trim().is_empty() {
        return Err(errors::ModelError::Validation("authority required".into()));
    }
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        authority: Set(authority.to_string()),
    };
    am.insert(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
