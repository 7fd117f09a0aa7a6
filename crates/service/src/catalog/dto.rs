//! Transfer representations at the API boundary: flattened projections of
//! the stored entities, never sharing state with them.

use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use models::category;

use super::repository::{ProductData, ProductRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
}

impl From<category::Model> for CategoryDto {
    fn from(m: category::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub image_url: String,
    pub date: DateTimeWithTimeZone,
    pub categories: Vec<CategoryDto>,
}

impl From<ProductRecord> for ProductDto {
    fn from(record: ProductRecord) -> Self {
        let mut categories: Vec<CategoryDto> =
            record.categories.into_iter().map(Into::into).collect();
        // Storage order is unspecified; display order is by name.
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            id: record.product.id,
            name: record.product.name,
            description: record.product.description,
            price: record.product.price,
            image_url: record.product.image_url,
            date: record.product.date,
            categories,
        }
    }
}

/// Write payload for product create/replace. `categories` carries the ids
/// of the referenced categories; names come from the store, not the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
    pub date: DateTimeWithTimeZone,
    #[serde(default)]
    pub categories: Vec<CategoryIdRef>,
}

/// Reference to a category by identity; any other fields in the payload
/// are ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CategoryIdRef {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

impl ProductInput {
    /// Split into scalar fields and the deduplicated category id set.
    pub(crate) fn into_data(self) -> (ProductData, Vec<Uuid>) {
        let mut ids: Vec<Uuid> = self.categories.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        (
            ProductData {
                name: self.name,
                description: self.description,
                price: self.price,
                image_url: self.image_url,
                date: self.date,
            },
            ids,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use models::product;

    fn record_with_categories(names: &[&str]) -> ProductRecord {
        let now: DateTimeWithTimeZone = Utc::now().into();
        ProductRecord {
            product: product::Model {
                id: Uuid::new_v4(),
                name: "Phone".into(),
                description: "A phone".into(),
                price: Decimal::new(80000, 2),
                image_url: "https://example.com/p.jpg".into(),
                date: now,
            },
            categories: names
                .iter()
                .map(|n| category::Model {
                    id: Uuid::new_v4(),
                    name: (*n).into(),
                    created_at: now,
                    updated_at: now,
                })
                .collect(),
        }
    }

    #[test]
    fn dto_orders_categories_by_name() {
        let dto: ProductDto = record_with_categories(&["Livros", "Computadores"]).into();
        let names: Vec<&str> = dto.categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Computadores", "Livros"]);
    }

    #[test]
    fn input_deduplicates_category_ids() {
        let id = Uuid::new_v4();
        let input = ProductInput {
            name: "Phone".into(),
            description: String::new(),
            price: Decimal::new(100, 0),
            image_url: String::new(),
            date: Utc::now().into(),
            categories: vec![CategoryIdRef { id }, CategoryIdRef { id }],
        };
        let (_, ids) = input.into_data();
        assert_eq!(ids, vec![id]);
    }

    #[test]
    fn product_dto_serializes_camel_case() {
        let dto: ProductDto = record_with_categories(&[]).into();
        let json = serde_json::to_value(&dto).expect("serialize");
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("image_url").is_none());
        assert!(json["price"].is_number());
    }
}
