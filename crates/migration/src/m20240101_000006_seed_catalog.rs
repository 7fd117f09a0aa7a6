//! Seed the catalog with the reference dataset: roles, the three base
//! categories and the 25-product catalog the integration tests query.
use sea_orm_migration::prelude::*;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DESCRIPTION: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.";

const ROLES: &[&str] = &["ROLE_OPERATOR", "ROLE_ADMIN"];

const CATEGORIES: &[&str] = &["Livros", "Eletrônicos", "Computadores"];

// (name, price, category, date)
const PRODUCTS: &[(&str, &str, &str, &str)] = &[
    ("The Lord of the Rings", "90.50", "Livros", "2020-07-13 20:50:07.123450+00"),
    ("Smart TV", "2190.00", "Eletrônicos", "2020-07-13 20:50:07.123450+00"),
    ("Macbook Pro", "1250.00", "Computadores", "2020-07-13 20:50:07.123450+00"),
    ("PC Gamer", "1200.00", "Computadores", "2020-07-13 20:50:07.123450+00"),
    ("Rails for Dummies", "100.99", "Livros", "2020-07-14 10:00:00+00"),
    ("PC Gamer Ex", "1350.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer X", "1350.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Alfa", "1850.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Tera", "1950.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Y", "1700.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Nitro", "1450.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Card", "1850.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Plus", "1350.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Hera", "2250.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Weed", "2200.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Max", "2340.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Turbo", "1280.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Hot", "1450.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Ez", "1750.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Tr", "1650.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Tx", "1680.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Er", "1850.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Min", "2250.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Boo", "2350.00", "Computadores", "2020-07-14 10:00:00+00"),
    ("PC Gamer Foo", "4170.00", "Computadores", "2020-07-14 10:00:00+00"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut sql = String::new();

        for authority in ROLES {
            sql.push_str(&format!(
                "INSERT INTO role (id, authority) VALUES ('{}', '{}') ON CONFLICT DO NOTHING;\n",
                Uuid::new_v4(),
                authority
            ));
        }

        let mut category_ids: HashMap<&str, Uuid> = HashMap::new();
        for &name in CATEGORIES {
            let id = Uuid::new_v4();
            category_ids.insert(name, id);
            sql.push_str(&format!(
                "INSERT INTO category (id, name, created_at, updated_at) VALUES ('{id}', '{name}', now(), now());\n"
            ));
        }

        for (i, (name, price, category, date)) in PRODUCTS.iter().enumerate() {
            let id = Uuid::new_v4();
            let image_url = format!(
                "https://img.catalog.example.com/products/{}-big.jpg",
                i + 1
            );
            sql.push_str(&format!(
                "INSERT INTO product (id, name, description, price, image_url, \"date\") VALUES ('{id}', '{name}', '{DESCRIPTION}', {price}, '{image_url}', '{date}');\n"
            ));
            let category_id = category_ids[category];
            sql.push_str(&format!(
                "INSERT INTO product_category (product_id, category_id) VALUES ('{id}', '{category_id}');\n"
            ));
        }

        manager.get_connection().execute_unprepared(&sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let product_names = PRODUCTS
            .iter()
            .map(|p| format!("'{}'", p.0))
            .collect::<Vec<_>>()
            .join(", ");
        let category_names = CATEGORIES
            .iter()
            .map(|c| format!("'{c}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let role_names = ROLES
            .iter()
            .map(|r| format!("'{r}'"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "DELETE FROM product WHERE name IN ({product_names});\n\
             DELETE FROM category WHERE name IN ({category_names});\n\
             DELETE FROM role WHERE authority IN ({role_names});\n"
        );
        manager.get_connection().execute_unprepared(&sql).await?;
        Ok(())
    }
}
