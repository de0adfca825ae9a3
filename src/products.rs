use log::debug;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::query::{filtering, paginate, sorting, ProductFilters, SortSpec};

const SELECT_PRODUCTS_SQL: &str = "SELECT * FROM products";
const COUNT_PRODUCTS_SQL: &str = "SELECT COUNT(*) FROM products";

/// A row of the products table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub category: String,
}

/// Fields required to create a product. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductData {
    pub name: String,
    pub price: i64,
    pub category: String,
}

/// Partial update. `None` means "not supplied"; any `Some` value is written,
/// including `0` and the empty string.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.category.is_none()
    }

    /// Column assignments in a stable order, paired with their values.
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut assignments = Vec::new();

        if let Some(name) = &self.name {
            assignments.push(("name", Value::Text(name.clone())));
        }
        if let Some(price) = self.price {
            assignments.push(("price", Value::Integer(price)));
        }
        if let Some(category) = &self.category {
            assignments.push(("category", Value::Text(category.clone())));
        }

        assignments
    }
}

impl Product {
    pub fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Product {
            id: row.get("id")?,
            name: row.get("name")?,
            price: row.get("price")?,
            category: row.get("category")?,
        })
    }

    /// Products matching `filters`, optionally sorted and paged. Without a
    /// sort, rows come back in store order.
    pub fn list(
        conn: &Connection,
        filters: &ProductFilters,
        sort: Option<&SortSpec>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, CatalogError> {
        let mut params: Vec<Value> = Vec::new();

        let query = filtering(SELECT_PRODUCTS_SQL, filters, &mut params);
        let query = sorting(&query, sort);
        let query = paginate(&query, page, limit);

        debug!("list products: {} {:?}", query, params);

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(params_from_iter(params.iter()), Product::from_row)?;
        let products = rows.collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    /// Number of products matching `filters`, ignoring any paging.
    pub fn count(conn: &Connection, filters: &ProductFilters) -> Result<i64, CatalogError> {
        let mut params: Vec<Value> = Vec::new();
        let query = filtering(COUNT_PRODUCTS_SQL, filters, &mut params);

        let count = conn.query_row(&query, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(count)
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Product>, CatalogError> {
        conn.query_row(
            "SELECT * FROM products WHERE id = ?1",
            [id],
            Product::from_row,
        )
        .optional()
        .map_err(CatalogError::DatabaseError)
    }

    pub fn create(conn: &Connection, data: &ProductData) -> Result<Product, CatalogError> {
        let product = conn.query_row(
            "INSERT INTO products (name, price, category) VALUES (?1, ?2, ?3) RETURNING *",
            (&data.name, data.price, &data.category),
            Product::from_row,
        )?;

        Ok(product)
    }

    /// Writes the supplied fields of `update`. Returns `None` when no product
    /// has this id. An empty update writes nothing and returns the current row.
    pub fn update(
        conn: &Connection,
        id: i64,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, CatalogError> {
        if update.is_empty() {
            return Self::get_by_id(conn, id);
        }

        let mut query = "UPDATE products SET".to_string();
        let mut params: Vec<Value> = Vec::new();

        for (column, value) in update.assignments() {
            if !params.is_empty() {
                query.push(',');
            }
            params.push(value);
            query.push_str(&format!(" {} = ?{}", column, params.len()));
        }

        params.push(Value::Integer(id));
        query.push_str(&format!(" WHERE id = ?{} RETURNING *", params.len()));

        debug!("update product: {} {:?}", query, params);

        conn.query_row(&query, params_from_iter(params.iter()), Product::from_row)
            .optional()
            .map_err(CatalogError::DatabaseError)
    }

    /// Deleting an id that does not exist is not an error.
    pub fn delete(conn: &Connection, id: i64) -> Result<(), CatalogError> {
        let deleted = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
        debug!("delete product {}: {} row(s) removed", id, deleted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{SortColumn, SortDirection};
    use crate::schema;
    use pretty_assertions::assert_eq;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::up(&conn).unwrap();
        conn
    }

    fn data(name: &str, price: i64, category: &str) -> ProductData {
        ProductData {
            name: name.to_string(),
            price,
            category: category.to_string(),
        }
    }

    fn seed(conn: &Connection) -> Vec<Product> {
        [
            data("Pen", 150, "office"),
            data("Ball", 900, "toys"),
            data("Stapler", 1200, "office"),
            data("Kite", 450, "toys"),
            data("Paper", 500, "office"),
        ]
        .iter()
        .map(|d| Product::create(conn, d).unwrap())
        .collect()
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_create_then_get_round_trip() {
        let conn = test_conn();
        let input = data("Pen", 150, "office");

        let created = Product::create(&conn, &input).unwrap();
        let fetched = Product::get_by_id(&conn, created.id).unwrap().unwrap();

        assert_eq!(fetched, created);
        assert_eq!(fetched.name, input.name);
        assert_eq!(fetched.price, input.price);
        assert_eq!(fetched.category, input.category);
    }

    #[test]
    fn test_get_missing_id_is_none() {
        let conn = test_conn();
        assert_eq!(Product::get_by_id(&conn, 999_999).unwrap(), None);
    }

    #[test]
    fn test_ids_are_not_reused_after_delete() {
        let conn = test_conn();
        let first = Product::create(&conn, &data("A", 1, "x")).unwrap();
        Product::delete(&conn, first.id).unwrap();
        let second = Product::create(&conn, &data("B", 2, "x")).unwrap();

        assert!(second.id > first.id);
    }

    #[test]
    fn test_list_without_filters_returns_all_in_store_order() {
        let conn = test_conn();
        let seeded = seed(&conn);

        let listed = Product::list(&conn, &ProductFilters::default(), None, None, None).unwrap();
        assert_eq!(listed, seeded);
    }

    #[test]
    fn test_list_filters_by_category() {
        let conn = test_conn();
        seed(&conn);

        let listed =
            Product::list(&conn, &ProductFilters::by_category("office"), None, None, None).unwrap();

        assert_eq!(names(&listed), vec!["Pen", "Stapler", "Paper"]);
        assert!(listed.iter().all(|p| p.category == "office"));
    }

    #[test]
    fn test_count_matches_unpaged_list() {
        let conn = test_conn();
        seed(&conn);

        for filters in [
            ProductFilters::default(),
            ProductFilters::by_category("office"),
            ProductFilters::by_category("toys"),
            ProductFilters::by_category("garden"),
        ] {
            let listed = Product::list(&conn, &filters, None, None, None).unwrap();
            let count = Product::count(&conn, &filters).unwrap();
            assert_eq!(count as usize, listed.len(), "filters: {:?}", filters);
        }
    }

    #[test]
    fn test_list_sorted_by_price_desc() {
        let conn = test_conn();
        seed(&conn);

        let sort = SortSpec::new(SortColumn::Price, SortDirection::Desc);
        let listed =
            Product::list(&conn, &ProductFilters::default(), Some(&sort), None, None).unwrap();

        assert_eq!(names(&listed), vec!["Stapler", "Ball", "Paper", "Kite", "Pen"]);
    }

    #[test]
    fn test_list_pages_through_filtered_rows() {
        let conn = test_conn();
        seed(&conn);
        let office = ProductFilters::by_category("office");

        let page_2 = Product::list(&conn, &office, None, Some(2), Some(2)).unwrap();
        assert_eq!(names(&page_2), vec!["Paper"]);

        let page_3 = Product::list(&conn, &office, None, Some(3), Some(2)).unwrap();
        assert!(page_3.is_empty());
    }

    #[test]
    fn test_list_page_without_limit_returns_everything() {
        let conn = test_conn();
        seed(&conn);

        let listed = Product::list(&conn, &ProductFilters::default(), None, Some(2), None).unwrap();
        assert_eq!(listed.len(), 5);
    }

    #[test]
    fn test_update_changes_only_supplied_fields() {
        let conn = test_conn();
        let created = Product::create(&conn, &data("Pen", 150, "office")).unwrap();

        let update = ProductUpdate {
            price: Some(175),
            ..Default::default()
        };
        let updated = Product::update(&conn, created.id, &update).unwrap().unwrap();

        assert_eq!(
            updated,
            Product {
                price: 175,
                ..created
            }
        );
    }

    #[test]
    fn test_update_writes_falsy_values() {
        // Presence decides what gets written, so zero and empty are honored
        let conn = test_conn();
        let created = Product::create(&conn, &data("Pen", 150, "office")).unwrap();

        let update = ProductUpdate {
            name: Some(String::new()),
            price: Some(0),
            category: None,
        };
        let updated = Product::update(&conn, created.id, &update).unwrap().unwrap();

        assert_eq!(updated.price, 0);
        assert_eq!(updated.name, "");
        assert_eq!(updated.category, "office");
        assert_eq!(Product::get_by_id(&conn, created.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_missing_id_is_none() {
        let conn = test_conn();
        let update = ProductUpdate {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };

        assert_eq!(Product::update(&conn, 42, &update).unwrap(), None);
    }

    #[test]
    fn test_empty_update_returns_current_row() {
        let conn = test_conn();
        let created = Product::create(&conn, &data("Pen", 150, "office")).unwrap();

        let unchanged = Product::update(&conn, created.id, &ProductUpdate::default()).unwrap();
        assert_eq!(unchanged, Some(created));
    }

    #[test]
    fn test_delete_removes_row() {
        let conn = test_conn();
        let created = Product::create(&conn, &data("Pen", 150, "office")).unwrap();

        Product::delete(&conn, created.id).unwrap();
        assert_eq!(Product::get_by_id(&conn, created.id).unwrap(), None);
    }

    #[test]
    fn test_delete_missing_id_is_ok() {
        let conn = test_conn();
        assert!(Product::delete(&conn, 12345).is_ok());
    }
}
