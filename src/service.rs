use crate::database::Database;
use crate::error::CatalogError;
use crate::products::{Product, ProductData, ProductUpdate};
use crate::query::{ProductFilters, SortSpec};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 1000;

/// Entry point used by the HTTP layer. Applies defaults and hands each call
/// a pooled connection; no other rules live here.
#[derive(Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get_products(
        &self,
        filters: &ProductFilters,
        sort: Option<&SortSpec>,
        page: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Vec<Product>, CatalogError> {
        let conn = self.db.get_connection()?;
        Product::list(
            &conn,
            filters,
            sort,
            Some(page.unwrap_or(DEFAULT_PAGE)),
            Some(limit.unwrap_or(DEFAULT_LIMIT)),
        )
    }

    pub fn get_products_count(&self, filters: &ProductFilters) -> Result<i64, CatalogError> {
        let conn = self.db.get_connection()?;
        Product::count(&conn, filters)
    }

    pub fn get_product(&self, id: i64) -> Result<Option<Product>, CatalogError> {
        let conn = self.db.get_connection()?;
        Product::get_by_id(&conn, id)
    }

    pub fn create_product(&self, data: &ProductData) -> Result<Product, CatalogError> {
        let conn = self.db.get_connection()?;
        Product::create(&conn, data)
    }

    pub fn update_product(
        &self,
        id: i64,
        update: &ProductUpdate,
    ) -> Result<Option<Product>, CatalogError> {
        let conn = self.db.get_connection()?;
        Product::update(&conn, id, update)
    }

    pub fn delete_product(&self, id: i64) -> Result<(), CatalogError> {
        let conn = self.db.get_connection()?;
        Product::delete(&conn, id)
    }
}
