use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use log::{debug, info};
use serde::Deserialize;

use super::state::AppState;
use crate::api::{ApiError, Envelope};
use crate::pagination::Pagination;
use crate::products::{Product, ProductData, ProductUpdate};
use crate::query::{ProductFilters, SortSpec};
use crate::service::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};

const NOT_FOUND_MESSAGE: &str = "Product not found";

/// Query string of `GET /products`. Everything arrives as text so that a bad
/// `page` or `limit` can fall back to its default instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct ListProductsParams {
    pub category: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Body of `POST /products`. Fields are optional here so a missing one can be
/// reported by name.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub category: Option<String>,
}

impl CreateProductRequest {
    fn into_product_data(self) -> Result<ProductData, ApiError> {
        let missing = |field: &str| ApiError::BadRequest(format!("Missing required field '{field}'"));

        Ok(ProductData {
            name: self.name.ok_or_else(|| missing("name"))?,
            price: self.price.ok_or_else(|| missing("price"))?,
            category: self.category.ok_or_else(|| missing("category"))?,
        })
    }
}

/// Positive integer from a query value, or `default` for anything else.
/// Only plain base-10 integers are accepted; `2.5` and `1e1` take the default.
pub fn parse_positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

fn product_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|_| ApiError::BadRequest("Invalid product id".to_string()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

/// GET /products?category=&sort=&page=&limit=
/// Lists products with paging information
pub async fn list_products(
    State(state): State<AppState>,
    params: Result<Query<ListProductsParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Product>>>, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;

    let filters = ProductFilters {
        category: params.category,
    };
    let sort = params
        .sort
        .as_deref()
        .filter(|sort| !sort.trim().is_empty())
        .map(str::parse::<SortSpec>)
        .transpose()?;
    let page = parse_positive_or(params.page.as_deref(), DEFAULT_PAGE);
    let limit = parse_positive_or(params.limit.as_deref(), DEFAULT_LIMIT).min(MAX_LIMIT);

    debug!(
        "List products: filters={:?} sort={} page={} limit={}",
        filters,
        sort.as_ref().map_or_else(|| "none".to_string(), SortSpec::to_string),
        page,
        limit
    );

    let products = state
        .service
        .get_products(&filters, sort.as_ref(), Some(page), Some(limit))?;
    let total_items = state.service.get_products_count(&filters)?;

    let pagination = Pagination::new(page, limit, total_items.max(0) as u64);

    Ok(Json(Envelope::paginated(products, pagination)))
}

/// POST /products
/// Creates a product from `{ name, price, category }`
pub async fn create_product(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Product>>), ApiError> {
    let data = json_body(body)?.into_product_data()?;

    let product = state.service.create_product(&data)?;
    info!("Created product {} ({})", product.id, product.name);

    Ok((StatusCode::CREATED, Json(Envelope::data(product))))
}

/// GET /products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<Product>>, ApiError> {
    let id = product_id(path)?;

    match state.service.get_product(id)? {
        Some(product) => Ok(Json(Envelope::data(product))),
        None => Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string())),
    }
}

/// PATCH /products/{id}
/// Writes only the fields present in the body. An unknown id still answers
/// `{ ok: true }`, just without `data`.
pub async fn update_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ProductUpdate>, JsonRejection>,
) -> Result<Json<Envelope<Product>>, ApiError> {
    let id = product_id(path)?;
    let update = json_body(body)?;

    let product = state.service.update_product(id, &update)?;
    match &product {
        Some(_) => info!("Updated product {}", id),
        None => debug!("Update skipped, no product with id {}", id),
    }

    Ok(Json(Envelope::maybe(product)))
}

/// DELETE /products/{id}
/// Succeeds whether or not the product existed
pub async fn delete_product(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let id = product_id(path)?;

    state.service.delete_product(id)?;
    info!("Deleted product {}", id);

    Ok(Json(Envelope::ok()))
}
