pub mod products;
pub mod state;

use axum::{routing::get, Router};

use state::AppState;

/// All product routes, with state attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/{id}",
            get(products::get_product)
                .patch(products::update_product)
                .delete(products::delete_product),
        )
        .with_state(state)
}
