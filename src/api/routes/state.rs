use crate::service::ProductService;

/// Shared application state passed to all Axum handlers via `.with_state()`.
#[derive(Clone)]
pub struct AppState {
    pub service: ProductService,
}

impl AppState {
    pub fn new(service: ProductService) -> Self {
        Self { service }
    }
}
