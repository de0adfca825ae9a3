pub mod envelope;
pub mod error;
pub mod routes;

pub use envelope::Envelope;
pub use error::ApiError;
pub use routes::state::AppState;
