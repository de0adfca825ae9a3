use serde::Serialize;

use crate::pagination::Pagination;

/// Uniform response body: `{ ok, data?, error?, pagination? }`.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> Envelope<T> {
    pub fn data(data: T) -> Self {
        Envelope {
            ok: true,
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Envelope {
            pagination: Some(pagination),
            ..Self::data(data)
        }
    }

    /// Success without a body, or with one only when present.
    pub fn maybe(data: Option<T>) -> Self {
        Envelope {
            ok: true,
            data,
            error: None,
            pagination: None,
        }
    }
}

impl Envelope<()> {
    pub fn ok() -> Self {
        Envelope::maybe(None)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Envelope {
            ok: false,
            data: None,
            error: Some(message.into()),
            pagination: None,
        }
    }
}
