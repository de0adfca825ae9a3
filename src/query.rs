//! Composition of product SELECT statements.
//!
//! Every user supplied value ends up in the bound parameter list. The only
//! text spliced into a statement comes from closed enums ([`FilterKey`],
//! [`SortColumn`], [`SortDirection`]) or from typed integers (page, limit).

use std::fmt;
use std::str::FromStr;

use rusqlite::types::Value;
use crate::error::CatalogError;

/// Columns that can be filtered by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKey {
    Category,
}

impl FilterKey {
    /// Predicates are emitted in this order.
    pub const ALL: [FilterKey; 1] = [FilterKey::Category];

    pub fn column(self) -> &'static str {
        match self {
            FilterKey::Category => "category",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProductFilters {
    pub category: Option<String>,
}

impl ProductFilters {
    pub fn by_category(category: &str) -> Self {
        ProductFilters {
            category: Some(category.to_owned()),
        }
    }

    pub fn value(&self, key: FilterKey) -> Option<&str> {
        match key {
            FilterKey::Category => self.category.as_deref(),
        }
    }
}

/// Appends one equality predicate per present, non-empty filter.
///
/// The first predicate opens with `WHERE`, later ones with `AND`. Each value
/// is pushed onto `params` and referenced by its 1-based position.
pub fn filtering(base_query: &str, filters: &ProductFilters, params: &mut Vec<Value>) -> String {
    let mut query = base_query.to_owned();
    let mut first = true;

    for key in FilterKey::ALL {
        let value = match filters.value(key) {
            Some(value) if !value.is_empty() => value,
            _ => continue,
        };

        params.push(Value::Text(value.to_owned()));

        match first {
            true => {
                query.push_str(" WHERE ");
                first = false;
            }
            false => query.push_str(" AND "),
        }

        query.push_str(key.column());
        query.push_str(" = ?");
        query.push_str(&params.len().to_string());
    }

    query
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Name,
    Price,
    Category,
}

impl SortColumn {
    pub fn column(self) -> &'static str {
        match self {
            SortColumn::Id => "id",
            SortColumn::Name => "name",
            SortColumn::Price => "price",
            SortColumn::Category => "category",
        }
    }
}

impl FromStr for SortColumn {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(SortColumn::Id),
            "name" => Ok(SortColumn::Name),
            "price" => Ok(SortColumn::Price),
            "category" => Ok(SortColumn::Category),
            _ => Err(CatalogError::InvalidInput(format!(
                "Invalid sort field '{s}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(CatalogError::InvalidInput(format!(
                "Invalid sort direction '{s}'"
            ))),
        }
    }
}

/// A parsed `field` or `field:direction` sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        SortSpec { column, direction }
    }
}

impl FromStr for SortSpec {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field, direction.parse()?),
            None => (s, SortDirection::default()),
        };

        Ok(SortSpec {
            column: field.parse()?,
            direction,
        })
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.column.column(), direction)
    }
}

pub fn sorting(base_query: &str, sort: Option<&SortSpec>) -> String {
    match sort {
        None => base_query.to_owned(),
        Some(spec) => format!(
            "{base_query} ORDER BY {} {}",
            spec.column.column(),
            spec.direction.keyword()
        ),
    }
}

/// Appends `LIMIT/OFFSET` only when both page and limit are positive.
///
/// The offset saturates at `i64::MAX`, the largest integer SQLite accepts.
pub fn paginate(base_query: &str, page: Option<u32>, limit: Option<u32>) -> String {
    match (page, limit) {
        (Some(page), Some(limit)) if page > 0 && limit > 0 => {
            let offset = (i64::from(page) - 1).saturating_mul(i64::from(limit));
            format!("{base_query} LIMIT {limit} OFFSET {offset}")
        }
        _ => base_query.to_owned(),
    }
}
