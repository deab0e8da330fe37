use serde::{Deserialize, Serialize};

use crate::models::EntityId;

pub const DEFAULT_PER_PAGE: u32 = 10;
/// Page sizes offered by the tables.
pub const ROWS_PER_PAGE_OPTIONS: [u32; 3] = [5, 10, 25];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    /// Page and size below 1 become 1. Sizes are not capped: the server
    /// decides how many rows it is willing to return.
    pub fn normalize(&self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.max(1),
        }
    }

    /// Zero-based index of the first row on this page.
    pub fn offset(&self) -> usize {
        let p = self.normalize();
        (p.page as usize - 1) * p.per_page as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("sort order must be asc or desc, got `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    #[default]
    CreatedAt,
    Name,
    Price,
}

impl ProductSortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductSortBy::CreatedAt => "created_at",
            ProductSortBy::Name => "name",
            ProductSortBy::Price => "price",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductSortBy::CreatedAt => "Created Date",
            ProductSortBy::Name => "Name",
            ProductSortBy::Price => "Price",
        }
    }
}

impl std::str::FromStr for ProductSortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(ProductSortBy::CreatedAt),
            "name" => Ok(ProductSortBy::Name),
            "price" => Ok(ProductSortBy::Price),
            other => Err(format!("cannot sort products by `{other}`")),
        }
    }
}

/// Filter, sort and page options of the product table.
///
/// Also the cache key of the product list, so two queries that differ only in
/// spelling (blank name, page 0) must normalize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        let Pagination { page, per_page } = Pagination::default();
        Self {
            name: None,
            category_id: None,
            sort_by: ProductSortBy::default(),
            sort_order: SortOrder::default(),
            page,
            per_page,
        }
    }
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn normalized(&self) -> Self {
        let Pagination { page, per_page } = self.pagination().normalize();
        Self {
            name: self
                .name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            category_id: self
                .category_id
                .clone()
                .filter(|id| !id.as_str().is_empty()),
            sort_by: self.sort_by,
            sort_order: self.sort_order,
            page,
            per_page,
        }
    }
}
