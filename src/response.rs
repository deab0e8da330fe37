use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Paging metadata as the product endpoint reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total_items: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub limit: u64,
}

impl PaginationMeta {
    /// Metadata for a list that arrives whole and is paged client-side.
    pub fn single_page(total_items: usize) -> Self {
        Self {
            total_items: total_items as u64,
            current_page: 1,
            total_pages: 1,
            limit: total_items as u64,
        }
    }

    /// Falls back to deriving the count when the server leaves `totalPages` at 0.
    pub fn page_count(&self) -> u64 {
        if self.total_pages > 0 {
            self.total_pages
        } else if self.limit == 0 {
            0
        } else {
            self.total_items.div_ceil(self.limit)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T> Page<T> {
    pub fn whole(items: Vec<T>) -> Self {
        let pagination = PaginationMeta::single_page(items.len());
        Self { items, pagination }
    }
}

/// `{ success, data, pagination }` envelope of paginated lists.
#[derive(Debug, Deserialize)]
pub struct PagedResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> PagedResponse<T> {
    pub fn into_page(self) -> AppResult<Page<T>> {
        if !self.success {
            return Err(AppError::RequestFailure(
                self.message
                    .unwrap_or_else(|| "server reported failure".to_string()),
            ));
        }
        let pagination = self
            .pagination
            .unwrap_or_else(|| PaginationMeta::single_page(self.data.len()));
        Ok(Page {
            items: self.data,
            pagination,
        })
    }
}

/// `{ data: T }` envelope of the back-office endpoints.
#[derive(Debug, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Mutation responses come wrapped or bare depending on the endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MaybeWrapped<T> {
    Wrapped(DataResponse<T>),
    Bare(T),
}

impl<T> MaybeWrapped<T> {
    pub fn into_inner(self) -> T {
        match self {
            MaybeWrapped::Wrapped(w) => w.data,
            MaybeWrapped::Bare(t) => t,
        }
    }
}

/// Error payloads: `{ "error": ... }` or `{ "message": ... }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.error.or(self.message)
    }
}
