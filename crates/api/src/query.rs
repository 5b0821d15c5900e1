//! Shared query parameter types for API handlers.

use opencart_core::pagination::PageRequest;
use serde::Deserialize;

/// Page parameters (`?page=&pageSize=`). Both optional; defaults and
/// clamping are applied by [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        PageRequest::new(params.page, params.page_size)
    }
}
