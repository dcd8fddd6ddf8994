use serde::{Deserialize, Serialize};

/// Envelope of every paginated endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_rows: u64,
}

/// Server-side page selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number: Some(page_number),
            page_size: Some(page_size),
        }
    }

    /// Query parameters; unset or zero values are left out
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(n) = self.page_number.filter(|n| *n > 0) {
            params.push(("pageNumber", n.to_string()));
        }
        if let Some(size) = self.page_size.filter(|s| *s > 0) {
            params.push(("pageSize", size.to_string()));
        }
        params
    }
}
