//! Search request model
//!
//! The remote query parameters derived from a [`QueryState`]. Only non-empty
//! filters and non-empty search text become constraints.

use super::catalog::PAGE_SIZE;
use super::query_state::{FacetKind, QueryState};

/// Parameters of one paginated object search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub constraints: Vec<(FacetKind, String)>,
    pub text: Option<String>,
    pub page: u32,
    pub size: u32,
}

impl SearchRequest {
    /// Query pairs in request order, excluding credentials
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = self
            .constraints
            .iter()
            .map(|(kind, value)| (kind.name(), value.clone()))
            .collect();
        pairs.push(("page", self.page.to_string()));
        pairs.push(("size", self.size.to_string()));
        if let Some(text) = &self.text {
            pairs.push(("q", text.clone()));
        }
        pairs
    }
}

impl From<&QueryState> for SearchRequest {
    fn from(query: &QueryState) -> Self {
        let text = Some(query.search_text())
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        Self {
            constraints: query
                .filters()
                .constraints()
                .map(|(kind, value)| (kind, value.to_string()))
                .collect(),
            text,
            page: query.page(),
            size: PAGE_SIZE,
        }
    }
}
