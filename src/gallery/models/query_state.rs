//! Query state model
//!
//! Holds the user-controlled inputs that determine what the gallery fetches:
//! free search text, the three facet filters and the current page.
//! Changing the search text or any filter always sends the user back to page 1.

use std::fmt;
use std::str::FromStr;

/// A categorical filter dimension offered by the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FacetKind {
    Classification,
    Century,
    Culture,
}

impl FacetKind {
    /// All facets in the order they are requested and rendered
    pub const ALL: [FacetKind; 3] = [
        FacetKind::Classification,
        FacetKind::Century,
        FacetKind::Culture,
    ];

    /// Name used both as the listing endpoint and as the search constraint key
    pub fn name(&self) -> &'static str {
        match self {
            FacetKind::Classification => "classification",
            FacetKind::Century => "century",
            FacetKind::Culture => "culture",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            FacetKind::Classification => "Classification",
            FacetKind::Century => "Century",
            FacetKind::Culture => "Culture",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a facet
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown facet '{0}' (expected classification, century or culture)")]
pub struct UnknownFacet(pub String);

impl FromStr for FacetKind {
    type Err = UnknownFacet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classification" | "classifications" => Ok(FacetKind::Classification),
            "century" | "centuries" => Ok(FacetKind::Century),
            "culture" | "cultures" => Ok(FacetKind::Culture),
            _ => Err(UnknownFacet(s.to_string())),
        }
    }
}

/// Selected facet values. An empty string means "All" (no constraint).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub classification: String,
    pub century: String,
    pub culture: String,
}

impl Filters {
    /// Get the selected value for a facet
    pub fn get(&self, kind: FacetKind) -> &str {
        match kind {
            FacetKind::Classification => &self.classification,
            FacetKind::Century => &self.century,
            FacetKind::Culture => &self.culture,
        }
    }

    fn slot_mut(&mut self, kind: FacetKind) -> &mut String {
        match kind {
            FacetKind::Classification => &mut self.classification,
            FacetKind::Century => &mut self.century,
            FacetKind::Culture => &mut self.culture,
        }
    }

    /// Replace one facet value, returning whether it changed
    pub fn set(&mut self, kind: FacetKind, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.slot_mut(kind);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Non-empty selections, in facet order
    pub fn constraints(&self) -> impl Iterator<Item = (FacetKind, &str)> + '_ {
        FacetKind::ALL
            .into_iter()
            .map(|kind| (kind, self.get(kind)))
            .filter(|(_, value)| !value.is_empty())
    }

    /// Check whether no facet is constrained
    pub fn is_empty(&self) -> bool {
        self.constraints().next().is_none()
    }
}

/// The complete user-controlled query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: String,
    filters: Filters,
    page: u32,
}

impl QueryState {
    /// Create an empty query on page 1
    pub fn new() -> Self {
        Self {
            search_text: String::new(),
            filters: Filters::default(),
            page: 1,
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Replace the search text. Resets the page when the text changed.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.search_text == text {
            return false;
        }
        self.search_text = text;
        self.page = 1;
        true
    }

    /// Replace one facet value. Resets the page when the value changed.
    pub fn set_filter(&mut self, kind: FacetKind, value: impl Into<String>) -> bool {
        if !self.filters.set(kind, value) {
            return false;
        }
        self.page = 1;
        true
    }

    /// Replace the page. Range checking against the result set is the caller's job;
    /// page 0 is never stored.
    pub fn set_page(&mut self, page: u32) -> bool {
        let page = page.max(1);
        if self.page == page {
            return false;
        }
        self.page = page;
        true
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.search_text.is_empty() {
            write!(f, "search: (any)")?;
        } else {
            write!(f, "search: \"{}\"", self.search_text)?;
        }
        for kind in FacetKind::ALL {
            let value = self.filters.get(kind);
            write!(
                f,
                " | {}: {}",
                kind.label(),
                if value.is_empty() { "All" } else { value }
            )?;
        }
        write!(f, " | page {}", self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_page(page: u32) -> QueryState {
        let mut query = QueryState::new();
        query.set_page(page);
        query
    }

    #[test]
    fn new_query_should_start_on_first_page_without_constraints() {
        let query = QueryState::new();
        assert_eq!(query.page(), 1);
        assert_eq!(query.search_text(), "");
        assert!(query.filters().is_empty());
    }

    #[test]
    fn set_search_text_should_reset_page() {
        let mut query = on_page(4);
        assert!(query.set_search_text("vase"));
        assert_eq!(query.search_text(), "vase");
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn set_filter_should_reset_page_for_every_facet() {
        for kind in FacetKind::ALL {
            let mut query = on_page(5);
            assert!(query.set_filter(kind, "something"));
            assert_eq!(query.page(), 1, "page not reset for {kind}");
            assert_eq!(query.filters().get(kind), "something");
        }
    }

    #[test]
    fn clearing_a_filter_should_also_reset_page() {
        let mut query = QueryState::new();
        query.set_filter(FacetKind::Culture, "Dutch");
        query.set_page(3);

        assert!(query.set_filter(FacetKind::Culture, ""));
        assert_eq!(query.page(), 1);
        assert!(query.filters().is_empty());
    }

    #[test]
    fn unchanged_values_should_not_count_as_changes() {
        let mut query = QueryState::new();
        query.set_search_text("bowl");
        query.set_filter(FacetKind::Century, "18th century");
        query.set_page(3);

        assert!(!query.set_search_text("bowl"));
        assert!(!query.set_filter(FacetKind::Century, "18th century"));
        assert!(!query.set_page(3));
        assert_eq!(query.page(), 3);
    }

    #[test]
    fn set_page_should_not_touch_text_or_filters() {
        let mut query = QueryState::new();
        query.set_search_text("bowl");
        query.set_filter(FacetKind::Classification, "Vessels");

        assert!(query.set_page(7));
        assert_eq!(query.page(), 7);
        assert_eq!(query.search_text(), "bowl");
        assert_eq!(query.filters().classification, "Vessels");
    }

    #[test]
    fn set_page_should_never_store_zero() {
        let mut query = on_page(2);
        query.set_page(0);
        assert_eq!(query.page(), 1);
    }

    #[test]
    fn constraints_should_skip_empty_filters() {
        let mut filters = Filters::default();
        filters.set(FacetKind::Classification, "Paintings");

        let constraints: Vec<_> = filters.constraints().collect();
        assert_eq!(constraints, vec![(FacetKind::Classification, "Paintings")]);
    }

    #[test]
    fn facet_kind_should_parse_names_case_insensitively() {
        assert_eq!("Century".parse::<FacetKind>(), Ok(FacetKind::Century));
        assert_eq!("cultures".parse::<FacetKind>(), Ok(FacetKind::Culture));
        assert_eq!(
            "medium".parse::<FacetKind>(),
            Err(UnknownFacet("medium".to_string()))
        );
    }

    #[test]
    fn display_should_show_all_for_unset_filters() {
        let mut query = QueryState::new();
        query.set_filter(FacetKind::Century, "19th century");
        assert_eq!(
            query.to_string(),
            "search: (any) | Classification: All | Century: 19th century | Culture: All | page 1"
        );
    }
}
