//! Catalog record models
//!
//! Wire shapes returned by the catalog API and the immutable records the
//! controller publishes. Display fallbacks live here so every renderer
//! shows missing fields the same way.

use serde::Deserialize;

/// Fixed number of records requested per page
pub const PAGE_SIZE: u32 = 12;

/// One selectable value of a facet (a classification, century or culture)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FacetOption {
    pub id: u64,
    pub name: String,
}

/// A person credited on an art object. The first entry is the primary artist.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A catalog object record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ArtItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub dated: Option<String>,
    #[serde(default, rename = "primaryimageurl")]
    pub primary_image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub people: Option<Vec<Person>>,
    #[serde(default, rename = "url")]
    pub detail_url: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl ArtItem {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title).unwrap_or("No title")
    }

    pub fn display_date(&self) -> &str {
        non_empty(&self.dated).unwrap_or("No date")
    }

    pub fn display_description(&self) -> &str {
        non_empty(&self.description).unwrap_or("No description")
    }

    /// Name of the first credited person
    pub fn primary_artist(&self) -> Option<&str> {
        self.people
            .as_deref()
            .and_then(|people| people.first())
            .map(|person| person.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    pub fn display_artist(&self) -> &str {
        self.primary_artist().unwrap_or("Unknown")
    }

    pub fn image_url(&self) -> Option<&str> {
        non_empty(&self.primary_image_url)
    }
}

/// Envelope of a facet listing endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FacetListing {
    pub records: Vec<FacetOption>,
}

/// Paging information of an object search response
#[derive(Debug, Clone, Deserialize)]
pub struct ListingInfo {
    #[serde(rename = "totalrecords")]
    pub total_records: u64,
}

/// Envelope of the object search endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectListing {
    pub records: Vec<ArtItem>,
    pub info: ListingInfo,
}

/// A page of search results
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub items: Vec<ArtItem>,
    pub total_records: u64,
}

impl SearchResult {
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_records)
    }
}

impl From<ObjectListing> for SearchResult {
    fn from(listing: ObjectListing) -> Self {
        Self {
            items: listing.records,
            total_records: listing.info.total_records,
        }
    }
}

/// Number of pages for a record count. Never below 1 so pagination stays renderable.
pub fn total_pages(total_records: u64) -> u32 {
    let pages = total_records.div_ceil(u64::from(PAGE_SIZE));
    u32::try_from(pages).unwrap_or(u32::MAX).max(1)
}
