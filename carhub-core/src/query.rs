//! Query building shared by the catalog browser, the dashboard mirror and
//! every collection backend.
//!
//! Results are always ordered by creation time, newest first. Ties on the
//! timestamp are broken by id (descending) so pages never overlap.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::{ListingId, ListingSummary};

/// Appended to an upper-cased search term to close the prefix range.
///
/// Greater than every other code point, so `[term, term + MAX_SENTINEL)`
/// contains exactly the names starting with `term`.
pub const MAX_SENTINEL: char = char::MAX;

/// Browse everything, or search by name prefix.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum QueryMode {
    #[default]
    Browse,
    Search(String),
}

impl QueryMode {
    /// A blank (after trimming) term collapses to `Browse`.
    pub fn from_term(term: &str) -> Self {
        let term = term.trim();
        if term.is_empty() {
            QueryMode::Browse
        } else {
            QueryMode::Search(term.to_string())
        }
    }

    /// The collection filter this mode queries with.
    pub fn filter(&self) -> Option<QueryFilter> {
        match self {
            QueryMode::Browse => None,
            QueryMode::Search(term) => Some(QueryFilter::NamePrefix(NameRange::prefix(term))),
        }
    }

    /// Page query for this mode, optionally resuming after `cursor`.
    pub fn page_query(&self, limit: usize, cursor: Option<Cursor>) -> CollectionQuery {
        let mut query = CollectionQuery::new(limit);
        if let Some(filter) = self.filter() {
            query = query.with_filter(filter);
        }
        if let Some(cursor) = cursor {
            query = query.start_after(cursor);
        }
        query
    }
}

/// Half-open range `[start, end)` over the name field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameRange {
    pub start: String,
    pub end: String,
}

impl NameRange {
    /// Case-insensitive "starts with" expressed as a range.
    pub fn prefix(term: &str) -> Self {
        let start = term.trim().to_uppercase();
        let end = format!("{start}{MAX_SENTINEL}");
        Self { start, end }
    }

    pub fn contains(&self, name: &str) -> bool {
        name >= self.start.as_str() && name < self.end.as_str()
    }
}

/// Server-side filters a collection understands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryFilter {
    Owner(String),
    NamePrefix(NameRange),
}

impl QueryFilter {
    pub fn owner(owner_id: impl Into<String>) -> Self {
        QueryFilter::Owner(owner_id.into())
    }

    pub fn name_prefix(term: &str) -> Self {
        QueryFilter::NamePrefix(NameRange::prefix(term))
    }

    pub fn matches(&self, item: &ListingSummary) -> bool {
        match self {
            QueryFilter::Owner(owner) => &item.owner_id == owner,
            QueryFilter::NamePrefix(range) => range.contains(&item.name),
        }
    }
}

/// Position of an item in the newest-first ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    pub created_at: DateTime<Utc>,
    pub id: ListingId,
}

impl SortKey {
    pub fn of(item: &ListingSummary) -> Self {
        Self {
            created_at: item.created_at,
            id: item.id.clone(),
        }
    }

    /// Display order: newest first, then id descending.
    pub fn display_cmp(&self, other: &SortKey) -> Ordering {
        other
            .created_at
            .cmp(&self.created_at)
            .then_with(|| other.id.cmp(&self.id))
    }

    /// True when `self` is displayed strictly after `other`.
    pub fn comes_after(&self, other: &SortKey) -> bool {
        self.display_cmp(other) == Ordering::Greater
    }
}

/// Sort a page into display order.
pub fn sort_for_display(items: &mut [ListingSummary]) {
    items.sort_by(|a, b| SortKey::of(a).display_cmp(&SortKey::of(b)));
}

/// Resume point for the next page.
///
/// Bound to one retrieved item and to the filter that produced it; a backend
/// must refuse a cursor presented with any other filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    position: SortKey,
    filter: Option<QueryFilter>,
}

impl Cursor {
    pub fn after(item: &ListingSummary, filter: Option<QueryFilter>) -> Self {
        Self {
            position: SortKey::of(item),
            filter,
        }
    }

    pub fn position(&self) -> &SortKey {
        &self.position
    }

    pub fn is_bound_to(&self, filter: Option<&QueryFilter>) -> bool {
        self.filter.as_ref() == filter
    }
}

/// One page request against a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub filter: Option<QueryFilter>,
    pub limit: usize,
    pub start_after: Option<Cursor>,
}

impl CollectionQuery {
    pub fn new(limit: usize) -> Self {
        Self {
            filter: None,
            limit,
            start_after: None,
        }
    }

    pub fn with_filter(mut self, filter: QueryFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn start_after(mut self, cursor: Cursor) -> Self {
        self.start_after = Some(cursor);
        self
    }

    /// Whether the cursor (if any) may be used with this query's filter.
    pub fn cursor_matches_filter(&self) -> bool {
        self.start_after
            .as_ref()
            .map_or(true, |c| c.is_bound_to(self.filter.as_ref()))
    }
}
