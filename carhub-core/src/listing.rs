use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a listing document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl ListingId {
    /// Generate a new random listing ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ListingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ListingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A photo attached to a listing.
///
/// `owner_id` + `name` locate the blob; `url` is what the UI renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub owner_id: String,
    pub name: String,
    pub url: String,
}

impl ImageRef {
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            name: name.into(),
            url: url.into(),
        }
    }
}

/// What the catalog and the dashboard display for one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: ListingId,
    /// Upper-cased display name; also the searchable field.
    pub name: String,
    pub year: String,
    pub km: String,
    pub price: String,
    pub city: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
    pub images: Vec<ImageRef>,
}

impl ListingSummary {
    /// The image shown on the listing card.
    pub fn primary_image(&self) -> Option<&ImageRef> {
        self.images.first()
    }
}

/// The full listing document as stored in the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: ListingId,
    pub name: String,
    pub model: String,
    pub year: String,
    pub km: String,
    pub price: String,
    pub city: String,
    pub whatsapp: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
    pub owner_name: Option<String>,
    pub images: Vec<ImageRef>,
}

impl Listing {
    /// Project the document down to its catalog card.
    pub fn summary(&self) -> ListingSummary {
        ListingSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            year: self.year.clone(),
            km: self.km.clone(),
            price: self.price.clone(),
            city: self.city.clone(),
            created_at: self.created_at,
            owner_id: self.owner_id.clone(),
            images: self.images.clone(),
        }
    }
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        listing.summary()
    }
}
