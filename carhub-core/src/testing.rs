//! Testing utilities shared by the CarHub crates.
//!
//! Only available with the `testing` feature; the other crates enable it
//! from their `[dev-dependencies]`.

use chrono::{DateTime, Utc};

use crate::listing::{ImageRef, Listing, ListingId};

/// Install a test-friendly `tracing` subscriber once per process.
///
/// Honors `RUST_LOG`; output goes through the libtest capture.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Timestamp `secs` seconds after the epoch.
pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Builder for listing documents with sensible defaults.
///
/// ```
/// # use carhub_core::testing::ListingFixture;
/// let listing = ListingFixture::new("car-1", "HONDA CIVIC")
///     .owner("uid-1")
///     .created(10)
///     .images(2)
///     .build();
/// assert_eq!(listing.images.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ListingFixture {
    listing: Listing,
}

impl ListingFixture {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            listing: Listing {
                id: ListingId::from_string(id),
                name: name.to_string(),
                model: "1.0 FLEX".to_string(),
                year: "2020/2021".to_string(),
                km: "10500".to_string(),
                price: "45000".to_string(),
                city: "São Paulo - SP".to_string(),
                whatsapp: "11990901111".to_string(),
                description: "Single owner.".to_string(),
                created_at: at(0),
                owner_id: "owner-1".to_string(),
                owner_name: Some("Owner".to_string()),
                images: Vec::new(),
            },
        }
    }

    pub fn owner(mut self, owner_id: &str) -> Self {
        self.listing.owner_id = owner_id.to_string();
        for image in &mut self.listing.images {
            image.owner_id = owner_id.to_string();
        }
        self
    }

    pub fn created(mut self, secs: i64) -> Self {
        self.listing.created_at = at(secs);
        self
    }

    /// Attach `n` images named `{id}-img-{i}`.
    pub fn images(mut self, n: usize) -> Self {
        let owner = self.listing.owner_id.clone();
        let id = self.listing.id.to_string();
        self.listing.images = (0..n)
            .map(|i| {
                let name = format!("{id}-img-{i}");
                let url = format!("mem://images/{owner}/{name}");
                ImageRef::new(owner.clone(), name, url)
            })
            .collect();
        self
    }

    pub fn build(self) -> Listing {
        self.listing
    }
}

/// `n` listings named `CAR 000`, `CAR 001`, ... created one second apart.
pub fn numbered_listings(n: usize, owner_id: &str) -> Vec<Listing> {
    (0..n)
        .map(|i| {
            ListingFixture::new(&format!("car-{i:03}"), &format!("CAR {i:03}"))
                .owner(owner_id)
                .created(i as i64)
                .images(1)
                .build()
        })
        .collect()
}
