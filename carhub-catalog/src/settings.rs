use carhub_core::CarHubConfigSnapshot;

pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Page sizes used by the catalog views.
///
/// Keys: `catalog.page_size` and `catalog.search_page_size` (falls back to
/// the page size). Zero or unparsable values are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSettings {
    pub page_size: usize,
    pub search_page_size: usize,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            search_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl CatalogSettings {
    pub fn from_config(config: &CarHubConfigSnapshot) -> Self {
        let page_size = config
            .get_usize("catalog.page_size")
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let search_page_size = config
            .get_usize("catalog.search_page_size")
            .filter(|n| *n > 0)
            .unwrap_or(page_size);

        Self {
            page_size,
            search_page_size,
        }
    }
}
