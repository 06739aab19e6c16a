use serde::{Deserialize, Serialize};

const DEFAULT_PAGE_SIZE: u32 = 100;

/// Cell collector configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellCollectorConfig {
    /// Cells requested from the indexer per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Give up after requesting this many pages.
    ///
    /// Pages whose cells are all filtered out by the query still count. No limit by default.
    #[serde(default)]
    pub max_pages: Option<u32>,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for CellCollectorConfig {
    fn default() -> Self {
        CellCollectorConfig {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: None,
        }
    }
}
