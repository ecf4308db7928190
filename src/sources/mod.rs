pub mod fetch;
pub mod helen_woodward;
pub mod rancho_coastal;
pub mod viasat;

pub use fetch::{Fetcher, HttpFetcher};
pub use helen_woodward::HelenWoodward;
pub use rancho_coastal::RanchoCoastal;
pub use viasat::Viasat;

use scraper::ElementRef;

use crate::{
    config::{SourceConfig, SourceKind},
    error::Result,
    listing::Listing,
};

/// Turns one fetched document into listings. Pure: no network access.
pub trait Extractor: Send + Sync {
    fn extract(&self, raw: &str) -> Result<Vec<Listing>>;

    /// Locator of result page `page` (1-based) for sources that paginate.
    /// `None` means the source is a single document fetched at `base`.
    fn page_locator(&self, _base: &str, _page: u32) -> Option<String> {
        None
    }

    /// Listings on one result page, and whether it was the last page
    fn extract_page(&self, raw: &str) -> Result<Page> {
        Ok(Page {
            listings: self.extract(raw)?,
            last: true,
        })
    }
}

/// One fetched result page
#[derive(Debug, Default)]
pub struct Page {
    pub listings: Vec<Listing>,
    pub last: bool,
}

/// A place listings are harvested from: where to fetch, and how to read it
pub struct Source {
    pub name: String,
    pub locator: String,
    extractor: Box<dyn Extractor>,
}

impl Source {
    pub fn new(
        name: impl Into<String>,
        locator: impl Into<String>,
        extractor: impl Extractor + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            locator: locator.into(),
            extractor: Box::new(extractor),
        }
    }

    pub fn from_config(config: &SourceConfig) -> Self {
        match config.kind {
            SourceKind::HelenWoodward => Self::new(
                &config.name,
                &config.url,
                HelenWoodward::new(&config.name, &config.url),
            ),
            SourceKind::RanchoCoastal => Self::new(
                &config.name,
                &config.url,
                RanchoCoastal::new(&config.name, &config.url),
            ),
            SourceKind::Viasat => Self::new(
                &config.name,
                &config.url,
                Viasat::new(&config.name, config.location.clone(), config.keywords.clone()),
            ),
        }
    }

    pub fn extract(&self, raw: &str) -> Result<Vec<Listing>> {
        self.extractor.extract(raw)
    }

    /// Where to fetch result page `page`; single-document sources only
    /// have page 1.
    pub fn page_locator(&self, page: u32) -> Option<String> {
        match self.extractor.page_locator(&self.locator, page) {
            Some(locator) => Some(locator),
            None if page == 1 => Some(self.locator.clone()),
            None => None,
        }
    }

    pub fn extract_page(&self, raw: &str) -> Result<Page> {
        self.extractor.extract_page(raw)
    }
}

/// Concatenated, trimmed text content of an element
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
