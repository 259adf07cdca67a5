pub mod package;
pub mod pricing;
pub mod catalog;
pub mod reviews;
pub mod blog;
pub mod weather;

pub use package::{AddOn, PackageCategory, TravelPackage};
pub use pricing::{InstallmentPlan, PriceQuote, PricingEngine};
pub use catalog::{Catalog, PackageQuery, PackageSort, PriceBand, FEATURED_PACKAGES, FEATURED_REVIEWS};
pub use reviews::{Review, ReviewFilter, ReviewSort, ReviewSubmission};
pub use blog::{BlogPost, BlogQuery};
pub use weather::{CityWeather, TemperatureBand};

use wanderlust_core::ValidationErrors;

/// Catalog-related errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed fixture {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
