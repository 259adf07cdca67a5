use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::str::FromStr;
use chrono::Utc;
use uuid::Uuid;
use crate::blog::{self, BlogPost, BlogQuery};
use crate::package::{PackageCategory, TravelPackage};
use crate::reviews::{self, Review, ReviewFilter, ReviewReceipt, ReviewSubmission, REVIEW_ACKNOWLEDGEMENT};
use crate::weather::{CityWeather, FEATURED_LOCATIONS};
use crate::{CatalogError, CatalogResult};

const PACKAGES_JSON: &str = include_str!("../data/packages.json");
const REVIEWS_JSON: &str = include_str!("../data/reviews.json");
const BLOG_JSON: &str = include_str!("../data/blog.json");
const WEATHER_JSON: &str = include_str!("../data/weather.json");

/// Shown in place of a title when a review points at a missing package
pub const UNKNOWN_PACKAGE: &str = "Unknown Package";

/// Packages considered for the home page highlight
pub const FEATURED_PACKAGES: usize = 6;

/// Reviews shown as testimonials
pub const FEATURED_REVIEWS: usize = 6;

/// Price bands offered by the package filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBand {
    /// Under 1500
    Budget,
    /// 1500 to 2000 inclusive
    Mid,
    /// Over 2000
    Luxury,
}

impl PriceBand {
    pub fn contains(&self, price: u64) -> bool {
        match self {
            PriceBand::Budget => price < 1500,
            PriceBand::Mid => (1500..=2000).contains(&price),
            PriceBand::Luxury => price > 2000,
        }
    }
}

impl FromStr for PriceBand {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "budget" => Ok(Self::Budget),
            "mid" => Ok(Self::Mid),
            "luxury" => Ok(Self::Luxury),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PackageSort {
    /// Most reviewed first
    #[default]
    Popular,
    PriceLow,
    PriceHigh,
    Rating,
}

impl FromStr for PackageSort {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "popular" => Ok(Self::Popular),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            "rating" => Ok(Self::Rating),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PackageQuery {
    pub term: Option<String>,
    pub category: Option<PackageCategory>,
    pub price_band: Option<PriceBand>,
    pub sort: PackageSort,
}

impl PackageQuery {
    pub fn matches(&self, pkg: &TravelPackage) -> bool {
        self.term.as_deref().map_or(true, |t| pkg.matches_term(t))
            && self.category.map_or(true, |c| pkg.category == c)
            && self.price_band.map_or(true, |b| b.contains(pkg.price))
    }
}

#[derive(Debug, Serialize)]
pub struct PackageSearch<'a> {
    pub packages: Vec<&'a TravelPackage>,
    pub shown: usize,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ReviewListing<'a> {
    pub reviews: Vec<&'a Review>,
    pub shown: usize,
    pub total: usize,
    pub average_rating: f32,
}

/// Read-only fixture catalogs, loaded once at startup
#[derive(Debug, Clone)]
pub struct Catalog {
    packages: Vec<TravelPackage>,
    reviews: Vec<Review>,
    posts: Vec<BlogPost>,
    weather: Vec<CityWeather>,
}

impl Catalog {
    pub fn new(
        packages: Vec<TravelPackage>,
        reviews: Vec<Review>,
        posts: Vec<BlogPost>,
        weather: Vec<CityWeather>,
    ) -> Self {
        Self { packages, reviews, posts, weather }
    }

    /// Catalog compiled into the binary
    pub fn embedded() -> CatalogResult<Self> {
        Ok(Self::new(
            parse("packages.json", PACKAGES_JSON)?,
            parse("reviews.json", REVIEWS_JSON)?,
            parse("blog.json", BLOG_JSON)?,
            parse("weather.json", WEATHER_JSON)?,
        ))
    }

    /// Load `packages.json`, `reviews.json`, `blog.json` and `weather.json`
    /// from a directory
    pub fn load_dir(dir: impl AsRef<Path>) -> CatalogResult<Self> {
        let dir = dir.as_ref();
        let catalog = Self::new(
            read(dir, "packages.json")?,
            read(dir, "reviews.json")?,
            read(dir, "blog.json")?,
            read(dir, "weather.json")?,
        );
        tracing::info!(
            "Loaded catalog from {}: {} packages, {} reviews, {} posts, {} locations",
            dir.display(),
            catalog.packages.len(),
            catalog.reviews.len(),
            catalog.posts.len(),
            catalog.weather.len(),
        );
        Ok(catalog)
    }

    // Packages

    pub fn packages(&self) -> &[TravelPackage] {
        &self.packages
    }

    pub fn find_package(&self, id: u32) -> Option<&TravelPackage> {
        self.packages.iter().find(|p| p.id == id)
    }

    pub fn package(&self, id: u32) -> CatalogResult<&TravelPackage> {
        self.find_package(id)
            .ok_or_else(|| CatalogError::NotFound(format!("package {}", id)))
    }

    /// The first few packages, then narrowed to `category`. The category
    /// never pulls in packages from further down the catalog.
    pub fn featured_packages(&self, category: Option<PackageCategory>) -> Vec<&TravelPackage> {
        self.packages
            .iter()
            .take(FEATURED_PACKAGES)
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    pub fn search_packages(&self, query: &PackageQuery) -> PackageSearch<'_> {
        let mut packages: Vec<&TravelPackage> = self.packages.iter().filter(|p| query.matches(p)).collect();
        match query.sort {
            PackageSort::Popular => packages.sort_by(|a, b| b.review_count.cmp(&a.review_count)),
            PackageSort::PriceLow => packages.sort_by(|a, b| a.price.cmp(&b.price)),
            PackageSort::PriceHigh => packages.sort_by(|a, b| b.price.cmp(&a.price)),
            PackageSort::Rating => packages.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        PackageSearch {
            shown: packages.len(),
            total: self.packages.len(),
            packages,
        }
    }

    // Reviews

    pub fn reviews(&self, filter: &ReviewFilter) -> ReviewListing<'_> {
        let reviews = filter.apply(&self.reviews);
        ReviewListing {
            shown: reviews.len(),
            total: self.reviews.len(),
            average_rating: reviews::average_rating(&self.reviews),
            reviews,
        }
    }

    pub fn testimonials(&self) -> &[Review] {
        &self.reviews[..self.reviews.len().min(FEATURED_REVIEWS)]
    }

    pub fn package_title(&self, id: u32) -> &str {
        self.find_package(id).map(|p| p.title.as_str()).unwrap_or(UNKNOWN_PACKAGE)
    }

    /// Validates a review and acknowledges it. The catalog itself is never
    /// modified.
    pub fn submit_review(&self, submission: &ReviewSubmission) -> CatalogResult<ReviewReceipt> {
        submission.validate()?;
        let package_id = submission.package_id.unwrap_or_default();
        self.package(package_id)?;

        let receipt = ReviewReceipt {
            id: Uuid::new_v4(),
            package_id,
            message: REVIEW_ACKNOWLEDGEMENT.to_string(),
            submitted_at: Utc::now(),
        };
        tracing::info!("Review {} received for package {}", receipt.id, package_id);
        Ok(receipt)
    }

    // Blog

    pub fn search_posts(&self, query: &BlogQuery) -> Vec<&BlogPost> {
        query.apply(&self.posts)
    }

    pub fn post(&self, id: u32) -> CatalogResult<&BlogPost> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(format!("blog post {}", id)))
    }

    pub fn featured_post(&self) -> Option<&BlogPost> {
        self.posts.first()
    }

    pub fn blog_categories(&self) -> Vec<&str> {
        blog::categories(&self.posts)
    }

    // Weather

    pub fn search_weather(&self, term: &str) -> Vec<&CityWeather> {
        self.weather.iter().filter(|w| w.matches_term(term)).collect()
    }

    pub fn weather(&self, city: &str) -> CatalogResult<&CityWeather> {
        self.weather
            .iter()
            .find(|w| w.city.eq_ignore_ascii_case(city))
            .ok_or_else(|| CatalogError::NotFound(format!("weather for {}", city)))
    }

    pub fn featured_weather(&self) -> &[CityWeather] {
        &self.weather[..self.weather.len().min(FEATURED_LOCATIONS)]
    }
}

fn parse<T: DeserializeOwned>(name: &str, json: &str) -> CatalogResult<Vec<T>> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse {
        file: name.to_string(),
        source,
    })
}

fn read<T: DeserializeOwned>(dir: &Path, name: &str) -> CatalogResult<Vec<T>> {
    let json = std::fs::read_to_string(dir.join(name))?;
    parse(name, &json)
}
