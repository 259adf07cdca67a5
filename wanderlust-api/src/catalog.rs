use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use wanderlust_booking::{BookingFlow, BookingParams, RawBookingParams};
use wanderlust_catalog::{
    BlogPost, BlogQuery, CityWeather, PackageQuery, PriceQuote, Review, ReviewFilter, ReviewSubmission,
    TemperatureBand, TravelPackage,
};
use crate::{error::AppError, state::AppState};

/// Query strings arrive as plain text; anything unrecognized (including
/// `all`) means "no filter".
#[derive(Debug, Default, Deserialize)]
pub struct PackageSearchParams {
    pub q: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub sort: Option<String>,
}

impl PackageSearchParams {
    fn into_query(self) -> PackageQuery {
        PackageQuery {
            term: non_empty(self.q),
            category: self.category.and_then(|c| c.parse().ok()),
            price_band: self.price.and_then(|p| p.parse().ok()),
            sort: self.sort.and_then(|s| s.parse().ok()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteParams {
    pub travelers: Option<String>,
    pub addons: Option<String>,
    #[serde(default)]
    pub installments: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewParams {
    pub rating: Option<String>,
    pub package: Option<String>,
    pub sort: Option<String>,
}

impl ReviewParams {
    fn into_filter(self) -> ReviewFilter {
        ReviewFilter {
            rating: self.rating.and_then(|r| r.parse().ok()),
            package_id: self.package.and_then(|p| p.parse().ok()),
            sort: self.sort.and_then(|s| s.parse().ok()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogParams {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WeatherParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReviewEntry<'a> {
    #[serde(flatten)]
    review: &'a Review,
    package_title: &'a str,
}

#[derive(Debug, Serialize)]
struct ReviewsResponse<'a> {
    reviews: Vec<ReviewEntry<'a>>,
    shown: usize,
    total: usize,
    average_rating: f32,
}

#[derive(Debug, Serialize)]
struct BlogResponse<'a> {
    posts: Vec<&'a BlogPost>,
    categories: Vec<&'a str>,
    featured: Option<&'a BlogPost>,
}

/// Everything the landing page highlights
#[derive(Debug, Serialize)]
struct HomeResponse<'a> {
    packages: Vec<&'a TravelPackage>,
    testimonials: Vec<ReviewEntry<'a>>,
    featured_post: Option<&'a BlogPost>,
    weather: Vec<WeatherEntry<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherEntry<'a> {
    #[serde(flatten)]
    weather: &'a CityWeather,
    temperature_band: TemperatureBand,
}

impl<'a> From<&'a CityWeather> for WeatherEntry<'a> {
    fn from(weather: &'a CityWeather) -> Self {
        Self {
            temperature_band: weather.temperature_band(),
            weather,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/home", get(home))
        .route("/v1/packages", get(search_packages))
        .route("/v1/packages/{id}", get(get_package))
        .route("/v1/packages/{id}/quote", get(quote_package))
        .route("/v1/reviews", get(list_reviews).post(submit_review))
        .route("/v1/blog", get(search_posts))
        .route("/v1/blog/{id}", get(get_post))
        .route("/v1/weather", get(search_weather))
        .route("/v1/weather/{city}", get(get_weather))
}

/// `GET /v1/home?category=luxury`. An unknown category (including `all`)
/// shows every featured package.
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<HomeParams>,
) -> Response {
    let category = params.category.and_then(|c| c.parse().ok());
    let testimonials = state
        .catalog
        .testimonials()
        .iter()
        .map(|review| review_entry(&state, review))
        .collect();

    Json(HomeResponse {
        packages: state.catalog.featured_packages(category),
        testimonials,
        featured_post: state.catalog.featured_post(),
        weather: state.catalog.featured_weather().iter().map(WeatherEntry::from).collect(),
    })
    .into_response()
}

pub async fn search_packages(
    State(state): State<AppState>,
    Query(params): Query<PackageSearchParams>,
) -> Response {
    let query = params.into_query();
    Json(state.catalog.search_packages(&query)).into_response()
}

pub async fn get_package(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Response, AppError> {
    let package = state.catalog.package(id)?;
    Ok(Json(package).into_response())
}

/// Price a package without opening a booking. Add-on indices the package
/// does not offer are ignored.
pub async fn quote_package(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<PriceQuote>, AppError> {
    let package = state.catalog.package(id)?;
    let booking_params = BookingParams {
        package_id: id,
        ..BookingParams::from(RawBookingParams {
            travelers: params.travelers,
            addons: params.addons,
            ..Default::default()
        })
    };

    let mut flow = BookingFlow::new(package.clone(), &booking_params);
    flow.set_installments(params.installments)?;
    Ok(Json(flow.quote()))
}

pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewParams>,
) -> Response {
    let listing = state.catalog.reviews(&params.into_filter());
    let reviews = listing
        .reviews
        .into_iter()
        .map(|review| review_entry(&state, review))
        .collect();

    Json(ReviewsResponse {
        reviews,
        shown: listing.shown,
        total: listing.total,
        average_rating: listing.average_rating,
    })
    .into_response()
}

pub async fn submit_review(
    State(state): State<AppState>,
    Json(submission): Json<ReviewSubmission>,
) -> Result<Response, AppError> {
    let receipt = state.catalog.submit_review(&submission)?;
    Ok((StatusCode::CREATED, Json(receipt)).into_response())
}

pub async fn search_posts(
    State(state): State<AppState>,
    Query(params): Query<BlogParams>,
) -> Response {
    let query = BlogQuery {
        term: non_empty(params.q),
        category: non_empty(params.category).filter(|c| c != "all"),
    };

    Json(BlogResponse {
        posts: state.catalog.search_posts(&query),
        categories: state.catalog.blog_categories(),
        featured: state.catalog.featured_post(),
    })
    .into_response()
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Response, AppError> {
    let post = state.catalog.post(id)?;
    Ok(Json(post).into_response())
}

/// Without a search term the featured locations are returned
pub async fn search_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Response {
    let entries: Vec<WeatherEntry> = match non_empty(params.q) {
        Some(term) => state.catalog.search_weather(&term).into_iter().map(WeatherEntry::from).collect(),
        None => state.catalog.featured_weather().iter().map(WeatherEntry::from).collect(),
    };
    Json(entries).into_response()
}

pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Response, AppError> {
    let weather = state.catalog.weather(&city)?;
    Ok(Json(WeatherEntry::from(weather)).into_response())
}

fn review_entry<'a>(state: &'a AppState, review: &'a Review) -> ReviewEntry<'a> {
    ReviewEntry {
        package_title: state.catalog.package_title(review.package_id),
        review,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
