use serde::Deserialize;
use chrono::NaiveDate;

pub const DEFAULT_PACKAGE_ID: u32 = 1;
pub const DEFAULT_TRAVELERS: u32 = 2;

/// Navigation parameters exactly as they arrive, e.g. from
/// `?package=3&travelers=2&date=2025-05-10&addons=0,2`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBookingParams {
    pub package: Option<String>,
    pub travelers: Option<String>,
    pub date: Option<String>,
    pub addons: Option<String>,
}

/// Parameters that seed a new booking draft. Parsing never fails: bad input
/// falls back to defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingParams {
    pub package_id: u32,
    pub traveler_count: u32,
    pub travel_date: Option<NaiveDate>,
    pub add_on_indices: Vec<usize>,
}

impl Default for BookingParams {
    fn default() -> Self {
        Self {
            package_id: DEFAULT_PACKAGE_ID,
            traveler_count: DEFAULT_TRAVELERS,
            travel_date: None,
            add_on_indices: Vec::new(),
        }
    }
}

impl From<RawBookingParams> for BookingParams {
    fn from(raw: RawBookingParams) -> Self {
        Self::parse(&raw)
    }
}

impl BookingParams {
    pub fn parse(raw: &RawBookingParams) -> Self {
        let package_id = raw
            .package
            .as_deref()
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_PACKAGE_ID);

        let traveler_count = raw
            .travelers
            .as_deref()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(clamp_travelers)
            .unwrap_or(DEFAULT_TRAVELERS);

        let travel_date = raw
            .date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                Ok(date) => Some(date),
                Err(_) => {
                    tracing::debug!("Ignoring unparseable travel date {:?}", s);
                    None
                }
            });

        let add_on_indices = raw
            .addons
            .as_deref()
            .map(parse_indices)
            .unwrap_or_default();

        Self {
            package_id,
            traveler_count,
            travel_date,
            add_on_indices,
        }
    }
}

/// At least one traveler, no upper bound beyond the integer range
pub fn clamp_travelers(n: i64) -> u32 {
    n.clamp(1, u32::MAX as i64) as u32
}

/// Comma separated indices; entries that are not non-negative integers are
/// dropped.
fn parse_indices(list: &str) -> Vec<usize> {
    list.split(',')
        .filter_map(|part| part.trim().parse::<usize>().ok())
        .collect()
}
