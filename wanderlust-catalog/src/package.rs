use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Package categories shown in the catalog filters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PackageCategory {
    Adventure,
    Luxury,
    Family,
    Cultural,
    #[serde(other)]
    Other,
}

impl FromStr for PackageCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adventure" => Ok(Self::Adventure),
            "luxury" => Ok(Self::Luxury),
            "family" => Ok(Self::Family),
            "cultural" => Ok(Self::Cultural),
            _ => Err(()),
        }
    }
}

/// Optional extra bookable on top of a package
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOn {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// A travel package from the fixture catalog. Prices are per person in
/// whole currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelPackage {
    pub id: u32,
    pub title: String,
    pub location: String,
    pub category: PackageCategory,
    pub price: u64,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default)]
    pub itinerary: Vec<ItineraryDay>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub available_dates: Vec<String>,
}

impl TravelPackage {
    pub fn add_on(&self, index: usize) -> Option<&AddOn> {
        self.add_ons.get(index)
    }

    pub fn is_valid_add_on(&self, index: usize) -> bool {
        index < self.add_ons.len()
    }

    /// Case-insensitive match against title or location
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.location.to_lowercase().contains(&term)
    }
}
