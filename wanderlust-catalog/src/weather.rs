use serde::{Deserialize, Serialize};

/// Number of locations highlighted on the weather landing view
pub const FEATURED_LOCATIONS: usize = 6;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub temperature: f32,
    #[serde(default)]
    pub feels_like: f32,
    pub condition: String,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub wind_speed: f32,
    #[serde(default)]
    pub uv_index: u8,
    #[serde(default)]
    pub visibility: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub high: f32,
    pub low: f32,
    pub condition: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BestTime {
    pub peak: String,
    pub good: String,
    pub avoid: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityWeather {
    pub city: String,
    pub country: String,
    pub current: CurrentConditions,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
    #[serde(default)]
    pub best_time: BestTime,
}

impl CityWeather {
    pub fn matches_term(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.city.to_lowercase().contains(&term) || self.country.to_lowercase().contains(&term)
    }

    pub fn temperature_band(&self) -> TemperatureBand {
        TemperatureBand::classify(self.current.temperature)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Hot,
    Warm,
    Mild,
    Cold,
}

impl TemperatureBand {
    /// Celsius thresholds: 30 and above is hot, 20 warm, 10 mild.
    pub fn classify(celsius: f32) -> Self {
        if celsius >= 30.0 {
            Self::Hot
        } else if celsius >= 20.0 {
            Self::Warm
        } else if celsius >= 10.0 {
            Self::Mild
        } else {
            Self::Cold
        }
    }
}
