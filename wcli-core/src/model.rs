use serde::Deserialize;

use crate::error::Result;

/// Decoded One Call response (imperial units, minutely/hourly/alerts excluded).
///
/// Every field falls back to its zero value when absent, so an error-shaped
/// body such as `{"cod":401,"message":"..."}` still decodes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherResponse {
    pub lat: f64,
    pub lon: f64,
    pub timezone: String,
    /// Offset from UTC in seconds.
    pub timezone_offset: i32,
    pub current: CurrentConditions,
    /// Chronological, index 0 is today. Length is up to the provider.
    pub daily: Vec<DailyForecast>,
}

impl WeatherResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Today's entry, if the provider sent any daily data.
    pub fn today(&self) -> Option<&DailyForecast> {
        self.daily.first()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub temp: f64,
    pub feels_like: f64,
    pub pressure: u32,
    pub humidity: u32,
    pub dew_point: f64,
    pub uvi: f64,
    pub clouds: u32,
    pub visibility: u32,
    pub wind_speed: f64,
    pub wind_deg: u32,
    pub wind_gust: f64,
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DailyForecast {
    pub dt: i64,
    pub sunrise: i64,
    pub sunset: i64,
    pub moonrise: i64,
    pub moonset: i64,
    pub moon_phase: f64,
    pub summary: String,
    pub temp: DailyTemperature,
    pub feels_like: DailyFeelsLike,
    pub pressure: u32,
    pub humidity: u32,
    pub dew_point: f64,
    pub wind_speed: f64,
    pub wind_deg: u32,
    pub wind_gust: f64,
    pub weather: Vec<WeatherCondition>,
    pub clouds: u32,
    /// Probability of precipitation, 0.0 to 1.0.
    pub pop: f64,
    pub rain: Option<f64>,
    pub snow: Option<f64>,
    pub uvi: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DailyTemperature {
    pub day: f64,
    pub min: f64,
    pub max: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DailyFeelsLike {
    pub day: f64,
    pub night: f64,
    pub eve: f64,
    pub morn: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherCondition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}
