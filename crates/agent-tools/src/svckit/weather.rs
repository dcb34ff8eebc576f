//! Weather Tool
//!
//! Mocked lookup against a small fixed city table.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use agent_core::{ToolBuilder, ToolDescriptor};

/// Get the current weather for a city
#[derive(Clone, Debug, Deserialize, JsonSchema)]
pub struct GetWeatherArgs {
    /// City name
    pub city: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherReport {
    pub temperature: i32,
    pub condition: String,
    pub humidity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

const KNOWN_CITIES: [(&str, i32, &str, u8); 3] = [
    ("Beijing", 20, "sunny", 60),
    ("Shanghai", 22, "cloudy", 70),
    ("Guangzhou", 25, "light rain", 80),
];

pub fn get_weather(args: GetWeatherArgs) -> anyhow::Result<WeatherReport> {
    let city = args.city.trim();

    let report = KNOWN_CITIES
        .iter()
        .find(|(name, ..)| name.eq_ignore_ascii_case(city))
        .map_or_else(
            || WeatherReport {
                temperature: 20,
                condition: "unknown".into(),
                humidity: 50,
                note: Some(format!("No weather data for {city}, returning defaults")),
            },
            |&(_, temperature, condition, humidity)| WeatherReport {
                temperature,
                condition: condition.into(),
                humidity,
                note: None,
            },
        );

    Ok(report)
}

pub fn weather_tool() -> ToolDescriptor {
    ToolBuilder::new().sync_fn(get_weather)
}
