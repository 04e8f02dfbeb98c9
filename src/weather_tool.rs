use crate::error::WeatherError;
use crate::metrics::inc_weather_fallback;
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::env;
use tracing::{info, instrument, warn};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Parameters provided by the model.
#[derive(Debug, Deserialize)]
pub struct WeatherArgs {
    pub location: String,
}

/// Outcome of a weather lookup. A live report comes from the provider; a
/// fallback is synthesized locally and clearly labeled as such. The agent
/// only ever sees the rendered text, so a provider outage degrades the plan
/// instead of aborting it.
#[derive(Debug, PartialEq)]
pub enum WeatherReport {
    Live(String),
    Fallback(String),
}

impl WeatherReport {
    pub fn into_text(self) -> String {
        match self {
            WeatherReport::Live(text) | WeatherReport::Fallback(text) => text,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    weather: Vec<ProviderCondition>,
    main: ProviderMain,
}

#[derive(Debug, Deserialize)]
struct ProviderCondition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

/// Weather lookup backed by OpenWeatherMap. One attempt per call, no retry.
#[derive(Debug)]
pub struct WeatherTool {
    api_key: Option<String>,
    base_url: String,
}

impl WeatherTool {
    /// Reads `OPENWEATHER_API_KEY`; a missing key is not an error, it just
    /// pins every lookup to the fallback branch.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENWEATHER_API_KEY").ok(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Resolve current conditions for `location`, degrading to a fallback
    /// report on any provider failure.
    #[instrument(skip(self))]
    pub async fn current_conditions(&self, location: &str) -> WeatherReport {
        match self.fetch(location).await {
            Ok(summary) => {
                info!(location, "weather lookup succeeded");
                WeatherReport::Live(summary)
            }
            Err(e) => {
                warn!(location, error = %e, "weather lookup degraded to fallback");
                inc_weather_fallback(&e);
                WeatherReport::Fallback(fallback_text(location))
            }
        }
    }

    async fn fetch(&self, location: &str) -> Result<String, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/weather", self.base_url))
            .query(&[("q", location), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| WeatherError::HttpRequestFailed(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError(format!(
                "status {}: {}",
                status, body
            )));
        }
        let data: ProviderResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::InvalidResponse(e.to_string()))?;
        let description = data
            .weather
            .first()
            .map(|c| c.description.as_str())
            .ok_or_else(|| {
                WeatherError::InvalidResponse("no weather conditions in response".to_string())
            })?;
        Ok(format!(
            "Weather in {}: {}, Temperature: {:.1}°C (feels like {:.1}°C), Humidity: {:.0}%",
            location, description, data.main.temp, data.main.feels_like, data.main.humidity
        ))
    }
}

fn fallback_text(location: &str) -> String {
    format!(
        "Live weather data for {} is unavailable right now (fallback estimate): \
         expect mild conditions around 18°C; check a local forecast closer to departure.",
        location
    )
}

impl Tool for WeatherTool {
    const NAME: &'static str = "get_weather";
    type Error = Infallible;
    type Args = WeatherArgs;
    type Output = String;

    async fn definition(&self, _param: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Get the current weather for a location".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "location": { "type": "string", "description": "City or destination name, e.g. 'Paris, France'" }
                },
                "required": ["location"]
            }),
        }
    }

    #[instrument(name = "call_weather_tool", skip(self))]
    async fn call(&self, args: WeatherArgs) -> Result<String, Infallible> {
        Ok(self.current_conditions(&args.location).await.into_text())
    }
}
