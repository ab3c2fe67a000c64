//! Weather tool backed by the OpenWeather current-weather API

use super::ToolResult;
use crate::session::SessionKeys;
use crate::{Error, Result};

const SOURCE: &str = "openweather";

/// OpenWeather current-weather response (the fields we read)
#[derive(Debug, serde::Deserialize)]
struct OpenWeatherResponse {
    main: OpenWeatherMain,
    weather: Vec<OpenWeatherCondition>,
    name: String,
}

#[derive(Debug, serde::Deserialize)]
struct OpenWeatherMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, serde::Deserialize)]
struct OpenWeatherCondition {
    description: String,
}

/// Current weather for a location, live when an OpenWeather key is stored
///
/// Degrades to deterministic demo data when no key is configured, no
/// location could be extracted, or the API call fails.
pub async fn current(
    location: Option<&str>,
    keys: &SessionKeys,
    client: &reqwest::Client,
) -> ToolResult {
    let place = location.unwrap_or("your area");

    let (Some(api_key), Some(location)) = (keys.openweather.as_deref(), location) else {
        return demo(place);
    };

    match fetch(location, api_key, client).await {
        Ok(reply) => ToolResult::success(reply, SOURCE),
        Err(e) => {
            tracing::warn!(location, error = %e, "weather lookup failed, serving demo data");
            demo(place)
        }
    }
}

async fn fetch(location: &str, api_key: &str, client: &reqwest::Client) -> Result<String> {
    let response = client
        .get("https://api.openweathermap.org/data/2.5/weather")
        .query(&[("q", location), ("appid", api_key), ("units", "metric")])
        .send()
        .await?;

    let response = response.error_for_status().map_err(Error::Http)?;
    let weather: OpenWeatherResponse = response.json().await?;

    let description = weather
        .weather
        .first()
        .map_or("unknown conditions", |c| c.description.as_str());

    Ok(format!(
        "It's currently {:.0}°C with {} in {}. Humidity is {:.0}%.",
        weather.main.temp, description, weather.name, weather.main.humidity
    ))
}

fn demo(place: &str) -> ToolResult {
    ToolResult::demo(
        format!(
            "Demo weather for {place}: 21°C and partly cloudy, humidity 60%. \
             Add an OpenWeather API key for live conditions."
        ),
        SOURCE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolStatus;

    #[tokio::test]
    async fn no_key_returns_demo_with_temperature() {
        let keys = SessionKeys::default();
        let client = reqwest::Client::new();

        let result = current(Some("Paris"), &keys, &client).await;
        assert_eq!(result.status, ToolStatus::Demo);
        assert!(result.reply.contains("°C"));
        assert!(result.reply.contains("Paris"));
    }

    #[tokio::test]
    async fn missing_location_returns_demo_even_with_key() {
        let keys = SessionKeys {
            openweather: Some("real-key".to_string()),
            ..SessionKeys::default()
        };
        let client = reqwest::Client::new();

        let result = current(None, &keys, &client).await;
        assert_eq!(result.status, ToolStatus::Demo);
        assert!(result.reply.contains("your area"));
    }

    #[test]
    fn parses_openweather_payload() {
        let json = r#"{
            "main": {"temp": 17.3, "humidity": 72},
            "weather": [{"description": "light rain"}],
            "name": "Paris"
        }"#;
        let parsed: OpenWeatherResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.name, "Paris");
        assert_eq!(parsed.weather[0].description, "light rain");
    }
}
