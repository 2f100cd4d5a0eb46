//! Sequenced async lookups.
//!
//! `weather_update` awaits a city lookup and then a temperature lookup for
//! that city, so the second call never starts before the first resolves.
//! [`run`] spawns the update and logs a line straight away, showing that the
//! caller is not blocked while the lookups are pending.

use std::time::Duration;

use tokio::task::JoinError;
use tokio::time::{Instant, sleep};
use tracing::info;

/// Simulated latency of each lookup.
pub const STEP_DELAY: Duration = Duration::from_millis(1500);

/// Outcome of one weather update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherReport {
    pub city: String,
    pub forecast: String,
    pub elapsed: Duration,
}

/// Resolve the current city after `delay`.
pub async fn fetch_city(delay: Duration) -> String {
    sleep(delay).await;
    "London 🇬🇧".to_string()
}

/// Resolve the temperature in `city` after `delay`.
pub async fn fetch_temperature(city: &str, delay: Duration) -> String {
    sleep(delay).await;
    format!("{city} is 15°C")
}

/// Fetch the city, then its temperature.
pub async fn weather_update(delay: Duration) -> WeatherReport {
    let started = Instant::now();
    info!("Fetching city...");

    let city = fetch_city(delay).await;
    info!(%city, "City found");

    let forecast = fetch_temperature(&city, delay).await;
    info!("Weather: {forecast}");

    let elapsed = started.elapsed();
    info!(elapsed_ms = elapsed.as_millis(), "Weather update finished");

    WeatherReport {
        city,
        forecast,
        elapsed,
    }
}

/// Run a weather update in the background and wait for it.
///
/// # Errors
///
/// Returns an error if the update task panicked.
pub async fn run(delay: Duration) -> Result<WeatherReport, JoinError> {
    let update = tokio::spawn(weather_update(delay));
    info!("This line appears immediately, before the weather arrives");
    update.await
}
