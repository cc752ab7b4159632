//! Checks against the real APIs. Need OPENAI_API_KEY and WEATHER_API_KEY:
//!
//!   cargo test -p travel-monitor --test live_api -- --ignored

use travel_monitor::{Credentials, MonitorConfig, Region, TravelMonitor};

fn live_monitor() -> TravelMonitor<travel_monitor::OpenAiClient, travel_monitor::WeatherApiClient> {
    let credentials = Credentials::from_env().expect("API keys must be set for live tests");
    TravelMonitor::from_config(&MonitorConfig::default(), &credentials).unwrap()
}

#[tokio::test]
#[ignore]
async fn lists_cities_for_every_region() {
    let monitor = live_monitor();
    for region in Region::ALL {
        let cities = monitor.list_cities(region).await.unwrap();
        assert!(!cities.is_empty() && cities.len() <= 20, "{}", region);
        assert!(cities
            .iter()
            .all(|c| !c.name.is_empty() && !c.country.is_empty()));
    }
}

#[tokio::test]
#[ignore]
async fn recommendation_has_required_fields() {
    let monitor = live_monitor();
    let cities = monitor.list_cities(Region::Europe).await.unwrap();
    let candidates = monitor.fetch_weather(cities).await;
    let recommendation = monitor.recommend(&candidates).await.unwrap();

    assert!(!recommendation.best_city.is_empty());
    assert!(!recommendation.country.is_empty());
    assert!(!recommendation.reasoning.is_empty());
}

#[tokio::test]
#[ignore]
async fn suggests_activities_for_paris() {
    let monitor = live_monitor();
    let activities = monitor
        .suggest_activities("Paris", "France", "Sunny")
        .await
        .unwrap();
    assert!(!activities.is_empty() && activities.len() <= 5);
    assert!(activities.iter().all(|a| !a.is_empty()));
}
