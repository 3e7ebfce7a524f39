//! Integration tests for a full survey run against a mocked weather API

use chrono::NaiveDate;
use std::path::Path;
use weathersurvey::config::SurveyConfig;
use weathersurvey::{City, FailureKind, Gazetteer, OpenWeatherClient, WeatherTable, survey};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gazetteer() -> Gazetteer {
    Gazetteer::new(vec![
        City::new("barrow", "us", 71.29, -156.79),
        City::new("hilo", "us", 19.73, -155.09),
        City::new("ushuaia", "ar", -54.8, -68.3),
        City::new("taolanaro", "mg", -25.03, 46.98),
        City::new("mataura", "nz", -46.19, 168.86),
    ])
}

fn survey_config(base_url: &str, dir: &Path) -> SurveyConfig {
    let mut config = SurveyConfig::default();
    config.weather.api_key = Some("integration_key_123".to_string());
    config.weather.base_url = base_url.to_string();
    config.weather.request_delay_ms = 0;
    config.sampling.sample_size = 300;
    config.sampling.seed = Some(2024);
    config.output.csv_path = dir.join("output_data").join("cities.csv");
    config.output.plot_dir = dir.join("analysis");
    config
}

async fn mount_city(server: &MockServer, city: &str, lat: f64, temp: f64) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", city))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "coord": { "lat": lat, "lon": 0.0 },
            "main": { "temp": temp, "humidity": 64 },
            "wind": { "speed": 7.5 },
            "clouds": { "all": 20 }
        })))
        .mount(server)
        .await;
}

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    mount_city(&server, "barrow", 71.29, 12.2).await;
    mount_city(&server, "hilo", 19.73, 78.8).await;
    mount_city(&server, "ushuaia", -54.8, 39.2).await;
    mount_city(&server, "mataura", -46.19, 51.0).await;

    // Anything not mounted above is an unknown city
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&server)
        .await;
    server
}

fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[tokio::test]
async fn test_full_survey_writes_only_successful_cities() {
    let server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let config = survey_config(&server.uri(), dir.path());
    let client = OpenWeatherClient::new(&config.weather).unwrap();

    let report = survey::run(&config, &gazetteer(), &client, false, run_date())
        .await
        .unwrap();

    // 300 samples reach every one of the five cities, so taolanaro was queried
    assert_eq!(report.unique_cities, 5);
    assert_eq!(report.summary.attempted, 5);
    assert_eq!(report.summary.failures[&FailureKind::HttpStatus], 1);
    assert_eq!(report.summary.failed(), 1);

    // No row for the city the API does not know
    assert_eq!(report.table.len(), 4);
    assert!(report.table.rows().iter().all(|row| row.city != "taolanaro"));
    assert!(report.table.len() <= report.unique_cities);

    let read_back = WeatherTable::read_csv(&report.csv_path).unwrap();
    assert_eq!(read_back, report.table);

    let hilo = report
        .table
        .rows()
        .iter()
        .find(|row| row.city == "hilo")
        .unwrap();
    assert_eq!(hilo.lat, 19.73);
    assert_eq!(hilo.temp, 78.8);
    assert_eq!(hilo.humidity, 64.0);
    assert_eq!(hilo.wind, 7.5);
    assert_eq!(hilo.clouds, 20.0);
}

#[tokio::test]
async fn test_full_survey_renders_plots() {
    let server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = survey_config(&server.uri(), dir.path());
    config.output.plot_width = 400;
    config.output.plot_height = 300;
    let client = OpenWeatherClient::new(&config.weather).unwrap();

    let report = survey::run(&config, &gazetteer(), &client, true, run_date())
        .await
        .unwrap();

    let plot_dir = dir.path().join("analysis");
    assert_eq!(report.plots.len(), 4);
    for name in ["temp.png", "humidity.png", "clouds.png", "wind.png"] {
        let path = plot_dir.join(name);
        assert!(report.plots.contains(&path));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[tokio::test]
async fn test_rejected_api_key_still_writes_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = survey_config(&server.uri(), dir.path());
    let client = OpenWeatherClient::new(&config.weather).unwrap();

    let report = survey::run(&config, &gazetteer(), &client, false, run_date())
        .await
        .unwrap();

    assert!(report.table.is_empty());
    assert_eq!(report.summary.succeeded, 0);
    assert_eq!(report.summary.failed(), report.unique_cities);

    let contents = std::fs::read_to_string(&report.csv_path).unwrap();
    assert_eq!(contents.trim_end(), "city,lat,temp,humidity,wind,clouds");
}

#[tokio::test]
async fn test_max_cities_limits_rows() {
    let server = mock_api().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = survey_config(&server.uri(), dir.path());
    config.sampling.max_cities = Some(1);
    let client = OpenWeatherClient::new(&config.weather).unwrap();

    let report = survey::run(&config, &gazetteer(), &client, false, run_date())
        .await
        .unwrap();

    assert!(report.table.len() <= 1);
    assert_eq!(WeatherTable::read_csv(&report.csv_path).unwrap(), report.table);
}
