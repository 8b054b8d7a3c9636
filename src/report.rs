use chrono::{DateTime, Utc};
use futures_util::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::cache::TtlCache;
use crate::cities::{self, City};
use crate::comfort::comfort_index;
use crate::error::WeatherError;
use crate::weather::{CacheStatus, OpenWeatherClient};

const PROCESSED_KEY: &str = "processed:comfort:list";

/// 12 points at the provider's 3-hour granularity ≈ 36 hours out.
const FORECAST_POINTS: usize = 12;

/// Scored conditions for a single city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityComfort {
    pub city_id: u32,
    pub city_name: String,
    pub description: String,
    pub temp_c: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub comfort_score: u8,
    pub raw_cache: CacheStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCityComfort {
    pub rank: usize,
    #[serde(flatten)]
    pub city: CityComfort,
}

/// The assembled ranking, cached whole under `processed:comfort:list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortReport {
    pub generated_at: DateTime<Utc>,
    pub total_cities: usize,
    pub cities: Vec<RankedCityComfort>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComfortReportResponse {
    #[serde(flatten)]
    pub report: ComfortReport,
    pub processed_cache: CacheStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub time: String,
    pub temp_c: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastView {
    pub city_id: u32,
    pub city_name: String,
    pub points: Vec<ForecastPoint>,
    pub cache: CacheStatus,
}

/// Orchestrates the ranked comfort report and the trimmed forecast view.
pub struct ComfortService {
    weather: Arc<OpenWeatherClient>,
    cache: Arc<TtlCache>,
    cities: &'static [City],
}

impl ComfortService {
    pub fn new(
        weather: Arc<OpenWeatherClient>,
        cache: Arc<TtlCache>,
        cities: &'static [City],
    ) -> Self {
        Self {
            weather,
            cache,
            cities,
        }
    }

    /// Ranked comfort report over the whole city directory.
    ///
    /// Served from the processed cache when fresh — no per-city work at all,
    /// even if the underlying raw entries have since expired. On a miss, all
    /// city fetches are dispatched concurrently and any single failure fails
    /// the whole report; nothing partial is cached or returned.
    pub async fn comfort_report(&self) -> Result<ComfortReportResponse, WeatherError> {
        if let Some(cached) = self.cache.get(PROCESSED_KEY).await {
            if let Ok(report) = serde_json::from_value::<ComfortReport>(cached) {
                info!("📦 Comfort report served from processed cache");
                return Ok(ComfortReportResponse {
                    report,
                    processed_cache: CacheStatus::Hit,
                });
            }
        }

        let mut records =
            try_join_all(self.cities.iter().map(|city| self.city_comfort(city))).await?;

        // Stable sort: tied scores keep directory order.
        records.sort_by(|a, b| b.comfort_score.cmp(&a.comfort_score));

        let ranked: Vec<RankedCityComfort> = records
            .into_iter()
            .enumerate()
            .map(|(index, city)| RankedCityComfort {
                rank: index + 1,
                city,
            })
            .collect();

        let report = ComfortReport {
            generated_at: Utc::now(),
            total_cities: ranked.len(),
            cities: ranked,
        };

        self.cache
            .set(PROCESSED_KEY.to_string(), serde_json::to_value(&report)?)
            .await;
        info!("💾 Cached comfort report for {} cities", report.total_cities);

        Ok(ComfortReportResponse {
            report,
            processed_cache: CacheStatus::Miss,
        })
    }

    async fn city_comfort(&self, city: &City) -> Result<CityComfort, WeatherError> {
        let fetched = self.weather.fetch_current(city.id).await?;
        let data = fetched.data;

        let temp_c = data["main"]["temp"]
            .as_f64()
            .ok_or(WeatherError::MissingField("main.temp"))?;
        let humidity = data["main"]["humidity"]
            .as_f64()
            .ok_or(WeatherError::MissingField("main.humidity"))?;

        // The provider may omit these; default here, not in the scorer.
        let wind_speed = data["wind"]["speed"].as_f64().unwrap_or(0.0);
        let description = data["weather"][0]["description"]
            .as_str()
            .unwrap_or("N/A")
            .to_string();

        Ok(CityComfort {
            city_id: city.id,
            city_name: city.name.to_string(),
            description,
            temp_c,
            humidity,
            wind_speed,
            comfort_score: comfort_index(temp_c, humidity, wind_speed),
            raw_cache: fetched.cache,
        })
    }

    /// Trimmed forecast series for one city: the first 12 provider points
    /// projected to `{time, tempC}`. Shorter upstream lists pass through.
    pub async fn forecast_view(&self, city_id: u32) -> Result<ForecastView, WeatherError> {
        let fetched = self.weather.fetch_forecast(city_id).await?;
        let data = fetched.data;

        let points = data["list"]
            .as_array()
            .map(|list| {
                list.iter()
                    .take(FORECAST_POINTS)
                    .map(|entry| ForecastPoint {
                        time: entry["dt_txt"].as_str().unwrap_or_default().to_string(),
                        temp_c: entry["main"]["temp"].as_f64().unwrap_or(0.0),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let city_name = data["city"]["name"]
            .as_str()
            .map(str::to_string)
            .or_else(|| cities::city_name(city_id).map(str::to_string))
            .unwrap_or_else(|| "N/A".to_string());

        Ok(ForecastView {
            city_id,
            city_name,
            points,
            cache: fetched.cache,
        })
    }
}
