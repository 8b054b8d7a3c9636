use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures the weather pipeline can surface to a caller.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Missing OPENWEATHER_API_KEY in environment")]
    MissingApiKey,

    #[error("OpenWeather request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("OpenWeather returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error("Malformed OpenWeather payload: missing {0}")]
    MissingField(&'static str),

    #[error("Failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for WeatherError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_piece() {
        let err = WeatherError::MissingApiKey;
        assert!(err.to_string().contains("OPENWEATHER_API_KEY"));

        let err = WeatherError::MissingField("main.temp");
        assert!(err.to_string().contains("main.temp"));
    }

    #[test]
    fn upstream_status_keeps_the_code() {
        let err = WeatherError::UpstreamStatus(reqwest::StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("502"));
    }
}
