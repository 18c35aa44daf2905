//! OSRM HTTP adapter for distance matrices.

use std::env;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::MatrixUnavailable;
use crate::matrix::{DurationMatrix, MatrixCell, MatrixSource, FALLBACK_LEG_METERS};
use crate::model::TravelMode;
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    /// Routing profile; derived from the travel mode when unset.
    pub profile: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: None,
            timeout_secs: 10,
        }
    }
}

impl OsrmConfig {
    /// Defaults overridden by `OSRM_BASE_URL`, `OSRM_PROFILE` and
    /// `OSRM_TIMEOUT_SECS`. Unparseable timeouts keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = env::var("OSRM_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(profile) = env::var("OSRM_PROFILE") {
            config.profile = Some(profile);
        }
        if let Some(timeout) = env::var("OSRM_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
        {
            config.timeout_secs = timeout;
        }
        config
    }

    fn profile_for(&self, mode: TravelMode) -> &str {
        self.profile
            .as_deref()
            .unwrap_or_else(|| mode.osrm_profile())
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OsrmConfig {
        &self.config
    }

    fn table_url(&self, locations: &[(f64, f64)], mode: TravelMode) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration,distance",
            self.config.base_url,
            self.config.profile_for(mode),
            coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(
        &self,
        locations: &[(f64, f64)],
        mode: TravelMode,
    ) -> Result<DurationMatrix, MatrixUnavailable> {
        if locations.is_empty() {
            return DurationMatrix::from_rows(Vec::new(), MatrixSource::Provider);
        }

        let url = self.table_url(locations, mode);
        debug!(%url, locations = locations.len(), "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())?;

        body.into_matrix(locations.len())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmTableResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    durations: Option<Vec<Vec<Option<f64>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    /// Convert to a matrix. Cells without a duration become the fallback
    /// leg; a missing distance alone falls back to the default distance.
    pub(crate) fn into_matrix(self, expected: usize) -> Result<DurationMatrix, MatrixUnavailable> {
        if self.code != "Ok" {
            return Err(MatrixUnavailable::Service {
                code: self.code,
                message: self.message.unwrap_or_default(),
            });
        }

        let durations = self.durations.ok_or_else(|| MatrixUnavailable::Service {
            code: self.code.clone(),
            message: "response has no durations".to_string(),
        })?;
        let distances = self.distances.unwrap_or_default();

        if durations.len() != expected {
            return Err(MatrixUnavailable::Shape {
                rows: durations.len(),
                cols: durations.first().map(Vec::len).unwrap_or(0),
                expected,
            });
        }

        let rows = durations
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, duration)| {
                        let distance = distances
                            .get(i)
                            .and_then(|row| row.get(j))
                            .copied()
                            .flatten();
                        duration.map(|duration| {
                            MatrixCell::new(
                                duration.round() as u32,
                                distance.map_or(FALLBACK_LEG_METERS, |meters| meters.round() as u32),
                            )
                        })
                    })
                    .collect()
            })
            .collect();

        DurationMatrix::from_rows(rows, MatrixSource::Provider)
    }
}
