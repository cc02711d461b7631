use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::domain::StudyAccession;
use crate::error::HarvestError;
use crate::http::{HttpSettings, build_client, send_with_retries};
use crate::record::{RawRecord, field_list_param};

pub const DEFAULT_ENA_BASE_URL: &str = "https://www.ebi.ac.uk/ena/portal/api";

pub trait EnaClient: Send + Sync {
    /// All analysis rows registered under `study`; empty when ENA has none.
    fn search_analyses(&self, study: &StudyAccession) -> Result<Vec<RawRecord>, HarvestError>;
}

impl<T: EnaClient + ?Sized> EnaClient for &T {
    fn search_analyses(&self, study: &StudyAccession) -> Result<Vec<RawRecord>, HarvestError> {
        (**self).search_analyses(study)
    }
}

/// Query parameters for the analysis search scoped to one study.
pub fn search_params(study: &StudyAccession) -> Vec<(&'static str, String)> {
    vec![
        ("result", "analysis".to_string()),
        ("format", "JSON".to_string()),
        ("limit", "0".to_string()),
        ("fields", field_list_param()),
        ("dataPortal", "ena".to_string()),
        ("query", format!("study_accession=\"{}\"", study.as_str())),
    ]
}

pub fn decode_records(body: &str) -> Result<Vec<RawRecord>, HarvestError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(body).map_err(|err| HarvestError::EnaParse(err.to_string()))
}

/// ENA answers 204 No Content for a study without analyses.
pub fn decode_search_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<RawRecord>, HarvestError> {
    if status == StatusCode::NO_CONTENT {
        return Ok(Vec::new());
    }
    if !status.is_success() {
        let message = if body.trim().is_empty() {
            "ENA request failed".to_string()
        } else {
            body.to_string()
        };
        return Err(HarvestError::EnaStatus {
            status: status.as_u16(),
            message,
        });
    }
    decode_records(body)
}

#[derive(Clone)]
pub struct EnaHttpClient {
    client: Client,
    base_url: String,
    max_retries: usize,
}

impl EnaHttpClient {
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self, HarvestError> {
        let client = build_client(settings, HarvestError::EnaHttp)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
        })
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

impl EnaClient for EnaHttpClient {
    fn search_analyses(&self, study: &StudyAccession) -> Result<Vec<RawRecord>, HarvestError> {
        let url = self.search_url();
        let params = search_params(study);
        let response = send_with_retries(
            self.max_retries,
            || self.client.get(&url).query(&params),
            HarvestError::EnaHttp,
        )?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| HarvestError::EnaHttp(err.to_string()))?;
        decode_search_response(status, &body)
    }
}
