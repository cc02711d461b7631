use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::StudyAccession;
use crate::error::HarvestError;
use crate::http::{HttpSettings, build_client, send_with_retries};

pub const DEFAULT_EVA_BASE_URL: &str = "https://www.ebi.ac.uk/eva/webservices/rest/v1";

/// EVA marks non-applicable summary values with a dash.
pub const NOT_APPLICABLE: &str = "-";

/// `{"response": [{"result": [...]}]}` wrapper used by every EVA endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "Vec::new")]
    pub response: Vec<ResultBlock<T>>,
}

#[derive(Debug, Deserialize)]
pub struct ResultBlock<T> {
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn into_first_result(self) -> Result<Vec<T>, HarvestError> {
        self.response
            .into_iter()
            .next()
            .map(|block| block.result)
            .ok_or_else(|| HarvestError::EvaShape("empty response list".to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyListing {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySummary {
    #[serde(rename = "experimentType", default)]
    pub experiment_type: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
}

impl StudySummary {
    pub fn experiment_types(&self) -> Option<Vec<String>> {
        split_listed(self.experiment_type.as_deref())
    }

    pub fn platforms(&self) -> Option<Vec<String>> {
        split_listed(self.platform.as_deref())
    }
}

/// Splits a `", "`-joined summary value; absent or `-` yields `None`.
pub fn split_listed(value: Option<&str>) -> Option<Vec<String>> {
    let value = value?;
    if value == NOT_APPLICABLE {
        return None;
    }
    Some(value.split(", ").map(|item| item.to_string()).collect())
}

pub fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, HarvestError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|err| HarvestError::EvaShape(err.to_string()))?;
    envelope.into_first_result()
}

pub trait EvaClient: Send + Sync {
    fn list_studies(&self) -> Result<Vec<StudyListing>, HarvestError>;
    fn study_summary(&self, study: &StudyAccession) -> Result<StudySummary, HarvestError>;
}

impl<T: EvaClient + ?Sized> EvaClient for &T {
    fn list_studies(&self) -> Result<Vec<StudyListing>, HarvestError> {
        (**self).list_studies()
    }

    fn study_summary(&self, study: &StudyAccession) -> Result<StudySummary, HarvestError> {
        (**self).study_summary(study)
    }
}

#[derive(Clone)]
pub struct EvaHttpClient {
    client: Client,
    base_url: String,
    max_retries: usize,
}

impl EvaHttpClient {
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self, HarvestError> {
        let client = build_client(settings, HarvestError::EvaHttp)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
        })
    }

    fn studies_url(&self) -> String {
        format!("{}/meta/studies/all", self.base_url)
    }

    fn summary_url(&self, study: &StudyAccession) -> String {
        format!("{}/studies/{}/summary", self.base_url, study.as_str())
    }

    fn get_text(&self, url: &str) -> Result<String, HarvestError> {
        let response = send_with_retries(
            self.max_retries,
            || self.client.get(url),
            HarvestError::EvaHttp,
        )?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "EVA request failed".to_string());
            return Err(HarvestError::EvaStatus { status, message });
        }
        response
            .text()
            .map_err(|err| HarvestError::EvaHttp(err.to_string()))
    }
}

impl EvaClient for EvaHttpClient {
    fn list_studies(&self) -> Result<Vec<StudyListing>, HarvestError> {
        let body = self.get_text(&self.studies_url())?;
        decode_envelope(&body)
    }

    fn study_summary(&self, study: &StudyAccession) -> Result<StudySummary, HarvestError> {
        let body = self.get_text(&self.summary_url(study))?;
        decode_envelope::<StudySummary>(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::EvaShape(format!("no summary for study {study}")))
    }
}
