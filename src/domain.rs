use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::HarvestError;

/// Shape of the documents a harvest produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    /// One document per sample accession, listing the analyses that used it.
    #[default]
    Specimen,
    /// One document per analysis accession, listing the samples it covers.
    Analysis,
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Specimen => write!(f, "specimen"),
            ResultType::Analysis => write!(f, "analysis"),
        }
    }
}

/// Remote storage protocol hosting a record's submitted files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    Ftp,
    Galaxy,
    Aspera,
}

impl Transport {
    /// Lookup order when a record populates more than one transport field.
    pub const PRIORITY: [Transport; 3] = [Transport::Ftp, Transport::Galaxy, Transport::Aspera];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Ftp => "ftp",
            Transport::Galaxy => "galaxy",
            Transport::Aspera => "aspera",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StudyAccession(String);

impl StudyAccession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudyAccession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn study_accession_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("static regex"))
}

impl FromStr for StudyAccession {
    type Err = HarvestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        // Embedded verbatim into the search query, so quotes and spaces are rejected.
        if !study_accession_re().is_match(normalized) {
            return Err(HarvestError::InvalidStudyAccession(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}
