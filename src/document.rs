use serde::Serialize;

use crate::files::{FileBundle, extract_files};
use crate::record::RawRecord;

pub const NCBI_TAXON_PREFIX: &str = "http://purl.obolibrary.org/obo/NCBITaxon_";

pub fn taxon_uri(tax_id: &str) -> String {
    format!("{NCBI_TAXON_PREFIX}{}", tax_id.trim())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Organism {
    pub text: String,
    pub ontology_terms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDocument {
    #[serde(flatten)]
    pub files: FileBundle,
    pub accession: String,
    pub title: String,
    pub alias: String,
    pub release_date: String,
    pub update_date: String,
    pub organism: Organism,
    pub dataset_accession: String,
    pub analysis_center: String,
    pub analysis_type: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experiment_type: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Vec<String>>,
    pub sample_accessions: Vec<String>,
}

impl AnalysisDocument {
    /// Builds the analysis-level view of a search row.
    ///
    /// `None` when no transport column is populated. A record whose file
    /// columns are malformed still yields a document, just without files.
    /// Summary-derived fields and sample accessions start out empty.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let transport = record.transport()?;
        Some(Self {
            files: extract_files(record, transport),
            accession: record.analysis_accession.clone(),
            title: record.analysis_title.clone(),
            alias: record.analysis_alias.clone(),
            release_date: record.first_public.clone(),
            update_date: record.last_updated.clone(),
            organism: Organism {
                text: record.scientific_name.clone(),
                ontology_terms: taxon_uri(&record.tax_id),
            },
            dataset_accession: record.study_accession.clone(),
            analysis_center: record.center_name.clone(),
            analysis_type: record.analysis_type.clone(),
            description: None,
            experiment_type: None,
            platform: None,
            sample_accessions: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecimenDocument {
    #[serde(flatten)]
    pub files: FileBundle,
    pub analyses: Vec<String>,
}

impl SpecimenDocument {
    /// `None` when the record has no transport or its file columns do not parse.
    pub fn from_record(record: &RawRecord) -> Option<Self> {
        let transport = record.transport()?;
        let files = extract_files(record, transport);
        if files.is_empty() {
            return None;
        }
        Some(Self {
            files,
            analyses: Vec::new(),
        })
    }
}
