use serde::{Deserialize, Serialize};

use crate::domain::Transport;

/// Columns requested from the search API for every analysis row.
pub const FIELD_LIST: [&str; 25] = [
    "analysis_accession",
    "study_accession",
    "sample_accession",
    "analysis_title",
    "analysis_type",
    "center_name",
    "first_public",
    "last_updated",
    "study_title",
    "tax_id",
    "scientific_name",
    "analysis_alias",
    "submitted_bytes",
    "submitted_md5",
    "submitted_ftp",
    "submitted_aspera",
    "submitted_galaxy",
    "submitted_format",
    "broker_name",
    "pipeline_name",
    "pipeline_version",
    "assembly_type",
    "accession",
    "description",
    "germline",
];

pub fn field_list_param() -> String {
    FIELD_LIST.join(",")
}

/// One analysis row from the search API. Missing columns deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub analysis_accession: String,
    pub study_accession: String,
    pub sample_accession: String,
    pub analysis_title: String,
    pub analysis_type: String,
    pub center_name: String,
    pub first_public: String,
    pub last_updated: String,
    pub study_title: String,
    pub tax_id: String,
    pub scientific_name: String,
    pub analysis_alias: String,
    pub submitted_bytes: String,
    pub submitted_md5: String,
    pub submitted_ftp: String,
    pub submitted_aspera: String,
    pub submitted_galaxy: String,
    pub submitted_format: String,
    pub broker_name: String,
    pub pipeline_name: String,
    pub pipeline_version: String,
    pub assembly_type: String,
    pub accession: String,
    pub description: String,
    pub germline: String,
}

impl RawRecord {
    pub fn submitted_paths(&self, transport: Transport) -> &str {
        match transport {
            Transport::Ftp => &self.submitted_ftp,
            Transport::Galaxy => &self.submitted_galaxy,
            Transport::Aspera => &self.submitted_aspera,
        }
    }

    /// First populated transport field in ftp, galaxy, aspera order.
    pub fn transport(&self) -> Option<Transport> {
        Transport::PRIORITY
            .into_iter()
            .find(|transport| !self.submitted_paths(*transport).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_partial_row() {
        let record: RawRecord = serde_json::from_str(
            r#"{"analysis_accession":"ERZ1","sample_accession":"SAMEA1","unknown":"x"}"#,
        )
        .unwrap();
        assert_eq!(record.analysis_accession, "ERZ1");
        assert_eq!(record.sample_accession, "SAMEA1");
        assert!(record.submitted_ftp.is_empty());
    }

    #[test]
    fn transport_prefers_ftp() {
        let record = RawRecord {
            submitted_ftp: "ftp.sra.ebi.ac.uk/a.vcf.gz".to_string(),
            submitted_aspera: "fasp.sra.ebi.ac.uk:/a.vcf.gz".to_string(),
            ..RawRecord::default()
        };
        assert_eq!(record.transport(), Some(Transport::Ftp));
    }

    #[test]
    fn transport_falls_back_in_order() {
        let record = RawRecord {
            submitted_galaxy: "g".to_string(),
            submitted_aspera: "a".to_string(),
            ..RawRecord::default()
        };
        assert_eq!(record.transport(), Some(Transport::Galaxy));

        let record = RawRecord {
            submitted_aspera: "a".to_string(),
            ..RawRecord::default()
        };
        assert_eq!(record.transport(), Some(Transport::Aspera));
        assert_eq!(RawRecord::default().transport(), None);
    }

    #[test]
    fn field_list_is_comma_joined() {
        let param = field_list_param();
        assert!(param.starts_with("analysis_accession,study_accession,"));
        assert!(param.ends_with(",description,germline"));
    }
}
