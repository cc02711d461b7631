use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::document::{AnalysisDocument, SpecimenDocument};
use crate::domain::ResultType;
use crate::error::HarvestError;
use crate::eva::StudySummary;
use crate::record::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// None of the ftp, galaxy or aspera columns is populated.
    NoTransport,
    /// File columns have mismatched lengths or unparseable sizes.
    ShapeMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldOutcome {
    Created,
    Appended,
    Skipped(SkipReason),
}

impl FoldOutcome {
    pub fn is_merged(&self) -> bool {
        !matches!(self, FoldOutcome::Skipped(_))
    }
}

/// Documents keyed by sample accession.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SpecimenIndex {
    docs: BTreeMap<String, SpecimenDocument>,
}

impl SpecimenIndex {
    /// Files are taken from the first record seen for a sample; later
    /// records only add their analysis accession.
    pub fn fold(&mut self, record: &RawRecord) -> FoldOutcome {
        match self.docs.entry(record.sample_accession.clone()) {
            Entry::Occupied(mut entry) => {
                entry
                    .get_mut()
                    .analyses
                    .push(record.analysis_accession.clone());
                FoldOutcome::Appended
            }
            Entry::Vacant(entry) => {
                if record.transport().is_none() {
                    return FoldOutcome::Skipped(SkipReason::NoTransport);
                }
                let Some(mut doc) = SpecimenDocument::from_record(record) else {
                    return FoldOutcome::Skipped(SkipReason::ShapeMismatch);
                };
                doc.analyses.push(record.analysis_accession.clone());
                entry.insert(doc);
                FoldOutcome::Created
            }
        }
    }

    pub fn merge(&mut self, other: SpecimenIndex) {
        for (key, doc) in other.docs {
            match self.docs.entry(key) {
                Entry::Occupied(mut entry) => entry.get_mut().analyses.extend(doc.analyses),
                Entry::Vacant(entry) => {
                    entry.insert(doc);
                }
            }
        }
    }

    pub fn get(&self, sample_accession: &str) -> Option<&SpecimenDocument> {
        self.docs.get(sample_accession)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SpecimenDocument)> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Documents keyed by analysis accession.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalysisIndex {
    docs: BTreeMap<String, AnalysisDocument>,
}

impl AnalysisIndex {
    /// Identity fields, description and the study-level experiment type and
    /// platform are set once, from the first record seen for an analysis.
    /// Every merged record appends its sample accession, duplicates included.
    pub fn fold(&mut self, record: &RawRecord, summary: &StudySummary) -> FoldOutcome {
        match self.docs.entry(record.analysis_accession.clone()) {
            Entry::Occupied(mut entry) => {
                entry
                    .get_mut()
                    .sample_accessions
                    .push(record.sample_accession.clone());
                FoldOutcome::Appended
            }
            Entry::Vacant(entry) => {
                let Some(mut doc) = AnalysisDocument::from_record(record) else {
                    return FoldOutcome::Skipped(SkipReason::NoTransport);
                };
                doc.description = Some(record.description.clone());
                doc.experiment_type = summary.experiment_types();
                doc.platform = summary.platforms();
                doc.sample_accessions.push(record.sample_accession.clone());
                entry.insert(doc);
                FoldOutcome::Created
            }
        }
    }

    pub fn merge(&mut self, other: AnalysisIndex) {
        for (key, doc) in other.docs {
            match self.docs.entry(key) {
                Entry::Occupied(mut entry) => entry
                    .get_mut()
                    .sample_accessions
                    .extend(doc.sample_accessions),
                Entry::Vacant(entry) => {
                    entry.insert(doc);
                }
            }
        }
    }

    pub fn get(&self, analysis_accession: &str) -> Option<&AnalysisDocument> {
        self.docs.get(analysis_accession)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AnalysisDocument)> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Accumulated output of a harvest run in one of the two document shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResultMapping {
    Specimen(SpecimenIndex),
    Analysis(AnalysisIndex),
}

impl ResultMapping {
    pub fn new(result_type: ResultType) -> Self {
        match result_type {
            ResultType::Specimen => ResultMapping::Specimen(SpecimenIndex::default()),
            ResultType::Analysis => ResultMapping::Analysis(AnalysisIndex::default()),
        }
    }

    pub fn result_type(&self) -> ResultType {
        match self {
            ResultMapping::Specimen(_) => ResultType::Specimen,
            ResultMapping::Analysis(_) => ResultType::Analysis,
        }
    }

    /// The summary is only consulted in analysis mode.
    pub fn fold(&mut self, record: &RawRecord, summary: &StudySummary) -> FoldOutcome {
        match self {
            ResultMapping::Specimen(index) => index.fold(record),
            ResultMapping::Analysis(index) => index.fold(record, summary),
        }
    }

    /// Appends `other` as if its records had been folded after ours.
    pub fn merge(&mut self, other: ResultMapping) -> Result<(), HarvestError> {
        match (self, other) {
            (ResultMapping::Specimen(ours), ResultMapping::Specimen(theirs)) => {
                ours.merge(theirs);
                Ok(())
            }
            (ResultMapping::Analysis(ours), ResultMapping::Analysis(theirs)) => {
                ours.merge(theirs);
                Ok(())
            }
            (ours, theirs) => Err(HarvestError::ResultTypeMismatch {
                expected: ours.result_type().to_string(),
                found: theirs.result_type().to_string(),
            }),
        }
    }

    pub fn as_specimens(&self) -> Option<&SpecimenIndex> {
        match self {
            ResultMapping::Specimen(index) => Some(index),
            ResultMapping::Analysis(_) => None,
        }
    }

    pub fn as_analyses(&self) -> Option<&AnalysisIndex> {
        match self {
            ResultMapping::Analysis(index) => Some(index),
            ResultMapping::Specimen(_) => None,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResultMapping::Specimen(index) => index.len(),
            ResultMapping::Analysis(index) => index.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn record(analysis: &str, sample: &str) -> RawRecord {
        RawRecord {
            analysis_accession: analysis.to_string(),
            sample_accession: sample.to_string(),
            study_accession: "PRJEB1".to_string(),
            analysis_title: format!("title of {analysis}"),
            description: format!("description of {analysis}"),
            tax_id: "9913".to_string(),
            submitted_ftp: format!("ftp.sra.ebi.ac.uk/{analysis}.vcf.gz"),
            submitted_bytes: "100".to_string(),
            submitted_format: "VCF".to_string(),
            submitted_md5: "m".to_string(),
            ..RawRecord::default()
        }
    }

    fn summary() -> StudySummary {
        StudySummary {
            experiment_type: Some("Genotyping, WGS".to_string()),
            platform: Some("-".to_string()),
        }
    }

    #[test]
    fn specimen_accumulates_analyses() {
        let mut index = SpecimenIndex::default();
        assert_eq!(index.fold(&record("ERZ1", "S1")), FoldOutcome::Created);
        assert_eq!(index.fold(&record("ERZ2", "S1")), FoldOutcome::Appended);
        assert_eq!(index.len(), 1);
        let doc = index.get("S1").unwrap();
        assert_eq!(doc.analyses, ["ERZ1", "ERZ2"]);
        // files come from the first record
        assert_eq!(doc.files.file_names(), ["ERZ1.vcf.gz"]);
    }

    #[test]
    fn specimen_skips_unparseable_first_record() {
        let mut index = SpecimenIndex::default();
        let bad = RawRecord {
            submitted_format: "VCF;VCF".to_string(),
            ..record("ERZ1", "S1")
        };
        assert_eq!(
            index.fold(&bad),
            FoldOutcome::Skipped(SkipReason::ShapeMismatch)
        );
        let bare = RawRecord {
            submitted_ftp: String::new(),
            ..record("ERZ1", "S1")
        };
        assert_eq!(index.fold(&bare), FoldOutcome::Skipped(SkipReason::NoTransport));
        assert!(index.is_empty());
    }

    #[test]
    fn specimen_appends_even_when_later_record_is_malformed() {
        let mut index = SpecimenIndex::default();
        index.fold(&record("ERZ1", "S1"));
        let bad = RawRecord {
            submitted_ftp: String::new(),
            ..record("ERZ2", "S1")
        };
        assert_eq!(index.fold(&bad), FoldOutcome::Appended);
        assert_eq!(index.get("S1").unwrap().analyses, ["ERZ1", "ERZ2"]);
    }

    #[test]
    fn analysis_duplicates_sample_accessions() {
        let mut index = AnalysisIndex::default();
        let rec = record("ERZ1", "S1");
        index.fold(&rec, &summary());
        index.fold(&rec, &summary());
        assert_eq!(index.get("ERZ1").unwrap().sample_accessions, ["S1", "S1"]);
    }

    #[test]
    fn analysis_first_seen_wins() {
        let mut index = AnalysisIndex::default();
        let first = RawRecord {
            analysis_title: "first".to_string(),
            ..record("ERZ1", "S1")
        };
        let second = RawRecord {
            analysis_title: "second".to_string(),
            description: "later".to_string(),
            ..record("ERZ1", "S2")
        };
        index.fold(&first, &summary());
        index.fold(&second, &StudySummary::default());
        let doc = index.get("ERZ1").unwrap();
        assert_eq!(doc.title, "first");
        assert_eq!(doc.description.as_deref(), Some("description of ERZ1"));
        assert_eq!(
            doc.experiment_type.as_deref(),
            Some(&["Genotyping".to_string(), "WGS".to_string()][..])
        );
        assert_eq!(doc.sample_accessions, ["S1", "S2"]);
    }

    #[test]
    fn analysis_applies_summary_sentinel() {
        let mut index = AnalysisIndex::default();
        index.fold(&record("ERZ1", "S1"), &summary());
        let doc = index.get("ERZ1").unwrap();
        assert!(doc.platform.is_none());
        let value = serde_json::to_value(doc).unwrap();
        assert!(value.get("platform").is_none());
    }

    #[test]
    fn analysis_skips_record_without_transport() {
        let mut index = AnalysisIndex::default();
        let bare = RawRecord {
            submitted_ftp: String::new(),
            ..record("ERZ1", "S1")
        };
        assert_eq!(
            index.fold(&bare, &summary()),
            FoldOutcome::Skipped(SkipReason::NoTransport)
        );
        assert!(index.is_empty());
    }

    #[test]
    fn merge_preserves_first_seen_and_appends() {
        let mut ours = ResultMapping::new(ResultType::Analysis);
        ours.fold(&record("ERZ1", "S1"), &summary());

        let mut theirs = ResultMapping::new(ResultType::Analysis);
        let retitled = RawRecord {
            analysis_title: "other".to_string(),
            ..record("ERZ1", "S2")
        };
        theirs.fold(&retitled, &summary());
        theirs.fold(&record("ERZ2", "S3"), &summary());

        ours.merge(theirs).unwrap();
        let index = ours.as_analyses().unwrap();
        assert_eq!(index.len(), 2);
        let doc = index.get("ERZ1").unwrap();
        assert_eq!(doc.title, "title of ERZ1");
        assert_eq!(doc.sample_accessions, ["S1", "S2"]);
    }

    #[test]
    fn merge_rejects_mixed_shapes() {
        let mut ours = ResultMapping::new(ResultType::Specimen);
        let err = ours
            .merge(ResultMapping::new(ResultType::Analysis))
            .unwrap_err();
        assert_matches!(err, HarvestError::ResultTypeMismatch { .. });
    }

    #[test]
    fn mapping_serializes_as_plain_object() {
        let mut mapping = ResultMapping::new(ResultType::Specimen);
        mapping.fold(&record("ERZ1", "S1"), &StudySummary::default());
        let value = serde_json::to_value(&mapping).unwrap();
        assert_eq!(value["S1"]["analyses"][0], "ERZ1");
        assert_eq!(value["S1"]["fileNames"][0], "ERZ1.vcf.gz");
    }
}
