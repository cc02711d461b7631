use std::time::{Duration, Instant};

use serde::Serialize;

use crate::domain::{ResultType, StudyAccession};
use crate::ena::EnaClient;
use crate::error::HarvestError;
use crate::eva::{EvaClient, StudyListing};
use crate::merge::{FoldOutcome, ResultMapping};

pub const DEFAULT_STUDY_TAG: &str = "Recombination";
pub const DEFAULT_PROGRESS_EVERY: usize = 50;

#[derive(Debug, Clone)]
pub struct HarvestOptions {
    pub result_type: ResultType,
    pub study_tag: String,
    pub progress_every: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            result_type: ResultType::Specimen,
            study_tag: DEFAULT_STUDY_TAG.to_string(),
            progress_every: DEFAULT_PROGRESS_EVERY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// Per-run counters, reported alongside the mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HarvestStats {
    pub studies: usize,
    pub empty_studies: usize,
    pub records: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct HarvestResult {
    pub mapping: ResultMapping,
    pub stats: HarvestStats,
}

/// Case-sensitive prefix match on the catalog display name.
pub fn select_studies(
    listings: &[StudyListing],
    tag: &str,
) -> Result<Vec<StudyAccession>, HarvestError> {
    if tag.is_empty() {
        return Err(HarvestError::InvalidStudyTag(tag.to_string()));
    }
    listings
        .iter()
        .filter(|listing| listing.name.starts_with(tag))
        .map(|listing| listing.id.parse())
        .collect()
}

pub struct Harvester<E: EvaClient, A: EnaClient> {
    eva: E,
    ena: A,
}

impl<E: EvaClient, A: EnaClient> Harvester<E, A> {
    pub fn new(eva: E, ena: A) -> Self {
        Self { eva, ena }
    }

    pub fn run(
        &self,
        options: &HarvestOptions,
        sink: &dyn ProgressSink,
    ) -> Result<HarvestResult, HarvestError> {
        let started = Instant::now();
        let listings = self.eva.list_studies()?;
        let studies = select_studies(&listings, &options.study_tag)?;
        sink.event(ProgressEvent {
            message: format!(
                "There are {} {} datasets found within EVA",
                studies.len(),
                options.study_tag
            ),
            elapsed: Some(started.elapsed()),
        });

        let mut mapping = ResultMapping::new(options.result_type);
        let mut stats = HarvestStats {
            studies: studies.len(),
            ..HarvestStats::default()
        };
        let mut progress = ProgressCounter::new(options.progress_every);

        for study in &studies {
            self.harvest_study(study, &mut mapping, &mut stats, &mut progress, sink)?;
        }

        sink.event(ProgressEvent {
            message: format!(
                "Finished: {} {} documents from {} records ({} skipped)",
                mapping.len(),
                mapping.result_type(),
                stats.records,
                stats.skipped
            ),
            elapsed: Some(started.elapsed()),
        });
        Ok(HarvestResult { mapping, stats })
    }

    fn harvest_study(
        &self,
        study: &StudyAccession,
        mapping: &mut ResultMapping,
        stats: &mut HarvestStats,
        progress: &mut ProgressCounter,
        sink: &dyn ProgressSink,
    ) -> Result<(), HarvestError> {
        sink.event(ProgressEvent {
            message: format!("Importing study {study}"),
            elapsed: None,
        });
        let summary = self.eva.study_summary(study)?;
        let records = self.ena.search_analyses(study)?;
        if records.is_empty() {
            stats.empty_studies += 1;
            sink.event(ProgressEvent {
                message: format!("No ENA analyses for {study}"),
                elapsed: None,
            });
            return Ok(());
        }
        tracing::debug!(%study, records = records.len(), "folding study");

        for record in &records {
            stats.records += 1;
            match mapping.fold(record, &summary) {
                FoldOutcome::Skipped(reason) => {
                    stats.skipped += 1;
                    tracing::debug!(
                        analysis = %record.analysis_accession,
                        sample = %record.sample_accession,
                        ?reason,
                        "skipping record"
                    );
                }
                FoldOutcome::Created | FoldOutcome::Appended => {
                    if let Some(count) = progress.observe(mapping.len()) {
                        sink.event(ProgressEvent {
                            message: format!("Processed {count} records"),
                            elapsed: None,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reports each multiple of `every` documents once.
#[derive(Debug)]
struct ProgressCounter {
    every: usize,
    last_reported: usize,
}

impl ProgressCounter {
    fn new(every: usize) -> Self {
        Self {
            every,
            last_reported: 0,
        }
    }

    fn observe(&mut self, count: usize) -> Option<usize> {
        if self.every == 0 || count == 0 || count % self.every != 0 {
            return None;
        }
        if count <= self.last_reported {
            return None;
        }
        self.last_reported = count;
        Some(count)
    }
}
