use eva_harvest::domain::{ResultType, Transport};
use eva_harvest::eva::StudySummary;
use eva_harvest::files::extract_files;
use eva_harvest::merge::{FoldOutcome, ResultMapping, SkipReason};
use eva_harvest::record::RawRecord;
use eva_harvest::size::humanize_bytes;

const UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

fn record(analysis: &str, sample: &str, title: &str) -> RawRecord {
    RawRecord {
        analysis_accession: analysis.to_string(),
        sample_accession: sample.to_string(),
        analysis_title: title.to_string(),
        submitted_ftp: format!("ftp.sra.ebi.ac.uk/vol1/{analysis}/data.vcf.gz"),
        submitted_bytes: "4096".to_string(),
        submitted_format: "VCF".to_string(),
        submitted_md5: "d41d8cd98f00b204e9800998ecf8427e".to_string(),
        ..RawRecord::default()
    }
}

#[test]
fn humanizer_examples() {
    assert_eq!(humanize_bytes(0), "0B");
    assert_eq!(humanize_bytes(1024), "1kB");
    assert_eq!(humanize_bytes(1536), "1.5kB");
    assert_eq!(humanize_bytes(1_073_741_824), "1GB");
}

#[test]
fn humanizer_always_uses_known_unit() {
    let mut bytes = 1u64;
    while bytes < u64::MAX / 3 {
        let text = humanize_bytes(bytes);
        let unit = text.trim_start_matches(|c: char| c.is_ascii_digit() || c == '.');
        assert!(UNITS.contains(&unit), "{text} has unexpected unit");
        let magnitude: f64 = text[..text.len() - unit.len()].parse().unwrap();
        assert!(magnitude >= 0.0);
        bytes = bytes * 3 + 1;
    }
}

#[test]
fn extractor_drops_sidecars_and_keeps_alignment() {
    let raw = RawRecord {
        submitted_ftp: "h/a.vcf.gz;h/a.vcf.gz.md5;h/b.vcf.gz".to_string(),
        submitted_bytes: "10;20;30".to_string(),
        submitted_format: "VCF;MD5;VCF".to_string(),
        submitted_md5: "c1;c2;c3".to_string(),
        ..RawRecord::default()
    };
    let bundle = extract_files(&raw, Transport::Ftp);
    assert_eq!(bundle.len(), 2);
    for list in [
        bundle.file_names(),
        bundle.file_types(),
        bundle.file_sizes(),
        bundle.checksum_methods(),
        bundle.checksums(),
        bundle.urls(),
    ] {
        assert_eq!(list.len(), 2);
    }
    assert_eq!(bundle.checksums(), ["c1", "c3"]);
}

#[test]
fn extractor_rejects_unequal_lists() {
    let raw = RawRecord {
        submitted_ftp: "h/a.vcf.gz;h/b.vcf.gz;h/c.vcf.gz".to_string(),
        submitted_bytes: "10;20".to_string(),
        submitted_format: "VCF;VCF;VCF".to_string(),
        submitted_md5: "c1;c2;c3".to_string(),
        ..RawRecord::default()
    };
    assert!(extract_files(&raw, Transport::Ftp).is_empty());
}

#[test]
fn ftp_wins_over_aspera() {
    let raw = RawRecord {
        submitted_aspera: "fasp.sra.ebi.ac.uk:/vol1/a.vcf.gz".to_string(),
        ..record("ERZ1", "S1", "t")
    };
    assert_eq!(raw.transport(), Some(Transport::Ftp));
}

#[test]
fn analysis_fold_is_not_idempotent() {
    let mut mapping = ResultMapping::new(ResultType::Analysis);
    let raw = record("ERZ1", "S1", "t");
    let summary = StudySummary::default();
    assert_eq!(mapping.fold(&raw, &summary), FoldOutcome::Created);
    assert_eq!(mapping.fold(&raw, &summary), FoldOutcome::Appended);
    let doc = mapping.as_analyses().unwrap().get("ERZ1").unwrap();
    assert_eq!(doc.sample_accessions, ["S1", "S1"]);
}

#[test]
fn analysis_title_is_first_seen() {
    let mut mapping = ResultMapping::new(ResultType::Analysis);
    let summary = StudySummary::default();
    mapping.fold(&record("ERZ1", "S1", "first title"), &summary);
    mapping.fold(&record("ERZ1", "S2", "second title"), &summary);
    let doc = mapping.as_analyses().unwrap().get("ERZ1").unwrap();
    assert_eq!(doc.title, "first title");
    assert_eq!(doc.sample_accessions, ["S1", "S2"]);
}

#[test]
fn specimen_fold_skips_record_without_files() {
    let mut mapping = ResultMapping::new(ResultType::Specimen);
    let raw = RawRecord {
        submitted_ftp: String::new(),
        ..record("ERZ1", "S1", "t")
    };
    assert_eq!(
        mapping.fold(&raw, &StudySummary::default()),
        FoldOutcome::Skipped(SkipReason::NoTransport)
    );
    assert!(mapping.is_empty());
}
