use serde::Serialize;

use crate::domain::Transport;
use crate::record::RawRecord;
use crate::size::humanize_str;

/// ENA only publishes MD5 checksums for submitted files.
pub const CHECKSUM_METHOD: &str = "md5";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub file_type: String,
    pub size: String,
    pub checksum_method: String,
    pub checksum: String,
    pub url: String,
}

/// Index-aligned file columns as they appear in output documents.
///
/// Entries only enter through [`FileBundle::push`], so all six lists always
/// have the same length. An empty bundle serializes to nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileBundle {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    file_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    file_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    file_sizes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksum_methods: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    checksums: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    urls: Vec<String>,
}

impl FileBundle {
    pub fn push(&mut self, file: FileDescriptor) {
        self.file_names.push(file.name);
        self.file_types.push(file.file_type);
        self.file_sizes.push(file.size);
        self.checksum_methods.push(file.checksum_method);
        self.checksums.push(file.checksum);
        self.urls.push(file.url);
    }

    pub fn len(&self) -> usize {
        self.file_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_names.is_empty()
    }

    pub fn file_names(&self) -> &[String] {
        &self.file_names
    }

    pub fn file_types(&self) -> &[String] {
        &self.file_types
    }

    pub fn file_sizes(&self) -> &[String] {
        &self.file_sizes
    }

    pub fn checksum_methods(&self) -> &[String] {
        &self.checksum_methods
    }

    pub fn checksums(&self) -> &[String] {
        &self.checksums
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl FromIterator<FileDescriptor> for FileBundle {
    fn from_iter<I: IntoIterator<Item = FileDescriptor>>(iter: I) -> Self {
        let mut bundle = FileBundle::default();
        for file in iter {
            bundle.push(file);
        }
        bundle
    }
}

/// Splits the record's semicolon-joined file columns into per-file entries.
///
/// Returns `None` when the transport column is blank, the path, size, format
/// and checksum lists differ in length, or a size is not a byte count.
/// Checksum sidecars (`*.md5`) are left out.
pub fn file_descriptors(record: &RawRecord, transport: Transport) -> Option<Vec<FileDescriptor>> {
    let joined = record.submitted_paths(transport);
    if joined.trim().is_empty() {
        return None;
    }
    let paths: Vec<&str> = joined.split(';').collect();
    let sizes: Vec<&str> = record.submitted_bytes.split(';').collect();
    let formats: Vec<&str> = record.submitted_format.split(';').collect();
    let checksums: Vec<&str> = record.submitted_md5.split(';').collect();

    let count = paths.len();
    if sizes.len() != count || formats.len() != count || checksums.len() != count {
        return None;
    }

    let mut files = Vec::with_capacity(count);
    for (i, &path) in paths.iter().enumerate() {
        let name = path.rsplit('/').next().unwrap_or(path);
        let suffix = name.rsplit('.').next().unwrap_or(name);
        if suffix == CHECKSUM_METHOD {
            continue;
        }
        files.push(FileDescriptor {
            name: name.to_string(),
            file_type: formats[i].to_lowercase(),
            size: humanize_str(sizes[i])?,
            checksum_method: CHECKSUM_METHOD.to_string(),
            checksum: checksums[i].to_string(),
            url: path.to_string(),
        });
    }
    Some(files)
}

/// Bundle form of [`file_descriptors`]; empty when the record cannot be parsed.
pub fn extract_files(record: &RawRecord, transport: Transport) -> FileBundle {
    file_descriptors(record, transport)
        .map(FileBundle::from_iter)
        .unwrap_or_default()
}
