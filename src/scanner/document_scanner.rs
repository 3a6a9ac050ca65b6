use crate::error::Result;
use crate::extractor::DocumentKind;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Clone)]
pub struct DocumentFile {
    pub source_path: PathBuf,
    pub filename: String,
    pub stem: String,
    pub kind: DocumentKind,
    pub size: u64,
}

impl DocumentFile {
    pub fn new(source_path: PathBuf, kind: DocumentKind, size: u64) -> Self {
        let filename = source_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let stem = source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        Self {
            source_path,
            filename,
            stem,
            kind,
            size,
        }
    }

    /// Path of the rendered text file for this document inside `output_dir`.
    pub fn output_path(&self, output_dir: &Path, extension: &str) -> PathBuf {
        output_dir.join(format!("{}.{}", self.stem, extension))
    }

    pub fn format_size(&self) -> String {
        format_bytes(self.size)
    }
}

/// Lists the OpenDocument files sitting directly inside a directory.
pub struct DocumentScanner;

impl DocumentScanner {
    pub fn new() -> Self {
        Self
    }

    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<DocumentFile>> {
        let root_path = root.as_ref();

        // A missing input directory simply holds no documents
        if !root_path.is_dir() {
            log::warn!("{} is not a directory, nothing to scan", root_path.display());
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();

        // Flat scan: subdirectories are not mirrored in the output
        let walker = WalkDir::new(root_path).min_depth(1).max_depth(1);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if let Some(document) = self.process_entry(&entry) {
                documents.push(document);
            }
        }

        // Case-insensitive name order keeps runs reproducible across platforms
        documents.sort_by(|a, b| {
            a.filename
                .to_lowercase()
                .cmp(&b.filename.to_lowercase())
                .then_with(|| a.filename.cmp(&b.filename))
        });

        log::debug!(
            "found {} candidate documents in {}",
            documents.len(),
            root_path.display()
        );

        Ok(documents)
    }

    fn process_entry(&self, entry: &DirEntry) -> Option<DocumentFile> {
        let path = entry.path();

        let kind = DocumentKind::from_path(path).ok()?;

        // Follows symlinks, so linked documents are picked up too
        let metadata = std::fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        Some(DocumentFile::new(path.to_path_buf(), kind, metadata.len()))
    }

    pub fn get_statistics(&self, documents: &[DocumentFile]) -> ScanStatistics {
        ScanStatistics {
            total_files: documents.len(),
            text_documents: documents
                .iter()
                .filter(|d| d.kind == DocumentKind::Text)
                .count(),
            spreadsheets: documents
                .iter()
                .filter(|d| d.kind == DocumentKind::Spreadsheet)
                .count(),
            total_size: documents.iter().map(|d| d.size).sum(),
        }
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub text_documents: usize,
    pub spreadsheets: usize,
    pub total_size: u64,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        format!(
            "Scan Results:\n  Total files: {}\n  Text documents: {}\n  Spreadsheets: {}\n  Total size: {}",
            self.total_files,
            self.text_documents,
            self.spreadsheets,
            format_bytes(self.total_size)
        )
    }
}

pub(crate) fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
