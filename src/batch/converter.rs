use crate::container::ContainerReader;
use crate::error::{OdfTextError, Result};
use crate::scanner::DocumentFile;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::Builder;

/// What happened to a single document during a batch run.
#[derive(Debug)]
pub enum ConversionOutcome {
    Converted { output: PathBuf, bytes: u64 },
    Skipped { output: PathBuf },
    Failed { error: OdfTextError },
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedConversion {
    pub file: String,
    pub message: String,
}

/// Running tally of a batch, returned once every document has been visited.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub total_files: usize,
    pub bytes_written: u64,
    pub output_dir: PathBuf,
    pub failures: Vec<FailedConversion>,
    #[serde(skip)]
    pub start_time: Instant,
}

impl ConversionSummary {
    pub fn new(total_files: usize, output_dir: PathBuf) -> Self {
        Self {
            converted: 0,
            skipped: 0,
            failed: 0,
            total_files,
            bytes_written: 0,
            output_dir,
            failures: Vec::new(),
            start_time: Instant::now(),
        }
    }

    pub fn record(&mut self, document: &DocumentFile, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { bytes, .. } => {
                self.converted += 1;
                self.bytes_written += bytes;
            }
            ConversionOutcome::Skipped { .. } => self.skipped += 1,
            ConversionOutcome::Failed { error } => {
                self.failed += 1;
                self.failures.push(FailedConversion {
                    file: document.filename.clone(),
                    message: error.to_string(),
                });
            }
        }
    }

    pub fn files_processed(&self) -> usize {
        self.converted + self.skipped + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Process exit status for this run: 2 when any document failed.
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            2
        } else {
            0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn display_line(&self) -> String {
        format!(
            "Done. converted={} skipped={} failed={} -> {}",
            self.converted,
            self.skipped,
            self.failed,
            self.output_dir.display()
        )
    }
}

pub struct BatchConverter {
    output_dir: PathBuf,
    overwrite: bool,
    extension: String,
}

impl BatchConverter {
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
            overwrite: false,
            extension: "txt".to_string(),
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_extension<S: Into<String>>(mut self, extension: S) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn target_path(&self, document: &DocumentFile) -> PathBuf {
        document.output_path(&self.output_dir, &self.extension)
    }

    /// Whether `document` would be left alone because its output already exists.
    pub fn would_skip(&self, document: &DocumentFile) -> bool {
        !self.overwrite && self.target_path(document).exists()
    }

    /// Convert every document, isolating failures to the file that caused them.
    ///
    /// The output directory must already exist.
    pub fn convert_all(
        &self,
        documents: &[DocumentFile],
        on_outcome: Option<&dyn Fn(&DocumentFile, &ConversionOutcome, &ConversionSummary)>,
    ) -> ConversionSummary {
        let mut summary = ConversionSummary::new(documents.len(), self.output_dir.clone());

        for document in documents {
            let outcome = self.convert_document(document);
            summary.record(document, &outcome);

            if let Some(callback) = on_outcome {
                callback(document, &outcome, &summary);
            }
        }

        summary
    }

    pub fn convert_document(&self, document: &DocumentFile) -> ConversionOutcome {
        let output = self.target_path(document);

        if output.exists() && !self.overwrite {
            log::debug!("{} exists, skipping {}", output.display(), document.filename);
            return ConversionOutcome::Skipped { output };
        }

        match self.render(document).and_then(|text| write_atomically(&output, &text)) {
            Ok(bytes) => ConversionOutcome::Converted { output, bytes },
            Err(error) => ConversionOutcome::Failed { error },
        }
    }

    /// Read a document and return its plain-text rendering.
    pub fn render(&self, document: &DocumentFile) -> Result<String> {
        let markup = ContainerReader::read_content(&document.source_path)?;
        log::debug!(
            "extracting {} ({}, {})",
            document.filename,
            document.kind,
            document.format_size()
        );
        document.kind.extract(&markup)
    }
}

/// Write `text` to `dest` through a temporary sibling so a failed write never
/// leaves a partial file behind.
fn write_atomically(dest: &Path, text: &str) -> Result<u64> {
    let write_error = |source: std::io::Error| OdfTextError::Write {
        path: dest.display().to_string(),
        source,
    };

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut builder = Builder::new();
    // Same mode as a plain fs::write; the process umask still applies
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder.tempfile_in(dir).map_err(write_error)?;

    // An overwritten output keeps its existing mode
    if let Ok(existing) = fs::metadata(dest) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?;
    }

    temp.write_all(text.as_bytes()).map_err(write_error)?;
    temp.flush().map_err(write_error)?;
    temp.persist(dest).map_err(|e| write_error(e.error))?;

    Ok(text.len() as u64)
}
