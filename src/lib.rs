pub mod batch;
pub mod cli;
pub mod config;
pub mod container;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{BatchConfig, CliOverrides, Config, OutputConfig};
pub use error::{OdfTextError, Result, UserFriendlyError};

// Core functionality re-exports
pub use batch::{BatchConverter, ConversionOutcome, ConversionSummary, FailedConversion};
pub use container::ContainerReader;
pub use extractor::{
    ContentExtractor, DocumentKind, SpreadsheetExtractor, TextDocumentExtractor,
};
pub use scanner::{DocumentFile, DocumentScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Result of a batch run as seen by the caller.
#[derive(Debug)]
pub enum BatchReport {
    /// The input directory held no convertible documents.
    NoDocuments { input_dir: PathBuf },
    Completed(ConversionSummary),
}

impl BatchReport {
    pub fn exit_code(&self) -> i32 {
        match self {
            BatchReport::NoDocuments { .. } => 0,
            BatchReport::Completed(summary) => summary.exit_code(),
        }
    }
}

/// Main library interface for odftext functionality
pub struct OdfText {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl OdfText {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Convert every document in the configured input directory.
    ///
    /// Per-document failures are reported and tallied in the returned
    /// summary; only problems with the directories themselves are errors.
    pub fn convert_directory(&self) -> Result<BatchReport> {
        let input_dir = &self.config.batch.input_dir;
        let converter = self.create_converter()?;

        let documents = self.scan_documents(input_dir)?;
        let input_dir = absolute_path(input_dir);

        if documents.is_empty() {
            self.output_formatter.print_no_documents(&input_dir);
            return Ok(BatchReport::NoDocuments { input_dir });
        }

        self.output_formatter
            .info(&format!("Found {} documents to convert", documents.len()));

        let file_progress = self
            .progress_manager
            .create_file_progress(documents.len() as u64);

        let on_outcome = |document: &DocumentFile,
                          outcome: &ConversionOutcome,
                          summary: &ConversionSummary| {
            ui::progress::update_file_progress(&file_progress, summary, &document.filename);
            self.progress_manager
                .suspend(|| self.report_outcome(document, outcome));
        };

        let summary = converter.convert_all(&documents, Some(&on_outcome));

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("Processed {} files", summary.files_processed()),
            summary.elapsed(),
        );

        self.output_formatter.print_batch_summary(&summary);

        Ok(BatchReport::Completed(summary))
    }

    /// Describe what a run would do without writing anything.
    pub fn plan(&self) -> Result<Vec<(DocumentFile, PathBuf, bool)>> {
        let converter = self.build_converter(self.config.batch.output_dir.clone());
        let documents = self.scan_documents(&self.config.batch.input_dir)?;

        Ok(documents
            .into_iter()
            .map(|document| {
                let target = converter.target_path(&document);
                let skip = converter.would_skip(&document);
                (document, target, skip)
            })
            .collect())
    }

    fn scan_documents(&self, input_dir: &Path) -> Result<Vec<DocumentFile>> {
        let scanner = DocumentScanner::new();
        let documents = scanner.scan_directory(input_dir)?;

        self.output_formatter
            .debug(&scanner.get_statistics(&documents).display_summary());

        Ok(documents)
    }

    /// Build the converter and make sure the output directory exists.
    fn create_converter(&self) -> Result<BatchConverter> {
        let output_dir = &self.config.batch.output_dir;
        std::fs::create_dir_all(output_dir).map_err(|e| OdfTextError::Write {
            path: output_dir.display().to_string(),
            source: e,
        })?;

        Ok(self.build_converter(absolute_path(output_dir)))
    }

    fn build_converter(&self, output_dir: PathBuf) -> BatchConverter {
        BatchConverter::new(output_dir)
            .with_overwrite(self.config.batch.overwrite)
            .with_extension(self.config.output.extension.clone())
    }

    fn report_outcome(&self, document: &DocumentFile, outcome: &ConversionOutcome) {
        match outcome {
            ConversionOutcome::Converted { output, bytes } => {
                self.output_formatter.debug(&format!(
                    "{} -> {} ({} bytes)",
                    document.filename,
                    output.display(),
                    bytes
                ));
            }
            ConversionOutcome::Skipped { output } => {
                self.output_formatter.info(&format!(
                    "Skipped {} ({} already exists)",
                    document.filename,
                    output.display()
                ));
            }
            ConversionOutcome::Failed { error } => {
                log::debug!("conversion of {} failed: {:?}", document.filename, error);
                self.output_formatter.file_error(&document.filename, error);
            }
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &OdfTextError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

fn absolute_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{OFFICE_NS, TEXT_NS};
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_odt(path: &Path, paragraphs: &[&str]) {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<text:p>{}</text:p>", p))
            .collect();
        let markup = format!(
            r#"<office:document-content xmlns:office="{OFFICE_NS}" xmlns:text="{TEXT_NS}"><office:body><office:text>{body}</office:text></office:body></office:document-content>"#
        );

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("content.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(markup.as_bytes()).unwrap();
        std::fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
    }

    fn quiet_instance(input: &Path, output: &Path, overwrite: bool) -> OdfText {
        let mut config = Config::default();
        config.batch.input_dir = input.to_path_buf();
        config.batch.output_dir = output.to_path_buf();
        config.batch.overwrite = overwrite;
        OdfText::new(config, OutputMode::Plain, 0, true)
    }

    #[test]
    fn test_convert_directory_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out").join("nested");
        std::fs::create_dir(&input).unwrap();
        write_odt(&input.join("a.odt"), &["Hello", "Hello", "World"]);
        std::fs::write(input.join("b.ods"), b"corrupt").unwrap();

        let report = quiet_instance(&input, &output, false)
            .convert_directory()
            .unwrap();

        match &report {
            BatchReport::Completed(summary) => {
                assert_eq!(summary.converted, 1);
                assert_eq!(summary.failed, 1);
                assert_eq!(summary.skipped, 0);
                assert!(summary.output_dir.is_absolute());
            }
            other => panic!("unexpected report: {other:?}"),
        }
        assert_eq!(report.exit_code(), 2);
        assert_eq!(
            std::fs::read_to_string(output.join("a.txt")).unwrap(),
            "Hello\n\nWorld\n"
        );
    }

    #[test]
    fn test_second_run_skips() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path();
        let output = input.join("text");
        write_odt(&input.join("a.odt"), &["Once"]);

        let app = quiet_instance(input, &output, false);
        app.convert_directory().unwrap();

        match app.convert_directory().unwrap() {
            BatchReport::Completed(summary) => {
                assert_eq!(summary.skipped, 1);
                assert_eq!(summary.converted, 0);
                assert_eq!(summary.exit_code(), 0);
            }
            other => panic!("unexpected report: {other:?}"),
        }
    }

    #[test]
    fn test_no_documents_succeeds_and_creates_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("text");

        let report = quiet_instance(temp_dir.path(), &output, false)
            .convert_directory()
            .unwrap();

        assert!(matches!(report, BatchReport::NoDocuments { .. }));
        assert_eq!(report.exit_code(), 0);
        assert!(output.is_dir());
    }

    #[test]
    fn test_missing_input_directory_has_no_documents() {
        let temp_dir = TempDir::new().unwrap();
        let app = quiet_instance(
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("text"),
            false,
        );

        let report = app.convert_directory().unwrap();
        assert!(matches!(report, BatchReport::NoDocuments { .. }));
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_plan_reports_skip_decisions() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path();
        let output = input.join("text");
        std::fs::create_dir(&output).unwrap();
        write_odt(&input.join("a.odt"), &["x"]);
        write_odt(&input.join("b.odt"), &["y"]);
        std::fs::write(output.join("a.txt"), "old").unwrap();

        let plan = quiet_instance(input, &output, false).plan().unwrap();

        assert_eq!(plan.len(), 2);
        assert!(plan[0].2);
        assert!(!plan[1].2);
        assert_eq!(plan[1].1, output.join("b.txt"));
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        OdfText::generate_sample_config(&config_path).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[batch]"));
        assert!(content.contains("[output]"));
    }
}
