use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "odftext")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert .odt/.ods files to plain text")]
#[command(
    long_about = "odftext scans a directory for OpenDocument text documents and spreadsheets \
                  and writes a plain-text rendering of each one, so they can be read where \
                  rich document formats are not displayed."
)]
#[command(after_help = "EXAMPLES:\n  \
    odftext\n  \
    odftext --in minutes --out text --overwrite\n  \
    odftext --in reports --dry-run -v\n  \
    odftext --config odftext.toml --output-format json")]
pub struct Cli {
    /// Input directory (default: current directory)
    #[arg(long = "in", value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Output directory (default: text/)
    #[arg(long = "out", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Overwrite existing text outputs
    #[arg(long)]
    pub overwrite: bool,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List what would be converted or skipped without writing anything")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_input_dir(self.input.clone())
            .with_output_dir(self.output.clone())
            .with_overwrite(self.overwrite)
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
