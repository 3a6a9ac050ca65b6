use crate::batch::ConversionSummary;
use crate::error::{OdfTextError, UserFriendlyError};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "+ ");
static CROSS: Emoji = Emoji("❌ ", "x ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods

    /// Errors go to stderr in every mode and are never silenced.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_error(message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(2) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("  {}", style(message).dim());
                    } else {
                        println!("  DEBUG: {}", message);
                    }
                }
                OutputMode::Json => self.print_json_message("debug", message),
                OutputMode::Plain => println!("DEBUG: {}", message),
            }
        }
    }

    /// Report a document that could not be converted.
    pub fn file_error(&self, filename: &str, error: &OdfTextError) {
        self.error(&format!("{}: {}", filename, error));
    }

    pub fn print_user_friendly_error(&self, error: &OdfTextError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    eprintln!(
                        "{}",
                        serde_json::json!({ "type": "suggestion", "message": suggestion })
                    );
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    // Summary and reporting
    pub fn print_no_documents(&self, input_dir: &std::path::Path) {
        let message = format!("No .odt/.ods files found in: {}", input_dir.display());
        match self.mode {
            OutputMode::Json => self.print_json_object(&serde_json::json!({
                "type": "summary",
                "converted": 0,
                "skipped": 0,
                "failed": 0,
                "input_dir": input_dir.display().to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            _ => {
                if !self.quiet {
                    println!("{}", message);
                }
            }
        }
    }

    pub fn print_batch_summary(&self, summary: &ConversionSummary) {
        match self.mode {
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Json => self.print_json_summary(summary),
            OutputMode::Plain => {
                if !self.quiet {
                    println!("{}", summary.display_line());
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => println!("{}", "-".repeat(60)),
            OutputMode::Json => {} // No separator in JSON mode
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            match msg_type {
                MessageType::Error => eprintln!("ERROR: {}", message),
                MessageType::Info => println!("{}", message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_error(&self, message: &str) {
        let obj = serde_json::json!({
            "type": "message",
            "level": "error",
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });
        eprintln!(
            "{}",
            serde_json::to_string(&obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_summary(&self, summary: &ConversionSummary) {
        if self.quiet {
            return;
        }

        if self.verbose_level > 0 {
            println!(
                "  Time taken: {}  Bytes written: {}",
                format_duration(summary.elapsed()),
                summary.bytes_written
            );
        }

        let line = summary.display_line();
        if !self.use_colors {
            println!("{}", line);
        } else if summary.has_failures() {
            println!("{}{}", WARNING, style(line).yellow().bold());
        } else {
            println!("{}{}", CHECKMARK, style(line).green().bold());
        }
    }

    fn print_json_summary(&self, summary: &ConversionSummary) {
        let mut value = serde_json::to_value(summary).unwrap_or_else(|_| serde_json::json!({}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("type".to_string(), serde_json::json!("summary"));
            obj.insert(
                "duration_ms".to_string(),
                serde_json::json!(summary.elapsed().as_millis() as u64),
            );
            obj.insert(
                "timestamp".to_string(),
                serde_json::json!(chrono::Utc::now().to_rfc3339()),
            );
        }

        self.print_json_object(&value);
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Info,
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatter_creation() {
        let formatter = OutputFormatter::new(OutputMode::Plain, 1, false);
        assert_eq!(formatter.mode, OutputMode::Plain);
        assert_eq!(formatter.verbose_level, 1);
        assert!(!formatter.use_colors);
    }

    #[test]
    fn test_quiet_mode() {
        let formatter = OutputFormatter::new(OutputMode::Human, 2, true);
        assert_eq!(formatter.verbose_level, 0);
        assert!(!formatter.should_show_message(0));
    }

    #[test]
    fn test_should_show_message() {
        let formatter = OutputFormatter::new(OutputMode::Human, 1, false);
        assert!(formatter.should_show_message(0));
        assert!(formatter.should_show_message(1));
        assert!(!formatter.should_show_message(2));
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_secs(30)), "30s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }
}
