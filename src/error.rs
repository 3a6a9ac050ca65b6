use thiserror::Error;

#[derive(Error, Debug)]
pub enum OdfTextError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a readable OpenDocument container: {message}")]
    Archive {
        message: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Container has no {entry} entry: {path}")]
    MissingContent { path: String, entry: String },

    #[error("Malformed document markup: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("Unsupported file type: {name}")]
    UnsupportedType { name: String },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for OdfTextError {
    fn user_message(&self) -> String {
        match self {
            OdfTextError::Archive { message, .. } => {
                format!("Could not open document container: {}", message)
            }
            OdfTextError::MissingContent { path, entry } => {
                format!("Document {} does not contain {}", path, entry)
            }
            OdfTextError::Parse(e) => {
                format!("Document markup is not well-formed: {}", e)
            }
            OdfTextError::UnsupportedType { name } => {
                format!("Unsupported file type: {}", name)
            }
            OdfTextError::Write { path, source } => {
                format!("Could not write {}: {}", path, source)
            }
            OdfTextError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            OdfTextError::Archive { .. } | OdfTextError::MissingContent { .. } => Some(
                "Check that the file is an OpenDocument file saved by an office suite and is not truncated.".to_string()
            ),
            OdfTextError::UnsupportedType { .. } => Some(
                "Only .odt (text) and .ods (spreadsheet) files are converted.".to_string()
            ),
            OdfTextError::Write { .. } => Some(
                "Ensure the output directory is writable and the disk is not full.".to_string()
            ),
            OdfTextError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all values are valid.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for OdfTextError {
    fn from(error: zip::result::ZipError) -> Self {
        OdfTextError::Archive {
            message: error.to_string(),
            source: error,
        }
    }
}

pub type Result<T> = std::result::Result<T, OdfTextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_friendly_messages() {
        let error = OdfTextError::UnsupportedType {
            name: "slides.odp".to_string(),
        };
        assert!(error.user_message().contains("slides.odp"));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_zip_error_conversion() {
        let zip_error = zip::result::ZipError::FileNotFound;
        let error = OdfTextError::from(zip_error);
        assert!(matches!(error, OdfTextError::Archive { .. }));
        assert!(error.suggestion().is_some());
    }

    #[test]
    fn test_parse_error_conversion() {
        let parse_error = roxmltree::Document::parse("<a><b></a>").err().unwrap();
        let error = OdfTextError::from(parse_error);
        assert!(matches!(error, OdfTextError::Parse(_)));
        assert!(error.user_message().contains("not well-formed"));
    }

    #[test]
    fn test_io_error_has_no_suggestion() {
        let error = OdfTextError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert!(error.suggestion().is_none());
        assert!(error.user_message().contains("boom"));
    }
}
