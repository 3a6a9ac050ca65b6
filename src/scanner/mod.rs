pub mod document_scanner;

pub use document_scanner::{DocumentFile, DocumentScanner, ScanStatistics};
