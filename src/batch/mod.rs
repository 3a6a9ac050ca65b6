pub mod converter;

pub use converter::{BatchConverter, ConversionOutcome, ConversionSummary, FailedConversion};
