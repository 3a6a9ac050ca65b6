use crate::error::{OdfTextError, Result};
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

/// Archive entry holding the document body markup.
pub const CONTENT_ENTRY: &str = "content.xml";

// Upper bound on the preallocation taken from the declared entry size
const MAX_SIZE_HINT: u64 = 1 << 20;

/// Reads the content markup out of an OpenDocument zip container.
pub struct ContainerReader;

impl ContainerReader {
    /// Open the container at `path` and return its decoded content markup.
    ///
    /// The archive is closed before this returns, on success and on error.
    pub fn read_content<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let file = File::open(path)?;

        Self::read_content_from(file).map_err(|e| match e {
            OdfTextError::MissingContent { entry, .. } => OdfTextError::MissingContent {
                path: path.display().to_string(),
                entry,
            },
            other => other,
        })
    }

    /// Same as [`ContainerReader::read_content`] over any seekable source.
    pub fn read_content_from<R: Read + Seek>(reader: R) -> Result<String> {
        let mut archive = ZipArchive::new(reader)?;

        let mut entry = match archive.by_name(CONTENT_ENTRY) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(OdfTextError::MissingContent {
                    path: "<container>".to_string(),
                    entry: CONTENT_ENTRY.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        // The declared size comes from the file itself and may be forged
        let mut bytes = Vec::with_capacity(entry.size().min(MAX_SIZE_HINT) as usize);
        entry.read_to_end(&mut bytes)?;

        log::debug!("read {} bytes of {}", bytes.len(), CONTENT_ENTRY);

        Ok(decode_markup(&bytes))
    }
}

/// Decode markup bytes as UTF-8, replacing invalid sequences and dropping a BOM.
fn decode_markup(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text.into_owned(),
    }
}
