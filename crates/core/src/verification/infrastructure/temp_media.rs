use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::shared::constants::TEMP_FILE_PREFIX;

/// An uploaded file as received: raw bytes plus the extension of its
/// original file name, if any.
#[derive(Clone, Debug, Default)]
pub struct MediaUpload {
    pub data: Vec<u8>,
    pub extension: Option<String>,
}

impl MediaUpload {
    pub fn new(data: Vec<u8>, extension: Option<String>) -> Self {
        Self { data, extension }
    }

    /// Takes the extension from an uploaded file name, e.g. `"clip.MOV"`.
    pub fn from_file_name(data: Vec<u8>, file_name: Option<&str>) -> Self {
        let extension = file_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(str::to_ascii_lowercase);
        Self { data, extension }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A request-scoped file on disk. The file is removed when this is dropped.
pub struct TempMedia {
    file: NamedTempFile,
}

impl TempMedia {
    pub fn persist(upload: &MediaUpload, default_extension: &str) -> std::io::Result<Self> {
        let extension = upload.extension.as_deref().unwrap_or(default_extension);
        let suffix = format!(".{extension}");
        let mut file = tempfile::Builder::new()
            .prefix(TEMP_FILE_PREFIX)
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&upload.data)?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Deletes the file now, reporting failure instead of swallowing it.
    pub fn remove(self) -> std::io::Result<()> {
        self.file.close()
    }
}
