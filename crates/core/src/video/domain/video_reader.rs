use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// Reads frames from a video or image source.
///
/// Implementations handle I/O details (codec, container format, pixel
/// format conversion) while the verification logic works with the abstract
/// `Frame` and `VideoMetadata` types.
pub trait VideoReader: Send {
    /// Opens a video or image file and returns its metadata.
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in decode order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the reader. Must be idempotent.
    fn close(&mut self);
}

/// Builds a fresh reader per request; readers hold per-file decoder state.
pub type ReaderFactory = Box<dyn Fn() -> Box<dyn VideoReader> + Send + Sync>;

/// An opened reader that is closed when dropped, on every exit path.
pub struct OpenReader<'a> {
    reader: &'a mut dyn VideoReader,
    metadata: VideoMetadata,
}

impl<'a> OpenReader<'a> {
    pub fn open(
        reader: &'a mut dyn VideoReader,
        path: &Path,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        match reader.open(path) {
            Ok(metadata) => Ok(Self { reader, metadata }),
            Err(e) => {
                reader.close();
                Err(e)
            }
        }
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        self.reader.frames()
    }
}

impl Drop for OpenReader<'_> {
    fn drop(&mut self) {
        self.reader.close();
    }
}
