use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Adapts a single image file to the [`VideoReader`] interface.
///
/// Treats the image as a one-frame video with `fps=0` and `total_frames=1`.
/// The format is sniffed from the file contents, so a PNG saved under a
/// `.jpg` name still decodes.
pub struct ImageFileReader {
    frame: Option<Frame>,
}

impl ImageFileReader {
    pub fn new() -> Self {
        Self { frame: None }
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for ImageFileReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        let reader = image::ImageReader::open(path)?.with_guessed_format()?;
        let format = reader.format();
        let rgb = reader.decode()?.into_rgb8();

        let (width, height) = rgb.dimensions();
        self.frame = Some(Frame::new(rgb.into_raw(), width, height, 0));

        Ok(VideoMetadata {
            width,
            height,
            fps: 0.0,
            total_frames: 1,
            codec: format
                .map(|f| format!("{f:?}").to_lowercase())
                .unwrap_or_default(),
            source_path: Some(path.to_path_buf()),
        })
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        match self.frame.take() {
            Some(frame) => Box::new(std::iter::once(Ok(frame))),
            None => Box::new(std::iter::once(Err("ImageFileReader: not opened".into()))),
        }
    }

    fn close(&mut self) {
        self.frame = None;
    }
}
