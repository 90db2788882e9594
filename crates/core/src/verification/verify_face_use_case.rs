use std::path::Path;

use crate::encoding::domain::face_comparator::FaceComparator;
use crate::encoding::domain::face_encoder::FaceEncoder;
use crate::encoding::domain::face_encoding::FaceEncoding;
use crate::shared::constants::{DEFAULT_IMAGE_EXTENSION, DEFAULT_VIDEO_EXTENSION};
use crate::video::domain::video_reader::{OpenReader, ReaderFactory};

use super::domain::frame_sampler::FrameSampler;
use super::domain::match_tally::{MatchTally, Verdict};
use super::domain::verification_error::VerificationError;
use super::domain::verification_policy::{ReferenceFacePolicy, VerificationPolicy};
use super::infrastructure::temp_media::{MediaUpload, TempMedia};

/// Decides whether the face in a profile image appears in a video.
///
/// Holds no per-request state: each call to `execute` builds fresh readers
/// from the factories, so one instance can serve concurrent requests.
/// Temporary files and decoders are released before `execute` returns, on
/// every path.
pub struct VerifyFaceUseCase {
    image_reader: ReaderFactory,
    video_reader: ReaderFactory,
    encoder: Box<dyn FaceEncoder>,
    comparator: Box<dyn FaceComparator>,
    policy: VerificationPolicy,
}

impl VerifyFaceUseCase {
    pub fn new(
        image_reader: ReaderFactory,
        video_reader: ReaderFactory,
        encoder: Box<dyn FaceEncoder>,
        comparator: Box<dyn FaceComparator>,
        policy: VerificationPolicy,
    ) -> Self {
        Self {
            image_reader,
            video_reader,
            encoder,
            comparator,
            policy,
        }
    }

    pub fn execute(
        &self,
        profile_image: MediaUpload,
        video: MediaUpload,
    ) -> Result<Verdict, VerificationError> {
        if profile_image.is_empty() {
            return Err(VerificationError::EmptyUpload("profile_image"));
        }

        // Reference face problems are reported before the video is inspected.
        let image_file = TempMedia::persist(&profile_image, DEFAULT_IMAGE_EXTENSION)?;
        let reference = self.reference_encoding(image_file.path());
        release(image_file);
        let reference = reference?;

        if video.is_empty() {
            return Err(VerificationError::EmptyUpload("video"));
        }
        let video_file = TempMedia::persist(&video, DEFAULT_VIDEO_EXTENSION)?;
        let result = self.scan_video(video_file.path(), &reference);
        release(video_file);

        let tally = result?;
        let verdict = Verdict::decide(tally, self.policy.match_threshold());
        log::info!(
            "Verification finished: verified={} matched={}/{} sampled, {} frames decoded",
            verdict.verified,
            tally.matched_frames,
            tally.sampled_frames,
            tally.total_frames,
        );
        Ok(verdict)
    }

    fn reference_encoding(&self, path: &Path) -> Result<FaceEncoding, VerificationError> {
        let mut reader = (self.image_reader)();
        let mut open = OpenReader::open(reader.as_mut(), path)
            .map_err(|e| VerificationError::Decode(format!("profile image: {e}")))?;
        let frame = open
            .frames()
            .next()
            .ok_or_else(|| VerificationError::Decode("profile image has no frames".into()))?
            .map_err(|e| VerificationError::Decode(format!("profile image: {e}")))?;

        let encodings = self
            .encoder
            .encode(&frame)
            .map_err(|e| VerificationError::Inference(e.to_string()))?;
        let count = encodings.len();
        let Some(reference) = encodings.into_iter().next() else {
            return Err(VerificationError::NoReferenceFace);
        };
        if count > 1 {
            match self.policy.reference_faces() {
                ReferenceFacePolicy::RejectMultiple => {
                    return Err(VerificationError::MultipleReferenceFaces(count));
                }
                ReferenceFacePolicy::First => {
                    log::debug!("{count} faces in profile image, using the most confident");
                }
            }
        }
        Ok(reference)
    }

    fn scan_video(
        &self,
        path: &Path,
        reference: &FaceEncoding,
    ) -> Result<MatchTally, VerificationError> {
        let mut reader = (self.video_reader)();
        let mut open = OpenReader::open(reader.as_mut(), path)
            .map_err(|e| VerificationError::Decode(format!("video: {e}")))?;
        let meta = open.metadata();
        log::debug!(
            "Video: {}x{} @ {:.2} fps, {} frames ({})",
            meta.width,
            meta.height,
            meta.fps,
            meta.total_frames,
            meta.codec,
        );

        let tolerance = self.policy.tolerance();
        let mut sampler = FrameSampler::new(self.policy.sample_interval());
        let mut tally = MatchTally::default();

        for item in open.frames() {
            let frame = item.map_err(|e| VerificationError::Decode(format!("video: {e}")))?;
            if !sampler.admit() {
                continue;
            }
            let faces = self
                .encoder
                .encode(&frame)
                .map_err(|e| VerificationError::Inference(e.to_string()))?;
            let matched = faces
                .iter()
                .any(|face| self.comparator.matches(reference, face, tolerance));
            log::debug!(
                "Frame {}: {} face(s), matched={matched}",
                frame.ordinal(),
                faces.len()
            );
            tally.record_sampled(matched);
        }

        tally.total_frames = sampler.seen();
        Ok(tally)
    }
}

fn release(media: TempMedia) {
    let path = media.path().to_path_buf();
    if let Err(e) = media.remove() {
        log::warn!("Failed to remove temporary file {}: {e}", path.display());
    }
}
