use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use faceverify_core::verification::infrastructure::temp_media::MediaUpload;
use faceverify_core::verification::verify_face_use_case::VerifyFaceUseCase;

use crate::api_error::ApiError;

pub const PROFILE_IMAGE_FIELD: &str = "profile_image";
pub const VIDEO_FIELD: &str = "video";

#[derive(Serialize, Debug)]
pub struct VerifyResponse {
    pub verified: bool,
}

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Builds the service router around a shared use case.
pub fn router(use_case: Arc<VerifyFaceUseCase>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/verify-face", post(verify_face))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(use_case)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn verify_face(
    State(use_case): State<Arc<VerifyFaceUseCase>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let (profile_image, video) = read_uploads(multipart?).await?;
    log::debug!(
        "Received profile image ({} bytes) and video ({} bytes)",
        profile_image.data.len(),
        video.data.len()
    );

    // Decoding and inference block; keep them off the async workers.
    let verdict = tokio::task::spawn_blocking(move || use_case.execute(profile_image, video))
        .await
        .map_err(|e| ApiError::Internal(format!("Verification task failed: {e}")))??;

    Ok(Json(VerifyResponse {
        verified: verdict.verified,
    }))
}

async fn read_uploads(mut multipart: Multipart) -> Result<(MediaUpload, MediaUpload), ApiError> {
    let mut profile_image = None;
    let mut video = None;

    while let Some(field) = multipart.next_field().await? {
        let slot = match field.name() {
            Some(PROFILE_IMAGE_FIELD) => &mut profile_image,
            Some(VIDEO_FIELD) => &mut video,
            _ => continue,
        };
        let file_name = field.file_name().map(str::to_owned);
        let data = field.bytes().await?;
        *slot = Some(MediaUpload::from_file_name(data.to_vec(), file_name.as_deref()));
    }

    let profile_image =
        profile_image.ok_or_else(|| ApiError::missing_field(PROFILE_IMAGE_FIELD))?;
    let video = video.ok_or_else(|| ApiError::missing_field(VIDEO_FIELD))?;
    Ok((profile_image, video))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use faceverify_core::encoding::domain::face_encoder::FaceEncoder;
    use faceverify_core::encoding::domain::face_encoding::FaceEncoding;
    use faceverify_core::encoding::infrastructure::cosine_comparator::CosineComparator;
    use faceverify_core::shared::frame::Frame;
    use faceverify_core::shared::video_metadata::VideoMetadata;
    use faceverify_core::verification::domain::verification_policy::{
        ReferenceFacePolicy, VerificationPolicy,
    };
    use faceverify_core::video::domain::video_reader::VideoReader;
    use serde_json::Value;
    use std::path::Path;
    use tower::ServiceExt;

    const BOUNDARY: &str = "faceverify-test-boundary";
    const IMAGE_WIDTH: u32 = 4;
    const VIDEO_WIDTH: u32 = 2;

    // --- Stubs ---

    /// Yields `count` blank frames; fails at `fail_at` if set.
    struct StubReader {
        width: u32,
        count: usize,
        fail_at: Option<usize>,
        next: usize,
    }

    impl VideoReader for StubReader {
        fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
            Ok(VideoMetadata {
                width: self.width,
                height: 2,
                fps: 30.0,
                total_frames: self.count,
                codec: "stub".to_string(),
                source_path: Some(path.to_path_buf()),
            })
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new(std::iter::from_fn(move || {
                if self.next >= self.count {
                    return None;
                }
                let index = self.next;
                self.next += 1;
                if self.fail_at == Some(index) {
                    return Some(Err("truncated stream".into()));
                }
                let len = (self.width * 2 * 3) as usize;
                Some(Ok(Frame::new(vec![0; len], self.width, 2, index)))
            }))
        }

        fn close(&mut self) {}
    }

    /// Reference faces for the profile image; a matching face on the listed
    /// video ordinals.
    struct ScriptedEncoder {
        reference_faces: usize,
        match_ordinals: Vec<usize>,
    }

    impl FaceEncoder for ScriptedEncoder {
        fn encode(&self, frame: &Frame) -> Result<Vec<FaceEncoding>, Box<dyn std::error::Error>> {
            if frame.width() == IMAGE_WIDTH {
                return Ok(vec![FaceEncoding::new(vec![1.0, 0.0]); self.reference_faces]);
            }
            if self.match_ordinals.contains(&frame.ordinal()) {
                Ok(vec![FaceEncoding::new(vec![1.0, 0.1])])
            } else {
                Ok(Vec::new())
            }
        }
    }

    struct Scenario {
        reference_faces: usize,
        video_frames: usize,
        match_ordinals: Vec<usize>,
        fail_at: Option<usize>,
        policy: VerificationPolicy,
        max_upload_bytes: usize,
    }

    impl Default for Scenario {
        fn default() -> Self {
            Self {
                reference_faces: 1,
                video_frames: 45,
                match_ordinals: Vec::new(),
                fail_at: None,
                policy: VerificationPolicy::default(),
                max_upload_bytes: 1024 * 1024,
            }
        }
    }

    fn app(s: Scenario) -> Router {
        let (video_frames, fail_at) = (s.video_frames, s.fail_at);
        let use_case = VerifyFaceUseCase::new(
            Box::new(|| {
                Box::new(StubReader {
                    width: IMAGE_WIDTH,
                    count: 1,
                    fail_at: None,
                    next: 0,
                }) as Box<dyn VideoReader>
            }),
            Box::new(move || {
                Box::new(StubReader {
                    width: VIDEO_WIDTH,
                    count: video_frames,
                    fail_at,
                    next: 0,
                }) as Box<dyn VideoReader>
            }),
            Box::new(ScriptedEncoder {
                reference_faces: s.reference_faces,
                match_ordinals: s.match_ordinals,
            }),
            Box::new(CosineComparator),
            s.policy,
        );
        router(Arc::new(use_case), s.max_upload_bytes)
    }

    // --- Request helpers ---

    fn multipart_body(parts: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, file_name, data) in parts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                     filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn verify_request(parts: &[(&str, &str, &str)]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/verify-face")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn both_files() -> Request<Body> {
        verify_request(&[
            (PROFILE_IMAGE_FIELD, "me.jpg", "jpeg bytes"),
            (VIDEO_FIELD, "clip.mp4", "video bytes"),
        ])
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_health() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(Scenario::default()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_face_in_three_sampled_frames_verifies() {
        let router = app(Scenario {
            match_ordinals: vec![10, 20, 30],
            ..Scenario::default()
        });
        let (status, body) = send(router, both_files()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "verified": true }));
    }

    #[tokio::test]
    async fn test_face_only_at_frame_ten_does_not_verify() {
        let router = app(Scenario {
            match_ordinals: vec![10],
            ..Scenario::default()
        });
        let (status, body) = send(router, both_files()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "verified": false }));
    }

    #[tokio::test]
    async fn test_no_reference_face_is_bad_request() {
        let router = app(Scenario {
            reference_faces: 0,
            match_ordinals: vec![10, 20, 30],
            ..Scenario::default()
        });
        let (status, body) = send(router, both_files()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({ "detail": "No face found in profile image." })
        );
    }

    #[tokio::test]
    async fn test_multiple_reference_faces_rejected_when_configured() {
        let router = app(Scenario {
            reference_faces: 2,
            policy: VerificationPolicy::new(10, 0.6, 3, ReferenceFacePolicy::RejectMultiple)
                .unwrap(),
            ..Scenario::default()
        });
        let (status, body) = send(router, both_files()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({ "detail": "Multiple faces found in profile image." })
        );
    }

    #[tokio::test]
    async fn test_decode_failure_is_internal_error() {
        let router = app(Scenario {
            fail_at: Some(12),
            ..Scenario::default()
        });
        let (status, body) = send(router, both_files()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("truncated stream"));
    }

    #[tokio::test]
    async fn test_empty_video_is_internal_error() {
        let request = verify_request(&[
            (PROFILE_IMAGE_FIELD, "me.jpg", "jpeg bytes"),
            (VIDEO_FIELD, "clip.mp4", ""),
        ]);
        let (status, body) = send(app(Scenario::default()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_faceless_profile_with_empty_video_is_bad_request() {
        let router = app(Scenario {
            reference_faces: 0,
            ..Scenario::default()
        });
        let request = verify_request(&[
            (PROFILE_IMAGE_FIELD, "blank.png", "png bytes"),
            (VIDEO_FIELD, "clip.mp4", ""),
        ]);
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({ "detail": "No face found in profile image." })
        );
    }

    #[tokio::test]
    async fn test_missing_video_field_is_unprocessable() {
        let request = verify_request(&[(PROFILE_IMAGE_FIELD, "me.jpg", "jpeg bytes")]);
        let (status, body) = send(app(Scenario::default()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            serde_json::json!({ "detail": "Missing required field: video" })
        );
    }

    #[tokio::test]
    async fn test_missing_profile_image_field_is_unprocessable() {
        let request = verify_request(&[(VIDEO_FIELD, "clip.mp4", "video bytes")]);
        let (status, _) = send(app(Scenario::default()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_fields_are_ignored() {
        let request = verify_request(&[
            ("note", "note.txt", "hello"),
            (PROFILE_IMAGE_FIELD, "me.jpg", "jpeg bytes"),
            (VIDEO_FIELD, "clip.mp4", "video bytes"),
        ]);
        let router = app(Scenario {
            match_ordinals: vec![10, 20, 30],
            ..Scenario::default()
        });
        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!({ "verified": true }));
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_unprocessable() {
        let request = Request::builder()
            .method("POST")
            .uri("/verify-face")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(app(Scenario::default()), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let router = app(Scenario {
            max_upload_bytes: 1024,
            ..Scenario::default()
        });
        let big = "x".repeat(4096);
        let request = verify_request(&[
            (PROFILE_IMAGE_FIELD, "me.jpg", "jpeg bytes"),
            (VIDEO_FIELD, "clip.mp4", big.as_str()),
        ]);
        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }
}
