use std::net::SocketAddr;
use std::process;
use std::sync::Arc;

use clap::Parser;

use faceverify_core::detection::infrastructure::onnx_yolo_detector::OnnxYoloDetector;
use faceverify_core::encoding::infrastructure::arcface_embedder::ArcFaceEmbedder;
use faceverify_core::encoding::infrastructure::detecting_face_encoder::DetectingFaceEncoder;
use faceverify_core::encoding::infrastructure::cosine_comparator::CosineComparator;
use faceverify_core::shared::constants::{
    EMBEDDING_MODEL_NAME, EMBEDDING_MODEL_URL, YOLO_MODEL_NAME, YOLO_MODEL_URL,
};
use faceverify_core::shared::model_resolver::{self, ModelSource};
use faceverify_core::verification::domain::verification_policy::VerificationPolicy;
use faceverify_core::verification::verify_face_use_case::VerifyFaceUseCase;
use faceverify_core::video::domain::video_reader::VideoReader;
use faceverify_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use faceverify_core::video::infrastructure::image_file_reader::ImageFileReader;

use faceverify_server::app::router;
use faceverify_server::config::Cli;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    cli.validate()?;
    let policy = cli.policy()?;

    // Model resolution may download; do it before the runtime exists.
    let use_case = Arc::new(build_use_case(&cli, policy)?);
    let app = router(use_case, cli.max_upload_bytes());

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(serve(cli.bind, app))
}

fn build_use_case(
    cli: &Cli,
    policy: VerificationPolicy,
) -> Result<VerifyFaceUseCase, Box<dyn std::error::Error>> {
    let bundled = cli.model_dir.as_deref();

    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let detector_path = model_resolver::resolve(
        ModelSource {
            name: YOLO_MODEL_NAME,
            url: YOLO_MODEL_URL,
        },
        bundled,
    )?;
    log::info!("Resolving model: {EMBEDDING_MODEL_NAME}");
    let embedder_path = model_resolver::resolve(
        ModelSource {
            name: EMBEDDING_MODEL_NAME,
            url: EMBEDDING_MODEL_URL,
        },
        bundled,
    )?;

    let detector = OnnxYoloDetector::new(&detector_path, cli.confidence)?;
    let embedder = ArcFaceEmbedder::new(&embedder_path)?;
    let encoder = DetectingFaceEncoder::new(Box::new(detector), Box::new(embedder));

    log::info!(
        "Policy: every {} frames, tolerance {}, {} matches required, reference faces {:?}",
        policy.sample_interval(),
        policy.tolerance(),
        policy.match_threshold(),
        policy.reference_faces(),
    );

    Ok(VerifyFaceUseCase::new(
        Box::new(|| Box::new(ImageFileReader::new()) as Box<dyn VideoReader>),
        Box::new(|| Box::new(FfmpegReader::new()) as Box<dyn VideoReader>),
        Box::new(encoder),
        Box::new(CosineComparator),
        policy,
    ))
}

async fn serve(addr: SocketAddr, app: axum::Router) -> Result<(), Box<dyn std::error::Error>> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
