/// ArcFace face embedder using ONNX Runtime (w600k_r50, 512-d output).
use std::path::Path;
use std::sync::Mutex;

use image::imageops::FilterType;

use crate::detection::infrastructure::execution_provider::build_session;
use crate::encoding::domain::face_embedder::FaceEmbedder;
use crate::encoding::domain::face_encoding::FaceEncoding;

const INPUT_SIZE: u32 = 112;
const NORM_MEAN: f32 = 127.5;
const NORM_STD: f32 = 127.5;

pub struct ArcFaceEmbedder {
    session: Mutex<ort::session::Session>,
}

impl ArcFaceEmbedder {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = build_session(model_path)?;
        log::info!("Loaded ArcFace model {}", model_path.display());
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl FaceEmbedder for ArcFaceEmbedder {
    fn embed(&self, face: &image::RgbImage) -> Result<FaceEncoding, Box<dyn std::error::Error>> {
        if face.width() == 0 || face.height() == 0 {
            return Err("Cannot embed an empty face crop".into());
        }
        let tensor = preprocess(face);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        let embedding_array = outputs[0].try_extract_array::<f32>()?;
        let embedding_slice = embedding_array
            .as_slice()
            .ok_or("Cannot get embedding slice")?;

        let mut embedding = embedding_slice.to_vec();
        l2_normalize(&mut embedding);
        Ok(FaceEncoding::new(embedding))
    }
}

/// Resize crop to 112x112, normalize to [-1, 1], NCHW layout.
fn preprocess(face: &image::RgbImage) -> ndarray::Array4<f32> {
    let resized = image::imageops::resize(face, INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
    let size = INPUT_SIZE as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, size, size));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = (pixel.0[c] as f32 - NORM_MEAN) / NORM_STD;
        }
    }
    tensor
}

pub fn l2_normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}
