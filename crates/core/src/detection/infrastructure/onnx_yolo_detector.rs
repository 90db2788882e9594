/// YOLO face detector using ONNX Runtime via `ort`.
///
/// Handles letterbox preprocessing, inference and NMS post-processing.
use std::path::Path;
use std::sync::Mutex;

use crate::detection::domain::face_box::FaceBox;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_landmarks::FaceLandmarks;
use crate::detection::infrastructure::execution_provider::build_session;
use crate::detection::infrastructure::math::nms;
use crate::shared::frame::Frame;

/// Fallback YOLO model input resolution when the model doesn't specify dimensions.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// Default confidence threshold for face detection.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Keypoint values per detection: 5 landmarks as (x, y, conf).
const NUM_KEYPOINT_VALUES: usize = 15;

/// Keypoints below this confidence are left at (0, 0), i.e. not visible.
const KEYPOINT_CONF_THRESH: f64 = 0.5;

/// Letterbox fill value (114/255 gray, YOLO convention).
const PAD_VALUE: f32 = 114.0 / 255.0;

/// YOLO face detector backed by an ONNX Runtime session.
pub struct OnnxYoloDetector {
    session: Mutex<ort::session::Session>,
    confidence: f64,
    input_size: u32,
}

impl OnnxYoloDetector {
    /// Load a YOLO ONNX model and prepare for inference.
    ///
    /// The input resolution is read from the model's input shape (expecting NCHW).
    /// Falls back to 640 if the shape is dynamic or unreadable.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = build_session(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { shape, .. } if shape.len() >= 4 && shape[2] > 0 => {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Loaded YOLO face model {} (input {input_size}px, confidence {confidence})",
            model_path.display()
        );

        Ok(Self {
            session: Mutex::new(session),
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxYoloDetector {
    fn detect(&self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let (input_tensor, letterboxed) = letterbox(frame, self.input_size);
        let input_value = ort::value::Tensor::from_array(input_tensor)?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Lock poisoned: {e}"))?;
        let outputs = session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("YOLO model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("Unexpected YOLO output shape: {shape:?}").into());
        }
        let data = tensor.as_slice().ok_or("Cannot get tensor slice")?;

        let boxes = parse_detections(
            data,
            &shape,
            self.confidence,
            &letterboxed,
            frame.width(),
            frame.height(),
        );
        Ok(nms(boxes, NMS_IOU_THRESH))
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Mapping between letterbox and frame coordinates.
struct Letterbox {
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

/// Letterbox-resize a frame to `target_size` × `target_size`, NCHW float32.
fn letterbox(frame: &Frame, target_size: u32) -> (ndarray::Array4<f32>, Letterbox) {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let mut tensor = ndarray::Array4::<f32>::from_elem(
        (1, 3, target_size as usize, target_size as usize),
        PAD_VALUE,
    );

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;

    // Nearest-neighbor resize into the padded region
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            let ty = pad_y as usize + y;
            let tx = pad_x as usize + x;
            for c in 0..3 {
                tensor[[0, c, ty, tx]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    (
        tensor,
        Letterbox {
            scale,
            pad_x,
            pad_y,
        },
    )
}

// ---------------------------------------------------------------------------
// Postprocessing
// ---------------------------------------------------------------------------

/// Decodes raw YOLO rows into frame-space boxes above `confidence`.
///
/// Output is `[1, features, detections]` (transposed export) or
/// `[1, detections, features]`; rows are `[cx, cy, w, h, conf, keypoints...]`.
fn parse_detections(
    data: &[f32],
    shape: &[usize],
    confidence: f64,
    lb: &Letterbox,
    frame_width: u32,
    frame_height: u32,
) -> Vec<FaceBox> {
    let transposed = shape[1] < shape[2];
    let (num_dets, num_feats) = if transposed {
        (shape[2], shape[1])
    } else {
        (shape[1], shape[2])
    };
    if num_feats < 5 || data.len() < num_dets * num_feats {
        return Vec::new();
    }

    let value = |det: usize, feat: usize| -> f64 {
        if transposed {
            data[feat * num_dets + det] as f64
        } else {
            data[det * num_feats + feat] as f64
        }
    };

    let fw = frame_width as f64;
    let fh = frame_height as f64;
    let unmap_x = |x: f64| ((x - lb.pad_x as f64) / lb.scale).clamp(0.0, fw);
    let unmap_y = |y: f64| ((y - lb.pad_y as f64) / lb.scale).clamp(0.0, fh);

    (0..num_dets)
        .filter_map(|i| {
            let conf = value(i, 4);
            if conf < confidence {
                return None;
            }
            let (cx, cy, w, h) = (value(i, 0), value(i, 1), value(i, 2), value(i, 3));
            let landmarks = (num_feats >= 5 + NUM_KEYPOINT_VALUES).then(|| {
                let mut points = [(0.0, 0.0); 5];
                for (k, point) in points.iter_mut().enumerate() {
                    let base = 5 + k * 3;
                    if value(i, base + 2) >= KEYPOINT_CONF_THRESH {
                        *point = (unmap_x(value(i, base)), unmap_y(value(i, base + 1)));
                    }
                }
                FaceLandmarks::new(points)
            });
            let face = FaceBox {
                x1: unmap_x(cx - w / 2.0),
                y1: unmap_y(cy - h / 2.0),
                x2: unmap_x(cx + w / 2.0),
                y2: unmap_y(cy + h / 2.0),
                confidence: conf,
                landmarks,
            };
            (face.width() > 0.0 && face.height() > 0.0).then_some(face)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
