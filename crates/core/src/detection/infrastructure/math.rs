//! Box geometry shared by the detection backends.

use crate::detection::domain::face_box::FaceBox;

/// IoU between two bounding boxes represented as `[x1, y1, x2, y2]`.
pub fn bbox_iou(a: &[f64; 4], b: &[f64; 4]) -> f64 {
    let x1 = a[0].max(b[0]);
    let y1 = a[1].max(b[1]);
    let x2 = a[2].min(b[2]);
    let y2 = a[3].min(b[3]);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }

    let area_a = (a[2] - a[0]) * (a[3] - a[1]);
    let area_b = (b[2] - b[0]) * (b[3] - b[1]);
    inter / (area_a + area_b - inter)
}

/// Greedy NMS: sort by confidence descending, suppress overlapping boxes.
///
/// The result keeps descending-confidence order.
pub fn nms(mut boxes: Vec<FaceBox>, iou_thresh: f64) -> Vec<FaceBox> {
    boxes.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<FaceBox> = Vec::with_capacity(boxes.len());
    for candidate in boxes {
        let suppressed = keep
            .iter()
            .any(|k| bbox_iou(&k.as_array(), &candidate.as_array()) > iou_thresh);
        if !suppressed {
            keep.push(candidate);
        }
    }
    keep
}
