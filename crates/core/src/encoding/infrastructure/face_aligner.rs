//! Five-point face alignment onto the ArcFace 112×112 template.
//!
//! A 4-DOF similarity transform (scale, rotation, translation) is fitted to
//! the detected landmarks by least squares, then the frame is warped through
//! its inverse with bilinear sampling.

use image::{Rgb, RgbImage};

use crate::detection::domain::face_landmarks::FaceLandmarks;

/// Side length of the aligned face chip.
pub const ALIGNED_SIZE: u32 = 112;

/// Where ArcFace expects the five landmarks in a 112×112 chip.
const ARCFACE_TEMPLATE: [(f64, f64); 5] = [
    (38.2946, 51.6963),
    (73.5318, 51.5014),
    (56.0252, 71.7366),
    (41.5493, 92.3655),
    (70.7299, 92.2041),
];

/// Maps `(x, y)` to `(a·x − b·y + tx, b·x + a·y + ty)`.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Similarity {
    a: f64,
    b: f64,
    tx: f64,
    ty: f64,
}

impl Similarity {
    /// Closed-form least-squares fit from `src` to `dst`.
    ///
    /// `None` when the source points coincide.
    fn fit(src: &[(f64, f64); 5], dst: &[(f64, f64); 5]) -> Option<Self> {
        let n = src.len() as f64;
        let mean = |pts: &[(f64, f64); 5]| {
            let (sx, sy) = pts
                .iter()
                .fold((0.0f64, 0.0f64), |(ax, ay), &(x, y)| (ax + x, ay + y));
            (sx / n, sy / n)
        };
        let (smx, smy) = mean(src);
        let (dmx, dmy) = mean(dst);

        let (mut spread, mut dot, mut cross) = (0.0, 0.0, 0.0);
        for (&(sx, sy), &(dx, dy)) in src.iter().zip(dst.iter()) {
            let (sx, sy) = (sx - smx, sy - smy);
            let (dx, dy) = (dx - dmx, dy - dmy);
            spread += sx * sx + sy * sy;
            dot += sx * dx + sy * dy;
            cross += sx * dy - sy * dx;
        }
        if spread < 1e-9 {
            return None;
        }

        let a = dot / spread;
        let b = cross / spread;
        Some(Self {
            a,
            b,
            tx: dmx - (a * smx - b * smy),
            ty: dmy - (b * smx + a * smy),
        })
    }

    fn inverse_apply(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.a * self.a + self.b * self.b;
        let (dx, dy) = (x - self.tx, y - self.ty);
        (
            (self.a * dx + self.b * dy) / det,
            (self.a * dy - self.b * dx) / det,
        )
    }
}

/// Warps the face described by `landmarks` into an aligned 112×112 chip.
///
/// Returns `None` for degenerate landmarks. Pixels that map outside the
/// frame are black.
pub fn align_face(frame: &RgbImage, landmarks: &FaceLandmarks) -> Option<RgbImage> {
    let transform = Similarity::fit(landmarks.points(), &ARCFACE_TEMPLATE)?;
    if transform.a * transform.a + transform.b * transform.b < 1e-12 {
        return None;
    }
    Some(RgbImage::from_fn(ALIGNED_SIZE, ALIGNED_SIZE, |ox, oy| {
        let (sx, sy) = transform.inverse_apply(ox as f64, oy as f64);
        sample_bilinear(frame, sx, sy)
    }))
}

fn sample_bilinear(frame: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (w, h) = (frame.width() as i64, frame.height() as i64);
    let (x0, y0) = (x.floor() as i64, y.floor() as i64);
    let (fx, fy) = (x - x0 as f64, y - y0 as f64);

    let pixel = |px: i64, py: i64| -> [f64; 3] {
        if px < 0 || py < 0 || px >= w || py >= h {
            return [0.0; 3];
        }
        let p = frame.get_pixel(px as u32, py as u32).0;
        [p[0] as f64, p[1] as f64, p[2] as f64]
    };

    let (p00, p10) = (pixel(x0, y0), pixel(x0 + 1, y0));
    let (p01, p11) = (pixel(x0, y0 + 1), pixel(x0 + 1, y0 + 1));
    Rgb(std::array::from_fn(|c| {
        let v = p00[c] * (1.0 - fx) * (1.0 - fy)
            + p10[c] * fx * (1.0 - fy)
            + p01[c] * (1.0 - fx) * fy
            + p11[c] * fx * fy;
        v.round().clamp(0.0, 255.0) as u8
    }))
}
