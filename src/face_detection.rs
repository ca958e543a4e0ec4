//! Face detection with an SSD Caffe model through the `OpenCV` DNN module.

use crate::constants::{CONFIDENCE_THRESHOLD, DETECTION_MEAN};
use crate::utils::{image_conversion::detection_rows, safe_cast::scale_normalized};
use crate::{Error, Result};
use log::{debug, info};
use ndarray::ArrayView2;
use opencv::core::{Mat, Scalar, Size, CV_32F};
use opencv::dnn::{self, Net};
use opencv::prelude::*;
use std::path::Path;

/// Corners of a face bounding box in frame pixel space
///
/// Corners come straight from the detector, so they are neither clamped to the
/// frame nor guaranteed to be ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FaceBox {
    /// Top-left X
    pub x1: i32,
    /// Top-left Y
    pub y1: i32,
    /// Bottom-right X
    pub x2: i32,
    /// Bottom-right Y
    pub y2: i32,
}

impl FaceBox {
    /// Create a box from its corners
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Signed area `(y2 - y1) * (x2 - x1)`, saturating at the `i64` limits
    #[must_use]
    pub fn area(&self) -> i64 {
        let height = i64::from(self.y2) - i64::from(self.y1);
        let width = i64::from(self.x2) - i64::from(self.x1);
        height.saturating_mul(width)
    }

    /// Horizontal midpoint, floored
    #[must_use]
    pub fn x_mid(&self) -> i64 {
        (i64::from(self.x1) + i64::from(self.x2)).div_euclid(2)
    }

    /// Vertical midpoint, floored
    #[must_use]
    pub fn y_mid(&self) -> i64 {
        (i64::from(self.y1) + i64::from(self.y2)).div_euclid(2)
    }
}

/// A candidate face with its confidence score
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Detection {
    /// Bounding box of the detected face
    pub bbox: FaceBox,
    /// Confidence score in [0, 1]
    pub confidence: f32,
}

impl Detection {
    /// The all-zero entry that heads every detection list
    pub const SENTINEL: Self = Self {
        bbox: FaceBox::new(0, 0, 0, 0),
        confidence: 0.0,
    };

    /// Create a detection from corners and confidence
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32, confidence: f32) -> Self {
        Self {
            bbox: FaceBox::new(x1, y1, x2, y2),
            confidence,
        }
    }
}

/// Anything that can locate faces in a frame
pub trait Detector {
    /// Detect faces in a frame.
    ///
    /// The returned list always starts with [`Detection::SENTINEL`].
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Detection>>;
}

/// Res10 SSD face detector loaded from Caffe files
pub struct CaffeFaceDetector {
    net: Net,
    conf_threshold: f32,
    mean: Scalar,
}

impl CaffeFaceDetector {
    /// Load the network from its description and weights files
    ///
    /// # Errors
    ///
    /// Returns `Error::ModelError` if either file is missing or `OpenCV` cannot
    /// build a network from them
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(proto_file: P, model_file: Q) -> Result<Self> {
        Self::with_params(proto_file, model_file, CONFIDENCE_THRESHOLD, DETECTION_MEAN)
    }

    /// Load the network with an explicit threshold and channel means
    ///
    /// # Errors
    ///
    /// Same as [`CaffeFaceDetector::new`]
    pub fn with_params<P: AsRef<Path>, Q: AsRef<Path>>(
        proto_file: P,
        model_file: Q,
        conf_threshold: f32,
        mean: [f64; 3],
    ) -> Result<Self> {
        let proto = path_str(proto_file.as_ref())?;
        let model = path_str(model_file.as_ref())?;

        info!("Loading face detector from {} and {}", proto, model);
        let net = dnn::read_net_from_caffe(proto, model)
            .map_err(|e| Error::ModelError(format!("Failed to load Caffe network: {e}")))?;

        if net.empty()? {
            return Err(Error::ModelError(format!("Network loaded from {proto} is empty")));
        }

        Ok(Self {
            net,
            conf_threshold,
            mean: Scalar::new(mean[0], mean[1], mean[2], 0.0),
        })
    }

    /// Mean-subtracted NCHW blob at the frame's own size
    fn preprocess(&self, frame: &Mat) -> Result<Mat> {
        let blob = dnn::blob_from_image(
            frame,
            1.0,
            Size::new(frame.cols(), frame.rows()),
            self.mean,
            false,
            false,
            CV_32F,
        )?;
        Ok(blob)
    }
}

impl Detector for CaffeFaceDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Detection>> {
        let blob = self.preprocess(frame)?;

        self.net.set_input(&blob, "", 1.0, Scalar::default())?;
        let output = self.net.forward_single("")?;

        let rows = detection_rows(&output)?;
        let detections = parse_detections(rows, frame.cols(), frame.rows(), self.conf_threshold)?;
        debug!("{} face(s) above threshold", detections.len() - 1);

        Ok(detections)
    }
}

fn path_str(path: &Path) -> Result<&str> {
    if !path.exists() {
        return Err(Error::ModelError(format!("Model file not found: {}", path.display())));
    }
    path.to_str()
        .ok_or_else(|| Error::ModelError(format!("Model path is not valid UTF-8: {}", path.display())))
}

/// Turn raw SSD rows into a detection list headed by the sentinel
///
/// Each row is `(image_id, label, confidence, x1, y1, x2, y2)` with normalized
/// corners. Rows at or above `threshold` are scaled by `(width, height, width,
/// height)` and truncated toward zero. Detector order is preserved.
///
/// # Errors
///
/// Returns `Error::ModelOutputError` if a row is too short or a kept row has a
/// coordinate that cannot be represented as a pixel offset
pub fn parse_detections(
    raw: ArrayView2<'_, f32>,
    width: i32,
    height: i32,
    threshold: f32,
) -> Result<Vec<Detection>> {
    if raw.ncols() < 7 && raw.nrows() > 0 {
        return Err(Error::ModelOutputError(format!(
            "Detection rows have {} columns, expected 7",
            raw.ncols()
        )));
    }

    let mut detections = vec![Detection::SENTINEL];

    for row in raw.rows() {
        let confidence = row[2];
        if confidence.is_nan() || confidence < threshold {
            continue;
        }

        let scale = |value: f32, extent: i32| {
            scale_normalized(value, extent)
                .map_err(|e| Error::ModelOutputError(format!("Bad detection coordinate: {e}")))
        };

        detections.push(Detection::new(
            scale(row[3], width)?,
            scale(row[4], height)?,
            scale(row[5], width)?,
            scale(row[6], height)?,
            confidence,
        ));
    }

    Ok(detections)
}

/// Box of the most confident detection
///
/// Among equally confident entries the one listed last wins. An empty slice
/// yields the sentinel box.
#[must_use]
pub fn select_most_confident(detections: &[Detection]) -> FaceBox {
    detections
        .iter()
        .max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map_or(Detection::SENTINEL.bbox, |d| d.bbox)
}
