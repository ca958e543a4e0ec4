//! Utility functions for frame handling and numeric conversions.

pub mod safe_cast;
pub mod image_conversion;

use crate::{Error, Result};
use opencv::core::{Mat, Size};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;

/// Resize a frame to the square working resolution used for detection
///
/// # Errors
///
/// Returns an error if `size` is not positive, the frame is empty, or `OpenCV` fails
pub fn resize_to_working(frame: &Mat, size: i32) -> Result<Mat> {
    if size <= 0 {
        return Err(Error::InvalidInput(format!("Working size must be positive, got {size}")));
    }
    if frame.empty() {
        return Err(Error::InvalidInput("Cannot resize an empty frame".to_string()));
    }

    let mut resized = Mat::default();
    imgproc::resize(
        frame,
        &mut resized,
        Size::new(size, size),
        0.0,
        0.0,
        InterpolationFlags::INTER_LINEAR as i32,
    )?;

    Ok(resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use opencv::core::{Scalar, CV_8UC3};

    #[test]
    fn test_resize_to_working() {
        let frame = Mat::new_rows_cols_with_default(720, 960, CV_8UC3, Scalar::all(10.0)).unwrap();

        let resized = resize_to_working(&frame, 300).unwrap();

        assert_eq!(resized.rows(), 300);
        assert_eq!(resized.cols(), 300);
        assert_eq!(resized.typ(), CV_8UC3);
    }

    #[test]
    fn test_resize_rejects_empty_frame() {
        let frame = Mat::default();
        assert!(matches!(resize_to_working(&frame, 300), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_resize_rejects_non_positive_size() {
        let frame = Mat::new_rows_cols_with_default(10, 10, CV_8UC3, Scalar::all(0.0)).unwrap();
        assert!(resize_to_working(&frame, 0).is_err());
        assert!(resize_to_working(&frame, -300).is_err());
    }
}
