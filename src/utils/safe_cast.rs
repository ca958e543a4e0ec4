//! Checked conversions from model output floats to pixel coordinates

use crate::{Error, Result};

/// Safely convert f32 to i32, truncating toward zero
///
/// # Errors
///
/// Returns an error if the value is not finite or outside i32 range
#[allow(clippy::cast_precision_loss)] // MIN/MAX bounds checking is approximate
#[allow(clippy::cast_possible_truncation)] // Truncation after bounds check is intended
pub fn f32_to_i32(value: f32) -> Result<i32> {
    if value.is_finite() && value >= i32::MIN as f32 && value <= i32::MAX as f32 {
        Ok(value as i32)
    } else {
        Err(Error::InvalidInput(format!(
            "Value {value} cannot be safely converted to i32"
        )))
    }
}

/// Scale a normalized coordinate by a frame extent and truncate to a pixel offset
///
/// # Errors
///
/// Returns an error if the scaled value is not representable as i32
#[allow(clippy::cast_precision_loss)] // Frame extents are far below f32 precision limits
pub fn scale_normalized(value: f32, extent: i32) -> Result<i32> {
    f32_to_i32(value * extent as f32)
}
