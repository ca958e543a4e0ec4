//! Interop between OpenCV network outputs and ndarray views.

use crate::constants::DETECTION_ROW_LEN;
use crate::{Error, Result};
use ndarray::ArrayView2;
use opencv::core::{Mat, MatTraitConst, CV_32F};

/// View an SSD detection output blob as a `(N, 7)` array of rows
///
/// The network produces a `[1, 1, N, 7]` float blob. Only the element count
/// matters here, so any continuous `CV_32F` Mat whose length is a multiple of
/// seven is accepted.
///
/// # Errors
/// * Returns error if the Mat is not `CV_32F` or not continuous
/// * Returns error if the element count is not a multiple of seven
pub fn detection_rows(output: &Mat) -> Result<ArrayView2<'_, f32>> {
    if output.depth() != CV_32F {
        return Err(Error::ModelOutputError(format!(
            "Expected a CV_32F detection blob, got depth {}",
            output.depth()
        )));
    }

    let data: &[f32] = if output.total() == 0 { &[] } else { output.data_typed::<f32>()? };
    if data.len() % DETECTION_ROW_LEN != 0 {
        return Err(Error::ModelOutputError(format!(
            "Detection blob has {} values, not a multiple of {}",
            data.len(),
            DETECTION_ROW_LEN
        )));
    }

    ArrayView2::from_shape((data.len() / DETECTION_ROW_LEN, DETECTION_ROW_LEN), data)
        .map_err(|e| Error::ModelOutputError(format!("Failed to shape detection rows: {e}")))
}
