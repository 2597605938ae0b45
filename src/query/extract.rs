//! Scalar extraction from a decoded query response.

use crate::error::ExtractError;
use crate::query::response::{QueryData, QueryResponse, Sample};

/// Returns the scalar value of a response, or `0.0` when the result is empty.
///
/// Only the first series is considered. For range results the latest sample
/// of the first series is used.
pub fn extract(response: &QueryResponse) -> Result<f64, ExtractError> {
    Ok(extract_sample(response)?.map_or(0.0, |sample| sample.value))
}

/// Like [`extract`], but keeps the sample timestamp and reports an empty
/// result as `None`.
pub fn extract_sample(response: &QueryResponse) -> Result<Option<Sample>, ExtractError> {
    let raw = match &response.data {
        None => return Ok(None),
        Some(QueryData::Vector(series)) => series.first().map(|s| &s.value),
        Some(QueryData::Matrix(series)) => series.first().and_then(|s| s.values.last()),
        Some(QueryData::Scalar(raw)) | Some(QueryData::String(raw)) => Some(raw),
    };

    raw.map(Sample::decode).transpose()
}
