//! Wire types for the Prometheus HTTP query API.
//!
//! Only the parts of the envelope that promsnap reads are modelled. The
//! `[timestamp, "value"]` sample pair is kept as raw JSON here and decoded
//! explicitly by [`Sample::decode`], so a malformed pair surfaces as a
//! value-parse error rather than a generic body decode failure.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::ExtractError;

/// Top-level `status` marker of a query response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Decoded body of `GET /api/v1/query`.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub data: Option<QueryData>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// The `data` section, tagged by `resultType`.
#[derive(Debug, Deserialize)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryData {
    Vector(Vec<Series>),
    Matrix(Vec<RangeSeries>),
    Scalar(RawSample),
    String(RawSample),
}

/// One labelled series of an instant vector.
#[derive(Debug, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    pub value: RawSample,
}

/// One labelled series of a range vector.
#[derive(Debug, Deserialize)]
pub struct RangeSeries {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub values: Vec<RawSample>,
}

/// A sample pair exactly as it appeared on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct RawSample(pub Value);

/// A decoded `[timestamp, value]` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Evaluation time in (fractional) Unix seconds.
    pub timestamp: f64,
    pub value: f64,
}

impl Sample {
    /// Decodes a raw pair. The pair must be a two-element array holding a
    /// numeric timestamp and a numeric-looking string.
    pub fn decode(raw: &RawSample) -> Result<Self, ExtractError> {
        let pair = raw
            .0
            .as_array()
            .ok_or_else(|| ExtractError::MalformedSample(format!("expected array, got {}", raw.0)))?;

        let [timestamp, value] = pair.as_slice() else {
            return Err(ExtractError::MalformedSample(format!(
                "expected [timestamp, value], got {} elements",
                pair.len()
            )));
        };

        let timestamp = timestamp.as_f64().ok_or_else(|| {
            ExtractError::MalformedSample(format!("timestamp is not a number: {timestamp}"))
        })?;

        let Value::String(text) = value else {
            return Err(ExtractError::MalformedSample(format!(
                "value is not a string: {value}"
            )));
        };

        let value = parse_sample_value(text)?;
        Ok(Self { timestamp, value })
    }
}

/// Parses a Prometheus sample value. Accepts the `NaN`, `+Inf` and `-Inf`
/// spellings the server uses for special values.
pub fn parse_sample_value(text: &str) -> Result<f64, ExtractError> {
    text.parse::<f64>().map_err(|source| ExtractError::InvalidValue {
        raw: text.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_vector_response() {
        let body = r#"{
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [
                    {"metric": {"job": "api"}, "value": [1700000000, "42.5"]}
                ]
            }
        }"#;

        let response: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, ResponseStatus::Success);

        let Some(QueryData::Vector(series)) = response.data else {
            panic!("expected vector data");
        };
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].metric.get("job").map(String::as_str), Some("api"));

        let sample = Sample::decode(&series[0].value).unwrap();
        assert_eq!(sample.value, 42.5);
        assert_eq!(sample.timestamp, 1700000000.0);
    }

    #[test]
    fn test_decode_error_envelope() {
        let body = r#"{
            "status": "error",
            "errorType": "bad_data",
            "error": "invalid parameter \"query\": parse error"
        }"#;

        let response: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.status, ResponseStatus::Error);
        assert!(response.data.is_none());
        assert_eq!(response.error_type.as_deref(), Some("bad_data"));
    }

    #[test]
    fn test_decode_scalar_response() {
        let body = r#"{"status":"success","data":{"resultType":"scalar","result":[1700000000,"1"]}}"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();

        let Some(QueryData::Scalar(raw)) = response.data else {
            panic!("expected scalar data");
        };
        assert_eq!(Sample::decode(&raw).unwrap().value, 1.0);
    }

    #[test]
    fn test_decode_warnings() {
        let body = r#"{
            "status": "success",
            "warnings": ["partial response"],
            "data": {"resultType": "vector", "result": []}
        }"#;
        let response: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.warnings, vec!["partial response".to_string()]);
    }

    #[test]
    fn test_unknown_result_type_is_decode_error() {
        let body = r#"{"status":"success","data":{"resultType":"histogram","result":[]}}"#;
        assert!(serde_json::from_str::<QueryResponse>(body).is_err());
    }

    #[test]
    fn test_sample_special_values() {
        let nan = Sample::decode(&RawSample(json!([1, "NaN"]))).unwrap();
        assert!(nan.value.is_nan());

        let inf = Sample::decode(&RawSample(json!([1, "+Inf"]))).unwrap();
        assert_eq!(inf.value, f64::INFINITY);

        let neg = Sample::decode(&RawSample(json!([1, "-Inf"]))).unwrap();
        assert_eq!(neg.value, f64::NEG_INFINITY);
    }

    #[test]
    fn test_sample_non_numeric_string() {
        let err = Sample::decode(&RawSample(json!([1, "abc"]))).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { .. }));
    }

    #[test]
    fn test_sample_wrong_shape() {
        // Value as a JSON number instead of a string
        let err = Sample::decode(&RawSample(json!([1, 3.5]))).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSample(_)));

        // Too few elements
        let err = Sample::decode(&RawSample(json!(["3.5"]))).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSample(_)));

        // Not an array at all
        let err = Sample::decode(&RawSample(json!("3.5"))).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSample(_)));

        // Timestamp that is not a number
        let err = Sample::decode(&RawSample(json!(["now", "3.5"]))).unwrap_err();
        assert!(matches!(err, ExtractError::MalformedSample(_)));
    }
}
