//! Bidirectional validation pipelines.
//!
//! A [`Codec`] pairs two validators: a decoder for the parse direction and
//! an encoder for the reverse. Both directions report failures through the
//! same path-aware error type as plain schemas.

use std::sync::Arc;

use stillwater::Validation;

use crate::error::{ValidationError, Violation};
use crate::path::IssuePath;
use crate::schema::{SchemaLike, ValueValidator};
use crate::value::Value;
use crate::ParseResult;

/// A two-direction validator.
///
/// The decode direction (`parse`/`safe_parse`) runs the decoder, typically
/// a schema whose transforms convert a wire shape into a richer one. The
/// encode direction (`encode`/`safe_encode`) runs the encoder, converting
/// back. The two validators are independent; nothing checks that they
/// invert each other.
///
/// A codec built with [`Codec::asynchronous`] declares that its transforms
/// need an await boundary. Its four synchronous operations fail
/// immediately with a
/// [`CodecAsyncNotSupported`](crate::IssueKind::CodecAsyncNotSupported)
/// issue instead of blocking; the `_async` operations work on every codec.
///
/// # Example
///
/// ```rust
/// use chrono::{DateTime, Utc};
/// use sluice::{Codec, Schema, SchemaLike, Value};
///
/// let iso_date = Codec::new(
///     Schema::string().transform(|v| match v {
///         Value::String(s) => DateTime::parse_from_rfc3339(&s)
///             .map(|d| Value::Date(d.with_timezone(&Utc)))
///             .map_err(|e| e.to_string()),
///         other => Err(format!("expected string, got {}", other.kind_name())),
///     }),
///     Schema::date().transform(|v| match v {
///         Value::Date(d) => Ok(Value::from(d.to_rfc3339())),
///         other => Err(format!("expected date, got {}", other.kind_name())),
///     }),
/// );
///
/// let decoded = iso_date.parse(&Value::from("2024-06-01T12:00:00+00:00")).unwrap();
/// assert!(matches!(decoded, Value::Date(_)));
///
/// let encoded = iso_date.encode(&decoded).unwrap();
/// assert_eq!(encoded, Value::from("2024-06-01T12:00:00+00:00"));
/// ```
#[derive(Clone)]
pub struct Codec {
    decoder: Arc<dyn ValueValidator>,
    encoder: Arc<dyn ValueValidator>,
    asynchronous: bool,
}

impl Codec {
    /// Creates a synchronous codec from a decoder and an encoder.
    pub fn new<D, E>(decoder: D, encoder: E) -> Self
    where
        D: SchemaLike + 'static,
        E: SchemaLike + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            encoder: Arc::new(encoder),
            asynchronous: false,
        }
    }

    /// Creates a codec whose transforms require an await boundary.
    ///
    /// The synchronous operations refuse to run such a codec; use the
    /// `_async` operations instead.
    pub fn asynchronous<D, E>(decoder: D, encoder: E) -> Self
    where
        D: SchemaLike + 'static,
        E: SchemaLike + 'static,
    {
        Self {
            decoder: Arc::new(decoder),
            encoder: Arc::new(encoder),
            asynchronous: true,
        }
    }

    /// Returns true if this codec requires the `_async` operations.
    pub fn is_asynchronous(&self) -> bool {
        self.asynchronous
    }

    fn sync_guard(&self, operation: &'static str) -> Option<ValidationError> {
        if self.asynchronous {
            Some(ValidationError::of(
                &IssuePath::root(),
                Violation::AsyncNotSupported { operation },
            ))
        } else {
            None
        }
    }

    fn run_decode(&self, value: &Value) -> ParseResult<Value> {
        self.decoder.validate_value(value, &IssuePath::root())
    }

    fn run_encode(&self, value: &Value) -> ParseResult<Value> {
        self.encoder.validate_value(value, &IssuePath::root())
    }

    /// Runs the decode direction.
    pub fn safe_parse(&self, value: &Value) -> ParseResult<Value> {
        match self.sync_guard("safe_parse") {
            Some(error) => Validation::Failure(error),
            None => self.run_decode(value),
        }
    }

    /// Runs the decode direction, returning a `Result`.
    pub fn parse(&self, value: &Value) -> Result<Value, ValidationError> {
        match self.sync_guard("parse") {
            Some(error) => Err(error),
            None => self.run_decode(value).into_result(),
        }
    }

    /// Runs the encode direction.
    pub fn safe_encode(&self, value: &Value) -> ParseResult<Value> {
        match self.sync_guard("safe_encode") {
            Some(error) => Validation::Failure(error),
            None => self.run_encode(value),
        }
    }

    /// Runs the encode direction, returning a `Result`.
    pub fn encode(&self, value: &Value) -> Result<Value, ValidationError> {
        match self.sync_guard("encode") {
            Some(error) => Err(error),
            None => self.run_encode(value).into_result(),
        }
    }

    /// Runs the decode direction at an await boundary.
    ///
    /// Works on synchronous codecs too, so callers in async contexts can
    /// treat every codec uniformly.
    pub async fn safe_parse_async(&self, value: &Value) -> ParseResult<Value> {
        self.run_decode(value)
    }

    /// Runs the decode direction at an await boundary, returning a `Result`.
    pub async fn parse_async(&self, value: &Value) -> Result<Value, ValidationError> {
        self.run_decode(value).into_result()
    }

    /// Runs the encode direction at an await boundary.
    pub async fn safe_encode_async(&self, value: &Value) -> ParseResult<Value> {
        self.run_encode(value)
    }

    /// Runs the encode direction at an await boundary, returning a `Result`.
    pub async fn encode_async(&self, value: &Value) -> Result<Value, ValidationError> {
        self.run_encode(value).into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IssueKind;
    use crate::schema::Schema;
    use futures::executor::block_on;

    fn celsius_codec() -> Codec {
        // Decodes a Fahrenheit reading into Celsius and encodes it back.
        Codec::new(
            Schema::number().transform(|v| match v {
                Value::Number(f) => Ok(Value::from((f - 32.0) * 5.0 / 9.0)),
                other => Err(format!("expected number, got {}", other.kind_name())),
            }),
            Schema::number().transform(|v| match v {
                Value::Number(c) => Ok(Value::from(c * 9.0 / 5.0 + 32.0)),
                other => Err(format!("expected number, got {}", other.kind_name())),
            }),
        )
    }

    #[test]
    fn test_parse_runs_decoder() {
        let codec = celsius_codec();
        assert_eq!(codec.parse(&Value::from(212.0)).unwrap(), Value::from(100.0));
    }

    #[test]
    fn test_encode_runs_encoder() {
        let codec = celsius_codec();
        assert_eq!(codec.encode(&Value::from(100.0)).unwrap(), Value::from(212.0));
    }

    #[test]
    fn test_decode_failures_carry_paths() {
        let codec = Codec::new(
            Schema::object().field("port", Schema::number().int()),
            Schema::object(),
        );

        let input = Value::from_json(serde_json::json!({"port": "8080"}));
        let error = codec.parse(&input).unwrap_err();
        assert_eq!(error.first().path.to_string(), "port");
        assert_eq!(error.first().message, "expected number, got string");
    }

    #[test]
    fn test_directions_are_independent() {
        let codec = Codec::new(Schema::string(), Schema::number());

        assert!(codec.safe_parse(&Value::from("text")).is_success());
        assert!(codec.safe_encode(&Value::from("text")).is_failure());
    }

    #[test]
    fn test_sync_operations_refuse_async_codec() {
        let codec = Codec::asynchronous(Schema::string(), Schema::string());
        assert!(codec.is_asynchronous());

        let error = codec.parse(&Value::from("x")).unwrap_err();
        assert_eq!(error.first().kind, IssueKind::CodecAsyncNotSupported);
        assert_eq!(
            error.first().message,
            "cannot parse synchronously with an asynchronous codec"
        );

        let error = codec.encode(&Value::from("x")).unwrap_err();
        assert_eq!(
            error.first().message,
            "cannot encode synchronously with an asynchronous codec"
        );

        assert!(codec.safe_parse(&Value::from("x")).is_failure());
        assert!(codec.safe_encode(&Value::from("x")).is_failure());
    }

    #[test]
    fn test_async_operations_work_on_async_codec() {
        let codec = Codec::asynchronous(
            Schema::string().transform(|v| match v {
                Value::String(s) => Ok(Value::from(s.to_uppercase())),
                other => Ok(other),
            }),
            Schema::string(),
        );

        let decoded = block_on(codec.parse_async(&Value::from("shout"))).unwrap();
        assert_eq!(decoded, Value::from("SHOUT"));

        let result = block_on(codec.safe_encode_async(&Value::from("quiet")));
        assert!(result.is_success());
    }

    #[test]
    fn test_async_operations_work_on_sync_codec() {
        let codec = celsius_codec();
        let decoded = block_on(codec.parse_async(&Value::from(32.0))).unwrap();
        assert_eq!(decoded, Value::from(0.0));
    }
}
