//! Compiled JSON Schema validators with Joi-style reasons
//!
//! Every payload kind is described as a JSON Schema (draft 2020-12) and
//! compiled once. When a payload has several violations, the one reported
//! is the first in property declaration order; unknown keys come last.

use super::{Validate, ValidationResult};
use crate::error::{Fault, Result};
use jsonschema::{error::ValidationErrorKind, Draft, ValidationError, Validator};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldType {
    String,
    Integer,
}

/// A compiled object schema
pub struct JsonSchema {
    validator: Validator,
    fields: Vec<(String, FieldType)>,
}

impl JsonSchema {
    /// Compile `schema`; a schema that does not compile is a server fault
    pub fn compile(schema: &Value) -> Result<Self> {
        let mut options = jsonschema::options();
        options
            .with_draft(Draft::Draft202012)
            .should_validate_formats(true);

        let validator = options
            .build(schema)
            .map_err(|e| Fault::server(format!("Invalid payload schema: {e}")))?;

        let fields = schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, property)| (name.clone(), field_type(property)))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self { validator, fields })
    }

    /// `0` is the payload itself, declared fields follow in order,
    /// then undeclared keys
    fn position(&self, name: &str) -> usize {
        self.fields
            .iter()
            .position(|(field, _)| field == name)
            .map_or(self.fields.len() + 1, |index| index + 1)
    }

    fn type_of(&self, name: &str) -> FieldType {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map_or(FieldType::String, |(_, kind)| *kind)
    }

    /// Rank and Joi-style reason for one violation
    fn describe(&self, error: &ValidationError<'_>) -> ((usize, u8), String) {
        let path = error.instance_path.to_string();
        let name = unescape(path.trim_start_matches('/'));

        match &error.kind {
            ValidationErrorKind::Required { property } => {
                let property = property.as_str().unwrap_or_default();
                (
                    (self.position(property), 0),
                    format!("\"{property}\" is required"),
                )
            }
            ValidationErrorKind::AdditionalProperties { unexpected } => {
                let key = unexpected.first().map(String::as_str).unwrap_or_default();
                ((self.fields.len() + 1, 0), format!("\"{key}\" is not allowed"))
            }
            ValidationErrorKind::Type { .. } if name.is_empty() => (
                (0, 0),
                "\"value\" must be of type object".to_string(),
            ),
            ValidationErrorKind::Type { .. } => {
                let reason = match self.type_of(&name) {
                    FieldType::String => "must be a string",
                    FieldType::Integer if error.instance.is_number() => "must be an integer",
                    FieldType::Integer => "must be a number",
                };
                ((self.position(&name), 1), format!("\"{name}\" {reason}"))
            }
            ValidationErrorKind::MinLength { .. } if error.instance.as_str() == Some("") => (
                (self.position(&name), 2),
                format!("\"{name}\" is not allowed to be empty"),
            ),
            ValidationErrorKind::Enum { options } => {
                let allowed: Vec<&str> = options
                    .as_array()
                    .map(|values| values.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                (
                    (self.position(&name), 3),
                    format!("\"{name}\" must be one of [{}]", allowed.join(", ")),
                )
            }
            ValidationErrorKind::MinLength { limit } => (
                (self.position(&name), 4),
                format!("\"{name}\" length must be at least {limit} characters long"),
            ),
            ValidationErrorKind::MaxLength { limit } => (
                (self.position(&name), 5),
                format!("\"{name}\" length must be less than or equal to {limit} characters long"),
            ),
            ValidationErrorKind::Format { .. } | ValidationErrorKind::Pattern { .. } => (
                (self.position(&name), 6),
                format!("\"{name}\" must be a valid email"),
            ),
            ValidationErrorKind::Minimum { limit } => (
                (self.position(&name), 7),
                format!("\"{name}\" must be greater than or equal to {limit}"),
            ),
            ValidationErrorKind::Maximum { limit } => (
                (self.position(&name), 8),
                format!("\"{name}\" must be less than or equal to {limit}"),
            ),
            _ => ((self.position(&name), 9), format!("\"{name}\" is invalid")),
        }
    }
}

impl Validate for JsonSchema {
    fn validate(&self, payload: &Value) -> ValidationResult {
        let first = self
            .validator
            .iter_errors(payload)
            .map(|error| self.describe(&error))
            .min_by_key(|(rank, _)| *rank);

        match first {
            Some((_, reason)) => ValidationResult::Invalid(reason),
            None => ValidationResult::Valid,
        }
    }
}

fn field_type(property: &Value) -> FieldType {
    let is_integer = match property.get("type") {
        Some(Value::String(kind)) => kind == "integer",
        Some(Value::Array(kinds)) => kinds.iter().any(|kind| kind == "integer"),
        _ => false,
    };
    if is_integer {
        FieldType::Integer
    } else {
        FieldType::String
    }
}

/// Undo JSON Pointer escaping of a single segment
fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}
