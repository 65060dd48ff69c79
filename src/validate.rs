//! Schema validation of raw provider responses.
//!
//! Models wrap their JSON in prose or code fences often enough that the
//! validator scans for the first balanced JSON object instead of parsing
//! the response wholesale. A second top-level object makes the response
//! ambiguous and fails validation. Validation itself is pure: no retries,
//! no I/O.

use serde_json::Value;

use crate::domain::schema::{FieldDomain, FieldValue, Record, Schema};
use crate::error::ValidationError;

/// Extract and validate the response against the declared schema.
///
/// Accepted values are case-normalized to their canonical enumeration
/// members; unexpected extra fields are ignored.
pub fn validate(raw: &str, schema: &Schema) -> Result<Record, ValidationError> {
    let span = extract_json(raw)?;
    let parsed: Value =
        serde_json::from_str(span).map_err(|e| ValidationError::MalformedJson(e.to_string()))?;
    let object = parsed
        .as_object()
        .ok_or_else(|| ValidationError::MalformedJson("top-level value is not an object".into()))?;

    let mut record = Record::new();
    for field in &schema.fields {
        let value = object
            .get(&field.name)
            .ok_or_else(|| ValidationError::MissingField {
                field: field.name.clone(),
            })?;
        let validated = validate_field(&field.name, &field.domain, value)?;
        record.insert(field.name.clone(), validated);
    }
    Ok(record)
}

fn validate_field(
    name: &str,
    domain: &FieldDomain,
    value: &Value,
) -> Result<FieldValue, ValidationError> {
    if domain.is_multi() {
        let items = value.as_array().ok_or_else(|| ValidationError::ExpectedList {
            field: name.to_string(),
        })?;
        if items.is_empty() {
            return Err(ValidationError::ExpectedList {
                field: name.to_string(),
            });
        }
        let mut normalized = Vec::with_capacity(items.len());
        for item in items {
            normalized.push(normalize_scalar(name, domain, item)?);
        }
        Ok(FieldValue::List(normalized))
    } else {
        if value.is_array() {
            return Err(ValidationError::ExpectedScalar {
                field: name.to_string(),
            });
        }
        Ok(FieldValue::Scalar(normalize_scalar(name, domain, value)?))
    }
}

fn normalize_scalar(
    name: &str,
    domain: &FieldDomain,
    value: &Value,
) -> Result<String, ValidationError> {
    // Models sometimes emit a JSON boolean where the template asked for
    // the string "TRUE"/"FALSE"; both spellings mean the same thing.
    let candidate = match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    };
    domain
        .normalize(&candidate)
        .ok_or_else(|| ValidationError::UnrecognizedValue {
            field: name.to_string(),
            value: candidate,
        })
}

/// Locate the first balanced JSON object in `raw`.
///
/// Braces inside JSON strings do not count toward balance. A second
/// balanced object after the first is an ambiguity error.
fn extract_json(raw: &str) -> Result<&str, ValidationError> {
    let (start, end) = find_balanced(raw).ok_or(ValidationError::NoJsonObject)?;
    // A later brace-balanced span only makes the response ambiguous when
    // it actually parses as a JSON object; stray braces in prose do not.
    if let Some((s, e)) = find_balanced(&raw[end..]) {
        let tail = &raw[end..];
        if serde_json::from_str::<Value>(&tail[s..e])
            .map(|v| v.is_object())
            .unwrap_or(false)
        {
            return Err(ValidationError::AmbiguousJson);
        }
    }
    Ok(&raw[start..end])
}

/// Byte range of the first balanced `{...}` span, string-aware.
fn find_balanced(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, start + offset + 1));
                }
            }
            _ => {}
        }
    }
    None
}
