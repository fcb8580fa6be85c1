use serde_json::Value;
use thiserror::Error;

use crate::model::{StatusUpdate, Submission};

/// Reasons a status response (or one of its records) is rejected.
///
/// Display strings end up in the chat, so they are written for the student.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent (or `null`).
    #[error("в ответе API нет поля `{0}`")]
    MissingField(String),
    /// A field holds a JSON value of the wrong type.
    #[error("поле `{field}` в ответе API имеет тип {found}, ожидался {expected}")]
    TypeMismatch {
        /// Path of the offending field, e.g. `homeworks[0].status`.
        field: String,
        /// JSON type the field should have.
        expected: &'static str,
        /// JSON type it actually has.
        found: &'static str,
    },
    /// Status code outside approved/reviewing/rejected.
    #[error("неизвестный статус домашней работы: {0}")]
    UnknownStatus(String),
}

/// Checks the shape of a decoded status response and extracts its records.
///
/// Order of checks:
/// 1. `homeworks` present
/// 2. `homeworks` is an array
/// 3. its first element (if any) is an object
/// 4. `current_date` present and an integer
///
/// Only the first record is decoded strictly, since it is the one relayed.
/// Older records that do not decode are skipped. The status code itself is
/// not checked here.
pub fn check_response(payload: &Value) -> Result<StatusUpdate, ValidationError> {
    let homeworks = payload
        .get("homeworks")
        .ok_or_else(|| ValidationError::MissingField("homeworks".into()))?;
    let list = homeworks
        .as_array()
        .ok_or_else(|| mismatch("homeworks", "array", homeworks))?;
    if let Some(first) = list.first() {
        if !first.is_object() {
            return Err(mismatch("homeworks[0]", "object", first));
        }
    }

    let current = payload
        .get("current_date")
        .ok_or_else(|| ValidationError::MissingField("current_date".into()))?;
    let current_date = current
        .as_i64()
        .ok_or_else(|| mismatch("current_date", "integer", current))?;

    let mut homeworks = Vec::with_capacity(list.len());
    if let Some(first) = list.first() {
        homeworks.push(decode_submission(0, first)?);
        homeworks.extend(
            list.iter()
                .enumerate()
                .skip(1)
                .filter_map(|(i, v)| decode_submission(i, v).ok()),
        );
    }

    Ok(StatusUpdate {
        homeworks,
        current_date,
    })
}

fn decode_submission(index: usize, value: &Value) -> Result<Submission, ValidationError> {
    if !value.is_object() {
        return Err(mismatch(&format!("homeworks[{index}]"), "object", value));
    }
    let text_field = |name: &str| -> Result<String, ValidationError> {
        let field = format!("homeworks[{index}].{name}");
        match value.get(name) {
            None | Some(Value::Null) => Err(ValidationError::MissingField(field)),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(mismatch(&field, "string", other)),
        }
    };
    Ok(Submission {
        homework_name: text_field("homework_name")?,
        status: text_field("status")?,
    })
}

fn mismatch(field: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: json_type(found),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
