use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Flattens field errors into sorted `"field: message"` lines.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| match error.code.as_ref() {
                        "required" => "is required".to_string(),
                        "range" => "value out of range".to_string(),
                        "format" => "invalid format".to_string(),
                        _ => format!("invalid {field}"),
                    });
                format!("{field}: {message}")
            })
        })
        .collect();

    messages.sort();
    messages
}

pub fn field_error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

pub fn require_non_empty(errors: &mut ValidationErrors, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, field_error("required", "is required"));
    }
}

pub fn into_result(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
