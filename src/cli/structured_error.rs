use std::fmt::Display;

use serde::Serialize;

use super::error_mapping::ToStructuredError;
use crate::logging::get_log_file_path;
use crate::utils::format_display_path;

#[derive(Serialize)]
pub struct ErrorMessage {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    pub code: String,
}

/// Error payload written to stderr when a command fails.
#[derive(Serialize)]
pub struct StructuredError {
    pub cwd: String,
    pub logs: String,
    pub messages: Vec<ErrorMessage>,
}

impl StructuredError {
    #[must_use]
    pub fn new(cwd: &str, code: &str, message: String) -> Self {
        Self {
            cwd: cwd.to_string(),
            logs: format_display_path(get_log_file_path()),
            messages: vec![ErrorMessage {
                message,
                tip: None,
                code: code.to_string(),
            }],
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: &str) -> Self {
        if let Some(msg) = self.messages.first_mut() {
            msg.tip = Some(tip.to_string());
        }
        self
    }

    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            // Fallback: produce a minimal valid JSON manually
            r#"{"cwd":"","logs":"","messages":[{"message":"serialization error","code":"INTERNAL_ERROR"}]}"#.to_string()
        })
    }
}

/// Convert a domain error into a structured JSON error string.
pub fn to_error_json<E: ToStructuredError + Display>(cwd: &str, err: &E) -> String {
    let (code, tip) = err.error_code_and_tip();
    let mut se = StructuredError::new(cwd, code, err.to_string());
    if let Some(tip) = tip {
        se = se.with_tip(tip);
    }
    se.to_json()
}
