use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Fallback shown when a failure carries no readable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Categorization of client-observable failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppErrorKind {
    /// Bad credentials at sign-in.
    AuthenticationFailure,
    /// Payload rejected, either by the advisory client-side check or by the server.
    ValidationFailure,
    /// Role mismatch. Handled locally by redirect, never shown to the user.
    AuthorizationFailure,
    /// Unreachable server, undecodable response, or non-2xx without a message.
    TransportFailure,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppErrorKind::AuthenticationFailure => write!(f, "AuthenticationFailure"),
            AppErrorKind::ValidationFailure => write!(f, "ValidationFailure"),
            AppErrorKind::AuthorizationFailure => write!(f, "AuthorizationFailure"),
            AppErrorKind::TransportFailure => write!(f, "TransportFailure"),
        }
    }
}

/// Structured error used by the client core and rendered by the UI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

/// Error body shape used by the backend's JSON error responses.
#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

impl AppError {
    fn with_kind(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            field_errors: HashMap::new(),
        }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::AuthenticationFailure, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            field_errors,
            ..Self::with_kind(AppErrorKind::ValidationFailure, message)
        }
    }

    /// Validation failure on a single field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut fields = HashMap::new();
        fields.insert(field.to_string(), message.clone());
        Self::validation(message, fields)
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::AuthorizationFailure, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::with_kind(AppErrorKind::TransportFailure, message)
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Classify a non-2xx response from a write or read call.
    ///
    /// A structured message (JSON `{"message": ..}` or a short plain-text body)
    /// makes it a `ValidationFailure`; anything else is a `TransportFailure`.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match extract_message(body) {
            Some(message) => Self::validation(message, HashMap::new()).with_status(status),
            None => Self::transport(format!("Server responded with status {status}"))
                .with_status(status),
        }
    }

    /// Classify a non-2xx response from the sign-in endpoint.
    pub fn from_sign_in_body(status: u16, body: &str) -> Self {
        let message = extract_message(body)
            .unwrap_or_else(|| "Login failed. Please check your credentials.".to_string());
        Self::authentication(message).with_status(status)
    }

    /// Extract a user-facing message from a serialized `AppError` or a raw string.
    ///
    /// Falls back to a generic message if nothing readable is found.
    pub fn friendly_message(error_string: &str) -> String {
        if let Ok(err) = serde_json::from_str::<Self>(error_string) {
            return err.message;
        }
        extract_message(error_string).unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
    }

    /// True for failures the UI should render inline next to the action.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self.kind, AppErrorKind::AuthorizationFailure)
    }
}

/// Longest plain-text body still treated as a human-readable message.
const MAX_PLAIN_MESSAGE_LEN: usize = 500;

fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<MessageBody>(trimmed) {
        let message = parsed.message.trim().to_string();
        return (!message.is_empty()).then_some(message);
    }
    // JSON without a message field, or an HTML error page, is not a message.
    if trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed.starts_with('<') {
        return None;
    }
    if trimmed.len() > MAX_PLAIN_MESSAGE_LEN {
        return None;
    }
    // The backend wraps some plain-text bodies in JSON string quotes.
    let unquoted = serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| trimmed.to_string());
    Some(unquoted)
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

/// Field keys follow the camelCase names used on the wire.
#[cfg(feature = "validation")]
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        match c {
            '_' => upper = true,
            c if upper => {
                name.extend(c.to_uppercase());
                upper = false;
            }
            c => name.push(c),
        }
    }
    name
}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(wire_name(field), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}
