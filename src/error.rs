//! Failure Taxonomy and Message Normalizer
//!
//! Transports report what went wrong as an [`HttpFailure`]. The data
//! access services turn it into a [`ServiceError`] whose message is the
//! one string a display layer shows to the user; [`normalize`] is the
//! pure mapping between the two.

use std::fmt;
use thiserror::Error;

/// What a transport observed when a request did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpFailure {
    /// The request never left the client (bad URL, body encoding, ...)
    ClientSide { message: String },

    /// No HTTP response at all. Browsers report this as status 0.
    Unreachable {
        self_signed_cert: bool,
        detail: Option<String>,
    },

    /// The server answered with a non-success status
    Status {
        code: u16,
        status_text: Option<String>,
        message: Option<String>,
    },

    /// No status is known; only a message, if anything
    Unknown { message: Option<String> },
}

/// Coarse classes of [`HttpFailure`], for logging and display styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureClass {
    ClientSide,
    Connectivity,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Server,
    Unclassified,
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureClass::ClientSide => "client_side",
            FailureClass::Connectivity => "connectivity",
            FailureClass::BadRequest => "bad_request",
            FailureClass::Unauthorized => "unauthorized",
            FailureClass::Forbidden => "forbidden",
            FailureClass::NotFound => "not_found",
            FailureClass::Server => "server",
            FailureClass::Unclassified => "unclassified",
        };
        f.write_str(name)
    }
}

/// Markers of a self-signed certificate in transport error text
const SELF_SIGNED_MARKERS: [&str; 3] = [
    "depth_zero_self_signed_cert",
    "self-signed certificate",
    "self signed certificate",
];

/// Whether transport error text reports a self-signed certificate
pub fn is_self_signed_cert(text: &str) -> bool {
    let text = text.to_lowercase();
    SELF_SIGNED_MARKERS.iter().any(|m| text.contains(m))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl HttpFailure {
    /// Build from a status code the way a browser reports it: 0 means the
    /// server was never reached.
    pub fn from_status(code: u16, status_text: Option<String>, message: Option<String>) -> Self {
        if code == 0 {
            let detail = non_empty(message).or_else(|| non_empty(status_text));
            let self_signed_cert = detail.as_deref().is_some_and(is_self_signed_cert);
            HttpFailure::Unreachable {
                self_signed_cert,
                detail,
            }
        } else {
            HttpFailure::Status {
                code,
                status_text: non_empty(status_text),
                message: non_empty(message),
            }
        }
    }

    pub fn client_side(message: impl Into<String>) -> Self {
        HttpFailure::ClientSide {
            message: message.into(),
        }
    }

    /// Status code, with 0 for an unreachable server
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpFailure::Status { code, .. } => Some(*code),
            HttpFailure::Unreachable { .. } => Some(0),
            HttpFailure::ClientSide { .. } | HttpFailure::Unknown { .. } => None,
        }
    }

    pub fn class(&self) -> FailureClass {
        match self {
            HttpFailure::ClientSide { .. } => FailureClass::ClientSide,
            HttpFailure::Unreachable { .. } => FailureClass::Connectivity,
            HttpFailure::Status { code, .. } => match code {
                400 => FailureClass::BadRequest,
                401 => FailureClass::Unauthorized,
                403 => FailureClass::Forbidden,
                404 => FailureClass::NotFound,
                500 | 502 | 503 => FailureClass::Server,
                _ => FailureClass::Unclassified,
            },
            HttpFailure::Unknown { .. } => FailureClass::Unclassified,
        }
    }
}

/// Map a failure to the message shown to the user.
///
/// Total: every input yields exactly one non-empty string.
pub fn normalize(failure: &HttpFailure) -> String {
    match failure {
        HttpFailure::ClientSide { message } => match message.trim() {
            "" => "Error: the request could not be sent.".to_string(),
            message => format!("Error: {}", message),
        },
        HttpFailure::Unreachable {
            self_signed_cert: true,
            ..
        } => "TLS certificate error: the server presented a self-signed certificate. \
              Configure a trusted certificate or use HTTP for development."
            .to_string(),
        HttpFailure::Unreachable { .. } => {
            "Unable to reach the server. Check your network connection or TLS configuration."
                .to_string()
        }
        HttpFailure::Status {
            code,
            status_text,
            message,
        } => match code {
            400 => "Bad request. Check the submitted data.".to_string(),
            401 => "You are not authorized to perform this action.".to_string(),
            403 => "Access forbidden.".to_string(),
            404 => "Resource not found.".to_string(),
            500 => "Internal server error.".to_string(),
            502 => "Gateway error. The server is unavailable.".to_string(),
            503 => "Service temporarily unavailable.".to_string(),
            code => {
                let detail = message
                    .as_deref()
                    .or(status_text.as_deref())
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .unwrap_or("Unknown error");
                format!("Error {}: {}", code, detail)
            }
        },
        HttpFailure::Unknown { message } => match message.as_deref().map(str::trim) {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => "An unexpected error occurred.".to_string(),
        },
    }
}

/// A failure surfaced at a data access service boundary.
///
/// Displays as the normalized, user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ServiceError {
    /// Originating service, e.g. `"OrderService"`
    pub service: &'static str,
    pub failure: HttpFailure,
    pub message: String,
}

impl ServiceError {
    pub fn new(service: &'static str, failure: HttpFailure) -> Self {
        let message = normalize(&failure);

        if let HttpFailure::Unreachable {
            self_signed_cert: true,
            ..
        } = failure
        {
            tracing::warn!(service, "Self-signed certificate detected; use a trusted certificate");
        }

        tracing::error!(
            service,
            status = ?failure.status(),
            class = %failure.class(),
            error_message = %message,
            "Request failed"
        );

        Self {
            service,
            failure,
            message,
        }
    }

    pub fn class(&self) -> FailureClass {
        self.failure.class()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn status(code: u16) -> HttpFailure {
        HttpFailure::from_status(code, None, None)
    }

    #[test]
    fn test_known_statuses_are_distinct_and_non_empty() {
        let codes = [0, 400, 401, 403, 404, 500, 502, 503, 418];
        let messages: Vec<String> = codes.iter().map(|c| normalize(&status(*c))).collect();

        assert!(messages.iter().all(|m| !m.is_empty()));
        let unique: HashSet<&String> = messages.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_unknown_status_embeds_code_and_server_text() {
        let failure = HttpFailure::from_status(
            409,
            Some("Conflict".to_string()),
            Some("Order already exists".to_string()),
        );
        assert_eq!(normalize(&failure), "Error 409: Order already exists");

        let failure = HttpFailure::from_status(409, Some("Conflict".to_string()), None);
        assert_eq!(normalize(&failure), "Error 409: Conflict");

        assert_eq!(normalize(&status(418)), "Error 418: Unknown error");
    }

    #[test]
    fn test_status_zero_is_unreachable() {
        let failure = status(0);
        assert_eq!(failure.status(), Some(0));
        assert_eq!(failure.class(), FailureClass::Connectivity);
        assert!(normalize(&failure).starts_with("Unable to reach the server"));
    }

    #[test]
    fn test_self_signed_certificate_sub_case() {
        let failure =
            HttpFailure::from_status(0, None, Some("DEPTH_ZERO_SELF_SIGNED_CERT".to_string()));
        assert_eq!(
            failure,
            HttpFailure::Unreachable {
                self_signed_cert: true,
                detail: Some("DEPTH_ZERO_SELF_SIGNED_CERT".to_string()),
            }
        );
        assert!(normalize(&failure).starts_with("TLS certificate error"));

        assert!(is_self_signed_cert("invalid peer certificate: self signed certificate"));
        assert!(!is_self_signed_cert("connection refused"));
    }

    #[test]
    fn test_client_side_has_its_own_message() {
        let failure = HttpFailure::client_side("relative URL without a base");
        assert_eq!(normalize(&failure), "Error: relative URL without a base");
        assert_eq!(failure.status(), None);
        assert!(!normalize(&HttpFailure::client_side("  ")).is_empty());
    }

    #[test]
    fn test_unknown_falls_back() {
        let failure = HttpFailure::Unknown { message: None };
        assert_eq!(normalize(&failure), "An unexpected error occurred.");

        let failure = HttpFailure::Unknown {
            message: Some("stream closed".to_string()),
        };
        assert_eq!(normalize(&failure), "stream closed");
    }

    #[test]
    fn test_classes() {
        assert_eq!(status(400).class(), FailureClass::BadRequest);
        assert_eq!(status(401).class(), FailureClass::Unauthorized);
        assert_eq!(status(403).class(), FailureClass::Forbidden);
        assert_eq!(status(404).class(), FailureClass::NotFound);
        assert_eq!(status(502).class(), FailureClass::Server);
        assert_eq!(status(418).class(), FailureClass::Unclassified);
    }

    #[test]
    fn test_service_error_displays_message() {
        let err = ServiceError::new("OrderService", status(404));
        assert_eq!(err.to_string(), "Resource not found.");
        assert_eq!(err.service, "OrderService");
        assert_eq!(err.class(), FailureClass::NotFound);
    }
}
