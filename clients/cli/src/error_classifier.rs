use crate::api::error::ApiError;
use crate::logging::LogLevel;

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Picks the log level a failed dashboard request is reported at.
    pub fn classify(&self, error: &ApiError) -> LogLevel {
        match error {
            // Temporary gateway or service issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Rejected requests: bad ids, missing parameters
            ApiError::Http { status, .. } if (400..=499).contains(status) => LogLevel::Error,

            // The service answered with something that isn't our JSON
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn server_errors_are_warnings() {
        assert_eq!(ErrorClassifier::new().classify(&http(502)), LogLevel::Warn);
    }

    #[test]
    fn client_errors_and_bad_json_are_errors() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify(&http(400)), LogLevel::Error);
        let decode = serde_json::from_str::<Vec<u8>>("nope").unwrap_err();
        assert_eq!(classifier.classify(&ApiError::Decode(decode)), LogLevel::Error);
    }
}
