#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The portal answered with a non-200 status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The portal answered 200 but not with JSON (expired session cookies
    /// tend to produce an HTML login page here).
    #[error("Unexpected content type: {content_type}")]
    UnexpectedResponse { content_type: String, body: String },

    /// The portal reported a failure in its JSON envelope.
    #[error("API error: {0}")]
    Api(String),

    /// JSON arrived but carries neither a `data` nor a `success` key.
    #[error("API response missing data and success fields")]
    MissingFields,

    #[error("Not configured. Run 'ptwater setup' first.")]
    NotConfigured,

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotConfigured => 2,
            AppError::Api(_) => 3,
            _ => 1,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Status { .. } => "status",
            AppError::UnexpectedResponse { .. } => "unexpected_response",
            AppError::Api(_) => "api",
            AppError::MissingFields => "missing_fields",
            AppError::NotConfigured => "not_configured",
            AppError::Keychain(_) => "keychain",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Http(_) => "http",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "error": self.error_type(),
            "message": self.to_string(),
        });
        if let AppError::Status { status, .. } = self {
            obj["status"] = serde_json::json!(status);
        }
        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_text_carries_the_code() {
        let err = AppError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn test_api_error_carries_the_message() {
        let err = AppError::Api("token失效".into());
        assert_eq!(err.to_string(), "API error: token失效");
        assert_eq!(err.error_type(), "api");
    }

    #[test]
    fn test_to_json_includes_status() {
        let err = AppError::Status {
            status: 502,
            body: String::new(),
        };
        let json = err.to_json();
        assert_eq!(json["error"], "status");
        assert_eq!(json["status"], 502);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::NotConfigured.exit_code(), 2);
        assert_eq!(AppError::Api("x".into()).exit_code(), 3);
        assert_eq!(AppError::MissingFields.exit_code(), 1);
    }
}
