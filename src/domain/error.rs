use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Index transport error: {message}")]
    IndexTransport { message: String },

    #[error("Index service error ({status}): {detail}")]
    IndexService { status: u16, detail: String },

    #[error("Upstream error: {message}")]
    Upstream { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn index_transport(message: impl Into<String>) -> Self {
        Self::IndexTransport {
            message: message.into(),
        }
    }

    pub fn index_service(status: u16, detail: impl Into<String>) -> Self {
        Self::IndexService {
            status,
            detail: detail.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error came from the similarity index (transport or service side)
    pub fn is_index_error(&self) -> bool {
        matches!(self, Self::IndexTransport { .. } | Self::IndexService { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error() {
        let error = DomainError::parse("missing field `messages`");
        assert_eq!(error.to_string(), "Parse error: missing field `messages`");
    }

    #[test]
    fn test_index_service_error() {
        let error = DomainError::index_service(500, "Indexing service error");
        assert_eq!(
            error.to_string(),
            "Index service error (500): Indexing service error"
        );
        assert!(error.is_index_error());
    }

    #[test]
    fn test_cache_error_is_not_index_error() {
        let error = DomainError::cache("Connection refused");
        assert_eq!(error.to_string(), "Cache error: Connection refused");
        assert!(!error.is_index_error());
    }
}
