/// Errors raised while enumerating live children.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EnumeratorError {
    /// The endpoint could not be reached or did not answer in time.
    #[error("Unable to reach {endpoint}: {message}")]
    Connectivity { endpoint: String, message: String },

    /// The endpoint answered with something other than a list of children.
    #[error("Unexpected response from {endpoint}: {message}")]
    Protocol { endpoint: String, message: String },
}

impl EnumeratorError {
    pub fn connectivity(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn protocol(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Self::Connectivity { endpoint, .. } | Self::Protocol { endpoint, .. } => endpoint,
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_endpoint() {
        let err = EnumeratorError::connectivity("localhost:9092", "connection refused");
        assert_eq!(
            err.to_string(),
            "Unable to reach localhost:9092: connection refused"
        );
        assert_eq!(err.endpoint(), "localhost:9092");
        assert!(err.is_connectivity());
        assert!(!EnumeratorError::protocol("x", "y").is_connectivity());
    }
}
