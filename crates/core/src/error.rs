//! Error taxonomy for providers and the order store.

use thiserror::Error;

/// Errors surfaced by a quote provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Missing or rejected credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Transport failure, timeout, or malformed response.
    #[error("network error: {0}")]
    Network(String),

    /// The symbol or expiration is unknown to the provider.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors surfaced by an order store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no order with id {0}")]
    NotFound(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store document: {0}")]
    Corrupt(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_display_their_kind() {
        let err = ProviderError::Unauthorized("bad api key".into());
        assert!(err.to_string().contains("unauthorized"));
        let err = ProviderError::Network("connection reset".into());
        assert!(err.to_string().contains("network"));
        let err = ProviderError::NotFound("ZZZZ".into());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn store_not_found_names_the_id() {
        let err = StoreError::NotFound("abc-123".into());
        assert!(err.to_string().contains("abc-123"));
    }
}
