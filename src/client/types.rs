//! Client-handle error definitions.

use thiserror::Error;

use crate::sdk::SdkError;

/// Errors that can occur while building or using a client handle.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to create fabric sdk: {0}")]
    SdkInit(#[source] SdkError),

    #[error("failed to create resource client: {0}")]
    ResourceClient(#[source] SdkError),

    #[error("failed to create channel client: {0}")]
    ChannelClient(#[source] SdkError),

    #[error("failed to get channel client context: {0}")]
    ChannelContext(#[source] SdkError),

    #[error("failed to create new channel config: {0}")]
    ChannelConfig(#[source] SdkError),

    #[error("failed to query channel config: {0}")]
    Query(#[source] SdkError),

    /// The handle is bound to a different channel.
    #[error("client is bound to channel '{bound}', not '{requested}'")]
    ChannelMismatch { bound: String, requested: String },

    /// Expected orderer endpoint absent from the channel configuration.
    #[error("expected orderer {expected}, got {actual:?}")]
    OrdererMissing {
        expected: String,
        actual: Vec<String>,
    },
}

/// Result type for client-handle operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::OrdererMissing {
            expected: "orderer.example.com:7050".into(),
            actual: vec!["peer0.org1.example.com:7051".into()],
        };
        assert_eq!(
            err.to_string(),
            "expected orderer orderer.example.com:7050, got [\"peer0.org1.example.com:7051\"]"
        );

        let err = ClientError::ResourceClient(SdkError::UnknownOrganization("Org9".into()));
        assert_eq!(
            err.to_string(),
            "failed to create resource client: organization 'Org9' not found in profile"
        );
    }
}
