//! Orderer endpoint membership check.

use crate::client::types::{ClientError, ClientResult};

/// Orderer address a healthy sample network advertises on its channel.
pub const EXPECTED_ORDERER: &str = "orderer.example.com:7050";

/// Whether `expected` appears verbatim in `orderers`.
///
/// Exact, case-sensitive, whole-string comparison; position is irrelevant.
pub fn contains_orderer<S: AsRef<str>>(orderers: &[S], expected: &str) -> bool {
    orderers.iter().any(|o| o.as_ref() == expected)
}

/// Fail with [`ClientError::OrdererMissing`] unless `expected` is listed.
pub fn ensure_orderer<S: AsRef<str>>(orderers: &[S], expected: &str) -> ClientResult<()> {
    if contains_orderer(orderers, expected) {
        return Ok(());
    }
    Err(ClientError::OrdererMissing {
        expected: expected.to_string(),
        actual: orderers.iter().map(|o| o.as_ref().to_string()).collect(),
    })
}
