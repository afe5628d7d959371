//! Channel configuration query against fake and profile-backed SDKs.

use std::sync::Arc;
use std::time::Duration;

use fabric_harness::client::{Client, ClientError, EXPECTED_ORDERER};
use fabric_harness::config::validation::MAX_TIMEOUT_SECS;
use fabric_harness::config::{ChaincodeSettings, ConfigError, ValidationError};
use fabric_harness::sdk::{ContextOptions, SdkError};

mod common;
use common::{write_profile, RecordingSdk, SAMPLE_PROFILE};

fn client_over(sdk: &RecordingSdk) -> Client {
    Client::with_sdk(
        "profile.yaml",
        Arc::new(sdk.clone()),
        "Org1",
        "Admin",
        "User1",
        "mychannel",
        &ChaincodeSettings::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_expected_orderer_passes() {
    let sdk = RecordingSdk::new(&["orderer.example.com:7050"]);
    let client = client_over(&sdk);

    let cfg = client
        .get_channel_config("mychannel", "peer0.org1.example.com")
        .await
        .unwrap();
    assert_eq!(cfg.orderers(), [EXPECTED_ORDERER.to_string()]);

    // Queried as the admin of the handle's organization.
    let calls = sdk.calls();
    assert_eq!(
        calls.context,
        vec![("mychannel".to_string(), ContextOptions::user("Admin").with_org("Org1"))]
    );
}

#[tokio::test]
async fn test_expected_orderer_in_any_position() {
    let sdk = RecordingSdk::new(&[
        "orderer3.example.com:9050",
        "orderer.example.com:7050",
        "orderer2.example.com:8050",
    ]);
    assert!(client_over(&sdk).get_channel_config("mychannel", "").await.is_ok());
}

#[tokio::test]
async fn test_missing_orderer_fails() {
    for orderers in [
        vec!["peer0.org1.example.com:7051"],
        vec![],
        vec!["Orderer.example.com:7050"],
        vec!["orderer.example.com:7051"],
    ] {
        let sdk = RecordingSdk::new(&orderers);
        let err = client_over(&sdk)
            .get_channel_config("mychannel", "peer0.org1.example.com")
            .await
            .unwrap_err();
        match err {
            ClientError::OrdererMissing { expected, actual } => {
                assert_eq!(expected, "orderer.example.com:7050");
                assert_eq!(actual, orderers);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[tokio::test]
async fn test_peer_argument_ignored() {
    let sdk = RecordingSdk::new(&["orderer.example.com:7050"]);
    let client = client_over(&sdk);
    let a = client.get_channel_config("mychannel", "peer0.org1.example.com").await.unwrap();
    let b = client.get_channel_config("mychannel", "no-such-peer").await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_other_channel_rejected() {
    let sdk = RecordingSdk::new(&["orderer.example.com:7050"]);
    let err = client_over(&sdk)
        .get_channel_config("otherchannel", "peer0")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::ChannelMismatch { .. }));
    assert!(sdk.calls().context.is_empty());
}

#[tokio::test]
async fn test_slow_query_times_out() {
    let mut sdk = RecordingSdk::new(&["orderer.example.com:7050"]);
    sdk.query_delay = Some(Duration::from_secs(5));
    let err = client_over(&sdk)
        .get_channel_config("mychannel", "peer0")
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Query(SdkError::Timeout { .. })));
}

#[tokio::test]
async fn test_request_cancelled_after_success() {
    let sdk = RecordingSdk::new(&["orderer.example.com:7050"]);
    client_over(&sdk).get_channel_config("mychannel", "").await.unwrap();

    let requests = sdk.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_cancelled());
}

#[tokio::test]
async fn test_request_cancelled_after_missing_orderer() {
    let sdk = RecordingSdk::new(&["orderer2.example.com:8050"]);
    let err = client_over(&sdk).get_channel_config("mychannel", "").await.unwrap_err();
    assert!(matches!(err, ClientError::OrdererMissing { .. }));

    let requests = sdk.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_cancelled());
}

#[tokio::test]
async fn test_request_cancelled_after_failed_query() {
    let mut sdk = RecordingSdk::new(&["orderer.example.com:7050"]);
    sdk.query_delay = Some(Duration::from_secs(5));
    let err = client_over(&sdk).get_channel_config("mychannel", "").await.unwrap_err();
    assert!(matches!(err, ClientError::Query(_)));

    let requests = sdk.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].is_cancelled());
}

#[test]
fn test_oversized_profile_timeout_fails_at_load() {
    let profile = write_profile(
        ".yaml",
        &SAMPLE_PROFILE.replace(
            "ordererResponseSecs: 5",
            "ordererResponseSecs: 18446744073709551615",
        ),
    );
    let err = Client::new(profile.path(), "Org1", "Admin", "User1").unwrap_err();
    match err {
        ClientError::SdkInit(SdkError::Config(ConfigError::Validation(errors))) => {
            assert_eq!(
                errors,
                vec![ValidationError::TimeoutTooLarge {
                    name: "orderer_response".into(),
                    secs: u64::MAX,
                    max: MAX_TIMEOUT_SECS,
                }]
            );
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_profile_backed_end_to_end() {
    let profile = write_profile(".yaml", SAMPLE_PROFILE);
    let client = Client::new(profile.path(), "Org1", "Admin", "User1").unwrap();

    assert_eq!(client.channel_id(), "mychannel");
    assert_eq!(client.resource_client().identity().msp_id, "Org1MSP");
    assert_eq!(client.channel_client().identity().org, "Org1");
    assert_eq!(client.resource_client().joined_channels(), vec!["mychannel".to_string()]);

    let cfg = client
        .get_channel_config("mychannel", "peer0.org1.example.com")
        .await
        .unwrap();
    assert_eq!(cfg.orderers(), ["orderer.example.com:7050".to_string()]);
    assert_eq!(cfg.msps, vec!["Org1MSP".to_string()]);
}

#[tokio::test]
async fn test_profile_without_expected_orderer() {
    let profile = write_profile(
        ".yaml",
        &SAMPLE_PROFILE.replace("ssl-target-name-override: orderer.example.com", "ssl-target-name-override: orderer0.example.org"),
    );
    let client = Client::new(profile.path(), "Org1", "Admin", "User1").unwrap();
    let err = client.get_channel_config("mychannel", "").await.unwrap_err();
    match err {
        ClientError::OrdererMissing { actual, .. } => {
            assert_eq!(actual, vec!["orderer0.example.org:7050".to_string()])
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unknown_user_in_profile() {
    let profile = write_profile(".yaml", SAMPLE_PROFILE);
    let err = Client::new(profile.path(), "Org1", "Admin", "User9").unwrap_err();
    assert!(matches!(err, ClientError::ChannelClient(SdkError::UnknownUser { .. })));
}

#[test]
fn test_unknown_admin_org_in_profile() {
    let profile = write_profile(".yaml", SAMPLE_PROFILE);
    let err = Client::new(profile.path(), "Org2", "Admin", "User1").unwrap_err();
    assert!(matches!(err, ClientError::ResourceClient(SdkError::UnknownOrganization(_))));
}
