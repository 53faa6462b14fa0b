use revoke_lib::analytics::REVOKED_ERC721_ALLOWANCE;
use revoke_lib::contracts::ContractCall;
use revoke_lib::revoke::RevocationFlow;
use revoke_lib_test::*;
use serde_json::json;
use web3::types::{Address, U256};

#[tokio::test(flavor = "multi_thread")]
async fn test_revoke_single_token_approval() -> Result<(), anyhow::Error> {
    init_test_logger();
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let result = flow.revoke(&erc721_token_allowance(42)).await?;
    assert!(result.succeeded);
    assert_eq!(result.new_allowance, None);

    let calls = provider.submitted_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].contract, *ERC721_TOKEN);
    assert_eq!(
        calls[0].call,
        ContractCall::Erc721Approve {
            to: Address::zero(),
            token_id: U256::from(42)
        }
    );
    assert_eq!(notifications.submitted()[0].method, "ERC721.approve");

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, REVOKED_ERC721_ALLOWANCE);
    assert_eq!(events[0].1["tokenId"], json!("42"));
    assert_eq!(events[0].1["token"], json!(format!("{:#x}", *ERC721_TOKEN)));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_revoke_operator_approval() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let result = flow.revoke(&erc721_operator_allowance()).await?;
    assert!(result.succeeded);
    assert_eq!(result.new_allowance, None);
    assert_eq!(
        provider.submitted_calls()[0].call,
        ContractCall::Erc721SetApprovalForAll {
            operator: *SPENDER,
            approved: false
        }
    );
    assert_eq!(
        notifications.submitted()[0].method,
        "ERC721.setApprovalForAll"
    );

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, REVOKED_ERC721_ALLOWANCE);
    assert!(!events[0].1.contains_key("tokenId"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_revocations() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let allowances = vec![
        erc721_token_allowance(1),
        erc721_token_allowance(2),
        erc721_operator_allowance(),
        unlimited_erc20_allowance(),
    ];
    let results =
        futures::future::join_all(allowances.iter().map(|allowance| flow.revoke(allowance)))
            .await;

    for result in results {
        assert!(result?.succeeded);
    }
    assert_eq!(provider.submitted_calls().len(), 4);
    assert_eq!(analytics.events().len(), 4);

    let mut tokens = notifications
        .submitted()
        .iter()
        .map(|notice| notice.correlation_token)
        .collect::<Vec<_>>();
    tokens.sort();
    tokens.dedup();
    assert_eq!(tokens.len(), 4);
    Ok(())
}
