use revoke_lib::allowance::{AllowanceAmount, AllowanceList, RevocationKind};
use revoke_lib::analytics::{REVOKED_ERC20_ALLOWANCE, UPDATED_ERC20_ALLOWANCE};
use revoke_lib::contracts::ContractCall;
use revoke_lib::revoke::RevocationFlow;
use revoke_lib_test::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use web3::types::{H256, U256};

#[tokio::test(flavor = "multi_thread")]
async fn test_revoke_unlimited_erc20_allowance() -> Result<(), anyhow::Error> {
    init_test_logger();
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let allowance = unlimited_erc20_allowance();
    let result = flow.revoke(&allowance).await?;

    assert!(result.succeeded);
    assert_eq!(result.new_allowance, None);
    assert_eq!(result.error_class, None);
    assert_eq!(result.tx_hash, Some(H256::from_low_u64_be(1)));

    let calls = provider.submitted_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].contract, *ERC20_TOKEN);
    assert_eq!(
        calls[0].call,
        ContractCall::Erc20Approve {
            spender: *SPENDER,
            amount: U256::zero()
        }
    );
    assert_eq!(provider.confirmation_waits(), vec![(H256::from_low_u64_be(1), 1)]);

    let submitted = notifications.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].chain_id, TEST_CHAIN_ID);
    assert_eq!(submitted[0].method, "ERC20.approve");
    assert!(notifications.errors().is_empty());

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    let (event_name, properties) = &events[0];
    assert_eq!(event_name, REVOKED_ERC20_ALLOWANCE);
    assert_eq!(properties["chainId"], json!(TEST_CHAIN_ID));
    assert_eq!(properties["account"], json!(format!("{:#x}", *OWNER)));
    assert_eq!(properties["spender"], json!(format!("{:#x}", *SPENDER)));
    assert_eq!(properties["token"], json!(format!("{:#x}", *ERC20_TOKEN)));
    assert!(!properties.contains_key("amount"));
    assert!(!properties.contains_key("rawAmount"));

    let mut list = AllowanceList::new(vec![allowance.clone()]);
    list.apply(&allowance, result.new_allowance)?;
    assert!(list.is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_erc20_allowance() -> Result<(), anyhow::Error> {
    init_test_logger();
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let allowance = unlimited_erc20_allowance();
    let result = flow.update(&allowance, &test_token_data(), "5.0").await?;

    let five_tokens = U256::from(5) * U256::exp10(18);
    assert!(result.succeeded);
    assert_eq!(
        provider.submitted_calls()[0].call,
        ContractCall::Erc20Approve {
            spender: *SPENDER,
            amount: five_tokens
        }
    );
    let new_allowance = result.new_allowance.clone().expect("replacement allowance");
    assert_eq!(new_allowance.amount, AllowanceAmount::Limited(five_tokens));
    assert_eq!(new_allowance.spender, *SPENDER);
    assert_eq!(new_allowance.kind(), RevocationKind::Erc20Approve);

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, UPDATED_ERC20_ALLOWANCE);
    assert_eq!(events[0].1["amount"], json!("5.0"));
    assert_eq!(events[0].1["rawAmount"], json!("5000000000000000000"));
    assert_eq!(notifications.submitted().len(), 1);

    let mut list = AllowanceList::new(vec![allowance.clone()]);
    list.apply(&allowance, result.new_allowance)?;
    assert_eq!(list.entries(), &[new_allowance]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_to_zero_is_revoke() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let result = flow
        .update(&unlimited_erc20_allowance(), &test_token_data(), "0")
        .await?;
    assert!(result.succeeded);
    assert_eq!(result.new_allowance, None);
    assert_eq!(analytics.events()[0].0, REVOKED_ERC20_ALLOWANCE);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_with_invalid_amount() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    for amount in ["", "abc", "-1", "1.2.3"] {
        let res = flow
            .update(&unlimited_erc20_allowance(), &test_token_data(), amount)
            .await;
        assert!(res.is_err(), "amount {amount:?} should be rejected");
    }
    assert!(provider.submitted_calls().is_empty());
    assert!(notifications.records().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_preconditions() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let allowance = unlimited_erc20_allowance();
    assert!(flow
        .submit(RevocationKind::Erc20Approve, &allowance, None)
        .await
        .is_err());
    assert!(flow
        .submit(RevocationKind::Erc721SetOperator, &allowance, None)
        .await
        .is_err());
    assert!(flow
        .submit(RevocationKind::Erc20Approve, &erc721_operator_allowance(), Some(U256::zero()))
        .await
        .is_err());
    assert!(provider.submitted_calls().is_empty());
    assert!(analytics.events().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_result_waits_for_confirmation() -> Result<(), anyhow::Error> {
    init_test_logger();
    let gate = Arc::new(ConfirmationGate::closed());
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID).with_gate(gate.clone());
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let allowance = unlimited_erc20_allowance();
    let revocation = flow.revoke(&allowance);
    tokio::pin!(revocation);

    let early = tokio::time::timeout(Duration::from_millis(100), &mut revocation).await;
    assert!(early.is_err(), "result resolved before confirmation");
    assert_eq!(notifications.submitted().len(), 1);
    assert!(analytics.events().is_empty());

    gate.release();
    let result = revocation.await?;
    assert!(result.succeeded);
    assert_eq!(notifications.submitted().len(), 1);
    assert_eq!(analytics.events().len(), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_confirmation_failure() -> Result<(), anyhow::Error> {
    let gate = Arc::new(ConfirmationGate::closed());
    gate.fail("receipt status 0");
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID).with_gate(gate);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let result = flow.revoke(&unlimited_erc20_allowance()).await?;
    assert!(!result.succeeded);
    assert_eq!(
        result.error_class,
        Some(revoke_lib::revoke::ErrorClass::ConfirmationWaitFailure)
    );
    assert_eq!(result.tx_hash, Some(H256::from_low_u64_be(1)));
    assert_eq!(result.new_allowance, None);
    assert_eq!(notifications.submitted().len(), 1);
    assert!(analytics.events().is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_configured_confirmations() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow =
        RevocationFlow::new(&provider, &notifications, &analytics).with_confirmations(3);

    flow.revoke(&unlimited_erc20_allowance()).await?;
    assert_eq!(provider.confirmation_waits(), vec![(H256::from_low_u64_be(1), 3)]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_raw_value_reports_raw_amount() -> Result<(), anyhow::Error> {
    let provider = MockSigningProvider::new(*OWNER, TEST_CHAIN_ID);
    let notifications = RecordingNotificationSink::default();
    let analytics = RecordingAnalyticsSink::default();
    let flow = RevocationFlow::new(&provider, &notifications, &analytics);

    let result = flow
        .submit(
            RevocationKind::Erc20Approve,
            &unlimited_erc20_allowance(),
            Some(U256::from(1234)),
        )
        .await?;
    assert!(result.succeeded);

    let events = analytics.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, UPDATED_ERC20_ALLOWANCE);
    assert_eq!(events[0].1["amount"], json!("1234"));
    assert_eq!(events[0].1["rawAmount"], json!("1234"));
    Ok(())
}
