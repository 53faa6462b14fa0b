use crate::allowance::{Allowance, AllowanceAmount, RevocationKind, TokenData};
use crate::analytics::{
    AnalyticsSink, Properties, REVOKED_ERC20_ALLOWANCE, REVOKED_ERC721_ALLOWANCE,
    UPDATED_ERC20_ALLOWANCE,
};
use crate::contracts::ContractCall;
use crate::err_custom_create;
use crate::error::{RevokeError, SubmitError};
use crate::notify::{NotificationSink, Placement, SubmittedNotice};
use crate::provider::{ContractHandle, SigningProvider};
use revoke_lib_common::utils::from_float;
use serde::Serialize;
use serde_json::json;
use web3::types::{Address, H256, U256};

pub const UNSUPPORTED_REVOKE_MESSAGE: &str =
    "This token does not support updating allowances, please revoke instead";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorClass {
    /// Rejected by the user or the provider for a reason we do not recognize
    SubmissionFailed,
    /// Token refuses to change a non-zero allowance to another non-zero value
    UnsupportedRevokePattern,
    ConfirmationWaitFailure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    UnsupportedRevokePattern,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Submitted(H256),
    RejectedKnownReason(RejectionKind),
    RejectedUnknown(SubmitError),
}

impl SubmissionOutcome {
    pub fn error_class(&self) -> Option<ErrorClass> {
        match self {
            SubmissionOutcome::Submitted(_) => None,
            SubmissionOutcome::RejectedKnownReason(RejectionKind::UnsupportedRevokePattern) => {
                Some(ErrorClass::UnsupportedRevokePattern)
            }
            SubmissionOutcome::RejectedUnknown(_) => Some(ErrorClass::SubmissionFailed),
        }
    }
}

/// Only ERC20 `approve` knows the unsupported operation code, on ERC721 paths it is an unknown rejection
pub fn classify_submission(
    kind: RevocationKind,
    submission: Result<H256, SubmitError>,
) -> SubmissionOutcome {
    match submission {
        Ok(tx_hash) => SubmissionOutcome::Submitted(tx_hash),
        Err(err) if kind == RevocationKind::Erc20Approve && err.is_unsupported_operation() => {
            SubmissionOutcome::RejectedKnownReason(RejectionKind::UnsupportedRevokePattern)
        }
        Err(err) => SubmissionOutcome::RejectedUnknown(err),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationResult {
    pub succeeded: bool,
    /// Replacement for the target allowance, `None` when it was removed or nothing changed
    pub new_allowance: Option<Allowance>,
    pub error_class: Option<ErrorClass>,
    pub tx_hash: Option<H256>,
}

impl RevocationResult {
    fn failed(error_class: ErrorClass, tx_hash: Option<H256>) -> Self {
        Self {
            succeeded: false,
            new_allowance: None,
            error_class: Some(error_class),
            tx_hash,
        }
    }

    fn succeeded(new_allowance: Option<Allowance>, tx_hash: H256) -> Self {
        Self {
            succeeded: true,
            new_allowance,
            error_class: None,
            tx_hash: Some(tx_hash),
        }
    }
}

/// Submits a single allowance change and follows it until it is confirmed.
///
/// Collaborators are borrowed, the flow can be shared by concurrent invocations.
pub struct RevocationFlow<'a> {
    provider: &'a dyn SigningProvider,
    notifications: &'a dyn NotificationSink,
    analytics: &'a dyn AnalyticsSink,
    confirmations: u64,
}

impl<'a> RevocationFlow<'a> {
    pub fn new(
        provider: &'a dyn SigningProvider,
        notifications: &'a dyn NotificationSink,
        analytics: &'a dyn AnalyticsSink,
    ) -> Self {
        Self {
            provider,
            notifications,
            analytics,
            confirmations: 1,
        }
    }

    pub fn with_confirmations(mut self, confirmations: u64) -> Self {
        self.confirmations = std::cmp::max(confirmations, 1);
        self
    }

    /// Removes the allowance, ERC20 allowances are set to zero
    pub async fn revoke(&self, target: &Allowance) -> Result<RevocationResult, RevokeError> {
        let kind = target.kind();
        let new_value = match kind {
            RevocationKind::Erc20Approve => Some(U256::zero()),
            _ => None,
        };
        self.submit(kind, target, new_value).await
    }

    /// Sets an ERC20 allowance to `amount_text` given in whole tokens, i.e. "5.0"
    pub async fn update(
        &self,
        target: &Allowance,
        token: &TokenData,
        amount_text: &str,
    ) -> Result<RevocationResult, RevokeError> {
        if token.contract != target.token {
            return Err(err_custom_create!(
                "Token data of {:#x} does not match allowance token {:#x}",
                token.contract.address,
                target.token.address
            ));
        }
        let new_value = from_float(amount_text, token.decimals)
            .map_err(|err| err_custom_create!("Invalid amount {amount_text}: {err}"))?;
        self.submit_change(
            RevocationKind::Erc20Approve,
            target,
            Some(new_value),
            Some(amount_text),
        )
        .await
    }

    pub async fn submit(
        &self,
        kind: RevocationKind,
        target: &Allowance,
        new_value: Option<U256>,
    ) -> Result<RevocationResult, RevokeError> {
        self.submit_change(kind, target, new_value, None).await
    }

    /// `amount_text` is the amount as the user typed it, reported to analytics next to the raw value
    async fn submit_change(
        &self,
        kind: RevocationKind,
        target: &Allowance,
        new_value: Option<U256>,
        amount_text: Option<&str>,
    ) -> Result<RevocationResult, RevokeError> {
        let call = build_call(kind, target, new_value)?;

        let contract = match self.provider.authorized_contract(&target.token).await {
            Ok(contract) => contract,
            Err(err) => {
                log::warn!("Ran into issue while revoking: {err}");
                return Ok(RevocationResult::failed(ErrorClass::SubmissionFailed, None));
            }
        };

        log::debug!("Calling contract.{call}");
        let outcome = classify_submission(kind, contract.submit(&call).await);
        let tx_hash = match outcome {
            SubmissionOutcome::Submitted(tx_hash) => tx_hash,
            SubmissionOutcome::RejectedKnownReason(RejectionKind::UnsupportedRevokePattern) => {
                log::debug!(
                    "{} rejected as unsupported by {:#x}",
                    call.method(),
                    target.token.address
                );
                self.notifications
                    .notify_error(UNSUPPORTED_REVOKE_MESSAGE, Placement::TopLeft);
                return Ok(RevocationResult::failed(
                    ErrorClass::UnsupportedRevokePattern,
                    None,
                ));
            }
            SubmissionOutcome::RejectedUnknown(err) => {
                log::warn!("Ran into issue while revoking: {err}");
                return Ok(RevocationResult::failed(ErrorClass::SubmissionFailed, None));
            }
        };

        let chain_id = self.provider.current_chain_id();
        self.notifications
            .notify_submitted(&SubmittedNotice::new(chain_id, tx_hash, call.method()));

        if let Err(err) = self
            .wait_for_confirmation(contract.as_ref(), tx_hash)
            .await
        {
            log::warn!("Failed to confirm transaction {tx_hash:#x}: {err}");
            return Ok(RevocationResult::failed(
                ErrorClass::ConfirmationWaitFailure,
                Some(tx_hash),
            ));
        }

        let (event_name, properties) =
            self.analytics_record(kind, target, new_value, amount_text, chain_id);
        self.analytics.record(event_name, &properties);

        let new_allowance = match (kind, new_value) {
            (RevocationKind::Erc20Approve, Some(value)) if !value.is_zero() => {
                Some(target.with_amount(AllowanceAmount::from_raw(value)))
            }
            _ => None,
        };
        log::info!(
            "{} of {:#x} to {:#x} confirmed in {:#x}",
            call.method(),
            target.token.address,
            target.spender,
            tx_hash
        );
        Ok(RevocationResult::succeeded(new_allowance, tx_hash))
    }

    async fn wait_for_confirmation(
        &self,
        contract: &dyn ContractHandle,
        tx_hash: H256,
    ) -> Result<(), RevokeError> {
        let confirmed = contract
            .wait_for_confirmations(tx_hash, self.confirmations)
            .await?;
        log::debug!(
            "Transaction {:#x} confirmed in block {} ({} confirmations)",
            confirmed.tx_hash,
            confirmed.block_number,
            confirmed.confirmations
        );
        Ok(())
    }

    fn analytics_record(
        &self,
        kind: RevocationKind,
        target: &Allowance,
        new_value: Option<U256>,
        amount_text: Option<&str>,
        chain_id: u64,
    ) -> (&'static str, Properties) {
        let mut properties = Properties::new();
        properties.insert("chainId".to_string(), json!(chain_id));
        properties.insert(
            "account".to_string(),
            json!(format!("{:#x}", self.provider.current_account())),
        );
        properties.insert(
            "spender".to_string(),
            json!(format!("{:#x}", target.spender)),
        );
        properties.insert(
            "token".to_string(),
            json!(format!("{:#x}", target.token.address)),
        );
        let event_name = match (kind, new_value) {
            (RevocationKind::Erc20Approve, Some(value)) if !value.is_zero() => {
                let raw_amount = value.to_string();
                properties.insert(
                    "amount".to_string(),
                    json!(amount_text.map(str::trim).unwrap_or(&raw_amount)),
                );
                properties.insert("rawAmount".to_string(), json!(raw_amount));
                UPDATED_ERC20_ALLOWANCE
            }
            (RevocationKind::Erc20Approve, _) => REVOKED_ERC20_ALLOWANCE,
            (RevocationKind::Erc721ApproveToken, _) => {
                if let Some(token_id) = target.token_id() {
                    properties.insert("tokenId".to_string(), json!(token_id.to_string()));
                }
                REVOKED_ERC721_ALLOWANCE
            }
            (RevocationKind::Erc721SetOperator, _) => REVOKED_ERC721_ALLOWANCE,
        };
        (event_name, properties)
    }
}

fn build_call(
    kind: RevocationKind,
    target: &Allowance,
    new_value: Option<U256>,
) -> Result<ContractCall, RevokeError> {
    if kind != target.kind() {
        return Err(err_custom_create!(
            "Cannot use {:?} for {:?} allowance of {:#x}",
            kind,
            target.kind(),
            target.token.address
        ));
    }
    let call = match kind {
        RevocationKind::Erc20Approve => ContractCall::Erc20Approve {
            spender: target.spender,
            amount: new_value.ok_or_else(|| {
                err_custom_create!("New allowance value is required for ERC20 approve")
            })?,
        },
        RevocationKind::Erc721ApproveToken => ContractCall::Erc721Approve {
            to: Address::zero(),
            token_id: target.token_id().ok_or_else(|| {
                err_custom_create!("Token id is required for ERC721 approve")
            })?,
        },
        RevocationKind::Erc721SetOperator => ContractCall::Erc721SetApprovalForAll {
            operator: target.spender,
            approved: false,
        },
    };
    Ok(call)
}
