use crate::allowance::ContractRef;
use crate::contracts::ContractCall;
use crate::error::{RevokeError, SubmitError};
use async_trait::async_trait;
use serde::Serialize;
use web3::types::{Address, H256};

/// Transaction observed on chain with the requested number of confirmations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmedTransaction {
    pub tx_hash: H256,
    pub block_number: u64,
    pub confirmations: u64,
}

/// Handle to a token contract that sends transactions on behalf of the connected account
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Submit a state changing call, returns hash of the broadcast transaction
    async fn submit(&self, call: &ContractCall) -> Result<H256, SubmitError>;

    /// Suspends until the transaction has at least `confirmations` confirmations.
    ///
    /// Reverted transactions are reported as errors.
    async fn wait_for_confirmations(
        &self,
        tx_hash: H256,
        confirmations: u64,
    ) -> Result<ConfirmedTransaction, RevokeError>;
}

/// Connected wallet: the account in use, the chain it is on and the ability to
/// create contract handles authorized to send transactions as that account
#[async_trait]
pub trait SigningProvider: Send + Sync {
    fn current_account(&self) -> Address;

    fn current_chain_id(&self) -> u64;

    async fn authorized_contract(
        &self,
        contract: &ContractRef,
    ) -> Result<Box<dyn ContractHandle>, RevokeError>;
}
