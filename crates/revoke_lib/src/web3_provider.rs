use crate::allowance::ContractRef;
use crate::config::{Chain, Engine};
use crate::contracts::ContractCall;
use crate::error::*;
use crate::provider::{ConfirmedTransaction, ContractHandle, SigningProvider};
use crate::signer::SignerAccount;
use crate::{err_create, err_custom_create, err_from};
use async_trait::async_trait;
use revoke_lib_common::utils::gwei_to_u256;
use std::time::Duration;
use web3::transports::Http;
use web3::types::{
    Address, BlockNumber, Bytes, CallRequest, TransactionParameters, H256, U256, U64,
};
use web3::Web3;

const GAS_SAFETY_MARGIN: u64 = 20000;

#[derive(Debug, Clone)]
struct TxSettings {
    chain_id: u64,
    max_fee_per_gas: U256,
    priority_fee: U256,
    receipt_poll_interval: Duration,
    confirmation_timeout: Option<Duration>,
    max_poll_errors: Option<u32>,
}

/// Read only connection to the first configured endpoint of the chain
pub fn create_web3(chain: &Chain) -> Result<Web3<Http>, RevokeError> {
    let endpoint = chain.rpc_endpoints.first().ok_or(err_custom_create!(
        "No rpc endpoints configured for chain {}",
        chain.chain_name
    ))?;
    url::Url::parse(endpoint)
        .map_err(|err| err_custom_create!("Invalid rpc endpoint {endpoint}: {err}"))?;
    let transport = Http::new(endpoint).map_err(err_from!())?;
    Ok(Web3::new(transport))
}

/// SigningProvider talking to a JSON-RPC node, signing locally through [SignerAccount]
pub struct Web3SigningProvider {
    web3: Web3<Http>,
    account: SignerAccount,
    settings: TxSettings,
}

impl Web3SigningProvider {
    pub async fn connect(
        chain: &Chain,
        engine: &Engine,
        account: SignerAccount,
    ) -> Result<Self, RevokeError> {
        let web3 = create_web3(chain)?;
        let remote_chain_id = web3.eth().chain_id().await.map_err(err_from!())?;
        if remote_chain_id != U256::from(chain.chain_id) {
            return Err(err_custom_create!(
                "Endpoint of {} reports chain id {}, expected {}",
                chain.chain_name,
                remote_chain_id,
                chain.chain_id
            ));
        }
        account.check_if_sign_possible().await?;

        log::info!(
            "Connected to {} (chain id {}) as {}",
            chain.chain_name,
            chain.chain_id,
            account
        );
        Ok(Self {
            web3,
            account,
            settings: TxSettings {
                chain_id: chain.chain_id,
                max_fee_per_gas: gwei_to_u256(chain.max_fee_per_gas).map_err(err_from!())?,
                priority_fee: gwei_to_u256(chain.priority_fee).map_err(err_from!())?,
                receipt_poll_interval: Duration::from_millis(engine.receipt_poll_interval),
                confirmation_timeout: chain.confirmation_timeout.map(Duration::from_secs),
                max_poll_errors: engine.max_poll_errors,
            },
        })
    }

    pub fn web3(&self) -> &Web3<Http> {
        &self.web3
    }
}

#[async_trait]
impl SigningProvider for Web3SigningProvider {
    fn current_account(&self) -> Address {
        self.account.address
    }

    fn current_chain_id(&self) -> u64 {
        self.settings.chain_id
    }

    async fn authorized_contract(
        &self,
        contract: &ContractRef,
    ) -> Result<Box<dyn ContractHandle>, RevokeError> {
        Ok(Box::new(Web3ContractHandle {
            web3: self.web3.clone(),
            account: self.account.clone(),
            contract: *contract,
            settings: self.settings.clone(),
        }))
    }
}

struct Web3ContractHandle {
    web3: Web3<Http>,
    account: SignerAccount,
    contract: ContractRef,
    settings: TxSettings,
}

impl Web3ContractHandle {
    async fn estimate_gas(&self, data: &[u8]) -> Result<U256, SubmitError> {
        let call_request = CallRequest {
            from: Some(self.account.address),
            to: Some(self.contract.address),
            gas: None,
            gas_price: None,
            value: None,
            data: Some(Bytes(data.to_vec())),
            transaction_type: Some(U64::from(2)),
            access_list: None,
            max_fee_per_gas: Some(self.settings.max_fee_per_gas),
            max_priority_fee_per_gas: Some(self.settings.priority_fee),
        };
        log::debug!("Estimating gas: {:?}", call_request);
        let gas_est = self
            .web3
            .eth()
            .estimate_gas(call_request, None)
            .await
            .map_err(|err| {
                log::debug!("Gas estimation failed: {err:?}");
                SubmitError::from_web3(&err)
            })?;
        Ok(gas_est + U256::from(GAS_SAFETY_MARGIN))
    }

    async fn poll_confirmations(
        &self,
        tx_hash: H256,
        confirmations: u64,
    ) -> Result<ConfirmedTransaction, RevokeError> {
        let confirmations = std::cmp::max(confirmations, 1);
        let mut poll_errors = 0;
        loop {
            match self.check_confirmations(tx_hash).await {
                Ok(Some(confirmed)) if confirmed.confirmations >= confirmations => {
                    return Ok(confirmed);
                }
                Ok(Some(confirmed)) => {
                    log::debug!(
                        "Transaction {:#x} has {}/{} confirmations",
                        tx_hash,
                        confirmed.confirmations,
                        confirmations
                    );
                    poll_errors = 0;
                }
                Ok(None) => {
                    poll_errors = 0;
                }
                Err(err) => {
                    if matches!(err.inner, ErrorBag::TransactionFailedError(_)) {
                        return Err(err);
                    }
                    poll_errors += 1;
                    log::warn!(
                        "Error when checking receipt of {tx_hash:#x} ({poll_errors} in a row): {err}"
                    );
                    if let Some(max_poll_errors) = self.settings.max_poll_errors {
                        if poll_errors >= max_poll_errors {
                            return Err(err);
                        }
                    }
                }
            }
            tokio::time::sleep(self.settings.receipt_poll_interval).await;
        }
    }

    async fn check_confirmations(
        &self,
        tx_hash: H256,
    ) -> Result<Option<ConfirmedTransaction>, RevokeError> {
        let receipt = match self
            .web3
            .eth()
            .transaction_receipt(tx_hash)
            .await
            .map_err(err_from!())?
        {
            Some(receipt) => receipt,
            None => return Ok(None),
        };
        let block_number = match receipt.block_number {
            Some(block_number) => block_number.as_u64(),
            None => return Ok(None),
        };
        if receipt.status == Some(U64::zero()) {
            return Err(err_create!(TransactionFailedError::new(&format!(
                "Transaction {tx_hash:#x} reverted in block {block_number}"
            ))));
        }
        let current_block = self
            .web3
            .eth()
            .block_number()
            .await
            .map_err(err_from!())?
            .as_u64();
        Ok(Some(ConfirmedTransaction {
            tx_hash,
            block_number,
            confirmations: current_block.saturating_sub(block_number) + 1,
        }))
    }
}

#[async_trait]
impl ContractHandle for Web3ContractHandle {
    async fn submit(&self, call: &ContractCall) -> Result<H256, SubmitError> {
        let data = call.encode().map_err(|err| {
            SubmitError::without_code(&format!("Failed to encode {call}: {err}"))
        })?;
        let gas_limit = self.estimate_gas(&data).await?;
        let nonce = self
            .web3
            .eth()
            .transaction_count(self.account.address, Some(BlockNumber::Pending))
            .await
            .map_err(|err| SubmitError::from_web3(&err))?;

        let tx_object = TransactionParameters {
            nonce: Some(nonce),
            to: Some(self.contract.address),
            gas: gas_limit,
            gas_price: None,
            value: U256::zero(),
            data: Bytes(data),
            chain_id: Some(self.settings.chain_id),
            transaction_type: Some(U64::from(2)),
            access_list: None,
            max_fee_per_gas: Some(self.settings.max_fee_per_gas),
            max_priority_fee_per_gas: Some(self.settings.priority_fee),
        };
        log::debug!("Signing transaction: {:#?}", tx_object);
        let signed = self
            .account
            .sign(tx_object)
            .await
            .map_err(|err| SubmitError::without_code(&err.user_message()))?;

        let tx_hash = self
            .web3
            .eth()
            .send_raw_transaction(signed.raw_transaction)
            .await
            .map_err(|err| SubmitError::from_web3(&err))?;
        log::info!(
            "Sent {} to {:#x} from {}, tx hash {:#x}",
            call.method(),
            self.contract.address,
            self.account,
            tx_hash
        );
        Ok(tx_hash)
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: H256,
        confirmations: u64,
    ) -> Result<ConfirmedTransaction, RevokeError> {
        let wait = self.poll_confirmations(tx_hash, confirmations);
        match self.settings.confirmation_timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_elapsed| err_create!(limit))?,
            None => wait.await,
        }
    }
}
