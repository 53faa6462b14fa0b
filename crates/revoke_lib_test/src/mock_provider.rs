use async_trait::async_trait;
use revoke_lib::allowance::ContractRef;
use revoke_lib::contracts::ContractCall;
use revoke_lib::err_custom_create;
use revoke_lib::error::{RevokeError, SubmitError};
use revoke_lib::provider::{ConfirmedTransaction, ContractHandle, SigningProvider};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use web3::types::{Address, H256};

#[derive(Debug, Clone, PartialEq, Eq)]
enum GateState {
    Pending,
    Confirmed,
    Failed(String),
}

/// Holds `wait_for_confirmations` until the test releases it
#[derive(Debug)]
pub struct ConfirmationGate {
    state: watch::Sender<GateState>,
}

impl ConfirmationGate {
    pub fn closed() -> Self {
        let (state, _) = watch::channel(GateState::Pending);
        Self { state }
    }

    pub fn open() -> Self {
        let gate = Self::closed();
        gate.release();
        gate
    }

    pub fn release(&self) {
        self.state.send_replace(GateState::Confirmed);
    }

    pub fn fail(&self, message: &str) {
        self.state.send_replace(GateState::Failed(message.to_string()));
    }

    async fn wait(&self) -> Result<(), String> {
        let mut rx = self.state.subscribe();
        loop {
            let state = rx.borrow_and_update().clone();
            match state {
                GateState::Confirmed => return Ok(()),
                GateState::Failed(message) => return Err(message),
                GateState::Pending => {}
            }
            if rx.changed().await.is_err() {
                return Err("confirmation gate dropped".to_string());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedCall {
    pub contract: Address,
    pub call: ContractCall,
}

#[derive(Debug, Default)]
struct MockState {
    submit_results: Mutex<VecDeque<Result<H256, SubmitError>>>,
    calls: Mutex<Vec<SubmittedCall>>,
    waits: Mutex<Vec<(H256, u64)>>,
    next_hash: AtomicU64,
}

/// Provider with scripted submission results that records every call
pub struct MockSigningProvider {
    account: Address,
    chain_id: u64,
    state: Arc<MockState>,
    gate: Arc<ConfirmationGate>,
    authorize_error: Option<String>,
}

impl MockSigningProvider {
    pub fn new(account: Address, chain_id: u64) -> Self {
        Self {
            account,
            chain_id,
            state: Arc::new(MockState::default()),
            gate: Arc::new(ConfirmationGate::open()),
            authorize_error: None,
        }
    }

    pub fn with_gate(mut self, gate: Arc<ConfirmationGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn with_authorize_error(mut self, message: &str) -> Self {
        self.authorize_error = Some(message.to_string());
        self
    }

    /// Result of the next submission, submissions succeed when nothing is scripted
    pub fn push_submit_result(&self, result: Result<H256, SubmitError>) {
        self.state
            .submit_results
            .lock()
            .unwrap()
            .push_back(result);
    }

    pub fn submitted_calls(&self) -> Vec<SubmittedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn confirmation_waits(&self) -> Vec<(H256, u64)> {
        self.state.waits.lock().unwrap().clone()
    }
}

#[async_trait]
impl SigningProvider for MockSigningProvider {
    fn current_account(&self) -> Address {
        self.account
    }

    fn current_chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn authorized_contract(
        &self,
        contract: &ContractRef,
    ) -> Result<Box<dyn ContractHandle>, RevokeError> {
        if let Some(message) = &self.authorize_error {
            return Err(err_custom_create!("{message}"));
        }
        Ok(Box::new(MockContractHandle {
            address: contract.address,
            state: self.state.clone(),
            gate: self.gate.clone(),
        }))
    }
}

pub struct MockContractHandle {
    address: Address,
    state: Arc<MockState>,
    gate: Arc<ConfirmationGate>,
}

#[async_trait]
impl ContractHandle for MockContractHandle {
    async fn submit(&self, call: &ContractCall) -> Result<H256, SubmitError> {
        self.state.calls.lock().unwrap().push(SubmittedCall {
            contract: self.address,
            call: call.clone(),
        });
        let scripted = self.state.submit_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            let no = self.state.next_hash.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(H256::from_low_u64_be(no))
        })
    }

    async fn wait_for_confirmations(
        &self,
        tx_hash: H256,
        confirmations: u64,
    ) -> Result<ConfirmedTransaction, RevokeError> {
        self.state
            .waits
            .lock()
            .unwrap()
            .push((tx_hash, confirmations));
        self.gate
            .wait()
            .await
            .map_err(|message| err_custom_create!("{message}"))?;
        Ok(ConfirmedTransaction {
            tx_hash,
            block_number: 1,
            confirmations,
        })
    }
}
