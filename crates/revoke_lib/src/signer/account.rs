use crate::err_custom_create;
use crate::error::RevokeError;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::Signer;
use web3::types::{Address, SignedTransaction, TransactionParameters};

const SIGN_TIMEOUT: Duration = Duration::from_secs(5);

/// Address bound to the signer able to sign for it
#[derive(Clone)]
pub struct SignerAccount {
    pub address: Address,
    pub signer: Arc<dyn Signer>,
}

impl Debug for SignerAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "SignerAccount {{ address: {:#x} }}", self.address)
    }
}

impl Display for SignerAccount {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.address)
    }
}

impl SignerAccount {
    pub fn new(address: Address, signer: Arc<dyn Signer>) -> Self {
        Self { address, signer }
    }

    pub async fn check_if_sign_possible(&self) -> Result<(), RevokeError> {
        match timeout(SIGN_TIMEOUT, self.signer.check_if_sign_possible(self.address)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(err_custom_create!("Sign returned error {err}")),
            Err(err) => Err(err_custom_create!("Sign check timed out {err:?}")),
        }
    }

    pub async fn sign(&self, tp: TransactionParameters) -> Result<SignedTransaction, RevokeError> {
        match timeout(SIGN_TIMEOUT, self.signer.sign(self.address, tp)).await {
            Ok(Ok(signed)) => Ok(signed),
            Ok(Err(err)) => Err(err_custom_create!("Sign returned error {err}")),
            Err(err) => Err(err_custom_create!("Sign timed out {err:?}")),
        }
    }
}
