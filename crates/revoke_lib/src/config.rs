use serde::Deserialize;
use std::collections::btree_map::BTreeMap as Map;

use std::path::Path;

use crate::error::*;
use crate::{err_custom_create, err_from_msg};
use tokio::fs;
use web3::types::Address;

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Engine {
    /// Milliseconds between receipt checks while waiting for confirmation
    #[serde(default = "default_receipt_poll_interval")]
    pub receipt_poll_interval: u64,
    #[serde(default = "default_confirmations")]
    pub confirmations: u64,
    /// Give up after this many failed receipt checks in a row, keep polling when not set
    #[serde(default)]
    pub max_poll_errors: Option<u32>,
}

fn default_receipt_poll_interval() -> u64 {
    1000
}

fn default_confirmations() -> u64 {
    1
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            receipt_poll_interval: default_receipt_poll_interval(),
            confirmations: default_confirmations(),
            max_poll_errors: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub chain: Map<String, Chain>,
    #[serde(default)]
    pub engine: Engine,
    /// Known spender contracts, address -> application name
    #[serde(default)]
    pub spender_names: Map<Address, String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Chain {
    pub chain_name: String,
    pub chain_id: u64,
    pub rpc_endpoints: Vec<String>,
    pub priority_fee: f64,
    pub max_fee_per_gas: f64,
    pub block_explorer_url: Option<String>,
    /// Seconds, waiting for confirmation is unbounded when not set
    pub confirmation_timeout: Option<u64>,
    /// NFT marketplace proxy, shown under its own name when it is the spender
    pub marketplace_proxy: Option<MarketplaceProxy>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MarketplaceProxy {
    pub name: String,
    pub address: Address,
}

impl Config {
    pub fn load_from_str(str: &str) -> Result<Self, RevokeError> {
        match toml::from_str(str) {
            Ok(config) => Ok(config),
            Err(e) => Err(err_custom_create!("Failed to parse toml {}: {}", str, e)),
        }
    }

    pub async fn load<P: AsRef<Path> + std::fmt::Display>(path: P) -> Result<Self, RevokeError> {
        let content = fs::read_to_string(&path)
            .await
            .map_err(err_from_msg!("Failed to read config file {}", path))?;
        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => Err(err_custom_create!("Failed to parse toml {}: {}", path, e)),
        }
    }

    pub fn get_chain(&self, chain: &str) -> Result<&Chain, RevokeError> {
        self.chain
            .get(chain)
            .ok_or(err_custom_create!("Chain {} not found in config file", chain))
    }

    pub fn change_rpc_endpoints(
        &mut self,
        chain: &str,
        rpc_endpoints: Vec<String>,
    ) -> Result<(), RevokeError> {
        self.chain
            .get_mut(chain)
            .ok_or(err_custom_create!("Chain {} not found", chain))?
            .rpc_endpoints = rpc_endpoints;
        Ok(())
    }
}
