use crate::options::AllowanceOptions;
use revoke_lib::allowance::ContractRef;
use revoke_lib::config::{Chain, Config, Engine};
use revoke_lib::display::describe_chain_error;
use revoke_lib::error::RevokeError;
use revoke_lib::misc::select_account;
use revoke_lib::signer::{PrivateKeySigner, SignerAccount};
use revoke_lib::web3_provider::Web3SigningProvider;
use revoke_lib::err_custom_create;
use secp256k1::SecretKey;
use serde::Serialize;
use std::sync::Arc;
use web3::types::{Address, U256};

pub mod revoke;
pub mod show;

pub fn contract_ref(
    allowance_options: &AllowanceOptions,
) -> Result<(ContractRef, Option<U256>), RevokeError> {
    match (allowance_options.erc721, allowance_options.token_id) {
        (false, Some(_)) => Err(err_custom_create!("--token-id requires --erc721")),
        (false, None) => Ok((ContractRef::erc20(allowance_options.token), None)),
        (true, token_id) => Ok((ContractRef::erc721(allowance_options.token), token_id)),
    }
}

/// Replaces rpc endpoints of the chain with the ones given on the command line
pub fn override_rpc_endpoints(
    config: &mut Config,
    chain_name: &str,
    rpc_endpoints: Option<&str>,
) -> Result<(), RevokeError> {
    let Some(rpc_endpoints) = rpc_endpoints else {
        return Ok(());
    };
    let rpc_endpoints: Vec<String> = rpc_endpoints
        .split(',')
        .map(str::trim)
        .filter(|endpoint| !endpoint.is_empty())
        .map(str::to_string)
        .collect();
    if rpc_endpoints.is_empty() {
        return Err(err_custom_create!("--rpc-endpoints is empty"));
    }
    log::info!("Using rpc endpoints {:?} for chain {}", rpc_endpoints, chain_name);
    config.change_rpc_endpoints(chain_name, rpc_endpoints)
}

/// Logs connection problems the way they are shown to the user, the error is passed through
pub fn report_chain_error(chain: &Chain) -> impl Fn(RevokeError) -> RevokeError + '_ {
    move |err| {
        log::error!("{}", describe_chain_error(&err, &chain.chain_name));
        err
    }
}

pub async fn connect_signing_provider(
    chain: &Chain,
    engine: &Engine,
    private_keys: &[SecretKey],
    account: Option<Address>,
) -> Result<Web3SigningProvider, RevokeError> {
    let signer = PrivateKeySigner::new(private_keys.to_vec());
    let address = select_account(&signer.addresses(), account)?;
    let account = SignerAccount::new(address, Arc::new(signer));
    Web3SigningProvider::connect(chain, engine, account)
        .await
        .map_err(report_chain_error(chain))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), RevokeError> {
    let json = serde_json::to_string_pretty(value).map_err(|err| {
        err_custom_create!("Something went wrong when serializing to json {err}")
    })?;
    println!("{json}");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[chain.dev]
chain-name = "Dev"
chain-id = 987789
rpc-endpoints = ["http://127.0.0.1:8545"]
priority-fee = 1.0
max-fee-per-gas = 10.0
"#;

    #[test]
    fn test_override_rpc_endpoints() {
        let mut config = Config::load_from_str(CONFIG).unwrap();
        override_rpc_endpoints(&mut config, "dev", None).unwrap();
        assert_eq!(
            config.get_chain("dev").unwrap().rpc_endpoints,
            vec!["http://127.0.0.1:8545".to_string()]
        );

        override_rpc_endpoints(
            &mut config,
            "dev",
            Some("http://localhost:8544, http://localhost:8543"),
        )
        .unwrap();
        assert_eq!(
            config.get_chain("dev").unwrap().rpc_endpoints,
            vec![
                "http://localhost:8544".to_string(),
                "http://localhost:8543".to_string()
            ]
        );

        assert!(override_rpc_endpoints(&mut config, "dev", Some(" , ")).is_err());
        assert!(override_rpc_endpoints(&mut config, "mainnet", Some("http://x")).is_err());
    }
}
