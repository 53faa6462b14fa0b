use super::{connect_signing_provider, contract_ref, print_json, report_chain_error};
use crate::options::{RevokeOptions, UpdateOptions};
use revoke_lib::allowance::{Allowance, AllowanceAmount, ContractRef};
use revoke_lib::analytics::LogAnalyticsSink;
use revoke_lib::config::Config;
use revoke_lib::err_custom_create;
use revoke_lib::error::RevokeError;
use revoke_lib::eth::{load_allowance, load_erc20_token_data};
use revoke_lib::notify::LogNotificationSink;
use revoke_lib::provider::SigningProvider;
use revoke_lib::revoke::{RevocationFlow, RevocationResult};
use secp256k1::SecretKey;
use web3::types::U256;

fn check_result(result: &RevocationResult) -> Result<(), RevokeError> {
    print_json(result)?;
    if result.succeeded {
        Ok(())
    } else {
        Err(err_custom_create!(
            "Allowance was not changed: {:?}",
            result.error_class
        ))
    }
}

pub async fn revoke_allowance(
    revoke_options: RevokeOptions,
    config: &Config,
    private_keys: &[SecretKey],
) -> Result<(), RevokeError> {
    let chain = config.get_chain(&revoke_options.allowance.chain_name)?;
    let (contract, token_id) = contract_ref(&revoke_options.allowance)?;
    let provider =
        connect_signing_provider(chain, &config.engine, private_keys, revoke_options.account)
            .await?;
    let owner = provider.current_account();
    let spender = revoke_options.allowance.spender;

    let Some(allowance) = load_allowance(provider.web3(), owner, spender, contract, token_id)
        .await
        .map_err(report_chain_error(chain))?
    else {
        log::info!(
            "Nothing to revoke, {:#x} has no {} allowance to {:#x} on {:#x}",
            owner,
            contract.standard,
            spender,
            contract.address
        );
        return Ok(());
    };

    let notifications = LogNotificationSink::new(chain.block_explorer_url.clone());
    let analytics = LogAnalyticsSink;
    let flow = RevocationFlow::new(&provider, &notifications, &analytics)
        .with_confirmations(config.engine.confirmations);
    let result = flow.revoke(&allowance).await?;
    check_result(&result)
}

pub async fn update_allowance(
    update_options: UpdateOptions,
    config: &Config,
    private_keys: &[SecretKey],
) -> Result<(), RevokeError> {
    let chain = config.get_chain(&update_options.chain_name)?;
    let provider =
        connect_signing_provider(chain, &config.engine, private_keys, update_options.account)
            .await?;
    let owner = provider.current_account();
    let contract = ContractRef::erc20(update_options.token);

    let token = load_erc20_token_data(provider.web3(), contract.address)
        .await
        .map_err(report_chain_error(chain))?;
    // setting an allowance from zero is an update as well
    let allowance = load_allowance(
        provider.web3(),
        owner,
        update_options.spender,
        contract,
        None,
    )
    .await
    .map_err(report_chain_error(chain))?
    .unwrap_or_else(|| {
        Allowance::erc20(
            owner,
            update_options.spender,
            contract.address,
            AllowanceAmount::Limited(U256::zero()),
        )
    });

    let notifications = LogNotificationSink::new(chain.block_explorer_url.clone());
    let analytics = LogAnalyticsSink;
    let flow = RevocationFlow::new(&provider, &notifications, &analytics)
        .with_confirmations(config.engine.confirmations);
    let result = flow
        .update(&allowance, &token, &update_options.amount.to_string())
        .await?;
    check_result(&result)
}
