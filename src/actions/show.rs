use super::{contract_ref, print_json, report_chain_error};
use crate::options::ShowOptions;
use revoke_lib::allowance::TokenStandard;
use revoke_lib::config::Config;
use revoke_lib::display::{AllowanceRow, DisplayFormatter, StaticNameResolver};
use revoke_lib::error::RevokeError;
use revoke_lib::eth::{load_allowance, load_erc20_token_data, load_erc721_token_data};
use revoke_lib::misc::select_account;
use revoke_lib::web3_provider::create_web3;
use web3::types::Address;

pub async fn show_allowance(
    show_options: ShowOptions,
    config: &Config,
    public_addrs: &[Address],
) -> Result<(), RevokeError> {
    let chain = config.get_chain(&show_options.allowance.chain_name)?;
    let (contract, token_id) = contract_ref(&show_options.allowance)?;
    let owner = match show_options.owner {
        Some(owner) => owner,
        None => select_account(public_addrs, None)?,
    };
    let web3 = create_web3(chain)?;

    let token = match contract.standard {
        TokenStandard::Erc20 => load_erc20_token_data(&web3, contract.address)
            .await
            .map_err(report_chain_error(chain))?,
        TokenStandard::Erc721 => load_erc721_token_data(&web3, contract.address).await,
    };
    let allowance = load_allowance(
        &web3,
        owner,
        show_options.allowance.spender,
        contract,
        token_id,
    )
    .await
    .map_err(report_chain_error(chain))?;

    let Some(allowance) = allowance else {
        log::info!(
            "No {} allowance of {:#x} from {:#x} to {:#x}",
            contract.standard,
            contract.address,
            owner,
            show_options.allowance.spender
        );
        return Ok(());
    };

    let resolver = StaticNameResolver::from_config(config);
    let formatter =
        DisplayFormatter::new(&resolver, chain.chain_id, chain.block_explorer_url.clone());
    let mut row = AllowanceRow::default();
    formatter
        .load_row(
            &mut row,
            &allowance,
            &token,
            select_account(public_addrs, None).ok(),
            chain.marketplace_proxy.as_ref(),
        )
        .await;
    if let Some(view) = row.view() {
        print_json(view)?;
    }
    Ok(())
}
