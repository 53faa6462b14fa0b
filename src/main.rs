mod actions;
mod options;

use crate::actions::override_rpc_endpoints;
use crate::actions::revoke::{revoke_allowance, update_allowance};
use crate::actions::show::show_allowance;
use crate::options::{AllowanceCommands, RevokerOptions};
use revoke_lib::config::Config;
use revoke_lib::error::RevokeError;
use revoke_lib::misc::{display_private_keys, load_private_keys};
use std::env;
use structopt::StructOpt;

async fn main_internal() -> Result<(), RevokeError> {
    dotenv::dotenv().ok();
    env::set_var(
        "RUST_LOG",
        env::var("RUST_LOG").unwrap_or("info,web3=warn".to_string()),
    );

    env_logger::init();
    let cli: RevokerOptions = RevokerOptions::from_args();

    let (private_keys, public_addrs) =
        load_private_keys(&env::var("ETH_PRIVATE_KEYS").unwrap_or_default())?;
    display_private_keys(&private_keys);

    let mut config = Config::load(&cli.config).await?;

    match cli.commands {
        AllowanceCommands::Show { show_options } => {
            override_rpc_endpoints(
                &mut config,
                &show_options.allowance.chain_name,
                show_options.allowance.rpc_endpoints.as_deref(),
            )?;
            show_allowance(show_options, &config, &public_addrs).await?;
        }
        AllowanceCommands::Revoke { revoke_options } => {
            override_rpc_endpoints(
                &mut config,
                &revoke_options.allowance.chain_name,
                revoke_options.allowance.rpc_endpoints.as_deref(),
            )?;
            revoke_allowance(revoke_options, &config, &private_keys).await?;
        }
        AllowanceCommands::Update { update_options } => {
            override_rpc_endpoints(
                &mut config,
                &update_options.chain_name,
                update_options.rpc_endpoints.as_deref(),
            )?;
            update_allowance(update_options, &config, &private_keys).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), RevokeError> {
    match main_internal().await {
        Ok(_) => Ok(()),
        Err(e) => {
            eprintln!("Error: {e}");
            Err(e)
        }
    }
}
