use rust_decimal::Decimal;
use structopt::StructOpt;
use web3::types::{Address, U256};

#[derive(StructOpt, Debug)]
#[structopt(about = "Allowance selection")]
pub struct AllowanceOptions {
    #[structopt(short = "c", long = "chain-name", default_value = "mainnet")]
    pub chain_name: String,

    #[structopt(
        long = "rpc-endpoints",
        help = "Comma separated rpc endpoints, replaces the ones from the config file"
    )]
    pub rpc_endpoints: Option<String>,

    #[structopt(long = "token", help = "Token contract address")]
    pub token: Address,

    #[structopt(long = "spender", help = "Contract or account allowed to spend the tokens")]
    pub spender: Address,

    #[structopt(long = "erc721", help = "Token is an ERC721 collection")]
    pub erc721: bool,

    #[structopt(
        long = "token-id",
        help = "ERC721 token id, operator approval is used when not given",
        parse(try_from_str = U256::from_dec_str)
    )]
    pub token_id: Option<U256>,
}

#[derive(StructOpt, Debug)]
#[structopt(about = "Show allowance options")]
pub struct ShowOptions {
    #[structopt(flatten)]
    pub allowance: AllowanceOptions,

    #[structopt(
        long = "owner",
        help = "Owner of the tokens, first loaded account when not given"
    )]
    pub owner: Option<Address>,
}

#[derive(StructOpt, Debug)]
#[structopt(about = "Revoke allowance options")]
pub struct RevokeOptions {
    #[structopt(flatten)]
    pub allowance: AllowanceOptions,

    #[structopt(long = "account", help = "Account to send from, must have a loaded key")]
    pub account: Option<Address>,
}

#[derive(StructOpt, Debug)]
#[structopt(about = "Update ERC20 allowance options")]
pub struct UpdateOptions {
    #[structopt(short = "c", long = "chain-name", default_value = "mainnet")]
    pub chain_name: String,

    #[structopt(
        long = "rpc-endpoints",
        help = "Comma separated rpc endpoints, replaces the ones from the config file"
    )]
    pub rpc_endpoints: Option<String>,

    #[structopt(long = "token", help = "Token contract address")]
    pub token: Address,

    #[structopt(long = "spender")]
    pub spender: Address,

    #[structopt(long = "amount", help = "New allowance in whole tokens, i.e. 5.0")]
    pub amount: Decimal,

    #[structopt(long = "account", help = "Account to send from, must have a loaded key")]
    pub account: Option<Address>,
}

#[derive(StructOpt)]
#[structopt(about = "Allowance commands")]
pub enum AllowanceCommands {
    #[structopt(about = "Show current allowance as it would be listed")]
    Show {
        #[structopt(flatten)]
        show_options: ShowOptions,
    },
    #[structopt(about = "Revoke allowance and wait for confirmation")]
    Revoke {
        #[structopt(flatten)]
        revoke_options: RevokeOptions,
    },
    #[structopt(about = "Change ERC20 allowance and wait for confirmation")]
    Update {
        #[structopt(flatten)]
        update_options: UpdateOptions,
    },
}

#[derive(StructOpt)]
#[structopt(about = "Allowance revocation tool")]
pub struct RevokerOptions {
    #[structopt(
        long = "config",
        help = "Configuration file",
        default_value = "config-revoke.toml"
    )]
    pub config: String,

    #[structopt(subcommand)]
    pub commands: AllowanceCommands,
}
