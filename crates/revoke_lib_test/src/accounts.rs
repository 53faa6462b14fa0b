use lazy_static::lazy_static;
use revoke_lib::allowance::{Allowance, AllowanceAmount, ContractRef, TokenData};
use std::str::FromStr;
use web3::types::{Address, U256};

pub const TEST_CHAIN_ID: u64 = 5;

lazy_static! {
    /// Address of private key 0x..01
    pub static ref OWNER: Address =
        Address::from_str("7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap();
    pub static ref SPENDER: Address =
        Address::from_str("7a250d5630b4cf539739df2c5dacb4c659f2488d").unwrap();
    pub static ref ERC20_TOKEN: Address =
        Address::from_str("6b175474e89094c44da98b954eedeac495271d0f").unwrap();
    pub static ref ERC721_TOKEN: Address =
        Address::from_str("bc4ca0eda7647a8ab7c2061c2e118a18a936f13d").unwrap();
}

/// 18 decimals token with a billion tokens in supply
pub fn test_token_data() -> TokenData {
    TokenData {
        contract: ContractRef::erc20(*ERC20_TOKEN),
        symbol: "DAI".to_string(),
        decimals: 18,
        total_supply: U256::exp10(27),
    }
}

pub fn unlimited_erc20_allowance() -> Allowance {
    Allowance::erc20(*OWNER, *SPENDER, *ERC20_TOKEN, AllowanceAmount::Unlimited)
}

pub fn erc721_token_allowance(token_id: u64) -> Allowance {
    Allowance::erc721_token(*OWNER, *SPENDER, *ERC721_TOKEN, U256::from(token_id))
}

pub fn erc721_operator_allowance() -> Allowance {
    Allowance::erc721_operator(*OWNER, *SPENDER, *ERC721_TOKEN)
}
