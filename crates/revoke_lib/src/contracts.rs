use lazy_static::lazy_static;

use crate::err_custom_create;
use crate::error::RevokeError;
use std::fmt::{Display, Formatter};
use web3::contract::tokens::Tokenize;
use web3::contract::Contract;
use web3::transports::Http;
use web3::types::{Address, U256};
use web3::{Transport, Web3};

// contract templates are used only for encoding, they never connect anywhere
lazy_static! {
    pub static ref DUMMY_RPC_PROVIDER: Web3<Http> = {
        let transport = web3::transports::Http::new("http://noconn").unwrap();
        Web3::new(transport)
    };
    pub static ref ERC20_CONTRACT_TEMPLATE: Contract<Http> =
        prepare_contract_template(include_bytes!("../contracts/ierc20.json")).unwrap();
    pub static ref ERC721_CONTRACT_TEMPLATE: Contract<Http> =
        prepare_contract_template(include_bytes!("../contracts/ierc721.json")).unwrap();
}

pub fn prepare_contract_template(json_abi: &[u8]) -> Result<Contract<Http>, RevokeError> {
    let contract = Contract::from_json(DUMMY_RPC_PROVIDER.eth(), Address::zero(), json_abi)
        .map_err(|err| err_custom_create!("Failed to create contract {err}"))?;

    Ok(contract)
}

pub fn contract_encode<P, T>(
    contract: &Contract<T>,
    func: &str,
    params: P,
) -> Result<Vec<u8>, web3::ethabi::Error>
where
    P: Tokenize,
    T: Transport,
{
    contract
        .abi()
        .function(func)
        .and_then(|function| function.encode_input(&params.into_tokens()))
}

pub fn encode_erc20_allowance(
    owner: Address,
    spender: Address,
) -> Result<Vec<u8>, web3::ethabi::Error> {
    contract_encode(&ERC20_CONTRACT_TEMPLATE, "allowance", (owner, spender))
}

pub fn encode_erc20_approve(
    spender: Address,
    amount: U256,
) -> Result<Vec<u8>, web3::ethabi::Error> {
    contract_encode(&ERC20_CONTRACT_TEMPLATE, "approve", (spender, amount))
}

pub fn encode_erc721_approve(
    to: Address,
    token_id: U256,
) -> Result<Vec<u8>, web3::ethabi::Error> {
    contract_encode(&ERC721_CONTRACT_TEMPLATE, "approve", (to, token_id))
}

pub fn encode_erc721_set_approval_for_all(
    operator: Address,
    approved: bool,
) -> Result<Vec<u8>, web3::ethabi::Error> {
    contract_encode(
        &ERC721_CONTRACT_TEMPLATE,
        "setApprovalForAll",
        (operator, approved),
    )
}

pub fn encode_erc721_get_approved(token_id: U256) -> Result<Vec<u8>, web3::ethabi::Error> {
    contract_encode(&ERC721_CONTRACT_TEMPLATE, "getApproved", (token_id,))
}

pub fn encode_erc721_is_approved_for_all(
    owner: Address,
    operator: Address,
) -> Result<Vec<u8>, web3::ethabi::Error> {
    contract_encode(
        &ERC721_CONTRACT_TEMPLATE,
        "isApprovedForAll",
        (owner, operator),
    )
}

/// State changing call submitted to a token contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    /// ERC20 `approve(spender, amount)`
    Erc20Approve { spender: Address, amount: U256 },
    /// ERC721 `approve(to, tokenId)`, `to` is the zero address when revoking
    Erc721Approve { to: Address, token_id: U256 },
    /// ERC721 `setApprovalForAll(operator, approved)`
    Erc721SetApprovalForAll { operator: Address, approved: bool },
}

impl ContractCall {
    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::Erc20Approve { .. } => "ERC20.approve",
            ContractCall::Erc721Approve { .. } => "ERC721.approve",
            ContractCall::Erc721SetApprovalForAll { .. } => "ERC721.setApprovalForAll",
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, web3::ethabi::Error> {
        match self {
            ContractCall::Erc20Approve { spender, amount } => encode_erc20_approve(*spender, *amount),
            ContractCall::Erc721Approve { to, token_id } => encode_erc721_approve(*to, *token_id),
            ContractCall::Erc721SetApprovalForAll { operator, approved } => {
                encode_erc721_set_approval_for_all(*operator, *approved)
            }
        }
    }
}

impl Display for ContractCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ContractCall::Erc20Approve { spender, amount } => {
                write!(f, "approve({spender:#x}, {amount})")
            }
            ContractCall::Erc721Approve { to, token_id } => {
                write!(f, "approve({to:#x}, {token_id})")
            }
            ContractCall::Erc721SetApprovalForAll { operator, approved } => {
                write!(f, "setApprovalForAll({operator:#x}, {approved})")
            }
        }
    }
}
