use crate::allowance::{Allowance, AllowanceAmount, ContractRef, TokenData, TokenStandard};
use crate::contracts::{
    encode_erc20_allowance, encode_erc721_get_approved, encode_erc721_is_approved_for_all,
    ERC20_CONTRACT_TEMPLATE, ERC721_CONTRACT_TEMPLATE,
};
use crate::error::*;
use crate::{err_create, err_custom_create, err_from};
use secp256k1::{PublicKey, SecretKey};
use sha3::{Digest, Keccak256};
use web3::contract::Contract;
use web3::ethabi::Token;
use web3::transports::Http;
use web3::types::{Address, Bytes, CallRequest, U256};
use web3::Web3;

pub fn get_eth_addr_from_secret(secret_key: &SecretKey) -> Address {
    Address::from_slice(
        &Keccak256::digest(
            &PublicKey::from_secret_key(&secp256k1::Secp256k1::new(), secret_key)
                .serialize_uncompressed()[1..65],
        )
        .as_slice()[12..],
    )
}

async fn eth_call(
    web3: &Web3<Http>,
    from: Option<Address>,
    to: Address,
    data: Vec<u8>,
) -> Result<Bytes, RevokeError> {
    let call_request = CallRequest {
        from,
        to: Some(to),
        gas: None,
        gas_price: None,
        value: None,
        data: Some(Bytes(data)),
        transaction_type: None,
        access_list: None,
        max_fee_per_gas: None,
        max_priority_fee_per_gas: None,
    };
    web3.eth()
        .call(call_request, None)
        .await
        .map_err(err_from!())
}

fn decode_word(res: &Bytes, what: &str, contract: Address) -> Result<[u8; 32], RevokeError> {
    if res.0.len() != 32 {
        return Err(err_create!(TransactionFailedError::new(&format!(
            "Invalid {what} response: {:?}. Probably not a valid token contract {:#x}",
            res.0, contract
        ))));
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&res.0);
    Ok(word)
}

pub async fn check_allowance(
    web3: &Web3<Http>,
    owner: Address,
    token: Address,
    spender: Address,
) -> Result<U256, RevokeError> {
    let res = eth_call(
        web3,
        Some(owner),
        token,
        encode_erc20_allowance(owner, spender).map_err(err_from!())?,
    )
    .await?;
    let allowance = U256::from_big_endian(&decode_word(&res, "allowance", token)?);
    log::debug!(
        "Check allowance: owner: {:#x}, token: {:#x}, spender: {:#x}, allowance: {}",
        owner,
        token,
        spender,
        allowance
    );
    Ok(allowance)
}

pub async fn check_erc721_approved(
    web3: &Web3<Http>,
    token: Address,
    token_id: U256,
) -> Result<Address, RevokeError> {
    let res = eth_call(
        web3,
        None,
        token,
        encode_erc721_get_approved(token_id).map_err(err_from!())?,
    )
    .await?;
    let word = decode_word(&res, "getApproved", token)?;
    Ok(Address::from_slice(&word[12..]))
}

pub async fn check_erc721_operator(
    web3: &Web3<Http>,
    owner: Address,
    token: Address,
    operator: Address,
) -> Result<bool, RevokeError> {
    let res = eth_call(
        web3,
        Some(owner),
        token,
        encode_erc721_is_approved_for_all(owner, operator).map_err(err_from!())?,
    )
    .await?;
    let word = decode_word(&res, "isApprovedForAll", token)?;
    Ok(word[31] == 1)
}

/// Reads current on-chain state of a single allowance, `None` when nothing is approved
pub async fn load_allowance(
    web3: &Web3<Http>,
    owner: Address,
    spender: Address,
    contract: ContractRef,
    token_id: Option<U256>,
) -> Result<Option<Allowance>, RevokeError> {
    let allowance = match (contract.standard, token_id) {
        (TokenStandard::Erc20, _) => {
            let raw = check_allowance(web3, owner, contract.address, spender).await?;
            (!raw.is_zero()).then(|| {
                Allowance::erc20(
                    owner,
                    spender,
                    contract.address,
                    AllowanceAmount::from_raw(raw),
                )
            })
        }
        (TokenStandard::Erc721, Some(token_id)) => {
            let approved = check_erc721_approved(web3, contract.address, token_id).await?;
            (approved == spender && !approved.is_zero())
                .then(|| Allowance::erc721_token(owner, spender, contract.address, token_id))
        }
        (TokenStandard::Erc721, None) => {
            check_erc721_operator(web3, owner, contract.address, spender)
                .await?
                .then(|| Allowance::erc721_operator(owner, spender, contract.address))
        }
    };
    Ok(allowance)
}

async fn call_view(
    web3: &Web3<Http>,
    template: &Contract<Http>,
    token: Address,
    func: &str,
) -> Result<Token, RevokeError> {
    let function = template
        .abi()
        .function(func)
        .map_err(err_from!())?;
    let res = eth_call(
        web3,
        None,
        token,
        function.encode_input(&[]).map_err(err_from!())?,
    )
    .await?;
    function
        .decode_output(&res.0)
        .map_err(err_from!())?
        .into_iter()
        .next()
        .ok_or_else(|| err_custom_create!("Empty {func} response from {token:#x}"))
}

/// Loads symbol, decimals and total supply of an ERC20 token
pub async fn load_erc20_token_data(
    web3: &Web3<Http>,
    token: Address,
) -> Result<TokenData, RevokeError> {
    let decimals = call_view(web3, &ERC20_CONTRACT_TEMPLATE, token, "decimals")
        .await?
        .into_uint()
        .ok_or_else(|| err_custom_create!("Invalid decimals of {token:#x}"))?;
    if decimals > U256::from(u8::MAX) {
        return Err(err_custom_create!(
            "Decimals {decimals} of {token:#x} out of range"
        ));
    }
    let total_supply = call_view(web3, &ERC20_CONTRACT_TEMPLATE, token, "totalSupply")
        .await?
        .into_uint()
        .ok_or_else(|| err_custom_create!("Invalid total supply of {token:#x}"))?;
    Ok(TokenData {
        contract: ContractRef::erc20(token),
        symbol: load_symbol(web3, &ERC20_CONTRACT_TEMPLATE, token).await,
        decimals: decimals.as_u32() as u8,
        total_supply,
    })
}

/// ERC721 collections have no decimals nor a meaningful supply for allowances
pub async fn load_erc721_token_data(web3: &Web3<Http>, token: Address) -> TokenData {
    TokenData {
        contract: ContractRef::erc721(token),
        symbol: load_symbol(web3, &ERC721_CONTRACT_TEMPLATE, token).await,
        decimals: 0,
        total_supply: U256::zero(),
    }
}

// symbol is optional in both standards, i.e. MKR returns bytes32
async fn load_symbol(web3: &Web3<Http>, template: &Contract<Http>, token: Address) -> String {
    match call_view(web3, template, token, "symbol").await {
        Ok(symbol) => symbol.into_string().unwrap_or_else(|| "Unknown".to_string()),
        Err(err) => {
            log::debug!("Failed to read symbol of {token:#x}: {err}");
            "Unknown".to_string()
        }
    }
}
