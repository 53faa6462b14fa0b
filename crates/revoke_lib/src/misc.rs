use std::str::FromStr;

use crate::error::*;
use crate::eth::get_eth_addr_from_secret;
use crate::err_custom_create;
use secp256k1::SecretKey;
use web3::types::Address;

/// Parses comma separated hex private keys, i.e. the `ETH_PRIVATE_KEYS` variable
pub fn load_private_keys(str: &str) -> Result<(Vec<SecretKey>, Vec<Address>), RevokeError> {
    let mut keys = Vec::new();
    let mut addrs = Vec::new();
    for (idx, key) in str
        .split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .enumerate()
    {
        //do not disclose the private key in error message
        let secret = SecretKey::from_str(key.trim_start_matches("0x"))
            .map_err(|_| err_custom_create!("Failed to parse private key no {}", idx + 1))?;
        addrs.push(get_eth_addr_from_secret(&secret));
        keys.push(secret);
    }
    Ok((keys, addrs))
}

pub fn display_private_keys(keys: &[SecretKey]) {
    if keys.is_empty() {
        log::info!("No Eth accounts loaded");
        return;
    }
    for (no, key) in keys.iter().enumerate() {
        let public_addr = get_eth_addr_from_secret(key);
        if keys.len() >= 10 {
            log::info!("Eth account loaded {:02}: {:#x}", no + 1, public_addr);
        } else {
            log::info!("Eth account loaded {}: {:#x}", no + 1, public_addr);
        }
    }
}

/// Picks the account to act as, the first loaded one unless `requested` is given
pub fn select_account(
    loaded: &[Address],
    requested: Option<Address>,
) -> Result<Address, RevokeError> {
    match requested {
        Some(addr) if loaded.contains(&addr) => Ok(addr),
        Some(addr) => Err(err_custom_create!(
            "No private key loaded for account {addr:#x}"
        )),
        None => loaded
            .first()
            .copied()
            .ok_or_else(|| err_custom_create!("No Eth accounts loaded, set ETH_PRIVATE_KEYS")),
    }
}
