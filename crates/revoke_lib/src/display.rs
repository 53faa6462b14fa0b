use crate::allowance::{Allowance, AllowanceAmount, RevocationKind, TokenData};
use crate::config::{Config, MarketplaceProxy};
use crate::error::{ErrorBag, RevokeError};
use async_trait::async_trait;
use revoke_lib_common::utils::{format_allowance, shorten_address, UNLIMITED_LABEL};
use serde::Serialize;
use std::collections::BTreeMap;
use web3::types::Address;

/// Builds `<base>/<kind>/<value>` block explorer link
pub fn explorer_url(base: &str, kind: &str, value: &str) -> Option<String> {
    let base = url::Url::parse(&format!("{}/", base.trim_end_matches('/'))).ok()?;
    base.join(&format!("{kind}/{value}"))
        .ok()
        .map(|url| url.to_string())
}

/// Message shown to the user when talking to the chain failed
pub fn describe_chain_error(err: &RevokeError, chain_name: &str) -> String {
    let connection_failed = match &err.inner {
        ErrorBag::Web3Error(web3::Error::Unreachable)
        | ErrorBag::Web3Error(web3::Error::Transport(_)) => true,
        _ => err.to_string().contains("missing response"),
    };
    if connection_failed {
        format!("Could not connect to {chain_name}")
    } else {
        err.user_message()
    }
}

/// Resolves addresses to application names
#[async_trait]
pub trait NameResolver: Send + Sync {
    /// `context` is the marketplace proxy of the chain, if any
    async fn resolve_display_name(
        &self,
        address: Address,
        chain_id: u64,
        context: Option<&MarketplaceProxy>,
    ) -> Option<String>;
}

/// Resolves names from the `[spender-names]` table of the configuration
#[derive(Debug, Clone, Default)]
pub struct StaticNameResolver {
    names: BTreeMap<Address, String>,
}

impl StaticNameResolver {
    pub fn new(names: BTreeMap<Address, String>) -> Self {
        Self { names }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.spender_names.clone())
    }
}

#[async_trait]
impl NameResolver for StaticNameResolver {
    async fn resolve_display_name(
        &self,
        address: Address,
        _chain_id: u64,
        context: Option<&MarketplaceProxy>,
    ) -> Option<String> {
        if let Some(proxy) = context {
            if proxy.address == address {
                return Some(proxy.name.clone());
            }
        }
        self.names.get(&address).cloned()
    }
}

/// Which actions the row offers, only the owner of the tokens gets any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub revoke: bool,
    pub update: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowanceRowView {
    /// Stable identifier of the row controls, `<symbol>-<spender>`
    pub id: String,
    pub text: String,
    /// Same as `text` with the spender address shortened
    pub short_text: String,
    pub spender_url: Option<String>,
    pub controls: Controls,
}

/// Row of the allowance table, loading until the spender name is resolved
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AllowanceRow {
    #[default]
    Loading,
    Ready(AllowanceRowView),
}

impl AllowanceRow {
    pub fn is_loading(&self) -> bool {
        matches!(self, AllowanceRow::Loading)
    }

    pub fn view(&self) -> Option<&AllowanceRowView> {
        match self {
            AllowanceRow::Loading => None,
            AllowanceRow::Ready(view) => Some(view),
        }
    }
}

pub struct DisplayFormatter<'a> {
    resolver: &'a dyn NameResolver,
    chain_id: u64,
    block_explorer_url: Option<String>,
}

impl<'a> DisplayFormatter<'a> {
    pub fn new(
        resolver: &'a dyn NameResolver,
        chain_id: u64,
        block_explorer_url: Option<String>,
    ) -> Self {
        Self {
            resolver,
            chain_id,
            block_explorer_url,
        }
    }

    pub fn format_amount(&self, amount: AllowanceAmount, token: &TokenData) -> String {
        match amount {
            AllowanceAmount::Unlimited => UNLIMITED_LABEL.to_string(),
            AllowanceAmount::Limited(raw) => {
                format_allowance(raw, token.decimals, token.total_supply)
            }
        }
    }

    fn describe(&self, allowance: &Allowance, token: &TokenData, spender: &str) -> String {
        match allowance.kind() {
            RevocationKind::Erc20Approve => {
                let amount = self.format_amount(allowance.amount, token);
                if amount == UNLIMITED_LABEL {
                    format!("Unlimited allowance to {spender}")
                } else {
                    format!("Allowance of {amount} {} to {spender}", token.symbol)
                }
            }
            RevocationKind::Erc721ApproveToken => format!(
                "Allowance for token ID {} to {spender}",
                allowance.token_id().unwrap_or_default()
            ),
            RevocationKind::Erc721SetOperator => format!("Unlimited allowance to {spender}"),
        }
    }

    /// Resolves the spender name and renders the row, `row` stays loading until then.
    /// `account` is the connected account, `None` when nothing is connected.
    pub async fn load_row(
        &self,
        row: &mut AllowanceRow,
        allowance: &Allowance,
        token: &TokenData,
        account: Option<Address>,
        context: Option<&MarketplaceProxy>,
    ) {
        *row = AllowanceRow::Loading;
        let spender_name = self
            .resolver
            .resolve_display_name(allowance.spender, self.chain_id, context)
            .await;
        let spender_full = spender_name
            .clone()
            .unwrap_or_else(|| format!("{:#x}", allowance.spender));
        let spender_short = spender_name.unwrap_or_else(|| shorten_address(&allowance.spender));

        let is_owner = account == Some(allowance.owner);
        *row = AllowanceRow::Ready(AllowanceRowView {
            id: format!("{}-{:#x}", token.symbol, allowance.spender),
            text: self.describe(allowance, token, &spender_full),
            short_text: self.describe(allowance, token, &spender_short),
            spender_url: self.block_explorer_url.as_deref().and_then(|base| {
                explorer_url(base, "address", &format!("{:#x}", allowance.spender))
            }),
            controls: Controls {
                revoke: is_owner,
                update: is_owner && allowance.kind() == RevocationKind::Erc20Approve,
            },
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allowance::ContractRef;
    use crate::err_custom_create;
    use web3::types::U256;

    fn token() -> TokenData {
        TokenData {
            contract: ContractRef::erc20(Address::from_low_u64_be(3)),
            symbol: "DAI".to_string(),
            decimals: 18,
            total_supply: U256::exp10(27),
        }
    }

    #[test]
    fn test_explorer_url() {
        assert_eq!(
            explorer_url("https://etherscan.io", "address", "0x01").unwrap(),
            "https://etherscan.io/address/0x01"
        );
        assert_eq!(
            explorer_url("https://explorer.example/chain/", "tx", "0x02").unwrap(),
            "https://explorer.example/chain/tx/0x02"
        );
        assert!(explorer_url("not a url", "tx", "0x02").is_none());
    }

    #[test]
    fn test_describe_chain_error() {
        let err = crate::err_create!(web3::Error::Unreachable);
        assert_eq!(describe_chain_error(&err, "Goerli"), "Could not connect to Goerli");

        let err = err_custom_create!("missing response for request");
        assert_eq!(describe_chain_error(&err, "Goerli"), "Could not connect to Goerli");

        let err = err_custom_create!("execution reverted");
        assert_eq!(
            describe_chain_error(&err, "Goerli"),
            "CustomError: execution reverted"
        );
    }

    #[tokio::test]
    async fn test_load_row() {
        let spender = Address::from_low_u64_be(0xabcdef);
        let resolver = StaticNameResolver::default();
        let formatter =
            DisplayFormatter::new(&resolver, 1, Some("https://etherscan.io".to_string()));

        let allowance = Allowance::erc20(
            Address::from_low_u64_be(1),
            spender,
            token().contract.address,
            AllowanceAmount::Limited(U256::from(5) * U256::exp10(18)),
        );
        let mut row = AllowanceRow::default();
        assert!(row.is_loading());
        formatter
            .load_row(&mut row, &allowance, &token(), Some(allowance.owner), None)
            .await;

        let view = row.view().unwrap();
        assert_eq!(
            view.text,
            "Allowance of 5.000 DAI to 0x0000000000000000000000000000000000abcdef"
        );
        assert_eq!(view.short_text, "Allowance of 5.000 DAI to 0x0000...cdef");
        assert_eq!(
            view.spender_url.as_deref(),
            Some("https://etherscan.io/address/0x0000000000000000000000000000000000abcdef")
        );
        assert_eq!(view.id, "DAI-0x0000000000000000000000000000000000abcdef");
        assert_eq!(
            view.controls,
            Controls {
                revoke: true,
                update: true
            }
        );
    }

    #[tokio::test]
    async fn test_load_row_of_other_account() {
        let resolver = StaticNameResolver::default();
        let formatter = DisplayFormatter::new(&resolver, 1, None);
        let allowance = Allowance::erc20(
            Address::from_low_u64_be(1),
            Address::from_low_u64_be(2),
            token().contract.address,
            AllowanceAmount::Unlimited,
        );
        let no_controls = Controls {
            revoke: false,
            update: false,
        };

        let mut row = AllowanceRow::default();
        for account in [Some(Address::from_low_u64_be(5)), None] {
            formatter
                .load_row(&mut row, &allowance, &token(), account, None)
                .await;
            let view = row.view().unwrap();
            assert_eq!(
                view.text,
                "Unlimited allowance to 0x0000000000000000000000000000000000000002"
            );
            assert_eq!(view.controls, no_controls);
        }
    }

    #[tokio::test]
    async fn test_load_row_named_spenders() {
        let spender = Address::from_low_u64_be(7);
        let proxy = MarketplaceProxy {
            name: "OpenSea".to_string(),
            address: Address::from_low_u64_be(8),
        };
        let resolver =
            StaticNameResolver::new(BTreeMap::from([(spender, "Uniswap".to_string())]));
        let formatter = DisplayFormatter::new(&resolver, 1, None);
        let nft = Address::from_low_u64_be(9);
        let owner = Address::from_low_u64_be(1);

        let mut row = AllowanceRow::default();
        let allowance = Allowance::erc721_operator(owner, spender, nft);
        formatter
            .load_row(&mut row, &allowance, &token(), Some(owner), Some(&proxy))
            .await;
        let view = row.view().unwrap();
        assert_eq!(view.text, "Unlimited allowance to Uniswap");
        assert_eq!(view.short_text, "Unlimited allowance to Uniswap");
        assert_eq!(view.spender_url, None);
        assert!(view.controls.revoke);
        assert!(!view.controls.update);

        let allowance = Allowance::erc721_token(owner, proxy.address, nft, U256::from(42));
        formatter
            .load_row(&mut row, &allowance, &token(), Some(owner), Some(&proxy))
            .await;
        assert_eq!(
            row.view().unwrap().text,
            "Allowance for token ID 42 to OpenSea"
        );
    }

    #[test]
    fn test_format_unlimited() {
        let resolver = StaticNameResolver::default();
        let formatter = DisplayFormatter::new(&resolver, 1, None);
        assert_eq!(
            formatter.format_amount(AllowanceAmount::Unlimited, &token()),
            "Unlimited"
        );
        assert_eq!(
            formatter.format_amount(AllowanceAmount::Limited(U256::exp10(28)), &token()),
            "Unlimited"
        );
    }
}
