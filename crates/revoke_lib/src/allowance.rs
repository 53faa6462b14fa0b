use crate::err_custom_create;
use crate::error::RevokeError;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use web3::types::{Address, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenStandard {
    Erc20,
    Erc721,
}

impl Display for TokenStandard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenStandard::Erc20 => write!(f, "ERC20"),
            TokenStandard::Erc721 => write!(f, "ERC721"),
        }
    }
}

/// Token contract address together with the interface used to talk to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContractRef {
    pub address: Address,
    pub standard: TokenStandard,
}

impl ContractRef {
    pub fn erc20(address: Address) -> Self {
        Self {
            address,
            standard: TokenStandard::Erc20,
        }
    }

    pub fn erc721(address: Address) -> Self {
        Self {
            address,
            standard: TokenStandard::Erc721,
        }
    }
}

/// Token metadata needed to present amounts
#[derive(Debug, Clone, Serialize)]
pub struct TokenData {
    pub contract: ContractRef,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AllowanceAmount {
    Limited(U256),
    Unlimited,
}

impl AllowanceAmount {
    /// `U256::MAX` is what wallets send for "unlimited"
    pub fn from_raw(raw: U256) -> Self {
        if raw == U256::max_value() {
            AllowanceAmount::Unlimited
        } else {
            AllowanceAmount::Limited(raw)
        }
    }

    pub fn is_zero(&self) -> bool {
        matches!(self, AllowanceAmount::Limited(amount) if amount.is_zero())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RevocationKind {
    Erc20Approve,
    Erc721ApproveToken,
    Erc721SetOperator,
}

/// Spending permission granted by `owner` to `spender`.
///
/// `token_id` is set only for ERC721 per-token approvals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Allowance {
    pub owner: Address,
    pub spender: Address,
    pub token: ContractRef,
    pub amount: AllowanceAmount,
    token_id: Option<U256>,
}

impl Allowance {
    pub fn erc20(owner: Address, spender: Address, token: Address, amount: AllowanceAmount) -> Self {
        Self {
            owner,
            spender,
            token: ContractRef::erc20(token),
            amount,
            token_id: None,
        }
    }

    pub fn erc721_token(owner: Address, spender: Address, token: Address, token_id: U256) -> Self {
        Self {
            owner,
            spender,
            token: ContractRef::erc721(token),
            amount: AllowanceAmount::Limited(U256::one()),
            token_id: Some(token_id),
        }
    }

    pub fn erc721_operator(owner: Address, spender: Address, token: Address) -> Self {
        Self {
            owner,
            spender,
            token: ContractRef::erc721(token),
            amount: AllowanceAmount::Unlimited,
            token_id: None,
        }
    }

    pub fn token_id(&self) -> Option<U256> {
        self.token_id
    }

    pub fn kind(&self) -> RevocationKind {
        match (self.token.standard, self.token_id) {
            (TokenStandard::Erc20, _) => RevocationKind::Erc20Approve,
            (TokenStandard::Erc721, Some(_)) => RevocationKind::Erc721ApproveToken,
            (TokenStandard::Erc721, None) => RevocationKind::Erc721SetOperator,
        }
    }

    /// Same allowance with a different amount, only meaningful for ERC20
    pub fn with_amount(&self, amount: AllowanceAmount) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    /// Identity of the allowance within an owner's list
    pub fn same_entry(&self, other: &Allowance) -> bool {
        self.owner == other.owner
            && self.spender == other.spender
            && self.token.address == other.token.address
            && self.token_id == other.token_id
    }
}

/// Owner's allowances as held by the caller of the revocation flow
#[derive(Debug, Clone, Default, Serialize)]
pub struct AllowanceList {
    entries: Vec<Allowance>,
}

impl AllowanceList {
    pub fn new(entries: Vec<Allowance>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Allowance] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes `target` or replaces it with `replacement`
    pub fn apply(
        &mut self,
        target: &Allowance,
        replacement: Option<Allowance>,
    ) -> Result<(), RevokeError> {
        let idx = self
            .entries
            .iter()
            .position(|entry| entry.same_entry(target))
            .ok_or_else(|| {
                err_custom_create!(
                    "Allowance of {:#x} to {:#x} not found in list",
                    target.token.address,
                    target.spender
                )
            })?;
        match replacement {
            Some(replacement) => self.entries[idx] = replacement,
            None => {
                self.entries.remove(idx);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> Address {
        Address::from_low_u64_be(n)
    }

    #[test]
    fn test_kind_follows_token_id() {
        let erc20 = Allowance::erc20(addr(1), addr(2), addr(3), AllowanceAmount::Unlimited);
        assert_eq!(erc20.kind(), RevocationKind::Erc20Approve);
        assert_eq!(erc20.token_id(), None);

        let token = Allowance::erc721_token(addr(1), addr(2), addr(3), U256::from(5));
        assert_eq!(token.kind(), RevocationKind::Erc721ApproveToken);
        assert_eq!(token.token_id(), Some(U256::from(5)));

        let operator = Allowance::erc721_operator(addr(1), addr(2), addr(3));
        assert_eq!(operator.kind(), RevocationKind::Erc721SetOperator);
        assert_eq!(operator.token_id(), None);
    }

    #[test]
    fn test_amount_from_raw() {
        assert_eq!(
            AllowanceAmount::from_raw(U256::max_value()),
            AllowanceAmount::Unlimited
        );
        assert!(AllowanceAmount::from_raw(U256::zero()).is_zero());
        assert!(!AllowanceAmount::Unlimited.is_zero());
    }

    #[test]
    fn test_list_apply() {
        let a = Allowance::erc20(addr(1), addr(2), addr(3), AllowanceAmount::Unlimited);
        let b = Allowance::erc20(addr(1), addr(4), addr(3), AllowanceAmount::Unlimited);
        let mut list = AllowanceList::new(vec![a.clone(), b.clone()]);

        let updated = a.with_amount(AllowanceAmount::Limited(U256::from(10)));
        list.apply(&a, Some(updated.clone())).unwrap();
        assert_eq!(list.entries()[0], updated);

        list.apply(&b, None).unwrap();
        assert_eq!(list.len(), 1);

        assert!(list.apply(&b, None).is_err());
    }
}
