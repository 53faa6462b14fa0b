use std::error::Error;
use std::fmt::{Display, Formatter};
use web3::types::{Address, U256};

/// Label used for allowances larger than the token supply
pub const UNLIMITED_LABEL: &str = "Unlimited";

/// Largest power of ten representable in U256
const MAX_DECIMALS: u8 = 77;

#[derive(Debug, Clone)]
pub struct ConversionError {
    pub msg: String,
}

impl ConversionError {
    pub fn from(msg: String) -> Self {
        Self { msg }
    }
}

impl Display for ConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error during conversion: {}", self.msg)
    }
}

impl Error for ConversionError {
    fn description(&self) -> &str {
        "Conversion error"
    }
}

pub fn gwei_to_u256(gas: f64) -> Result<U256, ConversionError> {
    pub const GWEI: f64 = 1.0E9;
    if gas.is_nan() {
        return Err(ConversionError {
            msg: "Gas price cannot be NaN".to_string(),
        });
    }
    if gas < 0.0 {
        return Err(ConversionError {
            msg: "Gas price cannot be negative".to_string(),
        });
    }
    if gas > 1.0E9 {
        return Err(ConversionError {
            msg: "Gas price cannot be greater than 1E9".to_string(),
        });
    }
    Ok(U256::from((gas * GWEI) as u64))
}

/// Converts a decimal amount typed by the user (i.e. "5.0") into the token's smallest unit.
///
/// Fractional digits beyond `decimals` are truncated, missing ones are padded with zeros.
pub fn from_float(amount: &str, decimals: u8) -> Result<U256, ConversionError> {
    if decimals > MAX_DECIMALS {
        return Err(ConversionError::from(format!(
            "Decimals: {decimals} cannot be greater than {MAX_DECIMALS}"
        )));
    }
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ConversionError::from("Amount cannot be empty".to_string()));
    }
    if amount.starts_with('-') {
        return Err(ConversionError::from(format!(
            "Amount cannot be negative {amount}"
        )));
    }

    let mut sides = amount.split('.');
    let integer_part = sides.next().unwrap_or_default();
    let fraction_part = sides.next().unwrap_or_default();
    if sides.next().is_some() {
        return Err(ConversionError::from(format!(
            "Amount has more than one decimal point {amount}"
        )));
    }
    if !integer_part
        .chars()
        .chain(fraction_part.chars())
        .all(|c| c.is_ascii_digit())
    {
        return Err(ConversionError::from(format!(
            "Amount is not a decimal number {amount}"
        )));
    }
    if integer_part.is_empty() && fraction_part.is_empty() {
        return Err(ConversionError::from(format!(
            "Amount has no digits {amount}"
        )));
    }

    let decimals = decimals as usize;
    let fraction = if fraction_part.len() > decimals {
        log::debug!("Truncating fractional part of {amount} to {decimals} digits");
        fraction_part[..decimals].to_string()
    } else {
        format!("{fraction_part:0<decimals$}")
    };

    let digits = format!("{integer_part}{fraction}");
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits).map_err(|err| {
        ConversionError::from(format!("Amount {amount} does not fit into uint256: {err:?}"))
    })
}

/// Formats raw token amount as a decimal number with `precision` fractional digits.
///
/// Rounds half up on the last digit.
pub fn to_fixed(amount: U256, decimals: u8, precision: u8) -> String {
    if decimals > MAX_DECIMALS || precision > MAX_DECIMALS {
        return amount.to_string();
    }
    // amount expressed in units of 10^-precision
    let scaled = if decimals >= precision {
        let divisor = U256::exp10((decimals - precision) as usize);
        match amount.checked_add(divisor / 2) {
            Some(sum) => sum / divisor,
            None => amount / divisor,
        }
    } else {
        match amount.checked_mul(U256::exp10((precision - decimals) as usize)) {
            Some(scaled) => scaled,
            None => return amount.to_string(),
        }
    };
    if precision == 0 {
        return scaled.to_string();
    }
    let base = U256::exp10(precision as usize);
    let precision = precision as usize;
    format!(
        "{}.{:0>precision$}",
        scaled / base,
        (scaled % base).to_string()
    )
}

/// Human readable allowance, "Unlimited" when the allowance exceeds total supply
pub fn format_allowance(allowance: U256, decimals: u8, total_supply: U256) -> String {
    if allowance > total_supply {
        return UNLIMITED_LABEL.to_string();
    }
    to_fixed(allowance, decimals, 3)
}

/// 0x1234...abcd
pub fn shorten_address(address: &Address) -> String {
    let full = format!("{address:#x}");
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
