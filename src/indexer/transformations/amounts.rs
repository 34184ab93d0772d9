use num_bigint::BigInt;
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::models::errors::AmountError;
use crate::models::proto::Coin;
use crate::models::transactions::TransactionAmount;

/// Fixed point precision of `sdk.Dec` values serialized without a decimal point.
pub const DEC_PRECISION: i32 = 18;

static CURRENCY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9\.,\-\s]+)([^0-9\s]+)$").expect("currency regex is valid"));

/// Parses a log amount such as `"12345.67ukava"` or `"100.5"`.
pub fn parse_amount(input: &str) -> Result<TransactionAmount, AmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (currency, numeric_part) = match CURRENCY_REGEX.captures(trimmed) {
        Some(caps) => match (caps.get(1), caps.get(2)) {
            (Some(number), Some(currency)) => (currency.as_str(), number.as_str()),
            _ => ("", trimmed),
        },
        None => ("", trimmed),
    };

    let (numeric, exp) = parse_numeric(numeric_part)?;
    Ok(TransactionAmount::new(currency, trimmed, numeric, exp))
}

/// Converts a decimal string into `(mantissa, exponent)` without a float intermediate.
pub fn parse_numeric(input: &str) -> Result<(BigInt, i32), AmountError> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return Err(AmountError::Empty);
    }

    let parts: Vec<&str> = normalized.split('.').collect();
    let (digits, exp) = match parts.as_slice() {
        [whole] => (whole.to_string(), 0),
        [whole, fraction] => (format!("{whole}{fraction}"), fraction.len()),
        _ => {
            return Err(AmountError::TooManySeparators {
                input: input.to_string(),
            });
        }
    };

    let unsigned = digits.strip_prefix('-').unwrap_or(&digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::NotNumeric {
            input: input.to_string(),
        });
    }

    let exp = i32::try_from(exp).map_err(|_| AmountError::NotNumeric {
        input: input.to_string(),
    })?;
    let numeric = BigInt::from_str(&digits).map_err(|_| AmountError::NotNumeric {
        input: input.to_string(),
    })?;
    Ok((numeric, exp))
}

/// Splits a coin list like `"100ukava,20hard"` into single coins.
///
/// A comma separates coins once the current coin has a denomination, so
/// `"12,5ukava"` stays a single amount with a comma decimal separator while
/// `"5ibc/AB12,20hard"` splits after the digit-terminated denom.
pub fn split_coins(input: &str) -> Vec<&str> {
    let mut coins = Vec::new();
    let mut start = 0;
    let mut has_denom = false;

    for (i, c) in input.char_indices() {
        if c == ',' && has_denom {
            coins.push(&input[start..i]);
            start = i + 1;
            has_denom = false;
            continue;
        }
        if !is_numeric_char(c) {
            has_denom = true;
        }
    }
    coins.push(&input[start..]);

    coins
        .into_iter()
        .map(str::trim)
        .filter(|coin| !coin.is_empty())
        .collect()
}

fn is_numeric_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '.' | ',' | '-') || c.is_whitespace()
}

/// Structured coin from a decoded message; the amount is an integer string.
pub fn coin_amount(coin: &Coin) -> Result<TransactionAmount, AmountError> {
    let numeric = BigInt::from_str(coin.amount.trim()).map_err(|_| AmountError::NotNumeric {
        input: coin.amount.clone(),
    })?;
    Ok(TransactionAmount::new(&coin.denom, &coin.amount, numeric, 0))
}

/// `sdk.Dec` values travel as integers scaled by 10^18 in binary messages.
pub fn dec_amount(value: &str) -> Result<TransactionAmount, AmountError> {
    let value = value.trim();
    if value.contains('.') {
        let (numeric, exp) = parse_numeric(value)?;
        return Ok(TransactionAmount::new("", value, numeric, exp));
    }

    let numeric = BigInt::from_str(value).map_err(|_| AmountError::NotNumeric {
        input: value.to_string(),
    })?;
    let text = format_scaled(&numeric, DEC_PRECISION);
    Ok(TransactionAmount::new("", text, numeric, DEC_PRECISION))
}

/// Renders `numeric × 10^-exp` as a plain decimal string.
pub fn format_scaled(numeric: &BigInt, exp: i32) -> String {
    let raw = numeric.magnitude().to_string();
    let sign = if numeric.sign() == num_bigint::Sign::Minus {
        "-"
    } else {
        ""
    };
    if exp <= 0 {
        return format!("{sign}{raw}");
    }

    let exp = exp as usize;
    let padded = if raw.len() <= exp {
        format!("{}{raw}", "0".repeat(exp - raw.len() + 1))
    } else {
        raw
    };
    let (whole, fraction) = padded.split_at(padded.len() - exp);
    format!("{sign}{whole}.{fraction}")
}
