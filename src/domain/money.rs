use thiserror::Error;

/// Amounts are integer cents: 1 unit = 100 cents, so 50.00 = 5000.
pub type Cents = i64;

/// Render cents as "units.cc", e.g. 5000 -> "50.00", -1234 -> "-12.34".
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid amount format: {0}")]
    InvalidFormat(String),

    #[error("amount has more than two decimal places: {0}")]
    TooPrecise(String),

    #[error("amount out of range: {0}")]
    OutOfRange(String),
}

/// Parse a decimal amount into cents.
/// Accepts "50", "50.5", "50.05", ".5" and a leading sign.
pub fn parse_cents(input: &str) -> Result<Cents, ParseAmountError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseAmountError::Empty);
    }

    let (negative, digits) = match trimmed.as_bytes()[0] {
        b'-' => (true, &trimmed[1..]),
        b'+' => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let invalid = || ParseAmountError::InvalidFormat(trimmed.to_string());

    let (units_str, frac_str) = match digits.split_once('.') {
        Some((units, frac)) => (units, frac),
        None => (digits, ""),
    };
    if units_str.is_empty() && frac_str.is_empty() {
        return Err(invalid());
    }
    if !units_str.bytes().all(|b| b.is_ascii_digit())
        || !frac_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    if frac_str.len() > 2 {
        return Err(ParseAmountError::TooPrecise(trimmed.to_string()));
    }

    let units: i64 = if units_str.is_empty() {
        0
    } else {
        units_str
            .parse()
            .map_err(|_| ParseAmountError::OutOfRange(trimmed.to_string()))?
    };
    let frac: i64 = match frac_str.len() {
        0 => 0,
        1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => frac_str.parse().map_err(|_| invalid())?,
    };

    let cents = units
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(|| ParseAmountError::OutOfRange(trimmed.to_string()))?;
    Ok(if negative { -cents } else { cents })
}
