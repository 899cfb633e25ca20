//! Raw field text to ledger values.
//!
//! Amounts are taken verbatim in the ledger's smallest unit; no denomination
//! conversion happens here or anywhere else.

use std::str::FromStr;

use chrono::{DateTime, Local, LocalResult, NaiveDateTime, TimeZone};
use ledger_api::types::parse_address;
use ledger_api::{Address, U256};
use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Shapes produced by a `datetime-local` input, with `T` or a space.
const LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

const OVERFLOW: &str = "exceeds the 256-bit ledger word";

fn invalid_amount(field: &'static str, raw: &str, reason: &'static str) -> ValidationError {
    ValidationError::InvalidAmount {
        field,
        raw: raw.to_string(),
        reason,
    }
}

fn parse_integer(field: &'static str, raw: &str) -> Result<U256, ValidationError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(invalid_amount(field, raw, "is empty"));
    }
    if text.bytes().all(|b| b.is_ascii_digit()) {
        return U256::from_dec_str(text).map_err(|_| invalid_amount(field, raw, OVERFLOW));
    }
    // Not a bare digit string; work out a useful reason.
    let reason = match Decimal::from_str(text) {
        Ok(d) if d.is_sign_negative() && !d.is_zero() => "is negative",
        Ok(d) if !d.fract().is_zero() => "must be a whole number",
        Ok(_) => "must be written as plain digits",
        Err(_) => "is not a number",
    };
    Err(invalid_amount(field, raw, reason))
}

/// Price, quantity or ticket supply: a strictly positive base-10 integer.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<U256, ValidationError> {
    let value = parse_integer(field, raw)?;
    if value.is_zero() {
        return Err(invalid_amount(field, raw, "must be greater than zero"));
    }
    Ok(value)
}

/// Event ids start at zero.
pub fn parse_event_id(raw: &str) -> Result<U256, ValidationError> {
    parse_integer("event id", raw)
}

/// Exact `unit_price * quantity`; fails if the product does not fit a ledger word.
pub fn total_cost(unit_price: U256, quantity: U256) -> Result<U256, ValidationError> {
    unit_price.checked_mul(quantity).ok_or_else(|| ValidationError::InvalidAmount {
        field: "total cost",
        raw: format!("{} x {}", unit_price, quantity),
        reason: OVERFLOW,
    })
}

pub fn parse_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidName);
    }
    Ok(name.to_string())
}

pub fn parse_recipient(raw: &str) -> Result<Address, ValidationError> {
    parse_address(raw.trim()).map_err(|e| ValidationError::InvalidAddress {
        raw: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Event start in whole seconds since the epoch, read in the local time zone.
pub fn parse_start_time(raw: &str) -> Result<U256, ValidationError> {
    parse_start_time_in(raw, &Local)
}

/// Like [`parse_start_time`] with an explicit zone for zone-less input.
/// Sub-second precision is floored.
pub fn parse_start_time_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<U256, ValidationError> {
    let invalid = |reason| ValidationError::InvalidDate {
        raw: raw.to_string(),
        reason,
    };
    let text = raw.trim();
    if text.is_empty() {
        return Err(invalid("is empty"));
    }

    let seconds = match DateTime::parse_from_rfc3339(text) {
        Ok(dt) => dt.timestamp(),
        Err(_) => {
            let naive = LOCAL_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
                .ok_or_else(|| invalid("is not a date-time"))?;
            match naive.and_local_timezone(tz.clone()) {
                LocalResult::Single(dt) => dt.timestamp(),
                // DST fold: earliest instant
                LocalResult::Ambiguous(earliest, _) => earliest.timestamp(),
                LocalResult::None => return Err(invalid("does not exist in the local time zone")),
            }
        }
    };

    if seconds <= 0 {
        return Err(invalid("is not after the epoch"));
    }
    Ok(U256::from(seconds as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn reason_of(err: ValidationError) -> &'static str {
        match err {
            ValidationError::InvalidAmount { reason, .. } => reason,
            ValidationError::InvalidDate { reason, .. } => reason,
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_parse_amount_accepts_positive_integers() {
        assert_eq!(parse_amount("price", "42").unwrap(), U256::from(42u64));
        assert_eq!(parse_amount("price", " 007 ").unwrap(), U256::from(7u64));
        let big = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(parse_amount("price", big).unwrap(), U256::MAX);
    }

    #[test]
    fn test_parse_amount_rejections() {
        let cases = [
            ("", "is empty"),
            ("   ", "is empty"),
            ("abc", "is not a number"),
            ("12abc", "is not a number"),
            ("1.5", "must be a whole number"),
            ("-3", "is negative"),
            ("0", "must be greater than zero"),
            ("000", "must be greater than zero"),
            ("+5", "must be written as plain digits"),
            ("5.0", "must be written as plain digits"),
            (
                "115792089237316195423570985008687907853269984665640564039457584007913129639936",
                OVERFLOW,
            ),
        ];
        for (raw, expected) in cases {
            let err = parse_amount("quantity", raw).unwrap_err();
            assert_eq!(err.category(), crate::outcome::FailureCategory::InvalidAmount);
            assert_eq!(reason_of(err), expected, "input {:?}", raw);
        }
    }

    #[test]
    fn test_event_id_allows_zero() {
        assert_eq!(parse_event_id("0").unwrap(), U256::zero());
        assert_eq!(parse_event_id("12").unwrap(), U256::from(12u64));
        assert!(parse_event_id("-1").is_err());
        assert!(parse_event_id("").is_err());
    }

    #[test]
    fn test_total_cost_is_exact_beyond_f64_precision() {
        let price = U256::from(9_007_199_254_740_993u64); // 2^53 + 1
        let quantity = U256::from(1_000_000_000_000_000_007u64);
        let total = total_cost(price, quantity).unwrap();
        assert_eq!(total.to_string(), "9007199254740993063050394783186951");
    }

    #[test]
    fn test_total_cost_overflow_is_rejected() {
        let err = total_cost(U256::MAX, U256::from(2u64)).unwrap_err();
        assert_eq!(reason_of(err), OVERFLOW);
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("  Gala  ").unwrap(), "Gala");
        assert_eq!(parse_name(" \t"), Err(ValidationError::InvalidName));
    }

    #[test]
    fn test_parse_recipient() {
        let address = parse_recipient(" 0x70997970C51812dc3A010C7d01b50e0d17dc79C8 ").unwrap();
        assert_eq!(address.as_bytes()[0], 0x70);
        assert!(matches!(
            parse_recipient("bob"),
            Err(ValidationError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_start_time_local_formats() {
        assert_eq!(
            parse_start_time_in("2024-05-01T19:30", &Utc).unwrap(),
            U256::from(1_714_591_800u64)
        );
        assert_eq!(
            parse_start_time_in("2024-05-01 19:30:00", &Utc).unwrap(),
            U256::from(1_714_591_800u64)
        );
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            parse_start_time_in("2024-05-01T19:30:15", &plus_two).unwrap(),
            U256::from(1_714_584_615u64)
        );
    }

    #[test]
    fn test_start_time_floors_fractional_seconds() {
        assert_eq!(
            parse_start_time_in("2024-05-01T19:30:00.999", &Utc).unwrap(),
            U256::from(1_714_591_800u64)
        );
    }

    #[test]
    fn test_start_time_rfc3339_uses_own_offset() {
        assert_eq!(
            parse_start_time_in("2024-05-01T21:30:15+02:00", &Utc).unwrap(),
            U256::from(1_714_591_815u64)
        );
    }

    #[test]
    fn test_start_time_rejections() {
        assert_eq!(reason_of(parse_start_time_in("", &Utc).unwrap_err()), "is empty");
        assert_eq!(
            reason_of(parse_start_time_in("next friday", &Utc).unwrap_err()),
            "is not a date-time"
        );
        assert_eq!(
            reason_of(parse_start_time_in("1970-01-01T00:00", &Utc).unwrap_err()),
            "is not after the epoch"
        );
        assert_eq!(
            reason_of(parse_start_time_in("1960-06-01T12:00", &Utc).unwrap_err()),
            "is not after the epoch"
        );
    }
}
