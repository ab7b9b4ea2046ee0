//! Serde helper functions for request deserialization.
//!
//! Clients send blank strings for fields they did not fill in and sometimes send
//! numbers as strings. These helpers treat blanks as None and accept both forms
//! for numeric fields. Numbers are read as exact decimals from their textual form,
//! so `0.1` stays `0.1` instead of the nearest binary float.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

/// Deserialize an optional string, treating empty strings as None.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Parses a decimal from plain (`12.50`) or scientific (`1.25e1`) notation.
pub fn parse_decimal(s: &str) -> Option<Decimal> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

/// Deserialize an optional decimal given either as a JSON number or as a string.
/// Empty strings are treated as None.
pub fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<NumberOrString>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(NumberOrString::Number(n)) => n.to_string(),
        Some(NumberOrString::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(NumberOrString::String(s)) => s,
    };
    parse_decimal(&raw)
        .map(Some)
        .ok_or_else(|| D::Error::custom(format!("invalid number: {raw}")))
}

/// Deserialize a list of optional decimals, e.g. a `[min, max]` price range.
pub fn deserialize_optional_number_list<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<Option<Decimal>>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Entry(#[serde(deserialize_with = "deserialize_optional_number")] Option<Decimal>);

    let entries: Option<Vec<Entry>> = Option::deserialize(deserializer)?;
    Ok(entries.map(|entries| entries.into_iter().map(|Entry(n)| n).collect()))
}
