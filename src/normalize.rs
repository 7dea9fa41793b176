//! Numeric normalization for scraped price strings.
//!
//! Resolves the comma/dot decimal-separator ambiguity deterministically.
//! Every extraction path converts raw text to a number through this module,
//! so the same string always compares equal to itself no matter where it
//! was scraped from.

use regex::Regex;
use thiserror::Error;

/// The raw string contained nothing that parses as a finite number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a numeric string: {0:?}")]
pub struct NotNumeric(pub String);

/// Canonical form of a raw price string, used for all comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct Canonical {
    /// First currency-prefixed snippet, else first bare numeric run, else
    /// the whole trimmed input.
    pub raw: String,
    /// Normalized numeric value, when one could be derived.
    pub price: Option<f64>,
    /// First currency symbol seen in the input, if any.
    pub currency_symbol: Option<char>,
}

/// Normalize a raw numeric-looking string into a decimal value.
///
/// Strips everything except digits, `.`, `,` and `-`, then resolves the
/// separator convention:
/// - only commas present: comma is the decimal separator
/// - both present: whichever separator appears later is the decimal
///   separator, the other is a thousands separator and is dropped
/// - only dots or neither: dots are decimal separators as-is
pub fn normalize(raw: &str) -> Result<f64, NotNumeric> {
    let filtered: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if filtered.is_empty() {
        return Err(NotNumeric(raw.to_string()));
    }

    let comma = filtered.find(',');
    let dot = filtered.find('.');
    let cleaned = match (comma, dot) {
        (Some(_), None) => filtered.replace(',', "."),
        (Some(c), Some(d)) if c > d => filtered.replace('.', "").replace(',', "."),
        _ => filtered.replace(',', ""),
    };

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(NotNumeric(raw.to_string())),
    }
}

/// Regex matching a currency-symbol-prefixed numeric snippet.
pub(crate) fn currency_pattern() -> Regex {
    Regex::new(r"[$£€¥]\s?[0-9][0-9,.\s]*").expect("currency regex is valid")
}

/// Regex matching a bare numeric run with internal separators.
pub(crate) fn bare_numeric_pattern() -> Regex {
    Regex::new(r"[0-9][0-9,.]+[0-9]").expect("bare numeric regex is valid")
}

/// First currency-symbol-prefixed numeric snippet in `text`, trimmed.
pub fn currency_snippet(text: &str) -> Option<String> {
    currency_pattern()
        .find(text)
        .map(|m| m.as_str().trim().to_string())
}

/// First bare numeric run (digit groups joined by comma/dot) in `text`.
pub fn bare_numeric_snippet(text: &str) -> Option<String> {
    bare_numeric_pattern()
        .find(text)
        .map(|m| m.as_str().to_string())
}

/// Reduce a raw string to its canonical `{raw, price}` pair.
///
/// Prefers a currency-prefixed snippet, falls back to a bare numeric run,
/// and finally to the whole trimmed input with whitespace collapsed.
pub fn canonicalize(raw: &str) -> Canonical {
    let txt = raw.trim();
    let snippet = currency_snippet(txt)
        .or_else(|| bare_numeric_snippet(txt))
        .unwrap_or_else(|| collapse_whitespace(txt));
    let price = normalize(&snippet).ok();
    let currency_symbol = txt.chars().find(|c| matches!(c, '$' | '£' | '€' | '¥'));
    Canonical {
        raw: snippet,
        price,
        currency_symbol,
    }
}

/// Collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_as_decimal() {
        assert_eq!(normalize("12,50").unwrap(), 12.50);
        assert_eq!(normalize("0,99").unwrap(), 0.99);
    }

    #[test]
    fn test_mixed_separators_comma_last() {
        assert_eq!(normalize("1.234,56").unwrap(), 1234.56);
    }

    #[test]
    fn test_mixed_separators_dot_last() {
        assert_eq!(normalize("1,234.56").unwrap(), 1234.56);
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(normalize("1234").unwrap(), 1234.0);
    }

    #[test]
    fn test_currency_symbols_stripped() {
        assert_eq!(normalize("$19.99").unwrap(), 19.99);
        assert_eq!(normalize("€ 1.234,56").unwrap(), 1234.56);
    }

    #[test]
    fn test_negative() {
        assert_eq!(normalize("-5.25").unwrap(), -5.25);
    }

    #[test]
    fn test_empty_and_non_numeric_fail() {
        assert!(normalize("").is_err());
        assert!(normalize("free shipping").is_err());
        assert!(normalize("$").is_err());
    }

    #[test]
    fn test_idempotent_on_own_output() {
        for raw in ["12,50", "1.234,56", "$ 99.95", "1234"] {
            let v = normalize(raw).unwrap();
            assert_eq!(normalize(&v.to_string()).unwrap(), v);
        }
    }

    #[test]
    fn test_currency_snippet() {
        assert_eq!(
            currency_snippet("was $1,299.00 now cheaper").as_deref(),
            Some("$1,299.00")
        );
        assert_eq!(currency_snippet("no price here"), None);
    }

    #[test]
    fn test_bare_numeric_snippet() {
        assert_eq!(
            bare_numeric_snippet("about 1.299,00 total").as_deref(),
            Some("1.299,00")
        );
        assert_eq!(bare_numeric_snippet("only 5"), None);
    }

    #[test]
    fn test_canonicalize_prefers_currency_match() {
        let c = canonicalize("  Price: $10.00 (save 20%)  ");
        assert_eq!(c.raw, "$10.00");
        assert_eq!(c.price, Some(10.0));
        assert_eq!(c.currency_symbol, Some('$'));
    }

    #[test]
    fn test_canonicalize_bare_fallback() {
        let c = canonicalize("ab 12,50 cd");
        assert_eq!(c.raw, "12,50");
        assert_eq!(c.price, Some(12.5));
        assert_eq!(c.currency_symbol, None);
    }

    #[test]
    fn test_canonicalize_text_fallback_collapses_whitespace() {
        let c = canonicalize("  out of   stock ");
        assert_eq!(c.raw, "out of stock");
        assert_eq!(c.price, None);
    }
}
