//! JSON-LD structured-data price lookup.
//!
//! Walks every embedded `application/ld+json` payload, unwrapping
//! top-level arrays and `@graph` containers. Malformed payloads are
//! skipped per-payload; the cascade proceeds.

use scraper::{Html, Selector};
use serde_json::Value;

use super::PriceObservation;
use crate::normalize;

/// Price field lookup order inside a JSON-LD object.
const PRICE_PATHS: &[&[&str]] = &[
    &["offers", "price"],
    &["price"],
    &["offers", "priceSpecification", "price"],
    &["offers", "lowPrice"],
];

/// First numeric price found across all JSON-LD payloads in the document.
pub(crate) fn jsonld_price(doc: &Html) -> Option<PriceObservation> {
    let sel = Selector::parse(r#"script[type="application/ld+json"]"#)
        .expect("JSON-LD selector is valid");

    for script in doc.select(&sel) {
        let text = script.inner_html();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(text) {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("skipping malformed JSON-LD payload: {e}");
                continue;
            }
        };
        for obj in unwrap_payload(&value) {
            if let Some(obs) = object_price(obj) {
                return Some(obs);
            }
        }
    }
    None
}

/// Flatten array-wrapped payloads and `@graph` containers into objects.
fn unwrap_payload(value: &Value) -> Vec<&Value> {
    if let Some(arr) = value.as_array() {
        return arr.iter().collect();
    }
    if let Some(graph) = value.get("@graph").and_then(|g| g.as_array()) {
        return graph.iter().collect();
    }
    vec![value]
}

fn object_price(obj: &Value) -> Option<PriceObservation> {
    for path in PRICE_PATHS {
        if let Some(raw) = lookup(obj, path).and_then(price_text) {
            if let Ok(price) = normalize::normalize(&raw) {
                return Some(PriceObservation {
                    price: Some(price),
                    raw,
                    currency: currency_of(obj),
                });
            }
        }
    }
    None
}

/// Walk a dotted path, taking the first element of any offer arrays on the
/// way (multi-offer listings put the primary offer first).
fn lookup<'a>(obj: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = obj;
    for key in path {
        current = current.get(key)?;
        if let Some(arr) = current.as_array() {
            current = arr.first()?;
        }
    }
    Some(current)
}

/// A JSON-LD price may be a number or a string.
fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

fn currency_of(obj: &Value) -> Option<String> {
    obj.get("offers")
        .map(|o| o.as_array().and_then(|a| a.first()).unwrap_or(o))
        .and_then(|o| o.get("priceCurrency"))
        .or_else(|| obj.get("priceCurrency"))
        .and_then(|c| c.as_str())
        .map(|s| s.to_string())
}
