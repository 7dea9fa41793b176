//! Multi-strategy price extraction from raw HTML.
//!
//! Runs an ordered cascade over heterogeneous markup: hint selector, site
//! overrides, JSON-LD, microdata, meta tags, class/id heuristics, broad
//! element scan, full-text fallback. First success wins; there is no
//! scoring across strategies, so behavior stays predictable and
//! debuggable. Parsing uses the `scraper` crate for CSS selector access.

pub mod jsonld;
pub mod live;
pub mod overrides;

use scraper::{ElementRef, Html, Selector};

use crate::normalize;

/// A single extraction result, owned by the caller for one comparison cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation {
    /// Normalized numeric value, when one could be derived.
    pub price: Option<f64>,
    /// The unprocessed text the value was scraped from.
    pub raw: String,
    /// Currency code when structured data supplied one.
    pub currency: Option<String>,
}

impl PriceObservation {
    fn numeric(price: f64, raw: impl Into<String>) -> Self {
        Self {
            price: Some(price),
            raw: raw.into(),
            currency: None,
        }
    }
}

/// Read-only view of one document handed to each strategy.
pub(crate) struct ExtractionContext<'a> {
    pub doc: Html,
    pub host: String,
    pub hint: Option<&'a str>,
}

type Strategy = fn(&ExtractionContext) -> Option<PriceObservation>;

/// Strategy cascade in strict priority order.
const CASCADE: &[(&str, Strategy)] = &[
    ("hint-selector", hint_selector),
    ("site-override", overrides::site_override),
    ("jsonld", jsonld_strategy),
    ("itemprop", itemprop),
    ("meta-tags", meta_tags),
    ("price-class", class_heuristics),
    ("broad-scan", broad_scan),
    ("full-text", full_text),
];

/// Extract the first plausible price from raw markup.
///
/// Deterministic and side-effect-free; returns `None` when every strategy
/// comes up empty.
pub fn extract(html: &str, page_url: &str, hint_selector: Option<&str>) -> Option<PriceObservation> {
    let ctx = ExtractionContext {
        doc: Html::parse_document(html),
        host: url::Url::parse(page_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_ascii_lowercase()))
            .unwrap_or_default(),
        hint: hint_selector,
    };

    for (name, strategy) in CASCADE {
        if let Some(obs) = strategy(&ctx) {
            tracing::debug!(strategy = name, raw = %obs.raw, "price extracted");
            return Some(obs);
        }
    }
    None
}

/// Element value for price purposes: `content` attribute when present and
/// non-empty, else the rendered text.
pub(crate) fn element_raw(el: &ElementRef<'_>) -> String {
    match el.value().attr("content") {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => el.text().collect::<String>().trim().to_string(),
    }
}

// ── Strategy 1: hint selector ───────────────────────────────────────────────

fn hint_selector(ctx: &ExtractionContext) -> Option<PriceObservation> {
    let hint = ctx.hint?;
    let sel = match Selector::parse(hint) {
        Ok(s) => s,
        Err(_) => {
            tracing::debug!(selector = hint, "hint selector does not parse, skipping");
            return None;
        }
    };
    let el = ctx.doc.select(&sel).next()?;
    let raw = element_raw(&el);
    let price = normalize::normalize(&raw).ok()?;
    Some(PriceObservation::numeric(price, raw))
}

// ── Strategy 3: JSON-LD ─────────────────────────────────────────────────────

fn jsonld_strategy(ctx: &ExtractionContext) -> Option<PriceObservation> {
    jsonld::jsonld_price(&ctx.doc)
}

// ── Strategy 4: microdata itemprop ──────────────────────────────────────────

fn itemprop(ctx: &ExtractionContext) -> Option<PriceObservation> {
    let sel = Selector::parse(r#"[itemprop~="price"]"#).expect("itemprop selector is valid");
    for el in ctx.doc.select(&sel) {
        let raw = element_raw(&el);
        if let Ok(price) = normalize::normalize(&raw) {
            return Some(PriceObservation::numeric(price, raw));
        }
    }
    None
}

// ── Strategy 5: meta tags ───────────────────────────────────────────────────

fn meta_tags(ctx: &ExtractionContext) -> Option<PriceObservation> {
    let sel = Selector::parse("meta").expect("meta selector is valid");
    for el in ctx.doc.select(&sel) {
        let attr = el
            .value()
            .attr("itemprop")
            .or_else(|| el.value().attr("property"))
            .or_else(|| el.value().attr("name"))
            .unwrap_or("")
            .to_ascii_lowercase();
        if attr.is_empty() || !(attr.contains("price") || attr == "product:price:amount") {
            continue;
        }
        let Some(content) = el.value().attr("content") else {
            continue;
        };
        if let Ok(price) = normalize::normalize(content) {
            return Some(PriceObservation::numeric(price, content));
        }
    }
    None
}

// ── Strategy 6: class/id heuristics ─────────────────────────────────────────

fn class_heuristics(ctx: &ExtractionContext) -> Option<PriceObservation> {
    let sel = Selector::parse(r#"[class*="price"], [id*="price"], [data-price]"#)
        .expect("price class selector is valid");
    let currency_re = normalize::currency_pattern();
    let bare_re = normalize::bare_numeric_pattern();

    for el in ctx.doc.select(&sel) {
        let text = element_raw(&el);
        if let Some(m) = currency_re.find(&text) {
            if let Ok(price) = normalize::normalize(m.as_str()) {
                return Some(PriceObservation::numeric(price, m.as_str().trim()));
            }
        }
        if let Some(m) = bare_re.find(&text) {
            if let Ok(price) = normalize::normalize(m.as_str()) {
                return Some(PriceObservation::numeric(price, m.as_str()));
            }
        }
    }
    None
}

// ── Strategy 7: broad element scan ──────────────────────────────────────────

fn broad_scan(ctx: &ExtractionContext) -> Option<PriceObservation> {
    let sel = Selector::parse("span, div, li, p").expect("broad selector is valid");
    let currency_re = normalize::currency_pattern();

    for el in ctx.doc.select(&sel) {
        let text = el.text().collect::<String>();
        if let Some(m) = currency_re.find(&text) {
            if let Ok(price) = normalize::normalize(m.as_str()) {
                return Some(PriceObservation::numeric(price, m.as_str().trim()));
            }
        }
    }
    None
}

// ── Strategy 8: full-document text fallback ─────────────────────────────────

fn full_text(ctx: &ExtractionContext) -> Option<PriceObservation> {
    let body = ctx.doc.root_element().text().collect::<String>();

    if let Some(m) = normalize::currency_pattern().find(&body) {
        if let Ok(price) = normalize::normalize(m.as_str()) {
            return Some(PriceObservation::numeric(price, m.as_str().trim()));
        }
    }

    // Lowest-confidence last resort: digit groups joined by comma/dot/space.
    let grouped = regex::Regex::new(r"\d{1,3}[,.\s]\d{2,3}[,.\d]*")
        .expect("grouped digits regex is valid");
    if let Some(m) = grouped.find(&body) {
        if let Ok(price) = normalize::normalize(m.as_str()) {
            return Some(PriceObservation::numeric(price, m.as_str().trim()));
        }
    }
    None
}

// ── Title extraction ────────────────────────────────────────────────────────

/// Best-effort page title: product title element, OpenGraph, twitter card,
/// then the document title.
pub fn extract_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);

    let product = Selector::parse("#productTitle").expect("product title selector is valid");
    if let Some(el) = doc.select(&product).next() {
        let text = el.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }

    for meta in [r#"meta[property="og:title"]"#, r#"meta[name="twitter:title"]"#] {
        let sel = Selector::parse(meta).expect("title meta selector is valid");
        if let Some(content) = doc
            .select(&sel)
            .next()
            .and_then(|el| el.value().attr("content"))
        {
            if !content.is_empty() {
                return Some(content.to_string());
            }
        }
    }

    let title = Selector::parse("title").expect("title selector is valid");
    doc.select(&title)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_selector_wins_over_everything() {
        let html = r#"
        <html><body>
        <span id="my-price" content="42.50">visible text</span>
        <div class="price">$99.00</div>
        </body></html>
        "#;
        let obs = extract(html, "https://shop.example/p", Some("#my-price")).unwrap();
        assert_eq!(obs.price, Some(42.5));
        assert_eq!(obs.raw, "42.50");
    }

    #[test]
    fn test_invalid_hint_selector_falls_through() {
        let html = r#"<html><body><div class="price">$99.00</div></body></html>"#;
        let obs = extract(html, "https://shop.example/p", Some("[[broken")).unwrap();
        assert_eq!(obs.price, Some(99.0));
    }

    #[test]
    fn test_jsonld_outranks_free_text() {
        let html = r#"
        <html><head>
        <script type="application/ld+json">
        {"@type": "Product", "name": "Widget", "offers": {"price": 29.99}}
        </script>
        </head><body>
        <p>Hurry, was $59.99 yesterday!</p>
        </body></html>
        "#;
        let obs = extract(html, "https://shop.example/widget", None).unwrap();
        assert_eq!(obs.price, Some(29.99));
    }

    #[test]
    fn test_itemprop_prefers_content_attr() {
        let html = r#"
        <html><body>
        <span itemprop="price" content="129.00">$129 and change</span>
        </body></html>
        "#;
        let obs = extract(html, "https://shop.example/p", None).unwrap();
        assert_eq!(obs.price, Some(129.0));
        assert_eq!(obs.raw, "129.00");
    }

    #[test]
    fn test_meta_tag_price() {
        let html = r#"
        <html><head>
        <meta property="product:price:amount" content="15.95" />
        </head><body></body></html>
        "#;
        let obs = extract(html, "https://shop.example/p", None).unwrap();
        assert_eq!(obs.price, Some(15.95));
    }

    #[test]
    fn test_class_heuristic_currency_first() {
        let html = r#"
        <html><body>
        <div class="product-price">Only $18.75 today</div>
        </body></html>
        "#;
        let obs = extract(html, "https://shop.example/p", None).unwrap();
        assert_eq!(obs.price, Some(18.75));
        assert_eq!(obs.raw, "$18.75");
    }

    #[test]
    fn test_class_heuristic_bare_number_fallback() {
        let html = r#"
        <html><body>
        <span data-price="">1.299,00</span>
        </body></html>
        "#;
        let obs = extract(html, "https://shop.example/p", None).unwrap();
        assert_eq!(obs.price, Some(1299.0));
    }

    #[test]
    fn test_broad_scan_finds_currency_in_plain_span() {
        let html = r#"
        <html><body>
        <span>now € 44,90</span>
        </body></html>
        "#;
        let obs = extract(html, "https://shop.example/p", None).unwrap();
        assert_eq!(obs.price, Some(44.9));
    }

    #[test]
    fn test_full_text_grouped_digits_last_resort() {
        let html = "<html><body><table><td>1.234,56</td></table></body></html>";
        let obs = extract(html, "https://shop.example/p", None).unwrap();
        assert_eq!(obs.price, Some(1234.56));
    }

    #[test]
    fn test_no_price_anywhere() {
        let html = "<html><body><p>coming soon</p></body></html>";
        assert_eq!(extract(html, "https://shop.example/p", None), None);
    }

    #[test]
    fn test_extract_title_priority() {
        let html = r#"
        <html><head>
        <meta property="og:title" content="OG Widget" />
        <title>Doc Title</title>
        </head><body><h1 id="productTitle"> Product Widget </h1></body></html>
        "#;
        assert_eq!(extract_title(html).as_deref(), Some("Product Widget"));

        let html = r#"<html><head><title>Doc Title</title></head><body></body></html>"#;
        assert_eq!(extract_title(html).as_deref(), Some("Doc Title"));
    }
}
