//! Field-cleaning helpers shared by the record extractors.

use crate::common::types::PricePolicy;

/// Collapse any run of whitespace to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Resolve a brand with a specificity-first policy: a non-placeholder
/// explicit field wins, then the first case-insensitive substring match
/// against the site's ordered brand list, then the fallback label.
pub fn resolve_brand(
    product_name: &str,
    explicit: Option<&str>,
    known_brands: &[&str],
    fallback: &str,
) -> String {
    if let Some(brand) = explicit {
        let brand = brand.trim();
        if !brand.is_empty() && brand != fallback {
            return brand.to_string();
        }
    }

    let name_lower = product_name.to_lowercase();
    for brand in known_brands {
        if name_lower.contains(&brand.to_lowercase()) {
            return (*brand).to_string();
        }
    }

    fallback.to_string()
}

/// Integer price convention: drop everything after the first decimal
/// separator, then strip every non-digit. `"Rs 29,969.50"` -> `29969`.
pub fn clean_price_digits(text: &str) -> Option<i64> {
    let integral = text.split('.').next().unwrap_or("");
    let digits: String = integral.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Decimal price convention: keep digits and the separator, parse as float.
/// `"LKR 1,500.50"` -> `1500.5`.
pub fn clean_price_decimal(text: &str) -> Option<f64> {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if filtered.is_empty() {
        return None;
    }
    filtered.parse().ok()
}

/// Apply the site's unparsed-price policy to a parse result.
pub fn apply_price_policy(parsed: Option<f64>, policy: PricePolicy) -> Option<f64> {
    match parsed {
        Some(price) => Some(price),
        None => match policy {
            PricePolicy::Zero => Some(0.0),
            PricePolicy::Skip => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_is_idempotent_on_clean_strings() {
        assert_eq!(clean_price_digits("81500"), Some(81500));
        assert_eq!(clean_price_digits("¥81,500"), Some(81500));
    }

    #[test]
    fn unparsable_prices_yield_none() {
        assert_eq!(clean_price_digits("Call for price"), None);
        assert_eq!(clean_price_decimal("Call for price"), None);
    }

    #[test]
    fn decimal_convention_keeps_cents() {
        assert_eq!(clean_price_decimal("Rs 1,500.50"), Some(1500.5));
    }

    #[test]
    fn brand_resolution_is_first_match_wins() {
        let brands = ["HP", "Lenovo", "Asus"];
        assert_eq!(
            resolve_brand("ASUS TUF Gaming F15", None, &brands, "Other"),
            "Asus"
        );
        assert_eq!(resolve_brand("Generic Mouse Pad", None, &brands, "Other"), "Other");
    }

    #[test]
    fn explicit_brand_beats_name_search() {
        let brands = ["HP"];
        assert_eq!(
            resolve_brand("HP Victus", Some("Omen"), &brands, "Unknown Brand"),
            "Omen"
        );
        // Placeholder explicit value falls through to the name search.
        assert_eq!(
            resolve_brand("HP Victus", Some("Unknown Brand"), &brands, "Unknown Brand"),
            "HP"
        );
    }
}
