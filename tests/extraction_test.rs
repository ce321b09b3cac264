#[cfg(test)]
mod tests {
    use catalog_scraper::apis::{singersl, unitysystems};
    use catalog_scraper::common::progress::SilentProgress;
    use catalog_scraper::common::types::{PricePolicy, ScrapeConfig};

    fn test_config(unparsed_price: PricePolicy) -> ScrapeConfig {
        ScrapeConfig {
            base_url: "https://shop.example/".to_string(),
            output_filename: "test.xlsx".to_string(),
            country: "Sri Lanka".to_string(),
            currency: "LKR".to_string(),
            year: 2025,
            min_price: 1_000.0,
            max_price: 99_999_999.0,
            category_ids: Vec::new(),
            categories: Vec::new(),
            unparsed_price,
            page_ceiling: 50,
        }
    }

    fn singer_card(name: &str, price: &str) -> String {
        format!(
            r#"<div class="p-2 product">
                 <h5 class="card-title product__name mb-1">{name}</h5>
                 <div class="product__price"><span class="price"> {price} </span></div>
               </div>"#
        )
    }

    #[test]
    fn singer_price_text_is_cleaned_and_retained() {
        let html = format!("<html><body>{}</body></html>", singer_card("Singer Fridge", "Rs 29,969"));
        let config = test_config(PricePolicy::Skip);

        let parsed = singersl::parse_listing_page(&html, 1, &config, &SilentProgress);

        assert_eq!(parsed.listing_count, 1);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].price, 29_969.0);
        assert_eq!(parsed.records[0].brand, "Singer");
    }

    #[test]
    fn singer_full_page_assumes_next_page() {
        let cards: String = (0..12)
            .map(|i| singer_card(&format!("Samsung TV {i}"), "Rs 120,000"))
            .collect();
        let html = format!("<html><body>{cards}</body></html>");
        let config = test_config(PricePolicy::Skip);

        let parsed = singersl::parse_listing_page(&html, 1, &config, &SilentProgress);

        assert_eq!(parsed.records.len(), 12);
        assert!(parsed.has_next, "a full page should be assumed continuable");
    }

    #[test]
    fn singer_partial_page_without_next_link_stops() {
        let html = format!("<html><body>{}</body></html>", singer_card("LG Soundbar", "Rs 45,000"));
        let config = test_config(PricePolicy::Skip);

        let parsed = singersl::parse_listing_page(&html, 1, &config, &SilentProgress);

        assert!(!parsed.has_next);
    }

    #[test]
    fn singer_explicit_next_link_wins_over_item_count() {
        let html = format!(
            r#"<html><body>{}<a href="https://www.singersl.com/filter?page=2">2</a></body></html>"#,
            singer_card("LG Soundbar", "Rs 45,000")
        );
        let config = test_config(PricePolicy::Skip);

        let parsed = singersl::parse_listing_page(&html, 1, &config, &SilentProgress);

        assert!(parsed.has_next);
    }

    fn unity_card(title_block: &str, price_block: &str) -> String {
        format!(
            r#"<div class="product-grid-item">
                 {title_block}
                 <span class="price">{price_block}</span>
               </div>"#
        )
    }

    #[test]
    fn unparsable_price_defaults_to_zero_and_is_excluded() {
        // "Call for price" cannot be parsed; with the Zero policy the record
        // gets price 0 and the min_price bound excludes it.
        let html = unity_card(
            r#"<h3 class="wd-entities-title"><a href="https://u.example/p/1">Dell Monitor</a></h3>"#,
            r#"<span class="woocommerce-Price-amount"><bdi>Call for price</bdi></span>"#,
        );
        let config = test_config(PricePolicy::Zero);

        let parsed = unitysystems::parse_listing_page(&html, &config, &SilentProgress);

        assert_eq!(parsed.listing_count, 1);
        assert!(parsed.records.is_empty());
    }

    #[test]
    fn one_broken_listing_does_not_abort_the_page() {
        let good = unity_card(
            r#"<h3 class="wd-entities-title"><a href="https://u.example/p/1">Asus Router</a></h3>"#,
            r#"<span class="woocommerce-Price-amount"><bdi>Rs 18,500.00</bdi></span>"#,
        );
        // No title anchor at all: extraction of this entry fails and is skipped.
        let broken = r#"<div class="product-grid-item"><span class="price"></span></div>"#;
        let good2 = unity_card(
            r#"<h3 class="wd-entities-title"><a href="https://u.example/p/2">MSI Keyboard</a></h3>"#,
            r#"<span class="woocommerce-Price-amount"><bdi>Rs 9,200.00</bdi></span>"#,
        );
        let html = format!("<html><body>{good}{broken}{good2}</body></html>");
        let config = test_config(PricePolicy::Zero);

        let parsed = unitysystems::parse_listing_page(&html, &config, &SilentProgress);

        assert_eq!(parsed.listing_count, 3);
        assert_eq!(parsed.records.len(), 2);
    }

    #[test]
    fn every_emitted_record_is_within_the_configured_bounds() {
        let cards = [
            ("Acer Cheap Cable", "Rs 500"),        // below min
            ("Acer Laptop", "Rs 350,000"),         // in range
            ("Acer Something Absurd", "Rs 999,999,999,999"), // above max
        ]
        .iter()
        .map(|(name, price)| {
            unity_card(
                &format!(r#"<h3 class="wd-entities-title"><a href="https://u.example/p">{name}</a></h3>"#),
                &format!(r#"<span class="woocommerce-Price-amount"><bdi>{price}</bdi></span>"#),
            )
        })
        .collect::<String>();
        let html = format!("<html><body>{cards}</body></html>");
        let config = test_config(PricePolicy::Zero);

        let parsed = unitysystems::parse_listing_page(&html, &config, &SilentProgress);

        assert_eq!(parsed.records.len(), 1);
        for record in &parsed.records {
            assert!(config.price_in_range(record.price));
        }
    }

    #[test]
    fn sale_price_is_preferred_over_standard_price() {
        let html = unity_card(
            r#"<h3 class="wd-entities-title"><a href="https://u.example/p/3">HP Victus</a></h3>"#,
            r#"<span class="woocommerce-Price-amount"><bdi>Rs 300,000.00</bdi></span>
               <ins><span class="woocommerce-Price-amount"><bdi>Rs 250,000.00</bdi></span></ins>"#,
        );
        let config = test_config(PricePolicy::Zero);

        let parsed = unitysystems::parse_listing_page(&html, &config, &SilentProgress);

        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].price, 250_000.0);
    }
}
