// End-to-end coverage of the scrape-side logic that runs without a browser:
// snippet HTML -> listings -> match fraction -> verdict.

use market_probe::extract::{Extracted, listing_from_snippet};
use market_probe::scenario::Verdict;
use market_probe::scoring;

fn snippet(name: &str, price: &str) -> String {
    format!(
        r#"<div data-zone-name="productSnippet">
             <a href="/product--item/1894310">
               <span data-auto="snippet-title">{name}</span>
             </a>
             <span data-auto="snippet-price-current"><span>{price}</span></span>
           </div>"#
    )
}

#[test]
fn scores_a_scraped_result_page() {
    let mut snippets = Vec::new();
    for i in 0..9 {
        snippets.push(snippet(
            &format!("Смартфон POCO X6 PRO 12/512 ГБ, вариант {i}"),
            "24 990 ₽",
        ));
    }
    for i in 0..7 {
        snippets.push(snippet(&format!("Чехол для телефона {i}"), "590 ₽"));
    }

    let listings: Vec<Extracted> = snippets
        .iter()
        .map(|html| listing_from_snippet(html))
        .collect();
    assert_eq!(listings.len(), 16);
    assert!(listings.iter().all(|entry| entry.is_ok()));

    let fraction = scoring::match_fraction(&listings, "poco x6 pro");
    assert_eq!(fraction, 0.5625);
    assert!(scoring::has_any_match(&listings, "POCO"));
    assert!(Verdict::from_fraction(fraction, 0.5).passed());
}

#[test]
fn scraped_prices_come_out_as_integers() {
    let listing = listing_from_snippet(&snippet("Смартфон POCO X6 PRO", "12 990 ₽")).unwrap();
    assert_eq!(listing.price, 12990);
}

#[test]
fn broken_snippets_stay_aligned_and_do_not_score() {
    let snippets = vec![
        snippet("POCO X6 Pro", "12 990 ₽"),
        // price block missing entirely
        r#"<div data-zone-name="productSnippet">
             <span data-auto="snippet-title">POCO X6 Pro</span>
           </div>"#
            .to_string(),
        snippet("Кабель USB-C", "299 ₽"),
    ];

    let listings: Vec<Extracted> = snippets
        .iter()
        .map(|html| listing_from_snippet(html))
        .collect();
    assert_eq!(listings.len(), 3);
    assert!(listings[1].is_err());

    // one match out of the two parsed listings
    let fraction = scoring::match_fraction(&listings, "POCO X6 Pro");
    assert_eq!(fraction, 0.5);
    assert!(!Verdict::from_fraction(fraction, 0.5).passed());
}

#[test]
fn a_page_of_unrelated_listings_fails_the_verdict() {
    let snippets: Vec<String> = (0..16)
        .map(|i| snippet(&format!("Кружка керамическая {i}"), "350 ₽"))
        .collect();

    let listings: Vec<Extracted> = snippets
        .iter()
        .map(|html| listing_from_snippet(html))
        .collect();

    let fraction = scoring::match_fraction(&listings, "POCO X6 PRO");
    assert_eq!(fraction, 0.0);
    assert!(!scoring::has_any_match(&listings, "POCO X6 PRO"));
    assert!(!Verdict::from_fraction(fraction, 0.5).passed());
}
