use crate::extract::Extracted;

/// Fraction of successfully extracted listings whose name contains the query,
/// case-insensitive. Failed extractions count in neither the numerator nor the
/// denominator; with nothing extracted the fraction is 0.0.
pub fn match_fraction(listings: &[Extracted], query: &str) -> f64 {
    let query = query.to_lowercase();
    let mut parsed = 0usize;
    let mut matched = 0usize;

    for listing in listings.iter().flatten() {
        parsed += 1;
        if listing.name.to_lowercase().contains(&query) {
            matched += 1;
        }
    }

    if parsed == 0 {
        return 0.0;
    }
    matched as f64 / parsed as f64
}

/// True if at least one successfully extracted listing matches the query.
pub fn has_any_match(listings: &[Extracted], query: &str) -> bool {
    let query = query.to_lowercase();
    listings
        .iter()
        .flatten()
        .any(|listing| listing.name.to_lowercase().contains(&query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;
    use crate::models::Listing;

    fn ok(name: &str) -> Extracted {
        Ok(Listing {
            name: name.to_string(),
            price: 1000,
            shop_name: None,
        })
    }

    fn failed() -> Extracted {
        Err(ExtractError::MissingPrice)
    }

    #[test]
    fn fraction_stays_within_unit_interval() {
        let listings = vec![ok("POCO X6 Pro"), ok("Widget"), failed()];
        for query in ["poco", "widget", "", "nothing matches this"] {
            let fraction = match_fraction(&listings, query);
            assert!((0.0..=1.0).contains(&fraction), "query {query:?}");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        let listings = vec![ok("POCO X6 Pro")];
        assert_eq!(match_fraction(&listings, "poco x6 pro"), 1.0);
    }

    #[test]
    fn no_match_scores_zero() {
        let listings = vec![ok("Widget")];
        assert_eq!(match_fraction(&listings, "POCO"), 0.0);
    }

    #[test]
    fn nine_of_sixteen_scores_0_5625() {
        let mut listings: Vec<Extracted> = (0..9)
            .map(|i| ok(&format!("Смартфон POCO X6 PRO вариант {i}")))
            .collect();
        listings.extend((0..7).map(|i| ok(&format!("Чехол {i}"))));

        assert_eq!(match_fraction(&listings, "POCO X6 PRO"), 0.5625);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(match_fraction(&[], "POCO"), 0.0);
    }

    #[test]
    fn failed_extractions_leave_the_denominator() {
        // 1 match out of 2 parsed listings; the broken snippet changes nothing
        let listings = vec![ok("POCO X6 Pro"), ok("Widget"), failed()];
        assert_eq!(match_fraction(&listings, "poco"), 0.5);
    }

    #[test]
    fn all_failed_scores_zero() {
        let listings = vec![failed(), failed()];
        assert_eq!(match_fraction(&listings, "POCO"), 0.0);
        assert!(!has_any_match(&listings, "POCO"));
    }

    #[test]
    fn empty_query_matches_everything_parsed() {
        let listings = vec![ok("POCO X6 Pro"), ok("Widget")];
        assert_eq!(match_fraction(&listings, ""), 1.0);
    }

    #[test]
    fn any_match_ignores_failures_and_case() {
        let listings = vec![failed(), ok("Смартфон POCO X6 Pro")];
        assert!(has_any_match(&listings, "poco"));
        assert!(!has_any_match(&listings, "pixel"));
    }
}
