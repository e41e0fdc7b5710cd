//! Property-based tests for criteria parsing and request building.

use proptest::prelude::*;
use serde_json::json;

use nih_reporter_mcp::models::{CriteriaInput, ListArg, Pagination, Scalar, SearchResult};
use nih_reporter_mcp::request::{ProjectRequestBuilder, PublicationRequestBuilder, RequestBuilder};

/// Fiscal years inside the accepted window.
fn arb_years() -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(1985i64..2026, 1..6)
}

/// Plain names without commas or quotes.
fn arb_names() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec("[A-Za-z][A-Za-z .]{0,20}[A-Za-z]", 1..4)
}

proptest! {
    /// Comma-separated and array forms yield the same criteria.
    #[test]
    fn list_forms_are_equivalent(years in arb_years(), names in arb_names()) {
        let joined_years = years.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        let as_string = CriteriaInput {
            fiscal_years: Some(ListArg::from(joined_years.as_str())),
            pi_names: Some(ListArg::from(names.join(", ").as_str())),
            ..Default::default()
        };
        let as_array = CriteriaInput {
            fiscal_years: Some(ListArg::Many(years.iter().map(|y| Scalar::Int(*y)).collect())),
            pi_names: Some(ListArg::Many(names.iter().cloned().map(Scalar::Text).collect())),
            ..Default::default()
        };

        prop_assert_eq!(as_string.validate().unwrap(), as_array.validate().unwrap());
    }

    /// Validation never panics on arbitrary text input.
    #[test]
    fn validate_never_panics(
        years in ".{0,30}",
        state in ".{0,5}",
        amount in ".{0,12}",
        date in ".{0,12}",
    ) {
        let input: CriteriaInput = serde_json::from_value(json!({
            "fiscal_years": years,
            "org_state": state,
            "min_amount": amount,
            "start_date": date,
        }))
        .unwrap();
        let _ = input.validate();
    }

    /// Any accepted limit stays within 1..=max.
    #[test]
    fn pagination_bounds(limit in -10i64..10_000, offset in -10i64..20_000) {
        match Pagination::new("limit", Some(&Scalar::Int(limit)), Some(&Scalar::Int(offset)), 10, 500) {
            Ok(page) => {
                prop_assert!((1..=500).contains(&page.limit()));
                prop_assert!(page.offset() <= 14_999);
            }
            Err(e) => {
                let field = e.field().unwrap();
                prop_assert!(field == "limit" || field == "offset");
            }
        }
    }

    /// Both builders accept every valid criteria set.
    #[test]
    fn builders_accept_valid_criteria(years in arb_years(), names in arb_names(), with_pubs in any::<bool>()) {
        let input = CriteriaInput {
            fiscal_years: Some(ListArg::Many(years.iter().map(|y| Scalar::Int(*y)).collect())),
            pi_names: Some(ListArg::Many(names.into_iter().map(Scalar::Text).collect())),
            pmids: with_pubs.then(|| ListArg::from("123")),
            ..Default::default()
        };
        let criteria = input.validate().unwrap();

        let projects = ProjectRequestBuilder::default().build(&criteria, Pagination::default());
        let publications = PublicationRequestBuilder.build(&criteria, Pagination::default());

        prop_assert!(projects.criteria().contains_key("fiscal_years"));
        prop_assert_eq!(publications.criteria().contains_key("pmids"), with_pubs);
        prop_assert!(!publications.criteria().contains_key("fiscal_years"));
    }

    /// `has_more` is exactly `offset + returned < total`.
    #[test]
    fn has_more_matches_counts(returned in 0usize..50, offset in 0u32..1000, total in 0u64..2000) {
        let page = SearchResult::new(vec![(); returned], total, offset, 50);
        prop_assert_eq!(page.has_more, u64::from(offset) + (returned as u64) < total);
    }
}
