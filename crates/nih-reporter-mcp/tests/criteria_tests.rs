//! Tests for criteria parsing and validation.

use chrono::{Datelike, NaiveDate, Utc};
use serde_json::json;

use nih_reporter_mcp::models::{CovidResponse, CriteriaInput, SearchCriteria};

fn criteria(value: serde_json::Value) -> SearchCriteria {
    serde_json::from_value::<CriteriaInput>(value).unwrap().validate().unwrap()
}

fn invalid_field(value: serde_json::Value) -> String {
    serde_json::from_value::<CriteriaInput>(value)
        .unwrap()
        .validate()
        .unwrap_err()
        .field()
        .unwrap()
        .to_string()
}

// =============================================================================
// List arguments
// =============================================================================

#[test]
fn test_comma_string_and_array_are_equal() {
    let from_string = criteria(json!({"fiscal_years": "2022, 2023", "pi_names": "Jane Doe,John Roe"}));
    let from_array = criteria(json!({"fiscal_years": [2022, 2023], "pi_names": ["Jane Doe", "John Roe"]}));
    assert_eq!(from_string, from_array);
    assert_eq!(from_string.fiscal_years, vec![2022, 2023]);
}

#[test]
fn test_escaped_quotes_are_stripped() {
    let c = criteria(json!({"fiscal_years": "\\\"2021\\\",\\\"2022\\\"", "organization": "\"JOHNS HOPKINS UNIVERSITY\""}));
    assert_eq!(c.fiscal_years, vec![2021, 2022]);
    assert_eq!(c.org_names, vec!["JOHNS HOPKINS UNIVERSITY"]);
}

#[test]
fn test_single_value_list() {
    let c = criteria(json!({"fiscal_years": 2024}));
    assert_eq!(c.fiscal_years, vec![2024]);
}

#[test]
fn test_plural_aliases() {
    let c = criteria(json!({
        "org_names": ["MIT"],
        "org_states": "ma",
        "ic_codes": "nci,nimh",
        "core_project_nums": "r01ca000001"
    }));
    assert_eq!(c.org_names, vec!["MIT"]);
    assert_eq!(c.org_states, vec!["MA"]);
    assert_eq!(c.ic_codes, vec!["NCI", "NIMH"]);
    assert_eq!(c.project_nums, vec!["R01CA000001"]);
}

#[test]
fn test_blank_list_is_rejected() {
    assert_eq!(invalid_field(json!({"pi_names": " , ,"})), "pi_names");
}

// =============================================================================
// Field validation
// =============================================================================

#[test]
fn test_fiscal_year_bounds() {
    let next_year = Utc::now().year() + 1;
    assert_eq!(criteria(json!({"fiscal_years": [1985, next_year]})).fiscal_years, vec![1985, next_year]);

    assert_eq!(invalid_field(json!({"fiscal_years": "1984"})), "fiscal_years");
    assert_eq!(invalid_field(json!({"fiscal_years": "3000"})), "fiscal_years");
    assert_eq!(invalid_field(json!({"fiscal_years": "2020-2021"})), "fiscal_years");
}

#[test]
fn test_state_codes() {
    assert_eq!(invalid_field(json!({"org_state": "California"})), "org_state");
    assert_eq!(invalid_field(json!({"org_state": "C1"})), "org_state");
}

#[test]
fn test_ic_codes_reject_punctuation() {
    assert_eq!(invalid_field(json!({"ic_code": "NCI;DROP"})), "ic_code");
}

#[test]
fn test_pmids_must_be_numeric() {
    assert_eq!(criteria(json!({"pmids": "33298401, 34567890"})).pmids, vec![33_298_401, 34_567_890]);
    assert_eq!(invalid_field(json!({"pmids": "PMC123"})), "pmids");
}

#[test]
fn test_covid_response_codes() {
    let c = criteria(json!({"covid_response": "reg-cv, C4"}));
    assert_eq!(c.covid_response, vec![CovidResponse::RegCv, CovidResponse::C4]);
    assert_eq!(invalid_field(json!({"covid_response": "C9"})), "covid_response");
}

#[test]
fn test_amount_range() {
    let c = criteria(json!({"min_amount": "100000", "max_amount": 500000.5}));
    assert_eq!(c.award_amount.min(), Some(100_000.0));
    assert_eq!(c.award_amount.max(), Some(500_000.5));

    assert_eq!(invalid_field(json!({"min_amount": 10, "max_amount": 5})), "min_amount");
    assert_eq!(invalid_field(json!({"max_amount": -1})), "max_amount");
    assert_eq!(invalid_field(json!({"min_amount": "lots"})), "min_amount");
}

#[test]
fn test_date_range() {
    let c = criteria(json!({"start_date": "2020-01-01", "end_date": "2024-12-31"}));
    assert_eq!(c.date_range.start(), NaiveDate::from_ymd_opt(2020, 1, 1));
    assert_eq!(c.date_range.end(), NaiveDate::from_ymd_opt(2024, 12, 31));

    assert_eq!(invalid_field(json!({"start_date": "2024-12-31", "end_date": "2020-01-01"})), "start_date");
    assert_eq!(invalid_field(json!({"end_date": "12/31/2024"})), "end_date");
}

#[test]
fn test_partial_date_range_is_valid() {
    let c = criteria(json!({"end_date": "2024-12-31"}));
    assert!(c.date_range.start().is_none());
    assert!(c.date_range.is_set());
}

#[test]
fn test_text_search_aliases() {
    assert_eq!(criteria(json!({"terms": " CRISPR "})).text_search.as_deref(), Some("CRISPR"));
    assert_eq!(criteria(json!({"query": "sickle cell"})).text_search.as_deref(), Some("sickle cell"));
    assert!(criteria(json!({"text_search": "   "})).text_search.is_none());
}

// =============================================================================
// Summary and selectors
// =============================================================================

#[test]
fn test_summary_lists_set_filters() {
    let c = criteria(json!({"fiscal_years": "2023", "org_state": "CA", "newly_added_only": true}));
    let summary = c.summary();
    assert!(summary.contains("fiscal_years=[2023]"));
    assert!(summary.contains("org_states=[CA]"));
    assert!(summary.contains("newly_added_only"));
}

#[test]
fn test_publication_selectors() {
    assert!(!criteria(json!({"fiscal_years": "2023"})).has_publication_selectors());
    assert!(criteria(json!({"pmids": "1"})).has_publication_selectors());
    assert!(criteria(json!({"project_nums": "R01CA000001"})).has_publication_selectors());
}
