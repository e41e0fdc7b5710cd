//! Search criteria: loosely typed tool arguments in, validated filters out.
//!
//! [`CriteriaInput`] mirrors what agents actually send (comma-separated
//! strings, arrays, numbers as strings). [`CriteriaInput::validate`] turns it
//! into a [`SearchCriteria`], rejecting bad input with the offending field named.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::CovidResponse;
use crate::config::limits;
use crate::error::{ToolError, ToolResult};

/// A scalar argument value as sent by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, expecting = "expected a number or a string")]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Text form with surrounding quotes stripped.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => clean(s),
        }
    }

    /// Numeric value, parsing text if needed.
    pub fn to_f64(&self, field: &str) -> ToolResult<f64> {
        let value = match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(n) => *n as f64,
            Self::Float(f) => *f,
            Self::Text(s) => clean(s)
                .parse::<f64>()
                .map_err(|_| ToolError::validation(field, format!("'{s}' is not a number")))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ToolError::validation(field, "must be a finite number"))
        }
    }

    /// Integer value, parsing text if needed.
    pub fn to_i64(&self, field: &str) -> ToolResult<i64> {
        match self {
            Self::Int(n) => Ok(*n),
            #[allow(clippy::float_cmp)]
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
            Self::Float(f) => Err(ToolError::validation(field, format!("{f} is not a whole number"))),
            Self::Text(s) => clean(s)
                .parse::<i64>()
                .map_err(|_| ToolError::validation(field, format!("'{s}' is not a whole number"))),
        }
    }
}

/// A list argument: either a JSON array or a comma-separated string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, expecting = "expected an array or a comma-separated string")]
pub enum ListArg {
    Many(Vec<Scalar>),
    One(Scalar),
}

impl ListArg {
    /// Flattened, cleaned, non-empty entries.
    #[must_use]
    pub fn items(&self) -> Vec<String> {
        let scalars: &[Scalar] = match self {
            Self::Many(v) => v,
            Self::One(s) => std::slice::from_ref(s),
        };

        scalars
            .iter()
            .flat_map(|s| match s {
                Scalar::Text(text) => text.split(',').map(clean).collect::<Vec<_>>(),
                other => vec![other.to_text()],
            })
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl From<&str> for ListArg {
    fn from(s: &str) -> Self {
        Self::One(Scalar::Text(s.to_string()))
    }
}

/// Strip whitespace plus stray and escaped quotes agents wrap values in.
fn clean(s: &str) -> String {
    s.replace("\\\"", "")
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

/// Raw search filters as received from a tool call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaInput {
    /// Fiscal years, e.g. "2022,2023" or [2022, 2023].
    #[serde(default)]
    pub fiscal_years: Option<ListArg>,

    /// Principal investigator names.
    #[serde(default)]
    pub pi_names: Option<ListArg>,

    #[serde(default, alias = "org_names")]
    pub organization: Option<ListArg>,

    /// Two-letter state codes.
    #[serde(default, alias = "org_states")]
    pub org_state: Option<ListArg>,

    #[serde(default, alias = "org_cities")]
    pub org_city: Option<ListArg>,

    #[serde(default, alias = "org_types")]
    pub org_type: Option<ListArg>,

    #[serde(default, alias = "org_departments")]
    pub org_department: Option<ListArg>,

    #[serde(default)]
    pub min_amount: Option<Scalar>,

    #[serde(default)]
    pub max_amount: Option<Scalar>,

    /// COVID-19 response categories.
    #[serde(default)]
    pub covid_response: Option<ListArg>,

    /// Activity code, e.g. "R01".
    #[serde(default)]
    pub funding_mechanism: Option<String>,

    /// Institute/Center codes, e.g. "NCI".
    #[serde(default, alias = "ic_codes")]
    pub ic_code: Option<ListArg>,

    #[serde(default)]
    pub rcdc_terms: Option<ListArg>,

    /// YYYY-MM-DD
    #[serde(default)]
    pub start_date: Option<String>,

    /// YYYY-MM-DD
    #[serde(default)]
    pub end_date: Option<String>,

    /// Free-text terms searched in titles, terms, and abstracts.
    #[serde(default, alias = "terms", alias = "query")]
    pub text_search: Option<String>,

    /// Project numbers; core project numbers for publication search.
    #[serde(default, alias = "core_project_nums")]
    pub project_nums: Option<ListArg>,

    /// PubMed IDs.
    #[serde(default)]
    pub pmids: Option<ListArg>,

    #[serde(default)]
    pub publication_years: Option<ListArg>,

    #[serde(default)]
    pub newly_added_only: bool,
}

impl CriteriaInput {
    /// Validate into a typed criteria set.
    pub fn validate(&self) -> ToolResult<SearchCriteria> {
        let min_amount = self.min_amount.as_ref().map(|s| s.to_f64("min_amount")).transpose()?;
        let max_amount = self.max_amount.as_ref().map(|s| s.to_f64("max_amount")).transpose()?;

        let start = self.start_date.as_deref().map(|s| parse_date("start_date", s)).transpose()?;
        let end = self.end_date.as_deref().map(|s| parse_date("end_date", s)).transpose()?;

        let covid_response = list(&self.covid_response, "covid_response")?
            .iter()
            .map(|c| {
                c.parse::<CovidResponse>()
                    .map_err(|message| ToolError::validation("covid_response", message))
            })
            .collect::<ToolResult<Vec<_>>>()?;

        let org_states = list(&self.org_state, "org_state")?
            .into_iter()
            .map(|s| {
                if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
                    Ok(s.to_ascii_uppercase())
                } else {
                    Err(ToolError::validation("org_state", format!("'{s}' is not a two-letter state code")))
                }
            })
            .collect::<ToolResult<Vec<_>>>()?;

        let ic_codes = list(&self.ic_code, "ic_code")?
            .into_iter()
            .map(|s| {
                if s.chars().all(|c| c.is_ascii_alphanumeric()) {
                    Ok(s.to_ascii_uppercase())
                } else {
                    Err(ToolError::validation("ic_code", format!("'{s}' is not an IC code")))
                }
            })
            .collect::<ToolResult<Vec<_>>>()?;

        let pmids = list(&self.pmids, "pmids")?
            .iter()
            .map(|p| {
                p.parse::<u64>()
                    .map_err(|_| ToolError::validation("pmids", format!("'{p}' is not a PubMed ID")))
            })
            .collect::<ToolResult<Vec<_>>>()?;

        Ok(SearchCriteria {
            fiscal_years: years(&self.fiscal_years, "fiscal_years")?,
            pi_names: list(&self.pi_names, "pi_names")?,
            org_names: list(&self.organization, "organization")?,
            org_states,
            org_cities: list(&self.org_city, "org_city")?,
            org_types: list(&self.org_type, "org_type")?,
            org_departments: list(&self.org_department, "org_department")?,
            award_amount: AmountRange::new(min_amount, max_amount)?,
            covid_response,
            funding_mechanism: non_blank(self.funding_mechanism.as_deref()),
            ic_codes,
            rcdc_terms: list(&self.rcdc_terms, "rcdc_terms")?,
            date_range: DateRange::new(start, end)?,
            text_search: non_blank(self.text_search.as_deref()),
            project_nums: list(&self.project_nums, "project_nums")?
                .into_iter()
                .map(|p| p.to_ascii_uppercase())
                .collect(),
            pmids,
            publication_years: years(&self.publication_years, "publication_years")?,
            newly_added_only: self.newly_added_only,
        })
    }
}

/// Entries of a list argument; a supplied argument with no usable entry is an error.
fn list(arg: &Option<ListArg>, field: &str) -> ToolResult<Vec<String>> {
    match arg {
        None => Ok(Vec::new()),
        Some(arg) => {
            let items = arg.items();
            if items.is_empty() {
                Err(ToolError::validation(field, "no values found after parsing"))
            } else {
                Ok(items)
            }
        }
    }
}

fn years(arg: &Option<ListArg>, field: &str) -> ToolResult<Vec<i32>> {
    let max_year = Utc::now().year() + 2;
    list(arg, field)?
        .iter()
        .map(|y| {
            let year: i32 = y.parse().map_err(|_| {
                ToolError::validation(field, format!("'{y}' is not a year; use e.g. 2020,2021"))
            })?;
            if (limits::MIN_FISCAL_YEAR..=max_year).contains(&year) {
                Ok(year)
            } else {
                Err(ToolError::validation(
                    field,
                    format!("{year} is outside {}..={max_year}", limits::MIN_FISCAL_YEAR),
                ))
            }
        })
        .collect()
}

fn parse_date(field: &str, raw: &str) -> ToolResult<NaiveDate> {
    let cleaned = clean(raw);
    NaiveDate::parse_from_str(&cleaned, "%Y-%m-%d")
        .map_err(|_| ToolError::validation(field, format!("'{raw}' is not a YYYY-MM-DD date")))
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(clean).filter(|s| !s.is_empty())
}

/// Award amount bounds; `min <= max` when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AmountRange {
    min: Option<f64>,
    max: Option<f64>,
}

impl AmountRange {
    /// Create a range, rejecting negative or inverted bounds.
    pub fn new(min: Option<f64>, max: Option<f64>) -> ToolResult<Self> {
        if min.is_some_and(|m| m < 0.0) {
            return Err(ToolError::validation("min_amount", "must not be negative"));
        }
        if max.is_some_and(|m| m < 0.0) {
            return Err(ToolError::validation("max_amount", "must not be negative"));
        }
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                return Err(ToolError::validation(
                    "min_amount",
                    format!("min_amount {lo} is greater than max_amount {hi}"),
                ));
            }
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn min(&self) -> Option<f64> {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Option<f64> {
        self.max
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Project date window; `start <= end` when both are set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> ToolResult<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(ToolError::validation(
                    "start_date",
                    format!("start_date {s} is after end_date {e}"),
                ));
            }
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// Validated search filters shared by both search domains.
///
/// Every field is optional; the default value means an unfiltered search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchCriteria {
    pub fiscal_years: Vec<i32>,
    pub pi_names: Vec<String>,
    pub org_names: Vec<String>,
    pub org_states: Vec<String>,
    pub org_cities: Vec<String>,
    pub org_types: Vec<String>,
    pub org_departments: Vec<String>,
    pub award_amount: AmountRange,
    pub covid_response: Vec<CovidResponse>,
    pub funding_mechanism: Option<String>,
    pub ic_codes: Vec<String>,
    pub rcdc_terms: Vec<String>,
    pub date_range: DateRange,
    pub text_search: Option<String>,
    pub project_nums: Vec<String>,
    pub pmids: Vec<u64>,
    pub publication_years: Vec<i32>,
    pub newly_added_only: bool,
}

impl SearchCriteria {
    /// True when no filter is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// True when a publication-domain selector (PMIDs or project numbers) is set.
    #[must_use]
    pub fn has_publication_selectors(&self) -> bool {
        !self.pmids.is_empty() || !self.project_nums.is_empty()
    }

    /// One-line summary of the set filters, for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        let mut push_list = |name: &str, values: Vec<String>| {
            if !values.is_empty() {
                parts.push(format!("{name}=[{}]", values.join(",")));
            }
        };
        push_list("fiscal_years", self.fiscal_years.iter().map(ToString::to_string).collect());
        push_list("pi_names", self.pi_names.clone());
        push_list("org_names", self.org_names.clone());
        push_list("org_states", self.org_states.clone());
        push_list("org_cities", self.org_cities.clone());
        push_list("org_types", self.org_types.clone());
        push_list("org_departments", self.org_departments.clone());
        push_list("covid_response", self.covid_response.iter().map(|c| c.code().to_string()).collect());
        push_list("ic_codes", self.ic_codes.clone());
        push_list("rcdc_terms", self.rcdc_terms.clone());
        push_list("project_nums", self.project_nums.clone());
        push_list("pmids", self.pmids.iter().map(ToString::to_string).collect());
        push_list("publication_years", self.publication_years.iter().map(ToString::to_string).collect());

        if self.award_amount.is_set() {
            parts.push(format!("award_amount={:?}..{:?}", self.award_amount.min, self.award_amount.max));
        }
        if self.date_range.is_set() {
            parts.push(format!("dates={:?}..{:?}", self.date_range.start, self.date_range.end));
        }
        if let Some(m) = &self.funding_mechanism {
            parts.push(format!("funding_mechanism={m}"));
        }
        if let Some(t) = &self.text_search {
            parts.push(format!("text={t:?}"));
        }
        if self.newly_added_only {
            parts.push("newly_added_only".to_string());
        }

        if parts.is_empty() { "unfiltered".to_string() } else { parts.join(" ") }
    }
}

/// Page bounds for a single search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    limit: u32,
    offset: u32,
}

impl Pagination {
    /// Validate caller paging. Limits above `max` are clamped; zero or negative is rejected.
    ///
    /// `limit_field` is the argument name reported on a bad limit, since tools
    /// expose more than one (`limit`, `publication_limit`).
    pub fn new(
        limit_field: &str,
        limit: Option<&Scalar>,
        offset: Option<&Scalar>,
        default_limit: u32,
        max_limit: u32,
    ) -> ToolResult<Self> {
        let limit = match limit {
            None => default_limit,
            Some(raw) => {
                let requested = raw.to_i64(limit_field)?;
                if requested < 1 {
                    return Err(ToolError::validation(limit_field, "must be at least 1"));
                }
                if requested > i64::from(max_limit) {
                    tracing::warn!(field = limit_field, requested, max_limit, "Clamping limit to maximum");
                    max_limit
                } else {
                    requested as u32
                }
            }
        };

        let offset = match offset {
            None => 0,
            Some(raw) => {
                let requested = raw.to_i64("offset")?;
                if !(0..=i64::from(limits::MAX_OFFSET)).contains(&requested) {
                    return Err(ToolError::validation(
                        "offset",
                        format!("must be between 0 and {}", limits::MAX_OFFSET),
                    ));
                }
                requested as u32
            }
        };

        Ok(Self { limit, offset })
    }

    /// Fixed paging, used internally (e.g. the connection probe).
    #[must_use]
    pub const fn fixed(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.offset
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::fixed(limits::DEFAULT_LIMIT, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_arg_strips_quotes_and_blanks() {
        let arg = ListArg::from("\\\"2022\\\", \"2023\",, ");
        assert_eq!(arg.items(), vec!["2022", "2023"]);
    }

    #[test]
    fn test_list_arg_accepts_numbers() {
        let arg = ListArg::Many(vec![Scalar::Int(2021), Scalar::Text("2022".into())]);
        assert_eq!(arg.items(), vec!["2021", "2022"]);
    }

    #[test]
    fn test_empty_input_is_unfiltered() {
        let criteria = CriteriaInput::default().validate().unwrap();
        assert!(criteria.is_empty());
        assert_eq!(criteria.summary(), "unfiltered");
    }

    #[test]
    fn test_pagination_defaults_and_clamps() {
        let page = Pagination::new("limit", None, None, 10, 500).unwrap();
        assert_eq!((page.limit(), page.offset()), (10, 0));

        let page = Pagination::new("limit", Some(&Scalar::Int(9000)), None, 10, 500).unwrap();
        assert_eq!(page.limit(), 500);

        let err = Pagination::new("limit", Some(&Scalar::Int(0)), None, 10, 500).unwrap_err();
        assert_eq!(err.field(), Some("limit"));

        let err = Pagination::new("publication_limit", Some(&Scalar::Text("many".into())), None, 100, 500)
            .unwrap_err();
        assert_eq!(err.field(), Some("publication_limit"));

        let err = Pagination::new("limit", None, Some(&Scalar::Int(-1)), 10, 500).unwrap_err();
        assert_eq!(err.field(), Some("offset"));
    }

    #[test]
    fn test_amount_range_rejects_negative() {
        assert!(AmountRange::new(Some(-1.0), None).is_err());
        assert!(AmountRange::new(None, Some(-5.0)).is_err());
        assert!(AmountRange::new(Some(10.0), Some(10.0)).is_ok());
    }
}
