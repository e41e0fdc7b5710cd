//! Response normalization: RePORTER result items into stable records.
//!
//! Every record field is resolved through a [`FieldChain`], an ordered list of
//! JSON pointers. The first pointer that yields a non-null, non-empty value
//! wins. Chains are plain data so deployments can follow upstream schema
//! drift without a code change.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    ApiResponse, Domain, Organization, Pagination, ProjectRecord, PublicationRecord, SearchResult,
    StudySection,
};

/// Ordered JSON pointers tried in turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChain(Vec<String>);

impl FieldChain {
    /// Build a chain from JSON pointers (`/a/b`) or bare field names (`a`).
    #[must_use]
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            paths
                .into_iter()
                .map(|p| {
                    let p = p.as_ref().trim();
                    if p.starts_with('/') { p.to_string() } else { format!("/{p}") }
                })
                .filter(|p| p.len() > 1)
                .collect(),
        )
    }

    /// Pointers in priority order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.0
    }

    /// First present, non-empty value.
    #[must_use]
    pub fn resolve<'a>(&self, item: &'a Value) -> Option<&'a Value> {
        self.0.iter().filter_map(|p| item.pointer(p)).find(|v| is_present(v))
    }

    /// Resolve as trimmed text; numbers are rendered.
    #[must_use]
    pub fn text(&self, item: &Value) -> Option<String> {
        self.0.iter().filter_map(|p| item.pointer(p)).find_map(as_text)
    }

    #[must_use]
    pub fn u64(&self, item: &Value) -> Option<u64> {
        self.0.iter().filter_map(|p| item.pointer(p)).find_map(|v| match v {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    #[must_use]
    pub fn i32(&self, item: &Value) -> Option<i32> {
        self.0.iter().filter_map(|p| item.pointer(p)).find_map(|v| match v {
            Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(s) => s.trim().get(..4).and_then(|y| y.parse().ok()),
            _ => None,
        })
    }

    #[must_use]
    pub fn f64(&self, item: &Value) -> Option<f64> {
        self.0.iter().filter_map(|p| item.pointer(p)).find_map(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// Resolve as a list of strings. Accepts an array or a `;`-separated string.
    #[must_use]
    pub fn text_list(&self, item: &Value) -> Vec<String> {
        match self.resolve(item) {
            Some(Value::Array(values)) => values.iter().filter_map(as_text).collect(),
            Some(Value::String(s)) => s
                .split(';')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(a) => !a.is_empty(),
        _ => true,
    }
}

fn as_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Fallback chains for every normalized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackChains {
    pub project_id: FieldChain,
    pub appl_id: FieldChain,
    pub core_project_num: FieldChain,
    pub title: FieldChain,
    pub abstract_text: FieldChain,
    pub phr_text: FieldChain,
    pub principal_investigators: FieldChain,
    /// Name inside one investigator or author object.
    pub person_name: FieldChain,
    pub org_name: FieldChain,
    pub org_city: FieldChain,
    pub org_state: FieldChain,
    pub org_type: FieldChain,
    pub org_department: FieldChain,
    pub award_amount: FieldChain,
    pub fiscal_year: FieldChain,
    pub project_start_date: FieldChain,
    pub project_end_date: FieldChain,
    pub covid_response: FieldChain,
    pub funding_mechanism: FieldChain,
    pub agency_ic_admin: FieldChain,
    pub rcdc_terms: FieldChain,
    pub study_section_name: FieldChain,
    pub study_section_code: FieldChain,
    pub project_detail_url: FieldChain,

    pub pmid: FieldChain,
    pub pub_appl_id: FieldChain,
    pub pub_core_project_num: FieldChain,
    pub pub_title: FieldChain,
    pub authors: FieldChain,
    pub journal_title: FieldChain,
    pub publication_year: FieldChain,
    pub doi: FieldChain,
}

impl FallbackChains {
    /// Replace the abstract chain with comma-separated field names or pointers.
    /// A blank list keeps the current chain.
    #[must_use]
    pub fn with_abstract_fields(mut self, fields: &str) -> Self {
        let chain = FieldChain::new(fields.split(','));
        if !chain.paths().is_empty() {
            self.abstract_text = chain;
        }
        self
    }
}

impl Default for FallbackChains {
    fn default() -> Self {
        Self {
            project_id: FieldChain::new(["project_num", "projectNum"]),
            appl_id: FieldChain::new(["appl_id", "applId"]),
            core_project_num: FieldChain::new(["core_project_num", "coreProjectNum"]),
            title: FieldChain::new(["project_title", "title"]),
            abstract_text: FieldChain::new(["abstract_text", "abstract"]),
            phr_text: FieldChain::new(["phr_text", "phr"]),
            principal_investigators: FieldChain::new(["principal_investigators", "pi_names"]),
            person_name: FieldChain::new(["full_name", "name"]),
            org_name: FieldChain::new(["/organization/org_name", "org_name"]),
            org_city: FieldChain::new(["/organization/org_city", "org_city"]),
            org_state: FieldChain::new(["/organization/org_state", "org_state"]),
            org_type: FieldChain::new(["/organization_type/name", "/organization/org_type"]),
            org_department: FieldChain::new(["/organization/dept_type", "dept_type"]),
            award_amount: FieldChain::new(["award_amount"]),
            fiscal_year: FieldChain::new(["fiscal_year"]),
            project_start_date: FieldChain::new(["project_start_date"]),
            project_end_date: FieldChain::new(["project_end_date"]),
            covid_response: FieldChain::new(["covid_response"]),
            funding_mechanism: FieldChain::new(["funding_mechanism", "activity_code"]),
            agency_ic_admin: FieldChain::new([
                "/agency_ic_admin/abbreviation",
                "/agency_ic_admin/code",
                "agency_ic_admin",
            ]),
            rcdc_terms: FieldChain::new(["spending_categories_desc", "rcdc_terms"]),
            study_section_name: FieldChain::new([
                "/full_study_section/name",
                "/study_section/study_section_name",
            ]),
            study_section_code: FieldChain::new([
                "/full_study_section/srg_code",
                "/study_section/srg_code",
            ]),
            project_detail_url: FieldChain::new(["project_detail_url"]),

            pmid: FieldChain::new(["pmid"]),
            pub_appl_id: FieldChain::new(["applid", "appl_id"]),
            pub_core_project_num: FieldChain::new(["coreproject", "core_project_num"]),
            pub_title: FieldChain::new(["title", "pub_title"]),
            authors: FieldChain::new(["authors", "author_list"]),
            journal_title: FieldChain::new(["journal_title", "journal"]),
            publication_year: FieldChain::new(["publication_year", "pub_year", "pub_date"]),
            doi: FieldChain::new(["doi"]),
        }
    }
}

/// A normalized page for either domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedPage {
    Projects(SearchResult<ProjectRecord>),
    Publications(SearchResult<PublicationRecord>),
}

impl NormalizedPage {
    /// Records on the page.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Projects(p) => p.len(),
            Self::Publications(p) => p.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maps upstream responses into records. Deterministic and order-preserving.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    chains: FallbackChains,
}

impl Normalizer {
    #[must_use]
    pub const fn new(chains: FallbackChains) -> Self {
        Self { chains }
    }

    /// Normalize a response for the given domain.
    #[must_use]
    pub fn normalize(&self, response: &ApiResponse, domain: Domain, page: Pagination) -> NormalizedPage {
        match domain {
            Domain::Projects => NormalizedPage::Projects(self.normalize_projects(response, page)),
            Domain::Publications => NormalizedPage::Publications(self.normalize_publications(response, page)),
        }
    }

    #[must_use]
    pub fn normalize_projects(&self, response: &ApiResponse, page: Pagination) -> SearchResult<ProjectRecord> {
        let records: Vec<ProjectRecord> = response.results.iter().map(|item| self.project(item)).collect();
        let total = total_count(response, page, records.len());
        SearchResult::new(records, total, page.offset(), page.limit())
    }

    #[must_use]
    pub fn normalize_publications(
        &self,
        response: &ApiResponse,
        page: Pagination,
    ) -> SearchResult<PublicationRecord> {
        let records: Vec<PublicationRecord> =
            response.results.iter().map(|item| self.publication(item)).collect();
        let total = total_count(response, page, records.len());
        SearchResult::new(records, total, page.offset(), page.limit())
    }

    /// Map one project item.
    #[must_use]
    pub fn project(&self, item: &Value) -> ProjectRecord {
        let c = &self.chains;
        let covid_response = c.covid_response.text_list(item);
        let appl_id = c.appl_id.u64(item);

        let study_name = c.study_section_name.text(item);
        let study_code = c.study_section_code.text(item);
        let study_section = if study_name.is_some() || study_code.is_some() {
            Some(StudySection { name: study_name, srg_code: study_code })
        } else {
            None
        };

        ProjectRecord {
            id: c
                .project_id
                .text(item)
                .or_else(|| appl_id.map(|a| a.to_string()))
                .unwrap_or_default(),
            appl_id,
            core_project_num: c.core_project_num.text(item),
            title: c.title.text(item).unwrap_or_else(|| "Untitled Project".to_string()),
            abstract_text: c.abstract_text.text(item),
            phr_text: c.phr_text.text(item),
            pi_names: self.people(&c.principal_investigators, item),
            organization: Organization {
                name: c.org_name.text(item),
                city: c.org_city.text(item),
                state: c.org_state.text(item),
                org_type: c.org_type.text(item),
                department: c.org_department.text(item),
            },
            award_amount: c.award_amount.f64(item),
            fiscal_year: c.fiscal_year.i32(item),
            project_start_date: c.project_start_date.text(item).map(|d| date_only(&d)),
            project_end_date: c.project_end_date.text(item).map(|d| date_only(&d)),
            is_covid: !covid_response.is_empty(),
            covid_response,
            funding_mechanism: c.funding_mechanism.text(item),
            agency_ic_admin: c.agency_ic_admin.text(item),
            rcdc_terms: c.rcdc_terms.text_list(item),
            study_section,
            project_detail_url: c.project_detail_url.text(item),
            related_publications: Vec::new(),
        }
    }

    /// Map one publication link item.
    #[must_use]
    pub fn publication(&self, item: &Value) -> PublicationRecord {
        let c = &self.chains;
        let pmid = c.pmid.u64(item);

        PublicationRecord {
            id: pmid.map(|p| p.to_string()).or_else(|| c.pmid.text(item)).unwrap_or_default(),
            pmid,
            appl_ids: c.pub_appl_id.u64(item).into_iter().collect(),
            core_project_nums: c.pub_core_project_num.text(item).into_iter().collect(),
            title: c.pub_title.text(item),
            authors: self.people(&c.authors, item),
            journal_title: c.journal_title.text(item),
            publication_year: c.publication_year.i32(item),
            doi: c.doi.text(item),
        }
    }

    /// Names from an array of strings or person objects.
    fn people(&self, chain: &FieldChain, item: &Value) -> Vec<String> {
        let Some(Value::Array(people)) = chain.resolve(item) else {
            return chain.text_list(item);
        };

        people
            .iter()
            .filter_map(|p| match p {
                Value::Object(_) => self.chains.person_name.text(p).or_else(|| {
                    let first = p.get("first_name").and_then(as_text);
                    let last = p.get("last_name").and_then(as_text);
                    match (first, last) {
                        (Some(f), Some(l)) => Some(format!("{f} {l}")),
                        (f, l) => f.or(l),
                    }
                }),
                other => as_text(other),
            })
            .collect()
    }
}

fn total_count(response: &ApiResponse, page: Pagination, returned: usize) -> u64 {
    response
        .meta
        .total
        .unwrap_or_else(|| u64::from(page.offset()) + returned as u64)
}

/// RePORTER dates come as `2021-07-01T00:00:00`; keep the date part.
fn date_only(raw: &str) -> String {
    raw.split('T').next().unwrap_or(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chain_skips_null_and_blank() {
        let chain = FieldChain::new(["a", "b", "c"]);
        let item = json!({"a": null, "b": "  ", "c": "value"});
        assert_eq!(chain.text(&item).as_deref(), Some("value"));
    }

    #[test]
    fn test_chain_accepts_bare_names_and_pointers() {
        let chain = FieldChain::new(["abstract", "/nested/abstract", " "]);
        assert_eq!(chain.paths(), ["/abstract", "/nested/abstract"]);
    }

    #[test]
    fn test_abstract_override() {
        let chains = FallbackChains::default().with_abstract_fields("summary, abstract_text");
        assert_eq!(chains.abstract_text.paths(), ["/summary", "/abstract_text"]);

        let unchanged = FallbackChains::default().with_abstract_fields(" , ");
        assert_eq!(unchanged.abstract_text, FallbackChains::default().abstract_text);
    }

    #[test]
    fn test_ic_code_from_object_or_string() {
        let n = Normalizer::default();
        let nested = n.project(&json!({"agency_ic_admin": {"code": "CA", "abbreviation": "NCI"}}));
        assert_eq!(nested.agency_ic_admin.as_deref(), Some("NCI"));

        let flat = n.project(&json!({"agency_ic_admin": "NIMH"}));
        assert_eq!(flat.agency_ic_admin.as_deref(), Some("NIMH"));
    }

    #[test]
    fn test_rcdc_terms_from_string() {
        let record = Normalizer::default()
            .project(&json!({"spending_categories_desc": "Cancer; Genetics;  ; Prevention"}));
        assert_eq!(record.rcdc_terms, vec!["Cancer", "Genetics", "Prevention"]);
    }

    #[test]
    fn test_pi_name_from_first_and_last() {
        let record = Normalizer::default().project(&json!({
            "principal_investigators": [
                {"first_name": "Ada", "last_name": "Lovelace"},
                {"full_name": "Grace Hopper"}
            ]
        }));
        assert_eq!(record.pi_names, vec!["Ada Lovelace", "Grace Hopper"]);
    }

    #[test]
    fn test_dates_keep_date_part() {
        let record = Normalizer::default().project(&json!({
            "project_start_date": "2021-07-01T00:00:00",
            "project_end_date": "2026-06-30"
        }));
        assert_eq!(record.project_start_date.as_deref(), Some("2021-07-01"));
        assert_eq!(record.project_end_date.as_deref(), Some("2026-06-30"));
    }

    #[test]
    fn test_total_falls_back_to_returned() {
        let response = ApiResponse { results: vec![json!({}), json!({})], ..Default::default() };
        let page = Normalizer::default().normalize_projects(&response, Pagination::fixed(10, 20));
        assert_eq!(page.total_count, 22);
        assert!(!page.has_more);
    }
}
