//! Request builders: validated criteria in, RePORTER request body out.
//!
//! Each search domain has its own builder that knows the upstream field names.
//! A criterion with no equivalent in a domain is skipped, so one
//! [`SearchCriteria`] can feed both builders in a combined search.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::{api, fields};
use crate::models::{Domain, Pagination, SearchCriteria};

/// Upstream field projects are sorted by.
pub const PROJECT_SORT_FIELD: &str = "project_start_date";

/// Newest projects first.
pub const PROJECT_SORT_ORDER: &str = "desc";

/// Fields searched by free-text terms.
pub const TEXT_SEARCH_FIELDS: &str = "projecttitle,terms,abstracttext";

/// A finished request body for one search call. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    #[serde(skip)]
    domain: Domain,

    criteria: Map<String, Value>,

    limit: u32,

    offset: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    sort_field: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<&'static str>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    include_fields: Vec<&'static str>,
}

impl SearchRequest {
    #[must_use]
    pub const fn domain(&self) -> Domain {
        self.domain
    }

    /// Endpoint path for this request's domain.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self.domain {
            Domain::Projects => api::PROJECTS_PATH,
            Domain::Publications => api::PUBLICATIONS_PATH,
        }
    }

    /// The `criteria` object sent upstream.
    #[must_use]
    pub const fn criteria(&self) -> &Map<String, Value> {
        &self.criteria
    }

    #[must_use]
    pub fn include_fields(&self) -> &[&'static str] {
        &self.include_fields
    }

    /// Full JSON body.
    #[must_use]
    pub fn body(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({}))
    }
}

/// Builds a domain-specific [`SearchRequest`].
pub trait RequestBuilder: Send + Sync {
    /// Domain served.
    fn domain(&self) -> Domain;

    /// Build the request. Never fails: unsupported criteria are ignored.
    fn build(&self, criteria: &SearchCriteria, page: Pagination) -> SearchRequest;
}

/// Builder for `POST /projects/search`.
#[derive(Debug, Clone, Copy)]
pub struct ProjectRequestBuilder {
    /// Request abstract and PHR text.
    pub include_abstracts: bool,
}

impl Default for ProjectRequestBuilder {
    fn default() -> Self {
        Self { include_abstracts: true }
    }
}

impl RequestBuilder for ProjectRequestBuilder {
    fn domain(&self) -> Domain {
        Domain::Projects
    }

    fn build(&self, c: &SearchCriteria, page: Pagination) -> SearchRequest {
        let mut criteria = Map::new();

        put_list(&mut criteria, "fiscal_years", &c.fiscal_years);
        if !c.pi_names.is_empty() {
            let names: Vec<Value> = c.pi_names.iter().map(|n| json!({ "any_name": n })).collect();
            criteria.insert("pi_names".into(), Value::Array(names));
        }
        put_list(&mut criteria, "org_names", &c.org_names);
        put_list(&mut criteria, "org_states", &c.org_states);
        put_list(&mut criteria, "org_cities", &c.org_cities);
        put_list(&mut criteria, "org_types", &c.org_types);
        put_list(&mut criteria, "dept_types", &c.org_departments);

        if c.award_amount.is_set() {
            let mut range = Map::new();
            range.insert("min_amount".into(), json!(c.award_amount.min().unwrap_or(0.0)));
            if let Some(max) = c.award_amount.max() {
                range.insert("max_amount".into(), json!(max));
            }
            criteria.insert("award_amount_range".into(), Value::Object(range));
        }

        let covid: Vec<&str> = c.covid_response.iter().map(|r| r.code()).collect();
        put_list(&mut criteria, "covid_response", &covid);

        if let Some(mechanism) = &c.funding_mechanism {
            criteria.insert("activity_codes".into(), json!([mechanism]));
        }
        put_list(&mut criteria, "agencies", &c.ic_codes);
        put_list(&mut criteria, "rcdc_terms", &c.rcdc_terms);

        if let Some(start) = c.date_range.start() {
            criteria.insert(
                "project_start_date".into(),
                json!({ "from_date": start.format("%Y-%m-%d").to_string() }),
            );
        }
        if let Some(end) = c.date_range.end() {
            criteria.insert(
                "project_end_date".into(),
                json!({ "to_date": end.format("%Y-%m-%d").to_string() }),
            );
        }

        if let Some(text) = &c.text_search {
            criteria.insert(
                "advanced_text_search".into(),
                json!({
                    "operator": "and",
                    "search_field": TEXT_SEARCH_FIELDS,
                    "search_text": text,
                }),
            );
        }

        put_list(&mut criteria, "project_nums", &c.project_nums);

        if c.newly_added_only {
            criteria.insert("newly_added_projects_only".into(), json!(true));
        }

        let mut include_fields = fields::PROJECT.to_vec();
        if self.include_abstracts {
            include_fields.extend_from_slice(fields::ABSTRACTS);
        }

        SearchRequest {
            domain: Domain::Projects,
            criteria,
            limit: page.limit(),
            offset: page.offset(),
            sort_field: Some(PROJECT_SORT_FIELD),
            sort_order: Some(PROJECT_SORT_ORDER),
            include_fields,
        }
    }
}

/// Builder for `POST /publications/search`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicationRequestBuilder;

impl RequestBuilder for PublicationRequestBuilder {
    fn domain(&self) -> Domain {
        Domain::Publications
    }

    fn build(&self, c: &SearchCriteria, page: Pagination) -> SearchRequest {
        let mut criteria = Map::new();

        put_list(&mut criteria, "pmids", &c.pmids);
        put_list(&mut criteria, "core_project_nums", &c.project_nums);
        put_list(&mut criteria, "publication_years", &c.publication_years);

        SearchRequest {
            domain: Domain::Publications,
            criteria,
            limit: page.limit(),
            offset: page.offset(),
            sort_field: None,
            sort_order: None,
            include_fields: Vec::new(),
        }
    }
}

fn put_list<T: Serialize>(criteria: &mut Map<String, Value>, key: &str, values: &[T]) {
    if !values.is_empty() {
        criteria.insert(key.to_string(), json!(values));
    }
}
