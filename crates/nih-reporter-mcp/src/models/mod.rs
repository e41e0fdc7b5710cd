//! Data models: search criteria, tool inputs, upstream envelope, and
//! normalized records.
//!
//! Records never omit optional fields; missing values serialize as `null`
//! or an empty list so callers see a stable shape.

mod criteria;
mod enums;
mod inputs;
mod project;
mod publication;
mod search;

pub use criteria::{AmountRange, CriteriaInput, DateRange, ListArg, Pagination, Scalar, SearchCriteria};
pub use enums::{CovidResponse, Domain, ResponseFormat};
pub use inputs::*;
pub use project::{Organization, ProjectRecord, StudySection};
pub use publication::PublicationRecord;
pub use search::{ApiMeta, ApiResponse, CombinedResult, SearchResult};
