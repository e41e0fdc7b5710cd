//! Enumeration types for API and tool parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Structured JSON, the stable shape agents consume.
    #[default]
    Json,
    /// Human-readable Markdown report.
    Markdown,
}

impl ResponseFormat {
    /// Check if this is markdown format.
    #[must_use]
    pub const fn is_markdown(self) -> bool {
        matches!(self, Self::Markdown)
    }
}

/// Search domain served by a RePORTER endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Projects,
    Publications,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Projects => "projects",
            Self::Publications => "publications",
        })
    }
}

/// COVID-19 response funding category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CovidResponse {
    /// Regular appropriations used for COVID-19 research.
    #[serde(rename = "Reg-CV")]
    RegCv,
    /// Coronavirus Preparedness and Response Supplemental Appropriations Act.
    #[serde(rename = "CV")]
    Cv,
    /// CARES Act.
    #[serde(rename = "C3")]
    C3,
    /// Paycheck Protection Program and Health Care Enhancement Act.
    #[serde(rename = "C4")]
    C4,
    /// Coronavirus Response and Relief Supplemental Appropriations Act.
    #[serde(rename = "C5")]
    C5,
    /// American Rescue Plan Act.
    #[serde(rename = "C6")]
    C6,
}

impl CovidResponse {
    /// All categories, in upstream order.
    pub const ALL: [Self; 6] = [Self::RegCv, Self::Cv, Self::C3, Self::C4, Self::C5, Self::C6];

    /// Upstream code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::RegCv => "Reg-CV",
            Self::Cv => "CV",
            Self::C3 => "C3",
            Self::C4 => "C4",
            Self::C5 => "C5",
            Self::C6 => "C6",
        }
    }
}

impl FromStr for CovidResponse {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let codes: Vec<&str> = Self::ALL.iter().map(|c| c.code()).collect();
                format!("unknown category '{wanted}', expected one of {}", codes.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_covid_response_parse_is_case_insensitive() {
        assert_eq!("reg-cv".parse::<CovidResponse>(), Ok(CovidResponse::RegCv));
        assert_eq!(" C4 ".parse::<CovidResponse>(), Ok(CovidResponse::C4));
        assert!("C9".parse::<CovidResponse>().unwrap_err().contains("Reg-CV"));
    }

    #[test]
    fn test_covid_response_serializes_as_code() {
        let json = serde_json::to_value(CovidResponse::RegCv).unwrap();
        assert_eq!(json, "Reg-CV");
    }

    #[test]
    fn test_response_format_default_is_json() {
        assert_eq!(ResponseFormat::default(), ResponseFormat::Json);
        assert!(!ResponseFormat::default().is_markdown());
    }
}
