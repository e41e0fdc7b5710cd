//! Markdown output formatting.

use std::borrow::Cow;

use super::truncation_note;
use crate::models::{CombinedResult, ProjectRecord, PublicationRecord, SearchResult};

/// Abstracts longer than this are cut in Markdown output.
const ABSTRACT_PREVIEW: usize = 1200;

/// Format a page of projects as Markdown.
#[must_use]
pub fn format_projects_markdown(page: &SearchResult<ProjectRecord>) -> String {
    format_projects_with_publications(page, None)
}

/// Format a combined result: each project followed by its linked publications.
#[must_use]
pub fn format_combined_markdown(result: &CombinedResult) -> String {
    format_projects_with_publications(&result.projects, result.publications.as_ref())
}

fn format_projects_with_publications(
    page: &SearchResult<ProjectRecord>,
    publications: Option<&SearchResult<PublicationRecord>>,
) -> String {
    if page.is_empty() {
        return "No projects found.".to_string();
    }

    let mut output = format!(
        "# NIH RePORTER Search Results\n\n**Total matching projects:** {}\n\n",
        page.total_count
    );

    for project in &page.records {
        output.push_str(&format_project_markdown(project));

        if let Some(pubs) = publications {
            let linked: Vec<&PublicationRecord> = project
                .related_publications
                .iter()
                .filter_map(|id| pubs.records.iter().find(|p| &p.id == id))
                .collect();

            if !linked.is_empty() {
                output.push_str("\n#### Related Publications\n");
                for publication in linked {
                    output.push('\n');
                    output.push_str(&format_publication_markdown(publication, "#####"));
                }
            }
        }

        output.push_str("\n---\n\n");
    }

    if let Some(note) = truncation_note(page) {
        output.push_str(&format!("_{note}_\n"));
    }

    output
}

/// Format a single project as Markdown.
#[must_use]
pub fn format_project_markdown(project: &ProjectRecord) -> String {
    let mut output = format!("### {}\n\n", project.title);

    output.push_str(&format!("**Project Number:** `{}`\n", project.id));

    let pis = if project.pi_names.is_empty() { "N/A".to_string() } else { project.pi_names.join(", ") };
    output.push_str(&format!("**Principal Investigator(s):** {pis}\n"));

    output.push_str(&format!(
        "**Organization:** {}\n",
        project.organization.display().as_deref().unwrap_or("N/A")
    ));

    if let Some(year) = project.fiscal_year {
        output.push_str(&format!("**Fiscal Year:** {year}\n"));
    }

    output.push_str(&format!(
        "**Award Amount:** {}\n",
        project.award_amount.map_or_else(|| "N/A".to_string(), format_amount)
    ));

    output.push_str(&format!(
        "**Project Period:** {} to {}\n",
        project.project_start_date.as_deref().unwrap_or("N/A"),
        project.project_end_date.as_deref().unwrap_or("N/A")
    ));

    if let Some(section) = &project.study_section {
        let name = section.name.as_deref().unwrap_or("N/A");
        match &section.srg_code {
            Some(code) => output.push_str(&format!("**Study Section:** {name} ({code})\n")),
            None => output.push_str(&format!("**Study Section:** {name}\n")),
        }
    }

    if let Some(mechanism) = &project.funding_mechanism {
        output.push_str(&format!("**Funding Mechanism:** {mechanism}\n"));
    }

    if let Some(ic) = &project.agency_ic_admin {
        output.push_str(&format!("**Institute/Center:** {ic}\n"));
    }

    if project.is_covid {
        output.push_str(&format!("**COVID-19 Response:** {}\n", project.covid_response.join(", ")));
    }

    if !project.rcdc_terms.is_empty() {
        let terms: Vec<String> = project.rcdc_terms.iter().map(|t| format!("`{t}`")).collect();
        output.push_str(&format!("**RCDC Terms:** {}\n", terms.join(", ")));
    }

    if let Some(url) = &project.project_detail_url {
        output.push_str(&format!("**Details:** [RePORTER]({url})\n"));
    }

    if let Some(abs) = &project.abstract_text {
        output.push_str(&format!("\n#### Abstract\n{}\n", preview(abs)));
    }

    if let Some(phr) = &project.phr_text {
        output.push_str(&format!("\n#### Public Health Relevance\n{}\n", preview(phr)));
    }

    output
}

/// Format a page of publications as Markdown.
#[must_use]
pub fn format_publications_markdown(page: &SearchResult<PublicationRecord>) -> String {
    if page.is_empty() {
        return "No publications found.".to_string();
    }

    let mut output = format!(
        "# NIH RePORTER Publication Results\n\n**Total matching publications:** {}\n\n",
        page.total_count
    );

    for publication in &page.records {
        output.push_str(&format_publication_markdown(publication, "###"));

        if !publication.core_project_nums.is_empty() {
            output.push_str("\n#### Related NIH Projects\n");
            for num in &publication.core_project_nums {
                output.push_str(&format!("- Core Project: `{num}`\n"));
            }
        }

        output.push_str("\n---\n\n");
    }

    if let Some(note) = truncation_note(page) {
        output.push_str(&format!("_{note}_\n"));
    }

    output
}

fn format_publication_markdown(publication: &PublicationRecord, heading: &str) -> String {
    let title = publication.title.as_deref().unwrap_or("Untitled Publication");

    let mut output = match (&publication.pmid, publication.pubmed_url()) {
        (Some(pmid), Some(url)) => format!("{heading} {title} (PMID: [{pmid}]({url}))\n\n"),
        _ => format!("{heading} {title}\n\n"),
    };

    if !publication.authors.is_empty() {
        output.push_str(&format!("**Authors:** {}\n", publication.authors.join(", ")));
    }

    if let Some(journal) = &publication.journal_title {
        output.push_str(&format!("**Journal:** {journal}\n"));
    }

    if let Some(year) = publication.publication_year {
        output.push_str(&format!("**Year:** {year}\n"));
    }

    if let Some(doi) = &publication.doi {
        output.push_str(&format!("**DOI:** [{doi}](https://doi.org/{doi})\n"));
    }

    output
}

fn preview(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(ABSTRACT_PREVIEW) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// `$1,234,567.89`
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}
