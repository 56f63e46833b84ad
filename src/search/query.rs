//! Query Builder
//!
//! Translates `GET /api/jobs` parameters into a [`JobQuery`]: a conjunction
//! of typed [`JobFilter`]s. Only the parameters in [`FILTERABLE_PARAMS`] are
//! honoured; anything else is ignored. `tags` and the per-field filters are
//! combined with AND like every other filter.

use std::collections::HashMap;

use tracing::debug;

use super::storage_form;
use crate::models::JobRecord;

pub const FILTERABLE_PARAMS: [&str; 6] =
    ["salary", "tags", "companyName", "jobRole", "jobType", "location"];

/// Text fields a filter can look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobField {
    CompanyName,
    JobRole,
    JobType,
    Location,
    Tags,
}

impl JobField {
    /// Every field a keyword (`tags=`) search looks at.
    pub const KEYWORD_FIELDS: [JobField; 5] = [
        JobField::Tags,
        JobField::CompanyName,
        JobField::JobRole,
        JobField::Location,
        JobField::JobType,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            JobField::CompanyName => "company_name",
            JobField::JobRole => "job_role",
            JobField::JobType => "job_type",
            JobField::Location => "location",
            JobField::Tags => "tags",
        }
    }

    fn values<'a>(&self, record: &'a JobRecord) -> Vec<&'a str> {
        match self {
            JobField::CompanyName => vec![record.company_name.as_str()],
            JobField::JobRole => vec![record.job_role.as_str()],
            JobField::JobType => vec![record.job_type.as_str()],
            JobField::Location => vec![record.location.as_str()],
            JobField::Tags => record.tags.iter().map(String::as_str).collect(),
        }
    }

    /// True when any value of this field contains any of `terms`,
    /// ignoring case. Terms are expected in storage form.
    fn contains_any(&self, record: &JobRecord, terms: &[String]) -> bool {
        self.values(record).into_iter().any(|value| {
            let value = value.to_lowercase();
            terms.iter().any(|term| value.contains(term.as_str()))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    /// Inclusive salary bounds.
    SalaryRange { min: i64, max: i64 },
    /// `field` contains at least one of `any_of`.
    FieldContains { field: JobField, any_of: Vec<String> },
    /// Some term appears in some keyword field.
    Keywords { terms: Vec<String> },
}

impl JobFilter {
    pub fn matches(&self, record: &JobRecord) -> bool {
        match self {
            JobFilter::SalaryRange { min, max } => (*min..=*max).contains(&record.salary),
            JobFilter::FieldContains { field, any_of } => field.contains_any(record, any_of),
            JobFilter::Keywords { terms } => JobField::KEYWORD_FIELDS
                .iter()
                .any(|field| field.contains_any(record, terms)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    filters: Vec<JobFilter>,
}

impl JobQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: JobFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Build a query from raw request parameters.
    ///
    /// Malformed salary ranges and empty values add no filter.
    pub fn build(params: &HashMap<String, String>) -> Self {
        let mut query = JobQuery::new();

        for key in params.keys() {
            if !FILTERABLE_PARAMS.contains(&key.as_str()) {
                debug!(param = %key, "Ignoring unsupported job filter");
            }
        }

        if let Some(raw) = params.get("salary") {
            match parse_salary_range(raw) {
                Some((min, max)) => query.filters.push(JobFilter::SalaryRange { min, max }),
                None => debug!(salary = %raw, "Ignoring malformed salary range"),
            }
        }

        if let Some(raw) = params.get("tags") {
            let terms = split_terms(raw);
            if !terms.is_empty() {
                query.filters.push(JobFilter::Keywords { terms });
            }
        }

        let single_term_fields = [
            ("companyName", JobField::CompanyName),
            ("jobRole", JobField::JobRole),
            ("jobType", JobField::JobType),
        ];
        for (param, field) in single_term_fields {
            if let Some(raw) = params.get(param) {
                let term = storage_form(raw);
                if !term.is_empty() {
                    query.filters.push(JobFilter::FieldContains { field, any_of: vec![term] });
                }
            }
        }

        if let Some(raw) = params.get("location") {
            let any_of = split_terms(raw);
            if !any_of.is_empty() {
                query.filters.push(JobFilter::FieldContains { field: JobField::Location, any_of });
            }
        }

        query
    }

    pub fn filters(&self) -> &[JobFilter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// All filters must match; an empty query matches everything.
    pub fn matches(&self, record: &JobRecord) -> bool {
        self.filters.iter().all(|filter| filter.matches(record))
    }
}

/// Parse `"<min>-<max>"`. Returns `None` unless both ends are integers.
pub fn parse_salary_range(raw: &str) -> Option<(i64, i64)> {
    let mut parts = raw.split('-');
    let min = parts.next()?.trim().parse().ok()?;
    let max = parts.next()?.trim().parse().ok()?;
    Some((min, max))
}

fn split_terms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(storage_form)
        .filter(|term| !term.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(job_role: &str, location: &str, salary: i64, tags: &[&str]) -> JobRecord {
        JobRecord {
            id: Uuid::new_v4(),
            company_name: "acme_corp".to_string(),
            job_role: job_role.to_string(),
            job_type: "full_time".to_string(),
            location: location.to_string(),
            salary,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            company_logo: None,
            form_link: "https%3A%2F%2Facme.example%2Fapply".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_keyword_matches_job_role_case_insensitively() {
        let query = JobQuery::build(&params(&[("tags", "ENGINEER")]));
        assert!(query.matches(&record("Software_Engineer", "berlin", 50_000, &[])));
        assert!(!query.matches(&record("accountant", "berlin", 50_000, &["finance"])));
    }

    #[test]
    fn test_keyword_matches_any_term_in_any_field() {
        let query = JobQuery::build(&params(&[("tags", "designer, berlin")]));
        assert!(query.matches(&record("accountant", "berlin", 50_000, &[])));
        assert!(query.matches(&record("graphic_designer", "paris", 50_000, &[])));
        assert!(query.matches(&record("accountant", "paris", 50_000, &["ui_designer"])));
        assert!(!query.matches(&record("accountant", "paris", 50_000, &["tax"])));
    }

    #[test]
    fn test_salary_range_is_inclusive() {
        let query = JobQuery::build(&params(&[("salary", "20000-70000")]));
        assert_eq!(query.filters(), &[JobFilter::SalaryRange { min: 20_000, max: 70_000 }]);
        assert!(query.matches(&record("dev", "remote", 50_000, &[])));
        assert!(query.matches(&record("dev", "remote", 20_000, &[])));
        assert!(query.matches(&record("dev", "remote", 70_000, &[])));
        assert!(!query.matches(&record("dev", "remote", 80_000, &[])));
    }

    #[test]
    fn test_malformed_salary_adds_no_filter() {
        let query = JobQuery::build(&params(&[("salary", "abc-def")]));
        assert!(query.is_empty());
        assert!(query.matches(&record("dev", "remote", 1, &[])));
        assert_eq!(parse_salary_range("5000"), None);
        assert_eq!(parse_salary_range(" 5000 - 9000 "), Some((5_000, 9_000)));
    }

    #[test]
    fn test_location_accepts_any_of_several() {
        let query = JobQuery::build(&params(&[("location", "london, New York")]));
        assert!(query.matches(&record("dev", "new_york", 1, &[])));
        assert!(query.matches(&record("dev", "london", 1, &[])));
        assert!(!query.matches(&record("dev", "tokyo", 1, &[])));
    }

    #[test]
    fn test_fields_combine_with_and() {
        let query = JobQuery::build(&params(&[("jobRole", "developer"), ("location", "remote")]));
        assert!(query.matches(&record("web_developer", "remote", 1, &[])));
        assert!(!query.matches(&record("web_developer", "hybrid", 1, &[])));
        assert!(!query.matches(&record("designer", "remote", 1, &[])));
    }

    #[test]
    fn test_tags_combine_with_other_filters() {
        let query = JobQuery::build(&params(&[("tags", "rust"), ("location", "berlin")]));
        assert_eq!(query.filters().len(), 2);
        assert!(query.matches(&record("dev", "berlin", 1, &["rust"])));
        assert!(!query.matches(&record("dev", "paris", 1, &["rust"])));
    }

    #[test]
    fn test_unknown_and_empty_params_are_ignored() {
        let query = JobQuery::build(&params(&[("__v", "0"), ("jobRole", ""), ("tags", " , ")]));
        assert!(query.is_empty());
    }
}
