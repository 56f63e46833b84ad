//! Filter State Aggregator
//!
//! Collects the independently changing search dimensions into one
//! [`FilterState`]. Each update touches a single dimension; selecting the
//! value that is already selected clears it again.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::search::parse_salary_range;

pub const MAX_TAGS: usize = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown filter dimension: {0}")]
    UnknownDimension(String),

    #[error("Invalid salary range {0:?}, expected <min>-<max>")]
    InvalidSalary(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    JobRole,
    Location,
    CompanyName,
    JobType,
    Salary,
    Tags,
}

impl Dimension {
    /// Query parameter name, in encoding order.
    pub const ALL: [Dimension; 6] = [
        Dimension::JobRole,
        Dimension::Location,
        Dimension::CompanyName,
        Dimension::JobType,
        Dimension::Salary,
        Dimension::Tags,
    ];

    pub fn param(&self) -> &'static str {
        match self {
            Dimension::JobRole => "jobRole",
            Dimension::Location => "location",
            Dimension::CompanyName => "companyName",
            Dimension::JobType => "jobType",
            Dimension::Salary => "salary",
            Dimension::Tags => "tags",
        }
    }
}

impl FromStr for Dimension {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|dimension| dimension.param() == s)
            .ok_or_else(|| FilterError::UnknownDimension(s.to_string()))
    }
}

/// Inclusive salary bounds, always `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    min: i64,
    max: i64,
}

impl SalaryRange {
    /// Bounds given in either order are stored ascending.
    pub fn new(a: i64, b: i64) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

impl FromStr for SalaryRange {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_salary_range(s)
            .map(|(min, max)| SalaryRange::new(min, max))
            .ok_or_else(|| FilterError::InvalidSalary(s.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub job_role: Option<String>,
    pub location: Option<String>,
    pub company_name: Option<String>,
    pub job_type: Option<String>,
    pub salary: Option<SalaryRange>,
    pub tags: Vec<String>,
}

impl FilterState {
    pub fn is_empty(&self) -> bool {
        self.job_role.is_none()
            && self.location.is_none()
            && self.company_name.is_none()
            && self.job_type.is_none()
            && self.salary.is_none()
            && self.tags.is_empty()
    }

    fn text_slot(&mut self, dimension: Dimension) -> Option<&mut Option<String>> {
        match dimension {
            Dimension::JobRole => Some(&mut self.job_role),
            Dimension::Location => Some(&mut self.location),
            Dimension::CompanyName => Some(&mut self.company_name),
            Dimension::JobType => Some(&mut self.job_type),
            Dimension::Salary | Dimension::Tags => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FilterAggregator {
    state: FilterState,
}

impl FilterAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> FilterState {
        self.state.clone()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Set one dimension from its textual value. For `tags` the value is
    /// added to the tag list. Returns whether the state changed.
    pub fn set_dimension(&mut self, dimension: Dimension, value: &str) -> Result<bool, FilterError> {
        match dimension {
            Dimension::Salary => {
                let value = value.trim();
                if value.is_empty() {
                    return Ok(self.clear(Dimension::Salary));
                }
                let range = value.parse()?;
                Ok(self.set_salary(range))
            }
            Dimension::Tags => Ok(self.add_tag(value)),
            text => {
                let value = value.trim();
                let Some(slot) = self.state.text_slot(text) else {
                    return Ok(false);
                };
                let next = if value.is_empty() || slot.as_deref() == Some(value) {
                    None
                } else {
                    Some(value.to_string())
                };
                let changed = *slot != next;
                *slot = next;
                Ok(changed)
            }
        }
    }

    /// Select a salary range; selecting the current range clears it.
    pub fn set_salary(&mut self, range: SalaryRange) -> bool {
        if self.state.salary == Some(range) {
            self.state.salary = None;
        } else {
            self.state.salary = Some(range);
        }
        true
    }

    /// Add a keyword. Whitespace runs become `_`. Blank keywords,
    /// duplicates and additions beyond [`MAX_TAGS`] are ignored.
    pub fn add_tag(&mut self, keyword: &str) -> bool {
        let keyword = keyword.split_whitespace().collect::<Vec<_>>().join("_");
        if keyword.is_empty() || self.state.tags.len() >= MAX_TAGS || self.state.tags.contains(&keyword) {
            return false;
        }
        self.state.tags.push(keyword);
        true
    }

    pub fn remove_tag(&mut self, index: usize) -> Option<String> {
        (index < self.state.tags.len()).then(|| self.state.tags.remove(index))
    }

    pub fn clear(&mut self, dimension: Dimension) -> bool {
        match dimension {
            Dimension::Salary => self.state.salary.take().is_some(),
            Dimension::Tags => {
                let changed = !self.state.tags.is_empty();
                self.state.tags.clear();
                changed
            }
            text => self
                .state
                .text_slot(text)
                .map(|slot| slot.take().is_some())
                .unwrap_or(false),
        }
    }

    /// Back to an empty filter, as when the page session ends.
    pub fn reset(&mut self) {
        self.state = FilterState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_one_dimension_preserves_others() {
        let mut filters = FilterAggregator::new();
        assert!(filters.set_dimension(Dimension::JobRole, "software_developer").unwrap());
        assert!(filters.set_dimension(Dimension::Location, "remote").unwrap());
        assert!(filters.set_dimension(Dimension::JobRole, "data_scientist").unwrap());

        let state = filters.current_state();
        assert_eq!(state.job_role.as_deref(), Some("data_scientist"));
        assert_eq!(state.location.as_deref(), Some("remote"));
    }

    #[test]
    fn test_selecting_current_value_deselects() {
        let mut filters = FilterAggregator::new();
        filters.set_dimension(Dimension::JobType, "full_time").unwrap();
        assert!(filters.set_dimension(Dimension::JobType, "full_time").unwrap());
        assert_eq!(filters.state().job_type, None);

        filters.set_dimension(Dimension::Salary, "20000-70000").unwrap();
        filters.set_dimension(Dimension::Salary, "20000-70000").unwrap();
        assert_eq!(filters.state().salary, None);
        assert!(filters.state().is_empty());
    }

    #[test]
    fn test_tags_are_capped_at_five() {
        let mut filters = FilterAggregator::new();
        for tag in ["rust", "go", "new york", "remote", "senior"] {
            assert!(filters.add_tag(tag));
        }
        assert!(!filters.add_tag("python"));
        assert!(!filters.set_dimension(Dimension::Tags, "java").unwrap());
        assert_eq!(filters.state().tags.len(), MAX_TAGS);
        assert_eq!(filters.state().tags[2], "new_york");

        assert_eq!(filters.remove_tag(0).as_deref(), Some("rust"));
        assert_eq!(filters.remove_tag(9), None);
        assert!(filters.add_tag("python"));
    }

    #[test]
    fn test_blank_and_duplicate_tags_are_ignored() {
        let mut filters = FilterAggregator::new();
        assert!(!filters.add_tag("   "));
        assert!(filters.add_tag("rust"));
        assert!(!filters.add_tag(" rust "));
        assert_eq!(filters.state().tags, vec!["rust"]);
    }

    #[test]
    fn test_dimension_names_and_salary_parsing() {
        assert_eq!("companyName".parse::<Dimension>().unwrap(), Dimension::CompanyName);
        assert!(matches!("__v".parse::<Dimension>(), Err(FilterError::UnknownDimension(_))));

        let range: SalaryRange = "70000-20000".parse().unwrap();
        assert_eq!((range.min(), range.max()), (20_000, 70_000));
        assert!("lots-more".parse::<SalaryRange>().is_err());
    }

    #[test]
    fn test_clear_and_reset() {
        let mut filters = FilterAggregator::new();
        filters.set_dimension(Dimension::CompanyName, "acme").unwrap();
        filters.add_tag("rust");
        assert!(filters.clear(Dimension::CompanyName));
        assert!(!filters.clear(Dimension::CompanyName));
        filters.reset();
        assert!(filters.state().is_empty());
    }
}
