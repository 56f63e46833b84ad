//! Job search pipeline, server side
//!
//! Incoming query parameters are turned into a typed [`JobQuery`]
//! (`query`), evaluated either in process or rendered to SQL (`sql`), and
//! the matching records are reshaped for clients (`normalize`).
//!
//! Text is compared in *storage form*: lowercase with every run of
//! whitespace collapsed to a single `_`. Submissions are written in that
//! form and search terms are converted to it before matching.

pub mod normalize;
pub mod query;
pub mod sql;

pub use normalize::{display_form, normalize};
pub use query::{parse_salary_range, JobField, JobFilter, JobQuery, FILTERABLE_PARAMS};

/// Lowercase `input` and replace each run of whitespace with `_`.
pub fn storage_form(input: &str) -> String {
    input
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
