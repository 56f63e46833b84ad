//! Result Normalizer: stored records to client-facing listings.

use std::borrow::Cow;

use crate::models::{JobListing, JobRecord};

/// `"full_stack_developer"` -> `"Full Stack Developer"`.
///
/// Underscores become spaces, then every ASCII letter that starts a word
/// is upper-cased. Other characters are left untouched, so already
/// display-formed text passes through unchanged.
pub fn display_form(stored: &str) -> String {
    let mut out = String::with_capacity(stored.len());
    let mut prev_is_word = false;

    for ch in stored.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_ascii_alphanumeric();
        if is_word && !prev_is_word {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        prev_is_word = is_word;
    }

    out
}

/// Undo the percent-encoding applied at write time. Values that do not
/// decode to UTF-8 are returned as stored.
pub fn decode_component(stored: &str) -> String {
    urlencoding::decode(stored)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| stored.to_string())
}

pub fn normalize(record: &JobRecord) -> JobListing {
    JobListing {
        id: record.id,
        company_name: display_form(&record.company_name),
        job_role: display_form(&record.job_role),
        job_type: display_form(&record.job_type),
        location: display_form(&record.location),
        salary: record.salary,
        tags: record.tags.iter().map(|tag| display_form(tag)).collect(),
        company_logo: record.company_logo.clone(),
        form_link: decode_component(&record.form_link),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}
