//! Render a [`JobQuery`] as a Postgres `WHERE` clause.
//!
//! Every term is bound as an `ILIKE` pattern with `%`, `_` and `\` escaped,
//! so terms match as literal substrings.

use sqlx::{Postgres, QueryBuilder};

use super::query::{JobField, JobFilter, JobQuery};

pub const JOB_COLUMNS: &str = "id, company_name, job_role, job_type, location, salary, tags, \
     company_logo, form_link, created_at, updated_at";

/// `SELECT` for every job matching `query`, oldest first.
pub fn select_jobs(query: &JobQuery) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs"));
    push_where(&mut builder, query);
    builder.push(" ORDER BY created_at ASC");
    builder
}

pub fn push_where(builder: &mut QueryBuilder<'static, Postgres>, query: &JobQuery) {
    for (i, filter) in query.filters().iter().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        push_filter(builder, filter);
    }
}

fn push_filter(builder: &mut QueryBuilder<'static, Postgres>, filter: &JobFilter) {
    match filter {
        JobFilter::SalaryRange { min, max } => {
            builder.push("salary BETWEEN ");
            builder.push_bind(*min);
            builder.push(" AND ");
            builder.push_bind(*max);
        }
        JobFilter::FieldContains { field, any_of } => {
            push_any_match(builder, &[*field], any_of);
        }
        JobFilter::Keywords { terms } => {
            push_any_match(builder, &JobField::KEYWORD_FIELDS, terms);
        }
    }
}

/// `(f1 ILIKE t1 OR f1 ILIKE t2 OR f2 ILIKE t1 ...)`
fn push_any_match(builder: &mut QueryBuilder<'static, Postgres>, fields: &[JobField], terms: &[String]) {
    builder.push("(");
    let mut first = true;
    for field in fields {
        for term in terms {
            if !first {
                builder.push(" OR ");
            }
            first = false;
            let pattern = like_pattern(term);
            match field {
                JobField::Tags => {
                    builder.push("EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE ");
                    builder.push_bind(pattern);
                    builder.push(" ESCAPE '\\')");
                }
                other => {
                    builder.push(other.column());
                    builder.push(" ILIKE ");
                    builder.push_bind(pattern);
                    builder.push(" ESCAPE '\\'");
                }
            }
        }
    }
    builder.push(")");
}

/// Wrap `term` in `%` after escaping LIKE metacharacters.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
