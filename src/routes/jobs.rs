use std::collections::HashMap;

use axum::{
    Router,
    routing::{get, post},
    Json,
    extract::{rejection::JsonRejection, Query, State},
};
use tracing::{info, warn};
use validator::Validate;

use crate::models::{AppState, JobListing, NewJob, SalaryInput, SubmitJobRequest};
use crate::search::{normalize, normalize::decode_component, storage_form, JobQuery};
use crate::types::{AppError, AppResult, MessageResponse};

pub const REQUIRED_FIELDS_MISSING: &str = "Required fields missing";
pub const INVALID_SALARY: &str = "Salary must be a whole number";
pub const INVALID_BODY: &str = "Invalid request body";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/jobs", get(list_jobs))
        .route("/api/submit-job", post(submit_job))
        .with_state(state)
}

/// GET /api/jobs - filtered, normalized listings
async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<Vec<JobListing>>> {
    let query = JobQuery::build(&params);
    let records = state.store.find_jobs(&query).await?;

    info!(filters = query.filters().len(), results = records.len(), "Job search served");

    Ok(Json(records.iter().map(normalize).collect()))
}

/// POST /api/submit-job - store a recruiter submission
async fn submit_job(
    State(state): State<AppState>,
    payload: Result<Json<SubmitJobRequest>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected job submission body: {}", rejection.body_text());
        AppError::Validation(INVALID_BODY.to_string())
    })?;

    let job = new_job_from_request(request)?;
    let record = state.store.insert_job(job).await?;

    info!(job_id = %record.id, company = %record.company_name, "Job submission stored");

    Ok(Json(MessageResponse::new("Job submission successful")))
}

/// Validate a submission and convert it to storage form.
pub fn new_job_from_request(request: SubmitJobRequest) -> AppResult<NewJob> {
    if request.validate().is_err() {
        warn!("Job submission missing required fields");
        return Err(AppError::Validation(REQUIRED_FIELDS_MISSING.to_string()));
    }

    let (
        Some(company_name),
        Some(job_role),
        Some(job_type),
        Some(location),
        Some(salary),
        Some(form_link),
    ) = (
        request.company_name,
        request.job_role,
        request.job_type,
        request.location,
        request.salary,
        request.form_link,
    )
    else {
        return Err(AppError::Validation(REQUIRED_FIELDS_MISSING.to_string()));
    };

    Ok(NewJob {
        company_name: storage_form(&company_name),
        job_role: storage_form(&job_role),
        job_type: storage_form(&job_type),
        location: storage_form(&location),
        salary: parse_salary(salary)?,
        tags: request
            .tags
            .as_deref()
            .map(|tags| {
                tags.split(',')
                    .map(storage_form)
                    .filter(|tag| !tag.is_empty())
                    .collect()
            })
            .unwrap_or_default(),
        company_logo: request.company_logo.filter(|logo| !logo.trim().is_empty()),
        form_link: urlencoding::encode(form_link.trim()).into_owned(),
    })
}

fn parse_salary(input: SalaryInput) -> AppResult<i64> {
    let salary = match input {
        SalaryInput::Number(value) => value,
        SalaryInput::Text(raw) => {
            let decoded = decode_component(raw.trim());
            let decoded = decoded.trim();
            if decoded.is_empty() {
                return Err(AppError::Validation(REQUIRED_FIELDS_MISSING.to_string()));
            }
            decoded
                .parse()
                .map_err(|_| AppError::Validation(INVALID_SALARY.to_string()))?
        }
    };

    match salary {
        0 => Err(AppError::Validation(REQUIRED_FIELDS_MISSING.to_string())),
        ..0 => Err(AppError::Validation(INVALID_SALARY.to_string())),
        _ => Ok(salary),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> SubmitJobRequest {
        SubmitJobRequest {
            company_name: Some("Acme Corp".to_string()),
            company_logo: None,
            job_role: Some("Full Stack Developer".to_string()),
            job_type: Some("Full Time".to_string()),
            location: Some("New York".to_string()),
            salary: Some(SalaryInput::Text("55000".to_string())),
            tags: Some("Rust, Distributed Systems, ,".to_string()),
            form_link: Some("https://acme.example/apply?id=7".to_string()),
        }
    }

    #[test]
    fn test_submission_is_stored_in_storage_form() {
        let job = new_job_from_request(complete_request()).unwrap();
        assert_eq!(job.company_name, "acme_corp");
        assert_eq!(job.job_role, "full_stack_developer");
        assert_eq!(job.job_type, "full_time");
        assert_eq!(job.location, "new_york");
        assert_eq!(job.salary, 55_000);
        assert_eq!(job.tags, vec!["rust", "distributed_systems"]);
        assert_eq!(job.company_logo, None);
        assert_eq!(decode_component(&job.form_link), "https://acme.example/apply?id=7");
    }

    #[test]
    fn test_missing_or_blank_required_field_is_rejected() {
        let mut request = complete_request();
        request.form_link = None;
        let err = new_job_from_request(request).unwrap_err();
        assert_eq!(err.to_string(), REQUIRED_FIELDS_MISSING);

        let mut request = complete_request();
        request.job_type = Some(String::new());
        assert!(matches!(new_job_from_request(request), Err(AppError::Validation(_))));

        let mut request = complete_request();
        request.salary = Some(SalaryInput::Text(String::new()));
        assert_eq!(new_job_from_request(request).unwrap_err().to_string(), REQUIRED_FIELDS_MISSING);
    }

    #[test]
    fn test_salary_accepts_numbers_and_encoded_text() {
        assert_eq!(parse_salary(SalaryInput::Number(42_000)).unwrap(), 42_000);
        assert_eq!(parse_salary(SalaryInput::Text("%2042000".to_string())).unwrap(), 42_000);
        assert_eq!(
            parse_salary(SalaryInput::Text("lots".to_string())).unwrap_err().to_string(),
            INVALID_SALARY
        );
        assert!(parse_salary(SalaryInput::Number(-1)).is_err());
    }

    #[test]
    fn test_zero_salary_counts_as_missing() {
        for salary in [SalaryInput::Number(0), SalaryInput::Text("0".to_string())] {
            let mut request = complete_request();
            request.salary = Some(salary);
            assert_eq!(
                new_job_from_request(request).unwrap_err().to_string(),
                REQUIRED_FIELDS_MISSING
            );
        }
    }
}
