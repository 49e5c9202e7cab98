use chrono::{Local, NaiveDate};
use validator::Validate;

use super::models::{not_blank, Job, JobPayload, JobType};
use super::tags;

/// Editable state of the add/edit form
///
/// Tags stay a comma-separated string here; they become an array only when
/// the form is turned into a [`JobPayload`].
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct JobForm {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    #[validate(custom(function = "not_blank", message = "Company is required"))]
    pub company: String,
    #[validate(custom(function = "not_blank", message = "City is required"))]
    pub city: String,
    #[validate(custom(function = "not_blank", message = "Country is required"))]
    pub country: String,
    pub job_type: JobType,
    pub posting_date: NaiveDate,
    pub tags: String,
}

impl JobForm {
    /// Blank form for a new posting dated `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            company: String::new(),
            city: String::new(),
            country: String::new(),
            job_type: JobType::FullTime,
            posting_date: today,
            tags: String::new(),
        }
    }

    /// Form seeded from an existing job for editing
    pub fn from_job(job: &Job, today: NaiveDate) -> Self {
        Self {
            title: job.title.clone(),
            company: job.company.clone(),
            city: job.city.clone(),
            country: job.country.clone(),
            job_type: job.job_type,
            posting_date: job.posting_date.unwrap_or(today),
            tags: tags::display(&job.tags),
        }
    }

    /// Request body with tags normalised into an array
    pub fn to_payload(&self) -> JobPayload {
        JobPayload {
            title: self.title.clone(),
            company: self.company.clone(),
            city: self.city.clone(),
            country: self.country.clone(),
            job_type: Some(self.job_type),
            posting_date: Some(self.posting_date),
            tags: tags::parse(&self.tags),
            link: None,
        }
    }

    /// Messages for every missing required field, in form order
    pub fn missing_fields(&self) -> Vec<String> {
        let Err(errors) = self.validate() else {
            return Vec::new();
        };
        let field_errors = errors.field_errors();
        ["title", "company", "city", "country"]
            .into_iter()
            .filter_map(|field| field_errors.get(field))
            .flat_map(|errors| errors.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .collect()
    }
}

impl Default for JobForm {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn job() -> Job {
        Job {
            id: 3,
            title: "Pricing Actuary".into(),
            company: "Aviva".into(),
            city: "York".into(),
            country: "UK".into(),
            job_type: JobType::Contract,
            posting_date: None,
            tags: vec!["Pricing".into(), "GI".into()],
            link: None,
            job_id: None,
        }
    }

    #[test]
    fn new_form_defaults_to_full_time_today() {
        let form = JobForm::new(date(2025, 1, 2));
        assert_eq!(form.job_type, JobType::FullTime);
        assert_eq!(form.posting_date, date(2025, 1, 2));
        assert!(form.tags.is_empty());
    }

    #[test]
    fn editing_joins_tags_and_falls_back_to_today() {
        let form = JobForm::from_job(&job(), date(2025, 6, 30));
        assert_eq!(form.tags, "Pricing, GI");
        assert_eq!(form.posting_date, date(2025, 6, 30));
        assert_eq!(form.job_type, JobType::Contract);
    }

    #[test]
    fn payload_normalises_tags() {
        let mut form = JobForm::from_job(&job(), date(2025, 6, 30));
        form.tags = "a, b ,,c".into();
        assert_eq!(form.to_payload().tags, vec!["a", "b", "c"]);

        form.tags = String::new();
        assert!(form.to_payload().tags.is_empty());
    }

    #[test]
    fn tags_are_optional_but_other_fields_are_not() {
        let mut form = JobForm::new(date(2025, 1, 1));
        assert_eq!(
            form.missing_fields(),
            vec![
                "Title is required",
                "Company is required",
                "City is required",
                "Country is required"
            ]
        );

        form.title = "Analyst".into();
        form.company = "Acme".into();
        form.city = "Paris".into();
        form.country = "France".into();
        assert!(form.validate().is_ok());
        assert!(form.missing_fields().is_empty());
    }
}
