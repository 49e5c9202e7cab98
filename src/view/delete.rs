use crate::jobs::Job;

/// Confirmation for deleting one specific job
#[derive(Debug, Clone, Copy)]
pub struct DeleteConfirmation<'a> {
    job: &'a Job,
}

impl<'a> DeleteConfirmation<'a> {
    pub fn new(job: &'a Job) -> Self {
        Self { job }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete the job posting for {} at {}?",
            self.job.title, self.job.company
        )
    }

    /// Id of the job this dialog was opened with
    pub fn target_id(&self) -> i32 {
        self.job.id
    }

    pub fn render(&self) -> String {
        format!("Delete Job Posting\n{}\n[y] Delete  [N] Cancel\n", self.prompt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::JobType;

    #[test]
    fn prompt_names_the_job() {
        let job = Job {
            id: 31,
            title: "Data Scientist".into(),
            company: "Allianz".into(),
            city: "Munich".into(),
            country: "Germany".into(),
            job_type: JobType::PartTime,
            posting_date: None,
            tags: Vec::new(),
            link: None,
            job_id: None,
        };
        let dialog = DeleteConfirmation::new(&job);
        assert_eq!(
            dialog.prompt(),
            "Are you sure you want to delete the job posting for Data Scientist at Allianz?"
        );
        assert_eq!(dialog.target_id(), 31);
        assert!(dialog.render().starts_with("Delete Job Posting\n"));
    }
}
