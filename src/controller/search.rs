use crate::jobs::Job;

/// Narrow a page of jobs to those matching `term`
///
/// Case-insensitive substring match against title, company and the joined
/// tags. A blank term keeps every job. Only the page passed in is searched.
pub fn filter_jobs(jobs: &[Job], term: &str) -> Vec<Job> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return jobs.to_vec();
    }

    jobs.iter()
        .filter(|job| matches(job, &needle))
        .cloned()
        .collect()
}

fn matches(job: &Job, needle: &str) -> bool {
    job.title.to_lowercase().contains(needle)
        || job.company.to_lowercase().contains(needle)
        || (!job.tags.is_empty() && job.tags.join(",").to_lowercase().contains(needle))
}
