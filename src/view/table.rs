use crate::jobs::Job;

/// Tags shown per row and rows shown per job
const TAGS_PER_ROW: usize = 3;
const MAX_TAGS: usize = 6;

const HEADERS: [&str; 7] = [
    "ID",
    "Title",
    "Company",
    "Location",
    "Job Type",
    "Tags",
    "Posting Date",
];

/// Up to six tags split into rows of at most three
pub fn tag_rows(tags: &[String]) -> Vec<Vec<&str>> {
    let shown: Vec<&str> = tags
        .iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .collect();
    shown.chunks(TAGS_PER_ROW).map(<[&str]>::to_vec).collect()
}

/// Render one page of jobs as a plain-text table
pub fn render_table(jobs: &[Job]) -> String {
    if jobs.is_empty() {
        return format_rows(&[HEADERS.map(String::from).to_vec(), vec!["No jobs found".to_string()]]);
    }

    let mut rows: Vec<Vec<String>> = vec![HEADERS.map(String::from).to_vec()];
    for job in jobs {
        let tag_lines = tag_rows(&job.tags);
        let first_tags = tag_lines.first().map(|row| row.join(" · ")).unwrap_or_default();
        rows.push(vec![
            job.id.to_string(),
            job.title.clone(),
            job.company.clone(),
            job.location(),
            job.job_type.to_string(),
            first_tags,
            job.posting_date.map(|d| d.to_string()).unwrap_or_default(),
        ]);
        // Second tag row continues under the Tags column
        for extra in tag_lines.iter().skip(1) {
            let mut continuation = vec![String::new(); HEADERS.len()];
            continuation[5] = extra.join(" · ");
            rows.push(continuation);
        }
    }
    format_rows(&rows)
}

fn format_rows(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                // A single-cell row (the "no jobs" message) does not size the first column
                .filter(|row| row.len() == columns)
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (index, row) in rows.iter().enumerate() {
        let line = row
            .iter()
            .enumerate()
            .map(|(col, cell)| {
                if row.len() == columns {
                    format!("{:<width$}", cell, width = widths[col])
                } else {
                    cell.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(line.trim_end());
        out.push('\n');

        if index == 0 {
            let rule = widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-");
            out.push_str(&rule);
            out.push('\n');
        }
    }
    out
}
