use crate::jobs::JobForm;

/// Render the add/edit modal with the current field values
pub fn render(form: &JobForm, editing: bool) -> String {
    let heading = if editing {
        "Edit Job Posting"
    } else {
        "Add a New Job Posting"
    };
    let fields = [
        ("Title", form.title.clone()),
        ("Company", form.company.clone()),
        ("City", form.city.clone()),
        ("Country", form.country.clone()),
        ("Job Type", form.job_type.to_string()),
        ("Posting Date", form.posting_date.to_string()),
        ("Tags", form.tags.clone()),
    ];

    let mut out = format!("{}\n{}\n", heading, "=".repeat(heading.len()));
    for (label, value) in fields {
        out.push_str(&format!("{:<13} {}\n", format!("{}:", label), value));
    }

    let missing = form.missing_fields();
    if !missing.is_empty() {
        out.push_str(&format!("! {}\n", missing.join(", ")));
    }
    out
}
