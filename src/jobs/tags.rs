//! Tag normalisation shared by the form, the API client and the server.
//!
//! Tags travel as a JSON array, are edited as a comma-separated string and are
//! stored as a comma-joined column. Every conversion trims entries and drops
//! empty ones, so the representations stay interchangeable.

use serde::{Deserialize, Deserializer};

/// Split a comma-separated string into trimmed, non-empty tags
pub fn parse(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join tags for display and editing, e.g. `"rust, go"`
pub fn display(tags: &[String]) -> String {
    tags.join(", ")
}

/// Join tags for the database column, e.g. `"rust,go"`
pub fn to_column(tags: &[String]) -> String {
    normalize(tags.iter().map(String::as_str)).join(",")
}

/// Trim and drop empty entries from an already split list
pub fn normalize<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .flat_map(|tag| tag.split(','))
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Text(String),
    List(Vec<String>),
}

/// Serde helper accepting `"a, b"`, `["a", "b"]` or `null`
pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawTags>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawTags::Text(text)) => parse(&text),
        Some(RawTags::List(list)) => normalize(list.iter().map(String::as_str)),
        None => Vec::new(),
    })
}

/// Same as [`deserialize`] but keeps "field absent" distinct from "empty"
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize(deserializer).map(Some)
}
