use crate::error::AnnotatorError;

/// Stored when the prompt yields nothing usable.
pub const NO_TAG: &str = "None";

pub fn parse_tag(input: Option<&str>) -> Result<String, AnnotatorError> {
    match input.map(str::trim) {
        Some(tag) if !tag.is_empty() => Ok(tag.to_string()),
        _ => Err(AnnotatorError::EmptyTagInput),
    }
}

/// Trimmed prompt input, or the sentinel for empty/cancelled input.
pub fn normalize_tag(input: Option<&str>) -> String {
    parse_tag(input).unwrap_or_else(|err| {
        tracing::debug!(%err, "substituting sentinel tag");
        NO_TAG.to_string()
    })
}

/// Presentation form: `"roi1, car"` shows as `#roi1 #car`.
pub fn display_tag(tag: &str) -> String {
    if tag == NO_TAG {
        return NO_TAG.to_string();
    }
    let parts: Vec<String> = tag
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!("#{t}"))
        .collect();
    if parts.is_empty() {
        NO_TAG.to_string()
    } else {
        parts.join(" ")
    }
}
