//! Accessor names derived from a timestamp field name.
//!
//! `published_at` yields `published_at_string` for the combined accessor and
//! `published_date_string` / `published_time_string` for the split pair.

/// Name of the combined string accessor for `field`.
pub fn string_field_name(field: &str) -> String {
    format!("{field}_string")
}

/// Name of the date-only accessor for `field`.
pub fn date_field_name(field: &str) -> String {
    format!("{}_date_string", stem(field))
}

/// Name of the time-only accessor for `field`.
pub fn time_field_name(field: &str) -> String {
    format!("{}_time_string", stem(field))
}

/// `field` without its trailing `_at` / `_on`.
fn stem(field: &str) -> &str {
    field
        .strip_suffix("_at")
        .or_else(|| field.strip_suffix("_on"))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(field)
}
