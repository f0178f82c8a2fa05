//! Display formats for the string accessors.

use std::borrow::Cow;
use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATE_FORMAT, DEFAULT_FORMAT, DEFAULT_TIME_FORMAT, SPLIT_JOINER};

/// How a timestamp is rendered for editing.
///
/// Either one strftime format for the combined accessor, or a date/time pair.
/// Each shape can produce the other: a pair combines as `"<time> on <date>"`,
/// and a combined format containing `" on "` splits around it.
///
/// In TOML this is either a string or a table:
///
/// ```toml
/// format = "%I:%M %p on %b %d, %Y"
/// # or
/// [format]
/// date = "%Y-%m-%d"
/// time = "%H:%M"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayFormat {
    Combined(String),
    Split { date: String, time: String },
}

impl Default for DisplayFormat {
    fn default() -> Self {
        DisplayFormat::Combined(DEFAULT_FORMAT.to_string())
    }
}

impl DisplayFormat {
    pub fn split(date: impl Into<String>, time: impl Into<String>) -> Self {
        DisplayFormat::Split {
            date: date.into(),
            time: time.into(),
        }
    }

    /// Format for the combined accessor.
    pub fn combined(&self) -> Cow<'_, str> {
        match self {
            DisplayFormat::Combined(format) => Cow::Borrowed(format.as_str()),
            DisplayFormat::Split { date, time } => Cow::Owned(format!("{time}{SPLIT_JOINER}{date}")),
        }
    }

    /// Format for the date-only accessor.
    pub fn date(&self) -> &str {
        match self {
            DisplayFormat::Split { date, .. } => date.as_str(),
            DisplayFormat::Combined(format) => format
                .split_once(SPLIT_JOINER)
                .map_or(DEFAULT_DATE_FORMAT, |(_, date)| date),
        }
    }

    /// Format for the time-only accessor.
    pub fn time(&self) -> &str {
        match self {
            DisplayFormat::Split { time, .. } => time.as_str(),
            DisplayFormat::Combined(format) => format
                .split_once(SPLIT_JOINER)
                .map_or(DEFAULT_TIME_FORMAT, |(time, _)| time),
        }
    }

    /// Check that every format this value yields can render a timestamp.
    pub fn validate(&self) -> Result<(), String> {
        let sample = sample_timestamp();
        for format in [&*self.combined(), self.date(), self.time()] {
            if render(&sample, format).is_none() {
                return Err(format!("cannot render timestamps with '{format}'"));
            }
        }
        Ok(())
    }
}

/// Render `timestamp` with a strftime `format`.
///
/// Returns `None` for malformed formats and for specifiers a naive timestamp
/// cannot satisfy, such as `%Z`.
pub fn render(timestamp: &NaiveDateTime, format: &str) -> Option<String> {
    let items = StrftimeItems::new(format);
    if items.clone().any(|item| matches!(item, Item::Error)) {
        return None;
    }
    let mut out = String::new();
    write!(out, "{}", timestamp.format_with_items(items)).ok()?;
    Some(out)
}

fn sample_timestamp() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2008, 4, 30)
        .and_then(|date| date.and_hms_opt(17, 30, 0))
        .unwrap_or_default()
}
