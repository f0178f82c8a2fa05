//! Constants used throughout the crate
//!
//! Default formats, reserved column names and validation messages live here
//! so the adapter, configuration and tests agree on them.

/// Default strftime format for the combined string accessor
pub const DEFAULT_FORMAT: &str = "%I:%M %p on %b %d, %Y";
/// Date half of the default format, used by the date-only accessor
pub const DEFAULT_DATE_FORMAT: &str = "%b %d, %Y";
/// Time half of the default format, used by the time-only accessor
pub const DEFAULT_TIME_FORMAT: &str = "%I:%M %p";

/// Joins a time string and a date string into text the parser accepts
pub const SPLIT_JOINER: &str = " on ";

/// Bookkeeping columns never adapted when fields are inferred from schema
pub const BOOKKEEPING_FIELDS: [&str; 2] = ["created_at", "updated_at"];

// Validation Messages
pub const ERROR_INVALID: &str = "is invalid";
pub const ERROR_BLANK: &str = "can't be blank";

// Parsing
/// Seconds around the current instant in which a parsed value counts as "now"
pub const DEFAULT_NOW_WINDOW_SECONDS: i64 = 2;
pub const NOW_WINDOW_MAX_SECONDS: i64 = 60;

// Configuration
pub const CONFIG_FILE_NAME: &str = "chronoform.toml";
pub const CONFIG_DIR_NAME: &str = "chronoform";
