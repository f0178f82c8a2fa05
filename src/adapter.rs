//! Timestamp string adapter.
//!
//! An adapter is declared once per model type. For each adapted timestamp
//! field it provides a combined string accessor (`<field>_string`), and when
//! split accessors are enabled a date-only and a time-only accessor as well.
//! Writes parse the submitted text; text that cannot be read as a timestamp,
//! or that silently resolves to the current instant, leaves the field empty
//! and records "is invalid" on the string accessor.
//!
//! ```
//! use chronoform::{StaticSchema, TimestampStringAdapter};
//!
//! let adapter = TimestampStringAdapter::builder()
//!     .fields(["published_at"])
//!     .split(true)
//!     .build(&StaticSchema::missing())
//!     .unwrap();
//!
//! assert!(adapter.responds_to("published_at_string"));
//! assert!(adapter.responds_to("published_date_string"));
//! assert!(adapter.responds_to("published_time_string"));
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use log::{debug, warn};
use sea_orm::EntityTrait;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::constants::{DEFAULT_NOW_WINDOW_SECONDS, ERROR_INVALID};
use crate::format::{render, DisplayFormat};
use crate::model::TimestampModel;
use crate::naming::{date_field_name, string_field_name, time_field_name};
use crate::parse::{parse_relative_to, ParseError};
use crate::schema::{resolve_fields, EntitySchema, SchemaSource};
use crate::validation::Validations;

/// Rendering used to compare a parsed value with the current instant.
const SECOND_PRECISION: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised by the string accessors and by adapter declaration.
///
/// `Unparseable` and `AmbiguousNow` are also recorded on the model as
/// validation errors before they are returned.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("{input:?} is not a recognizable timestamp: {source}")]
    Unparseable {
        input: String,
        #[source]
        source: ParseError,
    },

    #[error("{input:?} resolves to the current time without saying \"now\"")]
    AmbiguousNow { input: String },

    #[error("No string accessor named {0}")]
    UnknownAccessor(String),

    #[error("Invalid display format: {0}")]
    InvalidFormat(String),

    #[error("Accessor {0} would be generated twice")]
    DuplicateAccessor(String),
}

impl AdapterError {
    /// Whether the error was also recorded on the model.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, AdapterError::Unparseable { .. } | AdapterError::AmbiguousNow { .. })
    }
}

/// When a parsed value is too close to "now" to be trusted.
///
/// Free-text parsers tend to fall back to the current time when they only
/// understood part of the input, so such values are rejected unless the user
/// plainly asked for the current time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NowPolicy {
    /// Reject values within `window` of now, unless the input contains the
    /// word "now".
    Keyword { window: Duration },
    /// Reject values equal to now at second precision. The word "now" does
    /// not exempt the input.
    ExactMatch,
}

impl Default for NowPolicy {
    fn default() -> Self {
        NowPolicy::Keyword {
            window: Duration::seconds(DEFAULT_NOW_WINDOW_SECONDS),
        }
    }
}

impl NowPolicy {
    pub fn keyword(window_seconds: i64) -> Self {
        NowPolicy::Keyword {
            window: Duration::seconds(window_seconds),
        }
    }

    pub fn is_ambiguous(&self, input: &str, parsed: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self {
            NowPolicy::Keyword { window } => {
                let distance = (parsed - now).num_milliseconds().abs();
                distance <= window.num_milliseconds() && !mentions_now(input)
            }
            NowPolicy::ExactMatch => {
                parsed.format(SECOND_PRECISION).to_string() == now.format(SECOND_PRECISION).to_string()
            }
        }
    }
}

fn mentions_now(input: &str) -> bool {
    input
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| word.eq_ignore_ascii_case("now"))
}

/// A timestamp field and the names of its string accessors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptedField {
    pub name: String,
    pub string_name: String,
    pub date_name: String,
    pub time_name: String,
}

impl AdaptedField {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            string_name: string_field_name(name),
            date_name: date_field_name(name),
            time_name: time_field_name(name),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Accessor<'f> {
    Combined(&'f AdaptedField),
    Date(&'f AdaptedField),
    Time(&'f AdaptedField),
}

#[derive(Debug, Clone, Copy)]
enum Half {
    Date,
    Time,
}

/// Declares an adapter for one model type.
pub struct AdapterBuilder {
    fields: Vec<String>,
    format: DisplayFormat,
    now_policy: NowPolicy,
    split: bool,
    clock: Arc<dyn Clock>,
}

impl Default for AdapterBuilder {
    fn default() -> Self {
        Self {
            fields: Vec::new(),
            format: DisplayFormat::default(),
            now_policy: NowPolicy::default(),
            split: false,
            clock: Arc::new(SystemClock),
        }
    }
}

impl AdapterBuilder {
    /// Start from the format, parsing and split settings in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self {
            format: config.format.clone(),
            now_policy: config.parsing.now_policy(),
            split: config.parsing.split_accessors,
            ..Self::default()
        }
    }

    /// Adapt exactly these fields instead of inferring them from schema.
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn format(mut self, format: DisplayFormat) -> Self {
        self.format = format;
        self
    }

    pub fn now_policy(mut self, now_policy: NowPolicy) -> Self {
        self.now_policy = now_policy;
        self
    }

    /// Also generate date-only and time-only accessors.
    pub fn split(mut self, enabled: bool) -> Self {
        self.split = enabled;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(self, schema: &dyn SchemaSource) -> Result<TimestampStringAdapter, AdapterError> {
        self.format.validate().map_err(AdapterError::InvalidFormat)?;

        let fields: Vec<AdaptedField> = resolve_fields(&self.fields, schema)
            .iter()
            .map(|name| AdaptedField::new(name))
            .collect();

        let mut seen = HashSet::new();
        for field in &fields {
            let mut names = vec![&field.string_name];
            if self.split {
                names.extend([&field.date_name, &field.time_name]);
            }
            for name in names {
                if !seen.insert(name.as_str()) {
                    return Err(AdapterError::DuplicateAccessor(name.clone()));
                }
            }
        }

        debug!(
            "Adapted timestamp fields: {}",
            fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(", ")
        );

        Ok(TimestampStringAdapter {
            fields,
            format: self.format,
            now_policy: self.now_policy,
            split: self.split,
            clock: self.clock,
        })
    }

    /// Build against the columns of a SeaORM entity.
    pub fn build_for<E: EntityTrait>(self) -> Result<TimestampStringAdapter, AdapterError> {
        self.build(&EntitySchema::<E>::new())
    }
}

/// String accessors for the timestamp fields of one model type.
pub struct TimestampStringAdapter {
    fields: Vec<AdaptedField>,
    format: DisplayFormat,
    now_policy: NowPolicy,
    split: bool,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for TimestampStringAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimestampStringAdapter")
            .field("fields", &self.fields)
            .field("format", &self.format)
            .field("now_policy", &self.now_policy)
            .field("split", &self.split)
            .finish_non_exhaustive()
    }
}

impl TimestampStringAdapter {
    pub fn builder() -> AdapterBuilder {
        AdapterBuilder::default()
    }

    pub fn fields(&self) -> &[AdaptedField] {
        &self.fields
    }

    pub fn format(&self) -> &DisplayFormat {
        &self.format
    }

    pub fn now_policy(&self) -> NowPolicy {
        self.now_policy
    }

    pub fn is_split(&self) -> bool {
        self.split
    }

    /// Every generated accessor name, i.e. the names a form may assign.
    pub fn accessor_names(&self) -> Vec<&str> {
        let mut names = Vec::with_capacity(self.fields.len() * 3);
        for field in &self.fields {
            names.push(field.string_name.as_str());
            if self.split {
                names.push(field.date_name.as_str());
                names.push(field.time_name.as_str());
            }
        }
        names
    }

    pub fn responds_to(&self, accessor: &str) -> bool {
        self.accessor(accessor).is_some()
    }

    /// Formatted value of `field`, or `None` when it is unset.
    pub fn read<M: TimestampModel>(&self, model: &M, field: &str) -> Result<Option<String>, AdapterError> {
        let field = self.adapted(field)?;
        Ok(self.render(model, field, &self.format.combined()))
    }

    /// Parse `value` into `field`.
    ///
    /// Blank input clears the field. Input that fails to parse, or that the
    /// [`NowPolicy`] considers ambiguous, clears the field and records one
    /// "is invalid" error on the string accessor.
    pub fn write<M: TimestampModel>(&self, model: &mut M, field: &str, value: &str) -> Result<(), AdapterError> {
        let field = self.adapted(field)?;
        self.apply(model, field, value)
    }

    pub fn read_date<M: TimestampModel>(&self, model: &M, field: &str) -> Result<Option<String>, AdapterError> {
        let field = self.split_field(field, date_field_name)?;
        Ok(self.render(model, field, self.format.date()))
    }

    pub fn read_time<M: TimestampModel>(&self, model: &M, field: &str) -> Result<Option<String>, AdapterError> {
        let field = self.split_field(field, time_field_name)?;
        Ok(self.render(model, field, self.format.time()))
    }

    /// Buffer the date half of `field`, parsing once the time half is known.
    pub fn write_date<M: TimestampModel>(&self, model: &mut M, field: &str, value: &str) -> Result<(), AdapterError> {
        let field = self.split_field(field, date_field_name)?;
        self.buffer(model, field, Half::Date, value)
    }

    /// Buffer the time half of `field`, parsing once the date half is known.
    pub fn write_time<M: TimestampModel>(&self, model: &mut M, field: &str, value: &str) -> Result<(), AdapterError> {
        let field = self.split_field(field, time_field_name)?;
        self.buffer(model, field, Half::Time, value)
    }

    /// Read through an accessor name such as `woke_at_string`.
    pub fn get<M: TimestampModel>(&self, model: &M, accessor: &str) -> Result<Option<String>, AdapterError> {
        match self.accessor(accessor) {
            Some(Accessor::Combined(field)) => Ok(self.render(model, field, &self.format.combined())),
            Some(Accessor::Date(field)) => Ok(self.render(model, field, self.format.date())),
            Some(Accessor::Time(field)) => Ok(self.render(model, field, self.format.time())),
            None => Err(AdapterError::UnknownAccessor(accessor.to_string())),
        }
    }

    /// Write through an accessor name such as `woke_at_string`.
    pub fn set<M: TimestampModel>(&self, model: &mut M, accessor: &str, value: &str) -> Result<(), AdapterError> {
        match self.accessor(accessor) {
            Some(Accessor::Combined(field)) => self.apply(model, field, value),
            Some(Accessor::Date(field)) => self.buffer(model, field, Half::Date, value),
            Some(Accessor::Time(field)) => self.buffer(model, field, Half::Time, value),
            None => Err(AdapterError::UnknownAccessor(accessor.to_string())),
        }
    }

    /// Assign submitted form values. Keys that are not generated accessors
    /// are skipped; rejected values end up as errors on the model.
    pub fn assign<'v, M, I>(&self, model: &mut M, pairs: I)
    where
        M: TimestampModel,
        I: IntoIterator<Item = (&'v str, &'v str)>,
    {
        for (accessor, value) in pairs {
            match self.set(model, accessor, value) {
                Err(AdapterError::UnknownAccessor(name)) => warn!("Skipping assignment to unknown accessor {}", name),
                Err(e) => debug!("Assignment to {} rejected: {}", accessor, e),
                Ok(()) => {}
            }
        }
    }

    /// Copy errors on each adapted field onto its string accessor, and onto
    /// the date accessor when split accessors are enabled.
    pub fn mirror_errors<M: TimestampModel>(&self, model: &mut M) {
        for field in &self.fields {
            let messages = model.errors().on(&field.name).to_vec();
            let errors = model.errors_mut();
            for message in messages {
                if self.split {
                    errors.add(field.date_name.as_str(), message.as_str());
                }
                errors.add(field.string_name.as_str(), message);
            }
        }
    }

    /// After-validation hook: restore errors for rejected input, then mirror
    /// field errors onto the accessors.
    pub fn after_validation<M: TimestampModel>(&self, model: &mut M) {
        let rejected: Vec<String> = model.accessor_state().rejected().map(str::to_string).collect();
        for string_field in rejected {
            if !model.errors().contains(&string_field, ERROR_INVALID) {
                model.errors_mut().add(string_field, ERROR_INVALID);
            }
        }
        self.mirror_errors(model);
    }

    /// Attach [`Self::after_validation`] to a model type's validations.
    pub fn register<'a, M: TimestampModel + 'a>(&'a self, validations: &mut Validations<'a, M>) {
        validations.after_validation(move |model| self.after_validation(model));
    }

    fn accessor(&self, name: &str) -> Option<Accessor<'_>> {
        self.fields.iter().find_map(|field| {
            if field.string_name == name {
                Some(Accessor::Combined(field))
            } else if self.split && field.date_name == name {
                Some(Accessor::Date(field))
            } else if self.split && field.time_name == name {
                Some(Accessor::Time(field))
            } else {
                None
            }
        })
    }

    fn adapted(&self, field: &str) -> Result<&AdaptedField, AdapterError> {
        self.fields
            .iter()
            .find(|adapted| adapted.name == field)
            .ok_or_else(|| AdapterError::UnknownAccessor(string_field_name(field)))
    }

    fn split_field(&self, field: &str, accessor_name: fn(&str) -> String) -> Result<&AdaptedField, AdapterError> {
        match self.adapted(field) {
            Ok(adapted) if self.split => Ok(adapted),
            _ => Err(AdapterError::UnknownAccessor(accessor_name(field))),
        }
    }

    fn render<M: TimestampModel>(&self, model: &M, field: &AdaptedField, format: &str) -> Option<String> {
        model
            .timestamp(&field.name)
            .and_then(|timestamp| render(&timestamp, format))
    }

    fn buffer<M: TimestampModel>(
        &self,
        model: &mut M,
        field: &AdaptedField,
        half: Half,
        value: &str,
    ) -> Result<(), AdapterError> {
        let pending = {
            let input = model.accessor_state().split_input_mut(&field.name);
            match half {
                Half::Date => input.date = Some(value.to_string()),
                Half::Time => input.time = Some(value.to_string()),
            }
            input.combined()
        };

        match pending {
            Some(text) => self.apply(model, field, &text),
            None => {
                debug!("Buffered {:?} half of {}, waiting for the other", half, field.name);
                Ok(())
            }
        }
    }

    fn apply<M: TimestampModel>(&self, model: &mut M, field: &AdaptedField, value: &str) -> Result<(), AdapterError> {
        model.accessor_state().clear_rejected(&field.string_name);

        let input = value.trim();
        if input.is_empty() {
            model.set_timestamp(&field.name, None);
            return Ok(());
        }

        match self.interpret(input) {
            Ok(timestamp) => {
                debug!("Parsed {:?} as {} for {}", input, timestamp, field.name);
                model.set_timestamp(&field.name, Some(timestamp));
                Ok(())
            }
            Err(e) => {
                debug!("Rejected {:?} for {}: {}", input, field.string_name, e);
                model.set_timestamp(&field.name, None);
                model.errors_mut().add(field.string_name.as_str(), ERROR_INVALID);
                model.accessor_state().mark_rejected(&field.string_name);
                Err(e)
            }
        }
    }

    fn interpret(&self, input: &str) -> Result<NaiveDateTime, AdapterError> {
        let now = self.clock.now();
        let parsed = parse_relative_to(input, now).map_err(|source| AdapterError::Unparseable {
            input: input.to_string(),
            source,
        })?;

        if self.now_policy.is_ambiguous(input, parsed, now) {
            return Err(AdapterError::AmbiguousNow {
                input: input.to_string(),
            });
        }

        Ok(parsed)
    }
}

/// Binds a model type to its adapter so accessors can be called on instances.
///
/// ```
/// use chrono::NaiveDateTime;
/// use chronoform::{AccessorState, Errors, StaticSchema, StringAccessors, TimestampModel, TimestampStringAdapter};
/// use once_cell::sync::Lazy;
///
/// #[derive(Default)]
/// struct NewsItem {
///     published_at: Option<NaiveDateTime>,
///     errors: Errors,
///     state: AccessorState,
/// }
///
/// impl TimestampModel for NewsItem {
///     fn timestamp(&self, field: &str) -> Option<NaiveDateTime> {
///         match field {
///             "published_at" => self.published_at,
///             _ => None,
///         }
///     }
///     fn set_timestamp(&mut self, field: &str, value: Option<NaiveDateTime>) {
///         if field == "published_at" {
///             self.published_at = value;
///         }
///     }
///     fn errors(&self) -> &Errors { &self.errors }
///     fn errors_mut(&mut self) -> &mut Errors { &mut self.errors }
///     fn accessor_state(&mut self) -> &mut AccessorState { &mut self.state }
/// }
///
/// static NEWS_ITEM: Lazy<TimestampStringAdapter> = Lazy::new(|| {
///     TimestampStringAdapter::builder()
///         .fields(["published_at"])
///         .build(&StaticSchema::missing())
///         .expect("valid adapter")
/// });
///
/// impl StringAccessors for NewsItem {
///     fn string_adapter() -> &'static TimestampStringAdapter {
///         &NEWS_ITEM
///     }
/// }
///
/// let mut item = NewsItem::default();
/// item.set_string("published_at_string", "April 30, 2008").unwrap();
/// assert_eq!(item.get_string("published_at_string").unwrap().as_deref(), Some("12:00 AM on Apr 30, 2008"));
/// ```
pub trait StringAccessors: TimestampModel + Sized {
    fn string_adapter() -> &'static TimestampStringAdapter;

    fn responds_to(accessor: &str) -> bool {
        Self::string_adapter().responds_to(accessor)
    }

    fn get_string(&self, accessor: &str) -> Result<Option<String>, AdapterError> {
        Self::string_adapter().get(self, accessor)
    }

    fn set_string(&mut self, accessor: &str, value: &str) -> Result<(), AdapterError> {
        Self::string_adapter().set(self, accessor, value)
    }

    fn assign_strings<'v, I>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (&'v str, &'v str)>,
    {
        Self::string_adapter().assign(self, pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2008, 4, 30).unwrap().and_hms_opt(5, 30, 0).unwrap()
    }

    #[test]
    fn test_keyword_policy_rejects_values_near_now() {
        let policy = NowPolicy::default();
        let close = now() + Duration::seconds(1);
        let far = now() + Duration::seconds(3);

        assert!(policy.is_ambiguous("5:30:01 AM", close, now()));
        assert!(!policy.is_ambiguous("right now", close, now()));
        assert!(!policy.is_ambiguous("NOW", now(), now()));
        assert!(!policy.is_ambiguous("5:30:03 AM", far, now()));
    }

    #[test]
    fn test_keyword_policy_matches_whole_word() {
        let policy = NowPolicy::default();
        assert!(policy.is_ambiguous("snowy morning 5:30", now(), now()));
    }

    #[test]
    fn test_exact_policy_compares_at_second_precision() {
        let policy = NowPolicy::ExactMatch;
        assert!(policy.is_ambiguous("now", now(), now()));
        assert!(policy.is_ambiguous("5:30", now(), now() + Duration::milliseconds(400)));
        assert!(!policy.is_ambiguous("5:30:01", now() + Duration::seconds(1), now()));
    }

    #[test]
    fn test_adapted_field_names() {
        let field = AdaptedField::new("published_at");
        assert_eq!(field.string_name, "published_at_string");
        assert_eq!(field.date_name, "published_date_string");
        assert_eq!(field.time_name, "published_time_string");
    }
}
