//! chronoform - human-editable string accessors for timestamp fields
//!
//! This library lets forms edit timestamp columns of ORM models as text.
//! For each adapted field it renders the stored value with a configurable
//! strftime format, parses submitted text back into a timestamp, and records
//! validation errors on the string accessor the user actually edited.
//!
//! # Modules
//!
//! The library is organized into several key modules:
//!
//! * [`adapter`] - The timestamp string adapter and its builder
//! * [`parse`] - Free-text timestamp parsing
//! * [`schema`] - Column metadata and timestamp field resolution
//! * [`validation`] - Validators and after-validation hooks
//! * [`config`] - Configuration management

/// Timestamp string adapter, accessor dispatch and error mirroring
pub mod adapter;

/// Source of the current instant
pub mod clock;

/// Configuration module for formats, parsing policy and logging
pub mod config;

/// Crate constants and default values
pub mod constants;

/// Per-field validation messages
pub mod errors;

/// Display formats and rendering
pub mod format;

/// Logging setup
pub mod logger;

/// Model contract and per-instance accessor state
pub mod model;

/// Accessor names derived from field names
pub mod naming;

/// Free-text timestamp parser
pub mod parse;

/// SeaORM model wrapper
pub mod record;

/// Column metadata and field resolution
pub mod schema;

/// Validation cycle
pub mod validation;

pub use adapter::{AdaptedField, AdapterBuilder, AdapterError, NowPolicy, StringAccessors, TimestampStringAdapter};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use errors::Errors;
pub use format::DisplayFormat;
pub use model::{AccessorState, SplitInput, TimestampModel};
pub use record::Record;
pub use schema::{Column, ColumnKind, EntitySchema, SchemaSource, StaticSchema};
pub use validation::Validations;
