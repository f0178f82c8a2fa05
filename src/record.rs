//! SeaORM models as [`TimestampModel`]s.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};
use log::warn;
use sea_orm::sea_query::ValueType;
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, Value};

use crate::errors::Errors;
use crate::model::{AccessorState, TimestampModel};

type ColumnOf<M> = <<M as ModelTrait>::Entity as EntityTrait>::Column;

/// A SeaORM model paired with its validation errors and accessor state.
///
/// Fields are looked up by column name. Naive columns are read and written
/// as they are. Zoned columns (`DateTimeUtc`, `DateTimeLocal`,
/// `DateTimeWithTimeZone`) expose their wall-clock time and are written back
/// in the same Rust type, keeping the stored offset (UTC when the field is
/// empty).
///
/// A non-nullable column is never cleared: writing `None` to it, whether from
/// blank input or a rejected string, leaves the previous value in place and
/// logs a warning. Rejected input is still recorded as an error on the string
/// accessor.
#[derive(Debug, Clone)]
pub struct Record<M> {
    model: M,
    errors: Errors,
    state: AccessorState,
}

impl<M: ModelTrait> Record<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            errors: Errors::new(),
            state: AccessorState::new(),
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    fn column(field: &str) -> Option<ColumnOf<M>> {
        ColumnOf::<M>::from_str(field).ok()
    }
}

impl<M: ModelTrait> TimestampModel for Record<M> {
    fn timestamp(&self, field: &str) -> Option<NaiveDateTime> {
        let value = self.model.get(Self::column(field)?);
        match value {
            Value::ChronoDateTimeWithTimeZone(_) => <Option<DateTime<FixedOffset>> as ValueType>::try_from(value)
                .ok()
                .flatten()
                .map(|zoned| zoned.naive_local()),
            Value::ChronoDateTimeLocal(_) => <Option<DateTime<Local>> as ValueType>::try_from(value)
                .ok()
                .flatten()
                .map(|local| local.naive_local()),
            Value::ChronoDateTimeUtc(_) => <Option<DateTime<Utc>> as ValueType>::try_from(value)
                .ok()
                .flatten()
                .map(|utc| utc.naive_utc()),
            _ => <Option<NaiveDateTime> as ValueType>::try_from(value).ok().flatten(),
        }
    }

    fn set_timestamp(&mut self, field: &str, value: Option<NaiveDateTime>) {
        let Some(column) = Self::column(field) else {
            warn!("Model has no column named {}", field);
            return;
        };
        if value.is_none() && !column.def().is_null() {
            warn!("Cannot clear non-nullable column {}, keeping its value", field);
            return;
        }
        let current = self.model.get(column);
        let value = match current {
            Value::ChronoDateTimeWithTimeZone(_) => {
                let offset = <Option<DateTime<FixedOffset>> as ValueType>::try_from(current)
                    .ok()
                    .flatten()
                    .map(|zoned| *zoned.offset())
                    .unwrap_or_else(|| Utc.fix());
                Value::from(value.and_then(|naive| offset.from_local_datetime(&naive).single()))
            }
            Value::ChronoDateTimeLocal(_) => {
                let local = match value.map(|naive| Local.from_local_datetime(&naive).earliest()) {
                    Some(None) => {
                        warn!("Time written to {} does not exist in the local time zone", field);
                        return;
                    }
                    other => other.flatten(),
                };
                Value::from(local)
            }
            Value::ChronoDateTimeUtc(_) => Value::from(value.map(|naive| Utc.from_utc_datetime(&naive))),
            _ => Value::from(value),
        };
        self.model.set(column, value);
    }

    fn errors(&self) -> &Errors {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut Errors {
        &mut self.errors
    }

    fn accessor_state(&mut self) -> &mut AccessorState {
        &mut self.state
    }
}
