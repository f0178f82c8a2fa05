//! Column metadata and timestamp field resolution.
//!
//! When an adapter is declared without an explicit field list it adapts every
//! timestamp column of the table, less the `created_at` / `updated_at`
//! bookkeeping columns. Column metadata comes from a [`SchemaSource`]; for
//! SeaORM entities that is [`EntitySchema`].

use std::marker::PhantomData;

use log::{debug, warn};
use sea_orm::{ColumnTrait, ColumnType, EntityTrait, IdenStatic, Iterable};

use crate::constants::BOOKKEEPING_FIELDS;

/// Coarse column type, as far as field resolution cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Date,
    Time,
    Text,
    Integer,
    Boolean,
    Other,
}

impl From<&ColumnType> for ColumnKind {
    fn from(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
                ColumnKind::Timestamp
            }
            ColumnType::Date => ColumnKind::Date,
            ColumnType::Time => ColumnKind::Time,
            ColumnType::Char(_) | ColumnType::String(_) | ColumnType::Text => ColumnKind::Text,
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => ColumnKind::Integer,
            ColumnType::Boolean => ColumnKind::Boolean,
            _ => ColumnKind::Other,
        }
    }
}

/// A named, typed table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Table metadata for one model type.
pub trait SchemaSource {
    /// Whether the backing table exists yet.
    fn table_exists(&self) -> bool;

    fn columns(&self) -> Vec<Column>;
}

/// Columns declared on a SeaORM entity.
///
/// Entity definitions are compiled in, so the table always counts as present.
pub struct EntitySchema<E>(PhantomData<E>);

impl<E: EntityTrait> EntitySchema<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E: EntityTrait> Default for EntitySchema<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityTrait> SchemaSource for EntitySchema<E> {
    fn table_exists(&self) -> bool {
        true
    }

    fn columns(&self) -> Vec<Column> {
        E::Column::iter()
            .map(|column| Column::new(column.as_str(), ColumnKind::from(column.def().get_column_type())))
            .collect()
    }
}

/// A hand-written table description.
///
/// Useful when the table is created later, e.g. while migrations are still
/// pending, in which case [`StaticSchema::missing`] resolves no fields.
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    exists: bool,
    columns: Vec<Column>,
}

impl StaticSchema {
    pub fn new() -> Self {
        Self {
            exists: true,
            columns: Vec::new(),
        }
    }

    /// A table that has not been created.
    pub fn missing() -> Self {
        Self::default()
    }

    pub fn column(mut self, name: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.push(Column::new(name, kind));
        self
    }
}

impl SchemaSource for StaticSchema {
    fn table_exists(&self) -> bool {
        self.exists
    }

    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }
}

/// Decide which fields get string accessors.
///
/// A non-empty `explicit` list is used verbatim. Otherwise every timestamp
/// column is taken, minus the bookkeeping columns; a missing table yields no
/// fields.
pub fn resolve_fields(explicit: &[String], schema: &dyn SchemaSource) -> Vec<String> {
    if !explicit.is_empty() {
        return explicit.to_vec();
    }

    if !schema.table_exists() {
        warn!("Table does not exist yet, no timestamp fields adapted");
        return Vec::new();
    }

    let fields: Vec<String> = schema
        .columns()
        .into_iter()
        .filter(|column| column.kind == ColumnKind::Timestamp)
        .map(|column| column.name)
        .filter(|name| !BOOKKEEPING_FIELDS.contains(&name.as_str()))
        .collect();

    debug!("Inferred timestamp fields: {}", fields.join(", "));
    fields
}
