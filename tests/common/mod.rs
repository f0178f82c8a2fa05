#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use chronoform::{
    AccessorState, DisplayFormat, Errors, FixedClock, Record, StaticSchema, StringAccessors, TimestampModel,
    TimestampStringAdapter,
};
use once_cell::sync::Lazy;

pub mod businessman {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
    #[sea_orm(table_name = "businessmen")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub kind: String,
        pub woke_at: Option<DateTime>,
        pub brushed_teeth_at: Option<DateTime>,
        pub showered_at: Option<DateTime>,
        pub ate_at: Option<DateTime>,
        pub slept_at: Option<DateTime>,
        pub departed_at: Option<DateTimeUtc>,
        pub arrived_at: Option<DateTimeWithTimeZone>,
        pub created_at: DateTime,
        pub updated_at: Option<DateTimeUtc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, s).unwrap()
}

/// The instant every test clock is pinned to.
pub fn now() -> NaiveDateTime {
    at(2025, 1, 15, 9, 45, 0)
}

pub fn clock() -> FixedClock {
    FixedClock(now())
}

pub fn businessman() -> Record<businessman::Model> {
    Record::new(businessman::Model {
        id: 1,
        kind: "Businessman".to_string(),
        woke_at: None,
        brushed_teeth_at: None,
        showered_at: None,
        ate_at: None,
        slept_at: None,
        departed_at: None,
        arrived_at: None,
        created_at: at(2008, 4, 1, 0, 0, 0),
        updated_at: None,
    })
}

/// Adapter for every inferred timestamp field of a businessman.
pub fn thorough() -> TimestampStringAdapter {
    TimestampStringAdapter::builder()
        .clock(clock())
        .build_for::<businessman::Entity>()
        .unwrap()
}

/// Adapter for an explicit subset of businessman fields.
pub fn clean_but_hungry() -> TimestampStringAdapter {
    TimestampStringAdapter::builder()
        .fields(["brushed_teeth_at", "showered_at"])
        .clock(clock())
        .build_for::<businessman::Entity>()
        .unwrap()
}

pub fn well_fed_smelly() -> TimestampStringAdapter {
    TimestampStringAdapter::builder()
        .fields(["ate_at"])
        .clock(clock())
        .build_for::<businessman::Entity>()
        .unwrap()
}

/// A hand-written model with split accessors.
#[derive(Debug, Default)]
pub struct NewsItem {
    pub published_at: Option<NaiveDateTime>,
    pub archived_at: Option<NaiveDateTime>,
    pub errors: Errors,
    pub state: AccessorState,
}

impl TimestampModel for NewsItem {
    fn timestamp(&self, field: &str) -> Option<NaiveDateTime> {
        match field {
            "published_at" => self.published_at,
            "archived_at" => self.archived_at,
            _ => None,
        }
    }

    fn set_timestamp(&mut self, field: &str, value: Option<NaiveDateTime>) {
        match field {
            "published_at" => self.published_at = value,
            "archived_at" => self.archived_at = value,
            _ => {}
        }
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

pub static NEWS_ITEM_ADAPTER: Lazy<TimestampStringAdapter> = Lazy::new(|| {
    TimestampStringAdapter::builder()
        .fields(["published_at", "archived_at"])
        .format(DisplayFormat::split("%Y-%m-%d", "%H:%M"))
        .split(true)
        .clock(clock())
        .build(&StaticSchema::missing())
        .expect("news item adapter")
});

impl StringAccessors for NewsItem {
    fn string_adapter() -> &'static TimestampStringAdapter {
        &NEWS_ITEM_ADAPTER
    }
}
