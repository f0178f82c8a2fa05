mod common;

use chronoform::{Record, TimestampModel, TimestampStringAdapter, Validations};
use common::{businessman, clock, well_fed_smelly, NewsItem, NEWS_ITEM_ADAPTER};

#[test]
fn test_error_chaining() {
    let adapter = well_fed_smelly();
    let mut validations = Validations::new();
    validations.validates_presence_of("ate_at");
    adapter.register(&mut validations);

    let mut dirty_man = businessman();
    assert!(!validations.run(&mut dirty_man));
    assert_eq!(dirty_man.errors().on("ate_at"), ["can't be blank"]);
    assert_eq!(dirty_man.errors().on("ate_at_string"), ["can't be blank"]);
}

#[test]
fn test_mirroring_copies_custom_validator_errors() {
    let adapter = well_fed_smelly();
    let mut validations: Validations<Record<businessman::Model>> = Validations::new();
    validations.validate_with(|model, errors| {
        if let Some(ate_at) = model.timestamp("ate_at") {
            if ate_at.date() < model.model().created_at.date() {
                errors.add("ate_at", "is before the record was created");
            }
        }
    });
    adapter.register(&mut validations);

    let mut man = businessman();
    adapter.write(&mut man, "ate_at", "March 1, 2008 noon").unwrap();

    assert!(!validations.run(&mut man));
    assert_eq!(man.errors().on("ate_at"), ["is before the record was created"]);
    assert_eq!(man.errors().on("ate_at_string"), ["is before the record was created"]);
    assert_eq!(man.errors().len(), 2);
}

#[test]
fn test_mirroring_runs_once_per_cycle() {
    let adapter = well_fed_smelly();
    let mut validations = Validations::new();
    validations.validates_presence_of("ate_at");
    adapter.register(&mut validations);

    let mut man = businessman();
    validations.run(&mut man);
    validations.run(&mut man);

    assert_eq!(man.errors().on("ate_at_string").len(), 1);
}

#[test]
fn test_valid_model_passes_cleanly() {
    let adapter = well_fed_smelly();
    let mut validations = Validations::new();
    validations.validates_presence_of("ate_at");
    adapter.register(&mut validations);

    let mut man = businessman();
    adapter.write(&mut man, "ate_at", "April 30, 2008 12:15 pm").unwrap();

    assert!(validations.run(&mut man));
    assert!(man.errors().is_empty());
}

#[test]
fn test_rejected_input_survives_validation() {
    let adapter = well_fed_smelly();
    let mut validations = Validations::new();
    adapter.register(&mut validations);

    let mut man = businessman();
    let _ = adapter.write(&mut man, "ate_at", "Every morning");

    assert!(!validations.run(&mut man));
    assert_eq!(man.errors().on("ate_at_string"), ["is invalid"]);
    assert!(man.errors().on("ate_at").is_empty());

    // A later valid write clears the rejection.
    adapter.write(&mut man, "ate_at", "April 30, 2008").unwrap();
    assert!(validations.run(&mut man));
}

#[test]
fn test_split_mode_mirrors_onto_date_accessor() {
    let mut validations = Validations::new();
    validations.validates_presence_of("published_at");
    NEWS_ITEM_ADAPTER.register(&mut validations);

    let mut item = NewsItem::default();
    assert!(!validations.run(&mut item));

    assert_eq!(item.errors.on("published_at"), ["can't be blank"]);
    assert_eq!(item.errors.on("published_at_string"), ["can't be blank"]);
    assert_eq!(item.errors.on("published_date_string"), ["can't be blank"]);
    assert!(item.errors.on("published_time_string").is_empty());
}

#[test]
fn test_mirror_errors_without_validation_cycle() {
    let adapter = TimestampStringAdapter::builder()
        .fields(["woke_at", "slept_at"])
        .clock(clock())
        .build_for::<common::businessman::Entity>()
        .unwrap();
    let mut man = businessman();
    man.errors_mut().add("slept_at", "is too late");
    man.errors_mut().add("slept_at", "is on a weekend");

    adapter.mirror_errors(&mut man);

    assert_eq!(man.errors().on("slept_at"), ["is too late", "is on a weekend"]);
    assert_eq!(man.errors().on("slept_at_string"), ["is too late", "is on a weekend"]);
    assert!(man.errors().on("woke_at_string").is_empty());
    assert_eq!(
        man.errors().full_messages(),
        vec![
            "Slept at is too late",
            "Slept at is on a weekend",
            "Slept at string is too late",
            "Slept at string is on a weekend",
        ]
    );
}
