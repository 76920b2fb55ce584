//! Tests for application bootstrap.

use chrono::NaiveDate;
use organizer_activity::{ActivityRange, Granularity};
use organizer_core::{
    init_logging, AppContext, FixedContainer, OrganizerConfig, OrganizerError, SchemaState,
};
use organizer_storage::{
    builtin_migrations, Database, Migration, MigrationRunner, ProjectScopedRepository, Repository,
};
use organizer_types::{Note, Project};
use pretty_assertions::assert_eq;
use rusqlite::Connection;

fn broken_unit(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("CREATE TABLE half_done (id TEXT); THIS IS NOT SQL;")
}

// ── In-memory ────────────────────────────────────────────────────

#[test]
fn default_config_bootstraps_in_memory() {
    init_logging("warn");
    let ctx = AppContext::bootstrap(OrganizerConfig::default()).unwrap();
    assert_eq!(ctx.schema_state(), &SchemaState::Current { version: 5 });
    assert_eq!(ctx.current_schema_version(), 5);
    assert!(ctx.database().path().is_none());
    assert_eq!(ctx.settings().default_currency(), "USD");
}

#[test]
fn logging_init_is_repeatable() {
    init_logging("info");
    init_logging("debug");
}

#[test]
fn configured_currency_wins_on_first_launch() {
    let config = OrganizerConfig {
        default_currency: "EUR".into(),
        ..OrganizerConfig::default()
    };
    let ctx = AppContext::bootstrap(config).unwrap();
    assert_eq!(ctx.settings().default_currency(), "EUR");
}

#[test]
fn invalid_config_is_rejected() {
    let config = OrganizerConfig {
        default_currency: "euro".into(),
        ..OrganizerConfig::default()
    };
    assert!(matches!(
        AppContext::bootstrap(config),
        Err(OrganizerError::Config(_))
    ));
}

#[test]
fn empty_container_path_is_an_error() {
    let result =
        AppContext::bootstrap_with(OrganizerConfig::default(), &FixedContainer::new(""));
    assert!(matches!(result, Err(OrganizerError::Container(_))));
}

// ── File-backed ──────────────────────────────────────────────────

#[test]
fn data_and_settings_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = OrganizerConfig {
        container_dir: Some(dir.path().to_path_buf()),
        default_currency: "EUR".into(),
        ..OrganizerConfig::default()
    };
    let project = Project::new("Garden");
    {
        let ctx = AppContext::bootstrap(config.clone()).unwrap();
        assert!(ctx.repos().projects.insert(&project));
        assert_eq!(
            ctx.database().path(),
            Some(dir.path().join("organizer.sqlite").as_path())
        );
    }

    // A changed config does not overwrite the stored choice.
    let reopened = OrganizerConfig {
        default_currency: "GBP".into(),
        ..config
    };
    let ctx = AppContext::bootstrap(reopened).unwrap();
    assert_eq!(ctx.schema_state(), &SchemaState::Current { version: 5 });
    assert_eq!(ctx.repos().projects.fetch_by_id(&project.id), Some(project));
    assert_eq!(ctx.settings().default_currency(), "EUR");
}

#[test]
fn custom_database_file_name() {
    let dir = tempfile::tempdir().unwrap();
    let config = OrganizerConfig {
        database_file: "other.sqlite".into(),
        ..OrganizerConfig::default()
    };
    let ctx = AppContext::bootstrap_with(config, &FixedContainer::new(dir.path())).unwrap();
    assert!(ctx.schema_state().is_current());
    assert!(dir.path().join("other.sqlite").exists());
}

// ── Degraded schema ──────────────────────────────────────────────

#[test]
fn version_skew_keeps_running_degraded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("organizer.sqlite");
    {
        let db = Database::open(&path).unwrap();
        db.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE migrations (sequence INTEGER PRIMARY KEY, applied_at INTEGER NOT NULL);
                 INSERT INTO migrations (sequence, applied_at) VALUES (9, 0);",
            )
            .unwrap();
        });
    }

    let config = OrganizerConfig {
        container_dir: Some(dir.path().to_path_buf()),
        ..OrganizerConfig::default()
    };
    let ctx = AppContext::bootstrap(config).unwrap();
    match ctx.schema_state() {
        SchemaState::Degraded { version, reason } => {
            assert_eq!(*version, 9);
            assert!(reason.contains('9'));
        }
        other => panic!("expected degraded schema, got {other:?}"),
    }
    assert!(ctx.delete_project(&Project::new("x").id).is_none());
    // Reads against tables that were never created come back empty.
    assert!(ctx.repos().projects.fetch_all().is_empty());
}

#[test]
fn failed_unit_leaves_earlier_units_usable() {
    let mut units: Vec<Migration> = builtin_migrations().into_iter().take(2).collect();
    units.push(Migration {
        version: 3,
        description: "broken",
        up: broken_unit,
    });
    let runner = MigrationRunner::new(units).unwrap();
    let db = Database::open_in_memory().unwrap();

    let ctx = AppContext::with_database(OrganizerConfig::default(), db, &runner).unwrap();
    assert!(matches!(
        ctx.schema_state(),
        SchemaState::Degraded { version: 2, .. }
    ));
    assert_eq!(ctx.current_schema_version(), 2);

    let project = Project::new("still works");
    assert!(ctx.repos().projects.insert(&project));
    assert!(!ctx.repos().notes.insert(&Note::new(project.id, "n", "")));
    assert!(ctx.repos().notes.fetch_by_project_id(&project.id).is_empty());
    assert_eq!(ctx.settings().default_currency(), "USD");
}

// ── Wiring ───────────────────────────────────────────────────────

#[test]
fn context_wires_cascade_and_aggregator() {
    let config = OrganizerConfig {
        utc_offset_seconds: 3600,
        ..OrganizerConfig::default()
    };
    let ctx = AppContext::bootstrap(config).unwrap();
    assert_eq!(ctx.aggregator().config().utc_offset.local_minus_utc(), 3600);

    let project = Project::new("Deck");
    assert!(ctx.repos().projects.insert(&project));
    assert!(ctx.repos().notes.insert(&Note::new(project.id, "wood", "")));
    ctx.repos()
        .activity_logs
        .record(&project.id, organizer_types::ActivityKind::Created, None)
        .unwrap();

    let today = ctx.aggregator().today();
    let points = ctx.aggregator().aggregate_at(
        &project.id,
        ActivityRange::LastDays(3),
        Granularity::Daily,
        today,
    );
    assert_eq!(points.len(), 3);
    assert_eq!(points.iter().map(|p| p.count).sum::<i64>(), 1);

    let report = ctx.delete_project(&project.id).unwrap();
    assert!(report.succeeded());
    assert_eq!(ctx.repos().notes.count(), 0);
    assert_eq!(ctx.repos().activity_logs.count(), 0);

    let range = ActivityRange::days_from(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 7);
    assert_eq!(
        ctx.aggregator()
            .weekly_activity_counts(&project.id, range)
            .len(),
        1
    );
}
