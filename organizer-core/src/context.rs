//! Process-wide persistence context.

use crate::config::OrganizerConfig;
use crate::error::OrganizerResult;
use crate::locator::{ContainerLocator, FixedContainer};
use organizer_activity::{ActivityAggregator, AggregatorConfig};
use organizer_storage::{
    current_schema_version, ActivityLogRepository, CascadeDeleter, CascadeReport, Database,
    MigrationError, MigrationOutcome, MigrationRunner, Repositories, SettingsStore,
    DEFAULT_CURRENCY_KEY,
};
use organizer_types::ProjectId;
use tracing::{error, info, warn};

/// Result of bringing the schema up to date at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaState {
    /// Every known migration is applied.
    Current { version: u32 },
    /// Migration stopped early or was refused. The store is usable at
    /// `version`; tables from later units may be missing.
    Degraded { version: u32, reason: String },
}

impl SchemaState {
    pub fn version(&self) -> u32 {
        match self {
            SchemaState::Current { version } | SchemaState::Degraded { version, .. } => *version,
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, SchemaState::Current { .. })
    }
}

/// Owns the database handle and everything built on it. Create one at
/// startup and share it.
#[derive(Debug)]
pub struct AppContext {
    config: OrganizerConfig,
    db: Database,
    repos: Repositories,
    settings: SettingsStore,
    cascade: CascadeDeleter,
    aggregator: ActivityAggregator<ActivityLogRepository>,
    schema_state: SchemaState,
}

impl AppContext {
    /// Open the database named by `config` and migrate it. Only a failure to
    /// open the database is an error; migration problems leave the context
    /// in [`SchemaState::Degraded`].
    pub fn bootstrap(config: OrganizerConfig) -> OrganizerResult<Self> {
        match config.container_dir.clone() {
            Some(dir) => Self::bootstrap_with(config, &FixedContainer::new(dir)),
            None => {
                config.validate()?;
                let db = Database::open_in_memory()?;
                Ok(Self::assemble(config, db, &MigrationRunner::builtin()))
            }
        }
    }

    /// Like [`Self::bootstrap`], with the container resolved by `locator`.
    pub fn bootstrap_with(
        config: OrganizerConfig,
        locator: &dyn ContainerLocator,
    ) -> OrganizerResult<Self> {
        config.validate()?;
        let dir = locator.container_dir()?;
        let db = Database::open(&dir.join(&config.database_file))?;
        Ok(Self::assemble(config, db, &MigrationRunner::builtin()))
    }

    /// Bootstrap over an already-open handle with a custom registry.
    pub fn with_database(
        config: OrganizerConfig,
        db: Database,
        runner: &MigrationRunner,
    ) -> OrganizerResult<Self> {
        config.validate()?;
        Ok(Self::assemble(config, db, runner))
    }

    fn assemble(config: OrganizerConfig, db: Database, runner: &MigrationRunner) -> Self {
        let settings = SettingsStore::new(db.clone());
        seed_settings(&settings, &config);
        let schema_state = migrate(&db, runner);

        let repos = Repositories::new(&db);
        let aggregator = ActivityAggregator::new(
            repos.activity_logs.clone(),
            AggregatorConfig::with_offset_seconds(config.utc_offset_seconds),
        );
        let cascade = CascadeDeleter::new(repos.clone());

        info!(
            path = ?db.path(),
            version = schema_state.version(),
            current = schema_state.is_current(),
            "Organizer store ready"
        );
        Self {
            config,
            db,
            repos,
            settings,
            cascade,
            aggregator,
            schema_state,
        }
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn repos(&self) -> &Repositories {
        &self.repos
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn cascade(&self) -> &CascadeDeleter {
        &self.cascade
    }

    pub fn aggregator(&self) -> &ActivityAggregator<ActivityLogRepository> {
        &self.aggregator
    }

    /// Outcome of the startup migration run.
    pub fn schema_state(&self) -> &SchemaState {
        &self.schema_state
    }

    /// Version recorded in the ledger right now.
    pub fn current_schema_version(&self) -> u32 {
        current_schema_version(&self.db)
    }

    /// Cascade-delete one project. Refused while the schema is degraded.
    pub fn delete_project(&self, project_id: &ProjectId) -> Option<CascadeReport> {
        if !self.schema_state.is_current() {
            warn!(%project_id, "Schema degraded, refusing project delete");
            return None;
        }
        Some(self.cascade.delete_project_cascade_report(project_id))
    }
}

/// The settings table sits outside the ledger so the configured currency
/// lands before unit 1 seeds its own default.
fn seed_settings(settings: &SettingsStore, config: &OrganizerConfig) {
    if let Err(e) = settings.ensure_table() {
        warn!(error = %e, "Could not create settings table");
        return;
    }
    match settings.set_if_absent(DEFAULT_CURRENCY_KEY, &config.default_currency) {
        Ok(true) => info!(currency = %config.default_currency, "Default currency set"),
        Ok(false) => {}
        Err(e) => warn!(error = %e, "Could not seed default currency"),
    }
}

fn migrate(db: &Database, runner: &MigrationRunner) -> SchemaState {
    match runner.migrate_to_latest(db) {
        Ok(MigrationOutcome::UpToDate { version }) => SchemaState::Current { version },
        Ok(MigrationOutcome::Applied { to, .. }) => SchemaState::Current { version: to },
        Err(e) => {
            let version = current_schema_version(db);
            match &e {
                MigrationError::VersionSkew { .. } => {
                    error!(error = %e, "Store written by a newer build")
                }
                _ => error!(error = %e, version, "Continuing with partial schema"),
            }
            SchemaState::Degraded {
                version,
                reason: e.to_string(),
            }
        }
    }
}
