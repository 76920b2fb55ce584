//! Startup wiring for the project organizer.
//!
//! [`AppContext::bootstrap`] opens the shared database, brings the schema up
//! to date, and hands out the repositories, settings, cascade deleter, and
//! activity aggregator built over the one connection.

mod config;
mod context;
mod error;
mod locator;
mod logging;

pub use config::{
    OrganizerConfig, ENV_CONTAINER_DIR, ENV_DB_FILE, ENV_DEFAULT_CURRENCY, ENV_LOG,
    ENV_UTC_OFFSET_SECS,
};
pub use context::{AppContext, SchemaState};
pub use error::{OrganizerError, OrganizerResult};
pub use locator::{ContainerLocator, FixedContainer};
pub use logging::init_logging;
