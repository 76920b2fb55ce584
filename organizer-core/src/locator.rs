//! Where the shared database container lives.

use crate::error::{OrganizerError, OrganizerResult};
use std::path::{Path, PathBuf};

/// Resolves the directory shared between the app and its extensions.
pub trait ContainerLocator {
    fn container_dir(&self) -> OrganizerResult<PathBuf>;
}

/// A container at a known path, e.g. from configuration or a test tempdir.
#[derive(Clone, Debug)]
pub struct FixedContainer(PathBuf);

impl FixedContainer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self(dir.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl ContainerLocator for FixedContainer {
    fn container_dir(&self) -> OrganizerResult<PathBuf> {
        if self.0.as_os_str().is_empty() {
            return Err(OrganizerError::Container("empty path".into()));
        }
        Ok(self.0.clone())
    }
}
