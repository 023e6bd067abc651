//! Output boundary traits
//!
//! Exporters turn a forest into a document; writing it to disk is shared.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::domain::Forest;
use crate::infrastructure::{InfraError, InfraResult};

/// Serializes a forest into a textual document.
pub trait ForestExporter: Send + Sync {
    /// Short format name used in logs.
    fn format(&self) -> &'static str;

    /// Render the whole forest. Must be deterministic.
    fn render(&self, forest: &Forest) -> InfraResult<String>;

    /// Render and write to `path`, creating parent directories. Returns the document.
    fn write_to_path(&self, forest: &Forest, path: &Path) -> InfraResult<String> {
        let document = self.render(forest)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| InfraError::CannotCreate {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        fs::write(path, &document).map_err(|e| InfraError::CannotCreate {
            path: path.display().to_string(),
            source: e,
        })?;
        debug!(format = self.format(), path = %path.display(), bytes = document.len(), "document written");
        Ok(document)
    }
}
