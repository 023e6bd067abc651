//! Infrastructure layer: exporters and file output
//!
//! This layer turns generated forests into documents and writes them to disk.

pub mod error;
pub mod traits;
pub mod xml;

pub use error::{InfraError, InfraResult};
pub use traits::ForestExporter;
pub use xml::XmlExporter;
