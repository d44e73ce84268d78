//! Mapping failures surfaced by the import and export entry points

use furrow_core::{ElementId, RegistryError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MapError {
    /// A required parent or device id has no registry entry. Defaulting
    /// here would corrupt parent/child integrity, so the offending wire id
    /// is surfaced instead.
    #[error("Unresolved identifier reference: {0}")]
    UnresolvedReference(String),
    #[error("No canonical device element with id {0}")]
    UnknownElement(ElementId),
    /// The wire element has no canonical device element counterpart and
    /// cannot go through single-element import
    #[error("Wire element {0} has no canonical counterpart")]
    UnmodeledElement(String),
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    /// The export order contract was violated: every element must be
    /// listed after its parent
    #[error("Device element {element} listed before its parent {parent}")]
    ExportOrderViolation {
        element: ElementId,
        parent: ElementId,
    },
}
