//! Session-scoped bidirectional identifier map
//!
//! Wire identifiers and canonical reference ids live in independent id
//! spaces; the registry is the only bridge between them. It is append-only
//! within a session and passed explicitly through every operation that
//! needs it; there is no process-wide state.

use std::collections::HashMap;
use thiserror::Error;

use crate::model::ElementId;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Wire identifier {0} is already registered")]
    WireIdRegistered(String),
    #[error("Canonical identifier {0} is already registered")]
    CanonicalIdRegistered(ElementId),
}

/// Insert-once map between wire-format identifiers and canonical ids
#[derive(Debug, Clone, Default)]
pub struct IdentifierRegistry {
    to_canonical: HashMap<String, ElementId>,
    to_wire: HashMap<ElementId, String>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a wire id / canonical id pair. Either side being present
    /// already is an error; entries are never replaced.
    pub fn insert(&mut self, wire_id: &str, id: ElementId) -> Result<(), RegistryError> {
        if self.to_canonical.contains_key(wire_id) {
            return Err(RegistryError::WireIdRegistered(wire_id.to_string()));
        }
        if self.to_wire.contains_key(&id) {
            return Err(RegistryError::CanonicalIdRegistered(id));
        }
        self.to_canonical.insert(wire_id.to_string(), id);
        self.to_wire.insert(id, wire_id.to_string());
        Ok(())
    }

    /// Forward lookup: wire id to canonical id
    pub fn canonical(&self, wire_id: &str) -> Option<ElementId> {
        self.to_canonical.get(wire_id).copied()
    }

    /// Reverse lookup: canonical id to wire id
    pub fn wire(&self, id: ElementId) -> Option<&str> {
        self.to_wire.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.to_canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_canonical.is_empty()
    }
}
