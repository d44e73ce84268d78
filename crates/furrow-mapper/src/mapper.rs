//! Import and export orchestration for device element trees
//!
//! Import walks the hierarchy strictly by increasing depth so every
//! parent is materialized and registered before its children; every
//! identifier lookup downstream depends on that order. Export runs in the
//! opposite direction and requires the caller to list elements in
//! topological order, which is checked up front rather than assumed.

use std::collections::HashSet;

use furrow_core::{
    Catalog, DeviceElement, ElementId, Hierarchy, HierarchyNode, IdentifierRegistry, MachineType,
    OperationTypeIndex, WireDevice, WireDeviceElement, WireElementKind,
};
use tracing::{debug, warn};

use crate::error::MapError;
use crate::kind::{self, KindMapping};
use crate::name;
use crate::{config, connector};

/// Prefix for generated wire-format device element identifiers
const WIRE_ID_PREFIX: &str = "DET";

/// Maps device element trees between the wire format and the canonical
/// model. Borrows the session's catalog and identifier registry; callers
/// serialize access per model instance.
pub struct DeviceElementMapper<'a> {
    catalog: &'a mut Catalog,
    registry: &'a mut IdentifierRegistry,
    operation_types: &'a OperationTypeIndex,
    next_wire_id: u16,
}

impl<'a> DeviceElementMapper<'a> {
    pub fn new(
        catalog: &'a mut Catalog,
        registry: &'a mut IdentifierRegistry,
        operation_types: &'a OperationTypeIndex,
    ) -> Self {
        Self {
            catalog,
            registry,
            operation_types,
            next_wire_id: 1,
        }
    }

    /// Import one device's element tree into the canonical model.
    ///
    /// Returns `Ok(None)` when the hierarchy has no element of device
    /// kind; the caller skips that device and continues with the rest of
    /// the document. The owning device's wire id must already be
    /// registered. Elements materialized before a failure stay in the
    /// catalog; there is no rollback.
    pub fn import_device_elements(
        &mut self,
        device: &WireDevice,
        hierarchy: &Hierarchy,
    ) -> Result<Option<Vec<ElementId>>, MapError> {
        let classification = name::decode_client_name(&device.client_name, self.operation_types);

        // the tree must be rooted at the unique element of device kind
        let device_nodes: Vec<&HierarchyNode> = hierarchy
            .iter()
            .filter(|node| node.kind == WireElementKind::Device)
            .collect();
        if !matches!(device_nodes.as_slice(), [root] if root.parent.is_none()) {
            warn!(device = %device.id, "no unique root element of device kind; skipping device");
            return Ok(None);
        }

        let mut imported = Vec::new();
        for depth in 0..=hierarchy.max_depth() {
            for node in hierarchy.at_depth(depth) {
                if node.kind == WireElementKind::Connector {
                    connector::resolve_connector(self.catalog, self.registry, hierarchy, node.index)?;
                } else {
                    let id = self.import_device_element(device, hierarchy, node, classification)?;
                    imported.push(id);
                }
            }
        }
        Ok(Some(imported))
    }

    /// Import a single hierarchy node as a canonical device element.
    ///
    /// The node's parent must already be registered; connector nodes
    /// belong to [`connector::resolve_connector`] instead.
    pub fn import_device_element(
        &mut self,
        device: &WireDevice,
        hierarchy: &Hierarchy,
        node: &HierarchyNode,
        classification: Option<MachineType>,
    ) -> Result<ElementId, MapError> {
        let id = self.catalog.allocate_id();
        self.registry.insert(&node.wire_id, id)?;

        let device_id = self
            .registry
            .canonical(&device.id)
            .ok_or_else(|| MapError::UnresolvedReference(device.id.clone()))?;

        let parent_id = match node.parent {
            Some(parent) => {
                let parent_wire_id = &hierarchy.node(parent).wire_id;
                self.registry
                    .canonical(parent_wire_id)
                    .ok_or_else(|| MapError::UnresolvedReference(parent_wire_id.clone()))?
            }
            // the root element's parent is the owning device record
            None => device_id,
        };

        let element_kind = match kind::wire_to_canonical(node.kind) {
            KindMapping::Canonical(element_kind) => element_kind,
            KindMapping::Root => {
                let has_navigation_child = hierarchy.navigation_child(node.index).is_some();
                kind::classify_root(classification, self.operation_types, has_navigation_child)
            }
            KindMapping::Unmodeled => {
                return Err(MapError::UnmodeledElement(node.wire_id.clone()));
            }
        };

        let serial_number = (node.kind == WireElementKind::Device)
            .then(|| device.serial_number.clone())
            .flatten();

        let element = DeviceElement {
            id,
            wire_id: Some(node.wire_id.clone()),
            description: node.designator.clone(),
            kind: element_kind,
            parent_id,
            device_id,
            classification,
            serial_number,
        };
        self.catalog.add_element(element.clone());
        debug!(wire_id = %node.wire_id, canonical = %id, "imported device element");

        // Configurations follow geometry presence, not kind
        if !node.geometry.is_empty() {
            config::configuration_for(self.catalog, &element, hierarchy, node.index)?;
        }

        Ok(id)
    }

    /// Export canonical device elements to wire records.
    ///
    /// The caller must list every element after its parent; the contract
    /// is checked before anything is emitted. A parent outside the export
    /// set leaves the record's parent reference unset, a document-level
    /// gap the caller must not let persist.
    pub fn export_device_elements(
        &mut self,
        elements: &[ElementId],
    ) -> Result<Vec<WireDeviceElement>, MapError> {
        self.check_export_order(elements)?;

        let mut exported: Vec<WireDeviceElement> = Vec::new();
        for &id in elements {
            let record = self.export_device_element(id, &exported)?;
            exported.push(record);
        }
        Ok(exported)
    }

    /// Export a single element, resolving its parent against the records
    /// exported so far.
    pub fn export_device_element(
        &mut self,
        id: ElementId,
        exported: &[WireDeviceElement],
    ) -> Result<WireDeviceElement, MapError> {
        let element = self
            .catalog
            .element(id)
            .ok_or(MapError::UnknownElement(id))?
            .clone();

        let wire_id = match self.registry.wire(id).map(str::to_string) {
            Some(existing) => existing,
            None => {
                let generated = self.generate_wire_id();
                self.registry.insert(&generated, id)?;
                generated
            }
        };
        let object_id = exported.len() as u16 + 1;

        let parent_object_id = if let Some(parent) = self.catalog.element(element.parent_id) {
            // parent is another device element; reference it by object id
            let resolved = self.registry.wire(parent.id).and_then(|parent_wire_id| {
                exported
                    .iter()
                    .find(|record| record.id == parent_wire_id)
                    .map(|record| record.object_id)
            });
            if resolved.is_none() {
                warn!(element = %id, parent = %element.parent_id, "parent element not exported; leaving parent reference unset");
            }
            resolved
        } else {
            // parent is the owning device record
            Some(0)
        };

        Ok(WireDeviceElement {
            id: wire_id,
            object_id,
            kind: kind::canonical_to_wire(element.kind),
            designator: element.description.clone(),
            parent_object_id,
            properties: Vec::new(),
        })
    }

    fn check_export_order(&self, elements: &[ElementId]) -> Result<(), MapError> {
        let mut seen = HashSet::new();
        for &id in elements {
            let element = self.catalog.element(id).ok_or(MapError::UnknownElement(id))?;
            let parent_is_element = self.catalog.element(element.parent_id).is_some();
            if parent_is_element
                && elements.contains(&element.parent_id)
                && !seen.contains(&element.parent_id)
            {
                return Err(MapError::ExportOrderViolation {
                    element: id,
                    parent: element.parent_id,
                });
            }
            seen.insert(id);
        }
        Ok(())
    }

    fn generate_wire_id(&mut self) -> String {
        // skip identifiers already taken by imported records
        loop {
            let candidate = format!("{WIRE_ID_PREFIX}{}", self.next_wire_id);
            self.next_wire_id += 1;
            if self.registry.canonical(&candidate).is_none() {
                return candidate;
            }
        }
    }
}
