//! Configuration inference
//!
//! Geometry attribution follows the standard's ownership rules: a bin that
//! is a direct child of a function or of the device root carries data that
//! is physically distributed through the parent structure, and connector
//! and navigation records likewise describe the parent element. Their
//! geometry lands on the parent's configuration; every other node owns its
//! own. Configurations are created on first access and cached on the
//! catalog, one per owning element.

use furrow_core::{
    Catalog, DeviceElement, DeviceElementConfiguration, DeviceElementKind, ElementId, Hierarchy,
    HierarchyNode, ImplementConfiguration, MachineConfiguration, NodeIndex, NumericValue,
    SectionConfiguration, WireElementKind,
};
use tracing::debug;

use crate::error::MapError;

/// Resolve the configuration owning the geometry attached to `node`,
/// creating it on first access.
///
/// `element` is the canonical element materialized from `node` (for the
/// root's own geometry, the root element). Returns the configuration's
/// record id, or `None` when the owning element's kind has no
/// configuration variant.
pub fn configuration_for(
    catalog: &mut Catalog,
    element: &DeviceElement,
    hierarchy: &Hierarchy,
    node: NodeIndex,
) -> Result<Option<ElementId>, MapError> {
    let (owner_id, owner_node) = if parent_owns_geometry(hierarchy, node) {
        let parent = hierarchy
            .parent(node)
            .ok_or_else(|| MapError::UnresolvedReference(hierarchy.node(node).wire_id.clone()))?;
        (element.parent_id, parent.index)
    } else {
        (element.id, node)
    };

    if let Some(existing) = catalog.configuration_for(owner_id) {
        return Ok(Some(existing.id()));
    }

    let owner = catalog
        .element(owner_id)
        .ok_or(MapError::UnknownElement(owner_id))?
        .clone();
    build_configuration(catalog, &owner, hierarchy, owner_node)
}

/// Whether the node's geometry legally belongs to its parent element
fn parent_owns_geometry(hierarchy: &Hierarchy, index: NodeIndex) -> bool {
    match hierarchy.node(index).kind {
        WireElementKind::Connector | WireElementKind::Navigation => true,
        WireElementKind::Bin => hierarchy.parent(index).is_some_and(|parent| {
            matches!(
                parent.kind,
                WireElementKind::Function | WireElementKind::Device
            )
        }),
        _ => false,
    }
}

fn build_configuration(
    catalog: &mut Catalog,
    owner: &DeviceElement,
    hierarchy: &Hierarchy,
    node: NodeIndex,
) -> Result<Option<ElementId>, MapError> {
    let configuration = match owner.kind {
        DeviceElementKind::Machine => Some(machine_configuration(catalog, owner, hierarchy, node)),
        DeviceElementKind::Implement => {
            Some(implement_configuration(catalog, owner, hierarchy, node))
        }
        DeviceElementKind::Function => {
            // A function nested under another function is a sub-unit of the
            // implement; a top-level function is the implement itself
            let parent_is_function = hierarchy
                .parent(node)
                .is_some_and(|parent| parent.kind == WireElementKind::Function);
            if parent_is_function {
                Some(section_configuration(catalog, owner, hierarchy, node))
            } else {
                Some(implement_configuration(catalog, owner, hierarchy, node))
            }
        }
        DeviceElementKind::Section | DeviceElementKind::Unit => {
            Some(section_configuration(catalog, owner, hierarchy, node))
        }
        DeviceElementKind::Bin => {
            debug!(element = %owner.id, "bin-owned geometry has no configuration variant");
            None
        }
    };

    match configuration {
        Some(configuration) => {
            let id = configuration.id();
            catalog.insert_configuration(configuration);
            Ok(Some(id))
        }
        None => Ok(None),
    }
}

/// X then Y then Z, only present entries
fn generic_offsets(node: &HierarchyNode) -> Vec<NumericValue> {
    [
        node.geometry.x_offset,
        node.geometry.y_offset,
        node.geometry.z_offset,
    ]
    .into_iter()
    .flatten()
    .map(|geometry| geometry.value)
    .collect()
}

fn machine_configuration(
    catalog: &mut Catalog,
    owner: &DeviceElement,
    hierarchy: &Hierarchy,
    index: NodeIndex,
) -> DeviceElementConfiguration {
    let node = hierarchy.node(index);
    let navigation = hierarchy.navigation_child(index);
    DeviceElementConfiguration::Machine(MachineConfiguration {
        id: catalog.allocate_id(),
        element_id: owner.id,
        description: node.designator.clone(),
        offsets: generic_offsets(node),
        gps_receiver_x_offset: navigation.and_then(|n| n.geometry.x_offset.map(|g| g.value)),
        gps_receiver_y_offset: navigation.and_then(|n| n.geometry.y_offset.map(|g| g.value)),
        gps_receiver_z_offset: navigation.and_then(|n| n.geometry.z_offset.map(|g| g.value)),
    })
}

fn implement_configuration(
    catalog: &mut Catalog,
    owner: &DeviceElement,
    hierarchy: &Hierarchy,
    index: NodeIndex,
) -> DeviceElementConfiguration {
    let node = hierarchy.node(index);
    DeviceElementConfiguration::Implement(ImplementConfiguration {
        id: catalog.allocate_id(),
        element_id: owner.id,
        description: node.designator.clone(),
        offsets: generic_offsets(node),
        physical_width: node.geometry.width.map(|g| g.value),
        row_width: hierarchy.lowest_level_section_width(index),
    })
}

fn section_configuration(
    catalog: &mut Catalog,
    owner: &DeviceElement,
    hierarchy: &Hierarchy,
    index: NodeIndex,
) -> DeviceElementConfiguration {
    let node = hierarchy.node(index);
    let inline_offset = node.geometry.x_offset.map(|g| g.value);
    let lateral_offset = node.geometry.y_offset.map(|g| g.value);

    // The explicit inline/lateral offsets also appear in the generic list
    let mut offsets = Vec::new();
    offsets.extend(inline_offset);
    offsets.extend(lateral_offset);

    DeviceElementConfiguration::Section(SectionConfiguration {
        id: catalog.allocate_id(),
        element_id: owner.id,
        description: node.designator.clone(),
        offsets,
        section_width: node.geometry.width.map(|g| g.value),
        inline_offset,
        lateral_offset,
    })
}
