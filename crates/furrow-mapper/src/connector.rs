//! Connector record resolution
//!
//! Connector records describe hitch geometry, not structure, and have no
//! canonical device element. Per the standard they are always direct
//! children of the root device element; a connector nested anywhere else
//! is ignored. A valid connector becomes a hitch point plus a connector
//! link on the root element's configuration.

use furrow_core::{
    Catalog, Connector, Hierarchy, HitchPoint, HitchType, IdentifierRegistry, NodeIndex,
    ReferencePoint,
};
use tracing::debug;

use crate::config;
use crate::error::MapError;

/// Convert one wire connector record into a hitch point and connector link.
pub fn resolve_connector(
    catalog: &mut Catalog,
    registry: &mut IdentifierRegistry,
    hierarchy: &Hierarchy,
    index: NodeIndex,
) -> Result<(), MapError> {
    let node = hierarchy.node(index);
    let Some(root) = hierarchy.root() else {
        return Ok(());
    };
    if node.parent != Some(root.index) {
        debug!(connector = %node.wire_id, "connector is not a direct child of the root element; ignoring");
        return Ok(());
    }

    let root_id = registry
        .canonical(&root.wire_id)
        .ok_or_else(|| MapError::UnresolvedReference(root.wire_id.clone()))?;
    let root_element = catalog
        .element(root_id)
        .ok_or(MapError::UnknownElement(root_id))?
        .clone();

    let Some(configuration_id) =
        config::configuration_for(catalog, &root_element, hierarchy, root.index)?
    else {
        return Ok(());
    };

    let hitch_point = HitchPoint {
        id: catalog.allocate_id(),
        reference_point: ReferencePoint {
            x_offset: node.geometry.x_offset.map(|g| g.value),
            y_offset: node.geometry.y_offset.map(|g| g.value),
            z_offset: node.geometry.z_offset.map(|g| g.value),
        },
        hitch_type: HitchType::Unknown,
    };
    let hitch_point_id = hitch_point.id;
    catalog.add_hitch_point(hitch_point);

    let connector = Connector {
        id: catalog.allocate_id(),
        configuration_id,
        hitch_point_id,
    };
    registry.insert(&node.wire_id, connector.id)?;
    catalog.add_connector(connector);
    Ok(())
}
