//! Canonical equipment model records
//!
//! The canonical side of the translation: typed device elements forming a
//! tree, configuration records carrying the geometry attributed to them,
//! and hitch point / connector records for physical couplings. Everything
//! is owned by a [`Catalog`], one per model session.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::operation::MachineType;
use crate::representation::NumericValue;

/// Canonical reference id; one id space covers every record kind in a session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ElementId(pub i32);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical device element kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceElementKind {
    Machine,
    Implement,
    Bin,
    Function,
    Section,
    Unit,
}

/// One structural component of a machine or implement in the canonical model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceElement {
    pub id: ElementId,
    /// Wire-format identifier this element was imported from, if any
    pub wire_id: Option<String>,
    pub description: String,
    pub kind: DeviceElementKind,
    /// Another device element, or the owning device record for the root
    pub parent_id: ElementId,
    /// The owning device record
    pub device_id: ElementId,
    pub classification: Option<MachineType>,
    /// Set on the root element only
    pub serial_number: Option<String>,
}

/// Physical coupling types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitchType {
    #[default]
    Unknown,
    Drawbar,
    ThreePointFront,
    ThreePointRear,
}

/// Offsets of a reference point from the element origin
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub x_offset: Option<NumericValue>,
    pub y_offset: Option<NumericValue>,
    pub z_offset: Option<NumericValue>,
}

/// A geometric reference point describing a physical coupling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitchPoint {
    pub id: ElementId,
    pub reference_point: ReferencePoint,
    pub hitch_type: HitchType,
}

/// Links a device element configuration to a hitch point; stands in for a
/// wire connector record, which has no canonical device element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: ElementId,
    pub configuration_id: ElementId,
    pub hitch_point_id: ElementId,
}

/// Geometry attributed to a machine root element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfiguration {
    pub id: ElementId,
    pub element_id: ElementId,
    pub description: String,
    /// X then Y then Z; only present entries included
    pub offsets: Vec<NumericValue>,
    pub gps_receiver_x_offset: Option<NumericValue>,
    pub gps_receiver_y_offset: Option<NumericValue>,
    pub gps_receiver_z_offset: Option<NumericValue>,
}

/// Geometry attributed to an implement root or whole-implement function
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplementConfiguration {
    pub id: ElementId,
    pub element_id: ElementId,
    pub description: String,
    pub offsets: Vec<NumericValue>,
    /// The implement's total width
    pub physical_width: Option<NumericValue>,
    /// Row width derived from the lowest-level sections
    pub row_width: Option<NumericValue>,
}

/// Geometry attributed to a section or metering unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfiguration {
    pub id: ElementId,
    pub element_id: ElementId,
    pub description: String,
    pub offsets: Vec<NumericValue>,
    pub section_width: Option<NumericValue>,
    pub inline_offset: Option<NumericValue>,
    pub lateral_offset: Option<NumericValue>,
}

/// The configuration variants a device element can own
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeviceElementConfiguration {
    Machine(MachineConfiguration),
    Implement(ImplementConfiguration),
    Section(SectionConfiguration),
}

impl DeviceElementConfiguration {
    pub fn id(&self) -> ElementId {
        match self {
            Self::Machine(c) => c.id,
            Self::Implement(c) => c.id,
            Self::Section(c) => c.id,
        }
    }

    /// The device element whose geometry this configuration carries
    pub fn element_id(&self) -> ElementId {
        match self {
            Self::Machine(c) => c.element_id,
            Self::Implement(c) => c.element_id,
            Self::Section(c) => c.element_id,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Machine(c) => &c.description,
            Self::Implement(c) => &c.description,
            Self::Section(c) => &c.description,
        }
    }

    pub fn offsets(&self) -> &[NumericValue] {
        match self {
            Self::Machine(c) => &c.offsets,
            Self::Implement(c) => &c.offsets,
            Self::Section(c) => &c.offsets,
        }
    }
}

/// Owns every canonical record created during one import/export session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    next_id: i32,
    pub device_elements: Vec<DeviceElement>,
    /// Configurations keyed by owning element id; at most one per element
    configurations: HashMap<ElementId, DeviceElementConfiguration>,
    pub hitch_points: Vec<HitchPoint>,
    pub connectors: Vec<Connector>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next canonical reference id
    pub fn allocate_id(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    pub fn add_element(&mut self, element: DeviceElement) {
        self.device_elements.push(element);
    }

    pub fn element(&self, id: ElementId) -> Option<&DeviceElement> {
        self.device_elements.iter().find(|e| e.id == id)
    }

    /// The configuration owned by the given element, if one exists
    pub fn configuration_for(&self, element_id: ElementId) -> Option<&DeviceElementConfiguration> {
        self.configurations.get(&element_id)
    }

    pub fn insert_configuration(&mut self, configuration: DeviceElementConfiguration) {
        self.configurations
            .insert(configuration.element_id(), configuration);
    }

    pub fn configurations(&self) -> impl Iterator<Item = &DeviceElementConfiguration> {
        self.configurations.values()
    }

    pub fn add_hitch_point(&mut self, hitch_point: HitchPoint) {
        self.hitch_points.push(hitch_point);
    }

    pub fn add_connector(&mut self, connector: Connector) {
        self.connectors.push(connector);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_allocation_is_sequential() {
        let mut catalog = Catalog::new();
        assert_eq!(catalog.allocate_id(), ElementId(1));
        assert_eq!(catalog.allocate_id(), ElementId(2));
        assert_eq!(catalog.allocate_id(), ElementId(3));
    }

    #[test]
    fn test_configuration_store_is_keyed_by_element() {
        let mut catalog = Catalog::new();
        let element_id = catalog.allocate_id();
        let configuration_id = catalog.allocate_id();

        catalog.insert_configuration(DeviceElementConfiguration::Section(SectionConfiguration {
            id: configuration_id,
            element_id,
            description: "Row 1".to_string(),
            offsets: Vec::new(),
            section_width: None,
            inline_offset: None,
            lateral_offset: None,
        }));

        let found = catalog.configuration_for(element_id).unwrap();
        assert_eq!(found.id(), configuration_id);
        assert_eq!(found.element_id(), element_id);
        assert!(catalog.configuration_for(configuration_id).is_none());
    }

    #[test]
    fn test_element_lookup() {
        let mut catalog = Catalog::new();
        let device_id = catalog.allocate_id();
        let id = catalog.allocate_id();
        catalog.add_element(DeviceElement {
            id,
            wire_id: Some("DET1".to_string()),
            description: "Planter".to_string(),
            kind: DeviceElementKind::Implement,
            parent_id: device_id,
            device_id,
            classification: None,
            serial_number: None,
        });

        assert_eq!(catalog.element(id).map(|e| e.description.as_str()), Some("Planter"));
        assert!(catalog.element(ElementId(99)).is_none());
    }
}
