//! Furrow Core - wire records, hierarchy view, and the canonical equipment model
//!
//! This crate provides the foundational types for the Furrow system:
//! - Wire-format device and device-element records with XML support
//! - A precomputed arena tree over one device's element records
//! - The canonical equipment model (elements, configurations, hitch points)
//! - The session-scoped identifier registry
//! - The operation-type table mapping device classes to machine types

pub mod hierarchy;
pub mod model;
pub mod operation;
pub mod registry;
pub mod representation;
pub mod wire;

pub use hierarchy::{Hierarchy, HierarchyError, HierarchyNode, NodeGeometry, NodeIndex};
pub use model::{
    Catalog, Connector, DeviceElement, DeviceElementConfiguration, DeviceElementKind, ElementId,
    HitchPoint, HitchType, ImplementConfiguration, MachineConfiguration, ReferencePoint,
    SectionConfiguration,
};
pub use operation::{MachineType, OperationType, OperationTypeError, OperationTypeIndex};
pub use registry::{IdentifierRegistry, RegistryError};
pub use representation::{GeometryValue, NumericValue, Representation};
pub use wire::{
    WireDevice, WireDeviceElement, WireElementKind, WireError, WireProperty, DDI_ACTUAL_WIDTH,
    DDI_DEFAULT_WIDTH, DDI_OFFSET_X, DDI_OFFSET_Y, DDI_OFFSET_Z,
};
