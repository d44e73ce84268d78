//! Wire kind / canonical kind classification
//!
//! Explicit lookup tables in both directions, with the unmodeled case
//! called out: connectors have no canonical device element, and navigation
//! folds into the function kind.

use furrow_core::{DeviceElementKind, MachineType, OperationTypeIndex, WireElementKind};

/// Canonical mapping of one wire type code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindMapping {
    /// Maps onto a canonical device element kind
    Canonical(DeviceElementKind),
    /// The root device element; its canonical kind comes from
    /// [`classify_root`]
    Root,
    /// No canonical device element counterpart
    Unmodeled,
}

/// Wire type code to canonical kind
pub fn wire_to_canonical(kind: WireElementKind) -> KindMapping {
    match kind {
        WireElementKind::Device => KindMapping::Root,
        WireElementKind::Function => KindMapping::Canonical(DeviceElementKind::Function),
        WireElementKind::Bin => KindMapping::Canonical(DeviceElementKind::Bin),
        WireElementKind::Section => KindMapping::Canonical(DeviceElementKind::Section),
        WireElementKind::Unit => KindMapping::Canonical(DeviceElementKind::Unit),
        // Navigation has no distinct canonical kind
        WireElementKind::Navigation => KindMapping::Canonical(DeviceElementKind::Function),
        WireElementKind::Connector => KindMapping::Unmodeled,
    }
}

/// Canonical kind to wire type code
pub fn canonical_to_wire(kind: DeviceElementKind) -> WireElementKind {
    match kind {
        DeviceElementKind::Machine | DeviceElementKind::Implement => WireElementKind::Device,
        DeviceElementKind::Bin => WireElementKind::Bin,
        DeviceElementKind::Function => WireElementKind::Function,
        DeviceElementKind::Section => WireElementKind::Section,
        DeviceElementKind::Unit => WireElementKind::Unit,
    }
}

/// Root classification heuristic: a machine if the decoded classification
/// is of an operation type carrying a machine configuration, or if the
/// root has a navigation child; an implement otherwise.
pub fn classify_root(
    classification: Option<MachineType>,
    operation_types: &OperationTypeIndex,
    has_navigation_child: bool,
) -> DeviceElementKind {
    let machine_configured = classification
        .and_then(|machine_type| operation_types.by_machine_type(machine_type))
        .is_some_and(|operation| operation.has_machine_configuration);
    if machine_configured || has_navigation_child {
        DeviceElementKind::Machine
    } else {
        DeviceElementKind::Implement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_inverse_for_plain_kinds() {
        for kind in [
            DeviceElementKind::Bin,
            DeviceElementKind::Function,
            DeviceElementKind::Section,
            DeviceElementKind::Unit,
        ] {
            assert_eq!(
                wire_to_canonical(canonical_to_wire(kind)),
                KindMapping::Canonical(kind)
            );
        }
    }

    #[test]
    fn test_both_root_kinds_export_as_device() {
        assert_eq!(
            canonical_to_wire(DeviceElementKind::Machine),
            WireElementKind::Device
        );
        assert_eq!(
            canonical_to_wire(DeviceElementKind::Implement),
            WireElementKind::Device
        );
    }

    #[test]
    fn test_navigation_folds_into_function() {
        assert_eq!(
            wire_to_canonical(WireElementKind::Navigation),
            KindMapping::Canonical(DeviceElementKind::Function)
        );
    }

    #[test]
    fn test_connector_is_unmodeled() {
        assert_eq!(wire_to_canonical(WireElementKind::Connector), KindMapping::Unmodeled);
    }

    #[test]
    fn test_root_heuristic() {
        let index = OperationTypeIndex::builtin();

        // self-propelled classification
        assert_eq!(
            classify_root(Some(MachineType::Tractor), &index, false),
            DeviceElementKind::Machine
        );
        // towed classification
        assert_eq!(
            classify_root(Some(MachineType::Sprayer), &index, false),
            DeviceElementKind::Implement
        );
        // a navigation child wins regardless of classification
        assert_eq!(
            classify_root(None, &index, true),
            DeviceElementKind::Machine
        );
        assert_eq!(
            classify_root(Some(MachineType::Sprayer), &index, true),
            DeviceElementKind::Machine
        );
        // nothing known defaults to implement
        assert_eq!(
            classify_root(None, &index, false),
            DeviceElementKind::Implement
        );
    }
}
