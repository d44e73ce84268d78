//! Packed client-NAME decoding
//!
//! A control unit's NAME is a 16 hexadecimal character identifier packing
//! several fields. The upper nibble of the first byte carries the device
//! group; only agricultural equipment proceeds. The second byte, shifted
//! right by one, carries the device class looked up in the operation-type
//! table.

use furrow_core::{MachineType, OperationTypeIndex};

/// Device group value identifying agricultural equipment
const AGRICULTURAL_DEVICE_GROUP: u8 = 2;

/// Decode a packed classification identifier into a machine type.
///
/// Fails closed: anything that is not exactly 16 hex characters, or that
/// belongs to a non-agricultural device group, yields no classification.
/// An agricultural device class missing from the table defaults to
/// [`MachineType::Tractor`]. Malformed input never errors.
pub fn decode_client_name(
    client_name: &str,
    operation_types: &OperationTypeIndex,
) -> Option<MachineType> {
    if client_name.len() != 16 || !client_name.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let device_group = u8::from_str_radix(&client_name[0..2], 16).ok()? >> 4;
    if device_group & 0x07 != AGRICULTURAL_DEVICE_GROUP {
        return None;
    }

    let device_class = u8::from_str_radix(&client_name[2..4], 16).ok()? >> 1;
    let machine_type = operation_types
        .by_device_class(device_class)
        .map(|operation| operation.machine_type)
        .unwrap_or(MachineType::Tractor);
    Some(machine_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_input() {
        let index = OperationTypeIndex::builtin();
        assert!(decode_client_name("", &index).is_none());
        assert!(decode_client_name("A002", &index).is_none());
        assert!(decode_client_name("A00284000DE0C50199", &index).is_none());
        assert!(decode_client_name("G00284000DE0C501", &index).is_none());
    }

    #[test]
    fn test_non_agricultural_group_yields_nothing() {
        let index = OperationTypeIndex::builtin();
        // first byte 0x10: upper nibble 1, masked to 3 bits is 1, not 2
        assert!(decode_client_name("1002840000000001", &index).is_none());
        // first byte 0x30: group 3
        assert!(decode_client_name("3002840000000001", &index).is_none());
    }

    #[test]
    fn test_agricultural_group_passes_filter() {
        let index = OperationTypeIndex::builtin();
        // first byte 0x21: upper nibble 2 survives the 3-bit mask
        assert_eq!(
            decode_client_name("2102840000000001", &index),
            Some(MachineType::Tractor)
        );
        // first byte 0xA0: upper nibble 0xA, masked to 3 bits is 2
        assert_eq!(
            decode_client_name("A00C840000000001", &index),
            Some(MachineType::Sprayer)
        );
    }

    #[test]
    fn test_device_class_from_second_byte() {
        let index = OperationTypeIndex::builtin();
        // second byte 0x08 >> 1 = class 4, planter/seeder
        assert_eq!(
            decode_client_name("A008840000000001", &index),
            Some(MachineType::PlanterSeeder)
        );
        // second byte 0x0E >> 1 = class 7, harvester
        assert_eq!(
            decode_client_name("A00E840000000001", &index),
            Some(MachineType::Harvester)
        );
    }

    #[test]
    fn test_unmatched_class_defaults_to_tractor() {
        let index = OperationTypeIndex::builtin();
        // second byte 0xFE >> 1 = class 127, not in the table
        assert_eq!(
            decode_client_name("A0FE840000000001", &index),
            Some(MachineType::Tractor)
        );
    }

    #[test]
    fn test_lowercase_hex_is_accepted() {
        let index = OperationTypeIndex::builtin();
        assert_eq!(
            decode_client_name("a00c840000000001", &index),
            Some(MachineType::Sprayer)
        );
    }
}
