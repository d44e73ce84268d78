//! Wire-format equipment description records
//!
//! A device on the wire is a flat list of ID-referenced element records:
//! each record carries a type code, a designator, and a parent reference by
//! object id, with 0 reserved for "parent is the device root". Geometry
//! travels in separate property records keyed by standard data dictionary
//! entries. Document-level parsing stays with the surrounding toolchain;
//! this module covers the device subtree only.

use quick_xml::de::from_str;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WireError {
    #[error("Failed to parse device record: {0}")]
    ParseError(String),
    #[error("Failed to serialize device record: {0}")]
    SerializeError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Standard data dictionary entry for the actual working width
pub const DDI_ACTUAL_WIDTH: u16 = 0x0043;
/// Standard data dictionary entry for the default working width
pub const DDI_DEFAULT_WIDTH: u16 = 0x0046;
/// Standard data dictionary entry for the element X offset
pub const DDI_OFFSET_X: u16 = 0x0086;
/// Standard data dictionary entry for the element Y offset
pub const DDI_OFFSET_Y: u16 = 0x0087;
/// Standard data dictionary entry for the element Z offset
pub const DDI_OFFSET_Z: u16 = 0x0088;

/// Device element type codes from the equipment description standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireElementKind {
    Device,
    Function,
    Bin,
    Section,
    Unit,
    Connector,
    Navigation,
}

impl WireElementKind {
    /// Numeric type code used by the wire format
    pub fn code(&self) -> u8 {
        match self {
            Self::Device => 1,
            Self::Function => 2,
            Self::Bin => 3,
            Self::Section => 4,
            Self::Unit => 5,
            Self::Connector => 6,
            Self::Navigation => 7,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Device),
            2 => Some(Self::Function),
            3 => Some(Self::Bin),
            4 => Some(Self::Section),
            5 => Some(Self::Unit),
            6 => Some(Self::Connector),
            7 => Some(Self::Navigation),
            _ => None,
        }
    }
}

/// A device property record carrying one value in millimetres
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireProperty {
    #[serde(rename = "@ObjectId")]
    pub object_id: u16,
    /// Data dictionary entry identifying what the value measures
    #[serde(rename = "@Ddi")]
    pub ddi: u16,
    #[serde(rename = "@Value")]
    pub value: i32,
    #[serde(rename = "@Designator", default, skip_serializing_if = "Option::is_none")]
    pub designator: Option<String>,
}

/// One structural node of a machine or implement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireDeviceElement {
    #[serde(rename = "@DeviceElementId")]
    pub id: String,
    #[serde(rename = "@ObjectId")]
    pub object_id: u16,
    #[serde(rename = "@DeviceElementType")]
    pub kind: WireElementKind,
    #[serde(rename = "@DeviceElementDesignator", default)]
    pub designator: String,
    /// 0 means "parent is the device root"; absent means unresolved
    #[serde(rename = "@ParentObjectId", default, skip_serializing_if = "Option::is_none")]
    pub parent_object_id: Option<u16>,
    #[serde(rename = "DeviceProperty", default)]
    pub properties: Vec<WireProperty>,
}

/// An owning device record with its flat element list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename = "Device")]
pub struct WireDevice {
    #[serde(rename = "@DeviceId")]
    pub id: String,
    #[serde(rename = "@DeviceDesignator", default, skip_serializing_if = "Option::is_none")]
    pub designator: Option<String>,
    /// Packed classification identifier of the owning control unit,
    /// 16 hexadecimal characters
    #[serde(rename = "@ClientName", default)]
    pub client_name: String,
    #[serde(rename = "@SerialNumber", default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(rename = "DeviceElement", default)]
    pub elements: Vec<WireDeviceElement>,
}

impl WireDevice {
    /// Parse a device record from an XML string
    pub fn from_xml(xml: &str) -> Result<Self, WireError> {
        from_str(xml).map_err(|e| WireError::ParseError(e.to_string()))
    }

    /// Parse a device record from a file
    pub fn from_file(path: &Path) -> Result<Self, WireError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_xml(&content)
    }

    /// Serialize to an XML string
    pub fn to_xml(&self) -> Result<String, WireError> {
        to_string(self).map_err(|e| WireError::SerializeError(e.to_string()))
    }

    /// Write to a file
    pub fn to_file(&self, path: &Path) -> Result<(), WireError> {
        let xml = self.to_xml()?;
        std::fs::write(path, xml)?;
        Ok(())
    }

    /// Look up an element record by its object id
    pub fn element(&self, object_id: u16) -> Option<&WireDeviceElement> {
        self.elements.iter().find(|e| e.object_id == object_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_device_record() {
        let xml = r#"<Device DeviceId="DVC1" DeviceDesignator="Planter" ClientName="A00884000DE0C501" SerialNumber="P100-42">
    <DeviceElement DeviceElementId="DET1" ObjectId="1" DeviceElementType="Device" DeviceElementDesignator="Planter" ParentObjectId="0">
        <DeviceProperty ObjectId="10" Ddi="134" Value="1200"/>
    </DeviceElement>
    <DeviceElement DeviceElementId="DET2" ObjectId="2" DeviceElementType="Section" DeviceElementDesignator="Row 1" ParentObjectId="1"/>
</Device>"#;

        let device = WireDevice::from_xml(xml).unwrap();
        assert_eq!(device.id, "DVC1");
        assert_eq!(device.client_name, "A00884000DE0C501");
        assert_eq!(device.serial_number.as_deref(), Some("P100-42"));
        assert_eq!(device.elements.len(), 2);

        let root = &device.elements[0];
        assert_eq!(root.kind, WireElementKind::Device);
        assert_eq!(root.parent_object_id, Some(0));
        assert_eq!(root.properties.len(), 1);
        assert_eq!(root.properties[0].ddi, DDI_OFFSET_X);
        assert_eq!(root.properties[0].value, 1200);

        assert_eq!(device.elements[1].kind, WireElementKind::Section);
        assert_eq!(device.elements[1].parent_object_id, Some(1));
    }

    #[test]
    fn test_serialize_device_record() {
        let device = WireDevice {
            id: "DVC1".to_string(),
            designator: Some("Sprayer".to_string()),
            client_name: "A00C84000DE0C501".to_string(),
            serial_number: None,
            elements: vec![WireDeviceElement {
                id: "DET1".to_string(),
                object_id: 1,
                kind: WireElementKind::Device,
                designator: "Sprayer".to_string(),
                parent_object_id: Some(0),
                properties: Vec::new(),
            }],
        };

        let xml = device.to_xml().unwrap();
        assert!(xml.contains("DVC1"));
        assert!(xml.contains("DET1"));
        assert!(xml.contains("Device"));

        let reparsed = WireDevice::from_xml(&xml).unwrap();
        assert_eq!(reparsed.id, device.id);
        assert_eq!(reparsed.elements.len(), 1);
        assert_eq!(reparsed.elements[0].kind, WireElementKind::Device);
        assert_eq!(reparsed.elements[0].parent_object_id, Some(0));
    }

    #[test]
    fn test_element_lookup_by_object_id() {
        let device = WireDevice {
            id: "DVC1".to_string(),
            designator: None,
            client_name: String::new(),
            serial_number: None,
            elements: vec![WireDeviceElement {
                id: "DET9".to_string(),
                object_id: 9,
                kind: WireElementKind::Bin,
                designator: "Tank".to_string(),
                parent_object_id: Some(1),
                properties: Vec::new(),
            }],
        };

        assert_eq!(device.element(9).map(|e| e.id.as_str()), Some("DET9"));
        assert!(device.element(1).is_none());
    }

    #[test]
    fn test_type_codes_round_trip() {
        for kind in [
            WireElementKind::Device,
            WireElementKind::Function,
            WireElementKind::Bin,
            WireElementKind::Section,
            WireElementKind::Unit,
            WireElementKind::Connector,
            WireElementKind::Navigation,
        ] {
            assert_eq!(WireElementKind::from_code(kind.code()), Some(kind));
        }
        assert!(WireElementKind::from_code(0).is_none());
        assert!(WireElementKind::from_code(8).is_none());
    }
}
