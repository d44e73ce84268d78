//! Machine classification values and the operation-type lookup table
//!
//! The second byte of a control unit's packed NAME carries a device class
//! code; the operation-type table maps those codes to machine types and
//! records which classes are self-propelled and therefore carry a machine
//! configuration. The table ships with a builtin default and can be
//! replaced from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationTypeError {
    #[error("Failed to read operation type index: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse operation type index: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize operation type index: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Machine classification values from the standard's device classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MachineType {
    NonSpecific,
    Tractor,
    Tillage,
    SecondaryTillage,
    PlanterSeeder,
    Fertilizer,
    Sprayer,
    Harvester,
    RootHarvester,
    ForageHarvester,
    Irrigation,
    TransportTrailer,
    FarmYardOperation,
    PoweredAuxiliary,
    SpecialCrop,
    Earthwork,
    Skidder,
}

/// One entry of the device-class lookup table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationType {
    /// Device class code carried in the second byte of a client NAME
    pub device_class: u8,
    pub machine_type: MachineType,
    /// Whether equipment of this class is self-propelled and carries a
    /// machine configuration
    #[serde(default)]
    pub has_machine_configuration: bool,
}

/// The operation-type table, externally supplied or builtin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationTypeIndex {
    /// Version of the index format
    #[serde(default = "default_version")]
    pub version: String,
    /// List of operation type entries
    #[serde(default)]
    pub operation: Vec<OperationType>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for OperationTypeIndex {
    fn default() -> Self {
        Self {
            version: default_version(),
            operation: Vec::new(),
        }
    }
}

fn entry(device_class: u8, machine_type: MachineType, has_machine_configuration: bool) -> OperationType {
    OperationType {
        device_class,
        machine_type,
        has_machine_configuration,
    }
}

impl OperationTypeIndex {
    /// The builtin table covering the standard's device classes
    pub fn builtin() -> Self {
        Self {
            version: default_version(),
            operation: vec![
                entry(0, MachineType::NonSpecific, false),
                entry(1, MachineType::Tractor, true),
                entry(2, MachineType::Tillage, false),
                entry(3, MachineType::SecondaryTillage, false),
                entry(4, MachineType::PlanterSeeder, false),
                entry(5, MachineType::Fertilizer, false),
                entry(6, MachineType::Sprayer, false),
                entry(7, MachineType::Harvester, true),
                entry(8, MachineType::RootHarvester, true),
                entry(9, MachineType::ForageHarvester, true),
                entry(10, MachineType::Irrigation, false),
                entry(11, MachineType::TransportTrailer, false),
                entry(12, MachineType::FarmYardOperation, false),
                entry(13, MachineType::PoweredAuxiliary, false),
                entry(14, MachineType::SpecialCrop, false),
                entry(15, MachineType::Earthwork, false),
                entry(16, MachineType::Skidder, true),
            ],
        }
    }

    /// Load the index from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, OperationTypeError> {
        let index: OperationTypeIndex = toml::from_str(content)?;
        Ok(index)
    }

    /// Load the index from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, OperationTypeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save the index to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), OperationTypeError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up the entry for a device class code
    pub fn by_device_class(&self, device_class: u8) -> Option<&OperationType> {
        self.operation.iter().find(|o| o.device_class == device_class)
    }

    /// Look up the entry for a machine type
    pub fn by_machine_type(&self, machine_type: MachineType) -> Option<&OperationType> {
        self.operation.iter().find(|o| o.machine_type == machine_type)
    }
}
