//! Precomputed tree view over one device's element records
//!
//! The wire format describes structure as a flat list with parent
//! references; importing needs the opposite: a tree that can be walked
//! strictly by increasing depth so every parent is materialized before its
//! children. Nodes live in an arena and reference each other by index, so
//! parent and child links never form ownership cycles.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use thiserror::Error;

use crate::representation::{GeometryValue, NumericValue, Representation};
use crate::wire::{
    WireDevice, WireProperty, WireElementKind, DDI_ACTUAL_WIDTH, DDI_DEFAULT_WIDTH, DDI_OFFSET_X,
    DDI_OFFSET_Y, DDI_OFFSET_Z,
};

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Device {0} has no root element with parent reference 0")]
    NoRootElement(String),
    #[error("Device {device} has more than one root element: {first}, {second}")]
    DuplicateRootElement {
        device: String,
        first: String,
        second: String,
    },
    #[error("Element {0} is not reachable from the root element")]
    OrphanElement(String),
    #[error("Duplicate object id {0} in device element records")]
    DuplicateObjectId(u16),
}

/// Index of a node within its hierarchy's arena
pub type NodeIndex = usize;

/// Geometry attached to one hierarchy node, from its property records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeGeometry {
    pub x_offset: Option<GeometryValue>,
    pub y_offset: Option<GeometryValue>,
    pub z_offset: Option<GeometryValue>,
    pub width: Option<GeometryValue>,
}

impl NodeGeometry {
    pub fn is_empty(&self) -> bool {
        self.x_offset.is_none()
            && self.y_offset.is_none()
            && self.z_offset.is_none()
            && self.width.is_none()
    }

    fn from_properties(properties: &[WireProperty]) -> Self {
        let mut geometry = NodeGeometry::default();
        let mut default_width = None;
        let mut actual_width = None;
        for property in properties {
            match property.ddi {
                DDI_OFFSET_X => {
                    geometry.x_offset = Some(GeometryValue::from_millimeters(
                        property.value,
                        Representation::XOffset,
                    ));
                }
                DDI_OFFSET_Y => {
                    geometry.y_offset = Some(GeometryValue::from_millimeters(
                        property.value,
                        Representation::YOffset,
                    ));
                }
                DDI_OFFSET_Z => {
                    geometry.z_offset = Some(GeometryValue::from_millimeters(
                        property.value,
                        Representation::ZOffset,
                    ));
                }
                DDI_DEFAULT_WIDTH => default_width = Some(property.value),
                DDI_ACTUAL_WIDTH => actual_width = Some(property.value),
                _ => {}
            }
        }
        // The default working width wins over the actual one when both appear
        geometry.width = default_width
            .or(actual_width)
            .map(|raw| GeometryValue::from_millimeters(raw, Representation::Width));
        geometry
    }
}

/// A node in the hierarchy view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyNode {
    pub index: NodeIndex,
    pub wire_id: String,
    pub object_id: u16,
    pub kind: WireElementKind,
    pub designator: String,
    pub depth: usize,
    pub parent: Option<NodeIndex>,
    pub children: Vec<NodeIndex>,
    pub geometry: NodeGeometry,
}

/// Read-only tree over one device's element records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Hierarchy {
    nodes: Vec<HierarchyNode>,
    by_wire_id: HashMap<String, NodeIndex>,
    max_depth: usize,
}

impl Hierarchy {
    /// Build the tree view from a device's flat element records.
    ///
    /// The element whose parent reference is the root sentinel 0 becomes
    /// the tree root; depths are assigned breadth-first, so the arena is
    /// ordered by increasing depth. Records that cannot be reached from
    /// the root are surfaced by wire id.
    pub fn from_device(device: &WireDevice) -> Result<Self, HierarchyError> {
        let mut by_object: HashMap<u16, usize> = HashMap::new();
        for (position, element) in device.elements.iter().enumerate() {
            if by_object.insert(element.object_id, position).is_some() {
                return Err(HierarchyError::DuplicateObjectId(element.object_id));
            }
        }

        let mut root: Option<usize> = None;
        let mut by_parent: HashMap<u16, Vec<usize>> = HashMap::new();
        for (position, element) in device.elements.iter().enumerate() {
            match element.parent_object_id {
                Some(0) => {
                    if let Some(first) = root {
                        return Err(HierarchyError::DuplicateRootElement {
                            device: device.id.clone(),
                            first: device.elements[first].id.clone(),
                            second: element.id.clone(),
                        });
                    }
                    root = Some(position);
                }
                Some(parent) => by_parent.entry(parent).or_default().push(position),
                // An unset parent reference never attaches; it surfaces as an orphan below
                None => {}
            }
        }
        let root = root.ok_or_else(|| HierarchyError::NoRootElement(device.id.clone()))?;

        let mut hierarchy = Hierarchy::default();
        let mut queue = VecDeque::new();
        queue.push_back((root, None, 0usize));
        while let Some((position, parent, depth)) = queue.pop_front() {
            let element = &device.elements[position];
            let index = hierarchy.nodes.len();
            hierarchy.nodes.push(HierarchyNode {
                index,
                wire_id: element.id.clone(),
                object_id: element.object_id,
                kind: element.kind,
                designator: element.designator.clone(),
                depth,
                parent,
                children: Vec::new(),
                geometry: NodeGeometry::from_properties(&element.properties),
            });
            hierarchy.by_wire_id.insert(element.id.clone(), index);
            if let Some(parent) = parent {
                hierarchy.nodes[parent].children.push(index);
            }
            hierarchy.max_depth = hierarchy.max_depth.max(depth);
            if let Some(children) = by_parent.get(&element.object_id) {
                for &child in children {
                    queue.push_back((child, Some(index), depth + 1));
                }
            }
        }

        if hierarchy.nodes.len() != device.elements.len() {
            let orphan = device
                .elements
                .iter()
                .find(|e| !hierarchy.by_wire_id.contains_key(&e.id));
            if let Some(orphan) = orphan {
                return Err(HierarchyError::OrphanElement(orphan.id.clone()));
            }
        }

        Ok(hierarchy)
    }

    /// The tree root, if the hierarchy is non-empty
    pub fn root(&self) -> Option<&HierarchyNode> {
        self.nodes.first()
    }

    /// The node at the given arena index
    pub fn node(&self, index: NodeIndex) -> &HierarchyNode {
        &self.nodes[index]
    }

    /// Look up a node by its wire-format identifier
    pub fn find(&self, wire_id: &str) -> Option<&HierarchyNode> {
        self.by_wire_id.get(wire_id).map(|&index| &self.nodes[index])
    }

    /// The parent node, if the given node is not the root
    pub fn parent(&self, index: NodeIndex) -> Option<&HierarchyNode> {
        self.nodes[index].parent.map(|parent| &self.nodes[parent])
    }

    /// Direct children of the given node
    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes[index]
            .children
            .iter()
            .map(|&child| &self.nodes[child])
    }

    /// The first direct child of navigation kind, if any
    pub fn navigation_child(&self, index: NodeIndex) -> Option<&HierarchyNode> {
        self.children(index)
            .find(|child| child.kind == WireElementKind::Navigation)
    }

    /// Deepest level present in the tree
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// All nodes at the given depth, in arena order
    pub fn at_depth(&self, depth: usize) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter().filter(move |node| node.depth == depth)
    }

    /// All nodes, ordered by increasing depth
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Width rolled up from the deepest level below the given node.
    ///
    /// Yields a value only when every node at that level is a section
    /// carrying one common width; mixed kinds or widths yield nothing.
    pub fn lowest_level_section_width(&self, index: NodeIndex) -> Option<NumericValue> {
        let mut stack = vec![index];
        let mut subtree = Vec::new();
        let mut deepest = self.nodes[index].depth;
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            deepest = deepest.max(node.depth);
            subtree.push(node);
            stack.extend(node.children.iter().copied());
        }

        let lowest: Vec<&HierarchyNode> =
            subtree.into_iter().filter(|node| node.depth == deepest).collect();
        let width = lowest.first()?.geometry.width?;
        let uniform = lowest.iter().all(|node| {
            node.kind == WireElementKind::Section
                && node.geometry.width.map(|w| w.raw_mm) == Some(width.raw_mm)
        });
        uniform.then_some(width.value)
    }
}
