//! # Layout Tree
//!
//! The declarative description of a cabinet's interior. Containers split
//! their space among children along one axis, dividers are fixed-thickness
//! partitions between siblings, and items are the bays that hold shelves,
//! drawers and doors.
//!
//! ## Structure
//!
//! ```text
//! LayoutTree (orientation: horizontal)
//! ├── Item "bay-1" (size: auto)
//! ├── Divider "div-1" (thickness: 20)
//! └── Container "col-2" (vertical, size: 300)
//!     ├── Item "top" (size: auto)
//!     ├── Divider "div-2"
//!     └── Item "bottom" (size: 200)
//! ```
//!
//! The tree owns its children directly; there are no parent pointers. Code
//! that needs a parent walks down from the root by id.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "orientation": "horizontal",
//!   "children": [
//!     { "type": "item", "id": "bay-1", "size": "auto",
//!       "content": { "type": "bay", "shelves": [{ "id": "s1", "y": 300 }] } },
//!     { "type": "divider", "id": "div-1", "thickness": 20 },
//!     { "type": "item", "id": "bay-2", "size": 250,
//!       "content": { "type": "bay" } }
//!   ]
//! }
//! ```

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sibling lists nested deeper than this are never visited
pub const MAX_DEPTH: usize = 25;

/// Axis a container lays its children out along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Children sit side by side across the width
    #[default]
    Horizontal,
    /// Children are stacked along the height
    Vertical,
}

/// Requested size of a container or item along its parent's axis.
///
/// Serializes as a bare number for fixed sizes and as the string `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SizeSpec {
    /// Explicit size in millimeters
    Fixed(f64),
    /// Share of the space left over after fixed siblings and dividers
    #[default]
    Auto,
}

impl SizeSpec {
    pub fn is_auto(&self) -> bool {
        matches!(self, SizeSpec::Auto)
    }

    pub fn fixed(&self) -> Option<f64> {
        match self {
            SizeSpec::Fixed(v) => Some(*v),
            SizeSpec::Auto => None,
        }
    }
}

impl Serialize for SizeSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SizeSpec::Fixed(v) => serializer.serialize_f64(*v),
            SizeSpec::Auto => serializer.serialize_str("auto"),
        }
    }
}

struct SizeSpecVisitor;

impl<'de> Visitor<'de> for SizeSpecVisitor {
    type Value = SizeSpec;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a size in millimeters or the string \"auto\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<SizeSpec, E> {
        Ok(SizeSpec::Fixed(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SizeSpec, E> {
        Ok(SizeSpec::Fixed(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SizeSpec, E> {
        Ok(SizeSpec::Fixed(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SizeSpec, E> {
        if v.eq_ignore_ascii_case("auto") {
            Ok(SizeSpec::Auto)
        } else {
            Err(E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }
}

impl<'de> Deserialize<'de> for SizeSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SizeSpecVisitor)
    }
}

/// A node that distributes its space among children along one axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContainerNode {
    pub id: String,
    pub orientation: Orientation,
    #[serde(default)]
    pub size: SizeSpec,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

/// Fixed-thickness partition between two siblings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DividerNode {
    pub id: String,
    /// Always concrete, never auto (mm)
    pub thickness: f64,
}

/// Content slot holding shelves, drawers and a door
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemNode {
    pub id: String,
    #[serde(default)]
    pub size: SizeSpec,
    #[serde(default)]
    pub content: ItemContent,
}

/// One node of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutNode {
    Container(ContainerNode),
    Divider(DividerNode),
    Item(ItemNode),
}

impl LayoutNode {
    pub fn id(&self) -> &str {
        match self {
            LayoutNode::Container(c) => &c.id,
            LayoutNode::Divider(d) => &d.id,
            LayoutNode::Item(i) => &i.id,
        }
    }

    pub fn is_divider(&self) -> bool {
        matches!(self, LayoutNode::Divider(_))
    }

    /// Size request of a container or item; `None` for dividers
    pub fn size(&self) -> Option<SizeSpec> {
        match self {
            LayoutNode::Container(c) => Some(c.size),
            LayoutNode::Item(i) => Some(i.size),
            LayoutNode::Divider(_) => None,
        }
    }

    /// Overwrite the size request. Dividers are left unchanged.
    pub fn set_size(&mut self, size: SizeSpec) {
        match self {
            LayoutNode::Container(c) => c.size = size,
            LayoutNode::Item(i) => i.size = size,
            LayoutNode::Divider(_) => {}
        }
    }

    pub fn children(&self) -> &[LayoutNode] {
        match self {
            LayoutNode::Container(c) => &c.children,
            _ => &[],
        }
    }

    /// Convenience constructor for an item with bay content
    pub fn bay(id: impl Into<String>, size: SizeSpec, bay: BayConfig) -> Self {
        LayoutNode::Item(ItemNode {
            id: id.into(),
            size,
            content: ItemContent::Bay(bay),
        })
    }

    pub fn divider(id: impl Into<String>, thickness: f64) -> Self {
        LayoutNode::Divider(DividerNode {
            id: id.into(),
            thickness,
        })
    }

    pub fn container(
        id: impl Into<String>,
        orientation: Orientation,
        size: SizeSpec,
        children: Vec<LayoutNode>,
    ) -> Self {
        LayoutNode::Container(ContainerNode {
            id: id.into(),
            orientation,
            size,
            children,
        })
    }
}

/// What an item holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemContent {
    Bay(BayConfig),
    Other(OtherConfig),
}

impl Default for ItemContent {
    fn default() -> Self {
        ItemContent::Bay(BayConfig::default())
    }
}

impl ItemContent {
    pub fn as_bay(&self) -> Option<&BayConfig> {
        match self {
            ItemContent::Bay(b) => Some(b),
            ItemContent::Other(_) => None,
        }
    }

    pub fn as_bay_mut(&mut self) -> Option<&mut BayConfig> {
        match self {
            ItemContent::Bay(b) => Some(b),
            ItemContent::Other(_) => None,
        }
    }
}

/// Storage bay: shelves, drawers and an optional door
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct BayConfig {
    #[serde(default)]
    pub shelves: Vec<Shelf>,
    #[serde(default)]
    pub drawers: Vec<Drawer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub door: Option<DoorConfig>,
}

impl BayConfig {
    /// Number of door leaves this bay contributes (0 when no enabled door)
    pub fn door_leaves(&self) -> u32 {
        match &self.door {
            Some(door) if door.enabled => door.kind.leaves(),
            _ => 0,
        }
    }
}

/// Slot reserved for something the engine does not itemize (appliance, niche)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct OtherConfig {
    #[serde(default)]
    pub label: String,
}

/// Fixed shelf; `y` is measured up from the cabinet bottom (mm)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Shelf {
    pub id: String,
    pub y: f64,
}

/// Drawer occupying `height` mm starting `y` mm above the cabinet bottom
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Drawer {
    pub id: String,
    pub y: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DoorType {
    #[default]
    Single,
    Double,
}

impl DoorType {
    pub fn leaves(&self) -> u32 {
        match self {
            DoorType::Single => 1,
            DoorType::Double => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HingeSide {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoorConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(rename = "type", default)]
    pub kind: DoorType,
    #[serde(default)]
    pub hinge_side: HingeSide,
}

/// Root of the layout: the top-level sibling list and the axis it runs along
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LayoutTree {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub children: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn new(orientation: Orientation, children: Vec<LayoutNode>) -> Self {
        LayoutTree {
            orientation,
            children,
        }
    }

    /// Find a node anywhere in the tree
    pub fn find(&self, id: &str) -> Option<&LayoutNode> {
        find_in(&self.children, id, 0)
    }

    /// Index path from the root list to the node with `id`
    pub fn path_to(&self, id: &str) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        if path_in(&self.children, id, 0, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    /// The sibling list addressed by `path` (all but the last index)
    pub fn siblings_at(&self, path: &[usize]) -> Option<&[LayoutNode]> {
        let (_, parents) = path.split_last()?;
        let mut list: &[LayoutNode] = &self.children;
        for &idx in parents {
            list = match list.get(idx)? {
                LayoutNode::Container(c) => &c.children,
                _ => return None,
            };
        }
        Some(list)
    }

    /// Mutable sibling list addressed by `path` (all but the last index)
    pub fn siblings_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<LayoutNode>> {
        let (_, parents) = path.split_last()?;
        let mut list = &mut self.children;
        for &idx in parents {
            list = match list.get_mut(idx)? {
                LayoutNode::Container(c) => &mut c.children,
                _ => return None,
            };
        }
        Some(list)
    }

    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut LayoutNode> {
        let last = *path.last()?;
        self.siblings_at_mut(path)?.get_mut(last)
    }

    /// Every item in depth-first order
    pub fn items(&self) -> Vec<&ItemNode> {
        let mut out = Vec::new();
        collect_items(&self.children, 0, &mut out);
        out
    }

    /// Number of divider nodes anywhere in the tree
    pub fn divider_count(&self) -> usize {
        count_dividers(&self.children, 0)
    }
}

fn find_in<'a>(nodes: &'a [LayoutNode], id: &str, depth: usize) -> Option<&'a LayoutNode> {
    if depth >= MAX_DEPTH {
        return None;
    }
    for node in nodes {
        if node.id() == id {
            return Some(node);
        }
        if let Some(found) = find_in(node.children(), id, depth + 1) {
            return Some(found);
        }
    }
    None
}

fn path_in(nodes: &[LayoutNode], id: &str, depth: usize, path: &mut Vec<usize>) -> bool {
    if depth >= MAX_DEPTH {
        return false;
    }
    for (idx, node) in nodes.iter().enumerate() {
        path.push(idx);
        if node.id() == id || path_in(node.children(), id, depth + 1, path) {
            return true;
        }
        path.pop();
    }
    false
}

fn collect_items<'a>(nodes: &'a [LayoutNode], depth: usize, out: &mut Vec<&'a ItemNode>) {
    if depth >= MAX_DEPTH {
        return;
    }
    for node in nodes {
        match node {
            LayoutNode::Item(item) => out.push(item),
            LayoutNode::Container(c) => collect_items(&c.children, depth + 1, out),
            LayoutNode::Divider(_) => {}
        }
    }
}

fn count_dividers(nodes: &[LayoutNode], depth: usize) -> usize {
    if depth >= MAX_DEPTH {
        return 0;
    }
    nodes
        .iter()
        .map(|n| match n {
            LayoutNode::Divider(_) => 1,
            LayoutNode::Container(c) => count_dividers(&c.children, depth + 1),
            LayoutNode::Item(_) => 0,
        })
        .sum()
}
