//! # Bill of Materials
//!
//! Walks a sized layout tree and the global parameters and lists every part
//! needed to build the cabinet: profile cuts, panel blanks and hardware.
//!
//! ## Parts
//!
//! | Group      | Rows                                                          |
//! |------------|---------------------------------------------------------------|
//! | Frame      | 4 pillars, 4 width beams, 4 depth beams                       |
//! | Dividers   | one post per divider node                                     |
//! | Panels     | left/right/back/top/bottom when enabled                       |
//! | Per bay    | door leaves + handles, shelf beams, drawer fronts/slides/boxes |
//! | Hinges     | 2 per door leaf, from one hinge search                        |
//! | Connectors | 16 corners + 8 per shelf + 4 per divider                      |
//!
//! All lengths are rounded to whole millimeters. Generation never fails:
//! missing sizes and nonsensical dimensions produce zero-length rows rather
//! than errors, so a half-finished design still gets a best-effort list.
//!
//! ## JSON Example
//!
//! ```json
//! [
//!   { "category": "profile", "name": "Pillar", "length_mm": 720.0, "qty": 4, "note": "2020 profile" },
//!   { "category": "panel", "name": "Back panel", "qty": 1, "width_mm": 571.0, "height_mm": 691.0, "thickness_mm": 4.0 },
//!   { "category": "hardware", "name": "Angle Bracket", "qty": 24, "unit": "pcs" }
//! ]
//! ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::cutting::CutRequest;
use crate::hinge::{select_hinge, HingeSelection};
use crate::layout::{DoorType, ItemNode};
use crate::params::{DesignParams, DrawerStyle};
use crate::sizing::{Extent, SizedTree};

/// Clearance around a single door leaf (total across the width)
const SINGLE_DOOR_GAP: f64 = 4.0;
/// Clearance per leaf of a double door
const DOUBLE_DOOR_GAP: f64 = 3.0;
/// Clearance of an inset drawer front (total across the width)
const INSET_DRAWER_GAP: f64 = 10.0;
/// Connectors at the twelve frame joints
const BASE_CONNECTORS: u32 = 16;
const CONNECTORS_PER_SHELF: u32 = 8;
const CONNECTORS_PER_DIVIDER: u32 = 4;
const HINGES_PER_LEAF: u32 = 2;

/// One row of the bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum BomItem {
    /// A length cut from profile stock
    Profile {
        name: String,
        length_mm: f64,
        qty: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    /// A sheet blank
    Panel {
        name: String,
        qty: u32,
        width_mm: f64,
        height_mm: f64,
        thickness_mm: f64,
    },
    /// Bought-in parts counted by the piece
    Hardware {
        name: String,
        qty: u32,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        unit: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
}

impl BomItem {
    pub fn profile(name: impl Into<String>, length_mm: f64, qty: u32, note: Option<String>) -> Self {
        BomItem::Profile {
            name: name.into(),
            length_mm: round_mm(length_mm),
            qty,
            note,
        }
    }

    pub fn panel(name: impl Into<String>, qty: u32, width_mm: f64, height_mm: f64, thickness_mm: f64) -> Self {
        BomItem::Panel {
            name: name.into(),
            qty,
            width_mm: round_mm(width_mm),
            height_mm: round_mm(height_mm),
            thickness_mm: thickness_mm.max(0.0),
        }
    }

    pub fn hardware(name: impl Into<String>, qty: u32, note: Option<String>) -> Self {
        BomItem::Hardware {
            name: name.into(),
            qty,
            unit: Some("pcs".to_string()),
            note,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BomItem::Profile { name, .. } | BomItem::Panel { name, .. } | BomItem::Hardware { name, .. } => name,
        }
    }

    pub fn qty(&self) -> u32 {
        match self {
            BomItem::Profile { qty, .. } | BomItem::Panel { qty, .. } | BomItem::Hardware { qty, .. } => *qty,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            BomItem::Profile { .. } => "profile",
            BomItem::Panel { .. } => "panel",
            BomItem::Hardware { .. } => "hardware",
        }
    }

    fn qty_mut(&mut self) -> &mut u32 {
        match self {
            BomItem::Profile { qty, .. } | BomItem::Panel { qty, .. } | BomItem::Hardware { qty, .. } => qty,
        }
    }

    /// Rows that describe the same physical part, ignoring quantity and notes
    fn same_part(&self, other: &BomItem) -> bool {
        match (self, other) {
            (
                BomItem::Profile { name: a, length_mm: la, .. },
                BomItem::Profile { name: b, length_mm: lb, .. },
            ) => a == b && la == lb,
            (
                BomItem::Panel { name: a, width_mm: wa, height_mm: ha, thickness_mm: ta, .. },
                BomItem::Panel { name: b, width_mm: wb, height_mm: hb, thickness_mm: tb, .. },
            ) => a == b && wa == wb && ha == hb && ta == tb,
            (BomItem::Hardware { name: a, unit: ua, .. }, BomItem::Hardware { name: b, unit: ub, .. }) => {
                a == b && ua == ub
            }
            _ => false,
        }
    }

    fn note(&self) -> Option<&String> {
        match self {
            BomItem::Profile { note, .. } | BomItem::Hardware { note, .. } => note.as_ref(),
            BomItem::Panel { .. } => None,
        }
    }

    fn clear_note(&mut self) {
        match self {
            BomItem::Profile { note, .. } | BomItem::Hardware { note, .. } => *note = None,
            BomItem::Panel { .. } => {}
        }
    }
}

/// Bill of materials together with the hinge search that fed it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BomReport {
    pub items: Vec<BomItem>,
    pub hinge: HingeSelection,
    /// Messages the user should see (hinge search exhaustion)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,
}

/// Round to the nearest millimeter; negative and NaN lengths become 0
fn round_mm(v: f64) -> f64 {
    v.round().max(0.0)
}

/// Generate the flat parts list for a sized tree.
///
/// # Example
///
/// ```rust
/// use cabinet_core::bom::{generate_bom, BomItem};
/// use cabinet_core::layout::LayoutTree;
/// use cabinet_core::params::DesignParams;
/// use cabinet_core::sizing::size_tree;
///
/// let params = DesignParams::default();
/// let sized = size_tree(&LayoutTree::default(), &params);
/// let bom = generate_bom(&sized, &params);
/// assert!(bom.iter().any(|row| row.name() == "Pillar"));
/// ```
pub fn generate_bom(sized: &SizedTree, params: &DesignParams) -> Vec<BomItem> {
    generate_bom_report(sized, params).items
}

/// Generate the parts list plus the hinge result and any advisories.
pub fn generate_bom_report(sized: &SizedTree, params: &DesignParams) -> BomReport {
    let mut items = Vec::new();

    frame_rows(params, &mut items);

    let divider_count = sized.layout.divider_count();
    let post_length = params.height - 2.0 * params.profile_size();
    for _ in 0..divider_count {
        items.push(BomItem::profile("Divider post", post_length, 1, None));
    }

    panel_rows(params, &mut items);

    let mut shelf_count = 0u32;
    let mut door_leaves = 0u32;
    for item in sized.layout.items() {
        let extent = sized.extent_of(&item.id).unwrap_or_default();
        let counts = item_rows(item, extent, params, &mut items);
        shelf_count += counts.shelves;
        door_leaves += counts.door_leaves;
    }

    let hinge = select_hinge(params.profile_type, params.overlay);
    let mut advisories = Vec::new();
    if door_leaves > 0 {
        match (&hinge.hinge, hinge.k, hinge.adjustment) {
            (Some(spec), Some(k), Some(adjustment)) if hinge.success => {
                items.push(BomItem::hardware(
                    format!("Hinge {}", spec.name),
                    HINGES_PER_LEAF * door_leaves,
                    Some(format!("K={}, adjustment {:+.1} mm", k, adjustment)),
                ));
            }
            _ => {
                warn!(door_leaves, overlay = params.overlay, "Doors have no compatible hinge");
                advisories.push(hinge.message.clone());
            }
        }
    }

    let connectors = BASE_CONNECTORS
        + CONNECTORS_PER_SHELF * shelf_count
        + CONNECTORS_PER_DIVIDER * divider_count as u32;
    items.push(BomItem::hardware(params.connector_type.display_name(), connectors, None));

    info!(
        rows = items.len(),
        shelves = shelf_count,
        dividers = divider_count,
        door_leaves,
        "Generated bill of materials"
    );

    BomReport {
        items,
        hinge,
        advisories,
    }
}

fn frame_rows(params: &DesignParams, items: &mut Vec<BomItem>) {
    let deduction = params.connector_type.deduction_mm();
    let note = Some(format!("{} profile", params.profile_type));

    items.push(BomItem::profile("Pillar", params.height, 4, note.clone()));
    items.push(BomItem::profile(
        "Width beam",
        params.inner_width() - 2.0 * deduction,
        4,
        note.clone(),
    ));
    items.push(BomItem::profile("Depth beam", params.inner_depth(), 4, note));
}

/// Blank size for a panel spanning `span` between two profiles
fn panel_blank(span: f64, params: &DesignParams) -> f64 {
    span - 2.0 * params.profile_size() + 2.0 * params.profile_type.slot_depth_mm() - params.tolerance
}

fn panel_rows(params: &DesignParams, items: &mut Vec<BomItem>) {
    let t = params.panel_thickness;
    let width = panel_blank(params.width, params);
    let height = panel_blank(params.height, params);
    let depth = panel_blank(params.depth, params);
    let toggles = params.panels;

    if toggles.left {
        items.push(BomItem::panel("Side panel (left)", 1, depth, height, t));
    }
    if toggles.right {
        items.push(BomItem::panel("Side panel (right)", 1, depth, height, t));
    }
    if toggles.back {
        items.push(BomItem::panel("Back panel", 1, width, height, t));
    }
    if toggles.top {
        items.push(BomItem::panel("Top panel", 1, width, depth, t));
    }
    if toggles.bottom {
        items.push(BomItem::panel("Bottom panel", 1, width, depth, t));
    }
}

struct ItemCounts {
    shelves: u32,
    door_leaves: u32,
}

fn item_rows(item: &ItemNode, extent: Extent, params: &DesignParams, items: &mut Vec<BomItem>) -> ItemCounts {
    let Some(bay) = item.content.as_bay() else {
        return ItemCounts {
            shelves: 0,
            door_leaves: 0,
        };
    };

    let p = params.profile_size();
    let t = params.panel_thickness;
    let deduction = params.connector_type.deduction_mm();
    let w = extent.width;
    let h = extent.height;

    if let Some(door) = bay.door.filter(|d| d.enabled) {
        match door.kind {
            DoorType::Single => {
                items.push(BomItem::panel(
                    "Door",
                    1,
                    w - SINGLE_DOOR_GAP,
                    h - SINGLE_DOOR_GAP,
                    t,
                ));
                items.push(BomItem::hardware("Handle", 1, Some(format!("door {}", item.id))));
            }
            DoorType::Double => {
                for side in ["left", "right"] {
                    items.push(BomItem::panel(
                        format!("Door leaf ({})", side),
                        1,
                        w / 2.0 - DOUBLE_DOOR_GAP,
                        h - SINGLE_DOOR_GAP,
                        t,
                    ));
                    items.push(BomItem::hardware(
                        "Handle",
                        1,
                        Some(format!("door {} ({})", item.id, side)),
                    ));
                }
            }
        }
    }

    for shelf in &bay.shelves {
        let note = Some(format!("shelf {}", shelf.id));
        items.push(BomItem::profile(
            "Shelf width beam",
            (w - 2.0 * p) - 2.0 * deduction,
            2,
            note.clone(),
        ));
        items.push(BomItem::profile("Shelf depth beam", params.inner_depth(), 2, note));
    }

    for drawer in &bay.drawers {
        let note = Some(format!("drawer {}", drawer.id));
        let front_width = match params.drawer_style {
            DrawerStyle::Overlay => w + 2.0 * params.overlay,
            DrawerStyle::Inset => w - INSET_DRAWER_GAP,
        };
        items.push(BomItem::hardware("Drawer slide pair", 1, note.clone()));
        items.push(BomItem::panel("Drawer front", 1, front_width, drawer.height, t));
        items.push(BomItem::hardware("Drawer box", 1, note.clone()));
        items.push(BomItem::hardware("Handle", 1, note));
    }

    ItemCounts {
        shelves: bay.shelves.len() as u32,
        door_leaves: bay.door_leaves(),
    }
}

/// Merge rows describing the same part, summing quantities.
///
/// Notes survive only when every merged row carried the same note.
pub fn consolidate(items: &[BomItem]) -> Vec<BomItem> {
    let mut merged: Vec<BomItem> = Vec::new();
    for item in items {
        match merged.iter_mut().find(|m| m.same_part(item)) {
            Some(existing) => {
                *existing.qty_mut() += item.qty();
                if existing.note() != item.note() {
                    existing.clear_note();
                }
            }
            None => merged.push(item.clone()),
        }
    }
    merged
}

/// Profile rows as cut requests for the cutting optimizer.
///
/// Zero-length and zero-quantity rows are dropped.
pub fn profile_cuts(items: &[BomItem]) -> Vec<CutRequest> {
    items
        .iter()
        .filter_map(|item| match item {
            BomItem::Profile { length_mm, qty, .. } if *length_mm > 0.0 && *qty > 0 => {
                Some(CutRequest::new(*length_mm, *qty))
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConnectorType, ProfileType};
    use crate::layout::{
        BayConfig, DoorConfig, Drawer, HingeSide, LayoutNode, LayoutTree, Orientation, Shelf, SizeSpec,
    };
    use crate::params::PanelToggles;
    use crate::sizing::size_tree;

    fn profile_length(items: &[BomItem], wanted: &str) -> Option<f64> {
        items.iter().find_map(|item| match item {
            BomItem::Profile { name, length_mm, .. } if name == wanted => Some(*length_mm),
            _ => None,
        })
    }

    fn hardware_qty(items: &[BomItem], wanted: &str) -> u32 {
        items
            .iter()
            .filter_map(|item| match item {
                BomItem::Hardware { name, qty, .. } if name == wanted => Some(*qty),
                _ => None,
            })
            .sum()
    }

    fn bom_for(tree: &LayoutTree, params: &DesignParams) -> Vec<BomItem> {
        generate_bom(&size_tree(tree, params), params)
    }

    fn params(profile: ProfileType, width: f64) -> DesignParams {
        DesignParams {
            width,
            profile_type: profile,
            connector_type: ConnectorType::AngleBracket,
            ..DesignParams::default()
        }
    }

    fn door(kind: DoorType) -> Option<DoorConfig> {
        Some(DoorConfig {
            enabled: true,
            kind,
            hinge_side: HingeSide::Left,
        })
    }

    #[test]
    fn test_width_beam_lengths() {
        let empty = LayoutTree::default();
        for (profile, width, expected) in [
            (ProfileType::P2020, 600.0, 560.0),
            (ProfileType::P3030, 600.0, 540.0),
            (ProfileType::P4040, 1000.0, 920.0),
        ] {
            let bom = bom_for(&empty, &params(profile, width));
            assert_eq!(profile_length(&bom, "Width beam"), Some(expected), "{}", profile);
        }
    }

    #[test]
    fn test_connector_deduction_applies_to_beams() {
        let p = DesignParams {
            connector_type: ConnectorType::SpacerBlock,
            ..DesignParams::default()
        };
        let bom = bom_for(&LayoutTree::default(), &p);
        assert_eq!(profile_length(&bom, "Width beam"), Some(556.0));
        assert_eq!(hardware_qty(&bom, "Spacer Block Connector"), 16);
    }

    #[test]
    fn test_frame_and_panels() {
        let p = DesignParams::default();
        let bom = bom_for(&LayoutTree::default(), &p);
        assert_eq!(profile_length(&bom, "Pillar"), Some(720.0));
        assert_eq!(profile_length(&bom, "Depth beam"), Some(520.0));

        // 600 - 40 + 12 - 1 = 571; 720 - 40 + 12 - 1 = 691
        let back = bom.iter().find(|i| i.name() == "Back panel").unwrap();
        assert_eq!(
            back,
            &BomItem::Panel {
                name: "Back panel".to_string(),
                qty: 1,
                width_mm: 571.0,
                height_mm: 691.0,
                thickness_mm: 4.0,
            }
        );

        let no_panels = DesignParams {
            panels: PanelToggles::default(),
            ..p
        };
        let bom = bom_for(&LayoutTree::default(), &no_panels);
        assert!(bom.iter().all(|i| !matches!(i, BomItem::Panel { .. })));
    }

    fn sample_tree() -> LayoutTree {
        LayoutTree::new(
            Orientation::Horizontal,
            vec![
                LayoutNode::bay(
                    "left",
                    SizeSpec::Fixed(300.0),
                    BayConfig {
                        shelves: vec![
                            Shelf { id: "s1".into(), y: 200.0 },
                            Shelf { id: "s2".into(), y: 400.0 },
                        ],
                        drawers: vec![],
                        door: door(DoorType::Double),
                    },
                ),
                LayoutNode::divider("d1", 20.0),
                LayoutNode::bay(
                    "right",
                    SizeSpec::Auto,
                    BayConfig {
                        shelves: vec![],
                        drawers: vec![Drawer { id: "dr1".into(), y: 0.0, height: 150.0 }],
                        door: door(DoorType::Single),
                    },
                ),
            ],
        )
    }

    #[test]
    fn test_bay_contents() {
        let p = DesignParams::default();
        let bom = bom_for(&sample_tree(), &p);

        // right bay: 560 - 20 - 300 = 240 wide, 680 high
        let door = bom.iter().find(|i| i.name() == "Door").unwrap();
        assert!(matches!(door, BomItem::Panel { width_mm, height_mm, .. } if *width_mm == 236.0 && *height_mm == 676.0));

        let leaf = bom.iter().find(|i| i.name() == "Door leaf (left)").unwrap();
        assert!(matches!(leaf, BomItem::Panel { width_mm, .. } if *width_mm == 147.0));

        assert_eq!(profile_length(&bom, "Shelf width beam"), Some(260.0));
        assert_eq!(profile_length(&bom, "Divider post"), Some(680.0));

        // 3 door handles + 1 drawer handle
        assert_eq!(hardware_qty(&bom, "Handle"), 4);
        assert_eq!(hardware_qty(&bom, "Drawer slide pair"), 1);
        assert_eq!(hardware_qty(&bom, "Drawer box"), 1);

        // inset drawer front: 240 - 10
        let front = bom.iter().find(|i| i.name() == "Drawer front").unwrap();
        assert!(matches!(front, BomItem::Panel { width_mm, height_mm, .. } if *width_mm == 230.0 && *height_mm == 150.0));

        // 16 + 8×2 shelves + 4×1 divider
        assert_eq!(hardware_qty(&bom, "Angle Bracket"), 36);
    }

    #[test]
    fn test_hinge_quantity() {
        let p = DesignParams::default();
        let bom = bom_for(&sample_tree(), &p);
        // 3 leaves × 2
        assert_eq!(hardware_qty(&bom, "Hinge C80 Full Overlay"), 6);
    }

    #[test]
    fn test_overlay_drawer_front() {
        let p = DesignParams {
            drawer_style: DrawerStyle::Overlay,
            ..DesignParams::default()
        };
        let bom = bom_for(&sample_tree(), &p);
        let front = bom.iter().find(|i| i.name() == "Drawer front").unwrap();
        assert!(matches!(front, BomItem::Panel { width_mm, .. } if *width_mm == 268.0));
    }

    #[test]
    fn test_unreachable_overlay_is_advisory() {
        let p = DesignParams {
            overlay: 50.0,
            ..DesignParams::default()
        };
        let report = generate_bom_report(&size_tree(&sample_tree(), &p), &p);
        assert!(!report.hinge.success);
        assert_eq!(report.advisories.len(), 1);
        assert!(report.advisories[0].contains("50"));
        assert!(report.items.iter().all(|i| !i.name().starts_with("Hinge")));
    }

    #[test]
    fn test_no_doors_no_advisory() {
        let p = DesignParams {
            overlay: 50.0,
            ..DesignParams::default()
        };
        let report = generate_bom_report(&size_tree(&LayoutTree::default(), &p), &p);
        assert!(report.advisories.is_empty());
    }

    #[test]
    fn test_degenerate_dimensions_do_not_fail() {
        let p = DesignParams {
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            ..DesignParams::default()
        };
        let bom = bom_for(&sample_tree(), &p);
        assert_eq!(profile_length(&bom, "Width beam"), Some(0.0));
        assert!(bom.iter().all(|i| match i {
            BomItem::Profile { length_mm, .. } => *length_mm >= 0.0,
            BomItem::Panel { width_mm, height_mm, .. } => *width_mm >= 0.0 && *height_mm >= 0.0,
            BomItem::Hardware { .. } => true,
        }));
    }

    #[test]
    fn test_consolidate_and_cuts() {
        let p = DesignParams::default();
        let bom = bom_for(&sample_tree(), &p);
        let merged = consolidate(&bom);
        let handles: Vec<_> = merged.iter().filter(|i| i.name() == "Handle").collect();
        assert_eq!(handles.len(), 1);
        assert_eq!(handles[0].qty(), 4);

        let shelf_beams = merged.iter().find(|i| i.name() == "Shelf width beam").unwrap();
        assert_eq!(shelf_beams.qty(), 4);

        let cuts = profile_cuts(&bom);
        let pieces: u32 = cuts.iter().map(|c| c.qty).sum();
        // 12 frame + 1 divider + 2 shelves × 4
        assert_eq!(pieces, 21);
    }

    #[test]
    fn test_bom_json_shape() {
        let row = BomItem::profile("Pillar", 720.4, 4, None);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["category"], "profile");
        assert_eq!(json["length_mm"], 720.0);
        assert!(json.get("note").is_none());
    }
}
