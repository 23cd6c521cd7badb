//! # Layout Sizing
//!
//! Turns the size requests in a layout tree into concrete millimeters.
//!
//! ## Algorithm
//!
//! For each sibling list, along the owning container's axis:
//!
//! ```text
//! remaining = max(0, available - Σ divider thickness - Σ fixed sizes)
//! per_auto  = floor(remaining / auto_count)
//! ```
//!
//! Dividers get their thickness, fixed nodes their explicit size and auto
//! nodes `per_auto`. A container then lays its own children out along its
//! own orientation inside the size it was just given.
//!
//! Floor division leaves up to `auto_count` mm unassigned in a list. The
//! remainder is not handed to any sibling.
//!
//! ## Example
//!
//! ```rust
//! use cabinet_core::layout::{BayConfig, LayoutNode, SizeSpec};
//! use cabinet_core::sizing::resolve_sizes;
//!
//! let nodes = vec![
//!     LayoutNode::bay("a", SizeSpec::Fixed(100.0), BayConfig::default()),
//!     LayoutNode::bay("b", SizeSpec::Auto, BayConfig::default()),
//! ];
//! let sizes = resolve_sizes(&nodes, 300.0);
//! assert_eq!(sizes["b"], 200.0);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub use crate::layout::MAX_DEPTH;
use crate::layout::{LayoutNode, LayoutTree, Orientation, SizeSpec};
use crate::params::DesignParams;

/// Flat id → size map covering a whole subtree (mm)
pub type SizeMap = BTreeMap<String, f64>;

/// Resolve every node under `nodes` given `available_space` along the
/// list's axis.
///
/// Lists past [`MAX_DEPTH`] are skipped, so the returned map can be partial.
pub fn resolve_sizes(nodes: &[LayoutNode], available_space: f64) -> SizeMap {
    let mut sizes = SizeMap::new();
    resolve_into(nodes, available_space, 0, &mut sizes);
    sizes
}

/// Size given to each auto node of one sibling list
pub fn auto_share(nodes: &[LayoutNode], available_space: f64) -> f64 {
    let mut divider_sum = 0.0;
    let mut fixed_sum = 0.0;
    let mut auto_count = 0usize;
    for node in nodes {
        match node {
            LayoutNode::Divider(d) => divider_sum += d.thickness,
            other => match other.size() {
                Some(SizeSpec::Fixed(v)) => fixed_sum += v,
                Some(SizeSpec::Auto) => auto_count += 1,
                None => {}
            },
        }
    }
    if auto_count == 0 {
        return 0.0;
    }
    let remaining = (available_space - divider_sum - fixed_sum).max(0.0);
    (remaining / auto_count as f64).floor()
}

fn resolve_into(nodes: &[LayoutNode], available: f64, depth: usize, sizes: &mut SizeMap) {
    if depth >= MAX_DEPTH {
        warn!(depth, "Layout nesting too deep, leaving subtree unsized");
        return;
    }

    let per_auto = auto_share(nodes, available);
    debug!(depth, available, per_auto, count = nodes.len(), "Sizing sibling list");

    for node in nodes {
        match node {
            LayoutNode::Divider(d) => {
                sizes.insert(d.id.clone(), d.thickness);
            }
            LayoutNode::Item(item) => {
                sizes.insert(item.id.clone(), item.size.fixed().unwrap_or(per_auto));
            }
            LayoutNode::Container(c) => {
                let size = c.size.fixed().unwrap_or(per_auto);
                sizes.insert(c.id.clone(), size);
                resolve_into(&c.children, size, depth + 1, sizes);
            }
        }
    }
}

/// Two-dimensional footprint of a node in the cabinet's front view (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// A layout tree together with its resolved sizes.
///
/// `extents` carries the width and height of every container and item:
/// the resolved size along the parent's axis and the parent's extent across
/// it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SizedTree {
    pub layout: LayoutTree,
    pub sizes: SizeMap,
    pub extents: BTreeMap<String, Extent>,
}

impl SizedTree {
    pub fn size_of(&self, id: &str) -> Option<f64> {
        self.sizes.get(id).copied()
    }

    pub fn extent_of(&self, id: &str) -> Option<Extent> {
        self.extents.get(id).copied()
    }
}

/// Span available to the root list: the inner width for a horizontal root,
/// the inner height for a vertical one.
pub fn root_span(tree: &LayoutTree, params: &DesignParams) -> f64 {
    match tree.orientation {
        Orientation::Horizontal => params.inner_width(),
        Orientation::Vertical => params.inner_height(),
    }
}

/// Size the whole tree inside the cabinet frame described by `params`.
pub fn size_tree(tree: &LayoutTree, params: &DesignParams) -> SizedTree {
    let sizes = resolve_sizes(&tree.children, root_span(tree, params));
    let mut extents = BTreeMap::new();
    let frame = Extent {
        width: params.inner_width(),
        height: params.inner_height(),
    };
    collect_extents(&tree.children, tree.orientation, frame, &sizes, 0, &mut extents);
    debug!(nodes = sizes.len(), "Resolved layout sizes");
    SizedTree {
        layout: tree.clone(),
        sizes,
        extents,
    }
}

fn collect_extents(
    nodes: &[LayoutNode],
    axis: Orientation,
    parent: Extent,
    sizes: &SizeMap,
    depth: usize,
    out: &mut BTreeMap<String, Extent>,
) {
    if depth >= MAX_DEPTH {
        return;
    }
    for node in nodes {
        if node.is_divider() {
            continue;
        }
        let Some(&size) = sizes.get(node.id()) else {
            continue;
        };
        let extent = match axis {
            Orientation::Horizontal => Extent {
                width: size,
                height: parent.height,
            },
            Orientation::Vertical => Extent {
                width: parent.width,
                height: size,
            },
        };
        out.insert(node.id().to_string(), extent);
        if let LayoutNode::Container(c) = node {
            collect_extents(&c.children, c.orientation, extent, sizes, depth + 1, out);
        }
    }
}
