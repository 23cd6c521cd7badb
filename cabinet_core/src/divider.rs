//! # Divider Moves
//!
//! Dragging a divider moves space from one neighbor to the other. The pair's
//! combined span is conserved, both neighbors keep at least [`MIN_SIZE`],
//! and neighbors that were auto-sized are frozen at their current size the
//! moment they are touched.
//!
//! ## Two Phases
//!
//! - [`preview_divider_move`] runs on every pointer move. It never touches
//!   the tree and its result may be thrown away.
//! - [`commit_divider_move`] runs once when the drag ends and returns a new
//!   tree with both neighbors set to fixed sizes.
//!
//! An aborted drag simply never commits.
//!
//! ## Example
//!
//! ```rust
//! use cabinet_core::divider::{commit_divider_move, preview_divider_move};
//! use cabinet_core::layout::{BayConfig, LayoutNode, LayoutTree, Orientation, SizeSpec};
//!
//! let tree = LayoutTree::new(Orientation::Horizontal, vec![
//!     LayoutNode::bay("left", SizeSpec::Fixed(200.0), BayConfig::default()),
//!     LayoutNode::divider("d", 20.0),
//!     LayoutNode::bay("right", SizeSpec::Fixed(240.0), BayConfig::default()),
//! ]);
//!
//! let preview = preview_divider_move(&tree, "d", 10.0, 20.0, 500.0);
//! assert_eq!(preview.hint.unwrap().prev_size, 210.0);
//!
//! let result = commit_divider_move(&tree, "d", 10.0, 20.0, 500.0);
//! assert!(result.success);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::{CabinetError, CabinetResult};
use crate::layout::{LayoutNode, LayoutTree, SizeSpec};
use crate::sizing::{resolve_sizes, SizeMap};

/// Smallest size a divider's neighbor can be dragged down to (mm)
pub const MIN_SIZE: f64 = 40.0;

/// What the UI needs to draw a divider mid-drag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerHint {
    pub divider_id: String,
    pub prev_id: String,
    pub next_id: String,
    /// Neighbor sizes before the move
    pub prev_start: f64,
    pub next_start: f64,
    /// Neighbor sizes after the move
    pub prev_size: f64,
    pub next_size: f64,
    /// Delta after clamping
    pub applied_delta: f64,
    /// `true` when the requested delta had to be reduced
    pub clamped: bool,
}

/// Outcome of the preview phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerPreview {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<DividerHint>,
    pub message: String,
}

/// Outcome of the commit phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DividerMoveResult {
    pub success: bool,
    /// The updated tree; `None` when the move failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<LayoutTree>,
    /// Outer span recomputed from the updated top-level sizes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_outer_span: Option<f64>,
    pub message: String,
}

/// Where the neighbors live, plus the computed move
struct DividerPlan {
    prev_path: Vec<usize>,
    next_path: Vec<usize>,
    hint: DividerHint,
}

/// Compute a divider move without mutating anything.
pub fn preview_divider_move(
    tree: &LayoutTree,
    divider_id: &str,
    delta: f64,
    profile_size: f64,
    total_outer_span: f64,
) -> DividerPreview {
    match plan_move(tree, divider_id, delta, profile_size, total_outer_span) {
        Ok(plan) => DividerPreview {
            success: true,
            message: hint_message(&plan.hint),
            hint: Some(plan.hint),
        },
        Err(e) => DividerPreview {
            success: false,
            hint: None,
            message: e.to_string(),
        },
    }
}

/// Apply a divider move, returning a new tree.
///
/// Both neighbors become fixed-size; every other node is untouched. On
/// failure `success` is false and no tree is returned.
pub fn commit_divider_move(
    tree: &LayoutTree,
    divider_id: &str,
    delta: f64,
    profile_size: f64,
    total_outer_span: f64,
) -> DividerMoveResult {
    match try_commit(tree, divider_id, delta, profile_size, total_outer_span) {
        Ok((updated, span, hint)) => {
            info!(
                divider = divider_id,
                prev = hint.prev_size,
                next = hint.next_size,
                total_outer_span = span,
                "Divider move committed"
            );
            DividerMoveResult {
                success: true,
                tree: Some(updated),
                total_outer_span: Some(span),
                message: hint_message(&hint),
            }
        }
        Err(e) => DividerMoveResult {
            success: false,
            tree: None,
            total_outer_span: None,
            message: e.to_string(),
        },
    }
}

/// One-shot move: preview and commit in a single call.
pub fn resolve_divider_move(
    tree: &LayoutTree,
    divider_id: &str,
    delta: f64,
    profile_size: f64,
    total_outer_span: f64,
) -> DividerMoveResult {
    commit_divider_move(tree, divider_id, delta, profile_size, total_outer_span)
}

/// Outer span of a tree: top-level sizes, divider thickness and the two
/// frame profiles.
pub fn outer_span(tree: &LayoutTree, profile_size: f64, inner_span: f64) -> f64 {
    let sizes = resolve_sizes(&tree.children, inner_span);
    let top_level: f64 = tree
        .children
        .iter()
        .filter_map(|n| sizes.get(n.id()))
        .sum();
    top_level + 2.0 * profile_size
}

fn try_commit(
    tree: &LayoutTree,
    divider_id: &str,
    delta: f64,
    profile_size: f64,
    total_outer_span: f64,
) -> CabinetResult<(LayoutTree, f64, DividerHint)> {
    let plan = plan_move(tree, divider_id, delta, profile_size, total_outer_span)?;

    let mut updated = tree.clone();
    set_fixed(&mut updated, &plan.prev_path, plan.hint.prev_size)?;
    set_fixed(&mut updated, &plan.next_path, plan.hint.next_size)?;

    let span = outer_span(&updated, profile_size, total_outer_span - 2.0 * profile_size);
    Ok((updated, span, plan.hint))
}

fn set_fixed(tree: &mut LayoutTree, path: &[usize], size: f64) -> CabinetResult<()> {
    let node = tree
        .node_at_mut(path)
        .ok_or_else(|| CabinetError::Internal {
            message: format!("Lost neighbor at path {:?}", path),
        })?;
    node.set_size(SizeSpec::Fixed(size));
    Ok(())
}

fn plan_move(
    tree: &LayoutTree,
    divider_id: &str,
    delta: f64,
    profile_size: f64,
    total_outer_span: f64,
) -> CabinetResult<DividerPlan> {
    if !delta.is_finite() {
        return Err(CabinetError::invalid_input("delta", delta.to_string(), "Delta must be finite"));
    }

    let path = tree
        .path_to(divider_id)
        .ok_or_else(|| CabinetError::node_not_found(divider_id))?;
    let siblings = tree
        .siblings_at(&path)
        .ok_or_else(|| CabinetError::node_not_found(divider_id))?;
    let idx = *path.last().ok_or_else(|| CabinetError::node_not_found(divider_id))?;

    if !siblings[idx].is_divider() {
        return Err(CabinetError::invalid_structure(format!("'{}' is not a divider", divider_id)));
    }

    let prev_idx = siblings[..idx]
        .iter()
        .rposition(|n| !n.is_divider())
        .ok_or_else(|| CabinetError::invalid_structure(format!("Divider '{}' has no previous neighbor", divider_id)))?;
    let next_idx = siblings[idx + 1..]
        .iter()
        .position(|n| !n.is_divider())
        .map(|offset| idx + 1 + offset)
        .ok_or_else(|| CabinetError::invalid_structure(format!("Divider '{}' has no next neighbor", divider_id)))?;

    let prev = &siblings[prev_idx];
    let next = &siblings[next_idx];

    // Auto neighbors are baked at their current resolved size.
    let sizes = resolve_sizes(&tree.children, total_outer_span - 2.0 * profile_size);
    let prev_start = materialized_size(prev, &sizes)?;
    let next_start = materialized_size(next, &sizes)?;

    let applied = clamp_delta(delta, prev_start, next_start);
    let hint = DividerHint {
        divider_id: divider_id.to_string(),
        prev_id: prev.id().to_string(),
        next_id: next.id().to_string(),
        prev_start,
        next_start,
        prev_size: prev_start + applied,
        next_size: next_start - applied,
        applied_delta: applied,
        clamped: applied != delta,
    };
    debug!(
        divider = divider_id,
        requested = delta,
        applied,
        prev = hint.prev_size,
        next = hint.next_size,
        "Planned divider move"
    );

    let mut prev_path = path.clone();
    let mut next_path = path;
    if let Some(last) = prev_path.last_mut() {
        *last = prev_idx;
    }
    if let Some(last) = next_path.last_mut() {
        *last = next_idx;
    }

    Ok(DividerPlan {
        prev_path,
        next_path,
        hint,
    })
}

fn materialized_size(node: &LayoutNode, sizes: &SizeMap) -> CabinetResult<f64> {
    match node.size() {
        Some(SizeSpec::Fixed(v)) => Ok(v),
        Some(SizeSpec::Auto) => sizes.get(node.id()).copied().ok_or_else(|| {
            CabinetError::invalid_structure(format!("'{}' could not be sized", node.id()))
        }),
        None => Err(CabinetError::invalid_structure(format!("'{}' is a divider", node.id()))),
    }
}

/// Shrink `delta` until both neighbors stay at or above [`MIN_SIZE`].
///
/// The delta is only ever reduced toward zero; a neighbor already below the
/// minimum blocks moves that would shrink it further.
pub fn clamp_delta(delta: f64, prev: f64, next: f64) -> f64 {
    if delta > 0.0 {
        let room = next - MIN_SIZE;
        if room <= 0.0 {
            0.0
        } else {
            delta.min(room)
        }
    } else if delta < 0.0 {
        let room = MIN_SIZE - prev;
        if room >= 0.0 {
            0.0
        } else {
            delta.max(room)
        }
    } else {
        0.0
    }
}

fn hint_message(hint: &DividerHint) -> String {
    if hint.clamped {
        format!(
            "Moved by {} mm (limited by {} mm minimum): {} = {}, {} = {}",
            hint.applied_delta, MIN_SIZE, hint.prev_id, hint.prev_size, hint.next_id, hint.next_size
        )
    } else {
        format!(
            "Moved by {} mm: {} = {}, {} = {}",
            hint.applied_delta, hint.prev_id, hint.prev_size, hint.next_id, hint.next_size
        )
    }
}
